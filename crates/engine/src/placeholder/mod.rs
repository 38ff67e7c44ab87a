//! Placeholder formatting
//!
//! Shell actions may contain tokens such as `{$STAGED_FILES|of-type:rs}` that
//! are replaced with repository or IO data before the command runs.
//!
//! | Placeholder     | Filters                                                        |
//! |-----------------|----------------------------------------------------------------|
//! | `STAGED_FILES`  | `of-type`, `in-dir`, `diff-filter`, `separated-by`, `replace`, `with` |
//! | `CHANGED_FILES` | same as `STAGED_FILES`, over the hook's ref ranges             |
//! | `BRANCH_FILES`  | `compare-to` plus the `STAGED_FILES` filters                    |
//! | `ARG`           | `value-of`, `default`                                          |
//! | `ENV`           | `value-of`, `default`                                          |
//! | `CONFIG`        | `value-of` (`git-directory`, `custom>>KEY`, `KEY`), `default`   |
//! | `BRANCH`        | none                                                           |
//!
//! Any other name reads the hook argument of that name (`{$FILE}`,
//! `{$PREVIOUS_HEAD}`). Formatting never fails: a token that cannot be
//! resolved becomes an empty string and a warning is logged.

mod cache;
mod parse;

pub use cache::{CacheKey, DATA_FILTERS, PlaceholderCache};
pub use parse::{Filter, Placeholder, Segment, segments};

use crate::context::RunContext;
use crate::range;
use crate::{Error, Result};
use hookline_core::{has_extension, is_in_directory};

/// Diff filter used when none is given: added, copied, modified, renamed
pub const DEFAULT_DIFF_FILTER: &str = "ACMR";

/// Branch compared against when there is no upstream and no `compare-to`
pub const DEFAULT_COMPARE_BRANCH: &str = "main";

const FILE_LIST_FILTERS: &[&str] = &[
    "of-type",
    "in-dir",
    "diff-filter",
    "separated-by",
    "replace",
    "with",
];
const BRANCH_FILES_FILTERS: &[&str] = &[
    "compare-to",
    "of-type",
    "in-dir",
    "diff-filter",
    "separated-by",
    "replace",
    "with",
];
const LOOKUP_FILTERS: &[&str] = &["value-of", "default"];
const ARGUMENT_FILTERS: &[&str] = &["default"];

fn ensure_filters(placeholder: &Placeholder, allowed: &[&str]) -> Result<()> {
    for filter in &placeholder.filters {
        if !allowed.contains(&filter.name.as_str()) {
            return Err(Error::Configuration(format!(
                "Placeholder '{}' does not support filter '{}'",
                placeholder.name, filter.name
            )));
        }
    }
    Ok(())
}

fn required<'p>(placeholder: &'p Placeholder, filter: &str) -> Result<&'p str> {
    placeholder
        .filter(filter)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            Error::Configuration(format!(
                "Placeholder '{}' needs a '{filter}' filter",
                placeholder.name
            ))
        })
}

/// Resolves placeholder tokens for one action
///
/// Repository lookups are memoized for the lifetime of the formatter: every
/// token naming the same source with the same data filters queries the
/// repository once, however it is printed.
pub struct Formatter<'a> {
    ctx: RunContext<'a>,
    cache: PlaceholderCache,
}

impl<'a> Formatter<'a> {
    /// Create a formatter with an empty cache
    #[must_use]
    pub fn new(ctx: RunContext<'a>) -> Self {
        Self {
            ctx,
            cache: PlaceholderCache::new(),
        }
    }

    /// Replace every token in `template`
    pub fn format(&mut self, template: &str) -> String {
        let mut output = String::with_capacity(template.len());
        for segment in segments(template) {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Token {
                    raw,
                    placeholder: Ok(placeholder),
                } => match self.resolve(&placeholder) {
                    Ok(value) => output.push_str(&value),
                    Err(e) => {
                        tracing::warn!(placeholder = raw, error = %e, "Placeholder resolved to an empty string");
                    }
                },
                Segment::Token {
                    raw,
                    placeholder: Err(reason),
                } => {
                    tracing::warn!(placeholder = raw, reason = %reason, "Malformed placeholder resolved to an empty string");
                }
            }
        }
        output
    }

    /// Cached lookups so far
    #[must_use]
    pub fn cache(&self) -> &PlaceholderCache {
        &self.cache
    }

    fn resolve(&mut self, placeholder: &Placeholder) -> Result<String> {
        match placeholder.name.as_str() {
            "STAGED_FILES" | "CHANGED_FILES" => {
                ensure_filters(placeholder, FILE_LIST_FILTERS)?;
                let files = self.files(placeholder)?;
                Ok(join_files(placeholder, files))
            }
            "BRANCH_FILES" => {
                ensure_filters(placeholder, BRANCH_FILES_FILTERS)?;
                let files = self.files(placeholder)?;
                Ok(join_files(placeholder, files))
            }
            "ARG" => {
                ensure_filters(placeholder, LOOKUP_FILTERS)?;
                let name = required(placeholder, "value-of")?;
                Ok(self
                    .ctx
                    .io
                    .argument(name)
                    .or_else(|| placeholder.filter("default").map(str::to_string))
                    .unwrap_or_default())
            }
            "ENV" => {
                ensure_filters(placeholder, LOOKUP_FILTERS)?;
                let name = required(placeholder, "value-of")?;
                Ok(std::env::var(name)
                    .ok()
                    .or_else(|| placeholder.filter("default").map(str::to_string))
                    .unwrap_or_default())
            }
            "CONFIG" => {
                ensure_filters(placeholder, LOOKUP_FILTERS)?;
                let key = required(placeholder, "value-of")?;
                Ok(self
                    .config_value(key)
                    .or_else(|| placeholder.filter("default").map(str::to_string))
                    .unwrap_or_default())
            }
            "BRANCH" => {
                ensure_filters(placeholder, &[])?;
                Ok(self.ctx.repository.current_branch()?)
            }
            name => {
                ensure_filters(placeholder, ARGUMENT_FILTERS)?;
                let kebab = name.to_ascii_lowercase().replace('_', "-");
                Ok(self
                    .ctx
                    .io
                    .argument(name)
                    .or_else(|| self.ctx.io.argument(&kebab))
                    .or_else(|| placeholder.filter("default").map(str::to_string))
                    .unwrap_or_default())
            }
        }
    }

    fn config_value(&self, key: &str) -> Option<String> {
        if key == "git-directory" {
            return Some(self.ctx.repository.git_dir().display().to_string());
        }
        let custom_key = key.strip_prefix("custom>>").unwrap_or(key);
        self.ctx
            .config
            .custom_value(custom_key)
            .map(ToString::to_string)
    }

    /// File list of a placeholder after data filters, memoized twice: the raw
    /// repository answer under the source key, and the filtered view under the
    /// full key
    fn files(&mut self, placeholder: &Placeholder) -> Result<Vec<String>> {
        let ctx = self.ctx;
        let diff_filter = placeholder
            .filter("diff-filter")
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_DIFF_FILTER)
            .to_string();
        let compare_to = placeholder
            .filter("compare-to")
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        let mut source = vec![format!("diff-filter:{diff_filter}")];
        if placeholder.name == "BRANCH_FILES" {
            source.push(format!(
                "compare-to:{}",
                compare_to.as_deref().unwrap_or_default()
            ));
        }
        let source_key = CacheKey::with_filters(&placeholder.name, &source);

        let raw = self.cache.get_or_try_insert(source_key, || {
            fetch_files(ctx, &placeholder.name, &diff_filter, compare_to.as_deref())
        })?;

        let of_type = placeholder.filter("of-type");
        let in_dir = placeholder.filter("in-dir");
        self.cache
            .get_or_try_insert(CacheKey::for_placeholder(placeholder), || {
                Ok::<_, Error>(
                    raw.into_iter()
                        .filter(|f| of_type.is_none_or(|ext| has_extension(f, ext)))
                        .filter(|f| in_dir.is_none_or(|dir| is_in_directory(f, dir)))
                        .collect(),
                )
            })
    }
}

fn fetch_files(
    ctx: RunContext<'_>,
    name: &str,
    diff_filter: &str,
    compare_to: Option<&str>,
) -> Result<Vec<String>> {
    tracing::debug!(placeholder = name, diff_filter, "Querying repository for files");
    let repository = ctx.repository;
    match name {
        "STAGED_FILES" => Ok(repository.staged_files(diff_filter)?),
        "CHANGED_FILES" => {
            let ranges = range::detect(ctx.hook, ctx.io, repository)?;
            Ok(range::changed_files(repository, &ranges, diff_filter)?)
        }
        _ => {
            let target = match compare_to {
                Some(target) => target.to_string(),
                None => repository
                    .upstream_branch()?
                    .unwrap_or_else(|| DEFAULT_COMPARE_BRANCH.to_string()),
            };
            let base = repository.merge_base(&target, "HEAD")?;
            Ok(repository.changed_files(base.as_deref(), "HEAD", diff_filter)?)
        }
    }
}

fn join_files(placeholder: &Placeholder, files: Vec<String>) -> String {
    let separator = placeholder.filter("separated-by").unwrap_or(" ");
    let files: Vec<String> = match placeholder.filter("replace") {
        Some(search) if !search.is_empty() => {
            let replacement = placeholder.filter("with").unwrap_or_default();
            files
                .into_iter()
                .map(|f| f.replace(search, replacement))
                .collect()
        }
        _ => files,
    };
    files.join(separator)
}
