//! Staged file checks

use super::{Action, ActionRegistry};
use crate::context::RunContext;
use crate::{Error, Result};
use hookline_config::{ActionConfig, OptionValue};
use hookline_core::has_extension;
use regex::Regex;

pub(super) fn register(registry: &mut ActionRegistry) {
    registry.register("hookline::file::max-size", || Box::new(MaxSize));
    registry.register("hookline::file::does-not-contain-regex", || {
        Box::new(DoesNotContainRegex)
    });
}

/// Parse `500`, `500B`, `500K`, `1M`, `1G` (case-insensitive, binary units)
fn parse_size(value: &str) -> Option<u64> {
    let value = value.trim();
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let number: u64 = number.parse().ok()?;
    let multiplier: u64 = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "K" | "KB" => 1024,
        "M" | "MB" => 1024 * 1024,
        "G" | "GB" => 1024 * 1024 * 1024,
        _ => return None,
    };
    number.checked_mul(multiplier)
}

fn staged(ctx: &RunContext<'_>) -> Result<Vec<String>> {
    Ok(ctx.repository.staged_files("ACMR")?)
}

/// Staged files must not be bigger than `max-size`
struct MaxSize;

impl Action for MaxSize {
    fn execute(&self, ctx: &RunContext<'_>, action: &ActionConfig) -> Result<()> {
        let option = action
            .option("max-size")
            .ok_or_else(|| Error::Configuration("option 'max-size' is required".to_string()))?;
        let limit = match option {
            OptionValue::Int(n) => u64::try_from(*n).ok(),
            other => parse_size(&other.to_string()),
        }
        .ok_or_else(|| Error::Configuration(format!("invalid max-size '{option}'")))?;

        let root = ctx.repository.root();
        let mut too_big = Vec::new();
        for file in staged(ctx)? {
            let Ok(metadata) = std::fs::metadata(root.join(&file)) else {
                continue;
            };
            if metadata.len() > limit {
                too_big.push(format!("{file} ({} bytes)", metadata.len()));
            }
        }

        if too_big.is_empty() {
            return Ok(());
        }
        Err(Error::action_failed(
            action.display_name(),
            format!(
                "Files larger than {option}:\n  {}",
                too_big.join("\n  ")
            ),
        ))
    }
}

/// Staged files must not match `regex`
///
/// `file-extensions` limits the check to some file types.
struct DoesNotContainRegex;

impl Action for DoesNotContainRegex {
    fn execute(&self, ctx: &RunContext<'_>, action: &ActionConfig) -> Result<()> {
        let pattern = action
            .option("regex")
            .and_then(OptionValue::as_str)
            .ok_or_else(|| Error::Configuration("option 'regex' is required".to_string()))?;
        let regex = Regex::new(pattern)
            .map_err(|e| Error::Configuration(format!("invalid regex '{pattern}': {e}")))?;
        let extensions = action
            .option("file-extensions")
            .map(OptionValue::to_string_list)
            .unwrap_or_default();

        let root = ctx.repository.root();
        let mut matches = Vec::new();
        for file in staged(ctx)? {
            if !extensions.is_empty() && !extensions.iter().any(|ext| has_extension(&file, ext)) {
                continue;
            }
            // Binary or vanished files cannot contain the pattern as text
            let Ok(content) = std::fs::read_to_string(root.join(&file)) else {
                continue;
            };
            let count = regex.find_iter(&content).count();
            if count > 0 {
                matches.push(format!("{file}: {count} match(es)"));
            }
        }

        if matches.is_empty() {
            return Ok(());
        }
        Err(Error::action_failed(
            action.display_name(),
            format!("Found '{pattern}' in:\n  {}", matches.join("\n  ")),
        ))
    }
}
