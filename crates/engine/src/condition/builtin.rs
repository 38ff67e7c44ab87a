//! Built-in predicates

use super::{ConditionContext, Predicate, PredicateRegistry};
use crate::range;
use crate::{Error, Result, shell};
use hookline_config::{OptionValue, is_truthy};
use hookline_core::{has_extension, is_in_directory};
use regex::Regex;

pub(super) fn register(registry: &mut PredicateRegistry) {
    registry.register("hookline::config::custom-value-is-truthy", |id, args| {
        Ok(Box::new(CustomValue::new(id, args, true)?))
    });
    registry.register("hookline::config::custom-value-is-falsy", |id, args| {
        Ok(Box::new(CustomValue::new(id, args, false)?))
    });

    registry.register("hookline::file-staged::any", |id, args| {
        Ok(Box::new(FileStaged::new(id, FileCheck::Any(list_args(id, args)?))))
    });
    registry.register("hookline::file-staged::all", |id, args| {
        Ok(Box::new(FileStaged::new(id, FileCheck::All(list_args(id, args)?))))
    });
    registry.register("hookline::file-staged::of-type", |id, args| {
        Ok(Box::new(FileStaged::new(id, FileCheck::OfType(single_arg(id, args)?))))
    });
    registry.register("hookline::file-staged::in-directory", |id, args| {
        Ok(Box::new(FileStaged::new(
            id,
            FileCheck::InDirectory(single_arg(id, args)?),
        )))
    });

    registry.register("hookline::file-changed::any", |id, args| {
        Ok(Box::new(FileChanged::new(id, FileCheck::Any(list_args(id, args)?))))
    });
    registry.register("hookline::file-changed::of-type", |id, args| {
        Ok(Box::new(FileChanged::new(id, FileCheck::OfType(single_arg(id, args)?))))
    });
    registry.register("hookline::file-changed::in-directory", |id, args| {
        Ok(Box::new(FileChanged::new(
            id,
            FileCheck::InDirectory(single_arg(id, args)?),
        )))
    });

    registry.register("hookline::branch::on", |id, args| {
        Ok(Box::new(Branch::new(id, BranchCheck::On(single_arg(id, args)?))))
    });
    registry.register("hookline::branch::not-on", |id, args| {
        Ok(Box::new(Branch::new(id, BranchCheck::NotOn(single_arg(id, args)?))))
    });
    registry.register("hookline::branch::on-matching", |id, args| {
        Ok(Box::new(Branch::new(
            id,
            BranchCheck::Matching(pattern_arg(id, args)?),
        )))
    });
    registry.register("hookline::branch::not-on-matching", |id, args| {
        Ok(Box::new(Branch::new(
            id,
            BranchCheck::NotMatching(pattern_arg(id, args)?),
        )))
    });
}

fn single_arg(id: &str, args: &[OptionValue]) -> Result<String> {
    match args {
        [value] => Ok(value.to_string()),
        _ => Err(Error::Configuration(format!(
            "Condition '{id}' expects exactly one argument, got {}",
            args.len()
        ))),
    }
}

fn list_args(id: &str, args: &[OptionValue]) -> Result<Vec<String>> {
    let values: Vec<String> = args.iter().flat_map(OptionValue::to_string_list).collect();
    if values.is_empty() {
        return Err(Error::Configuration(format!(
            "Condition '{id}' expects at least one path"
        )));
    }
    Ok(values)
}

fn pattern_arg(id: &str, args: &[OptionValue]) -> Result<Regex> {
    let pattern = single_arg(id, args)?;
    Regex::new(&pattern)
        .map_err(|e| Error::Configuration(format!("Condition '{id}' has an invalid regex: {e}")))
}

/// `custom-value-is-truthy` / `custom-value-is-falsy`
struct CustomValue {
    id: String,
    key: String,
    expect_truthy: bool,
}

impl CustomValue {
    fn new(id: &str, args: &[OptionValue], expect_truthy: bool) -> Result<Self> {
        Ok(Self {
            id: id.to_string(),
            key: single_arg(id, args)?,
            expect_truthy,
        })
    }
}

impl Predicate for CustomValue {
    fn name(&self) -> &str {
        &self.id
    }

    fn is_true(&self, ctx: &ConditionContext<'_>) -> Result<bool> {
        let custom = ctx
            .custom
            .ok_or_else(|| Error::condition(&self.id, "no configuration attached"))?;
        // Absent counts as falsy
        let truthy = custom.get(&self.key).is_some_and(is_truthy);
        Ok(truthy == self.expect_truthy)
    }
}

/// How a list of files is checked
enum FileCheck {
    /// At least one of these paths is in the list
    Any(Vec<String>),
    /// Every one of these paths is in the list
    All(Vec<String>),
    /// At least one file has this extension
    OfType(String),
    /// At least one file lives below this directory
    InDirectory(String),
}

impl FileCheck {
    fn matches(&self, files: &[String]) -> bool {
        match self {
            FileCheck::Any(paths) => paths.iter().any(|p| files.contains(p)),
            FileCheck::All(paths) => paths.iter().all(|p| files.contains(p)),
            FileCheck::OfType(extension) => files.iter().any(|f| has_extension(f, extension)),
            FileCheck::InDirectory(directory) => {
                files.iter().any(|f| is_in_directory(f, directory))
            }
        }
    }
}

/// `file-staged::*`
struct FileStaged {
    id: String,
    check: FileCheck,
}

impl FileStaged {
    fn new(id: &str, check: FileCheck) -> Self {
        Self {
            id: id.to_string(),
            check,
        }
    }
}

impl Predicate for FileStaged {
    fn name(&self) -> &str {
        &self.id
    }

    fn is_true(&self, ctx: &ConditionContext<'_>) -> Result<bool> {
        let files = match &self.check {
            FileCheck::OfType(extension) => ctx.repository.staged_files_of_type(extension),
            _ => ctx.repository.staged_files("ACMR"),
        }
        .map_err(|e| Error::condition(&self.id, e))?;
        Ok(self.check.matches(&files))
    }
}

/// `file-changed::*`, over the ref ranges of the running hook
struct FileChanged {
    id: String,
    check: FileCheck,
}

impl FileChanged {
    fn new(id: &str, check: FileCheck) -> Self {
        Self {
            id: id.to_string(),
            check,
        }
    }
}

impl Predicate for FileChanged {
    fn name(&self) -> &str {
        &self.id
    }

    fn is_true(&self, ctx: &ConditionContext<'_>) -> Result<bool> {
        let files = range::detect(ctx.hook, ctx.io, ctx.repository)
            .and_then(|ranges| range::changed_files(ctx.repository, &ranges, "ACMR"))
            .map_err(|e| Error::condition(&self.id, e))?;
        Ok(self.check.matches(&files))
    }
}

enum BranchCheck {
    On(String),
    NotOn(String),
    Matching(Regex),
    NotMatching(Regex),
}

/// `branch::*`
struct Branch {
    id: String,
    check: BranchCheck,
}

impl Branch {
    fn new(id: &str, check: BranchCheck) -> Self {
        Self {
            id: id.to_string(),
            check,
        }
    }
}

impl Predicate for Branch {
    fn name(&self) -> &str {
        &self.id
    }

    fn is_true(&self, ctx: &ConditionContext<'_>) -> Result<bool> {
        let branch = ctx
            .repository
            .current_branch()
            .map_err(|e| Error::condition(&self.id, e))?;
        Ok(match &self.check {
            BranchCheck::On(name) => branch == *name,
            BranchCheck::NotOn(name) => branch != *name,
            BranchCheck::Matching(pattern) => pattern.is_match(&branch),
            BranchCheck::NotMatching(pattern) => !pattern.is_match(&branch),
        })
    }
}

/// A shell command used as a condition: true iff it exits 0
pub struct CommandCondition {
    command: String,
}

impl CommandCondition {
    /// Create from a command and extra arguments appended with spaces
    pub fn new(command: &str, args: &[OptionValue]) -> Self {
        let mut command = command.to_string();
        for arg in args {
            command.push(' ');
            command.push_str(&arg.to_string());
        }
        Self { command }
    }
}

impl Predicate for CommandCondition {
    fn name(&self) -> &str {
        &self.command
    }

    fn is_true(&self, ctx: &ConditionContext<'_>) -> Result<bool> {
        let output = shell::run(&self.command, ctx.repository.root(), ctx.hook.name())
            .map_err(|e| Error::condition(&self.command, e))?;
        if !output.success() {
            tracing::debug!(command = %self.command, output = %output.output, "Condition command failed");
        }
        Ok(output.success())
    }
}
