//! Branch naming

use super::{Action, ActionRegistry};
use crate::context::RunContext;
use crate::{Error, Result};
use hookline_config::{ActionConfig, OptionValue};
use regex::Regex;

pub(super) fn register(registry: &mut ActionRegistry) {
    registry.register("hookline::branch::ensure-naming", || Box::new(EnsureNaming));
}

/// The current branch must match `regex`
struct EnsureNaming;

impl Action for EnsureNaming {
    fn execute(&self, ctx: &RunContext<'_>, action: &ActionConfig) -> Result<()> {
        let pattern = action
            .option("regex")
            .and_then(OptionValue::as_str)
            .ok_or_else(|| Error::Configuration("option 'regex' is required".to_string()))?;
        let regex = Regex::new(pattern)
            .map_err(|e| Error::Configuration(format!("invalid regex '{pattern}': {e}")))?;

        let branch = ctx.repository.current_branch()?;
        if branch == "HEAD" {
            tracing::debug!("Detached HEAD, branch name not checked");
            return Ok(());
        }
        if regex.is_match(&branch) {
            Ok(())
        } else {
            Err(Error::action_failed(
                action.display_name(),
                format!("Branch '{branch}' does not match '{pattern}'"),
            ))
        }
    }
}
