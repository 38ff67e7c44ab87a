//! Debug actions: print what the hook received, then succeed or fail

use super::{Action, ActionRegistry};
use crate::context::RunContext;
use crate::{Error, Result};
use hookline_config::ActionConfig;

pub(super) fn register(registry: &mut ActionRegistry) {
    registry.register("hookline::debug::success", || Box::new(Debug { fail: false }));
    registry.register("hookline::debug::failure", || Box::new(Debug { fail: true }));
}

struct Debug {
    fail: bool,
}

impl Action for Debug {
    fn execute(&self, ctx: &RunContext<'_>, action: &ActionConfig) -> Result<()> {
        let io = ctx.io;
        io.write(&format!("hook: {}", ctx.hook));
        for (name, value) in io.arguments() {
            io.write(&format!("  {name}: {value}"));
        }
        for line in io.standard_input() {
            io.write(&format!("  stdin: {line}"));
        }

        if self.fail {
            Err(Error::action_failed(
                action.display_name(),
                "debug failure requested",
            ))
        } else {
            Ok(())
        }
    }
}
