//! Interactive confirmation after a failed run

use super::{Action, ActionRegistry, Subscriptions};
use crate::context::RunContext;
use crate::event::{Event, EventHandler, LifecycleEvent};
use crate::{Error, Result};
use hookline_config::value::is_truthy_str;
use hookline_config::{ActionConfig, OptionValue};

const DEFAULT_QUESTION: &str = "The hook failed. Did you read the output above?";

pub(super) fn register(registry: &mut ActionRegistry) {
    registry.register("hookline::confirm-on-failure", || Box::new(ConfirmOnFailure));
}

/// Asks the user to acknowledge a failed hook
///
/// Declining raises an error that is reported next to the failure. It never
/// turns the failure into a success.
struct ConfirmOnFailure;

impl Action for ConfirmOnFailure {
    fn execute(&self, _ctx: &RunContext<'_>, _action: &ActionConfig) -> Result<()> {
        Ok(())
    }

    fn subscriptions(&self, action: &ActionConfig) -> Subscriptions {
        let question = action
            .option("question")
            .and_then(OptionValue::as_str)
            .unwrap_or(DEFAULT_QUESTION)
            .to_string();
        let name = action.display_name().to_string();
        let handler: Box<dyn EventHandler> =
            Box::new(move |event: &Event<'_>| confirm(event, &name, &question));
        vec![(LifecycleEvent::HookFailed, handler)]
    }
}

fn confirm(event: &Event<'_>, name: &str, question: &str) -> Result<()> {
    let answer = event.io().ask(&format!("{question} [y/N]"), "n")?;
    if is_truthy_str(&answer) {
        Ok(())
    } else {
        Err(Error::action_failed(name, format!("Declined: '{answer}'")))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::event::EventDispatcher;
    use crate::io::BufferedIo;
    use crate::testing::FakeRepository;
    use hookline_config::Config;
    use hookline_core::HookName;

    fn dispatch_with(io: &BufferedIo) -> Result<()> {
        let repository = FakeRepository::new();
        let config = Config::default();
        let run = RunContext::new(HookName::PreCommit, io, &repository, &config);
        let action = ActionConfig::new("hookline::confirm-on-failure")
            .with_option("question", "Commit anyway?");

        let mut dispatcher = EventDispatcher::new();
        for (event, handler) in ConfirmOnFailure.subscriptions(&action) {
            dispatcher.subscribe(event, vec![handler]);
        }
        dispatcher.dispatch(LifecycleEvent::HookFailed, &run, None)
    }

    #[test]
    fn test_accepting() {
        let io = BufferedIo::new().with_answers(["yes"]);
        dispatch_with(&io).unwrap();
        assert_eq!(io.questions(), vec!["Commit anyway? [y/N]"]);
    }

    #[test]
    fn test_declining_raises() {
        let io = BufferedIo::new().with_answers(["no"]);
        let err = dispatch_with(&io).unwrap_err();
        assert!(matches!(err, Error::EventHandler { event: LifecycleEvent::HookFailed, .. }));
    }

    #[test]
    fn test_non_interactive_uses_default_answer() {
        let io = BufferedIo::new();
        assert!(dispatch_with(&io).is_err());
    }
}
