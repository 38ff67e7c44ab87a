//! Run-scoped context shared by actions, events and plugins

use crate::condition::ConditionContext;
use hookline_config::Config;
use hookline_core::{HookName, Io, Repository};

/// Everything one hook run can see
///
/// Built once at the start of a run and only ever handed out by shared
/// reference, so nothing downstream can change what the run operates on.
#[derive(Clone, Copy)]
pub struct RunContext<'a> {
    /// Hook being run
    pub hook: HookName,
    /// Output, prompts, hook arguments and stdin
    pub io: &'a dyn Io,
    /// Git queries
    pub repository: &'a dyn Repository,
    /// Loaded configuration
    pub config: &'a Config,
}

impl<'a> RunContext<'a> {
    /// Create a run context
    pub fn new(
        hook: HookName,
        io: &'a dyn Io,
        repository: &'a dyn Repository,
        config: &'a Config,
    ) -> Self {
        Self {
            hook,
            io,
            repository,
            config,
        }
    }

    /// View used by condition predicates
    #[must_use]
    pub fn condition_context(&self) -> ConditionContext<'a> {
        ConditionContext {
            hook: self.hook,
            io: self.io,
            repository: self.repository,
            custom: Some(&self.config.custom),
        }
    }
}
