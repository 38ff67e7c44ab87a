//! Hook runner
//!
//! Orchestrates one hook run:
//!
//! 1. **Loading**: look the hook up; a missing, disabled or empty hook
//!    succeeds right away. Otherwise compile every condition and resolve every
//!    action and plugin. Any problem here is returned as an error before a
//!    single callback runs.
//! 2. **Running**: `before_hook`, then for each action in order: omit it if a
//!    plugin asked to skip, evaluate hook-wide AND action conditions, wrap the
//!    action in `before_action`/`after_action` and execute it only if its
//!    conditions hold.
//! 3. **Outcome**: dispatch `HookSucceeded` or `HookFailed`, exactly once.
//! 4. **Finalizing**: `after_hook` and `AfterHook`, whatever happened before.

use crate::action::{ActionRegistry, Executable};
use crate::condition::{self, ConditionNode, PredicateRegistry};
use crate::context::RunContext;
use crate::event::{EventDispatcher, LifecycleEvent};
use crate::plugin::{PluginContext, PluginManager, PluginRegistry, SkipFlag};
use crate::{Error, Result};
use hookline_config::{ActionConfig, Config};
use hookline_core::{HookName, Io, Repository};

/// Final state of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every action succeeded (or was allowed to fail)
    Succeeded,
    /// An action, condition, plugin or handler failed
    Failed,
}

/// What happened during a run
#[derive(Debug)]
pub struct RunReport {
    /// Hook that was run
    pub hook: HookName,
    /// Overall outcome
    pub outcome: Outcome,
    /// Actions that were executed, in order
    pub executed: Vec<String>,
    /// Actions that were not executed (conditions false or skip requested)
    pub skipped: Vec<String>,
    /// Errors that made the run fail
    pub errors: Vec<Error>,
    /// Errors that were reported without changing the outcome
    /// (allowed failures, declined failure handlers)
    pub reported: Vec<Error>,
}

impl RunReport {
    fn new(hook: HookName) -> Self {
        Self {
            hook,
            outcome: Outcome::Succeeded,
            executed: Vec::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
            reported: Vec::new(),
        }
    }

    /// Whether the run succeeded
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.outcome == Outcome::Succeeded
    }

    /// Process exit code: 0 for success, 1 for failure
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.outcome {
            Outcome::Succeeded => 0,
            Outcome::Failed => 1,
        }
    }
}

/// An action resolved during loading
struct PlannedAction<'c> {
    config: &'c ActionConfig,
    executable: Executable,
    conditions: ConditionNode,
}

/// Runs configured hooks
///
/// # Examples
///
/// ```ignore
/// let runner = HookRunner::new(&config, &io, &repository);
/// let report = runner.run(HookName::PreCommit)?;
/// std::process::exit(report.exit_code());
/// ```
pub struct HookRunner<'a> {
    config: &'a Config,
    io: &'a dyn Io,
    repository: &'a dyn Repository,
    actions: ActionRegistry,
    predicates: PredicateRegistry,
    plugins: PluginRegistry,
}

impl<'a> HookRunner<'a> {
    /// Create a runner with every built-in action, condition and plugin
    ///
    /// For custom registries, use [`HookRunner::builder`].
    #[must_use]
    pub fn new(config: &'a Config, io: &'a dyn Io, repository: &'a dyn Repository) -> Self {
        Self::builder(config, io, repository).build()
    }

    /// Create a builder for configuring a runner
    ///
    /// ```ignore
    /// let mut actions = ActionRegistry::with_builtins();
    /// actions.register("acme::lint", || Box::new(Lint));
    /// let runner = HookRunner::builder(&config, &io, &repository)
    ///     .actions(actions)
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder(
        config: &'a Config,
        io: &'a dyn Io,
        repository: &'a dyn Repository,
    ) -> HookRunnerBuilder<'a> {
        HookRunnerBuilder::new(config, io, repository)
    }

    /// Run a hook
    ///
    /// # Errors
    ///
    /// Returns error only when the hook cannot be planned (unknown action,
    /// condition or plugin identifiers, bad condition arguments, plugins
    /// rejecting their options). Everything that goes wrong once the run has
    /// started is recorded in the returned [`RunReport`].
    #[tracing::instrument(skip(self), fields(hook = %hook))]
    pub fn run(&self, hook: HookName) -> Result<RunReport> {
        let mut report = RunReport::new(hook);

        let Some(hook_config) = self.config.hook(hook).filter(|h| h.is_active()) else {
            tracing::debug!("Hook is not configured, disabled or has no actions");
            return Ok(report);
        };

        // Loading
        let hook_conditions = condition::compile_all(&hook_config.conditions, &self.predicates)?;
        let planned = hook_config
            .actions
            .iter()
            .map(|action| {
                Ok(PlannedAction {
                    config: action,
                    executable: Executable::resolve(action, &self.actions)?,
                    conditions: condition::compile_all(&action.conditions, &self.predicates)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let mut plugins = PluginManager::load(&self.config.plugins, &self.plugins)?;
        tracing::debug!(
            actions = planned.len(),
            plugins = plugins.len(),
            "Hook planned"
        );

        // Running
        let run = RunContext::new(hook, self.io, self.repository, self.config);
        let skip = SkipFlag::new();
        let plugin_ctx = PluginContext::new(&run, &skip);
        let mut dispatcher = EventDispatcher::new();

        let aborted = self
            .run_actions(
                &run,
                &plugin_ctx,
                &mut plugins,
                &mut dispatcher,
                &hook_conditions,
                &planned,
                &mut report,
            )
            .err();
        if let Some(error) = aborted {
            tracing::error!(error = %error, "Hook run aborted");
            self.fail(&mut report, error);
        }

        // Outcome
        let mut failure_dispatched = false;
        if report.errors.is_empty() {
            if let Err(error) = dispatcher.dispatch(LifecycleEvent::HookSucceeded, &run, None) {
                self.fail(&mut report, error);
            }
        }
        if !report.errors.is_empty() {
            self.dispatch_failure(&dispatcher, &run, &mut report);
            failure_dispatched = true;
        }

        // Finalizing
        if let Err(error) = plugins.after_hook(&plugin_ctx) {
            self.fail(&mut report, error);
        }
        if let Err(error) = dispatcher.dispatch(LifecycleEvent::AfterHook, &run, None) {
            self.fail(&mut report, error);
        }
        if !failure_dispatched && !report.errors.is_empty() {
            tracing::debug!("Run failed while finalizing");
            self.dispatch_failure(&dispatcher, &run, &mut report);
        }

        if !report.errors.is_empty() {
            report.outcome = Outcome::Failed;
        }
        tracing::info!(
            outcome = ?report.outcome,
            executed = report.executed.len(),
            skipped = report.skipped.len(),
            "Hook finished"
        );
        Ok(report)
    }

    /// Plugin and action loop; an error aborts the remaining actions
    #[allow(clippy::too_many_arguments)]
    fn run_actions(
        &self,
        run: &RunContext<'_>,
        plugin_ctx: &PluginContext<'_>,
        plugins: &mut PluginManager,
        dispatcher: &mut EventDispatcher,
        hook_conditions: &ConditionNode,
        planned: &[PlannedAction<'_>],
        report: &mut RunReport,
    ) -> Result<()> {
        plugins.before_hook(plugin_ctx)?;
        dispatcher.dispatch(LifecycleEvent::BeforeHook, run, None)?;

        let condition_ctx = run.condition_context();
        let fail_fast = self.config.settings.fail_fast;
        // Hook-wide conditions only depend on the run: evaluated at most once
        let mut hook_applies: Option<bool> = None;

        for (index, action) in planned.iter().enumerate() {
            let config = action.config;
            let name = config.display_name().to_string();

            if plugin_ctx.skip_requested() {
                tracing::debug!(action = %name, "Skipping action on plugin request");
                report.skipped.push(name);
                continue;
            }

            let hook_ok = match hook_applies {
                Some(value) => value,
                None => {
                    let value = hook_conditions.evaluate(&condition_ctx)?;
                    hook_applies = Some(value);
                    value
                }
            };
            let applies = hook_ok && action.conditions.evaluate(&condition_ctx)?;

            plugins.before_action(plugin_ctx, index, config)?;
            dispatcher.dispatch(LifecycleEvent::BeforeAction, run, Some(config))?;

            let mut stop = false;
            if applies {
                for (event, handler) in action.executable.subscriptions(config) {
                    dispatcher.subscribe(event, vec![handler]);
                }
                report.executed.push(name.clone());
                match action.executable.execute(run, config) {
                    Ok(()) => self.io.write(&format!("{name}: done")),
                    Err(error) if config.allow_failure => {
                        tracing::warn!(action = %name, "Action failed, failure allowed");
                        self.io
                            .write_error(&format!("{error}\n(failure of '{name}' is allowed)"));
                        report.reported.push(error);
                    }
                    Err(error) => {
                        tracing::error!(action = %name, "Action failed");
                        self.fail(report, error);
                        stop = fail_fast;
                    }
                }
            } else {
                tracing::debug!(action = %name, "Conditions not met, skipping action");
                report.skipped.push(name);
            }

            plugins.after_action(plugin_ctx, config)?;
            dispatcher.dispatch(LifecycleEvent::AfterAction, run, Some(config))?;

            if stop {
                tracing::debug!("Stopping after first failure");
                break;
            }
        }
        Ok(())
    }

    /// `HookFailed` handlers can add to a failure but never change it
    fn dispatch_failure(
        &self,
        dispatcher: &EventDispatcher,
        run: &RunContext<'_>,
        report: &mut RunReport,
    ) {
        if let Err(error) = dispatcher.dispatch(LifecycleEvent::HookFailed, run, None) {
            self.io.write_error(&error.to_string());
            report.reported.push(error);
        }
    }

    fn fail(&self, report: &mut RunReport, error: Error) {
        self.io.write_error(&error.to_string());
        report.errors.push(error);
    }
}

/// Builder for [`HookRunner`]
pub struct HookRunnerBuilder<'a> {
    config: &'a Config,
    io: &'a dyn Io,
    repository: &'a dyn Repository,
    actions: Option<ActionRegistry>,
    predicates: Option<PredicateRegistry>,
    plugins: Option<PluginRegistry>,
}

impl<'a> HookRunnerBuilder<'a> {
    fn new(config: &'a Config, io: &'a dyn Io, repository: &'a dyn Repository) -> Self {
        Self {
            config,
            io,
            repository,
            actions: None,
            predicates: None,
            plugins: None,
        }
    }

    /// Use these in-process actions instead of the built-in ones
    #[must_use]
    pub fn actions(mut self, actions: ActionRegistry) -> Self {
        self.actions = Some(actions);
        self
    }

    /// Use these predicates instead of the built-in ones
    #[must_use]
    pub fn predicates(mut self, predicates: PredicateRegistry) -> Self {
        self.predicates = Some(predicates);
        self
    }

    /// Use these plugins instead of the built-in ones
    #[must_use]
    pub fn plugins(mut self, plugins: PluginRegistry) -> Self {
        self.plugins = Some(plugins);
        self
    }

    /// Build the runner
    #[must_use]
    pub fn build(self) -> HookRunner<'a> {
        HookRunner {
            config: self.config,
            io: self.io,
            repository: self.repository,
            actions: self.actions.unwrap_or_else(ActionRegistry::with_builtins),
            predicates: self
                .predicates
                .unwrap_or_else(PredicateRegistry::with_builtins),
            plugins: self.plugins.unwrap_or_else(PluginRegistry::with_builtins),
        }
    }
}
