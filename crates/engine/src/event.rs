//! Lifecycle events
//!
//! Handlers subscribe to a closed set of [`LifecycleEvent`]s. Dispatch runs
//! them in subscription order and stops at the first failing handler.

use crate::context::RunContext;
use crate::{Error, Result};
use hookline_config::{ActionConfig, Config};
use hookline_core::{HookName, Io, Repository};
use indexmap::IndexMap;
use std::fmt;

/// Points of a hook run handlers can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Before the first action
    BeforeHook,
    /// Before each action (also when its conditions do not hold)
    BeforeAction,
    /// After each action (also when its conditions do not hold)
    AfterAction,
    /// After everything else, whatever the outcome
    AfterHook,
    /// The run succeeded
    HookSucceeded,
    /// The run failed
    HookFailed,
}

impl LifecycleEvent {
    /// Every event
    pub const ALL: [LifecycleEvent; 6] = [
        LifecycleEvent::BeforeHook,
        LifecycleEvent::BeforeAction,
        LifecycleEvent::AfterAction,
        LifecycleEvent::AfterHook,
        LifecycleEvent::HookSucceeded,
        LifecycleEvent::HookFailed,
    ];

    /// Get the event name
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::BeforeHook => "before-hook",
            LifecycleEvent::BeforeAction => "before-action",
            LifecycleEvent::AfterAction => "after-action",
            LifecycleEvent::AfterHook => "after-hook",
            LifecycleEvent::HookSucceeded => "hook-succeeded",
            LifecycleEvent::HookFailed => "hook-failed",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload handed to every handler of one dispatch
pub struct Event<'a> {
    kind: LifecycleEvent,
    run: &'a RunContext<'a>,
    action: Option<&'a ActionConfig>,
}

impl<'a> Event<'a> {
    /// Event kind
    #[must_use]
    pub fn kind(&self) -> LifecycleEvent {
        self.kind
    }

    /// Hook being run
    #[must_use]
    pub fn hook(&self) -> HookName {
        self.run.hook
    }

    /// Run IO
    #[must_use]
    pub fn io(&self) -> &'a dyn Io {
        self.run.io
    }

    /// Run repository
    #[must_use]
    pub fn repository(&self) -> &'a dyn Repository {
        self.run.repository
    }

    /// Run configuration
    #[must_use]
    pub fn config(&self) -> &'a Config {
        self.run.config
    }

    /// Action the event is about (`BeforeAction` / `AfterAction` only)
    #[must_use]
    pub fn action(&self) -> Option<&'a ActionConfig> {
        self.action
    }
}

/// Something that reacts to an event
pub trait EventHandler {
    /// Handle one event
    ///
    /// # Errors
    ///
    /// Any error aborts the remaining handlers of this dispatch
    fn handle(&self, event: &Event<'_>) -> Result<()>;
}

/// Implement `EventHandler` for closures
impl<F> EventHandler for F
where
    F: Fn(&Event<'_>) -> Result<()>,
{
    fn handle(&self, event: &Event<'_>) -> Result<()> {
        self(event)
    }
}

/// Event to handler registrations
///
/// Subscription order is dispatch order. Subscribing the same handler twice
/// runs it twice.
#[derive(Default)]
pub struct EventDispatcher {
    registrations: IndexMap<LifecycleEvent, Vec<Box<dyn EventHandler>>>,
}

impl EventDispatcher {
    /// Create a dispatcher without registrations
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append handlers for an event
    pub fn subscribe(&mut self, event: LifecycleEvent, handlers: Vec<Box<dyn EventHandler>>) {
        tracing::trace!(event = %event, count = handlers.len(), "Subscribing handlers");
        self.registrations.entry(event).or_default().extend(handlers);
    }

    /// Number of handlers registered for an event
    #[must_use]
    pub fn handler_count(&self, event: LifecycleEvent) -> usize {
        self.registrations.get(&event).map_or(0, Vec::len)
    }

    /// Run every handler of `event` in order
    ///
    /// # Errors
    ///
    /// Returns [`Error::EventHandler`] for the first failing handler; the
    /// remaining handlers do not run
    pub fn dispatch(
        &self,
        event: LifecycleEvent,
        run: &RunContext<'_>,
        action: Option<&ActionConfig>,
    ) -> Result<()> {
        let Some(handlers) = self.registrations.get(&event) else {
            return Ok(());
        };

        tracing::debug!(event = %event, handlers = handlers.len(), "Dispatching event");
        let payload = Event {
            kind: event,
            run,
            action,
        };
        for handler in handlers {
            handler.handle(&payload).map_err(|e| Error::EventHandler {
                event,
                message: e.to_string(),
            })?;
        }
        Ok(())
    }
}
