//! Condition evaluation
//!
//! Conditions decide whether an action (or every action of a hook) applies to
//! the current run. Configured [`ConditionConfig`]s are compiled once into
//! [`ConditionNode`] trees:
//!
//! - `hookline::logic::and|or|not` (or plain `and|or|not`) become composite nodes
//! - any other `hookline::` identifier is looked up in the [`PredicateRegistry`]
//! - anything else is a shell command that is true iff it exits 0
//!
//! Composite nodes short-circuit left to right, so expensive predicates
//! (repository queries, shell commands) only run when their result matters.

mod builtin;
mod registry;

pub use builtin::CommandCondition;
pub use registry::{PredicateFactory, PredicateRegistry};

use crate::{Error, Result};
use hookline_config::{ConditionArg, ConditionConfig, OptionValue};
use hookline_core::{HookName, Io, Repository};
use indexmap::IndexMap;

/// Prefix of every built-in identifier
pub const BUILTIN_PREFIX: &str = "hookline::";

/// What a predicate can look at
#[derive(Clone, Copy)]
pub struct ConditionContext<'a> {
    /// Hook being run
    pub hook: HookName,
    /// Hook arguments and stdin
    pub io: &'a dyn Io,
    /// Git queries
    pub repository: &'a dyn Repository,
    /// Custom configuration values, `None` when no configuration is attached
    pub custom: Option<&'a IndexMap<String, OptionValue>>,
}

/// A leaf of a condition tree
pub trait Predicate {
    /// Identifier used in error messages
    fn name(&self) -> &str;

    /// Decide the predicate for this run
    ///
    /// # Errors
    ///
    /// Returns [`Error::Condition`] if the data the predicate needs is unavailable
    fn is_true(&self, ctx: &ConditionContext<'_>) -> Result<bool>;
}

/// Compiled condition tree
pub enum ConditionNode {
    /// A single predicate
    Leaf(Box<dyn Predicate>),
    /// True iff every child is true (empty: true)
    And(Vec<ConditionNode>),
    /// True iff any child is true (empty: false)
    Or(Vec<ConditionNode>),
    /// Negation of the child
    Not(Box<ConditionNode>),
}

impl ConditionNode {
    /// A node that is always true
    #[must_use]
    pub fn always() -> Self {
        ConditionNode::And(Vec::new())
    }

    /// Evaluate with short-circuiting
    ///
    /// # Errors
    ///
    /// Propagates the first predicate error
    pub fn evaluate(&self, ctx: &ConditionContext<'_>) -> Result<bool> {
        match self {
            ConditionNode::Leaf(predicate) => {
                let result = predicate.is_true(ctx)?;
                tracing::trace!(condition = predicate.name(), result, "Evaluated condition");
                Ok(result)
            }
            ConditionNode::And(children) => {
                for child in children {
                    if !child.evaluate(ctx)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            ConditionNode::Or(children) => {
                for child in children {
                    if child.evaluate(ctx)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            ConditionNode::Not(child) => Ok(!child.evaluate(ctx)?),
        }
    }
}

impl std::fmt::Debug for ConditionNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionNode::Leaf(predicate) => write!(f, "Leaf({})", predicate.name()),
            ConditionNode::And(children) => f.debug_tuple("And").field(children).finish(),
            ConditionNode::Or(children) => f.debug_tuple("Or").field(children).finish(),
            ConditionNode::Not(child) => f.debug_tuple("Not").field(child).finish(),
        }
    }
}

/// Evaluate a condition tree
///
/// # Errors
///
/// Propagates the first predicate error
pub fn evaluate(node: &ConditionNode, ctx: &ConditionContext<'_>) -> Result<bool> {
    node.evaluate(ctx)
}

#[derive(Clone, Copy)]
enum Logic {
    And,
    Or,
    Not,
}

fn logic_kind(exec: &str) -> Option<Logic> {
    let name = exec
        .strip_prefix(BUILTIN_PREFIX)
        .and_then(|rest| rest.strip_prefix("logic::"))
        .unwrap_or(exec);
    match name {
        "and" => Some(Logic::And),
        "or" => Some(Logic::Or),
        "not" => Some(Logic::Not),
        _ => None,
    }
}

/// Compile one configured condition
///
/// # Errors
///
/// Returns [`Error::Configuration`] for unknown predicates, bad arguments, or
/// logic conditions with non-condition arguments
pub fn compile(config: &ConditionConfig, registry: &PredicateRegistry) -> Result<ConditionNode> {
    let exec = config.exec.trim();

    if let Some(logic) = logic_kind(exec) {
        let mut children = Vec::with_capacity(config.args.len());
        for arg in &config.args {
            match arg {
                ConditionArg::Condition(nested) => children.push(compile(nested, registry)?),
                ConditionArg::Value(value) => {
                    return Err(Error::Configuration(format!(
                        "Logic condition '{exec}' only accepts nested conditions, got '{value}'"
                    )));
                }
            }
        }
        return match logic {
            Logic::And => Ok(ConditionNode::And(children)),
            Logic::Or => Ok(ConditionNode::Or(children)),
            Logic::Not => {
                let count = children.len();
                let Some(child) = children.pop().filter(|_| count == 1) else {
                    return Err(Error::Configuration(format!(
                        "Logic condition '{exec}' needs exactly one nested condition, got {count}"
                    )));
                };
                Ok(ConditionNode::Not(Box::new(child)))
            }
        };
    }

    let mut values = Vec::with_capacity(config.args.len());
    for arg in &config.args {
        match arg {
            ConditionArg::Value(value) => values.push(value.clone()),
            ConditionArg::Condition(nested) => {
                return Err(Error::Configuration(format!(
                    "Condition '{exec}' does not accept nested condition '{}'",
                    nested.exec
                )));
            }
        }
    }

    if exec.starts_with(BUILTIN_PREFIX) {
        return Ok(ConditionNode::Leaf(registry.create(exec, &values)?));
    }

    Ok(ConditionNode::Leaf(Box::new(CommandCondition::new(
        exec, &values,
    ))))
}

/// Compile a list of conditions into one conjunction
///
/// # Errors
///
/// Returns the first compilation error
pub fn compile_all(
    configs: &[ConditionConfig],
    registry: &PredicateRegistry,
) -> Result<ConditionNode> {
    let children = configs
        .iter()
        .map(|config| compile(config, registry))
        .collect::<Result<Vec<_>>>()?;
    Ok(ConditionNode::And(children))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::io::BufferedIo;
    use crate::testing::FakeRepository;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Predicate with a fixed answer that counts its evaluations
    struct Counting {
        answer: bool,
        calls: Rc<Cell<usize>>,
    }

    impl Predicate for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn is_true(&self, _ctx: &ConditionContext<'_>) -> Result<bool> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.answer)
        }
    }

    fn leaf(answer: bool, calls: &Rc<Cell<usize>>) -> ConditionNode {
        ConditionNode::Leaf(Box::new(Counting {
            answer,
            calls: Rc::clone(calls),
        }))
    }

    fn with_context<T>(f: impl FnOnce(&ConditionContext<'_>) -> T) -> T {
        let io = BufferedIo::new();
        let repository = FakeRepository::new();
        let custom = IndexMap::from([("STRICT".to_string(), OptionValue::from("yes"))]);
        let ctx = ConditionContext {
            hook: HookName::PreCommit,
            io: &io,
            repository: &repository,
            custom: Some(&custom),
        };
        f(&ctx)
    }

    #[test]
    fn test_and_short_circuits() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let node = ConditionNode::And(vec![leaf(false, &first), leaf(true, &second)]);

        assert!(!with_context(|ctx| evaluate(&node, ctx).unwrap()));
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
    }

    #[test]
    fn test_or_short_circuits() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let node = ConditionNode::Or(vec![leaf(true, &first), leaf(false, &second)]);

        assert!(with_context(|ctx| evaluate(&node, ctx).unwrap()));
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
    }

    #[test]
    fn test_evaluates_all_children_when_needed() {
        let calls = Rc::new(Cell::new(0));
        let node = ConditionNode::Or(vec![leaf(false, &calls), leaf(false, &calls)]);
        assert!(!with_context(|ctx| evaluate(&node, ctx).unwrap()));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_not_and_empty_nodes() {
        let calls = Rc::new(Cell::new(0));
        let node = ConditionNode::Not(Box::new(leaf(false, &calls)));
        assert!(with_context(|ctx| evaluate(&node, ctx).unwrap()));

        assert!(with_context(|ctx| ConditionNode::always().evaluate(ctx).unwrap()));
        assert!(!with_context(|ctx| ConditionNode::Or(vec![]).evaluate(ctx).unwrap()));
    }

    #[test]
    fn test_compile_nested_logic() {
        let registry = PredicateRegistry::with_builtins();
        let config = ConditionConfig::logic(
            "hookline::logic::and",
            vec![
                ConditionConfig::new(
                    "hookline::config::custom-value-is-truthy",
                    vec![OptionValue::from("STRICT")],
                ),
                ConditionConfig::logic(
                    "not",
                    vec![ConditionConfig::new(
                        "hookline::branch::on",
                        vec![OptionValue::from("release")],
                    )],
                ),
            ],
        );

        let node = compile(&config, &registry).unwrap();
        assert!(matches!(node, ConditionNode::And(ref c) if c.len() == 2));
        assert!(with_context(|ctx| node.evaluate(ctx).unwrap()));
    }

    #[test]
    fn test_compile_unknown_predicate() {
        let registry = PredicateRegistry::with_builtins();
        let config = ConditionConfig::new("hookline::moon::is-full", vec![]);
        let err = compile(&config, &registry).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("hookline::moon::is-full"));
    }

    #[test]
    fn test_compile_not_requires_one_child() {
        let registry = PredicateRegistry::with_builtins();
        let config = ConditionConfig::logic("hookline::logic::not", vec![]);
        assert!(compile(&config, &registry).unwrap_err().is_configuration());
    }

    #[test]
    fn test_compile_logic_rejects_values() {
        let registry = PredicateRegistry::with_builtins();
        let config = ConditionConfig::new("or", vec![OptionValue::from("x")]);
        assert!(compile(&config, &registry).unwrap_err().is_configuration());
    }

    #[test]
    fn test_compile_command_condition() {
        let registry = PredicateRegistry::with_builtins();
        let config = ConditionConfig::new("test -f", vec![OptionValue::from("Cargo.toml")]);
        let node = compile(&config, &registry).unwrap();
        assert_eq!(format!("{node:?}"), "Leaf(test -f Cargo.toml)");
    }

    #[test]
    fn test_predicate_error_propagates() {
        let registry = PredicateRegistry::with_builtins();
        let node = compile(
            &ConditionConfig::new("hookline::branch::on", vec![OptionValue::from("main")]),
            &registry,
        )
        .unwrap();

        let io = BufferedIo::new();
        let repository = FakeRepository::new().broken();
        let ctx = ConditionContext {
            hook: HookName::PreCommit,
            io: &io,
            repository: &repository,
            custom: None,
        };
        let err = node.evaluate(&ctx).unwrap_err();
        assert!(matches!(err, Error::Condition { ref condition, .. } if condition == "hookline::branch::on"));
    }
}
