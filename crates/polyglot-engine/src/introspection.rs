//! Call-graph introspection
//!
//! Queries used to recover the clones a splitting pass produced and the
//! call sites that reach a target. They read structures a compiler thread
//! may be mutating, so each result is a point-in-time view.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::error::{EngineError, EngineResult};
use crate::node::{DirectCallNode, Node};
use crate::runtime::Runtime;
use crate::target::{CallTarget, RootNode};

/// `original` plus every live target split from it
pub fn find_duplicate_call_targets(
    runtime: &Runtime,
    original: &Arc<CallTarget>,
) -> FxHashSet<Arc<CallTarget>> {
    let mut duplicates = FxHashSet::default();
    duplicates.insert(Arc::clone(original));
    for target in runtime.call_targets() {
        if target.source_call_target() == Some(original) {
            duplicates.insert(target);
        }
    }
    tracing::trace!(target = %original, found = duplicates.len(), "find duplicate call targets");
    duplicates
}

/// Every direct call node under `root` that calls `target`, either
/// directly or through its cloned target
pub fn find_calls_to(root: &RootNode, target: &Arc<CallTarget>) -> FxHashSet<Arc<DirectCallNode>> {
    let mut calls = FxHashSet::default();
    root.accept(&mut |node: &Node| {
        if let Some(call) = node.as_direct_call() {
            let cloned = call.cloned_call_target();
            if call.call_target() == target || cloned.as_ref() == Some(target) {
                calls.insert(Arc::clone(call));
            }
        }
        true
    });
    tracing::trace!(root = root.name(), target = %target, found = calls.len(), "find calls");
    calls
}

/// [`find_calls_to`] over the root of the target executing on this thread.
///
/// Only meaningful when called synchronously from inside a running call,
/// typically from a builtin.
pub fn find_calls_to_in_caller(
    runtime: &Runtime,
    target: &Arc<CallTarget>,
) -> EngineResult<FxHashSet<Arc<DirectCallNode>>> {
    let frame = runtime.current_frame().ok_or(EngineError::NoCurrentFrame)?;
    Ok(find_calls_to(frame.root(), target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicates_is_singleton() {
        let runtime = Runtime::new();
        let unit = runtime.create_call_target(RootNode::new("unit", 0, Node::Literal(0)));
        let _other = runtime.create_call_target(RootNode::new("other", 0, Node::Literal(0)));

        let found = find_duplicate_call_targets(&runtime, &unit);
        assert_eq!(found.len(), 1);
        assert!(found.contains(&unit));
    }

    #[test]
    fn test_duplicates_include_splits() {
        let runtime = Runtime::new();
        let unit = runtime.create_call_target(RootNode::new("unit", 0, Node::Literal(0)));
        let a = DirectCallNode::new(Arc::clone(&unit), vec![]);
        let b = DirectCallNode::new(Arc::clone(&unit), vec![]);
        let split_a = a.clone_call_target(&runtime).unwrap();
        let split_b = b.clone_call_target(&runtime).unwrap();

        let found = find_duplicate_call_targets(&runtime, &unit);
        assert_eq!(found.len(), 3);
        assert!(found.contains(&split_a));
        assert!(found.contains(&split_b));
    }

    #[test]
    fn test_calls_nested_in_arguments() {
        let runtime = Runtime::new();
        let id = runtime.create_call_target(RootNode::new("id", 1, Node::Argument(0)));
        let root = RootNode::new(
            "main",
            0,
            Node::call(&id, vec![Node::call(&id, vec![Node::Literal(1)])]),
        );
        assert_eq!(find_calls_to(&root, &id).len(), 2);
    }

    #[test]
    fn test_in_caller_outside_call() {
        let runtime = Runtime::new();
        let unit = runtime.create_call_target(RootNode::new("unit", 0, Node::Literal(0)));
        assert!(matches!(
            find_calls_to_in_caller(&runtime, &unit),
            Err(EngineError::NoCurrentFrame)
        ));
    }
}
