//! Runtime: target registry, frame tracking and the interpreter
//!
//! The registry holds weak references, so [`Runtime::call_targets`] lists
//! the targets that are still alive. Frames are tracked per thread while a
//! target executes; queries relative to "the caller" read the innermost one.
//! Runtimes nested on one thread share the stack, but each only sees the
//! frames it pushed.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::error::{EngineError, EngineResult};
use crate::node::{DirectCallNode, Node};
use crate::options::EngineOptions;
use crate::target::{CallTarget, RootNode};

/// Global counter for generating unique runtime IDs
static NEXT_RUNTIME_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static FRAMES: RefCell<Vec<FrameInstance>> = const { RefCell::new(Vec::new()) };
}

/// An executing call target on the current thread
#[derive(Debug, Clone)]
pub struct FrameInstance {
    runtime_id: u64,
    target: Arc<CallTarget>,
    call_node: Option<Arc<DirectCallNode>>,
}

impl FrameInstance {
    /// The executing target
    pub fn call_target(&self) -> &Arc<CallTarget> {
        &self.target
    }

    /// The call node this frame was entered through (`None` for a call
    /// from outside the engine)
    pub fn call_node(&self) -> Option<&Arc<DirectCallNode>> {
        self.call_node.as_ref()
    }

    /// Root of the executing target
    pub fn root(&self) -> &RootNode {
        self.target.root()
    }
}

/// Pops the frame it pushed, also on early return
struct FrameGuard;

impl FrameGuard {
    fn push(frame: FrameInstance) -> Self {
        FRAMES.with(|frames| frames.borrow_mut().push(frame));
        FrameGuard
    }
}

impl Drop for FrameGuard {
    fn drop(&mut self) {
        FRAMES.with(|frames| {
            frames.borrow_mut().pop();
        });
    }
}

/// Engine runtime
#[derive(Debug)]
pub struct Runtime {
    id: u64,
    options: EngineOptions,
    targets: RwLock<Vec<Weak<CallTarget>>>,
}

impl Runtime {
    /// Create a runtime with default options
    pub fn new() -> Self {
        Self::with_options(EngineOptions::default())
    }

    /// Create a runtime with custom options
    pub fn with_options(options: EngineOptions) -> Self {
        Runtime {
            id: NEXT_RUNTIME_ID.fetch_add(1, Ordering::Relaxed),
            options,
            targets: RwLock::new(Vec::new()),
        }
    }

    /// Unique runtime ID
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Engine options
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Create and register a target for `root`
    pub fn create_call_target(&self, root: RootNode) -> Arc<CallTarget> {
        let target = CallTarget::new(root, None);
        self.register(&target);
        target
    }

    /// Create and register a split of `target`.
    ///
    /// The split's source is the original routine's target, so splitting a
    /// split still points back at the original.
    pub(crate) fn split(&self, target: &Arc<CallTarget>) -> Arc<CallTarget> {
        let source = target
            .source_call_target()
            .cloned()
            .unwrap_or_else(|| Arc::clone(target));
        let split = CallTarget::new(source.root().deep_copy(), Some(source));
        self.register(&split);
        split
    }

    fn register(&self, target: &Arc<CallTarget>) {
        let mut targets = self.targets.write();
        targets.retain(|t| t.strong_count() > 0);
        targets.push(Arc::downgrade(target));
    }

    /// All live targets, in creation order.
    ///
    /// A point-in-time view: targets created or dropped concurrently may or
    /// may not appear.
    pub fn call_targets(&self) -> Vec<Arc<CallTarget>> {
        self.targets.read().iter().filter_map(Weak::upgrade).collect()
    }

    /// Call `target` from outside the engine
    pub fn call(&self, target: &Arc<CallTarget>, args: &[i64]) -> EngineResult<i64> {
        self.invoke(target, None, args)
    }

    /// Innermost frame of this runtime on this thread
    pub fn current_frame(&self) -> Option<FrameInstance> {
        self.own_frame(0)
    }

    /// Frame of this runtime that called the innermost one
    pub fn caller_frame(&self) -> Option<FrameInstance> {
        self.own_frame(1)
    }

    /// Number of this runtime's frames on this thread
    pub fn call_depth(&self) -> usize {
        FRAMES.with(|frames| {
            frames
                .borrow()
                .iter()
                .filter(|frame| frame.runtime_id == self.id)
                .count()
        })
    }

    /// The `skip`-th own frame, counting outward from the innermost
    fn own_frame(&self, skip: usize) -> Option<FrameInstance> {
        FRAMES.with(|frames| {
            frames
                .borrow()
                .iter()
                .rev()
                .filter(|frame| frame.runtime_id == self.id)
                .nth(skip)
                .cloned()
        })
    }

    fn invoke(
        &self,
        target: &Arc<CallTarget>,
        call_node: Option<Arc<DirectCallNode>>,
        args: &[i64],
    ) -> EngineResult<i64> {
        let root = target.root();
        if args.len() != root.arity() {
            return Err(EngineError::ArityMismatch {
                name: root.name().to_string(),
                expected: root.arity(),
                actual: args.len(),
            });
        }
        let depth = self.call_depth();
        if depth >= self.options.max_call_depth {
            return Err(EngineError::StackOverflow(depth));
        }

        target.record_call();
        let _frame = FrameGuard::push(FrameInstance {
            runtime_id: self.id,
            target: Arc::clone(target),
            call_node,
        });
        self.execute(root.body(), args)
    }

    fn execute(&self, node: &Node, args: &[i64]) -> EngineResult<i64> {
        match node {
            Node::Literal(value) => Ok(*value),
            Node::Argument(index) => args
                .get(*index)
                .copied()
                .ok_or(EngineError::ArgumentOutOfRange(*index)),
            Node::Add(left, right) => {
                let left = self.execute(left, args)?;
                let right = self.execute(right, args)?;
                Ok(left.wrapping_add(right))
            }
            Node::Block(nodes) => {
                let mut last = 0;
                for node in nodes {
                    last = self.execute(node, args)?;
                }
                Ok(last)
            }
            Node::Call(call) => {
                let values = self.evaluate_all(call.arguments(), args)?;
                let target = call.current_call_target();
                self.invoke(&target, Some(Arc::clone(call)), &values)
            }
            Node::Builtin(builtin) => {
                let values = self.evaluate_all(builtin.arguments(), args)?;
                (builtin.function())(self, &values)
            }
        }
    }

    fn evaluate_all(&self, nodes: &[Node], args: &[i64]) -> EngineResult<Vec<i64>> {
        nodes.iter().map(|node| self.execute(node, args)).collect()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
