//! Node trees
//!
//! A call target's body is a tree of [`Node`]s. Calls to other targets go
//! through a [`DirectCallNode`], which may have its target cloned (split)
//! so the call site gets a private copy to specialize.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::EngineResult;
use crate::runtime::Runtime;
use crate::target::CallTarget;

/// Global counter for generating unique call node IDs
static NEXT_CALL_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Native implementation of a builtin: runtime and evaluated arguments in,
/// result out
pub type BuiltinFn = Arc<dyn Fn(&Runtime, &[i64]) -> EngineResult<i64> + Send + Sync>;

/// A node in a call target's body
#[derive(Debug)]
pub enum Node {
    /// Integer constant
    Literal(i64),
    /// Argument of the executing target, by index
    Argument(usize),
    /// Wrapping integer addition
    Add(Box<Node>, Box<Node>),
    /// Sequence; evaluates to its last node (0 when empty)
    Block(Vec<Node>),
    /// Call to another target
    Call(Arc<DirectCallNode>),
    /// Call to native code
    Builtin(BuiltinNode),
}

impl Node {
    /// `left + right`
    pub fn add(left: Node, right: Node) -> Self {
        Node::Add(Box::new(left), Box::new(right))
    }

    /// A direct call to `target`
    pub fn call(target: &Arc<CallTarget>, arguments: Vec<Node>) -> Self {
        Node::Call(DirectCallNode::new(Arc::clone(target), arguments))
    }

    /// A builtin call
    pub fn builtin(name: &str, arguments: Vec<Node>, function: BuiltinFn) -> Self {
        Node::Builtin(BuiltinNode {
            name: name.to_string(),
            arguments,
            function,
        })
    }

    /// Direct children in evaluation order
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Literal(_) | Node::Argument(_) => Vec::new(),
            Node::Add(left, right) => vec![&**left, &**right],
            Node::Block(nodes) => nodes.iter().collect(),
            Node::Call(call) => call.arguments.iter().collect(),
            Node::Builtin(builtin) => builtin.arguments.iter().collect(),
        }
    }

    /// The call node, if this is a direct call
    pub fn as_direct_call(&self) -> Option<&Arc<DirectCallNode>> {
        match self {
            Node::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Visit this node and its descendants depth first, parents before
    /// children. Stops as soon as the visitor returns `false`; returns
    /// whether the walk ran to completion.
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> bool {
        if !visitor.visit(self) {
            return false;
        }
        self.children().into_iter().all(|child| child.accept(visitor))
    }

    /// Copy of this tree with fresh call nodes and no cloned targets
    pub(crate) fn deep_copy(&self) -> Node {
        match self {
            Node::Literal(v) => Node::Literal(*v),
            Node::Argument(i) => Node::Argument(*i),
            Node::Add(left, right) => Node::add(left.deep_copy(), right.deep_copy()),
            Node::Block(nodes) => Node::Block(nodes.iter().map(Node::deep_copy).collect()),
            Node::Call(call) => Node::Call(DirectCallNode::new(
                Arc::clone(&call.call_target),
                call.arguments.iter().map(Node::deep_copy).collect(),
            )),
            Node::Builtin(builtin) => Node::Builtin(BuiltinNode {
                name: builtin.name.clone(),
                arguments: builtin.arguments.iter().map(Node::deep_copy).collect(),
                function: Arc::clone(&builtin.function),
            }),
        }
    }
}

/// Callback for [`Node::accept`]; return `false` to stop the walk
pub trait NodeVisitor {
    /// Visit one node
    fn visit(&mut self, node: &Node) -> bool;
}

impl<F: FnMut(&Node) -> bool> NodeVisitor for F {
    fn visit(&mut self, node: &Node) -> bool {
        self(node)
    }
}

/// Node calling a fixed target, optionally through a cloned copy of it
pub struct DirectCallNode {
    id: u64,
    call_target: Arc<CallTarget>,
    cloned_call_target: RwLock<Option<Arc<CallTarget>>>,
    arguments: Vec<Node>,
}

impl DirectCallNode {
    /// Create a call node for `call_target`
    pub fn new(call_target: Arc<CallTarget>, arguments: Vec<Node>) -> Arc<Self> {
        Arc::new(DirectCallNode {
            id: NEXT_CALL_NODE_ID.fetch_add(1, Ordering::Relaxed),
            call_target,
            cloned_call_target: RwLock::new(None),
            arguments,
        })
    }

    /// Unique node ID
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The target this node was created for
    pub fn call_target(&self) -> &Arc<CallTarget> {
        &self.call_target
    }

    /// The private clone of the target, once split
    pub fn cloned_call_target(&self) -> Option<Arc<CallTarget>> {
        self.cloned_call_target.read().clone()
    }

    /// Whether the target has been cloned for this node
    pub fn is_call_target_cloned(&self) -> bool {
        self.cloned_call_target.read().is_some()
    }

    /// The target a call through this node executes
    pub fn current_call_target(&self) -> Arc<CallTarget> {
        self.cloned_call_target()
            .unwrap_or_else(|| Arc::clone(&self.call_target))
    }

    /// Argument nodes
    pub fn arguments(&self) -> &[Node] {
        &self.arguments
    }

    /// Split the target for this call site.
    ///
    /// Returns the clone (creating it on first request), or `None` when
    /// splitting is disabled.
    pub fn clone_call_target(&self, runtime: &Runtime) -> Option<Arc<CallTarget>> {
        if !runtime.options().splitting {
            return None;
        }
        let mut slot = self.cloned_call_target.write();
        if let Some(existing) = slot.as_ref() {
            return Some(Arc::clone(existing));
        }
        let split = runtime.split(&self.call_target);
        tracing::debug!(node = self.id, target = %split.name(), split = split.id(), "cloned call target");
        *slot = Some(Arc::clone(&split));
        Some(split)
    }
}

impl PartialEq for DirectCallNode {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DirectCallNode {}

impl Hash for DirectCallNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for DirectCallNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectCallNode")
            .field("id", &self.id)
            .field("call_target", &self.call_target.id())
            .field("cloned_call_target", &self.cloned_call_target().map(|t| t.id()))
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// Node calling native code
pub struct BuiltinNode {
    name: String,
    arguments: Vec<Node>,
    function: BuiltinFn,
}

impl BuiltinNode {
    /// Builtin name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Argument nodes
    pub fn arguments(&self) -> &[Node] {
        &self.arguments
    }

    pub(crate) fn function(&self) -> &BuiltinFn {
        &self.function
    }
}

impl fmt::Debug for BuiltinNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuiltinNode")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .finish()
    }
}
