//! Call targets and root nodes

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::node::{Node, NodeVisitor};

/// Global counter for generating unique call target IDs
static NEXT_CALL_TARGET_ID: AtomicU64 = AtomicU64::new(1);

/// Root of an executable tree
#[derive(Debug)]
pub struct RootNode {
    name: String,
    arity: usize,
    body: Node,
}

impl RootNode {
    /// Create a root taking `arity` arguments
    pub fn new(name: &str, arity: usize, body: Node) -> Self {
        Self {
            name: name.to_string(),
            arity,
            body,
        }
    }

    /// Routine name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of arguments
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Body node
    pub fn body(&self) -> &Node {
        &self.body
    }

    /// Walk the body; see [`Node::accept`]
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> bool {
        self.body.accept(visitor)
    }

    pub(crate) fn deep_copy(&self) -> RootNode {
        RootNode {
            name: self.name.clone(),
            arity: self.arity,
            body: self.body.deep_copy(),
        }
    }
}

/// Executable unit for one routine
///
/// A target created by splitting records the target it was split from as
/// its source; every split of the same routine shares one source.
/// Identity (equality, hashing) is by ID.
pub struct CallTarget {
    id: u64,
    root: RootNode,
    source_call_target: Option<Arc<CallTarget>>,
    call_count: AtomicU64,
}

impl CallTarget {
    pub(crate) fn new(root: RootNode, source_call_target: Option<Arc<CallTarget>>) -> Arc<Self> {
        Arc::new(CallTarget {
            id: NEXT_CALL_TARGET_ID.fetch_add(1, Ordering::Relaxed),
            root,
            source_call_target,
            call_count: AtomicU64::new(0),
        })
    }

    /// Unique target ID
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Routine name
    pub fn name(&self) -> &str {
        self.root.name()
    }

    /// Root node
    pub fn root(&self) -> &RootNode {
        &self.root
    }

    /// The target this one was split from
    pub fn source_call_target(&self) -> Option<&Arc<CallTarget>> {
        self.source_call_target.as_ref()
    }

    /// Whether this target was produced by splitting
    pub fn is_split(&self) -> bool {
        self.source_call_target.is_some()
    }

    /// Number of times this target was entered
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub(crate) fn record_call(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }
}

impl PartialEq for CallTarget {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CallTarget {}

impl Hash for CallTarget {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallTarget")
            .field("id", &self.id)
            .field("name", &self.root.name)
            .field("source", &self.source_call_target.as_ref().map(|s| s.id))
            .finish()
    }
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_call_target {
            Some(source) => write!(f, "{} <split-{} of {}>", self.root.name, self.id, source.id),
            None => write!(f, "{}", self.root.name),
        }
    }
}
