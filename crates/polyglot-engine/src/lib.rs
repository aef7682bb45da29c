//! Polyglot Engine
//!
//! Call targets and the node trees they execute, plus the diagnostic queries
//! used by tests and tooling to inspect splitting:
//! - **Targets**: [`CallTarget`] and [`RootNode`] (`target` module)
//! - **Nodes**: the node tree, direct call nodes, visitors (`node` module)
//! - **Runtime**: target registry, frames, interpreter (`runtime` module)
//! - **Introspection**: duplicate targets and call sites (`introspection` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use polyglot_engine::{find_calls_to, Node, RootNode, Runtime};
//!
//! let runtime = Runtime::new();
//! let inc = runtime.create_call_target(RootNode::new(
//!     "inc",
//!     1,
//!     Node::add(Node::Argument(0), Node::Literal(1)),
//! ));
//! let main = runtime.create_call_target(RootNode::new(
//!     "main",
//!     0,
//!     Node::call(&inc, vec![Node::Literal(41)]),
//! ));
//!
//! assert_eq!(runtime.call(&main, &[])?, 42);
//! assert_eq!(find_calls_to(main.root(), &inc).len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Engine errors
pub mod error;

/// Call-graph queries over live targets and node trees
pub mod introspection;

/// Node trees and direct call nodes
pub mod node;

/// Engine options
pub mod options;

/// Target registry, frame tracking and the interpreter
pub mod runtime;

/// Call targets and root nodes
pub mod target;

pub use error::{EngineError, EngineResult};
pub use introspection::{find_calls_to, find_calls_to_in_caller, find_duplicate_call_targets};
pub use node::{BuiltinFn, BuiltinNode, DirectCallNode, Node, NodeVisitor};
pub use options::EngineOptions;
pub use runtime::{FrameInstance, Runtime};
pub use target::{CallTarget, RootNode};
