//! Polyglot Host Interop
//!
//! This crate lets guest-language code read and write fields of host objects:
//! - **Host model**: classes, fields, objects and values (`host` module)
//! - **Field access**: [`FieldDescriptor`] with a reflective and a linked backend (`field` module)
//! - **Members**: name-based discovery of accessible fields (`members` module)
//! - **Options**: process-wide deployment mode (`options` module)
//!
//! # Example
//!
//! ```rust,ignore
//! use polyglot_host::host::{FieldSpec, HostClass, HostType, HostValue};
//! use polyglot_host::members::HostClassMembers;
//!
//! let point = HostClass::builder("Point")
//!     .field(FieldSpec::new("x", HostType::Int).public())
//!     .build();
//! let members = HostClassMembers::discover(&point);
//!
//! let obj = HostValue::Object(point.instantiate());
//! members.write(&obj, "x", HostValue::Int(3))?;
//! assert_eq!(members.read(&obj, "x")?, HostValue::Int(3));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Compiler directive hooks (deoptimization and invalidation points)
pub mod directives;

/// Interop error taxonomy and configuration errors
pub mod error;

/// Host field descriptors and their access backends
pub mod field;

/// Host object model: types, classes, fields, objects, values
pub mod host;

/// Name-based member discovery over host classes
pub mod members;

/// Process-wide runtime options
pub mod options;

pub use error::{ConfigError, InteropError, InteropResult};
pub use field::{BackendKind, FieldDescriptor};
pub use host::{GenericType, HostClass, HostField, HostObject, HostType, HostValue, Modifiers};
pub use members::{HostClassMembers, MemberCache};
pub use options::{DeploymentMode, RuntimeOptions};
