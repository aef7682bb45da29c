//! Host Object Model
//!
//! The host platform's classes, fields and objects as seen by guest code,
//! plus the two ways of reaching a field:
//!
//! - `reflect`: general reflective access. Always available; every call
//!   re-checks modifiers and the receiver.
//! - `lookup`: direct-invocation handles. Resolved once per field and bound
//!   to its storage slot; cheap to invoke, costlier to construct.

mod class;
mod lookup;
mod reflect;
mod types;
mod value;

pub use class::{ClassBuilder, FieldSpec, HostClass, HostField, HostObject};
pub use lookup::{GetterHandle, InvokeError, Lookup, LookupError, SetterHandle};
pub use reflect::ReflectError;
pub use types::{ClassRef, GenericType, HostType, Modifiers};
pub use value::HostValue;
