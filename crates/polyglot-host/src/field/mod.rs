//! Host Field Descriptors
//!
//! A [`FieldDescriptor`] is resolved once for an accessible host field and
//! then reads and writes that field on any number of receivers. Two backends
//! implement the access, chosen once from the deployment mode:
//!
//! | Mode | Backend | Access path |
//! |------|---------|-------------|
//! | `aot` | [`BackendKind::Reflective`] | reflective primitives on every call |
//! | `jit` | [`BackendKind::Linked`] | direct-invocation handles, linked on first use |
//!
//! The choice is invisible to callers apart from performance. Writes map
//! platform failures onto [`InteropError`]:
//!
//! - value not assignable to the declared type: `UnsupportedType`
//! - field is final: `UnknownIdentifier`, exactly as if no writable member
//!   with that name existed
//!
//! Anything else (for instance an access failure on a field that should have
//! been accessible) is an internal fault and panics.

mod linked;
mod reflective;

use std::fmt;
use std::sync::Arc;

use crate::error::InteropResult;
use crate::host::{GenericType, HostField, HostType, HostValue};
use crate::options::{self, DeploymentMode};

use linked::LinkedBackend;
use reflective::ReflectiveBackend;

/// Which access strategy a descriptor uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Reflective primitives
    Reflective,
    /// Lazily linked direct-invocation handles
    Linked,
}

#[derive(Debug)]
enum FieldBackend {
    Reflective(ReflectiveBackend),
    Linked(LinkedBackend),
}

/// Get/set access to one accessible host field
///
/// Type information is fixed at construction. The only mutable state is the
/// linked backend's handle cells, each written at most once.
#[derive(Debug)]
pub struct FieldDescriptor {
    ty: HostType,
    generic_type: GenericType,
    backend: FieldBackend,
}

impl FieldDescriptor {
    /// Create a descriptor using the process-wide deployment mode.
    ///
    /// The field must be accessible (see [`FieldDescriptor::is_accessible`]);
    /// the member discovery layer filters candidates before calling this.
    pub fn unreflect(field: Arc<HostField>) -> Self {
        Self::unreflect_with(field, options::deployment_mode())
    }

    /// Create a descriptor for an explicit deployment mode
    pub fn unreflect_with(field: Arc<HostField>, mode: DeploymentMode) -> Self {
        debug_assert!(Self::is_accessible(&field), "inaccessible field: {}", field);

        let ty = field.field_type().clone();
        let generic_type = field.generic_type().clone();
        let backend = if mode.allows_dynamic_code() {
            FieldBackend::Linked(LinkedBackend::new(field))
        } else {
            FieldBackend::Reflective(ReflectiveBackend::new(field))
        };

        let descriptor = FieldDescriptor {
            ty,
            generic_type,
            backend,
        };
        tracing::debug!(
            field = %descriptor.field(),
            backend = ?descriptor.backend_kind(),
            mode = %mode,
            "unreflected host field"
        );
        descriptor
    }

    /// Public field declared by a public class
    pub fn is_accessible(field: &HostField) -> bool {
        field.is_public()
            && field
                .declaring_class()
                .is_some_and(|class| class.is_public())
    }

    /// Declared (erased) type
    pub fn field_type(&self) -> &HostType {
        &self.ty
    }

    /// Declared parameterized type
    pub fn generic_type(&self) -> &GenericType {
        &self.generic_type
    }

    /// Field name
    pub fn name(&self) -> &str {
        self.field().name()
    }

    /// The described field
    pub fn field(&self) -> &Arc<HostField> {
        match &self.backend {
            FieldBackend::Reflective(b) => b.field(),
            FieldBackend::Linked(b) => b.field(),
        }
    }

    /// Backend selected at construction
    pub fn backend_kind(&self) -> BackendKind {
        match &self.backend {
            FieldBackend::Reflective(_) => BackendKind::Reflective,
            FieldBackend::Linked(_) => BackendKind::Linked,
        }
    }

    /// Read the field. Static fields ignore the receiver.
    #[inline]
    pub fn get(&self, receiver: &HostValue) -> HostValue {
        match &self.backend {
            FieldBackend::Reflective(b) => b.get(receiver),
            FieldBackend::Linked(b) => b.get(receiver),
        }
    }

    /// Write the field. A failed write leaves the old value in place.
    #[inline]
    pub fn set(&self, receiver: &HostValue, value: HostValue) -> InteropResult<()> {
        match &self.backend {
            FieldBackend::Reflective(b) => b.set(receiver, value),
            FieldBackend::Linked(b) => b.set(receiver, value),
        }
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field[{}]", self.field())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FieldSpec, HostClass};

    fn holder() -> Arc<HostClass> {
        HostClass::builder("Holder")
            .field(
                FieldSpec::new("items", HostType::class("List"))
                    .public()
                    .generic(GenericType::new(
                        HostType::class("List"),
                        vec![HostType::String.into()],
                    )),
            )
            .field(FieldSpec::new("hidden", HostType::Int))
            .build()
    }

    #[test]
    fn test_backend_follows_mode() {
        let class = holder();
        let field = Arc::clone(class.field("items").unwrap());

        let aot = FieldDescriptor::unreflect_with(Arc::clone(&field), DeploymentMode::Aot);
        let jit = FieldDescriptor::unreflect_with(field, DeploymentMode::Jit);
        assert_eq!(aot.backend_kind(), BackendKind::Reflective);
        assert_eq!(jit.backend_kind(), BackendKind::Linked);
    }

    #[test]
    fn test_type_information() {
        let class = holder();
        let desc = FieldDescriptor::unreflect_with(
            Arc::clone(class.field("items").unwrap()),
            DeploymentMode::Jit,
        );
        assert_eq!(desc.field_type(), &HostType::class("List"));
        assert_eq!(desc.generic_type().to_string(), "List<String>");
        assert_eq!(desc.name(), "items");
        assert_eq!(desc.to_string(), "Field[public List Holder.items]");
    }

    #[test]
    fn test_accessibility() {
        let class = holder();
        assert!(FieldDescriptor::is_accessible(class.field("items").unwrap()));
        assert!(!FieldDescriptor::is_accessible(class.field("hidden").unwrap()));

        let private_class = HostClass::builder("Private")
            .non_public()
            .field(FieldSpec::new("x", HostType::Int).public())
            .build();
        assert!(!FieldDescriptor::is_accessible(private_class.field("x").unwrap()));
    }
}
