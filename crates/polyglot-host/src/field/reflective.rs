//! Reflective backend: always available, pays reflective dispatch per call.

use std::sync::Arc;

use crate::directives;
use crate::error::{internal_fault, InteropError, InteropResult};
use crate::host::{HostField, HostValue, ReflectError};

#[derive(Debug)]
pub(super) struct ReflectiveBackend {
    field: Arc<HostField>,
}

impl ReflectiveBackend {
    pub(super) fn new(field: Arc<HostField>) -> Self {
        Self { field }
    }

    pub(super) fn field(&self) -> &Arc<HostField> {
        &self.field
    }

    pub(super) fn get(&self, receiver: &HostValue) -> HostValue {
        match self.field.get(receiver) {
            Ok(value) => value,
            Err(err) => {
                directives::transfer_to_interpreter();
                internal_fault("reflective get", err)
            }
        }
    }

    pub(super) fn set(&self, receiver: &HostValue, value: HostValue) -> InteropResult<()> {
        match self.field.set(receiver, value.clone()) {
            Ok(()) => Ok(()),
            Err(ReflectError::IllegalArgument(_)) => Err(InteropError::unsupported_type(vec![value])),
            Err(err @ ReflectError::IllegalAccess(_)) => {
                directives::transfer_to_interpreter();
                if self.field.is_final() {
                    Err(InteropError::unknown_identifier(self.field.name()))
                } else {
                    internal_fault("reflective set", err)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FieldSpec, HostClass, HostType};

    fn class() -> Arc<HostClass> {
        HostClass::builder("Config")
            .field(FieldSpec::new("level", HostType::Int).public())
            .field(FieldSpec::new("NAME", HostType::String).public().as_final().initial("cfg"))
            .build()
    }

    #[test]
    fn test_get_set() {
        let class = class();
        let backend = ReflectiveBackend::new(Arc::clone(class.field("level").unwrap()));
        let obj = HostValue::Object(class.instantiate());

        backend.set(&obj, HostValue::Int(3)).unwrap();
        assert_eq!(backend.get(&obj), HostValue::Int(3));
    }

    #[test]
    fn test_type_mismatch_carries_value() {
        let class = class();
        let backend = ReflectiveBackend::new(Arc::clone(class.field("level").unwrap()));
        let obj = HostValue::Object(class.instantiate());

        let err = backend.set(&obj, HostValue::from("high")).unwrap_err();
        assert_eq!(err, InteropError::unsupported_type(vec![HostValue::from("high")]));
    }

    #[test]
    fn test_final_is_unknown_identifier() {
        let class = class();
        let backend = ReflectiveBackend::new(Arc::clone(class.field("NAME").unwrap()));
        let obj = HostValue::Object(class.instantiate());

        let err = backend.set(&obj, HostValue::from("x")).unwrap_err();
        assert_eq!(err, InteropError::unknown_identifier("NAME"));
        assert_eq!(backend.get(&obj), HostValue::from("cfg"));
    }

    #[test]
    #[should_panic(expected = "internal host access fault")]
    fn test_wrong_receiver_on_get_is_fatal() {
        let class = class();
        let backend = ReflectiveBackend::new(Arc::clone(class.field("level").unwrap()));
        backend.get(&HostValue::Int(1));
    }
}
