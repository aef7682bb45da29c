//! General reflective field access
//!
//! Every call re-validates the field's accessibility, the receiver and the
//! value. Slower than a linked handle but needs nothing prepared up front.

use std::sync::Arc;

use super::{HostClass, HostField, HostValue};

/// Failure of a reflective access
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReflectError {
    /// The field may not be accessed this way
    #[error("Illegal access: {0}")]
    IllegalAccess(String),

    /// Receiver or value does not fit the field
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),
}

impl HostField {
    /// Read the field.
    ///
    /// Static fields ignore the receiver. Instance fields require an instance
    /// of the declaring class.
    pub fn get(&self, receiver: &HostValue) -> Result<HostValue, ReflectError> {
        let class = self.check_access()?;
        if self.is_static() {
            return Ok(class.read_static(self.slot()));
        }
        let obj = self.check_receiver(&class, receiver)?;
        Ok(obj.read_slot(self.slot()))
    }

    /// Write the field.
    ///
    /// Final fields are rejected with [`ReflectError::IllegalAccess`]; values
    /// that are not assignable to the declared type with
    /// [`ReflectError::IllegalArgument`]. A rejected write leaves the field
    /// unchanged.
    pub fn set(&self, receiver: &HostValue, value: HostValue) -> Result<(), ReflectError> {
        let class = self.check_access()?;
        if self.is_final() {
            return Err(ReflectError::IllegalAccess(format!(
                "cannot set final field {}",
                self
            )));
        }

        let value = self.field_type().coerce(value).map_err(|rejected| {
            ReflectError::IllegalArgument(format!(
                "cannot set {} field {} to {}",
                self.field_type(),
                self,
                rejected
            ))
        })?;

        if self.is_static() {
            class.write_static(self.slot(), value);
        } else {
            let obj = self.check_receiver(&class, receiver)?;
            obj.write_slot(self.slot(), value);
        }
        Ok(())
    }

    fn check_access(&self) -> Result<Arc<HostClass>, ReflectError> {
        let class = self.declaring_class().ok_or_else(|| {
            ReflectError::IllegalAccess(format!("declaring class of {} is unloaded", self))
        })?;
        if !self.is_public() || !class.is_public() {
            return Err(ReflectError::IllegalAccess(format!(
                "cannot access non-public member {}",
                self
            )));
        }
        Ok(class)
    }

    fn check_receiver<'a>(
        &self,
        class: &HostClass,
        receiver: &'a HostValue,
    ) -> Result<&'a super::HostObject, ReflectError> {
        match receiver.as_object() {
            Some(obj) if obj.is_instance_of(class) => Ok(obj),
            _ => Err(ReflectError::IllegalArgument(format!(
                "cannot access field {} on {}",
                self, receiver
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{FieldSpec, HostType};
    use super::*;

    fn point_class() -> Arc<HostClass> {
        HostClass::builder("Point")
            .field(FieldSpec::new("x", HostType::Int).public())
            .field(FieldSpec::new("ORIGIN", HostType::Long).public().as_static().as_final())
            .field(FieldSpec::new("secret", HostType::Int))
            .build()
    }

    #[test]
    fn test_instance_get_set() {
        let class = point_class();
        let obj = HostValue::Object(class.instantiate());
        let x = class.field("x").unwrap();

        x.set(&obj, HostValue::Int(4)).unwrap();
        assert_eq!(x.get(&obj).unwrap(), HostValue::Int(4));
    }

    #[test]
    fn test_final_rejected() {
        let class = point_class();
        let origin = class.field("ORIGIN").unwrap();
        let err = origin.set(&HostValue::Null, HostValue::Long(1)).unwrap_err();
        assert!(matches!(err, ReflectError::IllegalAccess(_)));
        assert_eq!(origin.get(&HostValue::Null).unwrap(), HostValue::Long(0));
    }

    #[test]
    fn test_non_public_rejected() {
        let class = point_class();
        let obj = HostValue::Object(class.instantiate());
        let secret = class.field("secret").unwrap();
        assert!(matches!(secret.get(&obj), Err(ReflectError::IllegalAccess(_))));
    }

    #[test]
    fn test_wrong_receiver() {
        let class = point_class();
        let other = HostClass::builder("Other").build();
        let x = class.field("x").unwrap();

        let foreign = HostValue::Object(other.instantiate());
        assert!(matches!(x.get(&foreign), Err(ReflectError::IllegalArgument(_))));
        assert!(matches!(x.get(&HostValue::Null), Err(ReflectError::IllegalArgument(_))));
    }

    #[test]
    fn test_incompatible_value_leaves_field() {
        let class = point_class();
        let obj = HostValue::Object(class.instantiate());
        let x = class.field("x").unwrap();
        x.set(&obj, HostValue::Int(9)).unwrap();

        let err = x.set(&obj, HostValue::Long(10)).unwrap_err();
        assert!(matches!(err, ReflectError::IllegalArgument(_)));
        assert_eq!(x.get(&obj).unwrap(), HostValue::Int(9));
    }
}
