//! Direct-invocation handles
//!
//! A handle is resolved once against (declaring class, name, type) and bound
//! to the field's storage slot. Invoking it skips the modifier and name checks
//! reflective access performs on every call. Static handles drop the receiver
//! argument so both shapes share one calling convention.

use std::fmt;
use std::sync::Arc;

use super::{HostClass, HostField, HostType, HostValue};

type GetFn = dyn Fn(&HostValue) -> Result<HostValue, InvokeError> + Send + Sync;
type SetFn = dyn Fn(&HostValue, HostValue) -> Result<(), InvokeError> + Send + Sync;

/// Failure to resolve a handle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No field with this name and type
    #[error("No such field: {0}")]
    NoSuchField(String),

    /// Field exists but this lookup may not bind it
    #[error("Illegal access: {0}")]
    IllegalAccess(String),
}

/// Failure of an already-linked handle
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvokeError {
    /// Instance handle invoked on something that is not an instance of the
    /// declaring class
    #[error("Receiver {receiver} is not an instance of {expected}")]
    WrongReceiver {
        /// Declaring class name
        expected: String,
        /// Rendered receiver
        receiver: String,
        /// Value a setter was given, handed back
        rejected: Option<HostValue>,
    },

    /// Setter invoked with a value not assignable to the field type
    #[error("Value {0} is not assignable to {1}")]
    WrongType(HostValue, HostType),
}

impl InvokeError {
    /// The value a setter handed back, if any
    pub fn into_rejected_value(self) -> Option<HostValue> {
        match self {
            InvokeError::WrongReceiver { rejected, .. } => rejected,
            InvokeError::WrongType(value, _) => Some(value),
        }
    }
}

/// Bound field getter
pub struct GetterHandle {
    field: Arc<HostField>,
    invoke: Box<GetFn>,
}

impl GetterHandle {
    /// Read the bound field through `receiver`
    #[inline]
    pub fn invoke(&self, receiver: &HostValue) -> Result<HostValue, InvokeError> {
        (self.invoke)(receiver)
    }

    /// Field this handle is bound to
    pub fn field(&self) -> &Arc<HostField> {
        &self.field
    }
}

impl fmt::Debug for GetterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GetterHandle({})", self.field)
    }
}

/// Bound field setter
pub struct SetterHandle {
    field: Arc<HostField>,
    invoke: Box<SetFn>,
}

impl SetterHandle {
    /// Write `value` to the bound field through `receiver`
    #[inline]
    pub fn invoke(&self, receiver: &HostValue, value: HostValue) -> Result<(), InvokeError> {
        (self.invoke)(receiver, value)
    }

    /// Field this handle is bound to
    pub fn field(&self) -> &Arc<HostField> {
        &self.field
    }
}

impl fmt::Debug for SetterHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SetterHandle({})", self.field)
    }
}

/// Handle factory restricted to public members of public classes
#[derive(Debug, Clone, Copy, Default)]
pub struct Lookup {
    _private: (),
}

impl Lookup {
    /// The public lookup
    pub fn public() -> Self {
        Lookup { _private: () }
    }

    /// Getter for an instance field
    pub fn find_getter(
        &self,
        class: &Arc<HostClass>,
        name: &str,
        ty: &HostType,
    ) -> Result<GetterHandle, LookupError> {
        let field = self.resolve(class, name, ty, false)?;
        let slot = field.slot();
        let class_id = class.id();
        let expected = class.name().to_string();

        Ok(GetterHandle {
            field,
            invoke: Box::new(move |receiver: &HostValue| match receiver.as_object() {
                Some(obj) if obj.class().id() == class_id => Ok(obj.read_slot(slot)),
                _ => Err(InvokeError::WrongReceiver {
                    expected: expected.clone(),
                    receiver: receiver.to_string(),
                    rejected: None,
                }),
            }),
        })
    }

    /// Getter for a static field; the receiver is ignored
    pub fn find_static_getter(
        &self,
        class: &Arc<HostClass>,
        name: &str,
        ty: &HostType,
    ) -> Result<GetterHandle, LookupError> {
        let field = self.resolve(class, name, ty, true)?;
        let slot = field.slot();
        let class = Arc::clone(class);

        Ok(GetterHandle {
            field,
            invoke: Box::new(move |_receiver: &HostValue| -> Result<HostValue, InvokeError> {
                Ok(class.read_static(slot))
            }),
        })
    }

    /// Setter for a non-final instance field
    pub fn find_setter(
        &self,
        class: &Arc<HostClass>,
        name: &str,
        ty: &HostType,
    ) -> Result<SetterHandle, LookupError> {
        let field = self.resolve(class, name, ty, false)?;
        Self::check_writable(&field)?;
        let slot = field.slot();
        let class_id = class.id();
        let expected = class.name().to_string();
        let ty = ty.clone();

        Ok(SetterHandle {
            field,
            invoke: Box::new(move |receiver: &HostValue, value: HostValue| -> Result<(), InvokeError> {
                let obj = match receiver.as_object() {
                    Some(obj) if obj.class().id() == class_id => obj,
                    _ => {
                        return Err(InvokeError::WrongReceiver {
                            expected: expected.clone(),
                            receiver: receiver.to_string(),
                            rejected: Some(value),
                        })
                    }
                };
                let value = ty
                    .coerce(value)
                    .map_err(|rejected| InvokeError::WrongType(rejected, ty.clone()))?;
                obj.write_slot(slot, value);
                Ok(())
            }),
        })
    }

    /// Setter for a non-final static field; the receiver is ignored
    pub fn find_static_setter(
        &self,
        class: &Arc<HostClass>,
        name: &str,
        ty: &HostType,
    ) -> Result<SetterHandle, LookupError> {
        let field = self.resolve(class, name, ty, true)?;
        Self::check_writable(&field)?;
        let slot = field.slot();
        let class = Arc::clone(class);
        let ty = ty.clone();

        Ok(SetterHandle {
            field,
            invoke: Box::new(move |_receiver: &HostValue, value: HostValue| -> Result<(), InvokeError> {
                let value = ty
                    .coerce(value)
                    .map_err(|rejected| InvokeError::WrongType(rejected, ty.clone()))?;
                class.write_static(slot, value);
                Ok(())
            }),
        })
    }

    fn resolve(
        &self,
        class: &Arc<HostClass>,
        name: &str,
        ty: &HostType,
        want_static: bool,
    ) -> Result<Arc<HostField>, LookupError> {
        let field = class
            .fields()
            .iter()
            .find(|f| f.name() == name && f.field_type() == ty)
            .ok_or_else(|| LookupError::NoSuchField(format!("{} {}.{}", ty, class.name(), name)))?;

        if !class.is_public() || !field.is_public() {
            return Err(LookupError::IllegalAccess(format!(
                "member is not public: {}",
                field
            )));
        }
        if field.is_static() != want_static {
            let expected = if want_static { "static" } else { "instance" };
            return Err(LookupError::IllegalAccess(format!(
                "expected {} field: {}",
                expected, field
            )));
        }
        Ok(Arc::clone(field))
    }

    fn check_writable(field: &HostField) -> Result<(), LookupError> {
        if field.is_final() {
            return Err(LookupError::IllegalAccess(format!(
                "field is final: {}",
                field
            )));
        }
        Ok(())
    }
}
