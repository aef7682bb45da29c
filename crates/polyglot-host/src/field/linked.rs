//! Linked backend: direct-invocation handles linked on first use.
//!
//! Getter and setter are linked independently (unlinked → linked). Linking
//! invalidates compiled code that assumed the unlinked state; afterwards the
//! cached handle is used directly. The cells race-and-publish: two threads
//! may both build a handle, one wins, the other is dropped unused.

use std::fmt;
use std::sync::Arc;

use once_cell::race::OnceBox;

use crate::directives;
use crate::error::{internal_fault, InteropError, InteropResult};
use crate::host::{GetterHandle, HostClass, HostField, HostValue, Lookup, LookupError, SetterHandle};

/// Outcome of linking the setter
enum SetterLink {
    Linked(SetterHandle),
    /// The field cannot be written (final, or gone); never relinked
    Unwritable,
}

pub(super) struct LinkedBackend {
    field: Arc<HostField>,
    getter: OnceBox<GetterHandle>,
    setter: OnceBox<SetterLink>,
}

impl LinkedBackend {
    pub(super) fn new(field: Arc<HostField>) -> Self {
        Self {
            field,
            getter: OnceBox::new(),
            setter: OnceBox::new(),
        }
    }

    pub(super) fn field(&self) -> &Arc<HostField> {
        &self.field
    }

    #[inline]
    pub(super) fn get(&self, receiver: &HostValue) -> HostValue {
        let handle = match self.getter.get() {
            Some(handle) => handle,
            None => self.link_getter(),
        };
        match handle.invoke(receiver) {
            Ok(value) => value,
            Err(err) => internal_fault("linked get", err),
        }
    }

    #[inline]
    pub(super) fn set(&self, receiver: &HostValue, value: HostValue) -> InteropResult<()> {
        let link = match self.setter.get() {
            Some(link) => link,
            None => self.link_setter(),
        };
        match link {
            SetterLink::Linked(handle) => handle.invoke(receiver, value).map_err(|err| {
                InteropError::unsupported_type(err.into_rejected_value().map_or_else(Vec::new, |v| vec![v]))
            }),
            SetterLink::Unwritable => Err(InteropError::unknown_identifier(self.field.name())),
        }
    }

    #[cold]
    fn link_getter(&self) -> &GetterHandle {
        directives::transfer_to_interpreter_and_invalidate();
        self.getter.get_or_init(|| Box::new(self.make_getter()))
    }

    #[cold]
    fn link_setter(&self) -> &SetterLink {
        directives::transfer_to_interpreter_and_invalidate();
        self.setter.get_or_init(|| Box::new(self.make_setter()))
    }

    fn declaring_class(&self) -> Arc<HostClass> {
        self.field
            .declaring_class()
            .unwrap_or_else(|| internal_fault("linking", format!("class of {} is unloaded", self.field)))
    }

    fn make_getter(&self) -> GetterHandle {
        let class = self.declaring_class();
        let lookup = Lookup::public();
        let (name, ty) = (self.field.name(), self.field.field_type());
        let handle = if self.field.is_static() {
            lookup.find_static_getter(&class, name, ty)
        } else {
            lookup.find_getter(&class, name, ty)
        };
        match handle {
            Ok(handle) => {
                tracing::debug!(field = %handle.field(), "linked getter");
                handle
            }
            Err(err) => internal_fault("linking getter", err),
        }
    }

    fn make_setter(&self) -> SetterLink {
        let class = self.declaring_class();
        let lookup = Lookup::public();
        let (name, ty) = (self.field.name(), self.field.field_type());
        let handle = if self.field.is_static() {
            lookup.find_static_setter(&class, name, ty)
        } else {
            lookup.find_setter(&class, name, ty)
        };
        match handle {
            Ok(handle) => {
                tracing::debug!(field = %handle.field(), "linked setter");
                SetterLink::Linked(handle)
            }
            Err(LookupError::NoSuchField(_)) => SetterLink::Unwritable,
            Err(LookupError::IllegalAccess(_)) if self.field.is_final() => {
                tracing::debug!(field = %self.field, "setter unavailable for final field");
                SetterLink::Unwritable
            }
            Err(err) => internal_fault("linking setter", err),
        }
    }

    #[cfg(test)]
    fn is_getter_linked(&self) -> bool {
        self.getter.get().is_some()
    }

    #[cfg(test)]
    fn is_setter_linked(&self) -> bool {
        self.setter.get().is_some()
    }
}

impl fmt::Debug for LinkedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let setter = match self.setter.get() {
            None => "unlinked",
            Some(SetterLink::Linked(_)) => "linked",
            Some(SetterLink::Unwritable) => "unwritable",
        };
        f.debug_struct("LinkedBackend")
            .field("field", &self.field.to_string())
            .field("getter", &if self.getter.get().is_some() { "linked" } else { "unlinked" })
            .field("setter", &setter)
            .finish()
    }
}
