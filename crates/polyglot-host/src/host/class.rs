//! Classes, fields and objects

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::{GenericType, HostType, HostValue, Modifiers};

/// Global counter for generating unique class IDs
static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);

/// Global counter for generating unique object IDs
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Host class definition
///
/// The field list is fixed at build time. Static field values live in the
/// class; instance field values live in each [`HostObject`].
#[derive(Debug)]
pub struct HostClass {
    id: u64,
    name: String,
    modifiers: Modifiers,
    fields: Vec<Arc<HostField>>,
    /// Initial values for instance slots, by slot index
    instance_defaults: Vec<HostValue>,
    /// Static slot storage
    statics: RwLock<Vec<HostValue>>,
}

impl HostClass {
    /// Start building a public class
    pub fn builder(name: &str) -> ClassBuilder {
        ClassBuilder {
            name: name.to_string(),
            modifiers: Modifiers::PUBLIC,
            fields: Vec::new(),
        }
    }

    /// Unique class ID
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the class is public
    pub fn is_public(&self) -> bool {
        self.modifiers.is_public
    }

    /// All declared fields in declaration order
    pub fn fields(&self) -> &[Arc<HostField>] {
        &self.fields
    }

    /// First declared field with this name
    pub fn field(&self, name: &str) -> Option<&Arc<HostField>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of instance (non-static) fields
    pub fn instance_field_count(&self) -> usize {
        self.instance_defaults.len()
    }

    /// Create a new instance with every instance field at its initial value
    pub fn instantiate(self: &Arc<Self>) -> HostObject {
        HostObject::new(self)
    }

    pub(crate) fn read_static(&self, slot: usize) -> HostValue {
        self.statics.read()[slot].clone()
    }

    pub(crate) fn write_static(&self, slot: usize, value: HostValue) {
        self.statics.write()[slot] = value;
    }
}

/// Builder for [`HostClass`]
pub struct ClassBuilder {
    name: String,
    modifiers: Modifiers,
    fields: Vec<FieldSpec>,
}

impl ClassBuilder {
    /// Make the class non-public
    pub fn non_public(mut self) -> Self {
        self.modifiers.is_public = false;
        self
    }

    /// Declare a field
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Finish the class
    pub fn build(self) -> Arc<HostClass> {
        let id = NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed);
        let ClassBuilder {
            name,
            modifiers,
            fields: specs,
        } = self;

        Arc::new_cyclic(|weak: &Weak<HostClass>| {
            let mut statics = Vec::new();
            let mut instance_defaults = Vec::new();
            let mut fields = Vec::with_capacity(specs.len());

            for spec in specs {
                let initial = spec.initial_value();
                let slot = if spec.modifiers.is_static {
                    statics.push(initial);
                    statics.len() - 1
                } else {
                    instance_defaults.push(initial);
                    instance_defaults.len() - 1
                };
                let ty = spec.ty.bind_class(&name, id);
                let generic_type = match spec.generic {
                    Some(generic) => generic.bind_class(&name, id),
                    None => ty.clone().into(),
                };
                fields.push(Arc::new(HostField {
                    name: spec.name,
                    ty,
                    generic_type,
                    modifiers: spec.modifiers,
                    slot,
                    declaring_class: weak.clone(),
                    declaring_class_name: name.clone(),
                }));
            }

            HostClass {
                id,
                name,
                modifiers,
                fields,
                instance_defaults,
                statics: RwLock::new(statics),
            }
        })
    }
}

/// Declaration of one field for [`ClassBuilder::field`]
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    ty: HostType,
    generic: Option<GenericType>,
    modifiers: Modifiers,
    initial: Option<HostValue>,
}

impl FieldSpec {
    /// A non-public instance field
    pub fn new(name: &str, ty: HostType) -> Self {
        Self {
            name: name.to_string(),
            ty,
            generic: None,
            modifiers: Modifiers::default(),
            initial: None,
        }
    }

    /// Make the field public
    pub fn public(mut self) -> Self {
        self.modifiers.is_public = true;
        self
    }

    /// Make the field class-level
    pub fn as_static(mut self) -> Self {
        self.modifiers.is_static = true;
        self
    }

    /// Make the field final
    pub fn as_final(mut self) -> Self {
        self.modifiers.is_final = true;
        self
    }

    /// Declared parameterized type (its raw part should match the field type)
    pub fn generic(mut self, generic: GenericType) -> Self {
        debug_assert_eq!(generic.raw, self.ty);
        self.generic = Some(generic);
        self
    }

    /// Initial value; must be assignable to the field type
    pub fn initial(mut self, value: impl Into<HostValue>) -> Self {
        self.initial = Some(value.into());
        self
    }

    fn initial_value(&self) -> HostValue {
        match &self.initial {
            Some(value) => {
                let coerced = self.ty.coerce(value.clone());
                debug_assert!(coerced.is_ok(), "initial value {} is not a {}", value, self.ty);
                coerced.unwrap_or_else(|_| self.ty.default_value())
            }
            None => self.ty.default_value(),
        }
    }
}

/// A declared field of a host class
#[derive(Debug)]
pub struct HostField {
    name: String,
    ty: HostType,
    generic_type: GenericType,
    modifiers: Modifiers,
    /// Index into the static storage of the class or the slots of an instance
    slot: usize,
    declaring_class: Weak<HostClass>,
    declaring_class_name: String,
}

impl HostField {
    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared (erased) type
    pub fn field_type(&self) -> &HostType {
        &self.ty
    }

    /// Declared parameterized type
    pub fn generic_type(&self) -> &GenericType {
        &self.generic_type
    }

    /// Whether the field is class-level
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static
    }

    /// Whether the field is final
    pub fn is_final(&self) -> bool {
        self.modifiers.is_final
    }

    /// Whether the field itself is public
    pub fn is_public(&self) -> bool {
        self.modifiers.is_public
    }

    /// The declaring class, if it is still alive
    pub fn declaring_class(&self) -> Option<Arc<HostClass>> {
        self.declaring_class.upgrade()
    }

    /// Name of the declaring class
    pub fn declaring_class_name(&self) -> &str {
        &self.declaring_class_name
    }

    pub(crate) fn slot(&self) -> usize {
        self.slot
    }
}

impl fmt::Display for HostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.modifiers.to_string();
        if !modifiers.is_empty() {
            write!(f, "{} ", modifiers)?;
        }
        write!(f, "{} {}.{}", self.ty, self.declaring_class_name, self.name)
    }
}

struct ObjectData {
    id: u64,
    class: Arc<HostClass>,
    slots: RwLock<Vec<HostValue>>,
}

/// Host object instance (shared handle, compared by identity)
#[derive(Clone)]
pub struct HostObject(Arc<ObjectData>);

impl HostObject {
    /// Create a new instance of `class`
    pub fn new(class: &Arc<HostClass>) -> Self {
        HostObject(Arc::new(ObjectData {
            id: NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed),
            class: Arc::clone(class),
            slots: RwLock::new(class.instance_defaults.clone()),
        }))
    }

    /// Unique object ID
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Class of this object
    pub fn class(&self) -> &Arc<HostClass> {
        &self.0.class
    }

    /// Whether this object is an instance of `class`
    pub fn is_instance_of(&self, class: &HostClass) -> bool {
        self.0.class.id == class.id
    }

    pub(crate) fn read_slot(&self, slot: usize) -> HostValue {
        self.0.slots.read()[slot].clone()
    }

    pub(crate) fn write_slot(&self, slot: usize, value: HostValue) {
        self.0.slots.write()[slot] = value;
    }
}

impl PartialEq for HostObject {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostObject")
            .field("id", &self.0.id)
            .field("class", &self.0.class.name)
            .finish()
    }
}

impl fmt::Display for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.0.class.name, self.0.id)
    }
}
