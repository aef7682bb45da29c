//! Declared types and modifiers

use std::fmt;
use std::sync::Arc;

use super::{HostClass, HostValue};

/// Declared type of a host field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostType {
    /// `boolean`
    Boolean,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// 64-bit float
    Double,
    /// String reference
    String,
    /// Reference to an instance of a class
    Class(ClassRef),
    /// Top reference type, accepts any value
    Any,
}

impl HostType {
    /// Reference to a class known only by name.
    ///
    /// Field types naming the class being built are bound to it by
    /// [`ClassBuilder::build`](super::ClassBuilder::build); any other name
    /// stays unbound and matches instances by class name.
    pub fn class(name: &str) -> Self {
        HostType::Class(ClassRef {
            name: Arc::from(name),
            id: None,
        })
    }

    /// Reference to exactly `class`
    pub fn class_of(class: &HostClass) -> Self {
        HostType::Class(ClassRef {
            name: Arc::from(class.name()),
            id: Some(class.id()),
        })
    }

    /// Bind an unbound reference named `name` to class `id`
    pub(crate) fn bind_class(self, name: &str, id: u64) -> Self {
        match self {
            HostType::Class(ClassRef { name: n, id: None }) if &*n == name => {
                HostType::Class(ClassRef { name: n, id: Some(id) })
            }
            other => other,
        }
    }

    /// Value a slot of this type holds before its first assignment
    pub fn default_value(&self) -> HostValue {
        match self {
            HostType::Boolean => HostValue::Bool(false),
            HostType::Int => HostValue::Int(0),
            HostType::Long => HostValue::Long(0),
            HostType::Double => HostValue::Double(0.0),
            HostType::String | HostType::Class(_) | HostType::Any => HostValue::Null,
        }
    }

    /// Assignment conversion of `value` into this type.
    ///
    /// Allows identity, widening primitive conversion and null into
    /// reference types. Narrowing is rejected. On rejection the value is
    /// handed back unchanged.
    pub fn coerce(&self, value: HostValue) -> Result<HostValue, HostValue> {
        match (self, value) {
            (HostType::Any, v) => Ok(v),
            (HostType::Boolean, v @ HostValue::Bool(_)) => Ok(v),
            (HostType::Int, v @ HostValue::Int(_)) => Ok(v),
            (HostType::Long, HostValue::Int(i)) => Ok(HostValue::Long(i64::from(i))),
            (HostType::Long, v @ HostValue::Long(_)) => Ok(v),
            (HostType::Double, HostValue::Int(i)) => Ok(HostValue::Double(f64::from(i))),
            (HostType::Double, HostValue::Long(l)) => Ok(HostValue::Double(l as f64)),
            (HostType::Double, v @ HostValue::Double(_)) => Ok(v),
            (HostType::String, v @ (HostValue::Str(_) | HostValue::Null)) => Ok(v),
            (HostType::Class(_), HostValue::Null) => Ok(HostValue::Null),
            (HostType::Class(class), HostValue::Object(obj)) => {
                if class.accepts(obj.class()) {
                    Ok(HostValue::Object(obj))
                } else {
                    Err(HostValue::Object(obj))
                }
            }
            (_, v) => Err(v),
        }
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostType::Boolean => write!(f, "boolean"),
            HostType::Int => write!(f, "int"),
            HostType::Long => write!(f, "long"),
            HostType::Double => write!(f, "double"),
            HostType::String => write!(f, "String"),
            HostType::Class(class) => write!(f, "{}", class.name),
            HostType::Any => write!(f, "Object"),
        }
    }
}

/// The class a reference type points at
///
/// A bound reference accepts only instances of the class with its ID. An
/// unbound one accepts any class with a matching name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassRef {
    name: Arc<str>,
    id: Option<u64>,
}

impl ClassRef {
    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class ID, when bound
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    fn accepts(&self, class: &HostClass) -> bool {
        match self.id {
            Some(id) => class.id() == id,
            None => class.name() == &*self.name,
        }
    }
}

/// Declared (possibly parameterized) type of a host field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericType {
    /// Erased type
    pub raw: HostType,
    /// Type arguments, empty for non-generic types
    pub arguments: Vec<GenericType>,
}

impl GenericType {
    /// Generic type with arguments
    pub fn new(raw: HostType, arguments: Vec<GenericType>) -> Self {
        Self { raw, arguments }
    }

    /// Whether the type has type arguments
    pub fn is_parameterized(&self) -> bool {
        !self.arguments.is_empty()
    }

    pub(crate) fn bind_class(self, name: &str, id: u64) -> Self {
        Self {
            raw: self.raw.bind_class(name, id),
            arguments: self
                .arguments
                .into_iter()
                .map(|arg| arg.bind_class(name, id))
                .collect(),
        }
    }
}

impl From<HostType> for GenericType {
    fn from(raw: HostType) -> Self {
        Self {
            raw,
            arguments: Vec::new(),
        }
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)?;
        if self.arguments.is_empty() {
            return Ok(());
        }
        write!(f, "<")?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ">")
    }
}

/// Modifier flags for classes and fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Public visibility
    pub is_public: bool,
    /// Class-level (static) member
    pub is_static: bool,
    /// Final (read-only after initialization)
    pub is_final: bool,
}

impl Modifiers {
    /// Public, non-static, non-final
    pub const PUBLIC: Modifiers = Modifiers {
        is_public: true,
        is_static: false,
        is_final: false,
    };
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = Vec::new();
        if self.is_public {
            words.push("public");
        }
        if self.is_static {
            words.push("static");
        }
        if self.is_final {
            words.push("final");
        }
        write!(f, "{}", words.join(" "))
    }
}
