//! Member Discovery
//!
//! Resolves guest-visible field names on a host class to descriptors. Only
//! accessible fields (public field, public class) are exposed; every other
//! field behaves as if it did not exist.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::{InteropError, InteropResult};
use crate::field::FieldDescriptor;
use crate::host::{HostClass, HostValue};
use crate::options::{self, DeploymentMode};

/// Accessible fields of one host class, by name
#[derive(Debug)]
pub struct HostClassMembers {
    class: Arc<HostClass>,
    /// Field name to descriptor index
    field_indices: FxHashMap<String, usize>,
    /// Descriptors in declaration order
    fields: Vec<FieldDescriptor>,
}

impl HostClassMembers {
    /// Discover accessible fields using the process-wide deployment mode
    pub fn discover(class: &Arc<HostClass>) -> Self {
        Self::discover_with(class, options::deployment_mode())
    }

    /// Discover accessible fields for an explicit deployment mode
    pub fn discover_with(class: &Arc<HostClass>, mode: DeploymentMode) -> Self {
        let mut field_indices = FxHashMap::default();
        let mut fields = Vec::new();

        for field in class.fields() {
            if !FieldDescriptor::is_accessible(field) {
                continue;
            }
            // First declaration wins on duplicate names
            if field_indices.contains_key(field.name()) {
                continue;
            }
            field_indices.insert(field.name().to_string(), fields.len());
            fields.push(FieldDescriptor::unreflect_with(Arc::clone(field), mode));
        }

        tracing::debug!(class = class.name(), fields = fields.len(), "discovered host members");
        Self {
            class: Arc::clone(class),
            field_indices,
            fields,
        }
    }

    /// The class these members belong to
    pub fn class(&self) -> &Arc<HostClass> {
        &self.class
    }

    /// Descriptor for a field name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.field_indices.get(name).map(|&i| &self.fields[i])
    }

    /// Names of accessible fields in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name())
    }

    /// Check if an accessible field exists
    pub fn has_field(&self, name: &str) -> bool {
        self.field_indices.contains_key(name)
    }

    /// Read a field by name
    pub fn read(&self, receiver: &HostValue, name: &str) -> InteropResult<HostValue> {
        let field = self
            .field(name)
            .ok_or_else(|| InteropError::unknown_identifier(name))?;
        Ok(field.get(receiver))
    }

    /// Write a field by name
    pub fn write(&self, receiver: &HostValue, name: &str, value: HostValue) -> InteropResult<()> {
        let field = self
            .field(name)
            .ok_or_else(|| InteropError::unknown_identifier(name))?;
        field.set(receiver, value)
    }
}

/// Shared cache of discovered members, keyed by class ID
#[derive(Debug)]
pub struct MemberCache {
    mode: DeploymentMode,
    entries: RwLock<FxHashMap<u64, Arc<HostClassMembers>>>,
}

impl MemberCache {
    /// Create a cache using the process-wide deployment mode
    pub fn new() -> Self {
        Self::with_mode(options::deployment_mode())
    }

    /// Create a cache for an explicit deployment mode
    pub fn with_mode(mode: DeploymentMode) -> Self {
        Self {
            mode,
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    /// Members of `class`, discovering them on first request
    pub fn lookup(&self, class: &Arc<HostClass>) -> Arc<HostClassMembers> {
        if let Some(members) = self.entries.read().get(&class.id()) {
            return Arc::clone(members);
        }

        let mut entries = self.entries.write();
        let members = entries
            .entry(class.id())
            .or_insert_with(|| Arc::new(HostClassMembers::discover_with(class, self.mode)));
        Arc::clone(members)
    }

    /// Number of cached classes
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for MemberCache {
    fn default() -> Self {
        Self::new()
    }
}
