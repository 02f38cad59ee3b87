//! Per-entity schema descriptors used for dynamic member access
//!
//! Every entity type owns a single [`EntitySchema`] (built once behind a
//! `OnceLock` by [`impl_crud_entity!`](crate::impl_crud_entity)) that maps
//! property names to typed accessor functions. Filtering, sorting and
//! projection resolve request-supplied names through it, so they stay
//! generic over the entity shape.

use serde_json::Value;
use std::collections::HashMap;

use crate::core::entity::{Member, Record};
use crate::core::field::{FieldKind, FieldValue};

/// A scalar property of an entity
pub struct FieldDescriptor<T> {
    name: &'static str,
    kind: FieldKind,
    get: fn(&T) -> FieldValue,
}

impl<T> FieldDescriptor<T> {
    pub fn new(name: &'static str, kind: FieldKind, get: fn(&T) -> FieldValue) -> Self {
        Self { name, kind, get }
    }

    /// Canonical (PascalCase) property name
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Read the property from a record
    pub fn get(&self, record: &T) -> FieldValue {
        (self.get)(record)
    }
}

/// A navigation property pointing at a related entity, named `ForeignKey_Target`
pub struct RelationDescriptor<T> {
    name: &'static str,
    foreign_key: &'static str,
    target: &'static str,
    get: fn(&T) -> Option<&dyn Record>,
    attach: fn(&mut T, Value) -> serde_json::Result<()>,
    clear: fn(&mut T),
}

impl<T> RelationDescriptor<T> {
    pub fn new(
        name: &'static str,
        foreign_key: &'static str,
        target: &'static str,
        get: fn(&T) -> Option<&dyn Record>,
        attach: fn(&mut T, Value) -> serde_json::Result<()>,
        clear: fn(&mut T),
    ) -> Self {
        Self {
            name,
            foreign_key,
            target,
            get,
            attach,
            clear,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Name of the scalar property holding the related id
    pub fn foreign_key(&self) -> &'static str {
        self.foreign_key
    }

    /// Resource name of the related entity
    pub fn target(&self) -> &'static str {
        self.target
    }

    /// The loaded related record, if any
    pub fn get<'a>(&self, record: &'a T) -> Option<&'a dyn Record> {
        (self.get)(record)
    }

    /// Attach a related record fetched as JSON
    pub fn attach(&self, record: &mut T, related: Value) -> serde_json::Result<()> {
        (self.attach)(record, related)
    }

    /// Drop the loaded related record
    pub fn clear(&self, record: &mut T) {
        (self.clear)(record)
    }
}

/// Runtime description of an entity's properties
pub struct EntitySchema<T> {
    entity_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
    relations: Vec<RelationDescriptor<T>>,
    field_index: HashMap<String, usize>,
    relation_index: HashMap<String, usize>,
}

impl<T> EntitySchema<T> {
    pub fn new(
        entity_name: &'static str,
        fields: Vec<FieldDescriptor<T>>,
        relations: Vec<RelationDescriptor<T>>,
    ) -> Self {
        let field_index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.to_ascii_lowercase(), i))
            .collect();
        let relation_index = relations
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.to_ascii_lowercase(), i))
            .collect();

        Self {
            entity_name,
            fields,
            relations,
            field_index,
            relation_index,
        }
    }

    pub fn entity_name(&self) -> &'static str {
        self.entity_name
    }

    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    pub fn relations(&self) -> &[RelationDescriptor<T>] {
        &self.relations
    }

    /// Resolve a scalar property, ignoring case
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.field_index
            .get(&name.trim().to_ascii_lowercase())
            .map(|&i| &self.fields[i])
    }

    /// Resolve a navigation property, ignoring case
    pub fn relation(&self, name: &str) -> Option<&RelationDescriptor<T>> {
        self.relation_index
            .get(&name.trim().to_ascii_lowercase())
            .map(|&i| &self.relations[i])
    }

    /// Scalar properties of kind string, used by free-text search
    pub fn string_fields(&self) -> impl Iterator<Item = &FieldDescriptor<T>> {
        self.fields
            .iter()
            .filter(|f| f.kind == FieldKind::String)
    }

    /// Look up a member of `record` by name, scalars taking precedence
    pub fn member<'a>(&self, record: &'a T, name: &str) -> Option<Member<'a>> {
        if let Some(field) = self.field(name) {
            return Some(Member::Scalar(field.get(record)));
        }
        self.relation(name)
            .map(|relation| Member::Related(relation.get(record)))
    }

    /// Canonical names of all scalar properties, in declaration order
    pub fn scalar_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}
