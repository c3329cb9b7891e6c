//! Declaration records handed in by the schema extractor.
//!
//! These are loosely checked: names may collide, index attributes may point
//! at fields that do not exist. [`crate::Schema::build`] turns them into the
//! validated model.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::schema::SchemaError;

// ---------------------------------------------------------------------------
// Declaration set
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDecl {
    #[serde(default)]
    pub components: Vec<ComponentDecl>,
    #[serde(default)]
    pub commands: Vec<CommandDecl>,
    #[serde(default)]
    pub systems: Vec<SystemDecl>,
}

impl SchemaDecl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON declaration set.
    pub fn from_json(source: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a JSON declaration set from disk.
    pub fn load_file(path: &Path) -> Result<Self, SchemaError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// Append another declaration set, keeping declaration order.
    pub fn merge(&mut self, other: SchemaDecl) {
        self.components.extend(other.components);
        self.commands.extend(other.commands);
        self.systems.extend(other.systems);
    }
}

// ---------------------------------------------------------------------------
// Type references
// ---------------------------------------------------------------------------

/// An opaque semantic type descriptor. Only compared and rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// A built-in scalar: bool, i32, f32, string, ...
    Primitive(String),
    /// A user type living in a namespace / module.
    Named { namespace: String, name: String },
    /// The extractor could not resolve this type; carries the spelling.
    Unresolved(String),
}

impl TypeRef {
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive(name.into())
    }

    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, TypeRef::Unresolved(_))
    }

    /// The bare type name, without namespace.
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Primitive(name) | TypeRef::Unresolved(name) => name.as_str(),
            TypeRef::Named { name, .. } => name.as_str(),
        }
    }

    /// The containing namespace, if the type has one.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            TypeRef::Named { namespace, .. } if !namespace.is_empty() => Some(namespace.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(name) => write!(f, "{name}"),
            TypeRef::Named { namespace, name } if namespace.is_empty() => write!(f, "{name}"),
            TypeRef::Named { namespace, name } => write!(f, "{namespace}::{name}"),
            TypeRef::Unresolved(spelling) => write!(f, "?{spelling}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Fields and indices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeRef,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    #[default]
    None,
    /// At most one entity may hold a given value.
    Primary,
    /// Any number of entities may share a value.
    Secondary,
}

/// An index attribute attached to a component field by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDecl {
    pub field: String,
    pub kind: IndexKind,
}

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentDecl {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub events: bool,
    #[serde(default)]
    pub indices: Vec<IndexDecl>,
}

impl ComponentDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields.push(FieldDecl::new(name, ty));
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn events(mut self) -> Self {
        self.events = true;
        self
    }

    pub fn index(mut self, field: impl Into<String>, kind: IndexKind) -> Self {
        self.indices.push(IndexDecl {
            field: field.into(),
            kind,
        });
        self
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandDecl {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl CommandDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.fields.push(FieldDecl::new(name, ty));
        self
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// Execution phase of a system. Declaration order is execution order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum PriorityTier {
    Urgent,
    High,
    #[default]
    Normal,
    Low,
    None,
}

impl PriorityTier {
    pub const ALL: [PriorityTier; 5] = [
        PriorityTier::Urgent,
        PriorityTier::High,
        PriorityTier::Normal,
        PriorityTier::Low,
        PriorityTier::None,
    ];
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriorityTier::Urgent => "urgent",
            PriorityTier::High => "high",
            PriorityTier::Normal => "normal",
            PriorityTier::Low => "low",
            PriorityTier::None => "none",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemDecl {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub tier: PriorityTier,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub debug: bool,
}

impl SystemDecl {
    pub fn new(name: impl Into<String>, tier: PriorityTier, order: i32) -> Self {
        Self {
            name: name.into(),
            tier,
            order,
            ..Self::default()
        }
    }

    pub fn debug_only(mut self) -> Self {
        self.debug = true;
        self
    }
}
