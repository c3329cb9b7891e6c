//! The structured artifact tree every synthesizer produces.
//!
//! Artifacts are plain data: names, typed parameters and the behavior the
//! emitted code must have. Rendering them into source text is the job of an
//! [`ArtifactEmitter`](crate::ArtifactEmitter).

use ecsgen_schema::{IndexKind, PriorityTier, TypeRef};
use serde::{Deserialize, Serialize};

/// A named, derived artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub body: ArtifactBody,
}

impl Artifact {
    pub fn new(name: impl Into<String>, body: ArtifactBody) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArtifactBody {
    Accessors(AccessorModule),
    Dispatch(DispatchSystem),
    Reactive(ReactiveSystem),
    ClearEvents(ClearEventsSystem),
    EventSystems(EventSystemsManifest),
    UniqueLookup(UniqueLookup),
    IndexLookup(IndexLookup),
    Manifest(RegistrationManifest),
    Commands(CommandModule),
}

impl ArtifactBody {
    /// Short kind tag, used in logs and by emitters that route on kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ArtifactBody::Accessors(_) => "accessors",
            ArtifactBody::Dispatch(_) => "dispatch",
            ArtifactBody::Reactive(_) => "reactive",
            ArtifactBody::ClearEvents(_) => "clear_events",
            ArtifactBody::EventSystems(_) => "event_systems",
            ArtifactBody::UniqueLookup(_) => "unique_lookup",
            ArtifactBody::IndexLookup(_) => "index_lookup",
            ArtifactBody::Manifest(_) => "manifest",
            ArtifactBody::Commands(_) => "commands",
        }
    }
}

/// A typed parameter or record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// The entity handle every record and most operations take first.
    pub fn entity() -> Self {
        Self::new("entity", entity_type())
    }
}

/// The runtime entity type.
pub fn entity_type() -> TypeRef {
    TypeRef::named("ecsgen_runtime", "Entity")
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleKind {
    Added,
    Removed,
    Changed,
}

impl LifecycleKind {
    pub const ALL: [LifecycleKind; 3] = [
        LifecycleKind::Added,
        LifecycleKind::Removed,
        LifecycleKind::Changed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleKind::Added => "Added",
            LifecycleKind::Removed => "Removed",
            LifecycleKind::Changed => "Changed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessorKind {
    Get,
    Has,
    Add,
    Replace,
    Remove,
}

/// What an operation hands back on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Returns {
    Unit,
    Bool,
    /// A borrow of the stored component.
    Component(TypeRef),
    Entity,
    OptionalEntity,
    Entities,
}

/// The runtime error an operation may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Failure {
    MissingComponent,
    DuplicateComponent,
    Cardinality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessorOp {
    pub name: String,
    pub kind: AccessorKind,
    pub params: Vec<Param>,
    pub returns: Returns,
    pub fails_with: Option<Failure>,
    /// The lifecycle record appended to the buffer on success.
    pub buffers: Option<LifecycleKind>,
}

/// One lifecycle record shape, e.g. `OnHealthChanged { entity, old, new }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    pub kind: LifecycleKind,
    pub fields: Vec<Param>,
}

/// How the emitted display impl renders a value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderRule {
    /// `{value}`
    Single(String),
    /// `|Name -> a: x, b: y|`
    Delimited(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessorModule {
    /// Display name, suffix stripped.
    pub component: String,
    pub source: TypeRef,
    pub fields: Vec<Param>,
    pub operations: Vec<AccessorOp>,
    pub events: Vec<EventRecord>,
    /// `None` for tag components.
    pub render: Option<RenderRule>,
    pub imports: Vec<String>,
}

// ---------------------------------------------------------------------------
// Event dispatch
// ---------------------------------------------------------------------------

/// A per-tick coalescing dispatcher for one record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchSystem {
    pub component: String,
    pub record: String,
    pub kind: LifecycleKind,
    /// Skip records whose `old == new`.
    pub suppress_unchanged: bool,
    /// Clear the raw channel after dispatch.
    pub clean_up: bool,
}

/// A per-record reactive system for one record type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactiveSystem {
    pub component: String,
    pub record: String,
    pub kind: LifecycleKind,
    pub suppress_unchanged: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearEventsSystem {
    /// Every record type whose channel is cleared, in declaration order.
    pub records: Vec<String>,
}

/// Dispatch systems followed by the clear system, in install order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSystemsManifest {
    pub systems: Vec<String>,
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueLookup {
    pub component: String,
    pub source: TypeRef,
    pub returns: Returns,
    pub fails_with: Failure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexLookup {
    pub component: String,
    /// Operation name without the component prefix, e.g. `GetEntityWithId`.
    pub operation: String,
    pub source: TypeRef,
    pub field: String,
    pub value: Param,
    pub index: IndexKind,
    pub returns: Returns,
    pub fails_with: Option<Failure>,
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub system: String,
    pub namespace: String,
    pub tier: PriorityTier,
    pub order: i32,
    pub conditional_on_debug: bool,
}

/// Declared systems in execution order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationManifest {
    pub entries: Vec<ManifestEntry>,
}

/// Receives system registrations. Stands in for the host's DI container.
pub trait SystemContainer {
    fn register(&mut self, entry: &ManifestEntry);
}

impl SystemContainer for Vec<String> {
    fn register(&mut self, entry: &ManifestEntry) {
        self.push(entry.system.clone());
    }
}

impl RegistrationManifest {
    pub fn system_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.system.as_str()).collect()
    }

    /// Register every entry in order. Debug-only entries are skipped unless
    /// `is_debug` is set.
    pub fn install(&self, container: &mut impl SystemContainer, is_debug: bool) -> usize {
        let mut installed = 0;
        for entry in &self.entries {
            if entry.conditional_on_debug && !is_debug {
                continue;
            }
            container.register(entry);
            installed += 1;
        }
        installed
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandConstructor {
    /// Constructor name, suffix stripped.
    pub name: String,
    pub command: TypeRef,
    pub params: Vec<Param>,
    /// Record field -> parameter, in field order.
    pub assignments: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandModule {
    pub constructors: Vec<CommandConstructor>,
    pub imports: Vec<String>,
}

// ---------------------------------------------------------------------------
// Artifact set
// ---------------------------------------------------------------------------

/// Every artifact of one derivation, in synthesizer order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSet {
    pub artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.name.as_str()).collect()
    }

    /// Artifacts of one kind, see [`ArtifactBody::kind`].
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Artifact> {
        self.artifacts.iter().filter(move |a| a.body.kind() == kind)
    }

    /// The registration manifest, if one was derived.
    pub fn manifest(&self) -> Option<&RegistrationManifest> {
        self.artifacts.iter().find_map(|a| match &a.body {
            ArtifactBody::Manifest(m) => Some(m),
            _ => None,
        })
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "artifacts": self.artifacts })
    }
}

impl Extend<Artifact> for ArtifactSet {
    fn extend<I: IntoIterator<Item = Artifact>>(&mut self, iter: I) {
        self.artifacts.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(system: &str, debug: bool) -> ManifestEntry {
        ManifestEntry {
            system: system.into(),
            namespace: String::new(),
            tier: PriorityTier::Normal,
            order: 0,
            conditional_on_debug: debug,
        }
    }

    #[test]
    fn test_install_skips_debug_systems_in_release() {
        let manifest = RegistrationManifest {
            entries: vec![entry("Input", false), entry("Gizmos", true), entry("Physics", false)],
        };

        let mut release: Vec<String> = Vec::new();
        assert_eq!(manifest.install(&mut release, false), 2);
        assert_eq!(release, vec!["Input".to_string(), "Physics".to_string()]);

        let mut debug: Vec<String> = Vec::new();
        assert_eq!(manifest.install(&mut debug, true), 3);
        assert_eq!(debug[1], "Gizmos");
    }

    #[test]
    fn test_set_queries() {
        let mut set = ArtifactSet::new();
        set.extend([
            Artifact::new("Systems", ArtifactBody::Manifest(RegistrationManifest::default())),
            Artifact::new("Commands", ArtifactBody::Commands(CommandModule::default())),
        ]);
        assert_eq!(set.len(), 2);
        assert!(set.manifest().is_some());
        assert_eq!(set.of_kind("commands").count(), 1);
        assert!(set.get("Missing").is_none());
        assert_eq!(set.to_json()["artifacts"][1]["name"], "Commands");
    }
}
