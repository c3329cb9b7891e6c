/// Validated schema model: collects the accepted declarations into an
/// immutable, ordered registry that every synthesizer reads from.
use crate::decl::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed declaration set: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{kind} declared with an empty name")]
    EmptyName { kind: ElementKind },
    #[error("duplicate component: {0}")]
    DuplicateComponent(String),
    #[error("duplicate command: {0}")]
    DuplicateCommand(String),
    #[error("duplicate system: {0}")]
    DuplicateSystem(String),
    #[error("{element}: field '{field}' declared more than once")]
    DuplicateField { element: String, field: String },
    #[error("{element}: field '{field}' has unresolved type '{spelling}'")]
    UnresolvedFieldType {
        element: String,
        field: String,
        spelling: String,
    },
    #[error("{element}: index attribute on unknown field '{field}'")]
    UnknownIndexField { element: String, field: String },
    #[error("{element}: field '{field}' carries more than one index attribute")]
    ConflictingIndex { element: String, field: String },
    #[error("{kind} {element} derives the name '{derived}' already taken by {existing}")]
    DerivedNameClash {
        kind: ElementKind,
        element: String,
        derived: String,
        existing: String,
    },
}

impl SchemaError {
    /// Name of the rejected element, when the error concerns one.
    pub fn element(&self) -> Option<&str> {
        match self {
            SchemaError::Io(_) | SchemaError::Json(_) | SchemaError::EmptyName { .. } => None,
            SchemaError::DuplicateComponent(name)
            | SchemaError::DuplicateCommand(name)
            | SchemaError::DuplicateSystem(name) => Some(name),
            SchemaError::DuplicateField { element, .. }
            | SchemaError::UnresolvedFieldType { element, .. }
            | SchemaError::UnknownIndexField { element, .. }
            | SchemaError::ConflictingIndex { element, .. }
            | SchemaError::DerivedNameClash { element, .. } => Some(element),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Component,
    Command,
    System,
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementKind::Component => f.write_str("component"),
            ElementKind::Command => f.write_str("command"),
            ElementKind::System => f.write_str("system"),
        }
    }
}

// ---------------------------------------------------------------------------
// Validated elements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub ty: TypeRef,
    pub index: IndexKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSchema {
    pub name: String,
    pub namespace: String,
    pub fields: Vec<FieldSchema>,
    /// At most one entity may hold this component.
    pub is_unique: bool,
    pub produces_events: bool,
}

impl ComponentSchema {
    /// A component without fields is a zero-sized tag.
    pub fn is_tag(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn primary_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| f.index == IndexKind::Primary)
    }

    pub fn secondary_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| f.index == IndexKind::Secondary)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSchema {
    pub name: String,
    pub namespace: String,
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSchema {
    pub name: String,
    pub namespace: String,
    pub tier: PriorityTier,
    /// Tie-break within the tier, ascending.
    pub order: i32,
    pub debug_only: bool,
}

/// Outcome of [`Schema::build`]: the accepted schema plus one error per
/// rejected element.
#[derive(Debug)]
pub struct SchemaBuild {
    pub schema: Schema,
    pub errors: Vec<SchemaError>,
}

impl SchemaBuild {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// An immutable, validated schema. Elements keep declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    components: Vec<ComponentSchema>,
    commands: Vec<CommandSchema>,
    systems: Vec<SystemSchema>,
    component_index: HashMap<String, usize>,
}

impl Schema {
    /// Validate a declaration set. Offending elements are dropped and
    /// reported; everything else is kept.
    pub fn build(decl: SchemaDecl) -> SchemaBuild {
        let mut schema = Schema::default();
        let mut errors = Vec::new();

        for component in decl.components {
            match schema.accept_component(component) {
                Ok(()) => {}
                Err(e) => {
                    warn!(element = e.element(), error = %e, "rejected component");
                    errors.push(e);
                }
            }
        }

        let mut command_names = HashSet::new();
        for command in decl.commands {
            match validate_command(command, &command_names) {
                Ok(accepted) => {
                    command_names.insert(accepted.name.clone());
                    schema.commands.push(accepted);
                }
                Err(e) => {
                    warn!(element = e.element(), error = %e, "rejected command");
                    errors.push(e);
                }
            }
        }

        let mut system_names = HashSet::new();
        for system in decl.systems {
            if system.name.is_empty() {
                let e = SchemaError::EmptyName {
                    kind: ElementKind::System,
                };
                warn!(error = %e, "rejected system");
                errors.push(e);
                continue;
            }
            if !system_names.insert(system.name.clone()) {
                let e = SchemaError::DuplicateSystem(system.name);
                warn!(element = e.element(), error = %e, "rejected system");
                errors.push(e);
                continue;
            }
            schema.systems.push(SystemSchema {
                name: system.name,
                namespace: system.namespace,
                tier: system.tier,
                order: system.order,
                debug_only: system.debug,
            });
        }

        debug!(
            components = schema.components.len(),
            commands = schema.commands.len(),
            systems = schema.systems.len(),
            rejected = errors.len(),
            "schema built"
        );

        SchemaBuild { schema, errors }
    }

    fn accept_component(&mut self, decl: ComponentDecl) -> Result<(), SchemaError> {
        if decl.name.is_empty() {
            return Err(SchemaError::EmptyName {
                kind: ElementKind::Component,
            });
        }
        if self.component_index.contains_key(&decl.name) {
            return Err(SchemaError::DuplicateComponent(decl.name));
        }

        let mut fields = validate_fields(&decl.name, decl.fields)?;

        let mut indexed = HashSet::new();
        for index in &decl.indices {
            let Some(field) = fields.iter_mut().find(|f| f.name == index.field) else {
                return Err(SchemaError::UnknownIndexField {
                    element: decl.name,
                    field: index.field.clone(),
                });
            };
            if !indexed.insert(index.field.as_str()) {
                return Err(SchemaError::ConflictingIndex {
                    element: decl.name,
                    field: index.field.clone(),
                });
            }
            field.index = index.kind;
        }

        self.component_index
            .insert(decl.name.clone(), self.components.len());
        self.components.push(ComponentSchema {
            name: decl.name,
            namespace: decl.namespace,
            fields,
            is_unique: decl.unique,
            produces_events: decl.events,
        });
        Ok(())
    }

    /// Drop every component or command whose derived name repeats an earlier
    /// one. `component_name` and `command_name` map a declared name to the
    /// name artifacts are generated under. The first declaration wins.
    pub fn reject_name_clashes(
        &mut self,
        component_name: impl Fn(&str) -> String,
        command_name: impl Fn(&str) -> String,
    ) -> Vec<SchemaError> {
        let mut errors = first_derived_name_wins(
            &mut self.components,
            ElementKind::Component,
            |c| c.name.as_str(),
            component_name,
        );
        errors.extend(first_derived_name_wins(
            &mut self.commands,
            ElementKind::Command,
            |c| c.name.as_str(),
            command_name,
        ));

        self.component_index = self
            .components
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        errors
    }

    /// Get a component by name, or None if it doesn't exist.
    pub fn get_component(&self, name: &str) -> Option<&ComponentSchema> {
        self.component_index.get(name).map(|&i| &self.components[i])
    }

    pub fn components(&self) -> &[ComponentSchema] {
        &self.components
    }

    pub fn commands(&self) -> &[CommandSchema] {
        &self.commands
    }

    pub fn systems(&self) -> &[SystemSchema] {
        &self.systems
    }

    /// Components flagged as event-producing, in declaration order.
    pub fn event_components(&self) -> impl Iterator<Item = &ComponentSchema> {
        self.components.iter().filter(|c| c.produces_events)
    }

    pub fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name.as_str()).collect()
    }

    /// Serialize the schema to a JSON description.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "components": self.components,
            "commands": self.commands,
            "systems": self.systems,
        })
    }
}

fn first_derived_name_wins<T>(
    elements: &mut Vec<T>,
    kind: ElementKind,
    name: impl Fn(&T) -> &str,
    derive: impl Fn(&str) -> String,
) -> Vec<SchemaError> {
    let mut taken: HashMap<String, String> = HashMap::new();
    let mut errors = Vec::new();
    elements.retain(|element| {
        let declared = name(element);
        let derived = derive(declared);
        if let Some(existing) = taken.get(&derived) {
            let e = SchemaError::DerivedNameClash {
                kind,
                element: declared.to_string(),
                derived,
                existing: existing.clone(),
            };
            warn!(element = declared, error = %e, "rejected {kind}");
            errors.push(e);
            return false;
        }
        taken.insert(derived, declared.to_string());
        true
    });
    errors
}

fn validate_command(
    decl: CommandDecl,
    taken: &HashSet<String>,
) -> Result<CommandSchema, SchemaError> {
    if decl.name.is_empty() {
        return Err(SchemaError::EmptyName {
            kind: ElementKind::Command,
        });
    }
    if taken.contains(&decl.name) {
        return Err(SchemaError::DuplicateCommand(decl.name));
    }
    let fields = validate_fields(&decl.name, decl.fields)?;
    Ok(CommandSchema {
        name: decl.name,
        namespace: decl.namespace,
        fields,
    })
}

fn validate_fields(element: &str, fields: Vec<FieldDecl>) -> Result<Vec<FieldSchema>, SchemaError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(fields.len());
    for field in fields {
        if !seen.insert(field.name.clone()) {
            return Err(SchemaError::DuplicateField {
                element: element.to_string(),
                field: field.name,
            });
        }
        if let TypeRef::Unresolved(spelling) = &field.ty {
            return Err(SchemaError::UnresolvedFieldType {
                element: element.to_string(),
                field: field.name,
                spelling: spelling.clone(),
            });
        }
        out.push(FieldSchema {
            name: field.name,
            ty: field.ty,
            index: IndexKind::None,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i32_ty() -> TypeRef {
        TypeRef::primitive("i32")
    }

    #[test]
    fn test_build_clean_schema() {
        let mut decl = SchemaDecl::new();
        decl.components.push(
            ComponentDecl::new("Position")
                .field("x", TypeRef::primitive("f32"))
                .field("y", TypeRef::primitive("f32"))
                .events(),
        );
        decl.components.push(
            ComponentDecl::new("PlayerId")
                .field("id", i32_ty())
                .index("id", IndexKind::Primary),
        );
        decl.components.push(ComponentDecl::new("Frozen").unique());
        decl.commands
            .push(CommandDecl::new("SpawnCmd").field("count", i32_ty()));
        decl.systems
            .push(SystemDecl::new("Movement", PriorityTier::High, 0));

        let build = Schema::build(decl);
        assert!(build.is_clean());
        let schema = build.schema;
        assert_eq!(schema.component_names(), vec!["Position", "PlayerId", "Frozen"]);
        assert!(schema.get_component("Frozen").unwrap().is_tag());
        assert_eq!(
            schema.get_component("PlayerId").unwrap().field("id").unwrap().index,
            IndexKind::Primary
        );
        assert_eq!(schema.event_components().count(), 1);
        assert_eq!(schema.commands().len(), 1);
        assert_eq!(schema.systems()[0].tier, PriorityTier::High);
    }

    #[test]
    fn test_duplicate_component_rejected_rest_kept() {
        let mut decl = SchemaDecl::new();
        decl.components.push(ComponentDecl::new("Health").field("hp", i32_ty()));
        decl.components.push(ComponentDecl::new("Health").field("other", i32_ty()));
        decl.components.push(ComponentDecl::new("Mana").field("mp", i32_ty()));

        let build = Schema::build(decl);
        assert_eq!(build.errors.len(), 1);
        assert!(matches!(build.errors[0], SchemaError::DuplicateComponent(ref n) if n == "Health"));
        assert_eq!(build.errors[0].element(), Some("Health"));
        // First declaration wins.
        assert_eq!(
            build.schema.get_component("Health").unwrap().fields[0].name,
            "hp"
        );
        assert!(build.schema.get_component("Mana").is_some());
    }

    #[test]
    fn test_unresolved_field_type_rejected() {
        let mut decl = SchemaDecl::new();
        decl.components.push(
            ComponentDecl::new("Broken").field("target", TypeRef::Unresolved("Missing".into())),
        );
        decl.commands.push(
            CommandDecl::new("BrokenCmd").field("target", TypeRef::Unresolved("Missing".into())),
        );

        let build = Schema::build(decl);
        assert_eq!(build.errors.len(), 2);
        assert!(build.schema.components().is_empty());
        assert!(build.schema.commands().is_empty());
        assert_eq!(build.errors[1].element(), Some("BrokenCmd"));
    }

    #[test]
    fn test_index_on_unknown_field_rejected() {
        let mut decl = SchemaDecl::new();
        decl.components.push(
            ComponentDecl::new("Tagged")
                .field("id", i32_ty())
                .index("nope", IndexKind::Secondary),
        );
        let build = Schema::build(decl);
        assert!(matches!(
            build.errors[0],
            SchemaError::UnknownIndexField { ref field, .. } if field == "nope"
        ));
        assert!(build.schema.get_component("Tagged").is_none());
    }

    #[test]
    fn test_conflicting_index_rejected() {
        let mut decl = SchemaDecl::new();
        decl.components.push(
            ComponentDecl::new("Key")
                .field("id", i32_ty())
                .index("id", IndexKind::Primary)
                .index("id", IndexKind::Secondary),
        );
        let build = Schema::build(decl);
        assert!(matches!(build.errors[0], SchemaError::ConflictingIndex { .. }));
    }

    #[test]
    fn test_duplicate_field_and_empty_names() {
        let mut decl = SchemaDecl::new();
        decl.components.push(
            ComponentDecl::new("Twice")
                .field("a", i32_ty())
                .field("a", i32_ty()),
        );
        decl.components.push(ComponentDecl::new(""));
        decl.systems.push(SystemDecl::new("", PriorityTier::Low, 0));
        decl.systems.push(SystemDecl::new("Tick", PriorityTier::Low, 0));
        decl.systems.push(SystemDecl::new("Tick", PriorityTier::High, 1));

        let build = Schema::build(decl);
        assert_eq!(build.errors.len(), 4);
        assert_eq!(build.errors[1].element(), None);
        assert_eq!(build.schema.systems().len(), 1);
        assert_eq!(build.schema.systems()[0].tier, PriorityTier::Low);
    }

    #[test]
    fn test_derived_name_clash_rejects_later_declaration() {
        let mut decl = SchemaDecl::new();
        decl.components.push(ComponentDecl::new("Health").field("hp", i32_ty()));
        decl.components.push(ComponentDecl::new("Mana").field("mp", i32_ty()));
        decl.components
            .push(ComponentDecl::new("HealthComponent").field("value", i32_ty()));
        decl.commands.push(CommandDecl::new("SpawnCmd"));
        decl.commands.push(CommandDecl::new("SpawnCommand"));

        let mut schema = Schema::build(decl).schema;
        fn strip(name: &str, suffixes: &[&str]) -> String {
            suffixes
                .iter()
                .find_map(|s| name.strip_suffix(s))
                .unwrap_or(name)
                .to_string()
        }
        let errors = schema.reject_name_clashes(
            |n| strip(n, &["Component"]),
            |n| strip(n, &["Cmd", "Command"]),
        );

        assert_eq!(errors.len(), 2);
        assert!(matches!(
            &errors[0],
            SchemaError::DerivedNameClash { kind: ElementKind::Component, element, derived, existing }
                if element == "HealthComponent" && derived == "Health" && existing == "Health"
        ));
        assert_eq!(errors[1].element(), Some("SpawnCommand"));

        assert_eq!(schema.component_names(), vec!["Health", "Mana"]);
        assert!(schema.get_component("HealthComponent").is_none());
        assert_eq!(schema.get_component("Mana").unwrap().fields[0].name, "mp");
        assert_eq!(schema.commands().len(), 1);
    }

    #[test]
    fn test_to_json_lists_elements() {
        let mut decl = SchemaDecl::new();
        decl.components.push(ComponentDecl::new("Frozen"));
        let schema = Schema::build(decl).schema;
        let json = schema.to_json();
        assert_eq!(json["components"][0]["name"], "Frozen");
        assert!(json["systems"].as_array().unwrap().is_empty());
    }
}
