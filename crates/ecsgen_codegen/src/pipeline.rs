//! Derivation pipeline.
//!
//! Runs the synthesizers over one immutable [`Schema`] in a fixed order and
//! collects their artifacts:
//!
//! 1. accessors and lifecycle records
//! 2. event dispatch, reactive and clear systems
//! 3. unique and index lookups
//! 4. the registration manifest
//! 5. command constructors
//!
//! Synthesizers do not depend on each other, so the order only fixes the
//! layout of the [`ArtifactSet`].

use ecsgen_schema::{Schema, SchemaBuild, SchemaDecl, SchemaError};
use tracing::{debug, info};

use crate::accessor::AccessorSynthesizer;
use crate::artifact::{Artifact, ArtifactSet};
use crate::commands::CommandConstructorSynthesizer;
use crate::config::DeriveConfig;
use crate::events::EventCoalescer;
use crate::index::IndexSynthesizer;
use crate::registration::RegistrationPlanner;

/// One artifact family derived from the schema.
pub trait Synthesizer {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn synthesize(&self, schema: &Schema, cfg: &DeriveConfig) -> Vec<Artifact>;
}

/// The result of a full run: whatever could be derived, plus every
/// declaration that was rejected on the way.
#[derive(Debug)]
pub struct Derivation {
    pub artifacts: ArtifactSet,
    pub errors: Vec<SchemaError>,
}

impl Derivation {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

fn synthesizers() -> [&'static dyn Synthesizer; 5] {
    [
        &AccessorSynthesizer,
        &EventCoalescer,
        &IndexSynthesizer,
        &RegistrationPlanner,
        &CommandConstructorSynthesizer,
    ]
}

/// Derive every artifact from a validated schema.
pub fn derive(schema: &Schema, cfg: &DeriveConfig) -> ArtifactSet {
    let mut set = ArtifactSet::new();
    for synthesizer in synthesizers() {
        let artifacts = synthesizer.synthesize(schema, cfg);
        debug!(
            synthesizer = synthesizer.name(),
            artifacts = artifacts.len(),
            "synthesized"
        );
        set.extend(artifacts);
    }
    info!(
        components = schema.components().len(),
        commands = schema.commands().len(),
        systems = schema.systems().len(),
        artifacts = set.len(),
        "derivation complete"
    );
    set
}

/// Validate `decl` and derive from whatever survives.
///
/// Besides the schema rules, a component or command is rejected when its
/// suffix-stripped name repeats an earlier one, since both would derive the
/// same artifact names.
pub fn run(decl: SchemaDecl, cfg: &DeriveConfig) -> Derivation {
    let SchemaBuild {
        mut schema,
        mut errors,
    } = Schema::build(decl);
    errors.extend(schema.reject_name_clashes(
        |name| cfg.component_name(name).to_string(),
        |name| cfg.command_name(name).to_string(),
    ));
    if !errors.is_empty() {
        info!(rejected = errors.len(), "deriving from partial schema");
    }
    Derivation {
        artifacts: derive(&schema, cfg),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecsgen_schema::{ComponentDecl, TypeRef};

    #[test]
    fn test_empty_schema_still_has_manifests() {
        let derivation = run(SchemaDecl::new(), &DeriveConfig::default());
        assert!(derivation.is_clean());
        // Clear system, event systems manifest and registration manifest.
        assert_eq!(
            derivation.artifacts.names(),
            vec!["ClearEventCommandsSystem", "GameEventSystems", "GameSystems"]
        );
    }

    #[test]
    fn test_stripped_name_clash_is_rejected() {
        let mut decl = SchemaDecl::new();
        decl.components.push(
            ComponentDecl::new("Health")
                .field("hp", TypeRef::primitive("i32"))
                .events(),
        );
        decl.components.push(
            ComponentDecl::new("HealthComponent")
                .field("value", TypeRef::primitive("i32"))
                .events(),
        );
        let derivation = run(decl, &DeriveConfig::default());

        assert_eq!(derivation.errors.len(), 1);
        assert!(matches!(
            &derivation.errors[0],
            SchemaError::DerivedNameClash { element, derived, .. }
                if element == "HealthComponent" && derived == "Health"
        ));

        let names = derivation.artifacts.names();
        let count = |name: &str| names.iter().filter(|n| **n == name).count();
        assert_eq!(count("HealthAccessors"), 1);
        assert_eq!(count("OnHealthAddedEventSystem"), 1);

        let clear = derivation
            .artifacts
            .of_kind("clear_events")
            .find_map(|a| match &a.body {
                crate::artifact::ArtifactBody::ClearEvents(c) => Some(c),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            clear.records,
            vec!["OnHealthAdded", "OnHealthRemoved", "OnHealthChanged"]
        );
    }

    #[test]
    fn test_synthesizer_order() {
        let mut decl = SchemaDecl::new();
        decl.components.push(
            ComponentDecl::new("Tag").unique(),
        );
        decl.components
            .push(ComponentDecl::new("Speed").field("value", TypeRef::primitive("f32")));
        let derivation = run(decl, &DeriveConfig::default().with_reactive(false));

        let kinds: Vec<_> = derivation
            .artifacts
            .artifacts
            .iter()
            .map(|a| a.body.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                "accessors",
                "accessors",
                "clear_events",
                "event_systems",
                "unique_lookup",
                "manifest",
            ]
        );
    }
}
