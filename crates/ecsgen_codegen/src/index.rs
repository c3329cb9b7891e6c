//! Unique-component accessors and field index lookups.

use ecsgen_schema::{IndexKind, Schema};

use crate::accessor::source_type;
use crate::artifact::*;
use crate::config::DeriveConfig;
use crate::naming::upper_camel;
use crate::pipeline::Synthesizer;

#[derive(Debug, Default)]
pub struct IndexSynthesizer;

impl Synthesizer for IndexSynthesizer {
    fn name(&self) -> &'static str {
        "index"
    }

    fn synthesize(&self, schema: &Schema, cfg: &DeriveConfig) -> Vec<Artifact> {
        let mut artifacts = Vec::new();

        for component in schema.components() {
            let name = cfg.component_name(&component.name);
            let source = source_type(component);

            if component.is_unique {
                artifacts.push(Artifact::new(
                    name,
                    ArtifactBody::UniqueLookup(UniqueLookup {
                        component: name.to_string(),
                        source: source.clone(),
                        returns: Returns::Entity,
                        fails_with: Failure::Cardinality,
                    }),
                ));
            }

            for field in component.primary_fields() {
                let operation = format!("GetEntityWith{}", upper_camel(&field.name));
                artifacts.push(Artifact::new(
                    format!("{name}{operation}"),
                    ArtifactBody::IndexLookup(IndexLookup {
                        component: name.to_string(),
                        operation,
                        source: source.clone(),
                        field: field.name.clone(),
                        value: Param::new("value", field.ty.clone()),
                        index: IndexKind::Primary,
                        returns: Returns::OptionalEntity,
                        fails_with: Some(Failure::Cardinality),
                    }),
                ));
            }

            for field in component.secondary_fields() {
                let operation = format!("GetEntitiesWith{}", upper_camel(&field.name));
                artifacts.push(Artifact::new(
                    format!("{name}{operation}"),
                    ArtifactBody::IndexLookup(IndexLookup {
                        component: name.to_string(),
                        operation,
                        source: source.clone(),
                        field: field.name.clone(),
                        value: Param::new("value", field.ty.clone()),
                        index: IndexKind::Secondary,
                        returns: Returns::Entities,
                        fails_with: None,
                    }),
                ));
            }
        }

        artifacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecsgen_schema::{ComponentDecl, SchemaDecl, TypeRef};

    #[test]
    fn test_lookups() {
        let mut decl = SchemaDecl::new();
        decl.components.push(ComponentDecl::new("GameStateComponent").unique());
        decl.components.push(
            ComponentDecl::new("Player")
                .field("player_id", TypeRef::primitive("u32"))
                .field("team", TypeRef::primitive("string"))
                .field("score", TypeRef::primitive("i32"))
                .index("player_id", IndexKind::Primary)
                .index("team", IndexKind::Secondary),
        );
        let schema = Schema::build(decl).schema;

        let artifacts = IndexSynthesizer.synthesize(&schema, &DeriveConfig::default());
        let names: Vec<_> = artifacts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["GameState", "PlayerGetEntityWithPlayerId", "PlayerGetEntitiesWithTeam"]
        );

        let ArtifactBody::UniqueLookup(unique) = &artifacts[0].body else {
            panic!("expected unique lookup");
        };
        assert_eq!(unique.returns, Returns::Entity);
        assert_eq!(unique.fails_with, Failure::Cardinality);

        let ArtifactBody::IndexLookup(primary) = &artifacts[1].body else {
            panic!("expected index lookup");
        };
        assert_eq!(primary.field, "player_id");
        assert_eq!(primary.value.ty, TypeRef::primitive("u32"));
        assert_eq!(primary.returns, Returns::OptionalEntity);
        assert_eq!(primary.fails_with, Some(Failure::Cardinality));

        let ArtifactBody::IndexLookup(secondary) = &artifacts[2].body else {
            panic!("expected index lookup");
        };
        assert_eq!(secondary.returns, Returns::Entities);
        assert_eq!(secondary.fails_with, None);
    }

    #[test]
    fn test_shared_field_name_scoped_by_component() {
        let mut decl = SchemaDecl::new();
        for component in ["Player", "ItemComponent"] {
            decl.components.push(
                ComponentDecl::new(component)
                    .field("id", TypeRef::primitive("u32"))
                    .index("id", IndexKind::Primary),
            );
        }
        let schema = Schema::build(decl).schema;

        let artifacts = IndexSynthesizer.synthesize(&schema, &DeriveConfig::default());
        let names: Vec<_> = artifacts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["PlayerGetEntityWithId", "ItemGetEntityWithId"]);

        let ArtifactBody::IndexLookup(item) = &artifacts[1].body else {
            panic!("expected index lookup");
        };
        assert_eq!(item.component, "Item");
        assert_eq!(item.operation, "GetEntityWithId");
    }

    #[test]
    fn test_plain_component_has_no_lookups() {
        let mut decl = SchemaDecl::new();
        decl.components
            .push(ComponentDecl::new("Velocity").field("dx", TypeRef::primitive("f32")));
        let schema = Schema::build(decl).schema;
        assert!(IndexSynthesizer.synthesize(&schema, &DeriveConfig::default()).is_empty());
    }
}
