//! Priority-ordered system registration.

use ecsgen_schema::Schema;
use tracing::debug;

use crate::artifact::*;
use crate::config::DeriveConfig;
use crate::pipeline::Synthesizer;

/// Name of the registration manifest artifact.
pub const MANIFEST_NAME: &str = "GameSystems";

#[derive(Debug, Default)]
pub struct RegistrationPlanner;

impl RegistrationPlanner {
    /// Order the declared systems: tier first, then ascending `order`.
    /// Ties keep declaration order.
    pub fn plan(schema: &Schema) -> RegistrationManifest {
        let mut entries: Vec<ManifestEntry> = schema
            .systems()
            .iter()
            .map(|s| ManifestEntry {
                system: s.name.clone(),
                namespace: s.namespace.clone(),
                tier: s.tier,
                order: s.order,
                conditional_on_debug: s.debug_only,
            })
            .collect();
        // Stable sort.
        entries.sort_by_key(|e| (e.tier, e.order));

        debug!(systems = entries.len(), "planned system registration");
        RegistrationManifest { entries }
    }
}

impl Synthesizer for RegistrationPlanner {
    fn name(&self) -> &'static str {
        "registration"
    }

    fn synthesize(&self, schema: &Schema, _cfg: &DeriveConfig) -> Vec<Artifact> {
        vec![Artifact::new(
            MANIFEST_NAME,
            ArtifactBody::Manifest(Self::plan(schema)),
        )]
    }
}
