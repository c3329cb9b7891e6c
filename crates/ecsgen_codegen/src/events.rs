//! Event dispatch artifacts.
//!
//! Dispatch systems exist only for event-producing components. Reactive
//! systems and the clear system cover every component, since every accessor
//! buffers lifecycle records whether or not anything dispatches them.

use ecsgen_schema::Schema;

use crate::accessor::record_name;
use crate::artifact::*;
use crate::config::DeriveConfig;
use crate::pipeline::Synthesizer;

/// Name of the system that clears raw lifecycle channels.
pub const CLEAR_SYSTEM_NAME: &str = "ClearEventCommandsSystem";

/// Name of the manifest that installs dispatch systems and the clear system.
pub const EVENT_SYSTEMS_NAME: &str = "GameEventSystems";

#[derive(Debug, Default)]
pub struct EventCoalescer;

impl Synthesizer for EventCoalescer {
    fn name(&self) -> &'static str {
        "events"
    }

    fn synthesize(&self, schema: &Schema, cfg: &DeriveConfig) -> Vec<Artifact> {
        let mut artifacts = Vec::new();
        let mut dispatch_names = Vec::new();

        for component in schema.event_components() {
            let name = cfg.component_name(&component.name);
            for kind in LifecycleKind::ALL {
                let system = format!("On{name}{}EventSystem", kind.as_str());
                dispatch_names.push(system.clone());
                artifacts.push(Artifact::new(
                    system,
                    ArtifactBody::Dispatch(DispatchSystem {
                        component: name.to_string(),
                        record: record_name(name, kind),
                        kind,
                        suppress_unchanged: kind == LifecycleKind::Changed,
                        clean_up: !cfg.emit_clear_system,
                    }),
                ));
            }
        }

        if cfg.emit_reactive {
            for component in schema.components() {
                let name = cfg.component_name(&component.name);
                for kind in LifecycleKind::ALL {
                    artifacts.push(Artifact::new(
                        format!("On{name}{}ReactiveSystem", kind.as_str()),
                        ArtifactBody::Reactive(ReactiveSystem {
                            component: name.to_string(),
                            record: record_name(name, kind),
                            kind,
                            suppress_unchanged: kind == LifecycleKind::Changed,
                        }),
                    ));
                }
            }
        }

        if cfg.emit_clear_system {
            let records = schema
                .components()
                .iter()
                .flat_map(|component| {
                    let name = cfg.component_name(&component.name);
                    LifecycleKind::ALL.map(|kind| record_name(name, kind))
                })
                .collect();
            artifacts.push(Artifact::new(
                CLEAR_SYSTEM_NAME,
                ArtifactBody::ClearEvents(ClearEventsSystem { records }),
            ));

            dispatch_names.push(CLEAR_SYSTEM_NAME.to_string());
            artifacts.push(Artifact::new(
                EVENT_SYSTEMS_NAME,
                ArtifactBody::EventSystems(EventSystemsManifest {
                    systems: dispatch_names,
                }),
            ));
        }

        artifacts
    }
}
