//! Per-component mutation API and lifecycle record shapes.

use std::collections::BTreeSet;

use ecsgen_schema::{ComponentSchema, FieldSchema, Schema, TypeRef};

use crate::artifact::*;
use crate::config::DeriveConfig;
use crate::pipeline::Synthesizer;

#[derive(Debug, Default)]
pub struct AccessorSynthesizer;

impl Synthesizer for AccessorSynthesizer {
    fn name(&self) -> &'static str {
        "accessors"
    }

    fn synthesize(&self, schema: &Schema, cfg: &DeriveConfig) -> Vec<Artifact> {
        schema
            .components()
            .iter()
            .map(|component| {
                let module = accessor_module(component, cfg);
                Artifact::new(
                    format!("{}Accessors", module.component),
                    ArtifactBody::Accessors(module),
                )
            })
            .collect()
    }
}

/// The source type of a component, as referenced from emitted code.
pub(crate) fn source_type(component: &ComponentSchema) -> TypeRef {
    TypeRef::named(&component.namespace, &component.name)
}

/// `On<C><Kind>`
pub(crate) fn record_name(component: &str, kind: LifecycleKind) -> String {
    format!("On{component}{}", kind.as_str())
}

fn accessor_module(component: &ComponentSchema, cfg: &DeriveConfig) -> AccessorModule {
    let name = cfg.component_name(&component.name).to_string();
    let source = source_type(component);
    let fields: Vec<Param> = component
        .fields
        .iter()
        .map(|f| Param::new(&f.name, f.ty.clone()))
        .collect();

    let by_field = || -> Vec<Param> {
        std::iter::once(Param::entity())
            .chain(fields.iter().cloned())
            .collect()
    };

    let operations = vec![
        AccessorOp {
            name: format!("Get{name}"),
            kind: AccessorKind::Get,
            params: vec![Param::entity()],
            returns: Returns::Component(source.clone()),
            fails_with: Some(Failure::MissingComponent),
            buffers: None,
        },
        AccessorOp {
            name: format!("Has{name}"),
            kind: AccessorKind::Has,
            params: vec![Param::entity()],
            returns: Returns::Bool,
            fails_with: None,
            buffers: None,
        },
        AccessorOp {
            name: format!("Add{name}"),
            kind: AccessorKind::Add,
            params: by_field(),
            returns: Returns::Unit,
            fails_with: Some(Failure::DuplicateComponent),
            buffers: Some(LifecycleKind::Added),
        },
        AccessorOp {
            name: format!("Replace{name}"),
            kind: AccessorKind::Replace,
            params: by_field(),
            returns: Returns::Unit,
            fails_with: None,
            buffers: Some(LifecycleKind::Changed),
        },
        AccessorOp {
            name: format!("Remove{name}"),
            kind: AccessorKind::Remove,
            params: vec![Param::entity()],
            returns: Returns::Unit,
            fails_with: Some(Failure::MissingComponent),
            buffers: Some(LifecycleKind::Removed),
        },
    ];

    let events = LifecycleKind::ALL
        .into_iter()
        .map(|kind| {
            let mut fields = vec![Param::entity()];
            match kind {
                LifecycleKind::Added => fields.push(Param::new("new", source.clone())),
                LifecycleKind::Removed => {}
                LifecycleKind::Changed => {
                    fields.push(Param::new("old", source.clone()));
                    fields.push(Param::new("new", source.clone()));
                }
            }
            EventRecord {
                name: record_name(&name, kind),
                kind,
                fields,
            }
        })
        .collect();

    AccessorModule {
        render: render_rule(&component.fields),
        imports: imports(component),
        component: name,
        source,
        fields,
        operations,
        events,
    }
}

fn render_rule(fields: &[FieldSchema]) -> Option<RenderRule> {
    match fields {
        [] => None,
        [single] => Some(RenderRule::Single(single.name.clone())),
        many => Some(RenderRule::Delimited(
            many.iter().map(|f| f.name.clone()).collect(),
        )),
    }
}

/// Namespaces the emitted module needs, sorted.
fn imports(component: &ComponentSchema) -> Vec<String> {
    let mut namespaces = BTreeSet::new();
    if !component.namespace.is_empty() {
        namespaces.insert(component.namespace.clone());
    }
    for field in &component.fields {
        if let Some(ns) = field.ty.namespace() {
            namespaces.insert(ns.to_string());
        }
    }
    namespaces.into_iter().collect()
}
