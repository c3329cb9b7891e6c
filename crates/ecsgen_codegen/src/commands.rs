//! Command-buffer convenience constructors.

use std::collections::BTreeSet;

use ecsgen_schema::{CommandSchema, Schema, TypeRef};

use crate::artifact::*;
use crate::config::DeriveConfig;
use crate::naming::first_char_lower;
use crate::pipeline::Synthesizer;

/// Name of the module holding every constructor.
pub const COMMANDS_NAME: &str = "CommandBufferExtensions";

#[derive(Debug, Default)]
pub struct CommandConstructorSynthesizer;

impl Synthesizer for CommandConstructorSynthesizer {
    fn name(&self) -> &'static str {
        "commands"
    }

    fn synthesize(&self, schema: &Schema, cfg: &DeriveConfig) -> Vec<Artifact> {
        if schema.commands().is_empty() {
            return Vec::new();
        }

        let mut imports = BTreeSet::new();
        let constructors = schema
            .commands()
            .iter()
            .map(|command| {
                if !command.namespace.is_empty() {
                    imports.insert(command.namespace.clone());
                }
                for field in &command.fields {
                    if let Some(ns) = field.ty.namespace() {
                        imports.insert(ns.to_string());
                    }
                }
                constructor(command, cfg)
            })
            .collect();

        vec![Artifact::new(
            COMMANDS_NAME,
            ArtifactBody::Commands(CommandModule {
                constructors,
                imports: imports.into_iter().collect(),
            }),
        )]
    }
}

fn constructor(command: &CommandSchema, cfg: &DeriveConfig) -> CommandConstructor {
    let params: Vec<Param> = command
        .fields
        .iter()
        .map(|f| Param::new(first_char_lower(&f.name), f.ty.clone()))
        .collect();
    let assignments = command
        .fields
        .iter()
        .zip(&params)
        .map(|(field, param)| (field.name.clone(), param.name.clone()))
        .collect();

    CommandConstructor {
        name: cfg.command_name(&command.name).to_string(),
        command: TypeRef::named(&command.namespace, &command.name),
        params,
        assignments,
    }
}
