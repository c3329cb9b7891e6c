//! # ecsgen_codegen
//!
//! Derives the artifact tree for an ECS schema: accessors, event dispatch,
//! lookups, system registration and command constructors.
//!
//! This crate provides:
//!
//! - [`Synthesizer`] implementations, one per artifact family.
//! - [`derive`] / [`run`]: the pipeline over a validated or raw schema.
//! - [`ArtifactSet`]: the ordered output, with a MessagePack codec and a
//!   JSON view.
//! - [`ArtifactEmitter`]: the contract an external emitter implements.
//! - [`DeriveConfig`]: naming and emission knobs.

pub mod accessor;
pub mod artifact;
pub mod codec;
pub mod commands;
pub mod config;
pub mod emitter;
pub mod events;
pub mod index;
pub mod naming;
pub mod pipeline;
pub mod registration;

pub use accessor::AccessorSynthesizer;
pub use artifact::{Artifact, ArtifactBody, ArtifactSet, RegistrationManifest, SystemContainer};
pub use codec::CodecError;
pub use commands::CommandConstructorSynthesizer;
pub use config::DeriveConfig;
pub use emitter::ArtifactEmitter;
pub use events::EventCoalescer;
pub use index::IndexSynthesizer;
pub use pipeline::{Derivation, Synthesizer, derive, run};
pub use registration::RegistrationPlanner;
