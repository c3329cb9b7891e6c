//! The emitter boundary.
//!
//! Rendering artifacts into source text lives outside this crate. An emitter
//! only has to accept artifacts one at a time, in set order.

use crate::artifact::{Artifact, ArtifactSet};

pub trait ArtifactEmitter {
    type Error;

    fn emit(&mut self, artifact: &Artifact) -> Result<(), Self::Error>;
}

impl ArtifactSet {
    /// Feed every artifact to `emitter`, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Whatever the emitter returns.
    pub fn emit_all<E: ArtifactEmitter>(&self, emitter: &mut E) -> Result<usize, E::Error> {
        for artifact in &self.artifacts {
            emitter.emit(artifact)?;
        }
        Ok(self.artifacts.len())
    }
}
