//! MessagePack codec for artifact sets.
//!
//! The encoded form is what downstream emitters consume and what the
//! determinism checks compare byte for byte.

use crate::artifact::ArtifactSet;

/// Errors that can occur while encoding or decoding artifacts.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Failed to encode artifacts to MessagePack.
    #[error("failed to encode artifacts: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Failed to decode artifacts from MessagePack.
    #[error("failed to decode artifacts: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

impl ArtifactSet {
    /// Encode the set to MessagePack bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Encode`] if serialisation fails.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        Ok(rmp_serde::to_vec(self)?)
    }

    /// Decode a set from MessagePack bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] if deserialisation fails.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{Artifact, ArtifactBody, ManifestEntry, RegistrationManifest};
    use ecsgen_schema::PriorityTier;

    #[test]
    fn test_encode_decode_manifest() {
        let mut set = ArtifactSet::new();
        set.extend([Artifact::new(
            "GameSystems",
            ArtifactBody::Manifest(RegistrationManifest {
                entries: vec![ManifestEntry {
                    system: "Physics".into(),
                    namespace: "game".into(),
                    tier: PriorityTier::High,
                    order: -1,
                    conditional_on_debug: true,
                }],
            }),
        )]);

        let bytes = set.encode().unwrap();
        assert_eq!(ArtifactSet::decode(&bytes).unwrap(), set);
    }

    #[test]
    fn test_decode_invalid_bytes() {
        assert!(matches!(
            ArtifactSet::decode(&[0xFF, 0xFF]),
            Err(CodecError::Decode(_))
        ));
    }
}
