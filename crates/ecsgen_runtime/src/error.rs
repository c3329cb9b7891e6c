//! Contract violations raised by generated accessors and lookups.

use std::fmt;

use crate::entity::Entity;

/// The entity is in the wrong state for the requested mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntityStateError {
    /// `get` or `remove` on an entity that lacks the component.
    #[error("{entity} does not have component '{component}'")]
    MissingComponent {
        component: &'static str,
        entity: Entity,
    },

    /// `add` on an entity that already holds the component.
    #[error("{entity} already has component '{component}'")]
    DuplicateComponent {
        component: &'static str,
        entity: Entity,
    },
}

/// How many matches a lookup allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// Unique-component accessors.
    ExactlyOne,
    /// Primary index lookups.
    AtMostOne,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::ExactlyOne => f.write_str("exactly one"),
            Expected::AtMostOne => f.write_str("at most one"),
        }
    }
}

/// A unique or primary lookup matched the wrong number of entities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} entity with '{component}', found {found}")]
pub struct CardinalityError {
    pub component: &'static str,
    pub expected: Expected,
    pub found: usize,
}
