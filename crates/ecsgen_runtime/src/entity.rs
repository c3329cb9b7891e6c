//! Entity handles and allocation.
//!
//! An [`Entity`] is an opaque value: a numeric id plus the [`WorldId`] of the
//! world that owns it. Generated code only compares and copies entities; it
//! never creates or destroys them itself.

use serde::{Deserialize, Serialize};

/// Identifies one world (storage partition). Reactive systems filter on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct WorldId(pub u32);

/// An entity handle.
///
/// Entities are pure identifiers. Ordering is by id first, which is also the
/// natural iteration order of the reference [`World`](crate::World).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity {
    id: u64,
    world: WorldId,
}

impl Entity {
    /// Build an entity from a raw id inside `world`.
    #[must_use]
    pub const fn from_raw(id: u64, world: WorldId) -> Self {
        Self { id, world }
    }

    #[must_use]
    pub const fn id(self) -> u64 {
        self.id
    }

    #[must_use]
    pub const fn world(self) -> WorldId {
        self.world
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}@{})", self.id, self.world.0)
    }
}

/// Hands out monotonically increasing entity ids for one world.
#[derive(Debug)]
pub struct EntityAllocator {
    world: WorldId,
    next_id: u64,
}

impl EntityAllocator {
    /// Ids start at 1.
    #[must_use]
    pub fn new(world: WorldId) -> Self {
        Self { world, next_id: 1 }
    }

    pub fn allocate(&mut self) -> Entity {
        let id = self.next_id;
        self.next_id += 1;
        Entity::from_raw(id, self.world)
    }

    /// Number of entities allocated so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.next_id - 1
    }
}
