//! Index lookups over a [`ComponentStore`].
//!
//! Every lookup borrows a scratch buffer from a [`ScanPool`], fills it with
//! the holders of the component, filters in place and hands the buffer back
//! when the [`ScanBuffer`] guard drops. The guard makes the release happen on
//! the error paths too.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::component::Component;
use crate::entity::Entity;
use crate::error::{CardinalityError, Expected};
use crate::store::ComponentStore;

/// Free list of reusable entity buffers.
#[derive(Debug, Default)]
pub struct ScanPool {
    free: Mutex<Vec<Vec<Entity>>>,
    leased: AtomicUsize,
}

impl ScanPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lease an empty buffer. It returns to the pool when dropped.
    pub fn acquire(&self) -> ScanBuffer<'_> {
        let entities = self.free.lock().pop().unwrap_or_default();
        self.leased.fetch_add(1, Ordering::Relaxed);
        ScanBuffer {
            pool: self,
            entities,
        }
    }

    /// Buffers sitting in the free list.
    pub fn available(&self) -> usize {
        self.free.lock().len()
    }

    /// Buffers currently leased out.
    pub fn leased(&self) -> usize {
        self.leased.load(Ordering::Relaxed)
    }

    fn release(&self, mut entities: Vec<Entity>) {
        entities.clear();
        self.free.lock().push(entities);
        self.leased.fetch_sub(1, Ordering::Relaxed);
    }
}

/// A leased scan buffer.
#[derive(Debug)]
pub struct ScanBuffer<'a> {
    pool: &'a ScanPool,
    entities: Vec<Entity>,
}

impl Deref for ScanBuffer<'_> {
    type Target = Vec<Entity>;

    fn deref(&self) -> &Self::Target {
        &self.entities
    }
}

impl DerefMut for ScanBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.entities
    }
}

impl Drop for ScanBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.entities));
    }
}

/// Holders of `C` matching `predicate`, in storage order.
pub fn scan<'p, C, S>(
    store: &S,
    pool: &'p ScanPool,
    mut predicate: impl FnMut(&C) -> bool,
) -> ScanBuffer<'p>
where
    C: Component,
    S: ComponentStore,
{
    let mut buffer = pool.acquire();
    store.query::<C>(&mut buffer);
    buffer.retain(|&entity| store.get::<C>(entity).is_some_and(&mut predicate));
    buffer
}

/// The single holder of a unique component.
///
/// # Errors
///
/// [`CardinalityError`] when no entity or more than one entity holds `C`.
pub fn unique<C, S>(store: &S, pool: &ScanPool) -> Result<Entity, CardinalityError>
where
    C: Component,
    S: ComponentStore,
{
    let holders = scan::<C, S>(store, pool, |_| true);
    match holders.as_slice() {
        [entity] => Ok(*entity),
        other => Err(CardinalityError {
            component: C::type_name(),
            expected: Expected::ExactlyOne,
            found: other.len(),
        }),
    }
}

/// Primary index lookup: the holder whose `field` equals `value`, if any.
///
/// # Errors
///
/// [`CardinalityError`] when more than one holder matches.
pub fn entity_with<C, S, V>(
    store: &S,
    pool: &ScanPool,
    field: impl Fn(&C) -> &V,
    value: &V,
) -> Result<Option<Entity>, CardinalityError>
where
    C: Component,
    S: ComponentStore,
    V: PartialEq + ?Sized,
{
    let matches = scan::<C, S>(store, pool, |c| field(c) == value);
    match matches.as_slice() {
        [] => Ok(None),
        [entity] => Ok(Some(*entity)),
        other => Err(CardinalityError {
            component: C::type_name(),
            expected: Expected::AtMostOne,
            found: other.len(),
        }),
    }
}

/// Secondary index lookup: every holder whose `field` equals `value`.
pub fn entities_with<C, S, V>(
    store: &S,
    pool: &ScanPool,
    field: impl Fn(&C) -> &V,
    value: &V,
) -> Vec<Entity>
where
    C: Component,
    S: ComponentStore,
    V: PartialEq + ?Sized,
{
    scan::<C, S>(store, pool, |c| field(c) == value).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::World;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct PlayerId {
        value: u32,
    }

    impl Component for PlayerId {
        fn type_name() -> &'static str {
            "PlayerId"
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Team {
        name: String,
    }

    impl Component for Team {
        fn type_name() -> &'static str {
            "Team"
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct GameState;

    impl Component for GameState {
        fn type_name() -> &'static str {
            "GameState"
        }
    }

    fn player_id(c: &PlayerId) -> &u32 {
        &c.value
    }

    fn team_name(t: &Team) -> &str {
        &t.name
    }

    #[test]
    fn test_primary_lookup() {
        let pool = ScanPool::new();
        let mut world = World::default();
        let a = world.create();
        let b = world.create();
        world.set(a, PlayerId { value: 1 });
        world.set(b, PlayerId { value: 2 });

        assert_eq!(entity_with(&world, &pool, player_id, &2), Ok(Some(b)));
        assert_eq!(entity_with(&world, &pool, player_id, &9), Ok(None));
    }

    #[test]
    fn test_primary_collision_fails_and_releases_buffer() {
        let pool = ScanPool::new();
        let mut world = World::default();
        for _ in 0..2 {
            let e = world.create();
            world.set(e, PlayerId { value: 7 });
        }

        let err = entity_with(&world, &pool, player_id, &7).unwrap_err();
        assert_eq!(err.expected, Expected::AtMostOne);
        assert_eq!(err.found, 2);
        assert_eq!(pool.leased(), 0);
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_secondary_lookup_in_storage_order() {
        let pool = ScanPool::new();
        let mut world = World::default();
        let ids: Vec<_> = (0..4).map(|_| world.create()).collect();
        world.set(ids[3], Team { name: "red".into() });
        world.set(ids[0], Team { name: "red".into() });
        world.set(ids[1], Team { name: "blue".into() });

        let red = entities_with(&world, &pool, team_name, "red");
        assert_eq!(red, vec![ids[0], ids[3]]);
        assert!(entities_with(&world, &pool, team_name, "green").is_empty());
        assert_eq!(pool.leased(), 0);
    }

    #[test]
    fn test_unique_cardinality() {
        let pool = ScanPool::new();
        let mut world = World::default();

        let err = unique::<GameState, _>(&world, &pool).unwrap_err();
        assert_eq!(err.found, 0);

        let e = world.create();
        world.set(e, GameState);
        assert_eq!(unique::<GameState, _>(&world, &pool), Ok(e));

        let other = world.create();
        world.set(other, GameState);
        let err = unique::<GameState, _>(&world, &pool).unwrap_err();
        assert_eq!(err.expected, Expected::ExactlyOne);
        assert_eq!(err.found, 2);
        assert_eq!(pool.leased(), 0);
    }

    #[test]
    fn test_buffers_are_reused() {
        let pool = ScanPool::new();
        {
            let mut first = pool.acquire();
            first.push(Entity::from_raw(1, Default::default()));
            assert_eq!(pool.leased(), 1);
        }
        assert_eq!(pool.available(), 1);
        let second = pool.acquire();
        assert!(second.is_empty());
        assert_eq!(pool.available(), 0);
    }
}
