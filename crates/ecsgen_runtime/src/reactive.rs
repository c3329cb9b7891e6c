//! Reactive systems: per-record callbacks composed from closures.
//!
//! Unlike the coalescing dispatcher, a [`ReactiveSystem`] sees every raw
//! record of the tick. It only reacts to records from its own world that
//! pass the entity filter, and it never buffers or fires anything itself.

use std::marker::PhantomData;

use crate::dispatch::Dispatchable;
use crate::entity::{Entity, WorldId};
use crate::events::LifecycleEvent;

pub struct ReactiveSystem<E, F, X> {
    world: WorldId,
    filter: F,
    execute: X,
    records: PhantomData<fn(&E)>,
}

impl<E, F, X> ReactiveSystem<E, F, X>
where
    E: LifecycleEvent,
    F: FnMut(Entity) -> bool,
    X: FnMut(&E),
{
    pub fn new(world: WorldId, filter: F, execute: X) -> Self {
        Self {
            world,
            filter,
            execute,
            records: PhantomData,
        }
    }

    pub fn world(&self) -> WorldId {
        self.world
    }
}

impl<E, F, X> Dispatchable<E> for ReactiveSystem<E, F, X>
where
    E: LifecycleEvent,
    F: FnMut(Entity) -> bool,
    X: FnMut(&E),
{
    fn dispatch(&mut self, records: &[E]) {
        for record in records {
            let entity = record.entity();
            if entity.world() != self.world || !(self.filter)(entity) || record.is_noop() {
                continue;
            }
            (self.execute)(record);
        }
    }
}

/// A reactive system that accepts every entity of `world`.
pub fn reactive<E, X>(
    world: WorldId,
    execute: X,
) -> ReactiveSystem<E, impl FnMut(Entity) -> bool, X>
where
    E: LifecycleEvent,
    X: FnMut(&E),
{
    ReactiveSystem::new(world, |_: Entity| true, execute)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::CommandBuffer;
    use crate::component::Component;
    use crate::dispatch::{BufferSystem, CommandSystem};
    use crate::events::{Added, Changed};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Armor(u32);

    impl Component for Armor {
        fn type_name() -> &'static str {
            "Armor"
        }
    }

    fn changed(id: u64, world: u32, old: u32, new: u32) -> Changed<Armor> {
        Changed {
            entity: Entity::from_raw(id, WorldId(world)),
            old: Armor(old),
            new: Armor(new),
        }
    }

    #[test]
    fn test_sees_every_record_without_coalescing() {
        let mut seen = Vec::new();
        let mut system = reactive(WorldId(0), |e: &Changed<Armor>| seen.push(e.new.0));
        system.dispatch(&[changed(1, 0, 0, 1), changed(1, 0, 1, 2), changed(2, 0, 0, 7)]);
        drop(system);
        assert_eq!(seen, vec![1, 2, 7]);
    }

    #[test]
    fn test_filters_world_predicate_and_noops() {
        let mut seen = Vec::new();
        let mut system = ReactiveSystem::new(
            WorldId(1),
            |e: Entity| e.id() != 3,
            |e: &Changed<Armor>| seen.push(e.entity.id()),
        );
        system.dispatch(&[
            changed(1, 0, 0, 1), // other world
            changed(2, 1, 5, 5), // unchanged
            changed(3, 1, 0, 1), // filtered out
            changed(4, 1, 0, 1),
        ]);
        drop(system);
        assert_eq!(seen, vec![4]);
    }

    #[test]
    fn test_reactive_never_clears_buffer() {
        let buffer = CommandBuffer::new();
        let e = Entity::from_raw(1, WorldId(0));
        buffer.create(Added { entity: e, new: Armor(2) });

        let mut count = 0;
        {
            let mut system = BufferSystem::new(
                "OnArmorAddedReactiveSystem",
                reactive(WorldId(0), |_: &Added<Armor>| count += 1),
            );
            system.run(&buffer);
        }
        assert_eq!(count, 1);
        assert_eq!(buffer.len::<Added<Armor>>(), 1);
    }
}
