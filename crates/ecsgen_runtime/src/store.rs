//! Component store contract and the in-memory reference world.
//!
//! Generated accessors and lookups only ever talk to a [`ComponentStore`].
//! [`World`] keeps one ordered column per component type, keyed by
//! [`ComponentTypeId`], and is what the tests run against.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::error;

use crate::component::{Component, ComponentTypeId};
use crate::entity::{Entity, EntityAllocator, WorldId};

/// The storage operations generated code consumes.
pub trait ComponentStore {
    /// Allocate a fresh entity.
    fn create(&mut self) -> Entity;

    fn get<C: Component>(&self, entity: Entity) -> Option<&C>;

    fn has<C: Component>(&self, entity: Entity) -> bool {
        self.get::<C>(entity).is_some()
    }

    /// Insert or overwrite, returning the previous value.
    fn set<C: Component>(&mut self, entity: Entity, value: C) -> Option<C>;

    /// Detach, returning the removed value.
    fn remove<C: Component>(&mut self, entity: Entity) -> Option<C>;

    /// Append every entity holding `C` to `out`, in storage order.
    fn query<C: Component>(&self, out: &mut Vec<Entity>);
}

/// Type-erased column so a despawn can sweep every component type.
trait Column: Send + Sync {
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> Column for BTreeMap<Entity, C> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(&entity).is_some()
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// In-memory world: entity set plus one column per component type.
pub struct World {
    id: WorldId,
    allocator: EntityAllocator,
    entities: BTreeSet<Entity>,
    columns: HashMap<ComponentTypeId, Box<dyn Column>>,
}

impl World {
    pub fn new(id: WorldId) -> Self {
        Self {
            id,
            allocator: EntityAllocator::new(id),
            entities: BTreeSet::new(),
            columns: HashMap::new(),
        }
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    /// Check if an entity exists.
    pub fn exists(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Return the count of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of entities holding `C`.
    pub fn count<C: Component>(&self) -> usize {
        self.columns
            .get(&C::component_type_id())
            .map(|c| c.len())
            .unwrap_or(0)
    }

    /// Destroy an entity and every component it holds.
    ///
    /// Returns `false` if the entity was not alive.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.remove(&entity) {
            return false;
        }
        for column in self.columns.values_mut() {
            column.remove_entity(entity);
        }
        true
    }

    fn column<C: Component>(&self) -> Option<&BTreeMap<Entity, C>> {
        self.columns
            .get(&C::component_type_id())
            .and_then(|c| c.as_any().downcast_ref::<BTreeMap<Entity, C>>())
    }

    fn column_mut<C: Component>(&mut self) -> Option<&mut BTreeMap<Entity, C>> {
        self.columns
            .entry(C::component_type_id())
            .or_insert_with(|| Box::new(BTreeMap::<Entity, C>::new()))
            .as_any_mut()
            .downcast_mut::<BTreeMap<Entity, C>>()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldId::default())
    }
}

impl ComponentStore for World {
    fn create(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        self.entities.insert(entity);
        entity
    }

    fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.column::<C>()?.get(&entity)
    }

    fn set<C: Component>(&mut self, entity: Entity, value: C) -> Option<C> {
        self.entities.insert(entity);
        let Some(column) = self.column_mut::<C>() else {
            // Two component types hash to the same id; the column holds the other one.
            error!(
                component = C::type_name(),
                id = C::component_type_id().0,
                "component type id bound to another type, value dropped"
            );
            debug_assert!(
                false,
                "component type id collision for '{}'",
                C::type_name()
            );
            return None;
        };
        column.insert(entity, value)
    }

    fn remove<C: Component>(&mut self, entity: Entity) -> Option<C> {
        self.columns
            .get_mut(&C::component_type_id())?
            .as_any_mut()
            .downcast_mut::<BTreeMap<Entity, C>>()?
            .remove(&entity)
    }

    fn query<C: Component>(&self, out: &mut Vec<Entity>) {
        if let Some(column) = self.column::<C>() {
            out.extend(column.keys().copied());
        }
    }
}
