//! Mutation API behind every generated component accessor.
//!
//! A generated `add_health(store, buffer, entity, current, max)` builds the
//! component by field name and forwards to [`add`]; the same holds for the
//! other operations. The command buffer is always an explicit argument.

use crate::buffer::CommandBuffer;
use crate::component::Component;
use crate::entity::Entity;
use crate::error::EntityStateError;
use crate::events::{Added, Changed, Removed};
use crate::store::ComponentStore;

/// Borrow `C` from `entity`.
///
/// # Errors
///
/// [`EntityStateError::MissingComponent`] if the entity lacks `C`.
pub fn get<C: Component, S: ComponentStore>(
    store: &S,
    entity: Entity,
) -> Result<&C, EntityStateError> {
    store
        .get::<C>(entity)
        .ok_or(EntityStateError::MissingComponent {
            component: C::type_name(),
            entity,
        })
}

pub fn has<C: Component, S: ComponentStore>(store: &S, entity: Entity) -> bool {
    store.has::<C>(entity)
}

/// Attach `value` and buffer one `Added` record.
///
/// # Errors
///
/// [`EntityStateError::DuplicateComponent`] if the entity already holds `C`.
/// Nothing is buffered in that case.
pub fn add<C: Component, S: ComponentStore>(
    store: &mut S,
    buffer: &CommandBuffer,
    entity: Entity,
    value: C,
) -> Result<(), EntityStateError> {
    if store.has::<C>(entity) {
        return Err(EntityStateError::DuplicateComponent {
            component: C::type_name(),
            entity,
        });
    }
    store.set(entity, value.clone());
    buffer.create(Added { entity, new: value });
    Ok(())
}

/// Upsert `value` and buffer one `Changed` record.
///
/// When the entity did not hold `C`, `old` is `C::default()`.
pub fn replace<C: Component, S: ComponentStore>(
    store: &mut S,
    buffer: &CommandBuffer,
    entity: Entity,
    value: C,
) {
    let old = store.set(entity, value.clone()).unwrap_or_default();
    buffer.create(Changed {
        entity,
        old,
        new: value,
    });
}

/// Detach `C` and buffer one `Removed` record.
///
/// # Errors
///
/// [`EntityStateError::MissingComponent`] if the entity lacks `C`.
pub fn remove<C: Component, S: ComponentStore>(
    store: &mut S,
    buffer: &CommandBuffer,
    entity: Entity,
) -> Result<(), EntityStateError> {
    store
        .remove::<C>(entity)
        .ok_or(EntityStateError::MissingComponent {
            component: C::type_name(),
            entity,
        })?;
    buffer.create(Removed::<C>::new(entity));
    Ok(())
}
