//! Lifecycle event records buffered by generated accessors.
//!
//! Every component yields the same three record shapes. Payloads are owned
//! copies of the component value, never references into storage.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Added,
    Removed,
    Changed,
}

/// A buffered record that belongs to one entity.
pub trait LifecycleEvent: Clone + Send + Sync + 'static {
    const KIND: EventKind;

    fn entity(&self) -> Entity;

    /// A record that carries no observable change and must not be fired.
    fn is_noop(&self) -> bool {
        false
    }
}

/// `C` was attached to `entity`.
#[derive(Debug, Clone, PartialEq)]
pub struct Added<C> {
    pub entity: Entity,
    pub new: C,
}

/// `C` was detached from `entity`.
#[derive(Debug, Clone, PartialEq)]
pub struct Removed<C> {
    pub entity: Entity,
    component: PhantomData<fn() -> C>,
}

impl<C> Removed<C> {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            component: PhantomData,
        }
    }
}

/// `C` on `entity` was upserted from `old` to `new`.
#[derive(Debug, Clone, PartialEq)]
pub struct Changed<C> {
    pub entity: Entity,
    pub old: C,
    pub new: C,
}

impl<C: Component> LifecycleEvent for Added<C> {
    const KIND: EventKind = EventKind::Added;

    fn entity(&self) -> Entity {
        self.entity
    }
}

impl<C: Component> LifecycleEvent for Removed<C> {
    const KIND: EventKind = EventKind::Removed;

    fn entity(&self) -> Entity {
        self.entity
    }
}

impl<C: Component> LifecycleEvent for Changed<C> {
    const KIND: EventKind = EventKind::Changed;

    fn entity(&self) -> Entity {
        self.entity
    }

    fn is_noop(&self) -> bool {
        self.old == self.new
    }
}
