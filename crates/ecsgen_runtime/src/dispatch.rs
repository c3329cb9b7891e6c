//! Event dispatch: coalescing per-tick lifecycle records into fired events.
//!
//! A [`CoalescingDispatcher`] sees every raw record of one type buffered
//! during a tick and fires at most one event per entity, the last one
//! written. Distinct entities fire in the order they were first seen.
//!
//! ```text
//! raw:    A(e1,1) A(e2,5) A(e1,2) A(e1,3)
//! fired:  A(e1,3) A(e2,5)
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::marker::PhantomData;

use tracing::debug;

use crate::buffer::CommandBuffer;
use crate::component::Component;
use crate::entity::Entity;
use crate::events::{Added, Changed, LifecycleEvent, Removed};

/// Receives fired events. Stands in for the host event bus.
pub trait EventSink<E> {
    fn fire(&mut self, event: &E);
}

/// Collects fired events, mostly useful in tests and tools.
impl<E: Clone> EventSink<E> for Vec<E> {
    fn fire(&mut self, event: &E) {
        self.push(event.clone());
    }
}

/// Adapts a closure into an [`EventSink`].
pub struct FnSink<F>(pub F);

impl<E, F: FnMut(&E)> EventSink<E> for FnSink<F> {
    fn fire(&mut self, event: &E) {
        (self.0)(event)
    }
}

/// Capability shared by everything that consumes one tick of raw records.
pub trait Dispatchable<E> {
    fn dispatch(&mut self, records: &[E]);
}

/// Something the [`EventSchedule`](crate::EventSchedule) runs once per tick.
pub trait CommandSystem {
    fn name(&self) -> &str;

    fn run(&mut self, buffer: &CommandBuffer);
}

/// Per-entity last-write-wins dispatcher.
pub struct CoalescingDispatcher<E, S> {
    /// Entity -> slot in `pending`.
    slots: HashMap<Entity, usize>,
    pending: Vec<E>,
    sink: S,
}

impl<E: LifecycleEvent, S: EventSink<E>> CoalescingDispatcher<E, S> {
    pub fn new(sink: S) -> Self {
        Self {
            slots: HashMap::new(),
            pending: Vec::new(),
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<E: LifecycleEvent, S: EventSink<E>> Dispatchable<E> for CoalescingDispatcher<E, S> {
    fn dispatch(&mut self, records: &[E]) {
        self.slots.clear();
        self.pending.clear();

        for record in records {
            match self.slots.entry(record.entity()) {
                Entry::Occupied(slot) => self.pending[*slot.get()] = record.clone(),
                Entry::Vacant(slot) => {
                    slot.insert(self.pending.len());
                    self.pending.push(record.clone());
                }
            }
        }

        for event in self.pending.drain(..) {
            if !event.is_noop() {
                self.sink.fire(&event);
            }
        }
        self.slots.clear();
    }
}

/// Binds a [`Dispatchable`] to the buffer channel of `E`.
///
/// With `clean_up` set, the channel is cleared after dispatch. Otherwise a
/// [`ClearEventsSystem`] later in the tick is expected to do it.
pub struct BufferSystem<E, D> {
    name: String,
    inner: D,
    clean_up: bool,
    records: PhantomData<fn(E)>,
}

impl<E, D> BufferSystem<E, D>
where
    E: LifecycleEvent,
    D: Dispatchable<E>,
{
    pub fn new(name: impl Into<String>, inner: D) -> Self {
        Self {
            name: name.into(),
            inner,
            clean_up: false,
            records: PhantomData,
        }
    }

    #[must_use]
    pub fn with_clean_up(mut self, clean_up: bool) -> Self {
        self.clean_up = clean_up;
        self
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut D {
        &mut self.inner
    }
}

impl<E, D> CommandSystem for BufferSystem<E, D>
where
    E: LifecycleEvent,
    D: Dispatchable<E>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, buffer: &CommandBuffer) {
        let records = buffer.snapshot::<E>();
        self.inner.dispatch(&records);
        if self.clean_up {
            buffer.clear::<E>();
        }
    }
}

/// A coalescing dispatcher wired to the buffer.
pub type EventSystem<E, S> = BufferSystem<E, CoalescingDispatcher<E, S>>;

/// Build the dispatch system for one event record type.
pub fn event_system<E, S>(name: impl Into<String>, sink: S) -> EventSystem<E, S>
where
    E: LifecycleEvent,
    S: EventSink<E>,
{
    BufferSystem::new(name, CoalescingDispatcher::new(sink))
}

/// Clears the raw lifecycle channels at the end of the dispatch phase.
#[derive(Debug, Default)]
pub struct ClearEventsSystem {
    channels: Vec<(TypeId, &'static str)>,
}

impl ClearEventsSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the channel of record type `T`.
    #[must_use]
    pub fn with<T: Send + Sync + 'static>(mut self) -> Self {
        self.channels
            .push((TypeId::of::<T>(), std::any::type_name::<T>()));
        self
    }

    /// Clear all three lifecycle channels of `C`.
    #[must_use]
    pub fn with_component<C: Component>(self) -> Self {
        self.with::<Added<C>>()
            .with::<Removed<C>>()
            .with::<Changed<C>>()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Record type names of the cleared channels, in registration order.
    pub fn channel_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.channels.iter().map(|(_, name)| *name)
    }
}

impl CommandSystem for ClearEventsSystem {
    fn name(&self) -> &str {
        "ClearEventCommandsSystem"
    }

    fn run(&mut self, buffer: &CommandBuffer) {
        for (type_id, channel) in &self.channels {
            debug!(channel = *channel, "clearing lifecycle channel");
            buffer.clear_type(*type_id);
        }
    }
}
