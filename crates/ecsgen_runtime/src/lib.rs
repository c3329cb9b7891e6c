//! # ecsgen_runtime
//!
//! The runtime contracts generated ECS code is written against, plus an
//! in-memory reference store to run it on.
//!
//! This crate provides:
//!
//! - [`Component`] and [`ComponentStore`]: what generated accessors need
//!   from the host ECS.
//! - [`CommandBuffer`]: the typed, append-only per-tick record buffer.
//! - [`accessor`]: `get`/`has`/`add`/`replace`/`remove` with lifecycle
//!   records.
//! - [`CoalescingDispatcher`] and [`ReactiveSystem`]: the two ways buffered
//!   records reach observers.
//! - [`index`]: unique, primary and secondary lookups over a [`ScanPool`].
//! - [`EventSchedule`]: runs the dispatch phase at the end of a tick.

pub mod accessor;
pub mod buffer;
pub mod component;
pub mod dispatch;
pub mod entity;
pub mod error;
pub mod events;
pub mod index;
pub mod reactive;
pub mod render;
pub mod schedule;
pub mod store;

pub use buffer::CommandBuffer;
pub use component::{Component, ComponentTypeId};
pub use dispatch::{
    BufferSystem, ClearEventsSystem, CoalescingDispatcher, CommandSystem, Dispatchable,
    EventSink, EventSystem, FnSink, event_system,
};
pub use entity::{Entity, EntityAllocator, WorldId};
pub use error::{CardinalityError, EntityStateError, Expected};
pub use events::{Added, Changed, EventKind, LifecycleEvent, Removed};
pub use index::{ScanBuffer, ScanPool};
pub use reactive::{ReactiveSystem, reactive};
pub use render::render_fields;
pub use schedule::EventSchedule;
pub use store::{ComponentStore, World};
