//! Shared append-only command buffer.
//!
//! One [`CommandBuffer`] is created per world/session and passed by
//! reference into every generated accessor and command constructor. Records
//! are grouped into one channel per record type.
//!
//! ## Phase discipline
//!
//! Within a tick, producers append (possibly from several threads, the
//! channels are sharded), then the dispatch phase reads and clears. Reading
//! and appending the same tick's records concurrently is not supported.

use std::any::{Any, TypeId};

use dashmap::DashMap;

/// Typed, append-only record channels keyed by record type.
#[derive(Default)]
pub struct CommandBuffer {
    channels: DashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl CommandBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one record to the channel of its type.
    pub fn create<T: Send + Sync + 'static>(&self, record: T) {
        let mut channel = self
            .channels
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Vec::<T>::new()));
        if let Some(records) = channel.value_mut().downcast_mut::<Vec<T>>() {
            records.push(record);
        }
    }

    /// Copy out the records of type `T`, in append order.
    ///
    /// The channel lock is released before returning, so consumers may append
    /// to other channels while processing the copy.
    #[must_use]
    pub fn snapshot<T: Clone + Send + Sync + 'static>(&self) -> Vec<T> {
        self.channels
            .get(&TypeId::of::<T>())
            .and_then(|channel| channel.value().downcast_ref::<Vec<T>>().cloned())
            .unwrap_or_default()
    }

    /// Take every record of type `T`, leaving the channel empty.
    #[must_use]
    pub fn drain<T: Send + Sync + 'static>(&self) -> Vec<T> {
        let Some(mut channel) = self.channels.get_mut(&TypeId::of::<T>()) else {
            return Vec::new();
        };
        let drained = channel
            .value_mut()
            .downcast_mut::<Vec<T>>()
            .map(std::mem::take)
            .unwrap_or_default();
        drained
    }

    /// Number of buffered records of type `T`.
    #[must_use]
    pub fn len<T: Send + Sync + 'static>(&self) -> usize {
        self.channels
            .get(&TypeId::of::<T>())
            .and_then(|channel| channel.value().downcast_ref::<Vec<T>>().map(Vec::len))
            .unwrap_or(0)
    }

    /// Discard every record of type `T`.
    pub fn clear<T: Send + Sync + 'static>(&self) {
        self.clear_type(TypeId::of::<T>());
    }

    /// Discard every record of the channel identified by `type_id`.
    ///
    /// The channel itself is dropped; it is recreated on the next append.
    pub fn clear_type(&self, type_id: TypeId) {
        self.channels.remove(&type_id);
    }

    /// `true` when no channel holds records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl std::fmt::Debug for CommandBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBuffer")
            .field("channels", &self.channels.len())
            .finish()
    }
}
