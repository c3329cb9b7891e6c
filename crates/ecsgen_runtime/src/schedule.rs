//! Dispatch phase of a tick.
//!
//! Producers append to the [`CommandBuffer`] while systems run. At the end of
//! the tick the schedule runs every registered [`CommandSystem`] in
//! registration order: the dispatch systems first, then the clear system.

use tracing::debug;

use crate::buffer::CommandBuffer;
use crate::dispatch::CommandSystem;

#[derive(Default)]
pub struct EventSchedule {
    tick_id: u64,
    systems: Vec<Box<dyn CommandSystem>>,
}

impl EventSchedule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a system. Systems run in the order they were added.
    pub fn add(&mut self, system: impl CommandSystem + 'static) -> &mut Self {
        self.systems.push(Box::new(system));
        self
    }

    /// Run the dispatch phase once against `buffer`.
    pub fn run_tick(&mut self, buffer: &CommandBuffer) {
        self.tick_id += 1;
        debug!(
            tick_id = self.tick_id,
            systems = self.systems.len(),
            "dispatch phase start"
        );
        for system in &mut self.systems {
            system.run(buffer);
        }
        debug!(tick_id = self.tick_id, "dispatch phase complete");
    }

    /// Number of completed dispatch phases.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }
}

impl std::fmt::Debug for EventSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSchedule")
            .field("tick_id", &self.tick_id)
            .field("systems", &self.system_names())
            .finish()
    }
}
