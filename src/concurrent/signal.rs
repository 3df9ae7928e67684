use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub type ConnectionId = usize;

type Slot = Arc<dyn Fn() + Send + Sync>;

static CONNECTION_SEQUENCER: AtomicUsize = AtomicUsize::new(0);

/// Zero-argument change notification with any number of subscribers.
///
/// `emit` runs every slot synchronously on the calling thread. Slots are
/// called outside the lock, so a slot may connect or disconnect.
pub struct DataChangedSignal {
    slots: Mutex<Vec<(ConnectionId, Slot)>>,
}

impl DataChangedSignal {
    pub fn new() -> DataChangedSignal {
        DataChangedSignal {
            slots: Mutex::new(Vec::new()),
        }
    }

    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = CONNECTION_SEQUENCER.fetch_add(1, Ordering::Relaxed);
        self.slots.lock().push((id, Arc::new(slot)));
        id
    }

    /// Returns false if `id` was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut slots = self.slots.lock();
        let before = slots.len();
        slots.retain(|(slot_id, _)| *slot_id != id);
        slots.len() != before
    }

    pub fn disconnect_all(&self) {
        self.slots.lock().clear();
    }

    pub fn emit(&self) {
        let slots = self.slots
            .lock()
            .iter()
            .map(|(_, slot)| slot.clone())
            .collect::<Vec<_>>();
        for slot in slots {
            slot();
        }
    }

    pub fn num_slots(&self) -> usize {
        self.slots.lock().len()
    }
}

impl Default for DataChangedSignal {
    fn default() -> DataChangedSignal {
        DataChangedSignal::new()
    }
}

impl fmt::Debug for DataChangedSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataChangedSignal")
            .field("num_slots", &self.num_slots())
            .finish()
    }
}
