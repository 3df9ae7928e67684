use crate::core::HistogramSettings;
use crate::datablock::{DataBlockHandle, DataBlockWeakHandle};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Identifier of one snapshot of a data block's contents.
pub type GenerationType = i64;

// Generation ids come from one process-wide counter, so ids issued by
// different managers never collide. Each manager still serializes issuing an
// id and registering it under its own lock; tests that need an isolated
// registry create their own manager instead of resetting this counter.
static GENERATION_SEQUENCER: AtomicI64 = AtomicI64::new(1);
static MANAGER_INSTANCE_SEQUENCER: AtomicUsize = AtomicUsize::new(0);

fn get_instance_id() -> usize {
    MANAGER_INSTANCE_SEQUENCER.fetch_add(1, Ordering::Relaxed)
}

/// Registry of live data blocks keyed by generation.
///
/// Every block is created against a manager, which hands out its first
/// generation, and unregisters itself when the last handle drops. Issuing a
/// generation and recording it happen under one lock, so two threads never
/// observe a half-registered block.
///
/// Managers are passed in explicitly rather than reached through a global,
/// but the generation counter itself is process-wide: generations are unique
/// across all managers, and a new manager does not restart numbering at 1.
pub struct DataBlockManager {
    pub instance_id: usize,
    settings: HistogramSettings,
    blocks: Mutex<HashMap<GenerationType, DataBlockWeakHandle>>,
}

impl DataBlockManager {
    pub fn new() -> Arc<DataBlockManager> {
        DataBlockManager::with_settings(HistogramSettings::default())
    }

    pub fn with_settings(settings: HistogramSettings) -> Arc<DataBlockManager> {
        Arc::new(DataBlockManager {
            instance_id: get_instance_id(),
            settings,
            blocks: Mutex::new(HashMap::new()),
        })
    }

    pub fn settings(&self) -> &HistogramSettings {
        &self.settings
    }

    fn next_generation() -> GenerationType {
        GENERATION_SEQUENCER.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn register(&self, block: DataBlockWeakHandle) -> GenerationType {
        let mut blocks = self.blocks.lock();
        let generation = DataBlockManager::next_generation();
        blocks.insert(generation, block);
        log::debug!("manager {}: registered generation {}", self.instance_id, generation);
        generation
    }

    pub(crate) fn unregister(&self, generation: GenerationType) -> bool {
        let removed = self.blocks.lock().remove(&generation).is_some();
        log::debug!("manager {}: unregistered generation {}", self.instance_id, generation);
        removed
    }

    /// Move the block registered under `generation` to a fresh generation.
    pub(crate) fn reassign(&self, generation: GenerationType) -> GenerationType {
        let mut blocks = self.blocks.lock();
        let new_generation = DataBlockManager::next_generation();
        match blocks.remove(&generation) {
            Some(block) => {
                blocks.insert(new_generation, block);
            }
            None => log::warn!(
                "manager {}: generation {} was not registered",
                self.instance_id,
                generation
            ),
        }
        new_generation
    }

    /// The live block currently holding `generation`.
    pub fn find(&self, generation: GenerationType) -> Option<DataBlockHandle> {
        self.blocks.lock().get(&generation).and_then(|block| block.upgrade())
    }

    pub fn num_blocks(&self) -> usize {
        self.blocks.lock().len()
    }

    /// Registered generations in ascending order.
    pub fn generations(&self) -> Vec<GenerationType> {
        let mut generations = self.blocks.lock().keys().copied().collect::<Vec<_>>();
        generations.sort_unstable();
        generations
    }
}
