use crate::concurrent::{DataBlockManager, DataChangedSignal, GenerationType};
use crate::core::util::{checked_sample_count, flat_index};
use crate::core::{DataBlockError, DataType};
use crate::histogram::Histogram;
use crate::storage::TypedStorage;
use byteorder::LittleEndian;
use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};

pub type DataBlockHandle = Arc<DataBlock>;
pub type DataBlockWeakHandle = Weak<DataBlock>;

pub type DataBlockReadGuard<'a> = RwLockReadGuard<'a, BlockContents>;
pub type DataBlockWriteGuard<'a> = RwLockWriteGuard<'a, BlockContents>;

/// The lock-protected part of a data block: samples and cached histogram.
///
/// Obtained through `DataBlock::read` or `DataBlock::write`; holding the
/// guard across several calls makes the sequence atomic.
pub struct BlockContents {
    nx: usize,
    ny: usize,
    nz: usize,
    bin_count: usize,
    storage: TypedStorage,
    histogram: Histogram,
    histogram_stale: bool,
    // mirror of the storage tag, readable without the contents lock
    data_type: Arc<AtomicU8>,
}

// read methods
impl BlockContents {
    pub fn get_nx(&self) -> usize {
        self.nx
    }

    pub fn get_ny(&self) -> usize {
        self.ny
    }

    pub fn get_nz(&self) -> usize {
        self.nz
    }

    pub fn get_size(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub fn get_data_type(&self) -> DataType {
        self.storage.data_type()
    }

    pub fn get_elem_size(&self) -> usize {
        self.get_data_type().element_size()
    }

    pub fn get_byte_size(&self) -> usize {
        self.get_size() * self.get_elem_size()
    }

    #[inline(always)]
    pub fn to_index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.nx && y < self.ny && z < self.nz);
        flat_index(self.nx, self.ny, x, y, z)
    }

    /// Panics if `index` is not below `get_size()`.
    #[inline]
    pub fn get_data_at(&self, index: usize) -> f64 {
        self.storage.get(index)
    }

    #[inline]
    pub fn get_data_at_xyz(&self, x: usize, y: usize, z: usize) -> f64 {
        self.get_data_at(self.to_index(x, y, z))
    }

    pub fn get_histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// True when samples changed after the last histogram update.
    pub fn histogram_is_stale(&self) -> bool {
        self.histogram_stale
    }

    fn fresh_histogram(&self) -> Result<&Histogram, DataBlockError> {
        if self.histogram_stale {
            return Err(DataBlockError::StaleHistogram);
        }
        Ok(&self.histogram)
    }

    /// Cached maximum, fails if the histogram is stale.
    pub fn get_max(&self) -> Result<f64, DataBlockError> {
        self.fresh_histogram().map(Histogram::get_max)
    }

    /// Cached minimum, fails if the histogram is stale.
    pub fn get_min(&self) -> Result<f64, DataBlockError> {
        self.fresh_histogram().map(Histogram::get_min)
    }

    /// Cached `max - min`, fails if the histogram is stale.
    pub fn get_range(&self) -> Result<f64, DataBlockError> {
        self.fresh_histogram().map(Histogram::get_range)
    }

    /// Samples encoded as little-endian bytes of the native type.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.storage.to_bytes::<LittleEndian>()
    }

    pub(crate) fn storage(&self) -> &TypedStorage {
        &self.storage
    }
}

// write methods
impl BlockContents {
    #[inline]
    pub fn set_data_at(&mut self, index: usize, value: f64) {
        self.storage.set(index, value);
        self.histogram_stale = true;
    }

    #[inline]
    pub fn set_data_at_xyz(&mut self, x: usize, y: usize, z: usize, value: f64) {
        let index = self.to_index(x, y, z);
        self.set_data_at(index, value);
    }

    /// Zero every sample.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.histogram_stale = true;
    }

    pub fn fill(&mut self, value: f64) {
        self.storage.fill(value);
        self.histogram_stale = true;
    }

    pub fn update_histogram(&mut self) -> Result<(), DataBlockError> {
        reject_if!(self.storage.length() == 0, DataBlockError::EmptyBuffer);
        self.histogram = self.storage.histogram(self.bin_count);
        self.histogram_stale = false;
        Ok(())
    }

    /// Install a histogram computed elsewhere; it is trusted as current.
    pub fn set_histogram(&mut self, histogram: Histogram) {
        self.histogram = histogram;
        self.histogram_stale = false;
    }

    /// Relabel the samples as `data_type` without converting them.
    ///
    /// The bytes are reinterpreted as they are, so this is only meaningful
    /// for callers that already wrote correctly typed bytes.
    pub fn update_data_type(&mut self, data_type: DataType) -> Result<(), DataBlockError> {
        if data_type == self.storage.data_type() {
            return Ok(());
        }
        self.storage = self.storage.relabel(data_type)?;
        self.data_type.store(data_type.tag(), Ordering::Release);
        self.histogram_stale = true;
        Ok(())
    }
}

/// One volume of homogeneous numeric samples.
///
/// Blocks are only handed out as `DataBlockHandle`s. Each one is registered
/// with its `DataBlockManager` for as long as it lives.
pub struct DataBlock {
    nx: usize,
    ny: usize,
    nz: usize,
    manager: Arc<DataBlockManager>,
    generation: Mutex<GenerationType>,
    data_type: Arc<AtomicU8>,
    contents: RwLock<BlockContents>,
    pub data_changed_signal: DataChangedSignal,
}

fn validate_dimensions(nx: usize, ny: usize, nz: usize) -> Result<usize, DataBlockError> {
    let size = checked_sample_count(nx, ny, nz);
    reject_if!(
        nx == 0 || ny == 0 || nz == 0 || size.is_none(),
        DataBlockError::InvalidDimensions { nx, ny, nz }
    );
    Ok(size.unwrap_or(0))
}

impl DataBlock {
    /// Zero-filled block of `data_type` samples.
    pub fn new(
        manager: &Arc<DataBlockManager>,
        nx: usize,
        ny: usize,
        nz: usize,
        data_type: DataType,
    ) -> Result<DataBlockHandle, DataBlockError> {
        let size = validate_dimensions(nx, ny, nz)?;
        let storage = TypedStorage::allocate(data_type, size)?;
        Ok(DataBlock::with_storage(manager, nx, ny, nz, storage, Histogram::empty(), true))
    }

    /// Block decoded from little-endian samples of `data_type`.
    pub fn from_bytes(
        manager: &Arc<DataBlockManager>,
        nx: usize,
        ny: usize,
        nz: usize,
        data_type: DataType,
        bytes: &[u8],
    ) -> Result<DataBlockHandle, DataBlockError> {
        let size = validate_dimensions(nx, ny, nz)?;
        let storage = TypedStorage::from_bytes::<LittleEndian>(data_type, size, bytes)?;
        Ok(DataBlock::with_storage(manager, nx, ny, nz, storage, Histogram::empty(), true))
    }

    /// Block holding `values` narrowed to `data_type`, in flat index order.
    pub fn from_values(
        manager: &Arc<DataBlockManager>,
        nx: usize,
        ny: usize,
        nz: usize,
        data_type: DataType,
        values: &[f64],
    ) -> Result<DataBlockHandle, DataBlockError> {
        let size = validate_dimensions(nx, ny, nz)?;
        reject_if!(
            values.len() != size,
            DataBlockError::ValueCountMismatch { expected: size, actual: values.len() }
        );
        let mut storage = TypedStorage::allocate(data_type, size)?;
        for (i, v) in values.iter().enumerate() {
            storage.set(i, *v);
        }
        Ok(DataBlock::with_storage(manager, nx, ny, nz, storage, Histogram::empty(), true))
    }

    pub(crate) fn with_storage(
        manager: &Arc<DataBlockManager>,
        nx: usize,
        ny: usize,
        nz: usize,
        storage: TypedStorage,
        histogram: Histogram,
        histogram_stale: bool,
    ) -> DataBlockHandle {
        let data_type = storage.data_type();
        let tag = Arc::new(AtomicU8::new(data_type.tag()));
        let bin_count = manager.settings().bin_count;
        let block = Arc::new_cyclic(|weak| {
            let generation = manager.register(weak.clone());
            DataBlock {
                nx,
                ny,
                nz,
                manager: manager.clone(),
                generation: Mutex::new(generation),
                data_type: tag.clone(),
                contents: RwLock::new(BlockContents {
                    nx,
                    ny,
                    nz,
                    bin_count,
                    storage,
                    histogram,
                    histogram_stale,
                    data_type: tag,
                }),
                data_changed_signal: DataChangedSignal::new(),
            }
        });
        log::debug!(
            "allocated {}x{}x{} {} block, generation {}",
            nx,
            ny,
            nz,
            data_type,
            block.get_generation()
        );
        block
    }

    pub fn get_nx(&self) -> usize {
        self.nx
    }

    pub fn get_ny(&self) -> usize {
        self.ny
    }

    pub fn get_nz(&self) -> usize {
        self.nz
    }

    pub fn get_size(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub fn get_elem_size(&self) -> usize {
        self.get_data_type().element_size()
    }

    pub fn get_byte_size(&self) -> usize {
        self.get_size() * self.get_elem_size()
    }

    #[inline(always)]
    pub fn to_index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < self.nx && y < self.ny && z < self.nz);
        flat_index(self.nx, self.ny, x, y, z)
    }

    /// Does not take the contents lock, so it is safe to call while holding
    /// a guard from `read` or `write`.
    pub fn get_data_type(&self) -> DataType {
        DataType::from_tag(self.data_type.load(Ordering::Acquire))
    }

    /// Shared access for a sequence of reads.
    pub fn read(&self) -> DataBlockReadGuard<'_> {
        self.contents.read()
    }

    /// Exclusive access for a sequence of reads and writes.
    pub fn write(&self) -> DataBlockWriteGuard<'_> {
        self.contents.write()
    }

    pub fn get_data_at(&self, index: usize) -> f64 {
        self.contents.read().get_data_at(index)
    }

    pub fn get_data_at_xyz(&self, x: usize, y: usize, z: usize) -> f64 {
        self.get_data_at(self.to_index(x, y, z))
    }

    pub fn set_data_at(&self, index: usize, value: f64) {
        self.contents.write().set_data_at(index, value)
    }

    pub fn set_data_at_xyz(&self, x: usize, y: usize, z: usize, value: f64) {
        self.set_data_at(self.to_index(x, y, z), value)
    }

    pub fn clear(&self) {
        self.contents.write().clear()
    }

    pub fn fill(&self, value: f64) {
        self.contents.write().fill(value)
    }

    pub fn get_max(&self) -> Result<f64, DataBlockError> {
        self.contents.read().get_max()
    }

    pub fn get_min(&self) -> Result<f64, DataBlockError> {
        self.contents.read().get_min()
    }

    pub fn get_range(&self) -> Result<f64, DataBlockError> {
        self.contents.read().get_range()
    }

    pub fn get_histogram(&self) -> Histogram {
        self.contents.read().get_histogram().clone()
    }

    pub fn histogram_is_stale(&self) -> bool {
        self.contents.read().histogram_is_stale()
    }

    pub fn update_histogram(&self) -> Result<(), DataBlockError> {
        self.contents.write().update_histogram()
    }

    pub fn set_histogram(&self, histogram: Histogram) {
        self.contents.write().set_histogram(histogram)
    }

    pub fn update_data_type(&self, data_type: DataType) -> Result<(), DataBlockError> {
        self.contents.write().update_data_type(data_type)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.contents.read().to_bytes()
    }

    pub fn get_generation(&self) -> GenerationType {
        *self.generation.lock()
    }

    /// Move this block to a fresh, never before used generation.
    pub fn increase_generation(&self) -> GenerationType {
        let mut generation = self.generation.lock();
        *generation = self.manager.reassign(*generation);
        *generation
    }

    pub fn manager(&self) -> &Arc<DataBlockManager> {
        &self.manager
    }
}

impl Drop for DataBlock {
    fn drop(&mut self) {
        self.manager.unregister(*self.generation.get_mut());
    }
}

impl fmt::Debug for DataBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataBlock")
            .field("nx", &self.nx)
            .field("ny", &self.ny)
            .field("nz", &self.nz)
            .field("data_type", &self.get_data_type())
            .field("generation", &self.get_generation())
            .finish()
    }
}
