use crate::core::{DataBlockError, Element};
use std::mem;

/// Densely packed, zero-initialised samples of one native type.
#[derive(Clone, Debug, PartialEq)]
pub struct BackingArray<T> {
    values: Vec<T>,
}

impl<T: Element> BackingArray<T> {
    /// Allocate `length` zeroed samples, failing instead of aborting on OOM.
    pub fn zeroed(length: usize) -> Result<BackingArray<T>, DataBlockError> {
        let bytes = length.saturating_mul(mem::size_of::<T>());
        let mut values = Vec::new();
        if values.try_reserve_exact(length).is_err() {
            log::warn!("allocation of {} bytes failed", bytes);
            return Err(DataBlockError::AllocationFailed { bytes });
        }
        values.resize(length, T::zero());
        Ok(BackingArray { values })
    }

    /// Fallible deep copy.
    pub fn try_clone(&self) -> Result<BackingArray<T>, DataBlockError> {
        let mut copy = BackingArray::zeroed(self.length())?;
        copy.values.copy_from_slice(&self.values);
        Ok(copy)
    }

    #[inline(always)]
    pub fn length(&self) -> usize {
        self.values.len()
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<T> {
        self.values.get(index).copied()
    }

    #[inline(always)]
    pub fn get_unchecked(&self, index: usize) -> T {
        self.values[index]
    }

    #[inline(always)]
    pub fn set_unchecked(&mut self, index: usize, value: T) {
        self.values[index] = value;
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.fill(T::zero());
    }

    pub fn fill(&mut self, value: T) {
        for v in self.values.iter_mut() {
            *v = value;
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }
}
