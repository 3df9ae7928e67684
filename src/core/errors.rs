use crate::core::DataType;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CreationError {
    BinCountIsZero,
    BinCountExceedsMax { max: usize, actual: usize },
}

/// Failure of a `DataBlock` operation.
///
/// None of these leave partial state behind: validation happens before any
/// allocation and a failed transform never hands out a destination.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DataBlockError {
    #[error("invalid dimensions {nx}x{ny}x{nz}: every extent must be at least 1")]
    InvalidDimensions { nx: usize, ny: usize, nz: usize },

    #[error("invalid slice axis {0}: expected 0 (x), 1 (y) or 2 (z)")]
    InvalidAxis(i32),

    #[error("slice index {index} out of range for extent {extent}")]
    SliceIndexOutOfRange { index: usize, extent: usize },

    #[error("slice of {actual:?} does not match volume cross-section {expected:?}")]
    SliceDimensionMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    #[error("invalid permutation {0:?}: absolute values must be a permutation of 1, 2, 3")]
    InvalidPermutation(Vec<i32>),

    #[error("cannot quantize a block whose value range is zero")]
    ZeroRange,

    #[error("histogram is stale, call update_histogram first")]
    StaleHistogram,

    #[error("data block is empty")]
    EmptyBuffer,

    #[error("cannot relabel {from} as {to}: element sizes differ")]
    ElementSizeMismatch { from: DataType, to: DataType },

    #[error("expected {expected} bytes of sample data, got {actual}")]
    ByteLengthMismatch { expected: usize, actual: usize },

    #[error("expected {expected} sample values, got {actual}")]
    ValueCountMismatch { expected: usize, actual: usize },

    #[error("failed to allocate {bytes} bytes")]
    AllocationFailed { bytes: usize },

    #[error("unknown data type {0:?}")]
    UnknownDataType(String),
}
