pub mod data_block;
pub mod transforms;

pub use self::data_block::{
    BlockContents, DataBlock, DataBlockHandle, DataBlockReadGuard, DataBlockWeakHandle, DataBlockWriteGuard,
};
pub use self::transforms::{
    clone_data_block, convert_data_type, get_slice, invert_permutation, permute_data, put_slice, quantize_data,
    quantize_data_with, SliceAxis,
};
