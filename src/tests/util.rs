use crate::concurrent::DataBlockManager;
use crate::core::DataType;
use crate::datablock::{DataBlock, DataBlockHandle};
use std::sync::Arc;

macro_rules! succ {
    ($e:expr) => {
        assert!($e.is_ok());
    }
}

macro_rules! assert_approx_eq {
    ($e:expr, $v:expr, $t:expr) => {
        assert!(($e as f64 - $v as f64).abs() <= $t as f64, "{} !~= {} within {}", $e, $v, $t)
    }
}

/// 2x2x2 float32 volume holding 0..7 in flat index order.
pub fn ramp_volume(manager: &Arc<DataBlockManager>) -> DataBlockHandle {
    let values = (0..8).map(|v| v as f64).collect::<Vec<_>>();
    DataBlock::from_values(manager, 2, 2, 2, DataType::Float32, &values).unwrap()
}

/// Block whose sample at flat index `i` is `i`, narrowed to `data_type`.
pub fn indexed_block(
    manager: &Arc<DataBlockManager>,
    nx: usize,
    ny: usize,
    nz: usize,
    data_type: DataType,
) -> DataBlockHandle {
    let values = (0..nx * ny * nz).map(|v| v as f64).collect::<Vec<_>>();
    DataBlock::from_values(manager, nx, ny, nz, data_type, &values).unwrap()
}

pub fn values_of(block: &DataBlockHandle) -> Vec<f64> {
    let contents = block.read();
    (0..contents.get_size()).map(|i| contents.get_data_at(i)).collect()
}
