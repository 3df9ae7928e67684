//! Operations that derive new data blocks from existing ones.
//!
//! Except for `put_slice`, every operation allocates a fresh block and never
//! touches the source, so outstanding handles to the source stay valid. All
//! parameters are validated before anything is allocated.

use crate::core::util::unit_position;
use crate::core::{DataBlockError, DataType, FailOnZeroRange, ZeroRangePolicy};
use crate::datablock::{DataBlock, DataBlockHandle};

/// Axis held fixed when cutting a slice out of a volume.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SliceAxis {
    X,
    Y,
    Z,
}

impl SliceAxis {
    /// 0 = x, 1 = y, 2 = z.
    pub fn from_index(axis: i32) -> Result<SliceAxis, DataBlockError> {
        match axis {
            0 => Ok(SliceAxis::X),
            1 => Ok(SliceAxis::Y),
            2 => Ok(SliceAxis::Z),
            _ => {
                let err = DataBlockError::InvalidAxis(axis);
                log::warn!("{}", err);
                Err(err)
            }
        }
    }

    pub fn index(self) -> usize {
        match self {
            SliceAxis::X => 0,
            SliceAxis::Y => 1,
            SliceAxis::Z => 2,
        }
    }

    fn extent(self, nx: usize, ny: usize, nz: usize) -> usize {
        [nx, ny, nz][self.index()]
    }

    /// The two remaining extents, in x, y, z order.
    fn cross_section(self, nx: usize, ny: usize, nz: usize) -> (usize, usize) {
        match self {
            SliceAxis::X => (ny, nz),
            SliceAxis::Y => (nx, nz),
            SliceAxis::Z => (nx, ny),
        }
    }

    /// Volume coordinate of slice pixel `(u, v)` on cross-section `slice`.
    #[inline(always)]
    fn volume_coord(self, slice: usize, u: usize, v: usize) -> (usize, usize, usize) {
        match self {
            SliceAxis::X => (slice, u, v),
            SliceAxis::Y => (u, slice, v),
            SliceAxis::Z => (u, v, slice),
        }
    }
}

/// Copy `src` into a new block of `new_type`, narrowing every sample.
pub fn convert_data_type(src: &DataBlockHandle, new_type: DataType) -> Result<DataBlockHandle, DataBlockError> {
    let source = src.read();
    let dst = DataBlock::new(src.manager(), src.get_nx(), src.get_ny(), src.get_nz(), new_type)?;
    {
        let mut target = dst.write();
        for i in 0..source.get_size() {
            target.set_data_at(i, source.get_data_at(i));
        }
    }
    log::debug!(
        "converted generation {} from {} to {}",
        src.get_generation(),
        source.get_data_type(),
        new_type
    );
    Ok(dst)
}

fn validate_permutation(permutation: &[i32]) -> Result<[i32; 3], DataBlockError> {
    let mut seen = [false; 3];
    let mut valid = permutation.len() == 3;
    if valid {
        for p in permutation {
            let axis = p.unsigned_abs() as usize;
            if axis < 1 || axis > 3 || seen[axis - 1] {
                valid = false;
                break;
            }
            seen[axis - 1] = true;
        }
    }
    reject_if!(!valid, DataBlockError::InvalidPermutation(permutation.to_vec()));
    Ok([permutation[0], permutation[1], permutation[2]])
}

/// The permutation that undoes `permutation`.
pub fn invert_permutation(permutation: &[i32]) -> Result<[i32; 3], DataBlockError> {
    let permutation = validate_permutation(permutation)?;
    let mut inverse = [0_i32; 3];
    for (k, p) in permutation.iter().enumerate() {
        inverse[p.unsigned_abs() as usize - 1] = p.signum() * (k as i32 + 1);
    }
    Ok(inverse)
}

/// Reorder the axes of `src`.
///
/// Entry `k` of `permutation` names the source axis (1 = x, 2 = y, 3 = z)
/// that becomes destination axis `k`; a negative entry also reverses it.
/// `[1, 2, 3]` is the identity, `[2, 1, -3]` swaps x and y and flips z.
pub fn permute_data(src: &DataBlockHandle, permutation: &[i32]) -> Result<DataBlockHandle, DataBlockError> {
    let permutation = validate_permutation(permutation)?;
    let src_dims = [src.get_nx(), src.get_ny(), src.get_nz()];
    let axes = [
        permutation[0].unsigned_abs() as usize - 1,
        permutation[1].unsigned_abs() as usize - 1,
        permutation[2].unsigned_abs() as usize - 1,
    ];
    let dst_dims = [src_dims[axes[0]], src_dims[axes[1]], src_dims[axes[2]]];

    let source = src.read();
    let dst = DataBlock::new(src.manager(), dst_dims[0], dst_dims[1], dst_dims[2], source.get_data_type())?;
    {
        let mut target = dst.write();
        let mut src_coord = [0_usize; 3];
        for z in 0..dst_dims[2] {
            for y in 0..dst_dims[1] {
                for x in 0..dst_dims[0] {
                    for (k, d) in [x, y, z].iter().enumerate() {
                        src_coord[axes[k]] = if permutation[k] > 0 { *d } else { dst_dims[k] - 1 - *d };
                    }
                    let value = source.get_data_at_xyz(src_coord[0], src_coord[1], src_coord[2]);
                    target.set_data_at_xyz(x, y, z, value);
                }
            }
        }
    }
    log::debug!("permuted generation {} by {:?}", src.get_generation(), permutation);
    Ok(dst)
}

/// Linearly map the value range of `src` onto `new_type`, failing on a
/// constant source.
///
/// See `quantize_data_with`.
pub fn quantize_data(src: &DataBlockHandle, new_type: DataType) -> Result<DataBlockHandle, DataBlockError> {
    quantize_data_with::<FailOnZeroRange>(src, new_type)
}

/// Linearly map `[min, max]` of `src`, taken from its histogram, onto the
/// full range of an integer `new_type` (or onto `[0, 1]` for float types).
///
/// Integer results are rounded to the nearest level. The histogram of `src`
/// has to be current, otherwise this fails with `StaleHistogram`. `P`
/// decides what happens when `min == max`.
pub fn quantize_data_with<P: ZeroRangePolicy>(
    src: &DataBlockHandle,
    new_type: DataType,
) -> Result<DataBlockHandle, DataBlockError> {
    let source = src.read();
    let min = source.get_min()?;
    let max = source.get_max()?;
    let constant = min == max;
    reject_if!(constant && !P::MAP_TO_MINIMUM, DataBlockError::ZeroRange);

    let (low, high) = if new_type.is_integer() { new_type.value_bounds() } else { (0.0, 1.0) };
    let span = high - low;

    let dst = DataBlock::new(src.manager(), src.get_nx(), src.get_ny(), src.get_nz(), new_type)?;
    {
        let mut target = dst.write();
        for i in 0..source.get_size() {
            let value = if constant {
                low
            } else {
                let mapped = low + unit_position(source.get_data_at(i), min, max) * span;
                let mapped = if new_type.is_integer() { mapped.round() } else { mapped };
                mapped.max(low).min(high)
            };
            target.set_data_at(i, value);
        }
    }
    log::debug!(
        "quantized generation {} onto {} ({} .. {})",
        src.get_generation(),
        new_type,
        low,
        high
    );
    Ok(dst)
}

/// Independent copy of `src` under a new generation.
pub fn clone_data_block(src: &DataBlockHandle) -> Result<DataBlockHandle, DataBlockError> {
    let source = src.read();
    let storage = source.storage().try_clone()?;
    Ok(DataBlock::with_storage(
        src.manager(),
        src.get_nx(),
        src.get_ny(),
        src.get_nz(),
        storage,
        source.get_histogram().clone(),
        source.histogram_is_stale(),
    ))
}

/// Copy cross-section `slice_index` along `axis` into a new `(w, h, 1)` block.
///
/// `w` and `h` are the two other extents in x, y, z order.
pub fn get_slice(
    volume: &DataBlockHandle,
    slice_index: usize,
    axis: SliceAxis,
) -> Result<DataBlockHandle, DataBlockError> {
    let (nx, ny, nz) = (volume.get_nx(), volume.get_ny(), volume.get_nz());
    let extent = axis.extent(nx, ny, nz);
    reject_if!(
        slice_index >= extent,
        DataBlockError::SliceIndexOutOfRange { index: slice_index, extent }
    );
    let (width, height) = axis.cross_section(nx, ny, nz);

    let source = volume.read();
    let slice = DataBlock::new(volume.manager(), width, height, 1, source.get_data_type())?;
    {
        let mut target = slice.write();
        for v in 0..height {
            for u in 0..width {
                let (x, y, z) = axis.volume_coord(slice_index, u, v);
                target.set_data_at_xyz(u, v, 0, source.get_data_at_xyz(x, y, z));
            }
        }
    }
    Ok(slice)
}

/// Write `slice` back into cross-section `slice_index` of `volume`, in place.
///
/// The slice must be shaped exactly like the block `get_slice` would return.
/// Samples are narrowed to the volume's type. The volume's histogram goes
/// stale; its generation is left to the caller.
pub fn put_slice(
    slice: &DataBlockHandle,
    volume: &DataBlockHandle,
    slice_index: usize,
    axis: SliceAxis,
) -> Result<(), DataBlockError> {
    let (nx, ny, nz) = (volume.get_nx(), volume.get_ny(), volume.get_nz());
    let extent = axis.extent(nx, ny, nz);
    reject_if!(
        slice_index >= extent,
        DataBlockError::SliceIndexOutOfRange { index: slice_index, extent }
    );
    let (width, height) = axis.cross_section(nx, ny, nz);
    let actual = (slice.get_nx(), slice.get_ny(), slice.get_nz());
    reject_if!(
        actual != (width, height, 1),
        DataBlockError::SliceDimensionMismatch { expected: (width, height, 1), actual }
    );

    // The slice may be the volume itself, so never hold both locks.
    let values = {
        let source = slice.read();
        (0..source.get_size()).map(|i| source.get_data_at(i)).collect::<Vec<f64>>()
    };
    let mut target = volume.write();
    for v in 0..height {
        for u in 0..width {
            let (x, y, z) = axis.volume_coord(slice_index, u, v);
            target.set_data_at_xyz(x, y, z, values[v * width + u]);
        }
    }
    Ok(())
}
