/// Bail out of a validating function with `$e`, logging the rejection.
#[macro_export]
macro_rules! reject_if {
    ($cond:expr, $e:expr) => {
        if $cond {
            let err = $e;
            log::warn!("{}", err);
            return Err(err);
        }
    };
}

/// Number of samples in a block of the given extents, `None` on overflow.
#[inline]
pub fn checked_sample_count(nx: usize, ny: usize, nz: usize) -> Option<usize> {
    nx.checked_mul(ny)?.checked_mul(nz)
}

/// Flat offset of `(x, y, z)`, x varying fastest.
#[inline(always)]
pub fn flat_index(nx: usize, ny: usize, x: usize, y: usize, z: usize) -> usize {
    z * nx * ny + y * nx + x
}

/// Position of `value` within `[min, max]` as a fraction in `[0, 1]`.
///
/// Works on halved operands so `max - min` stays finite for any pair of
/// finite bounds. `min` and `max` must differ.
#[inline(always)]
pub fn unit_position(value: f64, min: f64, max: f64) -> f64 {
    (value * 0.5 - min * 0.5) / (max * 0.5 - min * 0.5)
}
