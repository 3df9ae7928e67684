/// What quantization does with a source whose min equals its max.
pub trait ZeroRangePolicy {
    const MAP_TO_MINIMUM: bool;
}

/// Quantization of a constant block fails with `DataBlockError::ZeroRange`.
pub struct FailOnZeroRange;

impl ZeroRangePolicy for FailOnZeroRange {
    const MAP_TO_MINIMUM: bool = false;
}

/// Quantization of a constant block writes the minimum of the quantization
/// target range everywhere: the type minimum for integer targets, 0.0 for
/// float targets.
pub struct MapToMinimum;

impl ZeroRangePolicy for MapToMinimum {
    const MAP_TO_MINIMUM: bool = true;
}
