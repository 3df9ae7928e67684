use crate::core::CreationError;

pub const DEFAULT_BIN_COUNT: usize = 256;
pub const MAX_BIN_COUNT: usize = 1 << 20;

/// Configuration for the histograms computed by `DataBlock::update_histogram`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HistogramSettings {
    pub bin_count: usize,
}

macro_rules! expect {
    ($t:expr, $e:expr) => {
        if $t { return Err($e); }
    };
}

impl HistogramSettings {
    pub fn new(bin_count: usize) -> Result<HistogramSettings, CreationError> {
        expect!(bin_count == 0, CreationError::BinCountIsZero);
        expect!(
            bin_count > MAX_BIN_COUNT,
            CreationError::BinCountExceedsMax { max: MAX_BIN_COUNT, actual: bin_count }
        );
        Ok(HistogramSettings { bin_count })
    }
}

impl Default for HistogramSettings {
    fn default() -> HistogramSettings {
        HistogramSettings { bin_count: DEFAULT_BIN_COUNT }
    }
}
