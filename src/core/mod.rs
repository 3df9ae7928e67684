pub mod errors;
pub mod histogram_settings;
pub mod data_type;
pub mod element;
pub mod zero_range_policy;
#[macro_use]
pub mod util;

pub use self::data_type::{DataType, ALL_DATA_TYPES};
pub use self::element::Element;
pub use self::errors::*;
pub use self::histogram_settings::{HistogramSettings, DEFAULT_BIN_COUNT, MAX_BIN_COUNT};
pub use self::zero_range_policy::{FailOnZeroRange, MapToMinimum, ZeroRangePolicy};
