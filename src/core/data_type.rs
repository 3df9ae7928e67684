use crate::core::DataBlockError;
use num_traits::{AsPrimitive, Bounded};
use std::fmt;
use std::str::FromStr;

/// Tag for the native representation of the samples in a data block.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DataType {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

pub const ALL_DATA_TYPES: [DataType; 8] = [
    DataType::Int8,
    DataType::UInt8,
    DataType::Int16,
    DataType::UInt16,
    DataType::Int32,
    DataType::UInt32,
    DataType::Float32,
    DataType::Float64,
];

fn bounds<T: Bounded + AsPrimitive<f64>>() -> (f64, f64) {
    (T::min_value().as_(), T::max_value().as_())
}

impl DataType {
    /// Size in bytes of one sample.
    pub fn element_size(self) -> usize {
        match self {
            DataType::Int8 | DataType::UInt8 => 1,
            DataType::Int16 | DataType::UInt16 => 2,
            DataType::Int32 | DataType::UInt32 | DataType::Float32 => 4,
            DataType::Float64 => 8,
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(self, DataType::Float32 | DataType::Float64)
    }

    pub fn is_signed(self) -> bool {
        !matches!(self, DataType::UInt8 | DataType::UInt16 | DataType::UInt32)
    }

    /// Smallest and largest representable value, widened to f64.
    pub fn value_bounds(self) -> (f64, f64) {
        match self {
            DataType::Int8 => bounds::<i8>(),
            DataType::UInt8 => bounds::<u8>(),
            DataType::Int16 => bounds::<i16>(),
            DataType::UInt16 => bounds::<u16>(),
            DataType::Int32 => bounds::<i32>(),
            DataType::UInt32 => bounds::<u32>(),
            DataType::Float32 => bounds::<f32>(),
            DataType::Float64 => bounds::<f64>(),
        }
    }

    /// Compact encoding, the position in `ALL_DATA_TYPES`.
    pub(crate) fn tag(self) -> u8 {
        self as u8
    }

    /// Inverse of `tag`; only ever fed tags produced by it.
    pub(crate) fn from_tag(tag: u8) -> DataType {
        ALL_DATA_TYPES[tag as usize]
    }

    pub fn min_value(self) -> f64 {
        self.value_bounds().0
    }

    pub fn max_value(self) -> f64 {
        self.value_bounds().1
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Int8 => "int8",
            DataType::UInt8 => "uint8",
            DataType::Int16 => "int16",
            DataType::UInt16 => "uint16",
            DataType::Int32 => "int32",
            DataType::UInt32 => "uint32",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = DataBlockError;

    fn from_str(s: &str) -> Result<DataType, DataBlockError> {
        let data_type = match s.trim().to_ascii_lowercase().as_str() {
            "int8" | "char" => DataType::Int8,
            "uint8" | "uchar" => DataType::UInt8,
            "int16" | "short" => DataType::Int16,
            "uint16" | "ushort" => DataType::UInt16,
            "int32" | "int" => DataType::Int32,
            "uint32" | "uint" => DataType::UInt32,
            "float32" | "float" => DataType::Float32,
            "float64" | "double" => DataType::Float64,
            _ => return Err(DataBlockError::UnknownDataType(s.to_string())),
        };
        Ok(data_type)
    }
}
