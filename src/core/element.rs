use crate::core::DataType;
use byteorder::ByteOrder;
use num_traits::{AsPrimitive, Bounded, Zero};

/// A native sample type that can live inside a data block.
///
/// `from_f64` is the narrowing policy of the type:
///
/// * integer types drop the fractional part (toward zero) and saturate at
///   `MIN`/`MAX`; NaN narrows to 0
/// * `f32` rounds to the nearest representable value, overflowing to ±inf
/// * `f64` is stored unchanged
pub trait Element: Copy + PartialOrd + Zero + Bounded + AsPrimitive<f64> + Send + Sync + 'static {
    const DATA_TYPE: DataType;

    /// Sample as a f64.
    #[inline(always)]
    fn as_f64(self) -> f64 {
        self.as_()
    }

    /// Narrow a f64 into this type.
    fn from_f64(value: f64) -> Self;

    /// Decode `dst.len()` samples from `src`; the lengths must already agree.
    fn read_into<B: ByteOrder>(src: &[u8], dst: &mut [Self]);

    /// Encode `src` into `dst`; the lengths must already agree.
    fn write_into<B: ByteOrder>(src: &[Self], dst: &mut [u8]);
}

impl Element for i8 {
    const DATA_TYPE: DataType = DataType::Int8;

    #[inline(always)]
    fn from_f64(value: f64) -> i8 {
        value as i8
    }

    fn read_into<B: ByteOrder>(src: &[u8], dst: &mut [i8]) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d = *s as i8;
        }
    }

    fn write_into<B: ByteOrder>(src: &[i8], dst: &mut [u8]) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d = *s as u8;
        }
    }
}

impl Element for u8 {
    const DATA_TYPE: DataType = DataType::UInt8;

    #[inline(always)]
    fn from_f64(value: f64) -> u8 {
        value as u8
    }

    fn read_into<B: ByteOrder>(src: &[u8], dst: &mut [u8]) {
        dst.copy_from_slice(src);
    }

    fn write_into<B: ByteOrder>(src: &[u8], dst: &mut [u8]) {
        dst.copy_from_slice(src);
    }
}

macro_rules! multi_byte_element {
    ($t:ty, $tag:expr, $read:ident, $write:ident) => {
        impl Element for $t {
            const DATA_TYPE: DataType = $tag;

            #[inline(always)]
            fn from_f64(value: f64) -> $t {
                value as $t
            }

            fn read_into<B: ByteOrder>(src: &[u8], dst: &mut [$t]) {
                B::$read(src, dst);
            }

            fn write_into<B: ByteOrder>(src: &[$t], dst: &mut [u8]) {
                B::$write(src, dst);
            }
        }
    };
}

multi_byte_element!(i16, DataType::Int16, read_i16_into, write_i16_into);
multi_byte_element!(u16, DataType::UInt16, read_u16_into, write_u16_into);
multi_byte_element!(i32, DataType::Int32, read_i32_into, write_i32_into);
multi_byte_element!(u32, DataType::UInt32, read_u32_into, write_u32_into);
multi_byte_element!(f32, DataType::Float32, read_f32_into, write_f32_into);
multi_byte_element!(f64, DataType::Float64, read_f64_into, write_f64_into);
