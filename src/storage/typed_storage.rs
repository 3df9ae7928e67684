use crate::core::{DataBlockError, DataType, Element};
use crate::histogram::Histogram;
use crate::storage::BackingArray;
use byteorder::{ByteOrder, NativeEndian};

/// The samples of a data block, one variant per supported native type.
///
/// The variant is picked once at allocation. All access from outside goes
/// through the f64 interface, narrowing with `Element::from_f64`.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedStorage {
    Int8(BackingArray<i8>),
    UInt8(BackingArray<u8>),
    Int16(BackingArray<i16>),
    UInt16(BackingArray<u16>),
    Int32(BackingArray<i32>),
    UInt32(BackingArray<u32>),
    Float32(BackingArray<f32>),
    Float64(BackingArray<f64>),
}

macro_rules! dispatch {
    ($storage:expr, $array:ident => $body:expr) => {
        match $storage {
            TypedStorage::Int8($array) => $body,
            TypedStorage::UInt8($array) => $body,
            TypedStorage::Int16($array) => $body,
            TypedStorage::UInt16($array) => $body,
            TypedStorage::Int32($array) => $body,
            TypedStorage::UInt32($array) => $body,
            TypedStorage::Float32($array) => $body,
            TypedStorage::Float64($array) => $body,
        }
    };
}

macro_rules! construct {
    ($data_type:expr, $ctor:ident $(< $($extra:ty),* >)? ( $($arg:expr),* )) => {
        match $data_type {
            DataType::Int8 => TypedStorage::Int8($ctor::<i8 $($(, $extra)*)?>($($arg),*)?),
            DataType::UInt8 => TypedStorage::UInt8($ctor::<u8 $($(, $extra)*)?>($($arg),*)?),
            DataType::Int16 => TypedStorage::Int16($ctor::<i16 $($(, $extra)*)?>($($arg),*)?),
            DataType::UInt16 => TypedStorage::UInt16($ctor::<u16 $($(, $extra)*)?>($($arg),*)?),
            DataType::Int32 => TypedStorage::Int32($ctor::<i32 $($(, $extra)*)?>($($arg),*)?),
            DataType::UInt32 => TypedStorage::UInt32($ctor::<u32 $($(, $extra)*)?>($($arg),*)?),
            DataType::Float32 => TypedStorage::Float32($ctor::<f32 $($(, $extra)*)?>($($arg),*)?),
            DataType::Float64 => TypedStorage::Float64($ctor::<f64 $($(, $extra)*)?>($($arg),*)?),
        }
    };
}

fn zeroed<T: Element>(length: usize) -> Result<BackingArray<T>, DataBlockError> {
    BackingArray::zeroed(length)
}

fn decode<T: Element, B: ByteOrder>(length: usize, bytes: &[u8]) -> Result<BackingArray<T>, DataBlockError> {
    let expected = length * T::DATA_TYPE.element_size();
    reject_if!(
        bytes.len() != expected,
        DataBlockError::ByteLengthMismatch { expected, actual: bytes.len() }
    );
    let mut array = BackingArray::<T>::zeroed(length)?;
    T::read_into::<B>(bytes, array.as_mut_slice());
    Ok(array)
}

fn encode<T: Element, B: ByteOrder>(array: &BackingArray<T>) -> Vec<u8> {
    let mut bytes = vec![0_u8; array.length() * T::DATA_TYPE.element_size()];
    T::write_into::<B>(array.as_slice(), &mut bytes);
    bytes
}

impl TypedStorage {
    /// Zero-filled storage of `length` samples.
    pub fn allocate(data_type: DataType, length: usize) -> Result<TypedStorage, DataBlockError> {
        Ok(construct!(data_type, zeroed(length)))
    }

    /// Storage decoded from `bytes` in byte order `B`.
    pub fn from_bytes<B: ByteOrder>(
        data_type: DataType,
        length: usize,
        bytes: &[u8],
    ) -> Result<TypedStorage, DataBlockError> {
        Ok(construct!(data_type, decode<B>(length, bytes)))
    }

    /// Deep copy that reports allocation failure instead of aborting.
    pub fn try_clone(&self) -> Result<TypedStorage, DataBlockError> {
        let copy = match self {
            TypedStorage::Int8(array) => TypedStorage::Int8(array.try_clone()?),
            TypedStorage::UInt8(array) => TypedStorage::UInt8(array.try_clone()?),
            TypedStorage::Int16(array) => TypedStorage::Int16(array.try_clone()?),
            TypedStorage::UInt16(array) => TypedStorage::UInt16(array.try_clone()?),
            TypedStorage::Int32(array) => TypedStorage::Int32(array.try_clone()?),
            TypedStorage::UInt32(array) => TypedStorage::UInt32(array.try_clone()?),
            TypedStorage::Float32(array) => TypedStorage::Float32(array.try_clone()?),
            TypedStorage::Float64(array) => TypedStorage::Float64(array.try_clone()?),
        };
        Ok(copy)
    }

    pub fn to_bytes<B: ByteOrder>(&self) -> Vec<u8> {
        dispatch!(self, array => encode::<_, B>(array))
    }

    pub fn data_type(&self) -> DataType {
        match self {
            TypedStorage::Int8(_) => DataType::Int8,
            TypedStorage::UInt8(_) => DataType::UInt8,
            TypedStorage::Int16(_) => DataType::Int16,
            TypedStorage::UInt16(_) => DataType::UInt16,
            TypedStorage::Int32(_) => DataType::Int32,
            TypedStorage::UInt32(_) => DataType::UInt32,
            TypedStorage::Float32(_) => DataType::Float32,
            TypedStorage::Float64(_) => DataType::Float64,
        }
    }

    pub fn length(&self) -> usize {
        dispatch!(self, array => array.length())
    }

    /// Sample at `index` widened to f64. Panics if `index` is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        dispatch!(self, array => array.get_unchecked(index).as_f64())
    }

    /// Store `value` at `index` using the narrowing policy of the native type.
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn set(&mut self, index: usize, value: f64) {
        dispatch!(self, array => array.set_unchecked(index, Element::from_f64(value)))
    }

    pub fn clear(&mut self) {
        dispatch!(self, array => array.clear())
    }

    pub fn fill(&mut self, value: f64) {
        dispatch!(self, array => array.fill(Element::from_f64(value)))
    }

    pub fn histogram(&self, bin_count: usize) -> Histogram {
        dispatch!(self, array => Histogram::compute(array.as_slice(), bin_count))
    }

    /// Reinterpret the stored bytes as `data_type` without converting them.
    ///
    /// Only possible between types of the same width, the sample count of a
    /// block is fixed by its extents.
    pub fn relabel(&self, data_type: DataType) -> Result<TypedStorage, DataBlockError> {
        let from = self.data_type();
        reject_if!(
            from.element_size() != data_type.element_size(),
            DataBlockError::ElementSizeMismatch { from, to: data_type }
        );
        let bytes = self.to_bytes::<NativeEndian>();
        TypedStorage::from_bytes::<NativeEndian>(data_type, self.length(), &bytes)
    }
}
