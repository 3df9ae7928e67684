pub mod backing_array;
pub mod typed_storage;

pub use self::backing_array::BackingArray;
pub use self::typed_storage::TypedStorage;
