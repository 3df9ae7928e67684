#[macro_use]
pub mod util;
pub mod data_block;
pub mod concurrent_access;
