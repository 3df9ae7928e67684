//! Type-erased volumetric data blocks.
//!
//! A `DataBlock` stores a 3D volume of samples in one of eight native numeric
//! types and exposes it through a uniform f64 interface, together with a
//! cached histogram, a generation number for provenance tracking and a change
//! signal. The free functions in `datablock` derive new blocks by type
//! conversion, axis permutation, quantization, cloning and slicing.

#[macro_use]
mod core;
pub mod concurrent;
pub mod datablock;
pub mod histogram;
pub mod storage;

pub use crate::concurrent::{ConnectionId, DataBlockManager, DataChangedSignal, GenerationType};
pub use crate::core::*;
pub use crate::datablock::*;
pub use crate::histogram::Histogram;

#[cfg(test)]
pub mod tests;
