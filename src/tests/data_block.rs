use crate::concurrent::DataBlockManager;
use crate::core::{DataBlockError, DataType, HistogramSettings};
use crate::datablock::DataBlock;
use crate::histogram::Histogram;
use crate::tests::util::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[test]
fn sizes_and_accessors() {
    let manager = DataBlockManager::new();
    let block = DataBlock::new(&manager, 4, 3, 2, DataType::Int16).unwrap();
    assert_eq!(block.get_nx(), 4);
    assert_eq!(block.get_ny(), 3);
    assert_eq!(block.get_nz(), 2);
    assert_eq!(block.get_size(), 24);
    assert_eq!(block.get_elem_size(), 2);
    assert_eq!(block.get_byte_size(), 48);
    assert_eq!(block.get_data_type(), DataType::Int16);
    assert!(values_of(&block).iter().all(|v| *v == 0.0));
}

#[test]
fn zero_extent_is_rejected() {
    let manager = DataBlockManager::new();
    let result = DataBlock::new(&manager, 4, 0, 2, DataType::UInt8);
    assert_eq!(result.unwrap_err(), DataBlockError::InvalidDimensions { nx: 4, ny: 0, nz: 2 });
    assert_eq!(manager.num_blocks(), 0);
}

#[test]
fn overflowing_extents_are_rejected() {
    let manager = DataBlockManager::new();
    let result = DataBlock::new(&manager, usize::MAX, 2, 1, DataType::UInt8);
    assert!(matches!(result, Err(DataBlockError::InvalidDimensions { .. })));
}

#[test]
fn to_index_is_injective() {
    let manager = DataBlockManager::new();
    let block = DataBlock::new(&manager, 3, 4, 5, DataType::UInt8).unwrap();
    let mut seen = vec![false; block.get_size()];
    for z in 0..5 {
        for y in 0..4 {
            for x in 0..3 {
                let idx = block.to_index(x, y, z);
                assert_eq!(idx, z * 12 + y * 3 + x);
                assert!(!seen[idx]);
                seen[idx] = true;
            }
        }
    }
    assert!(seen.iter().all(|s| *s));
}

#[test]
#[should_panic]
#[cfg(debug_assertions)]
fn to_index_out_of_bounds_asserts() {
    let manager = DataBlockManager::new();
    let block = DataBlock::new(&manager, 2, 2, 2, DataType::UInt8).unwrap();
    block.to_index(2, 0, 0);
}

#[test]
fn set_get_round_trip_for_representable_values() {
    let manager = DataBlockManager::new();
    let mut rng = StdRng::seed_from_u64(42);
    for t in crate::core::ALL_DATA_TYPES.iter() {
        let block = DataBlock::new(&manager, 5, 4, 3, *t).unwrap();
        let (low, high) = if t.is_integer() { t.value_bounds() } else { (-1e6, 1e6) };
        for _ in 0..200 {
            let (x, y, z) = (rng.gen_range(0..5), rng.gen_range(0..4), rng.gen_range(0..3));
            let value = rng.gen_range(low..=high).trunc();
            block.set_data_at_xyz(x, y, z, value);
            assert_eq!(block.get_data_at(block.to_index(x, y, z)), value, "{}", t);
        }
    }
}

#[test]
fn out_of_range_values_truncate() {
    let manager = DataBlockManager::new();
    let block = DataBlock::new(&manager, 3, 1, 1, DataType::Int8).unwrap();
    block.set_data_at(0, 200.0);
    block.set_data_at(1, -200.0);
    block.set_data_at(2, -2.75);
    assert_eq!(values_of(&block), vec![127.0, -128.0, -2.0]);
}

#[test]
fn clear_zeroes_but_keeps_generation() {
    let manager = DataBlockManager::new();
    let block = ramp_volume(&manager);
    let generation = block.get_generation();
    block.clear();
    assert!(values_of(&block).iter().all(|v| *v == 0.0));
    assert_eq!(block.get_generation(), generation);
}

#[test]
fn histogram_bounds_after_update() {
    let manager = DataBlockManager::new();
    let block = ramp_volume(&manager);
    succ!(block.update_histogram());
    assert_eq!(block.get_min(), Ok(0.0));
    assert_eq!(block.get_max(), Ok(7.0));
    assert_eq!(block.get_range(), Ok(7.0));
    assert_eq!(block.get_histogram().get_total_count(), 8);
}

#[test]
fn histogram_uses_manager_settings() {
    let manager = DataBlockManager::with_settings(HistogramSettings::new(4).unwrap());
    let block = ramp_volume(&manager);
    succ!(block.update_histogram());
    assert_eq!(block.get_histogram().counts(), &[2, 2, 2, 2]);
}

#[test]
fn stale_histogram_is_reported() {
    let manager = DataBlockManager::new();
    let block = ramp_volume(&manager);
    assert!(block.histogram_is_stale());
    assert_eq!(block.get_max(), Err(DataBlockError::StaleHistogram));

    succ!(block.update_histogram());
    assert!(!block.histogram_is_stale());

    block.set_data_at(0, 100.0);
    assert_eq!(block.get_max(), Err(DataBlockError::StaleHistogram));
    succ!(block.update_histogram());
    assert_eq!(block.get_max(), Ok(100.0));

    block.clear();
    assert!(block.histogram_is_stale());
    succ!(block.update_histogram());
    block.fill(3.0);
    assert!(block.histogram_is_stale());
}

#[test]
fn set_histogram_is_trusted() {
    let manager = DataBlockManager::new();
    let block = ramp_volume(&manager);
    block.set_histogram(Histogram::compute(&[-5.0_f64, 5.0], 2));
    assert_eq!(block.get_min(), Ok(-5.0));
    assert_eq!(block.get_range(), Ok(10.0));
}

#[test]
fn update_data_type_relabels_without_conversion() {
    let manager = DataBlockManager::new();
    let block = DataBlock::from_values(&manager, 2, 1, 1, DataType::Int16, &[-1.0, 2.0]).unwrap();
    succ!(block.update_histogram());
    succ!(block.update_data_type(DataType::UInt16));
    assert_eq!(block.get_data_type(), DataType::UInt16);
    assert_eq!(values_of(&block), vec![65535.0, 2.0]);
    assert!(block.histogram_is_stale());

    assert_eq!(
        block.update_data_type(DataType::Float64),
        Err(DataBlockError::ElementSizeMismatch { from: DataType::UInt16, to: DataType::Float64 })
    );
    assert_eq!(block.get_data_type(), DataType::UInt16);
}

#[test]
fn type_queries_do_not_block_under_a_guard() {
    let manager = DataBlockManager::new();
    let block = DataBlock::from_values(&manager, 3, 1, 1, DataType::Int16, &[-1.0, 0.0, 1.0]).unwrap();
    {
        let mut contents = block.write();
        assert_eq!(block.get_data_type(), DataType::Int16);
        assert_eq!(block.get_elem_size(), 2);
        assert_eq!(block.get_byte_size(), 6);
        assert!(format!("{:?}", block).contains("Int16"));

        succ!(contents.update_data_type(DataType::UInt16));
        assert_eq!(block.get_data_type(), DataType::UInt16);
    }
    let contents = block.read();
    assert_eq!(block.get_data_type(), contents.get_data_type());
    assert_eq!(block.get_byte_size(), contents.get_byte_size());
}

#[test]
fn bytes_round_trip() {
    let manager = DataBlockManager::new();
    let bytes = [1_u8, 0, 0, 0, 0, 1, 0, 0];
    let block = DataBlock::from_bytes(&manager, 2, 1, 1, DataType::UInt32, &bytes).unwrap();
    assert_eq!(values_of(&block), vec![1.0, 256.0]);
    assert_eq!(block.to_bytes(), bytes.to_vec());

    let short = DataBlock::from_bytes(&manager, 2, 1, 1, DataType::UInt32, &bytes[..6]);
    assert_eq!(short.unwrap_err(), DataBlockError::ByteLengthMismatch { expected: 8, actual: 6 });
}

#[test]
fn value_count_must_match() {
    let manager = DataBlockManager::new();
    let result = DataBlock::from_values(&manager, 2, 2, 1, DataType::Float32, &[1.0, 2.0]);
    assert_eq!(result.unwrap_err(), DataBlockError::ValueCountMismatch { expected: 4, actual: 2 });
}

#[test]
fn scoped_write_is_atomic_sequence() {
    let manager = DataBlockManager::new();
    let block = DataBlock::new(&manager, 4, 4, 1, DataType::Float32).unwrap();
    {
        let mut contents = block.write();
        for i in 0..contents.get_size() {
            contents.set_data_at(i, i as f64 * 0.5);
        }
        succ!(contents.update_histogram());
        assert_eq!(contents.get_max(), Ok(7.5));
    }
    let contents = block.read();
    assert_eq!(contents.get_data_at_xyz(3, 3, 0), 7.5);
    assert!(!contents.histogram_is_stale());
}

#[test]
fn increase_generation_is_fresh() {
    let manager = DataBlockManager::new();
    let block = ramp_volume(&manager);
    let first = block.get_generation();
    let second = block.increase_generation();
    assert!(second > first);
    assert_eq!(block.get_generation(), second);
    assert!(manager.find(first).is_none());
    assert!(Arc::ptr_eq(&manager.find(second).unwrap(), &block));
}

#[test]
fn change_signal_fans_out() {
    let manager = DataBlockManager::new();
    let block = ramp_volume(&manager);
    let fired = Arc::new(AtomicUsize::new(0));
    let a = {
        let fired = fired.clone();
        block.data_changed_signal.connect(move || {
            fired.fetch_add(1, Ordering::SeqCst);
        })
    };
    {
        let fired = fired.clone();
        block.data_changed_signal.connect(move || {
            fired.fetch_add(10, Ordering::SeqCst);
        });
    }

    block.set_data_at(0, 1.0);
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    block.data_changed_signal.emit();
    assert_eq!(fired.load(Ordering::SeqCst), 11);

    assert!(block.data_changed_signal.disconnect(a));
    assert!(!block.data_changed_signal.disconnect(a));
    block.data_changed_signal.emit();
    assert_eq!(fired.load(Ordering::SeqCst), 21);
}
