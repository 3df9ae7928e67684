use crate::concurrent::DataBlockManager;
use crate::core::DataType;
use crate::datablock::{clone_data_block, get_slice, DataBlock, SliceAxis};
use crate::tests::util::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn readers_never_observe_torn_fill() {
    const READERS: usize = 4;
    const ROUNDS: usize = 200;
    let manager = DataBlockManager::new();
    let block = DataBlock::new(&manager, 16, 16, 4, DataType::UInt16).unwrap();
    let barrier = Arc::new(Barrier::new(READERS + 1));
    let done = Arc::new(AtomicBool::new(false));

    let mut handles = Vec::new();
    for _ in 0..READERS {
        let block = block.clone();
        let barrier = barrier.clone();
        let done = done.clone();
        handles.push(thread::spawn(move || {
            barrier.wait();
            while !done.load(Ordering::Acquire) {
                let contents = block.read();
                let first = contents.get_data_at(0);
                for i in 0..contents.get_size() {
                    assert_eq!(contents.get_data_at(i), first);
                }
                if !contents.histogram_is_stale() {
                    assert_eq!(contents.get_max(), Ok(first));
                }
            }
        }));
    }

    barrier.wait();
    for round in 0..ROUNDS {
        let mut contents = block.write();
        for i in 0..contents.get_size() {
            contents.set_data_at(i, round as f64);
        }
        succ!(contents.update_histogram());
    }
    done.store(true, Ordering::Release);

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(block.get_max(), Ok((ROUNDS - 1) as f64));
}

#[test]
fn transforms_run_beside_a_writer() {
    let manager = DataBlockManager::new();
    let volume = indexed_block(&manager, 8, 8, 8, DataType::Float32);
    let writer = {
        let volume = volume.clone();
        thread::spawn(move || {
            for i in 0..volume.get_size() {
                volume.set_data_at(i, -(i as f64));
            }
            volume.increase_generation();
            volume.data_changed_signal.emit();
        })
    };
    for _ in 0..20 {
        let copy = clone_data_block(&volume).unwrap();
        assert_eq!(copy.get_size(), 512);
        let slice = get_slice(&volume, 3, SliceAxis::Y).unwrap();
        assert_eq!((slice.get_nx(), slice.get_ny()), (8, 8));
    }
    writer.join().unwrap();
    assert_eq!(volume.get_data_at(511), -511.0);
}
