//! Integration test: container and pointer properties on the reference
//! implementations, checked directly against the instruments.
//!
//! Run: cargo test -p vesselcheck-conformance --test properties_test

use vesselcheck_conformance::{GrowVec, SharedPtr, SoloPtr};
use vesselcheck_harness::capability::{
    ArrayAt, ArrayCapacity, ArrayPushBack, ArrayReserve, ArraySize, PointerFromBox, PointerGet,
    PointerTake, PointerUseCount,
};
use vesselcheck_harness::implements;
use vesselcheck_instrument::{Instruments, LifecycleItem};

fn filled(n: usize) -> GrowVec<LifecycleItem> {
    let mut v = GrowVec::default();
    for i in 0..n {
        v.push_back(LifecycleItem::new(i as i64));
    }
    v
}

#[test]
fn size_matches_insertions() {
    let _inst = Instruments::acquire().unwrap();
    for n in [0, 1, 2, 7, 64, 1000] {
        assert_eq!(filled(n).size(), n, "after {n} insertions");
    }
}

#[test]
fn capacity_strictly_increases_when_exceeded() {
    let mut v = GrowVec::default();
    let mut previous = v.capacity();
    let mut changes = 0;
    for i in 0..5000 {
        v.push_back(i);
        let now = v.capacity();
        assert!(now >= v.size());
        if now != previous {
            assert!(now > previous, "{previous} -> {now}");
            changes += 1;
        }
        previous = now;
    }
    assert!(changes > 1);
}

#[test]
fn reserve_neither_loses_nor_duplicates() {
    let mut inst = Instruments::acquire().unwrap();
    for held in [0, 3, 17] {
        for requested in [0, 10, 100] {
            inst.reset();
            let mut v = filled(held);
            let before = inst.lifecycle();
            v.reserve(requested);
            let after = inst.lifecycle();
            assert!(v.capacity() >= requested);
            assert_eq!(inst.alive(), held as i64);
            let constructed = (after.copy_constructed - before.copy_constructed)
                + (after.move_constructed - before.move_constructed);
            assert!(constructed <= held as u64);
        }
    }
}

#[test]
fn copies_are_independent() {
    let mut inst = Instruments::acquire().unwrap();
    let n = 12;
    inst.reset();
    let original = filled(n);
    let copy = original.clone();
    assert_eq!(inst.alive(), 2 * n as i64);
    drop(original);
    assert_eq!(inst.alive(), n as i64);
    assert_eq!(copy.size(), n);
    assert_eq!(copy[n - 1].id(), n as i64 - 1);
    drop(copy);
    assert_eq!(inst.errors(), 0);
}

#[test]
fn moves_do_not_duplicate() {
    let mut inst = Instruments::acquire().unwrap();
    inst.reset();
    let source = filled(9);
    let moved = source;
    assert_eq!(inst.alive(), 9);
    assert_eq!(moved.size(), 9);
    assert_eq!(inst.lifecycle().copies(), 0);
}

#[test]
fn index_and_bounds_checked_access() {
    let _inst = Instruments::acquire().unwrap();
    let values = [34, 37, 42, -5];
    let mut v = GrowVec::default();
    for id in values {
        v.push_back(LifecycleItem::new(id));
    }
    for (i, id) in values.iter().enumerate() {
        assert_eq!(v[i].id(), *id);
        assert_eq!(v.at(i).map(LifecycleItem::id), Ok(*id));
    }
    let err = v.at(values.len()).unwrap_err();
    assert_eq!((err.index, err.len), (4, 4));
}

#[test]
fn growth_clean_up_balances_everything() {
    let mut inst = Instruments::acquire().unwrap();
    inst.reset();
    drop(filled(1024));
    assert_eq!(inst.alive(), 0);
    assert_eq!(inst.errors(), 0);
    let allocations = inst.allocations();
    assert!(allocations.allocations > 0);
    assert_eq!(allocations.allocations, allocations.deallocations);
}

#[test]
fn shared_copy_shares_one_item() {
    let mut inst = Instruments::acquire().unwrap();
    inst.reset();
    {
        let first = SharedPtr::from_box(Box::new(LifecycleItem::new(1)));
        let second = first.clone();
        assert_eq!(inst.alive(), 1);
        assert_eq!(first.use_count(), 2);
        assert_eq!(second.use_count(), 2);
    }
    assert_eq!(inst.alive(), 0);
}

#[test]
fn unique_move_leaves_source_empty() {
    let mut inst = Instruments::acquire().unwrap();
    inst.reset();
    let mut source = SoloPtr::from_box(Box::new(LifecycleItem::new(1)));
    let destination = source.take();
    assert!(source.get().is_null());
    assert!(!destination.get().is_null());
    assert_eq!(inst.alive(), 1);
    assert!(!implements!(SoloPtr<LifecycleItem>: Clone));
    drop(destination);
    assert_eq!(inst.alive(), 0);
}

#[test]
fn reset_is_idempotent() {
    let mut inst = Instruments::acquire().unwrap();
    let _kept = filled(5);
    inst.reset();
    assert!(inst.lifecycle().is_zero());
    inst.reset();
    assert!(inst.lifecycle().is_zero());
    assert_eq!(inst.outstanding(), 0);
}
