//! Integration test: lifecycle and allocation counters working together.
//!
//! Run: cargo test -p vesselcheck-instrument --test counters_test

use vesselcheck_instrument::{Instruments, LifecycleItem, LifecycleStatus};

#[test]
fn vec_of_items_balances_after_scope() {
    let mut inst = Instruments::acquire().unwrap();
    inst.reset();
    {
        let mut items = Vec::new();
        for id in 0..1024 {
            items.push(LifecycleItem::new(id));
        }
        assert_eq!(inst.alive(), 1024);
    }
    let snap = inst.snapshot();
    assert_eq!(snap.lifecycle.alive(), 0);
    assert_eq!(snap.lifecycle.copies(), 0);
    assert_eq!(snap.lifecycle.errors, 0);
    assert_eq!(snap.allocations.outstanding(), 0);
}

#[test]
fn vec_growth_relocates_without_cloning() {
    let mut inst = Instruments::acquire().unwrap();
    let mut items = vec![LifecycleItem::new(0)];
    inst.reset();
    let before = items.capacity();
    while items.capacity() == before {
        items.push(LifecycleItem::new(1));
    }
    let snap = inst.snapshot();
    assert_eq!(snap.lifecycle.copy_constructed, 0);
    assert_eq!(snap.allocations.outstanding(), 0);
    assert!(items.iter().all(|i| i.status() == Some(LifecycleStatus::Constructed)));
}

#[test]
fn reset_entry_points_are_idempotent() {
    let mut inst = Instruments::acquire().unwrap();
    let _live = Box::new(LifecycleItem::new(5));
    for _ in 0..2 {
        inst.reset();
        let snap = inst.snapshot();
        assert!(snap.lifecycle.is_zero());
        assert_eq!(snap.allocations.allocations, 0);
        assert_eq!(snap.allocations.deallocations, 0);
    }
}
