//! Shared-ownership pointer tests.
//!
//! Single-owner behavior (construction, destruction, reset, dereference)
//! reuses the bodies in [`super::unique`].

use std::hint::black_box;
use std::ptr;

use vesselcheck_instrument::{Instruments, LifecycleItem as Item};

use super::unique::payload;
use super::{TestResult, TestSpec, Verdict};
use crate::capability::{Operation as Op, PointerFromBox, PointerGet, PointerUseCount};
use crate::config::HarnessConfig;

/// Shared-pointer tests in report order.
pub static SPECS: &[TestSpec] = &[
    TestSpec::new("constructor (default)", &[Op::Default], &[]),
    TestSpec::new("constructor (pointer)", &[Op::FromBox], &[]),
    TestSpec::new("constructor (val)", &[Op::FromValue], &[]),
    TestSpec::new("destructor", &[Op::Destroy], &[Op::FromBox]),
    TestSpec::new("copy constructor", &[Op::CopyConstruct], &[Op::FromBox]),
    TestSpec::new("copy assignment", &[Op::CopyAssign], &[Op::FromBox]),
    TestSpec::new("move constructor", &[Op::MoveConstruct], &[Op::FromBox]),
    TestSpec::new(
        "move assignment",
        &[Op::MoveAssign],
        &[Op::FromBox, Op::CopyConstruct],
    ),
    TestSpec::new("reset", &[Op::ResetEmpty, Op::ResetWith], &[Op::FromBox]),
    TestSpec::new("get", &[Op::Get], &[Op::FromBox, Op::CopyConstruct]),
    TestSpec::new("dereference", &[Op::Deref], &[Op::FromBox]),
    TestSpec::new("use_count", &[Op::UseCount], &[Op::FromBox, Op::CopyConstruct]),
];

/// A second owner shares the payload; it is dropped with the last owner.
pub fn copy_constructor<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromBox<Item> + Clone,
{
    let mut v = Verdict::begin(inst);
    {
        let first = P::from_box(Box::new(Item::new(1)));
        let second = first.clone();
        v.expect_alive(1);
        v.expect_no_copies();
        drop(first);
        v.expect_alive(1);
        v.expect_clean();
        drop(second);
        v.expect_alive(0);
    }
    v.expect_settled();
    v.finish()
}

/// Copy-assigning over an owner releases its previous payload.
pub fn copy_assignment<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromBox<Item> + Clone,
{
    let mut v = Verdict::begin(inst);
    {
        let source = P::from_box(Box::new(Item::new(1)));
        let mut target = P::from_box(Box::new(Item::new(2)));
        v.expect_alive(2);
        target.clone_from(&source);
        v.expect_alive(1);
        v.expect_no_copies();
        drop(source);
        v.expect_alive(1);
        drop(target);
    }
    v.expect_settled();
    v.finish()
}

/// Moving between co-owned pointers: each payload lives while any owner does.
pub fn move_assignment<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromBox<Item> + Clone,
{
    let mut v = Verdict::begin(inst);
    {
        let source = P::from_box(Box::new(Item::new(1)));
        let source_peer = source.clone();
        let mut target = P::from_box(Box::new(Item::new(2)));
        let target_peer = target.clone();
        let _ = black_box(&target);
        v.expect_alive(2);

        target = black_box(source);
        v.expect_alive(2);
        drop(target_peer);
        v.expect_alive(1);
        drop(source_peer);
        v.expect_alive(1);
        drop(target);
        v.expect_alive(0);
        v.expect_no_copies();
    }
    v.expect_settled();
    v.finish()
}

pub fn use_count<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromBox<Item> + Clone + PointerUseCount,
{
    let mut v = Verdict::begin(inst);
    {
        let first = P::from_box(Box::new(Item::new(1)));
        v.expect(first.use_count() == 1);
        let second = first.clone();
        v.expect(first.use_count() == 2);
        v.expect(second.use_count() == 2);
        v.expect_alive(1);
        drop(second);
        v.expect(first.use_count() == 1);
    }
    v.expect_settled();
    v.finish()
}

/// Every owner observes the payload at its original address.
pub fn get<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromBox<Item> + Clone + PointerGet<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let (boxed, raw) = payload(3);
        let first = P::from_box(boxed);
        let second = first.clone();
        v.expect(ptr::eq(first.get(), raw));
        v.expect(ptr::eq(second.get(), raw));
    }
    v.expect_settled();
    v.finish()
}

/// Probe a concrete shared-pointer type over
/// [`LifecycleItem`](crate::LifecycleItem) and bind every test it can run.
#[macro_export]
macro_rules! shared_subject {
    ($ty:ty) => {{
        use ::core::default::Default as Dflt;
        use ::core::ops::Deref as Drf;
        use $crate::LifecycleItem as It;
        use $crate::capability::{
            CapabilitySet, Family, Operation as Op, PointerFromBox, PointerFromValue, PointerGet,
            PointerReset, PointerResetWith, PointerUseCount,
        };
        use $crate::suite::{shared as s, unique as u};

        let capabilities = CapabilitySet::language()
            .with(Op::Default, $crate::implements!($ty: Dflt))
            .with(Op::FromBox, $crate::implements!($ty: PointerFromBox<It>))
            .with(Op::FromValue, $crate::implements!($ty: PointerFromValue<It>))
            .with(Op::CopyConstruct, $crate::implements!($ty: Clone))
            .with(Op::CopyAssign, $crate::implements!($ty: Clone))
            .with(Op::ResetEmpty, $crate::implements!($ty: PointerReset))
            .with(Op::ResetWith, $crate::implements!($ty: PointerResetWith<It>))
            .with(Op::Get, $crate::implements!($ty: PointerGet<It>))
            .with(Op::Deref, $crate::implements!($ty: Drf<Target = It>))
            .with(Op::UseCount, $crate::implements!($ty: PointerUseCount));

        $crate::suite::Subject::new(stringify!($ty), Family::SharedPointer, capabilities)
            .with_body("constructor (default)", $crate::runnable!($ty: [Dflt] => u::constructor_default))
            .with_body("constructor (pointer)", $crate::runnable!($ty: [PointerFromBox<It>] => u::constructor_pointer))
            .with_body("constructor (val)", $crate::runnable!($ty: [PointerFromValue<It>] => u::constructor_value))
            .with_body("destructor", $crate::runnable!($ty: [PointerFromBox<It>] => u::destructor))
            .with_body("copy constructor", $crate::runnable!($ty: [PointerFromBox<It> + Clone] => s::copy_constructor))
            .with_body("copy assignment", $crate::runnable!($ty: [PointerFromBox<It> + Clone] => s::copy_assignment))
            .with_body("move constructor", $crate::runnable!($ty: [PointerFromBox<It>] => u::move_constructor))
            .with_body("move assignment", $crate::runnable!($ty: [PointerFromBox<It> + Clone] => s::move_assignment))
            .with_body("reset", $crate::runnable!($ty: [PointerFromBox<It> + PointerReset + PointerResetWith<It>] => u::reset))
            .with_body("get", $crate::runnable!($ty: [PointerFromBox<It> + Clone + PointerGet<It>] => s::get))
            .with_body("dereference", $crate::runnable!($ty: [PointerFromBox<It> + Drf<Target = It>] => u::dereference))
            .with_body("use_count", $crate::runnable!($ty: [PointerFromBox<It> + Clone + PointerUseCount] => s::use_count))
    }};
}
