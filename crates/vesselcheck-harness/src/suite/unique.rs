//! Unique-ownership pointer tests.
//!
//! Several bodies here only exercise single-owner behavior and are reused by
//! the shared-pointer table.

use std::hint::black_box;
use std::ops::Deref;
use std::ptr;

use vesselcheck_instrument::{Instruments, LifecycleItem as Item};

use super::{TestResult, TestSpec, Verdict};
use crate::capability::{
    Operation as Op, PointerFromBox, PointerFromValue, PointerGet, PointerRelease, PointerReset,
    PointerResetWith, PointerTake,
};
use crate::config::HarnessConfig;

/// Unique-pointer tests in report order.
pub static SPECS: &[TestSpec] = &[
    TestSpec::new("constructor (default)", &[Op::Default], &[]),
    TestSpec::new("constructor (pointer)", &[Op::FromBox], &[]),
    TestSpec::new("constructor (val)", &[Op::FromValue], &[]),
    TestSpec::new("destructor", &[Op::Destroy], &[Op::FromBox]),
    TestSpec::must_be_absent("copy constructor", &[Op::CopyConstruct]),
    TestSpec::must_be_absent("copy assignment", &[Op::CopyAssign]),
    TestSpec::new("move constructor", &[Op::MoveConstruct], &[Op::FromBox]),
    TestSpec::new("move assignment", &[Op::MoveAssign], &[Op::FromBox]),
    TestSpec::new("take", &[Op::Take], &[Op::FromBox, Op::Get]),
    TestSpec::new("reset", &[Op::ResetEmpty, Op::ResetWith], &[Op::FromBox]),
    TestSpec::new("release", &[Op::Release], &[Op::FromBox, Op::Get]),
    TestSpec::new("get", &[Op::Get], &[Op::FromBox]),
    TestSpec::new("dereference", &[Op::Deref], &[Op::FromBox]),
];

/// Heap payload plus its address, captured before ownership moves.
pub(crate) fn payload(id: i64) -> (Box<Item>, *const Item) {
    let boxed = Box::new(Item::new(id));
    let raw: *const Item = &*boxed;
    (boxed, raw)
}

pub fn constructor_default<P: Default>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult {
    let mut v = Verdict::begin(inst);
    drop(black_box(P::default()));
    v.expect_settled();
    v.finish()
}

pub fn constructor_pointer<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromBox<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let pointer = P::from_box(Box::new(Item::new(1)));
        v.expect_alive(1);
        v.expect_no_copies();
        drop(pointer);
    }
    v.expect_settled();
    v.finish()
}

pub fn constructor_value<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromValue<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let pointer = P::from_value(Item::new(1));
        v.expect_alive(1);
        v.expect_no_copies();
        drop(pointer);
    }
    v.expect_settled();
    v.finish()
}

pub fn destructor<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromBox<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let _pointer = P::from_box(Box::new(Item::new(1)));
        v.expect_alive(1);
    }
    let destroyed = v.instruments().lifecycle().destroyed;
    v.check(destroyed == 1, TestResult::IncorrectObjectHandling);
    v.expect_settled();
    v.finish()
}

/// Ownership moves with the pointer; the payload is neither cloned nor dropped.
pub fn move_constructor<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromBox<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let source = P::from_box(Box::new(Item::new(1)));
        let moved = black_box(source);
        v.expect_alive(1);

        let outer = {
            let inner = P::from_box(Box::new(Item::new(2)));
            black_box(inner)
        };
        v.expect_alive(2);
        v.expect_no_copies();
        drop(moved);
        v.expect_alive(1);
        drop(outer);
    }
    v.expect_settled();
    v.finish()
}

/// Assigning over a pointer drops its old payload exactly once.
pub fn move_assignment<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromBox<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let source = P::from_box(Box::new(Item::new(1)));
        let mut target = P::from_box(Box::new(Item::new(2)));
        let _ = black_box(&target);
        v.expect_alive(2);
        target = black_box(source);
        v.expect_alive(1);
        let destroyed = v.instruments().lifecycle().destroyed;
        v.check(destroyed == 1, TestResult::IncorrectObjectHandling);
        v.expect_no_copies();
        drop(target);
    }
    v.expect_settled();
    v.finish()
}

/// `take` moves the payload out and leaves the source empty.
pub fn take<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromBox<Item> + PointerTake + PointerGet<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let (boxed, raw) = payload(1);
        let mut source = P::from_box(boxed);
        let taken = source.take();
        v.expect(source.get().is_null());
        v.expect(ptr::eq(taken.get(), raw));
        v.expect_alive(1);
        v.expect_no_copies();

        let from_empty = source.take();
        v.expect(from_empty.get().is_null());
        v.expect(source.get().is_null());
        v.expect_alive(1);
    }
    v.expect_settled();
    v.finish()
}

/// Replace the payload, then empty the pointer twice.
pub fn reset<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromBox<Item> + PointerReset + PointerResetWith<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let mut pointer = P::from_box(Box::new(Item::new(1)));
        pointer.reset_with(Box::new(Item::new(2)));
        v.expect_alive(1);
        pointer.reset();
        v.expect_alive(0);
        pointer.reset();
        v.expect_alive(0);
        v.expect_clean();
        pointer.reset_with(Box::new(Item::new(3)));
        v.expect_alive(1);
    }
    v.expect_settled();
    v.finish()
}

/// `release` hands back the same payload without dropping it.
pub fn release<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromBox<Item> + PointerRelease<Item> + PointerGet<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let (boxed, raw) = payload(5);
        let mut pointer = P::from_box(boxed);
        match pointer.release() {
            Some(released) => {
                v.expect(ptr::eq(&*released, raw));
                v.expect(pointer.get().is_null());
                v.expect(pointer.release().is_none());
                drop(pointer);
                v.expect_alive(1);
                v.expect(released.id() == 5);
            }
            None => v.expect(false),
        }
    }
    v.expect_settled();
    v.finish()
}

/// `get` yields the owned address without touching the payload. Empty
/// pointers are checked by `take` and `release`.
pub fn get<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromBox<Item> + PointerGet<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let (boxed, raw) = payload(7);
        let pointer = P::from_box(boxed);
        v.expect(ptr::eq(pointer.get(), raw));
        v.expect_alive(1);
        v.expect_no_copies();
    }
    v.expect_settled();
    v.finish()
}

/// Explicit `*` and auto-deref member access reach the same payload.
pub fn dereference<P>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    P: PointerFromBox<Item> + Deref<Target = Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let (boxed, raw) = payload(42);
        let pointer = P::from_box(boxed);
        v.expect((*pointer).id() == 42);
        v.expect(pointer.id() == 42);
        v.expect(ptr::eq(&*pointer, raw));
        v.expect_no_copies();
        v.expect_clean();
    }
    v.expect_settled();
    v.finish()
}

/// Probe a concrete unique-pointer type over
/// [`LifecycleItem`](crate::LifecycleItem) and bind every test it can run.
#[macro_export]
macro_rules! unique_subject {
    ($ty:ty) => {{
        use ::core::default::Default as Dflt;
        use ::core::ops::Deref as Drf;
        use $crate::LifecycleItem as It;
        use $crate::capability::{
            CapabilitySet, Family, Operation as Op, PointerFromBox, PointerFromValue, PointerGet,
            PointerRelease, PointerReset, PointerResetWith, PointerTake,
        };
        use $crate::suite::unique as t;

        let capabilities = CapabilitySet::language()
            .with(Op::Default, $crate::implements!($ty: Dflt))
            .with(Op::FromBox, $crate::implements!($ty: PointerFromBox<It>))
            .with(Op::FromValue, $crate::implements!($ty: PointerFromValue<It>))
            .with(Op::CopyConstruct, $crate::implements!($ty: Clone))
            .with(Op::CopyAssign, $crate::implements!($ty: Clone))
            .with(Op::Take, $crate::implements!($ty: PointerTake))
            .with(Op::ResetEmpty, $crate::implements!($ty: PointerReset))
            .with(Op::ResetWith, $crate::implements!($ty: PointerResetWith<It>))
            .with(Op::Release, $crate::implements!($ty: PointerRelease<It>))
            .with(Op::Get, $crate::implements!($ty: PointerGet<It>))
            .with(Op::Deref, $crate::implements!($ty: Drf<Target = It>));

        $crate::suite::Subject::new(stringify!($ty), Family::UniquePointer, capabilities)
            .with_body("constructor (default)", $crate::runnable!($ty: [Dflt] => t::constructor_default))
            .with_body("constructor (pointer)", $crate::runnable!($ty: [PointerFromBox<It>] => t::constructor_pointer))
            .with_body("constructor (val)", $crate::runnable!($ty: [PointerFromValue<It>] => t::constructor_value))
            .with_body("destructor", $crate::runnable!($ty: [PointerFromBox<It>] => t::destructor))
            .with_body("move constructor", $crate::runnable!($ty: [PointerFromBox<It>] => t::move_constructor))
            .with_body("move assignment", $crate::runnable!($ty: [PointerFromBox<It>] => t::move_assignment))
            .with_body("take", $crate::runnable!($ty: [PointerFromBox<It> + PointerTake + PointerGet<It>] => t::take))
            .with_body("reset", $crate::runnable!($ty: [PointerFromBox<It> + PointerReset + PointerResetWith<It>] => t::reset))
            .with_body("release", $crate::runnable!($ty: [PointerFromBox<It> + PointerRelease<It> + PointerGet<It>] => t::release))
            .with_body("get", $crate::runnable!($ty: [PointerFromBox<It> + PointerGet<It>] => t::get))
            .with_body("dereference", $crate::runnable!($ty: [PointerFromBox<It> + Drf<Target = It>] => t::dereference))
    }};
}
