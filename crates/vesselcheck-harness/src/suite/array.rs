//! Dynamic-array tests.

use std::hint::black_box;
use std::ops::Index;

use vesselcheck_instrument::{Instruments, LifecycleItem as Item};

use super::{TestResult, TestSpec, Verdict};
use crate::capability::{
    ArrayAt, ArrayBack, ArrayCapacity, ArrayClear, ArrayEmpty, ArrayFront, ArrayPushBack,
    ArrayReserve, ArrayResize, ArraySize, Operation as Op,
};
use crate::config::HarnessConfig;

/// Array tests in report order.
pub static SPECS: &[TestSpec] = &[
    TestSpec::new("constructor (default)", &[Op::Default], &[]),
    TestSpec::new("size", &[Op::Size], &[Op::Default]),
    TestSpec::new("capacity", &[Op::Capacity], &[Op::Default, Op::PushBack]),
    TestSpec::new(
        "reserve",
        &[Op::Reserve],
        &[Op::Default, Op::Capacity, Op::PushBack],
    ),
    TestSpec::new("push_back", &[Op::PushBack], &[Op::Default, Op::Size]),
    TestSpec::new("push_back (amortized growth)", &[Op::PushBack], &[Op::Default]),
    TestSpec::new("empty", &[Op::Empty], &[Op::Default, Op::PushBack]),
    TestSpec::new("index", &[Op::Index], &[Op::Default, Op::PushBack]),
    TestSpec::new("at", &[Op::At], &[Op::Default, Op::PushBack]),
    TestSpec::new("front", &[Op::Front], &[Op::Default, Op::PushBack]),
    TestSpec::new("back", &[Op::Back], &[Op::Default, Op::PushBack]),
    TestSpec::new("clear", &[Op::Clear], &[Op::Default, Op::PushBack, Op::Size]),
    TestSpec::new("resize", &[Op::Resize], &[Op::Default, Op::Size]),
    TestSpec::new("clean up", &[Op::Destroy], &[Op::Default, Op::PushBack]),
    TestSpec::new("clean up (growth)", &[Op::Destroy], &[Op::Default, Op::PushBack]),
    TestSpec::new(
        "copy constructor",
        &[Op::CopyConstruct],
        &[Op::Default, Op::PushBack, Op::Size],
    ),
    TestSpec::new(
        "copy assignment",
        &[Op::CopyAssign],
        &[Op::Default, Op::PushBack, Op::Size],
    ),
    TestSpec::new(
        "move constructor",
        &[Op::MoveConstruct],
        &[Op::Default, Op::PushBack, Op::Size],
    ),
    TestSpec::new(
        "move assignment",
        &[Op::MoveAssign],
        &[Op::Default, Op::PushBack, Op::Size],
    ),
];

fn filled<A: Default + ArrayPushBack<Item>>(first_id: i64, n: usize) -> A {
    let mut array = A::default();
    for i in 0..n {
        array.push_back(Item::new(first_id + i as i64));
    }
    array
}

pub fn constructor_default<A: Default>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult {
    let mut v = Verdict::begin(inst);
    drop(black_box(A::default()));
    v.expect_settled();
    v.finish()
}

pub fn size<A: Default + ArraySize>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult {
    let mut v = Verdict::begin(inst);
    let array = A::default();
    v.expect(array.size() == 0);
    drop(array);
    v.expect_settled();
    v.finish()
}

/// Capacity must strictly increase the first time it changes.
pub fn capacity<A>(inst: &mut Instruments, cfg: &HarnessConfig) -> TestResult
where
    A: Default + ArrayCapacity + ArrayPushBack<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let mut array = A::default();
        let initial = array.capacity();
        for inserted in 1..=cfg.growth_poll_limit {
            array.push_back(Item::new(inserted as i64));
            let now = array.capacity();
            v.expect(now >= inserted);
            if now != initial {
                v.expect(now > initial);
                break;
            }
        }
    }
    v.expect_settled();
    v.finish()
}

/// Reserving on a populated array must not lose or duplicate elements.
pub fn reserve<A>(inst: &mut Instruments, cfg: &HarnessConfig) -> TestResult
where
    A: Default + ArrayReserve + ArrayCapacity + ArrayPushBack<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let held = cfg.reserve_held_items;
        let mut array: A = filled(0, held);
        let before = v.instruments().lifecycle();
        array.reserve(cfg.reserve_capacity);
        let after = v.instruments().lifecycle();

        v.expect(array.capacity() >= cfg.reserve_capacity);
        v.expect_alive(held as i64);
        let copied = after.copy_constructed.saturating_sub(before.copy_constructed);
        let moved = after.move_constructed.saturating_sub(before.move_constructed);
        v.check(
            copied + moved <= held as u64,
            TestResult::IncorrectObjectHandling,
        );
        v.check(copied == 0, TestResult::SuboptimalObjectHandling);

        array.reserve(0);
        v.expect(array.capacity() >= held);
    }
    v.expect_settled();
    v.finish()
}

pub fn push_back<A>(inst: &mut Instruments, cfg: &HarnessConfig) -> TestResult
where
    A: Default + ArraySize + ArrayPushBack<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let mut array = A::default();
        v.expect(array.size() == 0);
        for n in 1..=cfg.fill_items {
            array.push_back(Item::new(n as i64));
            v.expect(array.size() == n);
        }
        v.expect_alive(cfg.fill_items as i64);
        v.expect_no_copies();
    }
    v.expect_settled();
    v.finish()
}

/// Poll the allocation counter across insertions until storage is
/// reallocated, then check the old block was released and no element was
/// lost, duplicated or cloned.
pub fn push_back_amortized<A>(inst: &mut Instruments, cfg: &HarnessConfig) -> TestResult
where
    A: Default + ArrayPushBack<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let mut array = A::default();
        array.push_back(Item::new(0));
        let baseline = v.instruments().allocations().allocations;
        let mut inserted = 1_usize;
        let mut reallocated = false;
        while inserted < cfg.growth_poll_limit {
            array.push_back(Item::new(inserted as i64));
            inserted += 1;
            if v.instruments().allocations().allocations != baseline {
                reallocated = true;
                break;
            }
        }
        if reallocated {
            v.expect_outstanding(1);
        }
        v.expect_alive(inserted as i64);
        v.expect_no_copies();
        v.expect_clean();
    }
    v.expect_settled();
    v.finish()
}

pub fn empty<A>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    A: Default + ArrayEmpty + ArrayPushBack<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let mut array = A::default();
        v.expect(array.is_empty());
        array.push_back(Item::new(1));
        v.expect(!array.is_empty());
    }
    v.expect_settled();
    v.finish()
}

pub fn index<A>(inst: &mut Instruments, cfg: &HarnessConfig) -> TestResult
where
    A: Default + ArrayPushBack<Item> + Index<usize, Output = Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let mut array = A::default();
        array.push_back(Item::new(42));
        array.push_back(Item::new(23));
        v.expect(array[0].id() == 42);
        v.expect(array[1].id() == 23);
        for i in 0..cfg.fill_items {
            array.push_back(Item::new(i as i64));
        }
        v.expect(array[0].id() == 42);
        for i in 0..cfg.fill_items {
            v.expect(array[i + 2].id() == i as i64);
        }
        v.expect_no_copies();
        v.expect_clean();
    }
    v.expect_settled();
    v.finish()
}

/// Valid indices return their values; one past the end is `OutOfRange`.
pub fn at<A>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    A: Default + ArrayPushBack<Item> + ArrayAt<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let mut array = A::default();
        array.push_back(Item::new(34));
        array.push_back(Item::new(37));
        v.expect(array.at(0).map(Item::id) == Ok(34));
        v.expect(array.at(1).map(Item::id) == Ok(37));
        match array.at(2) {
            Ok(_) => v.expect(false),
            Err(err) => v.expect(err.index == 2 && err.len == 2),
        }
        v.expect(array.at(usize::MAX).is_err());
    }
    v.expect_settled();
    v.finish()
}

pub fn front<A>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    A: Default + ArrayPushBack<Item> + ArrayFront<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let mut array = A::default();
        v.expect(array.front().is_none());
        for id in [34, 37, 42] {
            array.push_back(Item::new(id));
        }
        v.expect(array.front().map(Item::id) == Some(34));
    }
    v.expect_settled();
    v.finish()
}

pub fn back<A>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    A: Default + ArrayPushBack<Item> + ArrayBack<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let mut array = A::default();
        v.expect(array.back().is_none());
        for id in [34, 37, 42] {
            array.push_back(Item::new(id));
            v.expect(array.back().map(Item::id) == Some(id));
        }
    }
    v.expect_settled();
    v.finish()
}

pub fn clear<A>(inst: &mut Instruments, cfg: &HarnessConfig) -> TestResult
where
    A: Default + ArrayPushBack<Item> + ArraySize + ArrayClear,
{
    let mut v = Verdict::begin(inst);
    {
        let mut array: A = filled(0, cfg.fill_items);
        array.clear();
        v.expect(array.size() == 0);
        v.expect_alive(0);
        array.clear();
        v.expect(array.size() == 0);
        array.push_back(Item::new(9));
        v.expect(array.size() == 1);
        v.expect_alive(1);
        v.expect_clean();
    }
    v.expect_settled();
    v.finish()
}

pub fn resize<A>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    A: Default + ArraySize + ArrayResize<Item>,
{
    let mut v = Verdict::begin(inst);
    {
        let mut array = A::default();
        array.resize(5, Item::new(7));
        v.expect(array.size() == 5);
        v.expect_alive(5);
        array.resize(2, Item::new(0));
        v.expect(array.size() == 2);
        v.expect_alive(2);
        array.resize(0, Item::new(0));
        v.expect(array.size() == 0);
        v.expect_alive(0);
        v.expect_clean();
    }
    v.expect_settled();
    v.finish()
}

pub fn clean_up<A>(inst: &mut Instruments, _: &HarnessConfig) -> TestResult
where
    A: Default + ArrayPushBack<Item>,
{
    let mut v = Verdict::begin(inst);
    drop(filled::<A>(0, 1));
    v.expect_settled();
    v.finish()
}

pub fn clean_up_growth<A>(inst: &mut Instruments, cfg: &HarnessConfig) -> TestResult
where
    A: Default + ArrayPushBack<Item>,
{
    let mut v = Verdict::begin(inst);
    drop(filled::<A>(0, cfg.cleanup_growth_items));
    v.expect_settled();
    v.finish()
}

/// A copy owns its own elements: dropping either side leaves the other whole.
pub fn copy_constructor<A>(inst: &mut Instruments, cfg: &HarnessConfig) -> TestResult
where
    A: Default + ArrayPushBack<Item> + ArraySize + Clone,
{
    let n = cfg.copy_items;
    let mut v = Verdict::begin(inst);
    {
        let original: A = filled(0, n);
        let copy = original.clone();
        v.expect_alive(2 * n as i64);
        v.expect(copy.size() == n && original.size() == n);
        let copies = v.instruments().lifecycle().copy_constructed;
        v.check(copies <= n as u64, TestResult::SuboptimalObjectHandling);
        drop(original);
        v.expect_alive(n as i64);
        v.expect(copy.size() == n);
    }
    v.expect_settled();

    v.reset();
    {
        let original: A = filled(0, n);
        let copy = original.clone();
        drop(copy);
        v.expect_alive(n as i64);
        v.expect(original.size() == n);
    }
    v.expect_settled();
    v.finish()
}

pub fn copy_assignment<A>(inst: &mut Instruments, cfg: &HarnessConfig) -> TestResult
where
    A: Default + ArrayPushBack<Item> + ArraySize + Clone,
{
    let n = cfg.copy_items;
    let mut v = Verdict::begin(inst);
    {
        let source: A = filled(0, n);
        let mut target: A = filled(100, 3);
        target.clone_from(&source);
        v.expect_alive(2 * n as i64);
        v.expect(target.size() == n && source.size() == n);
        drop(source);
        v.expect_alive(n as i64);
        v.expect(target.size() == n);
        v.expect_clean();
    }
    v.expect_settled();
    v.finish()
}

/// Moving a container relocates it; no element is cloned or dropped.
pub fn move_constructor<A>(inst: &mut Instruments, cfg: &HarnessConfig) -> TestResult
where
    A: Default + ArrayPushBack<Item> + ArraySize,
{
    let n = cfg.copy_items;
    let mut v = Verdict::begin(inst);
    {
        let source: A = filled(0, n);
        let moved = black_box(source);
        v.expect_alive(n as i64);
        v.expect(moved.size() == n);

        let outer: A = {
            let inner: A = filled(0, n);
            inner
        };
        v.expect_alive(2 * n as i64);
        v.expect(outer.size() == n);
        v.expect_no_copies();
    }
    v.expect_settled();
    v.finish()
}

pub fn move_assignment<A>(inst: &mut Instruments, cfg: &HarnessConfig) -> TestResult
where
    A: Default + ArrayPushBack<Item> + ArraySize,
{
    let n = cfg.copy_items;
    let mut v = Verdict::begin(inst);
    {
        let source: A = filled(0, n);
        let mut target: A = filled(100, 3);
        v.expect_alive(n as i64 + 3);
        v.expect(target.size() == 3);
        target = black_box(source);
        v.expect_alive(n as i64);
        v.expect(target.size() == n);
        v.expect_no_copies();
    }
    v.expect_settled();
    v.finish()
}

/// Probe a concrete array type and bind every array test it can run.
///
/// The type must hold [`LifecycleItem`](crate::LifecycleItem) elements, e.g.
/// `array_subject!(Vec<LifecycleItem>)`.
#[macro_export]
macro_rules! array_subject {
    ($ty:ty) => {{
        use ::core::default::Default as Dflt;
        use ::core::ops::Index as Idx;
        use $crate::LifecycleItem as It;
        use $crate::capability::{
            ArrayAt, ArrayBack, ArrayCapacity, ArrayClear, ArrayEmpty, ArrayFront, ArrayPushBack,
            ArrayReserve, ArrayResize, ArraySize, CapabilitySet, Family, Operation as Op,
        };
        use $crate::suite::array as t;

        let capabilities = CapabilitySet::language()
            .with(Op::Default, $crate::implements!($ty: Dflt))
            .with(Op::Size, $crate::implements!($ty: ArraySize))
            .with(Op::Capacity, $crate::implements!($ty: ArrayCapacity))
            .with(Op::Empty, $crate::implements!($ty: ArrayEmpty))
            .with(Op::Reserve, $crate::implements!($ty: ArrayReserve))
            .with(Op::PushBack, $crate::implements!($ty: ArrayPushBack<It>))
            .with(Op::Index, $crate::implements!($ty: Idx<usize, Output = It>))
            .with(Op::At, $crate::implements!($ty: ArrayAt<It>))
            .with(Op::Front, $crate::implements!($ty: ArrayFront<It>))
            .with(Op::Back, $crate::implements!($ty: ArrayBack<It>))
            .with(Op::Clear, $crate::implements!($ty: ArrayClear))
            .with(Op::Resize, $crate::implements!($ty: ArrayResize<It>))
            .with(Op::CopyConstruct, $crate::implements!($ty: Clone))
            .with(Op::CopyAssign, $crate::implements!($ty: Clone));

        $crate::suite::Subject::new(stringify!($ty), Family::Array, capabilities)
            .with_body("constructor (default)", $crate::runnable!($ty: [Dflt] => t::constructor_default))
            .with_body("size", $crate::runnable!($ty: [Dflt + ArraySize] => t::size))
            .with_body("capacity", $crate::runnable!($ty: [Dflt + ArrayCapacity + ArrayPushBack<It>] => t::capacity))
            .with_body("reserve", $crate::runnable!($ty: [Dflt + ArrayReserve + ArrayCapacity + ArrayPushBack<It>] => t::reserve))
            .with_body("push_back", $crate::runnable!($ty: [Dflt + ArraySize + ArrayPushBack<It>] => t::push_back))
            .with_body("push_back (amortized growth)", $crate::runnable!($ty: [Dflt + ArrayPushBack<It>] => t::push_back_amortized))
            .with_body("empty", $crate::runnable!($ty: [Dflt + ArrayEmpty + ArrayPushBack<It>] => t::empty))
            .with_body("index", $crate::runnable!($ty: [Dflt + ArrayPushBack<It> + Idx<usize, Output = It>] => t::index))
            .with_body("at", $crate::runnable!($ty: [Dflt + ArrayPushBack<It> + ArrayAt<It>] => t::at))
            .with_body("front", $crate::runnable!($ty: [Dflt + ArrayPushBack<It> + ArrayFront<It>] => t::front))
            .with_body("back", $crate::runnable!($ty: [Dflt + ArrayPushBack<It> + ArrayBack<It>] => t::back))
            .with_body("clear", $crate::runnable!($ty: [Dflt + ArrayPushBack<It> + ArraySize + ArrayClear] => t::clear))
            .with_body("resize", $crate::runnable!($ty: [Dflt + ArraySize + ArrayResize<It>] => t::resize))
            .with_body("clean up", $crate::runnable!($ty: [Dflt + ArrayPushBack<It>] => t::clean_up))
            .with_body("clean up (growth)", $crate::runnable!($ty: [Dflt + ArrayPushBack<It>] => t::clean_up_growth))
            .with_body("copy constructor", $crate::runnable!($ty: [Dflt + ArrayPushBack<It> + ArraySize + Clone] => t::copy_constructor))
            .with_body("copy assignment", $crate::runnable!($ty: [Dflt + ArrayPushBack<It> + ArraySize + Clone] => t::copy_assignment))
            .with_body("move constructor", $crate::runnable!($ty: [Dflt + ArrayPushBack<It> + ArraySize] => t::move_constructor))
            .with_body("move assignment", $crate::runnable!($ty: [Dflt + ArrayPushBack<It> + ArraySize] => t::move_assignment))
    }};
}
