// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cells for statics touched from the single bring-up context.
//!
//! The boot stage runs on one core with interrupts masked, but some of our
//! targets (ARMv5TE, ARMv6-M) have no atomic read-modify-write instructions.
//! On those, the claim flag is tested and set with a plain load followed by a
//! store, which is only sound because nothing can run between the two.

#![cfg_attr(not(test), no_std)]

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

/// Sets `flag` and returns its previous value.
#[cfg(target_has_atomic = "8")]
#[inline]
fn test_and_set(flag: &AtomicBool) -> bool {
    flag.swap(true, Ordering::Acquire)
}

#[cfg(not(target_has_atomic = "8"))]
#[inline]
fn test_and_set(flag: &AtomicBool) -> bool {
    let was = flag.load(Ordering::Acquire);
    flag.store(true, Ordering::Release);
    was
}

/// A RefCell-style container that can live in a static, allowing one mutable
/// borrow at a time.
#[derive(Default)]
pub struct StaticCell<T> {
    borrowed: AtomicBool,
    cell: UnsafeCell<T>,
}

impl<T> StaticCell<T> {
    pub const fn new(contents: T) -> Self {
        Self {
            borrowed: AtomicBool::new(false),
            cell: UnsafeCell::new(contents),
        }
    }

    /// Gets mutable access to the contents of `self`.
    ///
    /// Panics if a `StaticRef` for `self` is still alive.
    #[track_caller]
    pub fn borrow_mut(&self) -> StaticRef<'_, T> {
        match self.try_borrow_mut() {
            Some(r) => r,
            None => panic!(),
        }
    }

    /// Gets mutable access to the contents of `self`, or `None` if a
    /// `StaticRef` for `self` is still alive.
    pub fn try_borrow_mut(&self) -> Option<StaticRef<'_, T>> {
        if test_and_set(&self.borrowed) {
            return None;
        }
        // Safety: the flag was clear, so no other &mut to the contents exists.
        Some(StaticRef {
            contents: unsafe { &mut *self.cell.get() },
            borrow: &self.borrowed,
        })
    }
}

unsafe impl<T> Sync for StaticCell<T> where for<'a> &'a mut T: Send {}

pub struct StaticRef<'a, T> {
    contents: &'a mut T,
    borrow: &'a AtomicBool,
}

impl<T> Drop for StaticRef<'_, T> {
    fn drop(&mut self) {
        self.borrow.store(false, Ordering::Release);
    }
}

impl<T> core::ops::Deref for StaticRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.contents
    }
}

impl<T> core::ops::DerefMut for StaticRef<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.contents
    }
}

/// A cell whose contents may be claimed exactly once per boot.
///
/// Used for hardware handles: a second claim is a programming error and
/// panics, so holding the returned reference proves nobody else has one.
pub struct ClaimOnceCell<T> {
    taken: AtomicBool,
    cell: UnsafeCell<T>,
}

// Safety: the contents are handed out at most once, so they are never aliased.
unsafe impl<T> Sync for ClaimOnceCell<T> where for<'a> &'a T: Send {}

impl<T> ClaimOnceCell<T> {
    pub const fn new(value: T) -> Self {
        Self {
            taken: AtomicBool::new(false),
            cell: UnsafeCell::new(value),
        }
    }

    /// Claims the contents. Panics if they have already been claimed.
    #[track_caller]
    #[must_use = "an unused claim leaves the cell permanently unusable"]
    pub fn claim(&self) -> &mut T {
        if test_and_set(&self.taken) {
            panic!();
        }
        // Safety: `taken` was clear, and is now set forever.
        unsafe { &mut *self.cell.get() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrow_is_released_on_drop() {
        let cell = StaticCell::new(5u32);
        {
            let mut r = cell.borrow_mut();
            *r += 1;
            assert!(cell.try_borrow_mut().is_none());
        }
        assert_eq!(*cell.borrow_mut(), 6);
    }

    #[test]
    #[should_panic]
    fn double_borrow_panics() {
        let cell = StaticCell::new(());
        let _a = cell.borrow_mut();
        let _b = cell.borrow_mut();
    }

    #[test]
    fn claim_once() {
        let cell = ClaimOnceCell::new([0u8; 4]);
        let v = cell.claim();
        v[0] = 1;
        assert_eq!(v, &[1, 0, 0, 0]);
    }

    #[test]
    #[should_panic]
    fn second_claim_panics() {
        let cell = ClaimOnceCell::new(0u32);
        let _first = cell.claim();
        let _second = cell.claim();
    }
}
