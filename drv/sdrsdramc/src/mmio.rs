// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Register access.
//!
//! Everything in this crate talks to hardware through [`RegisterAccess`], a
//! 32-bit read/write at a byte offset from some fixed base. On the target the
//! base is a physical address and [`Mmio`] does volatile loads and stores; in
//! tests it is a simulated register file.

/// 32-bit register access at byte offsets from a fixed base.
pub trait RegisterAccess {
    fn read(&self, offset: u32) -> u32;

    fn write(&mut self, offset: u32, value: u32);

    /// Read-modify-write of a single register.
    fn modify<F: FnOnce(u32) -> u32>(&mut self, offset: u32, f: F) {
        let v = self.read(offset);
        self.write(offset, f(v));
    }
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &mut T {
    fn read(&self, offset: u32) -> u32 {
        (**self).read(offset)
    }

    fn write(&mut self, offset: u32, value: u32) {
        (**self).write(offset, value)
    }
}

/// A block of memory-mapped registers (or a memory window) at a physical
/// address.
///
/// Deliberately neither `Copy` nor `Clone`: holding an `Mmio` is holding the
/// only handle to that block.
#[derive(Debug)]
pub struct Mmio {
    base: usize,
}

impl Mmio {
    /// # Safety
    ///
    /// `base` must be the address of a device register block or memory
    /// window, valid for 32-bit volatile access at every offset the caller
    /// will use, and no other `Mmio` for the same block may exist.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    pub fn base(&self) -> usize {
        self.base
    }

    fn ptr(&self, offset: u32) -> *mut u32 {
        (self.base + offset as usize) as *mut u32
    }
}

impl RegisterAccess for Mmio {
    fn read(&self, offset: u32) -> u32 {
        // Safety: validity of base + offset is the contract of `Mmio::new`.
        unsafe { core::ptr::read_volatile(self.ptr(offset)) }
    }

    fn write(&mut self, offset: u32, value: u32) {
        // Safety: as above.
        unsafe { core::ptr::write_volatile(self.ptr(offset), value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct One(u32);

    impl RegisterAccess for One {
        fn read(&self, _offset: u32) -> u32 {
            self.0
        }

        fn write(&mut self, _offset: u32, value: u32) {
            self.0 = value;
        }
    }

    fn set_low_bit<R: RegisterAccess>(mut r: R) {
        r.modify(0, |v| v | 1);
    }

    #[test]
    fn modify_goes_through_borrowed_access() {
        let mut r = One(0b1010);
        set_low_bit(&mut r);
        assert_eq!(r.0, 0b1011);
    }

    #[test]
    fn mmio_hits_backing_memory() {
        let mut words = [0u32; 4];
        let mut m = unsafe { Mmio::new(words.as_mut_ptr() as usize) };
        m.write(8, 0xdead_beef);
        assert_eq!(m.read(8), 0xdead_beef);
        drop(m);
        assert_eq!(words[2], 0xdead_beef);
    }
}
