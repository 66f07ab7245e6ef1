// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static trace buffers for bring-up code.
//!
//! Nothing can be printed while the clock tree, console and external memory
//! are still being set up, so drivers in this stage record what they did into
//! a small static ring buffer instead. After a hang, the buffer is read out
//! over JTAG, e.g. with GDB:
//!
//! ```console
//! (gdb) set print pretty on
//! (gdb) print drv_sdrsdramc::sequencer::__RINGBUF
//! ```
//!
//! Each entry carries the source line that produced it, a generation number
//! bumped every time the slot is reused, a repeat count, and the payload.
//! Recording the same payload from the same line twice in a row bumps the
//! count of the existing entry rather than taking a new slot, so a loop that
//! issues eight identical commands shows up as a single entry with count 8.
//!
//! ## Declaring and recording
//!
//! ```
//! #[derive(Copy, Clone, PartialEq)]
//! enum Trace {
//!     Pause(u32),
//!     None,
//! }
//!
//! ringbuf!(Trace, 16, Trace::None);
//!
//! ringbuf_entry!(Trace::Pause(200));
//! ```
//!
//! A module may declare more than one buffer by naming them:
//! `ringbuf!(EBI_RINGBUF, Trace, 8, Trace::None)` and
//! `ringbuf_entry!(EBI_RINGBUF, Trace::None)`.
//!
//! The payload type must be `Copy + PartialEq`.

#![cfg_attr(not(test), no_std)]

#[doc(hidden)]
pub use static_cell::StaticCell;

/// Declares a ring buffer in the current module.
///
/// `ringbuf!(NAME, Type, N, expr)` makes a static named `NAME` holding `N`
/// entries of `Type`, each initialized to `expr`. Without a name, the buffer
/// is called `__RINGBUF`.
#[cfg(not(feature = "disabled"))]
#[macro_export]
macro_rules! ringbuf {
    ($name:ident, $t:ty, $n:expr, $init:expr) => {
        #[used]
        static $name: $crate::StaticCell<$crate::Ringbuf<$t, $n>> =
            $crate::StaticCell::new($crate::Ringbuf {
                last: None,
                buffer: [$crate::RingbufEntry {
                    line: 0,
                    generation: 0,
                    count: 0,
                    payload: $init,
                }; $n],
            });
    };
    ($t:ty, $n:expr, $init:expr) => {
        $crate::ringbuf!(__RINGBUF, $t, $n, $init);
    };
}

#[cfg(feature = "disabled")]
#[macro_export]
macro_rules! ringbuf {
    ($name:ident, $t:ty, $n:expr, $init:expr) => {
        #[allow(dead_code)]
        const _: $t = $init;
    };
    ($t:ty, $n:expr, $init:expr) => {
        #[allow(dead_code)]
        const _: $t = $init;
    };
}

/// Records `payload` into a ring buffer declared with [`ringbuf!`].
///
/// If the buffer is already borrowed the entry is dropped: a trace must never
/// be the reason bring-up stops.
#[cfg(not(feature = "disabled"))]
#[macro_export]
macro_rules! ringbuf_entry {
    ($buf:expr, $payload:expr) => {{
        // Evaluate buf and payload separately so neither can see the other's
        // bindings.
        let (p, buf) = ($payload, &$buf);
        if let Some(mut rb) = $crate::StaticCell::try_borrow_mut(buf) {
            $crate::Ringbuf::entry(&mut *rb, line!() as u16, p);
        }
    }};
    ($payload:expr) => {
        $crate::ringbuf_entry!(__RINGBUF, $payload)
    };
}

#[cfg(feature = "disabled")]
#[macro_export]
macro_rules! ringbuf_entry {
    ($buf:expr, $payload:expr) => {{
        let _ = &$payload;
    }};
    ($payload:expr) => {{
        let _ = &$payload;
    }};
}

/// One slot of a [`Ringbuf`].
#[derive(Debug, Copy, Clone)]
pub struct RingbufEntry<T: Copy + PartialEq> {
    pub line: u16,
    pub generation: u16,
    pub count: u32,
    pub payload: T,
}

/// A ring buffer of `N` entries. Declare these with [`ringbuf!`] rather than
/// by hand.
#[derive(Debug)]
pub struct Ringbuf<T: Copy + PartialEq, const N: usize> {
    pub last: Option<usize>,
    pub buffer: [RingbufEntry<T>; N],
}

impl<T: Copy + PartialEq, const N: usize> Ringbuf<T, N> {
    pub fn entry(&mut self, line: u16, payload: T) {
        // An empty buffer is treated as "last slot is out of range", which
        // both skips the repeat check and lands the first entry in slot 0.
        let last = self.last.unwrap_or(usize::MAX);

        if let Some(ent) = self.buffer.get_mut(last) {
            if ent.line == line && ent.payload == payload {
                if let Some(count) = ent.count.checked_add(1) {
                    ent.count = count;
                    return;
                }
            }
        }

        // No remainder: several of our cores lack a hardware divider.
        let next = last.wrapping_add(1);
        let ndx = if next >= N { 0 } else { next };

        let ent = &mut self.buffer[ndx];
        *ent = RingbufEntry {
            line,
            payload,
            count: 1,
            generation: ent.generation.wrapping_add(1),
        };
        self.last = Some(ndx);
    }

    /// The most recently recorded entry, if any.
    pub fn latest(&self) -> Option<&RingbufEntry<T>> {
        self.last.and_then(|i| self.buffer.get(i))
    }
}
