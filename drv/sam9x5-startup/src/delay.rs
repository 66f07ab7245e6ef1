// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use embedded_hal::blocking::delay::DelayUs;

/// Busy-wait delay calibrated from the CPU clock.
///
/// Assumes each loop iteration costs at least one CPU cycle, so delays come
/// out long, never short. It must be built from the *processor* clock, not
/// the master clock, which is slower.
#[derive(Copy, Clone, Debug)]
pub struct BusyWait {
    loops_per_us: u32,
}

impl BusyWait {
    pub fn new(cpu_hz: u32) -> Self {
        Self {
            loops_per_us: cpu_hz.div_ceil(1_000_000).max(1),
        }
    }

    pub fn loops_per_us(&self) -> u32 {
        self.loops_per_us
    }

    /// Loop iterations spent waiting `us` microseconds.
    pub fn loops(&self, us: u32) -> u64 {
        u64::from(us) * u64::from(self.loops_per_us)
    }
}

impl DelayUs<u32> for BusyWait {
    fn delay_us(&mut self, us: u32) {
        for i in 0..self.loops(us) {
            core::hint::black_box(i);
        }
    }
}
