// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of datasheet minimums into controller clock cycles.
//!
//! Every delay rounds *up*: a cycle count is only acceptable if
//! `cycles * period >= minimum`. The refresh interval is the one value that
//! rounds *down*, since refreshing a little early is harmless and refreshing
//! late loses data.

use crate::profile::{Bound, DeviceProfile, Refresh};

const NS_PER_S: u64 = 1_000_000_000;
const MS_PER_S: u64 = 1_000;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TimingError {
    /// A clock of 0 Hz has no cycle time.
    ZeroClock,
    /// The clock is faster than the part is rated for.
    ClockTooFast { max_hz: u32 },
    /// The clock is so slow that one refresh period is shorter than a cycle.
    RefreshTooFrequent,
    /// The part's minimums contradict each other (tRC < tRAS + tRP), which
    /// usually means numbers from two different datasheets were mixed. Also
    /// covers a refresh window or row count of zero.
    InconsistentProfile,
}

/// Cycle counts derived for one part at one clock.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SdramTiming {
    pub ras: u32,
    pub rcd: u32,
    pub wr: u32,
    pub rc: u32,
    pub rp: u32,
    pub rrd: u32,
    pub mrd: u32,
    pub xsnr: u32,
    pub xsrd: u32,
    pub xp: u32,
    pub rfc: u32,
    /// Clock cycles between distributed auto-refresh commands.
    pub refresh_count: u32,
}

/// Smallest cycle count at `clock_hz` lasting at least `ns` nanoseconds.
///
/// Saturates at `u32::MAX`; register encoding rejects anything that large.
pub fn ns_to_cycles(ns: u32, clock_hz: u32) -> u32 {
    let scaled = u64::from(ns) * u64::from(clock_hz);
    u32::try_from(scaled.div_ceil(NS_PER_S)).unwrap_or(u32::MAX)
}

impl Bound {
    /// Cycles needed at `clock_hz` to satisfy both halves of the bound.
    pub fn cycles_at(&self, clock_hz: u32) -> u32 {
        ns_to_cycles(self.ns, clock_hz).max(self.cycles)
    }

    /// The bound's minimum duration at `clock_hz`, in units of
    /// 1/(`clock_hz` * 1e9) seconds, so both halves compare without rounding.
    fn scaled_at(&self, clock_hz: u32) -> u64 {
        let ns = u64::from(self.ns) * u64::from(clock_hz);
        let cycles = u64::from(self.cycles) * NS_PER_S;
        ns.max(cycles)
    }
}

/// Cycles between refresh commands so that all rows are refreshed within the
/// window: `floor(clock_hz * window_ms / (1000 * rows))`.
pub fn refresh_count(
    refresh: &Refresh,
    clock_hz: u32,
) -> Result<u32, TimingError> {
    if clock_hz == 0 {
        return Err(TimingError::ZeroClock);
    }
    if refresh.window_ms == 0 || refresh.rows == 0 {
        return Err(TimingError::InconsistentProfile);
    }
    let per_window = u64::from(clock_hz) * u64::from(refresh.window_ms);
    let count = per_window / (MS_PER_S * u64::from(refresh.rows));
    match u32::try_from(count) {
        Ok(0) => Err(TimingError::RefreshTooFrequent),
        Ok(n) => Ok(n),
        Err(_) => Ok(u32::MAX),
    }
}

impl SdramTiming {
    pub fn derive(
        profile: &DeviceProfile,
        clock_hz: u32,
    ) -> Result<Self, TimingError> {
        if clock_hz == 0 {
            return Err(TimingError::ZeroClock);
        }
        if clock_hz > profile.max_clock_hz {
            return Err(TimingError::ClockTooFast {
                max_hz: profile.max_clock_hz,
            });
        }

        // A row cycle is an activate followed by a precharge, so its
        // minimum can't be shorter than theirs combined. Compared as
        // durations at this clock, since any of the three may be given in
        // cycles.
        let t = &profile.timings;
        let rc = t.t_rc.scaled_at(clock_hz);
        let ras_rp = t
            .t_ras
            .scaled_at(clock_hz)
            .saturating_add(t.t_rp.scaled_at(clock_hz));
        if rc < ras_rp {
            return Err(TimingError::InconsistentProfile);
        }

        Ok(Self {
            ras: t.t_ras.cycles_at(clock_hz),
            rcd: t.t_rcd.cycles_at(clock_hz),
            wr: t.t_wr.cycles_at(clock_hz),
            rc: t.t_rc.cycles_at(clock_hz),
            rp: t.t_rp.cycles_at(clock_hz),
            rrd: t.t_rrd.cycles_at(clock_hz),
            mrd: t.t_mrd.cycles_at(clock_hz),
            xsnr: t.t_xsnr.cycles_at(clock_hz),
            xsrd: t.t_xsrd.cycles_at(clock_hz),
            xp: t.t_xp.cycles_at(clock_hz),
            rfc: t.t_rfc.cycles_at(clock_hz),
            refresh_count: refresh_count(&profile.refresh, clock_hz)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parts::IS42S16800F;

    // The rth9580wf01 master clock.
    const MCK: u32 = 132_096_000;

    #[test]
    fn ceiling_conversion() {
        assert_eq!(ns_to_cycles(45, 133_000_000), 6);
        assert_eq!(ns_to_cycles(15, 100_000_000), 2);
        assert_eq!(ns_to_cycles(20, 100_000_000), 2);
        assert_eq!(ns_to_cycles(1, 100_000_000), 1);
        assert_eq!(ns_to_cycles(0, 100_000_000), 0);
    }

    #[test]
    fn saturates_instead_of_wrapping() {
        assert_eq!(ns_to_cycles(u32::MAX, u32::MAX), u32::MAX);
    }

    #[test]
    fn cycle_floor_wins_when_longer() {
        let b = Bound::ns_or_cycles(10, 3);
        assert_eq!(b.cycles_at(100_000_000), 3);
        assert_eq!(b.cycles_at(1_000_000_000), 10);
    }

    #[test]
    fn board_part_at_board_clock() {
        let t = SdramTiming::derive(&IS42S16800F, MCK).unwrap();
        assert_eq!(
            t,
            SdramTiming {
                ras: 5,
                rcd: 2,
                wr: 2,
                rc: 8,
                rp: 2,
                rrd: 2,
                mrd: 2,
                xsnr: 10,
                xsrd: 200,
                xp: 2,
                rfc: 8,
                refresh_count: 2064,
            }
        );
    }

    #[test]
    fn refresh_for_64ms_4096_rows_is_clock_over_64000() {
        let r = Refresh {
            window_ms: 64,
            rows: 4096,
        };
        assert_eq!(refresh_count(&r, MCK), Ok(2064));
        assert_eq!(refresh_count(&r, 100_000_000), Ok(1562));
        assert_eq!(refresh_count(&r, 64_000), Ok(1));
        assert_eq!(
            refresh_count(&r, 63_999),
            Err(TimingError::RefreshTooFrequent)
        );
    }

    #[test]
    fn zero_clock_rejected() {
        assert_eq!(
            SdramTiming::derive(&IS42S16800F, 0),
            Err(TimingError::ZeroClock)
        );
    }

    #[test]
    fn overclock_rejected() {
        assert_eq!(
            SdramTiming::derive(&IS42S16800F, 166_000_000),
            Err(TimingError::ClockTooFast {
                max_hz: 133_000_000
            })
        );
    }

    #[test]
    fn row_cycle_given_in_cycles_is_accepted() {
        // 8 cycles at MCK is ~60.6 ns, covering 37 ns + 15 ns.
        let mut p = IS42S16800F;
        p.timings.t_rc = Bound::cycles(8);
        let t = SdramTiming::derive(&p, MCK).unwrap();
        assert_eq!((t.ras, t.rp, t.rc), (5, 2, 8));
    }

    #[test]
    fn row_cycle_too_few_cycles_rejected() {
        // 6 cycles is ~45.4 ns, short of 52 ns.
        let mut p = IS42S16800F;
        p.timings.t_rc = Bound::cycles(6);
        assert_eq!(
            SdramTiming::derive(&p, MCK),
            Err(TimingError::InconsistentProfile)
        );
    }

    #[test]
    fn contradiction_in_cycle_floors_rejected() {
        // Nanosecond halves agree; the floors on tRAS and tRP don't fit in
        // tRC's floor at a fast clock.
        let mut p = IS42S16800F;
        p.timings.t_ras = Bound::ns_or_cycles(37, 6);
        p.timings.t_rp = Bound::ns_or_cycles(15, 3);
        p.timings.t_rc = Bound::ns_or_cycles(60, 8);
        assert_eq!(
            SdramTiming::derive(&p, MCK),
            Err(TimingError::InconsistentProfile)
        );

        p.timings.t_rc = Bound::ns_or_cycles(60, 9);
        let t = SdramTiming::derive(&p, MCK).unwrap();
        assert_eq!((t.ras, t.rp, t.rc), (6, 3, 9));
    }

    #[test]
    fn empty_refresh_window_rejected() {
        let mut p = IS42S16800F;
        p.refresh.rows = 0;
        assert_eq!(
            SdramTiming::derive(&p, MCK),
            Err(TimingError::InconsistentProfile)
        );

        let mut p = IS42S16800F;
        p.refresh.window_ms = 0;
        assert_eq!(
            SdramTiming::derive(&p, MCK),
            Err(TimingError::InconsistentProfile)
        );
    }

    #[test]
    fn mixed_datasheets_rejected() {
        let mut p = IS42S16800F;
        p.timings.t_rc = Bound::ns(45);
        assert_eq!(
            SdramTiming::derive(&p, MCK),
            Err(TimingError::InconsistentProfile)
        );
    }
}
