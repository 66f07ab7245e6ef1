// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Description of an SDR SDRAM part, as read off its datasheet.

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BusWidth {
    Sixteen,
    ThirtyTwo,
}

impl BusWidth {
    pub const fn bytes(self) -> usize {
        match self {
            BusWidth::Sixteen => 2,
            BusWidth::ThirtyTwo => 4,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Banks {
    Four,
    Eight,
}

impl Banks {
    pub const fn count(self) -> usize {
        match self {
            Banks::Four => 4,
            Banks::Eight => 8,
        }
    }
}

/// CAS latency in clock cycles.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum CasLatency {
    Two = 2,
    Three = 3,
}

/// How the controller maps system addresses onto bank/row/column.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Decode {
    Sequential,
    Interleaved,
}

/// A datasheet minimum: an absolute time, a clock-cycle count, or both (in
/// which case whichever is longer at the operating clock wins).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Bound {
    pub ns: u32,
    pub cycles: u32,
}

impl Bound {
    pub const fn ns(ns: u32) -> Self {
        Self { ns, cycles: 0 }
    }

    pub const fn cycles(cycles: u32) -> Self {
        Self { ns: 0, cycles }
    }

    pub const fn ns_or_cycles(ns: u32, cycles: u32) -> Self {
        Self { ns, cycles }
    }
}

/// Minimum timings from the datasheet.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DeviceTimings {
    /// ACTIVE to PRECHARGE (tRAS).
    pub t_ras: Bound,
    /// ACTIVE to READ/WRITE (tRCD).
    pub t_rcd: Bound,
    /// Write recovery (tWR, a.k.a. tDPL).
    pub t_wr: Bound,
    /// ACTIVE to ACTIVE in one bank (tRC).
    pub t_rc: Bound,
    /// PRECHARGE period (tRP).
    pub t_rp: Bound,
    /// ACTIVE bank A to ACTIVE bank B (tRRD).
    pub t_rrd: Bound,
    /// LOAD MODE REGISTER to ACTIVE (tMRD).
    pub t_mrd: Bound,
    /// Exit self refresh to non-read command (tXSNR).
    pub t_xsnr: Bound,
    /// Exit self refresh to read command (tXSRD).
    pub t_xsrd: Bound,
    /// Exit power-down (tXP).
    pub t_xp: Bound,
    /// AUTO REFRESH to ACTIVE/AUTO REFRESH (tRFC).
    pub t_rfc: Bound,
}

/// Every one of `rows` must be refreshed once per `window_ms`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Refresh {
    pub window_ms: u32,
    pub rows: u32,
}

/// An SDR SDRAM part. Parts are `const`s; see [`crate::parts`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DeviceProfile {
    pub name: &'static str,
    pub bus_width: BusWidth,
    pub column_bits: u8,
    pub row_bits: u8,
    pub banks: Banks,
    pub cas_latency: CasLatency,
    pub decode: Decode,
    /// Fastest clock the part is rated for at `cas_latency`.
    pub max_clock_hz: u32,
    pub timings: DeviceTimings,
    pub refresh: Refresh,
}

impl DeviceProfile {
    /// Capacity of the part, in bytes.
    pub const fn size_bytes(&self) -> usize {
        self.banks.count()
            * (1usize << self.row_bits)
            * (1usize << self.column_bits)
            * self.bus_width.bytes()
    }
}
