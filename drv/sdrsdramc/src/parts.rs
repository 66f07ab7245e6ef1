// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Known parts.
//!
//! Numbers here come straight from the datasheet tables for the speed grade
//! and CAS latency noted. Do not round them to what a particular board clock
//! happens to need; [`crate::timing`] does that.

use crate::profile::*;
use static_assertions::const_assert_eq;

/// ISSI IS42S16800F-7: 128Mbit, 2M x 16 x 4 banks, run at CAS latency 2.
pub const IS42S16800F: DeviceProfile = DeviceProfile {
    name: "IS42S16800F",
    bus_width: BusWidth::Sixteen,
    column_bits: 9,
    row_bits: 12,
    banks: Banks::Four,
    cas_latency: CasLatency::Two,
    decode: Decode::Interleaved,
    max_clock_hz: 133_000_000,
    timings: DeviceTimings {
        t_ras: Bound::ns(37),
        t_rcd: Bound::ns(15),
        t_wr: Bound::cycles(2),
        t_rc: Bound::ns(60),
        t_rp: Bound::ns(15),
        t_rrd: Bound::ns(14),
        t_mrd: Bound::cycles(2),
        t_xsnr: Bound::ns(70),
        t_xsrd: Bound::cycles(200),
        t_xp: Bound::cycles(2),
        t_rfc: Bound::ns(60),
    },
    refresh: Refresh {
        window_ms: 64,
        rows: 4096,
    },
};

/// ISSI IS42S16160J-7: 256Mbit, 4M x 16 x 4 banks, run at CAS latency 2.
pub const IS42S16160J: DeviceProfile = DeviceProfile {
    name: "IS42S16160J",
    bus_width: BusWidth::Sixteen,
    column_bits: 9,
    row_bits: 13,
    banks: Banks::Four,
    cas_latency: CasLatency::Two,
    decode: Decode::Interleaved,
    max_clock_hz: 133_000_000,
    timings: DeviceTimings {
        t_ras: Bound::ns(37),
        t_rcd: Bound::ns(15),
        t_wr: Bound::cycles(2),
        t_rc: Bound::ns(60),
        t_rp: Bound::ns(15),
        t_rrd: Bound::ns(14),
        t_mrd: Bound::cycles(2),
        t_xsnr: Bound::ns(70),
        t_xsrd: Bound::cycles(200),
        t_xp: Bound::cycles(2),
        t_rfc: Bound::ns(60),
    },
    // 8K rows, so twice the refresh rate of the 128Mbit part.
    refresh: Refresh {
        window_ms: 64,
        rows: 8192,
    },
};

const_assert_eq!(IS42S16800F.size_bytes(), 16 << 20);
const_assert_eq!(IS42S16160J.size_bytes(), 32 << 20);
