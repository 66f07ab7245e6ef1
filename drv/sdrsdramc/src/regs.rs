// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DDRSDRC register layout, and encoding of a part plus its derived timing
//! into register values.
//!
//! Only the fields that matter in SDR mode are named; the DDR-only fields
//! (DLL, OCD, DQS and friends) are left at zero.

use bitfield::bitfield;
use num_derive::FromPrimitive;
use static_assertions::const_assert;

use crate::profile::{Banks, BusWidth, Decode, DeviceProfile};
use crate::timing::SdramTiming;

/// Mode register: command to issue on the next SDRAM access.
pub const MR: u32 = 0x00;
/// Refresh timer register.
pub const RTR: u32 = 0x04;
/// Configuration register.
pub const CR: u32 = 0x08;
/// Timing parameter 0 register.
pub const T0PR: u32 = 0x0C;
/// Timing parameter 1 register.
pub const T1PR: u32 = 0x10;
/// Memory device register.
pub const MDR: u32 = 0x20;

/// Commands selectable through `MR.MODE`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, FromPrimitive)]
#[repr(u32)]
pub enum Command {
    Normal = 0,
    Nop = 1,
    PrechargeAll = 2,
    LoadModeRegister = 3,
    AutoRefresh = 4,
    ExtLoadModeRegister = 5,
    DeepPowerDown = 6,
}

/// Memory device type, `MDR.MD`.
const MD_SDR_SDRAM: u32 = 0;

bitfield! {
    #[derive(Copy, Clone, Eq, PartialEq)]
    pub struct Mr(u32);
    impl Debug;
    pub u32, mode, set_mode: 2, 0;
}

bitfield! {
    #[derive(Copy, Clone, Eq, PartialEq)]
    pub struct Rtr(u32);
    impl Debug;
    pub u32, count, set_count: 11, 0;
}

bitfield! {
    #[derive(Copy, Clone, Eq, PartialEq)]
    pub struct Cr(u32);
    impl Debug;
    /// Column bits minus 8.
    pub u32, nc, set_nc: 1, 0;
    /// Row bits minus 11.
    pub u32, nr, set_nr: 3, 2;
    pub u32, cas, set_cas: 6, 4;
    /// Set means eight banks, clear means four.
    pub bool, nb, set_nb: 20;
    /// Set means interleaved decode.
    pub bool, decod, set_decod: 22;
}

bitfield! {
    #[derive(Copy, Clone, Eq, PartialEq)]
    pub struct T0pr(u32);
    impl Debug;
    pub u32, tras, set_tras: 3, 0;
    pub u32, trcd, set_trcd: 7, 4;
    pub u32, twr, set_twr: 11, 8;
    pub u32, trc, set_trc: 15, 12;
    pub u32, trp, set_trp: 19, 16;
    pub u32, trrd, set_trrd: 23, 20;
    pub u32, tmrd, set_tmrd: 31, 28;
}

bitfield! {
    #[derive(Copy, Clone, Eq, PartialEq)]
    pub struct T1pr(u32);
    impl Debug;
    pub u32, trfc, set_trfc: 4, 0;
    pub u32, txsnr, set_txsnr: 15, 8;
    pub u32, txsrd, set_txsrd: 23, 16;
    pub u32, txp, set_txp: 27, 24;
}

bitfield! {
    #[derive(Copy, Clone, Eq, PartialEq)]
    pub struct Mdr(u32);
    impl Debug;
    pub u32, md, set_md: 2, 0;
    /// Set means a 16-bit data bus, clear means 32-bit.
    pub bool, dbw, set_dbw: 4;
}

/// A register field that a derived value has to fit into.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Field {
    Tras,
    Trcd,
    Twr,
    Trc,
    Trp,
    Trrd,
    Tmrd,
    Trfc,
    Txsnr,
    Txsrd,
    Txp,
    RefreshCount,
}

impl Field {
    /// Largest value the field can hold.
    pub const fn max(self) -> u32 {
        match self {
            Field::Tras
            | Field::Trcd
            | Field::Twr
            | Field::Trc
            | Field::Trp
            | Field::Trrd
            | Field::Tmrd
            | Field::Txp => 0xF,
            Field::Trfc => 0x1F,
            Field::Txsnr | Field::Txsrd => 0xFF,
            Field::RefreshCount => 0xFFF,
        }
    }
}

const_assert!(Field::RefreshCount.max() == (1 << 12) - 1);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EncodeError {
    /// A cycle count is too large for its register field; the clock is too
    /// fast for this controller to express the part's timing.
    FieldOverflow { field: Field, cycles: u32 },
    /// Column or row count the controller cannot address in SDR mode.
    UnsupportedGeometry,
}

fn fit(field: Field, cycles: u32) -> Result<u32, EncodeError> {
    if cycles > field.max() {
        Err(EncodeError::FieldOverflow { field, cycles })
    } else {
        Ok(cycles)
    }
}

impl Rtr {
    pub fn from_count(count: u32) -> Result<Self, EncodeError> {
        let mut r = Rtr(0);
        r.set_count(fit(Field::RefreshCount, count)?);
        Ok(r)
    }
}

/// The register values written during initialization.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ControllerRegisters {
    pub mdr: Mdr,
    pub cr: Cr,
    pub t0pr: T0pr,
    pub t1pr: T1pr,
    pub rtr: Rtr,
}

impl ControllerRegisters {
    pub fn encode(
        profile: &DeviceProfile,
        timing: &SdramTiming,
    ) -> Result<Self, EncodeError> {
        let mut mdr = Mdr(0);
        mdr.set_md(MD_SDR_SDRAM);
        mdr.set_dbw(profile.bus_width == BusWidth::Sixteen);

        if !(8..=11).contains(&profile.column_bits)
            || !(11..=14).contains(&profile.row_bits)
        {
            return Err(EncodeError::UnsupportedGeometry);
        }
        let mut cr = Cr(0);
        cr.set_nc(u32::from(profile.column_bits - 8));
        cr.set_nr(u32::from(profile.row_bits - 11));
        cr.set_cas(profile.cas_latency as u32);
        cr.set_nb(profile.banks == Banks::Eight);
        cr.set_decod(profile.decode == Decode::Interleaved);

        let mut t0pr = T0pr(0);
        t0pr.set_tras(fit(Field::Tras, timing.ras)?);
        t0pr.set_trcd(fit(Field::Trcd, timing.rcd)?);
        t0pr.set_twr(fit(Field::Twr, timing.wr)?);
        t0pr.set_trc(fit(Field::Trc, timing.rc)?);
        t0pr.set_trp(fit(Field::Trp, timing.rp)?);
        t0pr.set_trrd(fit(Field::Trrd, timing.rrd)?);
        t0pr.set_tmrd(fit(Field::Tmrd, timing.mrd)?);

        let mut t1pr = T1pr(0);
        t1pr.set_trfc(fit(Field::Trfc, timing.rfc)?);
        t1pr.set_txsnr(fit(Field::Txsnr, timing.xsnr)?);
        t1pr.set_txsrd(fit(Field::Txsrd, timing.xsrd)?);
        t1pr.set_txp(fit(Field::Txp, timing.xp)?);

        Ok(Self {
            mdr,
            cr,
            t0pr,
            t1pr,
            rtr: Rtr::from_count(timing.refresh_count)?,
        })
    }

    /// Capacity addressed by this configuration, in bytes.
    pub fn size_bytes(&self) -> usize {
        let banks = if self.cr.nb() { 8 } else { 4 };
        let rows = 1usize << (self.cr.nr() + 11);
        let cols = 1usize << (self.cr.nc() + 8);
        let bytes = if self.mdr.dbw() { 2 } else { 4 };
        banks * rows * cols * bytes
    }
}
