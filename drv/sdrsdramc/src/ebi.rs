// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! External bus interface chip-select routing.
//!
//! Before the SDRAM controller can issue anything, the EBI has to hand the
//! chip select wired to the SDRAM over to it. That is one read-modify-write
//! of `CCFG_EBICSA`, which also carries the data-bus pull and drive settings
//! shared by every device on the EBI.

use bitfield::bitfield;
use ringbuf::*;

use crate::mmio::RegisterAccess;
use crate::soc;

/// Offset of EBICSA within the CCFG block.
pub const EBICSA: u32 = 0x10;

bitfield! {
    #[derive(Copy, Clone, Eq, PartialEq)]
    pub struct EbiCsa(u32);
    impl Debug;
    /// CS1 is assigned to the SDRAM controller.
    pub bool, cs1a, set_cs1a: 1;
    /// CS3 is assigned to the NAND flash logic.
    pub bool, cs3a, set_cs3a: 3;
    pub bool, dbpuc, set_dbpuc: 8;
    pub bool, dbpdc, set_dbpdc: 9;
    /// High drive strength on the EBI pads.
    pub bool, drv, set_drv: 17;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ChipSelect {
    Cs1,
}

impl ChipSelect {
    /// Start of the address window decoded to this chip select.
    pub const fn base_address(self) -> usize {
        match self {
            ChipSelect::Cs1 => soc::EBI_CS1_BASE,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Drive {
    Low,
    High,
}

/// Static electrical attributes of the EBI data bus.
///
/// `data_pull_up` and `data_pull_down` map directly onto the DBPUC and DBPDC
/// bits: `true` sets the bit.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BusAttributes {
    pub data_pull_up: bool,
    pub data_pull_down: bool,
    pub drive: Drive,
}

impl BusAttributes {
    /// DBPUC clear, DBPDC set, high drive.
    pub const SDRAM: Self = Self {
        data_pull_up: false,
        data_pull_down: true,
        drive: Drive::High,
    };
}

#[derive(Copy, Clone, PartialEq)]
enum Trace {
    None,
    Routed { cs: ChipSelect, before: u32, after: u32 },
}

ringbuf!(Trace, 4, Trace::None);

/// Proof that a chip select has been routed to the SDRAM controller.
///
/// Only [`route_chip_select`] makes these, and the sequencer will not start
/// without one.
#[derive(Debug, Eq, PartialEq)]
pub struct Routed {
    cs: ChipSelect,
}

impl Routed {
    pub fn chip_select(&self) -> ChipSelect {
        self.cs
    }

    pub fn base_address(&self) -> usize {
        self.cs.base_address()
    }
}

/// Assigns `cs` to the SDRAM controller and applies `attrs`, leaving every
/// other EBICSA bit alone. Running it twice yields the same register value.
pub fn route_chip_select(
    ccfg: &mut impl RegisterAccess,
    cs: ChipSelect,
    attrs: BusAttributes,
) -> Routed {
    let before = ccfg.read(EBICSA);
    let mut csa = EbiCsa(before);
    match cs {
        ChipSelect::Cs1 => csa.set_cs1a(true),
    }
    csa.set_dbpuc(attrs.data_pull_up);
    csa.set_dbpdc(attrs.data_pull_down);
    csa.set_drv(attrs.drive == Drive::High);
    ccfg.write(EBICSA, csa.0);

    ringbuf_entry!(Trace::Routed {
        cs,
        before,
        after: csa.0
    });
    Routed { cs }
}
