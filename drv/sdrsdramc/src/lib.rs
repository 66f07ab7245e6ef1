// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Driver for the SDR-SDRAM side of the SAM9x5 DDRSDRC.
//!
//! Bring-up goes:
//!
//! 1. [`ebi::route_chip_select`] hands the chip select to the controller and
//!    returns a [`Routed`] token.
//! 2. [`initialize_sdram`] derives timing for a [`DeviceProfile`] at the
//!    master clock ([`timing`]), encodes it ([`regs`]), and runs the
//!    initialization sequence ([`sequencer`]).
//! 3. The returned [`Sdram`] is the caller's proof that external memory
//!    works.
//!
//! All hardware access goes through [`RegisterAccess`], so the whole thing
//! runs against a simulated register file in tests.

#![cfg_attr(not(test), no_std)]

pub mod ebi;
pub mod mmio;
pub mod parts;
pub mod profile;
pub mod regs;
pub mod sequencer;
pub mod soc;
pub mod timing;

pub use ebi::{route_chip_select, BusAttributes, ChipSelect, Routed};
pub use mmio::{Mmio, RegisterAccess};
pub use profile::DeviceProfile;
pub use regs::{Command, ControllerRegisters, EncodeError};
pub use sequencer::{initialize_sdram, RegisterSnapshot, Sdram};
pub use timing::{SdramTiming, TimingError};

/// Why SDRAM was not brought up. Every variant is a configuration problem
/// caught before the first register write.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SdramError {
    Timing(TimingError),
    Encode(EncodeError),
}

impl From<TimingError> for SdramError {
    fn from(e: TimingError) -> Self {
        Self::Timing(e)
    }
}

impl From<EncodeError> for SdramError {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}
