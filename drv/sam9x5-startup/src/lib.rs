// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! First-stage bring-up for SAM9x5 boards: from reset to a working console
//! and usable external SDRAM.
//!
//! Watchdog, clock tree and console are board code behind [`Platform`]; this
//! crate only fixes the order. Be very careful about reordering anything in
//! [`system_init`]: the console baud divisor depends on the master clock, and
//! the SDRAM timing depends on it too.

#![cfg_attr(not(test), no_std)]

mod board;
mod delay;

pub use board::{Board, BOARD};
pub use delay::BusyWait;

use drv_sdrsdramc::soc;
use drv_sdrsdramc::{
    initialize_sdram, route_chip_select, Mmio, RegisterAccess, Sdram,
    SdramError,
};
use embedded_hal::blocking::delay::DelayUs;
use ringbuf::*;
use static_cell::ClaimOnceCell;

/// Resolved clock frequencies after the PLL switch.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Clocks {
    /// Processor clock (PCK).
    pub cpu_hz: u32,
    /// Master clock (MCK), which also clocks the SDRAM controller.
    pub master_hz: u32,
}

/// Board hooks for everything that is not SDRAM.
pub trait Platform {
    type Delay: DelayUs<u32>;

    fn disable_watchdog(&mut self);

    /// Configures the PLL and switches PCK/MCK onto it.
    fn init_clocks(&mut self) -> Clocks;

    fn init_console(&mut self, clocks: &Clocks);

    /// Ungates the DDR/SDR controller clock in the PMC.
    fn enable_sdram_clock(&mut self);

    /// A microsecond delay calibrated for `clocks`.
    fn delay(&mut self, clocks: &Clocks) -> Self::Delay;
}

#[derive(Copy, Clone, PartialEq)]
enum Trace {
    None,
    WatchdogOff,
    Clocks { cpu_hz: u32, master_hz: u32 },
    ConsoleUp,
    SdramClockOn,
    SdramUp { base: usize, size: usize },
    SdramFailed(SdramError),
}

ringbuf!(Trace, 8, Trace::None);

/// Runs bring-up in its fixed order: watchdog, clocks, console, SDRAM clock,
/// chip-select routing, SDRAM initialization.
///
/// `window` must address the board's chip select window.
pub fn system_init<P, C, R, M>(
    platform: &mut P,
    ccfg: &mut C,
    ddrsdrc: R,
    window: M,
    board: &Board,
) -> Result<Sdram<R, M>, SdramError>
where
    P: Platform,
    C: RegisterAccess,
    R: RegisterAccess,
    M: RegisterAccess,
{
    platform.disable_watchdog();
    ringbuf_entry!(Trace::WatchdogOff);

    let clocks = platform.init_clocks();
    ringbuf_entry!(Trace::Clocks {
        cpu_hz: clocks.cpu_hz,
        master_hz: clocks.master_hz,
    });

    platform.init_console(&clocks);
    ringbuf_entry!(Trace::ConsoleUp);

    platform.enable_sdram_clock();
    ringbuf_entry!(Trace::SdramClockOn);

    let routed = route_chip_select(ccfg, board.chip_select, board.bus);
    let mut delay = platform.delay(&clocks);

    match initialize_sdram(
        routed,
        ddrsdrc,
        window,
        &mut delay,
        board.part,
        clocks.master_hz,
    ) {
        Ok(sdram) => {
            ringbuf_entry!(Trace::SdramUp {
                base: sdram.base(),
                size: sdram.size(),
            });
            Ok(sdram)
        }
        Err(e) => {
            ringbuf_entry!(Trace::SdramFailed(e));
            Err(e)
        }
    }
}

/// The register blocks bring-up owns.
struct Hardware {
    ccfg: Mmio,
    ddrsdrc: Mmio,
    window: Mmio,
}

// Safety: these are the SoC's fixed addresses, and the cell below hands them
// out at most once.
static HARDWARE: ClaimOnceCell<Option<Hardware>> =
    ClaimOnceCell::new(Some(unsafe {
        Hardware {
            ccfg: Mmio::new(soc::CCFG_BASE),
            ddrsdrc: Mmio::new(soc::DDRSDRC_BASE),
            window: Mmio::new(BOARD.chip_select.base_address()),
        }
    }));

/// Brings up the board on real hardware. Panics if called twice, or if the
/// board's SDRAM configuration is unusable at the clock the platform chose;
/// there is nowhere to report either this early.
pub fn hw_init(platform: &mut impl Platform) -> Sdram<Mmio, Mmio> {
    let Some(mut hw) = HARDWARE.claim().take() else {
        panic!();
    };
    match system_init(platform, &mut hw.ccfg, hw.ddrsdrc, hw.window, &BOARD)
    {
        Ok(sdram) => sdram,
        Err(_) => panic!(),
    }
}
