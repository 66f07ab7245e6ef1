// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The SDR-SDRAM initialization sequence (SAM9x5 datasheet 29.4.1).
//!
//! Each step of the sequence is a state type, and each transition is a method
//! that consumes the controller in one state and returns it in the next. The
//! only way from [`state::Idle`] to a usable [`Sdram`] is through every step
//! in order, once.
//!
//! Commands are issued by writing `MR.MODE` and then writing anything to the
//! SDRAM window: the controller only sends the command to the device when it
//! sees that access. Nothing here reads back from the controller, and there
//! is nothing to retry; if the part is missing or miswired, the failure shows
//! up later as memory that does not hold data.

use core::marker::PhantomData;

use embedded_hal::blocking::delay::DelayUs;
use num_traits::FromPrimitive;
use ringbuf::*;
use static_assertions::const_assert;

use crate::ebi::Routed;
use crate::mmio::RegisterAccess;
use crate::profile::DeviceProfile;
use crate::regs::{self, Command, ControllerRegisters, Mr, Rtr};
use crate::timing::{self, SdramTiming};
use crate::SdramError;

/// Power-up pause before the first command, in microseconds.
pub const POWER_UP_PAUSE_US: u32 = 200;

/// CBR auto-refresh cycles the device needs during initialization.
pub const CBR_CYCLES: usize = 8;

const_assert!(POWER_UP_PAUSE_US >= 200);

#[derive(Copy, Clone, PartialEq)]
enum Trace {
    None,
    Rejected(SdramError),
    DeviceType(u32),
    Timing { cr: u32, t0pr: u32, t1pr: u32 },
    Pause(u32),
    Command(Command),
    RefreshRate(u32),
    Functional { base: usize, size: usize },
}

ringbuf!(Trace, 16, Trace::None);

pub mod state {
    pub struct Idle;
    pub struct DeviceTypeProgrammed;
    pub struct TimingProgrammed;
    pub struct Paused;
    pub struct NopIssued;
    pub struct PrechargeAllIssued;
    pub struct AutoRefreshed;
    pub struct ModeRegisterSet;
    pub struct NormalMode;
}

use state::*;

/// The controller part-way through initialization.
///
/// `R` is the controller register block and `M` the SDRAM window behind the
/// routed chip select.
pub struct Controller<R, M, S> {
    regs: R,
    ram: M,
    base: usize,
    config: ControllerRegisters,
    _state: PhantomData<S>,
}

impl<R: RegisterAccess, M: RegisterAccess, S> Controller<R, M, S> {
    fn into_state<T>(self) -> Controller<R, M, T> {
        Controller {
            regs: self.regs,
            ram: self.ram,
            base: self.base,
            config: self.config,
            _state: PhantomData,
        }
    }

    /// Loads `cmd` into MR and latches it with a write to the SDRAM window.
    fn command(&mut self, cmd: Command) {
        let mut mr = Mr(0);
        mr.set_mode(cmd as u32);
        self.regs.write(regs::MR, mr.0);
        self.ram.write(0, 0);
        ringbuf_entry!(Trace::Command(cmd));
    }
}

impl<R: RegisterAccess, M: RegisterAccess> Controller<R, M, Idle> {
    pub fn new(
        routed: Routed,
        regs: R,
        ram: M,
        config: ControllerRegisters,
    ) -> Self {
        Self {
            regs,
            ram,
            base: routed.base_address(),
            config,
            _state: PhantomData,
        }
    }

    /// Step 1: memory device type and data bus width.
    pub fn program_device_type(
        mut self,
    ) -> Controller<R, M, DeviceTypeProgrammed> {
        self.regs.write(regs::MDR, self.config.mdr.0);
        ringbuf_entry!(Trace::DeviceType(self.config.mdr.0));
        self.into_state()
    }
}

impl<R: RegisterAccess, M: RegisterAccess>
    Controller<R, M, DeviceTypeProgrammed>
{
    /// Step 2: geometry and CAS latency, then both timing registers.
    pub fn program_timing(mut self) -> Controller<R, M, TimingProgrammed> {
        let c = self.config;
        self.regs.write(regs::CR, c.cr.0);
        self.regs.write(regs::T0PR, c.t0pr.0);
        self.regs.write(regs::T1PR, c.t1pr.0);
        ringbuf_entry!(Trace::Timing {
            cr: c.cr.0,
            t0pr: c.t0pr.0,
            t1pr: c.t1pr.0,
        });
        self.into_state()
    }
}

impl<R: RegisterAccess, M: RegisterAccess> Controller<R, M, TimingProgrammed> {
    /// Step 3: the device needs a quiet bus for 200us after power-up before
    /// any command.
    pub fn pause(
        self,
        delay: &mut impl DelayUs<u32>,
    ) -> Controller<R, M, Paused> {
        delay.delay_us(POWER_UP_PAUSE_US);
        ringbuf_entry!(Trace::Pause(POWER_UP_PAUSE_US));
        self.into_state()
    }
}

impl<R: RegisterAccess, M: RegisterAccess> Controller<R, M, Paused> {
    /// Step 4: NOP. This also starts the SDRAM clock.
    pub fn nop(mut self) -> Controller<R, M, NopIssued> {
        self.command(Command::Nop);
        self.into_state()
    }
}

impl<R: RegisterAccess, M: RegisterAccess> Controller<R, M, NopIssued> {
    /// Step 5: precharge all banks.
    pub fn precharge_all(mut self) -> Controller<R, M, PrechargeAllIssued> {
        self.command(Command::PrechargeAll);
        self.into_state()
    }
}

impl<R: RegisterAccess, M: RegisterAccess>
    Controller<R, M, PrechargeAllIssued>
{
    /// Step 6: eight CBR auto-refresh cycles.
    pub fn auto_refresh(mut self) -> Controller<R, M, AutoRefreshed> {
        for _ in 0..CBR_CYCLES {
            self.command(Command::AutoRefresh);
        }
        self.into_state()
    }
}

impl<R: RegisterAccess, M: RegisterAccess> Controller<R, M, AutoRefreshed> {
    /// Step 7: mode register set. The controller takes CAS latency from CR
    /// and drives BA[1:0] low because we write at offset 0.
    pub fn load_mode_register(mut self) -> Controller<R, M, ModeRegisterSet> {
        self.command(Command::LoadModeRegister);
        self.into_state()
    }
}

impl<R: RegisterAccess, M: RegisterAccess> Controller<R, M, ModeRegisterSet> {
    /// Step 8: normal mode; the device now accepts reads and writes.
    pub fn normal_mode(mut self) -> Controller<R, M, NormalMode> {
        self.command(Command::Normal);
        self.into_state()
    }
}

impl<R: RegisterAccess, M: RegisterAccess> Controller<R, M, NormalMode> {
    /// Step 9: arm periodic refresh. The device is fully functional after
    /// this.
    pub fn arm_refresh(mut self) -> Sdram<R, M> {
        let rtr = self.config.rtr;
        self.regs.write(regs::RTR, rtr.0);
        ringbuf_entry!(Trace::RefreshRate(rtr.count()));

        let size = self.config.size_bytes();
        ringbuf_entry!(Trace::Functional {
            base: self.base,
            size,
        });
        Sdram {
            regs: self.regs,
            ram: self.ram,
            base: self.base,
            size,
            config: self.config,
        }
    }
}

/// Initialized SDRAM.
///
/// Holding one of these is the only way to know the memory behind the chip
/// select works. The controller registers stay as programmed for the life of
/// the boot; the one exception is the refresh timer, see
/// [`Sdram::retune_refresh`].
pub struct Sdram<R, M> {
    regs: R,
    ram: M,
    base: usize,
    size: usize,
    config: ControllerRegisters,
}

/// Controller registers as read back from hardware.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RegisterSnapshot {
    /// `None` if MR holds a mode this driver has no name for.
    pub mode: Option<Command>,
    pub mdr: regs::Mdr,
    pub cr: regs::Cr,
    pub t0pr: regs::T0pr,
    pub t1pr: regs::T1pr,
    pub rtr: Rtr,
}

impl<R: RegisterAccess, M: RegisterAccess> Sdram<R, M> {
    /// Physical address of the first byte of SDRAM.
    pub fn base(&self) -> usize {
        self.base
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The values written during initialization (with any refresh retune
    /// applied).
    pub fn registers(&self) -> &ControllerRegisters {
        &self.config
    }

    /// Recomputes and rewrites the refresh interval after a clock change.
    /// Nothing is written if the new interval can't be expressed.
    pub fn retune_refresh(
        &mut self,
        profile: &DeviceProfile,
        clock_hz: u32,
    ) -> Result<(), SdramError> {
        let count = timing::refresh_count(&profile.refresh, clock_hz)?;
        let rtr = Rtr::from_count(count)?;
        self.regs.write(regs::RTR, rtr.0);
        self.config.rtr = rtr;
        ringbuf_entry!(Trace::RefreshRate(count));
        Ok(())
    }

    pub fn snapshot(&self) -> RegisterSnapshot {
        let mr = Mr(self.regs.read(regs::MR));
        RegisterSnapshot {
            mode: Command::from_u32(mr.mode()),
            mdr: regs::Mdr(self.regs.read(regs::MDR)),
            cr: regs::Cr(self.regs.read(regs::CR)),
            t0pr: regs::T0pr(self.regs.read(regs::T0PR)),
            t1pr: regs::T1pr(self.regs.read(regs::T1PR)),
            rtr: Rtr(self.regs.read(regs::RTR)),
        }
    }

    pub fn into_parts(self) -> (R, M) {
        (self.regs, self.ram)
    }
}

/// Brings up SDRAM on a routed chip select.
///
/// Timing is derived and encoded before anything is written, so every error
/// this returns leaves the controller untouched. Once the first register is
/// written the sequence always runs to the end.
pub fn initialize_sdram<R, M, D>(
    routed: Routed,
    regs: R,
    ram: M,
    delay: &mut D,
    profile: &DeviceProfile,
    clock_hz: u32,
) -> Result<Sdram<R, M>, SdramError>
where
    R: RegisterAccess,
    M: RegisterAccess,
    D: DelayUs<u32>,
{
    let config = SdramTiming::derive(profile, clock_hz)
        .map_err(SdramError::from)
        .and_then(|t| {
            ControllerRegisters::encode(profile, &t).map_err(SdramError::from)
        })
        .inspect_err(|&e| ringbuf_entry!(Trace::Rejected(e)))?;

    Ok(Controller::new(routed, regs, ram, config)
        .program_device_type()
        .program_timing()
        .pause(delay)
        .nop()
        .precharge_all()
        .auto_refresh()
        .load_mode_register()
        .normal_mode()
        .arm_refresh())
}
