// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runs the initialization sequence against a simulated controller and checks
//! the exact write trace.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use drv_sdrsdramc::parts::IS42S16800F;
use drv_sdrsdramc::regs::{self, Command};
use drv_sdrsdramc::{
    initialize_sdram, route_chip_select, BusAttributes, ChipSelect,
    RegisterAccess, Sdram, SdramError, TimingError,
};
use embedded_hal::blocking::delay::DelayUs;

const MCK: u32 = 132_096_000;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Op {
    Reg(u32, u32),
    Mem(u32, u32),
    Delay(u32),
}

type Log = Rc<RefCell<Vec<Op>>>;

struct Controller {
    log: Log,
    file: HashMap<u32, u32>,
}

impl RegisterAccess for Controller {
    fn read(&self, offset: u32) -> u32 {
        self.file.get(&offset).copied().unwrap_or(0)
    }

    fn write(&mut self, offset: u32, value: u32) {
        self.log.borrow_mut().push(Op::Reg(offset, value));
        self.file.insert(offset, value);
    }
}

struct Window {
    log: Log,
}

impl RegisterAccess for Window {
    fn read(&self, _offset: u32) -> u32 {
        panic!("nothing should read SDRAM during initialization");
    }

    fn write(&mut self, offset: u32, value: u32) {
        self.log.borrow_mut().push(Op::Mem(offset, value));
    }
}

struct Delay {
    log: Log,
}

impl DelayUs<u32> for Delay {
    fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().push(Op::Delay(us));
    }
}

struct Ccfg(u32);

impl RegisterAccess for Ccfg {
    fn read(&self, _offset: u32) -> u32 {
        self.0
    }

    fn write(&mut self, _offset: u32, value: u32) {
        self.0 = value;
    }
}

fn bring_up(
    clock_hz: u32,
) -> (Result<Sdram<Controller, Window>, SdramError>, Vec<Op>) {
    let log = Log::default();
    let routed = route_chip_select(
        &mut Ccfg(0),
        ChipSelect::Cs1,
        BusAttributes::SDRAM,
    );
    let result = initialize_sdram(
        routed,
        Controller {
            log: log.clone(),
            file: HashMap::new(),
        },
        Window { log: log.clone() },
        &mut Delay { log: log.clone() },
        &IS42S16800F,
        clock_hz,
    );
    let trace = log.borrow().clone();
    (result, trace)
}

fn command(cmd: Command) -> [Op; 2] {
    [Op::Reg(regs::MR, cmd as u32), Op::Mem(0, 0)]
}

#[test]
fn exact_write_trace() {
    let (sdram, trace) = bring_up(MCK);
    assert!(sdram.is_ok());

    let mut expected = vec![
        Op::Reg(regs::MDR, 0x0000_0010),
        Op::Reg(regs::CR, 0x0040_0025),
        Op::Reg(regs::T0PR, 0x2022_8225),
        Op::Reg(regs::T1PR, 0x02C8_0A08),
        Op::Delay(200),
    ];
    expected.extend(command(Command::Nop));
    expected.extend(command(Command::PrechargeAll));
    for _ in 0..8 {
        expected.extend(command(Command::AutoRefresh));
    }
    expected.extend(command(Command::LoadModeRegister));
    expected.extend(command(Command::Normal));
    expected.push(Op::Reg(regs::RTR, 2064));

    assert_eq!(trace, expected);
}

#[test]
fn seventeen_operations_with_paired_dummy_writes() {
    let (_, trace) = bring_up(MCK);

    // Count each command + dummy write pair once.
    let ops = trace.iter().filter(|op| matches!(op, Op::Reg(..))).count();
    assert_eq!(ops, 17);

    for (i, op) in trace.iter().enumerate() {
        match op {
            Op::Reg(regs::MR, _) => {
                assert_eq!(trace.get(i + 1), Some(&Op::Mem(0, 0)));
            }
            Op::Mem(..) => {
                assert!(matches!(trace[i - 1], Op::Reg(regs::MR, _)));
            }
            _ => {}
        }
    }
}

#[test]
fn pause_precedes_first_command() {
    let (_, trace) = bring_up(MCK);
    let pause = trace
        .iter()
        .position(|op| matches!(op, Op::Delay(us) if *us >= 200))
        .unwrap();
    let first_cmd = trace
        .iter()
        .position(|op| matches!(op, Op::Reg(regs::MR, _)))
        .unwrap();
    assert!(pause < first_cmd);
    assert_eq!(
        trace.iter().filter(|op| matches!(op, Op::Delay(_))).count(),
        1
    );
}

#[test]
fn exactly_eight_refreshes() {
    let (_, trace) = bring_up(MCK);
    let refreshes = trace
        .iter()
        .filter(|op| **op == Op::Reg(regs::MR, Command::AutoRefresh as u32))
        .count();
    assert_eq!(refreshes, 8);
}

#[test]
fn deterministic() {
    let (_, a) = bring_up(MCK);
    let (_, b) = bring_up(MCK);
    assert_eq!(a, b);
}

#[test]
fn zero_clock_writes_nothing() {
    let (sdram, trace) = bring_up(0);
    assert_eq!(sdram.err(), Some(SdramError::Timing(TimingError::ZeroClock)));
    assert!(trace.is_empty());
}

#[test]
fn handle_describes_memory() {
    let (sdram, _) = bring_up(MCK);
    let sdram = sdram.unwrap();
    assert_eq!(sdram.base(), 0x2000_0000);
    assert_eq!(sdram.size(), 16 << 20);

    let snap = sdram.snapshot();
    assert_eq!(snap.mode, Some(Command::Normal));
    assert_eq!(snap.rtr.count(), 2064);
    assert_eq!(snap.cr, sdram.registers().cr);
}

#[test]
fn refresh_retune_rewrites_only_rtr() {
    let (sdram, _) = bring_up(MCK);
    let mut sdram = sdram.unwrap();
    assert_eq!(sdram.snapshot().rtr.count(), 2064);

    sdram.retune_refresh(&IS42S16800F, 100_000_000).unwrap();
    assert_eq!(sdram.snapshot().rtr.count(), 1562);
    assert_eq!(sdram.registers().rtr.count(), 1562);

    assert_eq!(
        sdram.retune_refresh(&IS42S16800F, 0),
        Err(SdramError::Timing(TimingError::ZeroClock))
    );
    assert_eq!(sdram.snapshot().rtr.count(), 1562);

    let (controller, _) = sdram.into_parts();
    let log = controller.log.borrow();
    let after_init: Vec<_> = log.iter().rev().take(2).collect();
    assert_eq!(after_init[0], &Op::Reg(regs::RTR, 1562));
    assert_eq!(after_init[1], &Op::Reg(regs::RTR, 2064));
}
