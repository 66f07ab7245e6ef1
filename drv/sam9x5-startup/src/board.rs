// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use drv_sdrsdramc::parts;
use drv_sdrsdramc::{BusAttributes, ChipSelect, DeviceProfile};

/// Board-level wiring of the external memory.
#[derive(Copy, Clone, Debug)]
pub struct Board {
    pub name: &'static str,
    pub part: &'static DeviceProfile,
    pub chip_select: ChipSelect,
    pub bus: BusAttributes,
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rth9580wf01")] {
        /// 16MB IS42S16800F on CS1.
        pub const BOARD: Board = Board {
            name: "rth9580wf01",
            part: &parts::IS42S16800F,
            chip_select: ChipSelect::Cs1,
            bus: BusAttributes::SDRAM,
        };
    } else {
        compile_error!("not a recognized sam9x5 board");
    }
}
