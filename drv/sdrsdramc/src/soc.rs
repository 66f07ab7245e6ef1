// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Physical memory map of the supported SoCs.

cfg_if::cfg_if! {
    if #[cfg(feature = "sam9x5")] {
        /// DDR/SDR SDRAM controller register block.
        pub const DDRSDRC_BASE: usize = 0xFFFF_E800;
        /// Chip configuration block of the bus matrix; EBICSA is at +0x10.
        pub const CCFG_BASE: usize = 0xFFFF_DF10;
        /// EBI chip select 1, the only one the SDRAM controller can own.
        pub const EBI_CS1_BASE: usize = 0x2000_0000;
    } else {
        compile_error!("missing supported SoC feature");
    }
}
