// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

mod components;
mod health_check;
mod inoculation;
mod qc;
mod qc_register;
mod time_study;

pub use components::*;
pub use health_check::*;
pub use inoculation::*;
pub use qc::*;
pub use qc_register::*;
pub use time_study::*;
