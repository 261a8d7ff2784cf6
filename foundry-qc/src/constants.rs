// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

pub const ERR_UNEXPECTED_ERROR: &str = "Server error";
pub const ERR_INVALID_BODY: &str = "Invalid request body";
pub const ERR_INVALID_QUERY: &str = "Invalid query parameters";
pub const ERR_NOT_FOUND: &str = "The requested resource was not found";

/// Maximum number of components returned by a search.
pub const SEARCH_LIMIT: i64 = 10;

/// Fixed descriptive tags stored with every inoculation event.
pub const MICRO_STRUCTURE: &str = "Inoculation System Checks";
pub const MACRO_STRUCTURE: &str = "Pre-Process";
