/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

mod daf;
mod file_record;

pub use daf::{RawSummary, DAF};
pub use file_record::FileRecord;

use snafu::prelude::*;

/// Record length of every DAF record, in bytes.
pub(crate) const RCRD_LEN: usize = 1024;

#[derive(Clone, Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DAFError {
    #[snafu(display(
        "file does not start with `DAF/SPK`: found `{got}` (is this a NAIF SPK kernel?)"
    ))]
    MagicMismatch { got: String },
    #[snafu(display("summary counts ND={nd} NI={ni} are not those of an SPK (2 and 6)"))]
    InvalidSummaryCounts { nd: usize, ni: usize },
    #[snafu(display("bytes between indexes {start} and {end} could not be read, file contains {size} bytes (data malformed?)"))]
    InaccessibleBytes {
        start: usize,
        end: usize,
        size: usize,
    },
    #[snafu(display("the summary record chain is broken: {reason}"))]
    SummaryChain { reason: &'static str },
    #[snafu(display("could not interpret bytes as text when reading the {what}"))]
    InvalidText { what: &'static str },
}
