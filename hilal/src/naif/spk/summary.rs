/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use core::fmt;

use crate::naif::daf::{DAFError, RawSummary};
use crate::NaifId;

/// One contiguous-time data block of an SPK: which body it describes, relative
/// to which center, over which ET span, and where its doubles live in the file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpkSegment {
    pub target_id: NaifId,
    pub center_id: NaifId,
    pub frame_id: NaifId,
    pub data_type: i32,
    /// Coverage bounds in ET seconds past J2000 TDB. `start_et < end_et`.
    pub start_et: f64,
    pub end_et: f64,
    /// 1-based double-precision word address of the first word of segment data.
    pub begin_addr: usize,
    /// 1-based word address of the last word of segment data (inclusive).
    pub end_addr: usize,
}

impl SpkSegment {
    pub fn from_raw(raw: &RawSummary) -> Result<Self, DAFError> {
        if raw.doubles.len() != 2 || raw.ints.len() != 6 {
            return Err(DAFError::InvalidSummaryCounts {
                nd: raw.doubles.len(),
                ni: raw.ints.len(),
            });
        }
        Ok(Self {
            start_et: raw.doubles[0],
            end_et: raw.doubles[1],
            target_id: raw.ints[0],
            center_id: raw.ints[1],
            frame_id: raw.ints[2],
            data_type: raw.ints[3],
            begin_addr: raw.ints[4] as usize,
            end_addr: raw.ints[5] as usize,
        })
    }

    /// Number of doubles in this segment's data.
    pub fn len_f64(&self) -> usize {
        self.end_addr - self.begin_addr + 1
    }

    pub fn covers(&self, et: f64) -> bool {
        et >= self.start_et && et <= self.end_et
    }
}

impl fmt::Display for SpkSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SPK segment (tgt: {}, ctr: {}, frame: {}) of type {} from ET {:.3} to {:.3} [{}..{}]",
            self.target_id,
            self.center_id,
            self.frame_id,
            self.data_type,
            self.start_et,
            self.end_et,
            self.begin_addr,
            self.end_addr
        )
    }
}
