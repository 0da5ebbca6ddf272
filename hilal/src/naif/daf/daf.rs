/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use bytes::Bytes;
use log::trace;

use super::{DAFError, FileRecord, RCRD_LEN};
use crate::parse_bytes_as;
use crate::DBL_SIZE;

/// A parsed SPICE Double Array File: the byte buffer, its file record, and a
/// CRC32 of the bytes for integrity checks. The buffer is immutable and
/// cheaply cloneable, so one kernel may be shared read-only across queries.
#[derive(Clone, Debug, PartialEq)]
pub struct DAF {
    pub bytes: Bytes,
    pub file_record: FileRecord,
    pub crc32_checksum: u32,
}

/// One array summary as stored in a summary record: `ND` doubles followed by
/// `NI` 32-bit integers.
#[derive(Clone, Debug, PartialEq)]
pub struct RawSummary {
    pub doubles: Vec<f64>,
    pub ints: Vec<i32>,
}

impl DAF {
    /// Parses the provided bytes as a DAF, detecting the byte order from the
    /// file record.
    pub fn parse(bytes: Bytes) -> Result<Self, DAFError> {
        let crc32_checksum = crc32fast::hash(&bytes);
        let file_record = FileRecord::parse(&bytes)?;
        Ok(Self {
            bytes,
            file_record,
            crc32_checksum,
        })
    }

    /// Compute the CRC32 of the underlying bytes
    pub fn crc32(&self) -> u32 {
        crc32fast::hash(&self.bytes)
    }

    /// Walks the summary-record linked list from FWARD and returns every array
    /// summary in file order.
    pub fn summaries(&self) -> Result<Vec<RawSummary>, DAFError> {
        let fr = &self.file_record;
        let summary_size = fr.summary_size_bytes();
        let mut all = Vec::new();

        let mut rcrd_num = fr.fward;
        // A DAF cannot have more summary records than 1024-byte records, which
        // bounds the walk even if the chain is cyclic.
        let max_records = self.bytes.len() / RCRD_LEN + 1;
        let mut visited = 0_usize;

        while rcrd_num != 0 {
            visited += 1;
            if visited > max_records {
                return Err(DAFError::SummaryChain {
                    reason: "the next-record chain is cyclic",
                });
            }

            // DAF record numbers start at 1
            let start = (rcrd_num - 1) * RCRD_LEN;
            let rcrd = self
                .bytes
                .get(start..start + RCRD_LEN)
                .ok_or(DAFError::InaccessibleBytes {
                    start,
                    end: start + RCRD_LEN,
                    size: self.bytes.len(),
                })?;

            // The first three doubles of a summary record are the chain
            // control items: next record, previous record, summary count.
            let next = parse_bytes_as!(f64, &rcrd[0..8], fr.endian);
            let n_summaries = parse_bytes_as!(f64, &rcrd[16..24], fr.endian);
            if !next.is_finite() || next < 0.0 || !n_summaries.is_finite() || n_summaries < 0.0 {
                return Err(DAFError::SummaryChain {
                    reason: "control doubles are not finite non-negative values",
                });
            }
            trace!("summary record {rcrd_num}: {n_summaries} summaries, next {next}");

            for s in 0..n_summaries as usize {
                let offset = 24 + s * summary_size;
                if offset + summary_size > RCRD_LEN {
                    return Err(DAFError::SummaryChain {
                        reason: "summary overruns its 1024-byte record",
                    });
                }
                let raw = &rcrd[offset..offset + summary_size];
                let mut doubles = Vec::with_capacity(fr.nd);
                for d in 0..fr.nd {
                    doubles.push(parse_bytes_as!(f64, &raw[d * 8..(d + 1) * 8], fr.endian));
                }
                let int_base = fr.nd * 8;
                let mut ints = Vec::with_capacity(fr.ni);
                for i in 0..fr.ni {
                    ints.push(parse_bytes_as!(
                        i32,
                        &raw[int_base + i * 4..int_base + (i + 1) * 4],
                        fr.endian
                    ));
                }
                all.push(RawSummary { doubles, ints });
            }

            rcrd_num = next as usize;
        }

        Ok(all)
    }

    /// Reads `count` doubles starting at the provided 1-based double-precision
    /// word address, in the detected byte order.
    pub fn read_f64s(&self, start_word: usize, count: usize) -> Result<Vec<f64>, DAFError> {
        if start_word == 0 {
            return Err(DAFError::SummaryChain {
                reason: "word addresses are 1-based, got 0",
            });
        }
        let start = (start_word - 1) * DBL_SIZE;
        let end = start + count * DBL_SIZE;
        let raw = self
            .bytes
            .get(start..end)
            .ok_or(DAFError::InaccessibleBytes {
                start,
                end,
                size: self.bytes.len(),
            })?;
        let mut out = Vec::with_capacity(count);
        for i in 0..count {
            out.push(parse_bytes_as!(
                f64,
                &raw[i * DBL_SIZE..(i + 1) * DBL_SIZE],
                self.file_record.endian
            ));
        }
        Ok(out)
    }

    /// Reads a single double at the provided 1-based word address.
    pub fn read_f64(&self, word: usize) -> Result<f64, DAFError> {
        Ok(self.read_f64s(word, 1)?[0])
    }
}
