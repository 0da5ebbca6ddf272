/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use log::debug;

use super::{DAFError, RCRD_LEN};
use crate::naif::Endian;
use crate::parse_bytes_as;

// Byte layout of the 1024-byte file record, from the NAIF DAF required
// reading: LOCIDW[8] ND[4] NI[4] LOCIFN[60] FWARD[4] BWARD[4] FREE[4]
// LOCFMT[8] then padding and the FTP validation string.
const LOCIDW: core::ops::Range<usize> = 0..8;
const ND: core::ops::Range<usize> = 8..12;
const NI: core::ops::Range<usize> = 12..16;
const LOCIFN: core::ops::Range<usize> = 16..76;
const FWARD: core::ops::Range<usize> = 76..80;
const BWARD: core::ops::Range<usize> = 80..84;
const FREE: core::ops::Range<usize> = 84..88;
const LOCFMT: core::ops::Range<usize> = 88..96;

/// The parsed DAF file record: array-summary layout, the summary-chain head
/// and tail, and the detected byte order.
#[derive(Clone, Debug, PartialEq)]
pub struct FileRecord {
    pub id_word: String,
    pub internal_filename: String,
    /// Number of double precision components in each array summary.
    pub nd: usize,
    /// Number of integer components in each array summary.
    pub ni: usize,
    /// Record number of the initial summary record.
    pub fward: usize,
    /// Record number of the final summary record.
    pub bward: usize,
    /// First free double-precision word address.
    pub free_addr: usize,
    pub endian: Endian,
}

impl FileRecord {
    pub fn parse(bytes: &[u8]) -> Result<Self, DAFError> {
        if bytes.len() < RCRD_LEN {
            return Err(DAFError::InaccessibleBytes {
                start: 0,
                end: RCRD_LEN,
                size: bytes.len(),
            });
        }

        let id_word = core::str::from_utf8(&bytes[LOCIDW])
            .map_err(|_| DAFError::InvalidText { what: "ID word" })?;
        if !id_word.starts_with("DAF/SPK") {
            return Err(DAFError::MagicMismatch {
                got: id_word.trim().to_string(),
            });
        }

        // Endianness detection: ND read in the wrong byte order lands far
        // outside [1, 100]. The LOCFMT string is not trusted because pre-FTP
        // era files may carry garbage there.
        let nd_le = parse_bytes_as!(u32, &bytes[ND], Endian::Little);
        let endian = if (1..=100).contains(&nd_le) {
            Endian::Little
        } else {
            let nd_be = parse_bytes_as!(u32, &bytes[ND], Endian::Big);
            if (1..=100).contains(&nd_be) {
                Endian::Big
            } else {
                return Err(DAFError::SummaryChain {
                    reason: "ND is invalid in both byte orders",
                });
            }
        };
        if let Ok(locfmt) = core::str::from_utf8(&bytes[LOCFMT]) {
            debug!("detected {endian:?} endian file (LOCFMT = `{locfmt}`)");
        }

        let nd = parse_bytes_as!(u32, &bytes[ND], endian) as usize;
        let ni = parse_bytes_as!(u32, &bytes[NI], endian) as usize;
        let fward = parse_bytes_as!(u32, &bytes[FWARD], endian) as usize;
        let bward = parse_bytes_as!(u32, &bytes[BWARD], endian) as usize;
        let free_addr = parse_bytes_as!(u32, &bytes[FREE], endian) as usize;

        let internal_filename = core::str::from_utf8(&bytes[LOCIFN])
            .map_err(|_| DAFError::InvalidText {
                what: "internal filename",
            })?
            .trim()
            .to_string();

        Ok(Self {
            id_word: id_word.trim().to_string(),
            internal_filename,
            nd,
            ni,
            fward,
            bward,
            free_addr,
            endian,
        })
    }

    /// Size of one array summary in bytes: ND doubles then NI 32-bit integers.
    pub fn summary_size_bytes(&self) -> usize {
        self.nd * 8 + self.ni * 4
    }
}

#[cfg(test)]
mod ut_file_record {
    use super::*;

    fn fake_record(endian: Endian) -> Vec<u8> {
        let mut bytes = vec![0_u8; RCRD_LEN];
        bytes[LOCIDW].copy_from_slice(b"DAF/SPK ");
        let (nd, ni, fward) = (2_u32, 6_u32, 2_u32);
        match endian {
            Endian::Little => {
                bytes[ND].copy_from_slice(&nd.to_le_bytes());
                bytes[NI].copy_from_slice(&ni.to_le_bytes());
                bytes[FWARD].copy_from_slice(&fward.to_le_bytes());
                bytes[BWARD].copy_from_slice(&fward.to_le_bytes());
            }
            Endian::Big => {
                bytes[ND].copy_from_slice(&nd.to_be_bytes());
                bytes[NI].copy_from_slice(&ni.to_be_bytes());
                bytes[FWARD].copy_from_slice(&fward.to_be_bytes());
                bytes[BWARD].copy_from_slice(&fward.to_be_bytes());
            }
        }
        for b in bytes[LOCIFN].iter_mut() {
            *b = b' ';
        }
        bytes
    }

    #[test]
    fn detects_little_endian() {
        let record = FileRecord::parse(&fake_record(Endian::Little)).unwrap();
        assert_eq!(record.endian, Endian::Little);
        assert_eq!(record.nd, 2);
        assert_eq!(record.ni, 6);
        assert_eq!(record.fward, 2);
        assert_eq!(record.summary_size_bytes(), 40);
    }

    #[test]
    fn detects_big_endian() {
        let record = FileRecord::parse(&fake_record(Endian::Big)).unwrap();
        assert_eq!(record.endian, Endian::Big);
        assert_eq!(record.nd, 2);
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut bytes = fake_record(Endian::Little);
        bytes[0..8].copy_from_slice(b"DAF/PCK ");
        assert!(matches!(
            FileRecord::parse(&bytes),
            Err(DAFError::MagicMismatch { .. })
        ));
    }

    #[test]
    fn rejects_truncated() {
        assert!(FileRecord::parse(&[0_u8; 100]).is_err());
    }
}
