/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Hilal computes whether a new lunar crescent is visible from a given
//! location on a given civil date: sunset and moonset times, the classical
//! crescent geometry (ARCL, ARCV, DAZ, W, Lag), and the Yallop and Odeh
//! visibility scores.
//!
//! The kernel-backed path reads a NAIF DAF/SPK planetary ephemeris (DE442S)
//! directly; the kernel-free path uses the Meeus truncated series and never
//! requires any data file.

extern crate hifitime;
extern crate log;

pub mod almanac;
pub mod bodies;
pub mod constants;
pub mod errors;
pub mod events;
pub mod frames;
pub mod math;
pub mod naif;
pub mod observer;
pub mod time;
pub mod visibility;

/// Re-export of hifitime
pub use hifitime::Epoch;

pub mod prelude {
    pub use crate::almanac::{Almanac, BestTimeMethod, SightingOptions};
    pub use crate::bodies::EphemerisSource;
    pub use crate::errors::{AlmanacError, AlmanacResult, InputOutputError};
    pub use crate::naif::spk::SPK;
    pub use crate::observer::Observer;
    pub use hifitime::{Duration, Epoch, Unit};
    pub use std::fs::File;
}

/// Defines the number of bytes in a double (prevents magic numbers)
pub(crate) const DBL_SIZE: usize = 8;

/// NAIF integer identifiers for bodies and frames.
pub type NaifId = i32;

/// Memory maps a file and **copies** the data on the heap prior to returning a pointer to this heap data.
#[macro_export]
macro_rules! file2heap {
    ($filename:tt) => {
        match File::open($filename) {
            Err(e) => Err($crate::errors::InputOutputError::IOError { kind: e.kind() }),
            Ok(file) => unsafe {
                use bytes::Bytes;
                use memmap2::MmapOptions;
                match MmapOptions::new().map(&file) {
                    Err(_) => Err($crate::errors::InputOutputError::IOUnknownError),
                    Ok(mmap) => {
                        let bytes = Bytes::copy_from_slice(&mmap);
                        Ok(bytes)
                    }
                }
            },
        }
    };
}
