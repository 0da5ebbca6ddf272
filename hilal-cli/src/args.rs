/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(name = "hilal", author, version, about = "Lunar crescent visibility toolkit", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub action: Actions,
}

#[derive(Debug, PartialEq, Subcommand)]
pub enum Actions {
    /// Download the DE442S ephemeris and leap second kernels into the cache
    DownloadKernels {
        /// Redownload even when a checksum-valid copy is cached
        #[clap(long)]
        force: bool,
    },
    /// Check that the cached kernels exist, match their checksums, and parse
    VerifyKernels,
    /// Full crescent sighting report for a location and date
    Sighting {
        /// Geodetic latitude in degrees, north positive
        lat: f64,
        /// Geodetic longitude in degrees, east positive
        lon: f64,
        /// Civil date as YYYY-MM-DD (defaults to today, UTC)
        date: Option<String>,
        /// Maximize the Odeh score instead of the 4/9-lag heuristic
        #[clap(long)]
        optimized: bool,
    },
    /// Lunar phase, age and illumination (no kernel required)
    Phase {
        /// Civil date as YYYY-MM-DD (defaults to now, UTC)
        date: Option<String>,
    },
    /// Time the core pipeline
    Benchmark,
}
