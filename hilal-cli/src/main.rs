/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

extern crate pretty_env_logger;

use std::env::{set_var, var};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use hifitime::Epoch;
use snafu::prelude::*;
use tabled::{Table, Tabled};

use hilal::almanac::{Almanac, BestTimeMethod, SightingOptions};
use hilal::errors::AlmanacError;
use hilal::observer::Observer;

mod args;
mod download;

use args::{Actions, Cli};

const LOG_VAR: &str = "HILAL_LOG";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CliErrors {
    #[snafu(display("no platform cache directory available"))]
    NoCacheDir,
    #[snafu(display("{what} failed: {source}"))]
    CacheIo {
        what: &'static str,
        source: std::io::Error,
    },
    #[snafu(display("fetching {url} failed: {reason}"))]
    Fetch { url: &'static str, reason: String },
    #[snafu(display("kernel verification failed: {reason}"))]
    Verification { reason: String },
    #[snafu(display("invalid argument: {reason}"))]
    Argument { reason: String },
    #[snafu(display("{source}"))]
    Almanac { source: AlmanacError },
}

fn main() -> ExitCode {
    if var(LOG_VAR).is_err() {
        set_var(LOG_VAR, "INFO");
    }
    pretty_env_logger::init_custom_env(LOG_VAR);

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Clap would exit with status 2; keep the documented status 1
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliErrors> {
    match cli.action {
        Actions::DownloadKernels { force } => download::download_kernels(force),
        Actions::VerifyKernels => download::verify_kernels(),
        Actions::Sighting {
            lat,
            lon,
            date,
            optimized,
        } => sighting(lat, lon, date, optimized),
        Actions::Phase { date } => phase(date),
        Actions::Benchmark => benchmark(),
    }
}

fn parse_date(date: Option<String>) -> Result<Epoch, CliErrors> {
    match date {
        None => Epoch::now().map_err(|e| CliErrors::Argument {
            reason: format!("system clock unavailable: {e}"),
        }),
        Some(text) => {
            let parts: Vec<&str> = text.split('-').collect();
            let invalid = || CliErrors::Argument {
                reason: format!("`{text}` is not a YYYY-MM-DD date"),
            };
            if parts.len() != 3 {
                return Err(invalid());
            }
            let year: i32 = parts[0].parse().map_err(|_| invalid())?;
            let month: u8 = parts[1].parse().map_err(|_| invalid())?;
            let day: u8 = parts[2].parse().map_err(|_| invalid())?;
            if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
                return Err(invalid());
            }
            Ok(Epoch::from_gregorian_utc_at_midnight(year, month, day))
        }
    }
}

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Event")]
    event: &'static str,
    #[tabled(rename = "Time (UTC)")]
    time: String,
}

fn opt_time(epoch: Option<Epoch>) -> String {
    epoch.map_or_else(|| "none".to_string(), |e| format!("{e}"))
}

fn sighting(lat: f64, lon: f64, date: Option<String>, optimized: bool) -> Result<(), CliErrors> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CliErrors::Argument {
            reason: format!("latitude {lat} is outside [-90, 90]"),
        });
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(CliErrors::Argument {
            reason: format!("longitude {lon} is outside [-180, 180]"),
        });
    }

    let date = parse_date(date)?;
    let almanac = download::load_almanac()?;
    let observer = Observer::new(lat, lon, 0.0);
    let options = SightingOptions {
        best_time_method: if optimized {
            BestTimeMethod::Optimized
        } else {
            BestTimeMethod::Heuristic
        },
    };

    let events = almanac
        .sun_moon_events(date, &observer)
        .context(AlmanacSnafu)?;
    let report = almanac
        .sighting_report(date, &observer, options)
        .context(AlmanacSnafu)?;

    println!("Crescent sighting report for {} at {}", report.date, observer);
    println!("Ephemeris: {}\n", report.ephemeris_source);

    let rows = vec![
        EventRow {
            event: "Sunrise",
            time: opt_time(events.sunrise),
        },
        EventRow {
            event: "Sunset",
            time: opt_time(events.sunset),
        },
        EventRow {
            event: "Moonrise",
            time: opt_time(events.moonrise),
        },
        EventRow {
            event: "Moonset",
            time: opt_time(events.moonset),
        },
        EventRow {
            event: "Civil twilight end",
            time: opt_time(events.civil_twilight_end),
        },
        EventRow {
            event: "Nautical twilight end",
            time: opt_time(events.nautical_twilight_end),
        },
        EventRow {
            event: "Astronomical twilight end",
            time: opt_time(events.astronomical_twilight_end),
        },
    ];
    println!("{}", Table::new(rows));

    if !report.sighting_possible {
        println!("\nNo crescent observation window on this date at this location.");
        return Ok(());
    }

    let geometry = report.geometry.expect("complete report");
    let yallop = report.yallop.expect("complete report");
    let odeh = report.odeh.expect("complete report");
    let position = report.moon_position.expect("complete report");

    println!("\nBest time: {}", opt_time(report.best_time));
    if let Some((start, end)) = report.observation_window {
        println!("Window:    {start} to {end}");
    }
    println!("Moon:      {position}");
    println!("Geometry:  {geometry}");
    println!(
        "Yallop:    q = {:+.3}, category {} ({})",
        yallop.q,
        yallop.category,
        yallop.category.description()
    );
    println!(
        "Odeh:      V = {:+.2}, zone {} ({})",
        odeh.v,
        odeh.zone,
        odeh.zone.description()
    );
    if let Some(guidance) = &report.guidance {
        println!("\n{guidance}");
    }
    Ok(())
}

fn phase(date: Option<String>) -> Result<(), CliErrors> {
    let date = parse_date(date)?;
    let almanac = Almanac::new();
    let result = almanac.moon_phase(date);

    println!("Moon phase at {}", result.date);
    println!("Phase:        {} ({:.1}% of cycle)", result.phase_name, result.phase_fraction * 100.0);
    println!("Age:          {:.2} days", result.age_days);
    println!("Illumination: {:.1}%", result.illumination_fraction * 100.0);
    println!("Elongation:   {:.1} deg", result.elongation_deg);
    println!("Waxing:       {}", result.is_waxing);
    println!("Previous new moon: {}", result.previous_new_moon);
    println!("Next new moon:     {}", result.next_new_moon);
    println!("Next full moon:    {}", result.next_full_moon);
    Ok(())
}

fn benchmark() -> Result<(), CliErrors> {
    let almanac = download::load_almanac()?;
    let observer = Observer::new(21.4225, 39.8262, 0.0);
    let date = Epoch::from_gregorian_utc_at_midnight(2025, 3, 30);

    // Warm-up and correctness check
    almanac
        .sighting_report(date, &observer, SightingOptions::default())
        .context(AlmanacSnafu)?;

    const RUNS: u32 = 25;
    let start = Instant::now();
    for _ in 0..RUNS {
        almanac
            .sighting_report(date, &observer, SightingOptions::default())
            .context(AlmanacSnafu)?;
    }
    let per_run = start.elapsed() / RUNS;
    println!("sighting_report ({}): {per_run:?} per run", almanac.ephemeris_source());

    let start = Instant::now();
    for _ in 0..RUNS {
        let _ = almanac.moon_phase(date);
    }
    println!("moon_phase: {:?} per run", start.elapsed() / RUNS);
    Ok(())
}
