/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Kernel download and cache management. The core never touches the network;
//! everything here happens before the first query.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use log::{info, warn};
use platform_dirs::AppDirs;

use crate::CliErrors;

pub struct KernelFile {
    pub name: &'static str,
    pub url: &'static str,
}

pub const KERNELS: [KernelFile; 2] = [
    KernelFile {
        name: "de442s.bsp",
        url: "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/spk/planets/de442s.bsp",
    },
    KernelFile {
        name: "naif0012.tls",
        url: "https://naif.jpl.nasa.gov/pub/naif/generic_kernels/lsk/naif0012.tls",
    },
];

/// The platform cache directory holding the kernels.
pub fn cache_dir() -> Result<PathBuf, CliErrors> {
    let dirs = AppDirs::new(Some("hilal"), true).ok_or(CliErrors::NoCacheDir)?;
    Ok(dirs.data_dir)
}

fn crc_sidecar(path: &PathBuf) -> PathBuf {
    let mut sidecar = path.clone();
    sidecar.set_extension(match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{ext}.crc32"),
        None => "crc32".to_string(),
    });
    sidecar
}

/// Downloads every kernel that is missing or checksum-stale. With `force`,
/// redownloads unconditionally.
pub fn download_kernels(force: bool) -> Result<(), CliErrors> {
    let dir = cache_dir()?;
    fs::create_dir_all(&dir).map_err(|e| CliErrors::CacheIo {
        what: "creating the cache directory",
        source: e,
    })?;

    for kernel in &KERNELS {
        let dest = dir.join(kernel.name);
        if !force && verify_one(&dest).is_ok() {
            info!("{} is cached and checksum-valid, skipping", kernel.name);
            continue;
        }

        info!("fetching {}", kernel.url);
        let response = ureq::get(kernel.url)
            .call()
            .map_err(|e| CliErrors::Fetch {
                url: kernel.url,
                reason: e.to_string(),
            })?;
        let mut buffer = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut buffer)
            .map_err(|e| CliErrors::CacheIo {
                what: "reading the response body",
                source: e,
            })?;

        let crc32 = crc32fast::hash(&buffer);
        fs::write(&dest, &buffer).map_err(|e| CliErrors::CacheIo {
            what: "writing the kernel file",
            source: e,
        })?;
        fs::write(crc_sidecar(&dest), format!("{crc32:08x}\n")).map_err(|e| {
            CliErrors::CacheIo {
                what: "writing the checksum sidecar",
                source: e,
            }
        })?;
        info!(
            "saved {} ({} bytes, CRC32 {crc32:08x})",
            dest.display(),
            buffer.len()
        );
    }
    Ok(())
}

/// Checks one cached file against its checksum sidecar.
fn verify_one(path: &PathBuf) -> Result<(), CliErrors> {
    let data = fs::read(path).map_err(|_| CliErrors::Verification {
        reason: format!("{} is missing (run download-kernels first)", path.display()),
    })?;
    let sidecar = fs::read_to_string(crc_sidecar(path)).map_err(|_| CliErrors::Verification {
        reason: format!("{} has no checksum sidecar", path.display()),
    })?;
    let expected =
        u32::from_str_radix(sidecar.trim(), 16).map_err(|_| CliErrors::Verification {
            reason: format!("{} has a malformed checksum sidecar", path.display()),
        })?;
    let computed = crc32fast::hash(&data);
    if computed != expected {
        return Err(CliErrors::Verification {
            reason: format!(
                "{}: CRC32 {computed:08x} does not match recorded {expected:08x}",
                path.display()
            ),
        });
    }
    Ok(())
}

/// Verifies every kernel: present, checksum-valid, and the SPK parseable.
pub fn verify_kernels() -> Result<(), CliErrors> {
    let dir = cache_dir()?;
    for kernel in &KERNELS {
        let dest = dir.join(kernel.name);
        verify_one(&dest)?;
        if kernel.name.ends_with(".bsp") {
            let bytes = fs::read(&dest).map_err(|e| CliErrors::CacheIo {
                what: "reading the kernel for parsing",
                source: e,
            })?;
            hilal::naif::spk::SPK::parse(bytes::Bytes::from(bytes)).map_err(|e| {
                CliErrors::Verification {
                    reason: format!("{}: {e}", dest.display()),
                }
            })?;
        }
        println!("{}: OK", kernel.name);
    }
    Ok(())
}

/// Builds an [`hilal::almanac::Almanac`] from the cache, falling back to the
/// kernel-free path when the ephemeris is absent.
pub fn load_almanac() -> Result<hilal::almanac::Almanac, CliErrors> {
    let dir = cache_dir()?;
    let mut almanac = hilal::almanac::Almanac::new();

    let lsk_path = dir.join("naif0012.tls");
    if let Ok(text) = fs::read_to_string(&lsk_path) {
        almanac = almanac.with_lsk(&text);
    }

    let bsp_path = dir.join("de442s.bsp");
    match fs::read(&bsp_path) {
        Ok(bytes) => {
            let source = hilal::almanac::KernelSource::File(bsp_path.display().to_string());
            almanac = almanac
                .with_kernel_from(bytes::Bytes::from(bytes), source)
                .map_err(|e| CliErrors::Verification {
                    reason: format!("{}: {e}", bsp_path.display()),
                })?;
        }
        Err(_) => {
            warn!(
                "no ephemeris kernel at {}; using the Meeus approximation (run `hilal download-kernels` for DE442S accuracy)",
                bsp_path.display()
            );
        }
    }
    Ok(almanac)
}
