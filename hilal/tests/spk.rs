/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use bytes::Bytes;
use hilal::naif::spk::{EphemerisError, SPK};

const RCRD_LEN: usize = 1024;

/// One synthetic type-2 segment: a single Chebyshev record of degree 2 per
/// axis, with the segment directory `(init, intlen, rsize, n)` at the end.
struct TestSegment {
    target: i32,
    center: i32,
    /// Chebyshev coefficients for x, y, z over `[-radius, radius]` seconds.
    coeffs: [[f64; 3]; 3],
}

/// Builds a minimal but structurally correct DAF/SPK byte buffer:
/// record 1 is the file record, record 2 the summary record, record 3 the
/// (ignored) name record, then one data record per segment.
fn build_kernel(segments: &[TestSegment], little_endian: bool) -> Bytes {
    let n_records = 3 + segments.len();
    let mut bytes = vec![0_u8; n_records * RCRD_LEN];

    let put_u32 = |bytes: &mut [u8], offset: usize, value: u32| {
        let raw = if little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        bytes[offset..offset + 4].copy_from_slice(&raw);
    };
    let put_f64 = |bytes: &mut [u8], offset: usize, value: f64| {
        let raw = if little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        bytes[offset..offset + 8].copy_from_slice(&raw);
    };
    let put_i32 = |bytes: &mut [u8], offset: usize, value: i32| {
        let raw = if little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        bytes[offset..offset + 4].copy_from_slice(&raw);
    };

    // File record
    bytes[0..8].copy_from_slice(b"DAF/SPK ");
    put_u32(&mut bytes, 8, 2); // ND
    put_u32(&mut bytes, 12, 6); // NI
    for b in bytes[16..76].iter_mut() {
        *b = b' ';
    }
    put_u32(&mut bytes, 76, 2); // FWARD
    put_u32(&mut bytes, 80, 2); // BWARD
    let endian_str: &[u8; 8] = if little_endian {
        b"LTL-IEEE"
    } else {
        b"BIG-IEEE"
    };
    bytes[88..96].copy_from_slice(endian_str);

    // Summary record: control doubles then one 40-byte summary per segment
    let summary_base = RCRD_LEN;
    put_f64(&mut bytes, summary_base, 0.0); // next record
    put_f64(&mut bytes, summary_base + 8, 0.0); // previous record
    put_f64(&mut bytes, summary_base + 16, segments.len() as f64);

    for (i, segment) in segments.iter().enumerate() {
        // Each data record: mid, radius, 9 coefficients, then the directory
        let data_record = 3 + i;
        let begin_word = data_record * (RCRD_LEN / 8) + 1;
        let end_word = begin_word + 15 - 1;

        let offset = summary_base + 24 + i * 40;
        put_f64(&mut bytes, offset, -1_000.0); // start ET
        put_f64(&mut bytes, offset + 8, 1_000.0); // end ET
        put_i32(&mut bytes, offset + 16, segment.target);
        put_i32(&mut bytes, offset + 20, segment.center);
        put_i32(&mut bytes, offset + 24, 1); // J2000 frame
        put_i32(&mut bytes, offset + 28, 2); // type 2
        put_i32(&mut bytes, offset + 32, begin_word as i32);
        put_i32(&mut bytes, offset + 36, end_word as i32);

        let data_base = data_record * RCRD_LEN;
        put_f64(&mut bytes, data_base, 0.0); // record midpoint ET
        put_f64(&mut bytes, data_base + 8, 1_000.0); // record radius, seconds
        for (axis, axis_coeffs) in segment.coeffs.iter().enumerate() {
            for (c, coeff) in axis_coeffs.iter().enumerate() {
                put_f64(&mut bytes, data_base + 16 + (axis * 3 + c) * 8, *coeff);
            }
        }
        // Directory: init, intlen, rsize, n
        put_f64(&mut bytes, data_base + 11 * 8, -1_000.0);
        put_f64(&mut bytes, data_base + 12 * 8, 2_000.0);
        put_f64(&mut bytes, data_base + 13 * 8, 11.0);
        put_f64(&mut bytes, data_base + 14 * 8, 1.0);
    }

    Bytes::from(bytes)
}

fn moon_earth_segments() -> Vec<TestSegment> {
    vec![
        TestSegment {
            target: 301,
            center: 3,
            // x = 10 + 5 T1 + 3 T2, y = -4 + 2 T1, z = 1 + T2
            coeffs: [[10.0, 5.0, 3.0], [-4.0, 2.0, 0.0], [1.0, 0.0, 1.0]],
        },
        TestSegment {
            target: 399,
            center: 3,
            coeffs: [[1.0, 1.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 0.5]],
        },
    ]
}

#[test]
fn type2_evaluation_matches_polynomial() {
    let spk = SPK::parse(build_kernel(&moon_earth_segments(), true)).unwrap();
    assert_eq!(spk.segments().len(), 2);

    // At et = 500 s, normalized time is 0.5
    let state = spk.state(301, 3, 500.0).unwrap();
    // x: 10 + 5(0.5) + 3(2*0.25 - 1) = 11; dx/dt = (5 + 12*0.5)/1000
    assert!((state.position_km[0] - 11.0).abs() < 1e-12);
    assert!((state.velocity_km_s[0] - 11.0e-3).abs() < 1e-15);
    // y: -4 + 2(0.5) = -3; dy/dt = 2/1000
    assert!((state.position_km[1] - -3.0).abs() < 1e-12);
    assert!((state.velocity_km_s[1] - 2.0e-3).abs() < 1e-15);
    // z: 1 + (2*0.25 - 1) = 0.5; dz/dt = (4*0.5)/1000
    assert!((state.position_km[2] - 0.5).abs() < 1e-12);
    assert!((state.velocity_km_s[2] - 2.0e-3).abs() < 1e-15);
}

#[test]
fn big_endian_kernel_reads_identically() {
    let le = SPK::parse(build_kernel(&moon_earth_segments(), true)).unwrap();
    let be = SPK::parse(build_kernel(&moon_earth_segments(), false)).unwrap();
    let s_le = le.state(301, 3, 250.0).unwrap();
    let s_be = be.state(301, 3, 250.0).unwrap();
    assert_eq!(s_le, s_be);
}

#[test]
fn chaining_matches_componentwise_difference() {
    let spk = SPK::parse(build_kernel(&moon_earth_segments(), true)).unwrap();
    let et = -321.5;
    let moon_earth = spk.state(301, 399, et).unwrap();
    let moon_emb = spk.state(301, 3, et).unwrap();
    let earth_emb = spk.state(399, 3, et).unwrap();
    let diff = moon_emb - earth_emb;
    assert_eq!(moon_earth, diff);

    // And the reverse direction is the exact negation
    let earth_moon = spk.state(399, 301, et).unwrap();
    assert_eq!(earth_moon, -moon_earth);
}

#[test]
fn out_of_range_and_no_path_errors() {
    let spk = SPK::parse(build_kernel(&moon_earth_segments(), true)).unwrap();

    // Coverage is [-1000, 1000]
    match spk.state(301, 3, 5_000.0) {
        Err(EphemerisError::OutOfRange { target, .. }) => assert_eq!(target, 301),
        other => panic!("expected OutOfRange, got {other:?}"),
    }

    // No segment involves body 599 at all
    match spk.state(599, 399, 0.0) {
        Err(EphemerisError::NoSegmentPath { .. }) => {}
        other => panic!("expected NoSegmentPath, got {other:?}"),
    }
}

#[test]
fn rejects_non_spk_bytes() {
    let garbage = Bytes::from(vec![0_u8; 2048]);
    assert!(SPK::parse(garbage).is_err());

    let mut not_spk = vec![0_u8; 2048];
    not_spk[0..8].copy_from_slice(b"DAF/PCK ");
    assert!(SPK::parse(Bytes::from(not_spk)).is_err());
}

/// Validation against a real DE442S kernel. Run with
/// `cargo test -- --ignored` after placing the kernel at `data/de442s.bsp`
/// (or exporting `HILAL_KERNEL_PATH`).
mod de442s {
    use super::*;
    use hilal::file2heap;
    use hilal::prelude::*;

    fn load_kernel() -> Option<SPK> {
        let path =
            std::env::var("HILAL_KERNEL_PATH").unwrap_or_else(|_| "data/de442s.bsp".to_string());
        let bytes = file2heap!(path).ok()?;
        Some(SPK::parse(bytes).expect("kernel present but unparseable"))
    }

    #[test]
    #[ignore = "requires a local DE442S kernel"]
    fn de442s_moon_state_sanity() {
        let Some(spk) = load_kernel() else {
            panic!("no DE442S kernel found");
        };
        // 2025-03-29 ~12:00 TDB
        let et = 796_521_600.0;
        let moon = spk.state(301, 399, et).unwrap();
        let distance = moon.position_km.norm();
        assert!((356_000.0..407_000.0).contains(&distance));
        let speed = moon.velocity_km_s.norm();
        assert!((0.8..1.2).contains(&speed), "lunar speed {speed} km/s");
    }

    #[test]
    #[ignore = "requires a local DE442S kernel"]
    fn de442s_chaining_identity() {
        let Some(spk) = load_kernel() else {
            panic!("no DE442S kernel found");
        };
        let et = 796_521_600.0;
        let moon_earth = spk.state(301, 399, et).unwrap();
        let moon_emb = spk.state(301, 3, et).unwrap();
        let earth_emb = spk.state(399, 3, et).unwrap();
        assert_eq!(moon_earth, moon_emb - earth_emb);
    }

    /// Cross-check of the type-3 velocity convention flagged in the design
    /// notes: velocities must stay physical if the kernel carries type 3 data.
    #[test]
    #[ignore = "requires a local DE442S kernel"]
    fn type3_velocity_scale_validation() {
        let Some(spk) = load_kernel() else {
            panic!("no DE442S kernel found");
        };
        let et = 796_521_600.0;
        let sun = spk.state(10, 399, et).unwrap();
        let speed = sun.velocity_km_s.norm();
        assert!((25.0..35.0).contains(&speed), "apparent solar speed {speed} km/s");
    }
}
