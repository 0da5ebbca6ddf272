/*
 * Hilal Toolkit
 * Copyright (C) 2024-onward the Hilal contributors (cf. AUTHORS.md)
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Maximum number of Brent iterations. Adequate for astronomical event
/// tolerances of about half a second over brackets of a few hundred seconds.
const MAX_ITER: usize = 64;

/// Finds the root of `f` within `[a, b]` using the Brent method, combining
/// inverse quadratic interpolation and secant steps with a bisection fallback.
///
/// Returns `None` when the endpoints do not bracket a sign change.
pub fn brent<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, tol: f64) -> Option<f64> {
    let mut xa = a;
    let mut xb = b;
    let mut ya = f(xa);
    let mut yb = f(xb);

    if ya == 0.0 {
        return Some(xa);
    }
    if yb == 0.0 {
        return Some(xb);
    }
    if ya * yb > 0.0 {
        // Same-sign endpoints: nothing to bracket.
        return None;
    }

    if ya.abs() < yb.abs() {
        core::mem::swap(&mut xa, &mut xb);
        core::mem::swap(&mut ya, &mut yb);
    }

    let (mut xc, mut yc, mut xd) = (xa, ya, xa);
    let mut flag = true;

    for _ in 0..MAX_ITER {
        if yb == 0.0 || (xb - xa).abs() < tol {
            return Some(xb);
        }

        let mut s = if (ya - yc).abs() > f64::EPSILON && (yb - yc).abs() > f64::EPSILON {
            // Inverse quadratic interpolation
            xa * yb * yc / ((ya - yb) * (ya - yc))
                + xb * ya * yc / ((yb - ya) * (yb - yc))
                + xc * ya * yb / ((yc - ya) * (yc - yb))
        } else {
            // Secant step
            xb - yb * (xb - xa) / (yb - ya)
        };

        let cond1 = (s - xb) * (s - (3.0 * xa + xb) / 4.0) > 0.0;
        let cond2 = flag && (s - xb).abs() >= (xb - xc).abs() / 2.0;
        let cond3 = !flag && (s - xb).abs() >= (xc - xd).abs() / 2.0;
        let cond4 = flag && (xb - xc).abs() < tol;
        let cond5 = !flag && (xc - xd).abs() < tol;
        if cond1 || cond2 || cond3 || cond4 || cond5 {
            s = (xa + xb) / 2.0;
            flag = true;
        } else {
            flag = false;
        }

        let ys = f(s);

        xd = xc;
        xc = xb;
        yc = yb;

        if ya * ys < 0.0 {
            xb = s;
            yb = ys;
        } else {
            xa = s;
            ya = ys;
        }

        // Keep b as the best guess.
        if ya.abs() < yb.abs() {
            core::mem::swap(&mut xa, &mut xb);
            core::mem::swap(&mut ya, &mut yb);
        }
    }

    Some(xb)
}

/// Subdivides `[a, b]` into `steps` intervals and returns every sign-change
/// root found, deduplicated within 1e-6.
pub fn find_roots<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, steps: usize, tol: f64) -> Vec<f64> {
    let mut roots = Vec::new();
    if steps == 0 || b <= a {
        return roots;
    }
    let h = (b - a) / steps as f64;
    let mut x0 = a;
    let mut y0 = f(x0);
    for i in 1..=steps {
        let x1 = a + i as f64 * h;
        let y1 = f(x1);
        if y0 == 0.0 {
            roots.push(x0);
        } else if y0 * y1 < 0.0 {
            if let Some(root) = brent(&f, x0, x1, tol) {
                roots.push(root);
            }
        }
        x0 = x1;
        y0 = y1;
    }
    if y0 == 0.0 {
        roots.push(x0);
    }
    roots.dedup_by(|r1, r2| (*r1 - *r2).abs() < 1e-6);
    roots
}

#[cfg(test)]
mod ut_roots {
    use super::*;

    #[test]
    fn brent_finds_cosine_root() {
        let root = brent(|x| x.cos(), 1.0, 2.0, 1e-10).unwrap();
        assert!((root - core::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn brent_rejects_unbracketed() {
        assert!(brent(|x| x * x + 1.0, -1.0, 1.0, 1e-10).is_none());
    }

    #[test]
    fn find_roots_of_sine() {
        // sin has roots at 0, pi, 2pi, 3pi within [-0.5, 10]
        let roots = find_roots(|x| x.sin(), -0.5, 10.0, 100, 1e-10);
        assert_eq!(roots.len(), 4);
        for (root, expected) in roots.iter().zip([0.0, 1.0, 2.0, 3.0]) {
            assert!((root - expected * core::f64::consts::PI).abs() < 1e-8);
        }
    }
}
