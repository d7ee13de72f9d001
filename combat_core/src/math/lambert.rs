//! Lambert W function, principal (W0) and secondary (W-1) branches
//!
//! Halley iteration seeded by a branch-point series near -1/e and by
//! logarithmic asymptotics elsewhere. Out-of-domain inputs return a fallback
//! value with `success == false` instead of failing.

use std::f64::consts::E;

/// Double precision machine epsilon as used for convergence tolerances
pub const DBL_EPSILON: f64 = 2.220_446_049_250_313_1e-16;

const W0_MAX_ITERS: u32 = 100;
const WM1_MAX_ITERS: u32 = 32;

/// Outcome of a Lambert W evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertResult {
    pub value: f64,
    /// Absolute error estimate
    pub error: f64,
    pub iterations: u32,
    /// False for domain errors and iteration exhaustion
    pub success: bool,
}

impl LambertResult {
    fn exact(value: f64, error: f64) -> Self {
        LambertResult {
            value,
            error,
            iterations: 0,
            success: true,
        }
    }

    fn domain_error(q: f64) -> Self {
        LambertResult {
            value: -1.0,
            error: (-q).sqrt(),
            iterations: 0,
            success: false,
        }
    }
}

fn halley_iteration(x: f64, initial: f64, max_iters: u32) -> LambertResult {
    let mut w = initial;

    for i in 0..max_iters {
        let e = w.exp();
        let p = w + 1.0;
        let mut t = w * e - x;

        if w > 0.0 {
            // Newton
            t = (t / p) / e;
        } else {
            t /= e * p - 0.5 * (p + 1.0) * t / p;
        }

        w -= t;

        let tol = 10.0 * DBL_EPSILON * w.abs().max(1.0 / (p.abs() * e));
        if t.abs() < tol {
            return LambertResult {
                value: w,
                error: 2.0 * tol,
                iterations: i,
                success: true,
            };
        }
    }

    LambertResult {
        value: w,
        error: w.abs(),
        iterations: max_iters,
        success: false,
    }
}

/// Series for W around the branch point, in r = ±sqrt(x + 1/e)
fn series_eval(r: f64) -> f64 {
    const C: [f64; 12] = [
        -1.0,
        2.331_643_981_597_124_2,
        -1.812_187_885_639_363_5,
        1.936_631_114_492_359_8,
        -2.353_551_201_881_614_5,
        3.066_858_901_050_631_9,
        -4.175_335_600_258_177,
        5.858_023_729_874_774,
        -8.401_032_217_523_977,
        12.250_753_501_314_46,
        -18.100_697_012_472_443,
        27.029_044_799_010_56,
    ];
    let t_8 = C[8] + r * (C[9] + r * (C[10] + r * C[11]));
    let t_5 = C[5] + r * (C[6] + r * (C[7] + r * t_8));
    let t_1 = C[1] + r * (C[2] + r * (C[3] + r * (C[4] + r * t_5)));
    C[0] + r * t_1
}

/// Principal branch W0, defined for x >= -1/e
pub fn lambert_w0(x: f64) -> LambertResult {
    let q = x + 1.0 / E;

    if x == 0.0 {
        LambertResult::exact(0.0, 0.0)
    } else if q < 0.0 {
        LambertResult::domain_error(q)
    } else if q == 0.0 {
        LambertResult::exact(-1.0, DBL_EPSILON)
    } else if q < 1.0e-3 {
        let value = series_eval(q.sqrt());
        LambertResult::exact(value, 2.0 * DBL_EPSILON * value.abs())
    } else {
        let initial = if x < 1.0 {
            let p = (2.0 * E * q).sqrt();
            -1.0 + p * (1.0 + p * (-1.0 / 3.0 + p * 11.0 / 72.0))
        } else {
            let w = x.ln();
            if x > 3.0 {
                w - w.ln()
            } else {
                w
            }
        };
        halley_iteration(x, initial, W0_MAX_ITERS)
    }
}

/// Secondary branch W-1, defined for -1/e <= x < 0 (defers to W0 for x > 0)
pub fn lambert_wm1(x: f64) -> LambertResult {
    if x > 0.0 {
        return lambert_w0(x);
    }
    if x == 0.0 {
        return LambertResult::exact(0.0, 0.0);
    }

    let q = x + 1.0 / E;
    if q < 0.0 {
        return LambertResult::domain_error(q);
    }

    let initial = if x < -1.0e-6 {
        let w = series_eval(-q.sqrt());
        if q < 3.0e-3 {
            return LambertResult::exact(w, 5.0 * DBL_EPSILON * w.abs());
        }
        w
    } else {
        let l1 = (-x).ln();
        let l2 = (-l1).ln();
        l1 - l2 + l2 / l1
    };
    halley_iteration(x, initial, WM1_MAX_ITERS)
}
