//! Fractional delay line.
//!
//! The delay line produces a weighted, time-shifted copy of a signal. The
//! shift may be any real number of samples; the fractional part is realized
//! by interpolation. The kernel is linear in the weight and time-invariant,
//! which keeps superposition exact downstream.

use crate::config::InterpolationMethod;
use ndarray::Array1;
use std::f64::consts::PI;

/// Read `signal[idx]`, treating everything outside the buffer as zero.
fn sample_at(signal: &Array1<f64>, idx: i64) -> f64 {
    if idx >= 0 && (idx as usize) < signal.len() {
        signal[idx as usize]
    } else {
        0.0
    }
}

/// Normalized sinc, `sin(pi t) / (pi t)`.
fn sinc(t: f64) -> f64 {
    if t.abs() < 1e-12 {
        1.0
    } else {
        (PI * t).sin() / (PI * t)
    }
}

/// Blackman window evaluated at offset `t` in `[-half_width, half_width]`.
fn blackman(t: f64, half_width: f64) -> f64 {
    let u = PI * t / half_width;
    0.42 + 0.5 * u.cos() + 0.08 * (2.0 * u).cos()
}

/// Evaluate the signal at fractional position `pos`, out-of-range as zero.
fn interpolate_at(signal: &Array1<f64>, pos: f64, method: InterpolationMethod) -> f64 {
    match method {
        InterpolationMethod::Nearest => sample_at(signal, pos.round() as i64),
        InterpolationMethod::Linear => {
            let i0 = pos.floor();
            let frac = pos - i0;
            let i0 = i0 as i64;
            (1.0 - frac) * sample_at(signal, i0) + frac * sample_at(signal, i0 + 1)
        }
        InterpolationMethod::Sinc { half_width } => {
            let hw = half_width.max(1) as i64;
            let i0 = pos.floor() as i64;
            let mut acc = 0.0;
            for k in (i0 - hw + 1)..=(i0 + hw) {
                let t = pos - k as f64;
                acc += sample_at(signal, k) * sinc(t) * blackman(t, hw as f64);
            }
            acc
        }
    }
}

/// Delay `signal` by `delay_samples` (possibly fractional, possibly
/// negative) and scale it by `weight`.
///
/// The output has the same length as the input; samples shifted in from
/// outside the buffer are zero. Delays that push signal content past the end
/// of the buffer silently truncate it, so callers must zero-pad the input to
/// cover the largest delay they will request.
///
/// # Arguments
/// * `signal` - Input signal
/// * `delay_samples` - Time shift in samples (positive delays move content
///   towards later samples)
/// * `weight` - Scalar amplitude factor applied to the output
/// * `method` - Interpolation method for the fractional part
pub fn delay(
    signal: &Array1<f64>,
    delay_samples: f64,
    weight: f64,
    method: InterpolationMethod,
) -> Array1<f64> {
    Array1::from_shape_fn(signal.len(), |i| {
        weight * interpolate_at(signal, i as f64 - delay_samples, method)
    })
}
