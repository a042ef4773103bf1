//! WFS pre-equalization filter.
//!
//! The 2.5D WFS driving function needs a sqrt(f) spectral correction to
//! compensate the frequency response of the secondary-source superposition.
//! The kernel is designed in the frequency domain: the target magnitude is
//! `sqrt(f / f_low)` between the two corner frequencies and flat outside,
//! with zero phase, then brought to the time domain, centered and windowed.

use crate::config::SimulationConfig;
use crate::error::Result;
use ndarray::Array1;
use num_complex::Complex64;
use rustfft::num_traits::Zero;
use rustfft::FftPlanner;
use std::f64::consts::PI;

/// Target magnitude of the pre-equalization filter at frequency `f`.
fn target_magnitude(f: f64, f_low: f64, f_high: f64) -> f64 {
    if f <= f_low {
        1.0
    } else if f >= f_high {
        (f_high / f_low).sqrt()
    } else {
        (f / f_low).sqrt()
    }
}

/// Design the pre-equalization FIR kernel.
///
/// Returns a linear-phase kernel of `config.prefilter_taps` coefficients
/// with a `sqrt(f)` emphasis between `config.prefilter_low_hz` and
/// `config.prefilter_high_hz`.
pub fn wfs_prefilter(config: &SimulationConfig) -> Result<Array1<f64>> {
    config.validate()?;

    let n_taps = config.prefilter_taps;
    // FFT size well above the tap count so the frequency grid is dense
    // compared to the kernel's transition bands.
    let fft_size = (n_taps * 8).next_power_of_two().max(1024);
    let n_bins = fft_size / 2 + 1;
    let freq_step = config.fs / fft_size as f64;

    // Zero-phase target spectrum with conjugate (here: real) symmetry.
    let mut spectrum = vec![Complex64::zero(); fft_size];
    for i in 0..n_bins {
        let mag = target_magnitude(
            i as f64 * freq_step,
            config.prefilter_low_hz,
            config.prefilter_high_hz,
        );
        spectrum[i] = Complex64::new(mag, 0.0);
        if i > 0 && i < fft_size - i {
            spectrum[fft_size - i] = Complex64::new(mag, 0.0);
        }
    }

    let mut planner = FftPlanner::new();
    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut spectrum);
    for x in &mut spectrum {
        *x /= fft_size as f64;
    }

    // The zero-phase impulse response is centered at sample 0 with circular
    // wraparound; rotate it so the peak sits at the kernel center, then
    // apply a Hann window to bound truncation ripple.
    let center = n_taps / 2;
    let mut kernel = Array1::zeros(n_taps);
    for k in 0..n_taps {
        let src = (k + fft_size - center) % fft_size;
        let offset = k as f64 - center as f64;
        let hann = 0.5 * (1.0 + (PI * offset / center as f64).cos());
        kernel[k] = spectrum[src].re * hann;
    }
    Ok(kernel)
}
