//! Single-sided amplitude and phase spectra.
//!
//! The analyzer transforms an arbitrary-rank real array along one chosen
//! axis. The dimension bookkeeping is made explicit: the target axis is
//! moved to the front, the remaining axes are flattened into independent
//! lanes, the transform runs along the leading dimension, and the original
//! shape is restored on output with the transformed axis resized to the
//! single-sided bin count.

use crate::config::SimulationConfig;
use crate::error::{Result, WfsError};
use ndarray::{Array1, Array2, ArrayD, Axis, IxDyn};
use num_complex::Complex64;
use rustfft::FftPlanner;

/// Single-sided spectrum of a real multichannel signal.
#[derive(Debug, Clone)]
pub struct Spectrum {
    /// Amplitude per bin, same shape as the input with the transform axis
    /// resized to the bin count.
    pub amplitude: ArrayD<f64>,
    /// Phase per bin in radians, same shape as `amplitude`.
    pub phase: ArrayD<f64>,
    /// Frequency of each bin in Hz, `0` to Nyquist.
    pub frequencies: Array1<f64>,
}

/// Move `axis` to the leading dimension and flatten the remaining axes into
/// columns, preserving their logical order.
fn axis_to_front(signal: &ArrayD<f64>, axis: usize) -> Array2<f64> {
    let n = signal.shape()[axis];
    let m = signal.len() / n;
    let mut flat = Array2::zeros((n, m));
    for (lane_idx, lane) in signal.lanes(Axis(axis)).into_iter().enumerate() {
        for (i, &v) in lane.iter().enumerate() {
            flat[[i, lane_idx]] = v;
        }
    }
    flat
}

/// Inverse of [`axis_to_front`]: scatter the flattened lanes back into an
/// array with the original shape, with the transformed axis resized to the
/// flattened row count.
fn restore_shape(flat: &Array2<f64>, original_shape: &[usize], axis: usize) -> ArrayD<f64> {
    let mut shape = original_shape.to_vec();
    shape[axis] = flat.nrows();
    let mut out = ArrayD::zeros(IxDyn(&shape));
    for (lane_idx, mut lane) in out.lanes_mut(Axis(axis)).into_iter().enumerate() {
        for (i, v) in lane.iter_mut().enumerate() {
            *v = flat[[i, lane_idx]];
        }
    }
    out
}

/// Compute the single-sided amplitude/phase spectrum of `signal` along
/// `axis`.
///
/// For transform length `N` the output keeps bins `0..=N/2` (Nyquist
/// included for even `N`). Amplitudes are normalized by `N` and doubled for
/// every bin except DC and, when present, Nyquist, so a real sine of
/// amplitude `a` shows up with amplitude `a` at its bin.
pub fn spectrum(signal: &ArrayD<f64>, axis: usize, config: &SimulationConfig) -> Result<Spectrum> {
    config.validate()?;
    if axis >= signal.ndim() {
        return Err(WfsError::AxisOutOfRange {
            axis,
            ndim: signal.ndim(),
        });
    }
    let n = signal.shape()[axis];
    if n == 0 {
        return Err(WfsError::EmptySignal);
    }

    let flat = axis_to_front(signal, axis);
    let m = flat.ncols();
    // Odd N keeps bins 0..=(N-1)/2, even N keeps 0..=N/2; both reduce to
    // N/2 + 1 in integer arithmetic.
    let n_bins = n / 2 + 1;
    let has_nyquist = n % 2 == 0 && n > 1;

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);

    let mut amplitude = Array2::zeros((n_bins, m));
    let mut phase = Array2::zeros((n_bins, m));
    let mut buffer = vec![Complex64::new(0.0, 0.0); n];
    for j in 0..m {
        for i in 0..n {
            buffer[i] = Complex64::new(flat[[i, j]], 0.0);
        }
        fft.process(&mut buffer);
        for k in 0..n_bins {
            let doubled = k != 0 && !(has_nyquist && k == n_bins - 1);
            let factor = if doubled { 2.0 } else { 1.0 };
            amplitude[[k, j]] = factor * buffer[k].norm() / n as f64;
            phase[[k, j]] = buffer[k].arg();
        }
    }

    let frequencies = Array1::from_shape_fn(n_bins, |k| k as f64 * config.fs / n as f64);
    Ok(Spectrum {
        amplitude: restore_shape(&amplitude, signal.shape(), axis),
        phase: restore_shape(&phase, signal.shape(), axis),
        frequencies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn config() -> SimulationConfig {
        SimulationConfig::default()
    }

    #[test]
    fn test_sine_amplitude_at_its_bin() {
        let n = 64;
        let bin = 4;
        let amp = 1.5;
        let signal = Array1::from_shape_fn(n, |i| {
            amp * (2.0 * PI * bin as f64 * i as f64 / n as f64).sin()
        })
        .into_dyn();
        let s = spectrum(&signal, 0, &config()).unwrap();
        assert_eq!(s.amplitude.shape(), &[33]);
        assert!((s.amplitude[[bin]] - amp).abs() < 1e-9);
        // Everything else is (numerically) empty.
        for k in 0..33 {
            if k != bin {
                assert!(s.amplitude[[k]].abs() < 1e-9);
            }
        }
        // Frequency axis matches bin * fs / n.
        assert!((s.frequencies[bin] - bin as f64 * 44100.0 / n as f64).abs() < 1e-9);
    }

    #[test]
    fn test_dc_not_doubled() {
        let signal = ArrayD::from_elem(IxDyn(&[16]), 3.0);
        let s = spectrum(&signal, 0, &config()).unwrap();
        assert!((s.amplitude[[0]] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_nyquist_not_doubled_for_even_length() {
        let n = 16;
        // Alternating +1/-1 is the pure Nyquist sequence.
        let signal = Array1::from_shape_fn(n, |i| if i % 2 == 0 { 1.0 } else { -1.0 }).into_dyn();
        let s = spectrum(&signal, 0, &config()).unwrap();
        let nyq = n / 2;
        assert!((s.amplitude[[nyq]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_axis_selection_on_2d_signal() {
        // Two channels in the columns, transform along axis 0.
        let n = 32;
        let signal = Array2::from_shape_fn((n, 2), |(i, ch)| {
            let bin = if ch == 0 { 3.0 } else { 7.0 };
            (2.0 * PI * bin * i as f64 / n as f64).sin()
        })
        .into_dyn();
        let s = spectrum(&signal, 0, &config()).unwrap();
        assert_eq!(s.amplitude.shape(), &[n / 2 + 1, 2]);
        assert!((s.amplitude[[3, 0]] - 1.0).abs() < 1e-9);
        assert!((s.amplitude[[7, 1]] - 1.0).abs() < 1e-9);
        // The transposed layout along axis 1 gives the same spectra.
        let transposed = signal.t().to_owned().into_dyn();
        let st = spectrum(&transposed, 1, &config()).unwrap();
        assert_eq!(st.amplitude.shape(), &[2, n / 2 + 1]);
        assert!((st.amplitude[[0, 3]] - 1.0).abs() < 1e-9);
        assert!((st.amplitude[[1, 7]] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_out_of_range() {
        let signal = ArrayD::zeros(IxDyn(&[8]));
        let err = spectrum(&signal, 1, &config()).unwrap_err();
        assert!(matches!(err, WfsError::AxisOutOfRange { axis: 1, ndim: 1 }));
    }

    #[test]
    fn test_empty_signal_rejected() {
        let signal = ArrayD::zeros(IxDyn(&[0]));
        let err = spectrum(&signal, 0, &config()).unwrap_err();
        assert!(matches!(err, WfsError::EmptySignal));
    }

    /// Rebuild the double-sided spectrum from the single-sided output and
    /// inverse-transform it back to the signal.
    fn round_trip(n: usize) {
        let signal = Array1::from_shape_fn(n, |i| {
            (0.3 * i as f64).sin() + 0.5 * (0.11 * i as f64).cos() + 0.1
        });
        let s = spectrum(&signal.clone().into_dyn(), 0, &config()).unwrap();
        let n_bins = n / 2 + 1;
        let has_nyquist = n % 2 == 0;

        let mut full = vec![Complex64::new(0.0, 0.0); n];
        for k in 0..n_bins {
            let doubled = k != 0 && !(has_nyquist && k == n_bins - 1);
            let factor = if doubled { 2.0 } else { 1.0 };
            let magnitude = s.amplitude[[k]] * n as f64 / factor;
            let value = Complex64::from_polar(magnitude, s.phase[[k]]);
            full[k] = value;
            if k != 0 && k != n - k {
                full[n - k] = value.conj();
            }
        }

        let mut planner = FftPlanner::new();
        let ifft = planner.plan_fft_inverse(n);
        ifft.process(&mut full);
        for (i, v) in full.iter().enumerate() {
            assert!(
                (v.re / n as f64 - signal[i]).abs() < 1e-9,
                "n={n}, sample {i}"
            );
            assert!(v.im.abs() / (n as f64) < 1e-9);
        }
    }

    #[test]
    fn test_round_trip_even_length() {
        round_trip(64);
    }

    #[test]
    fn test_round_trip_odd_length() {
        round_trip(63);
    }
}
