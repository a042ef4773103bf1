//! Spatial wave-field superposition and the impulse-field simulator.
//!
//! The propagator superposes the (delayed, weighted) driving signal of every
//! secondary source into a horizontal grid at one time instant, with
//! free-field point-source spreading `1/(4 pi r)`. The simulator on top
//! wires up geometry generation, source selection, tapering and driving
//! synthesis, then delegates to the propagator.

use crate::config::SimulationConfig;
use crate::driving::{synthesize, VirtualSource};
use crate::error::{Result, WfsError};
use crate::geometry::{
    secondary_source_positions, secondary_source_selection, tapering_window, Point3D,
    SecondarySource,
};
use log::{info, warn};
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use std::f64::consts::PI;

/// Guard radius for grid points that fall exactly on a loudspeaker.
const MIN_DISTANCE: f64 = 1e-6;

/// The simulated wave field at one time instant.
#[derive(Debug, Clone)]
pub struct WaveField {
    /// Grid positions along x (meters).
    pub x_axis: Array1<f64>,
    /// Grid positions along y (meters).
    pub y_axis: Array1<f64>,
    /// Sound pressure over the grid; rows follow `y_axis`, columns `x_axis`.
    pub pressure: Array2<f64>,
    /// The secondary sources that were selected and driven.
    pub sources: Vec<SecondarySource>,
    /// The tapering window applied to the driving signals, one entry per
    /// selected source.
    pub window: Array1<f64>,
}

/// Evaluate a driving-signal column at a fractional sample position.
///
/// Field lookup always interpolates linearly; reads outside the signal are
/// zero, so times before the first activation contribute nothing.
fn signal_at(column: ArrayView1<'_, f64>, pos: f64) -> f64 {
    let i0 = pos.floor();
    let frac = pos - i0;
    let i0 = i0 as i64;
    let at = |idx: i64| {
        if idx >= 0 && (idx as usize) < column.len() {
            column[idx as usize]
        } else {
            0.0
        }
    };
    (1.0 - frac) * at(i0) + frac * at(i0 + 1)
}

/// Superpose the driving signals of all secondary sources into the spatial
/// grid at the given time sample.
///
/// `driving_matrix` columns must be index-aligned with `sources`. Returns
/// the pressure field with rows following `y_axis` and columns `x_axis`.
pub fn wave_field_imp(
    x_axis: &Array1<f64>,
    y_axis: &Array1<f64>,
    sources: &[SecondarySource],
    driving_matrix: &Array2<f64>,
    time_sample: f64,
    config: &SimulationConfig,
) -> Array2<f64> {
    let nx = x_axis.len();
    let ny = y_axis.len();
    let scale = config.fs / config.c;

    // Grid rows are independent; compute them in parallel and unpack in
    // order.
    let rows: Vec<(usize, Vec<f64>)> = (0..ny)
        .into_par_iter()
        .map(|j| {
            let y = y_axis[j];
            let row: Vec<f64> = x_axis
                .iter()
                .map(|&x| {
                    let point = Point3D::new(x, y, 0.0);
                    let mut pressure = 0.0;
                    for (s, source) in sources.iter().enumerate() {
                        let r = point.distance_to(&source.position).max(MIN_DISTANCE);
                        let pos = time_sample - r * scale;
                        pressure +=
                            signal_at(driving_matrix.column(s), pos) / (4.0 * PI * r);
                    }
                    pressure
                })
                .collect();
            (j, row)
        })
        .collect();

    let mut field = Array2::zeros((ny, nx));
    for (j, row) in rows {
        for (i, v) in row.into_iter().enumerate() {
            field[[j, i]] = v;
        }
    }
    field
}

fn check_extent(axis: &'static str, extent: (f64, f64)) -> Result<()> {
    if extent.1 <= extent.0 {
        return Err(WfsError::DegenerateExtent {
            axis,
            min: extent.0,
            max: extent.1,
        });
    }
    Ok(())
}

/// Simulate the impulse wave field of a virtual source reproduced by a
/// linear loudspeaker array.
///
/// Generates the array geometry for `array_length`, selects the sources
/// that contribute to the virtual source, tapers them, synthesizes the
/// driving signals and superposes them over the grid spanned by `x_extent`
/// and `y_extent` at `time_sample` (in samples of `config.fs`).
///
/// The time sample is re-baselined by the maximum excess delay of the
/// driving signals, so time zero aligns with the first active source's
/// emission.
pub fn simulate_wave_field(
    x_extent: (f64, f64),
    y_extent: (f64, f64),
    virtual_source: &VirtualSource,
    time_sample: f64,
    array_length: f64,
    config: &SimulationConfig,
) -> Result<WaveField> {
    config.validate()?;
    check_extent("x", x_extent)?;
    check_extent("y", y_extent)?;

    let all_sources = secondary_source_positions(array_length, config)?;
    let sources = secondary_source_selection(&all_sources, virtual_source);
    if sources.is_empty() {
        warn!("no secondary sources selected for {virtual_source:?}");
    }
    let window = tapering_window(sources.len(), config);

    let mut signals = synthesize(&sources, virtual_source, config)?;
    for (i, &w) in window.iter().enumerate() {
        signals.matrix.column_mut(i).mapv_inplace(|v| v * w);
    }

    // The driving signals carry the complement of the physical delay; take
    // the largest applied shift back out of the requested time so it refers
    // to the first active source's emission.
    let excess_samples = if signals.delays.is_empty() {
        0.0
    } else {
        let d_max = signals.delays.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let d_min = signals.delays.iter().cloned().fold(f64::INFINITY, f64::min);
        ((d_max - d_min) * config.fs).round()
    };
    let adjusted_time = time_sample - excess_samples;

    info!(
        "simulating wave field: {} of {} sources selected, time sample {} (re-baselined {})",
        sources.len(),
        all_sources.len(),
        time_sample,
        adjusted_time
    );

    let x_axis = Array1::linspace(x_extent.0, x_extent.1, config.grid_resolution);
    let y_axis = Array1::linspace(y_extent.0, y_extent.1, config.grid_resolution);
    let pressure = wave_field_imp(
        &x_axis,
        &y_axis,
        &sources,
        &signals.matrix,
        adjusted_time,
        config,
    );

    Ok(WaveField {
        x_axis,
        y_axis,
        pressure,
        sources,
        window,
    })
}
