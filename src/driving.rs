//! 2.5D WFS driving functions.
//!
//! For every secondary source the driving function reduces to a scalar delay
//! and a scalar weight applied to a shared prototype signal. The formulas
//! implement the time-domain 2.5D WFS driving functions with amplitude
//! correction at a fixed reference point:
//!
//! - plane wave `n_pw`: `delay = (n_pw . x0) / c`, `weight = 2 g0 (n_pw . n0)`
//! - point source `xs`: `r = |x0 - xs|`, `delay = r / c`,
//!   `weight = g0 / (2 pi) ((x0 - xs) . n0) r^(-3/2)`
//! - focused source: same weight as the point source, `delay = -r / c`
//!
//! with `g0 = sqrt(2 pi |xref - x0|)`.

use crate::config::SimulationConfig;
use crate::delay_line::delay;
use crate::error::{Result, WfsError};
use crate::geometry::{Point3D, SecondarySource};
use crate::prefilter::wfs_prefilter;
use log::debug;
use ndarray::{Array1, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// The virtual sound source to be reproduced by the array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "geometry", rename_all = "snake_case")]
pub enum VirtualSource {
    /// Plane wave traveling along the given unit direction.
    PlaneWave(Point3D),
    /// Point source at the given position, behind the array.
    PointSource(Point3D),
    /// Focused source: a point source focused in front of the array.
    FocusedSource(Point3D),
}

impl VirtualSource {
    /// Build a virtual source from a textual type tag and its geometry, for
    /// config-driven callers.
    ///
    /// Recognized tags are `"pw"`/`"plane"` (geometry is the propagation
    /// direction, normalized here), `"ps"`/`"point"` and `"fs"`/`"focused"`
    /// (geometry is the source position). Anything else fails with
    /// [`WfsError::InvalidSourceType`].
    pub fn from_parts(kind: &str, geometry: Point3D) -> Result<Self> {
        match kind {
            "pw" | "plane" => Ok(VirtualSource::PlaneWave(geometry.normalized())),
            "ps" | "point" => Ok(VirtualSource::PointSource(geometry)),
            "fs" | "focused" => Ok(VirtualSource::FocusedSource(geometry)),
            other => Err(WfsError::InvalidSourceType {
                tag: other.to_string(),
            }),
        }
    }
}

/// The per-source driving signals together with the parameters they were
/// built from.
#[derive(Debug, Clone)]
pub struct DrivingSignals {
    /// Driving-signal matrix; rows are time samples, one column per
    /// secondary source, index-aligned with the geometry array.
    pub matrix: Array2<f64>,
    /// Physical delay of each secondary source in seconds.
    pub delays: Array1<f64>,
    /// Amplitude weight of each secondary source.
    pub weights: Array1<f64>,
}

/// Compute the delay (seconds) and weight of the 2.5D WFS driving function
/// for every secondary source.
///
/// The outputs are index-aligned with `sources`. A point or focused source
/// coinciding with a secondary source makes the `1/r` factor undefined and
/// fails with [`WfsError::NumericDegeneracy`] before anything is returned.
pub fn driving_parameters(
    sources: &[SecondarySource],
    virtual_source: &VirtualSource,
    config: &SimulationConfig,
) -> Result<(Array1<f64>, Array1<f64>)> {
    config.validate()?;

    let c = config.c;
    let mut delays = Array1::zeros(sources.len());
    let mut weights = Array1::zeros(sources.len());

    for (i, s) in sources.iter().enumerate() {
        let x0 = s.position;
        let n0 = s.normal;
        // 2.5D amplitude correction referenced to xref.
        let g0 = (2.0 * PI * config.xref.distance_to(&x0)).sqrt();

        let (delay_s, weight) = match virtual_source {
            VirtualSource::PlaneWave(n_pw) => {
                (n_pw.dot(&x0) / c, 2.0 * g0 * n_pw.dot(&n0))
            }
            VirtualSource::PointSource(xs) => {
                let r = x0.distance_to(xs);
                if r <= f64::EPSILON {
                    return Err(WfsError::NumericDegeneracy { index: i });
                }
                let w = g0 / (2.0 * PI) * (x0 - *xs).dot(&n0) * r.powf(-1.5);
                (r / c, w)
            }
            VirtualSource::FocusedSource(xs) => {
                let r = x0.distance_to(xs);
                if r <= f64::EPSILON {
                    return Err(WfsError::NumericDegeneracy { index: i });
                }
                let w = g0 / (2.0 * PI) * (x0 - *xs).dot(&n0) * r.powf(-1.5);
                (-r / c, w)
            }
        };
        delays[i] = delay_s;
        weights[i] = weight;
    }
    Ok((delays, weights))
}

/// Build the shared driving-function prototype: a unit impulse, convolved
/// with the pre-equalization kernel when enabled, zero-padded to cover the
/// maximum inter-source delay spread plus the interpolation guard.
fn prototype(delays: &Array1<f64>, config: &SimulationConfig) -> Result<Array1<f64>> {
    let kernel = if config.use_prefilter {
        wfs_prefilter(config)?
    } else {
        Array1::from_elem(1, 1.0)
    };

    let d_max = delays.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let d_min = delays.iter().cloned().fold(f64::INFINITY, f64::min);
    let spread_samples = ((d_max - d_min) * config.fs).ceil() as usize;

    let n = kernel.len() + spread_samples + config.interpolation.guard_samples();
    let mut proto = Array1::zeros(n);
    proto.slice_mut(ndarray::s![..kernel.len()]).assign(&kernel);
    Ok(proto)
}

/// Synthesize the full driving-signal matrix for the given virtual source.
///
/// Each column is the shared prototype shifted by
/// `(max(delay) - delay[i]) * fs` samples and scaled by `weight[i]`. The
/// baseline subtraction makes the earliest-activated source carry zero
/// relative delay: a shorter driving-function delay corresponds to a longer
/// acoustic propagation time. Column `i` always belongs to `sources[i]`.
pub fn synthesize(
    sources: &[SecondarySource],
    virtual_source: &VirtualSource,
    config: &SimulationConfig,
) -> Result<DrivingSignals> {
    let (delays, weights) = driving_parameters(sources, virtual_source, config)?;

    if sources.is_empty() {
        return Ok(DrivingSignals {
            matrix: Array2::zeros((0, 0)),
            delays,
            weights,
        });
    }

    let proto = prototype(&delays, config)?;
    let d_max = delays.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    debug!(
        "synthesizing driving signals for {} sources, prototype length {}",
        sources.len(),
        proto.len()
    );

    // Each column is independent; compute them in parallel and unpack in
    // source order.
    let columns: Vec<(usize, Array1<f64>)> = (0..sources.len())
        .into_par_iter()
        .map(|i| {
            let shift = (d_max - delays[i]) * config.fs;
            (i, delay(&proto, shift, weights[i], config.interpolation))
        })
        .collect();

    let mut matrix = Array2::zeros((proto.len(), sources.len()));
    for (i, column) in columns {
        matrix.column_mut(i).assign(&column);
    }

    Ok(DrivingSignals {
        matrix,
        delays,
        weights,
    })
}
