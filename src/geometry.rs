//! Secondary-source array geometry: positions, visibility selection and
//! spatial tapering.
//!
//! A secondary source is one physical loudspeaker of the reproduction array.
//! Geometry arrays are ordered; all per-source outputs downstream (delays,
//! weights, driving-signal columns) align index-for-index with them.

use crate::config::SimulationConfig;
use crate::driving::VirtualSource;
use crate::error::{Result, WfsError};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::Sub;

/// A point (or free vector) in 3D space, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    /// Create a new point.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: &Point3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point3D) -> f64 {
        (*self - *other).norm()
    }

    /// Unit vector pointing in the same direction.
    ///
    /// Returns the zero vector unchanged when the norm is zero.
    pub fn normalized(&self) -> Point3D {
        let n = self.norm();
        if n > 0.0 {
            Point3D::new(self.x / n, self.y / n, self.z / n)
        } else {
            *self
        }
    }
}

impl Sub for Point3D {
    type Output = Point3D;

    fn sub(self, other: Point3D) -> Point3D {
        Point3D::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// A single loudspeaker of the reproduction array: position plus outward
/// unit normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecondarySource {
    /// Position in meters.
    pub position: Point3D,
    /// Outward unit normal (main radiation direction).
    pub normal: Point3D,
}

/// Generate a linear secondary-source array of the given length.
///
/// The array lies along the x axis, centered on the origin, with all normals
/// pointing towards positive y (the listening area). Spacing comes from
/// `config.array_spacing`; the array gets `floor(length / spacing) + 1`
/// sources.
///
/// # Arguments
/// * `array_length` - Total length of the array in meters (must be positive)
/// * `config` - Simulation configuration
///
/// # Returns
/// * Ordered sequence of secondary sources, left to right
pub fn secondary_source_positions(
    array_length: f64,
    config: &SimulationConfig,
) -> Result<Vec<SecondarySource>> {
    if !(array_length > 0.0) {
        return Err(WfsError::NonPositiveArrayLength {
            length: array_length,
        });
    }
    if !(config.array_spacing > 0.0) {
        return Err(WfsError::NonPositiveSpacing {
            spacing: config.array_spacing,
        });
    }

    let n = (array_length / config.array_spacing).floor() as usize + 1;
    let half_span = (n - 1) as f64 * config.array_spacing / 2.0;
    let normal = Point3D::new(0.0, 1.0, 0.0);

    let sources = (0..n)
        .map(|i| SecondarySource {
            position: Point3D::new(
                -half_span + i as f64 * config.array_spacing,
                0.0,
                0.0,
            ),
            normal,
        })
        .collect();
    Ok(sources)
}

/// Select the secondary sources that contribute to the reproduction of the
/// given virtual source.
///
/// A source is kept when its normal has a positive component along the local
/// propagation direction of the virtual wave field. The returned subset
/// preserves the input order.
pub fn secondary_source_selection(
    sources: &[SecondarySource],
    virtual_source: &VirtualSource,
) -> Vec<SecondarySource> {
    sources
        .iter()
        .copied()
        .filter(|s| match virtual_source {
            VirtualSource::PlaneWave(n_pw) => n_pw.dot(&s.normal) > 0.0,
            VirtualSource::PointSource(xs) => (s.position - *xs).dot(&s.normal) > 0.0,
            VirtualSource::FocusedSource(xs) => (*xs - s.position).dot(&s.normal) > 0.0,
        })
        .collect()
}

/// Compute a Tukey tapering window over `n` selected sources.
///
/// The window is flat in the middle with raised-cosine ramps over
/// `config.taper_fraction` of the sources at each edge. Tapering suppresses
/// the edge-diffraction artifacts of a finite (truncated) array.
pub fn tapering_window(n: usize, config: &SimulationConfig) -> Array1<f64> {
    let mut window = Array1::ones(n);
    if n < 3 {
        return window;
    }
    let ramp = (config.taper_fraction * n as f64 / 2.0).floor() as usize;
    if ramp == 0 {
        return window;
    }
    for i in 0..ramp {
        let t = (i + 1) as f64 / (ramp + 1) as f64;
        let v = 0.5 * (1.0 - (PI * t).cos());
        window[i] = v;
        window[n - 1 - i] = v;
    }
    window
}
