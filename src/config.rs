//! Simulation configuration.
//!
//! The configuration is an explicit immutable value passed to every call,
//! enumerating exactly the fields the synthesis pipeline consumes. It can be
//! round-tripped through serde for use in config files.

use crate::error::{Result, WfsError};
use crate::geometry::Point3D;
use serde::{Deserialize, Serialize};

/// Interpolation method used by the fractional delay line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMethod {
    /// Round the delay to the nearest integer number of samples.
    Nearest,
    /// Two-tap linear interpolation of the fractional part.
    Linear,
    /// Blackman-windowed bandlimited (sinc) interpolation.
    Sinc {
        /// Half-width of the sinc kernel in samples.
        half_width: usize,
    },
}

impl Default for InterpolationMethod {
    fn default() -> Self {
        InterpolationMethod::Linear
    }
}

impl InterpolationMethod {
    /// Number of samples the kernel can smear past an exact integer shift.
    pub(crate) fn guard_samples(&self) -> usize {
        match self {
            InterpolationMethod::Nearest => 1,
            InterpolationMethod::Linear => 2,
            InterpolationMethod::Sinc { half_width } => half_width + 1,
        }
    }
}

fn default_fs() -> f64 {
    44100.0
}

fn default_c() -> f64 {
    343.0
}

fn default_xref() -> Point3D {
    Point3D::new(0.0, 2.0, 0.0)
}

fn default_use_prefilter() -> bool {
    true
}

fn default_array_spacing() -> f64 {
    0.15
}

fn default_taper_fraction() -> f64 {
    0.3
}

fn default_grid_resolution() -> usize {
    200
}

fn default_prefilter_taps() -> usize {
    512
}

fn default_prefilter_low_hz() -> f64 {
    50.0
}

fn default_prefilter_high_hz() -> f64 {
    1200.0
}

/// Configuration for the WFS synthesis pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Sampling rate in Hz.
    #[serde(default = "default_fs")]
    pub fs: f64,
    /// Speed of sound in m/s.
    #[serde(default = "default_c")]
    pub c: f64,
    /// Reference point for 2.5D amplitude correction (meters).
    #[serde(default = "default_xref")]
    pub xref: Point3D,
    /// Convolve the driving-function prototype with the pre-equalization
    /// filter kernel.
    #[serde(default = "default_use_prefilter")]
    pub use_prefilter: bool,
    /// Interpolation method for fractional delays.
    #[serde(default)]
    pub interpolation: InterpolationMethod,
    /// Center-to-center spacing of the secondary sources (meters).
    #[serde(default = "default_array_spacing")]
    pub array_spacing: f64,
    /// Fraction of the array tapered at each edge (Tukey window).
    #[serde(default = "default_taper_fraction")]
    pub taper_fraction: f64,
    /// Number of grid points per axis of the simulated wave field.
    #[serde(default = "default_grid_resolution")]
    pub grid_resolution: usize,
    /// Number of taps of the pre-equalization FIR kernel.
    #[serde(default = "default_prefilter_taps")]
    pub prefilter_taps: usize,
    /// Lower corner frequency of the sqrt(f) pre-emphasis band (Hz).
    #[serde(default = "default_prefilter_low_hz")]
    pub prefilter_low_hz: f64,
    /// Upper corner frequency of the sqrt(f) pre-emphasis band (Hz).
    #[serde(default = "default_prefilter_high_hz")]
    pub prefilter_high_hz: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fs: default_fs(),
            c: default_c(),
            xref: default_xref(),
            use_prefilter: default_use_prefilter(),
            interpolation: InterpolationMethod::default(),
            array_spacing: default_array_spacing(),
            taper_fraction: default_taper_fraction(),
            grid_resolution: default_grid_resolution(),
            prefilter_taps: default_prefilter_taps(),
            prefilter_low_hz: default_prefilter_low_hz(),
            prefilter_high_hz: default_prefilter_high_hz(),
        }
    }
}

impl SimulationConfig {
    /// Check that all scalar fields are in their valid range.
    pub fn validate(&self) -> Result<()> {
        if !(self.fs > 0.0) {
            return Err(WfsError::InvalidConfig {
                field: "fs",
                value: self.fs,
            });
        }
        if !(self.c > 0.0) {
            return Err(WfsError::InvalidConfig {
                field: "c",
                value: self.c,
            });
        }
        if !(self.array_spacing > 0.0) {
            return Err(WfsError::NonPositiveSpacing {
                spacing: self.array_spacing,
            });
        }
        if !(0.0..=1.0).contains(&self.taper_fraction) {
            return Err(WfsError::InvalidConfig {
                field: "taper_fraction",
                value: self.taper_fraction,
            });
        }
        if self.grid_resolution < 2 {
            return Err(WfsError::InvalidConfig {
                field: "grid_resolution",
                value: self.grid_resolution as f64,
            });
        }
        if self.use_prefilter {
            if self.prefilter_taps < 2 {
                return Err(WfsError::InvalidConfig {
                    field: "prefilter_taps",
                    value: self.prefilter_taps as f64,
                });
            }
            if !(self.prefilter_low_hz > 0.0) {
                return Err(WfsError::InvalidConfig {
                    field: "prefilter_low_hz",
                    value: self.prefilter_low_hz,
                });
            }
            if self.prefilter_high_hz <= self.prefilter_low_hz {
                return Err(WfsError::InvalidConfig {
                    field: "prefilter_high_hz",
                    value: self.prefilter_high_hz,
                });
            }
        }
        Ok(())
    }
}
