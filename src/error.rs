//! Error types for the wfsim crate.
//!
//! This module provides a unified error type for all wave-field synthesis
//! operations. All failures are raised immediately to the caller; no partial
//! results are ever returned.

use thiserror::Error;

/// Error type for wave-field synthesis operations.
///
/// This enum captures all possible errors that can occur during geometry
/// generation, driving-function synthesis and spectrum analysis.
#[derive(Debug, Error)]
pub enum WfsError {
    /// The requested loudspeaker array length is not positive.
    #[error("secondary source array length must be positive, got {length} m")]
    NonPositiveArrayLength {
        /// The offending array length in meters.
        length: f64,
    },

    /// The loudspeaker spacing is not positive.
    #[error("secondary source spacing must be positive, got {spacing} m")]
    NonPositiveSpacing {
        /// The offending spacing in meters.
        spacing: f64,
    },

    /// A scalar configuration field has an invalid (non-positive) value.
    #[error("configuration field '{field}' must be positive, got {value}")]
    InvalidConfig {
        /// Name of the configuration field.
        field: &'static str,
        /// The offending value.
        value: f64,
    },

    /// A spatial extent is empty or inverted (max <= min).
    #[error("{axis} extent is degenerate: [{min}, {max}]")]
    DegenerateExtent {
        /// Which axis the extent belongs to ("x" or "y").
        axis: &'static str,
        /// Lower bound of the extent.
        min: f64,
        /// Upper bound of the extent.
        max: f64,
    },

    /// An unrecognized virtual-source type tag was provided.
    #[error("unknown virtual source type: '{tag}'")]
    InvalidSourceType {
        /// The unrecognized tag.
        tag: String,
    },

    /// A virtual point/focused source coincides with a secondary source,
    /// which makes the 1/r amplitude factor undefined.
    #[error("virtual source coincides with secondary source at index {index}")]
    NumericDegeneracy {
        /// Index of the coincident secondary source.
        index: usize,
    },

    /// The requested spectrum axis does not exist in the input array.
    #[error("spectrum axis {axis} out of range for array of {ndim} dimensions")]
    AxisOutOfRange {
        /// The requested axis.
        axis: usize,
        /// Number of dimensions of the input array.
        ndim: usize,
    },

    /// The spectrum input has no samples along the transform axis.
    #[error("spectrum input has zero length along the transform axis")]
    EmptySignal,
}

/// Result type alias for wfsim operations.
pub type Result<T> = std::result::Result<T, WfsError>;
