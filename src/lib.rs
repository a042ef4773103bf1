//! Wave Field Synthesis (WFS) toolbox.
//!
//! This crate computes synthesized acoustic wave fields produced by linear
//! loudspeaker arrays driven to reproduce virtual sound sources. It
//! provides:
//! - 2.5D WFS driving functions (per-loudspeaker delay and weight) for
//!   plane waves, point sources and focused sources
//! - Fractional delay-line synthesis of the per-loudspeaker driving signals
//! - Impulse wave-field simulation over a horizontal spatial grid
//! - Secondary-source geometry, visibility selection and edge tapering
//! - A sqrt(f) pre-equalization FIR kernel
//! - Single-sided amplitude/phase spectra of multichannel signals
//!
//! Everything is pure, synchronous computation over `ndarray` values;
//! independent per-source and per-grid-row work runs under rayon.
//!
//! # Example
//!
//! ```
//! use wfsim::{simulate_wave_field, Point3D, SimulationConfig, VirtualSource};
//!
//! let config = SimulationConfig {
//!     grid_resolution: 64,
//!     ..SimulationConfig::default()
//! };
//! let source = VirtualSource::PointSource(Point3D::new(0.0, -1.0, 0.0));
//! let field = simulate_wave_field(
//!     (-1.5, 1.5),
//!     (0.0, 3.0),
//!     &source,
//!     300.0,
//!     1.5,
//!     &config,
//! )
//! .unwrap();
//! assert_eq!(field.pressure.nrows(), 64);
//! ```

pub mod config;
pub mod delay_line;
pub mod driving;
pub mod error;
pub mod field;
pub mod geometry;
pub mod prefilter;
pub mod spectrum;

pub use config::{InterpolationMethod, SimulationConfig};
pub use delay_line::delay;
pub use driving::{driving_parameters, synthesize, DrivingSignals, VirtualSource};
pub use error::{Result, WfsError};
pub use field::{simulate_wave_field, wave_field_imp, WaveField};
pub use geometry::{
    secondary_source_positions, secondary_source_selection, tapering_window, Point3D,
    SecondarySource,
};
pub use prefilter::wfs_prefilter;
pub use spectrum::{spectrum, Spectrum};
