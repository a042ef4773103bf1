//! End-to-end tests of the WFS synthesis pipeline: geometry generation,
//! driving-function synthesis and wave-field simulation working together.

use wfsim::{
    secondary_source_positions, simulate_wave_field, synthesize, Point3D, SimulationConfig,
    VirtualSource, WfsError,
};

fn test_config() -> SimulationConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    SimulationConfig {
        use_prefilter: false,
        ..SimulationConfig::default()
    }
}

/// Eight-source linear array with a point source behind it: the driving
/// delays must grow with distance from the virtual source's projection onto
/// the array, and the driving matrix must be silent before each column's
/// zero-baseline index.
#[test]
fn test_point_source_eight_source_scenario() {
    let config = test_config();
    // floor(1.05 / 0.15) + 1 = 8 sources.
    let sources = secondary_source_positions(1.05, &config).unwrap();
    assert_eq!(sources.len(), 8);

    let vs = VirtualSource::PointSource(Point3D::new(0.0, -1.0, 0.0));
    let signals = synthesize(&sources, &vs, &config).unwrap();

    // The projection of the virtual source onto the array is x = 0; delays
    // grow monotonically with |x|.
    let mut indexed: Vec<(f64, f64)> = sources
        .iter()
        .zip(signals.delays.iter())
        .map(|(s, &d)| (s.position.x.abs(), d))
        .collect();
    indexed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    for pair in indexed.windows(2) {
        assert!(pair[1].1 >= pair[0].1 - 1e-15);
        if pair[1].0 > pair[0].0 + 1e-12 {
            assert!(pair[1].1 > pair[0].1);
        }
    }

    // No driving-signal sample before the zero-baseline index of its column.
    let d_max = signals
        .delays
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);
    for (i, delay_s) in signals.delays.iter().enumerate() {
        let baseline = ((d_max - delay_s) * config.fs).floor() as usize;
        let column = signals.matrix.column(i);
        for n in 0..baseline {
            assert!(
                column[n].abs() < 1e-12,
                "column {i}: sample {n} before baseline {baseline} is {}",
                column[n]
            );
        }
    }
}

/// An unknown virtual-source tag fails before any per-source computation.
#[test]
fn test_unknown_source_type_tag() {
    let err = VirtualSource::from_parts("xx", Point3D::new(0.0, -1.0, 0.0)).unwrap_err();
    match err {
        WfsError::InvalidSourceType { tag } => assert_eq!(tag, "xx"),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// A plane wave traveling along +y produces a wavefront parallel to the
/// array; at time t the front sits at y = c * t / fs.
#[test]
fn test_plane_wave_wavefront_position() {
    let config = SimulationConfig {
        grid_resolution: 256,
        ..test_config()
    };
    let vs = VirtualSource::PlaneWave(Point3D::new(0.0, 1.0, 0.0));
    let y_target = 1.5;
    let time_sample = y_target / config.c * config.fs;

    let field = simulate_wave_field(
        (-0.8, 0.8),
        (0.5, 2.5),
        &vs,
        time_sample,
        1.05,
        &config,
    )
    .unwrap();

    // Scan the center column for the pressure peak.
    let center = field
        .x_axis
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.abs().partial_cmp(&b.1.abs()).unwrap())
        .map(|(i, _)| i)
        .unwrap();
    let mut best = (0usize, 0.0f64);
    for j in 0..field.y_axis.len() {
        let v = field.pressure[[j, center]].abs();
        if v > best.1 {
            best = (j, v);
        }
    }
    assert!(best.1 > 0.0, "field is silent along the center column");
    let y_peak = field.y_axis[best.0];
    assert!(
        (y_peak - y_target).abs() < 0.12,
        "wavefront at y = {y_peak}, expected near {y_target}"
    );
}

/// Focused sources mirror the point-source delays. After the baseline
/// subtraction the largest-delay source carries zero shift; for a focused
/// source that is the loudspeaker nearest the focus point, so the center of
/// the array activates before the edges.
#[test]
fn test_focused_source_activation_order() {
    let config = test_config();
    let sources = secondary_source_positions(1.05, &config).unwrap();
    let vs = VirtualSource::FocusedSource(Point3D::new(0.0, 0.5, 0.0));
    let signals = synthesize(&sources, &vs, &config).unwrap();
    let d_max = signals
        .delays
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);

    // Shift in samples = activation time of each column.
    let shift = |i: usize| (d_max - signals.delays[i]) * config.fs;
    assert!(shift(3) < shift(0));
    assert!(shift(4) < shift(7));
    // Nearest-to-focus pair carries (numerically) zero shift.
    assert!(shift(3).abs() < 1e-9);
}

/// The simulator rejects invalid geometry before touching the pipeline.
#[test]
fn test_fail_fast_on_bad_inputs() {
    let config = test_config();
    let vs = VirtualSource::PointSource(Point3D::new(0.0, -1.0, 0.0));
    assert!(matches!(
        simulate_wave_field((-1.0, 1.0), (0.0, 2.0), &vs, 100.0, 0.0, &config),
        Err(WfsError::NonPositiveArrayLength { .. })
    ));
    assert!(matches!(
        simulate_wave_field((-1.0, 1.0), (2.0, 2.0), &vs, 100.0, 1.0, &config),
        Err(WfsError::DegenerateExtent { axis: "y", .. })
    ));
}
