//! Integration tests for pixel flight paths

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use bifrost_secondary::{
    bragg, Analyzer, AnalyzerId, DetectorPixel, Error, PixelId, PixelMap, SecondaryGeometry,
};
use bifrost_units::{Length, Velocity};
use nalgebra::{Rotation3, Unit, Vector3};
use rstest::{fixture, rstest};

const PG002: f64 = 3.355;

fn sample() -> Vector3<f64> {
    Vector3::zeros()
}

/// One analyzer straight above the sample, one at 45° to the planes
#[fixture]
fn analyzers() -> Vec<Analyzer> {
    vec![
        Analyzer::new(
            AnalyzerId(0),
            Vector3::new(0.0, 0.0, 1.0),
            Rotation3::identity(),
            PG002,
        )
        .unwrap(),
        Analyzer::new(
            AnalyzerId(1),
            Vector3::new(1.0, 0.0, 1.0),
            Rotation3::identity(),
            PG002,
        )
        .unwrap(),
    ]
}

#[fixture]
fn pixels() -> Vec<DetectorPixel> {
    vec![
        DetectorPixel::new(PixelId(10), Vector3::new(0.1, 0.0, 0.5)),
        DetectorPixel::new(PixelId(11), Vector3::new(-0.2, 0.0, 0.4)),
        DetectorPixel::new(PixelId(20), Vector3::new(1.3, 0.0, 0.6)),
    ]
}

#[fixture]
fn map() -> PixelMap {
    [
        (PixelId(10), AnalyzerId(0)),
        (PixelId(11), AnalyzerId(0)),
        (PixelId(20), AnalyzerId(1)),
    ]
    .into_iter()
    .collect()
}

#[fixture]
fn geometry(analyzers: Vec<Analyzer>, pixels: Vec<DetectorPixel>, map: PixelMap) -> SecondaryGeometry {
    SecondaryGeometry::compute(&sample(), &analyzers, &pixels, &map).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-12 * a.abs().max(b.abs()).max(1.0)
}

#[rstest]
fn pixels_sharing_an_analyzer(geometry: SecondaryGeometry) {
    let a = geometry.path(PixelId(10)).unwrap();
    let b = geometry.path(PixelId(11)).unwrap();

    // identical final energy and sample→analyzer leg
    assert_eq!(a.final_energy, b.final_energy);
    assert_eq!(a.sample_analyzer_length(), b.sample_analyzer_length());

    // the flight time differs only through the analyzer→detector leg
    let v = Velocity::from_wavenumber(a.final_wavenumber);
    let dl = b.analyzer_detector_length() - a.analyzer_detector_length();
    let dt = b.flight_time - a.flight_time;
    assert!(close(dt.value(), (dl / v).value()));
}

#[rstest]
fn normal_incidence_reflects_pi_over_d(geometry: SecondaryGeometry) {
    let path = geometry.path(PixelId(10)).unwrap();
    assert!(close(path.glancing_angle, FRAC_PI_2));
    assert!(close(path.final_wavenumber.value(), PI / PG002));
}

#[rstest]
fn final_energy_ignores_incidence_angle(geometry: SecondaryGeometry) {
    let straight = geometry.path(PixelId(10)).unwrap();
    let oblique = geometry.path(PixelId(20)).unwrap();

    assert!((oblique.glancing_angle - FRAC_PI_4).abs() < 1e-12);
    assert!(close(oblique.final_wavenumber.value(), PI / PG002));
    assert!(close(oblique.final_energy.value(), bragg::final_energy(PG002).value()));
    assert_eq!(oblique.final_energy, straight.final_energy);
}

#[rstest]
fn flight_path_is_both_legs(geometry: SecondaryGeometry) {
    let path = geometry.path(PixelId(20)).unwrap();
    let expected = Length::new(2.0_f64.sqrt() + (0.3_f64 * 0.3 + 0.4 * 0.4).sqrt());
    assert!(close(path.path_length().value(), expected.value()));

    let v = Velocity::from_wavenumber(path.final_wavenumber);
    assert!(close(path.flight_time.value(), (expected / v).value()));
}

#[rstest]
fn columns_follow_pixel_order(geometry: SecondaryGeometry) {
    assert_eq!(geometry.len(), 3);
    assert_eq!(geometry.index_of(PixelId(20)), Ok(2));
    assert_eq!(geometry.final_energies().len(), 3);
    assert_eq!(geometry.flight_times()[1], geometry.paths()[1].flight_time);

    let indices = geometry
        .indices_of(&[PixelId(20), PixelId(10), PixelId(20)])
        .unwrap();
    assert_eq!(indices, vec![2, 0, 2]);
}

#[rstest]
fn scattering_angles_relative_to_beam(geometry: SecondaryGeometry) {
    let beam = Unit::new_normalize(Vector3::x());
    let angles = geometry.scattering_angles(&beam);
    assert!(close(angles[0], FRAC_PI_2));
    assert!(close(angles[2], FRAC_PI_4));

    let direction = geometry.final_directions()[2];
    assert!(close(direction.norm(), 1.0));
}

#[rstest]
fn unknown_event_pixel_is_an_error(geometry: SecondaryGeometry) {
    assert_eq!(
        geometry.indices_of(&[PixelId(10), PixelId(99)]),
        Err(Error::UnknownPixel(PixelId(99)))
    );
}

#[rstest]
fn unmapped_pixel_fails(analyzers: Vec<Analyzer>, pixels: Vec<DetectorPixel>) {
    let map: PixelMap = [(PixelId(10), AnalyzerId(0)), (PixelId(11), AnalyzerId(0))]
        .into_iter()
        .collect();
    let result = SecondaryGeometry::compute(&sample(), &analyzers, &pixels, &map);
    assert_eq!(result, Err(Error::UnmappedPixel(PixelId(20))));
}

#[rstest]
fn pixel_mapped_to_missing_analyzer_fails(analyzers: Vec<Analyzer>, pixels: Vec<DetectorPixel>, mut map: PixelMap) {
    map.insert(PixelId(20), AnalyzerId(7));
    let result = SecondaryGeometry::compute(&sample(), &analyzers, &pixels, &map);
    assert_eq!(
        result,
        Err(Error::UnknownAnalyzer {
            pixel: PixelId(20),
            analyzer: AnalyzerId(7)
        })
    );
}

#[rstest]
fn duplicate_ids_are_rejected(analyzers: Vec<Analyzer>, mut pixels: Vec<DetectorPixel>, map: PixelMap) {
    pixels.push(DetectorPixel::new(PixelId(11), Vector3::new(0.0, 0.1, 0.5)));
    let result = SecondaryGeometry::compute(&sample(), &analyzers, &pixels, &map);
    assert_eq!(result, Err(Error::DuplicatePixel(PixelId(11))));

    let mut doubled = analyzers.clone();
    doubled.push(analyzers[0].clone());
    let result = SecondaryGeometry::compute(&sample(), &doubled, &pixels[..3], &map);
    assert_eq!(result, Err(Error::DuplicateAnalyzer(AnalyzerId(0))));
}

/// Pixel on top of its analyzer, then an analyzer on top of the sample
#[rstest]
#[case(Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 1.0))]
#[case(Vector3::zeros(), Vector3::new(0.0, 0.0, 0.5))]
fn degenerate_paths(#[case] analyzer_position: Vector3<f64>, #[case] pixel_position: Vector3<f64>) {
    let analyzer = Analyzer::new(AnalyzerId(0), analyzer_position, Rotation3::identity(), PG002).unwrap();
    let pixel = DetectorPixel::new(PixelId(0), pixel_position);
    let map: PixelMap = [(PixelId(0), AnalyzerId(0))].into_iter().collect();

    let result = SecondaryGeometry::compute(&sample(), &[analyzer], &[pixel], &map);
    assert!(matches!(result, Err(Error::DegenerateGeometry { pixel: PixelId(0), .. })));
}
