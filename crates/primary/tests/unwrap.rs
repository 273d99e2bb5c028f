//! Integration tests for frame unwrapping through a chopper cascade

use std::f64::consts::TAU;

use bifrost_primary::{
    unwrap_frames, Chopper, Error, InconsistentEventPolicy, PhaseSpace, Source,
};
use bifrost_units::{Energy, Frequency, Length, Slowness, Time, Wavelength};
use rstest::{fixture, rstest};

const SOURCE_HZ: f64 = 14.0;
const L1: f64 = 160.0;

fn source(longest: f64) -> Source {
    Source::from_wavelengths(
        Frequency::new(SOURCE_HZ),
        Time::ZERO,
        Time::from_millis(2.86),
        Wavelength::new(2.0),
        Wavelength::new(longest),
    )
    .unwrap()
}

/// Chopper 1 m from the source, open for 2 ms at phase 0
fn pulse_chopper(frequency: f64) -> Chopper {
    let width = TAU * frequency * 2e-3;
    Chopper::new("pulse", Frequency::new(frequency), 0.0, vec![(0.0, width)], Length::new(1.0)).unwrap()
}

/// 2-5 Å reaches the sample over more than one period, so frames overlap
#[fixture]
fn wide() -> PhaseSpace {
    PhaseSpace::transmitted(&source(5.0), &[pulse_chopper(SOURCE_HZ)], Length::new(L1)).unwrap()
}

/// 2-3.5 Å leaves a gap in every period
#[fixture]
fn narrow() -> PhaseSpace {
    PhaseSpace::transmitted(&source(3.5), &[pulse_chopper(SOURCE_HZ)], Length::new(L1)).unwrap()
}

fn period() -> Time {
    Frequency::new(SOURCE_HZ).period()
}

/// Aliased detection time of a neutron leaving at `t0` with slowness `s`
fn aliased(t0: Time, s: Slowness, secondary: Time) -> Time {
    (t0 + Length::new(L1) * s + secondary).rem_euclid(period())
}

#[rstest]
fn minimal_consistent_offset_is_selected(wide: PhaseSpace) {
    let secondary = Time::from_millis(2.0);
    let s = Slowness::new(8e-4);
    let tau = aliased(Time::from_millis(0.5), s, secondary);

    let event = wide.unwrap_event(tau, secondary).unwrap();
    assert_eq!(event.offset, 1);

    // one more period would also have been consistent
    let later = (event.sample_time + period()).value();
    assert!(wide.regions().iter().any(|r| r.chord_at(later).is_some()));

    // the chord midpoint is close to the true slowness
    let relative = (event.incident_energy - Energy::from_slowness(s)) / Energy::from_slowness(s);
    assert!(relative.abs() < 0.01);
}

#[rstest]
fn derived_times_are_consistent(wide: PhaseSpace) {
    let secondary = Time::from_millis(3.1);
    let tau = aliased(Time::from_millis(1.0), Slowness::new(6e-4), secondary);
    let event = wide.unwrap_event(tau, secondary).unwrap();

    let total = event.departure_time + event.primary_flight_time + secondary;
    assert!((total - event.unwrapped_time).abs() < Time::new(1e-12));
    assert!((event.primary_flight_time - Length::new(L1) * event.slowness).abs() < Time::new(1e-12));

    // the estimate lies inside the pulse
    let tolerance = Time::new(1e-9);
    assert!(event.departure_time >= -tolerance);
    assert!(event.departure_time <= Time::from_millis(2.86) + tolerance);
}

#[rstest]
fn unwrapping_is_idempotent(wide: PhaseSpace) {
    let secondary = Time::from_millis(2.0);
    for ms in 0..71 {
        let tau = Time::from_millis(ms as f64 + 0.5);
        let event = wide.unwrap_event(tau, secondary).unwrap();
        let back = event.unwrapped_time.rem_euclid(period());
        assert!((back - tau).abs() < Time::new(1e-12));
        assert!(event.offset >= 1);
    }
}

#[rstest]
fn events_outside_every_region_are_flagged(narrow: PhaseSpace) {
    assert!(narrow.unwrap_event(Time::from_millis(7.0), Time::from_millis(2.0)).is_none());

    let secondary = Time::from_millis(2.0);
    let good = aliased(Time::from_millis(0.5), Slowness::new(8e-4), secondary);
    let (events, summary) = unwrap_frames(
        &narrow,
        &[good, Time::from_millis(7.0), good],
        &[secondary; 3],
        InconsistentEventPolicy::Exclude,
    )
    .unwrap();

    assert!(events[0].is_some() && events[1].is_none() && events[2].is_some());
    assert_eq!(summary.total, 3);
    assert_eq!(summary.excluded, 1);
    assert_eq!(summary.unwrapped(), 2);
    assert_eq!(summary.offsets.get(&1), Some(&2));
}

#[rstest]
fn fail_policy_reports_the_first_inconsistent_event(narrow: PhaseSpace) {
    let secondary = Time::from_millis(2.0);
    let good = aliased(Time::from_millis(0.5), Slowness::new(8e-4), secondary);
    let result = unwrap_frames(
        &narrow,
        &[good, Time::from_millis(7.0), Time::from_millis(6.0)],
        &[secondary; 3],
        InconsistentEventPolicy::Fail,
    );

    assert_eq!(
        result,
        Err(Error::PhaseSpaceInconsistency {
            event: 1,
            time: Time::from_millis(7.0)
        })
    );
}

/// 1-2.5 Å behind a 2 ms window centred on phase 0
///
/// Frames straddle the source period without overlapping, so fast neutrons
/// arrive in their own period and slow ones one period later.
#[fixture]
fn centred() -> PhaseSpace {
    let source = Source::from_wavelengths(
        Frequency::new(SOURCE_HZ),
        Time::ZERO,
        Time::from_millis(2.86),
        Wavelength::new(1.0),
        Wavelength::new(2.5),
    )
    .unwrap();
    let half = TAU * SOURCE_HZ * 1e-3;
    let chopper = Chopper::new("centred", Frequency::new(SOURCE_HZ), 0.0, vec![(-half, half)], Length::new(1.0)).unwrap();
    PhaseSpace::transmitted(&source, &[chopper], Length::new(L1)).unwrap()
}

#[rstest]
#[case(0.5, 3e-4, 0)]
#[case(0.2, 5.5e-4, 1)]
fn centred_window_selects_the_minimal_offset(
    centred: PhaseSpace,
    #[case] departure_ms: f64,
    #[case] slowness: f64,
    #[case] offset: u32,
) {
    let secondary = Time::from_millis(2.0);
    let s = Slowness::new(slowness);
    let tau = aliased(Time::from_millis(departure_ms), s, secondary);

    let event = centred.unwrap_event(tau, secondary).unwrap();
    assert_eq!(event.offset, offset);
    assert!((event.unwrapped_time.rem_euclid(period()) - tau).abs() < Time::new(1e-12));

    // no smaller offset reaches a transmitted region
    for n in 0..offset {
        let t = (tau + period() * n as f64 - secondary).value();
        assert!(centred.regions().iter().all(|r| r.chord_at(t).is_none()));
    }

    let relative = (event.incident_energy - Energy::from_slowness(s)) / Energy::from_slowness(s);
    assert!(relative.abs() < 0.02);
}

#[rstest]
fn centred_window_passes_the_start_of_the_pulse(centred: PhaseSpace) {
    // only departures inside [0, 1 ms] make it through the window
    let (earliest, latest) = centred.time_range();
    let fastest = Length::new(L1) * Slowness::from_wavelength(Wavelength::new(1.0));
    let slowest = Length::new(L1) * Slowness::from_wavelength(Wavelength::new(2.5));
    assert!(earliest >= fastest - Time::new(1e-9));
    assert!(latest <= slowest + Time::from_millis(1.0) + Time::new(1e-9));
}

#[rstest]
fn time_range_spans_every_region(wide: PhaseSpace) {
    let (earliest, latest) = wide.time_range();
    for region in wide.regions() {
        let (lo, hi) = region.time_range().unwrap();
        assert!(earliest.value() <= lo && hi <= latest.value());
    }
    assert!(wide
        .regions()
        .iter()
        .any(|r| r.vertices().iter().any(|p| p.x == latest.value())));

    // the last useful offset still reaches the latest arrival
    let secondary = Time::from_millis(2.0);
    let tau = Time::from_millis(1.0);
    let n = wide.max_offset(tau, secondary);
    assert!(tau + period() * n as f64 - secondary <= latest);
    assert!(tau + period() * (n + 1) as f64 - secondary > latest);
}

#[rstest]
fn misaligned_inputs_are_rejected(narrow: PhaseSpace) {
    let result = unwrap_frames(
        &narrow,
        &[Time::ZERO; 2],
        &[Time::ZERO; 3],
        InconsistentEventPolicy::Exclude,
    );
    assert!(matches!(result, Err(Error::LengthMismatch { expected: 2, found: 3, .. })));
}

#[rstest]
#[case(14.5)]
#[case(7.0)]
#[case(20.0)]
fn choppers_must_be_phase_locked(#[case] frequency: f64) {
    let result = PhaseSpace::transmitted(&source(5.0), &[pulse_chopper(frequency)], Length::new(L1));
    assert!(matches!(result, Err(Error::InvalidChopper { .. })));
}

#[test]
fn harmonic_choppers_are_accepted() {
    let result = PhaseSpace::transmitted(&source(5.0), &[pulse_chopper(2.0 * SOURCE_HZ)], Length::new(L1));
    assert!(result.is_ok());
}

#[test]
fn choppers_must_be_in_beam_order() {
    let far = Chopper::new("far", Frequency::new(SOURCE_HZ), 0.0, vec![(0.0, 3.0)], Length::new(20.0)).unwrap();
    let result = PhaseSpace::transmitted(&source(5.0), &[far, pulse_chopper(SOURCE_HZ)], Length::new(L1));
    assert!(matches!(result, Err(Error::InvalidChopper { .. })));

    let beyond = Chopper::new("beyond", Frequency::new(SOURCE_HZ), 0.0, vec![(0.0, 3.0)], Length::new(200.0)).unwrap();
    let result = PhaseSpace::transmitted(&source(5.0), &[beyond], Length::new(L1));
    assert!(matches!(result, Err(Error::InvalidChopper { .. })));
}

#[test]
fn closed_cascade_is_an_error() {
    // opens 30 ms into each period, long after the pulse has passed 1 m
    let (open, close) = (TAU * SOURCE_HZ * 30e-3, TAU * SOURCE_HZ * 32e-3);
    let late = Chopper::new("late", Frequency::new(SOURCE_HZ), 0.0, vec![(open, close)], Length::new(1.0)).unwrap();
    let result = PhaseSpace::transmitted(&source(5.0), &[late], Length::new(L1));
    assert_eq!(result, Err(Error::EmptyPhaseSpace));
}
