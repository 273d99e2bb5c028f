//! Integration tests for provider registration and resolution

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bifrost_pipeline::{quantity, Error, GraphError, Pipeline, Provider, ProviderGraph, QuantityId};
use rstest::{fixture, rstest};

quantity! {
    Radius: f64;
    Height: f64;
    Area: f64;
    Volume: f64;
    Label: String;
    Unused: f64;
}

#[derive(Debug, thiserror::Error)]
#[error("negative radius {0}")]
struct NegativeRadius(f64);

fn area(r: &f64) -> Result<f64, NegativeRadius> {
    if *r < 0.0 {
        return Err(NegativeRadius(*r));
    }
    Ok(std::f64::consts::PI * r * r)
}

fn volume(a: &f64, h: &f64) -> Result<f64, Infallible> {
    Ok(a * h)
}

/// Graph of area <- radius, volume <- (area, height)
#[fixture]
fn cylinder() -> ProviderGraph {
    ProviderGraph::from_providers([
        Provider::new::<Area, (Radius,)>(area),
        Provider::new::<Volume, (Area, Height)>(volume),
    ])
    .unwrap()
}

/// Provider that counts how often it runs
fn counted_area(counter: Arc<AtomicUsize>) -> Provider {
    Provider::new::<Area, (Radius,)>(move |r: &f64| -> Result<f64, Infallible> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(r * r)
    })
}

#[rstest]
fn resolves_through_dependencies(cylinder: ProviderGraph) {
    let mut pipeline = Pipeline::new(cylinder);
    pipeline.insert::<Radius>(2.0).insert::<Height>(3.0);

    let v = pipeline.get::<Volume>().unwrap();
    assert!((*v - 12.0 * std::f64::consts::PI).abs() < 1e-12);
    assert_eq!(pipeline.n_computed(), 2);
}

#[test]
fn memoised_values_are_computed_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut pipeline = Pipeline::from_providers([counted_area(counter.clone())]).unwrap();
    pipeline.insert::<Radius>(3.0);

    let first = pipeline.get::<Area>().unwrap();
    let second = pipeline.get::<Area>().unwrap();

    assert_eq!(*first, 9.0);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn instances_do_not_share_memo() {
    let counter = Arc::new(AtomicUsize::new(0));
    let graph = ProviderGraph::from_providers([counted_area(counter.clone())]).unwrap();

    let mut a = Pipeline::new(graph.clone());
    let mut b = Pipeline::new(graph);
    a.insert::<Radius>(1.0);
    b.insert::<Radius>(2.0);

    assert_eq!(*a.get::<Area>().unwrap(), 1.0);
    assert_eq!(*b.get::<Area>().unwrap(), 4.0);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[rstest]
fn duplicate_producer_rejected(mut cylinder: ProviderGraph) {
    let err = cylinder
        .register(Provider::new::<Area, (Height,)>(
            |h: &f64| -> Result<f64, Infallible> { Ok(*h) },
        ))
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Graph(GraphError::DuplicateProducer { quantity: "Area" })
    ));
    assert_eq!(cylinder.len(), 2);
}

#[rstest]
fn cycle_rejected_and_graph_unchanged(mut cylinder: ProviderGraph) {
    let before = cylinder.leaves();

    // radius from volume closes volume <- area <- radius <- volume
    let err = cylinder
        .register(Provider::new::<Radius, (Volume,)>(
            |v: &f64| -> Result<f64, Infallible> { Ok(*v) },
        ))
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Graph(GraphError::Cycle {
            quantity: "Radius",
            ..
        })
    ));
    assert_eq!(cylinder.len(), 2);
    assert_eq!(cylinder.leaves(), before);
}

#[test]
fn self_dependency_is_a_cycle() {
    let mut graph = ProviderGraph::new();
    let err = graph
        .register(Provider::new::<Area, (Area,)>(
            |a: &f64| -> Result<f64, Infallible> { Ok(*a) },
        ))
        .unwrap_err();
    assert!(matches!(err, Error::Graph(GraphError::Cycle { .. })));
    assert!(graph.is_empty());
}

#[rstest]
fn missing_leaf_is_named(cylinder: ProviderGraph) {
    let mut pipeline = Pipeline::new(cylinder);
    pipeline.insert::<Height>(1.0);

    match pipeline.get::<Volume>() {
        Err(Error::UnresolvedDependency { target, missing }) => {
            assert_eq!(target, "Volume");
            assert_eq!(missing, "Radius");
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[rstest]
fn first_missing_leaf_in_argument_order(cylinder: ProviderGraph) {
    let mut pipeline = Pipeline::new(cylinder);

    // both Radius and Height are missing, Area (and so Radius) comes first
    let err = pipeline.get::<Volume>().unwrap_err();
    assert!(matches!(
        err,
        Error::UnresolvedDependency {
            missing: "Radius",
            ..
        }
    ));
}

#[test]
fn only_the_required_subgraph_is_evaluated() {
    let counter = Arc::new(AtomicUsize::new(0));
    let probe = counter.clone();
    let mut pipeline = Pipeline::from_providers([
        Provider::new::<Area, (Radius,)>(area),
        Provider::new::<Label, (Unused,)>(move |_: &f64| -> Result<String, Infallible> {
            probe.fetch_add(1, Ordering::SeqCst);
            Ok("never".into())
        }),
    ])
    .unwrap();
    pipeline.insert::<Radius>(1.0);

    pipeline.get::<Area>().unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 0);
    assert!(!pipeline.is_available::<Label>());
}

#[rstest]
fn plan_lists_evaluation_order(cylinder: ProviderGraph) {
    let mut pipeline = Pipeline::new(cylinder);
    pipeline.insert::<Radius>(1.0).insert::<Height>(1.0);

    let plan: Vec<_> = pipeline
        .plan::<Volume>()
        .unwrap()
        .iter()
        .map(|id| id.name())
        .collect();
    assert_eq!(plan, vec!["Area", "Volume"]);

    pipeline.get::<Area>().unwrap();
    let plan = pipeline.plan::<Volume>().unwrap();
    assert_eq!(plan, vec![QuantityId::of::<Volume>()]);
}

#[rstest]
fn parameter_replaces_provider(cylinder: ProviderGraph) {
    let mut pipeline = Pipeline::new(cylinder);
    // area supplied directly, radius never needed
    pipeline.insert::<Area>(10.0).insert::<Height>(2.0);

    assert_eq!(*pipeline.get::<Volume>().unwrap(), 20.0);
    assert!(!pipeline.graph().produces(&QuantityId::of::<Area>()));
}

#[rstest]
fn new_parameter_invalidates_dependents(cylinder: ProviderGraph) {
    let mut pipeline = Pipeline::new(cylinder);
    pipeline.insert::<Area>(10.0).insert::<Height>(2.0);
    assert_eq!(*pipeline.get::<Volume>().unwrap(), 20.0);

    pipeline.insert::<Height>(3.0);
    assert!(!pipeline.is_available::<Volume>());
    assert_eq!(*pipeline.get::<Volume>().unwrap(), 30.0);
}

#[rstest]
fn type_erased_values_are_checked(cylinder: ProviderGraph) {
    let mut pipeline = Pipeline::new(cylinder);

    let err = pipeline
        .insert_dyn(QuantityId::of::<Radius>(), Arc::new(2.0_f32))
        .unwrap_err();
    assert!(matches!(err, Error::Unit { quantity: "Radius", .. }));

    pipeline
        .insert_dyn(QuantityId::of::<Radius>(), Arc::new(2.0_f64))
        .unwrap();
    assert_eq!(*pipeline.get::<Radius>().unwrap(), 2.0);
}

#[rstest]
fn provider_errors_propagate(cylinder: ProviderGraph) {
    let mut pipeline = Pipeline::new(cylinder);
    pipeline.insert::<Radius>(-1.0).insert::<Height>(1.0);

    let err = pipeline.get::<Volume>().unwrap_err();
    assert!(matches!(err, Error::Provider { quantity: "Area", .. }));
    let source = err.provider_error::<NegativeRadius>().unwrap();
    assert_eq!(source.0, -1.0);
    assert!(!pipeline.is_available::<Area>());
}

#[rstest]
fn introspection(cylinder: ProviderGraph) {
    let leaves: Vec<_> = cylinder.leaves().iter().map(|id| id.name()).collect();
    assert_eq!(leaves, vec!["Height", "Radius"]);

    let dot = cylinder.to_dot();
    assert!(dot.starts_with("digraph"));
    for name in ["Radius", "Height", "Area", "Volume"] {
        assert!(dot.contains(name));
    }
}
