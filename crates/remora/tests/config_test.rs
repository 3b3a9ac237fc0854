use remora::config::{IsolationCategory, IsolationConfig, LabelPlacementConfig};
use remora::{
    AlongEdgePlacement, AngleReference, BusDetectionOptions, EdgeCategory, EdgeSides, Error,
    LayoutConfig,
};
use std::time::Duration;

#[test]
fn empty_object_is_the_default_configuration() {
    let config = LayoutConfig::from_json("{}").unwrap();
    assert_eq!(config, LayoutConfig::default());
    assert!(config.isolation.is_none());
    assert!(config.timeout().is_none());
}

#[test]
fn full_configuration_round_trips_through_json() {
    let text = r#"{
        "isolation": {
            "category": "non-orthogonal",
            "epsilon": 0.5,
            "route-restored-edges": false,
            "place-restored-labels": true
        },
        "bus-detection": { "min-bus-size": 6 },
        "edge-label-placement": {
            "along-edge": "at-source",
            "side-of-edge": "right",
            "orientation": "horizontal",
            "distance": 3.0
        },
        "timeout-ms": 250
    }"#;
    let config = LayoutConfig::from_json(text).unwrap();

    let iso = config.isolation.as_ref().unwrap();
    assert_eq!(iso.category, IsolationCategory::NonOrthogonal);
    assert!(!iso.route_restored_edges);
    assert!(iso.place_restored_labels);
    assert!(matches!(
        iso.edge_category(),
        EdgeCategory::NonOrthogonal { epsilon } if epsilon == 0.5
    ));

    let bus = config.bus_detection.unwrap();
    assert_eq!(bus.min_bus_size, 6);
    assert_eq!(
        bus.max_interference_ratio,
        BusDetectionOptions::default().max_interference_ratio
    );

    let descriptor = config.edge_label_placement.unwrap().descriptor();
    assert_eq!(descriptor.along(), AlongEdgePlacement::AtSource);
    assert_eq!(descriptor.sides(), EdgeSides::RIGHT);
    assert_eq!(descriptor.angle_reference(), AngleReference::Absolute);
    assert_eq!(descriptor.distance(), 3.0);

    assert_eq!(config.timeout(), Some(Duration::from_millis(250)));

    let again = LayoutConfig::from_json(&serde_json::to_string(&config).unwrap()).unwrap();
    assert_eq!(again, config);
}

#[test]
fn isolation_defaults_route_but_do_not_relabel() {
    let iso = IsolationConfig::default();
    assert_eq!(iso.category, IsolationCategory::GroupIncident);
    assert_eq!(iso.epsilon, 1e-4);
    assert!(iso.route_restored_edges);
    assert!(!iso.place_restored_labels);
    assert!(matches!(iso.edge_category(), EdgeCategory::GroupIncident));
}

#[test]
fn default_label_placement_is_centered_on_anywhere() {
    let descriptor = LabelPlacementConfig::default().descriptor();
    assert_eq!(descriptor.along(), AlongEdgePlacement::Anywhere);
    assert_eq!(descriptor.sides(), EdgeSides::ANYWHERE);
}

#[test]
fn unknown_category_is_a_config_error() {
    let err = LayoutConfig::from_json(r#"{"isolation": {"category": "diagonal"}}"#).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().starts_with("invalid layout configuration"));
}
