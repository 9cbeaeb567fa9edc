use approx::assert_relative_eq;
use geo_measure_surface::core::registry::MeasurementSnapshot;
use geo_measure_surface::engine::{EngineCall, EngineEvent};
use geo_measure_surface::{
    AppIntent, Cartographic, Diagnostics, HostModel, InMemoryHost, Measurement, MeasurementKind,
    RecordingEngine, SessionOptions, VisualizationSurface,
};
use glam::Vec2;
use serde_json::{json, Value};

type Surface = VisualizationSurface<RecordingEngine, InMemoryHost>;

fn new_surface() -> Surface {
    VisualizationSurface::new(
        RecordingEngine::new(),
        InMemoryHost::with_defaults(),
        SessionOptions::default(),
        Diagnostics::default(),
    )
}

fn send(surface: &mut Surface, name: &str, value: Value) {
    surface.host_mut().external_set(name, value);
    surface.pump_host_changes();
}

fn saved_snapshot() -> Value {
    json!({
        "measurements": [
            {"type": "distance", "points": [[8.0, 47.0, 400.0], [8.02, 47.0, 420.0]]},
            {"type": "multi-distance", "points": [[8.0, 47.0, 0.0], [8.003, 47.0, 0.0], [8.003, 47.004, 0.0]]},
            {"type": "height", "points": [[8.0, 47.0, 400.0], [8.0, 47.0, 480.0]]},
            {"type": "area", "points": [[8.0, 47.0, 0.0], [8.01, 47.0, 0.0], [8.01, 47.01, 0.0], [8.0, 47.01, 0.0]]}
        ],
        "timestamp": 1700000000
    })
}

fn published(surface: &Surface) -> Vec<Measurement> {
    serde_json::from_value(surface.host().get("measurementResults").unwrap()).unwrap()
}

#[test]
fn test_snapshot_reload_reconstructs_all_kinds() {
    let mut surface = new_surface();

    send(&mut surface, "loadMeasurementsTrigger", saved_snapshot());

    let state = surface.state();
    assert_eq!(state.registry.len(), 4);
    assert_eq!(state.scene.visuals.len(), 4);
    assert_eq!(state.presentation.rows.len(), 4);
    for (visuals, m) in state.scene.visuals.iter().zip(state.registry.iter()) {
        assert_eq!(visuals.markers.len(), m.points.len());
        assert!(!visuals.lines.is_empty());
    }
    // Multi-Distanz: zwei Segment-Labels und die Gesamtsumme
    assert_eq!(state.scene.visuals[1].labels.len(), 3);
    assert_eq!(published(&surface).len(), 4);
}

#[test]
fn test_reloading_saved_registry_reproduces_values() {
    let mut first = new_surface();
    send(&mut first, "loadMeasurementsTrigger", saved_snapshot());
    let saved = published(&first);

    let entries: Vec<Value> = saved
        .iter()
        .map(|m| {
            json!({
                "type": m.kind,
                "points": m.points.iter().map(|p| p.to_triple()).collect::<Vec<_>>(),
                "name": m.name,
            })
        })
        .collect();
    let mut second = new_surface();
    send(
        &mut second,
        "loadMeasurementsTrigger",
        json!({"measurements": entries, "timestamp": 2}),
    );

    let reloaded = published(&second);
    assert_eq!(reloaded.len(), saved.len());
    for (a, b) in saved.iter().zip(reloaded.iter()) {
        assert_eq!(a.name, b.name);
        assert_relative_eq!(a.value, b.value, max_relative = 1e-9);
    }
}

#[test]
fn test_snapshot_with_string_token_and_bad_entry() {
    let mut surface = new_surface();

    send(
        &mut surface,
        "loadMeasurementsTrigger",
        json!({
            "measurements": [
                {"type": "distance", "points": [[0.0, 95.0, 0.0], [0.0, 0.0, 0.0]]},
                {"type": "height", "points": [[1.0, 1.0, 10.0], [1.0, 1.0, 60.0]]}
            ],
            "timestamp": "abc"
        }),
    );

    assert_eq!(surface.state().registry.len(), 1);
    assert_eq!(
        surface.state().registry.get(0).unwrap().kind,
        MeasurementKind::Height
    );
}

#[test]
fn test_empty_registry_from_host_clears_all_entities() {
    let mut surface = new_surface();
    send(&mut surface, "loadMeasurementsTrigger", saved_snapshot());
    assert!(surface.engine().entity_count() > 0);

    send(&mut surface, "measurementResults", json!([]));

    assert!(surface.state().registry.is_empty());
    assert!(surface.state().presentation.rows.is_empty());
    assert_eq!(surface.engine().entity_count(), 0);
}

#[test]
fn test_external_registry_replace_rederives_visuals() {
    let mut surface = new_surface();
    send(&mut surface, "loadMeasurementsTrigger", saved_snapshot());
    let mut list = published(&surface);
    list.truncate(1);
    list[0].name = "Brücke".into();

    send(
        &mut surface,
        "measurementResults",
        serde_json::to_value(&list).unwrap(),
    );

    let state = surface.state();
    assert_eq!(state.registry.len(), 1);
    assert_eq!(state.scene.visuals.len(), 1);
    assert_eq!(state.presentation.rows[0].name, "Brücke");
    assert_eq!(
        surface.engine().markers().len(),
        state.registry.get(0).unwrap().points.len()
    );
}

#[test]
fn test_focus_trigger_flies_to_measurement_once() {
    let mut surface = new_surface();
    send(&mut surface, "loadMeasurementsTrigger", saved_snapshot());
    surface.engine_mut().clear_calls();

    send(
        &mut surface,
        "focusMeasurementTrigger",
        json!({"index": 3, "timestamp": 10}),
    );
    send(
        &mut surface,
        "focusMeasurementTrigger",
        json!({"index": 3, "timestamp": 10}),
    );

    let calls = surface.engine().calls();
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        EngineCall::FlyToSphere { sphere, offset, .. } => {
            let center = sphere.center_cartographic();
            assert_relative_eq!(center.longitude, 8.005, epsilon = 1e-3);
            assert_relative_eq!(center.latitude, 47.005, epsilon = 1e-3);
            let options = &surface.state().options;
            assert_eq!(offset.pitch, options.focus_pitch_deg);
            assert!(offset.range >= options.focus_min_range_m);
        }
        other => panic!("Unerwarteter Engine-Aufruf: {other:?}"),
    }
}

#[test]
fn test_focus_from_panel_list() {
    let mut surface = new_surface();
    send(&mut surface, "loadMeasurementsTrigger", saved_snapshot());
    surface.engine_mut().clear_calls();

    surface.dispatch(AppIntent::FocusRequested { index: 0 });
    surface.dispatch(AppIntent::FocusRequested { index: 0 });

    // Panel-Klicks haben kein Token und werden jedes Mal ausgeführt
    assert_eq!(surface.engine().calls().len(), 2);
}

#[test]
fn test_rename_publishes_and_rejects_blank_names() {
    let mut surface = new_surface();
    send(&mut surface, "loadMeasurementsTrigger", saved_snapshot());

    surface.dispatch(AppIntent::RenameRequested {
        index: 2,
        name: "  Kirchturm ".into(),
    });
    surface.dispatch(AppIntent::RenameRequested {
        index: 2,
        name: "   ".into(),
    });

    assert_eq!(surface.state().presentation.rows[2].name, "Kirchturm");
    assert_eq!(published(&surface)[2].name, "Kirchturm");
}

#[test]
fn test_tool_visibility_follows_host() {
    let mut surface = new_surface();

    send(&mut surface, "showMeasurementTools", json!(false));
    send(&mut surface, "showMeasurementsList", json!(false));

    assert!(!surface.state().presentation.show_tools);
    assert!(!surface.state().presentation.show_list);
}

#[test]
fn test_point_picking_is_exclusive_and_continuous() {
    let mut surface = new_surface();
    send(&mut surface, "measurementMode", json!("distance"));
    send(
        &mut surface,
        "pointPickingConfig",
        json!({"color": "#00ff00", "labelPrefix": "GCP", "continuous": true}),
    );

    send(&mut surface, "pointPickingMode", json!(true));
    assert!(surface.state().session.mode.is_off());
    assert_eq!(surface.host().get("measurementMode"), Some(json!("")));

    for (i, lon) in [7.0, 7.1].iter().enumerate() {
        let screen = Vec2::new(i as f32 * 10.0, 3.0);
        surface
            .engine_mut()
            .script_pick(screen, Cartographic::new(*lon, 46.0, 500.0));
        surface.handle_engine_event(EngineEvent::PrimaryClick { screen });
    }

    let points = surface.host().get("pickedPoints").unwrap();
    assert_eq!(points.as_array().unwrap().len(), 2);
    assert_eq!(points[1]["id"], "pt-2");
    assert_eq!(points[1]["label"], "GCP 2");
    assert_eq!(points[0]["altitudeApprox"], 500.0);
    assert!(surface.state().picking.enabled);
    assert!(surface.state().registry.is_empty());
}

#[test]
fn test_host_removing_picked_point_removes_its_entities() {
    let mut surface = new_surface();
    send(&mut surface, "pointPickingConfig", json!({"continuous": true}));
    send(&mut surface, "pointPickingMode", json!(true));
    for (i, lon) in [7.0, 7.1].iter().enumerate() {
        let screen = Vec2::new(i as f32 * 10.0, 3.0);
        surface
            .engine_mut()
            .script_pick(screen, Cartographic::new(*lon, 46.0, 500.0));
        surface.handle_engine_event(EngineEvent::PrimaryClick { screen });
    }
    let entities_before = surface.engine().entity_count();
    let mut list = surface.host().get("pickedPoints").unwrap();
    list.as_array_mut().unwrap().remove(0);

    send(&mut surface, "pickedPoints", list);

    assert_eq!(surface.state().picking.points.len(), 1);
    assert_eq!(surface.engine().entity_count(), entities_before - 2);

    // Neue IDs bauen auf der höchsten bekannten auf
    let screen = Vec2::new(50.0, 3.0);
    surface
        .engine_mut()
        .script_pick(screen, Cartographic::new(7.2, 46.0, 500.0));
    surface.handle_engine_event(EngineEvent::PrimaryClick { screen });
    let points = surface.host().get("pickedPoints").unwrap();
    assert_eq!(points[1]["id"], "pt-3");
}

#[test]
fn test_snapshot_type_parses_host_payload() {
    let snapshot: MeasurementSnapshot = serde_json::from_value(saved_snapshot()).unwrap();
    assert_eq!(snapshot.measurements.len(), 4);
    assert_eq!(snapshot.measurements[3].kind, MeasurementKind::Area);
}
