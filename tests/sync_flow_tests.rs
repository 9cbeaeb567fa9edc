use approx::assert_relative_eq;
use geo_measure_surface::engine::{EngineCall, EngineEvent, Projection};
use geo_measure_surface::{
    AppCommand, AppIntent, CameraPose, Cartographic, Diagnostics, HostModel, InMemoryHost,
    MeasurementKind, RecordingEngine, RenderEngine, SessionOptions, VisualizationSurface,
};
use glam::Vec2;
use serde_json::json;

type Surface = VisualizationSurface<RecordingEngine, InMemoryHost>;

fn new_surface() -> Surface {
    let mut surface = VisualizationSurface::new(
        RecordingEngine::new(),
        InMemoryHost::with_defaults(),
        SessionOptions::default(),
        Diagnostics::default(),
    );
    // Startfenster der Debouncer schließen
    surface.tick(1_000);
    surface.engine_mut().clear_calls();
    surface
}

fn send(surface: &mut Surface, name: &str, value: serde_json::Value) {
    surface.host_mut().external_set(name, value);
    surface.pump_host_changes();
}

fn moved_pose(latitude: f64) -> CameraPose {
    CameraPose {
        latitude,
        ..CameraPose::default()
    }
}

#[test]
fn test_set_view_command_runs_once_per_token() {
    let mut surface = new_surface();
    let command = json!({
        "command": "setView",
        "latitude": 47.37,
        "longitude": 8.54,
        "altitude": 1500.0,
        "timestamp": 1
    });

    send(&mut surface, "cameraCommand", command.clone());
    send(&mut surface, "cameraCommand", command);

    let pose = surface.engine().camera_pose();
    assert_relative_eq!(pose.latitude, 47.37);
    assert_relative_eq!(pose.altitude, 1500.0);
    let set_calls = surface
        .engine()
        .calls()
        .iter()
        .filter(|c| matches!(c, EngineCall::SetPose(_)))
        .count();
    assert_eq!(set_calls, 1);
}

#[test]
fn test_invalid_latitude_leaves_camera_unchanged() {
    let mut surface = new_surface();
    let before = surface.engine().camera_pose();

    send(
        &mut surface,
        "cameraCommand",
        json!({"command": "flyTo", "latitude": 123.0, "longitude": 8.0, "altitude": 500.0, "timestamp": 2}),
    );

    assert_eq!(surface.engine().camera_pose(), before);
    assert!(surface.engine().calls().is_empty());
}

#[test]
fn test_look_at_always_restores_free_camera() {
    let mut surface = new_surface();

    send(
        &mut surface,
        "cameraCommand",
        json!({"command": "lookAt", "targetLatitude": 46.0, "targetLongitude": 7.0, "offsetRange": 2500.0, "timestamp": 3}),
    );

    assert!(!surface.engine().look_at_bound());
    assert!(matches!(
        surface.engine().calls(),
        [EngineCall::LookAt { .. }, EngineCall::ResetLookAt]
    ));
}

#[test]
fn test_relative_commands_use_default_magnitudes() {
    let mut surface = new_surface();

    send(&mut surface, "cameraCommand", json!({"command": "rotateRight", "timestamp": 4}));
    send(&mut surface, "cameraCommand", json!({"command": "zoomIn", "timestamp": 5}));

    assert_eq!(
        surface.engine().calls(),
        &[
            EngineCall::Rotate(geo_measure_surface::engine::RotateDirection::Right, 15.0),
            EngineCall::Zoom(geo_measure_surface::engine::ZoomDirection::In, 100.0),
        ]
    );
}

#[test]
fn test_unknown_command_is_ignored() {
    let mut surface = new_surface();

    send(&mut surface, "cameraCommand", json!({"command": "barrelRoll", "timestamp": 6}));

    assert!(surface.engine().calls().is_empty());
    assert!(!surface.is_destroyed());
}

#[test]
fn test_frustum_only_applied_for_perspective() {
    let mut surface = new_surface();
    surface.engine_mut().set_projection(Projection::Orthographic);
    send(
        &mut surface,
        "cameraCommand",
        json!({"command": "moveUp", "distance": 10.0, "fov": 40.0, "timestamp": 7}),
    );
    assert!(surface.engine().frustum().fov.is_none());

    surface.engine_mut().set_projection(Projection::Perspective);
    send(
        &mut surface,
        "cameraCommand",
        json!({"command": "moveUp", "distance": 10.0, "fov": 40.0, "timestamp": 8}),
    );
    assert_eq!(surface.engine().frustum().fov, Some(40.0));
}

#[test]
fn test_camera_moves_are_published_after_trailing_window() {
    let mut surface = new_surface();
    send(&mut surface, "cameraSyncEnabled", json!(true));
    let saves_before = surface.host().save_count();

    for (t, lat) in [(1_000, 10.0), (1_100, 11.0), (1_200, 12.0)] {
        surface.tick(t);
        surface.handle_engine_event(EngineEvent::CameraChanged {
            pose: moved_pose(lat),
        });
    }
    surface.tick(1_600);
    assert_eq!(surface.host().save_count(), saves_before);

    surface.tick(1_700);
    assert_eq!(surface.host().save_count(), saves_before + 1);
    assert_eq!(surface.host().get("latitude"), Some(json!(12.0)));
}

#[test]
fn test_camera_moves_are_not_published_while_sync_disabled() {
    let mut surface = new_surface();
    let saves_before = surface.host().save_count();

    surface.handle_engine_event(EngineEvent::CameraChanged {
        pose: moved_pose(20.0),
    });
    surface.tick(5_000);

    assert_eq!(surface.host().save_count(), saves_before);
    assert_ne!(surface.host().get("latitude"), Some(json!(20.0)));
}

#[test]
fn test_disabling_sync_drops_pending_publish() {
    let mut surface = new_surface();
    send(&mut surface, "cameraSyncEnabled", json!(true));
    surface.handle_engine_event(EngineEvent::CameraChanged {
        pose: moved_pose(30.0),
    });
    send(&mut surface, "cameraSyncEnabled", json!(false));

    surface.tick(5_000);

    assert_ne!(surface.host().get("latitude"), Some(json!(30.0)));
}

#[test]
fn test_host_camera_fields_are_coalesced_into_one_engine_update() {
    let mut surface = new_surface();
    surface.host_mut().external_set("latitude", json!(46.5));
    surface.host_mut().external_set("longitude", json!(7.5));
    surface.host_mut().external_set("altitude", json!(3000.0));
    surface.pump_host_changes();
    surface.tick(1_100);

    let pose = surface.engine().camera_pose();
    assert_relative_eq!(pose.latitude, 46.5);
    assert_relative_eq!(pose.longitude, 7.5);
    assert_relative_eq!(pose.altitude, 3000.0);
    let set_calls = surface
        .engine()
        .calls()
        .iter()
        .filter(|c| matches!(c, EngineCall::SetPose(_)))
        .count();
    assert_eq!(set_calls, 1);
}

#[test]
fn test_separately_pumped_camera_fields_yield_one_complete_pose() {
    let mut surface = new_surface();

    for (name, value) in [("latitude", 46.5), ("longitude", 7.5), ("altitude", 3000.0)] {
        send(&mut surface, name, json!(value));
        surface.tick(1_010);
    }
    assert!(
        surface.engine().calls().is_empty(),
        "Vor Fensterende darf keine Zwischen-Pose ankommen"
    );

    surface.tick(1_100);

    let poses: Vec<CameraPose> = surface
        .engine()
        .calls()
        .iter()
        .filter_map(|c| match c {
            EngineCall::SetPose(pose) => Some(*pose),
            _ => None,
        })
        .collect();
    assert_eq!(poses.len(), 1);
    assert_relative_eq!(poses[0].latitude, 46.5);
    assert_relative_eq!(poses[0].longitude, 7.5);
    assert_relative_eq!(poses[0].altitude, 3000.0);
}

#[test]
fn test_invalid_host_camera_field_is_dropped() {
    let mut surface = new_surface();
    let before = surface.engine().camera_pose();

    send(&mut surface, "latitude", json!(95.0));
    surface.tick(1_100);

    assert_eq!(surface.engine().camera_pose(), before);
}

#[test]
fn test_host_measurement_mode_installs_handler_without_echo() {
    let mut surface = new_surface();
    let saves_before = surface.host().save_count();

    send(&mut surface, "measurementMode", json!("area"));

    assert_eq!(
        surface.state().session.mode.kind(),
        Some(MeasurementKind::Area)
    );
    assert_eq!(surface.engine().installed_handlers().len(), 1);
    assert_eq!(surface.host().save_count(), saves_before);

    send(&mut surface, "measurementMode", json!("spiral"));
    assert_eq!(
        surface.state().session.mode.kind(),
        Some(MeasurementKind::Area)
    );
}

#[test]
fn test_debug_logging_toggle_reaches_diagnostics() {
    let mut surface = new_surface();

    send(&mut surface, "debugLogging", json!(true));
    assert!(surface.state().diagnostics.is_verbose());

    send(&mut surface, "debugLogging", json!(false));
    assert!(!surface.state().diagnostics.is_verbose());
}

#[test]
fn test_teardown_suppresses_late_events_and_terrain_results() {
    let mut surface = new_surface();
    send(&mut surface, "measurementMode", json!("area"));
    for (i, lon) in [0.0, 0.02, 0.0].iter().enumerate() {
        let lat = if i == 2 { 0.02 } else { 0.0 };
        let screen = Vec2::new(i as f32 * 10.0, 0.0);
        surface
            .engine_mut()
            .script_pick(screen, Cartographic::new(*lon, lat, 0.0));
        surface.handle_engine_event(EngineEvent::PrimaryClick { screen });
    }
    let requests = surface.engine_mut().take_terrain_requests();
    let labels_before = surface.engine().label_texts().len();
    let commands_before = surface.state().command_log.len();

    surface.destroy();
    for (request, _) in requests {
        surface.handle_engine_event(EngineEvent::TerrainSampled {
            request,
            result: Ok(5.0),
        });
    }
    surface.tick(10_000);
    send(&mut surface, "cameraCommand", json!({"command": "zoomOut", "timestamp": 9}));

    assert_eq!(surface.engine().label_texts().len(), labels_before);
    assert_eq!(surface.state().command_log.len(), commands_before);
    assert!(surface.engine().installed_handlers().is_empty());
    assert_eq!(surface.host().subscription_count(), 0);
    assert!(!surface
        .state()
        .command_log
        .entries()
        .iter()
        .any(|c| matches!(c, AppCommand::PlaceAreaLabel { .. })));
}

#[test]
fn test_dispatch_after_destroy_is_noop() {
    let mut surface = new_surface();
    surface.destroy();

    surface.dispatch(AppIntent::EditModeToggled { enabled: true });

    assert!(!surface.state().is_editing());
}
