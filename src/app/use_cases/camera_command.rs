//! Parsen und Ausführen von `cameraCommand`-Payloads.
//!
//! Jeder Command ist eine einzelne Transition ohne Zustand zwischen den
//! Aufrufen. Unbekannte Tags werden geloggt und ignoriert.

use serde::Deserialize;
use serde_json::Value;

use crate::core::{CameraPose, Cartographic, HeadingPitchRange, ValidationError};
use crate::engine::{Frustum, MoveDirection, Projection, RenderEngine, RotateDirection, ZoomDirection};
use crate::shared::SessionOptions;

/// Defaults für `lookAt` ohne Offset-Angaben.
const LOOK_AT_DEFAULT_PITCH: f64 = -45.0;
const LOOK_AT_DEFAULT_RANGE: f64 = 1000.0;

/// Geschlossene Menge der Kamera-Commands.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraCommand {
    SetView { pose: CameraPose },
    FlyTo { pose: CameraPose, duration_s: f64 },
    LookAt {
        target: Cartographic,
        offset: HeadingPitchRange,
    },
    Move { direction: MoveDirection, distance: f64 },
    Rotate { direction: RotateDirection, angle: f64 },
    Zoom { direction: ZoomDirection, distance: f64 },
    /// Unbekannter Tag; wird nur geloggt
    Unknown(String),
}

/// Geparster Command inklusive sekundärer Parameter und Token.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraDirective {
    pub command: CameraCommand,
    pub frustum: Frustum,
    pub token: Option<Value>,
}

/// Rohform des Host-Payloads.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawCameraCommand {
    command: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    altitude: Option<f64>,
    heading: Option<f64>,
    pitch: Option<f64>,
    roll: Option<f64>,
    duration: Option<f64>,
    target_latitude: Option<f64>,
    target_longitude: Option<f64>,
    target_altitude: Option<f64>,
    offset_heading: Option<f64>,
    offset_pitch: Option<f64>,
    offset_range: Option<f64>,
    distance: Option<f64>,
    angle: Option<f64>,
    fov: Option<f64>,
    near: Option<f64>,
    far: Option<f64>,
    timestamp: Option<Value>,
}

impl RawCameraCommand {
    /// Ziel-Pose; fehlende Orientierung übernimmt die aktuelle Kamera.
    fn pose(&self, current: &CameraPose) -> CameraPose {
        CameraPose {
            latitude: self.latitude.unwrap_or(f64::NAN),
            longitude: self.longitude.unwrap_or(f64::NAN),
            altitude: self.altitude.unwrap_or(f64::NAN),
            heading: self.heading.unwrap_or(current.heading),
            pitch: self.pitch.unwrap_or(current.pitch),
            roll: self.roll.unwrap_or(current.roll),
        }
    }
}

/// Parst einen Payload. Leere Objekte (`{}`) ergeben `None`.
pub fn parse(
    payload: &Value,
    current: &CameraPose,
    options: &SessionOptions,
) -> anyhow::Result<Option<CameraDirective>> {
    let raw: RawCameraCommand = serde_json::from_value(payload.clone())
        .map_err(|e| anyhow::anyhow!("cameraCommand nicht lesbar: {}", e))?;
    let Some(tag) = raw.command.clone() else {
        return Ok(None);
    };

    let move_distance = raw.distance.unwrap_or(options.default_move_distance);
    let rotate_angle = raw.angle.unwrap_or(options.default_rotate_angle);

    let command = match tag.as_str() {
        "setView" => CameraCommand::SetView {
            pose: raw.pose(current),
        },
        "flyTo" => CameraCommand::FlyTo {
            pose: raw.pose(current),
            duration_s: raw.duration.unwrap_or(options.default_fly_duration),
        },
        "lookAt" => CameraCommand::LookAt {
            target: Cartographic::new(
                raw.target_longitude.unwrap_or(f64::NAN),
                raw.target_latitude.unwrap_or(f64::NAN),
                raw.target_altitude.unwrap_or(0.0),
            ),
            offset: HeadingPitchRange::new(
                raw.offset_heading.unwrap_or(0.0),
                raw.offset_pitch.unwrap_or(LOOK_AT_DEFAULT_PITCH),
                raw.offset_range.unwrap_or(LOOK_AT_DEFAULT_RANGE),
            ),
        },
        "moveForward" => move_cmd(MoveDirection::Forward, move_distance),
        "moveBackward" => move_cmd(MoveDirection::Backward, move_distance),
        "moveUp" => move_cmd(MoveDirection::Up, move_distance),
        "moveDown" => move_cmd(MoveDirection::Down, move_distance),
        "moveLeft" => move_cmd(MoveDirection::Left, move_distance),
        "moveRight" => move_cmd(MoveDirection::Right, move_distance),
        "rotateLeft" => rotate_cmd(RotateDirection::Left, rotate_angle),
        "rotateRight" => rotate_cmd(RotateDirection::Right, rotate_angle),
        "rotateUp" => rotate_cmd(RotateDirection::Up, rotate_angle),
        "rotateDown" => rotate_cmd(RotateDirection::Down, rotate_angle),
        "zoomIn" => CameraCommand::Zoom {
            direction: ZoomDirection::In,
            distance: move_distance,
        },
        "zoomOut" => CameraCommand::Zoom {
            direction: ZoomDirection::Out,
            distance: move_distance,
        },
        other => CameraCommand::Unknown(other.to_string()),
    };

    Ok(Some(CameraDirective {
        command,
        frustum: Frustum {
            fov: raw.fov,
            near: raw.near,
            far: raw.far,
        },
        token: raw.timestamp,
    }))
}

fn move_cmd(direction: MoveDirection, distance: f64) -> CameraCommand {
    CameraCommand::Move {
        direction,
        distance,
    }
}

fn rotate_cmd(direction: RotateDirection, angle: f64) -> CameraCommand {
    CameraCommand::Rotate { direction, angle }
}

/// Prüft die Parameter eines Commands vor der Ausführung.
pub fn validate(command: &CameraCommand) -> Result<(), ValidationError> {
    match command {
        CameraCommand::SetView { pose } | CameraCommand::FlyTo { pose, .. } => {
            pose.validate()?;
            crate::core::validate_longitude(pose.longitude)
        }
        CameraCommand::LookAt { target, offset } => {
            target.validate()?;
            crate::core::validate_longitude(target.longitude)?;
            crate::core::validate_finite("offsetHeading", offset.heading)?;
            crate::core::validate_finite("offsetPitch", offset.pitch)?;
            crate::core::validate_finite("offsetRange", offset.range)
        }
        CameraCommand::Move { distance, .. } | CameraCommand::Zoom { distance, .. } => {
            crate::core::validate_finite("distance", *distance)
        }
        CameraCommand::Rotate { angle, .. } => crate::core::validate_finite("angle", *angle),
        CameraCommand::Unknown(_) => Ok(()),
    }
}

/// Führt einen validierten Command gegen die Engine aus.
///
/// Sekundäre Frustum-Parameter werden nach der Pose angewendet und nur bei
/// perspektivischer Projektion.
pub fn execute(engine: &mut dyn RenderEngine, directive: &CameraDirective) -> Result<(), ValidationError> {
    validate(&directive.command)?;

    match &directive.command {
        CameraCommand::SetView { pose } => engine.set_camera_pose(*pose),
        CameraCommand::FlyTo { pose, duration_s } => engine.fly_to(*pose, duration_s.max(0.0)),
        CameraCommand::LookAt { target, offset } => {
            engine.look_at(*target, *offset);
            engine.reset_look_at_transform();
        }
        CameraCommand::Move {
            direction,
            distance,
        } => engine.move_camera(*direction, *distance),
        CameraCommand::Rotate { direction, angle } => engine.rotate_camera(*direction, *angle),
        CameraCommand::Zoom {
            direction,
            distance,
        } => engine.zoom_camera(*direction, *distance),
        CameraCommand::Unknown(tag) => {
            log::warn!("Unbekannter Kamera-Command ignoriert: '{}'", tag);
            return Ok(());
        }
    }

    apply_frustum(engine, directive.frustum);
    Ok(())
}

fn apply_frustum(engine: &mut dyn RenderEngine, frustum: Frustum) {
    if frustum.is_empty() {
        return;
    }
    let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
    let frustum = Frustum {
        fov: finite(frustum.fov),
        near: finite(frustum.near),
        far: finite(frustum.far),
    };
    if frustum.is_empty() {
        log::warn!("Frustum-Parameter nicht endlich, ignoriert");
        return;
    }
    match engine.projection() {
        Projection::Perspective => engine.set_frustum(frustum),
        Projection::Orthographic => {
            log::debug!("Frustum-Parameter bei orthographischer Projektion übersprungen")
        }
    }
}
