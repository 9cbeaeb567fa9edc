//! Vertrag zur Render-Engine: Picking, Entities, Kamera, Eingabe, Terrain.
//!
//! Die Engine ist ein externer Kollaborateur. Der Core ruft nur diese schmale
//! Schnittstelle auf und erhält Ereignisse als [`EngineEvent`] zurück.

mod recording;

pub use recording::{EngineCall, Entity, RecordingEngine};

use glam::Vec2;

use crate::core::{BoundingSphere, CameraPose, Cartographic, HeadingPitchRange};

/// Handle auf eine Scene-Entity (Marker, Label, Linie, Polygon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(pub u64);

/// Handle auf einen installierten Picking-Handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerHandle(pub u64);

/// ID einer laufenden Terrain-Höhenabfrage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerrainRequestId(pub u64);

/// Welcher Eingabe-Handler den Picking-Slot belegt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickingHandlerKind {
    /// Punkte für Messungen sammeln
    Measurement,
    /// Messpunkte selektieren, ziehen, einfügen
    Edit,
    /// Kalibrierpunkte picken
    PointPicking,
}

/// Projektionsart der Engine-Kamera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Sekundäre Frustum-Parameter (nur bei Perspektive anwendbar).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frustum {
    /// Sichtfeld in Grad
    pub fov: Option<f64>,
    pub near: Option<f64>,
    pub far: Option<f64>,
}

impl Frustum {
    pub fn is_empty(&self) -> bool {
        self.fov.is_none() && self.near.is_none() && self.far.is_none()
    }
}

/// Richtung einer relativen Kamerabewegung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Up,
    Down,
    Left,
    Right,
}

/// Richtung einer relativen Kamerarotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Zoom-Richtung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Ereignisse, die die Engine an die Oberfläche zurückliefert.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Kamera hat sich bewegt (feuert während eines Drags fortlaufend)
    CameraChanged { pose: CameraPose },
    /// Primärklick (links)
    PrimaryClick { screen: Vec2 },
    /// Sekundärklick (rechts), beendet offene Messungen
    SecondaryClick { screen: Vec2 },
    PointerDown { screen: Vec2 },
    PointerMove { screen: Vec2 },
    PointerUp { screen: Vec2 },
    /// Ergebnis einer asynchronen Terrain-Abfrage
    TerrainSampled {
        request: TerrainRequestId,
        result: Result<f64, String>,
    },
}

/// Schmale Schnittstelle der Render-Engine.
pub trait RenderEngine {
    // ── Picking ─────────────────────────────────────────────────
    /// Bildschirmpunkt → Weltposition; `None` bei Fehlpick.
    fn pick_world_position(&mut self, screen: Vec2) -> Option<Cartographic>;
    /// Bildschirmpunkt → Entity unter dem Cursor.
    fn pick_entity(&mut self, screen: Vec2) -> Option<EntityHandle>;

    // ── Entities ────────────────────────────────────────────────
    fn add_point_marker(&mut self, position: Cartographic, color: [f32; 4], pixel_size: f32)
        -> EntityHandle;
    fn add_label(&mut self, position: Cartographic, text: &str) -> EntityHandle;
    fn add_polyline(&mut self, points: &[Cartographic], color: [f32; 4]) -> EntityHandle;
    fn add_polygon(&mut self, points: &[Cartographic], fill: [f32; 4], outline: [f32; 4])
        -> EntityHandle;
    fn remove_entity(&mut self, handle: EntityHandle);
    fn set_entity_position(&mut self, handle: EntityHandle, position: Cartographic);
    fn set_marker_style(&mut self, handle: EntityHandle, color: [f32; 4], pixel_size: f32);

    // ── Kamera ──────────────────────────────────────────────────
    fn camera_pose(&self) -> CameraPose;
    fn set_camera_pose(&mut self, pose: CameraPose);
    fn fly_to(&mut self, pose: CameraPose, duration_s: f64);
    fn fly_to_bounding_sphere(&mut self, sphere: BoundingSphere, offset: HeadingPitchRange, duration_s: f64);
    /// Orbit um einen Zielpunkt; bindet das Kamera-Referenzsystem an das Ziel.
    fn look_at(&mut self, target: Cartographic, offset: HeadingPitchRange);
    /// Löst die Bindung aus `look_at` (freie Navigation).
    fn reset_look_at_transform(&mut self);
    fn move_camera(&mut self, direction: MoveDirection, amount: f64);
    fn rotate_camera(&mut self, direction: RotateDirection, angle_deg: f64);
    fn zoom_camera(&mut self, direction: ZoomDirection, amount: f64);
    fn projection(&self) -> Projection;
    fn set_frustum(&mut self, frustum: Frustum);

    // ── Eingabe ─────────────────────────────────────────────────
    fn install_picking_handler(&mut self, kind: PickingHandlerKind) -> HandlerHandle;
    fn remove_picking_handler(&mut self, handle: HandlerHandle);
    fn set_camera_rotate_enabled(&mut self, enabled: bool);

    // ── Terrain ─────────────────────────────────────────────────
    /// Bereits geladene Geländehöhe (synchron, kann fehlen).
    fn globe_height(&self, position: Cartographic) -> Option<f64>;
    /// Startet eine asynchrone Abfrage; Ergebnis kommt als `TerrainSampled`.
    fn request_terrain_height(&mut self, position: Cartographic) -> TerrainRequestId;
}
