//! Headless Engine für Tests und das Replay-Binary.
//!
//! Picks werden pro Bildschirmpunkt vorab geskriptet, Entities und
//! Kamera-Aufrufe werden mitprotokolliert.

use glam::Vec2;
use indexmap::IndexMap;

use super::{
    EntityHandle, Frustum, HandlerHandle, MoveDirection, PickingHandlerKind, Projection,
    RenderEngine, RotateDirection, TerrainRequestId, ZoomDirection,
};
use crate::core::{BoundingSphere, CameraPose, Cartographic, HeadingPitchRange};

/// Meter pro Breitengrad (Näherung für relative Bewegungen).
const METERS_PER_DEGREE: f64 = 111_320.0;
/// Toleranz beim Zuordnen geskripteter Bildschirmpunkte (px).
const SCREEN_TOLERANCE: f32 = 0.5;
/// Toleranz beim Zuordnen einer Weltposition zu einem Marker (Grad/Meter).
const MARKER_TOLERANCE: f64 = 1e-9;

/// Eine aufgezeichnete Scene-Entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Marker {
        position: Cartographic,
        color: [f32; 4],
        pixel_size: f32,
    },
    Label {
        position: Cartographic,
        text: String,
    },
    Polyline {
        points: Vec<Cartographic>,
        color: [f32; 4],
    },
    Polygon {
        points: Vec<Cartographic>,
        fill: [f32; 4],
    },
}

/// Protokollierter Kamera-/Eingabe-Aufruf.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    SetPose(CameraPose),
    FlyTo { pose: CameraPose, duration_s: f64 },
    FlyToSphere {
        sphere: BoundingSphere,
        offset: HeadingPitchRange,
        duration_s: f64,
    },
    LookAt {
        target: Cartographic,
        offset: HeadingPitchRange,
    },
    ResetLookAt,
    Move(MoveDirection, f64),
    Rotate(RotateDirection, f64),
    Zoom(ZoomDirection, f64),
    SetFrustum(Frustum),
    InstallHandler(PickingHandlerKind),
    RemoveHandler(PickingHandlerKind),
    SetRotateEnabled(bool),
}

/// Aufzeichnende Engine ohne Rendering.
#[derive(Debug)]
pub struct RecordingEngine {
    pose: CameraPose,
    projection: Projection,
    frustum: Frustum,
    entities: IndexMap<EntityHandle, Entity>,
    picks: Vec<(Vec2, Cartographic)>,
    handlers: IndexMap<HandlerHandle, PickingHandlerKind>,
    rotate_enabled: bool,
    look_at_bound: bool,
    globe_height: Option<f64>,
    terrain_requests: Vec<(TerrainRequestId, Cartographic)>,
    calls: Vec<EngineCall>,
    next_id: u64,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingEngine {
    /// Erstellt eine Engine mit Default-Kamera und ohne geladenes Terrain.
    pub fn new() -> Self {
        Self {
            pose: CameraPose::default(),
            projection: Projection::Perspective,
            frustum: Frustum::default(),
            entities: IndexMap::new(),
            picks: Vec::new(),
            handlers: IndexMap::new(),
            rotate_enabled: true,
            look_at_bound: false,
            globe_height: None,
            terrain_requests: Vec::new(),
            calls: Vec::new(),
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Skriptet das Pick-Ergebnis für einen Bildschirmpunkt.
    pub fn script_pick(&mut self, screen: Vec2, world: Cartographic) {
        self.picks.retain(|(s, _)| s.distance(screen) > SCREEN_TOLERANCE);
        self.picks.push((screen, world));
    }

    /// Setzt die synchrone Geländehöhe für alle Positionen.
    pub fn set_globe_height(&mut self, height: Option<f64>) {
        self.globe_height = height;
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    pub fn entities(&self) -> &IndexMap<EntityHandle, Entity> {
        &self.entities
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.entities.get(&handle)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Alle Marker in Erzeugungsreihenfolge.
    pub fn markers(&self) -> Vec<(EntityHandle, Cartographic, f32)> {
        self.entities
            .iter()
            .filter_map(|(h, e)| match e {
                Entity::Marker {
                    position,
                    pixel_size,
                    ..
                } => Some((*h, *position, *pixel_size)),
                _ => None,
            })
            .collect()
    }

    /// Alle Label-Texte in Erzeugungsreihenfolge.
    pub fn label_texts(&self) -> Vec<String> {
        self.entities
            .values()
            .filter_map(|e| match e {
                Entity::Label { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn calls(&self) -> &[EngineCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn installed_handlers(&self) -> Vec<PickingHandlerKind> {
        self.handlers.values().copied().collect()
    }

    pub fn rotate_enabled(&self) -> bool {
        self.rotate_enabled
    }

    pub fn look_at_bound(&self) -> bool {
        self.look_at_bound
    }

    pub fn frustum(&self) -> Frustum {
        self.frustum
    }

    /// Entnimmt alle offenen Terrain-Abfragen.
    pub fn take_terrain_requests(&mut self) -> Vec<(TerrainRequestId, Cartographic)> {
        std::mem::take(&mut self.terrain_requests)
    }

    fn scripted_pick(&self, screen: Vec2) -> Option<Cartographic> {
        self.picks
            .iter()
            .find(|(s, _)| s.distance(screen) <= SCREEN_TOLERANCE)
            .map(|(_, w)| *w)
    }
}

fn same_position(a: &Cartographic, b: &Cartographic) -> bool {
    (a.longitude - b.longitude).abs() <= MARKER_TOLERANCE
        && (a.latitude - b.latitude).abs() <= MARKER_TOLERANCE
        && (a.altitude - b.altitude).abs() <= MARKER_TOLERANCE
}

impl RenderEngine for RecordingEngine {
    fn pick_world_position(&mut self, screen: Vec2) -> Option<Cartographic> {
        self.scripted_pick(screen)
    }

    fn pick_entity(&mut self, screen: Vec2) -> Option<EntityHandle> {
        let world = self.scripted_pick(screen)?;
        // Zuletzt erzeugter Marker liegt oben
        self.entities
            .iter()
            .rev()
            .find_map(|(h, e)| match e {
                Entity::Marker { position, .. } if same_position(position, &world) => Some(*h),
                _ => None,
            })
    }

    fn add_point_marker(
        &mut self,
        position: Cartographic,
        color: [f32; 4],
        pixel_size: f32,
    ) -> EntityHandle {
        let handle = EntityHandle(self.next_id());
        self.entities.insert(
            handle,
            Entity::Marker {
                position,
                color,
                pixel_size,
            },
        );
        handle
    }

    fn add_label(&mut self, position: Cartographic, text: &str) -> EntityHandle {
        let handle = EntityHandle(self.next_id());
        self.entities.insert(
            handle,
            Entity::Label {
                position,
                text: text.to_string(),
            },
        );
        handle
    }

    fn add_polyline(&mut self, points: &[Cartographic], color: [f32; 4]) -> EntityHandle {
        let handle = EntityHandle(self.next_id());
        self.entities.insert(
            handle,
            Entity::Polyline {
                points: points.to_vec(),
                color,
            },
        );
        handle
    }

    fn add_polygon(
        &mut self,
        points: &[Cartographic],
        fill: [f32; 4],
        _outline: [f32; 4],
    ) -> EntityHandle {
        let handle = EntityHandle(self.next_id());
        self.entities.insert(
            handle,
            Entity::Polygon {
                points: points.to_vec(),
                fill,
            },
        );
        handle
    }

    fn remove_entity(&mut self, handle: EntityHandle) {
        if self.entities.shift_remove(&handle).is_none() {
            log::debug!("remove_entity: unbekanntes Handle {:?}", handle);
        }
    }

    fn set_entity_position(&mut self, handle: EntityHandle, new_position: Cartographic) {
        match self.entities.get_mut(&handle) {
            Some(Entity::Marker { position, .. }) | Some(Entity::Label { position, .. }) => {
                *position = new_position;
            }
            _ => log::debug!("set_entity_position: kein Punkt-Entity {:?}", handle),
        }
    }

    fn set_marker_style(&mut self, handle: EntityHandle, new_color: [f32; 4], new_size: f32) {
        if let Some(Entity::Marker {
            color, pixel_size, ..
        }) = self.entities.get_mut(&handle)
        {
            *color = new_color;
            *pixel_size = new_size;
        }
    }

    fn camera_pose(&self) -> CameraPose {
        self.pose
    }

    fn set_camera_pose(&mut self, pose: CameraPose) {
        self.pose = pose;
        self.calls.push(EngineCall::SetPose(pose));
    }

    fn fly_to(&mut self, pose: CameraPose, duration_s: f64) {
        // Headless: Flug endet sofort am Ziel
        self.pose = pose;
        self.calls.push(EngineCall::FlyTo { pose, duration_s });
    }

    fn fly_to_bounding_sphere(
        &mut self,
        sphere: BoundingSphere,
        offset: HeadingPitchRange,
        duration_s: f64,
    ) {
        let center = sphere.center_cartographic();
        self.pose = CameraPose {
            latitude: center.latitude,
            longitude: center.longitude,
            altitude: center.altitude + offset.range * (-offset.pitch).to_radians().sin(),
            heading: offset.heading,
            pitch: offset.pitch,
            roll: 0.0,
        };
        self.calls.push(EngineCall::FlyToSphere {
            sphere,
            offset,
            duration_s,
        });
    }

    fn look_at(&mut self, target: Cartographic, offset: HeadingPitchRange) {
        self.look_at_bound = true;
        self.pose = CameraPose {
            latitude: target.latitude,
            longitude: target.longitude,
            altitude: target.altitude + offset.range * (-offset.pitch).to_radians().sin(),
            heading: offset.heading,
            pitch: offset.pitch,
            roll: 0.0,
        };
        self.calls.push(EngineCall::LookAt { target, offset });
    }

    fn reset_look_at_transform(&mut self) {
        self.look_at_bound = false;
        self.calls.push(EngineCall::ResetLookAt);
    }

    fn move_camera(&mut self, direction: MoveDirection, amount: f64) {
        let heading = self.pose.heading.to_radians();
        let (d_north, d_east, d_up) = match direction {
            MoveDirection::Forward => (heading.cos() * amount, heading.sin() * amount, 0.0),
            MoveDirection::Backward => (-heading.cos() * amount, -heading.sin() * amount, 0.0),
            MoveDirection::Right => (-heading.sin() * amount, heading.cos() * amount, 0.0),
            MoveDirection::Left => (heading.sin() * amount, -heading.cos() * amount, 0.0),
            MoveDirection::Up => (0.0, 0.0, amount),
            MoveDirection::Down => (0.0, 0.0, -amount),
        };
        let cos_lat = self.pose.latitude.to_radians().cos().max(1e-6);
        self.pose.latitude = (self.pose.latitude + d_north / METERS_PER_DEGREE).clamp(-90.0, 90.0);
        self.pose.longitude += d_east / (METERS_PER_DEGREE * cos_lat);
        self.pose.altitude += d_up;
        self.calls.push(EngineCall::Move(direction, amount));
    }

    fn rotate_camera(&mut self, direction: RotateDirection, angle_deg: f64) {
        match direction {
            RotateDirection::Left => self.pose.heading -= angle_deg,
            RotateDirection::Right => self.pose.heading += angle_deg,
            RotateDirection::Up => self.pose.pitch += angle_deg,
            RotateDirection::Down => self.pose.pitch -= angle_deg,
        }
        self.pose.heading = self.pose.heading.rem_euclid(360.0);
        self.calls.push(EngineCall::Rotate(direction, angle_deg));
    }

    fn zoom_camera(&mut self, direction: ZoomDirection, amount: f64) {
        match direction {
            ZoomDirection::In => self.pose.altitude -= amount,
            ZoomDirection::Out => self.pose.altitude += amount,
        }
        self.calls.push(EngineCall::Zoom(direction, amount));
    }

    fn projection(&self) -> Projection {
        self.projection
    }

    fn set_frustum(&mut self, frustum: Frustum) {
        if let Some(fov) = frustum.fov {
            self.frustum.fov = Some(fov);
        }
        if let Some(near) = frustum.near {
            self.frustum.near = Some(near);
        }
        if let Some(far) = frustum.far {
            self.frustum.far = Some(far);
        }
        self.calls.push(EngineCall::SetFrustum(frustum));
    }

    fn install_picking_handler(&mut self, kind: PickingHandlerKind) -> HandlerHandle {
        let handle = HandlerHandle(self.next_id());
        self.handlers.insert(handle, kind);
        self.calls.push(EngineCall::InstallHandler(kind));
        handle
    }

    fn remove_picking_handler(&mut self, handle: HandlerHandle) {
        if let Some(kind) = self.handlers.shift_remove(&handle) {
            self.calls.push(EngineCall::RemoveHandler(kind));
        }
    }

    fn set_camera_rotate_enabled(&mut self, enabled: bool) {
        self.rotate_enabled = enabled;
        self.calls.push(EngineCall::SetRotateEnabled(enabled));
    }

    fn globe_height(&self, _position: Cartographic) -> Option<f64> {
        self.globe_height
    }

    fn request_terrain_height(&mut self, position: Cartographic) -> TerrainRequestId {
        let id = TerrainRequestId(self.next_id());
        self.terrain_requests.push((id, position));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_pick_resolves_marker_at_same_position() {
        let mut engine = RecordingEngine::new();
        let p = Cartographic::new(2.35, 48.85, 35.0);
        let marker = engine.add_point_marker(p, [1.0; 4], 8.0);
        engine.add_label(p, "label");
        engine.script_pick(Vec2::new(10.0, 20.0), p);

        assert_eq!(engine.pick_world_position(Vec2::new(10.2, 20.0)), Some(p));
        assert_eq!(engine.pick_entity(Vec2::new(10.0, 20.0)), Some(marker));
        assert_eq!(engine.pick_world_position(Vec2::new(50.0, 50.0)), None);
    }

    #[test]
    fn handlers_are_tracked_until_removed() {
        let mut engine = RecordingEngine::new();
        let h = engine.install_picking_handler(PickingHandlerKind::Edit);
        assert_eq!(engine.installed_handlers(), vec![PickingHandlerKind::Edit]);
        engine.remove_picking_handler(h);
        assert!(engine.installed_handlers().is_empty());
    }

    #[test]
    fn move_up_changes_only_altitude() {
        let mut engine = RecordingEngine::new();
        let before = engine.camera_pose();
        engine.move_camera(MoveDirection::Up, 250.0);
        let after = engine.camera_pose();
        assert_eq!(after.altitude, before.altitude + 250.0);
        assert_eq!(after.latitude, before.latitude);
    }
}
