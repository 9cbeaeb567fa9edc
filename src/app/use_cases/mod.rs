//! Use-Cases der Application-Layer-Orchestrierung.

pub mod camera_command;
pub mod camera_sync;
pub mod focus;
pub mod measurement_session;
pub mod picked_points;
pub mod point_edit;
pub mod presentation;
pub mod snapshot;
pub mod visuals;
