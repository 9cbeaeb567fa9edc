//! Application State — zentrale Datenhaltung.

mod app_state;
mod edit;
mod picking;
mod presentation;
mod scene;
mod session;
mod sync;

pub use app_state::AppState;
pub use edit::{CoordinateFields, EditSession, PointRef};
pub use picking::PointPickingState;
pub use presentation::{PresentationRow, PresentationState};
pub use scene::{MeasurementVisuals, SceneState};
pub use session::{MeasurementSession, SessionPhase};
pub use sync::CameraSyncState;
