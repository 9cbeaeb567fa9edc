use serde_json::Value;

use crate::core::CameraPose;
use crate::host::Debouncer;
use crate::shared::SessionOptions;

/// Zustand der Kamera-Synchronisation und der Fire-Once-Trigger.
#[derive(Debug, Clone)]
pub struct CameraSyncState {
    /// Kamera → Host aktiv (`cameraSyncEnabled`)
    pub enabled: bool,
    /// Trailing-Debounce Kamera → Host
    pub outbound: Debouncer<CameraPose>,
    /// Festes Sammelfenster Host → Kamera (Pose wird beim Flush neu gelesen)
    pub inbound: Debouncer<()>,
    /// Zuletzt an den Host geschriebene bzw. von ihm übernommene Pose
    pub last_synced: Option<CameraPose>,
    /// Token des zuletzt ausgeführten `cameraCommand`
    pub last_command_token: Option<Value>,
    pub last_load_token: Option<Value>,
    pub last_focus_token: Option<Value>,
}

impl CameraSyncState {
    pub fn new(options: &SessionOptions) -> Self {
        Self {
            enabled: false,
            outbound: Debouncer::trailing(options.outbound_debounce_ms),
            inbound: Debouncer::fixed(options.inbound_debounce_ms),
            last_synced: None,
            last_command_token: None,
            last_load_token: None,
            last_focus_token: None,
        }
    }
}
