//! Geo Measure Replay.
//!
//! Lädt einen Mess-Snapshot (`{"measurements": [...]}`) in eine Headless-
//! Oberfläche und gibt pro Messung Name, formatierten Wert und Punktzahl aus.

use anyhow::{bail, Context};
use geo_measure_surface::{
    Diagnostics, HostProperty, InMemoryHost, RecordingEngine, SessionOptions,
    VisualizationSurface,
};
use serde_json::{json, Value};

fn main() -> anyhow::Result<()> {
    let diagnostics = Diagnostics::new(log::LevelFilter::Info);
    diagnostics.init();

    log::info!(
        "Geo Measure Replay v{} startet...",
        env!("CARGO_PKG_VERSION")
    );

    let Some(path) = std::env::args().nth(1) else {
        bail!("Aufruf: geo-measure-replay <snapshot.json>");
    };
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Snapshot '{}' nicht lesbar", path))?;
    let raw: Value = serde_json::from_str(&content)
        .with_context(|| format!("Snapshot '{}' ist kein gültiges JSON", path))?;
    let measurements = match raw {
        Value::Array(list) => Value::Array(list),
        Value::Object(mut map) => map.remove("measurements").unwrap_or(json!([])),
        other => bail!("Unerwarteter Snapshot-Inhalt: {}", other),
    };

    let options = SessionOptions::load_from_file(&SessionOptions::config_path());
    let mut surface = VisualizationSurface::new(
        RecordingEngine::new(),
        InMemoryHost::with_defaults(),
        options,
        diagnostics,
    );
    surface.host_write(
        HostProperty::LoadMeasurementsTrigger,
        json!({ "measurements": measurements, "timestamp": "replay" }),
    );

    let rows = &surface.state().presentation.rows;
    if rows.is_empty() {
        println!("Keine gültigen Messungen im Snapshot.");
    }
    for row in rows {
        println!(
            "{:>3}  {:<24} {:>14}  ({} Punkte)",
            row.index + 1,
            row.name,
            row.value_text,
            row.point_count
        );
    }
    log::info!(
        "{} Messungen, {} Engine-Entities",
        rows.len(),
        surface.engine().entity_count()
    );

    surface.destroy();
    Ok(())
}
