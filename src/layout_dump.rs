use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::layout::LabelEngine;

/// Snapshot of the most recent layout pass, for debugging and for
/// deterministic test fixtures.
#[derive(Debug, Serialize)]
pub struct PlacementDump {
    pub labels: Vec<LabelDump>,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub id: String,
    pub priority: f64,
    pub geometry: String,
    pub text: String,
    pub placed: bool,
    pub chosen_pos: Option<String>,
    pub instances: Vec<InstanceDump>,
}

#[derive(Debug, Serialize)]
pub struct InstanceDump {
    pub pos: String,
    pub origin: [f32; 2],
    pub bounds: [f32; 4],
}

impl PlacementDump {
    pub fn from_engine(engine: &LabelEngine) -> Self {
        let labels = engine
            .registry()
            .iter()
            .map(|(id, label)| LabelDump {
                id: id.to_string(),
                priority: label.priority,
                geometry: format!("{:?}", label.feature.geometry.kind()),
                text: label.text.clone(),
                placed: label.placed,
                chosen_pos: label.chosen_pos.map(|pos| format!("{pos:?}")),
                instances: label
                    .instances
                    .iter()
                    .map(|instance| InstanceDump {
                        pos: format!("{:?}", instance.pos),
                        origin: [instance.origin.0, instance.origin.1],
                        bounds: [
                            instance.bounds.x1,
                            instance.bounds.y1,
                            instance.bounds.x2,
                            instance.bounds.y2,
                        ],
                    })
                    .collect(),
            })
            .collect();
        PlacementDump { labels }
    }
}

pub fn write_placement_dump(path: &Path, engine: &LabelEngine) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &PlacementDump::from_engine(engine))?;
    Ok(())
}
