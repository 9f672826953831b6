use crate::scene::Scene;
use beadfield::{
    Draggable, Gesture, LayoutEngine, LayoutParameters, Positionable, RecordingView, Styleable,
};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub max_ticks: usize,
    /// Stop once the engine is settled and no scripted drag is pending.
    pub stop_when_settled: bool,
    pub trace: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeReport {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub held: bool,
    pub ignored: bool,
    pub classes: Vec<String>,
    pub transform: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub ticks: usize,
    pub energy: f64,
    pub settled: bool,
    pub parameters: LayoutParameters,
    pub nodes: Vec<NodeReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Vec<(String, f64, f64)>>,
}

/// Runs the scene: scripted gestures first, then one `step` (tick + cool) per tick.
pub fn run(scene: &Scene, opts: RunOptions) -> anyhow::Result<Report> {
    let (mut engine, mut views) = scene.build()?;
    let script_end = scene.script_end();
    let mut frames = Vec::new();
    let mut ticks = 0usize;

    info!(
        nodes = engine.len(),
        drags = scene.drags.len(),
        max_ticks = opts.max_ticks,
        "simulation started"
    );

    while ticks < opts.max_ticks {
        let script_pending = script_end.is_some_and(|end| ticks <= end);
        if opts.stop_when_settled && engine.is_settled() && !script_pending {
            break;
        }

        for drag in &scene.drags {
            for gesture in drag.gestures_at(ticks) {
                apply(&mut engine, &mut views, &drag.node, gesture)?;
            }
        }

        engine.step();
        ticks += 1;

        if opts.trace {
            frames.push(
                engine
                    .positions()
                    .map(|(id, p)| (id.to_string(), p.x, p.y))
                    .collect(),
            );
        }
    }

    info!(ticks, energy = engine.energy(), "simulation finished");
    Ok(report(&engine, &views, ticks, frames))
}

fn apply(
    engine: &mut LayoutEngine,
    views: &mut IndexMap<String, RecordingView>,
    id: &str,
    gesture: Gesture,
) -> anyhow::Result<()> {
    debug!(id, ?gesture, "gesture");
    engine.apply_gesture(id, gesture)?;
    if let Some(view) = views.get_mut(id) {
        match gesture {
            Gesture::Start => view.press(true),
            Gesture::End { .. } => view.press(false),
            Gesture::Move { .. } => {}
        }
    }
    Ok(())
}

fn report(
    engine: &LayoutEngine,
    views: &IndexMap<String, RecordingView>,
    ticks: usize,
    frames: Vec<Vec<(String, f64, f64)>>,
) -> Report {
    let nodes = engine
        .nodes()
        .map(|n| {
            let view = views.get(n.id());
            let p = n.position();
            NodeReport {
                id: n.id().to_string(),
                x: p.x,
                y: p.y,
                held: n.is_held(),
                ignored: n.is_ignored(),
                classes: view.map(RecordingView::classes).unwrap_or_default(),
                transform: view
                    .and_then(RecordingView::last_transform)
                    .map(|t| t.to_string()),
            }
        })
        .collect();

    Report {
        ticks,
        energy: engine.energy(),
        settled: engine.is_settled(),
        parameters: engine.parameters(),
        nodes,
        frames,
    }
}
