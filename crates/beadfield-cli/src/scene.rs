use anyhow::{Context, ensure};
use beadfield::{
    Gesture, LayoutConfig, LayoutEngine, Node, Point, RecordingView, Styleable, Viewport,
};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub ignore: bool,
    #[serde(default)]
    pub edges: Vec<String>,
}

/// A scripted drag: one path sample per tick starting at `start_tick`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drag {
    pub node: String,
    pub start_tick: usize,
    pub path: Vec<[f64; 2]>,
}

impl Drag {
    pub fn last_tick(&self) -> usize {
        self.start_tick + self.path.len().saturating_sub(1)
    }

    /// Gestures to feed the engine before tick `tick`.
    pub fn gestures_at(&self, tick: usize) -> Vec<Gesture> {
        let Some(i) = tick.checked_sub(self.start_tick) else {
            return Vec::new();
        };
        let Some(&[x, y]) = self.path.get(i) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(2);
        if i == 0 {
            out.push(Gesture::Start);
        }
        if i + 1 == self.path.len() {
            out.push(Gesture::End { x, y });
        } else {
            out.push(Gesture::Move { x, y });
        }
        out
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    pub viewport: Size,
    #[serde(default)]
    pub config: LayoutConfig,
    pub nodes: Vec<SceneNode>,
    #[serde(default)]
    pub drags: Vec<Drag>,
}

impl Scene {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid scene {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let scene: Scene = json5::from_str(text)?;
        for drag in &scene.drags {
            ensure!(!drag.path.is_empty(), "drag of `{}` has an empty path", drag.node);
            ensure!(
                scene.nodes.iter().any(|n| n.id == drag.node),
                "drag refers to unknown node `{}`",
                drag.node
            );
        }
        Ok(scene)
    }

    /// Last tick any scripted drag still needs.
    pub fn script_end(&self) -> Option<usize> {
        self.drags.iter().map(Drag::last_tick).max()
    }

    /// Builds the engine and hands back the view of every node, keyed by id.
    pub fn build(&self) -> anyhow::Result<(LayoutEngine, IndexMap<String, RecordingView>)> {
        let viewport = Viewport::new(self.viewport.width, self.viewport.height)?;
        let mut engine = LayoutEngine::new(self.config.clone(), viewport)?;
        let mut views = IndexMap::with_capacity(self.nodes.len());

        for n in &self.nodes {
            let mut view = RecordingView::new();
            view.add_class("shown");
            let options = engine
                .node_options()
                .with_view(view.clone())
                .ignored(n.ignore);
            let node = Node::new(n.id.clone(), Point::new(n.x, n.y), options)?;
            engine.add_node(node)?;
            views.insert(n.id.clone(), view);
        }
        for n in &self.nodes {
            for peer in &n.edges {
                engine
                    .link(&n.id, peer)
                    .with_context(|| format!("bad edge `{}` -> `{peer}`", n.id))?;
            }
        }

        Ok((engine, views))
    }
}
