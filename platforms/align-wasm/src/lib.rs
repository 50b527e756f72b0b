use align_editor::Session;
use align_graph::EdgeKind;
use align_protocol::{LayoutConfig, NodeId};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// A node as the graph widget wants it.
#[derive(Debug, Serialize)]
pub struct NodeView {
    pub id: String,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct EdgeView {
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    /// `"from"` for dependency arcs; alignment links have no arrows.
    pub arrows: Option<&'static str>,
    pub dashed: bool,
}

#[derive(Debug, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
    pub pending: Option<String>,
}

pub fn snapshot_of(session: &Session) -> GraphSnapshot {
    let layout = session.layout();
    let graph = session.graph();

    let nodes = graph
        .nodes()
        .map(|n| NodeView {
            id: n.id.to_string(),
            label: n.label.clone(),
            x: n.x,
            y: n.y,
            color: layout.color(n.color).to_string(),
        })
        .collect();

    let edges = graph
        .edges()
        .map(|e| {
            let (from, to) = e.key.endpoints();
            EdgeView {
                id: e.key.to_string(),
                from: from.to_string(),
                to: to.to_string(),
                label: e.label().map(str::to_string),
                arrows: match e.kind {
                    EdgeKind::Dependency { .. } => Some("from"),
                    EdgeKind::Link => None,
                },
                dashed: e.is_dashed(),
            }
        })
        .collect();

    GraphSnapshot {
        nodes,
        edges,
        pending: session.pending().map(|id| id.to_string()),
    }
}

fn parse_node(raw: Option<String>) -> Result<Option<NodeId>, JsValue> {
    raw.map(|s| s.parse::<NodeId>().map_err(|e| JsValue::from_str(&e.to_string())))
        .transpose()
}

/// The editor instance living in the browser page.
#[wasm_bindgen]
pub struct AlignmentEngine {
    session: Session,
}

#[wasm_bindgen]
impl AlignmentEngine {
    /// `layout` may be `undefined` or a partial layout object.
    #[wasm_bindgen(constructor)]
    pub fn new(layout: JsValue) -> Result<AlignmentEngine, JsValue> {
        let layout: LayoutConfig = if layout.is_undefined() || layout.is_null() {
            LayoutConfig::default()
        } else {
            serde_wasm_bindgen::from_value(layout)?
        };
        Ok(Self {
            session: Session::new(layout),
        })
    }

    /// Draw a sentence pair and apply its stored alignment.
    pub fn load(&mut self, source: &str, target: &str, alignment: &str) -> Result<(), JsValue> {
        self.session
            .load(source, target, alignment)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// `node` is the id under the pointer (`top3`), or nothing for empty space.
    pub fn click(&mut self, node: Option<String>) -> Result<String, JsValue> {
        let target = parse_node(node)?;
        Ok(self.session.click(target).to_string())
    }

    pub fn double_click(&mut self, node: Option<String>) -> Result<String, JsValue> {
        let outcome = match parse_node(node)? {
            Some(id) => self.session.double_click(id),
            None => align_editor::EditOutcome::Ignored,
        };
        Ok(outcome.to_string())
    }

    pub fn clear_links(&mut self) -> usize {
        self.session.clear_links()
    }

    pub fn clear_markers(&mut self) {
        self.session.clear_markers();
    }

    /// Pharaoh string to post back to the server.
    pub fn alignment(&self) -> String {
        self.session.encode_alignment()
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&snapshot_of(&self.session))?)
    }
}
