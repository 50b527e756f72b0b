use align_graph::{GraphEdge, TokenNode};
use align_parser::TokenRow;
use align_protocol::{Layer, NodeColor, NodeId};

use crate::session::Session;

/// Draw one parse into the session graph.
///
/// 1. One node per row, placed by its position in the block.
/// 2. One arc per row whose relation is not suppressed.
///
/// Every node id is registered as known. Returns the number of tokens drawn.
pub(crate) fn load_layer(session: &mut Session, rows: &[TokenRow], layer: Layer) -> usize {
    for (i, row) in rows.iter().enumerate() {
        let id = NodeId::new(layer, row.ordinal);
        let (x, y) = session.layout.position(layer, i);

        session.graph.add_node(TokenNode {
            id,
            label: row.form.clone(),
            x,
            y,
            color: NodeColor::Default,
        });
        session.known.insert(id);
    }

    for row in rows {
        let Some(dep) = row.dependency(layer) else {
            continue;
        };
        if let Err(err) = session.graph.add_edge(GraphEdge::dependency(dep, row.relation.as_str())) {
            tracing::debug!(arc = %dep, %err, "dependency arc left out");
        }
    }

    rows.len()
}
