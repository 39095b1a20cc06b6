//! Record and document types

use serde::{Deserialize, Serialize};

/// One completed unit of the mind map
///
/// Immutable once emitted. `explorationMethods` defaults to empty when the
/// generator omits it; whether that is acceptable is decided by the
/// [`CompletenessPolicy`](super::CompletenessPolicy) in force.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapNode {
    pub node_name: String,
    pub connection: String,
    pub insight: String,
    #[serde(default)]
    pub exploration_methods: Vec<String>,
    pub references: Vec<String>,
}

/// The aggregate document for one query
///
/// `nodes` is in emission order, which is the order records completed in
/// the source stream.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapDocument {
    pub center_node: String,
    pub nodes: Vec<MapNode>,
}

impl MindMapDocument {
    #[inline]
    #[must_use]
    pub fn new(center_node: impl Into<String>, nodes: Vec<MapNode>) -> Self {
        Self {
            center_node: center_node.into(),
            nodes,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_camel_case() {
        let document = MindMapDocument::new(
            "boredom",
            vec![MapNode {
                node_name: "A".into(),
                connection: "c".into(),
                insight: "i".into(),
                exploration_methods: vec!["m".into()],
                references: vec!["r".into()],
            }],
        );
        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["centerNode"], "boredom");
        assert_eq!(json["nodes"][0]["nodeName"], "A");
        assert_eq!(json["nodes"][0]["explorationMethods"][0], "m");
    }

    #[test]
    fn test_missing_exploration_methods_defaults_to_empty() {
        let node: MapNode = serde_json::from_str(
            r#"{"nodeName":"A","connection":"c","insight":"i","references":["r"]}"#,
        )
        .unwrap();
        assert!(node.exploration_methods.is_empty());
    }
}
