//! JSON graph descriptions.
//!
//! A [`GraphDef`] is the human-edited form of a graph: nodes refer to each other by name and
//! carry their operation parameters as plain JSON. [`GraphDef::build`] instantiates it through an
//! [`OperationRegistry`].

use std::{collections::BTreeMap, fs::File, io::BufReader, path::Path};

use crate::{
    foundation::core::NodeId,
    foundation::error::{PortaError, PortaResult},
    graph::Graph,
    ops::{AUX_SLOT, INPUT_SLOT, registry::OperationRegistry},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDef {
    pub nodes: Vec<NodeDef>,
    /// Name of the node renders start from.
    pub output: String,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDef {
    pub name: String,
    pub op: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
    /// Producer of the default slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Producer of the `aux` slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aux: Option<String>,
    /// Any other slot, by slot name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub slots: BTreeMap<String, String>,
}

/// A built graph plus its output node.
#[derive(Clone, Debug)]
pub struct Scene {
    pub graph: Graph,
    pub output: NodeId,
}

impl GraphDef {
    pub fn from_reader<R: std::io::Read>(r: R) -> PortaResult<Self> {
        serde_json::from_reader(r).map_err(|e| PortaError::serde(format!("parse graph JSON: {e}")))
    }

    pub fn from_json_str(s: &str) -> PortaResult<Self> {
        serde_json::from_str(s).map_err(|e| PortaError::serde(format!("parse graph JSON: {e}")))
    }

    pub fn from_path(path: impl AsRef<Path>) -> PortaResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            PortaError::validation(format!("open graph JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json_pretty(&self) -> PortaResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PortaError::serde(e.to_string()))
    }

    /// Instantiate every node, bind edges by name, and reject cycles.
    #[tracing::instrument(skip_all, fields(nodes = self.nodes.len(), output = %self.output))]
    pub fn build(&self, registry: &OperationRegistry) -> PortaResult<Scene> {
        let mut graph = Graph::new();
        let mut ids: BTreeMap<&str, NodeId> = BTreeMap::new();
        for def in &self.nodes {
            if ids.contains_key(def.name.as_str()) {
                return Err(PortaError::validation(format!(
                    "duplicate node name `{}`",
                    def.name
                )));
            }
            let id = graph.create(registry, &def.op, &def.params)?;
            graph.set_name(id, def.name.clone())?;
            ids.insert(def.name.as_str(), id);
        }

        let lookup = |consumer: &str, name: &str| {
            ids.get(name).copied().ok_or_else(|| {
                PortaError::validation(format!(
                    "node `{consumer}` references unknown node `{name}`"
                ))
            })
        };
        for def in &self.nodes {
            let id = ids[def.name.as_str()];
            let bindings = def
                .input
                .iter()
                .map(|p| (INPUT_SLOT, p))
                .chain(def.aux.iter().map(|p| (AUX_SLOT, p)))
                .chain(def.slots.iter().map(|(s, p)| (s.as_str(), p)));
            for (slot, producer) in bindings {
                graph.connect_named(id, slot, lookup(def.name.as_str(), producer.as_str())?)?;
            }
        }

        let output = lookup("<output>", self.output.as_str())?;
        graph.validate()?;
        Ok(Scene { graph, output })
    }

    /// Thresholded fractal with a translucent checkerboard composited over it.
    pub fn demo(width: u32, height: u32) -> Self {
        let node = |name: &str, op: &str, params: serde_json::Value| NodeDef {
            name: name.to_string(),
            op: op.to_string(),
            params,
            ..NodeDef::default()
        };
        let mut over = node("over", "over", serde_json::Value::Null);
        over.input = Some("contrast".to_string());
        over.aux = Some("checker".to_string());
        let mut contrast = node("contrast", "threshold", serde_json::json!({ "value": 0.5 }));
        contrast.input = Some("fractal".to_string());

        Self {
            nodes: vec![
                node(
                    "fractal",
                    "fractal",
                    serde_json::json!({ "width": width, "height": height, "iterations": 30 }),
                ),
                contrast,
                node(
                    "checker",
                    "checkerboard",
                    serde_json::json!({
                        "x": (width / 4).max(1),
                        "y": (height / 4).max(1),
                        "color1": [0.0, 0.0, 0.0, 0.0],
                        "color2": [0.0, 0.0, 0.0, 0.35],
                    }),
                ),
                over,
            ],
            output: "over".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph_def.rs"]
mod tests;
