//! Visualization options.
//!
//! Keys follow the JSON shape callers already use for this kind of chart
//! (`nodeOffsetWidth`, `Node.type`, `Label.textAlign`, ...). Anything the
//! crate does not recognize is kept in the `extra` maps and survives a
//! round-trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ConfigError;

/// Palette used when `colors` is not given.
pub const DEFAULT_COLORS: [&str; 7] = [
	"#416D9C", "#70A35E", "#EBB056", "#C74243", "#83548B", "#909291", "#557EAA",
];

/// Outer spacing around the chart, in model units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
	/// Top margin.
	pub top: f64,
	/// Left margin.
	pub left: f64,
	/// Right margin.
	pub right: f64,
	/// Bottom margin.
	pub bottom: f64,
}

/// `Node` options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeConfig {
	/// When set, a node's own `color`/`line_width` win over these defaults.
	pub overridable: bool,
	/// Fill and stroke colour.
	pub color: String,
	/// Shape type name looked up in the node registry.
	#[serde(rename = "type")]
	pub node_type: String,
	/// Stroke width.
	pub line_width: f64,
	/// Keys this crate does not read.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Default for NodeConfig {
	fn default() -> Self {
		Self {
			overridable: true,
			color: "rgba(0, 0, 0, 0)".into(),
			node_type: "rectangle".into(),
			line_width: 1.0,
			extra: Map::new(),
		}
	}
}

/// `Edge` options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeConfig {
	/// When set, an edge's own `color`/`line_width` win over these defaults.
	pub overridable: bool,
	/// Stroke and arrowhead colour.
	pub color: String,
	/// Shape type name looked up in the edge registry.
	#[serde(rename = "type")]
	pub edge_type: String,
	/// Stroke width.
	pub line_width: f64,
	/// Default arrowhead size.
	pub dim: f64,
	/// Default hit tolerance around a segment.
	pub epsilon: f64,
	/// Keys this crate does not read.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Default for EdgeConfig {
	fn default() -> Self {
		Self {
			overridable: false,
			color: "#ccc".into(),
			edge_type: "line".into(),
			line_width: 1.0,
			dim: 15.0,
			epsilon: 7.0,
			extra: Map::new(),
		}
	}
}

/// Which label backend the facade builds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelType {
	/// Text drawn straight onto the shape canvas.
	#[serde(alias = "native")]
	Native,
	/// One SVG `<text>` element per node.
	#[serde(rename = "SVG", alias = "vector-markup")]
	Svg,
	/// One positioned block element per node, sized to the shape.
	#[default]
	#[serde(rename = "HTML", alias = "markup-box")]
	Html,
}

/// `Label` options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelConfig {
	/// Which label layer to build.
	#[serde(rename = "type")]
	pub label_type: LabelType,
	/// Canvas `textAlign`.
	pub text_align: String,
	/// Canvas `textBaseline`.
	pub text_baseline: String,
	/// Font size in px.
	pub size: f64,
	/// Font family.
	pub family: String,
	/// Text colour.
	pub color: String,
	/// Keys this crate does not read.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Default for LabelConfig {
	fn default() -> Self {
		Self {
			label_type: LabelType::Html,
			text_align: "center".into(),
			text_baseline: "middle".into(),
			size: 10.0,
			family: "sans-serif".into(),
			color: "#fff".into(),
			extra: Map::new(),
		}
	}
}

impl LabelConfig {
	/// CSS font shorthand, e.g. `10px sans-serif`.
	pub fn font(&self) -> String {
		format!("{}px {}", self.size, self.family)
	}
}

/// Immutable once handed to [`TimeGraph`](super::TimeGraph); build a new one
/// with [`Config::merged`] to change options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
	/// Outer spacing around the chart.
	pub margin: Margin,
	/// Width trimmed off a node's box when drawing; the hit box keeps the full size.
	pub node_offset_width: f64,
	/// Height trimmed off a node's box when drawing.
	pub node_offset_height: f64,
	/// Ordered colour palette.
	pub colors: Vec<String>,
	/// Node defaults.
	#[serde(rename = "Node")]
	pub node: NodeConfig,
	/// Edge defaults.
	#[serde(rename = "Edge")]
	pub edge: EdgeConfig,
	/// Label layer options.
	#[serde(rename = "Label")]
	pub label: LabelConfig,
	/// Keys this crate does not read.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			margin: Margin::default(),
			node_offset_width: 0.0,
			node_offset_height: 0.0,
			colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
			node: NodeConfig::default(),
			edge: EdgeConfig::default(),
			label: LabelConfig::default(),
			extra: Map::new(),
		}
	}
}

impl Config {
	/// Deep-merges each JSON layer over the defaults, later layers winning.
	/// Objects merge key by key; every other value, arrays included, is
	/// replaced wholesale.
	pub fn merged<I>(layers: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = Value>,
	{
		let mut base = serde_json::to_value(Self::default())?;
		for layer in layers {
			if !layer.is_object() {
				return Err(ConfigError::NotAnObject);
			}
			merge_value(&mut base, layer);
		}
		Ok(serde_json::from_value(base)?)
	}

	/// Parses a single JSON object and merges it over the defaults.
	pub fn from_json(json: &str) -> Result<Self, ConfigError> {
		Self::merged([serde_json::from_str(json)?])
	}

	/// Palette entry `index`, cycling through `colors`.
	pub fn palette_color(&self, index: usize) -> Option<&str> {
		if self.colors.is_empty() {
			return None;
		}
		Some(&self.colors[index % self.colors.len()])
	}
}

fn merge_value(base: &mut Value, layer: Value) {
	match (base, layer) {
		(Value::Object(base), Value::Object(layer)) => {
			for (key, value) in layer {
				match base.get_mut(&key) {
					Some(slot) => merge_value(slot, value),
					None => {
						base.insert(key, value);
					}
				}
			}
		}
		(slot, layer) => *slot = layer,
	}
}
