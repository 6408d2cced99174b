use std::collections::HashMap;
use std::fmt;

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

use super::config::Config;
use super::error::{Result, TimeGraphError};

/// Stable node identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
	/// The id as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for NodeId {
	fn from(id: &str) -> Self {
		Self(id.to_owned())
	}
}

impl From<String> for NodeId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Per-node data bag. `color` and `line_width` only take effect while
/// `Node.overridable` is set in the configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeData {
	/// Box width in model units.
	pub width: f64,
	/// Box height in model units.
	pub height: f64,
	/// Colour override.
	pub color: Option<String>,
	/// Stroke width override.
	pub line_width: Option<f64>,
}

/// A chart entity drawn through the node shape registry.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Stable identity.
	pub id: NodeId,
	/// Display name, used as label text.
	pub name: String,
	/// Top-left anchor in model space, written by the layout step.
	pub pos: Point,
	/// Size and style overrides.
	pub data: NodeData,
	/// Shape type name; `None` falls back to `Node.type` from the config.
	pub node_type: Option<String>,
	/// Cleared to hide the node without removing it.
	pub drawn: bool,
	/// Cleared when the node is pending removal.
	pub exist: bool,
	/// Selection flag for callers; not read by the renderer.
	pub selected: bool,
}

impl Node {
	/// A visible node at the origin with no size.
	pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			pos: Point::ZERO,
			data: NodeData::default(),
			node_type: None,
			drawn: true,
			exist: true,
			selected: false,
		}
	}

	/// Sets the top-left anchor.
	pub fn with_pos(mut self, x: f64, y: f64) -> Self {
		self.pos = Point::new(x, y);
		self
	}

	/// Sets the size, clamping negatives to zero.
	pub fn with_size(mut self, width: f64, height: f64) -> Self {
		self.set_size(width, height);
		self
	}

	/// Sets the shape type name.
	pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
		self.node_type = Some(node_type.into());
		self
	}

	/// Sets the colour override.
	pub fn with_color(mut self, color: impl Into<String>) -> Self {
		self.data.color = Some(color.into());
		self
	}

	/// Negative and NaN sizes are stored as zero.
	pub fn set_size(&mut self, width: f64, height: f64) {
		self.data.width = width.max(0.0);
		self.data.height = height.max(0.0);
	}

	/// Box width.
	pub fn width(&self) -> f64 {
		self.data.width.max(0.0)
	}

	/// Box height.
	pub fn height(&self) -> f64 {
		self.data.height.max(0.0)
	}

	/// Center of the node's bounding box: the anchor plus half the size.
	pub fn center(&self) -> Point {
		self.pos + Vec2::new(self.width() / 2.0, self.height() / 2.0)
	}

	/// Drawn and not pending removal.
	pub fn is_visible(&self) -> bool {
		self.exist && self.drawn
	}

	/// Own type name, else `Node.type`.
	pub fn type_name<'a>(&'a self, config: &'a Config) -> &'a str {
		self.node_type.as_deref().unwrap_or(&config.node.node_type)
	}

	/// Own colour while `Node.overridable` is set, else `Node.color`.
	pub fn color<'a>(&'a self, config: &'a Config) -> &'a str {
		match &self.data.color {
			Some(color) if config.node.overridable => color,
			_ => &config.node.color,
		}
	}

	/// Own stroke width while `Node.overridable` is set, else `Node.lineWidth`.
	pub fn line_width(&self, config: &Config) -> f64 {
		match self.data.line_width {
			Some(width) if config.node.overridable => width,
			_ => config.node.line_width,
		}
	}
}

/// Per-edge data bag.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeData {
	/// Arrowhead size; `Edge.dim` from the config when unset.
	pub dim: Option<f64>,
	/// Direction marker `[from, to]`. The arrowhead flips to the `from` end
	/// when the first entry is not the edge's `from` node.
	pub direction: Vec<NodeId>,
	/// Colour override, honoured while `Edge.overridable` is set.
	pub color: Option<String>,
	/// Stroke width override, honoured while `Edge.overridable` is set.
	pub line_width: Option<f64>,
	/// Hit tolerance; `Edge.epsilon` from the config when unset.
	pub epsilon: Option<f64>,
}

/// An adjacency between two nodes. Endpoints are held by id and resolved
/// against the graph on every pass, so positions are never stale.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	/// Source node id.
	pub from: NodeId,
	/// Target node id.
	pub to: NodeId,
	/// Shape type name; `None` falls back to `Edge.type`.
	pub edge_type: Option<String>,
	/// Size and style overrides.
	pub data: EdgeData,
}

impl Edge {
	/// A plain edge between two nodes.
	pub fn new(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
		Self {
			from: from.into(),
			to: to.into(),
			edge_type: None,
			data: EdgeData::default(),
		}
	}

	/// Sets the shape type name.
	pub fn with_type(mut self, edge_type: impl Into<String>) -> Self {
		self.edge_type = Some(edge_type.into());
		self
	}

	/// Sets the direction marker.
	pub fn with_direction(mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
		self.data.direction = vec![from.into(), to.into()];
		self
	}

	/// Whether the edge joins `a` and `b`, in either order.
	pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
		(&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
	}

	/// Own type name, else `Edge.type`.
	pub fn type_name<'a>(&'a self, config: &'a Config) -> &'a str {
		self.edge_type.as_deref().unwrap_or(&config.edge.edge_type)
	}
}

/// An edge together with its endpoints as they are right now.
#[derive(Clone, Copy, Debug)]
pub struct EdgeView<'a> {
	/// The edge.
	pub edge: &'a Edge,
	/// Its `from` node.
	pub from: &'a Node,
	/// Its `to` node.
	pub to: &'a Node,
}

impl EdgeView<'_> {
	/// Whether the arrowhead belongs at the `from` end.
	pub fn is_inverted(&self) -> bool {
		let direction = &self.edge.data.direction;
		direction.len() > 1 && direction[0] != self.from.id
	}

	/// Arrowhead size.
	pub fn dim(&self, config: &Config) -> f64 {
		self.edge.data.dim.unwrap_or(config.edge.dim)
	}

	/// Hit tolerance.
	pub fn epsilon(&self, config: &Config) -> f64 {
		self.edge.data.epsilon.unwrap_or(config.edge.epsilon)
	}

	/// Own colour while `Edge.overridable` is set, else `Edge.color`.
	pub fn color<'b>(&'b self, config: &'b Config) -> &'b str {
		match &self.edge.data.color {
			Some(color) if config.edge.overridable => color,
			_ => &config.edge.color,
		}
	}

	/// Own stroke width while `Edge.overridable` is set, else `Edge.lineWidth`.
	pub fn line_width(&self, config: &Config) -> f64 {
		match self.edge.data.line_width {
			Some(width) if config.edge.overridable => width,
			_ => config.edge.line_width,
		}
	}
}

/// Insertion-ordered node and edge store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
	nodes: Vec<Node>,
	index: HashMap<NodeId, usize>,
	edges: Vec<Edge>,
}

impl Graph {
	/// An empty graph.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds `node`, or returns the node already stored under the same id.
	pub fn add_node(&mut self, node: Node) -> &mut Node {
		let idx = match self.index.get(&node.id) {
			Some(&idx) => idx,
			None => {
				self.index.insert(node.id.clone(), self.nodes.len());
				self.nodes.push(node);
				self.nodes.len() - 1
			}
		};
		&mut self.nodes[idx]
	}

	/// Adds `edge`, or returns the edge already joining the same two nodes.
	pub fn add_edge(&mut self, edge: Edge) -> Result<&mut Edge> {
		for id in [&edge.from, &edge.to] {
			if !self.index.contains_key(id) {
				return Err(TimeGraphError::UnknownNode(id.clone()));
			}
		}
		let idx = match self.edges.iter().position(|e| e.connects(&edge.from, &edge.to)) {
			Some(idx) => idx,
			None => {
				self.edges.push(edge);
				self.edges.len() - 1
			}
		};
		Ok(&mut self.edges[idx])
	}

	/// Looks up a node.
	pub fn node(&self, id: &NodeId) -> Option<&Node> {
		self.index.get(id).map(|&idx| &self.nodes[idx])
	}

	/// Looks up a node for editing.
	pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
		self.index.get(id).map(|&idx| &mut self.nodes[idx])
	}

	/// The edge joining `from` and `to`, in either order.
	pub fn edge(&self, from: &NodeId, to: &NodeId) -> Option<&Edge> {
		self.edges.iter().find(|e| e.connects(from, to))
	}

	/// Removes a node together with every edge touching it.
	pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
		let idx = self.index.remove(id)?;
		let node = self.nodes.remove(idx);
		for slot in self.index.values_mut() {
			if *slot > idx {
				*slot -= 1;
			}
		}
		self.edges.retain(|e| &e.from != id && &e.to != id);
		Some(node)
	}

	/// Removes the edge joining `from` and `to`, in either order.
	pub fn remove_edge(&mut self, from: &NodeId, to: &NodeId) -> Option<Edge> {
		let idx = self.edges.iter().position(|e| e.connects(from, to))?;
		Some(self.edges.remove(idx))
	}

	/// All nodes in insertion order.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// All nodes, mutable, in insertion order.
	pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
		self.nodes.iter_mut()
	}

	/// All edges in insertion order.
	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	/// Resolves both endpoints of `edge`.
	pub fn endpoints<'a>(&'a self, edge: &'a Edge) -> Option<EdgeView<'a>> {
		Some(EdgeView {
			edge,
			from: self.node(&edge.from)?,
			to: self.node(&edge.to)?,
		})
	}

	/// Visible nodes in insertion order.
	pub fn visible_nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
		self.nodes.iter().filter(|n| n.is_visible())
	}

	/// Edges whose two endpoints are both visible.
	pub fn visible_edges(&self) -> impl DoubleEndedIterator<Item = EdgeView<'_>> {
		self.edges
			.iter()
			.filter_map(|e| self.endpoints(e))
			.filter(|view| view.from.is_visible() && view.to.is_visible())
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Whether there are no nodes.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}
