use std::collections::HashSet;

use kurbo::Point;
use log::{debug, trace, warn};

use super::config::Config;
use super::error::LabelError;
use super::label::LabelPlacer;
use super::shapes::{EdgeShape, EdgeTypes, NodeShape, NodeTypes};
use super::surface::{DrawContext, Surface};
use super::types::{Edge, EdgeView, Graph, Node, NodeId};

/// What a hit-test landed on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Hit<'g> {
	/// A visible node.
	Node(&'g Node),
	/// A visible edge.
	Edge(&'g Edge),
}

impl<'g> Hit<'g> {
	/// The node, when a node was hit.
	pub fn node(self) -> Option<&'g Node> {
		match self {
			Self::Node(node) => Some(node),
			Self::Edge(_) => None,
		}
	}

	/// The edge, when an edge was hit.
	pub fn edge(self) -> Option<&'g Edge> {
		match self {
			Self::Edge(edge) => Some(edge),
			Self::Node(_) => None,
		}
	}
}

/// Draws visible entities through the shape registries and answers
/// hit-tests against the same shapes.
#[derive(Default)]
pub struct Plot {
	node_types: NodeTypes,
	edge_types: EdgeTypes,
}

impl Plot {
	/// A plot engine with the built-in shapes registered.
	pub fn new() -> Self {
		Self::default()
	}

	/// Node shape registry.
	pub fn node_types(&self) -> &NodeTypes {
		&self.node_types
	}

	/// Mutable node shape registry.
	pub fn node_types_mut(&mut self) -> &mut NodeTypes {
		&mut self.node_types
	}

	/// Edge shape registry.
	pub fn edge_types(&self) -> &EdgeTypes {
		&self.edge_types
	}

	/// Mutable edge shape registry.
	pub fn edge_types_mut(&mut self) -> &mut EdgeTypes {
		&mut self.edge_types
	}

	/// One full frame: clear, load the model transform, draw edges, then
	/// nodes on top with their labels, then drop labels of nodes that are no
	/// longer visible.
	///
	/// Positions must be final before this runs; it never writes to the
	/// graph. A label host failure does not stop the frame; the first error
	/// is returned once every shape is drawn and stale labels are released.
	pub fn render_all(
		&self,
		graph: &Graph,
		surface: &mut Surface,
		labels: &mut dyn LabelPlacer,
		config: &Config,
	) -> Result<(), LabelError> {
		surface.clear();
		surface.prepare();

		let mut edges = 0;
		for edge in graph.visible_edges() {
			self.plot_edge(&edge, config, surface.ctx_mut());
			edges += 1;
		}

		let mut visible = HashSet::new();
		let mut failed = None;
		for node in graph.visible_nodes() {
			self.plot_node(node, config, surface.ctx_mut());
			if let Err(err) = labels.place(node, surface, config) {
				warn!("label for {} not placed: {err}", node.id);
				failed.get_or_insert(err);
			}
			visible.insert(node.id.clone());
		}
		labels.retain_visible(&visible);

		debug!("plotted {} nodes, {edges} edges", visible.len());
		failed.map_or(Ok(()), Err)
	}

	/// Sets the node's colours and line width, then draws its shape.
	pub fn plot_node(&self, node: &Node, config: &Config, ctx: &mut dyn DrawContext) {
		let color = node.color(config);
		ctx.set_fill_style(color);
		ctx.set_stroke_style(color);
		ctx.set_line_width(node.line_width(config));
		self.node_shape(node, config).render(node, config, ctx);
	}

	/// Sets the edge's colours and line width, then draws its shape.
	pub fn plot_edge(&self, edge: &EdgeView<'_>, config: &Config, ctx: &mut dyn DrawContext) {
		let color = edge.color(config);
		ctx.set_fill_style(color);
		ctx.set_stroke_style(color);
		ctx.set_line_width(edge.line_width(config));
		self.edge_shape(edge, config).render(edge, config, ctx);
	}

	/// Topmost drawn wins: nodes are checked before edges, each in reverse
	/// draw order, and the first shape containing `point` is returned.
	pub fn hit_test<'g>(&self, graph: &'g Graph, point: Point, config: &Config) -> Option<Hit<'g>> {
		let hit = graph
			.visible_nodes()
			.rev()
			.find(|node| self.node_shape(node, config).contains(node, point, config))
			.map(Hit::Node)
			.or_else(|| {
				graph
					.visible_edges()
					.rev()
					.find(|edge| self.edge_shape(edge, config).contains(edge, point, config))
					.map(|edge| Hit::Edge(edge.edge))
			});
		trace!("hit test at {point:?}: {hit:?}");
		hit
	}

	/// Hit-test at a surface pixel, mapped back through the surface.
	pub fn hit_test_pixel<'g>(
		&self,
		graph: &'g Graph,
		surface: &Surface,
		pixel: Point,
		config: &Config,
	) -> Option<Hit<'g>> {
		let point = surface.to_model(pixel)?;
		self.hit_test(graph, point, config)
	}

	/// Ids of the visible nodes whose shape contains `point`, topmost first.
	pub fn nodes_at(&self, graph: &Graph, point: Point, config: &Config) -> Vec<NodeId> {
		graph
			.visible_nodes()
			.rev()
			.filter(|node| self.node_shape(node, config).contains(node, point, config))
			.map(|node| node.id.clone())
			.collect()
	}

	fn node_shape(&self, node: &Node, config: &Config) -> &dyn NodeShape {
		self.node_types.resolve(node.type_name(config))
	}

	fn edge_shape(&self, edge: &EdgeView<'_>, config: &Config) -> &dyn EdgeShape {
		self.edge_types.resolve(edge.edge.type_name(config))
	}
}
