//! Node and edge shape registries.
//!
//! A registry maps a type name to something that can draw an entity and
//! answer whether a point falls on it. New shapes are added by registering
//! them; the plot engine only ever calls [`ShapeRegistry::resolve`].
//!
//! ```
//! use time_graph::{Config, DrawContext, Node, NodeTypes};
//! use time_graph::geometry::{FillMode, rectangle};
//!
//! let mut types = NodeTypes::default();
//! types.register_fn(
//! 	"outlined",
//! 	|node: &Node, _: &Config, ctx: &mut dyn DrawContext| {
//! 		rectangle::render(FillMode::Stroke, node.center(), node.width(), node.height(), ctx)
//! 	},
//! 	|node: &Node, pos, _: &Config| {
//! 		rectangle::contains(node.center(), pos, node.width(), node.height())
//! 	},
//! );
//! assert!(types.is_registered("outlined"));
//! ```

use std::collections::HashMap;

use kurbo::Point;
use log::debug;

use super::config::Config;
use super::geometry::{FillMode, arrow, line, rectangle};
use super::surface::DrawContext;
use super::types::{EdgeView, Node};

/// Draws a node and tests points against it.
pub trait NodeShape {
	/// Draws `node` in model coordinates.
	fn render(&self, node: &Node, config: &Config, ctx: &mut dyn DrawContext);

	fn contains(&self, _node: &Node, _point: Point, _config: &Config) -> bool {
		false
	}
}

/// Draws an edge and tests points against it.
pub trait EdgeShape {
	/// Draws `edge` between its endpoints' centers.
	fn render(&self, edge: &EdgeView<'_>, config: &Config, ctx: &mut dyn DrawContext);

	fn contains(&self, _edge: &EdgeView<'_>, _point: Point, _config: &Config) -> bool {
		false
	}
}

/// Named shapes with a shared no-op fallback for unknown names.
pub struct ShapeRegistry<S: ?Sized> {
	entries: HashMap<String, Box<S>>,
	fallback: Box<S>,
}

/// Node shapes by type name.
pub type NodeTypes = ShapeRegistry<dyn NodeShape>;
/// Edge shapes by type name.
pub type EdgeTypes = ShapeRegistry<dyn EdgeShape>;

impl<S: ?Sized> ShapeRegistry<S> {
	fn with_fallback(fallback: Box<S>) -> Self {
		Self {
			entries: HashMap::new(),
			fallback,
		}
	}

	/// Adds `shape` under `name`, handing back whatever it replaced.
	pub fn register(&mut self, name: impl Into<String>, shape: Box<S>) -> Option<Box<S>> {
		self.entries.insert(name.into(), shape)
	}

	/// Removes `name`; later lookups fall back to the no-op shape.
	pub fn unregister(&mut self, name: &str) -> Option<Box<S>> {
		self.entries.remove(name)
	}

	/// Whether `name` has its own entry.
	pub fn is_registered(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Unknown names resolve to a shape that draws nothing and contains
	/// nothing.
	pub fn resolve(&self, name: &str) -> &S {
		match self.entries.get(name) {
			Some(shape) => shape.as_ref(),
			None => {
				debug!("no shape registered as {name:?}, skipping");
				self.fallback.as_ref()
			}
		}
	}

	/// Registered type names, in no particular order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}
}

impl ShapeRegistry<dyn NodeShape> {
	/// Registers a shape made of two closures.
	pub fn register_fn<R, C>(&mut self, name: impl Into<String>, render: R, contains: C)
	where
		R: Fn(&Node, &Config, &mut dyn DrawContext) + 'static,
		C: Fn(&Node, Point, &Config) -> bool + 'static,
	{
		self.register(name, Box::new(FnShape { render, contains }));
	}
}

impl ShapeRegistry<dyn EdgeShape> {
	/// Registers a shape made of two closures.
	pub fn register_fn<R, C>(&mut self, name: impl Into<String>, render: R, contains: C)
	where
		R: Fn(&EdgeView<'_>, &Config, &mut dyn DrawContext) + 'static,
		C: Fn(&EdgeView<'_>, Point, &Config) -> bool + 'static,
	{
		self.register(name, Box::new(FnShape { render, contains }));
	}
}

impl Default for ShapeRegistry<dyn NodeShape> {
	fn default() -> Self {
		let mut types = Self::with_fallback(Box::new(NoShape));
		types.register("none", Box::new(NoShape));
		types.register("rectangle", Box::new(Rectangle));
		types
	}
}

impl Default for ShapeRegistry<dyn EdgeShape> {
	fn default() -> Self {
		let mut types = Self::with_fallback(Box::new(NoShape));
		types.register("none", Box::new(NoShape));
		types.register("line", Box::new(Line));
		types.register("arrow", Box::new(Arrow));
		types
	}
}

struct FnShape<R, C> {
	render: R,
	contains: C,
}

impl<R, C> NodeShape for FnShape<R, C>
where
	R: Fn(&Node, &Config, &mut dyn DrawContext),
	C: Fn(&Node, Point, &Config) -> bool,
{
	fn render(&self, node: &Node, config: &Config, ctx: &mut dyn DrawContext) {
		(self.render)(node, config, ctx);
	}

	fn contains(&self, node: &Node, point: Point, config: &Config) -> bool {
		(self.contains)(node, point, config)
	}
}

impl<R, C> EdgeShape for FnShape<R, C>
where
	R: Fn(&EdgeView<'_>, &Config, &mut dyn DrawContext),
	C: Fn(&EdgeView<'_>, Point, &Config) -> bool,
{
	fn render(&self, edge: &EdgeView<'_>, config: &Config, ctx: &mut dyn DrawContext) {
		(self.render)(edge, config, ctx);
	}

	fn contains(&self, edge: &EdgeView<'_>, point: Point, config: &Config) -> bool {
		(self.contains)(edge, point, config)
	}
}

struct NoShape;

impl NodeShape for NoShape {
	fn render(&self, _: &Node, _: &Config, _: &mut dyn DrawContext) {}
}

impl EdgeShape for NoShape {
	fn render(&self, _: &EdgeView<'_>, _: &Config, _: &mut dyn DrawContext) {}
}

/// Filled box anchored at the node's top-left corner. The drawn box shrinks
/// by `nodeOffsetWidth`/`nodeOffsetHeight`; the hit box keeps the full size.
struct Rectangle;

impl NodeShape for Rectangle {
	fn render(&self, node: &Node, config: &Config, ctx: &mut dyn DrawContext) {
		rectangle::render(
			FillMode::Fill,
			node.center(),
			node.width() - config.node_offset_width,
			node.height() - config.node_offset_height,
			ctx,
		);
	}

	fn contains(&self, node: &Node, point: Point, _: &Config) -> bool {
		rectangle::contains(node.center(), point, node.width(), node.height())
	}
}

/// Straight segment between the two endpoint centers.
struct Line;

impl EdgeShape for Line {
	fn render(&self, edge: &EdgeView<'_>, _: &Config, ctx: &mut dyn DrawContext) {
		line::render(edge.from.center(), edge.to.center(), ctx);
	}

	fn contains(&self, edge: &EdgeView<'_>, point: Point, config: &Config) -> bool {
		line::contains(edge.from.center(), edge.to.center(), point, edge.epsilon(config))
	}
}

struct Arrow;

impl EdgeShape for Arrow {
	fn render(&self, edge: &EdgeView<'_>, config: &Config, ctx: &mut dyn DrawContext) {
		arrow::render(
			edge.from.center(),
			edge.to.center(),
			edge.dim(config),
			edge.is_inverted(),
			ctx,
		);
	}

	fn contains(&self, edge: &EdgeView<'_>, point: Point, config: &Config) -> bool {
		arrow::contains(edge.from.center(), edge.to.center(), point, edge.epsilon(config))
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use kurbo::Rect;

	use super::*;
	use crate::time_graph::surface::{DrawCommand, Recorder};
	use crate::time_graph::types::{Edge, Graph};

	fn node(id: &str, x: f64, y: f64) -> Node {
		Node::new(id, id).with_pos(x, y).with_size(10.0, 4.0)
	}

	#[test]
	fn rectangle_is_anchored_top_left_and_shrinks_by_offset() {
		let config = Config {
			node_offset_width: 2.0,
			node_offset_height: 2.0,
			..Config::default()
		};
		let n = node("a", 0.0, 0.0);
		let mut rec = Recorder::new();
		NodeTypes::default()
			.resolve("rectangle")
			.render(&n, &config, &mut rec);
		assert_eq!(
			rec.commands(),
			vec![DrawCommand::FillRect(Rect::new(1.0, 1.0, 9.0, 3.0))]
		);
	}

	#[test]
	fn rectangle_hit_box_is_the_full_node() {
		let types = NodeTypes::default();
		let rect = types.resolve("rectangle");
		let config = Config::default();
		let n = node("a", 100.0, 50.0);
		assert!(rect.contains(&n, Point::new(100.0, 50.0), &config));
		assert!(rect.contains(&n, Point::new(110.0, 54.0), &config));
		assert!(rect.contains(&n, Point::new(105.0, 52.0), &config));
		assert!(!rect.contains(&n, Point::new(99.9, 52.0), &config));
		assert!(!rect.contains(&n, Point::new(105.0, 54.1), &config));
	}

	#[test]
	fn unregistered_names_do_nothing() {
		let types = NodeTypes::default();
		let config = Config::default();
		let n = node("a", 0.0, 0.0);
		let mut rec = Recorder::new();
		for name in ["none", "hexagon", ""] {
			let shape = types.resolve(name);
			shape.render(&n, &config, &mut rec);
			assert!(!shape.contains(&n, n.center(), &config));
		}
		assert!(rec.is_empty());
	}

	#[test]
	fn registered_fn_shape_is_the_one_called() {
		let renders = Rc::new(Cell::new(0));
		let hits = Rc::new(Cell::new(0));
		let mut types = NodeTypes::default();
		let (r, h) = (renders.clone(), hits.clone());
		types.register_fn(
			"dot",
			move |_: &Node, _: &Config, _: &mut dyn DrawContext| r.set(r.get() + 1),
			move |_: &Node, _, _: &Config| {
				h.set(h.get() + 1);
				true
			},
		);
		let config = Config::default();
		let n = node("a", 0.0, 0.0);
		let mut rec = Recorder::new();
		let shape = types.resolve("dot");
		shape.render(&n, &config, &mut rec);
		assert!(shape.contains(&n, Point::new(1e6, 1e6), &config));
		assert_eq!((renders.get(), hits.get()), (1, 1));
		assert!(rec.is_empty());
	}

	#[test]
	fn register_overwrites_and_unregister_falls_back() {
		let mut types = NodeTypes::default();
		assert!(types.register("rectangle", Box::new(NoShape)).is_some());
		let config = Config::default();
		let n = node("a", 0.0, 0.0);
		assert!(!types.resolve("rectangle").contains(&n, n.center(), &config));
		assert!(types.unregister("rectangle").is_some());
		assert!(!types.is_registered("rectangle"));
		let mut names: Vec<_> = types.names().collect();
		names.sort_unstable();
		assert_eq!(names, vec!["none"]);
	}

	fn two_nodes() -> Graph {
		let mut graph = Graph::new();
		graph.add_node(Node::new("a", "a").with_pos(0.0, 0.0).with_size(10.0, 10.0));
		graph.add_node(Node::new("b", "b").with_pos(100.0, 0.0).with_size(10.0, 10.0));
		graph
	}

	#[test]
	fn line_joins_endpoint_centers() {
		let graph = two_nodes();
		let edge = Edge::new("a", "b");
		let view = graph.endpoints(&edge).unwrap();
		let types = EdgeTypes::default();
		let config = Config::default();
		let mut rec = Recorder::new();
		types.resolve("line").render(&view, &config, &mut rec);
		assert_eq!(rec.commands()[1], DrawCommand::MoveTo(Point::new(5.0, 5.0)));
		assert_eq!(rec.commands()[2], DrawCommand::LineTo(Point::new(105.0, 5.0)));

		let line = types.resolve("line");
		assert!(line.contains(&view, Point::new(50.0, 11.0), &config));
		assert!(!line.contains(&view, Point::new(50.0, 13.0), &config));
		assert!(!line.contains(&view, Point::new(110.0, 5.0), &config));
	}

	#[test]
	fn arrow_inverts_when_direction_disagrees() {
		let graph = two_nodes();
		let config = Config::default();
		let types = EdgeTypes::default();

		let forward = Edge::new("a", "b").with_direction("a", "b");
		let mut rec = Recorder::new();
		types
			.resolve("arrow")
			.render(&graph.endpoints(&forward).unwrap(), &config, &mut rec);
		assert_eq!(rec.take()[7], DrawCommand::LineTo(Point::new(105.0, 5.0)));

		let backward = Edge::new("a", "b").with_direction("b", "a");
		types
			.resolve("arrow")
			.render(&graph.endpoints(&backward).unwrap(), &config, &mut rec);
		assert_eq!(rec.take()[7], DrawCommand::LineTo(Point::new(5.0, 5.0)));
	}

	#[test]
	fn arrow_uses_edge_dim_and_epsilon_overrides() {
		let graph = two_nodes();
		let config = Config::default();
		let mut edge = Edge::new("a", "b");
		edge.data.dim = Some(10.0);
		edge.data.epsilon = Some(0.5);
		let view = graph.endpoints(&edge).unwrap();
		let types = EdgeTypes::default();
		let arrow = types.resolve("arrow");

		let mut rec = Recorder::new();
		arrow.render(&view, &config, &mut rec);
		assert_eq!(rec.commands()[5], DrawCommand::MoveTo(Point::new(95.0, 10.0)));
		assert!(arrow.contains(&view, Point::new(50.0, 5.4), &config));
		assert!(!arrow.contains(&view, Point::new(50.0, 6.0), &config));
	}

	#[test]
	fn degenerate_edge_renders_nothing() {
		let mut graph = Graph::new();
		graph.add_node(Node::new("a", "a").with_pos(3.0, 3.0));
		graph.add_node(Node::new("b", "b").with_pos(3.0, 3.0));
		let edge = Edge::new("a", "b");
		let view = graph.endpoints(&edge).unwrap();
		let config = Config::default();
		let types = EdgeTypes::default();
		let mut rec = Recorder::new();
		for name in ["line", "arrow"] {
			let shape = types.resolve(name);
			shape.render(&view, &config, &mut rec);
			assert!(!shape.contains(&view, Point::new(3.0, 3.0), &config));
			assert!(!shape.contains(&view, Point::new(4.0, 3.0), &config));
		}
		assert!(rec.is_empty());
	}
}
