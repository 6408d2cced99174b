//! A node/edge chart laid out on a fixed grid.
//!
//! [`TimeGraph`] wires a [`Config`], a [`Surface`], the [`Graph`] store, a
//! label layer and the [`Plot`] engine together. Positions come from an
//! external [`Layout`]; this module only draws and hit-tests them.
//!
//! `refresh` and `plot` run to completion on the calling thread and must not
//! be re-entered from inside a shape or label hook.

mod config;
mod error;
pub mod geometry;
mod label;
mod plot;
mod shapes;
mod surface;
mod types;
pub mod web;

pub use config::{Config, DEFAULT_COLORS, EdgeConfig, LabelConfig, LabelType, Margin, NodeConfig};
pub use error::{ConfigError, LabelError, Result, TimeGraphError};
pub use label::{
	Controller, ElementKind, HtmlLabels, LabelElement, LabelHost, LabelPlacer, NativeLabels,
	SvgLabels, label_anchor,
};
pub use plot::{Hit, Plot};
pub use shapes::{EdgeShape, EdgeTypes, NodeShape, NodeTypes, ShapeRegistry};
pub use surface::{DrawCommand, DrawContext, Mapping, Recorder, Surface};
pub use types::{Edge, EdgeData, EdgeView, Graph, Node, NodeData, NodeId};

use kurbo::Point;
use log::info;

/// Assigns node positions before each plot.
pub trait Layout {
	/// Writes positions into `graph` for the next plot.
	fn compute(&mut self, graph: &mut Graph, config: &Config);
}

impl<F> Layout for F
where
	F: FnMut(&mut Graph, &Config),
{
	fn compute(&mut self, graph: &mut Graph, config: &Config) {
		self(graph, config);
	}
}

/// The chart: options, surface, graph, label layer and shape registries.
pub struct TimeGraph {
	config: Config,
	surface: Surface,
	graph: Graph,
	labels: Box<dyn LabelPlacer>,
	fx: Plot,
	layout: Option<Box<dyn Layout>>,
}

impl TimeGraph {
	/// Builds the label layer matching `config.label.label_type`. The SVG
	/// and HTML layers need a `host` to create their elements in.
	pub fn new(
		config: Config,
		surface: Surface,
		host: Option<Box<dyn LabelHost>>,
		controller: Controller,
	) -> Result<Self> {
		let labels: Box<dyn LabelPlacer> = match (config.label.label_type, host) {
			(LabelType::Native, _) => Box::new(NativeLabels::new()),
			(LabelType::Svg, Some(host)) => Box::new(SvgLabels::new(host, controller)),
			(LabelType::Html, Some(host)) => Box::new(HtmlLabels::new(host, controller)),
			(kind, None) => return Err(TimeGraphError::MissingLabelHost(kind)),
		};
		info!(
			"time graph ready: {:?} labels, {}x{} surface",
			config.label.label_type,
			surface.size().width,
			surface.size().height
		);
		Ok(Self {
			config,
			surface,
			graph: Graph::new(),
			labels,
			fx: Plot::new(),
			layout: None,
		})
	}

	/// Like [`TimeGraph::new`], with the options given as a JSON object
	/// merged over the defaults.
	pub fn from_json(
		json: &str,
		surface: Surface,
		host: Option<Box<dyn LabelHost>>,
		controller: Controller,
	) -> Result<Self> {
		let config = Config::from_json(json)?;
		Self::new(config, surface, host, controller)
	}

	/// Sets the layout run by [`TimeGraph::refresh`].
	pub fn with_layout(mut self, layout: impl Layout + 'static) -> Self {
		self.layout = Some(Box::new(layout));
		self
	}

	/// Replaces the graph.
	pub fn with_graph(mut self, graph: Graph) -> Self {
		self.graph = graph;
		self
	}

	/// Runs the layout, then plots.
	pub fn refresh(&mut self) -> Result<()> {
		if let Some(layout) = self.layout.as_mut() {
			layout.compute(&mut self.graph, &self.config);
		}
		self.plot()
	}

	/// Draws the current positions and repositions every label.
	pub fn plot(&mut self) -> Result<()> {
		self.fx
			.render_all(&self.graph, &mut self.surface, self.labels.as_mut(), &self.config)?;
		Ok(())
	}

	/// Hit-test in model coordinates.
	pub fn hit_test(&self, point: Point) -> Option<Hit<'_>> {
		self.fx.hit_test(&self.graph, point, &self.config)
	}

	/// Hit-test at a surface pixel.
	pub fn hit_test_pixel(&self, pixel: Point) -> Option<Hit<'_>> {
		self.fx
			.hit_test_pixel(&self.graph, &self.surface, pixel, &self.config)
	}

	/// The options this chart was built with.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// The graph being drawn.
	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	/// Mutable access to the graph; changes show on the next plot.
	pub fn graph_mut(&mut self) -> &mut Graph {
		&mut self.graph
	}

	/// The drawing surface.
	pub fn surface(&self) -> &Surface {
		&self.surface
	}

	/// Mutable access to the surface, e.g. to pan or zoom.
	pub fn surface_mut(&mut self) -> &mut Surface {
		&mut self.surface
	}

	/// The active label layer.
	pub fn labels(&self) -> &dyn LabelPlacer {
		self.labels.as_ref()
	}

	/// Node shape registry.
	pub fn node_types_mut(&mut self) -> &mut NodeTypes {
		self.fx.node_types_mut()
	}

	/// Edge shape registry.
	pub fn edge_types_mut(&mut self) -> &mut EdgeTypes {
		self.fx.edge_types_mut()
	}

	/// Removes a node, its edges and its label element.
	pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
		self.labels.release(id);
		self.graph.remove_node(id)
	}

	/// Releases every label element. Also runs on drop.
	pub fn teardown(&mut self) {
		self.labels.clear();
	}
}

impl Drop for TimeGraph {
	fn drop(&mut self) {
		self.teardown();
	}
}
