use leptos::prelude::*;
use log::warn;
use serde_json::json;

use crate::components::time_graph_canvas::TimeGraphCanvas;
use crate::time_graph::{Config, Edge, Graph, Node};

const COLUMN: f64 = 120.0;
const ROW: f64 = 60.0;
const NODE_WIDTH: f64 = 100.0;
const NODE_HEIGHT: f64 = 40.0;

/// Milestones as (id, name, column, row).
const MILESTONES: [(&str, &str, usize, usize); 7] = [
	("plan", "Plan", 0, 1),
	("design", "Design", 1, 0),
	("spike", "Spike", 1, 2),
	("build", "Build", 2, 1),
	("test", "Test", 3, 0),
	("docs", "Docs", 3, 2),
	("ship", "Ship", 4, 1),
];

const DEPENDS: [(&str, &str); 8] = [
	("plan", "design"),
	("plan", "spike"),
	("design", "build"),
	("spike", "build"),
	("build", "test"),
	("build", "docs"),
	("test", "ship"),
	("docs", "ship"),
];

fn demo_config() -> Config {
	Config::merged([json!({
		"margin": { "top": 40, "left": 40 },
		"nodeOffsetWidth": 4,
		"nodeOffsetHeight": 4,
		"Edge": { "type": "arrow", "color": "#888" },
		"Label": { "type": "HTML" },
	})])
	.unwrap_or_else(|err| {
		warn!("demo config rejected, using defaults: {err}");
		Config::default()
	})
}

/// Sample schedule placed on a column/row grid.
fn sample_graph(config: &Config) -> Graph {
	let mut graph = Graph::new();
	for (i, (id, name, column, row)) in MILESTONES.into_iter().enumerate() {
		let mut node = Node::new(id, name)
			.with_pos(
				config.margin.left + column as f64 * COLUMN,
				config.margin.top + row as f64 * ROW,
			)
			.with_size(NODE_WIDTH, NODE_HEIGHT);
		if let Some(color) = config.palette_color(i) {
			node = node.with_color(color);
		}
		graph.add_node(node);
	}
	for (from, to) in DEPENDS {
		if let Err(err) = graph.add_edge(Edge::new(from, to).with_direction(from, to)) {
			warn!("skipping edge {from} -> {to}: {err}");
		}
	}
	graph
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = demo_config();
	let graph = Signal::derive({
		let config = config.clone();
		move || sample_graph(&config)
	});

	view! {
		<div class="time-graph-page">
			<h1>"Time Graph"</h1>
			<p class="subtitle">"Hover a milestone to see its name. Scroll to zoom."</p>
			<TimeGraphCanvas graph=graph config=config width=720.0 height=280.0 />
		</div>
	}
}

#[cfg(test)]
mod tests {
	use kurbo::{Rect, Size};

	use super::*;
	use crate::time_graph::{DrawCommand, NativeLabels, Plot, Recorder, Surface};

	#[test]
	fn demo_draws_a_box_per_milestone() {
		let config = demo_config();
		let graph = sample_graph(&config);
		assert_eq!(graph.len(), MILESTONES.len());
		assert_eq!(graph.edges().len(), DEPENDS.len());

		let recorder = Recorder::new();
		let mut surface = Surface::new(recorder.clone(), Size::new(720.0, 280.0));
		Plot::new()
			.render_all(&graph, &mut surface, &mut NativeLabels::new(), &config)
			.unwrap();
		let boxes: Vec<Rect> = recorder
			.commands()
			.into_iter()
			.filter_map(|c| match c {
				DrawCommand::FillRect(r) => Some(r),
				_ => None,
			})
			.collect();
		assert_eq!(boxes.len(), MILESTONES.len());
		assert!(boxes.iter().all(|r| r.width() == 96.0 && r.height() == 36.0));
	}
}
