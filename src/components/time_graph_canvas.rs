use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size, Vec2};
use leptos::prelude::*;
use log::{error, info};
use web_sys::{Element, HtmlCanvasElement, MouseEvent, WheelEvent};

use crate::time_graph::web::{DomLabelHost, canvas_surface};
use crate::time_graph::{Config, Controller, Graph, LabelElement, LabelHost, LabelType, Node, TimeGraph};

const LABEL_CONTAINER_ID: &str = "time-graph-label";

/// Canvas plus label overlay hosting a [`TimeGraph`].
///
/// Positions in `graph` are taken as-is; compute them before handing the
/// graph over. The canvas origin is moved to the top-left corner so model
/// coordinates read as pixels at zoom 1.
#[component]
pub fn TimeGraphCanvas(
	/// Positioned nodes and edges to draw.
	#[prop(into)]
	graph: Signal<Graph>,
	/// Chart options; defaults when omitted.
	#[prop(optional)]
	config: Option<Config>,
	/// Canvas width in px.
	#[prop(default = 800.0)]
	width: f64,
	/// Canvas height in px.
	#[prop(default = 600.0)]
	height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let label_ref = NodeRef::<leptos::html::Div>::new();
	let viz: Rc<RefCell<Option<TimeGraph>>> = Rc::new(RefCell::new(None));
	let hovered = RwSignal::new(None::<String>);
	let config = config.unwrap_or_default();
	let svg_labels = config.label.label_type == LabelType::Svg;

	let viz_init = viz.clone();
	Effect::new(move |_| {
		let (Some(canvas), Some(labels)) = (canvas_ref.get(), label_ref.get()) else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas;
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);

		let mut surface = match canvas_surface(&canvas) {
			Ok(surface) => surface,
			Err(err) => {
				error!("cannot plot: {err}");
				return;
			}
		};
		surface.resize(Size::new(width, height));
		surface.translate(Vec2::new(-width / 2.0, -height / 2.0));

		let host = match build_host(labels.into(), svg_labels) {
			Ok(host) => host,
			Err(err) => {
				error!("cannot create label host: {err}");
				return;
			}
		};
		let controller = Controller::new().on_place_label(|tag: &dyn LabelElement, node: &Node| {
			let _ = tag.set_style("text-align", "center");
			let _ = tag.set_style("line-height", "2em");
			let _ = tag.set_attribute("title", &node.name);
		});

		let built = TimeGraph::new(config.clone(), surface, Some(host), controller)
			.map(|viz| viz.with_graph(graph.get()));
		match built {
			Ok(mut built) => {
				if let Err(err) = built.refresh() {
					error!("plot failed: {err}");
				}
				info!("time graph mounted with {} nodes", built.graph().len());
				*viz_init.borrow_mut() = Some(built);
			}
			Err(err) => error!("cannot build time graph: {err}"),
		}
	});

	let viz_mm = viz.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let rect = canvas.get_bounding_client_rect();
		let pixel = Point::new(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref viz) = *viz_mm.borrow() {
			let name = viz
				.hit_test_pixel(pixel)
				.and_then(|hit| hit.node())
				.map(|node| node.name.clone());
			hovered.set(name);
		}
	};

	let viz_wh = viz.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(ref mut viz) = *viz_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			viz.surface_mut().scale(factor, factor);
			if let Err(err) = viz.plot() {
				error!("plot failed: {err}");
			}
		}
	};

	view! {
		<div class="time-graph" style=format!("position: relative; width: {width}px; height: {height}px;")>
			<canvas
				node_ref=canvas_ref
				class="time-graph-canvas"
				on:mousemove=on_mousemove
				on:wheel=on_wheel
				style="display: block;"
			/>
			<div
				node_ref=label_ref
				id=LABEL_CONTAINER_ID
				style="position: absolute; top: 0; left: 0; width: 100%; height: 100%; pointer-events: none;"
			/>
			<p class="time-graph-hover">{move || hovered.get().unwrap_or_default()}</p>
		</div>
	}
}

/// HTML labels go straight into the overlay div; SVG labels get an `<svg>`
/// child to live in.
fn build_host(container: Element, svg: bool) -> crate::time_graph::Result<Box<dyn LabelHost>> {
	let document = container
		.owner_document()
		.ok_or_else(|| crate::time_graph::TimeGraphError::Host("label container is detached".into()))?;
	if !svg {
		return Ok(Box::new(DomLabelHost::new(document, container)));
	}
	let host_error = |err| crate::time_graph::TimeGraphError::Host(format!("{err:?}"));
	let svg_root = document
		.create_element_ns(Some("http://www.w3.org/2000/svg"), "svg")
		.map_err(host_error)?;
	svg_root.set_attribute("width", "100%").map_err(host_error)?;
	svg_root.set_attribute("height", "100%").map_err(host_error)?;
	container.append_child(&svg_root).map_err(host_error)?;
	Ok(Box::new(DomLabelHost::new(document, svg_root)))
}
