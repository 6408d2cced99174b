//! Browser bindings: the canvas 2D context as a [`DrawContext`] and a DOM
//! container as a [`LabelHost`].

use kurbo::{Affine, Point, Rect, Size};
use log::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
	CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, SvgElement,
};

use super::error::{LabelError, Result, TimeGraphError};
use super::label::{ElementKind, LabelElement, LabelHost};
use super::surface::{DrawContext, Surface};
use super::types::NodeId;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

fn js_error(err: JsValue) -> LabelError {
	LabelError::Host(format!("{err:?}"))
}

// Fully qualified calls: the inherent methods share these names.
impl DrawContext for CanvasRenderingContext2d {
	fn save(&mut self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&mut self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn set_transform(&mut self, transform: Affine) {
		let [a, b, c, d, e, f] = transform.as_coeffs();
		if let Err(err) = CanvasRenderingContext2d::set_transform(self, a, b, c, d, e, f) {
			warn!("canvas rejected transform: {err:?}");
		}
	}

	fn clear_rect(&mut self, rect: Rect) {
		CanvasRenderingContext2d::clear_rect(self, rect.x0, rect.y0, rect.width(), rect.height());
	}

	fn fill_rect(&mut self, rect: Rect) {
		CanvasRenderingContext2d::fill_rect(self, rect.x0, rect.y0, rect.width(), rect.height());
	}

	fn stroke_rect(&mut self, rect: Rect) {
		CanvasRenderingContext2d::stroke_rect(self, rect.x0, rect.y0, rect.width(), rect.height());
	}

	fn begin_path(&mut self) {
		CanvasRenderingContext2d::begin_path(self);
	}

	fn move_to(&mut self, p: Point) {
		CanvasRenderingContext2d::move_to(self, p.x, p.y);
	}

	fn line_to(&mut self, p: Point) {
		CanvasRenderingContext2d::line_to(self, p.x, p.y);
	}

	fn close_path(&mut self) {
		CanvasRenderingContext2d::close_path(self);
	}

	fn fill(&mut self) {
		CanvasRenderingContext2d::fill(self);
	}

	fn stroke(&mut self) {
		CanvasRenderingContext2d::stroke(self);
	}

	fn fill_text(&mut self, text: &str, at: Point) {
		let _ = CanvasRenderingContext2d::fill_text(self, text, at.x, at.y);
	}

	fn set_fill_style(&mut self, style: &str) {
		self.set_fill_style_str(style);
	}

	fn set_stroke_style(&mut self, style: &str) {
		self.set_stroke_style_str(style);
	}

	fn set_line_width(&mut self, width: f64) {
		CanvasRenderingContext2d::set_line_width(self, width);
	}

	fn set_font(&mut self, font: &str) {
		CanvasRenderingContext2d::set_font(self, font);
	}

	fn set_text_align(&mut self, align: &str) {
		CanvasRenderingContext2d::set_text_align(self, align);
	}

	fn set_text_baseline(&mut self, baseline: &str) {
		CanvasRenderingContext2d::set_text_baseline(self, baseline);
	}
}

/// Wraps a canvas element's 2D context in a [`Surface`] of the canvas size.
pub fn canvas_surface(canvas: &HtmlCanvasElement) -> Result<Surface> {
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(|err| TimeGraphError::Host(format!("{err:?}")))?
		.ok_or_else(|| TimeGraphError::Host("canvas has no 2d context".into()))?
		.dyn_into()
		.map_err(|_| TimeGraphError::Host("2d context has an unexpected type".into()))?;
	let size = Size::new(canvas.width() as f64, canvas.height() as f64);
	Ok(Surface::new(ctx, size))
}

/// Appends label elements to a container element, typically an absolutely
/// positioned `<div>` (HTML labels) or `<svg>` (SVG labels) stacked over the
/// canvas.
pub struct DomLabelHost {
	document: Document,
	container: Element,
}

impl DomLabelHost {
	/// Labels go into `container`, created through `document`.
	pub fn new(document: Document, container: Element) -> Self {
		Self {
			document,
			container,
		}
	}

	/// Uses the element with `id` in the current document.
	pub fn from_container_id(id: &str) -> Result<Self> {
		let document = web_sys::window()
			.and_then(|w| w.document())
			.ok_or_else(|| TimeGraphError::Host("no document".into()))?;
		let container = document
			.get_element_by_id(id)
			.ok_or_else(|| TimeGraphError::Host(format!("no label container #{id}")))?;
		Ok(Self::new(document, container))
	}
}

impl LabelHost for DomLabelHost {
	fn create(&mut self, kind: ElementKind, id: &NodeId) -> std::result::Result<Box<dyn LabelElement>, LabelError> {
		let element = match kind {
			ElementKind::SvgText => self.document.create_element_ns(Some(SVG_NS), "text"),
			ElementKind::HtmlBlock => self.document.create_element("div"),
		}
		.map_err(js_error)?;
		element.set_id(id.as_str());
		element.set_class_name("node");
		let label = DomLabel { element };
		if kind == ElementKind::HtmlBlock {
			label.set_style("position", "absolute")?;
			label.set_style("overflow", "hidden")?;
		}
		self.container.append_child(&label.element).map_err(js_error)?;
		Ok(Box::new(label))
	}
}

struct DomLabel {
	element: Element,
}

impl LabelElement for DomLabel {
	fn set_attribute(&self, name: &str, value: &str) -> std::result::Result<(), LabelError> {
		self.element.set_attribute(name, value).map_err(js_error)
	}

	fn set_style(&self, property: &str, value: &str) -> std::result::Result<(), LabelError> {
		let style = if let Some(html) = self.element.dyn_ref::<HtmlElement>() {
			html.style()
		} else if let Some(svg) = self.element.dyn_ref::<SvgElement>() {
			svg.style()
		} else {
			return Err(LabelError::Host("element has no inline style".into()));
		};
		style.set_property(property, value).map_err(js_error)
	}

	fn set_text(&self, text: &str) {
		self.element.set_text_content(Some(text));
	}

	fn remove(&self) {
		self.element.remove();
	}
}
