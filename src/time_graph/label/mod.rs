//! Label layers.
//!
//! Each variant turns a node's model position into a position in its own
//! output (canvas text, SVG attributes or CSS box) through the same
//! [`Surface`] mapping the plot engine draws with, so labels stay glued to
//! their shapes across pans and zooms.
//!
//! Anchoring: the canvas variant centers text on the shape's bounding box.
//! The two markup variants anchor at the node's top-left corner; the box
//! variant sizes its element to cover the whole shape from there, and the
//! SVG variant uses the same anchor so both markup outputs agree. Styling
//! hooks can shift the text inside that box.

mod html;
mod native;
mod svg;

use std::collections::{HashMap, HashSet};

use kurbo::Point;

pub use html::HtmlLabels;
pub use native::NativeLabels;
pub use svg::SvgLabels;

use super::config::Config;
use super::error::LabelError;
use super::surface::Surface;
use super::types::{Node, NodeId};

/// A label layer.
///
/// Markup variants only read the surface mapping and must never change it;
/// the native variant draws through the surface's context.
pub trait LabelPlacer {
	/// Positions (creating on first sight) the label for a visible node.
	fn place(&mut self, node: &Node, surface: &mut Surface, config: &Config) -> Result<(), LabelError>;

	/// Drops the label of a node that was removed or hidden.
	fn release(&mut self, id: &NodeId);

	/// Drops every label whose node is not in `visible`.
	fn retain_visible(&mut self, visible: &HashSet<NodeId>);

	/// Drops everything; called on teardown.
	fn clear(&mut self);

	/// Number of label elements currently owned.
	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// A text element living in the host's tree.
pub trait LabelElement {
	/// Sets an attribute on the element.
	fn set_attribute(&self, name: &str, value: &str) -> Result<(), LabelError>;
	/// Sets one inline style property.
	fn set_style(&self, property: &str, value: &str) -> Result<(), LabelError>;
	/// Replaces the text content.
	fn set_text(&self, text: &str);
	/// Detaches the element from the host tree.
	fn remove(&self);
}

/// What kind of element a label lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
	/// An SVG `<text>` element.
	SvgText,
	/// An HTML `<div>` block.
	HtmlBlock,
}

/// Creates label elements inside the host's label container.
pub trait LabelHost {
	/// Creates an element for node `id` and attaches it to the container.
	fn create(&mut self, kind: ElementKind, id: &NodeId) -> Result<Box<dyn LabelElement>, LabelError>;
}

type LabelHook = Box<dyn Fn(&dyn LabelElement, &Node)>;

/// Caller hooks run by the markup label variants.
#[derive(Default)]
pub struct Controller {
	on_create_label: Option<LabelHook>,
	on_place_label: Option<LabelHook>,
}

impl Controller {
	/// No hooks.
	pub fn new() -> Self {
		Self::default()
	}

	/// Runs once per element, right after it is created.
	pub fn on_create_label(mut self, hook: impl Fn(&dyn LabelElement, &Node) + 'static) -> Self {
		self.on_create_label = Some(Box::new(hook));
		self
	}

	/// Runs after every placement, once the position has been written.
	pub fn on_place_label(mut self, hook: impl Fn(&dyn LabelElement, &Node) + 'static) -> Self {
		self.on_place_label = Some(Box::new(hook));
		self
	}

	fn created(&self, element: &dyn LabelElement, node: &Node) {
		if let Some(hook) = &self.on_create_label {
			hook(element, node);
		}
	}

	fn placed(&self, element: &dyn LabelElement, node: &Node) {
		if let Some(hook) = &self.on_place_label {
			hook(element, node);
		}
	}
}

/// Pixel anchor for the markup variants, rounded half-up like the
/// browser's own rounding of layout coordinates.
pub fn label_anchor(node: &Node, surface: &Surface) -> Point {
	let p = surface.to_pixel(node.pos);
	Point::new((p.x + 0.5).floor(), (p.y + 0.5).floor())
}

/// Element bookkeeping shared by the two markup variants.
struct Tags {
	kind: ElementKind,
	host: Box<dyn LabelHost>,
	controller: Controller,
	elements: HashMap<NodeId, Box<dyn LabelElement>>,
}

impl Tags {
	fn new(kind: ElementKind, host: Box<dyn LabelHost>, controller: Controller) -> Self {
		Self {
			kind,
			host,
			controller,
			elements: HashMap::new(),
		}
	}

	/// Looks up or creates the node's element, lets `position` write to it,
	/// then runs the placement hook.
	fn place_with<F>(&mut self, node: &Node, position: F) -> Result<(), LabelError>
	where
		F: FnOnce(&dyn LabelElement) -> Result<(), LabelError>,
	{
		if !self.elements.contains_key(&node.id) {
			let element = self.host.create(self.kind, &node.id)?;
			element.set_text(&node.name);
			self.controller.created(element.as_ref(), node);
			self.elements.insert(node.id.clone(), element);
		}
		let element = self.elements[&node.id].as_ref();
		position(element)?;
		self.controller.placed(element, node);
		Ok(())
	}

	fn release(&mut self, id: &NodeId) {
		if let Some(element) = self.elements.remove(id) {
			element.remove();
		}
	}

	fn retain_visible(&mut self, visible: &HashSet<NodeId>) {
		self.elements.retain(|id, element| {
			let keep = visible.contains(id);
			if !keep {
				element.remove();
			}
			keep
		});
	}

	fn clear(&mut self) {
		for (_, element) in self.elements.drain() {
			element.remove();
		}
	}

	fn len(&self) -> usize {
		self.elements.len()
	}
}


#[cfg(test)]
mod tests {
	use kurbo::{Size, Vec2};

	use super::*;
	use crate::time_graph::surface::{Mapping, Recorder};

	#[test]
	fn anchor_rounds_half_up() {
		let mut surface = Surface::new(Recorder::new(), Size::new(0.0, 0.0));
		surface.set_mapping(Mapping {
			translate: Vec2::new(0.5, -2.5),
			scale: Vec2::new(1.0, 1.0),
		});
		let node = Node::new("n", "n");
		assert_eq!(label_anchor(&node, &surface), Point::new(1.0, -2.0));
	}
}
