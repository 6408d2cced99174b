use std::collections::HashSet;

use super::{Controller, ElementKind, LabelHost, LabelPlacer, Tags, label_anchor};
use crate::time_graph::config::Config;
use crate::time_graph::error::LabelError;
use crate::time_graph::surface::Surface;
use crate::time_graph::types::{Node, NodeId};

/// One SVG `<text>` element per node, positioned through its `x`/`y`
/// attributes at the node's pixel anchor.
pub struct SvgLabels {
	tags: Tags,
}

impl SvgLabels {
	/// Builds the layer over `host`; elements are created on first placement.
	pub fn new(host: Box<dyn LabelHost>, controller: Controller) -> Self {
		Self {
			tags: Tags::new(ElementKind::SvgText, host, controller),
		}
	}
}

impl LabelPlacer for SvgLabels {
	fn place(&mut self, node: &Node, surface: &mut Surface, _: &Config) -> Result<(), LabelError> {
		let anchor = label_anchor(node, surface);
		self.tags.place_with(node, |tag| {
			tag.set_attribute("x", &(anchor.x as i64).to_string())?;
			tag.set_attribute("y", &(anchor.y as i64).to_string())
		})
	}

	fn release(&mut self, id: &NodeId) {
		self.tags.release(id);
	}

	fn retain_visible(&mut self, visible: &HashSet<NodeId>) {
		self.tags.retain_visible(visible);
	}

	fn clear(&mut self) {
		self.tags.clear();
	}

	fn len(&self) -> usize {
		self.tags.len()
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use kurbo::{Size, Vec2};

	use super::*;
	use crate::time_graph::label::LabelElement;
	use crate::time_graph::label::testing::{BrokenHost, MemoryHost};
	use crate::time_graph::surface::{Mapping, Recorder};

	fn surface() -> Surface {
		let mut surface = Surface::new(Recorder::new(), Size::new(100.0, 50.0));
		surface.set_mapping(Mapping {
			translate: Vec2::new(10.0, 20.0),
			scale: Vec2::new(2.0, 2.0),
		});
		surface
	}

	#[test]
	fn places_text_at_the_mapped_anchor() {
		let host = MemoryHost::default();
		let placed = Rc::new(Cell::new(0));
		let counter = placed.clone();
		let controller = Controller::new().on_place_label(move |tag: &dyn LabelElement, node: &Node| {
			counter.set(counter.get() + 1);
			tag.set_attribute("text-anchor", "start").unwrap();
			assert_eq!(node.id.as_str(), "n");
		});
		let mut labels = SvgLabels::new(Box::new(host.clone()), controller);
		let mut surface = surface();
		let node = Node::new("n", "Deploy").with_pos(5.0, 5.0).with_size(10.0, 10.0);

		labels.place(&node, &mut surface, &Config::default()).unwrap();

		let tag = host.live("n").unwrap();
		let tag = tag.borrow();
		assert_eq!(tag.kind, ElementKind::SvgText);
		assert_eq!(tag.attributes["x"], "70");
		assert_eq!(tag.attributes["y"], "55");
		assert_eq!(tag.attributes["text-anchor"], "start");
		assert_eq!(tag.text, "Deploy");
		assert_eq!(placed.get(), 1);
	}

	#[test]
	fn reuses_the_element_across_placements() {
		let host = MemoryHost::default();
		let created = Rc::new(Cell::new(0));
		let counter = created.clone();
		let controller = Controller::new()
			.on_create_label(move |_: &dyn LabelElement, _: &Node| counter.set(counter.get() + 1));
		let mut labels = SvgLabels::new(Box::new(host.clone()), controller);
		let mut surface = surface();
		let config = Config::default();
		let mut node = Node::new("n", "n");

		labels.place(&node, &mut surface, &config).unwrap();
		node.pos = kurbo::Point::new(1.0, 1.0);
		labels.place(&node, &mut surface, &config).unwrap();

		assert_eq!(host.created_count(), 1);
		assert_eq!(created.get(), 1);
		assert_eq!(host.live("n").unwrap().borrow().attributes["x"], "62");
	}

	#[test]
	fn hidden_nodes_lose_their_element() {
		let host = MemoryHost::default();
		let mut labels = SvgLabels::new(Box::new(host.clone()), Controller::new());
		let mut surface = surface();
		let config = Config::default();
		for id in ["a", "b", "c"] {
			labels.place(&Node::new(id, id), &mut surface, &config).unwrap();
		}
		assert_eq!(labels.len(), 3);

		let visible: HashSet<NodeId> = [NodeId::from("a")].into_iter().collect();
		labels.retain_visible(&visible);
		assert_eq!(labels.len(), 1);
		assert!(host.live("b").is_none());

		labels.release(&"a".into());
		assert!(labels.is_empty());
		assert_eq!(host.live_count(), 0);
	}

	#[test]
	fn host_failure_propagates() {
		let mut labels = SvgLabels::new(Box::new(BrokenHost), Controller::new());
		let err = labels
			.place(&Node::new("x", "x"), &mut surface(), &Config::default())
			.unwrap_err();
		assert_eq!(err, LabelError::Host("cannot create label for x".into()));
		assert!(labels.is_empty());
	}
}
