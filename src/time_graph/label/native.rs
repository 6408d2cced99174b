use std::collections::HashSet;

use super::LabelPlacer;
use crate::time_graph::config::Config;
use crate::time_graph::error::LabelError;
use crate::time_graph::surface::Surface;
use crate::time_graph::types::{Node, NodeId};

/// Draws each node's name onto the shape canvas itself, centered on the
/// shape. Relies on the surface having been prepared with the model
/// transform, so coordinates stay in model units.
#[derive(Debug, Default)]
pub struct NativeLabels;

impl NativeLabels {
	/// The canvas label layer.
	pub fn new() -> Self {
		Self
	}
}

impl LabelPlacer for NativeLabels {
	fn place(&mut self, node: &Node, surface: &mut Surface, config: &Config) -> Result<(), LabelError> {
		let label = &config.label;
		let ctx = surface.ctx_mut();
		ctx.set_fill_style(&label.color);
		ctx.set_font(&label.font());
		ctx.set_text_align(&label.text_align);
		ctx.set_text_baseline(&label.text_baseline);
		ctx.fill_text(&node.name, node.center());
		Ok(())
	}

	fn release(&mut self, _: &NodeId) {}

	fn retain_visible(&mut self, _: &HashSet<NodeId>) {}

	fn clear(&mut self) {}

	fn len(&self) -> usize {
		0
	}
}

#[cfg(test)]
mod tests {
	use kurbo::{Point, Size};

	use super::*;
	use crate::time_graph::surface::{DrawCommand, Recorder};

	#[test]
	fn text_is_centered_on_the_shape_in_model_units() {
		let recorder = Recorder::new();
		let mut surface = Surface::new(recorder.clone(), Size::new(100.0, 50.0));
		surface.scale(2.0, 2.0);
		let config = Config::default();
		let node = Node::new("n", "Build").with_pos(5.0, 5.0).with_size(10.0, 4.0);

		let mut labels = NativeLabels::new();
		labels.place(&node, &mut surface, &config).unwrap();

		assert_eq!(
			recorder.commands(),
			vec![
				DrawCommand::FillStyle("#fff".into()),
				DrawCommand::Font("10px sans-serif".into()),
				DrawCommand::TextAlign("center".into()),
				DrawCommand::TextBaseline("middle".into()),
				DrawCommand::FillText("Build".into(), Point::new(10.0, 7.0)),
			]
		);
		assert!(labels.is_empty());
	}
}
