//! The drawing surface shared by the plot engine and every label layer.
//!
//! A [`Surface`] owns the immediate-mode context plus the model-to-pixel
//! mapping. Pixel coordinates are always derived from [`Surface::transform`];
//! nothing else keeps its own copy of the offsets.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Immediate-mode 2D drawing operations, shaped after the canvas 2D API.
/// Each method behaves like the canvas call of the same name.
#[allow(missing_docs)]
pub trait DrawContext {
	fn save(&mut self);
	fn restore(&mut self);
	fn set_transform(&mut self, transform: Affine);
	fn clear_rect(&mut self, rect: Rect);
	fn fill_rect(&mut self, rect: Rect);
	fn stroke_rect(&mut self, rect: Rect);
	fn begin_path(&mut self);
	fn move_to(&mut self, p: Point);
	fn line_to(&mut self, p: Point);
	fn close_path(&mut self);
	fn fill(&mut self);
	fn stroke(&mut self);
	fn fill_text(&mut self, text: &str, at: Point);
	fn set_fill_style(&mut self, style: &str);
	fn set_stroke_style(&mut self, style: &str);
	fn set_line_width(&mut self, width: f64);
	fn set_font(&mut self, font: &str);
	fn set_text_align(&mut self, align: &str);
	fn set_text_baseline(&mut self, baseline: &str);
}

/// Translate and scale offsets, applied around the viewport center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mapping {
	/// Offset in pixels, added after scaling.
	pub translate: Vec2,
	/// Scale factors per axis.
	pub scale: Vec2,
}

impl Default for Mapping {
	fn default() -> Self {
		Self {
			translate: Vec2::ZERO,
			scale: Vec2::new(1.0, 1.0),
		}
	}
}

/// A drawing context together with its viewport size and mapping.
pub struct Surface {
	size: Size,
	mapping: Mapping,
	ctx: Box<dyn DrawContext>,
}

impl Surface {
	/// Wraps `ctx` with the identity mapping.
	pub fn new(ctx: impl DrawContext + 'static, size: Size) -> Self {
		Self {
			size,
			mapping: Mapping::default(),
			ctx: Box::new(ctx),
		}
	}

	/// Viewport size in pixels.
	pub fn size(&self) -> Size {
		self.size
	}

	/// Changes the viewport size; the mapping is kept.
	pub fn resize(&mut self, size: Size) {
		self.size = size;
	}

	/// Current mapping.
	pub fn mapping(&self) -> Mapping {
		self.mapping
	}

	/// Replaces the mapping.
	pub fn set_mapping(&mut self, mapping: Mapping) {
		self.mapping = mapping;
	}

	/// Pans by `delta` model units.
	pub fn translate(&mut self, delta: Vec2) {
		let Mapping { translate, scale } = &mut self.mapping;
		translate.x += delta.x * scale.x;
		translate.y += delta.y * scale.y;
	}

	/// Multiplies the scale factors.
	pub fn scale(&mut self, sx: f64, sy: f64) {
		self.mapping.scale.x *= sx;
		self.mapping.scale.y *= sy;
	}

	/// Model space to surface pixels: `m * scale + translate + size / 2`.
	pub fn transform(&self) -> Affine {
		let Mapping { translate, scale } = self.mapping;
		Affine::new([
			scale.x,
			0.0,
			0.0,
			scale.y,
			translate.x + self.size.width / 2.0,
			translate.y + self.size.height / 2.0,
		])
	}

	/// Maps a model point to surface pixels.
	pub fn to_pixel(&self, model: Point) -> Point {
		self.transform() * model
	}

	/// `None` while either scale factor is zero or not finite.
	pub fn to_model(&self, pixel: Point) -> Option<Point> {
		let Vec2 { x: sx, y: sy } = self.mapping.scale;
		if !(sx.is_normal() && sy.is_normal()) {
			return None;
		}
		Some(self.transform().inverse() * pixel)
	}

	/// Wipes the whole viewport in pixel space.
	pub fn clear(&mut self) {
		self.ctx.set_transform(Affine::IDENTITY);
		self.ctx.clear_rect(Rect::from_origin_size(Point::ZERO, self.size));
	}

	/// Loads the model-to-pixel transform into the context so shapes can be
	/// drawn in model units.
	pub fn prepare(&mut self) {
		let transform = self.transform();
		self.ctx.set_transform(transform);
	}

	/// The wrapped context.
	pub fn ctx_mut(&mut self) -> &mut dyn DrawContext {
		self.ctx.as_mut()
	}
}

/// One recorded [`DrawContext`] call.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	Save,
	Restore,
	SetTransform(Affine),
	ClearRect(Rect),
	FillRect(Rect),
	StrokeRect(Rect),
	BeginPath,
	MoveTo(Point),
	LineTo(Point),
	ClosePath,
	Fill,
	Stroke,
	FillText(String, Point),
	FillStyle(String),
	StrokeStyle(String),
	LineWidth(f64),
	Font(String),
	TextAlign(String),
	TextBaseline(String),
}

/// A [`DrawContext`] that keeps a display list instead of painting.
///
/// Clones share the same list, so a handle kept outside a [`Surface`] sees
/// everything drawn through it.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
	commands: Rc<RefCell<Vec<DrawCommand>>>,
}

impl Recorder {
	/// An empty display list.
	pub fn new() -> Self {
		Self::default()
	}

	/// A copy of everything recorded so far.
	pub fn commands(&self) -> Vec<DrawCommand> {
		self.commands.borrow().clone()
	}

	/// Drains the display list.
	pub fn take(&self) -> Vec<DrawCommand> {
		std::mem::take(&mut *self.commands.borrow_mut())
	}

	/// Number of recorded commands.
	pub fn len(&self) -> usize {
		self.commands.borrow().len()
	}

	/// Whether nothing has been recorded.
	pub fn is_empty(&self) -> bool {
		self.commands.borrow().is_empty()
	}

	fn push(&mut self, command: DrawCommand) {
		self.commands.borrow_mut().push(command);
	}
}

impl DrawContext for Recorder {
	fn save(&mut self) {
		self.push(DrawCommand::Save);
	}

	fn restore(&mut self) {
		self.push(DrawCommand::Restore);
	}

	fn set_transform(&mut self, transform: Affine) {
		self.push(DrawCommand::SetTransform(transform));
	}

	fn clear_rect(&mut self, rect: Rect) {
		self.push(DrawCommand::ClearRect(rect));
	}

	fn fill_rect(&mut self, rect: Rect) {
		self.push(DrawCommand::FillRect(rect));
	}

	fn stroke_rect(&mut self, rect: Rect) {
		self.push(DrawCommand::StrokeRect(rect));
	}

	fn begin_path(&mut self) {
		self.push(DrawCommand::BeginPath);
	}

	fn move_to(&mut self, p: Point) {
		self.push(DrawCommand::MoveTo(p));
	}

	fn line_to(&mut self, p: Point) {
		self.push(DrawCommand::LineTo(p));
	}

	fn close_path(&mut self) {
		self.push(DrawCommand::ClosePath);
	}

	fn fill(&mut self) {
		self.push(DrawCommand::Fill);
	}

	fn stroke(&mut self) {
		self.push(DrawCommand::Stroke);
	}

	fn fill_text(&mut self, text: &str, at: Point) {
		self.push(DrawCommand::FillText(text.to_owned(), at));
	}

	fn set_fill_style(&mut self, style: &str) {
		self.push(DrawCommand::FillStyle(style.to_owned()));
	}

	fn set_stroke_style(&mut self, style: &str) {
		self.push(DrawCommand::StrokeStyle(style.to_owned()));
	}

	fn set_line_width(&mut self, width: f64) {
		self.push(DrawCommand::LineWidth(width));
	}

	fn set_font(&mut self, font: &str) {
		self.push(DrawCommand::Font(font.to_owned()));
	}

	fn set_text_align(&mut self, align: &str) {
		self.push(DrawCommand::TextAlign(align.to_owned()));
	}

	fn set_text_baseline(&mut self, baseline: &str) {
		self.push(DrawCommand::TextBaseline(baseline.to_owned()));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn surface() -> (Surface, Recorder) {
		let recorder = Recorder::new();
		let mut surface = Surface::new(recorder.clone(), Size::new(100.0, 50.0));
		surface.set_mapping(Mapping {
			translate: Vec2::new(10.0, 20.0),
			scale: Vec2::new(2.0, 2.0),
		});
		(surface, recorder)
	}

	#[test]
	fn to_pixel_uses_center_origin() {
		let (surface, _) = surface();
		assert_eq!(surface.to_pixel(Point::new(5.0, 5.0)), Point::new(70.0, 55.0));
		assert_eq!(surface.to_pixel(Point::ZERO), Point::new(60.0, 45.0));
	}

	#[test]
	fn to_model_inverts_to_pixel() {
		let (surface, _) = surface();
		let model = surface.to_model(Point::new(70.0, 55.0)).unwrap();
		assert!((model - Point::new(5.0, 5.0)).hypot() < 1e-9);
	}

	#[test]
	fn degenerate_scale_has_no_inverse() {
		let (mut surface, _) = surface();
		surface.scale(0.0, 1.0);
		assert_eq!(surface.to_model(Point::ZERO), None);
	}

	#[test]
	fn translate_is_in_model_units() {
		let (mut surface, _) = surface();
		surface.translate(Vec2::new(1.0, -1.0));
		assert_eq!(surface.mapping().translate, Vec2::new(12.0, 18.0));
		surface.scale(0.5, 0.5);
		assert_eq!(surface.mapping().scale, Vec2::new(1.0, 1.0));
	}

	#[test]
	fn clear_then_prepare() {
		let (mut surface, recorder) = surface();
		surface.clear();
		surface.prepare();
		assert_eq!(
			recorder.take(),
			vec![
				DrawCommand::SetTransform(Affine::IDENTITY),
				DrawCommand::ClearRect(Rect::new(0.0, 0.0, 100.0, 50.0)),
				DrawCommand::SetTransform(Affine::new([2.0, 0.0, 0.0, 2.0, 60.0, 45.0])),
			]
		);
		assert!(recorder.is_empty());
	}
}
