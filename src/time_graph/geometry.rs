//! Shape-agnostic drawing and hit-testing primitives.
//!
//! Renderers only touch the context they are given; `contains` checks are
//! pure. Degenerate input (empty boxes, zero-length segments, NaN) draws
//! nothing and contains nothing.

use kurbo::Point;

/// Whether a closed shape is filled or outlined.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillMode {
	/// Paint the interior.
	Fill,
	/// Stroke the outline.
	Stroke,
}

fn is_extent(v: f64) -> bool {
	v.is_finite() && v > 0.0
}

/// Axis-aligned boxes given by center and size.
pub mod rectangle {
	use kurbo::{Point, Rect};

	use super::{FillMode, is_extent};
	use crate::time_graph::surface::DrawContext;

	/// Fills or strokes the box; nothing is drawn unless both sides are positive.
	pub fn render(
		mode: FillMode,
		center: Point,
		width: f64,
		height: f64,
		ctx: &mut dyn DrawContext,
	) {
		if !is_extent(width) || !is_extent(height) {
			return;
		}
		let rect = Rect::from_center_size(center, (width, height));
		match mode {
			FillMode::Fill => ctx.fill_rect(rect),
			FillMode::Stroke => ctx.stroke_rect(rect),
		}
	}

	/// Edges count as inside.
	pub fn contains(center: Point, point: Point, width: f64, height: f64) -> bool {
		is_extent(width)
			&& is_extent(height)
			&& (point.x - center.x).abs() <= width / 2.0
			&& (point.y - center.y).abs() <= height / 2.0
	}
}

/// Straight segments.
pub mod line {
	use kurbo::Point;

	use super::segment_length;
	use crate::time_graph::surface::DrawContext;

	/// Strokes the segment; a zero-length segment draws nothing.
	pub fn render(from: Point, to: Point, ctx: &mut dyn DrawContext) {
		if segment_length(from, to).is_none() {
			return;
		}
		ctx.begin_path();
		ctx.move_to(from);
		ctx.line_to(to);
		ctx.stroke();
	}

	/// Within `epsilon` of the segment itself; points past either end miss
	/// even when they sit on the extended line.
	pub fn contains(from: Point, to: Point, point: Point, epsilon: f64) -> bool {
		let Some(len) = segment_length(from, to) else {
			return false;
		};
		if epsilon.is_nan() || epsilon < 0.0 {
			return false;
		}
		let dir = to - from;
		let t = (point - from).dot(dir) / (len * len);
		if !(0.0..=1.0).contains(&t) {
			return false;
		}
		(point - (from + dir * t)).hypot() <= epsilon
	}
}

/// Segments with a triangular head. Containment is the plain segment test.
pub mod arrow {
	use kurbo::{Point, Vec2};

	use super::{is_extent, segment_length};
	use crate::time_graph::surface::DrawContext;

	/// Draws the segment plus a filled head `dim` deep and `dim` wide at
	/// `to`, or at `from` when `inverted`.
	pub fn render(from: Point, to: Point, dim: f64, inverted: bool, ctx: &mut dyn DrawContext) {
		let (from, to) = if inverted { (to, from) } else { (from, to) };
		let Some(len) = segment_length(from, to) else {
			return;
		};
		ctx.begin_path();
		ctx.move_to(from);
		ctx.line_to(to);
		ctx.stroke();

		if !is_extent(dim) {
			return;
		}
		let v = (to - from) * (dim / len);
		let base = to - v;
		let normal = Vec2::new(-v.y / 2.0, v.x / 2.0);
		ctx.begin_path();
		ctx.move_to(base + normal);
		ctx.line_to(base - normal);
		ctx.line_to(to);
		ctx.close_path();
		ctx.fill();
	}

	/// The head is cosmetic; the hit area is the segment alone.
	pub fn contains(from: Point, to: Point, point: Point, epsilon: f64) -> bool {
		super::line::contains(from, to, point, epsilon)
	}
}

fn segment_length(from: Point, to: Point) -> Option<f64> {
	let len = (to - from).hypot();
	(len.is_finite() && len > 0.0).then_some(len)
}
