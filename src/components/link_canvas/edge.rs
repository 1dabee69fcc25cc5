use std::f64::consts::FRAC_PI_2;

use super::types::LayoutEdge;

pub const BADGE_WIDTH: f64 = 120.0;
pub const BADGE_HEIGHT: f64 = 32.0;
/// Extra height per badge line beyond the first.
pub const BADGE_LINE_HEIGHT: f64 = 16.0;
const CURVE_SAMPLES: usize = 24;
/// Share of `|offset|` lifted off the control point's y.
const VERTICAL_DAMPING: f64 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	fn offset_by(self, direction: Point, amount: f64) -> Point {
		Point::new(self.x + direction.x * amount, self.y + direction.y * amount)
	}

	fn midpoint(self, other: Point) -> Point {
		Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
	}

	fn distance_sq(self, other: Point) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		dx * dx + dy * dy
	}
}

/// Quadratic curve drawn for one edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeCurve {
	pub start: Point,
	pub control: Point,
	pub end: Point,
}

impl EdgeCurve {
	/// Builds the curve between two resolved anchors. Both anchors shift along
	/// the line's perpendicular by `node_offset`; the control point sits at
	/// their midpoint shifted along the same perpendicular by `offset`.
	pub fn new(source: Point, target: Point, offset: f64, node_offset: f64) -> Self {
		let angle = (target.y - source.y).atan2(target.x - source.x) - FRAC_PI_2;
		let normal = Point::new(angle.cos(), angle.sin());
		let start = source.offset_by(normal, node_offset);
		let end = target.offset_by(normal, node_offset);
		let mut control = start.midpoint(end).offset_by(normal, offset);
		control.y -= offset.abs() * VERTICAL_DAMPING;
		Self { start, control, end }
	}

	pub fn point_at(&self, t: f64) -> Point {
		let u = 1.0 - t;
		Point::new(
			u * u * self.start.x + 2.0 * u * t * self.control.x + t * t * self.end.x,
			u * u * self.start.y + 2.0 * u * t * self.control.y + t * t * self.end.y,
		)
	}

	pub fn midpoint(&self) -> Point {
		self.point_at(0.5)
	}

	/// Shortest distance from `p` to the curve, approximated by a polyline.
	pub fn distance_to(&self, p: Point) -> f64 {
		let mut best = f64::INFINITY;
		let mut prev = self.start;
		for i in 1..=CURVE_SAMPLES {
			let next = self.point_at(i as f64 / CURVE_SAMPLES as f64);
			best = best.min(segment_distance_sq(p, prev, next));
			prev = next;
		}
		best.sqrt()
	}
}

fn segment_distance_sq(p: Point, a: Point, b: Point) -> f64 {
	let (abx, aby) = (b.x - a.x, b.y - a.y);
	let len_sq = abx * abx + aby * aby;
	if len_sq < 1e-12 {
		return p.distance_sq(a);
	}
	let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
	p.distance_sq(Point::new(a.x + abx * t, a.y + aby * t))
}

/// Per-edge pointer hover. Starts idle whenever an edge is (re)created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeHover {
	#[default]
	Idle,
	Hovered,
}

impl EdgeHover {
	pub fn pointer_enter(&mut self) {
		*self = Self::Hovered;
	}

	pub fn pointer_leave(&mut self) {
		*self = Self::Idle;
	}

	pub fn is_hovered(self) -> bool {
		self == Self::Hovered
	}

	/// The floating label to draw for `edge`, if any.
	pub fn badge(self, edge: &LayoutEdge, curve: &EdgeCurve) -> Option<LabelBadge> {
		if !self.is_hovered() || edge.label.trim().is_empty() {
			return None;
		}
		let mut lines = vec![edge.label.clone()];
		if let Some(nudge) = edge.last_nudge.as_deref().filter(|n| !n.trim().is_empty()) {
			lines.push(format!("Last nudge: {nudge}"));
		}
		let height = BADGE_HEIGHT + BADGE_LINE_HEIGHT * (lines.len() - 1) as f64;
		let centre = curve.midpoint();
		Some(LabelBadge {
			lines,
			x: centre.x - BADGE_WIDTH / 2.0,
			y: centre.y - height / 2.0,
			width: BADGE_WIDTH,
			height,
			color: edge.color,
		})
	}
}

/// Hover label box, centred on the curve midpoint, in canvas coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelBadge {
	pub lines: Vec<String>,
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	pub color: &'static str,
}

impl LabelBadge {
	pub fn centre(&self) -> Point {
		Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}
}
