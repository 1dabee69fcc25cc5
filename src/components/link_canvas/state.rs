use std::collections::HashMap;

use super::edge::{EdgeCurve, EdgeHover, Point};
use super::types::{Layout, LayoutEdge, LayoutNode};

/// Minimum edge hit tolerance in screen pixels.
pub const EDGE_HIT_TOLERANCE: f64 = 6.0;
const FIT_PADDING: f64 = 48.0;
const MAX_FIT_SCALE: f64 = 1.5;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Hovered node plus the edges touching it.
#[derive(Clone, Debug, Default)]
pub struct NodeHover {
	pub node: Option<usize>,
	pub edges: Vec<usize>,
}

pub struct LinkCanvasState {
	pub layout: Layout,
	/// Current node positions; start at the layout's and follow drags.
	pub positions: Vec<Point>,
	pub edge_hover: Vec<EdgeHover>,
	pub hovered_edge: Option<usize>,
	pub node_hover: NodeHover,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	pub needs_redraw: bool,
	node_index: HashMap<String, usize>,
}

impl LinkCanvasState {
	pub fn new(layout: Layout, width: f64, height: f64) -> Self {
		let mut state = Self {
			layout: Layout::default(),
			positions: Vec::new(),
			edge_hover: Vec::new(),
			hovered_edge: None,
			node_hover: NodeHover::default(),
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			needs_redraw: true,
			node_index: HashMap::new(),
		};
		state.set_layout(layout);
		state.fit_to_content();
		state
	}

	/// Replaces the layout wholesale. Dragged positions and hover state are
	/// dropped. Returns whether the view was refitted, which happens when the
	/// node+edge count changed.
	pub fn set_layout(&mut self, layout: Layout) -> bool {
		let refit = layout.element_count() != self.layout.element_count();
		self.positions = layout.nodes.iter().map(|n| Point::new(n.x, n.y)).collect();
		self.node_index = layout
			.nodes
			.iter()
			.enumerate()
			.map(|(i, n)| (n.id.clone(), i))
			.collect();
		self.edge_hover = vec![EdgeHover::Idle; layout.edges.len()];
		self.hovered_edge = None;
		self.node_hover = NodeHover::default();
		self.drag = DragState::default();
		self.layout = layout;
		if refit {
			self.fit_to_content();
		}
		self.needs_redraw = true;
		refit
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// Last drawn is on top.
		self.positions.iter().zip(&self.layout.nodes).rposition(|(p, node)| {
			(gx - p.x).abs() <= node.size.width() / 2.0 && (gy - p.y).abs() <= node.size.height() / 2.0
		})
	}

	/// Source anchor is the bottom-centre of the source node, target anchor the
	/// top-centre of the target node.
	pub fn edge_anchors(&self, edge: &LayoutEdge) -> Option<(Point, Point)> {
		let (source_node, source) = self.node(*self.node_index.get(&edge.source)?);
		let (target_node, target) = self.node(*self.node_index.get(&edge.target)?);
		Some((
			Point::new(source.x, source.y + source_node.size.height() / 2.0),
			Point::new(target.x, target.y - target_node.size.height() / 2.0),
		))
	}

	pub fn edge_curve(&self, edge: &LayoutEdge) -> Option<EdgeCurve> {
		let (source, target) = self.edge_anchors(edge)?;
		Some(EdgeCurve::new(source, target, edge.offset, edge.node_offset))
	}

	pub fn edge_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let pointer = Point::new(gx, gy);
		let k = self.transform.k;
		self.layout.edges.iter().enumerate().rev().find_map(|(i, edge)| {
			let curve = self.edge_curve(edge)?;
			let tolerance = (edge.width / 2.0).max(EDGE_HIT_TOLERANCE / k);
			(curve.distance_to(pointer) <= tolerance).then_some(i)
		})
	}

	/// Moves edge hover to `edge`, sending leave/enter to the affected edges.
	pub fn set_edge_hover(&mut self, edge: Option<usize>) {
		if self.hovered_edge == edge {
			return;
		}
		if let Some(prev) = self.hovered_edge.take() {
			self.edge_hover[prev].pointer_leave();
		}
		if let Some(next) = edge {
			self.edge_hover[next].pointer_enter();
		}
		self.hovered_edge = edge;
		self.needs_redraw = true;
	}

	pub fn set_node_hover(&mut self, node: Option<usize>) {
		if self.node_hover.node == node {
			return;
		}
		self.node_hover.node = node;
		self.node_hover.edges.clear();
		if let Some(idx) = node {
			let id = &self.layout.nodes[idx].id;
			self.node_hover.edges = self
				.layout
				.edges
				.iter()
				.enumerate()
				.filter(|(_, e)| &e.source == id || &e.target == id)
				.map(|(i, _)| i)
				.collect();
		}
		self.needs_redraw = true;
	}

	/// Hit-tests nodes first, then edges.
	pub fn update_hover(&mut self, sx: f64, sy: f64) {
		let node = self.node_at_position(sx, sy);
		let edge = match node {
			Some(_) => None,
			None => self.edge_at_position(sx, sy),
		};
		self.set_node_hover(node);
		self.set_edge_hover(edge);
	}

	pub fn clear_hover(&mut self) {
		self.set_node_hover(None);
		self.set_edge_hover(None);
	}

	/// Whether an edge is drawn at full strength under the current node hover.
	pub fn is_edge_emphasised(&self, idx: usize) -> bool {
		self.node_hover.node.is_none() || self.node_hover.edges.contains(&idx)
	}

	pub fn node(&self, idx: usize) -> (&LayoutNode, Point) {
		(&self.layout.nodes[idx], self.positions[idx])
	}

	/// Fits the node bounding box into the viewport.
	pub fn fit_to_content(&mut self) {
		let Some(first) = self.positions.first() else {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			self.needs_redraw = true;
			return;
		};
		let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
		for (p, node) in self.positions.iter().zip(&self.layout.nodes) {
			let (hw, hh) = (node.size.width() / 2.0, node.size.height() / 2.0);
			min_x = min_x.min(p.x - hw);
			min_y = min_y.min(p.y - hh);
			max_x = max_x.max(p.x + hw);
			max_y = max_y.max(p.y + hh);
		}
		let content_w = max_x - min_x;
		let content_h = max_y - min_y;
		let avail_w = (self.width - 2.0 * FIT_PADDING).max(1.0);
		let avail_h = (self.height - 2.0 * FIT_PADDING).max(1.0);
		let k = (avail_w / content_w).min(avail_h / content_h).min(MAX_FIT_SCALE);
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
		self.needs_redraw = true;
	}

	/// Scales the view by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, factor: f64, sx: f64, sy: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
		self.needs_redraw = true;
	}

	/// Zooms around the viewport centre.
	pub fn zoom_centre(&mut self, factor: f64) {
		self.zoom_at(factor, self.width / 2.0, self.height / 2.0);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.needs_redraw = true;
	}
}
