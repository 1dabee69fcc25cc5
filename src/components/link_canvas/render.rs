use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::edge::{BADGE_LINE_HEIGHT, LabelBadge};
use super::state::LinkCanvasState;
use super::status::LinkStatus;
use super::types::NodeKind;

const BACKGROUND: &str = "#f9fafb";
const GRID: &str = "#e5e7eb";
const GRID_GAP: f64 = 24.0;
const NODE_RADIUS: f64 = 8.0;
const DIMMED_ALPHA: f64 = 0.2;

pub fn render(state: &LinkCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	if state.layout.is_empty() {
		draw_empty_state(state, ctx);
		return;
	}

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_grid(state, ctx);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	draw_badges(state, ctx);
	ctx.restore();
}

fn draw_empty_state(state: &LinkCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#6b7280");
	ctx.set_font("14px sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text("No links to show yet", state.width / 2.0, state.height / 2.0);
	ctx.set_text_align("start");
}

fn draw_grid(state: &LinkCanvasState, ctx: &CanvasRenderingContext2d) {
	let (x0, y0) = state.screen_to_graph(0.0, 0.0);
	let (x1, y1) = state.screen_to_graph(state.width, state.height);
	let radius = 1.0 / state.transform.k;
	ctx.set_fill_style_str(GRID);
	let mut x = (x0 / GRID_GAP).floor() * GRID_GAP;
	while x <= x1 {
		let mut y = (y0 / GRID_GAP).floor() * GRID_GAP;
		while y <= y1 {
			ctx.fill_rect(x - radius / 2.0, y - radius / 2.0, radius, radius);
			y += GRID_GAP;
		}
		x += GRID_GAP;
	}
}

fn draw_edges(state: &LinkCanvasState, ctx: &CanvasRenderingContext2d) {
	let dash = js_sys::Array::of2(&JsValue::from_f64(8.0), &JsValue::from_f64(6.0));
	for (i, edge) in state.layout.edges.iter().enumerate() {
		let Some(curve) = state.edge_curve(edge) else {
			continue;
		};
		let hovered = state.edge_hover[i].is_hovered();
		ctx.set_global_alpha(if state.is_edge_emphasised(i) { 1.0 } else { DIMMED_ALPHA });
		ctx.set_stroke_style_str(edge.color);
		ctx.set_line_width(if hovered { edge.width + 1.5 } else { edge.width });
		if edge.status == LinkStatus::Pending {
			let _ = ctx.set_line_dash(&dash);
		}
		ctx.begin_path();
		ctx.move_to(curve.start.x, curve.start.y);
		ctx.quadratic_curve_to(curve.control.x, curve.control.y, curve.end.x, curve.end.y);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
	ctx.set_global_alpha(1.0);
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_nodes(state: &LinkCanvasState, ctx: &CanvasRenderingContext2d) {
	ctx.set_font("13px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for idx in 0..state.layout.nodes.len() {
		let (node, p) = state.node(idx);
		let (w, h) = (node.size.width(), node.size.height());
		let (x, y) = (p.x - w / 2.0, p.y - h / 2.0);
		let hovered = state.node_hover.node == Some(idx);

		rounded_rect(ctx, x, y, w, h, NODE_RADIUS);
		ctx.set_fill_style_str("white");
		ctx.fill();
		ctx.set_stroke_style_str(&node.color);
		ctx.set_line_width(match (node.kind, hovered) {
			(_, true) => 3.0,
			(NodeKind::Initiator, false) => 2.5,
			(NodeKind::Participant, false) => 1.5,
		});
		ctx.stroke();

		ctx.set_fill_style_str(&node.color);
		let _ = ctx.fill_text_with_max_width(&node.label, p.x, p.y, w - 12.0);
	}
	ctx.set_text_align("start");
	ctx.set_text_baseline("alphabetic");
}

fn draw_badges(state: &LinkCanvasState, ctx: &CanvasRenderingContext2d) {
	let Some(idx) = state.hovered_edge else {
		return;
	};
	let edge = &state.layout.edges[idx];
	let Some(curve) = state.edge_curve(edge) else {
		return;
	};
	if let Some(badge) = state.edge_hover[idx].badge(edge, &curve) {
		draw_badge(&badge, ctx);
	}
}

fn draw_badge(badge: &LabelBadge, ctx: &CanvasRenderingContext2d) {
	ctx.set_shadow_color("rgba(0, 0, 0, 0.12)");
	ctx.set_shadow_blur(8.0);
	ctx.set_shadow_offset_y(2.0);
	ctx.set_global_alpha(0.95);
	rounded_rect(ctx, badge.x, badge.y, badge.width, badge.height, 6.0);
	ctx.set_fill_style_str(badge.color);
	ctx.fill();
	ctx.set_global_alpha(1.0);
	ctx.set_shadow_color("transparent");

	ctx.set_fill_style_str("#fff");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let centre = badge.centre();
	let first = centre.y - BADGE_LINE_HEIGHT * (badge.lines.len() - 1) as f64 / 2.0;
	for (i, line) in badge.lines.iter().enumerate() {
		ctx.set_font(if i == 0 { "13px sans-serif" } else { "11px sans-serif" });
		let _ = ctx.fill_text_with_max_width(
			line,
			centre.x,
			first + BADGE_LINE_HEIGHT * i as f64,
			badge.width - 16.0,
		);
	}
	ctx.set_text_align("start");
	ctx.set_text_baseline("alphabetic");
}
