use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{CHILD_RADIUS, ClusterGraphState, LABEL_HEIGHT};
use crate::layout::NodeKind;

const COLORS: &[&str] = &[
	"#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
	"#bcbd22", "#17becf",
];

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &ClusterGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#1a1a2e");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_groups(state, ctx);
	draw_labels(state, ctx);
	draw_children(state, ctx);
	ctx.restore();
}

/// Colour of a group, inherited by its caption and leaves.
fn color_of(state: &ClusterGraphState, idx: usize) -> &'static str {
	let group = match state.nodes[idx].kind {
		NodeKind::Group => Some(idx),
		_ => state.parent(idx),
	};
	let ordinal = group
		.map(|g| {
			state.nodes[..g]
				.iter()
				.filter(|n| n.kind == NodeKind::Group)
				.count()
		})
		.unwrap_or(0);
	COLORS[ordinal % COLORS.len()]
}

fn alpha_for(state: &ClusterGraphState, idx: usize) -> f64 {
	if !state.has_active_highlight() {
		return 1.0;
	}
	let t = ease_out_cubic(state.hover.highlight_t);
	if state.is_highlighted(idx) { 1.0 } else { 1.0 - 0.7 * t }
}

fn draw_groups(state: &ClusterGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	for (idx, _) in state
		.nodes
		.iter()
		.enumerate()
		.filter(|(_, n)| n.kind == NodeKind::Group)
	{
		let (origin, size) = state.bounds(idx);
		let color = color_of(state, idx);
		ctx.set_global_alpha(alpha_for(state, idx) * 0.15);
		ctx.set_fill_style_str(color);
		ctx.fill_rect(origin.x, origin.y, size.width, size.height);

		ctx.set_global_alpha(alpha_for(state, idx));
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(1.5 / k);
		if state.hover.node == Some(idx) {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(8.0 / k),
				&JsValue::from_f64(4.0 / k),
			));
		}
		ctx.stroke_rect(origin.x, origin.y, size.width, size.height);
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}
	ctx.set_global_alpha(1.0);
}

fn draw_labels(state: &ClusterGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_font("16px sans-serif");
	for (idx, node) in state
		.nodes
		.iter()
		.enumerate()
		.filter(|(_, n)| n.kind == NodeKind::GroupLabel)
	{
		let origin = state.absolute_position(idx);
		ctx.set_global_alpha(alpha_for(state, idx));
		ctx.set_fill_style_str("white");
		let _ = ctx.fill_text(&node.label, origin.x, origin.y + LABEL_HEIGHT * 0.7);
	}
	ctx.set_global_alpha(1.0);
}

fn draw_children(state: &ClusterGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	for (idx, node) in state
		.nodes
		.iter()
		.enumerate()
		.filter(|(_, n)| n.kind == NodeKind::GroupChild)
	{
		let origin = state.absolute_position(idx);
		let (x, y) = (origin.x + CHILD_RADIUS, origin.y + CHILD_RADIUS);
		let alpha = alpha_for(state, idx);

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, CHILD_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(color_of(state, idx));
		ctx.fill();

		if state.hover.node == Some(idx) {
			ctx.begin_path();
			let _ = ctx.arc(x, y, CHILD_RADIUS + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.7)");
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		ctx.set_fill_style_str(&format!("rgba(255, 255, 255, {})", alpha * 0.8));
		ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
		let _ = ctx.fill_text(&node.label, x - CHILD_RADIUS, y + CHILD_RADIUS + 14.0);
	}
	ctx.set_global_alpha(1.0);
}
