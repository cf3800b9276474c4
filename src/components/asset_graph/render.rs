use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::AssetGraphState;
use super::surface::{GraphEdge, GraphNode, PortGroup, Router, Scene};

const BACKGROUND: &str = "#f5f7fa";
const EDGE_COLOR: &str = "#a3b1c6";
const LABEL_COLOR: &str = "#1f2937";
const KIND_COLOR: &str = "#6b7280";
const ACCENT: &str = "#1677ff";
const ARROW_SIZE: f64 = 6.0;
const LABEL_CHARS: usize = 24;

pub fn render(state: &AssetGraphState, ctx: &CanvasRenderingContext2d) {
	let scene = &state.scene;
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, scene.width, scene.height);
	ctx.save();
	let _ = ctx.translate(scene.transform.x, scene.transform.y);
	let _ = ctx.scale(scene.transform.k, scene.transform.k);
	for edge in scene.edges() {
		draw_edge(scene, edge, ctx);
	}
	for node in scene.nodes() {
		let selected = state.selected.as_deref() == Some(node.id.as_str());
		let hovered = state.hovered.as_deref() == Some(node.id.as_str());
		draw_node(node, selected, hovered, scene.transform.k, ctx);
	}
	ctx.restore();
}

fn draw_edge(scene: &Scene, edge: &GraphEdge, ctx: &CanvasRenderingContext2d) {
	let (Some(source), Some(target)) = (scene.node(&edge.source.cell), scene.node(&edge.target.cell))
	else {
		return;
	};
	let (x1, y1) = source.port_position(PortGroup::Out);
	let (x2, y2) = target.port_position(PortGroup::In);

	ctx.set_stroke_style_str(EDGE_COLOR);
	ctx.set_line_width(1.0);
	ctx.begin_path();
	ctx.move_to(x1, y1);
	match edge.router {
		Some(Router::Normal) => {}
		None => {
			let mid = (y1 + y2) / 2.0;
			ctx.line_to(x1, mid);
			ctx.line_to(x2, mid);
		}
	}
	// the arrow tip lands on the in port
	let (ux, uy) = match edge.router {
		Some(Router::Normal) => {
			let (dx, dy) = (x2 - x1, y2 - y1);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist < 0.001 {
				return;
			}
			(dx / dist, dy / dist)
		}
		None => (0.0, 1.0),
	};
	ctx.line_to(x2 - ux * ARROW_SIZE, y2 - uy * ARROW_SIZE);
	ctx.stroke();

	ctx.set_fill_style_str(EDGE_COLOR);
	let (back_x, back_y) = (x2 - ux * ARROW_SIZE, y2 - uy * ARROW_SIZE);
	let (px, py) = (-uy * ARROW_SIZE * 0.5, ux * ARROW_SIZE * 0.5);
	ctx.begin_path();
	ctx.move_to(x2, y2);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn truncate(label: &str) -> String {
	if label.chars().count() <= LABEL_CHARS {
		return label.to_string();
	}
	let mut short: String = label.chars().take(LABEL_CHARS - 1).collect();
	short.push('…');
	short
}

fn draw_node(node: &GraphNode, selected: bool, hovered: bool, k: f64, ctx: &CanvasRenderingContext2d) {
	let (fill, stroke) = node.shape.palette();
	ctx.set_fill_style_str(fill);
	ctx.fill_rect(node.x, node.y, node.width, node.height);
	ctx.set_stroke_style_str(if hovered { ACCENT } else { stroke });
	ctx.set_line_width(if hovered { 2.0 } else { 1.0 });
	ctx.stroke_rect(node.x, node.y, node.width, node.height);

	if selected {
		let pad = 4.0;
		ctx.set_stroke_style_str(ACCENT);
		ctx.set_line_width(1.5 / k.max(0.5));
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(6.0),
			&JsValue::from_f64(3.0),
		));
		ctx.stroke_rect(
			node.x - pad,
			node.y - pad,
			node.width + 2.0 * pad,
			node.height + 2.0 * pad,
		);
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	}

	let text_x = node.x + 12.0;
	let middle = node.y + node.height / 2.0;
	ctx.set_fill_style_str(LABEL_COLOR);
	ctx.set_font("14px sans-serif");
	let _ = ctx.fill_text(&truncate(&node.data.name), text_x, middle - 2.0);
	ctx.set_fill_style_str(KIND_COLOR);
	ctx.set_font("11px sans-serif");
	let _ = ctx.fill_text(node.data.kind.label(), text_x, middle + 14.0);
}
