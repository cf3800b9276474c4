//! Render surface: the live cell set plus the camera transform.
//!
//! Coordinates follow `screen = graph * k + (x, y)`.

use std::collections::HashMap;

use super::types::{DomainNode, PresentationCategory};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortGroup {
	/// Top centre of the node.
	In,
	/// Bottom centre of the node.
	Out,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Port {
	pub id: String,
	pub group: PortGroup,
}

pub fn port_id(cell: &str, group: PortGroup) -> String {
	match group {
		PortGroup::In => format!("{cell}-in"),
		PortGroup::Out => format!("{cell}-out"),
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub shape: PresentationCategory,
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	pub data: DomainNode,
	pub ports: [Port; 2],
}

impl GraphNode {
	pub fn port_position(&self, group: PortGroup) -> (f64, f64) {
		let cx = self.x + self.width / 2.0;
		match group {
			PortGroup::In => (cx, self.y),
			PortGroup::Out => (cx, self.y + self.height),
		}
	}

	pub fn contains(&self, gx: f64, gy: f64) -> bool {
		gx >= self.x && gx <= self.x + self.width && gy >= self.y && gy <= self.y + self.height
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Endpoint {
	pub cell: String,
	pub port: String,
}

/// Edge routing. An edge without a router uses the surface default, an
/// orthogonal elbow through the vertical midpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Router {
	/// Straight segment between the two ports.
	Normal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphEdge {
	pub id: String,
	pub source: Endpoint,
	pub target: Endpoint,
	pub router: Option<Router>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
	Node(GraphNode),
	Edge(GraphEdge),
}

impl Cell {
	pub fn id(&self) -> &str {
		match self {
			Cell::Node(node) => &node.id,
			Cell::Edge(edge) => &edge.id,
		}
	}
}

pub struct NodeSpec {
	pub id: Option<String>,
	pub shape: PresentationCategory,
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	pub data: DomainNode,
}

pub struct EdgeSpec {
	pub id: String,
	pub source: Endpoint,
	pub target: Endpoint,
	pub router: Option<Router>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
	/// Top centre of the cell to the top centre of the viewport.
	Top,
	/// Cell centre to viewport centre.
	Center,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Bounds {
	fn union(self, other: Bounds) -> Bounds {
		let (x, y) = (self.x.min(other.x), self.y.min(other.y));
		let right = (self.x + self.width).max(other.x + other.width);
		let bottom = (self.y + self.height).max(other.y + other.height);
		Bounds {
			x,
			y,
			width: right - x,
			height: bottom - y,
		}
	}

	fn center(&self) -> (f64, f64) {
		(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}
}

/// Operations the pipeline and camera need from a drawing surface.
pub trait RenderSurface {
	/// Creates a node; the returned node carries the id the surface assigned.
	fn create_node(&mut self, spec: NodeSpec) -> GraphNode;
	fn create_edge(&mut self, spec: EdgeSpec) -> GraphEdge;
	/// Replaces every cell in one step.
	fn reset_cells(&mut self, cells: Vec<Cell>);
	fn cell_by_id(&self, id: &str) -> Option<&Cell>;

	fn zoom(&self) -> f64;
	fn zoom_to(&mut self, scale: f64);
	fn zoom_to_fit(&mut self, padding: f64);
	fn center_content(&mut self);
	/// Returns `false` when no node with `id` is present.
	fn position_cell(&mut self, id: &str, anchor: Anchor) -> bool;
	fn translate_by(&mut self, dx: f64, dy: f64);
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

pub struct Scene {
	cells: Vec<Cell>,
	index: HashMap<String, usize>,
	pub transform: ViewTransform,
	pub width: f64,
	pub height: f64,
	anonymous: usize,
}

impl Scene {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			cells: Vec::new(),
			index: HashMap::new(),
			transform: ViewTransform::default(),
			width,
			height,
			anonymous: 0,
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	#[cfg(test)]
	pub fn cells(&self) -> &[Cell] {
		&self.cells
	}

	pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
		self.cells.iter().filter_map(|cell| match cell {
			Cell::Node(node) => Some(node),
			Cell::Edge(_) => None,
		})
	}

	pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
		self.cells.iter().filter_map(|cell| match cell {
			Cell::Edge(edge) => Some(edge),
			Cell::Node(_) => None,
		})
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		match self.cell_by_id(id) {
			Some(Cell::Node(node)) => Some(node),
			_ => None,
		}
	}

	pub fn content_bounds(&self) -> Option<Bounds> {
		self.nodes()
			.map(|node| Bounds {
				x: node.x,
				y: node.y,
				width: node.width,
				height: node.height,
			})
			.reduce(Bounds::union)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<&GraphNode> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// last drawn wins
		self.nodes().filter(|node| node.contains(gx, gy)).last()
	}

	/// Zooms by `factor` keeping the screen point under the cursor fixed.
	pub fn zoom_at(&mut self, factor: f64, sx: f64, sy: f64, min: f64, max: f64) {
		let new_k = (self.transform.k * factor).clamp(min, max);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	fn place_point(&mut self, gx: f64, gy: f64, sx: f64, sy: f64) {
		self.transform.x = sx - gx * self.transform.k;
		self.transform.y = sy - gy * self.transform.k;
	}
}

impl RenderSurface for Scene {
	fn create_node(&mut self, spec: NodeSpec) -> GraphNode {
		let id = match spec.id.as_deref().map(str::trim) {
			Some(id) if !id.is_empty() => id.to_string(),
			_ => {
				self.anonymous += 1;
				format!("cell-{}", self.anonymous)
			}
		};
		let ports = [
			Port {
				id: port_id(&id, PortGroup::In),
				group: PortGroup::In,
			},
			Port {
				id: port_id(&id, PortGroup::Out),
				group: PortGroup::Out,
			},
		];
		GraphNode {
			id,
			shape: spec.shape,
			x: spec.x,
			y: spec.y,
			width: spec.width,
			height: spec.height,
			data: spec.data,
			ports,
		}
	}

	fn create_edge(&mut self, spec: EdgeSpec) -> GraphEdge {
		GraphEdge {
			id: spec.id,
			source: spec.source,
			target: spec.target,
			router: spec.router,
		}
	}

	fn reset_cells(&mut self, cells: Vec<Cell>) {
		self.index = cells
			.iter()
			.enumerate()
			.map(|(i, cell)| (cell.id().to_string(), i))
			.collect();
		self.cells = cells;
		self.anonymous = 0;
	}

	fn cell_by_id(&self, id: &str) -> Option<&Cell> {
		self.index.get(id).and_then(|&i| self.cells.get(i))
	}

	fn zoom(&self) -> f64 {
		self.transform.k
	}

	fn zoom_to(&mut self, scale: f64) {
		if !(scale.is_finite() && scale > 0.0) {
			return;
		}
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		let (gx, gy) = self.screen_to_graph(cx, cy);
		self.transform.k = scale;
		self.place_point(gx, gy, cx, cy);
	}

	fn zoom_to_fit(&mut self, padding: f64) {
		let Some(bounds) = self.content_bounds() else {
			return;
		};
		let (avail_w, avail_h) = (self.width - 2.0 * padding, self.height - 2.0 * padding);
		if avail_w <= 0.0 || avail_h <= 0.0 {
			return;
		}
		let k = (avail_w / bounds.width).min(avail_h / bounds.height);
		if !(k.is_finite() && k > 0.0) {
			return;
		}
		self.transform.k = k;
		self.center_content();
	}

	fn center_content(&mut self) {
		if let Some(bounds) = self.content_bounds() {
			let (gx, gy) = bounds.center();
			self.place_point(gx, gy, self.width / 2.0, self.height / 2.0);
		}
	}

	fn position_cell(&mut self, id: &str, anchor: Anchor) -> bool {
		let Some(node) = self.node(id) else {
			return false;
		};
		let cx = node.x + node.width / 2.0;
		let (gy, sy) = match anchor {
			Anchor::Top => (node.y, 0.0),
			Anchor::Center => (node.y + node.height / 2.0, self.height / 2.0),
		};
		self.place_point(cx, gy, self.width / 2.0, sy);
		true
	}

	fn translate_by(&mut self, dx: f64, dy: f64) {
		self.transform.x += dx;
		self.transform.y += dy;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn spec(id: Option<&str>, x: f64, y: f64) -> NodeSpec {
		NodeSpec {
			id: id.map(str::to_string),
			shape: PresentationCategory::CompactNode,
			x,
			y,
			width: 180.0,
			height: 60.0,
			data: DomainNode::default(),
		}
	}

	fn scene_with(nodes: &[(&str, f64, f64)]) -> Scene {
		let mut scene = Scene::new(800.0, 600.0);
		let cells: Vec<Cell> = nodes
			.iter()
			.map(|&(id, x, y)| Cell::Node(scene.create_node(spec(Some(id), x, y))))
			.collect();
		scene.reset_cells(cells);
		scene
	}

	#[test]
	fn assigns_ids_and_ports() {
		let mut scene = Scene::new(800.0, 600.0);
		let node = scene.create_node(spec(Some("  a "), 0.0, 0.0));
		assert_eq!(node.id, "a");
		assert_eq!(node.ports[0].id, "a-in");
		assert_eq!(node.ports[1].id, "a-out");

		let first = scene.create_node(spec(None, 0.0, 0.0));
		let second = scene.create_node(spec(Some(""), 0.0, 0.0));
		assert_eq!(first.id, "cell-1");
		assert_eq!(second.id, "cell-2");

		scene.reset_cells(Vec::new());
		assert_eq!(scene.create_node(spec(None, 0.0, 0.0)).id, "cell-1");
	}

	#[test]
	fn reset_replaces_every_cell() {
		let mut scene = scene_with(&[("a", 0.0, 0.0), ("b", 200.0, 0.0)]);
		assert!(scene.cell_by_id("a").is_some());
		let c = scene.create_node(spec(Some("c"), 0.0, 0.0));
		scene.reset_cells(vec![Cell::Node(c)]);
		assert!(scene.cell_by_id("a").is_none());
		assert!(scene.cell_by_id("c").is_some());
		assert_eq!(scene.cells().len(), 1);
	}

	#[test]
	fn ports_sit_on_top_and_bottom_centre() {
		let scene = scene_with(&[("a", 10.0, 20.0)]);
		let node = scene.node("a").unwrap();
		assert_eq!(node.port_position(PortGroup::In), (100.0, 20.0));
		assert_eq!(node.port_position(PortGroup::Out), (100.0, 80.0));
	}

	#[test]
	fn zoom_to_keeps_viewport_centre() {
		let mut scene = scene_with(&[("a", 0.0, 0.0)]);
		scene.translate_by(50.0, -30.0);
		let before = scene.screen_to_graph(400.0, 300.0);
		scene.zoom_to(2.5);
		let after = scene.screen_to_graph(400.0, 300.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
		assert_eq!(scene.zoom(), 2.5);
	}

	#[test]
	fn zoom_to_fit_fills_viewport_with_padding() {
		let mut scene = scene_with(&[("a", 0.0, 0.0), ("b", 200.0, 100.0)]);
		// content is 380 x 160
		scene.zoom_to_fit(24.0);
		let k = scene.zoom();
		assert!((k - 752.0 / 380.0).abs() < 1e-9);
		let (gx, gy) = scene.screen_to_graph(400.0, 300.0);
		assert!((gx - 190.0).abs() < 1e-9);
		assert!((gy - 80.0).abs() < 1e-9);
	}

	#[test]
	fn zoom_to_fit_without_content_is_a_no_op() {
		let mut scene = Scene::new(800.0, 600.0);
		scene.zoom_to_fit(24.0);
		assert_eq!(scene.transform, ViewTransform::default());
	}

	#[test]
	fn position_cell_top_aligns_node_to_viewport_top() {
		let mut scene = scene_with(&[("a", -90.0, 0.0)]);
		assert!(scene.position_cell("a", Anchor::Top));
		assert_eq!(scene.transform.x, 400.0);
		assert_eq!(scene.transform.y, 0.0);
		assert!(!scene.position_cell("missing", Anchor::Top));
	}

	#[test]
	fn hit_test_respects_transform() {
		let mut scene = scene_with(&[("a", 0.0, 0.0)]);
		scene.transform = ViewTransform {
			x: 100.0,
			y: 100.0,
			k: 2.0,
		};
		assert_eq!(scene.node_at_position(110.0, 110.0).map(|n| n.id.as_str()), Some("a"));
		assert!(scene.node_at_position(90.0, 110.0).is_none());
	}

	#[test]
	fn zoom_at_clamps_and_pins_cursor() {
		let mut scene = Scene::new(800.0, 600.0);
		let before = scene.screen_to_graph(200.0, 150.0);
		scene.zoom_at(1.1, 200.0, 150.0, 0.2, 4.0);
		let after = scene.screen_to_graph(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		scene.transform.k = 3.9;
		scene.zoom_at(1.1, 0.0, 0.0, 0.2, 4.0);
		assert_eq!(scene.zoom(), 4.0);
	}
}
