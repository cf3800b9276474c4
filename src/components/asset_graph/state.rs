use log::debug;

use super::camera::CameraController;
use super::layout::{CompactBox, Side, layout_tree};
use super::materialize::{ShapeRule, materialize};
use super::surface::{Anchor, GraphNode, RenderSurface, Scene};
use super::types::DomainNode;
use crate::config::GraphConfig;

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Everything the canvas component mutates: the scene, its camera, and the
/// pointer interaction state.
pub struct AssetGraphState {
	pub scene: Scene,
	pub camera: CameraController,
	pub pan: PanState,
	pub selected: Option<String>,
	pub hovered: Option<String>,
	pub dirty: bool,
	tree: Option<DomainNode>,
	annotated: Option<DomainNode>,
	shape_rule: ShapeRule,
	side: Side,
}

impl AssetGraphState {
	pub fn new(config: &GraphConfig, width: f64, height: f64) -> Self {
		Self {
			scene: Scene::new(width, height),
			camera: CameraController::new(config.fit_padding),
			pan: PanState::default(),
			selected: None,
			hovered: None,
			dirty: true,
			tree: None,
			annotated: None,
			shape_rule: config.shape_rule,
			side: config.side,
		}
	}

	/// Installs a freshly fetched tree, draws it and centres it.
	pub fn set_tree(&mut self, tree: DomainNode) {
		self.tree = Some(tree);
		self.selected = None;
		self.hovered = None;
		if self.rebuild() {
			self.settle_view();
		}
	}

	/// Classify, lay out and materialize the current tree in one go.
	/// Returns `false` when there is nothing to draw.
	pub fn rebuild(&mut self) -> bool {
		let Some(tree) = self.tree.as_ref() else {
			return false;
		};
		let Some(positioned) = layout_tree(tree, &CompactBox, self.side) else {
			debug!("asset tree has no root id, skipping render");
			return false;
		};
		let annotated = materialize(&mut self.scene, &positioned, self.shape_rule);
		self.camera.set_root(annotated.id.clone());
		self.annotated = Some(annotated);
		self.dirty = true;
		true
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.scene.resize(width, height);
		if self.rebuild() {
			self.settle_view();
		}
		self.dirty = true;
	}

	fn settle_view(&mut self) {
		self.camera.recenter(&mut self.scene);
		if let Some(expanded) = self.camera.panel_expanded() {
			self.camera.on_panel_toggle(&mut self.scene, expanded);
		}
	}

	#[cfg(test)]
	pub fn annotated_tree(&self) -> Option<&DomainNode> {
		self.annotated.as_ref()
	}

	pub fn selected_node(&self) -> Option<&GraphNode> {
		self.selected.as_deref().and_then(|id| self.scene.node(id))
	}

	/// Selects the node under the cursor, or clears the selection.
	pub fn select_at(&mut self, sx: f64, sy: f64) -> Option<&GraphNode> {
		let hit = self.scene.node_at_position(sx, sy).map(|node| node.id.clone());
		if hit != self.selected {
			self.selected = hit;
			self.dirty = true;
		}
		self.selected_node()
	}

	pub fn set_hover(&mut self, sx: f64, sy: f64) {
		let hit = self.scene.node_at_position(sx, sy).map(|node| node.id.clone());
		if hit != self.hovered {
			self.hovered = hit;
			self.dirty = true;
		}
	}

	pub fn clear_hover(&mut self) {
		if self.hovered.take().is_some() {
			self.dirty = true;
		}
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			transform_start_x: self.scene.transform.x,
			transform_start_y: self.scene.transform.y,
		};
	}

	pub fn update_pan(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		self.scene.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
		self.scene.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		self.dirty = true;
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	/// Centres the viewport on the node under the cursor.
	pub fn focus_at(&mut self, sx: f64, sy: f64) -> bool {
		let Some(id) = self.scene.node_at_position(sx, sy).map(|node| node.id.clone()) else {
			return false;
		};
		let moved = self.scene.position_cell(&id, Anchor::Center);
		self.dirty |= moved;
		moved
	}
}

#[cfg(test)]
mod tests {
	use super::super::types::NodeKind;
	use super::*;

	fn sample() -> DomainNode {
		DomainNode {
			id: Some("r".into()),
			name: "Root".into(),
			kind: NodeKind::Department,
			children: vec![
				DomainNode {
					id: Some("a".into()),
					kind: NodeKind::Owner,
					..Default::default()
				},
				DomainNode {
					id: Some("b".into()),
					kind: NodeKind::DataAsset,
					..Default::default()
				},
			],
			parent_id: None,
		}
	}

	fn state() -> AssetGraphState {
		AssetGraphState::new(&GraphConfig::default(), 1000.0, 800.0)
	}

	#[test]
	fn set_tree_renders_and_centres() {
		let mut state = state();
		state.set_tree(sample());
		assert_eq!(state.scene.nodes().count(), 3);
		assert_eq!(state.scene.edges().count(), 2);
		let bounds = state.scene.content_bounds().unwrap();
		let (gx, gy) = state.scene.screen_to_graph(500.0, 400.0);
		assert!((gx - (bounds.x + bounds.width / 2.0)).abs() < 1e-9);
		assert!((gy - (bounds.y + bounds.height / 2.0)).abs() < 1e-9);
		let annotated = state.annotated_tree().unwrap();
		assert_eq!(annotated.children[1].parent_id.as_deref(), Some("r"));
	}

	#[test]
	fn tree_without_root_id_draws_nothing() {
		let mut state = state();
		let mut tree = sample();
		tree.id = None;
		state.set_tree(tree);
		assert_eq!(state.scene.cells().len(), 0);
		assert!(state.annotated_tree().is_none());
	}

	#[test]
	fn config_selects_shape_rule_and_side() {
		let config = GraphConfig {
			shape_rule: ShapeRule::LayoutConsistent,
			side: Side::Top,
			..GraphConfig::default()
		};
		let mut state = AssetGraphState::new(&config, 1000.0, 800.0);
		let mut tree = sample();
		tree.kind = NodeKind::Catalog;
		state.set_tree(tree);
		let root = state.scene.node("r").unwrap();
		assert_eq!((root.width, root.height), (180.0, 84.0));
		let child = state.scene.node("a").unwrap();
		assert!(child.y + child.height <= root.y);

		let config = GraphConfig {
			shape_rule: ShapeRule::RenderTime,
			side: Side::Bottom,
			..GraphConfig::default()
		};
		let mut state = AssetGraphState::new(&config, 1000.0, 800.0);
		let mut tree = sample();
		tree.kind = NodeKind::Catalog;
		state.set_tree(tree);
		let root = state.scene.node("r").unwrap();
		assert_eq!((root.width, root.height), (180.0, 60.0));
	}

	#[test]
	fn resize_rebuilds_the_same_cells() {
		let mut state = state();
		state.set_tree(sample());
		let before = state.scene.cells().to_vec();
		state.resize(640.0, 480.0);
		assert_eq!(before, state.scene.cells());
		assert_eq!(state.scene.width, 640.0);
	}

	#[test]
	fn panel_offset_survives_resize() {
		let mut state = state();
		state.set_tree(sample());
		state.camera.on_panel_toggle(&mut state.scene, true);
		let before = state.scene.transform.clone();
		state.resize(1000.0, 800.0);
		assert_eq!(before, state.scene.transform);
	}

	#[test]
	fn select_and_pan() {
		let mut state = state();
		state.set_tree(sample());
		let root = state.scene.node("r").unwrap().clone();
		let k = state.scene.transform.k;
		let sx = state.scene.transform.x + (root.x + 1.0) * k;
		let sy = state.scene.transform.y + (root.y + 1.0) * k;
		let selected = state.select_at(sx, sy).map(|node| node.id.clone());
		assert_eq!(selected.as_deref(), Some("r"));

		assert!(state.select_at(-10_000.0, -10_000.0).is_none());

		let start = state.scene.transform.clone();
		state.begin_pan(10.0, 10.0);
		state.update_pan(40.0, 25.0);
		state.end_pan();
		assert_eq!(state.scene.transform.x, start.x + 30.0);
		assert_eq!(state.scene.transform.y, start.y + 15.0);
		assert!(!state.pan.active);
		state.update_pan(100.0, 100.0);
		assert_eq!(state.scene.transform.x, start.x + 30.0);
	}
}
