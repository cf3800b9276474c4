use log::debug;

use super::classify::{classify, classify_for_render};
use super::surface::{
	Cell, EdgeSpec, Endpoint, NodeSpec, PortGroup, RenderSurface, Router, port_id,
};
use super::types::{DomainNode, NodeKind, PositionedNode, PresentationCategory};

/// Which classifier decides a cell's shape and size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShapeRule {
	/// Asset and business-object shapes only; catalogs and promoted schemas
	/// draw as compact nodes even though the layout reserved more room.
	#[default]
	RenderTime,
	/// The same classification the layout used.
	LayoutConsistent,
}

struct Walk<'s, S> {
	surface: &'s mut S,
	cells: Vec<Cell>,
	rule: ShapeRule,
	business_object: bool,
}

impl<S: RenderSurface> Walk<'_, S> {
	fn category(&self, kind: NodeKind) -> PresentationCategory {
		match self.rule {
			ShapeRule::RenderTime => classify_for_render(kind),
			ShapeRule::LayoutConsistent => classify(kind, self.business_object),
		}
	}

	/// Pre-order: the node first, then each child subtree followed by the edge
	/// into it. Returns the assigned id and the annotated domain subtree.
	fn visit(&mut self, node: &PositionedNode, mut payload: DomainNode, is_root: bool) -> (String, DomainNode) {
		let shape = self.category(payload.kind);
		let size = shape.size();
		let mut created = self.surface.create_node(NodeSpec {
			id: Some(node.id.clone()),
			shape,
			x: node.x,
			y: node.y,
			width: size.width,
			height: size.height,
			data: payload.clone(),
		});
		let id = created.id.clone();
		created.data.id = Some(id.clone());
		payload.id = Some(id.clone());
		self.cells.push(Cell::Node(created));

		let router = if is_root && node.children.len() > 1 {
			None
		} else {
			Some(Router::Normal)
		};

		let mut children = Vec::with_capacity(node.children.len());
		for child in &node.children {
			let mut child_payload = child.data.clone();
			child_payload.parent_id = Some(id.clone());
			let (child_id, annotated) = self.visit(child, child_payload, false);
			let edge = self.surface.create_edge(EdgeSpec {
				id: format!("{id}::{child_id}"),
				source: Endpoint {
					cell: id.clone(),
					port: port_id(&id, PortGroup::Out),
				},
				target: Endpoint {
					port: port_id(&child_id, PortGroup::In),
					cell: child_id,
				},
				router,
			});
			self.cells.push(Cell::Edge(edge));
			children.push(annotated);
		}
		payload.children = children;
		(id, payload)
	}
}

/// Builds every node and edge for `root` and swaps them into `surface` in a
/// single `reset_cells` call. Returns a copy of the domain tree carrying the
/// ids the surface assigned and the parent link of every node.
pub fn materialize<S: RenderSurface>(surface: &mut S, root: &PositionedNode, rule: ShapeRule) -> DomainNode {
	let business_object = root
		.children
		.iter()
		.any(|child| child.data.kind == NodeKind::BusinessObject);
	let total = root.count();
	let mut walk = Walk {
		surface,
		cells: Vec::with_capacity(2 * total),
		rule,
		business_object,
	};
	let (_, annotated) = walk.visit(root, root.data.clone(), true);

	let Walk { surface, cells, .. } = walk;
	debug!(
		"materialized {} nodes, {} edges",
		total,
		cells.len() - total
	);
	surface.reset_cells(cells);
	annotated
}
