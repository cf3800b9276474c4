//! Hierarchical layout.
//!
//! [`LayoutProvider`] is the seam for the layout algorithm; [`CompactBox`] is
//! the provider the canvas uses. It is a contour-based tidy tree for nodes of
//! varying size: every node occupies a padded box (`width + 2 * hgap` by
//! `height + 2 * vgap`), children start directly below their parent's padded
//! box, sibling subtrees are pushed apart until their contours no longer
//! intersect, and each parent is centred over its first and last child.

use super::classify::{classify, root_children_have_business_object};
use super::types::{DomainNode, PositionedNode};

pub const HGAP: f64 = 7.0;
pub const VGAP: f64 = 14.0;
pub const ROOT_VGAP: f64 = 36.0;

const EPSILON: f64 = 1e-9;

/// Which side of a parent its children are placed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
	Top,
	#[default]
	Bottom,
}

type Accessor<'a, T> = &'a dyn Fn(&DomainNode) -> T;

pub struct LayoutOptions<'a> {
	pub side: Side,
	pub get_id: Accessor<'a, String>,
	pub get_width: Accessor<'a, f64>,
	pub get_height: Accessor<'a, f64>,
	pub get_hgap: Accessor<'a, f64>,
	pub get_vgap: Accessor<'a, f64>,
}

pub trait LayoutProvider {
	fn compute(&self, tree: &DomainNode, options: &LayoutOptions<'_>) -> PositionedNode;
}

/// Runs the layout for the asset graph. Returns `None` when the root has no id,
/// which callers treat as "nothing to draw yet".
pub fn layout_tree<P: LayoutProvider>(
	tree: &DomainNode,
	provider: &P,
	side: Side,
) -> Option<PositionedNode> {
	if !tree.has_id() {
		return None;
	}
	let business_object = root_children_have_business_object(tree);
	let root_id = tree.id.clone();
	let spread_root = tree.children.len() > 1;

	let get_id = |node: &DomainNode| node.id.clone().unwrap_or_default();
	let get_width = |node: &DomainNode| classify(node.kind, business_object).size().width;
	let get_height = |node: &DomainNode| classify(node.kind, business_object).size().height;
	let get_hgap = |_: &DomainNode| HGAP;
	let get_vgap = |node: &DomainNode| {
		if spread_root && node.id == root_id {
			ROOT_VGAP
		} else {
			VGAP
		}
	};

	let options = LayoutOptions {
		side,
		get_id: &get_id,
		get_width: &get_width,
		get_height: &get_height,
		get_hgap: &get_hgap,
		get_vgap: &get_vgap,
	};
	Some(provider.compute(tree, &options))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CompactBox;

/// Horizontal extent of a subtree over a vertical band, relative to the
/// subtree root's padded box.
#[derive(Clone, Copy, Debug)]
struct Span {
	top: f64,
	bottom: f64,
	left: f64,
	right: f64,
}

impl Span {
	fn shifted(self, dx: f64, dy: f64) -> Span {
		Span {
			top: self.top + dy,
			bottom: self.bottom + dy,
			left: self.left + dx,
			right: self.right + dx,
		}
	}

	fn shares_band(&self, other: &Span) -> bool {
		self.top < other.bottom - EPSILON && other.top < self.bottom - EPSILON
	}
}

struct Boxed<'t> {
	data: &'t DomainNode,
	id: String,
	width: f64,
	height: f64,
	hgap: f64,
	vgap: f64,
	children: Vec<usize>,
	// Padded left edge relative to the parent's padded left edge.
	rel_x: f64,
}

impl Boxed<'_> {
	fn outer_width(&self) -> f64 {
		self.width + 2.0 * self.hgap
	}

	fn outer_height(&self) -> f64 {
		self.height + 2.0 * self.vgap
	}
}

impl LayoutProvider for CompactBox {
	fn compute(&self, tree: &DomainNode, options: &LayoutOptions<'_>) -> PositionedNode {
		let mut arena = Vec::with_capacity(tree.count());
		let root = collect(tree, options, &mut arena);
		arrange(&mut arena, root);

		let origin = (
			arena[root].hgap + arena[root].width / 2.0,
			arena[root].vgap,
		);
		let root_height = arena[root].height;
		place(&arena, root, 0.0, 0.0, origin, options.side, root_height)
	}
}

fn collect<'t>(node: &'t DomainNode, options: &LayoutOptions<'_>, arena: &mut Vec<Boxed<'t>>) -> usize {
	let idx = arena.len();
	arena.push(Boxed {
		data: node,
		id: (options.get_id)(node),
		width: (options.get_width)(node),
		height: (options.get_height)(node),
		hgap: (options.get_hgap)(node),
		vgap: (options.get_vgap)(node),
		children: Vec::with_capacity(node.children.len()),
		rel_x: 0.0,
	});
	for child in &node.children {
		let child_idx = collect(child, options, arena);
		arena[idx].children.push(child_idx);
	}
	idx
}

/// Post-order pass fixing every child's offset; returns the subtree contour.
fn arrange(arena: &mut [Boxed<'_>], idx: usize) -> Vec<Span> {
	let (width, height) = (arena[idx].outer_width(), arena[idx].outer_height());
	let own = Span {
		top: 0.0,
		bottom: height,
		left: 0.0,
		right: width,
	};
	let children = arena[idx].children.clone();
	if children.is_empty() {
		return vec![own];
	}

	let mut merged: Vec<Span> = Vec::new();
	let mut offsets = Vec::with_capacity(children.len());
	for &child in &children {
		let contour = arrange(arena, child);
		let shift = if merged.is_empty() {
			0.0
		} else {
			separation(&merged, &contour)
		};
		offsets.push(shift);
		merged.extend(contour.into_iter().map(|span| span.shifted(shift, 0.0)));
	}

	let last = children.len() - 1;
	let span_right = offsets[last] + arena[children[last]].outer_width();
	let parent_left = (offsets[0] + span_right) / 2.0 - width / 2.0;
	for (&child, offset) in children.iter().zip(&offsets) {
		arena[child].rel_x = offset - parent_left;
	}

	let mut contour = Vec::with_capacity(merged.len() + 1);
	contour.push(own);
	contour.extend(
		merged
			.into_iter()
			.map(|span| span.shifted(-parent_left, height)),
	);
	contour
}

/// Smallest shift of `next` that keeps it clear of `placed` on every shared band.
fn separation(placed: &[Span], next: &[Span]) -> f64 {
	let mut shift = f64::NEG_INFINITY;
	for a in placed {
		for b in next.iter().filter(|b| a.shares_band(b)) {
			shift = shift.max(a.right - b.left);
		}
	}
	if shift.is_finite() { shift } else { 0.0 }
}

fn place(
	arena: &[Boxed<'_>],
	idx: usize,
	left: f64,
	top: f64,
	origin: (f64, f64),
	side: Side,
	root_height: f64,
) -> PositionedNode {
	let node = &arena[idx];
	let x = left + node.hgap - origin.0;
	let below = top + node.vgap - origin.1;
	let y = match side {
		Side::Bottom => below,
		Side::Top => root_height - (below + node.height),
	};
	let child_top = top + node.outer_height();
	let children = node
		.children
		.iter()
		.map(|&child| {
			place(
				arena,
				child,
				left + arena[child].rel_x,
				child_top,
				origin,
				side,
				root_height,
			)
		})
		.collect();

	PositionedNode {
		id: node.id.clone(),
		x,
		y,
		width: node.width,
		height: node.height,
		data: node.data.detached(),
		children,
	}
}
