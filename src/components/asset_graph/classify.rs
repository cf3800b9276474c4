use super::types::{DomainNode, NodeKind, PresentationCategory};

/// Layout-time classification.
///
/// `sibling_has_business_object` promotes schema nodes to the wide business
/// shape. Callers evaluate it against the current tree on every pass.
pub fn classify(kind: NodeKind, sibling_has_business_object: bool) -> PresentationCategory {
	match kind {
		NodeKind::DataAsset => PresentationCategory::AssetNode,
		NodeKind::Catalog => PresentationCategory::CatalogNode,
		NodeKind::BusinessObject => PresentationCategory::WideBusinessNode,
		NodeKind::Schema if sibling_has_business_object => PresentationCategory::WideBusinessNode,
		_ => PresentationCategory::CompactNode,
	}
}

/// Render-time classification. Ignores the catalog shape and the schema
/// promotion; see DESIGN.md for why the two rules are kept apart.
pub fn classify_for_render(kind: NodeKind) -> PresentationCategory {
	match kind {
		NodeKind::DataAsset => PresentationCategory::AssetNode,
		NodeKind::BusinessObject => PresentationCategory::WideBusinessNode,
		_ => PresentationCategory::CompactNode,
	}
}

/// Only the root's direct children are inspected, and the answer applies to
/// every schema node in the tree.
pub fn root_children_have_business_object(root: &DomainNode) -> bool {
	root.children
		.iter()
		.any(|child| child.kind == NodeKind::BusinessObject)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_kind_has_a_category() {
		for kind in NodeKind::ALL {
			for flag in [false, true] {
				let category = classify(kind, flag);
				let expected = match kind {
					NodeKind::DataAsset => PresentationCategory::AssetNode,
					NodeKind::Catalog => PresentationCategory::CatalogNode,
					NodeKind::BusinessObject => PresentationCategory::WideBusinessNode,
					NodeKind::Schema if flag => PresentationCategory::WideBusinessNode,
					_ => PresentationCategory::CompactNode,
				};
				assert_eq!(category, expected, "{kind:?} flag={flag}");
			}
		}
	}

	#[test]
	fn unknown_kind_is_compact() {
		assert_eq!(
			classify(NodeKind::Unknown, true),
			PresentationCategory::CompactNode
		);
		assert_eq!(
			classify_for_render(NodeKind::Unknown),
			PresentationCategory::CompactNode
		);
	}

	#[test]
	fn render_rule_ignores_catalog_and_schema_promotion() {
		assert_eq!(
			classify_for_render(NodeKind::Catalog),
			PresentationCategory::CompactNode
		);
		assert_eq!(
			classify_for_render(NodeKind::Schema),
			PresentationCategory::CompactNode
		);
		assert_eq!(
			classify_for_render(NodeKind::DataAsset),
			PresentationCategory::AssetNode
		);
	}

	#[test]
	fn dimension_table() {
		let size = PresentationCategory::AssetNode.size();
		assert_eq!((size.width, size.height), (400.0, 60.0));
		let size = PresentationCategory::CatalogNode.size();
		assert_eq!((size.width, size.height), (180.0, 84.0));
		let size = PresentationCategory::WideBusinessNode.size();
		assert_eq!((size.width, size.height), (300.0, 84.0));
		let size = PresentationCategory::CompactNode.size();
		assert_eq!((size.width, size.height), (180.0, 60.0));
	}

	#[test]
	fn business_object_check_only_looks_at_root_children() {
		let nested = DomainNode {
			kind: NodeKind::Department,
			children: vec![DomainNode {
				kind: NodeKind::Owner,
				children: vec![DomainNode {
					kind: NodeKind::BusinessObject,
					..Default::default()
				}],
				..Default::default()
			}],
			..Default::default()
		};
		assert!(!root_children_have_business_object(&nested));

		let direct = DomainNode {
			children: vec![
				DomainNode {
					kind: NodeKind::Schema,
					..Default::default()
				},
				DomainNode {
					kind: NodeKind::BusinessObject,
					..Default::default()
				},
			],
			..Default::default()
		};
		assert!(root_children_have_business_object(&direct));
	}
}
