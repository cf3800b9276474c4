use serde::{Deserialize, Serialize};

/// Semantic type of a catalog entity, as sent by the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
	DataAsset,
	BusinessObject,
	Owner,
	Department,
	InformationSystem,
	AssetTag,
	DataSource,
	Schema,
	Catalog,
	Api,
	DataView,
	#[default]
	#[serde(other)]
	Unknown,
}

impl NodeKind {
	#[cfg(test)]
	pub const ALL: [NodeKind; 12] = [
		NodeKind::DataAsset,
		NodeKind::BusinessObject,
		NodeKind::Owner,
		NodeKind::Department,
		NodeKind::InformationSystem,
		NodeKind::AssetTag,
		NodeKind::DataSource,
		NodeKind::Schema,
		NodeKind::Catalog,
		NodeKind::Api,
		NodeKind::DataView,
		NodeKind::Unknown,
	];

	pub fn label(self) -> &'static str {
		match self {
			NodeKind::DataAsset => "Data asset",
			NodeKind::BusinessObject => "Business object",
			NodeKind::Owner => "Owner",
			NodeKind::Department => "Department",
			NodeKind::InformationSystem => "Information system",
			NodeKind::AssetTag => "Asset tag",
			NodeKind::DataSource => "Data source",
			NodeKind::Schema => "Schema",
			NodeKind::Catalog => "Catalog",
			NodeKind::Api => "API",
			NodeKind::DataView => "Data view",
			NodeKind::Unknown => "Unknown",
		}
	}
}

/// One entity of the asset hierarchy. Children order is the left-to-right
/// sibling order of the drawing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainNode {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(default)]
	pub name: String,
	#[serde(rename = "type", default)]
	pub kind: NodeKind,
	#[serde(default)]
	pub children: Vec<DomainNode>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parent_id: Option<String>,
}

impl DomainNode {
	/// A copy of this node without its children, used as a cell payload.
	pub fn detached(&self) -> DomainNode {
		DomainNode {
			id: self.id.clone(),
			name: self.name.clone(),
			kind: self.kind,
			children: Vec::new(),
			parent_id: self.parent_id.clone(),
		}
	}

	pub fn has_id(&self) -> bool {
		self.id.as_deref().is_some_and(|id| !id.is_empty())
	}

	pub fn count(&self) -> usize {
		1 + self.children.iter().map(DomainNode::count).sum::<usize>()
	}
}

/// Visual class of a node; controls its size and palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PresentationCategory {
	CompactNode,
	WideBusinessNode,
	AssetNode,
	CatalogNode,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}

impl PresentationCategory {
	pub fn size(self) -> Size {
		let (width, height) = match self {
			PresentationCategory::CompactNode => (180.0, 60.0),
			PresentationCategory::WideBusinessNode => (300.0, 84.0),
			PresentationCategory::AssetNode => (400.0, 60.0),
			PresentationCategory::CatalogNode => (180.0, 84.0),
		};
		Size { width, height }
	}

	/// Fill and stroke colors used by the canvas renderer.
	pub fn palette(self) -> (&'static str, &'static str) {
		match self {
			PresentationCategory::CompactNode => ("#f4f6fb", "#8c9bb5"),
			PresentationCategory::WideBusinessNode => ("#fff7e6", "#fa8c16"),
			PresentationCategory::AssetNode => ("#e6f4ff", "#1677ff"),
			PresentationCategory::CatalogNode => ("#f6ffed", "#52c41a"),
		}
	}
}

/// Output of the layout stage. `x`/`y` is the top-left of the drawn rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	pub data: DomainNode,
	pub children: Vec<PositionedNode>,
}

impl PositionedNode {
	pub fn count(&self) -> usize {
		1 + self.children.iter().map(PositionedNode::count).sum::<usize>()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_wire_tree() {
		let json = r#"{
			"id": "r",
			"name": "Root",
			"type": "department",
			"children": [
				{"id": "a", "name": "A", "type": "business-object"},
				{"id": "b", "name": "B", "type": "something-new", "children": []},
				{"id": "c", "name": "C"}
			]
		}"#;
		let tree: DomainNode = serde_json::from_str(json).unwrap();
		assert_eq!(tree.kind, NodeKind::Department);
		assert_eq!(tree.children.len(), 3);
		assert_eq!(tree.children[0].kind, NodeKind::BusinessObject);
		assert_eq!(tree.children[1].kind, NodeKind::Unknown);
		assert_eq!(tree.children[2].kind, NodeKind::Unknown);
		assert!(tree.children[2].children.is_empty());
		assert_eq!(tree.count(), 4);
	}

	#[test]
	fn missing_root_id_decodes_as_absent() {
		let tree: DomainNode = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
		assert!(!tree.has_id());
		let tree: DomainNode = serde_json::from_str(r#"{"id": ""}"#).unwrap();
		assert!(!tree.has_id());
	}

	#[test]
	fn parent_id_serializes_camel_case() {
		let node = DomainNode {
			id: Some("c".into()),
			parent_id: Some("p".into()),
			kind: NodeKind::DataView,
			..Default::default()
		};
		let json = serde_json::to_string(&node).unwrap();
		assert!(json.contains(r#""parentId":"p""#));
		assert!(json.contains(r#""type":"data-view""#));
	}

	#[test]
	fn detached_drops_children_only() {
		let node = DomainNode {
			id: Some("r".into()),
			name: "Root".into(),
			kind: NodeKind::Catalog,
			children: vec![DomainNode::default()],
			parent_id: None,
		};
		let copy = node.detached();
		assert!(copy.children.is_empty());
		assert_eq!(copy.name, "Root");
		assert_eq!(copy.kind, NodeKind::Catalog);
	}
}
