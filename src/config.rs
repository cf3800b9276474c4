//! Build-time settings for the asset graph page.

use crate::components::asset_graph::{ShapeRule, Side};

/// Endpoint serving the asset tree as JSON, read at compile time.
const ENDPOINT_VAR: Option<&str> = option_env!("ASSET_GRAPH_ENDPOINT");
/// `layout` draws every node with the shape the layout reserved for it.
const SHAPE_RULE_VAR: Option<&str> = option_env!("ASSET_GRAPH_SHAPE_RULE");
/// `top` grows the tree upwards from the root.
const SIDE_VAR: Option<&str> = option_env!("ASSET_GRAPH_SIDE");

#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	/// `None` renders the built-in sample tree.
	pub endpoint: Option<String>,
	/// Padding kept around the content by "fit to screen".
	pub fit_padding: f64,
	pub shape_rule: ShapeRule,
	pub side: Side,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			endpoint: endpoint_from(ENDPOINT_VAR),
			fit_padding: 24.0,
			shape_rule: shape_rule_from(SHAPE_RULE_VAR),
			side: side_from(SIDE_VAR),
		}
	}
}

fn endpoint_from(raw: Option<&str>) -> Option<String> {
	raw.map(str::trim)
		.filter(|url| !url.is_empty())
		.map(str::to_string)
}

fn shape_rule_from(raw: Option<&str>) -> ShapeRule {
	match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
		Some("layout" | "layout-consistent") => ShapeRule::LayoutConsistent,
		_ => ShapeRule::RenderTime,
	}
}

fn side_from(raw: Option<&str>) -> Side {
	match raw.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
		Some("top") => Side::Top,
		_ => Side::Bottom,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn blank_endpoint_means_sample_data() {
		assert_eq!(endpoint_from(None), None);
		assert_eq!(endpoint_from(Some("   ")), None);
		assert_eq!(
			endpoint_from(Some(" https://catalog.local/api/assets/tree ")).as_deref(),
			Some("https://catalog.local/api/assets/tree")
		);
	}

	#[test]
	fn shape_rule_and_side_options() {
		assert_eq!(shape_rule_from(None), ShapeRule::RenderTime);
		assert_eq!(shape_rule_from(Some("render")), ShapeRule::RenderTime);
		assert_eq!(shape_rule_from(Some(" Layout ")), ShapeRule::LayoutConsistent);
		assert_eq!(
			shape_rule_from(Some("layout-consistent")),
			ShapeRule::LayoutConsistent
		);
		assert_eq!(side_from(None), Side::Bottom);
		assert_eq!(side_from(Some("left")), Side::Bottom);
		assert_eq!(side_from(Some("TOP")), Side::Top);
	}

	#[test]
	fn defaults() {
		let config = GraphConfig::default();
		assert_eq!(config.fit_padding, 24.0);
		assert_eq!(config.shape_rule, shape_rule_from(SHAPE_RULE_VAR));
		assert_eq!(config.side, side_from(SIDE_VAR));
	}
}
