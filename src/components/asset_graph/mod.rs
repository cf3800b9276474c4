mod camera;
mod classify;
mod component;
mod layout;
mod materialize;
mod render;
mod state;
mod surface;
mod types;

pub use component::AssetGraph;
pub use layout::Side;
pub use materialize::ShapeRule;
pub use types::{DomainNode, NodeKind};
