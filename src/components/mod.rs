pub mod asset_graph;
