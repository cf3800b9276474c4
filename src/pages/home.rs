use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{info, warn};

use crate::api::fetch_tree;
use crate::components::asset_graph::{AssetGraph, DomainNode, NodeKind};
use crate::config::GraphConfig;

const SAMPLE_KINDS: [NodeKind; 10] = [
	NodeKind::Department,
	NodeKind::Owner,
	NodeKind::InformationSystem,
	NodeKind::DataSource,
	NodeKind::Schema,
	NodeKind::DataAsset,
	NodeKind::BusinessObject,
	NodeKind::AssetTag,
	NodeKind::Api,
	NodeKind::DataView,
];

/// Generate a sample asset tree (deterministic random parent links).
fn sample_tree(n: usize) -> DomainNode {
	let mut children: Vec<Vec<usize>> = vec![Vec::new(); n.max(1)];
	for i in 1..n {
		let parent = (rand_simple(i) * (i as f64)) as usize;
		children[parent].push(i);
	}
	sample_node(0, &children)
}

fn sample_node(i: usize, children: &[Vec<usize>]) -> DomainNode {
	let kind = if i == 0 {
		NodeKind::Catalog
	} else {
		SAMPLE_KINDS[(rand_simple(i * 7) * SAMPLE_KINDS.len() as f64) as usize % SAMPLE_KINDS.len()]
	};
	DomainNode {
		id: Some(format!("asset-{i}")),
		name: format!("{} {}", kind.label(), i),
		kind,
		children: children[i]
			.iter()
			.map(|&child| sample_node(child, children))
			.collect(),
		parent_id: None,
	}
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

#[component]
fn NodeDetails(#[prop(into)] node: Signal<Option<DomainNode>>) -> impl IntoView {
	move || match node.get() {
		Some(node) => view! {
			<dl class="node-details">
				<dt>"Name"</dt>
				<dd>{node.name}</dd>
				<dt>"Type"</dt>
				<dd>{node.kind.label()}</dd>
				<dt>"Id"</dt>
				<dd>{node.id.unwrap_or_default()}</dd>
				<dt>"Parent"</dt>
				<dd>{node.parent_id.unwrap_or_else(|| "none".to_string())}</dd>
			</dl>
		}
		.into_any(),
		None => view! { <p class="hint">"Select a node to see its details."</p> }.into_any(),
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = GraphConfig::default();
	let (tree, set_tree) = signal(None::<DomainNode>);
	let (load_error, set_load_error) = signal(None::<String>);
	let (panel_open, set_panel_open) = signal(false);
	let (selected, set_selected) = signal(None::<DomainNode>);

	match config.endpoint.clone() {
		Some(url) => spawn_local(async move {
			// try_set drops the result if the page is gone by now
			match fetch_tree(&url).await {
				Ok(fetched) => {
					info!("loaded asset tree with {} nodes", fetched.count());
					let _ = set_tree.try_set(Some(fetched));
				}
				Err(err) => {
					warn!("asset tree unavailable: {err}");
					let _ = set_load_error.try_set(Some(err.to_string()));
				}
			}
		}),
		None => set_tree.set(Some(sample_tree(40))),
	}

	let on_select = Callback::new(move |node: Option<DomainNode>| set_selected.set(node));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="asset-page" style="display: flex; height: 100vh;">
				<div class="graph-area" style="flex: 1; position: relative; overflow: hidden;">
					<AssetGraph
						tree=tree
						panel_expanded=panel_open
						on_select=on_select
						config=config
					/>
					{move || {
						load_error
							.get()
							.map(|message| view! { <div class="error-banner">{message}</div> })
					}}
				</div>
				<aside
					class="side-panel"
					style=move || {
						if panel_open.get() { "width: 280px;" } else { "width: 32px;" }
					}
				>
					<button on:click=move |_| set_panel_open.update(|open| *open = !*open)>
						{move || if panel_open.get() { "»" } else { "«" }}
					</button>
					<Show when=move || panel_open.get()>
						<NodeDetails node=selected />
					</Show>
				</aside>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	fn ids(node: &DomainNode, out: &mut HashSet<String>) {
		out.insert(node.id.clone().unwrap_or_default());
		for child in &node.children {
			ids(child, out);
		}
	}

	#[test]
	fn sample_tree_has_requested_size_and_unique_ids() {
		let tree = sample_tree(40);
		assert_eq!(tree.count(), 40);
		assert_eq!(tree.kind, NodeKind::Catalog);
		let mut seen = HashSet::new();
		ids(&tree, &mut seen);
		assert_eq!(seen.len(), 40);
	}

	#[test]
	fn sample_tree_is_deterministic() {
		assert_eq!(sample_tree(25), sample_tree(25));
		assert_eq!(sample_tree(1).count(), 1);
	}
}
