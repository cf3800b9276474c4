//! Browser viewer for a data-catalog asset hierarchy.
//!
//! The home page loads one tree of catalog entities (departments, owners,
//! business objects, data assets, schemas, ...) from the configured endpoint,
//! or generates a sample tree when none is set. The tree is classified into
//! node shapes, laid out as a compact top-down tree, turned into nodes and
//! edges on a canvas scene, and shown with zoom, pan and a details panel.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

mod api;
mod components;
mod config;
mod error;
mod pages;

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Sends `log` records to the browser console and reports panics there too.
/// Call once before mounting [`App`].
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("asset graph viewer starting");
}

/// Root view: the asset graph page at `/`, anything else gets the not-found page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		<Title text="Asset graph" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
