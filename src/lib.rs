//! Cluster graph view for The Codex: turns document clustering results into a
//! grouped, positioned graph and draws it on a canvas.
//!
//! [`layout`] is the target-independent core; the rest is Leptos CSR wiring.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

// Modules
mod components;
pub mod layout;
mod pages;

pub use components::cluster_graph::ClusterGraphCanvas;

// Top-Level pages
use crate::pages::home::Home;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// The app shell: document metadata around the cluster graph page.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="The Codex: Clusters" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Home />
	}
}
