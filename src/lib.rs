//! Grid-positioned node/edge charts drawn on a canvas, with labels kept
//! aligned to their shapes in canvas text, SVG or HTML.
//!
//! The [`time_graph`] module is the renderer itself and is usable without a
//! browser through [`Recorder`]. The Leptos app below hosts it on a page.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

/// The renderer: configuration, shapes, plotting, labels and host bindings.
pub mod time_graph;

// Modules
mod components;
mod pages;

pub use components::time_graph_canvas::TimeGraphCanvas;
pub use time_graph::*;

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the demo chart and handles 404's
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		<Title text="Time Graph" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
