/// Leptos components.
pub mod time_graph_canvas;
