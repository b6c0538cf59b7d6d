use leptos::prelude::*;

use super::graph_canvas::{ViewMode, kind_color, kind_label};

/// Color key for the node families the current view can show.
#[component]
pub fn Legend(#[prop(into)] mode: Signal<ViewMode>) -> impl IntoView {
	view! {
		<div class="legend">
			{move || {
				mode.get()
					.legend()
					.iter()
					.map(|&kind| {
						view! {
							<div class="item">
								<span class="dot" style:background-color=kind_color(kind)></span>
								{kind_label(kind)}
							</div>
						}
					})
					.collect_view()
			}}
		</div>
	}
}
