use std::sync::Arc;

use leptos::prelude::*;
use log::{debug, error};

use crate::components::detail_panel::DetailPanel;
use crate::components::graph_canvas::{GraphCanvas, ViewMode};
use crate::components::legend::Legend;
use crate::data::{DATASETS, dataset_by_key, load_config, load_dataset};
use crate::layout::{Graph, LayoutConfig};

#[derive(Clone, Debug)]
enum LoadState {
	Loading,
	Failed(String),
	Ready(Arc<Graph>),
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (dataset, set_dataset) = signal(DATASETS[0].key);
	let (mode, set_mode) = signal(ViewMode::default());
	let (load, set_load) = signal(LoadState::Loading);
	let (selected, set_selected) = signal(None::<String>);
	let (reset, set_reset) = signal(0u32);
	let (core_highlight, set_core_highlight) = signal(false);
	let (config, set_config) = signal(LayoutConfig::default());
	// Bumped on every load; a fetch finishing under an older value is stale.
	let generation = StoredValue::new(0u64);

	leptos::task::spawn_local(async move {
		set_config.set(load_config().await);
	});

	Effect::new(move |_| {
		let key = dataset.get();
		let Some(ds) = dataset_by_key(key) else {
			set_load.set(LoadState::Failed(format!("unknown dataset {key}")));
			return;
		};
		generation.update_value(|g| *g += 1);
		let current = generation.get_value();
		set_load.set(LoadState::Loading);
		set_selected.set(None);

		leptos::task::spawn_local(async move {
			let result = load_dataset(ds).await;
			if generation.get_value() != current {
				debug!("discarding stale load of {}", ds.key);
				return;
			}
			set_load.set(match result {
				Ok(graph) => LoadState::Ready(Arc::new(graph)),
				Err(err) => {
					error!("{err}");
					LoadState::Failed(err)
				}
			});
		});
	});

	let graph = Signal::derive(move || {
		load.with(|l| match l {
			LoadState::Ready(graph) => Some(graph.clone()),
			_ => None,
		})
	});

	let status = move || {
		load.with(|l| match l {
			LoadState::Loading => "Loading…".to_string(),
			LoadState::Failed(err) => format!("Failed to load: {err}"),
			LoadState::Ready(graph) => format!(
				"{} nodes, {} relationships",
				graph.len(),
				graph.relationships().len()
			),
		})
	};

	let on_select = Callback::new(move |id: Option<String>| set_selected.set(id));
	let on_close = Callback::new(move |_: ()| set_selected.set(None));

	view! {
		<div class="fullscreen-graph">
			<GraphCanvas
				graph=graph
				mode=mode
				config=config
				reset=reset
				core_highlight=core_highlight
				selected=selected
				on_select=on_select
			/>
			<div class="graph-overlay">
				<h1>"Property Graph"</h1>
				<div class="controls">
					<select on:change=move |ev| {
						if let Some(ds) = dataset_by_key(&event_target_value(&ev)) {
							set_dataset.set(ds.key);
						}
					}>
						{DATASETS
							.iter()
							.map(|d| {
								view! {
									<option value=d.key selected=move || dataset.get() == d.key>
										{d.label}
									</option>
								}
							})
							.collect_view()}
					</select>
					{ViewMode::ALL
						.into_iter()
						.map(|m| {
							view! {
								<button
									class:active=move || mode.get() == m
									on:click=move |_| set_mode.set(m)
								>
									{m.label()}
								</button>
							}
						})
						.collect_view()}
					<button on:click=move |_| set_reset.update(|n| *n += 1)>"Reset view"</button>
					<label>
						<input
							type="checkbox"
							prop:checked=core_highlight
							on:change=move |ev| set_core_highlight.set(event_target_checked(&ev))
						/>
						"Highlight core modules"
					</label>
				</div>
				<p class="subtitle">{status}</p>
				<p class="hint">"Drag to pan. Scroll to zoom. Double-click to reset. Click a node for details."</p>
			</div>
			<Legend mode=mode />
			<DetailPanel graph=graph selected=selected on_close=on_close />
		</div>
	}
}
