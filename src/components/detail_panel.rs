use std::sync::Arc;

use leptos::prelude::*;

use crate::layout::{Graph, Neighbor};

/// Owned, display-ready copy of one node's selection.
#[derive(Clone, Debug, PartialEq)]
struct Details {
	name: String,
	id: String,
	labels: String,
	props: String,
	outgoing: Vec<(String, String)>,
	incoming: Vec<(String, String)>,
	counts: Vec<String>,
}

fn rows(list: &[Neighbor<'_>]) -> Vec<(String, String)> {
	list.iter()
		.map(|n| (n.relationship.rel_type.clone(), n.node.name().to_string()))
		.collect()
}

fn details(graph: &Graph, id: &str) -> Option<Details> {
	let selection = graph.selection(id)?;
	let (out_counts, in_counts) = selection.summary();
	let counts = out_counts
		.iter()
		.map(|(ty, n)| format!("{ty} → {n}"))
		.chain(in_counts.iter().map(|(ty, n)| format!("{ty} ← {n}")))
		.collect();
	Some(Details {
		name: selection.node.name().to_string(),
		id: selection.node.id.clone(),
		labels: selection.node.labels.join(", "),
		props: serde_json::to_string_pretty(&selection.node.props).unwrap_or_default(),
		outgoing: rows(&selection.outgoing),
		incoming: rows(&selection.incoming),
		counts,
	})
}

/// Side panel describing the selected node; renders nothing without one.
#[component]
pub fn DetailPanel(
	#[prop(into)] graph: Signal<Option<Arc<Graph>>>,
	#[prop(into)] selected: Signal<Option<String>>,
	#[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
	move || {
		let graph = graph.get()?;
		let id = selected.get()?;
		let d = details(&graph, &id)?;
		let outgoing = d
			.outgoing
			.into_iter()
			.map(|(ty, other)| view! { <li><code>{ty}</code>" → "{other}</li> })
			.collect_view();
		let incoming = d
			.incoming
			.into_iter()
			.map(|(ty, other)| view! { <li>{other}" → "<code>{ty}</code></li> })
			.collect_view();
		let counts = d
			.counts
			.into_iter()
			.map(|c| view! { <li>{c}</li> })
			.collect_view();

		Some(view! {
			<aside class="detail-panel">
				<button class="close" on:click=move |_| on_close.run(())>"×"</button>
				<h2>{d.name}</h2>
				<p class="labels">{d.labels}</p>
				<p class="id"><code>{d.id}</code></p>
				<pre class="props">{d.props}</pre>
				<h3>"Outgoing"</h3>
				<ul>{outgoing}</ul>
				<h3>"Incoming"</h3>
				<ul>{incoming}</ul>
				<h3>"Summary"</h3>
				<ul>{counts}</ul>
			</aside>
		})
	}
}
