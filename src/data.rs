//! Sample datasets, the optional layout config, and the browser fetch that
//! loads them.

use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use crate::layout::{self, Graph, LayoutConfig};

/// Optional layout overrides served next to the app.
pub const CONFIG_URL: &str = "layout.json";

/// Where a dataset's records live.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
	/// Separate node and relationship files.
	Split {
		nodes_url: &'static str,
		rels_url: &'static str,
	},
	/// One file holding both record kinds.
	Combined { url: &'static str },
}

/// A selectable dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dataset {
	pub key: &'static str,
	pub label: &'static str,
	pub source: Source,
}

/// Datasets offered in the selector; the first is loaded on start.
pub const DATASETS: &[Dataset] = &[
	Dataset {
		key: "full",
		label: "Full architecture",
		source: Source::Split {
			nodes_url: "samples/full_nodes.jsonl",
			rels_url: "samples/full_relationships.jsonl",
		},
	},
	Dataset {
		key: "minimal",
		label: "Minimal",
		source: Source::Split {
			nodes_url: "samples/minimal_nodes.jsonl",
			rels_url: "samples/minimal_relationships.jsonl",
		},
	},
	Dataset {
		key: "combined",
		label: "Single-file export",
		source: Source::Combined {
			url: "samples/combined.jsonl",
		},
	},
];

/// Look up a dataset by its selector key.
pub fn dataset_by_key(key: &str) -> Option<&'static Dataset> {
	DATASETS.iter().find(|d| d.key == key)
}

async fn fetch_text(url: &str) -> Result<String, String> {
	let window = web_sys::window().ok_or("no window")?;
	let response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(|e| format!("{url}: {e:?}"))?;
	let response: Response = response
		.dyn_into()
		.map_err(|_| format!("{url}: not a Response"))?;
	if !response.ok() {
		return Err(format!("{url}: HTTP {}", response.status()));
	}
	let text = response.text().map_err(|e| format!("{url}: {e:?}"))?;
	JsFuture::from(text)
		.await
		.map_err(|e| format!("{url}: {e:?}"))?
		.as_string()
		.ok_or_else(|| format!("{url}: body is not text"))
}

/// Fetch the files of `dataset` and build its graph.
pub async fn load_dataset(dataset: &Dataset) -> Result<Graph, String> {
	let (graph, skipped) = match dataset.source {
		Source::Split { nodes_url, rels_url } => {
			let nodes = fetch_text(nodes_url).await?;
			let rels = fetch_text(rels_url).await?;
			layout::load_graph(&nodes, &rels)
		}
		Source::Combined { url } => layout::load_mixed(&fetch_text(url).await?),
	};
	if !skipped.is_empty() {
		warn!("{}: skipped {} malformed records", dataset.key, skipped.len());
	}
	info!(
		"loaded {}: {} nodes, {} relationships, {} dropped",
		dataset.key,
		graph.len(),
		graph.relationships().len(),
		graph.diagnostics().len()
	);
	Ok(graph)
}

/// Fetch [`CONFIG_URL`], falling back to defaults when it is missing or
/// malformed.
pub async fn load_config() -> LayoutConfig {
	let text = match fetch_text(CONFIG_URL).await {
		Ok(text) => text,
		Err(err) => {
			debug!("{err}; using the default layout config");
			return LayoutConfig::default();
		}
	};
	match LayoutConfig::from_json(&text) {
		Ok(config) => {
			info!("layout config loaded from {CONFIG_URL}");
			config
		}
		Err(err) => {
			warn!("{CONFIG_URL}: {err}; using the default layout config");
			LayoutConfig::default()
		}
	}
}
