//! Deduplicated node and relationship tables with resolved adjacency.

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::Error;

/// A labeled property-graph node. Identity is `id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
	pub id: String,
	/// Label set; a node may carry several.
	#[serde(default)]
	pub labels: Vec<String>,
	#[serde(default)]
	pub props: Map<String, Value>,
}

impl Node {
	/// A node with the given labels and no properties.
	pub fn new(id: impl Into<String>, labels: &[&str]) -> Self {
		Self {
			id: id.into(),
			labels: labels.iter().map(|l| l.to_string()).collect(),
			props: Map::new(),
		}
	}

	/// Builder: set a property.
	pub fn with_prop(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.props.insert(key.to_string(), value.into());
		self
	}

	/// Whether `label` is in the node's label set.
	pub fn has_label(&self, label: &str) -> bool {
		self.labels.iter().any(|l| l == label)
	}

	/// String property `key`. Non-string values read as absent.
	pub fn prop_str(&self, key: &str) -> Option<&str> {
		self.props.get(key).and_then(Value::as_str)
	}

	/// Display name: `props.name`, then `props.id`, then the node id.
	pub fn name(&self) -> &str {
		self.prop_str("name")
			.or_else(|| self.prop_str("id"))
			.unwrap_or(&self.id)
	}
}

/// A directed, typed relationship between two node ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
	pub from: String,
	pub to: String,
	/// Relationship type, `type` on the wire.
	#[serde(rename = "type")]
	pub rel_type: String,
	#[serde(default)]
	pub props: Map<String, Value>,
}

impl Relationship {
	/// A relationship with no properties.
	pub fn new(from: impl Into<String>, to: impl Into<String>, rel_type: impl Into<String>) -> Self {
		Self {
			from: from.into(),
			to: to.into(),
			rel_type: rel_type.into(),
			props: Map::new(),
		}
	}
}

/// A relationship seen from one endpoint, with the other endpoint resolved.
#[derive(Clone, Copy, Debug)]
pub struct Neighbor<'a> {
	/// The relationship as stored in [`Graph::relationships`].
	pub relationship: &'a Relationship,
	/// Index of the other endpoint in [`Graph::nodes`].
	pub index: usize,
	pub node: &'a Node,
}

/// Everything the detail panel needs for one node.
#[derive(Clone, Debug)]
pub struct Selection<'a> {
	pub node: &'a Node,
	pub outgoing: Vec<Neighbor<'a>>,
	pub incoming: Vec<Neighbor<'a>>,
}

impl<'a> Selection<'a> {
	/// Relationship counts per type, split by direction.
	pub fn summary(&self) -> (BTreeMap<&'a str, usize>, BTreeMap<&'a str, usize>) {
		(count_by_type(&self.outgoing), count_by_type(&self.incoming))
	}
}

fn count_by_type<'a>(list: &[Neighbor<'a>]) -> BTreeMap<&'a str, usize> {
	let mut counts = BTreeMap::new();
	for n in list {
		*counts.entry(n.relationship.rel_type.as_str()).or_insert(0) += 1;
	}
	counts
}

#[derive(Clone, Debug, Default)]
struct Adjacency {
	outgoing: Vec<usize>,
	incoming: Vec<usize>,
}

#[derive(Clone, Copy, Debug)]
struct Link {
	from: usize,
	to: usize,
}

/// Read-only graph built once per dataset load.
#[derive(Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	index: HashMap<String, usize>,
	relationships: Vec<Relationship>,
	links: Vec<Link>,
	adjacency: Vec<Adjacency>,
	diagnostics: Vec<Error>,
}

impl Graph {
	/// Build from decoded records. The first node with a given id wins;
	/// relationships with a missing endpoint are dropped and recorded.
	pub fn build(
		node_records: impl IntoIterator<Item = Node>,
		relationship_records: impl IntoIterator<Item = Relationship>,
	) -> Self {
		let mut graph = Graph::default();

		for node in node_records {
			if graph.index.contains_key(&node.id) {
				debug!("duplicate node {} ignored", node.id);
				continue;
			}
			graph.index.insert(node.id.clone(), graph.nodes.len());
			graph.nodes.push(node);
		}
		graph.adjacency = vec![Adjacency::default(); graph.nodes.len()];

		for rel in relationship_records {
			let (from, to) = match (graph.index.get(&rel.from), graph.index.get(&rel.to)) {
				(Some(&from), Some(&to)) => (from, to),
				(from, _) => {
					let missing = if from.is_none() { &rel.from } else { &rel.to };
					let err = Error::UnresolvedReference {
						from: rel.from.clone(),
						to: rel.to.clone(),
						rel_type: rel.rel_type.clone(),
						missing: missing.clone(),
					};
					warn!("{err}");
					graph.diagnostics.push(err);
					continue;
				}
			};
			let idx = graph.relationships.len();
			graph.adjacency[from].outgoing.push(idx);
			graph.adjacency[to].incoming.push(idx);
			graph.links.push(Link { from, to });
			graph.relationships.push(rel);
		}

		graph
	}

	/// Nodes in insertion order; positions are the indices used everywhere
	/// else in the layout.
	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	/// Resolved relationships in insertion order.
	pub fn relationships(&self) -> &[Relationship] {
		&self.relationships
	}

	/// Number of nodes.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Problems met while building (dropped relationships).
	pub fn diagnostics(&self) -> &[Error] {
		&self.diagnostics
	}

	/// Index of the node with `id` in [`Graph::nodes`].
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.index.get(id).copied()
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.index_of(id).map(|idx| &self.nodes[idx])
	}

	/// Resolved endpoint indices of relationship `rel`.
	pub fn endpoints(&self, rel: usize) -> (usize, usize) {
		let link = self.links[rel];
		(link.from, link.to)
	}

	/// Outgoing relationships of the node at `idx`, in insertion order.
	pub fn outgoing_at(&self, idx: usize) -> impl Iterator<Item = Neighbor<'_>> + '_ {
		self.adjacency[idx].outgoing.iter().map(move |&rel| {
			let to = self.links[rel].to;
			Neighbor {
				relationship: &self.relationships[rel],
				index: to,
				node: &self.nodes[to],
			}
		})
	}

	/// Incoming relationships of the node at `idx`, in insertion order.
	pub fn incoming_at(&self, idx: usize) -> impl Iterator<Item = Neighbor<'_>> + '_ {
		self.adjacency[idx].incoming.iter().map(move |&rel| {
			let from = self.links[rel].from;
			Neighbor {
				relationship: &self.relationships[rel],
				index: from,
				node: &self.nodes[from],
			}
		})
	}

	/// Outgoing relationships of the node with `id`; empty if it is unknown.
	pub fn outgoing(&self, id: &str) -> Vec<Neighbor<'_>> {
		self.index_of(id)
			.map(|idx| self.outgoing_at(idx).collect())
			.unwrap_or_default()
	}

	/// Incoming relationships of the node with `id`; empty if it is unknown.
	pub fn incoming(&self, id: &str) -> Vec<Neighbor<'_>> {
		self.index_of(id)
			.map(|idx| self.incoming_at(idx).collect())
			.unwrap_or_default()
	}

	/// The node with `id` and both of its relationship lists.
	pub fn selection(&self, id: &str) -> Option<Selection<'_>> {
		let idx = self.index_of(id)?;
		Some(Selection {
			node: &self.nodes[idx],
			outgoing: self.outgoing_at(idx).collect(),
			incoming: self.incoming_at(idx).collect(),
		})
	}
}

/// Picks a deterministic, ordered subset of nodes by label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSelector {
	pub label: String,
	/// Property used as a stable secondary sort key. Missing values sort
	/// as the empty string; ties keep graph insertion order.
	#[serde(default)]
	pub sort_by: Option<String>,
}

impl NodeSelector {
	/// Select every node labeled `label`, in insertion order.
	pub fn new(label: &str) -> Self {
		Self {
			label: label.to_string(),
			sort_by: None,
		}
	}

	/// Builder: sort the selection by a string property.
	pub fn sorted_by(mut self, key: &str) -> Self {
		self.sort_by = Some(key.to_string());
		self
	}

	pub fn matches(&self, node: &Node) -> bool {
		node.has_label(&self.label)
	}

	/// Indices of matching nodes in selection order.
	pub fn select(&self, graph: &Graph) -> Vec<usize> {
		let mut picked: Vec<usize> = (0..graph.len())
			.filter(|&idx| self.matches(&graph.nodes[idx]))
			.collect();
		if let Some(key) = &self.sort_by {
			picked.sort_by_key(|&idx| graph.nodes[idx].prop_str(key).unwrap_or(""));
		}
		picked
	}
}
