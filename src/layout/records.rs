//! JSONL record decoding.
//!
//! One JSON object per line. Blank lines are ignored, undecodable lines are
//! skipped and reported, and records carrying a `kind` that does not match
//! the stream are dropped.

use log::warn;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::Error;
use super::graph::{Node, Relationship};

const NODE_KIND: &str = "node";
const RELATIONSHIP_KIND: &str = "relationship";

/// Records decoded from one stream plus the lines that were skipped.
#[derive(Clone, Debug)]
pub struct Decoded<T> {
	pub records: Vec<T>,
	pub skipped: Vec<Error>,
}

impl<T> Default for Decoded<T> {
	fn default() -> Self {
		Self {
			records: Vec::new(),
			skipped: Vec::new(),
		}
	}
}

/// Decode a node stream.
pub fn parse_nodes(text: &str) -> Decoded<Node> {
	parse_stream(text, NODE_KIND)
}

/// Decode a relationship stream.
pub fn parse_relationships(text: &str) -> Decoded<Relationship> {
	parse_stream(text, RELATIONSHIP_KIND)
}

/// Decode a stream holding both record kinds. Records without a `kind`
/// are classified by the presence of `from` and `to`.
pub fn parse_mixed(text: &str) -> (Decoded<Node>, Decoded<Relationship>) {
	let mut nodes = Decoded::default();
	let mut rels = Decoded::default();

	for (line, value) in lines(text, &mut nodes.skipped) {
		let kind = match value.get("kind").and_then(Value::as_str) {
			Some(kind) => kind.to_string(),
			None if value.get("from").is_some() && value.get("to").is_some() => {
				RELATIONSHIP_KIND.to_string()
			}
			None => NODE_KIND.to_string(),
		};
		match kind.as_str() {
			NODE_KIND => push_record(line, value, &mut nodes),
			RELATIONSHIP_KIND => push_record(line, value, &mut rels),
			other => warn!("line {line}: unknown record kind {other:?} skipped"),
		}
	}

	(nodes, rels)
}

fn parse_stream<T: DeserializeOwned>(text: &str, kind: &str) -> Decoded<T> {
	let mut out = Decoded::default();
	for (line, value) in lines(text, &mut out.skipped) {
		match value.get("kind").and_then(Value::as_str) {
			Some(k) if k != kind => {
				warn!("line {line}: {k:?} record in {kind} stream skipped");
			}
			_ => push_record(line, value, &mut out),
		}
	}
	out
}

fn lines(text: &str, skipped: &mut Vec<Error>) -> Vec<(usize, Value)> {
	let mut values = Vec::new();
	for (i, l) in text.lines().enumerate() {
		let (line, l) = (i + 1, l.trim());
		if l.is_empty() {
			continue;
		}
		match serde_json::from_str::<Value>(l) {
			Ok(value) if value.is_object() => values.push((line, value)),
			Ok(_) => skip(skipped, line, "expected a JSON object".to_string()),
			Err(e) => skip(skipped, line, e.to_string()),
		}
	}
	values
}

fn push_record<T: DeserializeOwned>(line: usize, value: Value, out: &mut Decoded<T>) {
	match serde_json::from_value(value) {
		Ok(record) => out.records.push(record),
		Err(e) => skip(&mut out.skipped, line, e.to_string()),
	}
}

fn skip(skipped: &mut Vec<Error>, line: usize, message: String) {
	let err = Error::Parse { line, message };
	warn!("{err}");
	skipped.push(err);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_nodes_skips_bad_lines() {
		let text = r#"{"kind":"node","id":"a","labels":["Layer"],"props":{"name":"A"}}

not json
{"id":"b"}
{"kind":"relationship","from":"a","to":"b","type":"CONTAINS"}
[1,2]
"#;
		let decoded = parse_nodes(text);
		let ids: Vec<_> = decoded.records.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["a", "b"]);
		assert_eq!(decoded.records[0].name(), "A");
		assert!(decoded.records[1].labels.is_empty());

		let lines: Vec<_> = decoded
			.skipped
			.iter()
			.map(|e| match e {
				Error::Parse { line, .. } => *line,
				other => panic!("unexpected {other:?}"),
			})
			.collect();
		assert_eq!(lines, [3, 6]);
	}

	#[test]
	fn test_parse_relationships_requires_fields() {
		let text = "{\"from\":\"a\",\"to\":\"b\",\"type\":\"DEPENDS_ON\"}\r\n{\"from\":\"a\"}\n";
		let decoded = parse_relationships(text);
		assert_eq!(decoded.records.len(), 1);
		assert_eq!(decoded.records[0].rel_type, "DEPENDS_ON");
		assert_eq!(decoded.skipped.len(), 1);
	}

	#[test]
	fn test_parse_mixed_classifies() {
		let text = r#"{"kind":"node","id":"a"}
{"id":"b","labels":["Module"]}
{"from":"a","to":"b","type":"CONTAINS"}
{"kind":"relationship","from":"b","to":"a","type":"DEPENDS_ON","props":{"w":1}}
{"kind":"mystery","id":"c"}
"#;
		let (nodes, rels) = parse_mixed(text);
		assert_eq!(nodes.records.len(), 2);
		assert_eq!(rels.records.len(), 2);
		assert_eq!(rels.records[1].props.get("w"), Some(&Value::from(1)));
	}
}
