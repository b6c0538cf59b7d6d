/// Convenience alias for layout results.
pub type Result<T> = std::result::Result<T, Error>;

/// Data-shape problems met while loading or laying out a graph.
///
/// None of these abort a load: parse and reference errors are collected as
/// diagnostics while the offending record is skipped.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
	/// A JSONL line that could not be decoded.
	#[error("line {line}: {message}")]
	Parse {
		/// 1-based line number in the stream.
		line: usize,
		message: String,
	},

	/// A relationship whose endpoint is not in the node table.
	#[error("relationship {from} -[{rel_type}]-> {to} references missing node {missing}")]
	UnresolvedReference {
		from: String,
		to: String,
		rel_type: String,
		/// The endpoint id that did not resolve; `from` when both are missing.
		missing: String,
	},

	/// No node carries the label used to pick tree roots.
	#[error("no root candidates labeled {label}")]
	EmptyGraph {
		/// The root selector's label.
		label: String,
	},
}
