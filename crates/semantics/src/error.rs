use thiserror::Error;

/// Errors raised while parsing, encoding or decoding values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticsError {
	/// Input text could not be parsed into the value type.
	#[error("cannot parse '{input}' as {value_type}: {reason}")]
	Parse {
		input: String,
		value_type: &'static str,
		reason: String,
	},
	/// The value handed to a provider has the wrong shape.
	#[error("expected a {expected} value, got {got}")]
	TypeMismatch {
		expected: &'static str,
		got: &'static str,
	},
	/// An encoded form could not be decoded.
	#[error("cannot decode '{0}'")]
	Decode(String),
	/// No provider was selected; carries the selection diagnostic.
	#[error("unsupported operation: {diagnostic}")]
	Unsupported { diagnostic: String },
}
