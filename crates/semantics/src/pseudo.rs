use std::cmp::Ordering;

use crate::{EncoderDecoder, OrderRelation, Parser, Renderer, SemanticsError, Value};

/// Stand-in returned when no semantics candidate matches a request.
///
/// Parsing and encoding fail with [`SemanticsError::Unsupported`], rendering
/// returns the diagnostic verbatim and ordering treats all values as equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoProvider {
	diagnostic: String,
}

impl PseudoProvider {
	pub fn new(diagnostic: impl Into<String>) -> Self {
		Self {
			diagnostic: diagnostic.into(),
		}
	}

	pub fn diagnostic(&self) -> &str {
		&self.diagnostic
	}

	fn unsupported(&self) -> SemanticsError {
		SemanticsError::Unsupported {
			diagnostic: self.diagnostic.clone(),
		}
	}
}

impl Parser for PseudoProvider {
	fn parse(&self, _text: &str) -> Result<Value, SemanticsError> {
		Err(self.unsupported())
	}

	fn presentation(&self, _value: &Value) -> String {
		self.diagnostic.clone()
	}

	fn is_pseudo(&self) -> bool {
		true
	}
}

impl Renderer for PseudoProvider {
	fn title(&self, _value: &Value) -> String {
		self.diagnostic.clone()
	}

	fn is_pseudo(&self) -> bool {
		true
	}
}

impl EncoderDecoder for PseudoProvider {
	fn encode(&self, _value: &Value) -> Result<String, SemanticsError> {
		Err(self.unsupported())
	}

	fn decode(&self, _encoded: &str) -> Result<Value, SemanticsError> {
		Err(self.unsupported())
	}

	fn is_pseudo(&self) -> bool {
		true
	}
}

impl OrderRelation for PseudoProvider {
	fn compare(&self, _a: &Value, _b: &Value) -> Ordering {
		Ordering::Equal
	}

	fn is_pseudo(&self) -> bool {
		true
	}
}
