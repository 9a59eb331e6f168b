//! Provider traits for the four semantics kinds.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::{SemanticsError, Value};

/// Turns user-entered text into a value and back into editable text.
pub trait Parser: Send + Sync {
	fn parse(&self, text: &str) -> Result<Value, SemanticsError>;

	/// Text suitable for re-editing `value`.
	fn presentation(&self, value: &Value) -> String;

	fn is_pseudo(&self) -> bool {
		false
	}
}

/// Produces display titles for values.
pub trait Renderer: Send + Sync {
	fn title(&self, value: &Value) -> String;

	fn is_pseudo(&self) -> bool {
		false
	}
}

/// Lossless string encoding, used for persistence and URLs.
pub trait EncoderDecoder: Send + Sync {
	fn encode(&self, value: &Value) -> Result<String, SemanticsError>;

	fn decode(&self, encoded: &str) -> Result<Value, SemanticsError>;

	fn is_pseudo(&self) -> bool {
		false
	}
}

/// Total order over values of one type.
pub trait OrderRelation: Send + Sync {
	fn compare(&self, a: &Value, b: &Value) -> Ordering;

	fn is_pseudo(&self) -> bool {
		false
	}
}

/// Bundle of semantics for one value type. Every kind is optional.
pub trait ValueSemanticsProvider: Send + Sync {
	/// Identifier used in diagnostics.
	fn id(&self) -> &str;

	fn parser(&self) -> Option<Arc<dyn Parser>> {
		None
	}

	fn renderer(&self) -> Option<Arc<dyn Renderer>> {
		None
	}

	fn encoder_decoder(&self) -> Option<Arc<dyn EncoderDecoder>> {
		None
	}

	fn order_relation(&self) -> Option<Arc<dyn OrderRelation>> {
		None
	}
}
