//! Semantics for the primitive value types.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::{
	EncoderDecoder, OrderRelation, Parser, Renderer, SemanticsError, Value, ValueSemanticsProvider,
};

fn mismatch(expected: &'static str, got: &Value) -> SemanticsError {
	SemanticsError::TypeMismatch {
		expected,
		got: got.type_name(),
	}
}

/// Implements [`ValueSemanticsProvider`] by handing out clones of `self` for
/// every semantics kind.
macro_rules! provide_all {
	($ty:ty, $id:literal) => {
		impl ValueSemanticsProvider for $ty {
			fn id(&self) -> &str {
				$id
			}

			fn parser(&self) -> Option<Arc<dyn Parser>> {
				Some(Arc::new(*self))
			}

			fn renderer(&self) -> Option<Arc<dyn Renderer>> {
				Some(Arc::new(*self))
			}

			fn encoder_decoder(&self) -> Option<Arc<dyn EncoderDecoder>> {
				Some(Arc::new(*self))
			}

			fn order_relation(&self) -> Option<Arc<dyn OrderRelation>> {
				Some(Arc::new(*self))
			}
		}
	};
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolSemantics;

provide_all!(BoolSemantics, "builtin::bool");

impl Parser for BoolSemantics {
	fn parse(&self, text: &str) -> Result<Value, SemanticsError> {
		match text.trim().to_ascii_lowercase().as_str() {
			"true" | "yes" | "y" | "1" => Ok(Value::Bool(true)),
			"false" | "no" | "n" | "0" => Ok(Value::Bool(false)),
			_ => Err(SemanticsError::Parse {
				input: text.to_string(),
				value_type: "bool",
				reason: "expected true or false".into(),
			}),
		}
	}

	fn presentation(&self, value: &Value) -> String {
		value.to_string()
	}
}

impl Renderer for BoolSemantics {
	fn title(&self, value: &Value) -> String {
		match value.as_bool() {
			Some(true) => "Yes".into(),
			Some(false) => "No".into(),
			None => value.to_string(),
		}
	}
}

impl EncoderDecoder for BoolSemantics {
	fn encode(&self, value: &Value) -> Result<String, SemanticsError> {
		value
			.as_bool()
			.map(|b| b.to_string())
			.ok_or_else(|| mismatch("bool", value))
	}

	fn decode(&self, encoded: &str) -> Result<Value, SemanticsError> {
		encoded
			.parse::<bool>()
			.map(Value::Bool)
			.map_err(|_| SemanticsError::Decode(encoded.to_string()))
	}
}

impl OrderRelation for BoolSemantics {
	fn compare(&self, a: &Value, b: &Value) -> Ordering {
		a.as_bool().cmp(&b.as_bool())
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntSemantics;

provide_all!(IntSemantics, "builtin::i64");

impl Parser for IntSemantics {
	fn parse(&self, text: &str) -> Result<Value, SemanticsError> {
		let cleaned: String = text.trim().chars().filter(|c| *c != '_' && *c != ',').collect();
		cleaned
			.parse::<i64>()
			.map(Value::Int)
			.map_err(|e| SemanticsError::Parse {
				input: text.to_string(),
				value_type: "i64",
				reason: e.to_string(),
			})
	}

	fn presentation(&self, value: &Value) -> String {
		value.to_string()
	}
}

impl Renderer for IntSemantics {
	fn title(&self, value: &Value) -> String {
		value.to_string()
	}
}

impl EncoderDecoder for IntSemantics {
	fn encode(&self, value: &Value) -> Result<String, SemanticsError> {
		value
			.as_int()
			.map(|i| i.to_string())
			.ok_or_else(|| mismatch("i64", value))
	}

	fn decode(&self, encoded: &str) -> Result<Value, SemanticsError> {
		encoded
			.parse::<i64>()
			.map(Value::Int)
			.map_err(|_| SemanticsError::Decode(encoded.to_string()))
	}
}

impl OrderRelation for IntSemantics {
	fn compare(&self, a: &Value, b: &Value) -> Ordering {
		a.as_int().cmp(&b.as_int())
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatSemantics;

provide_all!(FloatSemantics, "builtin::f64");

impl Parser for FloatSemantics {
	fn parse(&self, text: &str) -> Result<Value, SemanticsError> {
		text.trim()
			.parse::<f64>()
			.map(Value::Float)
			.map_err(|e| SemanticsError::Parse {
				input: text.to_string(),
				value_type: "f64",
				reason: e.to_string(),
			})
	}

	fn presentation(&self, value: &Value) -> String {
		value.to_string()
	}
}

impl Renderer for FloatSemantics {
	fn title(&self, value: &Value) -> String {
		value.to_string()
	}
}

impl EncoderDecoder for FloatSemantics {
	fn encode(&self, value: &Value) -> Result<String, SemanticsError> {
		value
			.as_float()
			.map(|x| x.to_string())
			.ok_or_else(|| mismatch("f64", value))
	}

	fn decode(&self, encoded: &str) -> Result<Value, SemanticsError> {
		encoded
			.parse::<f64>()
			.map(Value::Float)
			.map_err(|_| SemanticsError::Decode(encoded.to_string()))
	}
}

impl OrderRelation for FloatSemantics {
	fn compare(&self, a: &Value, b: &Value) -> Ordering {
		match (a.as_float(), b.as_float()) {
			(Some(x), Some(y)) => x.total_cmp(&y),
			(x, y) => x.is_some().cmp(&y.is_some()),
		}
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextSemantics;

provide_all!(TextSemantics, "builtin::String");

impl Parser for TextSemantics {
	fn parse(&self, text: &str) -> Result<Value, SemanticsError> {
		Ok(Value::Text(text.to_string()))
	}

	fn presentation(&self, value: &Value) -> String {
		value.to_string()
	}
}

impl Renderer for TextSemantics {
	fn title(&self, value: &Value) -> String {
		value.to_string()
	}
}

impl EncoderDecoder for TextSemantics {
	fn encode(&self, value: &Value) -> Result<String, SemanticsError> {
		value
			.as_text()
			.map(str::to_string)
			.ok_or_else(|| mismatch("String", value))
	}

	fn decode(&self, encoded: &str) -> Result<Value, SemanticsError> {
		Ok(Value::Text(encoded.to_string()))
	}
}

impl OrderRelation for TextSemantics {
	fn compare(&self, a: &Value, b: &Value) -> Ordering {
		a.as_text().cmp(&b.as_text())
	}
}
