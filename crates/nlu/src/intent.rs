use std::collections::HashMap;

use serde_json::Value;

/// A classified intent with its named, typed parameters.
///
/// Produced by the NLU collaborator, immutable once parsed, and owned by the
/// triggering event's processing task. Confidence and fulfillment text are
/// carried for logging but not consulted by dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntentResult {
    pub intent: String,
    pub parameters: HashMap<String, Value>,
    pub confidence: f32,
    pub fulfillment_text: Option<String>,
}

/// A complex duration entity: `{amount, unit}` with units like
/// `wk`, `day`, `h`, `min`, `s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationParam {
    pub amount: i64,
    pub unit: String,
}

impl IntentResult {
    pub fn new(intent: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            ..Self::default()
        }
    }

    /// Attach a parameter (builder form, used by tests and fixtures).
    pub fn with_param(mut self, name: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// A string parameter. The service sends empty strings for unset
    /// parameters; those read as absent.
    pub fn string_param(&self, name: &str) -> Option<&str> {
        match self.parameters.get(name)? {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// A numeric parameter, accepting numbers and numeric strings.
    pub fn number_param(&self, name: &str) -> Option<f64> {
        match self.parameters.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// A complex (structured) parameter.
    pub fn complex_param(&self, name: &str) -> Option<&serde_json::Map<String, Value>> {
        match self.parameters.get(name)? {
            Value::Object(map) if !map.is_empty() => Some(map),
            _ => None,
        }
    }

    /// A complex duration entity with integral amount and unit name.
    pub fn duration_param(&self, name: &str) -> Option<DurationParam> {
        let entity = self.complex_param(name)?;
        let amount = match entity.get("amount")? {
            Value::Number(n) => n.as_f64()? as i64,
            Value::String(s) => s.parse().ok()?,
            _ => return None,
        };
        let unit = entity.get("unit")?.as_str()?.to_string();
        Some(DurationParam { amount, unit })
    }

    /// Parse a detect-intent REST response body.
    pub fn from_detect_intent(body: &Value) -> Result<Self, crate::Error> {
        let result = body
            .get("queryResult")
            .ok_or(crate::Error::MissingField("queryResult"))?;

        let intent = result
            .pointer("/intent/displayName")
            .and_then(Value::as_str)
            .ok_or(crate::Error::MissingField("queryResult.intent.displayName"))?
            .to_string();

        let parameters = result
            .get("parameters")
            .and_then(Value::as_object)
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        let confidence = result
            .get("intentDetectionConfidence")
            .and_then(Value::as_f64)
            .unwrap_or_default() as f32;

        let fulfillment_text = result
            .get("fulfillmentText")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from);

        Ok(Self {
            intent,
            parameters,
            confidence,
            fulfillment_text,
        })
    }
}
