//! Disease risk prediction contract.
//!
//! `PredictionRequest` is what the client sends to the inference service;
//! `PredictionResult` is what a successful response decodes into. Tag-like
//! fields (`Disease`, `RiskLabel`) keep unrecognized values verbatim instead
//! of failing to decode, so rendering can fall back to a default style.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The chronic condition a prediction is requested for.
///
/// Serialized as the lowercase wire name. `Other` carries a raw value that
/// is none of the three known diseases; it is forwarded unchanged and the
/// service decides what to do with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Disease {
    Diabetes,
    Heart,
    Hypertension,
    Other(String),
}

impl Disease {
    /// The three diseases the inference service is known to support, in
    /// the order they are offered to the user.
    pub const KNOWN: [Disease; 3] = [Disease::Diabetes, Disease::Heart, Disease::Hypertension];

    /// The wire name (`"diabetes"`, `"heart"`, `"hypertension"`, or the raw value).
    pub fn as_str(&self) -> &str {
        match self {
            Disease::Diabetes => "diabetes",
            Disease::Heart => "heart",
            Disease::Hypertension => "hypertension",
            Disease::Other(raw) => raw,
        }
    }

    /// Human-readable option label.
    pub fn display_name(&self) -> &str {
        match self {
            Disease::Diabetes => "Diabetes",
            Disease::Heart => "Heart Disease",
            Disease::Hypertension => "Hypertension",
            Disease::Other(raw) => raw,
        }
    }
}

impl Default for Disease {
    fn default() -> Self {
        Disease::Diabetes
    }
}

impl From<String> for Disease {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "diabetes" => Disease::Diabetes,
            "heart" => Disease::Heart,
            "hypertension" => Disease::Hypertension,
            _ => Disease::Other(raw),
        }
    }
}

impl From<&str> for Disease {
    fn from(raw: &str) -> Self {
        Disease::from(raw.to_string())
    }
}

impl From<Disease> for String {
    fn from(disease: Disease) -> Self {
        match disease {
            Disease::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of one prediction submission.
///
/// Numbers are coerced from raw form text at submit time. A field that
/// failed to coerce is NaN and goes out as JSON `null`; input correctness
/// is the service's call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub disease: Disease,
    /// Age in years.
    pub age: f64,
    /// Body-mass index, conventionally one decimal.
    pub bmi: f64,
    /// Fasting glucose in mg/dL.
    pub glucose: f64,
}

/// Coarse categorical risk tag accompanying a numeric risk score.
///
/// Compared literally and case-sensitively: `"high"` is not `High`, it is
/// `Other("high")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLabel {
    Low,
    Moderate,
    High,
    Other(String),
}

impl RiskLabel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLabel::Low => "Low",
            RiskLabel::Moderate => "Moderate",
            RiskLabel::High => "High",
            RiskLabel::Other(raw) => raw,
        }
    }
}

impl From<String> for RiskLabel {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Low" => RiskLabel::Low,
            "Moderate" => RiskLabel::Moderate,
            "High" => RiskLabel::High,
            _ => RiskLabel::Other(raw),
        }
    }
}

impl From<&str> for RiskLabel {
    fn from(raw: &str) -> Self {
        RiskLabel::from(raw.to_string())
    }
}

impl From<RiskLabel> for String {
    fn from(label: RiskLabel) -> Self {
        match label {
            RiskLabel::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The raw input value a feature attribution refers to.
///
/// The service echoes either a number (`140`) or a string (`"yes"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(n) => write!(f, "{}", n),
            FeatureValue::Text(s) => f.write_str(s),
        }
    }
}

/// One row of the SHAP explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationItem {
    /// Feature name, e.g. `"glucose"`.
    pub feature: String,
    /// The input value that was scored.
    pub value: FeatureValue,
    /// Signed contribution of this feature to the risk score.
    pub shap_value: f64,
}

/// Successful response of the prediction contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub disease: String,
    pub risk_score: f64,
    pub risk_label: RiskLabel,
    /// Ordered feature attributions. `None` when the service omitted the
    /// field or sent something that is not a list of attributions.
    #[serde(default, deserialize_with = "explanation_if_list", skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Vec<ExplanationItem>>,
    /// Free-form generated preventive advice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<String>,
}

/// Accept `explanation` only when it is a well-formed list; anything else
/// is treated as absent so the rest of the result still renders.
fn explanation_if_list<'de, D>(deserializer: D) -> Result<Option<Vec<ExplanationItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(value @ Value::Array(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}
