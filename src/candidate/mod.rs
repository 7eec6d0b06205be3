//! Candidate profiles as returned by the vector store.
//!
//! The store hands back loosely typed rows; [`CandidateAttributes`] is the typed
//! view the criteria matchers and the scorer work against. Attributes the
//! pipeline does not know about are kept in [`CandidateAttributes::extra`].

#[cfg(test)]
mod tests;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::scoring::RerankStrategy;

/// Attribute names requested from the vector store by default.
pub const DEFAULT_ATTRIBUTES: &[&str] = &[
    "name",
    "email",
    "country",
    "rerankSummary",
    "education",
    "experience",
    "deg_degrees",
    "deg_schools",
    "deg_fos",
    "exp_titles",
    "exp_companies",
    "exp_years",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Stored profile attributes.
pub struct CandidateAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Free-text summary written for re-ranking.
    #[serde(
        rename = "rerankSummary",
        default,
        deserialize_with = "null_as_default"
    )]
    pub rerank_summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deg_degrees: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deg_schools: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub deg_fos: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exp_titles: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exp_companies: Vec<String>,
    /// Experience buckets such as `"3"` or `"10+"`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub exp_years: Vec<String>,
    /// Everything else the store returned.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CandidateAttributes {
    /// Builds attributes from a JSON object, ignoring fields of the wrong shape.
    pub fn from_json_map(map: Map<String, Value>) -> Self {
        serde_json::from_value(Value::Object(map.clone())).unwrap_or_else(|_| {
            // Fall back field by field so one malformed attribute does not
            // discard the whole row.
            let mut attrs = Self::default();
            for (key, value) in map {
                attrs.set(&key, value);
            }
            attrs
        })
    }

    fn set(&mut self, key: &str, value: Value) {
        fn text(value: &Value) -> Option<String> {
            match value {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            }
        }

        fn list(value: &Value) -> Vec<String> {
            match value {
                Value::Array(items) => items.iter().filter_map(text).collect(),
                Value::Null => Vec::new(),
                other => text(other).into_iter().collect(),
            }
        }

        match key {
            "name" => self.name = text(&value),
            "email" => self.email = text(&value),
            "country" => self.country = text(&value),
            "rerankSummary" => self.rerank_summary = text(&value).unwrap_or_default(),
            "education" => self.education = list(&value),
            "experience" => self.experience = list(&value),
            "deg_degrees" => self.deg_degrees = list(&value),
            "deg_schools" => self.deg_schools = list(&value),
            "deg_fos" => self.deg_fos = list(&value),
            "exp_titles" => self.exp_titles = list(&value),
            "exp_companies" => self.exp_companies = list(&value),
            "exp_years" => self.exp_years = list(&value),
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
    }

    /// Returns the values of a list attribute by its stored name.
    pub fn list_field(&self, field: &str) -> Option<&[String]> {
        match field {
            "education" => Some(&self.education),
            "experience" => Some(&self.experience),
            "deg_degrees" => Some(&self.deg_degrees),
            "deg_schools" => Some(&self.deg_schools),
            "deg_fos" => Some(&self.deg_fos),
            "exp_titles" => Some(&self.exp_titles),
            "exp_companies" => Some(&self.exp_companies),
            "exp_years" => Some(&self.exp_years),
            _ => None,
        }
    }

    /// Lowercased summary.
    pub fn summary_lower(&self) -> String {
        self.rerank_summary.to_lowercase()
    }

    /// Lowercased, space-joined values of a list attribute.
    pub fn joined_lower(&self, field: &str) -> String {
        self.list_field(field)
            .map(|values| values.join(" ").to_lowercase())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A profile retrieved from the vector store.
pub struct Candidate {
    /// Store-assigned identifier (submitted to the evaluation API).
    #[serde(rename = "_id")]
    pub id: String,
    /// Vector distance to the query; lower is closer.
    #[serde(default)]
    pub distance: Option<f32>,
    #[serde(default)]
    pub attributes: CandidateAttributes,
}

impl Candidate {
    pub fn new(id: impl Into<String>, distance: Option<f32>, attributes: CandidateAttributes) -> Self {
        Self {
            id: id.into(),
            distance,
            attributes,
        }
    }

    /// Distance used for scoring; missing distances count as `0.0`.
    pub fn distance_or_zero(&self) -> f32 {
        self.distance.unwrap_or(0.0)
    }

    /// Document text handed to the cross-encoder.
    ///
    /// Uses the summary when present. Otherwise the basic strategy reads
    /// education then experience, the enhanced one experience then education.
    pub fn rerank_text(&self, strategy: RerankStrategy) -> String {
        let attrs = &self.attributes;
        if !attrs.rerank_summary.is_empty() {
            return attrs.rerank_summary.clone();
        }

        let experience = attrs.experience.join(" ");
        let education = attrs.education.join(" ");
        match strategy {
            RerankStrategy::Basic => format!("{education} {experience}"),
            RerankStrategy::Enhanced => format!("{experience} {education}"),
        }
    }
}
