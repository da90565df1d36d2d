//! Projection of upstream rows onto the fixed record shape.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One row of results, restricted to the six fields the client displays.
///
/// Unknown upstream fields are dropped and missing ones are `None`.
/// Non-string scalar values are kept in their JSON text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(default, deserialize_with = "text_field")]
    pub locationid: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub starttime: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub endtime: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub optionaltext: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub applicant: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub location: Option<String>,
}

/// Field names in display order, matching the upstream column names.
pub const FIELD_NAMES: [&str; 6] = [
    "locationid",
    "starttime",
    "endtime",
    "optionaltext",
    "applicant",
    "location",
];

impl ResultRecord {
    /// Field values in [`FIELD_NAMES`] order.
    #[must_use]
    pub fn fields(&self) -> [Option<&str>; 6] {
        [
            self.locationid.as_deref(),
            self.starttime.as_deref(),
            self.endtime.as_deref(),
            self.optionaltext.as_deref(),
            self.applicant.as_deref(),
            self.location.as_deref(),
        ]
    }
}

/// Parses a response body into one page of records.
///
/// A blank body is an empty page. Anything else must be a JSON array of
/// objects.
pub fn parse_page(body: &str) -> Result<Vec<ResultRecord>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(body)
}

fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}
