use serde::{Deserialize, Deserializer, Serialize};

/// The parts of a GitHub issue the analysis consumes
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Issue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// A comment on an issue; only its body is used
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Comment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
}

fn null_as_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
