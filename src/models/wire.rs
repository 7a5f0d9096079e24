//! Serde adapters for Workiz field encodings.

/// `"2006-01-02 15:04:05"` timestamps, read as UTC. `null` and `""` are unset.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDateTime::parse_from_str(s, FORMAT)
                .map(|t| Some(t.and_utc()))
                .map_err(serde::de::Error::custom),
        }
    }
}

/// Comments arrive as `""` when empty, otherwise `[{"Comment": "..."}]`.
pub(crate) mod comments {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Entry {
        #[serde(rename = "Comment", alias = "comment", default)]
        comment: String,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Entries(Vec<Entry>),
    }

    pub fn serialize<S>(value: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_empty() {
            return serializer.serialize_str("");
        }
        let entries: Vec<Entry> = value
            .iter()
            .map(|c| Entry { comment: c.clone() })
            .collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(Raw::Text(text)) if text.is_empty() => Vec::new(),
            Some(Raw::Text(text)) => vec![text],
            Some(Raw::Entries(entries)) => entries.into_iter().map(|e| e.comment).collect(),
        })
    }
}
