use drf::resources::ResourceVector;
use serde::{Deserialize, Deserializer};
use std::path::Path;

fn deserialize_resources<'de, D>(deserializer: D) -> Result<ResourceVector, D::Error>
where
    D: Deserializer<'de>,
{
    let buf = String::deserialize(deserializer)?;
    buf.parse().map_err(serde::de::Error::custom)
}

/// Single event of a recorded scheduling history.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TraceEvent {
    /// Application submitted; `time` is a logical submission time in seconds.
    Submit {
        id: String,
        user: String,
        #[serde(default)]
        time: i64,
        #[serde(default, deserialize_with = "deserialize_resources")]
        ask: ResourceVector,
    },
    /// One scheduling cycle asking for the next application.
    Select {
        /// Place the ask of the selected application right away
        #[serde(default)]
        auto_allocate: bool,
    },
    Allocate {
        user: String,
        id: String,
        #[serde(deserialize_with = "deserialize_resources")]
        resources: ResourceVector,
    },
    Complete {
        user: String,
        id: String,
        #[serde(default, deserialize_with = "deserialize_resources")]
        usage: ResourceVector,
        /// Run time in seconds
        #[serde(default)]
        duration: u64,
    },
    Capacity {
        #[serde(deserialize_with = "deserialize_resources")]
        resources: ResourceVector,
    },
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct Trace {
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

impl Trace {
    pub fn parse(str: &str) -> crate::Result<Trace> {
        Ok(toml::from_str(str)?)
    }

    pub fn load(path: &Path) -> crate::Result<Trace> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}
