use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const STAGE_START: &str = "START";
const STAGE_PROFILE_SELECT: &str = "PROFILE_SELECT";

/// Step of the login flow; decides which screen the webview renders.
///
/// Only `START` and `PROFILE_SELECT` are driven by the bridge itself. The
/// host may push any other stage name during setup and it is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stage {
    #[default]
    Start,
    ProfileSelect,
    Other(String),
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Start => STAGE_START,
            Stage::ProfileSelect => STAGE_PROFILE_SELECT,
            Stage::Other(name) => name,
        }
    }
}

impl From<String> for Stage {
    fn from(value: String) -> Self {
        match value.as_str() {
            STAGE_START => Stage::Start,
            STAGE_PROFILE_SELECT => Stage::ProfileSelect,
            _ => Stage::Other(value),
        }
    }
}

impl From<&str> for Stage {
    fn from(value: &str) -> Self {
        Stage::from(value.to_string())
    }
}

impl From<Stage> for String {
    fn from(value: Stage) -> Self {
        match value {
            Stage::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Consumer surface that owns the login flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Feature {
    #[default]
    #[serde(rename = "Q", alias = "q")]
    AmazonQ,
    #[serde(rename = "awsExplorer")]
    AwsExplorer,
}

fn str_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

/// SSO region offered on the identity-center form. Passed through exactly
/// as the host sent it; `null` or missing fields are not rewritten.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(Map<String, Value>);

impl Region {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::default()
            .with_field("id", id.into())
            .with_field("name", name.into())
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        str_field(&self.0, "id")
    }

    pub fn name(&self) -> Option<&str> {
        str_field(&self.0, "name")
    }

    pub fn partition_id(&self) -> Option<&str> {
        str_field(&self.0, "partitionId")
    }

    pub fn category(&self) -> Option<&str> {
        str_field(&self.0, "category")
    }

    pub fn display_name(&self) -> Option<&str> {
        str_field(&self.0, "displayName")
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Identity-center login target.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdcInfo {
    pub start_url: String,
    pub region: String,
}

impl IdcInfo {
    pub fn new(start_url: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            region: region.into(),
        }
    }
}

/// Previously established bearer-token session the user can reuse. Decoding
/// keeps only the five fields the webview renders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Connection {
    pub session_name: String,
    pub start_url: String,
    pub region: String,
    pub scopes: BTreeSet<String>,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityDetails {
    pub region: String,
}

/// Developer profile offered by the host.
///
/// Opaque to the bridge: the record is stored and handed back to the host
/// byte-for-byte, so only read accessors are typed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile(Map<String, Value>);

impl Profile {
    pub fn new(arn: impl Into<String>, name: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("arn".into(), Value::String(arn.into()));
        fields.insert("name".into(), Value::String(name.into()));
        Self(fields)
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        let details = serde_json::json!({ "region": region.into() });
        self.0.insert("identityDetails".into(), details);
        self
    }

    pub fn arn(&self) -> Option<&str> {
        str_field(&self.0, "arn")
    }

    pub fn name(&self) -> Option<&str> {
        str_field(&self.0, "name")
    }

    /// Decoded `identityDetails`, or `None` when absent or not shaped as one.
    pub fn identity_details(&self) -> Option<IdentityDetails> {
        self.0
            .get("identityDetails")
            .and_then(|details| IdentityDetails::deserialize(details).ok())
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Profile {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_stage_names_round_trip_verbatim() {
        let stage: Stage = serde_json::from_str("\"SSO_FORM\"").expect("stage");
        assert_eq!(stage, Stage::Other("SSO_FORM".into()));
        assert_eq!(
            serde_json::to_string(&stage).expect("encode"),
            "\"SSO_FORM\""
        );
    }

    #[test]
    fn known_stage_names_map_to_variants() {
        assert_eq!(Stage::from("START"), Stage::Start);
        assert_eq!(Stage::from("PROFILE_SELECT"), Stage::ProfileSelect);
        assert_eq!(Stage::ProfileSelect.to_string(), "PROFILE_SELECT");
    }

    #[test]
    fn feature_accepts_lowercase_q_from_host() {
        let feature: Feature = serde_json::from_str("\"q\"").expect("feature");
        assert_eq!(feature, Feature::AmazonQ);
        let feature: Feature = serde_json::from_str("\"awsExplorer\"").expect("feature");
        assert_eq!(feature, Feature::AwsExplorer);
    }

    #[test]
    fn profile_is_written_back_exactly_as_received() {
        let raw = r#"{"arn":"arn:1","identityDetails":{"region":"us-east-1"},"tier":"pro"}"#;
        let profile: Profile = serde_json::from_str(raw).expect("profile");
        assert_eq!(profile.arn(), Some("arn:1"));
        assert_eq!(profile.name(), None);
        assert_eq!(
            profile.identity_details(),
            Some(IdentityDetails {
                region: "us-east-1".into()
            })
        );

        let encoded: Value = serde_json::to_value(&profile).expect("encode");
        assert_eq!(encoded, serde_json::from_str::<Value>(raw).expect("raw"));
    }

    #[test]
    fn region_keeps_null_and_unknown_fields() {
        let raw = r#"{"id":"il-central-1","name":"Israel","category":null,"optIn":true}"#;
        let region: Region = serde_json::from_str(raw).expect("region");
        assert_eq!(region.id(), Some("il-central-1"));
        assert_eq!(region.category(), None);

        let encoded: Value = serde_json::to_value(&region).expect("encode");
        assert_eq!(encoded["category"], Value::Null);
        assert_eq!(encoded["optIn"], true);
        assert_eq!(encoded.as_object().map(|o| o.len()), Some(4));
    }

    #[test]
    fn connection_scopes_are_a_set() {
        let raw = r#"{"sessionName":"s","startUrl":"u","region":"r","scopes":["b","a","b"],"id":"1"}"#;
        let connection: Connection = serde_json::from_str(raw).expect("connection");
        assert_eq!(connection.scopes.len(), 2);
        assert!(connection.scopes.contains("a"));
    }
}
