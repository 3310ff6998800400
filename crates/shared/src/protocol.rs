use serde::{de, de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{
    domain::{Connection, Feature, IdcInfo, Profile, Region, Stage},
    error::ProtocolError,
};

/// Decodes `value` as `T`, degrading to `T::default()` when the shape does
/// not match.
pub fn decode_or_default<T>(value: Value) -> T
where
    T: DeserializeOwned + Default,
{
    match serde_json::from_value(value) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::warn!(
                target_type = std::any::type_name::<T>(),
                error = %err,
                "malformed payload field; using default"
            );
            T::default()
        }
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_or_default(value))
}

/// Decodes a JSON array element by element. Elements that do not decode are
/// logged and skipped; a non-array value yields an empty list.
pub fn decode_list_lenient<T>(value: Value) -> Vec<T>
where
    T: DeserializeOwned,
{
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Vec::new(),
        other => {
            tracing::warn!(
                target_type = std::any::type_name::<T>(),
                payload = %other,
                "expected a list; using empty list"
            );
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!(
                    target_type = std::any::type_name::<T>(),
                    index,
                    error = %err,
                    "dropping malformed list element"
                );
                None
            }
        })
        .collect()
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_list_lenient(value))
}

/// Initial context pushed by the host once the webview is ready.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserSetupData {
    #[serde(default, deserialize_with = "lenient")]
    pub stage: Stage,
    #[serde(default, deserialize_with = "lenient_list")]
    pub regions: Vec<Region>,
    #[serde(default, deserialize_with = "lenient")]
    pub idc_info: IdcInfo,
    #[serde(default, deserialize_with = "lenient")]
    pub cancellable: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub feature: Feature,
    #[serde(default, deserialize_with = "lenient_list")]
    pub profiles: Vec<Profile>,
    #[serde(default, alias = "existConnections", deserialize_with = "lenient_list")]
    pub existing_connections: Vec<Connection>,
}

/// Profile list as the host may send it: a bare list, a `{profiles}`
/// wrapper, or something else entirely. List elements are decoded one at a
/// time, so a single bad entry never discards its neighbours.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProfilesPayload {
    List(Vec<Profile>),
    Wrapped { profiles: Option<Vec<Profile>> },
    Malformed(Value),
}

impl ProfilesPayload {
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(_) => ProfilesPayload::List(decode_list_lenient(value)),
            Value::Object(mut fields) => match fields.remove("profiles") {
                None | Some(Value::Null) => ProfilesPayload::Wrapped { profiles: None },
                Some(list @ Value::Array(_)) => ProfilesPayload::Wrapped {
                    profiles: Some(decode_list_lenient(list)),
                },
                Some(other) => ProfilesPayload::Malformed(other),
            },
            other => ProfilesPayload::Malformed(other),
        }
    }

    pub fn into_profiles(self) -> Vec<Profile> {
        match self {
            ProfilesPayload::List(profiles) => profiles,
            ProfilesPayload::Wrapped { profiles } => profiles.unwrap_or_default(),
            ProfilesPayload::Malformed(value) => {
                tracing::warn!(payload = %value, "unrecognized profiles payload; using empty list");
                Vec::new()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ProfilesPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(ProfilesPayload::from_value(Value::deserialize(deserializer)?))
    }
}

impl From<Vec<Profile>> for ProfilesPayload {
    fn from(value: Vec<Profile>) -> Self {
        ProfilesPayload::List(value)
    }
}

/// Messages pushed by the host into the webview.
///
/// Encoded as `{"command": <name>, "params": <payload>}`. Decoding is
/// lenient about payloads: a known command with a malformed payload still
/// decodes, with the payload degraded to its default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", content = "params", rename_all = "camelCase")]
pub enum HostMessage {
    PrepareUi(BrowserSetupData),
    HandleProfiles(ProfilesPayload),
    UpdateAuthorization(Option<String>),
    UpdateLastLoginIdcInfo(IdcInfo),
    UpdateRedirectUrl(Option<String>),
    Reset,
}

#[derive(Deserialize)]
struct RawHostMessage {
    command: String,
    #[serde(default)]
    params: Value,
}

impl HostMessage {
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        let envelope: RawHostMessage = serde_json::from_str(raw)?;
        Self::from_parts(&envelope.command, envelope.params)
    }

    pub fn from_parts(command: &str, params: Value) -> Result<Self, ProtocolError> {
        let message = match command {
            "prepareUi" => HostMessage::PrepareUi(decode_or_default(params)),
            "handleProfiles" => HostMessage::HandleProfiles(ProfilesPayload::from_value(params)),
            "updateAuthorization" => HostMessage::UpdateAuthorization(decode_or_default(params)),
            "updateLastLoginIdcInfo" => {
                HostMessage::UpdateLastLoginIdcInfo(decode_or_default(params))
            }
            "updateRedirectUrl" => HostMessage::UpdateRedirectUrl(decode_or_default(params)),
            "reset" => HostMessage::Reset,
            other => return Err(ProtocolError::unknown_command(other)),
        };
        Ok(message)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostMessage::PrepareUi(_) => "prepareUi",
            HostMessage::HandleProfiles(_) => "handleProfiles",
            HostMessage::UpdateAuthorization(_) => "updateAuthorization",
            HostMessage::UpdateLastLoginIdcInfo(_) => "updateLastLoginIdcInfo",
            HostMessage::UpdateRedirectUrl(_) => "updateRedirectUrl",
            HostMessage::Reset => "reset",
        }
    }
}

impl<'de> Deserialize<'de> for HostMessage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let envelope = RawHostMessage::deserialize(deserializer)?;
        HostMessage::from_parts(&envelope.command, envelope.params).map_err(de::Error::custom)
    }
}

/// Fire-and-forget commands posted from the webview to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum HostCommand {
    CancelLogin,
    OnLoad,
    LoginBuilderId,
    #[serde(rename = "loginIdC", rename_all = "camelCase")]
    LoginIdc {
        start_url: String,
        region: String,
    },
    SelectProfile {
        profile: Profile,
    },
}

impl HostCommand {
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn name(&self) -> &'static str {
        match self {
            HostCommand::CancelLogin => "cancelLogin",
            HostCommand::OnLoad => "onLoad",
            HostCommand::LoginBuilderId => "loginBuilderId",
            HostCommand::LoginIdc { .. } => "loginIdC",
            HostCommand::SelectProfile { .. } => "selectProfile",
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
