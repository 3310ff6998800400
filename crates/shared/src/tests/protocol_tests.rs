use super::*;

use serde_json::json;

fn profile(arn: &str) -> Profile {
    Profile::new(arn, format!("profile {arn}"))
}

#[test]
fn bare_profile_list_is_used_directly() {
    let payload = ProfilesPayload::from_value(json!([{"arn": "a"}, {"arn": "b"}]));
    let arns: Vec<_> = payload
        .into_profiles()
        .into_iter()
        .filter_map(|p| p.arn().map(str::to_string))
        .collect();
    assert_eq!(arns, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn wrapped_profile_list_is_extracted() {
    let payload = ProfilesPayload::from_value(json!({"profiles": [{"arn": "a"}]}));
    assert!(matches!(payload, ProfilesPayload::Wrapped { .. }));
    let profiles = payload.into_profiles();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].arn(), Some("a"));
}

#[test]
fn wrapper_without_profiles_key_yields_empty_list() {
    let payload = ProfilesPayload::from_value(json!({}));
    assert!(payload.into_profiles().is_empty());
}

#[test]
fn unrecognized_profiles_payload_yields_empty_list() {
    assert!(ProfilesPayload::from_value(json!(42))
        .into_profiles()
        .is_empty());
    assert!(ProfilesPayload::from_value(json!({"profiles": "nope"}))
        .into_profiles()
        .is_empty());
}

#[test]
fn profiles_are_stored_exactly_as_sent() {
    let sent = json!([{"arn": "a"}, {"arn": "b", "name": null, "tier": "pro"}]);
    let profiles = ProfilesPayload::from_value(sent.clone()).into_profiles();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[1].name(), None);
    assert_eq!(serde_json::to_value(&profiles).expect("encode"), sent);
}

#[test]
fn one_bad_profile_entry_keeps_the_others() {
    let payload = ProfilesPayload::from_value(json!({
        "profiles": [{"arn": "a", "name": "A"}, "not-a-profile", {"arn": 7, "name": null}]
    }));
    let profiles = payload.into_profiles();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0].arn(), Some("a"));
    assert_eq!(profiles[1].arn(), None);
}

#[test]
fn one_bad_region_or_connection_keeps_the_others() {
    let raw = json!({
        "command": "prepareUi",
        "params": {
            "regions": [
                {"id": "us-east-1", "name": "N"},
                {"id": "il-central-1", "category": null},
                17
            ],
            "existingConnections": [
                {"sessionName": "s", "id": "1"},
                {"sessionName": "t", "scopes": "not-a-list"}
            ]
        }
    })
    .to_string();

    let HostMessage::PrepareUi(setup) = HostMessage::from_json(&raw).expect("decode") else {
        panic!("expected prepareUi");
    };
    let ids: Vec<_> = setup.regions.iter().filter_map(|r| r.id()).collect();
    assert_eq!(ids, vec!["us-east-1", "il-central-1"]);
    assert_eq!(
        serde_json::to_value(&setup.regions[1]).expect("encode"),
        json!({"id": "il-central-1", "category": null})
    );
    assert_eq!(setup.existing_connections.len(), 1);
    assert_eq!(setup.existing_connections[0].session_name, "s");
}

#[test]
fn decodes_prepare_ui_from_host() {
    let raw = json!({
        "command": "prepareUi",
        "params": {
            "stage": "START",
            "regions": [{"id": "us-east-1", "name": "US East (N. Virginia)", "partitionId": "aws",
                         "category": "North America", "displayName": "US East (N. Virginia) (us-east-1)"}],
            "idcInfo": {"startUrl": "u", "region": "r"},
            "cancellable": true,
            "feature": "Q",
            "profiles": [],
            "existingConnections": [
                {"sessionName": "s", "startUrl": "u", "region": "r", "scopes": ["s1"], "id": "1"}
            ]
        }
    })
    .to_string();

    let message = HostMessage::from_json(&raw).expect("decode");
    let HostMessage::PrepareUi(setup) = message else {
        panic!("expected prepareUi");
    };
    assert_eq!(setup.stage, Stage::Start);
    assert_eq!(setup.regions.len(), 1);
    assert_eq!(setup.regions[0].partition_id(), Some("aws"));
    assert_eq!(setup.idc_info, IdcInfo::new("u", "r"));
    assert!(setup.cancellable);
    assert_eq!(setup.feature, Feature::AmazonQ);
    assert_eq!(setup.existing_connections.len(), 1);
    assert!(setup.existing_connections[0].scopes.contains("s1"));
}

#[test]
fn prepare_ui_accepts_legacy_exist_connections_key() {
    let raw = json!({
        "command": "prepareUi",
        "params": {
            "stage": "START",
            "existConnections": [{"sessionName": "s", "id": "1"}]
        }
    })
    .to_string();

    let HostMessage::PrepareUi(setup) = HostMessage::from_json(&raw).expect("decode") else {
        panic!("expected prepareUi");
    };
    assert_eq!(setup.existing_connections.len(), 1);
    assert_eq!(setup.existing_connections[0].session_name, "s");
}

#[test]
fn malformed_setup_fields_degrade_to_defaults() {
    let raw = json!({
        "command": "prepareUi",
        "params": {
            "stage": "PROFILE_SELECT",
            "regions": "not-a-list",
            "cancellable": "yes",
            "feature": "somethingElse",
            "idcInfo": null
        }
    })
    .to_string();

    let HostMessage::PrepareUi(setup) = HostMessage::from_json(&raw).expect("decode") else {
        panic!("expected prepareUi");
    };
    assert_eq!(setup.stage, Stage::ProfileSelect);
    assert!(setup.regions.is_empty());
    assert!(!setup.cancellable);
    assert_eq!(setup.feature, Feature::AmazonQ);
    assert_eq!(setup.idc_info, IdcInfo::default());
    assert!(setup.profiles.is_empty());
}

#[test]
fn prepare_ui_with_non_object_params_uses_default_setup() {
    let message = HostMessage::from_parts("prepareUi", json!("garbage")).expect("decode");
    assert_eq!(message, HostMessage::PrepareUi(BrowserSetupData::default()));
}

#[test]
fn authorization_and_redirect_accept_null_or_missing_params() {
    let message = HostMessage::from_json(r#"{"command":"updateAuthorization","params":"code-1"}"#)
        .expect("decode");
    assert_eq!(message, HostMessage::UpdateAuthorization(Some("code-1".into())));

    let message =
        HostMessage::from_json(r#"{"command":"updateAuthorization","params":null}"#).expect("decode");
    assert_eq!(message, HostMessage::UpdateAuthorization(None));

    let message = HostMessage::from_json(r#"{"command":"updateRedirectUrl"}"#).expect("decode");
    assert_eq!(message, HostMessage::UpdateRedirectUrl(None));
}

#[test]
fn unknown_command_is_rejected() {
    let err = HostMessage::from_json(r#"{"command":"launchRockets"}"#).expect_err("should fail");
    assert!(matches!(err, ProtocolError::UnknownCommand(name) if name == "launchRockets"));
}

#[test]
fn non_json_text_is_malformed() {
    let err = HostMessage::from_json("ideClient.prepareUi(").expect_err("should fail");
    assert!(matches!(err, ProtocolError::Malformed(_)));
}

#[test]
fn encoded_host_messages_decode_to_the_same_value() {
    let messages = vec![
        HostMessage::HandleProfiles(vec![profile("a")].into()),
        HostMessage::UpdateLastLoginIdcInfo(IdcInfo::new("https://start", "us-west-2")),
        HostMessage::Reset,
    ];
    for message in messages {
        let encoded = message.to_json().expect("encode");
        let decoded: HostMessage = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(decoded, message);
    }
}

#[test]
fn cancel_login_command_carries_only_the_tag() {
    let encoded = HostCommand::CancelLogin.to_json().expect("encode");
    assert_eq!(encoded, r#"{"command":"cancelLogin"}"#);
}

#[test]
fn login_idc_command_uses_host_field_names() {
    let command = HostCommand::LoginIdc {
        start_url: "https://start".into(),
        region: "us-east-1".into(),
    };
    let value: Value = serde_json::to_value(&command).expect("encode");
    assert_eq!(
        value,
        json!({"command": "loginIdC", "startUrl": "https://start", "region": "us-east-1"})
    );
    assert_eq!(command.name(), "loginIdC");
}
