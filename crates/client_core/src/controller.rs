//! Translates host messages and user intents into store mutations and host
//! commands.

use serde::{Deserialize, Serialize};
use shared::{
    domain::{IdcInfo, Profile, Stage},
    error::ProtocolError,
    protocol::{BrowserSetupData, HostCommand, HostMessage, ProfilesPayload},
};
use state_store::{Mutation, StateStore};
use tracing::{debug, info};

use crate::{
    channel::{dispatch_host_command, HostChannel},
    options::BridgeOptions,
};

/// Actions the presentation layer asks the bridge to perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "params", rename_all = "camelCase")]
pub enum UserIntent {
    Ready,
    LoginBuilderId,
    LoginIdc(IdcInfo),
    SelectProfile(Profile),
    CancelLogin,
    ResetSession,
}

impl UserIntent {
    pub fn name(&self) -> &'static str {
        match self {
            UserIntent::Ready => "ready",
            UserIntent::LoginBuilderId => "loginBuilderId",
            UserIntent::LoginIdc(_) => "loginIdc",
            UserIntent::SelectProfile(_) => "selectProfile",
            UserIntent::CancelLogin => "cancelLogin",
            UserIntent::ResetSession => "resetSession",
        }
    }
}

/// Sole writer of the login store.
///
/// Holds no flow state of its own: every method maps onto store mutations
/// and, for user intents, at most one host command.
pub struct Bridge<C> {
    store: StateStore,
    host: C,
    options: BridgeOptions,
}

impl<C: HostChannel> Bridge<C> {
    pub fn new(store: StateStore, host: C, options: BridgeOptions) -> Self {
        Self {
            store,
            host,
            options,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn options(&self) -> BridgeOptions {
        self.options
    }

    pub fn into_parts(self) -> (StateStore, C) {
        (self.store, self.host)
    }

    /// Decodes and applies one raw host message.
    pub fn handle_raw(&self, raw: &str) -> Result<(), ProtocolError> {
        let message = HostMessage::from_json(raw)?;
        self.handle_message(message);
        Ok(())
    }

    pub fn handle_message(&self, message: HostMessage) {
        debug!(message = message.name(), "handling host message");
        match message {
            HostMessage::PrepareUi(setup) => self.prepare_ui(setup),
            HostMessage::HandleProfiles(payload) => self.handle_profiles(payload),
            HostMessage::UpdateAuthorization(code) => self.update_authorization(code),
            HostMessage::UpdateLastLoginIdcInfo(idc_info) => {
                self.update_last_login_idc_info(idc_info)
            }
            HostMessage::UpdateRedirectUrl(url) => self.update_redirect_url(url),
            HostMessage::Reset => self.reset(),
        }
    }

    pub fn handle_intent(&self, intent: UserIntent) {
        debug!(intent = intent.name(), "handling user intent");
        match intent {
            UserIntent::Ready => self.notify_ready(),
            UserIntent::LoginBuilderId => self.login_builder_id(),
            UserIntent::LoginIdc(idc_info) => self.login_idc(idc_info),
            UserIntent::SelectProfile(profile) => self.select_profile(profile),
            UserIntent::CancelLogin => self.cancel_login(),
            UserIntent::ResetSession => self.reset_session(),
        }
    }

    /// Applies the host's initial context as one batch.
    pub fn prepare_ui(&self, setup: BrowserSetupData) {
        info!(
            stage = %setup.stage,
            feature = ?setup.feature,
            regions = setup.regions.len(),
            connections = setup.existing_connections.len(),
            "preparing login ui"
        );

        let mut batch = vec![
            Mutation::SetStage(setup.stage),
            Mutation::SetSsoRegions(setup.regions),
            Mutation::SetLastLoginIdcInfo(setup.idc_info),
        ];
        batch.extend(self.cancellable_update(setup.cancellable));
        batch.extend([
            Mutation::SetFeature(setup.feature),
            Mutation::SetProfiles(setup.profiles),
            Mutation::SetExistingConnections(setup.existing_connections),
            Mutation::SetAuthorizationCode(None),
            Mutation::SetRedirectUrl(None),
        ]);
        self.store.commit_all(batch);
    }

    /// Moves to profile selection unconditionally and replaces the list.
    pub fn handle_profiles(&self, payload: impl Into<ProfilesPayload>) {
        let profiles = payload.into().into_profiles();
        debug!(profiles = profiles.len(), "received profile data");
        self.store.commit_all([
            Mutation::SetStage(Stage::ProfileSelect),
            Mutation::SetProfiles(profiles),
        ]);
    }

    // TODO: decide with product whether a code arriving should also move the
    // flow into an authenticating stage; today the stage is left untouched.
    pub fn update_authorization(&self, code: Option<String>) {
        self.store.set_authorization_code(code);
    }

    pub fn update_last_login_idc_info(&self, idc_info: IdcInfo) {
        self.store.set_last_login_idc_info(idc_info);
    }

    pub fn update_redirect_url(&self, url: Option<String>) {
        self.store.set_redirect_url(url);
    }

    /// Returns to the first screen without telling the host.
    pub fn reset(&self) {
        self.store.set_stage(Stage::Start);
    }

    /// Returns to the first screen, then tells the host exactly once.
    pub fn cancel_login(&self) {
        info!("login cancelled by user");
        self.store.set_stage(Stage::Start);
        dispatch_host_command(&self.host, HostCommand::CancelLogin);
    }

    /// Clears the whole flow; `lastLoginIdcInfo` survives only when the
    /// options say so.
    pub fn reset_session(&self) {
        self.store.reset(self.options.idc_info_on_reset());
    }

    pub fn select_profile(&self, profile: Profile) {
        self.store.set_selected_profile(profile.clone());
        dispatch_host_command(&self.host, HostCommand::SelectProfile { profile });
    }

    pub fn notify_ready(&self) {
        dispatch_host_command(&self.host, HostCommand::OnLoad);
    }

    pub fn login_builder_id(&self) {
        dispatch_host_command(&self.host, HostCommand::LoginBuilderId);
    }

    pub fn login_idc(&self, idc_info: IdcInfo) {
        dispatch_host_command(
            &self.host,
            HostCommand::LoginIdc {
                start_url: idc_info.start_url,
                region: idc_info.region,
            },
        );
    }

    fn cancellable_update(&self, cancellable: bool) -> Option<Mutation> {
        if self.options.honor_cancellable_flag {
            Some(Mutation::SetCancellable(cancellable))
        } else {
            debug!(cancellable, "ignoring cancellable flag for this integration");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
