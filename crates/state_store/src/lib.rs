//! Canonical login view state and the named mutations that change it.
//!
//! [`StateStore`] owns the single [`LoginState`] value. Every change goes
//! through [`StateStore::commit`], and subscribers obtained from
//! [`StateStore::subscribe`] observe the new value as soon as a commit
//! returns.

use serde::Serialize;
use shared::{
    domain::{Connection, Feature, IdcInfo, Profile, Region, Stage},
    protocol::ProfilesPayload,
};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginState {
    pub stage: Stage,
    pub sso_regions: Vec<Region>,
    pub authorization_code: Option<String>,
    pub redirect_url: Option<String>,
    pub last_login_idc_info: IdcInfo,
    pub feature: Feature,
    pub cancellable: bool,
    pub existing_connections: Vec<Connection>,
    pub profiles: Vec<Profile>,
    pub selected_profile: Option<Profile>,
}

impl LoginState {
    pub fn new(feature: Feature) -> Self {
        Self {
            stage: Stage::Start,
            sso_regions: Vec::new(),
            authorization_code: None,
            redirect_url: None,
            last_login_idc_info: IdcInfo::default(),
            feature,
            cancellable: false,
            existing_connections: Vec::new(),
            profiles: Vec::new(),
            selected_profile: None,
        }
    }
}

impl Default for LoginState {
    fn default() -> Self {
        Self::new(Feature::default())
    }
}

/// What a full reset does with the last identity-center login target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdcInfoOnReset {
    #[default]
    Clear,
    Preserve,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SetStage(Stage),
    SetSsoRegions(Vec<Region>),
    SetCancellable(bool),
    SetAuthorizationCode(Option<String>),
    SetRedirectUrl(Option<String>),
    SetFeature(Feature),
    SetLastLoginIdcInfo(IdcInfo),
    SetExistingConnections(Vec<Connection>),
    SetProfiles(Vec<Profile>),
    SetSelectedProfile(Profile),
    Reset(IdcInfoOnReset),
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SetStage(_) => "setStage",
            Mutation::SetSsoRegions(_) => "setSsoRegions",
            Mutation::SetCancellable(_) => "setCancellable",
            Mutation::SetAuthorizationCode(_) => "setAuthorizationCode",
            Mutation::SetRedirectUrl(_) => "setRedirectUrl",
            Mutation::SetFeature(_) => "setFeature",
            Mutation::SetLastLoginIdcInfo(_) => "setLastLoginIdcInfo",
            Mutation::SetExistingConnections(_) => "setExistingConnections",
            Mutation::SetProfiles(_) => "setProfiles",
            Mutation::SetSelectedProfile(_) => "setSelectedProfile",
            Mutation::Reset(_) => "reset",
        }
    }

    pub fn apply(self, state: &mut LoginState) {
        match self {
            Mutation::SetStage(stage) => state.stage = stage,
            Mutation::SetSsoRegions(regions) => state.sso_regions = regions,
            Mutation::SetCancellable(cancellable) => state.cancellable = cancellable,
            Mutation::SetAuthorizationCode(code) => state.authorization_code = code,
            Mutation::SetRedirectUrl(url) => state.redirect_url = url,
            Mutation::SetFeature(feature) => state.feature = feature,
            Mutation::SetLastLoginIdcInfo(idc_info) => {
                state.last_login_idc_info.start_url = idc_info.start_url;
                state.last_login_idc_info.region = idc_info.region;
            }
            Mutation::SetExistingConnections(connections) => {
                state.existing_connections = connections
            }
            Mutation::SetProfiles(profiles) => state.profiles = profiles,
            Mutation::SetSelectedProfile(profile) => state.selected_profile = Some(profile),
            Mutation::Reset(idc_info) => {
                state.stage = Stage::Start;
                state.sso_regions.clear();
                state.authorization_code = None;
                state.redirect_url = None;
                state.profiles.clear();
                state.selected_profile = None;
                if idc_info == IdcInfoOnReset::Clear {
                    state.last_login_idc_info = IdcInfo::default();
                }
            }
        }
    }
}

pub struct StateStore {
    state: watch::Sender<LoginState>,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(LoginState::default())
    }
}

impl StateStore {
    pub fn new(initial: LoginState) -> Self {
        let (state, _) = watch::channel(initial);
        Self { state }
    }

    pub fn for_feature(feature: Feature) -> Self {
        Self::new(LoginState::new(feature))
    }

    pub fn commit(&self, mutation: Mutation) {
        tracing::debug!(mutation = mutation.name(), "committing login state mutation");
        self.state.send_modify(|state| mutation.apply(state));
    }

    /// Applies `mutations` in order and notifies subscribers once, so no
    /// reader observes a partially applied batch.
    pub fn commit_all(&self, mutations: impl IntoIterator<Item = Mutation>) {
        self.state.send_modify(|state| {
            for mutation in mutations {
                tracing::debug!(mutation = mutation.name(), "committing login state mutation");
                mutation.apply(state);
            }
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<LoginState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> LoginState {
        self.state.borrow().clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&LoginState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn set_stage(&self, stage: Stage) {
        self.commit(Mutation::SetStage(stage));
    }

    pub fn set_sso_regions(&self, regions: Vec<Region>) {
        self.commit(Mutation::SetSsoRegions(regions));
    }

    pub fn set_cancellable(&self, cancellable: bool) {
        self.commit(Mutation::SetCancellable(cancellable));
    }

    pub fn set_authorization_code(&self, code: Option<String>) {
        self.commit(Mutation::SetAuthorizationCode(code));
    }

    pub fn set_redirect_url(&self, url: Option<String>) {
        self.commit(Mutation::SetRedirectUrl(url));
    }

    pub fn set_feature(&self, feature: Feature) {
        self.commit(Mutation::SetFeature(feature));
    }

    pub fn set_last_login_idc_info(&self, idc_info: IdcInfo) {
        self.commit(Mutation::SetLastLoginIdcInfo(idc_info));
    }

    pub fn set_existing_connections(&self, connections: Vec<Connection>) {
        self.commit(Mutation::SetExistingConnections(connections));
    }

    /// Normalizes either accepted profile shape before committing.
    pub fn set_profiles(&self, profiles: impl Into<ProfilesPayload>) {
        self.commit(Mutation::SetProfiles(profiles.into().into_profiles()));
    }

    pub fn set_selected_profile(&self, profile: Profile) {
        self.commit(Mutation::SetSelectedProfile(profile));
    }

    pub fn reset(&self, idc_info: IdcInfoOnReset) {
        self.commit(Mutation::Reset(idc_info));
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
