use std::{fs, io, path::Path};

use anyhow::Context;
use client_core::{BridgeOptions, Variant};
use serde::Deserialize;

const ENV_PREFIX: &str = "REPLAY__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub variant: Variant,
    pub preserve_idc_info_on_reset: Option<bool>,
    pub honor_cancellable_flag: Option<bool>,
    pub log_level: String,
    pub command_queue_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            preserve_idc_info_on_reset: None,
            honor_cancellable_flag: None,
            log_level: "info".into(),
            command_queue_capacity: 64,
        }
    }
}

impl Settings {
    /// Preset for the variant, with any explicitly configured flag on top.
    pub fn bridge_options(&self) -> BridgeOptions {
        let mut options = self.variant.options();
        if let Some(preserve) = self.preserve_idc_info_on_reset {
            options.preserve_idc_info_on_reset = preserve;
        }
        if let Some(honor) = self.honor_cancellable_flag {
            options.honor_cancellable_flag = honor;
        }
        options
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    variant: Option<Variant>,
    preserve_idc_info_on_reset: Option<bool>,
    honor_cancellable_flag: Option<bool>,
    log_level: Option<String>,
    command_queue_capacity: Option<usize>,
}

/// Defaults, then the TOML file at `path` if it exists, then `REPLAY__*`
/// environment variables.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;
            apply_file(&mut settings, file_cfg);
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()));
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    validate(&settings)?;
    Ok(settings)
}

/// A zero-capacity queue would reject every `try_send`.
fn validate(settings: &Settings) -> anyhow::Result<()> {
    if settings.command_queue_capacity == 0 {
        anyhow::bail!("invalid command_queue_capacity '0' (expected at least 1)");
    }
    Ok(())
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.variant {
        settings.variant = v;
    }
    if let Some(v) = file_cfg.preserve_idc_info_on_reset {
        settings.preserve_idc_info_on_reset = Some(v);
    }
    if let Some(v) = file_cfg.honor_cancellable_flag {
        settings.honor_cancellable_flag = Some(v);
    }
    if let Some(v) = file_cfg.log_level {
        settings.log_level = v;
    }
    if let Some(v) = file_cfg.command_queue_capacity {
        settings.command_queue_capacity = v;
    }
}

fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

    if let Some(v) = var("VARIANT") {
        settings.variant = v.parse()?;
    }
    if let Some(v) = var("PRESERVE_IDC_INFO_ON_RESET") {
        settings.preserve_idc_info_on_reset = Some(parse_flag("PRESERVE_IDC_INFO_ON_RESET", &v)?);
    }
    if let Some(v) = var("HONOR_CANCELLABLE_FLAG") {
        settings.honor_cancellable_flag = Some(parse_flag("HONOR_CANCELLABLE_FLAG", &v)?);
    }
    if let Some(v) = var("LOG_LEVEL") {
        settings.log_level = v;
    }
    if let Some(v) = var("COMMAND_QUEUE_CAPACITY") {
        settings.command_queue_capacity = v
            .parse()
            .with_context(|| format!("invalid {ENV_PREFIX}COMMAND_QUEUE_CAPACITY '{v}'"))?;
    }
    Ok(())
}

fn parse_flag(name: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("invalid {ENV_PREFIX}{name} '{raw}' (expected true or false)"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
