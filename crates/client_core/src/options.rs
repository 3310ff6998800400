use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use shared::domain::Feature;
use state_store::IdcInfoOnReset;
use thiserror::Error;

/// Behaviour that differs between the webview integrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeOptions {
    /// Keep `lastLoginIdcInfo` when the whole session is reset.
    pub preserve_idc_info_on_reset: bool,
    /// Apply host-supplied `cancellable` flags; when false they are ignored.
    pub honor_cancellable_flag: bool,
}

impl BridgeOptions {
    pub fn amazon_q() -> Self {
        Self {
            preserve_idc_info_on_reset: true,
            honor_cancellable_flag: false,
        }
    }

    pub fn toolkit() -> Self {
        Self {
            preserve_idc_info_on_reset: false,
            honor_cancellable_flag: true,
        }
    }

    pub fn idc_info_on_reset(&self) -> IdcInfoOnReset {
        if self.preserve_idc_info_on_reset {
            IdcInfoOnReset::Preserve
        } else {
            IdcInfoOnReset::Clear
        }
    }
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self::toolkit()
    }
}

/// Named integration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    AmazonQ,
    #[default]
    Toolkit,
}

impl Variant {
    pub fn options(self) -> BridgeOptions {
        match self {
            Variant::AmazonQ => BridgeOptions::amazon_q(),
            Variant::Toolkit => BridgeOptions::toolkit(),
        }
    }

    pub fn feature(self) -> Feature {
        match self {
            Variant::AmazonQ => Feature::AmazonQ,
            Variant::Toolkit => Feature::AwsExplorer,
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown integration variant '{0}' (expected amazon_q or toolkit)")]
pub struct UnknownVariant(String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "amazon_q" | "q" => Ok(Variant::AmazonQ),
            "toolkit" => Ok(Variant::Toolkit),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::AmazonQ => f.write_str("amazon_q"),
            Variant::Toolkit => f.write_str("toolkit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_differ_on_both_flags() {
        let q = BridgeOptions::amazon_q();
        let toolkit = BridgeOptions::toolkit();
        assert!(q.preserve_idc_info_on_reset && !q.honor_cancellable_flag);
        assert!(!toolkit.preserve_idc_info_on_reset && toolkit.honor_cancellable_flag);
        assert_eq!(q.idc_info_on_reset(), IdcInfoOnReset::Preserve);
        assert_eq!(toolkit.idc_info_on_reset(), IdcInfoOnReset::Clear);
    }

    #[test]
    fn parses_variant_names() {
        assert_eq!("amazon-q".parse::<Variant>().expect("variant"), Variant::AmazonQ);
        assert_eq!("Toolkit".parse::<Variant>().expect("variant"), Variant::Toolkit);
        assert!("explorer".parse::<Variant>().is_err());
        assert_eq!(Variant::AmazonQ.feature(), Feature::AmazonQ);
        assert_eq!(Variant::Toolkit.feature(), Feature::AwsExplorer);
    }
}
