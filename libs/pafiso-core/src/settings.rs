//! Engine settings.
//!
//! [`PafisoSettings`] is an immutable value passed to every builder. A
//! process-wide default exists; replacing it swaps the whole value, readers
//! never observe a partially updated instance.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration section read by [`PafisoSettings::from_figment`].
pub const CONFIG_SECTION: &str = "pafiso";

/// Prefix of environment overrides, e.g. `PAFISO__STRING_COMPARISON`.
pub const ENV_PREFIX: &str = "PAFISO__";

/// Transform from declared field names to the names clients send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPolicy {
    CamelCase,
    PascalCase,
    SnakeCase,
    KebabCase,
    Lowercase,
}

impl NamingPolicy {
    pub fn apply(self, declared: &str) -> String {
        match self {
            NamingPolicy::CamelCase => declared.to_lower_camel_case(),
            NamingPolicy::PascalCase => declared.to_upper_camel_case(),
            NamingPolicy::SnakeCase => declared.to_snake_case(),
            NamingPolicy::KebabCase => declared.to_kebab_case(),
            NamingPolicy::Lowercase => declared.to_lowercase(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringComparison {
    #[default]
    Ordinal,
    OrdinalIgnoreCase,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PafisoSettings {
    /// Applied to declared field names before matching incoming names.
    pub naming_policy: Option<NamingPolicy>,
    /// Honor per-field external names declared in the schema.
    pub use_field_name_overrides: bool,
    pub string_comparison: StringComparison,
    /// Lower case-insensitive equality and substring matches through the
    /// backend hook when one is registered.
    pub use_native_case_insensitive_match: bool,
}

impl Default for PafisoSettings {
    fn default() -> Self {
        Self {
            naming_policy: None,
            use_field_name_overrides: true,
            string_comparison: StringComparison::Ordinal,
            use_native_case_insensitive_match: true,
        }
    }
}

static GLOBAL: Lazy<ArcSwap<PafisoSettings>> =
    Lazy::new(|| ArcSwap::from_pointee(PafisoSettings::default()));

impl PafisoSettings {
    /// Current process-wide default.
    pub fn global() -> Arc<PafisoSettings> {
        GLOBAL.load_full()
    }

    /// Replaces the process-wide default. In-flight readers keep the
    /// instance they already loaded.
    pub fn set_global(settings: PafisoSettings) {
        tracing::info!(?settings, "replacing global pafiso settings");
        GLOBAL.store(Arc::new(settings));
    }

    pub fn with_naming_policy(mut self, policy: Option<NamingPolicy>) -> Self {
        self.naming_policy = policy;
        self
    }

    pub fn with_field_name_overrides(mut self, enabled: bool) -> Self {
        self.use_field_name_overrides = enabled;
        self
    }

    pub fn with_string_comparison(mut self, comparison: StringComparison) -> Self {
        self.string_comparison = comparison;
        self
    }

    pub fn with_native_case_insensitive_match(mut self, enabled: bool) -> Self {
        self.use_native_case_insensitive_match = enabled;
        self
    }

    pub fn ignores_case(&self) -> bool {
        self.string_comparison == StringComparison::OrdinalIgnoreCase
    }

    /// Extracts the `pafiso` section; absent keys keep their defaults.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(figment.focus(CONFIG_SECTION))
            .extract()
            .map_err(|e| Error::Config(Box::new(e)))
    }

    /// Layered loading: defaults → YAML file → `PAFISO__*` environment.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let figment = Figment::new()
            .merge(Yaml::file(config_path.as_ref()))
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .split("__")
                    .map(|key| format!("{CONFIG_SECTION}.{}", key.as_str()).into()),
            );
        Self::from_figment(&figment)
    }
}
