use certchain_crypto::DEFAULT_DIFFICULTY;
use certchain_render::RenderConfig;
use serde::{Deserialize, Serialize};

/// Registry configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Leading zero hex digits a proof must produce.
    pub difficulty: u32,
    pub render: RenderConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            render: RenderConfig::default(),
        }
    }
}
