//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy environment variables (DD_API_KEY, DD_APP_KEY, DD_SITE,
    ///    OPENAI_API_KEY, LLM_API_URL, SSL_VERIFY)
    /// 2. DOGTALK_-prefixed environment variables (DOGTALK_LLM__MODEL, ...)
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./dogtalk.toml` or `./.dogtalk.toml`
    /// 5. Global: `~/.config/dogtalk/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        // Add global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        // Add project-level config files (check both names)
        for filename in &["dogtalk.toml", ".dogtalk.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                figment = figment.merge(Toml::file(&path));
                break;
            }
        }

        // Add explicit config path (highest priority for files)
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // DOGTALK_LLM__API_KEY -> llm.api_key, etc.
        figment = figment.merge(Env::prefixed("DOGTALK_").split("__"));

        let mut config: FileConfig = figment.extract().map_err(Box::new)?;
        Self::apply_legacy_env(&mut config);
        Ok(config)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        let mut config = FileConfig::default();
        Self::apply_legacy_env(&mut config);
        config
    }

    /// Environment variable names the original toolchain used; honored so
    /// existing setups work without a config file.
    fn apply_legacy_env(config: &mut FileConfig) {
        let overrides: [(&str, &mut String); 5] = [
            ("DD_API_KEY", &mut config.datadog.api_key),
            ("DD_APP_KEY", &mut config.datadog.app_key),
            ("DD_SITE", &mut config.datadog.site),
            ("OPENAI_API_KEY", &mut config.llm.api_key),
            ("LLM_API_URL", &mut config.llm.api_url),
        ];
        for (name, slot) in overrides {
            if let Ok(value) = std::env::var(name)
                && !value.is_empty()
            {
                *slot = value;
            }
        }

        // SSL_VERIFY=false disables certificate checks, as the original
        // toolchain allowed for intercepting proxies
        if let Ok(value) = std::env::var("SSL_VERIFY") {
            let off = matches!(value.to_lowercase().as_str(), "false" | "0" | "no" | "off");
            config.datadog.insecure_skip_verify = off;
        }
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/dogtalk/config.toml if set,
    /// otherwise falls back to ~/.config/dogtalk/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("dogtalk").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        for filename in &["dogtalk.toml", ".dogtalk.toml"] {
            let path = PathBuf::from(filename);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");

        println!("  [     ] Env:     DD_API_KEY, DD_APP_KEY, DD_SITE, OPENAI_API_KEY, LLM_API_URL, SSL_VERIFY, DOGTALK_*");

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./dogtalk.toml or ./.dogtalk.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}
