use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::constants::{
    API_KEY_ENV, DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_SECS, EARTHQUAKE_FEED_URL,
    FAULT_LINES_FEED_URL, PORT_ENV,
};

/// Which page to serve: the plain earthquake map or the one with plate
/// boundaries and a satellite base map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Basic,
    #[default]
    Tectonic,
}

impl Variant {
    pub fn has_fault_lines(self) -> bool {
        matches!(self, Variant::Tectonic)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Tectonic => "tectonic",
        }
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" | "step1" | "1" => Ok(Variant::Basic),
            "tectonic" | "step2" | "2" => Ok(Variant::Tectonic),
            other => anyhow::bail!("unknown map variant: {}", other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub port: u16,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub variant: Variant,
    pub earthquake_url: String,
    pub fault_lines_url: String,
    #[serde(default)]
    pub auto_open_browser: bool,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: String::new(),
            variant: Variant::default(),
            earthquake_url: EARTHQUAKE_FEED_URL.to_string(),
            fault_lines_url: FAULT_LINES_FEED_URL.to_string(),
            auto_open_browser: false,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Reads `quakemap.ini` next to the executable, then applies environment
    /// overrides.
    pub fn load() -> Result<Self> {
        let mut settings = Self::load_from(&Self::config_path())?;
        settings.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Settings::default());
        }

        let file = File::open(config_path).context("Failed to open config file")?;
        let mut content = String::new();
        for line in BufReader::new(file).lines() {
            let line = line.context("Failed to read line from config")?;
            content.push_str(&line);
            content.push('\n');
        }
        Ok(Self::parse(&content))
    }

    /// Parses `key = value` lines. Unknown keys and unparsable values are
    /// ignored, leaving the default in place.
    pub fn parse(content: &str) -> Self {
        let mut settings = Settings::default();
        let mut config_map = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(
                    key.trim().to_string(),
                    value.trim().trim_matches('"').to_string(),
                );
            }
        }

        if let Some(port) = config_map.get("port").and_then(|v| v.parse::<u16>().ok()) {
            settings.port = port;
        }
        if let Some(api_key) = config_map.get("api_key") {
            settings.api_key = api_key.clone();
        }
        if let Some(variant) = config_map.get("variant").and_then(|v| v.parse::<Variant>().ok()) {
            settings.variant = variant;
        }
        if let Some(url) = config_map.get("earthquake_url").filter(|v| !v.is_empty()) {
            settings.earthquake_url = url.clone();
        }
        if let Some(url) = config_map.get("fault_lines_url").filter(|v| !v.is_empty()) {
            settings.fault_lines_url = url.clone();
        }
        if let Some(auto_open) = config_map
            .get("auto_open_browser")
            .and_then(|v| v.parse::<bool>().ok())
        {
            settings.auto_open_browser = auto_open;
        }
        if let Some(timeout) = config_map
            .get("request_timeout_secs")
            .and_then(|v| v.parse::<u64>().ok())
        {
            settings.request_timeout_secs = timeout;
        }

        settings
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup(API_KEY_ENV).filter(|v| !v.is_empty()) {
            self.api_key = api_key;
        }
        if let Some(port) = lookup(PORT_ENV).and_then(|v| v.parse::<u16>().ok()) {
            self.port = port;
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Creating config directory")?;
        }
        std::fs::write(&config_path, self.to_ini()).context("Failed to write to config file")?;
        Ok(())
    }

    pub fn to_ini(&self) -> String {
        let mut content = String::new();
        content.push_str("# QuakeMap Configuration File\n");
        content.push_str(&format!("port = {}\n", self.port));
        content.push_str(&format!("api_key = \"{}\"\n", self.api_key));
        content.push_str(&format!("variant = {}\n", self.variant.as_str()));
        content.push_str(&format!("earthquake_url = \"{}\"\n", self.earthquake_url));
        content.push_str(&format!("fault_lines_url = \"{}\"\n", self.fault_lines_url));
        content.push_str(&format!("auto_open_browser = {}\n", self.auto_open_browser));
        content.push_str(&format!("request_timeout_secs = {}\n", self.request_timeout_secs));
        content
    }

    /// Copy safe to hand to a browser: the API key is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.api_key.is_empty() {
            copy.api_key = "***".to_string();
        }
        copy
    }

    pub fn config_path() -> PathBuf {
        let mut path = crate::utils::executable_dir();
        path.push("quakemap.ini");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_reads_known_keys() {
        let settings = Settings::parse(
            "# comment\nport = 8080\napi_key = \"pk.test\"\nvariant = basic\nauto_open_browser = true\n",
        );
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.api_key, "pk.test");
        assert_eq!(settings.variant, Variant::Basic);
        assert!(settings.auto_open_browser);
        assert_eq!(settings.earthquake_url, EARTHQUAKE_FEED_URL);
    }

    #[test]
    fn parse_keeps_defaults_for_bad_values() {
        let settings = Settings::parse("port = not-a-port\nvariant = globe\n");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn ini_output_parses_back() {
        let settings = Settings {
            port: 4000,
            api_key: "key".into(),
            variant: Variant::Basic,
            request_timeout_secs: 5,
            ..Settings::default()
        };
        assert_eq!(Settings::parse(&settings.to_ini()), settings);
    }

    #[test]
    fn env_overrides_win() {
        let mut settings = Settings::parse("api_key = from-file\nport = 4000\n");
        settings.apply_env_overrides(|key| match key {
            API_KEY_ENV => Some("from-env".to_string()),
            PORT_ENV => Some("5000".to_string()),
            _ => None,
        });
        assert_eq!(settings.api_key, "from-env");
        assert_eq!(settings.port, 5000);
    }

    #[test]
    fn redacted_hides_api_key() {
        let settings = Settings { api_key: "secret".into(), ..Settings::default() };
        assert_eq!(settings.redacted().api_key, "***");
        assert_eq!(Settings::default().redacted().api_key, "");
    }
}
