//! Minimal reader for git-style INI configuration files
//!
//! Only `[section]` headers (optionally with a quoted subsection) and
//! `key = value` lines are understood. Section and key names are case
//! insensitive; values keep their case with surrounding quotes removed.

use anyhow::Context;
use std::collections::BTreeMap;
use std::path::Path;

const SECTION_REGEX: &str = r#"^\[\s*([A-Za-z0-9.-]+)(?:\s+"[^"]*")?\s*\]$"#;
const ENTRY_REGEX: &str = r"^([A-Za-z][A-Za-z0-9-]*)\s*(?:=\s*(.*))?$";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitConfig {
    values: BTreeMap<(String, String), String>,
}

impl GitConfig {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let section_regex = regex::Regex::new(SECTION_REGEX)
            .with_context(|| format!("invalid config section regex: {SECTION_REGEX}"))?;
        let entry_regex = regex::Regex::new(ENTRY_REGEX)
            .with_context(|| format!("invalid config entry regex: {ENTRY_REGEX}"))?;

        let mut values = BTreeMap::new();
        let mut section: Option<String> = None;

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(caps) = section_regex.captures(line) {
                section = Some(caps[1].to_ascii_lowercase());
            } else if let (Some(caps), Some(section)) = (entry_regex.captures(line), &section) {
                let value = caps.get(2).map_or("true", |value| value.as_str());
                values.insert(
                    (section.clone(), caps[1].to_ascii_lowercase()),
                    Self::unquote(value.trim()).to_string(),
                );
            } else {
                anyhow::bail!("malformed config line: {line}");
            }
        }

        Ok(Self { values })
    }

    /// Read a config file; missing or unreadable files count as empty
    pub fn load(path: &Path) -> Self {
        if !path.is_file() {
            return Self::default();
        }

        match std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read config file {}", path.display()))
            .and_then(|content| Self::parse(&content))
        {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %error, "ignoring unreadable config file");
                Self::default()
            }
        }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.values
            .get(&(section.to_ascii_lowercase(), key.to_ascii_lowercase()))
            .map(String::as_str)
    }

    fn unquote(value: &str) -> &str {
        value
            .strip_prefix('"')
            .and_then(|value| value.strip_suffix('"'))
            .unwrap_or(value)
    }
}
