//! Preview manifest: what the sidebar lists and how each entry gets its
//! contents.
//!
//! ```json
//! {
//!   "initialText": "Select an entry",
//!   "footerText": "q: quit  w: switch pane",
//!   "theme": { "borderFocused": "#FFD966" },
//!   "entries": [
//!     { "key": "OPEN", "label": "Open bugs", "command": "./issues {key}", "format": "table" },
//!     { "key": "HELP", "label": "Help", "text": "Use the arrow keys to browse." }
//!   ]
//! }
//! ```
//!
//! `{key}` in a command is replaced by the entry key quoted as a single shell
//! word, so it must not be wrapped in quotes again. The raw key is also
//! available as `$JIRA_PREVIEW_KEY`.

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use jira_tui::ThemeConfig;
use serde::Deserialize;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "preview.json";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub initial_text: Option<String>,

    #[serde(default)]
    pub footer_text: Option<String>,

    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub entries: Vec<EntrySpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySpec {
    pub key: String,
    pub label: String,

    /// Static text shown for this entry
    #[serde(default)]
    pub text: Option<String>,

    /// Shell command whose output is shown for this entry (`{key}` is
    /// replaced by the quoted key)
    #[serde(default)]
    pub command: Option<String>,

    #[serde(default)]
    pub format: OutputFormat,
}

/// How command output is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    /// One row per line, cells separated by tabs, first line is the header
    Table,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let manifest: Self = serde_json::from_str(&raw)
            .with_context(|| format!("invalid manifest {}", path.display()))?;
        manifest.validate()?;

        tracing::debug!(
            "Loaded manifest {} with {} entries",
            path.display(),
            manifest.entries.len()
        );
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        let mut keys = HashSet::new();
        for entry in &self.entries {
            if !keys.insert(entry.key.as_str()) {
                bail!("duplicate entry key: {}", entry.key);
            }
            if entry.text.is_some() && entry.command.is_some() {
                bail!("entry {} sets both text and command", entry.key);
            }
        }
        Ok(())
    }
}

/// Default manifest location (`~/.config/jira/preview.json` on Linux).
pub fn default_manifest_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "jira").map(|dirs| dirs.config_dir().join(MANIFEST_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_manifest(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_manifest() {
        let file = write_manifest(
            r##"{
                "initialText": "Select an entry",
                "footerText": "q: quit",
                "theme": { "borderFocused": "#FFD966" },
                "entries": [
                    { "key": "OPEN", "label": "Open bugs", "command": "echo hi", "format": "table" },
                    { "key": "HELP", "label": "Help", "text": "Arrow keys browse." },
                    { "key": "NONE", "label": "Nothing" }
                ]
            }"##,
        );

        let manifest = Manifest::load(file.path()).unwrap();
        assert_eq!(manifest.initial_text.as_deref(), Some("Select an entry"));
        assert_eq!(manifest.footer_text.as_deref(), Some("q: quit"));
        assert_eq!(manifest.theme.border_focused.as_deref(), Some("#FFD966"));
        assert_eq!(manifest.entries.len(), 3);
        assert_eq!(manifest.entries[0].format, OutputFormat::Table);
        assert_eq!(manifest.entries[1].format, OutputFormat::Text);
        assert!(manifest.entries[2].text.is_none() && manifest.entries[2].command.is_none());
    }

    #[test]
    fn test_load_minimal_manifest() {
        let file = write_manifest("{}");
        let manifest = Manifest::load(file.path()).unwrap();
        assert!(manifest.entries.is_empty());
        assert!(manifest.initial_text.is_none());
    }

    #[test]
    fn test_missing_file_mentions_path() {
        let err = Manifest::load(Path::new("/nonexistent/preview.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/preview.json"));
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let file = write_manifest("{ not json");
        let err = Manifest::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid manifest"));
    }

    #[test]
    fn test_duplicate_keys_are_rejected() {
        let file = write_manifest(
            r#"{ "entries": [
                { "key": "A", "label": "One" },
                { "key": "A", "label": "Two" }
            ] }"#,
        );
        let err = Manifest::load(file.path()).unwrap_err();
        assert_eq!(err.to_string(), "duplicate entry key: A");
    }

    #[test]
    fn test_text_and_command_are_exclusive() {
        let file = write_manifest(
            r#"{ "entries": [ { "key": "A", "label": "One", "text": "x", "command": "y" } ] }"#,
        );
        let err = Manifest::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("both text and command"));
    }

    #[test]
    fn test_default_manifest_path() {
        if let Some(path) = default_manifest_path() {
            assert!(path.ends_with(MANIFEST_FILE));
        }
    }
}
