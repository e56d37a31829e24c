//! Turns manifest entries into preview entries with content producers.

use anyhow::{Context, Result, bail};
use jira_tui::{Content, Entry};

use std::process::{Command, Stdio};

use crate::config::{EntrySpec, OutputFormat};

/// Environment variable carrying the entry key into commands.
pub const KEY_ENV: &str = "JIRA_PREVIEW_KEY";

pub fn build_entries(specs: &[EntrySpec]) -> Vec<Entry> {
    specs.iter().map(build_entry).collect()
}

fn build_entry(spec: &EntrySpec) -> Entry {
    if let Some(text) = &spec.text {
        let text = text.clone();
        return Entry::new(&spec.key, &spec.label, move |_| Ok(Content::text(text.clone())));
    }

    if let Some(command) = &spec.command {
        let command = command.clone();
        let format = spec.format;
        return Entry::new(&spec.key, &spec.label, move |key| {
            run_command(&command, key, format)
        });
    }

    Entry::without_contents(&spec.key, &spec.label)
}

/// Runs `template` through `sh -c` with `{key}` replaced by the shell-quoted
/// key and the raw key exported in [`KEY_ENV`].
fn run_command(template: &str, key: &str, format: OutputFormat) -> Result<Content> {
    let command = template.replace("{key}", &shell_words::quote(key));
    tracing::debug!("Running producer command: {}", command);

    let output = Command::new("sh")
        .arg("-c")
        .arg(&command)
        .env(KEY_ENV, key)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("failed to run `{command}`"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("`{command}` failed with {}: {}", output.status, stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_output(&stdout, format))
}

fn parse_output(stdout: &str, format: OutputFormat) -> Content {
    match format {
        OutputFormat::Text => Content::text(stdout.trim_end()),
        OutputFormat::Table => Content::table(
            stdout
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| line.split('\t')),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(key: &str) -> EntrySpec {
        EntrySpec {
            key: key.to_string(),
            label: format!("Label {key}"),
            text: None,
            command: None,
            format: OutputFormat::Text,
        }
    }

    fn produce(entry: &Entry) -> Result<Content> {
        let produce = entry.produce.as_ref().expect("entry has a producer");
        produce(&entry.key)
    }

    #[test]
    fn test_parse_text_output() {
        assert_eq!(
            parse_output("line one\nline two\n", OutputFormat::Text),
            Content::text("line one\nline two")
        );
    }

    #[test]
    fn test_parse_table_output() {
        let content = parse_output("ID\tSummary\n\n1\tFix X\n", OutputFormat::Table);
        assert_eq!(content, Content::table([["ID", "Summary"], ["1", "Fix X"]]));
    }

    #[test]
    fn test_static_text_entry() {
        let mut text_spec = spec("HELP");
        text_spec.text = Some("Arrow keys browse.".to_string());

        let entries = build_entries(&[text_spec]);
        assert_eq!(entries[0].label, "Label HELP");
        assert_eq!(produce(&entries[0]).unwrap(), Content::text("Arrow keys browse."));
    }

    #[test]
    fn test_entry_without_source_has_no_producer() {
        let entries = build_entries(&[spec("NONE")]);
        assert!(entries[0].produce.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_receives_key() {
        let mut command_spec = spec("K1");
        command_spec.command = Some(format!("echo {{key}} ${KEY_ENV}"));

        let entries = build_entries(&[command_spec]);
        assert_eq!(produce(&entries[0]).unwrap(), Content::text("K1 K1"));
    }

    #[cfg(unix)]
    #[test]
    fn test_key_is_substituted_as_one_word() {
        let key = "K1; echo injected $(echo sub) 'q'";
        let mut command_spec = spec(key);
        command_spec.command = Some("printf '%s|' {key}".to_string());

        let entries = build_entries(&[command_spec]);
        assert_eq!(produce(&entries[0]).unwrap(), Content::text(format!("{key}|")));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_table_output() {
        let mut command_spec = spec("K1");
        command_spec.command = Some(r"printf 'ID\tSummary\n1\tFix X\n'".to_string());
        command_spec.format = OutputFormat::Table;

        let entries = build_entries(&[command_spec]);
        assert_eq!(
            produce(&entries[0]).unwrap(),
            Content::table([["ID", "Summary"], ["1", "Fix X"]])
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_is_an_error() {
        let mut command_spec = spec("K1");
        command_spec.command = Some("echo nope >&2; exit 3".to_string());

        let entries = build_entries(&[command_spec]);
        let err = produce(&entries[0]).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
