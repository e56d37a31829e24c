//! CLI argument parsing for jira.

use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jira")]
#[command(about = "Browse issue lists in a two-pane terminal preview", version)]
pub struct Cli {
    /// Preview manifest to load (defaults to <config dir>/jira/preview.json)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Text shown in the content pane before anything is selected
    #[arg(long)]
    pub initial_text: Option<String>,

    /// Text shown below both panes
    #[arg(long)]
    pub footer_text: Option<String>,

    /// Enable debug logging (logs to <tmp>/jira-preview.log)
    #[arg(short, long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "jira",
            "--manifest",
            "/tmp/preview.json",
            "--footer-text",
            "q: quit",
            "-d",
        ]);
        assert_eq!(cli.manifest, Some(PathBuf::from("/tmp/preview.json")));
        assert_eq!(cli.footer_text.as_deref(), Some("q: quit"));
        assert!(cli.initial_text.is_none());
        assert!(cli.debug);
    }
}
