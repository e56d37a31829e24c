//! Entries shown in the sidebar and the content they produce.

use std::fmt;
use std::sync::Arc;

/// Produces the content for an entry key. Called off the render loop, so it
/// may block for as long as it needs to.
pub type Producer = Arc<dyn Fn(&str) -> anyhow::Result<Content> + Send + Sync>;

/// Result of a producer: free text or a table whose first row is the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Table(Vec<Vec<String>>),
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Builds a table from anything that yields rows of string-like cells.
    pub fn table<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::Table(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

/// One sidebar item plus its on-demand content producer.
#[derive(Clone)]
pub struct Entry {
    pub key: String,
    pub label: String,
    pub produce: Option<Producer>,
}

impl Entry {
    pub fn new<F>(key: impl Into<String>, label: impl Into<String>, produce: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<Content> + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            label: label.into(),
            produce: Some(Arc::new(produce)),
        }
    }

    /// An entry with no producer. Selecting it shows a placeholder.
    pub fn without_contents(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            produce: None,
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("produce", &self.produce.is_some())
            .finish()
    }
}
