//! The three JSON documents portico owns: links, settings, and notes.
//!
//! Each document is one whole JSON value persisted and retrieved as a unit.
//! Sections and links carry no identifiers; their position in the arrays is
//! their identity, so array order is meaningful and must survive a
//! save/load round-trip untouched.

use serde::{Deserialize, Serialize};

/// Lower bound for the display grid column count.
pub const MIN_COLUMNS: i64 = 1;
/// Upper bound for the display grid column count.
pub const MAX_COLUMNS: i64 = 6;

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
/// The whole link collection: an ordered list of sections.
pub struct LinkDocument {
    /// Sections in display and persisted order.
    pub sections: Vec<Section>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
/// A named, ordered group of links.
pub struct Section {
    /// Free-text heading, not required to be unique.
    pub title: String,
    /// Links in display and persisted order.
    pub links: Vec<Link>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
/// One bookmark entry.
pub struct Link {
    /// Display name shown in the grid.
    pub name: String,
    /// Target URL, stored exactly as entered.
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase", default)]
/// UI preferences persisted alongside the links.
pub struct SettingsDocument {
    /// Heading shown at the top of the display view.
    pub page_title: String,
    /// Whether link targets should open in a fresh browser context.
    pub open_links_in_new_tab: bool,
    /// Requested display grid width; consumed clamped to [1, 6].
    pub link_columns: i64,
    /// Bootstrap-only flag, preserved verbatim and ignored by the editor.
    pub force_overwrite_static_files: bool,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
/// The scratchpad: a single opaque text blob.
pub struct NotesDocument {
    /// Note text, newlines included.
    pub content: String,
}

impl LinkDocument {
    #[must_use]
    /// First-run content written by the bootstrap step.
    pub fn starter() -> Self {
        Self {
            sections: vec![
                Section {
                    title: "Getting Started".to_string(),
                    links: vec![
                        Link {
                            name: "Google".to_string(),
                            url: "https://google.com".to_string(),
                        },
                        Link {
                            name: "GitHub".to_string(),
                            url: "https://github.com".to_string(),
                        },
                    ],
                },
                Section {
                    title: "News".to_string(),
                    links: vec![
                        Link {
                            name: "Hacker News".to_string(),
                            url: "https://news.ycombinator.com".to_string(),
                        },
                        Link {
                            name: "Reddit".to_string(),
                            url: "https://reddit.com".to_string(),
                        },
                    ],
                },
            ],
        }
    }
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self {
            page_title: "My Homepage".to_string(),
            open_links_in_new_tab: true,
            link_columns: 3,
            force_overwrite_static_files: false,
        }
    }
}

impl SettingsDocument {
    #[must_use]
    /// Column count actually used by the display grid.
    ///
    /// The stored value round-trips verbatim; out-of-range values are
    /// clamped to [1, 6] here, at the point of consumption.
    pub fn effective_columns(&self) -> usize {
        usize::try_from(self.link_columns.clamp(MIN_COLUMNS, MAX_COLUMNS)).unwrap_or(1)
    }
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
