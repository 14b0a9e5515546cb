//! Quick-add: turn text pasted into the terminal into a new bookmark.
//!
//! The pasted payload plays the role of a URL dragged in from outside the
//! page. Parsing is best-effort: the text is normalized with a default
//! scheme just for the parse, and a failure cancels the whole operation
//! silently. The stored URL is always the literal pasted text.

use crate::document::{Link, Section};
use url::Url;

/// Scheme prefixed to scheme-less payloads, for parsing only.
const DEFAULT_SCHEME: &str = "https://";

#[derive(Clone, PartialEq, Eq, Debug)]
/// A successfully parsed paste payload.
pub struct DroppedUrl {
    /// Suggested display name: the host with a leading `www.` stripped.
    pub name: String,
    /// The pasted text, verbatim (never auto-prefixed).
    pub url: String,
}

#[must_use]
/// Prefixes the default scheme when the payload has none.
pub fn normalize_for_parse(raw: &str) -> String {
    if raw.contains("://") {
        raw.to_string()
    } else {
        format!("{DEFAULT_SCHEME}{raw}")
    }
}

#[must_use]
/// Consumes a paste payload: takes the first whitespace-delimited token,
/// parses it as a URL (scheme-normalized), and derives a display name from
/// the host. Returns `None` on an empty payload, a parse failure, or a URL
/// without a host — the caller treats that as a silent no-op.
pub fn parse_dropped(payload: &str) -> Option<DroppedUrl> {
    let token = payload.split_whitespace().next()?;
    let parsed = Url::parse(&normalize_for_parse(token)).ok()?;
    let host = parsed.host_str()?;
    let name = host.strip_prefix("www.").unwrap_or(host).to_string();

    Some(DroppedUrl {
        name,
        url: token.to_string(),
    })
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Which field of the confirmation overlay has focus.
pub enum QuickAddField {
    /// The display name input.
    Name,
    /// The URL input.
    Url,
    /// The section selector / new-section title input.
    Target,
}

#[derive(Clone, PartialEq, Eq, Debug)]
/// Where the confirmed link goes.
pub enum QuickAddTarget {
    /// Append to the existing section at this index.
    Existing(usize),
    /// Create a section with this title and append there.
    NewSection(String),
}

#[derive(Clone, PartialEq, Eq, Debug)]
/// State of the quick-add confirmation overlay.
pub struct QuickAddForm {
    /// Display name input, pre-filled from the parsed host.
    pub name: String,
    /// URL input, pre-filled with the literal payload.
    pub url: String,
    /// Chosen destination.
    pub target: QuickAddTarget,
    /// Focused input.
    pub focus: QuickAddField,
}

impl QuickAddForm {
    #[must_use]
    /// Builds the overlay for a parsed payload. With no existing sections
    /// the target starts on "new section"; otherwise on section 0.
    pub fn new(dropped: DroppedUrl, section_count: usize) -> Self {
        let target = if section_count == 0 {
            QuickAddTarget::NewSection(String::new())
        } else {
            QuickAddTarget::Existing(0)
        };
        Self {
            name: dropped.name,
            url: dropped.url,
            target,
            focus: QuickAddField::Name,
        }
    }

    /// Advances focus: name → URL → target → name.
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            QuickAddField::Name => QuickAddField::Url,
            QuickAddField::Url => QuickAddField::Target,
            QuickAddField::Target => QuickAddField::Name,
        };
    }

    /// Steps the target selector forward through the existing sections and
    /// then a "new section" entry, wrapping around.
    pub fn cycle_target(&mut self, section_count: usize) {
        self.target = match &self.target {
            QuickAddTarget::Existing(i) if i + 1 < section_count => {
                QuickAddTarget::Existing(i + 1)
            }
            QuickAddTarget::Existing(_) => QuickAddTarget::NewSection(String::new()),
            QuickAddTarget::NewSection(_) if section_count > 0 => QuickAddTarget::Existing(0),
            QuickAddTarget::NewSection(title) => QuickAddTarget::NewSection(title.clone()),
        };
    }

    /// The text input currently focused, if the focused element is a text
    /// input (the target selector only is while on "new section").
    pub fn focused_input_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            QuickAddField::Name => Some(&mut self.name),
            QuickAddField::Url => Some(&mut self.url),
            QuickAddField::Target => match &mut self.target {
                QuickAddTarget::NewSection(title) => Some(title),
                QuickAddTarget::Existing(_) => None,
            },
        }
    }

    #[must_use]
    /// Validates the form and produces the link plus, for a new-section
    /// target, the section title. Returns `None` — the confirmation is a
    /// no-op — when the name, the URL, or a new-section title is blank.
    pub fn confirm(&self) -> Option<(Link, Option<String>)> {
        if self.name.trim().is_empty() || self.url.trim().is_empty() {
            return None;
        }
        let new_title = match &self.target {
            QuickAddTarget::Existing(_) => None,
            QuickAddTarget::NewSection(title) => {
                if title.trim().is_empty() {
                    return None;
                }
                Some(title.clone())
            }
        };
        Some((
            Link {
                name: self.name.clone(),
                url: self.url.clone(),
            },
            new_title,
        ))
    }

    #[must_use]
    /// Human-readable label of the current target for the overlay.
    pub fn target_label(&self, sections: &[Section]) -> String {
        match &self.target {
            QuickAddTarget::Existing(i) => sections
                .get(*i)
                .map_or_else(|| format!("section {i}"), |s| s.title.clone()),
            QuickAddTarget::NewSection(title) => format!("new section: {title}"),
        }
    }
}

#[cfg(test)]
#[path = "tests/ingest.rs"]
mod tests;
