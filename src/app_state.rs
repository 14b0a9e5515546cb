//! The core state machine bridging the stored documents and the dashboard.
//!
//! One `AppState` owns the current copy of all three documents and every
//! piece of transient UI state: the active view, the edit-mode draft, the
//! search query, the quick-add overlay, the notes editor buffer, and the
//! uptime badge. Rendering is a pure projection of this struct; all
//! mutation happens through its methods, and the only way the current link
//! document changes is a committed save or a confirmed quick-add.

use crate::document::{
    Link, LinkDocument, NotesDocument, Section, SettingsDocument, MAX_COLUMNS, MIN_COLUMNS,
};
use crate::draft::EditDraft;
use crate::ingest::{self, QuickAddForm};
use crate::status::StatusBadge;
use crate::store::{SaveOrigin, SaveOutcome, SavePayload, SaveRequest};
use edtui::{EditorState, Lines};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Determines which screen renders and how input is interpreted.
pub enum View {
    /// Read-only link grid with search, quick-add, and the status badge.
    Display,
    /// The editable draft.
    Edit,
    /// The scratchpad editor.
    Notes,
    /// Vim-style command prompt, layered over the view it was opened from.
    Command,
}

/// Bridges the stored documents and the interactive dashboard.
pub struct AppState {
    /// Current link collection; replaced whole on commit or quick-add.
    pub links: LinkDocument,
    /// Current settings.
    pub settings: SettingsDocument,
    /// Current scratchpad contents.
    pub notes: NotesDocument,
    /// Active UI screen.
    pub view: View,
    /// Screen the command prompt returns to.
    pub command_return: View,
    /// Accumulates command input after ':' is pressed.
    pub command_buffer: String,
    /// Status feedback displayed in the footer.
    pub message: Option<String>,
    /// Edit-mode draft; `Some` exactly while edit mode is active.
    pub draft: Option<EditDraft>,
    /// Committed document awaiting the save queue's acknowledgement.
    pub pending_commit: Option<LinkDocument>,
    /// Whether keystrokes currently go into the search field.
    pub search_active: bool,
    /// Live filter query.
    pub search_query: String,
    /// Cursor position in the flattened list of visible links.
    pub selected_link: usize,
    /// Quick-add confirmation overlay, when open.
    pub quick_add: Option<QuickAddForm>,
    /// Latest badge from the status poller.
    pub badge: StatusBadge,
    /// Scratchpad buffer; `Some` exactly while the notes view is active.
    pub notes_editor: Option<EditorState>,
    /// Pre-lowered (name, url) pairs mirroring `links`, for the filter.
    search_index: Vec<Vec<(String, String)>>,
}

impl AppState {
    #[must_use]
    /// Initialises the dashboard on the display view with freshly loaded
    /// documents.
    pub fn new(links: LinkDocument, settings: SettingsDocument, notes: NotesDocument) -> Self {
        let search_index = build_search_index(&links);
        Self {
            links,
            settings,
            notes,
            view: View::Display,
            command_return: View::Display,
            command_buffer: String::new(),
            message: None,
            draft: None,
            pending_commit: None,
            search_active: false,
            search_query: String::new(),
            selected_link: 0,
            quick_add: None,
            badge: StatusBadge::Hidden,
            notes_editor: None,
            search_index,
        }
    }

    fn rebuild_search_index(&mut self) {
        self.search_index = build_search_index(&self.links);
    }

    // --- Display mode: search and navigation ---

    #[must_use]
    /// Per-section visibility under the current query: the section flag
    /// plus one flag per link. A link is visible iff the query is empty or
    /// a lowercase substring of its name or URL; a section with links is
    /// hidden iff all of them are. Pure function of (documents, query) —
    /// clearing the query restores everything.
    pub fn visibility(&self) -> Vec<(bool, Vec<bool>)> {
        let query = self.search_query.to_lowercase();
        self.search_index
            .iter()
            .map(|section| {
                let links: Vec<bool> = section
                    .iter()
                    .map(|(name, url)| {
                        query.is_empty() || name.contains(&query) || url.contains(&query)
                    })
                    .collect();
                let visible = query.is_empty() || links.iter().any(|v| *v);
                (visible, links)
            })
            .collect()
    }

    #[must_use]
    /// Coordinates of the visible links, in display order.
    pub fn visible_links(&self) -> Vec<(usize, usize)> {
        self.visibility()
            .iter()
            .enumerate()
            .filter(|(_, (section_visible, _))| *section_visible)
            .flat_map(|(si, (_, links))| {
                links
                    .iter()
                    .enumerate()
                    .filter(|(_, visible)| **visible)
                    .map(move |(li, _)| (si, li))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Moves the display cursor by `delta` positions through the visible
    /// links, clamped at both ends. Grid navigation passes the column
    /// count as the vertical step.
    pub fn select_by(&mut self, delta: isize) {
        let count = self.visible_links().len();
        if count == 0 {
            self.selected_link = 0;
            return;
        }
        let current = isize::try_from(self.selected_link.min(count - 1)).unwrap_or(0);
        let last = isize::try_from(count - 1).unwrap_or(0);
        self.selected_link = usize::try_from((current + delta).clamp(0, last)).unwrap_or(0);
    }

    #[must_use]
    /// The link under the display cursor, if any link is visible.
    pub fn selected_target(&self) -> Option<&Link> {
        let visible = self.visible_links();
        let (si, li) = visible.get(self.selected_link.min(visible.len().checked_sub(1)?))?;
        self.links.sections.get(*si)?.links.get(*li)
    }

    /// Appends a character to the search query.
    pub fn search_push(&mut self, c: char) {
        self.search_query.push(c);
        self.clamp_selection();
    }

    /// Removes the last character of the search query.
    pub fn search_pop(&mut self) {
        self.search_query.pop();
        self.clamp_selection();
    }

    /// Blurs the search field and clears the query, resetting visibility.
    pub fn clear_search(&mut self) {
        self.search_active = false;
        self.search_query.clear();
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let count = self.visible_links().len();
        if count == 0 {
            self.selected_link = 0;
        } else {
            self.selected_link = self.selected_link.min(count - 1);
        }
    }

    // --- Edit mode ---

    /// Display → Edit: builds the draft from the current document. The
    /// search query is cleared on the way in (the filter is a display-only
    /// affordance).
    pub fn enter_edit_mode(&mut self) {
        self.clear_search();
        self.draft = Some(EditDraft::from_document(&self.links));
        self.view = View::Edit;
        self.message = None;
    }

    /// Edit → Display without saving: the draft and any reordering in it
    /// are thrown away, the current document untouched.
    pub fn discard_edit(&mut self) {
        self.draft = None;
        self.pending_commit = None;
        self.view = View::Display;
    }

    /// Edit-mode `:w`: reconciles the draft into a document and hands back
    /// the save request for the queue. The app stays in edit mode, draft
    /// intact, until the queue acknowledges; `apply_save_outcome` finishes
    /// the transition.
    pub fn begin_commit(&mut self) -> Option<SaveRequest> {
        let draft = self.draft.as_ref()?;
        let doc = draft.commit();
        self.pending_commit = Some(doc.clone());
        self.message = Some("Saving...".to_string());
        Some(SaveRequest {
            origin: SaveOrigin::Commit,
            payload: SavePayload::Links(doc),
        })
    }

    /// Routes a completed save back into the state machine.
    ///
    /// Commit success replaces the current document and finishes
    /// Edit→Display; commit failure keeps edit mode open with the draft
    /// and the current document unchanged. Background origins only surface
    /// failures (quick-add already updated the current value
    /// optimistically).
    pub fn apply_save_outcome(&mut self, outcome: &SaveOutcome) {
        match (outcome.origin, &outcome.result) {
            (SaveOrigin::Commit, Ok(())) => {
                // A commit discarded before its acknowledgement arrives is
                // stale; ignore it rather than disturb the current view.
                if let Some(doc) = self.pending_commit.take() {
                    self.links = doc;
                    self.rebuild_search_index();
                    self.draft = None;
                    self.view = View::Display;
                    self.message = Some("Saved".to_string());
                }
            }
            (SaveOrigin::Commit, Err(e)) => {
                self.pending_commit = None;
                self.message = Some(format!("Save failed: {e}"));
            }
            (SaveOrigin::QuickAdd, Err(e)) => {
                self.message = Some(format!("Quick-add save failed: {e}"));
            }
            (SaveOrigin::Settings, Err(e)) => {
                self.message = Some(format!("Settings save failed: {e}"));
            }
            (SaveOrigin::Notes, Ok(())) => {
                self.message = Some("Notes saved".to_string());
            }
            (SaveOrigin::Notes, Err(e)) => {
                self.message = Some(format!("Notes save failed: {e}"));
            }
            (SaveOrigin::QuickAdd | SaveOrigin::Settings, Ok(())) => {}
        }
    }

    // --- Quick-add ---

    /// Consumes a paste payload in display mode. An unparseable payload is
    /// a silent no-op; a parseable one opens the confirmation overlay.
    /// Returns whether the overlay opened.
    pub fn begin_quick_add(&mut self, payload: &str) -> bool {
        if self.view != View::Display || self.quick_add.is_some() {
            return false;
        }
        match ingest::parse_dropped(payload) {
            Some(dropped) => {
                self.quick_add = Some(QuickAddForm::new(dropped, self.links.sections.len()));
                true
            }
            None => false,
        }
    }

    /// Closes the overlay without adding anything.
    pub fn cancel_quick_add(&mut self) {
        self.quick_add = None;
    }

    /// Confirms the overlay: appends the link to the chosen or newly
    /// created section, updates the current document optimistically, and
    /// hands back the background save request. A blank name, URL, or
    /// new-section title leaves the overlay open and returns `None`.
    pub fn confirm_quick_add(&mut self) -> Option<SaveRequest> {
        let form = self.quick_add.as_ref()?;
        let (link, new_title) = form.confirm()?;

        match (new_title, &form.target) {
            (Some(title), _) => {
                self.links.sections.push(Section {
                    title,
                    links: vec![link],
                });
            }
            (None, ingest::QuickAddTarget::Existing(i)) => {
                self.links.sections.get_mut(*i)?.links.push(link);
            }
            (None, ingest::QuickAddTarget::NewSection(_)) => return None,
        }

        self.quick_add = None;
        self.rebuild_search_index();
        Some(SaveRequest {
            origin: SaveOrigin::QuickAdd,
            payload: SavePayload::Links(self.links.clone()),
        })
    }

    // --- Notes ---

    /// Display → Notes: seeds the scratchpad editor from the current note.
    pub fn enter_notes(&mut self) {
        self.notes_editor = Some(EditorState::new(Lines::from(self.notes.content.as_str())));
        self.view = View::Notes;
        self.message = None;
    }

    /// Notes → Display; the buffer is dropped (saving is `:w` / `:x`).
    pub fn exit_notes(&mut self) {
        self.notes_editor = None;
        self.view = View::Display;
    }

    #[must_use]
    /// The scratchpad buffer as one string.
    pub fn notes_text(&self) -> String {
        self.notes_editor.as_ref().map_or_else(
            || self.notes.content.clone(),
            |editor| {
                editor
                    .lines
                    .iter_row()
                    .map(|line| line.iter().collect::<String>())
                    .collect::<Vec<_>>()
                    .join("\n")
            },
        )
    }

    /// Notes `:w`: updates the current note from the buffer and hands back
    /// the save request.
    pub fn save_notes(&mut self) -> SaveRequest {
        self.notes = NotesDocument {
            content: self.notes_text(),
        };
        SaveRequest {
            origin: SaveOrigin::Notes,
            payload: SavePayload::Notes(self.notes.clone()),
        }
    }

    // --- Settings commands ---

    /// `:columns N` — clamps into [1, 6], persists.
    pub fn set_columns(&mut self, requested: i64) -> SaveRequest {
        self.settings.link_columns = requested.clamp(MIN_COLUMNS, MAX_COLUMNS);
        self.settings_request()
    }

    /// `:title TEXT` — replaces the page title, persists.
    pub fn set_title(&mut self, title: String) -> SaveRequest {
        self.settings.page_title = title;
        self.settings_request()
    }

    /// `:newtab` — toggles the new-tab preference, persists.
    pub fn toggle_newtab(&mut self) -> SaveRequest {
        self.settings.open_links_in_new_tab = !self.settings.open_links_in_new_tab;
        self.settings_request()
    }

    fn settings_request(&self) -> SaveRequest {
        SaveRequest {
            origin: SaveOrigin::Settings,
            payload: SavePayload::Settings(self.settings.clone()),
        }
    }
}

fn build_search_index(links: &LinkDocument) -> Vec<Vec<(String, String)>> {
    links
        .sections
        .iter()
        .map(|section| {
            section
                .links
                .iter()
                .map(|link| (link.name.to_lowercase(), link.url.to_lowercase()))
                .collect()
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
