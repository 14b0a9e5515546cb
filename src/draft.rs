//! The edit-mode draft: a mutable copy of the link document.
//!
//! Entering edit mode builds a draft from the current document; every edit
//! (typing, adding, removing, reordering) patches the draft directly, and
//! rendering is a projection of it. Nothing touches the current document
//! until `commit` rebuilds a `LinkDocument` from the draft at save time, so
//! discarding the draft is free and toggling modes without edits is
//! lossless.

use crate::document::{Link, LinkDocument, Section};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Cursor position in the draft: a section title row or a link row.
pub enum DraftRow {
    /// The title row of section `.0`.
    Section(usize),
    /// Link row `.1` inside section `.0`.
    Link(usize, usize),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Which half of a link row the cursor edits.
pub enum LinkField {
    /// The display name.
    Name,
    /// The target URL.
    Url,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Tracks the lifecycle of a row reordering operation.
///
/// ```text
/// None -> Selected -> Moved -> None (after commit or cancel)
///        ^ |
///        |____________________|
///              (cancel)
/// ```
///
/// `Selected` means the cursor row is armed for moving (Ctrl+↑/↓ pressed
/// once); any actual move transitions to `Moved` until the draft is
/// committed or the move is cancelled. The row order itself lives in the
/// draft, so cancelling clears the visual state without rewinding moves —
/// discarding the whole draft is the undo.
pub enum MoveState {
    /// Normal navigation; no row armed.
    None,
    /// Cursor row armed for moving, nothing repositioned yet.
    Selected,
    /// At least one reposition happened since arming.
    Moved,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
/// Editable copy of one link row.
pub struct DraftLink {
    /// Name field contents, verbatim.
    pub name: String,
    /// URL field contents, verbatim.
    pub url: String,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
/// Editable copy of one section.
pub struct DraftSection {
    /// Title field contents, verbatim.
    pub title: String,
    /// Link rows in their current order.
    pub links: Vec<DraftLink>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
/// The whole editable document plus cursor and move state.
pub struct EditDraft {
    /// Sections in their current order.
    pub sections: Vec<DraftSection>,
    /// Row the cursor is on.
    pub cursor: DraftRow,
    /// Field the cursor edits on link rows.
    pub field: LinkField,
    /// Whether keystrokes currently go into the focused field.
    pub editing: bool,
    /// Reorder state machine.
    pub move_state: MoveState,
}

impl EditDraft {
    #[must_use]
    /// Builds a draft mirroring `doc`. The cursor starts on the first
    /// section title when one exists.
    pub fn from_document(doc: &LinkDocument) -> Self {
        let sections = doc
            .sections
            .iter()
            .map(|section| DraftSection {
                title: section.title.clone(),
                links: section
                    .links
                    .iter()
                    .map(|link| DraftLink {
                        name: link.name.clone(),
                        url: link.url.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            sections,
            cursor: DraftRow::Section(0),
            field: LinkField::Name,
            editing: false,
            move_state: MoveState::None,
        }
    }

    #[must_use]
    /// Rebuilds a document from the draft in its current row order.
    ///
    /// Every section is kept with its title verbatim (empty string
    /// included). A link row is kept only when both fields are non-blank
    /// after trimming; blank rows are dropped silently, which is also how
    /// a never-filled added row is cancelled. Kept values are stored
    /// verbatim, untrimmed. A section left with zero links survives.
    pub fn commit(&self) -> LinkDocument {
        LinkDocument {
            sections: self
                .sections
                .iter()
                .map(|section| Section {
                    title: section.title.clone(),
                    links: section
                        .links
                        .iter()
                        .filter(|link| {
                            !link.name.trim().is_empty() && !link.url.trim().is_empty()
                        })
                        .map(|link| Link {
                            name: link.name.clone(),
                            url: link.url.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    fn rows(&self) -> Vec<DraftRow> {
        let mut rows = Vec::new();
        for (si, section) in self.sections.iter().enumerate() {
            rows.push(DraftRow::Section(si));
            for li in 0..section.links.len() {
                rows.push(DraftRow::Link(si, li));
            }
        }
        rows
    }

    /// Moves the cursor to the next row, if there is one.
    pub fn select_next(&mut self) {
        let rows = self.rows();
        if let Some(pos) = rows.iter().position(|r| *r == self.cursor) {
            if pos + 1 < rows.len() {
                self.cursor = rows[pos + 1];
            }
        }
    }

    /// Moves the cursor to the previous row, if there is one.
    pub fn select_prev(&mut self) {
        let rows = self.rows();
        if let Some(pos) = rows.iter().position(|r| *r == self.cursor) {
            if pos > 0 {
                self.cursor = rows[pos - 1];
            }
        }
    }

    /// Flips the edited field on a link row.
    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            LinkField::Name => LinkField::Url,
            LinkField::Url => LinkField::Name,
        };
    }

    /// The field under the cursor: a section title, or the focused half of
    /// a link row. `None` when the draft has no rows.
    pub fn focused_field_mut(&mut self) -> Option<&mut String> {
        match self.cursor {
            DraftRow::Section(si) => self.sections.get_mut(si).map(|s| &mut s.title),
            DraftRow::Link(si, li) => {
                let link = self.sections.get_mut(si)?.links.get_mut(li)?;
                Some(match self.field {
                    LinkField::Name => &mut link.name,
                    LinkField::Url => &mut link.url,
                })
            }
        }
    }

    /// Appends a character to the focused field.
    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.focused_field_mut() {
            field.push(c);
        }
    }

    /// Removes the last character of the focused field.
    pub fn pop_char(&mut self) {
        if let Some(field) = self.focused_field_mut() {
            field.pop();
        }
    }

    /// Appends pasted text to the focused field, newlines collapsed away.
    pub fn insert_text(&mut self, text: &str) {
        if let Some(field) = self.focused_field_mut() {
            field.extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    /// Appends an empty link row to the cursor's section and starts editing
    /// its name. No-op when the draft has no sections.
    pub fn add_link(&mut self) {
        let si = match self.cursor {
            DraftRow::Section(si) | DraftRow::Link(si, _) => si,
        };
        if let Some(section) = self.sections.get_mut(si) {
            section.links.push(DraftLink::default());
            self.cursor = DraftRow::Link(si, section.links.len() - 1);
            self.field = LinkField::Name;
            self.editing = true;
        }
    }

    /// Appends a blank section after the last one and starts editing its
    /// title.
    pub fn add_section(&mut self) {
        self.sections.push(DraftSection::default());
        self.cursor = DraftRow::Section(self.sections.len() - 1);
        self.editing = true;
    }

    /// Deletes the row under the cursor: a link row, or a whole section
    /// (its links included) when on a title row. The cursor lands on the
    /// nearest surviving row.
    pub fn remove_row(&mut self) {
        match self.cursor {
            DraftRow::Section(si) => {
                if si < self.sections.len() {
                    self.sections.remove(si);
                    let last = self.sections.len().saturating_sub(1);
                    self.cursor = DraftRow::Section(si.min(last));
                }
            }
            DraftRow::Link(si, li) => {
                if let Some(section) = self.sections.get_mut(si) {
                    if li < section.links.len() {
                        section.links.remove(li);
                        self.cursor = if section.links.is_empty() {
                            DraftRow::Section(si)
                        } else {
                            DraftRow::Link(si, li.min(section.links.len() - 1))
                        };
                    }
                }
            }
        }
    }

    // --- Row movement ---

    /// Arms the cursor row for moving.
    pub fn start_move(&mut self) {
        self.move_state = MoveState::Selected;
    }

    /// Clears the move state. Row order stays as-is; discarding the draft
    /// is the way back to the committed order.
    pub fn cancel_move(&mut self) {
        self.move_state = MoveState::None;
    }

    fn mark_moved(&mut self) {
        self.move_state = MoveState::Moved;
    }

    /// Moves the armed row up: sections swap with the section above; links
    /// swap within their section, or hop to the end of the previous section
    /// from the first row.
    pub fn move_row_up(&mut self) -> bool {
        match self.cursor {
            DraftRow::Section(si) => {
                if si > 0 && si < self.sections.len() {
                    self.sections.swap(si, si - 1);
                    self.cursor = DraftRow::Section(si - 1);
                    self.mark_moved();
                    return true;
                }
                false
            }
            DraftRow::Link(si, li) => {
                if li > 0 {
                    self.sections[si].links.swap(li, li - 1);
                    self.cursor = DraftRow::Link(si, li - 1);
                    self.mark_moved();
                    return true;
                }
                if si > 0 {
                    let link = self.sections[si].links.remove(li);
                    self.sections[si - 1].links.push(link);
                    self.cursor = DraftRow::Link(si - 1, self.sections[si - 1].links.len() - 1);
                    self.mark_moved();
                    return true;
                }
                false
            }
        }
    }

    /// Moves the armed row down: the mirror image of `move_row_up`, with
    /// links hopping to the start of the next section from the last row.
    pub fn move_row_down(&mut self) -> bool {
        match self.cursor {
            DraftRow::Section(si) => {
                if si + 1 < self.sections.len() {
                    self.sections.swap(si, si + 1);
                    self.cursor = DraftRow::Section(si + 1);
                    self.mark_moved();
                    return true;
                }
                false
            }
            DraftRow::Link(si, li) => {
                if li + 1 < self.sections[si].links.len() {
                    self.sections[si].links.swap(li, li + 1);
                    self.cursor = DraftRow::Link(si, li + 1);
                    self.mark_moved();
                    return true;
                }
                if si + 1 < self.sections.len() {
                    let link = self.sections[si].links.remove(li);
                    self.sections[si + 1].links.insert(0, link);
                    self.cursor = DraftRow::Link(si + 1, 0);
                    self.mark_moved();
                    return true;
                }
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/draft.rs"]
mod tests;
