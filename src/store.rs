//! Whole-file JSON persistence for the three documents, plus the save queue.
//!
//! The store reads and writes each document as one file: no partial updates,
//! no locking. Every write in the application funnels through a single
//! background worker (`SaveWorker`) so that a quick-add save and an
//! edit-mode commit can never interleave on disk; the event loop drains the
//! worker's outcome channel once per tick.

use crate::document::{LinkDocument, NotesDocument, SettingsDocument};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use thiserror::Error;

/// File name of the link collection inside the data directory.
const LINKS_FILE: &str = "links.json";
/// File name of the settings document inside the data directory.
const SETTINGS_FILE: &str = "settings.json";
/// File name of the scratchpad inside the data directory.
const NOTES_FILE: &str = "notes.json";

#[derive(Error, Debug)]
/// The two ways a document operation can fail.
pub enum StoreError {
    /// The file could not be read, written, or created.
    #[error("document I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The file contents were not the expected JSON shape.
    #[error("document did not parse: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone)]
/// Flat-file document store rooted at one data directory.
pub struct DocumentStore {
    data_dir: PathBuf,
}

impl DocumentStore {
    #[must_use]
    /// Creates a store rooted at `data_dir`. Nothing is touched on disk
    /// until `bootstrap` or a load/save call.
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    #[must_use]
    /// Path of the link collection file.
    pub fn links_path(&self) -> PathBuf {
        self.data_dir.join(LINKS_FILE)
    }

    #[must_use]
    /// Path of the settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }

    #[must_use]
    /// Path of the scratchpad file.
    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join(NOTES_FILE)
    }

    /// Creates the data directory and writes starter content for any
    /// document file that does not exist yet, so a first run always finds
    /// valid documents. Existing files are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a starter
    /// file cannot be written.
    pub fn bootstrap(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)?;

        if !self.links_path().exists() {
            write_json(&self.links_path(), &LinkDocument::starter())?;
        }
        if !self.settings_path().exists() {
            write_json(&self.settings_path(), &SettingsDocument::default())?;
        }
        if !self.notes_path().exists() {
            write_json(&self.notes_path(), &NotesDocument::default())?;
        }
        Ok(())
    }

    /// Reads and parses the link collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or not valid JSON of the
    /// expected shape.
    pub fn load_links(&self) -> Result<LinkDocument, StoreError> {
        read_json(&self.links_path())
    }

    /// Reads and parses the settings document. Missing fields fall back to
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or not valid JSON.
    pub fn load_settings(&self) -> Result<SettingsDocument, StoreError> {
        read_json(&self.settings_path())
    }

    /// Reads and parses the scratchpad.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or not valid JSON.
    pub fn load_notes(&self) -> Result<NotesDocument, StoreError> {
        read_json(&self.notes_path())
    }

    /// Replaces the stored link collection with `doc`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save_links(&self, doc: &LinkDocument) -> Result<(), StoreError> {
        write_json(&self.links_path(), doc)
    }

    /// Replaces the stored settings with `doc`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save_settings(&self, doc: &SettingsDocument) -> Result<(), StoreError> {
        write_json(&self.settings_path(), doc)
    }

    /// Replaces the stored scratchpad with `doc`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save_notes(&self, doc: &NotesDocument) -> Result<(), StoreError> {
        write_json(&self.notes_path(), doc)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let contents = serde_json::to_string_pretty(value)?;
    fs::write(path, contents)?;
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Which interaction produced a save, so the outcome can be routed back to
/// the right state transition.
pub enum SaveOrigin {
    /// Edit-mode `:w` — the Edit→Display transition waits on this outcome.
    Commit,
    /// Quick-add background save; the in-memory value was already updated.
    QuickAdd,
    /// A settings command (`:columns`, `:title`, `:newtab`).
    Settings,
    /// Scratchpad `:w` / `:x`.
    Notes,
}

/// A document snapshot headed for disk.
pub enum SavePayload {
    /// Replace the stored link collection.
    Links(LinkDocument),
    /// Replace the stored settings.
    Settings(SettingsDocument),
    /// Replace the stored scratchpad.
    Notes(NotesDocument),
}

/// One queued write.
pub struct SaveRequest {
    /// Which interaction produced it.
    pub origin: SaveOrigin,
    /// The document to write.
    pub payload: SavePayload,
}

/// Result of one queued write, reported back to the event loop.
pub struct SaveOutcome {
    /// The origin of the request this outcome answers.
    pub origin: SaveOrigin,
    /// Whether the write reached disk.
    pub result: Result<(), StoreError>,
}

/// Serializes every document write through one background thread.
pub struct SaveWorker {
    requests: Sender<SaveRequest>,
    outcomes: Receiver<SaveOutcome>,
}

impl SaveWorker {
    #[must_use]
    /// Spawns the worker thread. The thread owns a clone of the store and
    /// exits when the `SaveWorker` (and with it the request sender) drops.
    pub fn spawn(store: DocumentStore) -> Self {
        let (req_tx, req_rx) = mpsc::channel::<SaveRequest>();
        let (out_tx, out_rx) = mpsc::channel::<SaveOutcome>();

        thread::spawn(move || {
            while let Ok(request) = req_rx.recv() {
                let result = match &request.payload {
                    SavePayload::Links(doc) => store.save_links(doc),
                    SavePayload::Settings(doc) => store.save_settings(doc),
                    SavePayload::Notes(doc) => store.save_notes(doc),
                };
                if let Err(ref e) = result {
                    log::warn!("save failed ({:?}): {e}", request.origin);
                }
                if out_tx
                    .send(SaveOutcome {
                        origin: request.origin,
                        result,
                    })
                    .is_err()
                {
                    break;
                }
            }
        });

        Self {
            requests: req_tx,
            outcomes: out_rx,
        }
    }

    /// Queues one write. The worker picks requests up in submission order.
    pub fn submit(&self, request: SaveRequest) {
        // The worker thread only exits once this sender drops, so a send
        // can only fail during shutdown.
        let _ = self.requests.send(request);
    }

    #[must_use]
    /// Drains one completed write, if any. Call from the event loop tick.
    pub fn poll(&self) -> Option<SaveOutcome> {
        self.outcomes.try_recv().ok()
    }
}

#[cfg(test)]
#[path = "tests/store.rs"]
mod tests;
