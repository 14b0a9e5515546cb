use super::{AppState, View};
use crate::document::{Link, LinkDocument, NotesDocument, Section, SettingsDocument};
use crate::ingest::{QuickAddField, QuickAddTarget};
use crate::status::StatusBadge;
use crate::store::{SaveOrigin, SaveOutcome, SavePayload, StoreError};

fn links(sections: &[(&str, &[(&str, &str)])]) -> LinkDocument {
    LinkDocument {
        sections: sections
            .iter()
            .map(|(title, entries)| Section {
                title: (*title).to_string(),
                links: entries
                    .iter()
                    .map(|(name, url)| Link {
                        name: (*name).to_string(),
                        url: (*url).to_string(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn app_with(doc: LinkDocument) -> AppState {
    AppState::new(doc, SettingsDocument::default(), NotesDocument::default())
}

fn io_failure() -> StoreError {
    StoreError::Io(std::io::Error::other("disk on fire"))
}

#[test]
fn test_starts_on_display_with_hidden_badge() {
    let app = app_with(links(&[("A", &[("X", "http://x")])]));
    assert_eq!(app.view, View::Display);
    assert_eq!(app.badge, StatusBadge::Hidden);
    assert!(app.draft.is_none());
}

#[test]
fn test_discard_leaves_current_untouched() {
    let original = links(&[("A", &[("X", "http://x")])]);
    let mut app = app_with(original.clone());

    app.enter_edit_mode();
    assert_eq!(app.view, View::Edit);
    let draft = app.draft.as_mut().unwrap();
    draft.push_char('!');
    app.discard_edit();

    assert_eq!(app.view, View::Display);
    assert_eq!(app.links, original, "discard throws the draft away whole");
    assert!(app.draft.is_none());
}

#[test]
fn test_commit_waits_for_the_save_queue() {
    let mut app = app_with(links(&[("A", &[("X", "http://x")])]));

    app.enter_edit_mode();
    app.draft.as_mut().unwrap().push_char('!');
    let request = app.begin_commit().expect("edit mode must produce a commit");

    // Still in edit mode until the queue acknowledges.
    assert_eq!(app.view, View::Edit);
    assert_eq!(app.links.sections[0].title, "A");
    let SavePayload::Links(ref committed) = request.payload else {
        panic!("commit must carry the links document");
    };
    assert_eq!(committed.sections[0].title, "A!");

    app.apply_save_outcome(&SaveOutcome {
        origin: SaveOrigin::Commit,
        result: Ok(()),
    });
    assert_eq!(app.view, View::Display);
    assert_eq!(app.links.sections[0].title, "A!");
    assert!(app.draft.is_none());
}

#[test]
fn test_failed_commit_keeps_edit_mode_and_current() {
    let original = links(&[("A", &[("X", "http://x")])]);
    let mut app = app_with(original.clone());

    app.enter_edit_mode();
    app.draft.as_mut().unwrap().push_char('!');
    app.begin_commit().unwrap();
    app.apply_save_outcome(&SaveOutcome {
        origin: SaveOrigin::Commit,
        result: Err(io_failure()),
    });

    assert_eq!(app.view, View::Edit, "the user gets to retry");
    assert_eq!(app.links, original);
    assert!(app.draft.is_some(), "the draft survives a failed save");
    assert!(app.message.as_deref().unwrap_or("").contains("Save failed"));
}

#[test]
fn test_quick_add_into_new_section() {
    let mut app = app_with(links(&[]));

    assert!(app.begin_quick_add("example.com/page"));
    {
        let form = app.quick_add.as_mut().unwrap();
        assert_eq!(form.name, "example.com", "name derives from the host");
        assert_eq!(form.url, "example.com/page", "the URL stays as dropped");
        assert_eq!(form.target, QuickAddTarget::NewSection(String::new()));

        form.focus = QuickAddField::Target;
        for c in "Misc".chars() {
            form.focused_input_mut().unwrap().push(c);
        }
    }

    let request = app.confirm_quick_add().expect("a filled form confirms");
    assert_eq!(request.origin, SaveOrigin::QuickAdd);

    assert_eq!(app.links.sections.len(), 1);
    assert_eq!(app.links.sections[0].title, "Misc");
    assert_eq!(
        app.links.sections[0].links,
        vec![Link {
            name: "example.com".to_string(),
            url: "example.com/page".to_string(),
        }]
    );
    assert!(app.quick_add.is_none());
}

#[test]
fn test_quick_add_appends_to_existing_section() {
    let mut app = app_with(links(&[("A", &[("X", "http://x")])]));

    assert!(app.begin_quick_add("https://www.rust-lang.org/learn"));
    let form = app.quick_add.as_ref().unwrap();
    assert_eq!(form.name, "rust-lang.org", "a leading www. is stripped");
    assert_eq!(form.target, QuickAddTarget::Existing(0));

    app.confirm_quick_add().unwrap();
    assert_eq!(app.links.sections[0].links.len(), 2);
    assert_eq!(
        app.links.sections[0].links[1].url,
        "https://www.rust-lang.org/learn"
    );
}

#[test]
fn test_quick_add_blank_title_is_a_no_op() {
    let mut app = app_with(links(&[]));

    assert!(app.begin_quick_add("example.com"));
    assert!(app.confirm_quick_add().is_none());
    assert!(app.quick_add.is_some(), "the overlay stays open for correction");
    assert!(app.links.sections.is_empty());
}

#[test]
fn test_unparseable_paste_is_silent() {
    let mut app = app_with(links(&[]));

    assert!(!app.begin_quick_add("   "));
    assert!(!app.begin_quick_add("%%%"));
    assert!(app.quick_add.is_none());
    assert!(app.message.is_none(), "ingest failure never surfaces an error");
}

#[test]
fn test_quick_add_only_opens_in_display_mode() {
    let mut app = app_with(links(&[("A", &[("X", "http://x")])]));
    app.enter_edit_mode();
    assert!(!app.begin_quick_add("example.com"));
}

#[test]
fn test_search_filters_name_and_url_case_insensitively() {
    let mut app = app_with(links(&[
        (
            "Dev",
            &[("GitHub", "https://github.com"), ("Docs", "https://docs.rs")],
        ),
        ("News", &[("Reddit", "https://reddit.com")]),
    ]));

    for c in "GIT".chars() {
        app.search_push(c);
    }
    let visibility = app.visibility();
    assert!(visibility[0].0, "a section with a match stays visible");
    assert_eq!(visibility[0].1, vec![true, false]);
    assert!(!visibility[1].0, "a section with all links hidden is hidden");

    // docs.rs matches by URL.
    app.clear_search();
    for c in "docs.rs".chars() {
        app.search_push(c);
    }
    assert_eq!(app.visibility()[0].1, vec![false, true]);
}

#[test]
fn test_empty_query_shows_everything() {
    let mut app = app_with(links(&[
        ("Dev", &[("GitHub", "https://github.com")]),
        ("Empty", &[]),
    ]));

    let visibility = app.visibility();
    assert!(visibility.iter().all(|(section, _)| *section));

    for c in "zzz".chars() {
        app.search_push(c);
    }
    assert!(app.visibility().iter().all(|(section, _)| !*section));

    app.search_pop();
    app.search_pop();
    app.search_pop();
    assert!(
        app.visibility().iter().all(|(section, _)| *section),
        "visibility is a pure toggle, fully reversible"
    );
}

#[test]
fn test_entering_edit_mode_clears_the_query() {
    let mut app = app_with(links(&[("Dev", &[("GitHub", "https://github.com")])]));

    app.search_active = true;
    for c in "git".chars() {
        app.search_push(c);
    }
    app.enter_edit_mode();

    assert!(!app.search_active);
    assert!(app.search_query.is_empty());
}

#[test]
fn test_selection_moves_through_visible_links_only() {
    let mut app = app_with(links(&[
        (
            "Dev",
            &[("GitHub", "https://github.com"), ("Docs", "https://docs.rs")],
        ),
        ("News", &[("Reddit", "https://reddit.com")]),
    ]));

    app.select_by(2);
    assert_eq!(app.selected_target().unwrap().name, "Reddit");
    app.select_by(10);
    assert_eq!(
        app.selected_target().unwrap().name,
        "Reddit",
        "clamped at the end"
    );
    app.select_by(-10);
    assert_eq!(app.selected_target().unwrap().name, "GitHub");

    for c in "docs".chars() {
        app.search_push(c);
    }
    assert_eq!(
        app.selected_target().unwrap().name,
        "Docs",
        "selection clamps into the filtered set"
    );
}

#[test]
fn test_settings_commands_clamp_and_persist() {
    let mut app = app_with(links(&[]));

    let request = app.set_columns(9);
    assert_eq!(app.settings.link_columns, 6);
    assert_eq!(request.origin, SaveOrigin::Settings);

    app.set_columns(0);
    assert_eq!(app.settings.link_columns, 1);

    app.set_title("Lab Bench".to_string());
    assert_eq!(app.settings.page_title, "Lab Bench");

    let before = app.settings.open_links_in_new_tab;
    app.toggle_newtab();
    assert_eq!(app.settings.open_links_in_new_tab, !before);
}

#[test]
fn test_notes_editor_round_trip() {
    let mut app = app_with(links(&[]));
    app.notes = NotesDocument {
        content: "remember the milk".to_string(),
    };

    app.enter_notes();
    assert_eq!(app.view, View::Notes);
    assert_eq!(app.notes_text(), "remember the milk");

    let request = app.save_notes();
    assert_eq!(request.origin, SaveOrigin::Notes);
    assert_eq!(app.notes.content, "remember the milk");

    app.exit_notes();
    assert_eq!(app.view, View::Display);
    assert!(app.notes_editor.is_none());
}

#[test]
fn test_background_save_failures_surface_without_reverting() {
    let mut app = app_with(links(&[]));
    app.begin_quick_add("example.com");
    {
        let form = app.quick_add.as_mut().unwrap();
        form.focus = QuickAddField::Target;
        form.focused_input_mut().unwrap().push_str("Misc");
    }
    app.confirm_quick_add().unwrap();

    app.apply_save_outcome(&SaveOutcome {
        origin: SaveOrigin::QuickAdd,
        result: Err(io_failure()),
    });

    assert_eq!(app.links.sections.len(), 1, "the optimistic update stands");
    assert!(app
        .message
        .as_deref()
        .unwrap_or("")
        .contains("Quick-add save failed"));
}
