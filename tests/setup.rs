// First-run setup against scratch directories.

mod common;

use std::fs;

use common::ScriptedPrompter;
use vkban_cli::config::{BanCatalog, ConfigStore, DurationKind, DATA_FILE_NAME};
use vkban_cli::setup::{ensure_initialized, ensure_pointer_file, seed_document};
use vkban_cli::unban::Term;

#[test]
fn seeding_builds_a_paired_document_without_token() {
    let mut prompter = ScriptedPrompter::new(&["Cats", "100", "spam and flood", "2"]);

    let document = seed_document(&mut prompter).unwrap().unwrap();

    assert_eq!(document.access_token, "");
    assert_eq!(document.groups[0].name, "Cats");
    assert_eq!(document.groups[0].id, "100");
    let BanCatalog::Paired { ban_reasons } = &document.bans else {
        panic!("seeded document should be paired");
    };
    assert_eq!(ban_reasons[0].reason, "spam and flood");
    assert_eq!(ban_reasons[0].duration_title, "Week");
    assert_eq!(ban_reasons[0].duration, 604_800);
    assert!(prompter.printed("> [Duration titles]: 5 == End of the year"));
}

#[test]
fn end_of_year_preset_is_stored_as_its_own_kind() {
    let mut prompter = ScriptedPrompter::new(&["Cats", "100", "flood", "5"]);

    let document = seed_document(&mut prompter).unwrap().unwrap();

    let BanCatalog::Paired { ban_reasons } = &document.bans else {
        panic!("seeded document should be paired");
    };
    assert_eq!(ban_reasons[0].kind, DurationKind::EndOfYear);
    let term = document.catalog().reasons[0].duration.as_ref().map(|d| d.term);
    assert_eq!(term, Some(Term::EndOfYear));
}

#[test]
fn existing_pointer_gets_a_seeded_data_file() {
    let dir = tempfile::tempdir().unwrap();
    let pointer = dir.path().join("path.txt");
    fs::write(&pointer, format!("{}/", dir.path().display())).unwrap();
    let store = ConfigStore::new(pointer);
    let mut prompter = ScriptedPrompter::new(&["Cats", "100", "spam", "1"]);

    assert!(ensure_initialized(&store, &mut prompter).unwrap());

    assert!(dir.path().join(DATA_FILE_NAME).exists());
    let loaded = store.load().unwrap();
    assert_eq!(loaded.groups[0].id, "100");
    assert!(prompter.printed("has been created"));
}

#[test]
fn nothing_is_asked_when_data_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let pointer = dir.path().join("path.txt");
    fs::write(&pointer, format!("{}/", dir.path().display())).unwrap();
    let store = ConfigStore::new(pointer);
    store.save(&common::week_document()).unwrap();
    let mut prompter = ScriptedPrompter::new(&[]);

    assert!(ensure_initialized(&store, &mut prompter).unwrap());
    assert!(prompter.prompts.is_empty());
}

#[test]
fn missing_pointer_file_is_created_empty() {
    let dir = tempfile::tempdir().unwrap();
    let pointer = dir.path().join("path.txt");
    let store = ConfigStore::new(&pointer);
    let mut prompter = ScriptedPrompter::new(&[]);

    ensure_pointer_file(&store, &mut prompter).unwrap();

    assert_eq!(fs::read_to_string(&pointer).unwrap(), "");
    assert!(prompter.printed("has been created"));
    assert!(prompter.prompts.is_empty());
}

#[test]
fn existing_pointer_file_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let pointer = dir.path().join("path.txt");
    fs::write(&pointer, "/srv/ban/").unwrap();
    let store = ConfigStore::new(&pointer);
    let mut prompter = ScriptedPrompter::new(&[]);

    ensure_pointer_file(&store, &mut prompter).unwrap();

    assert_eq!(fs::read_to_string(&pointer).unwrap(), "/srv/ban/");
    assert!(prompter.output.is_empty());
}
