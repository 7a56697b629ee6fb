// First-run setup: make sure the pointer file and the data document exist,
// asking the operator for the bare minimum when the document is missing.

use std::fs;

use tracing::info;

use crate::config::{
    BanCatalog, ConfigDocument, ConfigStore, DurationKind, Group, PairedReason,
    LEGACY_END_OF_YEAR_TITLE,
};
use crate::error::{ConfigError, WorkflowError};
use crate::ui::{parse_selection, Prompter, Selection};

/// Duration presets offered when seeding a new document.
pub const DURATION_PRESETS: [(&str, u64, DurationKind); 5] = [
    ("Day", 86_400, DurationKind::Fixed),
    ("Week", 604_800, DurationKind::Fixed),
    ("Month", 2_629_743, DurationKind::Fixed),
    ("Year", 31_556_926, DurationKind::Fixed),
    (LEGACY_END_OF_YEAR_TITLE, 0, DurationKind::EndOfYear),
];

/// Create whatever is missing. Returns `false` if the operator quit while
/// seeding the document.
pub fn ensure_initialized<P: Prompter>(
    store: &ConfigStore,
    prompter: &mut P,
) -> Result<bool, WorkflowError> {
    ensure_pointer_file(store, prompter)?;

    let data_file = store.data_file()?;
    if data_file.exists() {
        return Ok(true);
    }

    let Some(document) = seed_document(prompter)? else {
        return Ok(false);
    };
    store.save(&document)?;
    info!(path = %data_file.display(), "created data document");
    prompter.say(&format!(
        "COMPUTER [Initialization]: File \"{}\" has been created.",
        data_file.display()
    ));
    Ok(true)
}

/// Create an empty pointer file if there is none, which places the data
/// document in the working directory.
pub fn ensure_pointer_file<P: Prompter>(
    store: &ConfigStore,
    prompter: &mut P,
) -> Result<(), ConfigError> {
    let pointer = store.pointer_file();
    if pointer.exists() {
        return Ok(());
    }
    fs::write(pointer, "").map_err(|source| ConfigError::Write {
        path: pointer.to_path_buf(),
        source,
    })?;
    info!(path = %pointer.display(), "created pointer file");
    prompter.say(&format!(
        "COMPUTER [Initialization]: File \"{}\" has been created.",
        pointer.display()
    ));
    Ok(())
}

/// Ask for one community and one reason with its duration. The token is
/// left empty; the first lookup will ask for it.
pub fn seed_document<P: Prompter>(prompter: &mut P) -> Result<Option<ConfigDocument>, WorkflowError> {
    prompter.say("COMPUTER [Initialization]: Data of groups not found. Need new data.");
    let name = prompter.ask("> [Group name]")?;
    let id = prompter.ask("> [Group ID]")?;

    prompter.say("COMPUTER [Initialization]: Data of bans not found. Need new data.");
    let reason = prompter.ask_line("> [Reason]")?;

    for (i, (title, _, _)) in DURATION_PRESETS.iter().enumerate() {
        prompter.say(&format!("> [Duration titles]: {} == {title}", i + 1));
    }
    let answer = prompter.ask("> [Duration title]")?;
    let Selection::Index(d) = parse_selection(&answer, DURATION_PRESETS.len())? else {
        return Ok(None);
    };
    let (duration_title, duration, kind) = DURATION_PRESETS[d];

    Ok(Some(ConfigDocument {
        access_token: String::new(),
        groups: vec![Group { name, id }],
        bans: BanCatalog::Paired {
            ban_reasons: vec![PairedReason {
                reason,
                duration_title: duration_title.to_string(),
                duration,
                kind,
            }],
        },
    }))
}
