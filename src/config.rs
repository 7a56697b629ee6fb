// Configuration store.
//
// A plain-text pointer file holds a directory prefix; the data document lives
// at `<prefix>data.json`. The document comes in two shapes:
//
// - paired: every ban reason carries its own duration;
// - separated: reasons are plain strings, durations are a list of their own.
//
// The store reads and writes the document exactly as found. `Catalog` is the
// normalised view the workflow works against.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::unban::{BanDuration, Term};

/// Name of the data document inside the pointed-to directory.
pub const DATA_FILE_NAME: &str = "data.json";

/// Duration title that legacy paired documents used for end-of-year bans.
pub const LEGACY_END_OF_YEAR_TITLE: &str = "End of the year";

/// A community the operator can moderate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub id: String,
}

/// Explicit duration kind stored next to the seconds value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationKind {
    #[default]
    Fixed,
    EndOfYear,
}

impl DurationKind {
    fn is_fixed(&self) -> bool {
        *self == DurationKind::Fixed
    }
}

/// Reason with its own duration (paired shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedReason {
    pub reason: String,
    pub duration_title: String,
    pub duration: u64,
    #[serde(default, skip_serializing_if = "DurationKind::is_fixed")]
    pub kind: DurationKind,
}

/// Stand-alone duration (separated shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationEntry {
    pub title: String,
    pub duration: u64,
    #[serde(default, skip_serializing_if = "DurationKind::is_fixed")]
    pub kind: DurationKind,
}

/// The two document shapes for reasons and durations. A document without
/// `ban_durations` is paired; missing or `null` reasons read as none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BanCatalog {
    Separated {
        #[serde(default, deserialize_with = "null_as_empty")]
        ban_reasons: Vec<String>,
        ban_durations: Vec<DurationEntry>,
    },
    Paired {
        #[serde(default, deserialize_with = "null_as_empty")]
        ban_reasons: Vec<PairedReason>,
    },
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// The persisted data document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(flatten)]
    pub bans: BanCatalog,
}

/// A selectable ban reason. `duration` is set when the reason decides the
/// duration itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reason {
    pub text: String,
    pub duration: Option<BanDuration>,
}

/// Normalised, read-only view of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub groups: Vec<Group>,
    pub reasons: Vec<Reason>,
    pub durations: Vec<BanDuration>,
}

fn term_of(seconds: u64, kind: DurationKind) -> Term {
    match kind {
        DurationKind::EndOfYear => Term::EndOfYear,
        DurationKind::Fixed => Term::from_seconds(seconds),
    }
}

impl ConfigDocument {
    /// Copy of this document carrying a new access token.
    pub fn with_access_token(&self, access_token: impl Into<String>) -> Self {
        ConfigDocument {
            access_token: access_token.into(),
            ..self.clone()
        }
    }

    pub fn catalog(&self) -> Catalog {
        let (reasons, durations) = match &self.bans {
            BanCatalog::Paired { ban_reasons } => {
                let reasons = ban_reasons
                    .iter()
                    .map(|r| {
                        let kind = if r.kind.is_fixed()
                            && r.duration_title == LEGACY_END_OF_YEAR_TITLE
                        {
                            DurationKind::EndOfYear
                        } else {
                            r.kind
                        };
                        Reason {
                            text: r.reason.clone(),
                            duration: Some(BanDuration {
                                title: r.duration_title.clone(),
                                term: term_of(r.duration, kind),
                            }),
                        }
                    })
                    .collect();
                (reasons, Vec::new())
            }
            BanCatalog::Separated {
                ban_reasons,
                ban_durations,
            } => {
                let reasons = ban_reasons
                    .iter()
                    .map(|text| Reason {
                        text: text.clone(),
                        duration: None,
                    })
                    .collect();
                let durations = ban_durations
                    .iter()
                    .map(|d| BanDuration {
                        title: d.title.clone(),
                        term: term_of(d.duration, d.kind),
                    })
                    .collect();
                (reasons, durations)
            }
        };

        Catalog {
            groups: self.groups.clone(),
            reasons,
            durations,
        }
    }
}

/// Reads and writes the data document through the pointer file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    pointer_file: PathBuf,
}

impl ConfigStore {
    pub fn new(pointer_file: impl Into<PathBuf>) -> Self {
        ConfigStore {
            pointer_file: pointer_file.into(),
        }
    }

    pub fn pointer_file(&self) -> &Path {
        &self.pointer_file
    }

    /// Location of the data document. The pointer contents are used as a
    /// raw prefix, so they must already end with a separator.
    pub fn data_file(&self) -> Result<PathBuf, ConfigError> {
        let prefix = fs::read_to_string(&self.pointer_file).map_err(|source| ConfigError::Read {
            path: self.pointer_file.clone(),
            source,
        })?;
        Ok(PathBuf::from(format!("{prefix}{DATA_FILE_NAME}")))
    }

    pub fn load(&self) -> Result<ConfigDocument, ConfigError> {
        let path = self.data_file()?;
        debug!(path = %path.display(), "loading configuration");
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Rewrite the whole document.
    pub fn save(&self, document: &ConfigDocument) -> Result<(), ConfigError> {
        let path = self.data_file()?;
        debug!(path = %path.display(), "saving configuration");
        let raw = serde_json::to_vec_pretty(document).map_err(ConfigError::Serialize)?;
        fs::write(&path, raw).map_err(|source| ConfigError::Write { path, source })
    }
}
