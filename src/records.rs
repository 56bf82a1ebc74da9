// Typed records extracted from the raw tables
// Required columns are validated up front so joins never see a missing key

use crate::error::Result;
use crate::table::{cell, RawTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// CATEGORICAL FIELDS
// ============================================================================

/// Gender label as recorded in the characters dataset.
///
/// Matching is exact and case-sensitive; anything that is not one of the
/// three tracked labels is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
    Custom,
    Other(String),
}

impl Gender {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Female" => Gender::Female,
            "Male" => Gender::Male,
            "Custom" => Gender::Custom,
            other => Gender::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::Custom => "Custom",
            Gender::Other(label) => label,
        }
    }
}

/// Relevance marker; `PA` flags a playable / primary lead
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relevance {
    Playable,
    Other(String),
}

impl Relevance {
    pub const PLAYABLE_CODE: &'static str = "PA";

    pub fn from_code(code: &str) -> Self {
        if code == Self::PLAYABLE_CODE {
            Relevance::Playable
        } else {
            Relevance::Other(code.to_string())
        }
    }

    pub fn is_playable(&self) -> bool {
        matches!(self, Relevance::Playable)
    }
}

// ============================================================================
// RECORDS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterRecord {
    pub id: String,
    pub game: String,
    pub gender: Gender,
    pub relevance: Relevance,
}

impl CharacterRecord {
    pub fn new(id: &str, game: &str, gender: &str, relevance: &str) -> Self {
        CharacterRecord {
            id: id.to_string(),
            game: game.to_string(),
            gender: Gender::from_label(gender),
            relevance: Relevance::from_code(relevance),
        }
    }
}

/// A game row after `game_id` has been renamed to `game`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub game: String,
    pub release: String,
}

impl GameRecord {
    pub fn new(game: &str, release: &str) -> Self {
        GameRecord {
            game: game.to_string(),
            release: release.to_string(),
        }
    }
}

/// Sexualization ratings keyed by character id; rating columns pass through
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SexualizationRecord {
    pub id: String,
    pub fields: BTreeMap<String, String>,
}

impl SexualizationRecord {
    pub fn new(id: &str) -> Self {
        SexualizationRecord {
            id: id.to_string(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

pub const CHARACTER_COLUMNS: [&str; 4] = ["id", "game", "gender", "relevance"];
/// Game columns as they appear in the source, before `game_id` is renamed
pub const GAME_COLUMNS: [&str; 2] = ["game_id", "release"];
pub const SEXUALIZATION_COLUMNS: [&str; 1] = ["id"];

/// Check every required column, reporting the first one missing
pub fn validate_columns(table: &RawTable, required: &[&str]) -> Result<()> {
    for column in required {
        table.require_column(column)?;
    }
    Ok(())
}

pub fn characters_from(table: &RawTable) -> Result<Vec<CharacterRecord>> {
    let id = table.require_column("id")?;
    let game = table.require_column("game")?;
    let gender = table.require_column("gender")?;
    let relevance = table.require_column("relevance")?;

    Ok(table
        .rows()
        .map(|row| {
            CharacterRecord::new(
                cell(row, id),
                cell(row, game),
                cell(row, gender),
                cell(row, relevance),
            )
        })
        .collect())
}

/// Expects the table to already carry `game` (renamed from `game_id`)
pub fn games_from(table: &RawTable) -> Result<Vec<GameRecord>> {
    let game = table.require_column("game")?;
    let release = table.require_column("release")?;

    Ok(table
        .rows()
        .map(|row| GameRecord::new(cell(row, game), cell(row, release)))
        .collect())
}

pub fn sexualization_from(table: &RawTable) -> Result<Vec<SexualizationRecord>> {
    let id = table.require_column("id")?;
    let headers = table.headers();

    Ok(table
        .rows()
        .map(|row| {
            let fields = headers
                .iter()
                .enumerate()
                .filter(|(idx, _)| *idx != id)
                .map(|(idx, name)| (name.clone(), cell(row, idx).to_string()))
                .collect();

            SexualizationRecord {
                id: cell(row, id).to_string(),
                fields,
            }
        })
        .collect())
}
