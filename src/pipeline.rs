// Lead-Count Pipeline
// load -> normalize -> validate -> rename -> join -> parse -> count -> gap-fill

use crate::config::Config;
use crate::counts::YearlyLeadCounts;
use crate::error::Result;
use crate::join::merge_records;
use crate::records::{
    characters_from, games_from, sexualization_from, validate_columns, CHARACTER_COLUMNS,
    GAME_COLUMNS, SEXUALIZATION_COLUMNS,
};
use crate::table::RawTable;
use serde::Serialize;
use std::io::Read;

/// The four raw inputs, read fully into memory
#[derive(Debug, Clone)]
pub struct Sources {
    pub characters: RawTable,
    pub games: RawTable,
    pub sexualization: RawTable,
    pub developers: RawTable,
}

impl Sources {
    pub fn load(config: &Config) -> Result<Self> {
        Ok(Sources {
            characters: RawTable::load("characters", &config.characters_path)?,
            games: RawTable::load("games", &config.games_path)?,
            sexualization: RawTable::load("sexualization", &config.sexualization_path)?,
            developers: RawTable::load("developers", &config.developers_path)?,
        })
    }

    pub fn from_readers<C: Read, G: Read, S: Read, D: Read>(
        characters: C,
        games: G,
        sexualization: S,
        developers: D,
    ) -> Result<Self> {
        Ok(Sources {
            characters: RawTable::from_reader("characters", characters)?,
            games: RawTable::from_reader("games", games)?,
            sexualization: RawTable::from_reader("sexualization", sexualization)?,
            developers: RawTable::from_reader("developers", developers)?,
        })
    }

    /// Every required column across all sources, checked before any join
    pub fn validate(&self) -> Result<()> {
        validate_columns(&self.characters, &CHARACTER_COLUMNS)?;
        validate_columns(&self.games, &GAME_COLUMNS)?;
        validate_columns(&self.sexualization, &SEXUALIZATION_COLUMNS)?;
        Ok(())
    }
}

/// Row counts observed during a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub characters: usize,
    pub games: usize,
    pub sexualization: usize,
    pub developers: usize,
    pub merged: usize,
    pub dropped_by_game_join: usize,
    pub dropped_by_sexualization_join: usize,
    pub years: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub counts: YearlyLeadCounts,
    pub stats: PipelineStats,
}

pub struct LeadCountPipeline;

impl LeadCountPipeline {
    /// Load the configured files and run every step
    pub fn run(config: &Config) -> Result<PipelineOutput> {
        tracing::info!(
            characters = %config.characters_path.display(),
            games = %config.games_path.display(),
            "loading sources"
        );
        let sources = Sources::load(config)?;
        Self::run_sources(sources)
    }

    pub fn run_from_readers<C: Read, G: Read, S: Read, D: Read>(
        characters: C,
        games: G,
        sexualization: S,
        developers: D,
    ) -> Result<PipelineOutput> {
        let sources = Sources::from_readers(characters, games, sexualization, developers)?;
        Self::run_sources(sources)
    }

    pub fn run_sources(mut sources: Sources) -> Result<PipelineOutput> {
        sources.validate()?;
        sources.games.rename_column("game_id", "game")?;

        let characters = characters_from(&sources.characters)?;
        let games = games_from(&sources.games)?;
        let sexualization = sexualization_from(&sources.sexualization)?;

        let (merged, join) = merge_records(&characters, &games, &sexualization)?;
        let counts = YearlyLeadCounts::from_merged(&merged)?;

        let stats = PipelineStats {
            characters: characters.len(),
            games: games.len(),
            sexualization: sexualization.len(),
            developers: sources.developers.len(),
            merged: merged.len(),
            dropped_by_game_join: join.characters.saturating_sub(join.after_games),
            dropped_by_sexualization_join: join.after_games.saturating_sub(join.after_sexualization),
            years: counts.len(),
        };

        tracing::info!(
            merged = stats.merged,
            dropped_by_game_join = stats.dropped_by_game_join,
            dropped_by_sexualization_join = stats.dropped_by_sexualization_join,
            years = stats.years,
            "lead counts computed"
        );

        Ok(PipelineOutput { counts, stats })
    }
}
