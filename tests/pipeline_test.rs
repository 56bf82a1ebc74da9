//! End-to-end tests that write the four CSV sources to a temp directory and
//! run the pipeline through `Config`, the same way the binaries do.

use lead_counts::config::{CHARACTERS_FILE, DEVELOPERS_FILE, GAMES_FILE, SEXUALIZATION_FILE};
use lead_counts::{ChartSpec, Config, Figure, LeadCountPipeline, PipelineError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =============================================================================
// Fixtures
// =============================================================================

const CHARACTERS: &str = "\
Id,Name,Game,Gender,Age Range,Relevance
1,Ana,G1,Female,Adult,PA
2,Bea,G1,Female,Adult,PA
3,Cal,G2,Male,Adult,PA
4,Dee,G2,Female,Adult,SA
5,Eli,G3,Custom,Adult,PA
6,Fay,G4,Male,Adult,PA
7,Gus,G_UNKNOWN,Male,Adult,PA
8,Hal,G4,Non-binary,Adult,PA
9,Ivy,G4,Female,Adult,PA
";

const GAMES: &str = "\
Game ID,Title,Release,Publisher
G1,First,Jan-15,P1
G2,Second,Mar-15,P2
G3,Third,Jun-10,P3
G4,Fourth,Nov-12,P1
G5,Unplayed,not a date,P9
";

// character 9 has no ratings row
const SEXUALIZATION: &str = "\
Id,Sexualized Clothing,Trophy,Damsel In Distress
1,0,0,0
2,1,0,0
3,0,0,0
4,0,1,0
5,0,0,0
6,0,0,0
7,0,0,0
8,0,0,0
";

const DEVELOPERS: &str = "\
Year,Female,Male,Transgender,Other
2014,22%,75%,1%,2%
2015,22%,75%,1%,2%
";

fn write_sources(dir: &Path, characters: &str, games: &str, sexualization: &str) {
    fs::write(dir.join(CHARACTERS_FILE), characters).unwrap();
    fs::write(dir.join(GAMES_FILE), games).unwrap();
    fs::write(dir.join(SEXUALIZATION_FILE), sexualization).unwrap();
    fs::write(dir.join(DEVELOPERS_FILE), DEVELOPERS).unwrap();
}

fn fixture_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_sources(dir.path(), CHARACTERS, GAMES, SEXUALIZATION);
    dir
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_full_run_from_files() {
    let dir = fixture_dir();
    let output = LeadCountPipeline::run(&Config::with_data_dir(dir.path())).unwrap();

    // female/male years span 2012..=2015; custom 2010 extends without gap-fill
    assert_eq!(output.counts.years(), vec![2010, 2012, 2013, 2014, 2015]);

    let csv = output.counts.to_csv().unwrap();
    assert_eq!(
        csv,
        "year,female_lead_count,male_lead_count,custom_lead_count\n\
         2010,0,0,1\n\
         2012,0,1,0\n\
         2013,0,0,0\n\
         2014,0,0,0\n\
         2015,2,1,0\n"
    );

    assert_eq!(output.stats.characters, 9);
    assert_eq!(output.stats.developers, 2);
    assert_eq!(output.stats.dropped_by_game_join, 1);
    assert_eq!(output.stats.dropped_by_sexualization_join, 1);
    assert_eq!(output.stats.merged, 7);
}

#[test]
fn test_repeated_runs_have_identical_fingerprints() {
    let dir = fixture_dir();
    let config = Config::with_data_dir(dir.path());

    let first = LeadCountPipeline::run(&config).unwrap();
    let second = LeadCountPipeline::run(&config).unwrap();

    assert_eq!(
        first.counts.fingerprint().unwrap(),
        second.counts.fingerprint().unwrap()
    );
}

#[test]
fn test_every_count_is_present_and_categories_are_disjoint() {
    let dir = fixture_dir();
    let output = LeadCountPipeline::run(&Config::with_data_dir(dir.path())).unwrap();

    let total: u64 = output
        .counts
        .rows()
        .iter()
        .map(|r| r.female_lead_count + r.male_lead_count + r.custom_lead_count)
        .sum();

    // Ana, Bea, Cal, Eli, Fay: SA, unknown game, unrated and non-binary rows excluded
    assert_eq!(total, 5);
}

#[test]
fn test_figure_from_run() {
    let dir = fixture_dir();
    let output = LeadCountPipeline::run(&Config::with_data_dir(dir.path())).unwrap();

    let figure = Figure::line(&output.counts, &ChartSpec::lead_counts()).unwrap();
    assert_eq!(figure.y_max(), 3);
    assert_eq!(figure.data[0].x, vec![2010, 2012, 2013, 2014, 2015]);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = fixture_dir();
    fs::remove_file(dir.path().join(DEVELOPERS_FILE)).unwrap();

    let err = LeadCountPipeline::run(&Config::with_data_dir(dir.path())).unwrap_err();
    assert!(matches!(err, PipelineError::Io { .. }));
}

#[test]
fn test_missing_gender_column_is_schema_error() {
    let dir = TempDir::new().unwrap();
    write_sources(dir.path(), "Id,Game,Relevance\n1,G1,PA\n", GAMES, SEXUALIZATION);

    let err = LeadCountPipeline::run(&Config::with_data_dir(dir.path())).unwrap_err();
    match err {
        PipelineError::Schema { source_name, column, .. } => {
            assert_eq!(source_name, "characters");
            assert_eq!(column, "gender");
        }
        other => panic!("expected schema error, got {:?}", other),
    }
}

#[test]
fn test_wrong_release_format_on_joined_game_aborts() {
    let dir = TempDir::new().unwrap();
    let games = "Game ID,Release\nG1,2015-01\nG2,Mar-15\nG3,Jun-10\nG4,Nov-12\n";
    write_sources(dir.path(), CHARACTERS, games, SEXUALIZATION);

    let err = LeadCountPipeline::run(&Config::with_data_dir(dir.path())).unwrap_err();
    match err {
        PipelineError::Parse { value, .. } => assert_eq!(value, "2015-01"),
        other => panic!("expected parse error, got {:?}", other),
    }
}
