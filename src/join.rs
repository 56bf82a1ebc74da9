// Explicit inner joins over typed records
// Unmatched rows on either side are dropped silently

use crate::error::{PipelineError, Result};
use crate::records::{CharacterRecord, GameRecord, SexualizationRecord};
use crate::release::parse_release;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Hash join keeping left-side order.
///
/// Emits one output per matching (left, right) pair, so a key repeated on
/// both sides multiplies like a relational join. Right-side duplicates are
/// emitted in their source order.
pub fn inner_join<'a, L, R, K, O>(
    left: &'a [L],
    right: &'a [R],
    left_key: impl Fn(&'a L) -> K,
    right_key: impl Fn(&'a R) -> K,
    mut combine: impl FnMut(&'a L, &'a R) -> O,
) -> Vec<O>
where
    K: Eq + Hash,
{
    let mut index: HashMap<K, Vec<&'a R>> = HashMap::new();
    for row in right {
        index.entry(right_key(row)).or_default().push(row);
    }

    let mut out = Vec::new();
    for row in left {
        if let Some(matches) = index.get(&left_key(row)) {
            for &other in matches {
                out.push(combine(row, other));
            }
        }
    }
    out
}

/// One character joined with its game and ratings, with the release year attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRecord {
    pub character: CharacterRecord,
    pub release: NaiveDate,
    pub year: i32,
    pub ratings: BTreeMap<String, String>,
}

/// Row counts seen while merging, for logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub characters: usize,
    pub after_games: usize,
    pub after_sexualization: usize,
}

/// Characters ⋈ games on `game`, then ⋈ sexualization on `id`, then parse
/// every merged row's release date.
///
/// Fails on the first release value that is not `Mon-YY`; the reported row
/// is 1-based within the merged result.
pub fn merge_records(
    characters: &[CharacterRecord],
    games: &[GameRecord],
    sexualization: &[SexualizationRecord],
) -> Result<(Vec<MergedRecord>, JoinStats)> {
    let with_games = inner_join(
        characters,
        games,
        |c| c.game.as_str(),
        |g| g.game.as_str(),
        |c, g| (c, g),
    );

    let with_ratings = inner_join(
        &with_games,
        sexualization,
        |(c, _)| c.id.as_str(),
        |s| s.id.as_str(),
        |(c, g), s| (*c, *g, s),
    );

    let stats = JoinStats {
        characters: characters.len(),
        after_games: with_games.len(),
        after_sexualization: with_ratings.len(),
    };

    tracing::debug!(
        characters = stats.characters,
        after_games = stats.after_games,
        after_sexualization = stats.after_sexualization,
        "joined characters with games and sexualization"
    );

    let mut merged = Vec::with_capacity(with_ratings.len());
    for (row, (character, game, ratings)) in with_ratings.into_iter().enumerate() {
        let release = parse_release(&game.release).ok_or_else(|| PipelineError::Parse {
            row: row + 1,
            value: game.release.clone(),
        })?;

        merged.push(MergedRecord {
            character: character.clone(),
            release,
            year: release.year(),
            ratings: ratings.fields.clone(),
        });
    }

    Ok((merged, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn characters() -> Vec<CharacterRecord> {
        vec![
            CharacterRecord::new("1", "G1", "Female", "PA"),
            CharacterRecord::new("2", "G2", "Male", "PA"),
            CharacterRecord::new("3", "G_MISSING", "Female", "PA"),
            CharacterRecord::new("4", "G1", "Custom", "PA"),
        ]
    }

    #[test]
    fn test_inner_join_keeps_left_order_and_multiplies_duplicates() {
        let left = vec![("a", 1), ("b", 2), ("c", 3)];
        let right = vec![("b", 'x'), ("a", 'y'), ("b", 'z')];

        let joined = inner_join(&left, &right, |l| l.0, |r| r.0, |l, r| (l.1, r.1));
        assert_eq!(joined, vec![(1, 'y'), (2, 'x'), (2, 'z')]);
    }

    #[test]
    fn test_merge_attaches_year_and_drops_unmatched() {
        let games = vec![GameRecord::new("G1", "Jan-15"), GameRecord::new("G2", "Mar-12")];
        // character 4 has no sexualization row
        let ratings = vec![
            SexualizationRecord::new("1").with_field("trophy", "1"),
            SexualizationRecord::new("2"),
            SexualizationRecord::new("3"),
        ];

        let (merged, stats) = merge_records(&characters(), &games, &ratings).unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].character.id, "1");
        assert_eq!(merged[0].year, 2015);
        assert_eq!(merged[0].ratings.get("trophy").map(String::as_str), Some("1"));
        assert_eq!(merged[1].character.id, "2");
        assert_eq!(merged[1].year, 2012);

        assert_eq!(stats.characters, 4);
        assert_eq!(stats.after_games, 3);
        assert_eq!(stats.after_sexualization, 2);
    }

    #[test]
    fn test_merge_each_matched_character_appears_once() {
        let games = vec![GameRecord::new("G1", "Jan-15"), GameRecord::new("G2", "Jan-16")];
        let ratings: Vec<_> = ["1", "2", "3", "4"]
            .iter()
            .map(|id| SexualizationRecord::new(id))
            .collect();

        let (merged, _) = merge_records(&characters(), &games, &ratings).unwrap();
        let ids: Vec<&str> = merged.iter().map(|m| m.character.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "4"]);
    }

    #[test]
    fn test_bad_release_on_merged_row_is_parse_error() {
        let games = vec![GameRecord::new("G1", "Jan-15"), GameRecord::new("G2", "2015-01")];
        let ratings = vec![SexualizationRecord::new("1"), SexualizationRecord::new("2")];

        match merge_records(&characters(), &games, &ratings).unwrap_err() {
            PipelineError::Parse { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "2015-01");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_release_on_unjoined_game_is_ignored() {
        let games = vec![GameRecord::new("G1", "Jan-15"), GameRecord::new("G9", "garbage")];
        let ratings = vec![SexualizationRecord::new("1")];

        let (merged, _) = merge_records(&characters(), &games, &ratings).unwrap();
        assert_eq!(merged.len(), 1);
    }
}
