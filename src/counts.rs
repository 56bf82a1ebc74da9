// Lead counts per year by gender category
// Female/male years are gap-filled over [min, max]; custom years are
// outer-merged afterwards and may extend the table without gap-filling

use crate::error::{PipelineError, Result};
use crate::join::MergedRecord;
use crate::records::Gender;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// CATEGORIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeadCategory {
    Female,
    Male,
    Custom,
}

impl LeadCategory {
    pub const ALL: [LeadCategory; 3] = [LeadCategory::Female, LeadCategory::Male, LeadCategory::Custom];

    /// Category of a merged row, or None if it is not a playable lead of a
    /// tracked gender. A row maps to at most one category.
    pub fn classify(record: &MergedRecord) -> Option<Self> {
        if !record.character.relevance.is_playable() {
            return None;
        }

        match record.character.gender {
            Gender::Female => Some(LeadCategory::Female),
            Gender::Male => Some(LeadCategory::Male),
            Gender::Custom => Some(LeadCategory::Custom),
            Gender::Other(_) => None,
        }
    }

    /// Output column holding this category's count
    pub fn column_name(&self) -> &'static str {
        match self {
            LeadCategory::Female => "female_lead_count",
            LeadCategory::Male => "male_lead_count",
            LeadCategory::Custom => "custom_lead_count",
        }
    }

    pub fn from_column_name(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.column_name() == column)
    }
}

/// Group-by-count of one category's rows per year
pub fn count_by_year(records: &[MergedRecord], category: LeadCategory) -> BTreeMap<i32, u64> {
    let mut counts = BTreeMap::new();
    for record in records {
        if LeadCategory::classify(record) == Some(category) {
            *counts.entry(record.year).or_insert(0) += 1;
        }
    }
    counts
}

// ============================================================================
// YEARLY TABLE
// ============================================================================

pub const YEAR_COLUMN: &str = "year";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadCountRow {
    pub year: i32,
    pub female_lead_count: u64,
    pub male_lead_count: u64,
    pub custom_lead_count: u64,
}

impl LeadCountRow {
    fn empty(year: i32) -> Self {
        LeadCountRow {
            year,
            female_lead_count: 0,
            male_lead_count: 0,
            custom_lead_count: 0,
        }
    }

    pub fn count(&self, category: LeadCategory) -> u64 {
        match category {
            LeadCategory::Female => self.female_lead_count,
            LeadCategory::Male => self.male_lead_count,
            LeadCategory::Custom => self.custom_lead_count,
        }
    }
}

/// YearlyLeadCounts - final table, one row per year, sorted ascending
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlyLeadCounts {
    rows: Vec<LeadCountRow>,
}

impl YearlyLeadCounts {
    /// Build the table from merged rows.
    ///
    /// 1. Outer-merge female and male per-year counts.
    /// 2. Gap-fill every year in [min, max] of that union with zeros.
    /// 3. Outer-merge custom counts; custom-only years outside the range
    ///    become extra rows, with no gap-filling between them and the range.
    pub fn from_merged(records: &[MergedRecord]) -> Result<Self> {
        let female = count_by_year(records, LeadCategory::Female);
        let male = count_by_year(records, LeadCategory::Male);
        let custom = count_by_year(records, LeadCategory::Custom);

        Self::from_counts(&female, &male, &custom)
    }

    pub fn from_counts(
        female: &BTreeMap<i32, u64>,
        male: &BTreeMap<i32, u64>,
        custom: &BTreeMap<i32, u64>,
    ) -> Result<Self> {
        let lead_years: BTreeSet<i32> = female.keys().chain(male.keys()).copied().collect();

        let (min_year, max_year) = match (lead_years.first(), lead_years.last()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => return Err(PipelineError::EmptyResult),
        };

        let mut table: BTreeMap<i32, LeadCountRow> = (min_year..=max_year)
            .map(|year| {
                let mut row = LeadCountRow::empty(year);
                row.female_lead_count = female.get(&year).copied().unwrap_or(0);
                row.male_lead_count = male.get(&year).copied().unwrap_or(0);
                (year, row)
            })
            .collect();

        for (&year, &count) in custom {
            table
                .entry(year)
                .or_insert_with(|| LeadCountRow::empty(year))
                .custom_lead_count = count;
        }

        let outside = table.len() as i64 - (max_year as i64 - min_year as i64 + 1);
        if outside > 0 {
            tracing::debug!(min_year, max_year, extra_rows = outside, "custom lead years extend the range");
        }

        Ok(YearlyLeadCounts {
            rows: table.into_values().collect(),
        })
    }

    pub fn rows(&self) -> &[LeadCountRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(|r| r.year).collect()
    }

    pub fn row(&self, year: i32) -> Option<&LeadCountRow> {
        self.rows
            .binary_search_by_key(&year, |r| r.year)
            .ok()
            .map(|idx| &self.rows[idx])
    }

    /// Values of a count column by name
    pub fn series(&self, column: &str) -> Option<Vec<u64>> {
        let category = LeadCategory::from_column_name(column)?;
        Some(self.rows.iter().map(|r| r.count(category)).collect())
    }

    /// Largest count across all three series (0 for an empty table)
    pub fn max_count(&self) -> u64 {
        self.rows
            .iter()
            .flat_map(|r| LeadCategory::ALL.map(|c| r.count(c)))
            .max()
            .unwrap_or(0)
    }

    /// Render as CSV with header `year,female_lead_count,male_lead_count,custom_lead_count`
    pub fn to_csv(&self) -> Result<String> {
        let csv_err = |source| PipelineError::Csv {
            source_name: "yearly_lead_counts".to_string(),
            source,
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &self.rows {
            writer.serialize(row).map_err(csv_err)?;
        }
        if self.rows.is_empty() {
            writer
                .write_record([
                    YEAR_COLUMN,
                    LeadCategory::Female.column_name(),
                    LeadCategory::Male.column_name(),
                    LeadCategory::Custom.column_name(),
                ])
                .map_err(csv_err)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| csv_err(csv::Error::from(e.into_error())))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// SHA-256 of the CSV rendering; identical inputs give identical fingerprints
    pub fn fingerprint(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(self.to_csv()?.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}
