use chrono::{DateTime, Utc};
use serde::Serialize;

use super::dataset::{CategoryCounts, Dataset, NeighbourhoodEntry, ReportedYear};
use super::mock::{MockEntry, RateFactor};
use super::resolver::EntrySource;
use super::scoring::{score_counts, CountFactor, RiskLevel};

/// Dataset reports rank raw counts; catalog reports carry published rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportFactor {
    Count(CountFactor),
    Rate(RateFactor),
}

impl ReportFactor {
    pub fn category(&self) -> &str {
        match self {
            Self::Count(factor) => &factor.category,
            Self::Rate(factor) => &factor.category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighbourhoodReport {
    pub neighbourhood: String,
    pub data_source: EntrySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<ReportedYear>,
    pub score: u8,
    pub risk_level: RiskLevel,
    pub top_factors: Vec<ReportFactor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<CategoryCounts>,
    pub sources: Vec<String>,
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

/// Scores a dataset entry and attaches the dataset's provenance.
pub fn dataset_report(
    dataset: &Dataset,
    neighbourhood: &str,
    entry: &NeighbourhoodEntry,
    timestamp: DateTime<Utc>,
) -> NeighbourhoodReport {
    let card = score_counts(&entry.counts);
    let year = dataset.reported_year().cloned();
    let summary = incident_summary(card.total, year.as_ref());

    NeighbourhoodReport {
        neighbourhood: neighbourhood.to_string(),
        data_source: EntrySource::Dataset,
        year,
        score: card.score,
        risk_level: card.risk_level,
        top_factors: card
            .top_factors
            .into_iter()
            .map(ReportFactor::Count)
            .collect(),
        counts: Some(entry.counts.clone()),
        sources: dataset.sources_for(entry),
        summary,
        timestamp,
    }
}

/// Copies a catalog entry as-is; no scoring happens on this path.
pub fn mock_report(
    neighbourhood: &str,
    entry: &MockEntry,
    timestamp: DateTime<Utc>,
) -> NeighbourhoodReport {
    NeighbourhoodReport {
        neighbourhood: neighbourhood.to_string(),
        data_source: EntrySource::Mock,
        year: None,
        score: entry.score,
        risk_level: entry.risk_level,
        top_factors: entry
            .top_factors
            .iter()
            .cloned()
            .map(ReportFactor::Rate)
            .collect(),
        counts: None,
        sources: entry.sources.clone(),
        summary: entry.summary.clone(),
        timestamp,
    }
}

pub fn incident_summary(total: u64, year: Option<&ReportedYear>) -> String {
    match year.filter(|year| year.is_meaningful()) {
        Some(year) => format!("Total reported incidents: {total} (year {year})."),
        None => format!("Total reported incidents: {total}."),
    }
}
