use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use tracing::warn;

const NEIGHBOURHOOD_KEYS: [&str; 2] = ["neighbourhoods", "neighborhoods"];

/// Incident counts for one neighbourhood, kept in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts(Vec<CategoryCount>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

impl CategoryCounts {
    pub fn new(entries: Vec<CategoryCount>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryCount> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0
            .iter()
            .fold(0u64, |total, entry| total.saturating_add(entry.count))
    }

    fn from_value(neighbourhood: &str, value: Option<&Value>) -> Self {
        let map = match value {
            Some(Value::Object(map)) => map,
            None | Some(Value::Null) => return Self::default(),
            Some(other) => {
                warn!(neighbourhood, counts = %other, "counts is not an object, ignoring");
                return Self::default();
            }
        };

        let entries = map
            .iter()
            .filter_map(|(category, count)| match incident_count(count) {
                Some(count) => Some(CategoryCount {
                    category: category.clone(),
                    count,
                }),
                None => {
                    warn!(
                        neighbourhood,
                        category = %category,
                        count = %count,
                        "skipping unusable incident count"
                    );
                    None
                }
            })
            .collect();

        Self(entries)
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(entries: I) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(category, count)| CategoryCount {
                    category: category.into(),
                    count,
                })
                .collect(),
        )
    }
}

impl<S: Into<String>, const N: usize> From<[(S, u64); N]> for CategoryCounts {
    fn from(entries: [(S, u64); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.category, &entry.count)?;
        }
        map.end()
    }
}

/// `timeframe.reported_year` as found in the document: publishers use both
/// numbers and strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportedYear {
    Number(i64),
    Text(String),
}

impl ReportedYear {
    fn from_value(value: Option<&Value>) -> Option<Self> {
        let value = value?;
        let year = match value {
            Value::Null => return None,
            Value::String(text) => return Some(Self::Text(text.clone())),
            number @ Value::Number(_) => number.as_i64().or_else(|| {
                whole_number(number)
                    .filter(|year| *year >= i64::MIN as f64 && *year <= i64::MAX as f64)
                    .map(|year| year as i64)
            }),
            _ => None,
        };

        if year.is_none() {
            warn!(reported_year = %value, "ignoring unusable reported year");
        }
        year.map(Self::Number)
    }

    /// Zero and empty strings carry no year for summary purposes.
    pub fn is_meaningful(&self) -> bool {
        match self {
            Self::Number(year) => *year != 0,
            Self::Text(year) => !year.is_empty(),
        }
    }
}

impl fmt::Display for ReportedYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(year) => write!(f, "{year}"),
            Self::Text(year) => f.write_str(year),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NeighbourhoodEntry {
    pub counts: CategoryCounts,
    pub source_links: Vec<String>,
}

impl NeighbourhoodEntry {
    fn from_value(name: &str, value: &Value) -> Self {
        Self {
            counts: CategoryCounts::from_value(name, value.get("counts")),
            source_links: string_list(value.get("source_links")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighbourhoodRecord {
    pub name: String,
    pub entry: NeighbourhoodEntry,
}

/// Normalized view of the external incident document. Every optional field
/// has already been defaulted, so consumers never inspect raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    neighbourhoods: Vec<NeighbourhoodRecord>,
    reported_year: Option<ReportedYear>,
    source_links: Vec<String>,
}

impl Dataset {
    pub fn new(
        neighbourhoods: Vec<NeighbourhoodRecord>,
        reported_year: Option<ReportedYear>,
        source_links: Vec<String>,
    ) -> Self {
        Self {
            neighbourhoods,
            reported_year,
            source_links,
        }
    }

    /// Builds a dataset from a parsed document. Either spelling of the
    /// neighbourhood table is accepted; the first non-empty object wins.
    pub fn from_document(document: &Map<String, Value>) -> Self {
        let neighbourhoods = NEIGHBOURHOOD_KEYS
            .iter()
            .filter_map(|key| document.get(*key).and_then(Value::as_object))
            .find(|table| !table.is_empty())
            .map(|table| {
                table
                    .iter()
                    .map(|(name, entry)| NeighbourhoodRecord {
                        name: name.clone(),
                        entry: NeighbourhoodEntry::from_value(name, entry),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let reported_year = ReportedYear::from_value(
            document
                .get("timeframe")
                .and_then(|timeframe| timeframe.get("reported_year")),
        );

        let source_links = string_list(
            document
                .get("metadata")
                .and_then(|metadata| metadata.get("source_links")),
        );

        Self {
            neighbourhoods,
            reported_year,
            source_links,
        }
    }

    pub fn neighbourhoods(&self) -> &[NeighbourhoodRecord] {
        &self.neighbourhoods
    }

    pub fn reported_year(&self) -> Option<&ReportedYear> {
        self.reported_year.as_ref()
    }

    pub fn source_links(&self) -> &[String] {
        &self.source_links
    }

    pub fn entry(&self, name: &str) -> Option<&NeighbourhoodEntry> {
        self.neighbourhoods
            .iter()
            .find(|record| record.name == name)
            .map(|record| &record.entry)
    }

    /// Entry-level links take precedence over the dataset-wide defaults.
    pub fn sources_for(&self, entry: &NeighbourhoodEntry) -> Vec<String> {
        if entry.source_links.is_empty() {
            self.source_links.clone()
        } else {
            entry.source_links.clone()
        }
    }
}

/// A dataset can serve requests only when it lists at least one neighbourhood.
/// Both listing and reporting decide between dataset and catalog here.
pub fn usable(dataset: Option<&Dataset>) -> Option<&Dataset> {
    dataset.filter(|dataset| !dataset.neighbourhoods.is_empty())
}

/// Non-negative whole numbers, including ones written as `300.0`.
fn incident_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        whole_number(value)
            .filter(|count| *count >= 0.0 && *count <= u64::MAX as f64)
            .map(|count| count as u64)
    })
}

fn whole_number(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .filter(|number| number.is_finite() && number.fract() == 0.0)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
