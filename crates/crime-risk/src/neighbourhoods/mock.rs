use serde::Serialize;

use super::scoring::RiskLevel;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateFactor {
    pub category: String,
    pub rate_per_1000: f64,
}

/// Pre-baked report served when no dataset covers a neighbourhood.
#[derive(Debug, Clone, PartialEq)]
pub struct MockEntry {
    pub score: u8,
    pub risk_level: RiskLevel,
    pub top_factors: Vec<RateFactor>,
    pub summary: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockNeighbourhood {
    pub name: String,
    pub entry: MockEntry,
}

/// Built-in fallback catalog. Built once at startup and shared read-only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockCatalog {
    neighbourhoods: Vec<MockNeighbourhood>,
}

impl MockCatalog {
    pub fn new(neighbourhoods: Vec<MockNeighbourhood>) -> Self {
        Self { neighbourhoods }
    }

    /// The two Ottawa neighbourhoods the service ships with.
    pub fn ottawa() -> Self {
        Self::new(vec![
            MockNeighbourhood {
                name: "Centretown".to_string(),
                entry: MockEntry {
                    score: 72,
                    risk_level: RiskLevel::Medium,
                    top_factors: vec![
                        rate("Theft", 14.2),
                        rate("Break & Enter", 6.1),
                        rate("Mischief", 9.4),
                    ],
                    summary: "Most elevated categories are Theft and Mischief compared to Ottawa average."
                        .to_string(),
                    sources: vec!["Ottawa Police Service".to_string()],
                },
            },
            MockNeighbourhood {
                name: "Kanata".to_string(),
                entry: MockEntry {
                    score: 86,
                    risk_level: RiskLevel::Low,
                    top_factors: vec![
                        rate("Theft", 6.0),
                        rate("Break & Enter", 2.1),
                        rate("Assault", 1.8),
                    ],
                    summary: "Overall lower incident rates compared to Ottawa average.".to_string(),
                    sources: vec!["Ottawa Police Service".to_string()],
                },
            },
        ])
    }

    pub fn neighbourhoods(&self) -> &[MockNeighbourhood] {
        &self.neighbourhoods
    }

    pub fn entry(&self, name: &str) -> Option<&MockEntry> {
        self.neighbourhoods
            .iter()
            .find(|neighbourhood| neighbourhood.name == name)
            .map(|neighbourhood| &neighbourhood.entry)
    }
}

fn rate(category: &str, rate_per_1000: f64) -> RateFactor {
    RateFactor {
        category: category.to_string(),
        rate_per_1000,
    }
}
