use crate::workflows::labeling::{CompanyRecord, IndustryLabel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relevance histogram buckets used by the summary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceBand {
    High,
    Upper,
    Lower,
    Low,
}

impl RelevanceBand {
    pub const fn ordered() -> [Self; 4] {
        [Self::High, Self::Upper, Self::Lower, Self::Low]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "80+",
            Self::Upper => "50-79",
            Self::Lower => "20-49",
            Self::Low => "0-19",
        }
    }

    pub const fn for_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Self::High,
            50..=79 => Self::Upper,
            20..=49 => Self::Lower,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub industry: IndustryLabel,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCount {
    pub band: RelevanceBand,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub total: usize,
    pub label_counts: Vec<LabelCount>,
    pub relevance_bands: Vec<BandCount>,
    pub average_relevance: f64,
    pub unclassified: usize,
    pub unclassified_rate: f64,
}

impl CatalogSummary {
    /// Label counts are sorted by count, then by label order.
    pub fn from_records(records: &[CompanyRecord]) -> Self {
        let mut label_counts: Vec<LabelCount> = IndustryLabel::ordered()
            .into_iter()
            .map(|industry| LabelCount {
                industry,
                count: records
                    .iter()
                    .filter(|record| record.industry == industry)
                    .count(),
            })
            .filter(|entry| entry.count > 0)
            .collect();
        label_counts.sort_by(|a, b| b.count.cmp(&a.count));

        let relevance_bands = RelevanceBand::ordered()
            .into_iter()
            .map(|band| BandCount {
                band,
                count: records
                    .iter()
                    .filter(|record| RelevanceBand::for_score(record.relevance_score) == band)
                    .count(),
            })
            .collect();

        let total = records.len();
        let relevance_sum: u64 = records
            .iter()
            .map(|record| u64::from(record.relevance_score))
            .sum();
        let unclassified = records
            .iter()
            .filter(|record| record.industry.is_unclassified())
            .count();

        Self {
            total,
            label_counts,
            relevance_bands,
            average_relevance: ratio(relevance_sum as f64, total),
            unclassified,
            unclassified_rate: ratio(unclassified as f64, total),
        }
    }

    pub fn count_for(&self, industry: IndustryLabel) -> usize {
        self.label_counts
            .iter()
            .find(|entry| entry.industry == industry)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}

fn ratio(numerator: f64, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        numerator / total as f64
    }
}

impl fmt::Display for CatalogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "業界別件数")?;
        for entry in &self.label_counts {
            writeln!(f, "{}: {}", entry.industry.label(), entry.count)?;
        }
        writeln!(f)?;
        writeln!(f, "スコア分布")?;
        for entry in &self.relevance_bands {
            writeln!(f, "{}: {}", entry.band.label(), entry.count)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "件数 {} 平均 {:.1} 未分類 {} ({:.1}%)",
            self.total,
            self.average_relevance,
            self.unclassified,
            self.unclassified_rate * 100.0
        )
    }
}
