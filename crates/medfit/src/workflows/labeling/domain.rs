use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Closed set of industries a company can be labeled with.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum IndustryLabel {
    #[serde(rename = "medical-device-maker", alias = "医療機器メーカー")]
    MedicalDeviceMaker,
    #[serde(rename = "pharma-bio", alias = "製薬・バイオ")]
    PharmaBio,
    #[serde(rename = "health-IT", alias = "医療IT・医療データ")]
    HealthIt,
    #[serde(rename = "caregiving-welfare", alias = "介護・福祉")]
    CaregivingWelfare,
    #[serde(rename = "distribution", alias = "医療卸・流通")]
    Distribution,
    #[serde(rename = "logistics", alias = "医療物流")]
    Logistics,
    #[serde(rename = "nutrition", alias = "ヘルスケア食品・栄養")]
    Nutrition,
    #[serde(rename = "media-publishing", alias = "医療メディア・出版")]
    MediaPublishing,
    #[serde(rename = "education-training", alias = "教育・研修")]
    EducationTraining,
    #[serde(rename = "fitness-wellness", alias = "フィットネス・健康サービス")]
    FitnessWellness,
    #[serde(rename = "hygiene-infection-control", alias = "衛生・感染対策")]
    HygieneInfectionControl,
    #[serde(rename = "facilities-construction", alias = "医療施設・建設")]
    FacilitiesConstruction,
    #[default]
    #[serde(rename = "unclassified", alias = "その他医療関連")]
    Unclassified,
}

impl IndustryLabel {
    pub const fn ordered() -> [Self; 13] {
        [
            Self::MedicalDeviceMaker,
            Self::PharmaBio,
            Self::HealthIt,
            Self::CaregivingWelfare,
            Self::Distribution,
            Self::Logistics,
            Self::Nutrition,
            Self::MediaPublishing,
            Self::EducationTraining,
            Self::FitnessWellness,
            Self::HygieneInfectionControl,
            Self::FacilitiesConstruction,
            Self::Unclassified,
        ]
    }

    /// Stable machine-readable identifier.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::MedicalDeviceMaker => "medical-device-maker",
            Self::PharmaBio => "pharma-bio",
            Self::HealthIt => "health-IT",
            Self::CaregivingWelfare => "caregiving-welfare",
            Self::Distribution => "distribution",
            Self::Logistics => "logistics",
            Self::Nutrition => "nutrition",
            Self::MediaPublishing => "media-publishing",
            Self::EducationTraining => "education-training",
            Self::FitnessWellness => "fitness-wellness",
            Self::HygieneInfectionControl => "hygiene-infection-control",
            Self::FacilitiesConstruction => "facilities-construction",
            Self::Unclassified => "unclassified",
        }
    }

    /// Display name used in the company tables.
    pub const fn label(self) -> &'static str {
        match self {
            Self::MedicalDeviceMaker => "医療機器メーカー",
            Self::PharmaBio => "製薬・バイオ",
            Self::HealthIt => "医療IT・医療データ",
            Self::CaregivingWelfare => "介護・福祉",
            Self::Distribution => "医療卸・流通",
            Self::Logistics => "医療物流",
            Self::Nutrition => "ヘルスケア食品・栄養",
            Self::MediaPublishing => "医療メディア・出版",
            Self::EducationTraining => "教育・研修",
            Self::FitnessWellness => "フィットネス・健康サービス",
            Self::HygieneInfectionControl => "衛生・感染対策",
            Self::FacilitiesConstruction => "医療施設・建設",
            Self::Unclassified => "その他医療関連",
        }
    }

    /// Accepts either the slug or the display name. Blank values and the
    /// legacy catch-all names resolve to `Unclassified`.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "その他" {
            return Some(Self::Unclassified);
        }

        Self::ordered().into_iter().find(|label| {
            label.slug().eq_ignore_ascii_case(trimmed) || label.label() == trimmed
        })
    }

    pub const fn is_unclassified(self) -> bool {
        matches!(self, Self::Unclassified)
    }
}

impl fmt::Display for IndustryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub u64);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derived suitability metrics computed from the relevance score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitScores {
    pub side_job_fit: u8,
    pub career_shift_fit: u8,
    pub hybrid_fit: u8,
    pub learning_growth: u8,
    pub risk_level: u8,
}

/// One company row flowing through classification and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub id: CompanyId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub raw_keywords: Vec<String>,
    #[serde(default)]
    pub raw_domains: Vec<String>,
    #[serde(default)]
    pub industry: IndustryLabel,
    #[serde(default)]
    pub relevance_score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<FitScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_background: Option<String>,
}

impl CompanyRecord {
    pub fn new(id: u64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: CompanyId(id),
            name: name.into(),
            description: description.into(),
            raw_keywords: Vec::new(),
            raw_domains: Vec::new(),
            industry: IndustryLabel::Unclassified,
            relevance_score: 0,
            fit: None,
            target_background: None,
        }
    }

    /// Name, description, keywords and domains joined and lowercased.
    pub fn classification_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(
            2 + self.raw_keywords.len() + self.raw_domains.len(),
        );
        parts.push(&self.name);
        parts.push(&self.description);
        parts.extend(self.raw_keywords.iter().map(String::as_str));
        parts.extend(self.raw_domains.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }

    /// Fit scores, or all zeros when the record has not been scored.
    pub fn fit_or_default(&self) -> FitScores {
        self.fit.unwrap_or_default()
    }
}

/// A forced label for one company, taken from the editable override table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub company_name: String,
    pub industry: IndustryLabel,
}

/// Caller-supplied id → label map that takes precedence over computed labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManualOverrides {
    entries: BTreeMap<CompanyId, OverrideEntry>,
}

impl ManualOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        id: CompanyId,
        company_name: impl Into<String>,
        industry: IndustryLabel,
    ) -> Option<OverrideEntry> {
        self.entries.insert(
            id,
            OverrideEntry {
                company_name: company_name.into(),
                industry,
            },
        )
    }

    pub fn get(&self, id: CompanyId) -> Option<IndustryLabel> {
        self.entries.get(&id).map(|entry| entry.industry)
    }

    pub fn entry(&self, id: CompanyId) -> Option<&OverrideEntry> {
        self.entries.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CompanyId, &OverrideEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(CompanyId, IndustryLabel)> for ManualOverrides {
    fn from_iter<T: IntoIterator<Item = (CompanyId, IndustryLabel)>>(iter: T) -> Self {
        let mut overrides = Self::new();
        for (id, industry) in iter {
            overrides.insert(id, String::new(), industry);
        }
        overrides
    }
}
