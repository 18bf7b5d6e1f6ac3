use crate::workflows::diagnosis::ThinkingType;
use crate::workflows::labeling::{CompanyId, CompanyRecord, FitScores, IndustryLabel};
use serde::{Deserialize, Serialize};

/// Number of companies returned by the recommendation helpers.
pub const RECOMMENDATION_COUNT: usize = 3;

const REPLY_HEADER: &str =
    "あなたのアンケートを基に関連領域で一般的に知られている企業、これはほんの一部です。";
const REPLY_FOOTER: &str = "これはほんの世間のごく一部です。今後を決めるのはあなた次第";
const SURVEY_HEADER: &str =
    "以下は、アンケート結果に基づく「ある程度マッチしている企業」の例です。参考にしてください。";

/// Read-only view over a scored company table.
#[derive(Debug, Clone, Default)]
pub struct CompanyDirectory {
    records: Vec<CompanyRecord>,
}

impl CompanyDirectory {
    pub fn new(records: Vec<CompanyRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: CompanyId) -> Option<&CompanyRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Highest relevance first; equal scores keep table order.
    pub fn top_by_relevance(&self, limit: usize) -> Vec<&CompanyRecord> {
        top_by_key(self.records.iter(), limit, |record| {
            i32::from(record.relevance_score)
        })
    }

    pub fn screen(&self, screen: &CandidateScreen) -> Vec<&CompanyRecord> {
        screen.apply(&self.records)
    }

    pub fn pick_for_thinking_type(&self, thinking_type: ThinkingType) -> Vec<&CompanyRecord> {
        top_by_key(self.records.iter(), RECOMMENDATION_COUNT, |record| {
            i32::from(fit_for_thinking_type(record, thinking_type))
        })
    }

    pub fn rank_by_composite(&self) -> Vec<&CompanyRecord> {
        top_by_key(self.records.iter(), RECOMMENDATION_COUNT, composite_score)
    }
}

/// Threshold filter used to shortlist recommendation candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateScreen {
    pub min_relevance: u8,
    pub min_hybrid_fit: u8,
    pub max_risk_level: u8,
    pub limit: usize,
}

impl Default for CandidateScreen {
    fn default() -> Self {
        Self {
            min_relevance: 60,
            min_hybrid_fit: 40,
            max_risk_level: 70,
            limit: 20,
        }
    }
}

impl CandidateScreen {
    pub fn admits(&self, record: &CompanyRecord) -> bool {
        let fit = record.fit_or_default();
        record.relevance_score >= self.min_relevance
            && fit.hybrid_fit >= self.min_hybrid_fit
            && fit.risk_level <= self.max_risk_level
    }

    pub fn apply<'a>(&self, records: &'a [CompanyRecord]) -> Vec<&'a CompanyRecord> {
        top_by_key(
            records.iter().filter(|record| self.admits(record)),
            self.limit,
            |record| i32::from(record.relevance_score),
        )
    }
}

/// The score each thinking type ranks companies by.
pub fn fit_for_thinking_type(record: &CompanyRecord, thinking_type: ThinkingType) -> u8 {
    let FitScores {
        side_job_fit,
        career_shift_fit,
        hybrid_fit,
        ..
    } = record.fit_or_default();

    match thinking_type {
        ThinkingType::SideJob => side_job_fit,
        ThinkingType::CareerShift => career_shift_fit,
        ThinkingType::Hybrid => hybrid_fit,
        ThinkingType::Undifferentiated => record.relevance_score,
    }
}

/// relevance × 2 + hybrid − risk.
pub fn composite_score(record: &CompanyRecord) -> i32 {
    let fit = record.fit_or_default();
    i32::from(record.relevance_score) * 2 + i32::from(fit.hybrid_fit) - i32::from(fit.risk_level)
}

fn top_by_key<'a, I, F>(records: I, limit: usize, key: F) -> Vec<&'a CompanyRecord>
where
    I: Iterator<Item = &'a CompanyRecord>,
    F: Fn(&CompanyRecord) -> i32,
{
    let mut ranked: Vec<&CompanyRecord> = records.collect();
    ranked.sort_by_key(|record| std::cmp::Reverse(key(record)));
    ranked.truncate(limit);
    ranked
}

/// Chat reply listing recommended companies.
pub fn render_recommendations(records: &[&CompanyRecord]) -> String {
    let mut reply = String::from(REPLY_HEADER);
    reply.push('\n');
    for (index, record) in records.iter().enumerate() {
        reply.push_str(&format!(
            "\n{}. {}\n　{}\n",
            index + 1,
            record.name,
            record.description
        ));
    }
    reply.push('\n');
    reply.push_str(REPLY_FOOTER);
    reply
}

/// Survey callback reply: overview and reason per company.
pub fn render_survey_reply(records: &[&CompanyRecord]) -> String {
    let mut lines = vec![format!("{SURVEY_HEADER}\n")];
    for (index, record) in records.iter().enumerate() {
        let fit = record.fit_or_default();
        lines.push(format!("{}) {}", index + 1, record.name));
        lines.push(format!("企業概要: {}", record.description));
        lines.push(format!(
            "提案理由: 医療関連性 {}、ハイブリッド適合 {}。\n",
            record.relevance_score, fit.hybrid_fit
        ));
    }
    lines.push(REPLY_FOOTER.to_string());
    lines.join("\n")
}

/// Three-line pitch: name, reason with scores, and the industry strength.
pub fn render_pitch(record: &CompanyRecord) -> String {
    let fit = record.fit_or_default();
    let strength = match record.industry {
        IndustryLabel::HealthIt => "医療×IT領域での成長性とデータ利活用の機会が豊富です。",
        IndustryLabel::MedicalDeviceMaker => "製品開発・設計領域での専門性を活かせます。",
        IndustryLabel::CaregivingWelfare => "実務経験を活かした現場寄りの役割が見込めます。",
        IndustryLabel::PharmaBio => "研究・臨床開発に関わる専門性が評価されます。",
        _ => "医療領域での汎用的な経験が活かせます。",
    };

    format!(
        "{}\n理由: 医療関連性 {} / ハイブリッド適合 {}、業界: {}。\n強み: {}\n次の一手: 企業の採用ページを確認し、募集ポジションが合致するかを確認してください（リスク指標: {}）。",
        record.name,
        record.relevance_score,
        fit.hybrid_fit,
        record.industry.label(),
        strength,
        fit.risk_level
    )
}
