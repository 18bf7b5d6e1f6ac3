use super::domain::{CompanyRecord, IndustryLabel};

const MIN_DESCRIPTION_CHARS: usize = 30;
const MAX_DESCRIPTION_CHARS: usize = 45;
const ELLIPSIS: char = '…';

/// Semicolon-separated backgrounds a recruiter would look for in this industry.
pub fn target_background(industry: IndustryLabel) -> &'static str {
    match industry {
        IndustryLabel::HealthIt => "ITエンジニア;医療現場経験者;データサイエンティスト",
        IndustryLabel::MedicalDeviceMaker => "機械設計;臨床経験者;品質管理",
        IndustryLabel::PharmaBio => "研究職;臨床開発;薬剤師",
        IndustryLabel::CaregivingWelfare => "介護職;看護師;福祉系経験者",
        _ => "医療関連経験者;業界未経験者歓迎",
    }
}

pub fn description_template(industry: IndustryLabel) -> Option<&'static str> {
    let template = match industry {
        IndustryLabel::MedicalDeviceMaker => {
            "医療機器の開発・製造を行い、医療現場で使われる製品を提供しています。"
        }
        IndustryLabel::PharmaBio => {
            "医薬品やバイオ製品の研究開発・製造を行い、治療に用いられる薬を提供しています。"
        }
        IndustryLabel::HealthIt => {
            "医療×ITでシステムやデータサービスを提供し、現場の業務効率化を支援します。"
        }
        IndustryLabel::CaregivingWelfare => {
            "介護・福祉サービスを提供し、高齢者支援や在宅ケアを行っています。"
        }
        IndustryLabel::Distribution => "医薬品や医療機器の流通を担い、医療機関への安定供給を支えます。",
        IndustryLabel::Logistics => "医薬品や医療機器の輸送・保管を行い、物流インフラを提供します。",
        IndustryLabel::Nutrition => "健康食品や栄養製品を展開し、日常の健康づくりを支援します。",
        IndustryLabel::MediaPublishing => "医療分野の情報発信や出版を行い、学びの基盤を提供します。",
        IndustryLabel::EducationTraining => "医療・看護分野の教育や研修サービスを提供しています。",
        IndustryLabel::FitnessWellness
        | IndustryLabel::HygieneInfectionControl
        | IndustryLabel::FacilitiesConstruction
        | IndustryLabel::Unclassified => return None,
    };
    Some(template)
}

/// Short descriptions fall back to the industry template; long ones are cut
/// to 44 characters plus an ellipsis. Lengths count characters, not bytes.
pub fn refine_description(description: &str, industry: IndustryLabel) -> String {
    let trimmed = description.trim();
    let mut refined = trimmed.to_string();

    if trimmed.chars().count() < MIN_DESCRIPTION_CHARS {
        if let Some(template) = description_template(industry) {
            refined = template.to_string();
        }
    }

    if refined.chars().count() > MAX_DESCRIPTION_CHARS {
        let mut cut: String = refined.chars().take(MAX_DESCRIPTION_CHARS - 1).collect();
        cut.push(ELLIPSIS);
        refined = cut;
    }

    refined
}

/// Fills the target background and normalizes the description in place.
pub fn enrich_record(record: &mut CompanyRecord) {
    record.target_background = Some(target_background(record.industry).to_string());
    record.description = refine_description(&record.description, record.industry);
}
