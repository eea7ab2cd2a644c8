use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::answers::AnswerSet;
use crate::catalog::{Catalog, CategoryKey};

/// カテゴリ別得点。添字は `CategoryKey::index()`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryScores([u8; 4]);

/// `{"mobile": 0, "forms": 3, ...}` の形で宣言順に出す
impl Serialize for CategoryScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CategoryKey::ALL.len()))?;
        for (key, score) in self.iter() {
            map.serialize_entry(&key, &score)?;
        }
        map.end()
    }
}

impl CategoryScores {
    pub fn new(mobile: u8, forms: u8, navigation: u8, accessibility: u8) -> Self {
        Self([mobile, forms, navigation, accessibility])
    }

    /// 回答から毎回計算し直す。未回答は0点。
    pub fn from_answers(catalog: &Catalog, answers: &AnswerSet) -> Self {
        let mut scores = [0u8; 4];
        for key in CategoryKey::ALL {
            scores[key.index()] = category_score(catalog, answers, key);
        }
        Self(scores)
    }

    pub fn get(&self, key: CategoryKey) -> u8 {
        self.0[key.index()]
    }

    pub fn total(&self) -> u8 {
        self.0.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoryKey, u8)> + '_ {
        CategoryKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    /// 得点の昇順 (最も要改善なものが先頭)。同点は宣言順のまま。
    pub fn ranked(&self) -> Vec<(CategoryKey, u8)> {
        let mut ranked: Vec<(CategoryKey, u8)> = self.iter().collect();
        ranked.sort_by_key(|&(_, score)| score);
        ranked
    }

    /// 得点が最も低いカテゴリ。同点なら宣言順で先のもの。
    pub fn lowest(&self) -> CategoryKey {
        self.iter()
            .fold(None, |lowest: Option<(CategoryKey, u8)>, (key, score)| {
                match lowest {
                    Some((_, min)) if min <= score => lowest,
                    _ => Some((key, score)),
                }
            })
            .map_or(CategoryKey::Mobile, |(key, _)| key)
    }
}

pub fn category_score(catalog: &Catalog, answers: &AnswerSet, key: CategoryKey) -> u8 {
    catalog.category(key).map_or(0, |category| {
        category
            .question_ids()
            .filter_map(|id| answers.get(id))
            .map(|points| points.value())
            .sum()
    })
}

pub fn total_score(catalog: &Catalog, answers: &AnswerSet) -> u8 {
    CategoryScores::from_answers(catalog, answers).total()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Healthy,
    ModerateIssues,
    SignificantProblems,
    Emergency,
}

impl Tier {
    /// 高い閾値から順に判定し、最初に一致したものを採用する。下限は含む。
    pub fn from_total(total: u8) -> Self {
        match total {
            40.. => Tier::Healthy,
            30.. => Tier::ModerateIssues,
            20.. => Tier::SignificantProblems,
            _ => Tier::Emergency,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Healthy => "Healthy",
            Tier::ModerateIssues => "Moderate Issues",
            Tier::SignificantProblems => "Significant Problems",
            Tier::Emergency => "Emergency",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Tier::Healthy => "🎉 Healthy UX",
            Tier::ModerateIssues => "⚠️ Moderate Issues",
            Tier::SignificantProblems => "🚨 Significant Problems",
            Tier::Emergency => "🆘 UX Emergency",
        }
    }

    pub fn narrative(self) -> &'static str {
        match self {
            Tier::Healthy => {
                "Your UX is in good shape! Focus on fine-tuning and monitoring performance \
                 metrics. Consider conducting user testing to identify subtle improvements \
                 and maintain your competitive edge."
            }
            Tier::ModerateIssues => {
                "You have some problems that are likely costing you conversions. Address your \
                 lowest-scoring areas first. These improvements typically show results within \
                 2-4 weeks and can boost conversion rates by 10-25%."
            }
            Tier::SignificantProblems => {
                "UX issues are probably costing you substantial revenue. Prioritize the quick \
                 wins below. Most can be implemented within a week and show immediate impact \
                 on user satisfaction and business metrics."
            }
            Tier::Emergency => {
                "Your UX problems are likely costing you 30-50% of potential conversions. Start \
                 with mobile experience immediately. This alone could improve conversions by \
                 15-25% within the first month."
            }
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Tier::Healthy => Severity::Success,
            Tier::ModerateIssues | Tier::SignificantProblems => Severity::Warning,
            Tier::Emergency => Severity::Danger,
        }
    }
}

/// 順位ごとの優先度ラベル。得点の閾値ではなく順位だけで決まる。
pub const PRIORITY_LABELS: [&str; 4] = [
    "Immediate attention needed",
    "Address within 30 days",
    "Tackle after first two improve",
    "Maintain current performance",
];

/// 合計点がこれ未満ならクイックウィンを添える
pub const QUICK_WIN_THRESHOLD: u8 = 30;

/// 百分率の表示。小数第1位に丸め、整数になれば小数点なし。
pub fn format_percentage(numerator: u32, denominator: u32) -> String {
    if denominator == 0 {
        return "0%".to_string();
    }
    let tenths = (f64::from(numerator) * 1000.0 / f64::from(denominator)).round() as u64;
    if tenths % 10 == 0 {
        format!("{}%", tenths / 10)
    } else {
        format!("{}.{}%", tenths / 10, tenths % 10)
    }
}
