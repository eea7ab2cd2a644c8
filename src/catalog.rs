use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub static CATALOG: Lazy<Catalog> =
    Lazy::new(|| load_embedded(include_str!("../resources/ux_health.json")));

// 埋め込みマスタは読み込み時に形まで検証する。壊れていればビルド不良なので panic。
fn load_embedded(json: &str) -> Catalog {
    let catalog: Catalog = serde_json::from_str(json).expect("embedded catalog is valid JSON");
    if let Err(e) = catalog.validate() {
        panic!("embedded catalog is malformed: {e}");
    }
    catalog
}

/// 1カテゴリあたりの設問数
pub const QUESTIONS_PER_CATEGORY: usize = 4;
/// 1設問あたりの選択肢数
pub const OPTIONS_PER_QUESTION: usize = 3;
/// カテゴリ満点 (4設問 × 3点)
pub const MAX_CATEGORY_SCORE: u8 = 12;
/// 総合満点
pub const MAX_TOTAL_SCORE: u8 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKey {
    Mobile,
    Forms,
    Navigation,
    Accessibility,
}

impl CategoryKey {
    /// 宣言順。順位付けの同点処理もこの順に従う。
    pub const ALL: [CategoryKey; 4] = [
        CategoryKey::Mobile,
        CategoryKey::Forms,
        CategoryKey::Navigation,
        CategoryKey::Accessibility,
    ];

    pub fn index(self) -> usize {
        match self {
            CategoryKey::Mobile => 0,
            CategoryKey::Forms => 1,
            CategoryKey::Navigation => 2,
            CategoryKey::Accessibility => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKey::Mobile => "mobile",
            CategoryKey::Forms => "forms",
            CategoryKey::Navigation => "navigation",
            CategoryKey::Accessibility => "accessibility",
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CategoryKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// 選択肢の配点。0, 1, 3 以外は認めない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Points(u8);

impl Points {
    pub const NONE: Points = Points(0);
    pub const PARTIAL: Points = Points(1);
    pub const FULL: Points = Points(3);

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Points {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 | 1 | 3 => Ok(Points(value)),
            _ => Err(Error::IllegalAnswer(value)),
        }
    }
}

impl From<Points> for u8 {
    fn from(points: Points) -> Self {
        points.0
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionOption {
    pub value: Points,
    pub label: String,
    /// "3 points" などの補足表示
    pub detail: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<QuestionOption>,
}

impl Question {
    pub fn option(&self, value: Points) -> Option<&QuestionOption> {
        self.options.iter().find(|option| option.value == value)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub key: CategoryKey,
    pub title: String,
    /// レポート表示用のラベル (絵文字付き)
    pub label: String,
    pub questions: Vec<Question>,
    pub action_plan: Vec<String>,
}

impl Category {
    pub fn question_ids(&self) -> impl Iterator<Item = &str> {
        self.questions.iter().map(|question| question.id.as_str())
    }
}

/// UXヘルスチェック16設問のマスタ表現
#[derive(Debug, Deserialize)]
pub struct Catalog {
    pub categories: Vec<Category>,
}

impl Catalog {
    /// カテゴリを宣言順に取得する
    pub fn category(&self, key: CategoryKey) -> Option<&Category> {
        self.categories.iter().find(|category| category.key == key)
    }

    /// 設問番号を指定して設問を取得する
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions().find(|question| question.id == id)
    }

    /// 設問が属するカテゴリ
    pub fn category_of(&self, id: &str) -> Option<CategoryKey> {
        self.categories
            .iter()
            .find(|category| category.question_ids().any(|qid| qid == id))
            .map(|category| category.key)
    }

    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.categories
            .iter()
            .flat_map(|category| category.questions.iter())
    }

    /// マスタの形を検証する。
    ///
    /// 4カテゴリが宣言順に並び、各カテゴリが4設問・4手順を持ち、
    /// 各設問が3選択肢を持ち、設問IDが重複しないこと。
    pub fn validate(&self) -> Result<()> {
        let keys: Vec<CategoryKey> = self.categories.iter().map(|c| c.key).collect();
        if keys != CategoryKey::ALL {
            return Err(Error::InvalidCatalog(format!(
                "categories must be {:?}, found {:?}",
                CategoryKey::ALL,
                keys
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for category in &self.categories {
            if category.questions.len() != QUESTIONS_PER_CATEGORY {
                return Err(Error::InvalidCatalog(format!(
                    "{} has {} questions",
                    category.key,
                    category.questions.len()
                )));
            }
            if category.action_plan.len() != QUESTIONS_PER_CATEGORY {
                return Err(Error::InvalidCatalog(format!(
                    "{} has {} action steps",
                    category.key,
                    category.action_plan.len()
                )));
            }
            for question in &category.questions {
                if !seen.insert(question.id.as_str()) {
                    return Err(Error::InvalidCatalog(format!(
                        "duplicate question id {}",
                        question.id
                    )));
                }
                if question.options.len() != OPTIONS_PER_QUESTION {
                    return Err(Error::InvalidCatalog(format!(
                        "{} has {} options",
                        question.id,
                        question.options.len()
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_embedded_catalog_is_valid() {
        assert!(CATALOG.validate().is_ok());
        assert_eq!(CATALOG.questions().count(), 16);
    }

    #[test]
    #[should_panic(expected = "embedded catalog is malformed")]
    fn test_load_embedded_rejects_wrong_shape() {
        let json = r#"{"categories":[{"key":"mobile","title":"Mobile","label":"Mobile",
            "questions":[],"action_plan":[]}]}"#;
        load_embedded(json);
    }

    #[test]
    fn test_question() {
        assert_eq!(Some("q1"), CATALOG.question("q1").map(|q| q.id.as_str()));
        assert_eq!(Some("q16"), CATALOG.question("q16").map(|q| q.id.as_str()));
        assert!(CATALOG.question("q17").is_none());
    }

    #[test]
    fn test_category_of() {
        assert_eq!(CATALOG.category_of("q4"), Some(CategoryKey::Mobile));
        assert_eq!(CATALOG.category_of("q5"), Some(CategoryKey::Forms));
        assert_eq!(CATALOG.category_of("q12"), Some(CategoryKey::Navigation));
        assert_eq!(CATALOG.category_of("q13"), Some(CategoryKey::Accessibility));
        assert_eq!(CATALOG.category_of("q0"), None);
    }

    #[test]
    fn test_points() {
        assert_eq!(Points::try_from(0).map(u8::from).ok(), Some(0));
        assert_eq!(Points::try_from(1).map(u8::from).ok(), Some(1));
        assert_eq!(Points::try_from(3).map(u8::from).ok(), Some(3));
        assert!(Points::try_from(2).is_err());
        assert!(Points::try_from(4).is_err());
    }

    #[test]
    fn test_options_are_ordered_high_to_low() {
        for question in CATALOG.questions() {
            let values: Vec<u8> = question.options.iter().map(|o| o.value.value()).collect();
            assert_eq!(values, vec![3, 1, 0], "{}", question.id);
        }
    }

    #[test]
    fn test_category_key_from_str() {
        assert_eq!("forms".parse::<CategoryKey>().ok(), Some(CategoryKey::Forms));
        assert!("Forms".parse::<CategoryKey>().is_err());
    }

    #[test]
    fn test_validate_rejects_short_category() {
        let mut catalog: Catalog =
            serde_json::from_str(include_str!("../resources/ux_health.json")).unwrap();
        catalog.categories[2].questions.pop();
        assert!(matches!(catalog.validate(), Err(Error::InvalidCatalog(_))));
    }
}
