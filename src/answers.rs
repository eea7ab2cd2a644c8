use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CategoryKey, Points};

/// 設問ID → 選択した配点
///
/// 同じ設問への再回答は上書きされ、加算されることはない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    values: BTreeMap<String, Points>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 回答を格納する。以前の回答があれば返す。
    pub fn record(&mut self, question: impl Into<String>, points: Points) -> Option<Points> {
        self.values.insert(question.into(), points)
    }

    pub fn get(&self, question: &str) -> Option<Points> {
        self.values.get(question).copied()
    }

    pub fn is_answered(&self, question: &str) -> bool {
        self.values.contains_key(question)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Points)> {
        self.values.iter().map(|(id, points)| (id.as_str(), *points))
    }

    /// カテゴリ内の回答済み設問数
    pub fn answered_in(&self, catalog: &Catalog, key: CategoryKey) -> usize {
        catalog.category(key).map_or(0, |category| {
            category
                .question_ids()
                .filter(|id| self.is_answered(id))
                .count()
        })
    }

    /// カテゴリの全設問に回答済みか
    pub fn is_complete(&self, catalog: &Catalog, key: CategoryKey) -> bool {
        catalog.category(key).is_some_and(|category| {
            category.question_ids().all(|id| self.is_answered(id))
        })
    }
}
