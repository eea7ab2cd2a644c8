//! 結果レポートの組み立てと表示。
//!
//! レポートは回答から毎回組み立て直す純粋関数の結果で、保持はしない。

use std::fmt::{self, Write};

use serde::Serialize;

use crate::answers::AnswerSet;
use crate::catalog::{Catalog, CategoryKey, MAX_CATEGORY_SCORE, MAX_TOTAL_SCORE};
use crate::config::ScoreDisplay;
use crate::scoring::{
    format_percentage, CategoryScores, Severity, Tier, PRIORITY_LABELS, QUICK_WIN_THRESHOLD,
};

pub const QUICK_WIN_TEXT: &str = "Pick your #1 priority area and implement one fix this week. \
     Most of these changes take under 2 hours but can improve conversion rates by 10-30%.";

pub const EMAIL_ACKNOWLEDGEMENT: &str = "✅ Thanks! Check your email in a few minutes. \
     The complete UX Recovery Guide is on its way.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCategory {
    pub key: CategoryKey,
    pub label: String,
    pub score: u8,
    pub max: u8,
    pub percentage: String,
    pub priority: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionPlan {
    pub category: CategoryKey,
    pub title: String,
    pub steps: Vec<String>,
    pub quick_win: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub total: u8,
    pub max: u8,
    pub percentage: String,
    pub tier: Tier,
    pub severity: Severity,
    pub scores: CategoryScores,
    pub ranking: Vec<RankedCategory>,
    pub plan: ActionPlan,
}

impl Report {
    pub fn build(catalog: &Catalog, answers: &AnswerSet) -> Self {
        Self::from_scores(catalog, CategoryScores::from_answers(catalog, answers))
    }

    pub fn from_scores(catalog: &Catalog, scores: CategoryScores) -> Self {
        let total = scores.total();
        let tier = Tier::from_total(total);
        let ranking = scores
            .ranked()
            .into_iter()
            .zip(PRIORITY_LABELS)
            .map(|((key, score), priority)| RankedCategory {
                key,
                label: catalog
                    .category(key)
                    .map_or_else(|| key.to_string(), |c| c.label.clone()),
                score,
                max: MAX_CATEGORY_SCORE,
                percentage: format_percentage(score.into(), MAX_CATEGORY_SCORE.into()),
                priority,
            })
            .collect();
        Self {
            total,
            max: MAX_TOTAL_SCORE,
            percentage: format_percentage(total.into(), MAX_TOTAL_SCORE.into()),
            tier,
            severity: tier.severity(),
            scores,
            ranking,
            plan: ActionPlan::select(catalog, &scores),
        }
    }

    /// 合計点の表示 (素点か百分率か)
    pub fn total_text(&self, display: ScoreDisplay) -> String {
        match display {
            ScoreDisplay::Raw => format!("{}/{}", self.total, self.max),
            ScoreDisplay::Percentage => self.percentage.clone(),
        }
    }

    pub fn render(&self, display: ScoreDisplay) -> String {
        let mut out = String::new();
        // String への書き込みは失敗しない
        let _ = self.write_text(&mut out, display);
        out
    }

    fn write_text(&self, out: &mut String, display: ScoreDisplay) -> fmt::Result {
        writeln!(out, "Your UX Health Score: {}", self.total_text(display))?;
        writeln!(out)?;
        writeln!(
            out,
            "[{:?}] {} ({}/{})",
            self.severity,
            self.tier.heading(),
            self.total,
            self.max
        )?;
        writeln!(out, "{}", self.tier.narrative())?;
        writeln!(out)?;
        writeln!(out, "Your Priority Areas (Ranked by Need):")?;
        for (rank, entry) in self.ranking.iter().enumerate() {
            writeln!(
                out,
                "  {}. {:<30} {:>2}/{} {:>6}  {}",
                rank + 1,
                entry.label,
                entry.score,
                entry.max,
                entry.percentage,
                entry.priority
            )?;
        }
        writeln!(out)?;
        writeln!(out, "🎯 Start Here: {}", self.plan.title)?;
        writeln!(out, "Focus on your lowest-scoring area first for maximum impact:")?;
        for step in &self.plan.steps {
            writeln!(out, "  - {step}")?;
        }
        if self.plan.quick_win {
            writeln!(out)?;
            writeln!(out, "💡 Quick Win Strategy: {QUICK_WIN_TEXT}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(ScoreDisplay::Raw))
    }
}

impl ActionPlan {
    /// 最低点カテゴリの改善手順。合計30点未満ならクイックウィン付き。
    pub fn select(catalog: &Catalog, scores: &CategoryScores) -> Self {
        let key = scores.lowest();
        let (title, steps) = catalog.category(key).map_or_else(
            || (key.to_string(), Vec::new()),
            |c| (c.title.clone(), c.action_plan.clone()),
        );
        Self {
            category: key,
            title,
            steps,
            quick_win: scores.total() < QUICK_WIN_THRESHOLD,
        }
    }
}
