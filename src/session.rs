//! クイズ1回分の状態を持つコントローラ。
//!
//! 回答セットとページ状態はこの構造体だけが所有する。表示側は `view()` で
//! 現在の画面を受け取り、操作は `handle()` に `Event` を渡す。

use crate::answers::AnswerSet;
use crate::catalog::{Catalog, CategoryKey, Points, CATALOG};
use crate::error::{Error, Result};
use crate::navigation::{Navigator, Page, Progress};
use crate::report::Report;
use crate::store::{self, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ChooseOption {
        category: CategoryKey,
        question: String,
        value: u8,
    },
    NextPage,
    PrevPage,
    NextQuestion,
    PrevQuestion,
    Restart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// 範囲外、または未回答で次へ進めなかった
    Stayed,
    Moved(Page),
    /// 結果ページに入った
    Finished(Report),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub label: String,
    pub detail: String,
    pub value: u8,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub category: CategoryKey,
    pub category_title: String,
    pub question_id: String,
    pub index: usize,
    pub count: usize,
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    /// 次ページへ進めるか (カテゴリ内の全設問に回答済み)
    pub next_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Welcome,
    Question(QuestionView),
    Results(Report),
    /// マスタ不整合で描画できない枠
    Empty,
}

pub struct Session<S> {
    catalog: &'static Catalog,
    answers: AnswerSet,
    nav: Navigator,
    store: S,
}

impl<S: KeyValueStore> Session<S> {
    /// 保存済みの回答を読み込んで開始する
    pub fn new(store: S) -> Self {
        Self::with_catalog(&CATALOG, store)
    }

    pub fn with_catalog(catalog: &'static Catalog, store: S) -> Self {
        let answers = store::load_answers(&store, catalog);
        Self {
            catalog,
            answers,
            nav: Navigator::new(),
            store,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn page(&self) -> Page {
        self.nav.page()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn progress(&self) -> Progress {
        self.nav.progress()
    }

    pub fn handle(&mut self, event: Event) -> Result<Transition> {
        match event {
            Event::ChooseOption {
                category,
                question,
                value,
            } => {
                self.choose(category, &question, value)?;
                Ok(Transition::Stayed)
            }
            Event::NextPage => Ok(self.next_page()),
            Event::PrevPage => Ok(self.prev_page()),
            Event::NextQuestion => Ok(self.move_question(true)),
            Event::PrevQuestion => Ok(self.move_question(false)),
            Event::Restart => {
                self.restart()?;
                Ok(Transition::Moved(self.page()))
            }
        }
    }

    /// 回答を記録して保存する。
    ///
    /// 保存に失敗しても記録した回答はメモリ上に残る。
    pub fn choose(&mut self, category: CategoryKey, question: &str, value: u8) -> Result<()> {
        if self.catalog.category_of(question) != Some(category) {
            return Err(Error::UnknownQuestion(question.to_string()));
        }
        let points = Points::try_from(value)?;
        let option_exists = self
            .catalog
            .question(question)
            .is_some_and(|q| q.option(points).is_some());
        if !option_exists {
            return Err(Error::NoSuchOption {
                question: question.to_string(),
                value,
            });
        }

        let previous = self.answers.record(question, points);
        tracing::debug!(
            %category,
            question,
            value,
            previous = previous.map(u8::from),
            "answer recorded"
        );
        store::save_answers(&mut self.store, &self.answers)
    }

    /// 現在表示中の設問に回答する
    pub fn choose_current(&mut self, value: u8) -> Result<()> {
        let Page::Category(key) = self.page() else {
            return Err(Error::NotOnQuestionPage);
        };
        let id = self
            .current_question_id(key)
            .ok_or_else(|| Error::UnknownCategory(key.to_string()))?;
        self.choose(key, &id, value)
    }

    /// カテゴリの全設問に回答済みなら次ページへ進める
    pub fn gate_open(&self, key: CategoryKey) -> bool {
        self.answers.is_complete(self.catalog, key)
    }

    pub fn can_advance(&self) -> bool {
        match self.page() {
            Page::Welcome => true,
            Page::Category(key) => self.gate_open(key),
            Page::Results => false,
        }
    }

    pub fn next_page(&mut self) -> Transition {
        if !self.can_advance() {
            tracing::debug!(page = ?self.page(), "next page refused");
            return Transition::Stayed;
        }
        if !self.nav.advance() {
            return Transition::Stayed;
        }
        tracing::debug!(page = ?self.page(), "moved forward");
        match self.page() {
            Page::Results => {
                let report = self.report();
                tracing::info!(
                    total = report.total,
                    tier = report.tier.name(),
                    focus = %report.plan.category,
                    "assessment finished"
                );
                Transition::Finished(report)
            }
            page => Transition::Moved(page),
        }
    }

    pub fn prev_page(&mut self) -> Transition {
        if !self.nav.retreat() {
            return Transition::Stayed;
        }
        tracing::debug!(page = ?self.page(), "moved back");
        Transition::Moved(self.page())
    }

    fn move_question(&mut self, forward: bool) -> Transition {
        let Page::Category(key) = self.page() else {
            return Transition::Stayed;
        };
        let moved = if forward {
            self.nav.carousel_forward(key)
        } else {
            self.nav.carousel_backward(key)
        };
        if moved {
            Transition::Moved(self.page())
        } else {
            Transition::Stayed
        }
    }

    pub fn next_question(&mut self) -> Transition {
        self.move_question(true)
    }

    pub fn prev_question(&mut self) -> Transition {
        self.move_question(false)
    }

    /// 最初からやり直す。回答も保存データも消える。
    pub fn restart(&mut self) -> Result<()> {
        self.nav.reset();
        self.answers.clear();
        tracing::debug!("assessment restarted");
        store::clear_answers(&mut self.store)
    }

    /// 現在の回答から組み立てた結果
    pub fn report(&self) -> Report {
        Report::build(self.catalog, &self.answers)
    }

    fn current_question_id(&self, key: CategoryKey) -> Option<String> {
        self.catalog
            .category(key)
            .and_then(|category| category.questions.get(self.nav.cursor(key)))
            .map(|question| question.id.clone())
    }

    pub fn view(&self) -> View {
        match self.page() {
            Page::Welcome => View::Welcome,
            Page::Results => View::Results(self.report()),
            Page::Category(key) => self
                .question_view(key)
                .map_or(View::Empty, View::Question),
        }
    }

    pub fn question_view(&self, key: CategoryKey) -> Option<QuestionView> {
        let category = self.catalog.category(key)?;
        let index = self.nav.cursor(key);
        let question = category.questions.get(index)?;
        let selected = self.answers.get(&question.id);
        Some(QuestionView {
            category: key,
            category_title: category.title.clone(),
            question_id: question.id.clone(),
            index,
            count: category.questions.len(),
            prompt: question.text.clone(),
            options: question
                .options
                .iter()
                .map(|option| OptionView {
                    label: option.label.clone(),
                    detail: option.detail.clone(),
                    value: option.value.value(),
                    selected: selected == Some(option.value),
                })
                .collect(),
            can_go_back: self.nav.can_go_back(key),
            can_go_forward: self.nav.can_go_forward(key),
            next_enabled: self.gate_open(key),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scoring::Tier;
    use crate::store::{MemoryStore, ANSWERS_KEY};
    use pretty_assertions::assert_eq;

    fn answer_all(session: &mut Session<MemoryStore>, key: CategoryKey, value: u8) {
        let ids: Vec<String> = session
            .catalog()
            .category(key)
            .unwrap()
            .question_ids()
            .map(str::to_string)
            .collect();
        for id in ids {
            session.choose(key, &id, value).unwrap();
        }
    }

    #[test]
    fn test_gate_requires_all_four() {
        let mut session = Session::new(MemoryStore::new());
        session.next_page();
        assert_eq!(session.page(), Page::Category(CategoryKey::Mobile));

        for (answered, id) in ["q1", "q2", "q3", "q4"].iter().enumerate() {
            assert_eq!(
                session
                    .answers()
                    .answered_in(session.catalog(), CategoryKey::Mobile),
                answered
            );
            assert!(!session.gate_open(CategoryKey::Mobile));
            assert_eq!(session.next_page(), Transition::Stayed);
            session.choose(CategoryKey::Mobile, id, 1).unwrap();
        }
        assert!(session.gate_open(CategoryKey::Mobile));
        assert_eq!(
            session.next_page(),
            Transition::Moved(Page::Category(CategoryKey::Forms))
        );
    }

    #[test]
    fn test_gate_independent_of_cursor() {
        let mut session = Session::new(MemoryStore::new());
        session.next_page();
        answer_all(&mut session, CategoryKey::Mobile, 0);
        session.next_question();
        session.next_question();
        let View::Question(view) = session.view() else {
            panic!("expected question view");
        };
        assert_eq!(view.index, 2);
        assert!(view.next_enabled);
    }

    #[test]
    fn test_choose_updates_view_and_store() {
        let mut session = Session::new(MemoryStore::new());
        session.next_page();
        session.choose_current(3).unwrap();
        let view = session.question_view(CategoryKey::Mobile).unwrap();
        assert_eq!(view.question_id, "q1");
        let selected: Vec<bool> = view.options.iter().map(|o| o.selected).collect();
        assert_eq!(selected, vec![true, false, false]);
        assert!(!view.can_go_back);
        assert!(view.can_go_forward);
        assert_eq!(
            session.store().get(ANSWERS_KEY).unwrap().as_deref(),
            Some(r#"{"q1":3}"#)
        );

        session.choose_current(0).unwrap();
        let view = session.question_view(CategoryKey::Mobile).unwrap();
        let selected: Vec<bool> = view.options.iter().map(|o| o.selected).collect();
        assert_eq!(selected, vec![false, false, true]);
        assert_eq!(session.answers().len(), 1);
    }

    #[test]
    fn test_choose_rejects_foreign_question() {
        let mut session = Session::new(MemoryStore::new());
        assert!(matches!(
            session.choose(CategoryKey::Mobile, "q5", 3),
            Err(Error::UnknownQuestion(_))
        ));
        assert!(matches!(
            session.choose(CategoryKey::Mobile, "q42", 3),
            Err(Error::UnknownQuestion(_))
        ));
        assert!(matches!(
            session.choose(CategoryKey::Mobile, "q1", 2),
            Err(Error::IllegalAnswer(2))
        ));
        assert!(session.answers().is_empty());
        assert!(matches!(
            session.choose_current(3),
            Err(Error::NotOnQuestionPage)
        ));
    }

    #[test]
    fn test_full_run_finishes_with_report() {
        let mut session = Session::new(MemoryStore::new());
        session.next_page();
        let values = [
            (CategoryKey::Mobile, 0),
            (CategoryKey::Forms, 1),
            (CategoryKey::Navigation, 3),
            (CategoryKey::Accessibility, 3),
        ];
        let mut last = Transition::Stayed;
        for (key, value) in values {
            answer_all(&mut session, key, value);
            last = session.next_page();
        }
        let Transition::Finished(report) = last else {
            panic!("expected results, got {last:?}");
        };
        assert_eq!(report.total, 28);
        assert_eq!(report.tier, Tier::SignificantProblems);
        assert_eq!(report.plan.category, CategoryKey::Mobile);
        assert!(report.plan.quick_win);
        assert_eq!(session.view(), View::Results(report));
        assert_eq!(session.next_page(), Transition::Stayed);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = Session::new(MemoryStore::new());
        session.next_page();
        answer_all(&mut session, CategoryKey::Mobile, 3);
        session.next_page();
        session.next_question();
        session.handle(Event::Restart).unwrap();

        assert_eq!(session.page(), Page::Welcome);
        assert_eq!(session.navigator(), &Navigator::new());
        assert!(session.answers().is_empty());
        assert_eq!(session.store().get(ANSWERS_KEY).unwrap(), None);
        assert_eq!(session.view(), View::Welcome);
    }

    #[test]
    fn test_reload_restores_answers() {
        let mut session = Session::new(MemoryStore::new());
        session.next_page();
        answer_all(&mut session, CategoryKey::Mobile, 1);
        let answers = session.answers().clone();
        let store = session.store().clone();

        let reloaded = Session::new(store);
        assert_eq!(reloaded.answers(), &answers);
        assert_eq!(reloaded.page(), Page::Welcome);
        assert!(reloaded.gate_open(CategoryKey::Mobile));
        assert!(!reloaded.gate_open(CategoryKey::Forms));
    }

    #[test]
    fn test_question_moves_only_on_category_pages() {
        let mut session = Session::new(MemoryStore::new());
        assert_eq!(session.handle(Event::NextQuestion).unwrap(), Transition::Stayed);
        assert_eq!(session.handle(Event::PrevPage).unwrap(), Transition::Stayed);
        session.handle(Event::NextPage).unwrap();
        assert_eq!(session.handle(Event::PrevQuestion).unwrap(), Transition::Stayed);
        assert_eq!(
            session.handle(Event::NextQuestion).unwrap(),
            Transition::Moved(Page::Category(CategoryKey::Mobile))
        );
        assert_eq!(session.navigator().cursor(CategoryKey::Mobile), 1);
    }
}
