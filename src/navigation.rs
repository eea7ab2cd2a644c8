use crate::catalog::{CategoryKey, QUESTIONS_PER_CATEGORY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Welcome,
    Category(CategoryKey),
    Results,
}

/// ページの並び。遷移は前後1ページずつのみ。
pub const PAGES: [Page; 6] = [
    Page::Welcome,
    Page::Category(CategoryKey::Mobile),
    Page::Category(CategoryKey::Forms),
    Page::Category(CategoryKey::Navigation),
    Page::Category(CategoryKey::Accessibility),
    Page::Results,
];

/// 進捗表示で数えるステップ数 (結果ページは5ステップ目に含む)
pub const PROGRESS_STEPS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub step: usize,
    pub of: usize,
    pub percent: u8,
}

/// 現在のページと、カテゴリごとの設問カーソル。
///
/// 範囲外への移動は何もしない。戻り値は移動したかどうか。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    page: usize,
    cursors: [usize; 4],
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> Page {
        PAGES[self.page]
    }

    pub fn page_index(&self) -> usize {
        self.page
    }

    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    pub fn is_last(&self) -> bool {
        self.page == PAGES.len() - 1
    }

    pub fn cursor(&self, key: CategoryKey) -> usize {
        self.cursors[key.index()]
    }

    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.page += 1;
        self.enter();
        true
    }

    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.page -= 1;
        self.enter();
        true
    }

    // カテゴリページに入ったら設問カーソルは先頭から
    fn enter(&mut self) {
        if let Page::Category(key) = self.page() {
            self.cursors[key.index()] = 0;
        }
    }

    pub fn can_go_back(&self, key: CategoryKey) -> bool {
        self.cursor(key) > 0
    }

    pub fn can_go_forward(&self, key: CategoryKey) -> bool {
        self.cursor(key) + 1 < QUESTIONS_PER_CATEGORY
    }

    pub fn carousel_forward(&mut self, key: CategoryKey) -> bool {
        if !self.can_go_forward(key) {
            return false;
        }
        self.cursors[key.index()] += 1;
        true
    }

    pub fn carousel_backward(&mut self, key: CategoryKey) -> bool {
        if !self.can_go_back(key) {
            return false;
        }
        self.cursors[key.index()] -= 1;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn progress(&self) -> Progress {
        let percent = self.page * 100 / (PAGES.len() - 1);
        Progress {
            step: (self.page + 1).min(PROGRESS_STEPS),
            of: PROGRESS_STEPS,
            percent: percent as u8,
        }
    }
}
