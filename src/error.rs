use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// 設問マスタに存在しない設問
    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// 回答選択肢が違反
    #[error("illegal answer value {0}, expected one of 0, 1, 3")]
    IllegalAnswer(u8),

    #[error("question {question} has no option worth {value} points")]
    NoSuchOption { question: String, value: u8 },

    #[error("question {question}: cannot read answer {cell:?}")]
    InvalidCell { question: String, cell: String },

    #[error("CSV header must start with `id`, found {0:?}")]
    InvalidHeader(String),

    #[error("row {id} has {found} cells, header has {expected}")]
    RowTooWide {
        id: String,
        expected: usize,
        found: usize,
    },

    #[error("the current page has no question")]
    NotOnQuestionPage,

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("could not determine a data directory")]
    DataDir,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
