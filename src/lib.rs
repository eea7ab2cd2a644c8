pub mod answers;
pub mod bulk;
pub mod catalog;
pub mod config;
pub mod error;
pub mod navigation;
pub mod report;
pub mod scoring;
pub mod session;
pub mod store;

pub use answers::AnswerSet;
pub use bulk::read_bulk;
pub use catalog::{Catalog, Category, CategoryKey, Points, Question, QuestionOption, CATALOG};
pub use config::{Config, ScoreDisplay};
pub use error::{Error, Result};
pub use navigation::{Navigator, Page, Progress};
pub use report::{ActionPlan, RankedCategory, Report};
pub use scoring::{CategoryScores, Severity, Tier};
pub use session::{Event, Session, Transition, View};
pub use store::{FileStore, KeyValueStore, MemoryStore};
