//! 回答の永続化。
//!
//! 固定キーに回答セットを JSON で1件だけ保存する。読み込みに失敗しても
//! 空の回答セットとして扱い、処理は止めない。

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::answers::AnswerSet;
use crate::catalog::{Catalog, Points};
use crate::error::Result;

pub const ANSWERS_KEY: &str = "ux-health-answers";

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// キーごとに `<dir>/<key>.json` を1ファイル使う
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// 保存済みの回答を読み込む。
///
/// 保存が無い、読めない、JSON として壊れている場合は空を返す。
/// マスタに無い設問や 0/1/3 以外の値は1件ずつ捨てる。
pub fn load_answers(store: &impl KeyValueStore, catalog: &Catalog) -> AnswerSet {
    let raw = match store.get(ANSWERS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return AnswerSet::new(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read saved answers, starting fresh");
            return AnswerSet::new();
        }
    };
    let entries: BTreeMap<String, serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "saved answers are not readable, starting fresh");
            return AnswerSet::new();
        }
    };

    let mut answers = AnswerSet::new();
    for (id, value) in entries {
        if catalog.question(&id).is_none() {
            tracing::warn!(question = %id, "dropping saved answer for unknown question");
            continue;
        }
        let points = value
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .and_then(|v| Points::try_from(v).ok());
        match points {
            Some(points) => {
                answers.record(id, points);
            }
            None => {
                tracing::warn!(question = %id, %value, "dropping saved answer with illegal value");
            }
        }
    }
    tracing::debug!(count = answers.len(), "restored saved answers");
    answers
}

pub fn save_answers(store: &mut impl KeyValueStore, answers: &AnswerSet) -> Result<()> {
    let json = serde_json::to_string(answers)?;
    store.set(ANSWERS_KEY, &json)
}

pub fn clear_answers(store: &mut impl KeyValueStore) -> Result<()> {
    store.remove(ANSWERS_KEY)
}
