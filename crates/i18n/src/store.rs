use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use wordtowallet_core::{Error, LocaleCode, Result};

use crate::merge::MessageTree;

/// Where message catalogs live
pub trait MessageStore {
    /// `Ok(None)` when the locale has no catalog yet
    fn load(&self, locale: &LocaleCode) -> Result<Option<MessageTree>>;

    fn save(&mut self, locale: &LocaleCode, tree: &MessageTree) -> Result<()>;
}

/// Catalogs stored as `{dir}/{locale}.json`
#[derive(Debug, Clone)]
pub struct FsMessageStore {
    dir: PathBuf,
}

impl FsMessageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, locale: &LocaleCode) -> PathBuf {
        self.dir.join(format!("{}.json", locale))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl MessageStore for FsMessageStore {
    fn load(&self, locale: &LocaleCode) -> Result<Option<MessageTree>> {
        let path = self.path_for(locale);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&content)?;
        match value {
            Value::Object(tree) => Ok(Some(tree)),
            _ => Err(Error::InvalidData(format!(
                "{} must contain a JSON object",
                path.display()
            ))),
        }
    }

    /// Two-space indentation, trailing newline
    fn save(&mut self, locale: &LocaleCode, tree: &MessageTree) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let mut content = serde_json::to_string_pretty(tree)?;
        content.push('\n');
        fs::write(self.path_for(locale), content)?;
        Ok(())
    }
}

/// In-memory catalogs, for tests and dry runs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryMessageStore {
    trees: HashMap<LocaleCode, MessageTree>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locale: LocaleCode, tree: MessageTree) {
        self.trees.insert(locale, tree);
    }

    pub fn get(&self, locale: &LocaleCode) -> Option<&MessageTree> {
        self.trees.get(locale)
    }
}

impl MessageStore for MemoryMessageStore {
    fn load(&self, locale: &LocaleCode) -> Result<Option<MessageTree>> {
        Ok(self.trees.get(locale).cloned())
    }

    fn save(&mut self, locale: &LocaleCode, tree: &MessageTree) -> Result<()> {
        self.trees.insert(locale.clone(), tree.clone());
        Ok(())
    }
}
