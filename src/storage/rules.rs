//! Rule repository for JSON storage
//!
//! Manages loading and saving rules to rules.json. Rules are kept in list
//! order; that order is what the rule list screen shows and what a backup
//! preserves.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SmsCodeError;
use crate::models::{Rule, RuleId};

/// Layout of rules.json as read
#[derive(Deserialize)]
struct StoredRules {
    rules: Vec<Rule>,
}

/// Layout of rules.json as written
#[derive(Serialize)]
struct StoredRulesRef<'a> {
    rules: &'a [Rule],
}

/// Repository for rule persistence
pub struct RuleRepository {
    path: PathBuf,
    data: RwLock<Vec<Rule>>,
}

impl RuleRepository {
    /// Create a new rule repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Rule>>, SmsCodeError> {
        self.data
            .read()
            .map_err(|e| SmsCodeError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Rule>>, SmsCodeError> {
        self.data
            .write()
            .map_err(|e| SmsCodeError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load rules from disk; a missing file is an empty list
    pub fn load(&self) -> Result<(), SmsCodeError> {
        let rules = read_rules_file(&self.path)?;
        debug!(count = rules.len(), "rules loaded");
        *self.write()? = rules;
        Ok(())
    }

    /// Save rules to disk, replacing rules.json in one rename
    pub fn save(&self) -> Result<(), SmsCodeError> {
        let data = self.read()?;
        write_rules_file(&self.path, &data).map_err(|e| {
            SmsCodeError::Storage(format!("Failed to save {}: {}", self.path.display(), e))
        })
    }

    /// Get a rule by ID
    pub fn get(&self, id: RuleId) -> Result<Option<Rule>, SmsCodeError> {
        let data = self.read()?;
        Ok(data.iter().find(|r| r.id == id).cloned())
    }

    /// Find a rule by ID string (full UUID, `rul-xxxxxxxx`, or 8-char prefix)
    /// or by 1-based list position
    pub fn find(&self, identifier: &str) -> Result<Option<Rule>, SmsCodeError> {
        let data = self.read()?;

        if let Ok(position) = identifier.parse::<usize>() {
            if position >= 1 && identifier.len() < 8 {
                return Ok(data.get(position - 1).cloned());
            }
        }

        Ok(data.iter().find(|r| r.id.matches(identifier)).cloned())
    }

    /// Get all rules in list order
    pub fn get_all(&self) -> Result<Vec<Rule>, SmsCodeError> {
        Ok(self.read()?.clone())
    }

    /// Position of a rule in the list
    pub fn position(&self, id: RuleId) -> Result<Option<usize>, SmsCodeError> {
        let data = self.read()?;
        Ok(data.iter().position(|r| r.id == id))
    }

    /// Append a rule at the end of the list
    pub fn insert(&self, rule: Rule) -> Result<(), SmsCodeError> {
        self.write()?.push(rule);
        Ok(())
    }

    /// Replace an existing rule in place; returns false if it isn't stored
    pub fn update(&self, rule: Rule) -> Result<bool, SmsCodeError> {
        let mut data = self.write()?;
        match data.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => {
                *existing = rule;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Delete a rule, returning it with the position it occupied
    pub fn delete(&self, id: RuleId) -> Result<Option<(usize, Rule)>, SmsCodeError> {
        let mut data = self.write()?;
        match data.iter().position(|r| r.id == id) {
            Some(index) => Ok(Some((index, data.remove(index)))),
            None => Ok(None),
        }
    }

    /// Replace the whole rule list
    pub fn replace_all(&self, rules: Vec<Rule>) -> Result<(), SmsCodeError> {
        *self.write()? = rules;
        Ok(())
    }

    /// Count rules
    pub fn count(&self) -> Result<usize, SmsCodeError> {
        Ok(self.read()?.len())
    }
}

fn read_rules_file(path: &Path) -> Result<Vec<Rule>, SmsCodeError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(SmsCodeError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    serde_json::from_slice::<StoredRules>(&bytes)
        .map(|stored| stored.rules)
        .map_err(|e| SmsCodeError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

fn write_rules_file(path: &Path, rules: &[Rule]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Same directory as the target so the rename cannot cross filesystems
    let temp_path = path.with_extension("json.tmp");
    let written = File::create(&temp_path).and_then(|file| {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &StoredRulesRef { rules })?;
        writer.flush()?;
        writer.get_ref().sync_all()
    });

    match written.and_then(|()| fs::rename(&temp_path, path)) {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(&temp_path);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, RuleRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("rules.json");
        let repo = RuleRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_insert_keeps_order() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(Rule::new("First", "code", r"\d+")).unwrap();
        repo.insert(Rule::new("Middle", "code", r"\d+")).unwrap();
        repo.insert(Rule::new("Second", "code", r"\d+")).unwrap();

        let names: Vec<_> = repo
            .get_all()
            .unwrap()
            .into_iter()
            .map(|r| r.company)
            .collect();
        assert_eq!(names, vec!["First", "Middle", "Second"]);
    }

    #[test]
    fn test_delete_returns_position() {
        let (_temp_dir, repo) = create_test_repo();
        let a = Rule::new("A", "code", r"\d+");
        let b = Rule::new("B", "code", r"\d+");
        let b_id = b.id;
        repo.insert(a).unwrap();
        repo.insert(b).unwrap();

        let (index, removed) = repo.delete(b_id).unwrap().unwrap();
        assert_eq!(index, 1);
        assert_eq!(removed.company, "B");
        assert!(repo.delete(b_id).unwrap().is_none());
    }

    #[test]
    fn test_find_by_position_and_id() {
        let (_temp_dir, repo) = create_test_repo();
        let rule = Rule::new("Acme", "code", r"\d+");
        let id = rule.id;
        repo.insert(rule).unwrap();

        assert_eq!(repo.find("1").unwrap().unwrap().id, id);
        assert_eq!(repo.find(&id.to_string()).unwrap().unwrap().id, id);
        assert!(repo.find("2").unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let (temp_dir, repo) = create_test_repo();
        fs::write(temp_dir.path().join("rules.json"), "not json at all").unwrap();

        assert!(matches!(repo.load(), Err(SmsCodeError::Storage(_))));
    }

    #[test]
    fn test_save_creates_parent_and_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data").join("rules.json");
        let repo = RuleRepository::new(path.clone());
        repo.insert(Rule::new("Acme", "otp", r"\d{4}")).unwrap();

        repo.save().unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let rule = Rule::new("Acme", "otp", r"\d{4}");
        let id = rule.id;
        repo.insert(rule).unwrap();
        repo.save().unwrap();

        let repo2 = RuleRepository::new(temp_dir.path().join("rules.json"));
        repo2.load().unwrap();
        let loaded = repo2.get(id).unwrap().unwrap();
        assert_eq!(loaded.company, "Acme");
    }

    #[test]
    fn test_update() {
        let (_temp_dir, repo) = create_test_repo();
        let mut rule = Rule::new("Acme", "otp", r"\d{4}");
        repo.insert(rule.clone()).unwrap();

        rule.company = "Acme Corp".into();
        assert!(repo.update(rule.clone()).unwrap());
        assert_eq!(repo.get(rule.id).unwrap().unwrap().company, "Acme Corp");

        let stranger = Rule::new("Nobody", "otp", r"\d{4}");
        assert!(!repo.update(stranger).unwrap());
    }
}
