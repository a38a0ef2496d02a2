//! Goal repository for JSON storage
//!
//! Manages loading and saving savings goals to goals.json. Goals stay on
//! this device in both guest and signed-in mode.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{Goal, GoalId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct GoalData {
    goals: Vec<Goal>,
}

/// Repository for goal persistence
pub struct GoalRepository {
    path: PathBuf,
    data: RwLock<HashMap<GoalId, Goal>>,
}

impl GoalRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load goals from disk
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: GoalData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for goal in file_data.goals {
            data.insert(goal.id, goal);
        }

        Ok(())
    }

    /// Save goals to disk
    pub fn save(&self) -> Result<(), BudgetError> {
        let goals = self.get_all()?;
        write_json_atomic(&self.path, &GoalData { goals })
    }

    pub fn get(&self, id: GoalId) -> Result<Option<Goal>, BudgetError> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All goals, highest priority first, then nearest deadline
    pub fn get_all(&self) -> Result<Vec<Goal>, BudgetError> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut goals: Vec<_> = data.values().cloned().collect();
        goals.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then(a.deadline.cmp(&b.deadline))
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(goals)
    }

    /// Find a goal by id prefix or case-insensitive title
    pub fn find(&self, reference: &str) -> Result<Option<Goal>, BudgetError> {
        let goals = self.get_all()?;
        let by_id = goals.iter().find(|g| g.id.matches(reference));
        if let Some(goal) = by_id {
            return Ok(Some(goal.clone()));
        }

        let wanted = reference.trim().to_lowercase();
        Ok(goals.into_iter().find(|g| g.title.to_lowercase() == wanted))
    }

    pub fn upsert(&self, goal: Goal) -> Result<(), BudgetError> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(goal.id, goal);
        Ok(())
    }

    pub fn delete(&self, id: GoalId) -> Result<bool, BudgetError> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalPriority, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, GoalRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = GoalRepository::new(temp_dir.path().join("goals.json"));
        (temp_dir, repo)
    }

    fn goal(title: &str, month: u32, priority: GoalPriority) -> Goal {
        let mut g = Goal::new(
            title,
            Money::from_major(1000),
            NaiveDate::from_ymd_opt(2025, month, 1).unwrap(),
        );
        g.priority = priority;
        g
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let g = goal("Vacation", 8, GoalPriority::Medium);
        let id = g.id;
        repo.upsert(g).unwrap();
        repo.save().unwrap();

        let repo2 = GoalRepository::new(temp_dir.path().join("goals.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 1);
        assert_eq!(repo2.get(id).unwrap().unwrap().title, "Vacation");
    }

    #[test]
    fn test_ordering() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(goal("Later", 9, GoalPriority::Medium)).unwrap();
        repo.upsert(goal("Sooner", 3, GoalPriority::Medium)).unwrap();
        repo.upsert(goal("Urgent", 12, GoalPriority::High)).unwrap();

        let titles: Vec<String> = repo.get_all().unwrap().into_iter().map(|g| g.title).collect();
        assert_eq!(titles, vec!["Urgent", "Sooner", "Later"]);
    }

    #[test]
    fn test_find_by_title_or_id() {
        let (_temp_dir, repo) = create_test_repo();
        let g = goal("New Laptop", 5, GoalPriority::Low);
        let id = g.id;
        repo.upsert(g).unwrap();

        assert_eq!(repo.find("new laptop").unwrap().unwrap().id, id);
        let short = id.as_uuid().to_string()[..8].to_string();
        assert_eq!(repo.find(&short).unwrap().unwrap().id, id);
        assert!(repo.find("car").unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let g = goal("Car", 5, GoalPriority::Low);
        let id = g.id;
        repo.upsert(g).unwrap();
        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
    }
}
