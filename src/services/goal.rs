//! Goal service
//!
//! Savings goals live in the local goals file in every mode.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Goal, GoalCategory, GoalPriority, Money};
use crate::storage::Storage;

/// Service for savings goals
pub struct GoalService<'a> {
    storage: &'a Storage,
}

#[derive(Debug, Clone)]
pub struct CreateGoalInput {
    pub title: String,
    pub target_amount: Money,
    pub deadline: NaiveDate,
    pub category: Option<GoalCategory>,
    pub priority: Option<GoalPriority>,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(&self, input: CreateGoalInput) -> BudgetResult<Goal> {
        let mut goal = Goal::new(input.title.trim(), input.target_amount, input.deadline);
        goal.category = input.category.unwrap_or_default();
        goal.priority = input.priority.unwrap_or_default();
        goal.validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;
        self.storage.log_create(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.title.clone()),
            &goal,
        )?;

        Ok(goal)
    }

    /// Goals ordered by priority, then deadline
    pub fn list(&self) -> BudgetResult<Vec<Goal>> {
        self.storage.goals.get_all()
    }

    /// Find by id prefix or title
    pub fn find(&self, reference: &str) -> BudgetResult<Goal> {
        self.storage
            .goals
            .find(reference)?
            .ok_or_else(|| BudgetError::goal_not_found(reference.trim()))
    }

    /// Add `delta` (may be negative) to the saved amount; never drops below zero
    pub fn adjust_progress(&self, reference: &str, delta: Money) -> BudgetResult<Goal> {
        let before = self.find(reference)?;
        let mut goal = before.clone();
        goal.adjust_progress(delta);

        self.storage.goals.upsert(goal.clone())?;
        self.storage.goals.save()?;
        self.storage.log_update(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.title.clone()),
            &before,
            &goal,
        )?;

        if goal.is_complete() && !before.is_complete() {
            tracing::info!(goal = %goal.title, "goal reached");
        }
        Ok(goal)
    }

    pub fn delete(&self, reference: &str) -> BudgetResult<Goal> {
        let goal = self.find(reference)?;
        self.storage.goals.delete(goal.id)?;
        self.storage.goals.save()?;
        self.storage.log_delete(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.title.clone()),
            &goal,
        )?;

        Ok(goal)
    }
}
