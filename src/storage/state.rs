//! Persisted application state (state.json)

use std::path::PathBuf;

use crate::error::BudgetError;
use crate::models::AppState;

use super::file_io::{read_json, write_json_atomic};

pub struct StateRepository {
    path: PathBuf,
}

impl StateRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the state, or the defaults when none has been saved
    pub fn load(&self) -> Result<AppState, BudgetError> {
        read_json(&self.path)
    }

    pub fn save(&self, state: &AppState) -> Result<(), BudgetError> {
        write_json_atomic(&self.path, state)
    }

    /// Load, apply `f`, save
    pub fn update<F, R>(&self, f: F) -> Result<R, BudgetError>
    where
        F: FnOnce(&mut AppState) -> R,
    {
        let mut state = self.load()?;
        let out = f(&mut state);
        self.save(&state)?;
        Ok(out)
    }
}
