//! Streak and achievement commands

use chrono::{Local, Utc};

use crate::display::{format_achievements, format_check_in, format_streak};
use crate::error::BudgetResult;
use crate::services::ProgressService;
use crate::storage::Storage;

pub fn handle_achievements(storage: &Storage) -> BudgetResult<()> {
    let report = ProgressService::new(storage).achievements(Utc::now())?;
    print!("{}", format_achievements(&report));
    Ok(())
}

/// Show the streak, or record today's outcome first with `check_in`
pub fn handle_streak(storage: &Storage, check_in: bool) -> BudgetResult<()> {
    let service = ProgressService::new(storage);
    if check_in {
        let outcome = service.check_in(Local::now().date_naive(), Utc::now())?;
        print!("{}", format_check_in(&outcome));
    } else {
        print!("{}", format_streak(&service.streak()?));
    }
    Ok(())
}
