//! Savings goal CLI commands

use chrono::{NaiveDate, Utc};
use clap::Subcommand;

use super::parse_money;
use crate::display::{format_goals, MoneyFormat};
use crate::error::BudgetResult;
use crate::models::{GoalCategory, GoalPriority, Money};
use crate::services::{CreateGoalInput, GoalService};
use crate::storage::Storage;

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a goal
    Add {
        title: String,
        /// Target amount
        #[arg(value_parser = parse_money)]
        target: Money,
        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: NaiveDate,
        /// emergency, vacation, investment, purchase or other
        #[arg(short, long)]
        category: Option<GoalCategory>,
        /// high, medium or low
        #[arg(short, long)]
        priority: Option<GoalPriority>,
    },

    /// List goals with progress
    #[command(alias = "ls")]
    List,

    /// Add to (or, with a negative amount, take from) a goal's saved amount
    Progress {
        /// Goal ID, prefix or title
        goal: String,
        #[arg(value_parser = parse_money, allow_hyphen_values = true)]
        amount: Money,
    },

    /// Delete a goal
    #[command(alias = "rm")]
    Remove {
        /// Goal ID, prefix or title
        goal: String,
    },
}

pub fn handle_goal_command(storage: &Storage, cmd: GoalCommands) -> BudgetResult<()> {
    let service = GoalService::new(storage);
    let fmt = MoneyFormat::from_settings(storage.settings());

    match cmd {
        GoalCommands::Add {
            title,
            target,
            deadline,
            category,
            priority,
        } => {
            let goal = service.create(CreateGoalInput {
                title,
                target_amount: target,
                deadline,
                category,
                priority,
            })?;
            println!(
                "Created goal {}: {} (target {})",
                goal.id,
                goal.title,
                fmt.format(goal.target_amount)
            );
        }
        GoalCommands::List => {
            print!("{}", format_goals(&service.list()?, Utc::now(), &fmt));
        }
        GoalCommands::Progress { goal, amount } => {
            let goal = service.adjust_progress(&goal, amount)?;
            println!(
                "{}: {} of {} ({:.0}%)",
                goal.title,
                fmt.format(goal.current_amount),
                fmt.format(goal.target_amount),
                goal.progress_percent()
            );
            if goal.is_complete() {
                println!("Goal reached!");
            }
        }
        GoalCommands::Remove { goal } => {
            let goal = service.delete(&goal)?;
            println!("Deleted goal: {}", goal.title);
        }
    }

    Ok(())
}
