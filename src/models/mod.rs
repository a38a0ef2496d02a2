//! Core data models for the 50/30/20 budget tracker
//!
//! Budget line items grouped into income, needs, wants and savings, the daily
//! transaction log, savings goals and the small persisted application state.

pub mod goal;
pub mod ids;
pub mod line_item;
pub mod money;
pub mod state;
pub mod transaction;

pub use goal::{Goal, GoalCategory, GoalPriority, GoalValidationError};
pub use ids::{GoalId, TransactionId, UserId};
pub use line_item::{BudgetSheet, Bucket, ExpenseItem, IncomeItem, LineItem};
pub use money::{DigitGrouping, Money, MoneyParseError};
pub use state::{AchievementLedger, AppState, SessionInfo, StreakState, STREAK_HISTORY_LEN};
pub use transaction::{
    DaySummary, Transaction, TransactionCategory, TransactionType, TransactionValidationError,
};
