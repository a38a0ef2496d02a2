//! Service layer for the budget tracker
//!
//! The service layer provides business logic on top of the storage layer:
//! input validation before any store call, audit logging of mutations, and
//! routing to the local or relational store for the current session.

pub mod budget;
pub mod goal;
pub mod progress;
pub mod session;
pub mod transaction;

pub use budget::{BudgetOverview, BudgetService, LineItemInput};
pub use goal::{CreateGoalInput, GoalService};
pub use progress::{CheckInOutcome, ProgressService};
pub use session::{SessionService, SessionStatus, SignInOutcome};
pub use transaction::{CreateTransactionInput, TransactionService, UpdateTransactionInput};
