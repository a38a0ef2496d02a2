//! Account and session commands
//!
//! Passwords are read from the terminal without echo unless supplied through
//! `FTT_PASSWORD`, and are wiped from memory once the command finishes.

use clap::Subcommand;
use zeroize::Zeroizing;

use crate::auth::SignUpForm;
use crate::error::{BudgetError, BudgetResult};
use crate::services::SessionService;
use crate::storage::{MigrationOutcome, Storage};

pub const PASSWORD_ENV: &str = "FTT_PASSWORD";

/// Authentication subcommands
#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create an account
    Signup {
        #[arg(short, long)]
        email: String,
        /// Full name
        #[arg(short, long)]
        name: String,
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign in; local data is copied to your account the first time
    Signin {
        #[arg(short, long)]
        email: String,
        #[arg(long, env = PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out of the current session
    Signout,

    /// Request a password reset
    ResetPassword {
        #[arg(short, long)]
        email: String,
    },

    /// Show guest and session state
    Status,

    /// Continue without an account, keeping data on this device
    Guest,
}

pub fn handle_auth_command(storage: &Storage, cmd: AuthCommands) -> BudgetResult<()> {
    let service = SessionService::new(storage);

    match cmd {
        AuthCommands::Signup {
            email,
            name,
            password,
        } => {
            let (password, confirm) = match password {
                Some(p) => (Zeroizing::new(p.clone()), Zeroizing::new(p)),
                None => (
                    prompt_password("Password: ")?,
                    prompt_password("Confirm password: ")?,
                ),
            };
            let user = service.sign_up(&SignUpForm {
                email: &email,
                password: &password,
                confirm_password: &confirm,
                full_name: &name,
            })?;
            println!("Account created for {}.", user.email);
            println!("Run 'ftt auth signin --email {}' to sign in.", user.email);
        }
        AuthCommands::Signin { email, password } => {
            let password = match password {
                Some(p) => Zeroizing::new(p),
                None => prompt_password("Password: ")?,
            };
            let outcome = service.sign_in(&email, &password)?;
            println!("Signed in as {}.", outcome.user.email);
            if let MigrationOutcome::Migrated {
                line_items,
                transactions,
            } = outcome.migration
            {
                println!(
                    "Copied {} line items and {} transactions from this device to your account.",
                    line_items, transactions
                );
            }
        }
        AuthCommands::Signout => {
            if service.sign_out()? {
                println!("Signed out.");
            } else {
                println!("Not signed in.");
            }
        }
        AuthCommands::ResetPassword { email } => {
            service.request_password_reset(&email)?;
            println!("If an account exists for {}, a reset link has been sent.", email.trim());
        }
        AuthCommands::Status => {
            let status = service.status()?;
            match &status.session {
                Some(session) if status.session_valid => {
                    println!("Signed in as {}", session.email);
                }
                Some(session) => {
                    println!("Session for {} has expired. Sign in again.", session.email);
                }
                None if status.guest_mode => println!("Guest mode: data stays on this device"),
                None => println!("Not signed in"),
            }
        }
        AuthCommands::Guest => {
            service.continue_as_guest()?;
            println!("Continuing as guest. Your data stays on this device.");
        }
    }

    Ok(())
}

fn prompt_password(prompt: &str) -> BudgetResult<Zeroizing<String>> {
    rpassword::prompt_password(prompt)
        .map(Zeroizing::new)
        .map_err(|e| BudgetError::Auth(format!("Failed to read password: {}", e)))
}
