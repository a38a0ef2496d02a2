//! Session service
//!
//! Sign-up, sign-in and sign-out against the auth provider, guest mode, and
//! the one-time copy of local data into the relational store on first
//! sign-in.

use std::sync::mpsc::Receiver;

use crate::auth::{
    validate_reset_request, validate_sign_in, validate_sign_up, AuthEvent, AuthProvider, AuthUser,
    DatabaseAuthProvider, SignUpForm,
};
use crate::error::BudgetResult;
use crate::models::{AppState, SessionInfo};
use crate::storage::{MigrationOutcome, Storage};

pub struct SessionService<'a> {
    storage: &'a Storage,
}

/// Result of a successful sign-in
#[derive(Debug, Clone)]
pub struct SignInOutcome {
    pub user: AuthUser,
    pub migration: MigrationOutcome,
}

/// What `auth status` reports
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub guest_mode: bool,
    pub session: Option<SessionInfo>,
    /// False when the stored token no longer names a live session
    pub session_valid: bool,
}

impl<'a> SessionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn provider(&self) -> BudgetResult<DatabaseAuthProvider> {
        Ok(DatabaseAuthProvider::new(self.storage.remote()?))
    }

    pub fn sign_up(&self, form: &SignUpForm<'_>) -> BudgetResult<AuthUser> {
        validate_sign_up(form)?;
        self.provider()?
            .sign_up(form.email, form.password, form.full_name)
    }

    /// Sign in, remember the session, and migrate local data once
    pub fn sign_in(&self, email: &str, password: &str) -> BudgetResult<SignInOutcome> {
        validate_sign_in(email, password)?;
        let provider = self.provider()?;
        let events = provider.subscribe();
        let session = provider.sign_in(email, password)?;

        let local = self.storage.local_budget.load_saved()?;
        let saved = self.storage.local_budget.saved_buckets();
        let transactions = self.storage.local_transactions.get_all()?;
        let migration = self
            .storage
            .remote()?
            .migrate(session.user.id, &local, &saved, &transactions)?;
        if let MigrationOutcome::Migrated {
            line_items,
            transactions,
        } = migration
        {
            tracing::info!(line_items, transactions, "copied local data to the relational store");
        }

        self.storage.state.update(|state| {
            state.guest_mode = false;
            state.session = Some(SessionInfo {
                user_id: session.user.id,
                email: session.user.email.clone(),
                token: session.token.clone(),
            });
        })?;
        log_events(&events);

        Ok(SignInOutcome {
            user: session.user,
            migration,
        })
    }

    /// End the current session, if any; returns whether one existed
    pub fn sign_out(&self) -> BudgetResult<bool> {
        let Some(session) = self.storage.state.load()?.session else {
            return Ok(false);
        };

        let provider = self.provider()?;
        let events = provider.subscribe();
        provider.sign_out(&session.token)?;
        self.storage.state.update(|state| state.session = None)?;
        log_events(&events);
        Ok(true)
    }

    pub fn request_password_reset(&self, email: &str) -> BudgetResult<()> {
        validate_reset_request(email)?;
        let provider = self.provider()?;
        let events = provider.subscribe();
        provider.request_password_reset(email)?;
        log_events(&events);
        Ok(())
    }

    /// Continue without an account; any session is forgotten
    pub fn continue_as_guest(&self) -> BudgetResult<()> {
        let state = self.storage.state.load()?;
        if let Some(session) = &state.session {
            // the local record is cleared even if the store is unreachable
            if let Err(e) = self.provider().and_then(|p| p.sign_out(&session.token)) {
                tracing::warn!(error = %e, "could not end stored session");
            }
        }

        self.storage.state.update(|state| {
            state.guest_mode = true;
            state.session = None;
        })
    }

    pub fn status(&self) -> BudgetResult<SessionStatus> {
        let AppState {
            guest_mode,
            session,
            ..
        } = self.storage.state.load()?;

        let session_valid = match &session {
            Some(info) => self.provider()?.current_user(&info.token)?.is_some(),
            None => false,
        };

        Ok(SessionStatus {
            guest_mode,
            session,
            session_valid,
        })
    }
}

fn log_events(events: &Receiver<AuthEvent>) {
    for event in events.try_iter() {
        match event {
            AuthEvent::SignedIn(user) => tracing::debug!(user = %user.id, "auth event: signed in"),
            AuthEvent::SignedOut => tracing::debug!("auth event: signed out"),
            AuthEvent::PasswordRecovery { .. } => tracing::debug!("auth event: password recovery"),
        }
    }
}
