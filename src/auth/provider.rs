//! Authentication provider
//!
//! The [`AuthProvider`] contract plus a provider backed by the relational
//! store. Passwords are hashed with Argon2id; sessions are opaque random
//! tokens. Auth-state changes are broadcast to every subscriber channel.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rusqlite::{params, ErrorCode, OptionalExtension};
use uuid::Uuid;

use crate::error::{BudgetError, BudgetResult};
use crate::models::UserId;
use crate::storage::RemoteDatabase;

/// An account as seen by the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(AuthUser),
    SignedOut,
    PasswordRecovery { email: String },
}

/// Operations of an authentication provider
pub trait AuthProvider {
    fn sign_up(&self, email: &str, password: &str, full_name: &str) -> BudgetResult<AuthUser>;
    fn sign_in(&self, email: &str, password: &str) -> BudgetResult<AuthSession>;
    fn sign_out(&self, token: &str) -> BudgetResult<()>;
    /// Record a reset request; unknown addresses succeed silently
    fn request_password_reset(&self, email: &str) -> BudgetResult<()>;
    fn sign_in_with_oauth(&self, provider: &str) -> BudgetResult<AuthSession>;
    fn current_user(&self, token: &str) -> BudgetResult<Option<AuthUser>>;
    /// A channel receiving every later auth-state change
    fn subscribe(&self) -> Receiver<AuthEvent>;
}

/// Provider storing credentials and sessions in the relational store
pub struct DatabaseAuthProvider {
    db: Arc<RemoteDatabase>,
    subscribers: Mutex<Vec<Sender<AuthEvent>>>,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn hash_password(password: &str) -> BudgetResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BudgetError::Auth(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is unreadable");
            false
        }
    }
}

fn invalid_credentials() -> BudgetError {
    BudgetError::Auth("Invalid login credentials".into())
}

fn parse_user_id(raw: &str) -> BudgetResult<UserId> {
    raw.parse()
        .map_err(|_| BudgetError::Database(format!("Invalid stored user id '{}'", raw)))
}

impl DatabaseAuthProvider {
    pub fn new(db: Arc<RemoteDatabase>) -> Self {
        Self {
            db,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Send to every live subscriber, dropping closed channels
    fn emit(&self, event: AuthEvent) {
        match self.subscribers.lock() {
            Ok(mut subscribers) => subscribers.retain(|tx| tx.send(event.clone()).is_ok()),
            Err(e) => tracing::warn!(error = %e, "auth subscriber list poisoned"),
        }
    }

    /// Create the profile row if missing; failures are logged, not returned
    fn ensure_profile(&self, user: &AuthUser) {
        let result = self.db.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO profiles (user_id, email, full_name, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    user.id.as_uuid().to_string(),
                    user.email,
                    user.full_name,
                    Utc::now().to_rfc3339()
                ],
            )?;
            Ok(())
        });
        if let Err(e) = result {
            tracing::warn!(user = %user.id, error = %e, "failed to create profile");
        }
    }

    fn lookup_credentials(&self, email: &str) -> BudgetResult<Option<(UserId, String, String)>> {
        let row = self.db.with_conn(|conn| {
            let row = conn
                .query_row(
                    r#"
                    SELECT c.user_id, c.password_hash, COALESCE(p.full_name, '')
                    FROM credentials c
                    LEFT JOIN profiles p ON p.user_id = c.user_id
                    WHERE c.email = ?1
                    "#,
                    [email],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                        ))
                    },
                )
                .optional()?;
            Ok(row)
        })?;

        row.map(|(id, hash, name)| Ok((parse_user_id(&id)?, hash, name)))
            .transpose()
    }
}

impl AuthProvider for DatabaseAuthProvider {
    fn sign_up(&self, email: &str, password: &str, full_name: &str) -> BudgetResult<AuthUser> {
        let email = normalize_email(email);
        let hash = hash_password(password)?;
        let user = AuthUser {
            id: UserId::new(),
            email: email.clone(),
            full_name: full_name.trim().to_string(),
        };

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO credentials (user_id, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![user.id.as_uuid().to_string(), email, hash, Utc::now().to_rfc3339()],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    BudgetError::Auth("User already registered".into())
                } else {
                    BudgetError::from(e)
                }
            })?;
            Ok(())
        })?;

        self.ensure_profile(&user);
        tracing::info!(user = %user.id, "account created");
        Ok(user)
    }

    fn sign_in(&self, email: &str, password: &str) -> BudgetResult<AuthSession> {
        let email = normalize_email(email);
        let (id, hash, full_name) = self
            .lookup_credentials(&email)?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(password, &hash) {
            return Err(invalid_credentials());
        }

        let user = AuthUser {
            id,
            email,
            full_name,
        };
        let token = new_token();
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (token, user_id, created_at) VALUES (?1, ?2, ?3)",
                params![token, id.as_uuid().to_string(), Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })?;

        self.ensure_profile(&user);
        self.emit(AuthEvent::SignedIn(user.clone()));
        tracing::info!(user = %user.id, "signed in");
        Ok(AuthSession { user, token })
    }

    fn sign_out(&self, token: &str) -> BudgetResult<()> {
        self.db.with_conn(|conn| {
            conn.execute("DELETE FROM sessions WHERE token = ?1", [token])?;
            Ok(())
        })?;
        self.emit(AuthEvent::SignedOut);
        Ok(())
    }

    fn request_password_reset(&self, email: &str) -> BudgetResult<()> {
        let email = normalize_email(email);
        let Some((id, _, _)) = self.lookup_credentials(&email)? else {
            tracing::info!("password reset requested for unknown address");
            return Ok(());
        };

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO password_resets (token, user_id, created_at) VALUES (?1, ?2, ?3)",
                params![new_token(), id.as_uuid().to_string(), Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })?;
        self.emit(AuthEvent::PasswordRecovery { email });
        Ok(())
    }

    fn sign_in_with_oauth(&self, provider: &str) -> BudgetResult<AuthSession> {
        Err(BudgetError::Unsupported(format!(
            "Signing in with {} needs a browser redirect, which the terminal front end cannot complete",
            provider
        )))
    }

    fn current_user(&self, token: &str) -> BudgetResult<Option<AuthUser>> {
        let row = self.db.with_conn(|conn| {
            let row = conn
                .query_row(
                    r#"
                    SELECT c.user_id, c.email, COALESCE(p.full_name, '')
                    FROM sessions s
                    JOIN credentials c ON c.user_id = s.user_id
                    LEFT JOIN profiles p ON p.user_id = c.user_id
                    WHERE s.token = ?1
                    "#,
                    [token],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                        ))
                    },
                )
                .optional()?;
            Ok(row)
        })?;

        row.map(|(id, email, full_name)| {
            Ok(AuthUser {
                id: parse_user_id(&id)?,
                email,
                full_name,
            })
        })
        .transpose()
    }

    fn subscribe(&self) -> Receiver<AuthEvent> {
        let (tx, rx) = mpsc::channel();
        match self.subscribers.lock() {
            Ok(mut subscribers) => subscribers.push(tx),
            Err(e) => tracing::warn!(error = %e, "auth subscriber list poisoned"),
        }
        rx
    }
}

/// True when a database error is a constraint violation
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> DatabaseAuthProvider {
        DatabaseAuthProvider::new(Arc::new(RemoteDatabase::open_in_memory().unwrap()))
    }

    #[test]
    fn test_password_hashes_are_salted() {
        let first = hash_password("secret1").unwrap();
        let second = hash_password("secret1").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(verify_password("secret1", &first));
        assert!(!verify_password("secret2", &second));
    }

    #[test]
    fn test_sign_up_then_sign_in() {
        let auth = provider();
        let user = auth.sign_up("Priya@Example.com", "secret1", "Priya").unwrap();
        assert_eq!(user.email, "priya@example.com");

        let session = auth.sign_in("priya@example.com ", "secret1").unwrap();
        assert_eq!(session.user.id, user.id);
        assert_eq!(session.user.full_name, "Priya");

        let current = auth.current_user(&session.token).unwrap().unwrap();
        assert_eq!(current.id, user.id);
    }

    #[test]
    fn test_duplicate_sign_up() {
        let auth = provider();
        auth.sign_up("a@b.co", "secret1", "A").unwrap();
        let err = auth.sign_up("A@B.CO", "secret2", "A").unwrap_err();
        assert!(err.user_message().contains("already exists"));
    }

    #[test]
    fn test_wrong_password_is_mapped() {
        let auth = provider();
        auth.sign_up("a@b.co", "secret1", "A").unwrap();

        let err = auth.sign_in("a@b.co", "secret2").unwrap_err();
        assert_eq!(
            err.user_message(),
            "Invalid email or password. Please check your credentials."
        );
        assert!(auth.sign_in("who@b.co", "secret1").is_err());
    }

    #[test]
    fn test_sign_out_ends_session() {
        let auth = provider();
        auth.sign_up("a@b.co", "secret1", "A").unwrap();
        let session = auth.sign_in("a@b.co", "secret1").unwrap();

        auth.sign_out(&session.token).unwrap();
        assert!(auth.current_user(&session.token).unwrap().is_none());
    }

    #[test]
    fn test_events_reach_subscribers() {
        let auth = provider();
        let events = auth.subscribe();
        auth.sign_up("a@b.co", "secret1", "A").unwrap();
        let session = auth.sign_in("a@b.co", "secret1").unwrap();
        auth.sign_out(&session.token).unwrap();
        auth.request_password_reset("a@b.co").unwrap();

        let received: Vec<AuthEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                AuthEvent::SignedIn(session.user.clone()),
                AuthEvent::SignedOut,
                AuthEvent::PasswordRecovery {
                    email: "a@b.co".into()
                },
            ]
        );
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let auth = provider();
        drop(auth.subscribe());
        auth.sign_up("a@b.co", "secret1", "A").unwrap();
        auth.sign_in("a@b.co", "secret1").unwrap();
        assert!(auth.subscribers.lock().unwrap().is_empty());
    }

    #[test]
    fn test_reset_for_unknown_email_is_silent() {
        let auth = provider();
        let events = auth.subscribe();
        auth.request_password_reset("ghost@b.co").unwrap();
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_oauth_is_unsupported() {
        let err = provider().sign_in_with_oauth("google").unwrap_err();
        assert!(matches!(err, BudgetError::Unsupported(_)));
    }
}
