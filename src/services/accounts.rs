use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::entities::UserModel;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::stores::UserStore;

/// User account service: registration and login.
///
/// Passwords are stored and compared as plain text; there are no
/// sessions or tokens. Login succeeds or fails, nothing is issued.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    event_sender: Arc<EventSender>,
}

/// Input for registering a user
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, event_sender: Arc<EventSender>) -> Self {
        Self {
            users,
            event_sender,
        }
    }

    /// Registers a new user.
    ///
    /// Fails with a conflict when the username or the email is already
    /// taken. Publishes a `UserRegistered` event upon success.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn register(&self, input: RegisterInput) -> Result<UserModel, ServiceError> {
        let existing = self
            .users
            .find_by_username_or_email(&input.username, &input.email)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }

        let user = UserModel {
            id: Uuid::new_v4(),
            username: input.username,
            email: input.email,
            password: input.password,
            created_at: Utc::now(),
        };

        let user_id = self.users.insert(user.clone()).await?;

        self.event_sender
            .send_or_log(Event::UserRegistered(user_id))
            .await;

        info!("User registered: {}", user_id);
        Ok(user)
    }

    /// Checks a username/password pair against the stored account.
    ///
    /// An unknown username and a wrong password fail identically, so a
    /// caller cannot probe which usernames exist.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<UserModel, ServiceError> {
        self.users
            .find_by_username(username)
            .await?
            .filter(|user| user.password == password)
            .ok_or_else(|| ServiceError::AuthError("Invalid credentials".to_string()))
    }
}
