use rand::{distr::Alphanumeric, Rng};

use crate::{
    model::{Document, Session, User},
    AppError, AppResult,
};

const TOKEN_LEN: usize = 32;

/// Fresh session token from the thread-local CSPRNG.
pub fn new_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

impl Document {
    pub fn user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|user| user.username == username)
    }

    pub fn register_user(&mut self, username: &str) -> AppResult<User> {
        if username.is_empty() {
            return Err(AppError::BadRequest("username required".into()));
        }
        if self.user(username).is_some() {
            return Err(AppError::Conflict("exists".into()));
        }

        let user = User {
            username: username.to_owned(),
        };
        self.users.push(user.clone());
        Ok(user)
    }

    /// Opens a session for a registered user and returns its token.
    pub fn create_session(&mut self, username: &str) -> AppResult<String> {
        if self.user(username).is_none() {
            return Err(AppError::NotFound("user not found".into()));
        }

        let token = new_token();
        self.sessions.push(Session {
            token: token.clone(),
            username: username.to_owned(),
        });
        Ok(token)
    }

    pub fn resolve_session(&self, token: Option<&str>) -> Option<&str> {
        let token = token.filter(|token| !token.is_empty())?;
        self.sessions
            .iter()
            .find(|session| session.token == token)
            .map(|session| session.username.as_str())
    }

    /// Drops every session with this token. Returns how many went.
    pub fn revoke_session(&mut self, token: &str) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|session| session.token != token);
        before - self.sessions.len()
    }
}
