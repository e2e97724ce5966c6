//! State containers owned by the root component.

use crate::api::ApiError;
use crate::models::{FieldError, User};
use gloo_storage::{LocalStorage, Storage};

const TOKEN_KEY: &str = "blog_token";

/// Result of the latest request for one view.
///
/// Every request takes a ticket from [`FetchState::start`]. A response is applied only
/// if it carries the newest ticket, so a slow older response can neither overwrite
/// newer data nor clear the loading flag of the request that replaced it.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    loading: bool,
    error: Option<String>,
    data: Option<T>,
    ticket: u64,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
            ticket: 0,
        }
    }
}

impl<T> FetchState<T> {
    pub fn start(&mut self) -> u64 {
        self.ticket += 1;
        self.loading = true;
        self.error = None;
        self.ticket
    }

    /// Returns false (and changes nothing) for a superseded ticket.
    pub fn finish(&mut self, ticket: u64, result: Result<T, ApiError>) -> bool {
        if ticket != self.ticket {
            log::debug!("Dropping stale response #{} (latest #{})", ticket, self.ticket);
            return false;
        }
        self.loading = false;
        match result {
            Ok(data) => self.data = Some(data),
            Err(e) => self.error = Some(e.to_string()),
        }
        true
    }

    /// Forget the data and invalidate any request still in flight.
    pub fn reset(&mut self) {
        self.ticket += 1;
        self.loading = false;
        self.error = None;
        self.data = None;
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub submitting: bool,
    pub field_errors: Vec<FieldError>,
    pub general_error: Option<String>,
}

impl FormState {
    pub fn start(&mut self) {
        self.submitting = true;
        self.field_errors.clear();
        self.general_error = None;
    }

    /// Local check failures; nothing was sent.
    pub fn reject(&mut self, errors: Vec<FieldError>) {
        self.submitting = false;
        self.field_errors = errors;
        self.general_error = None;
    }

    /// Server validation goes inline, everything else into the banner.
    pub fn fail(&mut self, error: ApiError) {
        self.submitting = false;
        match error {
            ApiError::Validation(errors) => self.field_errors = errors,
            other => self.general_error = Some(other.to_string()),
        }
    }

    pub fn done(&mut self) {
        *self = Self::default();
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl Session {
    pub fn restore() -> Self {
        Self {
            token: LocalStorage::get(TOKEN_KEY).ok(),
            user: None,
        }
    }

    pub fn sign_in(&mut self, token: String, user: User) {
        if let Err(e) = LocalStorage::set(TOKEN_KEY, &token) {
            log::warn!("Failed to save token: {:?}", e);
        }
        self.token = Some(token);
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) {
        LocalStorage::delete(TOKEN_KEY);
        self.token = None;
        self.user = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn owns(&self, author_id: &str) -> bool {
        self.user.as_ref().is_some_and(|u| u.id == author_id)
    }
}
