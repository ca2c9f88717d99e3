//! The admin screen as an explicit state machine.
//!
//! Every user action is one method on [`AdminState`]. Methods that need the
//! backend return a [`Command`] describing the call; the caller performs it and
//! hands the outcome to the matching `finish_*` method. Nothing in here does
//! I/O, so the whole screen can be driven from tests.

use models::{User, UserDraft};
use serde::{Deserialize, Serialize};

use crate::filter::filter_users;

pub const USER_CREATED: &str = "User created.";
pub const USER_UPDATED: &str = "User updated.";
pub const USER_DELETED: &str = "User deleted.";

/// A backend call requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    FetchUsers { seq: u64 },
    Create { draft: UserDraft },
    Update { id: i64, draft: UserDraft },
    Delete { id: i64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminState {
    users: Vec<User>,
    form: UserDraft,
    editing_id: Option<i64>,
    loading: bool,
    saving: bool,
    error: Option<String>,
    notice: Option<String>,
    filter: String,
    /// Sequence number of the most recently issued list fetch.
    load_seq: u64,
}

impl AdminState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn form(&self) -> &UserDraft {
        &self.form
    }

    pub fn editing_id(&self) -> Option<i64> {
        self.editing_id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// The users the table shows under the current filter.
    pub fn visible_users(&self) -> Vec<&User> {
        filter_users(&self.users, &self.filter)
    }

    /// Start a refresh of the user list.
    pub fn begin_load(&mut self) -> Command {
        self.clear_messages();
        self.issue_load()
    }

    /// Apply a finished list fetch. Returns `false` when a newer fetch has
    /// been issued since, in which case the result is dropped.
    pub fn finish_load(&mut self, seq: u64, result: Result<Vec<User>, String>) -> bool {
        if seq != self.load_seq {
            tracing::debug!(seq, latest = self.load_seq, "discarding stale user list");
            return false;
        }

        self.loading = false;
        match result {
            Ok(users) => {
                self.users = users;
                self.error = None;
            }
            Err(message) => {
                // The previous snapshot stays visible. Edit mode is left, but a
                // create draft is kept for the retry.
                self.error = Some(message);
                if self.editing_id.is_some() {
                    self.reset_form();
                }
            }
        }
        true
    }

    // Refresh without touching the current messages; used after a mutation so
    // its notice survives the reload.
    fn issue_load(&mut self) -> Command {
        self.load_seq += 1;
        self.loading = true;
        Command::FetchUsers { seq: self.load_seq }
    }

    pub fn set_full_name(&mut self, full_name: impl Into<String>) {
        self.form.full_name = full_name.into();
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.form.email = email.into();
    }

    pub fn set_active(&mut self, is_active: bool) {
        self.form.is_active = is_active;
    }

    /// Save the form: update when editing, create otherwise.
    ///
    /// Returns `None` without contacting the backend when a required field is
    /// blank or a save is already in flight.
    pub fn submit(&mut self) -> Option<Command> {
        if self.saving {
            return None;
        }
        self.clear_messages();

        if let Some(field) = self.missing_field() {
            self.error = Some(format!("{field} is required."));
            return None;
        }

        self.saving = true;
        let draft = self.form.clone();
        Some(match self.editing_id {
            Some(id) => Command::Update { id, draft },
            None => Command::Create { draft },
        })
    }

    /// Apply the outcome of a create or update. On success the form resets and
    /// a refresh is issued; on failure the form is kept for another attempt.
    pub fn finish_save(&mut self, result: Result<(), String>) -> Option<Command> {
        self.saving = false;
        match result {
            Ok(()) => {
                let notice = if self.editing_id.is_some() {
                    USER_UPDATED
                } else {
                    USER_CREATED
                };
                self.notice = Some(notice.to_owned());
                self.reset_form();
                Some(self.issue_load())
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    fn missing_field(&self) -> Option<&'static str> {
        if self.form.full_name.trim().is_empty() {
            Some("Full name")
        } else if self.form.email.trim().is_empty() {
            Some("Email")
        } else {
            None
        }
    }

    pub fn edit(&mut self, user: &User) {
        self.editing_id = Some(user.id);
        self.form = UserDraft::from(user);
        self.clear_messages();
    }

    /// Leave edit mode. Outside edit mode this does nothing.
    pub fn cancel(&mut self) {
        if self.editing_id.is_none() {
            return;
        }
        self.reset_form();
        self.clear_messages();
    }

    pub fn request_delete(&mut self, id: i64) -> Command {
        self.clear_messages();
        Command::Delete { id }
    }

    pub fn finish_delete(&mut self, id: i64, result: Result<(), String>) -> Option<Command> {
        match result {
            Ok(()) => {
                if self.editing_id == Some(id) {
                    self.reset_form();
                }
                self.notice = Some(USER_DELETED.to_owned());
                Some(self.issue_load())
            }
            Err(message) => {
                self.error = Some(message);
                None
            }
        }
    }

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter = query.into();
    }

    fn reset_form(&mut self) {
        self.form = UserDraft::default();
        self.editing_id = None;
    }

    fn clear_messages(&mut self) {
        self.error = None;
        self.notice = None;
    }
}
