//! Runs the commands the state machine asks for against a [`UsersApi`].

use crate::api::{ApiError, UsersApi};
use crate::state::{AdminState, Command};

/// Owns the screen state and the API, and executes each action to
/// completion before returning, so no two calls are ever in flight.
pub struct Controller<A> {
    api: A,
    state: AdminState,
}

impl<A: UsersApi> Controller<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: AdminState::new(),
        }
    }

    pub fn state(&self) -> &AdminState {
        &self.state
    }

    /// Direct access for transitions that need no backend call: form input,
    /// filter, cancel.
    pub fn state_mut(&mut self) -> &mut AdminState {
        &mut self.state
    }

    pub async fn load(&mut self) {
        let command = self.state.begin_load();
        self.run(command).await;
    }

    pub async fn submit(&mut self) {
        if let Some(command) = self.state.submit() {
            self.run(command).await;
        }
    }

    /// Put the loaded user `id` into the form. Returns `false` when no such
    /// user is in the current list.
    pub fn edit(&mut self, id: i64) -> bool {
        let Some(user) = self.state.user(id).cloned() else {
            return false;
        };
        self.state.edit(&user);
        true
    }

    pub async fn delete(&mut self, id: i64) {
        let command = self.state.request_delete(id);
        self.run(command).await;
    }

    /// Execute `command` and every follow-up it produces.
    pub async fn run(&mut self, command: Command) {
        let mut next = Some(command);
        while let Some(command) = next.take() {
            tracing::debug!(?command, "dispatching");
            next = self.execute(command).await;
        }
    }

    async fn execute(&mut self, command: Command) -> Option<Command> {
        match command {
            Command::FetchUsers { seq } => {
                let result = self.api.list().await.map_err(describe);
                self.state.finish_load(seq, result);
                None
            }
            Command::Create { draft } => {
                let result = self.api.create(&draft).await.map_err(describe);
                self.state.finish_save(result)
            }
            Command::Update { id, draft } => {
                let result = self.api.update(id, &draft).await.map_err(describe);
                self.state.finish_save(result)
            }
            Command::Delete { id } => {
                let result = self.api.delete(id).await.map_err(describe);
                self.state.finish_delete(id, result)
            }
        }
    }
}

fn describe(error: ApiError) -> String {
    tracing::debug!(%error, "users api call failed");
    error.to_string()
}
