//! Text rendering of the admin screen.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use models::User;

use crate::state::AdminState;

pub const EMPTY_LIST: &str = "No users found.";

pub fn users_table(users: &[&User]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Name", "Email", "Active"]);
    for user in users {
        table.add_row(vec![
            user.id.to_string(),
            user.full_name.clone(),
            user.email.clone(),
            if user.is_active { "yes" } else { "no" }.to_owned(),
        ]);
    }
    table
}

pub fn heading(state: &AdminState) -> String {
    match state.editing_id() {
        Some(id) => format!("Edit user #{id}"),
        None => "Create user".to_owned(),
    }
}

/// The whole screen: form heading, status line, then the user table.
///
/// With `color` off the output is plain text, suitable for pipes and tests.
pub fn screen(state: &AdminState, color: bool) -> String {
    let mut lines = vec![heading(state)];

    if let Some(error) = state.error() {
        lines.push(paint(error, color, |text| text.red().to_string()));
    }
    if let Some(notice) = state.notice() {
        lines.push(paint(notice, color, |text| text.green().to_string()));
    }
    if !state.filter().trim().is_empty() {
        lines.push(format!("Filter: {}", state.filter().trim()));
    }

    let visible = state.visible_users();
    if state.is_loading() {
        lines.push("Loading...".to_owned());
    } else if visible.is_empty() {
        lines.push(paint(EMPTY_LIST, color, |text| text.dimmed().to_string()));
    } else {
        lines.push(users_table(&visible).to_string());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn paint(text: &str, color: bool, style: impl Fn(&str) -> String) -> String {
    if color {
        style(text)
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Command;

    fn user(id: i64, full_name: &str, email: &str, is_active: bool) -> User {
        User {
            id,
            full_name: full_name.into(),
            email: email.into(),
            is_active,
        }
    }

    fn loaded(users: Vec<User>) -> AdminState {
        let mut state = AdminState::new();
        let Command::FetchUsers { seq } = state.begin_load() else {
            unreachable!()
        };
        state.finish_load(seq, Ok(users));
        state
    }

    #[test]
    fn table_lists_every_row() {
        let ann = user(1, "Ann", "a@x.com", true);
        let bo = user(2, "Bo", "b@y.com", false);
        let rendered = users_table(&[&ann, &bo]).to_string();

        for needle in ["ID", "Name", "Email", "Active", "Ann", "a@x.com", "b@y.com", "yes", "no"] {
            assert!(rendered.contains(needle), "missing {needle} in\n{rendered}");
        }
    }

    #[test]
    fn empty_list_shows_the_placeholder() {
        let screen = screen(&loaded(vec![]), false);
        assert!(screen.starts_with("Create user\n"));
        assert!(screen.contains(EMPTY_LIST));
    }

    #[test]
    fn filtered_screen_hides_other_rows() {
        let mut state = loaded(vec![
            user(1, "Ann", "a@x.com", true),
            user(2, "Bo", "b@y.com", true),
        ]);
        state.set_filter("b@y");
        let screen = screen(&state, false);
        assert!(screen.contains("Filter: b@y"));
        assert!(screen.contains("Bo"));
        assert!(!screen.contains("Ann"));
    }

    #[test]
    fn edit_mode_and_errors_are_visible() {
        let ann = user(1, "Ann", "a@x.com", true);
        let mut state = loaded(vec![ann.clone()]);
        state.edit(&ann);
        state.set_full_name("");
        state.submit();

        let screen = screen(&state, false);
        assert!(screen.starts_with("Edit user #1\n"));
        assert!(screen.contains("Full name is required."));
    }

    #[test]
    fn loading_replaces_the_table() {
        let mut state = loaded(vec![user(1, "Ann", "a@x.com", true)]);
        state.begin_load();
        let screen = screen(&state, false);
        assert!(screen.contains("Loading..."));
        assert!(!screen.contains("a@x.com"));
    }
}
