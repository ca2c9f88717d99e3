//! Client-side search over the loaded user list. Never touches the network.

use models::User;

/// Users whose name, email, or id contains `query`, ignoring case.
///
/// A blank query selects everyone; order is preserved.
pub fn filter_users<'a>(users: &'a [User], query: &str) -> Vec<&'a User> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return users.iter().collect();
    }
    users.iter().filter(|user| matches(user, &needle)).collect()
}

fn matches(user: &User, needle: &str) -> bool {
    user.full_name.to_lowercase().contains(needle)
        || user.email.to_lowercase().contains(needle)
        || user.id.to_string().contains(needle)
}
