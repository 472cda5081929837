//! User list renderer
//!
//! Pure functions from user records to a rendered view. Every untrusted
//! field passes through `escape_markup` before it reaches the view; the
//! rendered output never contains a raw `& < > " '` from an API field.

use crate::client::User;

/// Placeholder shown when the API returns no users
pub const EMPTY_USERS_PLACEHOLDER: &str = "No users found. Create your first user!";

/// Badge shown on every card
pub const ACTIVE_BADGE: &str = "Active";

/// A single rendered user card. All user-supplied fields are escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCard {
    pub name: String,
    pub email: String,
    /// Formatted creation timestamp
    pub created: String,
    pub badge: &'static str,
    /// Identifier footer
    pub id: String,
}

/// Rendered view of the users collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserListView {
    /// The empty-state placeholder
    Empty,
    /// One card per user record
    Cards(Vec<UserCard>),
}

impl UserListView {
    /// Total count shown next to the list
    pub fn total(&self) -> usize {
        match self {
            UserListView::Empty => 0,
            UserListView::Cards(cards) => cards.len(),
        }
    }
}

/// Render user records into a view, replacing any prior rendering
pub fn render_users(users: &[User]) -> UserListView {
    if users.is_empty() {
        return UserListView::Empty;
    }

    let cards = users
        .iter()
        .map(|user| UserCard {
            name: escape_markup(&user.name),
            email: escape_markup(&user.email),
            created: format_created_at(user.created_at.as_deref()),
            badge: ACTIVE_BADGE,
            id: escape_markup(&user.id),
        })
        .collect();

    UserListView::Cards(cards)
}

/// Escape text against markup injection.
/// All five of `& < > " '` are replaced, never a subset.
pub fn escape_markup(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Format a creation timestamp as month abbreviation, numeric day, numeric
/// year, hour:minute. Accepts RFC 3339 and naive ISO-8601; anything else
/// (including a missing value) renders as "unknown".
pub fn format_created_at(raw: Option<&str>) -> String {
    const FORMAT: &str = "%b %-d, %Y %H:%M";

    let Some(raw) = raw else {
        return "unknown".to_string();
    };

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return dt.format(FORMAT).to_string();
    }
    // The create endpoint emits naive ISO-8601 with fractional seconds
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(FORMAT).to_string();
    }

    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, name: &str, email: &str, created_at: Option<&str>) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: created_at.map(str::to_string),
        }
    }

    #[test]
    fn test_empty_list_renders_placeholder() {
        let view = render_users(&[]);
        assert_eq!(view, UserListView::Empty);
        assert_eq!(view.total(), 0);
    }

    #[test]
    fn test_one_card_per_record() {
        let users: Vec<User> = (0..4)
            .map(|i| {
                user(
                    &i.to_string(),
                    &format!("User {i}"),
                    &format!("u{i}@example.com"),
                    Some("2024-01-01T00:00:00Z"),
                )
            })
            .collect();

        let view = render_users(&users);
        assert_eq!(view.total(), 4);
        match view {
            UserListView::Cards(cards) => {
                assert_eq!(cards.len(), 4);
                assert_eq!(cards[2].name, "User 2");
                assert_eq!(cards[2].badge, "Active");
            }
            UserListView::Empty => panic!("expected cards"),
        }
    }

    #[test]
    fn test_escapes_ampersand_in_name() {
        let view = render_users(&[user(
            "1",
            "A&B",
            "a@b.com",
            Some("2024-01-01T00:00:00Z"),
        )]);

        let UserListView::Cards(cards) = view else {
            panic!("expected cards");
        };
        assert_eq!(cards[0].name, "A&amp;B");
        assert_eq!(cards[0].created, "Jan 1, 2024 00:00");
    }

    #[test]
    fn test_escapes_all_five_characters() {
        let escaped = escape_markup(r#"<script>&"'"#);
        assert_eq!(escaped, "&lt;script&gt;&amp;&quot;&#039;");

        for raw in ['&', '<', '>', '"', '\''] {
            assert!(!escape_markup(&raw.to_string()).contains(raw));
        }
    }

    #[test]
    fn test_escapes_every_untrusted_field() {
        let view = render_users(&[user("<id>", "<b>bold</b>", "\"x\"@y.com", None)]);

        let UserListView::Cards(cards) = view else {
            panic!("expected cards");
        };
        assert_eq!(cards[0].name, "&lt;b&gt;bold&lt;/b&gt;");
        assert_eq!(cards[0].email, "&quot;x&quot;@y.com");
        assert_eq!(cards[0].id, "&lt;id&gt;");
    }

    #[test]
    fn test_timestamp_accepts_naive_iso8601() {
        assert_eq!(
            format_created_at(Some("2024-03-05T14:30:00.123456")),
            "Mar 5, 2024 14:30"
        );
    }

    #[test]
    fn test_timestamp_fallback() {
        assert_eq!(format_created_at(None), "unknown");
        assert_eq!(format_created_at(Some("not a date")), "unknown");
    }
}
