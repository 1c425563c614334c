//! Route table and guards.

use std::fmt;

use crate::user::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    ForgotPassword,
    ResetPassword { token: Option<String> },
    Dashboard,
    Kanban,
    NotFound(String),
}

impl Route {
    /// Parse a path such as `/kanban` or `/reset-password?token=abc`.
    pub fn parse(path: &str) -> Self {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/forgot-password" => Self::ForgotPassword,
            "/reset-password" => Self::ResetPassword {
                token: query.and_then(|q| query_param(q, "token")),
            },
            "/dashboard" => Self::Dashboard,
            "/kanban" => Self::Kanban,
            _ => Self::NotFound(path.to_string()),
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Kanban)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("/"),
            Self::Login => f.write_str("/login"),
            Self::Register => f.write_str("/register"),
            Self::ForgotPassword => f.write_str("/forgot-password"),
            Self::ResetPassword { token: Some(token) } => write!(f, "/reset-password?token={token}"),
            Self::ResetPassword { token: None } => f.write_str("/reset-password"),
            Self::Dashboard => f.write_str("/dashboard"),
            Self::Kanban => f.write_str("/kanban"),
            Self::NotFound(path) => f.write_str(path),
        }
    }
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

/// What is actually shown for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Home,
    Login,
    Register,
    ForgotPassword,
    ResetPassword { token: Option<String> },
    Dashboard,
    AdminDashboard,
    UserDashboard,
    NotFound(String),
}

/// Apply the guards. `role` is `None` when nobody is signed in.
pub fn resolve(route: &Route, role: Option<Role>) -> Screen {
    match (route, role) {
        (Route::Login | Route::Register, Some(_)) => Screen::Dashboard,
        (Route::Home, _) => Screen::Home,
        (Route::Login, None) => Screen::Login,
        (Route::Register, None) => Screen::Register,
        (Route::ForgotPassword, _) => Screen::ForgotPassword,
        (Route::ResetPassword { token }, _) => Screen::ResetPassword {
            token: token.clone(),
        },
        (Route::Dashboard, Some(_)) => Screen::Dashboard,
        (Route::Kanban, Some(Role::Admin)) => Screen::AdminDashboard,
        (Route::Kanban, Some(Role::User)) => Screen::UserDashboard,
        (Route::NotFound(path), _) => Screen::NotFound(path.clone()),
        (Route::Dashboard | Route::Kanban, None) => Screen::Login,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/kanban/"), Route::Kanban);
        assert_eq!(
            Route::parse("/reset-password?token=abc"),
            Route::ResetPassword {
                token: Some("abc".into())
            }
        );
        assert_eq!(Route::parse("/nope"), Route::NotFound("/nope".into()));
    }

    #[test]
    fn test_protected_routes_redirect_to_login() {
        assert!(Route::Kanban.is_protected());
        assert!(!Route::ForgotPassword.is_protected());
        assert_eq!(resolve(&Route::Kanban, None), Screen::Login);
        assert_eq!(resolve(&Route::Dashboard, None), Screen::Login);
    }

    #[test]
    fn test_signed_in_users_skip_login() {
        assert_eq!(resolve(&Route::Login, Some(Role::User)), Screen::Dashboard);
        assert_eq!(resolve(&Route::Register, Some(Role::Admin)), Screen::Dashboard);
    }

    #[test]
    fn test_kanban_picks_dashboard_by_role() {
        assert_eq!(resolve(&Route::Kanban, Some(Role::Admin)), Screen::AdminDashboard);
        assert_eq!(resolve(&Route::Kanban, Some(Role::User)), Screen::UserDashboard);
    }

    #[test]
    fn test_display_round_trips_path() {
        let route = Route::ResetPassword {
            token: Some("t1".into()),
        };
        assert_eq!(Route::parse(&route.to_string()), route);
    }
}
