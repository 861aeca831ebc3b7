//! Route table and the auth guard in front of protected pages.

use crate::auth::{AuthPhase, AuthState};

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Requires an authenticated user.
    Protected,
}

/// One entry of the route table.
///
/// Adding a page = one `RouteDef` in `ROUTES`. Segments starting with `:`
/// match any single non-empty path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDef {
    pub pattern: &'static str,
    pub title: &'static str,
    pub access: Access,
}

pub const ROUTES: &[RouteDef] = &[
    RouteDef { pattern: "/", title: "Home", access: Access::Public },
    RouteDef { pattern: "/features", title: "Features", access: Access::Public },
    RouteDef { pattern: "/pricing", title: "Pricing", access: Access::Public },
    RouteDef { pattern: "/about", title: "About", access: Access::Public },
    RouteDef { pattern: "/login", title: "Login", access: Access::Public },
    RouteDef { pattern: "/register", title: "Sign Up", access: Access::Public },
    RouteDef { pattern: "/forgot-password", title: "Reset Password", access: Access::Public },
    RouteDef { pattern: "/dashboard", title: "Dashboard", access: Access::Protected },
    RouteDef { pattern: "/galleries", title: "My Galleries", access: Access::Protected },
    RouteDef { pattern: "/galleries/:id", title: "Gallery View", access: Access::Protected },
    RouteDef { pattern: "/upload", title: "Upload Photos", access: Access::Protected },
    RouteDef { pattern: "/shared", title: "Shared with Me", access: Access::Protected },
    RouteDef { pattern: "/settings", title: "Settings", access: Access::Protected },
    RouteDef { pattern: "/profile", title: "User Profile", access: Access::Protected },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Render(&'static RouteDef),
    /// Session bootstrap is still pending.
    Loading,
    Redirect(&'static str),
}

impl RouteDef {
    pub fn matches(&self, path: &str) -> bool {
        let mut pattern = segments(self.pattern);
        let mut actual = segments(path);
        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return true,
                (Some(p), Some(a)) if p.starts_with(':') || p == a => {}
                _ => return false,
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Look up the route for `path`. Query string and fragment are ignored.
pub fn resolve(path: &str) -> Option<&'static RouteDef> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    ROUTES.iter().find(|route| route.matches(path))
}

/// Decide what to show for `path` given the current auth state.
pub fn guard(path: &str, auth: &AuthState) -> RouteDecision {
    let Some(route) = resolve(path) else {
        tracing::debug!(path, "Unknown route");
        return RouteDecision::Redirect(HOME_PATH);
    };

    match (route.access, auth.phase()) {
        (Access::Public, _) | (Access::Protected, AuthPhase::Authenticated) => {
            RouteDecision::Render(route)
        }
        (Access::Protected, AuthPhase::Loading) => RouteDecision::Loading,
        (Access::Protected, AuthPhase::Anonymous) => RouteDecision::Redirect(LOGIN_PATH),
    }
}
