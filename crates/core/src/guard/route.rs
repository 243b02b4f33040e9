pub const LOGIN_ROUTE: &str = "/admin/login";
pub const DASHBOARD_ROUTE: &str = "/admin/dashboard";

const PUBLIC_ONLY_ROUTES: [&str; 3] = [
    LOGIN_ROUTE,
    "/admin/forgot-password",
    "/admin/reset-password",
];

/// Admin route classes, as far as the guard is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Only reachable without a session (login, forgot/reset password)
    PublicOnly,
    /// Requires a session
    Protected,
}

impl RouteKind {
    pub fn classify(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let path = path.trim_end_matches('/');
        let public = PUBLIC_ONLY_ROUTES.iter().any(|route| {
            path == *route
                || path
                    .strip_prefix(route)
                    .is_some_and(|rest| rest.starts_with('/'))
        });
        if public {
            Self::PublicOnly
        } else {
            Self::Protected
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    To(&'static str),
}

impl Redirect {
    pub fn target(&self) -> &'static str {
        match self {
            Self::To(target) => target,
        }
    }
}
