use std::fmt::Display;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::route::{Redirect, RouteKind, DASHBOARD_ROUTE, LOGIN_ROUTE};
use crate::session::{AdminProfile, SessionContext};

/// How long the session lookup may hang before a manual logout is offered
pub const FORCE_LOGOUT_AFTER: Duration = Duration::from_secs(5);

/// Why the guard settled on unauthenticated. Every cause redirects to login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnauthenticatedCause {
    NoSession,
    FetchFailed(String),
    LoggedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Authenticated(AdminProfile),
    Unauthenticated(UnauthenticatedCause),
}

/// Route-level gate for the admin back-office
#[derive(Debug, Clone)]
pub struct AdminGuard {
    path: String,
    state: GuardState,
    loading_since: Instant,
    force_logout_after: Duration,
}

impl AdminGuard {
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_timeout(path, FORCE_LOGOUT_AFTER)
    }

    pub fn with_timeout(path: impl Into<String>, force_logout_after: Duration) -> Self {
        Self {
            path: path.into(),
            state: GuardState::Loading,
            loading_since: Instant::now(),
            force_logout_after,
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn route_kind(&self) -> RouteKind {
        RouteKind::classify(&self.path)
    }

    pub fn admin(&self) -> Option<&AdminProfile> {
        match &self.state {
            GuardState::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }

    /// Restart the lookup, e.g. after a login
    pub fn reload(&mut self) {
        self.state = GuardState::Loading;
        self.loading_since = Instant::now();
    }

    /// Feed the outcome of the "current admin" query.
    ///
    /// Any failure counts as unauthenticated.
    pub fn on_session_loaded<E: Display>(
        &mut self,
        outcome: Result<Option<AdminProfile>, E>,
    ) -> Option<Redirect> {
        self.state = match outcome {
            Ok(Some(profile)) => {
                debug!("Admin session resolved for {}", profile.email);
                GuardState::Authenticated(profile)
            }
            Ok(None) => GuardState::Unauthenticated(UnauthenticatedCause::NoSession),
            Err(err) => {
                warn!("Admin session lookup failed: {}", err);
                GuardState::Unauthenticated(UnauthenticatedCause::FetchFailed(err.to_string()))
            }
        };
        self.redirect()
    }

    /// Move to another route and re-evaluate
    pub fn navigate(&mut self, path: impl Into<String>) -> Option<Redirect> {
        self.path = path.into();
        self.redirect()
    }

    /// Redirect required for the current state and route, if any
    pub fn redirect(&self) -> Option<Redirect> {
        match (&self.state, self.route_kind()) {
            (GuardState::Authenticated(_), RouteKind::PublicOnly) => {
                Some(Redirect::To(DASHBOARD_ROUTE))
            }
            (GuardState::Unauthenticated(_), RouteKind::Protected) => {
                Some(Redirect::To(LOGIN_ROUTE))
            }
            _ => None,
        }
    }

    /// Whether the route content may render now
    pub fn should_render(&self) -> bool {
        !matches!(self.state, GuardState::Loading) && self.redirect().is_none()
    }

    pub fn can_force_logout(&self, now: Instant) -> bool {
        matches!(self.state, GuardState::Loading)
            && now.saturating_duration_since(self.loading_since) >= self.force_logout_after
    }

    /// Clear the local session without waiting for the server
    pub async fn force_logout(&mut self, session: &SessionContext) -> Option<Redirect> {
        session.clear().await;
        info!("Forced local logout on {}", self.path);
        self.state = GuardState::Unauthenticated(UnauthenticatedCause::LoggedOut);
        self.redirect()
    }
}
