//! Routes and the navigation host.
//!
//! ARCHITECTURE
//! ============
//! `Router` processes one navigation at a time: it applies route-record
//! redirects (`/` → `chat`), runs `guard::before_each`, and follows guard
//! redirects until a transition is allowed. The settled route becomes the
//! `from` of the next navigation.

pub mod guard;


use std::fmt;

use tracing::debug;

use crate::context::AppContext;

/// Upper bound on chained guard redirects for a single navigation.
pub const MAX_REDIRECTS: usize = 8;

// =============================================================================
// ROUTES
// =============================================================================

/// Named routing destinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteName {
    Root,
    Chat,
    Login,
    NotFound,
    ServerError,
}

impl RouteName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Chat => "chat",
            Self::Login => "login",
            Self::NotFound => "404",
            Self::ServerError => "500",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete location in the app.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Root,
    /// `/chat/:uuid?`
    Chat { uuid: Option<u64> },
    /// `/login` (invitation-code entry)
    Login,
    /// `/404`, and every unknown path
    NotFound,
    /// `/500`
    ServerError,
}

impl Route {
    /// Parse a path. Query strings and fragments are ignored; unknown paths
    /// map to [`Route::NotFound`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Root,
            ["chat"] => Self::Chat { uuid: None },
            ["chat", uuid] => uuid
                .parse()
                .map_or(Self::NotFound, |uuid| Self::Chat { uuid: Some(uuid) }),
            ["login"] => Self::Login,
            ["404"] => Self::NotFound,
            ["500"] => Self::ServerError,
            _ => Self::NotFound,
        }
    }

    #[must_use]
    pub fn name(&self) -> RouteName {
        match self {
            Self::Root => RouteName::Root,
            Self::Chat { .. } => RouteName::Chat,
            Self::Login => RouteName::Login,
            Self::NotFound => RouteName::NotFound,
            Self::ServerError => RouteName::ServerError,
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Root => "/".to_owned(),
            Self::Chat { uuid: None } => "/chat".to_owned(),
            Self::Chat { uuid: Some(uuid) } => format!("/chat/{uuid}"),
            Self::Login => "/login".to_owned(),
            Self::NotFound => "/404".to_owned(),
            Self::ServerError => "/500".to_owned(),
        }
    }

    /// Apply static route-record redirects.
    #[must_use]
    pub fn resolve_record(self) -> Self {
        match self {
            Self::Root => Self::Chat { uuid: None },
            other => other,
        }
    }
}

impl From<RouteName> for Route {
    fn from(name: RouteName) -> Self {
        match name {
            RouteName::Root => Self::Root,
            RouteName::Chat => Self::Chat { uuid: None },
            RouteName::Login => Self::Login,
            RouteName::NotFound => Self::NotFound,
            RouteName::ServerError => Self::ServerError,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// A guard's verdict on one transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Continue to the requested route unchanged.
    Proceed,
    /// Abandon the request and navigate here instead.
    Redirect(Route),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
    #[error("navigation to {target} exceeded the redirect limit")]
    RedirectLoop { target: String },
}

/// Navigation host tracking the current route.
#[derive(Debug, Clone)]
pub struct Router {
    current: Route,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// A router positioned at the start location `/`.
    #[must_use]
    pub fn new() -> Self {
        Self { current: Route::Root }
    }

    #[must_use]
    pub fn current(&self) -> &Route {
        &self.current
    }

    /// Navigate to `to`, running the guard on every hop, and return the route
    /// the navigation settled on.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::RedirectLoop`] if the guard keeps redirecting.
    pub async fn navigate(&mut self, ctx: &mut AppContext, to: Route) -> Result<Route, RouterError> {
        let mut target = to.resolve_record();
        for _ in 0..=MAX_REDIRECTS {
            match guard::before_each(ctx, &target, &self.current).await {
                Navigation::Proceed => {
                    debug!(from = %self.current, to = %target, "navigation settled");
                    self.current = target.clone();
                    return Ok(target);
                }
                Navigation::Redirect(next) => {
                    debug!(requested = %target, redirect = %next, "guard redirected navigation");
                    target = next.resolve_record();
                }
            }
        }
        Err(RouterError::RedirectLoop { target: target.path() })
    }

    /// Parse `path` and navigate to it.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::RedirectLoop`] if the guard keeps redirecting.
    pub async fn push(&mut self, ctx: &mut AppContext, path: &str) -> Result<Route, RouterError> {
        self.navigate(ctx, Route::parse(path)).await
    }
}
