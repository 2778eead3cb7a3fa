//! Navigation guard: the single policy gate in front of every transition.
//!
//! The session status is fetched on the first pass only. A failed fetch
//! leaves it unset, so the next navigation tries again; it is never retried
//! within one pass.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use tracing::{debug, warn};

use super::{Navigation, Route, RouteName};
use crate::context::AppContext;

/// Destination for a freshly fetched session.
#[must_use]
pub fn route_for(auth_required: bool, has_token: bool) -> RouteName {
    if auth_required && !has_token {
        RouteName::Login
    } else {
        RouteName::Chat
    }
}

/// Decide the outcome of a transition from `from` to `to`.
///
/// Never fails: a session fetch error becomes a redirect to `500`, or a plain
/// proceed when `to` already is `500`.
pub async fn before_each(ctx: &mut AppContext, to: &Route, from: &Route) -> Navigation {
    ctx.app.set_sider_collapsed(true);

    if ctx.auth.session().is_some() {
        return Navigation::Proceed;
    }

    match ctx.auth.get_session().await {
        Ok(session) => {
            let destination = route_for(session.auth_required, ctx.auth.has_token());
            debug!(
                %from,
                %to,
                auth_required = session.auth_required,
                has_token = ctx.auth.has_token(),
                %destination,
                "session resolved"
            );
            Navigation::Redirect(destination.into())
        }
        Err(e) if *to == Route::ServerError => {
            warn!(error = %e, code = e.error_code(), "session fetch failed on error route; proceeding");
            Navigation::Proceed
        }
        Err(e) => {
            warn!(error = %e, code = e.error_code(), %to, "session fetch failed; redirecting to error route");
            Navigation::Redirect(Route::ServerError)
        }
    }
}
