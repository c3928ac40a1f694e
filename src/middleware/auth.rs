// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session guard middleware.

use crate::session::{evaluate, GuardVerdict, RequestSession};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

/// Gate every request through the session guard.
///
/// Public paths pass untouched. Protected paths either get the parsed
/// [`crate::session::Session`] inserted as a request extension or are
/// answered with a `303 See Other` to the login page.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let verdict = {
        let session = RequestSession::new(request.headers(), &state.mirror);
        evaluate(request.uri().path(), request.uri().query(), &session)
    };

    match verdict {
        GuardVerdict::Public => next.run(request).await,
        GuardVerdict::Render(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        GuardVerdict::Redirect(target) => Redirect::to(&target).into_response(),
    }
}
