//! Server-Sent Events (SSE) for dashboard updates.
//!
//! Streams [`DomainEvent`]s so open admin views can refresh the affected
//! list without polling.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
    extract::State,
};
use futures::stream::{self, Stream};
use lisan_core::DomainEvent;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::{extractors::AuthUser, middleware::AppState};

/// Domain event stream for authenticated users.
async fn event_stream(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        result.ok().map(|event: DomainEvent| {
            Ok(Event::default()
                .json_data(&event)
                .unwrap_or_else(|_| Event::default().data("error")))
        })
    });

    let initial = stream::once(async { Ok(Event::default().event("connected").data("ok")) });

    Sse::new(initial.chain(stream)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}

/// Create SSE router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(event_stream))
}
