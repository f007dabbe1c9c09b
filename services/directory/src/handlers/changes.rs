use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use tokio::sync::broadcast::error::RecvError;

use crate::identity::Identity;
use crate::state::AppState;

// ── GET /changes ─────────────────────────────────────────────────────────────

/// Server-sent change events. Dashboards refetch whatever collection an
/// event names instead of polling. Lagged subscribers skip ahead; the
/// client's next refetch heals the gap.
pub async fn get_changes(
    _identity: Identity,
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.feed.subscribe();
    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(change) => {
                    let Ok(event) = Event::default().event("change").json_data(&change) else {
                        continue;
                    };
                    return Some((Ok(event), rx));
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
