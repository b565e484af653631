//! The event multiplexer for the streaming path.
//!
//! Merges the recommendation list and the generation chunk stream into one
//! ordered event sequence: a single `recommendations` event, then `content`
//! events in chunk order, then at most one terminal event.

use futures_util::{Stream, StreamExt};

use crate::error::AppError;
use crate::provider::{GenChunk, GenStream};

use super::types::{Recommendation, StreamEvent};

enum MuxState {
    /// Nothing emitted yet. Holds the recommendation list and the outcome
    /// of acquiring the chunk stream.
    Start {
        recommendations: Vec<Recommendation>,
        source: Result<GenStream, AppError>,
    },
    /// Recommendations are out; the stream never materialized.
    Erroring { message: String },
    /// Recommendations are out; chunks are being relayed.
    Relaying { source: GenStream },
    Finished,
}

/// Build the event stream for one streaming turn.
///
/// `Finished` has no outgoing transition, so nothing can ever follow a
/// terminal event. A source that ends without its done marker ends the
/// event stream without a terminal; closing the channel is the transport's
/// job.
pub fn multiplex(
    recommendations: Vec<Recommendation>,
    source: Result<GenStream, AppError>,
) -> impl Stream<Item = StreamEvent> + Send {
    futures_util::stream::unfold(
        MuxState::Start {
            recommendations,
            source,
        },
        |state| async move {
            match state {
                MuxState::Start {
                    recommendations,
                    source,
                } => {
                    let next = match source {
                        Ok(stream) => MuxState::Relaying { source: stream },
                        Err(e) => MuxState::Erroring {
                            message: e.to_string(),
                        },
                    };
                    Some((StreamEvent::Recommendations(recommendations), next))
                }
                MuxState::Erroring { message } => {
                    Some((StreamEvent::Error(message), MuxState::Finished))
                }
                MuxState::Relaying { mut source } => match source.next().await {
                    Some(Ok(GenChunk::Content(text))) => {
                        Some((StreamEvent::Content(text), MuxState::Relaying { source }))
                    }
                    Some(Ok(GenChunk::Done)) => Some((StreamEvent::Done, MuxState::Finished)),
                    Some(Err(e)) => {
                        Some((StreamEvent::Error(e.to_string()), MuxState::Finished))
                    }
                    None => None,
                },
                MuxState::Finished => None,
            }
        },
    )
}
