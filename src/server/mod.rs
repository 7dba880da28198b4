//! WebSocket front end: wire envelopes, per-connection sessions and the
//! axum router.

pub mod messages;
pub mod scorecard;
pub mod session;
pub mod ws;

pub use messages::{ClientMessage, QuestionPayload, ServerMessage};
pub use scorecard::Scorecard;
pub use session::SessionHandler;
pub use ws::{router, serve};
