pub mod event_router;
pub mod game_session;

pub use event_router::{EventHandler, EventRouter, RouteOutcome};
pub use game_session::{GameSession, PendingSubmission};
