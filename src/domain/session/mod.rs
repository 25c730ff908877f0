pub mod error;
pub mod service;
pub mod state;

pub use error::SessionError;
pub use service::SpeechSession;
pub use state::{FailureReason, RequestState, SessionDefaults, Selections};
