//! Story session state and the turn orchestration that drives it.

pub mod prompt;
pub mod scene;
pub mod session;
pub mod transcript;
pub mod turn;

pub use scene::{ParsedScene, parse};
pub use session::SessionRegistry;
pub use transcript::Transcript;
pub use turn::{AssetFailure, AssetKind, Orchestrator, TurnError, TurnResult};
