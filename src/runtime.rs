//! Runtime for executing form conversations
//!
//! Wires the pure state machine to its collaborators: the session store,
//! the record store and the chat gateway.

mod engine;
mod locks;
mod session_store;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use engine::FormEngine;
pub use session_store::MemorySessionStore;
pub use traits::*;

use crate::gateway::discord::DiscordGateway;

/// Type alias for the production engine with concrete implementations
pub type ProductionEngine = FormEngine<MemorySessionStore, DatabaseStorage, DiscordGateway>;
