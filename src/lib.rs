//! Knowbot - Pattern-Matching Chat Agent Library
//!
//! A small conversational agent with:
//! - Regex intent matching over a JSON corpus
//! - Random reply selection from the matched intent
//! - Runtime learning of new question/answer pairs
//! - Explicit persistence that degrades gracefully on a missing or corrupt corpus
//!
//! # Example
//!
//! ```ignore
//! use knowbot::knowledge::KnowledgeBase;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut kb = KnowledgeBase::load("intents.json")?;
//!     if let Some(reply) = kb.lookup("hello there") {
//!         println!("{}", reply);
//!     } else {
//!         kb.learn("hello there", "Hi!", None);
//!         kb.persist()?;
//!     }
//!     Ok(())
//! }
//! ```

// Core modules
pub mod knowledge;
pub mod config;

// Interface modules
pub mod chat;
pub mod cli;

// Re-export commonly used types for convenience
pub use knowledge::{IntentRecord, KnowledgeBase, KnowledgeError};

pub use config::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library info
pub fn info() -> String {
    format!("{} v{} - Pattern-Matching Chat Agent Library", NAME, VERSION)
}
