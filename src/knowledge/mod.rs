//! Knowledge base for intent matching and runtime learning
//!
//! Loads intent records from a JSON corpus, matches user input against their
//! regex patterns, selects replies at random, and appends learned
//! question/answer pairs back to persistent storage.

pub mod record;
pub mod store;

pub use record::{IntentFile, IntentRecord};
pub use store::{KnowledgeBase, KnowledgeError, DEFAULT_TAG};
