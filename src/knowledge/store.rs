//! Knowledge store - corpus loading, pattern lookup, and runtime learning.
//!
//! The store is loaded once at startup, mutated by `learn`, and written back
//! only by an explicit `persist` call. A missing or undecodable corpus file
//! degrades to an empty store with a warning; it never takes the process down.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use regex::{Regex, RegexBuilder};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::record::{IntentFile, IntentRecord};

/// Tag assigned to records learned without an explicit tag.
pub const DEFAULT_TAG: &str = "new";

/// Failures the knowledge store can report.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The corpus file does not exist. Recovered at load time with an empty
    /// store.
    #[error("intents file not found: {0}")]
    NotFound(PathBuf),

    /// The corpus file exists but is not a valid intents document. Recovered
    /// at load time with an empty store.
    #[error("intents file {path} could not be decoded")]
    CorruptData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The corpus file could not be read for a reason other than absence
    /// (e.g. permissions). Not recovered; surfaced to the caller.
    #[error("failed to read intents file {path}")]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The corpus file could not be written. In-memory state is untouched
    /// and persist may be retried.
    #[error("failed to write intents file {path}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// In-memory intent store backed by a JSON corpus file.
///
/// Records are identified by position only. `learn` mutates memory and sets
/// the dirty flag; callers decide when to `persist`. Dropping the store
/// without persisting discards unsaved learning.
pub struct KnowledgeBase {
    path: PathBuf,
    intents: Vec<IntentRecord>,
    /// Compiled case-insensitive patterns, parallel to `intents`. A pattern
    /// that fails to compile is `None` and can never match.
    compiled: Vec<Vec<Option<Regex>>>,
    /// Set by `learn`, cleared by a successful `persist`.
    dirty: bool,
    /// When true, newly learned questions are stored regex-escaped so
    /// metacharacters in user input match literally on later lookups.
    escape_learned: bool,
    rng: StdRng,
}

impl KnowledgeBase {
    /// Load the corpus at `path`, or start empty if it is missing or corrupt.
    ///
    /// Only an unexpected read failure (e.g. permission denied) is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, KnowledgeError> {
        Self::load_with_rng(path, StdRng::from_os_rng())
    }

    /// Load with a caller-supplied RNG for reply selection. Seed it for
    /// deterministic behavior in tests.
    pub fn load_with_rng(path: impl Into<PathBuf>, rng: StdRng) -> Result<Self, KnowledgeError> {
        let path = path.into();
        let records = match read_corpus(&path) {
            Ok(records) => records,
            Err(KnowledgeError::NotFound(_)) => {
                warn!(
                    "Intents file {} not found, starting with an empty corpus",
                    path.display()
                );
                Vec::new()
            }
            Err(KnowledgeError::CorruptData { source, .. }) => {
                warn!(
                    "Failed to decode intents file {}: {}. Starting with an empty corpus",
                    path.display(),
                    source
                );
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let mut kb = Self {
            path,
            intents: Vec::new(),
            compiled: Vec::new(),
            dirty: false,
            escape_learned: false,
            rng,
        };

        for record in records {
            // Quarantine structurally inert records instead of carrying
            // patterns that can never be consulted.
            if record.patterns.is_empty() {
                warn!("Skipping intent '{}': no patterns", record.tag);
                continue;
            }
            kb.push_record(record);
        }

        info!(
            "Loaded {} intent records from {}",
            kb.intents.len(),
            kb.path.display()
        );
        Ok(kb)
    }

    /// Store newly learned questions regex-escaped. Off by default: learned
    /// text becomes a live regex on later lookups, matching the historical
    /// corpus behavior.
    pub fn with_escaped_patterns(mut self, escape: bool) -> Self {
        self.escape_learned = escape;
        self
    }

    /// Write the full record set back to the corpus file.
    ///
    /// The document is written to a temp file and renamed into place, so a
    /// failed write never clobbers the existing corpus.
    pub fn persist(&mut self) -> Result<(), KnowledgeError> {
        let doc = IntentFile {
            intents: self.intents.clone(),
        };
        let json = serde_json::to_string_pretty(&doc).map_err(|e| KnowledgeError::WriteFailure {
            path: self.path.clone(),
            source: std::io::Error::other(e),
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| KnowledgeError::WriteFailure {
                    path: self.path.clone(),
                    source: e,
                })?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| KnowledgeError::WriteFailure {
            path: self.path.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| KnowledgeError::WriteFailure {
            path: self.path.clone(),
            source: e,
        })?;

        self.dirty = false;
        debug!(
            "Persisted {} intent records to {}",
            self.intents.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Find a reply for `query`, if any intent matches.
    ///
    /// Records are scanned in stored order; the first record with at least
    /// one pattern matching anywhere in the query (case-insensitive regex
    /// search) wins, and one of its replies is chosen at random. `None` is
    /// the normal no-match outcome, not an error.
    pub fn lookup(&mut self, query: &str) -> Option<String> {
        for (record, patterns) in self.intents.iter().zip(&self.compiled) {
            if patterns.iter().flatten().any(|re| re.is_match(query)) {
                let reply = record.replies.choose(&mut self.rng).cloned();
                if reply.is_none() {
                    warn!("Intent '{}' matched but has no replies", record.tag);
                }
                return reply;
            }
        }
        None
    }

    /// Record a question/answer pair.
    ///
    /// If `query` equals an existing pattern string (literal comparison,
    /// ignoring case — not a regex match), the answer is appended to that
    /// record's replies; duplicates are allowed. Otherwise a new
    /// single-pattern record is created with `tag` (default "new").
    ///
    /// Mutates in-memory state only; call [`persist`](Self::persist) to make
    /// the change durable.
    pub fn learn(&mut self, query: &str, answer: &str, tag: Option<&str>) {
        let query_lower = query.to_lowercase();
        if let Some(record) = self
            .intents
            .iter_mut()
            .find(|r| r.patterns.iter().any(|p| p.to_lowercase() == query_lower))
        {
            record.replies.push(answer.to_string());
            debug!("Appended reply to intent '{}'", record.tag);
            self.dirty = true;
            return;
        }

        let pattern = if self.escape_learned {
            regex::escape(query)
        } else {
            query.to_string()
        };
        let record = IntentRecord::new(tag.unwrap_or(DEFAULT_TAG), pattern, answer);
        debug!("Learned new intent '{}' for '{}'", record.tag, query);
        self.push_record(record);
        self.dirty = true;
    }

    /// Whether in-memory state has changed since the last successful persist.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Corpus file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, in stored order.
    pub fn records(&self) -> &[IntentRecord] {
        &self.intents
    }

    /// Number of intent records.
    pub fn len(&self) -> usize {
        self.intents.len()
    }

    /// True if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    fn push_record(&mut self, record: IntentRecord) {
        self.compiled.push(compile_patterns(&record));
        self.intents.push(record);
    }
}

/// Read and decode the corpus document, classifying failures.
fn read_corpus(path: &Path) -> Result<Vec<IntentRecord>, KnowledgeError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(KnowledgeError::NotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(KnowledgeError::ReadFailure {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let file: IntentFile =
        serde_json::from_str(&contents).map_err(|e| KnowledgeError::CorruptData {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(file.intents)
}

/// Compile a record's patterns case-insensitively. Unusable patterns are
/// logged once here and skipped at lookup time.
fn compile_patterns(record: &IntentRecord) -> Vec<Option<Regex>> {
    record
        .patterns
        .iter()
        .map(|p| match RegexBuilder::new(p).case_insensitive(true).build() {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(
                    "Ignoring unusable pattern '{}' in intent '{}': {}",
                    p, record.tag, e
                );
                None
            }
        })
        .collect()
}
