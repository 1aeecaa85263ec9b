//! CLI interface for knowbot

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::chat::ChatSession;
use crate::config::{self, Config};
use crate::knowledge::KnowledgeBase;

#[derive(Parser)]
#[command(name = "knowbot")]
#[command(about = "Pattern-matching chat agent that learns new answers at runtime", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the intents corpus (overrides the configured location)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session (default when no command given)
    Chat,
    /// Ask a single question and print the reply
    Ask {
        /// Question text to match against the corpus
        question: String,
    },
    /// Teach a question/answer pair without starting a session
    Teach {
        /// Question text (stored as a pattern)
        question: String,
        /// Reply to give when the question matches
        answer: String,
        /// Tag recorded on a newly created intent
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Show corpus statistics
    Stats,
    /// Configure the agent
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
        /// Set the corpus location
        #[arg(long)]
        set_intents_path: Option<String>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Chat) => run_chat(cli.file),
        Some(Commands::Ask { question }) => run_ask(cli.file, &question),
        Some(Commands::Teach {
            question,
            answer,
            tag,
        }) => run_teach(cli.file, &question, &answer, tag.as_deref()),
        Some(Commands::Stats) => run_stats(cli.file),
        Some(Commands::Config {
            show,
            reset,
            set_intents_path,
        }) => run_config(show, reset, set_intents_path),
    }
}

/// Open the store at the CLI override path or the configured location.
fn open_store(file: Option<PathBuf>, config: &Config) -> Result<KnowledgeBase> {
    let path = match file {
        Some(path) => path,
        None => config.intents_path()?,
    };
    let kb = KnowledgeBase::load(path)?.with_escaped_patterns(config.learning.escape_patterns);
    Ok(kb)
}

fn run_chat(file: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let kb = open_store(file, &config)?;
    ChatSession::new(kb, config).run()
}

fn run_ask(file: Option<PathBuf>, question: &str) -> Result<()> {
    let config = Config::load()?;
    let mut kb = open_store(file, &config)?;

    match kb.lookup(question) {
        Some(reply) => println!("{}", reply),
        None => println!("{}", config.chat.unknown_prompt),
    }
    Ok(())
}

fn run_teach(
    file: Option<PathBuf>,
    question: &str,
    answer: &str,
    tag: Option<&str>,
) -> Result<()> {
    let config = Config::load()?;
    let mut kb = open_store(file, &config)?;

    let before = kb.len();
    kb.learn(question, answer, tag);
    kb.persist()?;

    if kb.len() > before {
        println!("Learned new intent for '{}'.", question);
    } else {
        println!("Added another reply for '{}'.", question);
    }
    Ok(())
}

fn run_stats(file: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let kb = open_store(file, &config)?;

    let patterns: usize = kb.records().iter().map(|r| r.patterns.len()).sum();
    let replies: usize = kb.records().iter().map(|r| r.reply_count()).sum();

    println!("Corpus: {}", kb.path().display());
    println!("  intents:  {}", kb.len());
    println!("  patterns: {}", patterns);
    println!("  replies:  {}", replies);
    Ok(())
}

fn run_config(show: bool, reset: bool, set_intents_path: Option<String>) -> Result<()> {
    if reset {
        config::reset_config()?;
    }
    let set = set_intents_path.is_some();
    if let Some(path) = set_intents_path {
        config::set_intents_path(&path)?;
    }
    if show || (!reset && !set) {
        config::show_config()?;
    }
    Ok(())
}
