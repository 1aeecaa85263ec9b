//! Interactive chat session
//!
//! Thin I/O wrapper around the knowledge base: reads user input, prints the
//! matched reply, and on a miss solicits an answer from the user and feeds it
//! back into the store. All matching and learning semantics live in
//! [`KnowledgeBase`]; this module only decides when to call it and when to
//! persist.

use anyhow::Result;
use crossterm::execute;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io;
use tracing::warn;

use crate::config::Config;
use crate::knowledge::KnowledgeBase;

/// Interactive session state
pub struct ChatSession {
    kb: KnowledgeBase,
    config: Config,
}

impl ChatSession {
    pub fn new(kb: KnowledgeBase, config: Config) -> Self {
        Self { kb, config }
    }

    /// Run the read/answer/learn loop until an exit command or EOF.
    pub fn run(&mut self) -> Result<()> {
        print_bot(&self.config.chat.greeting);

        let mut rl = DefaultEditor::new()?;

        loop {
            let readline = rl.readline("\x1b[32m❯\x1b[0m ");

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if self.config.is_exit_command(input) {
                        self.flush();
                        print_bot(&self.config.chat.farewell);
                        break;
                    }

                    match self.kb.lookup(input) {
                        Some(reply) => print_bot(&reply),
                        None => self.solicit_answer(&mut rl, input)?,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    self.flush();
                    print_bot(&self.config.chat.farewell);
                    break;
                }
                Err(err) => {
                    print_error(&format!("✗ Error: {}", err));
                    break;
                }
            }
        }

        Ok(())
    }

    /// Ask the user what the reply should have been and learn it.
    fn solicit_answer(&mut self, rl: &mut DefaultEditor, question: &str) -> Result<()> {
        print_bot(&self.config.chat.unknown_prompt);

        match rl.readline("\x1b[33m❯ (answer)\x1b[0m ") {
            Ok(answer) => {
                let answer = answer.trim();
                if answer.is_empty() {
                    print_dim("Nothing learned.");
                    return Ok(());
                }
                self.kb
                    .learn(question, answer, Some(&self.config.learning.default_tag));
                self.flush();
                print_bot(&self.config.chat.learned_ack);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                print_dim("Nothing learned.");
            }
            Err(err) => return Err(err.into()),
        }

        Ok(())
    }

    /// Persist pending learning. A write failure is reported and the session
    /// continues; the in-memory store stays valid and the save is retried on
    /// the next mutation or at exit.
    fn flush(&mut self) {
        if !self.kb.is_dirty() {
            return;
        }
        if let Err(e) = self.kb.persist() {
            warn!("Could not persist intents: {}", e);
            print_error(&format!("✗ Could not save learned answers: {}", e));
        }
    }
}

/// Print colored output
fn print_colored(text: &str, color: Color) {
    let _ = execute!(
        io::stdout(),
        SetForegroundColor(color),
        Print(text),
        Print("\n"),
        ResetColor
    );
}

fn print_bot(text: &str) {
    print_colored(&format!("Bot: {}", text), Color::Cyan);
}

fn print_dim(text: &str) {
    print_colored(text, Color::DarkGrey);
}

fn print_error(text: &str) {
    print_colored(text, Color::Red);
}
