//! Interactive prompts.
//!
//! Commands never read the terminal directly; they take a [`Prompter`] so
//! confirmation and credential prompts can be scripted in tests.

use crate::error::{Error, Result};

/// Source of interactive answers.
pub trait Prompter {
    /// Ask a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Prompt`] if no answer can be read.
    fn confirm(&mut self, question: &str) -> Result<bool>;

    /// Ask for a line of free text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Prompt`] if no answer can be read.
    fn input(&mut self, question: &str) -> Result<String>;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        dialoguer::Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(|e| Error::Prompt(e.to_string()))
    }

    fn input(&mut self, question: &str) -> Result<String> {
        dialoguer::Input::<String>::new()
            .with_prompt(question)
            .interact_text()
            .map(|s| s.trim().to_string())
            .map_err(|e| Error::Prompt(e.to_string()))
    }
}

#[cfg(test)]
/// Replays canned answers in order and records every question asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    confirms: std::collections::VecDeque<bool>,
    inputs: std::collections::VecDeque<String>,
    /// Every question asked so far, in order.
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an answer for the next `confirm` call.
    #[must_use]
    pub fn with_confirm(mut self, answer: bool) -> Self {
        self.confirms.push_back(answer);
        self
    }

    /// Queue an answer for the next `input` call.
    #[must_use]
    pub fn with_input(mut self, answer: impl Into<String>) -> Self {
        self.inputs.push_back(answer.into());
        self
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        self.asked.push(question.to_string());
        self.confirms
            .pop_front()
            .ok_or_else(|| Error::Prompt(format!("no scripted answer for: {question}")))
    }

    fn input(&mut self, question: &str) -> Result<String> {
        self.asked.push(question.to_string());
        self.inputs
            .pop_front()
            .ok_or_else(|| Error::Prompt(format!("no scripted answer for: {question}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_prompter_replays_in_order() {
        let mut prompter = ScriptedPrompter::new()
            .with_confirm(true)
            .with_confirm(false)
            .with_input("abc");

        assert!(prompter.confirm("first?").unwrap());
        assert!(!prompter.confirm("second?").unwrap());
        assert_eq!(prompter.input("key?").unwrap(), "abc");
        assert_eq!(prompter.asked, vec!["first?", "second?", "key?"]);
    }

    #[test]
    fn test_scripted_prompter_runs_dry() {
        let mut prompter = ScriptedPrompter::new();
        assert!(matches!(prompter.confirm("again?"), Err(Error::Prompt(_))));
    }
}
