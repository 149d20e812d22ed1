//! Fakes shared by the unit tests.

use std::collections::{HashMap, VecDeque};

use crate::error::DecompileError;
use crate::prompt::Prompter;
use crate::runner::{CommandOutput, Invocation, Runner};

/// Records every invocation. Programs answer with scripted outputs keyed by
/// file stem, or succeed with empty output once their script runs out.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    responses: HashMap<String, VecDeque<CommandOutput>>,
    pub invocations: Vec<Invocation>,
}

impl RecordingRunner {
    pub fn respond(&mut self, program: &str, code: i32, stdout: &str, stderr: &str) {
        self.responses
            .entry(program.to_string())
            .or_default()
            .push_back(CommandOutput {
                code: Some(code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            });
    }

    /// Command lines with the program reduced to its file stem.
    pub fn commands(&self) -> Vec<String> {
        self.invocations
            .iter()
            .map(|invocation| {
                std::iter::once(program_name(invocation))
                    .chain(
                        invocation
                            .args()
                            .iter()
                            .map(|arg| arg.to_string_lossy().into_owned()),
                    )
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

fn program_name(invocation: &Invocation) -> String {
    invocation
        .program()
        .file_stem()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl Runner for RecordingRunner {
    fn spawn(&mut self, invocation: &Invocation) -> Result<CommandOutput, DecompileError> {
        self.invocations.push(invocation.clone());
        let output = self
            .responses
            .get_mut(&program_name(invocation))
            .and_then(VecDeque::pop_front)
            .unwrap_or(CommandOutput {
                code: Some(0),
                ..CommandOutput::default()
            });
        Ok(output)
    }
}

/// Replays answers in order; `None` stands for an interrupt.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Option<String>>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<'a>(answers: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        Self {
            answers: answers
                .into_iter()
                .map(|answer| answer.map(str::to_string))
                .collect(),
            asked: Vec::new(),
        }
    }

    pub fn questions(&self) -> &[String] {
        &self.asked
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> Result<Option<String>, DecompileError> {
        self.asked.push(question.to_string());
        let answer = self
            .answers
            .pop_front()
            .unwrap_or_else(|| panic!("no scripted answer for {question:?}"));
        Ok(answer.map(|answer| answer.trim().to_string()))
    }
}
