// Test doubles shared by the integration tests: a scripted operator and a
// simulated platform.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::io;

use tempfile::TempDir;

use vkban_cli::api::{ApiRequest, Transport};
use vkban_cli::config::{BanCatalog, ConfigDocument, ConfigStore, DurationEntry, DurationKind, Group};
use vkban_cli::error::ApiError;
use vkban_cli::ui::Prompter;

/// Answers prompts from a fixed script and records everything said.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub prompts: Vec<String>,
    pub output: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        ScriptedPrompter {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }

    fn next(&mut self, prompt: &str) -> io::Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.next(prompt)
    }

    fn ask_line(&mut self, prompt: &str) -> io::Result<String> {
        self.next(prompt)
    }

    fn say(&mut self, message: &str) {
        self.output.push(message.to_string());
    }
}

/// Replays canned response bodies and records every request.
#[derive(Default)]
pub struct FakePlatform {
    bodies: RefCell<VecDeque<String>>,
    pub requests: RefCell<Vec<ApiRequest>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, body: impl Into<String>) -> Self {
        self.bodies.borrow_mut().push_back(body.into());
        self
    }

    pub fn reply_times(self, times: usize, body: &str) -> Self {
        (0..times).fold(self, |platform, _| platform.reply(body))
    }

    pub fn calls(&self, method: &str) -> Vec<ApiRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method)
            .cloned()
            .collect()
    }
}

impl Transport for FakePlatform {
    fn execute(&self, request: &ApiRequest) -> Result<String, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        self.bodies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ApiError::Transport("no canned response left".into()))
    }
}

pub fn error_body(code: i64, message: &str) -> String {
    format!(r#"{{"error":{{"error_code":{code},"error_msg":"{message}","request_params":[]}}}}"#)
}

pub fn rate_limited() -> String {
    error_body(6, "Too many requests per second")
}

pub const JOHN_DOE: &str = r#"{"response":[{"id":42,"first_name":"John","last_name":"Doe","is_closed":false,"can_access_closed":true}]}"#;

pub const BAN_OK: &str = r#"{"response":1}"#;

/// Separated document: one community, one reason, one week-long duration.
pub fn week_document() -> ConfigDocument {
    ConfigDocument {
        access_token: "token".into(),
        groups: vec![Group {
            name: "Cats".into(),
            id: "100".into(),
        }],
        bans: BanCatalog::Separated {
            ban_reasons: vec!["spam".into()],
            ban_durations: vec![DurationEntry {
                title: "Week".into(),
                duration: 604_800,
                kind: DurationKind::Fixed,
            }],
        },
    }
}

/// Store rooted in a fresh temporary directory, holding `document`.
pub fn store_with(document: &ConfigDocument) -> (TempDir, ConfigStore) {
    let dir = tempfile::tempdir().unwrap();
    let pointer = dir.path().join("path.txt");
    fs::write(&pointer, format!("{}/", dir.path().display())).unwrap();
    let store = ConfigStore::new(pointer);
    store.save(document).unwrap();
    (dir, store)
}
