pub mod fixtures;

use activedoc::{Session, StatementBuilder, Transport, TransportError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Transport that records every statement and replays queued responses.
/// Once the queue is empty it answers with an empty response.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub statements: Rc<RefCell<Vec<String>>>,
    responses: Rc<RefCell<VecDeque<Result<String, TransportError>>>>,
}

impl RecordingTransport {
    pub fn respond(&self, response: impl Into<String>) -> &Self {
        self.responses.borrow_mut().push_back(Ok(response.into()));
        self
    }

    pub fn fail(&self, error: TransportError) -> &Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    pub fn recorded(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, statement: &str) -> Result<String, TransportError> {
        self.statements.borrow_mut().push(statement.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

/// Statement builder that renders each call as a readable line.
pub struct EchoStatements;

impl StatementBuilder for EchoStatements {
    fn load(&self, uri: &str) -> String {
        format!("load {}", uri)
    }

    fn save(&self, uri: &str, xml: &str) -> String {
        format!("save {} {}", uri, xml)
    }

    fn delete(&self, uri: &str) -> String {
        format!("delete {}", uri)
    }

    fn find_by_word(&self, word: &str, root: Option<&str>, namespace: Option<&str>) -> String {
        format!(
            "find {} in {} ns {}",
            word,
            root.unwrap_or("*"),
            namespace.unwrap_or("-")
        )
    }

    fn search(&self, text: &str, start: usize, page_length: usize, options: &str) -> String {
        format!("search {} {} {} {}", text, start, page_length, options)
    }
}

pub fn session() -> (Session, RecordingTransport) {
    let transport = RecordingTransport::default();
    (Session::new(transport.clone(), EchoStatements), transport)
}
