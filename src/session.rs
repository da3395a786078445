//! The caller-owned context that reaches the document store.
//!
//! A [`Session`] pairs a [`Transport`], which ships a statement to the store
//! and returns its raw response, with a [`StatementBuilder`], which writes
//! the statements. Neither is interpreted here.

use crate::config::DomainConfig;
use crate::document::Document;
use crate::error::{ActiveDocError, TransportError};
use activedoc_dom::Tree;
use activedoc_search::SearchOptions;

pub trait Transport {
    fn execute(&self, statement: &str) -> Result<String, TransportError>;
}

/// Produces the statement text for each store operation.
pub trait StatementBuilder {
    fn load(&self, uri: &str) -> String;
    fn save(&self, uri: &str, xml: &str) -> String;
    fn delete(&self, uri: &str) -> String;
    fn find_by_word(&self, word: &str, root: Option<&str>, namespace: Option<&str>) -> String;
    fn search(&self, text: &str, start: usize, page_length: usize, options: &str) -> String;
}

pub struct Session {
    transport: Box<dyn Transport>,
    statements: Box<dyn StatementBuilder>,
}

impl Session {
    pub fn new(
        transport: impl Transport + 'static,
        statements: impl StatementBuilder + 'static,
    ) -> Self {
        Self {
            transport: Box::new(transport),
            statements: Box::new(statements),
        }
    }

    pub fn statements(&self) -> &dyn StatementBuilder {
        self.statements.as_ref()
    }

    pub fn execute(&self, statement: &str) -> Result<String, ActiveDocError> {
        log::debug!("Executing statement ({} bytes)", statement.len());
        let response = self.transport.execute(statement)?;
        log::trace!("Response: {}", response);
        Ok(response)
    }

    pub fn load(&self, uri: &str, config: &DomainConfig) -> Result<Document, ActiveDocError> {
        Document::load(self, uri, config)
    }

    /// Finds the documents of `config`'s root type containing `word`. The
    /// response may hold any number of concatenated documents.
    pub fn find_by_word(
        &self,
        word: &str,
        config: &DomainConfig,
    ) -> Result<Vec<Document>, ActiveDocError> {
        let namespace = config.root_namespace();
        let statement =
            self.statements
                .find_by_word(word, config.root.as_deref(), namespace.as_deref());
        let response = self.execute(&statement)?;
        let documents: Vec<Document> = split_documents(&response)?
            .into_iter()
            .map(|tree| Document::from_tree(tree, config))
            .collect();
        log::info!("'{}' found {} document(s)", word, documents.len());
        Ok(documents)
    }

    /// Runs a search with compiled `options` and returns the raw response.
    pub fn search(
        &self,
        text: &str,
        options: &SearchOptions,
        start: usize,
        page_length: usize,
    ) -> Result<Document, ActiveDocError> {
        let options = options.serialize()?;
        let statement = self.statements.search(text, start, page_length, &options);
        let response = self.execute(&statement)?;
        Document::parse(&response)
    }
}

/// Splits a response of zero or more concatenated documents into one tree
/// per top-level element. XML declarations are dropped.
fn split_documents(response: &str) -> Result<Vec<Tree>, ActiveDocError> {
    let mut body = String::with_capacity(response.len() + 16);
    let mut rest = response;
    while let Some(start) = rest.find("<?xml") {
        body.push_str(&rest[..start]);
        match rest[start..].find("?>") {
            Some(end) => rest = &rest[start + end + 2..],
            None => {
                rest = "";
                break;
            }
        }
    }
    body.push_str(rest);

    let wrapped = Tree::parse(&format!("<results>{}</results>", body))?;
    let Some(results) = wrapped.root_element() else {
        return Ok(Vec::new());
    };
    Ok(wrapped
        .children(results)
        .iter()
        .filter(|&&id| wrapped.element(id).is_some())
        .map(|&id| {
            let mut tree = Tree::new();
            let top = tree.root();
            tree.copy_subtree(&wrapped, id, top);
            tree
        })
        .collect())
}
