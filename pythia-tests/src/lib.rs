//! Test support for the pythia workspace: a scripted knowledge source
//! that answers from a fixed query → pods table, so the differential
//! cases can run end-to-end without the network.

use std::collections::HashMap;

use pythia_client::{ClientError, ClientResult, KnowledgeSource, Pod, QueryResult, Subpod};

/// A [`KnowledgeSource`] that replays prepared answers.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    answers: HashMap<String, QueryResult>,
}

impl ScriptedSource {
    /// Create an empty source (every query fails)
    pub fn new() -> Self {
        Self::default()
    }

    /// Script an answer: `pods` is a list of (pod title, subpod
    /// plaintexts) entries.
    pub fn answer(mut self, query: &str, pods: &[(&str, &[&str])]) -> Self {
        self.answers.insert(query.to_string(), build_result(pods));
        self
    }
}

impl KnowledgeSource for ScriptedSource {
    fn search(&self, query: &str) -> ClientResult<QueryResult> {
        self.answers
            .get(query)
            .cloned()
            .ok_or_else(|| ClientError::QueryFailed(query.to_string()))
    }
}

/// Build a decoded answer from (pod title, subpod plaintexts) entries.
pub fn build_result(pods: &[(&str, &[&str])]) -> QueryResult {
    QueryResult {
        success: true,
        pods: pods
            .iter()
            .map(|(title, texts)| Pod {
                title: title.to_string(),
                subpods: texts
                    .iter()
                    .map(|text| Subpod {
                        title: String::new(),
                        plaintext: text.to_string(),
                    })
                    .collect(),
            })
            .collect(),
    }
}
