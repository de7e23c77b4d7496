//! Literature-summary collaborator
//!
//! Full-text analysis is delegated to an external text-generation service
//! behind the [`LiteratureBackend`] trait. The analyzer frames the question,
//! preprocesses the document, and joins the backend call on a worker thread
//! with a timeout, so a stuck service surfaces as an error instead of
//! hanging the caller.

pub mod preprocess;

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::QueryError;

/// External text-generation service, modeled as a single call.
pub trait LiteratureBackend: Send + Sync {
    fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

/// How to frame the question against the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisType {
    General,
    Methodology,
    Results,
    Conclusions,
    Detailed,
}

impl AnalysisType {
    /// `General` passes the question through unchanged; the other flavours
    /// prepend a focus instruction.
    fn frame(self, question: &str) -> String {
        match self {
            AnalysisType::General => question.to_string(),
            AnalysisType::Methodology => format!(
                "Focus on the experimental methods of this publication: {}",
                question
            ),
            AnalysisType::Results => format!(
                "Focus on the experimental results of this publication: {}",
                question
            ),
            AnalysisType::Conclusions => format!(
                "Focus on the conclusions and their significance: {}",
                question
            ),
            AnalysisType::Detailed => format!(
                "Analyze this publication in detail, covering methods, results and conclusions: {}",
                question
            ),
        }
    }
}

pub struct LiteratureAnalyzer {
    backend: Arc<dyn LiteratureBackend>,
    timeout: Duration,
}

impl LiteratureAnalyzer {
    pub fn new(backend: Arc<dyn LiteratureBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Answer `question` from one document.
    pub fn summarize(
        &self,
        document: &str,
        question: &str,
        analysis: AnalysisType,
    ) -> Result<String, QueryError> {
        let content = preprocess::strip_trailing_sections(document);
        let prompt = format!(
            "Answer using only the text between the markers. State explicitly \
             when the document does not contain the answer.\n\n\
             --- document start ---\n{}\n--- document end ---\n\n\
             Question: {}",
            content,
            analysis.frame(question)
        );

        self.run(prompt)
    }

    /// Answer `question` across several documents. Requires at least two;
    /// each entry is `(label, full text)`.
    pub fn compare(
        &self,
        documents: &[(String, String)],
        question: &str,
    ) -> Result<String, QueryError> {
        if documents.len() < 2 {
            return Err(QueryError::BadInput(
                "at least two documents are required for a comparison".to_string(),
            ));
        }

        let mut sections = String::new();
        for (label, text) in documents {
            let content = preprocess::strip_trailing_sections(text);
            sections.push_str(&format!("--- document {} ---\n{}\n\n", label, content));
        }
        let prompt = format!(
            "Compare the following documents, highlighting differences and \
             similarities with data from the texts.\n\n{}\
             Comparison question: {}",
            sections, question
        );

        self.run(prompt)
    }

    fn run(&self, prompt: String) -> Result<String, QueryError> {
        let backend = Arc::clone(&self.backend);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(backend.generate(&prompt));
        });

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(err)) => Err(QueryError::CollaboratorFailed(format!("{:#}", err))),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(QueryError::CollaboratorTimeout {
                secs: self.timeout.as_secs(),
            }),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(QueryError::CollaboratorFailed(
                "worker terminated without a response".to_string(),
            )),
        }
    }
}
