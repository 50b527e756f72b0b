use align_parser::ParseError;
use align_protocol::{AlignmentUpdate, CorpusDescriptor, LayoutConfig, SentenceRecord, SentenceRef};
use thiserror::Error;

use crate::session::Session;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown corpus '{0}'")]
    UnknownCorpus(String),
    #[error("no sentence {document_id}/{sentence_id} in corpus '{corpus}'")]
    UnknownSentence {
        corpus: String,
        document_id: String,
        sentence_id: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("store backend: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum WorkbenchError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("sentence could not be parsed: {0}")]
    Parse(#[from] ParseError),
    #[error("no corpus chosen")]
    NoCorpus,
    #[error("no sentence loaded")]
    NoSentence,
    #[error("sentence {requested} is out of range 1..={len}")]
    OutOfRange { requested: usize, len: usize },
    #[error("response for load #{ticket} arrived after load #{latest} was issued")]
    StaleResponse { ticket: u64, latest: u64 },
}

/// Backend holding corpora of sentence pairs.
pub trait SentenceStore {
    fn list_corpora(&self) -> Result<Vec<CorpusDescriptor>, StoreError>;

    /// Sentence addresses of a corpus in reading order.
    fn list_sentence_ids(&self, corpus: &str) -> Result<Vec<SentenceRef>, StoreError>;

    fn load_sentence(&self, corpus: &str, sentence: &SentenceRef) -> Result<SentenceRecord, StoreError>;

    fn save_sentence(
        &mut self,
        corpus: &str,
        sentence: &SentenceRef,
        update: &AlignmentUpdate,
    ) -> Result<(), StoreError>;
}

/// Handle for one in-flight sentence load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub seq: u64,
    /// 1-based position in the corpus.
    pub number: usize,
    pub corpus: String,
    pub sentence: SentenceRef,
}

/// Corpus navigation around a [`Session`].
///
/// Loads are sequenced: only the response to the most recently issued
/// [`LoadTicket`] is applied. Failed loads and saves leave the session as it was.
pub struct Workbench<S> {
    store: S,
    session: Session,
    corpus: Option<String>,
    sentences: Vec<SentenceRef>,
    current: Option<usize>,
    verified: bool,
    issued: u64,
}

impl<S: SentenceStore> Workbench<S> {
    pub fn new(store: S, layout: LayoutConfig) -> Self {
        Self {
            store,
            session: Session::new(layout),
            corpus: None,
            sentences: Vec::new(),
            current: None,
            verified: false,
            issued: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn corpus(&self) -> Option<&str> {
        self.corpus.as_deref()
    }

    pub fn sentences(&self) -> &[SentenceRef] {
        &self.sentences
    }

    /// 1-based number of the sentence on screen.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn verified(&self) -> bool {
        self.verified
    }

    pub fn set_verified(&mut self, verified: bool) {
        self.verified = verified;
    }

    pub fn corpora(&self) -> Result<Vec<CorpusDescriptor>, WorkbenchError> {
        self.store.list_corpora().map_err(|err| {
            tracing::warn!(%err, "failed to fetch the list of corpora");
            err.into()
        })
    }

    /// Switch corpus and show its first sentence.
    pub fn choose_corpus(&mut self, name: &str) -> Result<(), WorkbenchError> {
        let sentences = self.store.list_sentence_ids(name).map_err(|err| {
            tracing::warn!(corpus = name, %err, "failed to fetch sentence ids");
            WorkbenchError::from(err)
        })?;

        tracing::info!(corpus = name, sentences = sentences.len(), "corpus chosen");
        let previous = (
            self.corpus.replace(name.to_string()),
            std::mem::replace(&mut self.sentences, sentences),
            self.current.take(),
        );

        if self.sentences.is_empty() {
            self.session.reset();
            return Ok(());
        }
        // A failed first load keeps the previous corpus and sentence current.
        if let Err(err) = self.show_sentence(1) {
            (self.corpus, self.sentences, self.current) = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Issue a load for sentence `number` (1-based). Supersedes earlier tickets.
    pub fn begin_load(&mut self, number: usize) -> Result<LoadTicket, WorkbenchError> {
        let corpus = self.corpus.clone().ok_or(WorkbenchError::NoCorpus)?;
        let len = self.sentences.len();
        if number == 0 || number > len {
            return Err(WorkbenchError::OutOfRange { requested: number, len });
        }

        self.issued += 1;
        Ok(LoadTicket {
            seq: self.issued,
            number,
            corpus,
            sentence: self.sentences[number - 1].clone(),
        })
    }

    pub fn fetch(&self, ticket: &LoadTicket) -> Result<SentenceRecord, StoreError> {
        self.store.load_sentence(&ticket.corpus, &ticket.sentence)
    }

    /// Apply the response to a load. Stale or failed responses change nothing.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        response: Result<SentenceRecord, StoreError>,
    ) -> Result<(), WorkbenchError> {
        if ticket.seq != self.issued {
            tracing::warn!(ticket = ticket.seq, latest = self.issued, "discarding stale sentence response");
            return Err(WorkbenchError::StaleResponse {
                ticket: ticket.seq,
                latest: self.issued,
            });
        }

        let record = response.map_err(|err| {
            tracing::warn!(sentence = ticket.number, %err, "failed to fetch the sentence");
            WorkbenchError::from(err)
        })?;

        self.session
            .load(&record.source_parse, &record.target_parse, &record.alignment)
            .map_err(|err| {
                tracing::warn!(sentence = ticket.number, %err, "failed to parse the sentence");
                WorkbenchError::from(err)
            })?;

        self.current = Some(ticket.number);
        self.verified = record.verified;
        tracing::info!(
            corpus = %ticket.corpus,
            document = %ticket.sentence.document_id,
            sentence = %ticket.sentence.sentence_id,
            number = ticket.number,
            "sentence shown"
        );
        Ok(())
    }

    pub fn show_sentence(&mut self, number: usize) -> Result<(), WorkbenchError> {
        let ticket = self.begin_load(number)?;
        let response = self.fetch(&ticket);
        self.finish_load(ticket, response)
    }

    /// Move to the next sentence. `Ok(false)` at the end of the corpus.
    pub fn next_sentence(&mut self) -> Result<bool, WorkbenchError> {
        let current = self.current.ok_or(WorkbenchError::NoSentence)?;
        if current >= self.sentences.len() {
            return Ok(false);
        }
        self.show_sentence(current + 1).map(|_| true)
    }

    /// Move to the previous sentence. `Ok(false)` at the start of the corpus.
    pub fn prev_sentence(&mut self) -> Result<bool, WorkbenchError> {
        let current = self.current.ok_or(WorkbenchError::NoSentence)?;
        if current <= 1 {
            return Ok(false);
        }
        self.show_sentence(current - 1).map(|_| true)
    }

    /// Write the current alignment and verified flag back to the store.
    pub fn save(&mut self) -> Result<AlignmentUpdate, WorkbenchError> {
        let corpus = self.corpus.clone().ok_or(WorkbenchError::NoCorpus)?;
        let number = self.current.ok_or(WorkbenchError::NoSentence)?;
        let sentence = self.sentences.get(number - 1).cloned().ok_or(WorkbenchError::NoSentence)?;

        let update = AlignmentUpdate {
            alignment: self.session.encode_alignment(),
            verified: self.verified,
        };

        self.store.save_sentence(&corpus, &sentence, &update).map_err(|err| {
            tracing::warn!(sentence = number, %err, "failed to update data in the store");
            WorkbenchError::from(err)
        })?;

        tracing::info!(sentence = number, alignment = %update.alignment, verified = update.verified, "alignment saved");
        Ok(update)
    }
}
