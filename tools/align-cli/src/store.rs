use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use align_editor::{SentenceStore, StoreError};
use align_protocol::{AlignmentUpdate, CorpusDescriptor, SentenceRecord, SentenceRef};
use serde::{Deserialize, Serialize};

/// One stored sentence pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSentence {
    pub document_id: String,
    pub sentence_id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub alignment: String,
    #[serde(default)]
    pub verified: bool,
}

impl StoredSentence {
    fn key(&self) -> SentenceRef {
        SentenceRef::new(self.document_id.clone(), self.sentence_id.clone())
    }

    fn is(&self, sentence: &SentenceRef) -> bool {
        self.document_id == sentence.document_id && self.sentence_id == sentence.sentence_id
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreFile {
    pub corpora: BTreeMap<String, Vec<StoredSentence>>,
}

/// Sentence store kept in a single JSON file. Every save rewrites the file.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    data: StoreFile,
}

impl JsonStore {
    /// Open a store file; a missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str(&text).map_err(|e| StoreError::Backend(e.to_string()))?
        } else {
            StoreFile::default()
        };
        Ok(Self { path, data })
    }

    /// Replace (or create) a corpus.
    pub fn put_corpus(&mut self, name: &str, sentences: Vec<StoredSentence>) {
        self.data.corpora.insert(name.to_string(), sentences);
    }

    pub fn persist(&self) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(&self.data).map_err(|e| StoreError::Backend(e.to_string()))?;
        fs::write(&self.path, text)?;
        Ok(())
    }

    fn corpus(&self, name: &str) -> Result<&Vec<StoredSentence>, StoreError> {
        self.data
            .corpora
            .get(name)
            .ok_or_else(|| StoreError::UnknownCorpus(name.to_string()))
    }
}

fn unknown_sentence(corpus: &str, sentence: &SentenceRef) -> StoreError {
    StoreError::UnknownSentence {
        corpus: corpus.to_string(),
        document_id: sentence.document_id.clone(),
        sentence_id: sentence.sentence_id.clone(),
    }
}

impl SentenceStore for JsonStore {
    fn list_corpora(&self) -> Result<Vec<CorpusDescriptor>, StoreError> {
        Ok(self
            .data
            .corpora
            .keys()
            .map(|name| CorpusDescriptor { name: name.clone() })
            .collect())
    }

    fn list_sentence_ids(&self, corpus: &str) -> Result<Vec<SentenceRef>, StoreError> {
        Ok(self.corpus(corpus)?.iter().map(StoredSentence::key).collect())
    }

    fn load_sentence(&self, corpus: &str, sentence: &SentenceRef) -> Result<SentenceRecord, StoreError> {
        let stored = self
            .corpus(corpus)?
            .iter()
            .find(|s| s.is(sentence))
            .ok_or_else(|| unknown_sentence(corpus, sentence))?;

        Ok(SentenceRecord {
            source_parse: stored.source.clone(),
            target_parse: stored.target.clone(),
            alignment: stored.alignment.clone(),
            verified: stored.verified,
        })
    }

    fn save_sentence(
        &mut self,
        corpus: &str,
        sentence: &SentenceRef,
        update: &AlignmentUpdate,
    ) -> Result<(), StoreError> {
        let stored = self
            .data
            .corpora
            .get_mut(corpus)
            .ok_or_else(|| StoreError::UnknownCorpus(corpus.to_string()))?
            .iter_mut()
            .find(|s| s.is(sentence))
            .ok_or_else(|| unknown_sentence(corpus, sentence))?;

        stored.alignment = update.alignment.clone();
        stored.verified = update.verified;
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(id: &str) -> StoredSentence {
        StoredSentence {
            document_id: "d1".to_string(),
            sentence_id: id.to_string(),
            source: "1\ta\t_\t_\t_\t_\t0\troot\t_\t_".to_string(),
            target: "1\tx\t_\t_\t_\t_\t0\troot\t_\t_".to_string(),
            alignment: String::new(),
            verified: false,
        }
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("store.json")).unwrap();
        assert!(store.list_corpora().unwrap().is_empty());
        assert!(matches!(store.list_sentence_ids("x"), Err(StoreError::UnknownCorpus(_))));
    }

    #[test]
    fn test_save_persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store = JsonStore::open(&path).unwrap();
        store.put_corpus("en_ru", vec![sentence("s1"), sentence("s2")]);
        store.persist().unwrap();

        let key = SentenceRef::new("d1", "s2");
        let update = AlignmentUpdate {
            alignment: "0-0".to_string(),
            verified: true,
        };
        store.save_sentence("en_ru", &key, &update).unwrap();

        let reopened = JsonStore::open(&path).unwrap();
        let record = reopened.load_sentence("en_ru", &key).unwrap();
        assert_eq!(record.alignment, "0-0");
        assert!(record.verified);
        assert_eq!(
            reopened.list_sentence_ids("en_ru").unwrap(),
            vec![SentenceRef::new("d1", "s1"), key]
        );
    }

    #[test]
    fn test_unknown_sentence() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(dir.path().join("store.json")).unwrap();
        store.put_corpus("c", vec![sentence("s1")]);

        let err = store.load_sentence("c", &SentenceRef::new("d1", "s9")).unwrap_err();
        assert_eq!(err.to_string(), "no sentence d1/s9 in corpus 'c'");
    }

    #[test]
    fn test_corrupt_file_is_backend_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(JsonStore::open(&path), Err(StoreError::Backend(_))));
    }
}
