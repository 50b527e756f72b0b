//! Sentence pairs and an in-memory store shared by the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;

use align_editor::{SentenceStore, StoreError};
use align_protocol::{AlignmentUpdate, CorpusDescriptor, SentenceRecord, SentenceRef};

pub const ENGLISH: &str = "# sent_id = n01001013\n\
# text = For those who follow social media transitions on Capitol Hill, this will be a little different.\n\
1\tFor\tfor\tADP\tIN\t_\t2\tcase\t2:case\t_\n\
2\tthose\tthose\tPRON\tDT\tNumber=Plur|PronType=Dem\t17\tobl\t4:nsubj|17:obl:for\t_\n\
3\twho\twho\tPRON\tWP\tPronType=Rel\t4\tnsubj\t2:ref\t_\n\
4\tfollow\tfollow\tVERB\tVBP\tMood=Ind|Tense=Pres|VerbForm=Fin\t2\tacl:relcl\t2:acl:relcl\t_\n\
5\tsocial\tsocial\tADJ\tJJ\tDegree=Pos\t6\tamod\t6:amod\t_\n\
6\tmedia\tmedia\tNOUN\tNN\tNumber=Sing\t7\tcompound\t7:compound\t_\n\
7\ttransitions\ttransition\tNOUN\tNNS\tNumber=Plur\t4\tobj\t4:obj\t_\n\
8\ton\ton\tADP\tIN\t_\t10\tcase\t10:case\t_\n\
9\tCapitol\tcapitol\tPROPN\tNN\tNumber=Sing\t10\tcompound\t10:compound\t_\n\
10\tHill\thill\tPROPN\tNN\tNumber=Sing\t7\tnmod\t7:nmod:on\tSpaceAfter=No\n\
11\t,\t,\tPUNCT\t,\t_\t17\tpunct\t17:punct\t_\n\
12\tthis\tthis\tPRON\tDT\tNumber=Sing|PronType=Dem\t17\tnsubj\t17:nsubj\t_\n\
13\twill\twill\tAUX\tMD\tVerbForm=Fin\t17\taux\t17:aux\t_\n\
14\tbe\tbe\tAUX\tVB\tVerbForm=Inf\t17\tcop\t17:cop\t_\n\
15\ta\ta\tDET\tDT\tDefinite=Ind|PronType=Art\t16\tdet\t16:det\t_\n\
16\tlittle\tlittle\tADJ\tJJ\tDegree=Pos\t17\tobl:npmod\t17:obl:npmod\t_\n\
17\tdifferent\tdifferent\tADJ\tJJ\tDegree=Pos\t0\troot\t0:root\tSpaceAfter=No\n\
18\t.\t.\tPUNCT\t.\t_\t17\tpunct\t17:punct\t_";

pub const RUSSIAN: &str = "# sent_id = n01001013\n\
# text = Для тех, кто следит за передачей всех материалов, появившихся в социальных сетях о Конгрессе, это будет происходить несколько по-другому.\n\
# text_en = For those who follow social media transitions on Capitol Hill, this will be a little different.\n\
1\tДля\t_\tADP\tIN\t_\t2\tcase\t_\t_\n\
2\tтех\t_\tDET\tDT\tAnimacy=Anim|Case=Gen|Number=Plur\t20\tobl\t_\tSpaceAfter=No\n\
3\t,\t_\tPUNCT\t,\t_\t5\tpunct\t_\t_\n\
4\tкто\t_\tPRON\tWP\tAnimacy=Anim|Case=Nom|Gender=Masc\t5\tnsubj\t_\t_\n\
5\tследит\t_\tVERB\tVBC\tAspect=Imp|Mood=Ind|Number=Sing|Person=3|Tense=Pres\t2\tacl:relcl\t_\t_\n\
6\tза\t_\tADP\tIN\t_\t7\tcase\t_\t_\n\
7\tпередачей\t_\tNOUN\tNN\tAnimacy=Inan|Case=Ins|Gender=Fem|Number=Sing|Person=3\t5\tobl\t_\t_\n\
8\tвсех\t_\tDET\tDT\tAnimacy=Inan|Case=Gen|Number=Plur\t9\tdet\t_\t_\n\
9\tматериалов\t_\tNOUN\tNN\tAnimacy=Inan|Case=Gen|Gender=Masc|Number=Plur|Person=3\t7\tnmod\t_\tSpaceAfter=No\n\
10\t,\t_\tPUNCT\t,\t_\t11\tpunct\t_\t_\n\
11\tпоявившихся\t_\tVERB\tVBN\tAnimacy=Inan|Aspect=Perf|Case=Gen|Number=Plur|Tense=Past|Variant=Long|VerbForm=Part|Voice=Act\t9\tamod\t_\t_\n\
12\tв\t_\tADP\tIN\t_\t14\tcase\t_\t_\n\
13\tсоциальных\t_\tADJ\tJJ\tAnimacy=Inan|Number=Plur|Variant=Long\t14\tamod\t_\t_\n\
14\tсетях\t_\tNOUN\tNN\tAnimacy=Inan|Gender=Fem|Number=Plur|Person=3\t11\tobl\t_\t_\n\
15\tо\t_\tADP\tIN\t_\t16\tcase\t_\t_\n\
16\tКонгрессе\t_\tPROPN\tNN\tAnimacy=Inan|Gender=Masc|Number=Sing|Person=3\t11\tobl\t_\tSpaceAfter=No\n\
17\t,\t_\tPUNCT\t,\t_\t5\tpunct\t_\t_\n\
18\tэто\t_\tPRON\tDT\tAnimacy=Inan|Case=Nom|Gender=Neut|Number=Sing\t20\tnsubj\t_\t_\n\
19\tбудет\t_\tVERB\tVBC\tAspect=Imp|Mood=Ind|Number=Sing|Person=3|Tense=Fut\t20\taux\t_\t_\n\
20\tпроисходить\t_\tVERB\tVB\tAspect=Imp\t0\troot\t_\t_\n\
21\tнесколько\t_\tADV\tRB\t_\t22\tadvmod\t_\t_\n\
22\tпо-другому\t_\tADV\tRB\t_\t20\tadvmod\t_\tSpaceAfter=No\n\
23\t.\t_\tPUNCT\t.\t_\t20\tpunct\t_\t_";

pub fn tiny_block(forms: &[&str]) -> String {
    forms
        .iter()
        .enumerate()
        .map(|(i, form)| format!("{}\t{form}\t_\t_\t_\t_\t0\troot\t_\t_", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    pub corpora: BTreeMap<String, Vec<(SentenceRef, SentenceRecord)>>,
    pub saves: Vec<(String, SentenceRef, AlignmentUpdate)>,
    pub fail_loads: bool,
    pub fail_saves: bool,
}

impl MemoryStore {
    pub fn with_corpus(name: &str, records: Vec<(SentenceRef, SentenceRecord)>) -> Self {
        let mut store = Self::default();
        store.corpora.insert(name.to_string(), records);
        store
    }

    fn rows(&self, corpus: &str) -> Result<&Vec<(SentenceRef, SentenceRecord)>, StoreError> {
        self.corpora
            .get(corpus)
            .ok_or_else(|| StoreError::UnknownCorpus(corpus.to_string()))
    }
}

impl SentenceStore for MemoryStore {
    fn list_corpora(&self) -> Result<Vec<CorpusDescriptor>, StoreError> {
        Ok(self
            .corpora
            .keys()
            .map(|name| CorpusDescriptor { name: name.clone() })
            .collect())
    }

    fn list_sentence_ids(&self, corpus: &str) -> Result<Vec<SentenceRef>, StoreError> {
        Ok(self.rows(corpus)?.iter().map(|(id, _)| id.clone()).collect())
    }

    fn load_sentence(&self, corpus: &str, sentence: &SentenceRef) -> Result<SentenceRecord, StoreError> {
        if self.fail_loads {
            return Err(StoreError::Backend("connection refused".to_string()));
        }
        self.rows(corpus)?
            .iter()
            .find(|(id, _)| id == sentence)
            .map(|(_, record)| record.clone())
            .ok_or_else(|| StoreError::UnknownSentence {
                corpus: corpus.to_string(),
                document_id: sentence.document_id.clone(),
                sentence_id: sentence.sentence_id.clone(),
            })
    }

    fn save_sentence(
        &mut self,
        corpus: &str,
        sentence: &SentenceRef,
        update: &AlignmentUpdate,
    ) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Backend("connection refused".to_string()));
        }
        let rows = self
            .corpora
            .get_mut(corpus)
            .ok_or_else(|| StoreError::UnknownCorpus(corpus.to_string()))?;
        if let Some((_, record)) = rows.iter_mut().find(|(id, _)| id == sentence) {
            record.alignment = update.alignment.clone();
            record.verified = update.verified;
        }
        self.saves.push((corpus.to_string(), sentence.clone(), update.clone()));
        Ok(())
    }
}
