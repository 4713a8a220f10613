//! # Templates de Features
//!
//! A sequência ordenada de processadores usada por um modelo, descrita em
//! texto com um processador por linha:
//!
//! ```text
//! # nome janela argumentos...
//! Form 2
//! RawLemmaCapitalization 1
//! BrownClusters 2 clusters.txt 4 6 10
//! URLEmailDetector 0 url email
//! ```
//!
//! Os templates são donos do contador de features. A feature `0` é a feature
//! onipresente, emitida em todo token; os processadores alocam a partir de `1`.

use std::io::BufRead;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::codec::{BinaryDecoder, BinaryEncoder};
use crate::entity::{EntityMap, NamedEntity};
use crate::errors::{NerError, Result};
use crate::processor::{FeatureProcessor, NerFeature};
use crate::sentence::NerSentence;

/// Feature presente em todos os tokens.
pub const OMNIPRESENT_FEATURE: NerFeature = 0;

#[derive(Debug, Clone)]
pub struct FeatureTemplates {
    processors: Vec<FeatureProcessor>,
    total_features: NerFeature,
}

impl Default for FeatureTemplates {
    fn default() -> Self {
        Self {
            processors: Vec::new(),
            total_features: OMNIPRESENT_FEATURE + 1,
        }
    }
}

impl FeatureTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lê a descrição textual e configura cada processador, em ordem.
    ///
    /// Linhas vazias e linhas começando com `#` são ignoradas. Erros de
    /// configuração de um processador são propagados sem alteração.
    pub fn parse<R: BufRead>(reader: R, entities: &mut EntityMap) -> Result<Self> {
        let mut templates = Self::default();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = line_no + 1;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split(' ').collect();
            let [name, window, args @ ..] = fields.as_slice() else {
                return Err(NerError::InvalidTemplate {
                    line: line_no,
                    msg: format!("expected 'name window [args...]', got '{line}'"),
                });
            };
            let window: i32 = window.parse().map_err(|_| NerError::InvalidTemplate {
                line: line_no,
                msg: format!("window '{window}' of processor {name} is not an integer"),
            })?;
            let Some(mut processor) = FeatureProcessor::create(name) else {
                return Err(NerError::InvalidTemplate {
                    line: line_no,
                    msg: format!("unknown feature processor '{name}'"),
                });
            };

            let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
            processor.parse(window, &args, entities, &mut templates.total_features)?;
            templates.processors.push(processor);
        }

        info!(
            processors = templates.processors.len(),
            total_features = templates.total_features,
            "parsed feature templates"
        );
        Ok(templates)
    }

    /// Limite superior (exclusivo) dos ids de feature alocados até agora.
    pub fn total_features(&self) -> NerFeature {
        self.total_features
    }

    pub fn processors(&self) -> &[FeatureProcessor] {
        &self.processors
    }

    /// Substitui as features de `sentence` pela onipresente seguida das
    /// features de cada processador.
    pub fn process_sentence(&self, sentence: &mut NerSentence, buffer: &mut String) {
        start_sentence(sentence);
        for processor in &self.processors {
            processor.process_sentence(sentence, buffer);
        }
    }

    /// Como [`process_sentence`](Self::process_sentence), mas chaves ainda não
    /// vistas ganham ids novos. Usado no treino.
    pub fn process_sentence_adding(&mut self, sentence: &mut NerSentence, buffer: &mut String) {
        start_sentence(sentence);
        for processor in &mut self.processors {
            processor.process_sentence_adding(sentence, &mut self.total_features, buffer);
        }
    }

    /// Processa um lote de sentenças em paralelo, uma sentença por tarefa.
    pub fn process_sentences(&self, sentences: &mut [NerSentence]) {
        sentences
            .par_iter_mut()
            .for_each_init(String::new, |buffer, sentence| {
                self.process_sentence(sentence, buffer)
            });
    }

    pub fn process_entities(
        &self,
        sentence: &NerSentence,
        entities: &mut Vec<NamedEntity>,
        buffer: &mut Vec<NamedEntity>,
    ) {
        for processor in &self.processors {
            processor.process_entities(sentence, entities, buffer);
        }
    }

    pub fn save(&self, enc: &mut BinaryEncoder) -> Result<()> {
        enc.add_4b(self.total_features)?;
        enc.add_4b(self.processors.len())?;
        for processor in &self.processors {
            enc.add_str(processor.name())?;
            processor.save(enc)?;
        }
        Ok(())
    }

    pub fn load(&mut self, data: &mut BinaryDecoder<'_>) -> Result<()> {
        self.total_features = data.next_4b()?;
        self.processors.clear();
        for _ in 0..data.next_4b()? {
            let name = data.next_str()?;
            let Some(mut processor) = FeatureProcessor::create(&name) else {
                return Err(NerError::decode(format!("unknown feature processor '{name}'")));
            };
            processor.load(data)?;
            self.processors.push(processor);
        }
        debug!(
            processors = self.processors.len(),
            total_features = self.total_features,
            "loaded feature templates"
        );
        Ok(())
    }
}

fn start_sentence(sentence: &mut NerSentence) {
    sentence.clear_features();
    for features in &mut sentence.features {
        features.push(OMNIPRESENT_FEATURE);
    }
}
