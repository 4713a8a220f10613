//! # Modelo de Sentença
//!
//! Uma [`NerSentence`] é a unidade de trabalho dos processadores de features.
//! Para cada token ela guarda, em vetores paralelos:
//!
//! - os atributos linguísticos ([`NerWord`]), produzidos por tokenizador e
//!   analisador morfológico externos;
//! - a lista de features emitidas (somente anexada pelos processadores);
//! - a predição de um estágio anterior do reconhecedor ([`PreviousStage`]);
//! - as probabilidades locais de cada rótulo BILOU ([`TokenProbabilities`]).

use serde::{Deserialize, Serialize};

use crate::entity::{
    BilouType, EntityType, BILOU_TYPE_TOTAL, BILOU_TYPE_UNKNOWN, ENTITY_TYPE_UNKNOWN,
};
use crate::processor::NerFeature;

/// Atributos linguísticos de um token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NerWord {
    /// Forma de superfície (ex: "Praze").
    pub form: String,
    /// Lema normalizado, sem comentários (ex: "Praha").
    pub raw_lemma: String,
    /// Identificador do lema (pode conter sufixos de desambiguação).
    pub lemma_id: String,
    /// Comentários anexados ao lema (ex: "_;G").
    pub lemma_comments: String,
    /// Etiqueta morfológica.
    pub tag: String,
}

impl NerWord {
    pub fn new(form: &str, raw_lemma: &str) -> Self {
        Self {
            form: form.to_string(),
            raw_lemma: raw_lemma.to_string(),
            lemma_id: raw_lemma.to_string(),
            ..Self::default()
        }
    }
}

/// Predição de um estágio anterior para um token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviousStage {
    pub bilou: BilouType,
    pub entity: EntityType,
}

impl Default for PreviousStage {
    fn default() -> Self {
        Self {
            bilou: BILOU_TYPE_UNKNOWN,
            entity: ENTITY_TYPE_UNKNOWN,
        }
    }
}

/// Probabilidade de um rótulo BILOU, com o tipo de entidade associado.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BilouProbability {
    pub probability: f64,
    pub entity: EntityType,
}

impl Default for BilouProbability {
    fn default() -> Self {
        Self {
            probability: 0.,
            entity: ENTITY_TYPE_UNKNOWN,
        }
    }
}

/// Distribuição sobre os cinco rótulos BILOU, indexada por `BILOU_TYPE_*`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BilouProbabilities {
    pub bilou: [BilouProbability; BILOU_TYPE_TOTAL],
}

/// Probabilidades locais de um token.
///
/// Quando `local_filled` é verdadeiro, o token já foi decidido por algum
/// mecanismo (ex: detector de URL) e nenhum outro processador ou estágio pode
/// sobrescrevê-lo.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TokenProbabilities {
    pub local: BilouProbabilities,
    pub local_filled: bool,
}

/// Sentença anotada, com o estado mutável de extração de features.
#[derive(Debug, Clone, Default)]
pub struct NerSentence {
    pub words: Vec<NerWord>,
    pub features: Vec<Vec<NerFeature>>,
    pub previous_stage: Vec<PreviousStage>,
    pub probabilities: Vec<TokenProbabilities>,
}

impl NerSentence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrói a sentença a partir dos tokens, com estado por token zerado.
    pub fn from_words(words: Vec<NerWord>) -> Self {
        let mut sentence = Self {
            words,
            ..Self::default()
        };
        sentence.reset_state();
        sentence
    }

    /// Número de tokens.
    pub fn size(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Redimensiona os vetores por token para `size()` e limpa seu conteúdo.
    ///
    /// Deve ser chamado sempre que `words` muda, antes de processar a sentença.
    pub fn reset_state(&mut self) {
        let size = self.words.len();
        self.features.resize_with(size, Vec::new);
        self.features.iter_mut().for_each(Vec::clear);
        self.previous_stage.clear();
        self.previous_stage.resize(size, PreviousStage::default());
        self.probabilities.clear();
        self.probabilities.resize(size, TokenProbabilities::default());
    }

    /// Limpa as listas de features, mantendo a capacidade alocada.
    pub fn clear_features(&mut self) {
        self.features.resize_with(self.words.len(), Vec::new);
        self.features.iter_mut().for_each(Vec::clear);
    }
}
