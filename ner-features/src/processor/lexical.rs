//! Features léxicas: o valor de um atributo do token vira a própria feature.
//!
//! - `Form`, `Lemma`, `RawLemma` e `Tag` consultam a tabela com a forma, o id
//!   do lema, o lema normalizado e a etiqueta, respectivamente. Além disso, as
//!   posições virtuais fora da sentença emitem a feature de borda, que é sempre
//!   o próprio `window` (a chave vazia nunca é alocada).
//! - `CzechLemmaTerm` usa a classe de termo anotada no comentário do lema
//!   (o caractere após o marcador `_;`, ex: `_;G` para nomes geográficos).

use super::window::FeatureWindow;
use super::FeatureLookup;
use crate::sentence::{NerSentence, NerWord};

/// Marcador de classe de termo nos comentários do lema.
const TERM_MARKER: &str = "_;";

/// Atributo consultado por um processador léxico.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalAttribute {
    Form,
    Lemma,
    RawLemma,
    Tag,
}

impl LexicalAttribute {
    pub fn processor_name(self) -> &'static str {
        match self {
            Self::Form => "Form",
            Self::Lemma => "Lemma",
            Self::RawLemma => "RawLemma",
            Self::Tag => "Tag",
        }
    }

    fn of(self, word: &NerWord) -> &str {
        match self {
            Self::Form => &word.form,
            Self::Lemma => &word.lemma_id,
            Self::RawLemma => &word.raw_lemma,
            Self::Tag => &word.tag,
        }
    }

    pub(crate) fn process_sentence<L: FeatureLookup>(
        self,
        window: u32,
        lookup: &mut L,
        sentence: &mut NerSentence,
    ) {
        let NerSentence {
            words, features, ..
        } = sentence;
        let mut out = FeatureWindow::new(features, window);
        for (i, word) in words.iter().enumerate() {
            out.apply(i, lookup.lookup(self.of(word)));
        }
        out.apply_outer_words(window);
    }
}

/// Classe de termo do primeiro marcador `_;` seguido de pelo menos um caractere.
fn term_class(lemma_comments: &str) -> Option<char> {
    lemma_comments
        .match_indices(TERM_MARKER)
        .find_map(|(pos, _)| lemma_comments[pos + TERM_MARKER.len()..].chars().next())
}

pub(crate) fn process_lemma_term<L: FeatureLookup>(
    window: u32,
    lookup: &mut L,
    sentence: &mut NerSentence,
    buffer: &mut String,
) {
    let NerSentence {
        words, features, ..
    } = sentence;
    let mut out = FeatureWindow::new(features, window);
    for (i, word) in words.iter().enumerate() {
        if let Some(class) = term_class(&word.lemma_comments) {
            buffer.clear();
            buffer.push(class);
            out.apply(i, lookup.lookup(buffer.as_str()));
        }
    }
}
