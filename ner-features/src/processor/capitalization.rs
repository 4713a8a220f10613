//! Features de capitalização (`FormCapitalization`, `RawLemmaCapitalization`).
//!
//! | Chave | Feature                                              |
//! |-------|------------------------------------------------------|
//! | `f`   | o primeiro caractere é maiúsculo/titlecase           |
//! | `a`   | há maiúsculas e nenhuma minúscula ("ČEZ", "USA")     |
//! | `m`   | maiúsculas e minúsculas no mesmo token ("McDonald")  |

use super::window::FeatureWindow;
use super::{AddingLookup, FeatureLookup};
use crate::sentence::{NerSentence, NerWord};
use crate::unicode::{case_class, CaseClass};

const FIRST_CAP: &str = "f";
const ALL_CAP: &str = "a";
const MIXED_CAP: &str = "m";

/// Atributo cuja capitalização é analisada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapitalizedAttribute {
    Form,
    RawLemma,
}

impl CapitalizedAttribute {
    pub fn processor_name(self) -> &'static str {
        match self {
            Self::Form => "FormCapitalization",
            Self::RawLemma => "RawLemmaCapitalization",
        }
    }

    fn of(self, word: &NerWord) -> &str {
        match self {
            Self::Form => &word.form,
            Self::RawLemma => &word.raw_lemma,
        }
    }

    pub(crate) fn process_sentence<L: FeatureLookup>(
        self,
        window: u32,
        lookup: &mut L,
        sentence: &mut NerSentence,
    ) {
        let first_cap = lookup.lookup(FIRST_CAP);
        let all_cap = lookup.lookup(ALL_CAP);
        let mixed_cap = lookup.lookup(MIXED_CAP);

        let NerSentence {
            words, features, ..
        } = sentence;
        let mut out = FeatureWindow::new(features, window);
        for (i, word) in words.iter().enumerate() {
            let shape = Shape::of(self.of(word));
            if shape.first_upper {
                out.apply(i, first_cap);
            }
            if shape.upper && !shape.lower {
                out.apply(i, all_cap);
            }
            if shape.upper && shape.lower {
                out.apply(i, mixed_cap);
            }
        }
    }
}

/// Os três ids são alocados uma única vez, na configuração, nesta ordem.
pub(crate) fn reserve_features(lookup: &mut AddingLookup<'_>) -> Option<()> {
    for key in [FIRST_CAP, ALL_CAP, MIXED_CAP] {
        lookup.try_lookup(key)?;
    }
    Some(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Shape {
    first_upper: bool,
    upper: bool,
    lower: bool,
}

impl Shape {
    fn of(text: &str) -> Self {
        let mut shape = Self::default();
        for (pos, c) in text.chars().enumerate() {
            match case_class(c) {
                CaseClass::Upper => {
                    shape.upper = true;
                    shape.first_upper |= pos == 0;
                }
                CaseClass::Lower => shape.lower = true,
                CaseClass::Other => {}
            }
        }
        shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::test_utils::*;

    #[test]
    fn test_shapes() {
        let praha = Shape::of("Praha");
        assert!(praha.first_upper && praha.upper && praha.lower);

        let cez = Shape::of("ČEZ");
        assert!(cez.first_upper && cez.upper && !cez.lower);

        let ipad = Shape::of("iPad");
        assert!(!ipad.first_upper && ipad.upper && ipad.lower);

        assert_eq!(Shape::of("123"), Shape::default());
        assert_eq!(Shape::of(""), Shape::default());
    }

    #[test]
    fn test_symbols_with_case_properties_are_not_letters() {
        assert_eq!(Shape::of("Ⅻ"), Shape::default());
        assert_eq!(Shape::of("Ⓐ"), Shape::default());

        let ordinal = Shape::of("Aª");
        assert!(ordinal.first_upper && ordinal.upper && !ordinal.lower);
    }

    #[test]
    fn test_features_are_allocated_once_in_order() {
        let mut total = 1;
        let cap = configured("FormCapitalization", 0, &[], &mut total);
        assert_eq!(total, 4);

        // f → 1, a → 2, m → 3.
        let mut s = sentence(&["Jan", "ODS", "eBay", "a", "7"]);
        assert_eq!(
            run(&cap, &mut s),
            vec![vec![1, 3], vec![1, 2], vec![3], vec![], vec![]]
        );
    }

    #[test]
    fn test_raw_lemma_variant_reads_raw_lemma() {
        let mut total = 1;
        let cap = configured("RawLemmaCapitalization", 1, &[], &mut total);
        assert_eq!(total, 10);

        let mut s = sentence(&["praze"]);
        s.words[0].raw_lemma = "Praha".into();
        // f → 2, m → 8; janela 1 numa sentença de um token só atinge o próprio token.
        assert_eq!(run(&cap, &mut s), vec![vec![2, 8]]);
    }

    #[test]
    fn test_features_survive_reload() {
        let mut total = 5;
        let cap = configured("FormCapitalization", 2, &[], &mut total);
        let loaded = reloaded(&cap);
        let mut s = sentence(&["Brno", "a", "OSN"]);
        assert_eq!(run(&loaded, &mut s), run(&cap, &mut s));
    }
}
