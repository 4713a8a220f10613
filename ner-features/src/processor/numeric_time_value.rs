//! Valores numéricos que podem ser hora, minuto, dia, mês ou ano, e horários
//! no formato `H:MM` ou `H.MM`.
//!
//! As condições são independentes: `"12"` é hora, minuto, dia e mês ao mesmo
//! tempo, e o classificador decide pelo contexto.

use super::window::FeatureWindow;
use super::{AddingLookup, FeatureLookup};
use crate::sentence::NerSentence;

const HOUR: &str = "H";
const MINUTE: &str = "M";
const TIME: &str = "t";
const DAY: &str = "d";
const MONTH: &str = "m";
const YEAR: &str = "y";

/// Os seis ids são alocados uma única vez, na configuração, nesta ordem.
pub(crate) fn reserve_features(lookup: &mut AddingLookup<'_>) -> Option<()> {
    for key in [HOUR, MINUTE, TIME, DAY, MONTH, YEAR] {
        lookup.try_lookup(key)?;
    }
    Some(())
}

/// Consome o maior prefixo de dígitos ASCII de `s`.
///
/// Retorna o valor (com overflow circular de 32 bits), se houve ao menos um
/// dígito, e o restante da string.
fn leading_number(s: &str) -> (Option<u32>, &str) {
    let end = s.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return (None, s);
    }
    let value = s.as_bytes()[..end]
        .iter()
        .fold(0u32, |num, &b| num.wrapping_mul(10).wrapping_add(u32::from(b - b'0')));
    (Some(value), &s[end..])
}

/// Classificação de uma forma de superfície.
#[derive(Debug, Default, PartialEq, Eq)]
struct NumericValue {
    hour: bool,
    minute: bool,
    day: bool,
    month: bool,
    year: bool,
    time: bool,
}

impl NumericValue {
    fn of(form: &str) -> Self {
        let mut value = Self::default();
        let (Some(num), rest) = leading_number(form) else {
            return value;
        };

        if rest.is_empty() {
            value.hour = num < 24;
            value.minute = num < 60;
            value.day = (1..=31).contains(&num);
            value.month = (1..=12).contains(&num);
            value.year = (1000..=2200).contains(&num);
        }

        if num < 24 {
            if let Some(minutes) = rest.strip_prefix(['.', ':']) {
                if let (Some(minutes), "") = leading_number(minutes) {
                    value.time = minutes < 60;
                }
            }
        }
        value
    }
}

pub(crate) fn process_sentence<L: FeatureLookup>(
    window: u32,
    lookup: &mut L,
    sentence: &mut NerSentence,
) {
    let hour = lookup.lookup(HOUR);
    let minute = lookup.lookup(MINUTE);
    let time = lookup.lookup(TIME);
    let day = lookup.lookup(DAY);
    let month = lookup.lookup(MONTH);
    let year = lookup.lookup(YEAR);

    let NerSentence {
        words, features, ..
    } = sentence;
    let mut out = FeatureWindow::new(features, window);
    for (i, word) in words.iter().enumerate() {
        let value = NumericValue::of(&word.form);
        for (present, feature) in [
            (value.hour, hour),
            (value.minute, minute),
            (value.day, day),
            (value.month, month),
            (value.year, year),
            (value.time, time),
        ] {
            if present {
                out.apply(i, feature);
            }
        }
    }
}
