//! Reaproveita a predição de um estágio anterior do reconhecedor.
//!
//! Cada token já rotulado gera a chave `"<bilou> <entidade>"`, aplicada apenas
//! aos tokens seguintes (`[i + 1, i + window]`): o próprio token será
//! rotulado de novo pelo estágio atual.

use super::window::FeatureWindow;
use super::FeatureLookup;
use crate::entity::BILOU_TYPE_UNKNOWN;
use crate::sentence::NerSentence;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Hexadecimal com os nibbles do menos para o mais significativo; zero vira
/// a string vazia.
fn append_encoded(buffer: &mut String, value: i32) {
    if value < 0 {
        buffer.push('-');
    }
    let mut value = value.unsigned_abs();
    while value != 0 {
        buffer.push(char::from(HEX[(value & 0xF) as usize]));
        value >>= 4;
    }
}

pub(crate) fn process_sentence<L: FeatureLookup>(
    window: u32,
    lookup: &mut L,
    sentence: &mut NerSentence,
    buffer: &mut String,
) {
    let NerSentence {
        previous_stage,
        features,
        ..
    } = sentence;
    let mut out = FeatureWindow::new(features, window);
    for (i, stage) in previous_stage.iter().enumerate() {
        if stage.bilou == BILOU_TYPE_UNKNOWN {
            continue;
        }
        buffer.clear();
        append_encoded(buffer, stage.bilou);
        buffer.push(' ');
        append_encoded(buffer, stage.entity as i32);
        out.apply_range(i, lookup.lookup(buffer.as_str()), 1, window as isize);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{BILOU_TYPE_B, BILOU_TYPE_L, BILOU_TYPE_U, ENTITY_TYPE_UNKNOWN};
    use crate::processor::test_utils::*;
    use crate::processor::NerFeature;
    use crate::sentence::PreviousStage;

    fn encoded(value: i32) -> String {
        let mut s = String::new();
        append_encoded(&mut s, value);
        s
    }

    #[test]
    fn test_encoding_is_little_endian_hex() {
        assert_eq!(encoded(0), "");
        assert_eq!(encoded(4), "4");
        assert_eq!(encoded(0x1a), "a1");
        assert_eq!(encoded(-1), "-1");
        assert_eq!(encoded(i32::MIN), "-00000008");
        assert_eq!(encoded(ENTITY_TYPE_UNKNOWN as i32), "-1");
    }

    #[test]
    fn test_applies_only_to_following_tokens() {
        let mut total = 1;
        let mut processor = configured("PreviousStage", 2, &[], &mut total);
        assert_eq!(total, 1);

        let mut s = sentence(&["Jan", "Novák", "přijel", "včera"]);
        s.previous_stage[0] = PreviousStage {
            bilou: BILOU_TYPE_B,
            entity: 3,
        };
        s.previous_stage[1] = PreviousStage {
            bilou: BILOU_TYPE_L,
            entity: 3,
        };

        processor.process_sentence_adding(&mut s, &mut total, &mut String::new());
        // " 3" (B, zero vira vazio) → 3, "2 3" → 8.
        assert_eq!(total, 11);
        let expected: Vec<Vec<NerFeature>> = vec![vec![], vec![4], vec![5, 9], vec![10]];
        assert_eq!(s.features, expected);
    }

    #[test]
    fn test_unknown_keys_emit_nothing_at_inference() {
        let mut total = 1;
        let processor = configured("PreviousStage", 1, &[], &mut total);
        let mut s = sentence(&["Praha", "je"]);
        s.previous_stage[0] = PreviousStage {
            bilou: BILOU_TYPE_U,
            entity: 0,
        };
        assert_eq!(run(&processor, &mut s), vec![Vec::<NerFeature>::new(), vec![]]);
    }

    #[test]
    fn test_reload_keeps_learned_keys() {
        let mut total = 1;
        let mut processor = configured("PreviousStage", 1, &[], &mut total);
        let mut s = sentence(&["Praha", "je", "hezká"]);
        s.previous_stage[0] = PreviousStage {
            bilou: BILOU_TYPE_U,
            entity: 1,
        };
        processor.process_sentence_adding(&mut s, &mut total, &mut String::new());

        let loaded = reloaded(&processor);
        assert_eq!(run(&loaded, &mut s), run(&processor, &mut s));
        assert_eq!(run(&loaded, &mut s)[1], vec![3]);
    }
}
