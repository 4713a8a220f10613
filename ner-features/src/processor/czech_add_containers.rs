//! Entidades contêiner do Czech Named Entity Corpus.
//!
//! Depois do reconhecimento, sequências contíguas de sub-entidades são
//! agrupadas em um contêiner que as cobre:
//!
//! - `P` (nome de pessoa): um ou mais `pf` (prenome) seguidos de um ou mais
//!   `ps` (sobrenome);
//! - `T` (data): `td tm` ou `td tm ty` (dia, mês, ano), ou `tm ty`.
//!
//! Os contêineres são inseridos imediatamente antes do primeiro span que
//! cobrem, e os spans originais são mantidos.

use crate::entity::NamedEntity;

fn is(entity: &NamedEntity, entity_type: &str) -> bool {
    entity.entity_type == entity_type
}

/// `entities[j]` começa onde `entities[j - 1]` termina e é do tipo dado.
fn continues(entities: &[NamedEntity], j: usize, entity_type: &str) -> bool {
    j < entities.len() && entities[j - 1].touches(&entities[j]) && is(&entities[j], entity_type)
}

/// `entities[i]` não continua um span anterior de `entity_type`.
fn starts_run(entities: &[NamedEntity], i: usize, entity_type: &str) -> bool {
    i == 0 || !entities[i - 1].touches(&entities[i]) || !is(&entities[i - 1], entity_type)
}

fn container(entities: &[NamedEntity], first: usize, last: usize, entity_type: &str) -> NamedEntity {
    let start = entities[first].start;
    NamedEntity::new(start, entities[last].end() - start, entity_type)
}

pub(crate) fn process_entities(entities: &mut Vec<NamedEntity>, buffer: &mut Vec<NamedEntity>) {
    buffer.clear();

    for i in 0..entities.len() {
        // P: pf+ ps+
        if is(&entities[i], "pf") && starts_run(entities, i, "pf") {
            let mut j = i + 1;
            while continues(entities, j, "pf") {
                j += 1;
            }
            if continues(entities, j, "ps") {
                j += 1;
                while continues(entities, j, "ps") {
                    j += 1;
                }
                buffer.push(container(entities, i, j - 1, "P"));
            }
        }

        // T: td tm [ty]
        if is(&entities[i], "td") && continues(entities, i + 1, "tm") {
            let mut j = i + 2;
            if continues(entities, j, "ty") {
                j += 1;
            }
            buffer.push(container(entities, i, j - 1, "T"));
        }

        // T: tm ty, se o mês não completa uma data iniciada por td
        if is(&entities[i], "tm") && starts_run(entities, i, "td") && continues(entities, i + 1, "ty") {
            buffer.push(container(entities, i, i + 1, "T"));
        }

        buffer.push(entities[i].clone());
    }

    if buffer.len() > entities.len() {
        std::mem::swap(entities, buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityMap;
    use crate::errors::NerError;
    use crate::processor::test_utils::*;
    use crate::processor::FeatureProcessor;
    use crate::sentence::NerSentence;

    fn spans(layout: &[(usize, usize, &str)]) -> Vec<NamedEntity> {
        layout.iter()
            .map(|&(start, length, t)| NamedEntity::new(start, length, t))
            .collect()
    }

    fn merged(layout: &[(usize, usize, &str)]) -> Vec<NamedEntity> {
        let mut entities = spans(layout);
        let processor = configured("CzechAddContainers", 0, &[], &mut 1);
        processor.process_entities(&NerSentence::new(), &mut entities, &mut Vec::new());
        entities
    }

    #[test]
    fn test_person_container() {
        assert_eq!(
            merged(&[(0, 1, "pf"), (1, 1, "ps")]),
            spans(&[(0, 2, "P"), (0, 1, "pf"), (1, 1, "ps")])
        );
        assert_eq!(
            merged(&[(2, 1, "pf"), (3, 1, "pf"), (4, 1, "ps"), (5, 2, "ps"), (7, 1, "gu")]),
            spans(&[
                (2, 5, "P"),
                (2, 1, "pf"),
                (3, 1, "pf"),
                (4, 1, "ps"),
                (5, 2, "ps"),
                (7, 1, "gu"),
            ])
        );
    }

    #[test]
    fn test_date_containers() {
        assert_eq!(
            merged(&[(0, 1, "td"), (1, 1, "tm"), (2, 1, "ty")]),
            spans(&[(0, 3, "T"), (0, 1, "td"), (1, 1, "tm"), (2, 1, "ty")])
        );
        assert_eq!(
            merged(&[(0, 1, "td"), (1, 1, "tm")]),
            spans(&[(0, 2, "T"), (0, 1, "td"), (1, 1, "tm")])
        );
        assert_eq!(
            merged(&[(0, 1, "tm"), (1, 1, "ty")]),
            spans(&[(0, 2, "T"), (0, 1, "tm"), (1, 1, "ty")])
        );
    }

    #[test]
    fn test_non_touching_spans_never_merge() {
        let gap = [(0, 1, "pf"), (2, 1, "ps")];
        assert_eq!(merged(&gap), spans(&gap));
        let gap = [(0, 1, "td"), (2, 1, "tm"), (3, 1, "ty")];
        assert_eq!(
            merged(&gap),
            spans(&[(0, 1, "td"), (2, 2, "T"), (2, 1, "tm"), (3, 1, "ty")])
        );
        let alone = [(0, 1, "pf"), (1, 1, "gu")];
        assert_eq!(merged(&alone), spans(&alone));
    }

    #[test]
    fn test_pf_run_is_merged_once() {
        let entities = merged(&[(0, 1, "pf"), (1, 1, "pf"), (2, 1, "ps")]);
        assert_eq!(entities.iter().filter(|e| e.entity_type == "P").count(), 1);
    }

    #[test]
    fn test_nonzero_window_is_rejected() {
        let mut processor = FeatureProcessor::create("CzechAddContainers").unwrap();
        let err = processor.parse(1, &[], &mut EntityMap::new(), &mut 1);
        assert!(matches!(err, Err(NerError::InvalidArgument { .. })));
    }

    #[test]
    fn test_persists_nothing() {
        let processor = configured("CzechAddContainers", 0, &[], &mut 1);
        let mut enc = crate::codec::BinaryEncoder::new();
        processor.save(&mut enc).unwrap();
        assert!(enc.as_bytes().is_empty());
        reloaded(&processor);
    }
}
