//! # ner-features: Extração de Features para Reconhecimento de Entidades
//!
//! Este crate converte sentenças já tokenizadas e analisadas
//! morfologicamente em listas de ids inteiros de features, consumidas por um
//! classificador de sequência externo. Os ids são estáveis entre a
//! configuração (treino) e a carga do modelo binário (inferência).
//!
//! ## Arquitetura
//!
//! 1.  **Templates** ([`templates`]): descrição textual da sequência de
//!     processadores, um por linha (`Form 2`, `BrownClusters 1 clusters.txt 4`).
//! 2.  **Processadores** ([`processor`]): treze extratores (lexicais, caixa,
//!     gazetteers, clusters de Brown, números e horários, estágio anterior,
//!     URLs e e-mails) e um agrupador de entidades contêiner.
//! 3.  **Janela** ([`processor::window`]): projeta cada feature local sobre os
//!     tokens vizinhos, codificando a distância relativa no próprio id.
//! 4.  **Persistência** ([`codec`]): formato binário little-endian sem
//!     marcadores de tipo.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use ner_features::{EntityMap, FeatureTemplates, NerSentence, NerWord};
//!
//! let mut entities = EntityMap::new();
//! let templates = FeatureTemplates::parse(
//!     "Form 1\nFormCapitalization 0\nNumericTimeValue 0\n".as_bytes(),
//!     &mut entities,
//! )
//! .unwrap();
//!
//! let mut sentence = NerSentence::from_words(vec![
//!     NerWord::new("Praha", "Praha"),
//!     NerWord::new("2024", "2024"),
//! ]);
//! templates.process_sentence(&mut sentence, &mut String::new());
//!
//! // A feature onipresente (0) vem sempre primeiro.
//! assert!(sentence.features.iter().all(|f| f[0] == 0));
//! ```

pub mod codec;
pub mod entity;
pub mod errors;
pub mod processor;
pub mod sentence;
pub mod templates;
pub mod unicode;
pub mod url_detector;
mod utils;

pub use codec::{BinaryDecoder, BinaryEncoder};
pub use entity::{EntityMap, EntityType, NamedEntity, ENTITY_TYPE_UNKNOWN};
pub use errors::{NerError, Result};
pub use processor::{FeatureProcessor, NerFeature, ProcessorKind, NER_FEATURE_UNKNOWN};
pub use sentence::{NerSentence, NerWord, PreviousStage, TokenProbabilities};
pub use templates::FeatureTemplates;
