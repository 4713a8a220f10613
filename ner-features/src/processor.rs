//! # Processadores de Features
//!
//! Um [`FeatureProcessor`] converte atributos de cada token de uma
//! [`NerSentence`] em ids inteiros de features, consumidos pelo classificador
//! de sequência.
//!
//! ## Ciclo de Vida
//!
//! 1. **Configuração** ([`FeatureProcessor::parse`]): valida os argumentos, lê
//!    arquivos de recursos e reserva uma faixa contígua do espaço de ids,
//!    avançando o contador `total_features` compartilhado.
//! 2. **Treino** ([`FeatureProcessor::process_sentence_adding`]): ao percorrer o
//!    corpus, cada valor ainda não visto (forma, etiqueta, ...) ganha um bloco
//!    novo de `2·window + 1` ids.
//! 3. **Persistência** ([`FeatureProcessor::save`] / [`FeatureProcessor::load`]):
//!    as tabelas construídas são gravadas num formato binário sem marcadores de
//!    tipo; na carga nada é recalculado a partir dos recursos.
//! 4. **Inferência** ([`FeatureProcessor::process_sentence`] e
//!    [`FeatureProcessor::process_entities`]): somente leitura das tabelas, por
//!    isso um processador carregado pode ser compartilhado entre threads.
//!
//! ## Alocação de Ids
//!
//! Cada feature ocupa um bloco de `2·window + 1` ids e é representada pelo id
//! central (`início + window`). A janela ([`window`]) soma ao id central a
//! distância entre o token que disparou a feature e o token que a recebe.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::codec::{BinaryDecoder, BinaryEncoder};
use crate::entity::{EntityMap, NamedEntity};
use crate::errors::{NerError, Result};
use crate::sentence::NerSentence;

pub mod brown_clusters;
pub mod capitalization;
pub mod czech_add_containers;
pub mod gazetteers;
pub mod lexical;
pub mod numeric_time_value;
pub mod previous_stage;
pub mod url_email_detector;
pub mod window;

use brown_clusters::BrownClusters;
use capitalization::CapitalizedAttribute;
use gazetteers::Gazetteers;
use lexical::LexicalAttribute;
use url_email_detector::UrlEmailDetector;

/// Identificador de feature.
pub type NerFeature = u32;

/// "Nenhuma feature": nunca é emitido.
pub const NER_FEATURE_UNKNOWN: NerFeature = u32::MAX;

/// Tabela chave → valor de cada processador.
///
/// Processadores léxicos guardam aqui chave → feature; `BrownClusters` guarda
/// forma → cluster e `Gazetteers` guarda frase → entrada.
pub(crate) type FeatureMap = HashMap<String, u32>;

/// Tamanho do bloco de uma feature (`2·window + 1`), se couber em `u32`.
pub(crate) fn block_size(window: u32) -> Option<u32> {
    window.checked_mul(2)?.checked_add(1)
}

/// Id central do `index`-ésimo bloco alocado a partir de `first`.
pub(crate) fn block_center(first: NerFeature, window: u32, index: usize) -> Option<NerFeature> {
    let offset = block_size(window)?.checked_mul(u32::try_from(index).ok()?)?;
    first.checked_add(offset)?.checked_add(window)
}

/// Contador após alocar `count` blocos a partir de `first`.
pub(crate) fn blocks_end(first: NerFeature, window: u32, count: usize) -> Option<NerFeature> {
    let len = block_size(window)?.checked_mul(u32::try_from(count).ok()?)?;
    first.checked_add(len)
}

/// Acesso à tabela de um processador durante o processamento de uma sentença.
///
/// A chave vazia (borda de sentença) sempre resolve para o id `window`, sem
/// ocupar a tabela nem o contador.
pub(crate) trait FeatureLookup {
    /// Feature de `key`. Pode alocar uma nova (treino) ou devolver
    /// [`NER_FEATURE_UNKNOWN`] (inferência).
    fn lookup(&mut self, key: &str) -> NerFeature;

    /// Valor já registrado para `key`, sem nunca alocar.
    fn get(&self, key: &str) -> Option<u32>;
}

/// Consulta somente leitura, usada na inferência.
pub(crate) struct FrozenLookup<'a> {
    map: &'a FeatureMap,
    window: u32,
}

impl FeatureLookup for FrozenLookup<'_> {
    fn lookup(&mut self, key: &str) -> NerFeature {
        if key.is_empty() {
            return self.window;
        }
        self.map.get(key).copied().unwrap_or(NER_FEATURE_UNKNOWN)
    }

    fn get(&self, key: &str) -> Option<u32> {
        self.map.get(key).copied()
    }
}

/// Consulta que aloca um bloco novo para cada chave ainda não vista.
pub(crate) struct AddingLookup<'a> {
    map: &'a mut FeatureMap,
    total_features: &'a mut NerFeature,
    window: u32,
}

impl<'a> AddingLookup<'a> {
    pub(crate) fn new(map: &'a mut FeatureMap, total_features: &'a mut NerFeature, window: u32) -> Self {
        Self {
            map,
            total_features,
            window,
        }
    }

    /// Como [`FeatureLookup::lookup`], mas `None` quando o espaço de ids
    /// acabou.
    pub(crate) fn try_lookup(&mut self, key: &str) -> Option<NerFeature> {
        if key.is_empty() {
            return Some(self.window);
        }
        if let Some(&feature) = self.map.get(key) {
            return Some(feature);
        }

        let feature = block_center(*self.total_features, self.window, 0)?;
        *self.total_features = blocks_end(*self.total_features, self.window, 1)?;
        self.map.insert(key.to_string(), feature);
        Some(feature)
    }
}

impl FeatureLookup for AddingLookup<'_> {
    fn lookup(&mut self, key: &str) -> NerFeature {
        self.try_lookup(key).unwrap_or(NER_FEATURE_UNKNOWN)
    }

    fn get(&self, key: &str) -> Option<u32> {
        self.map.get(key).copied()
    }
}

/// As treze variantes de processador. O conjunto é fechado.
#[derive(Debug, Clone)]
pub enum ProcessorKind {
    BrownClusters(BrownClusters),
    CzechAddContainers,
    CzechLemmaTerm,
    /// `Form`, `Lemma`, `RawLemma` e `Tag`.
    Lexical(LexicalAttribute),
    /// `FormCapitalization` e `RawLemmaCapitalization`.
    Capitalization(CapitalizedAttribute),
    Gazetteers(Gazetteers),
    NumericTimeValue,
    PreviousStage,
    UrlEmailDetector(UrlEmailDetector),
}

impl ProcessorKind {
    /// Nome usado nos templates e no modelo persistido.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BrownClusters(_) => "BrownClusters",
            Self::CzechAddContainers => "CzechAddContainers",
            Self::CzechLemmaTerm => "CzechLemmaTerm",
            Self::Lexical(attribute) => attribute.processor_name(),
            Self::Capitalization(attribute) => attribute.processor_name(),
            Self::Gazetteers(_) => "Gazetteers",
            Self::NumericTimeValue => "NumericTimeValue",
            Self::PreviousStage => "PreviousStage",
            Self::UrlEmailDetector(_) => "URLEmailDetector",
        }
    }

    fn process<L: FeatureLookup>(
        &self,
        window: u32,
        lookup: &mut L,
        sentence: &mut NerSentence,
        buffer: &mut String,
    ) {
        match self {
            Self::BrownClusters(clusters) => clusters.process_sentence(window, lookup, sentence),
            Self::CzechAddContainers => {}
            Self::CzechLemmaTerm => lexical::process_lemma_term(window, lookup, sentence, buffer),
            Self::Lexical(attribute) => attribute.process_sentence(window, lookup, sentence),
            Self::Capitalization(attribute) => attribute.process_sentence(window, lookup, sentence),
            Self::Gazetteers(gazetteers) => {
                gazetteers.process_sentence(window, lookup, sentence, buffer)
            }
            Self::NumericTimeValue => numeric_time_value::process_sentence(window, lookup, sentence),
            Self::PreviousStage => {
                previous_stage::process_sentence(window, lookup, sentence, buffer)
            }
            Self::UrlEmailDetector(detector) => detector.process_sentence(sentence),
        }
    }
}

/// Um extrator de features configurado: janela, tabela de chaves e a variante.
#[derive(Debug, Clone)]
pub struct FeatureProcessor {
    window: u32,
    map: FeatureMap,
    kind: ProcessorKind,
}

impl FeatureProcessor {
    /// Fábrica: cria o processador de nome `name` (comparação exata).
    ///
    /// Retorna `None` para nomes desconhecidos; quem chama deve tratar isso
    /// como erro fatal de configuração.
    pub fn create(name: &str) -> Option<Self> {
        let kind = match name {
            "BrownClusters" => ProcessorKind::BrownClusters(BrownClusters::default()),
            "CzechAddContainers" => ProcessorKind::CzechAddContainers,
            "CzechLemmaTerm" => ProcessorKind::CzechLemmaTerm,
            "Form" => ProcessorKind::Lexical(LexicalAttribute::Form),
            "FormCapitalization" => ProcessorKind::Capitalization(CapitalizedAttribute::Form),
            "Gazetteers" => ProcessorKind::Gazetteers(Gazetteers::default()),
            "Lemma" => ProcessorKind::Lexical(LexicalAttribute::Lemma),
            "NumericTimeValue" => ProcessorKind::NumericTimeValue,
            "PreviousStage" => ProcessorKind::PreviousStage,
            "RawLemma" => ProcessorKind::Lexical(LexicalAttribute::RawLemma),
            "RawLemmaCapitalization" => {
                ProcessorKind::Capitalization(CapitalizedAttribute::RawLemma)
            }
            "Tag" => ProcessorKind::Lexical(LexicalAttribute::Tag),
            "URLEmailDetector" => ProcessorKind::UrlEmailDetector(UrlEmailDetector::default()),
            _ => return None,
        };
        Some(Self {
            window: 0,
            map: FeatureMap::new(),
            kind,
        })
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn kind(&self) -> &ProcessorKind {
        &self.kind
    }

    pub fn window(&self) -> u32 {
        self.window
    }

    /// Configura o processador e reserva seus ids a partir de `total_features`.
    pub fn parse(
        &mut self,
        window: i32,
        args: &[String],
        entities: &mut EntityMap,
        total_features: &mut NerFeature,
    ) -> Result<()> {
        let name = self.name();
        if matches!(self.kind, ProcessorKind::CzechAddContainers) && window != 0 {
            return Err(NerError::invalid_argument(name, "cannot have non-zero window"));
        }
        self.window = u32::try_from(window).map_err(|_| {
            NerError::invalid_argument(name, format!("window cannot be negative, got {window}"))
        })?;
        self.map.clear();

        let first = *total_features;
        let window = self.window;
        if blocks_end(first, window, 1).is_none() {
            return Err(NerError::invalid_argument(
                name,
                format!("window {window} does not fit into the feature id space"),
            ));
        }

        let reserved = match &mut self.kind {
            ProcessorKind::BrownClusters(clusters) => {
                Some(clusters.parse(window, args, &mut self.map, total_features)?)
            }
            ProcessorKind::Gazetteers(gazetteers) => {
                Some(gazetteers.parse(window, args, &mut self.map, total_features)?)
            }
            ProcessorKind::UrlEmailDetector(detector) => Some(detector.parse(args, entities)?),
            ProcessorKind::Capitalization(_) => capitalization::reserve_features(
                &mut AddingLookup::new(&mut self.map, total_features, window),
            ),
            ProcessorKind::NumericTimeValue => numeric_time_value::reserve_features(
                &mut AddingLookup::new(&mut self.map, total_features, window),
            ),
            ProcessorKind::CzechAddContainers
            | ProcessorKind::CzechLemmaTerm
            | ProcessorKind::Lexical(_)
            | ProcessorKind::PreviousStage => Some(()),
        };
        if reserved.is_none() {
            return Err(NerError::invalid_argument(name, "feature id space exhausted"));
        }

        info!(
            processor = name,
            window,
            first_feature = first,
            allocated = *total_features - first,
            "configured feature processor"
        );
        Ok(())
    }

    /// Extrai as features de `sentence` (inferência, sem alocar ids).
    pub fn process_sentence(&self, sentence: &mut NerSentence, buffer: &mut String) {
        let mut lookup = FrozenLookup {
            map: &self.map,
            window: self.window,
        };
        self.kind.process(self.window, &mut lookup, sentence, buffer);
    }

    /// Extrai as features de `sentence`, alocando ids para chaves novas.
    pub fn process_sentence_adding(
        &mut self,
        sentence: &mut NerSentence,
        total_features: &mut NerFeature,
        buffer: &mut String,
    ) {
        let mut lookup = AddingLookup::new(&mut self.map, total_features, self.window);
        self.kind.process(self.window, &mut lookup, sentence, buffer);
    }

    /// Reescreve a sequência de entidades reconhecidas. Só `CzechAddContainers`
    /// faz algo aqui.
    pub fn process_entities(
        &self,
        _sentence: &NerSentence,
        entities: &mut Vec<NamedEntity>,
        buffer: &mut Vec<NamedEntity>,
    ) {
        if let ProcessorKind::CzechAddContainers = self.kind {
            czech_add_containers::process_entities(entities, buffer);
        }
    }

    pub fn save(&self, enc: &mut BinaryEncoder) -> Result<()> {
        if let ProcessorKind::CzechAddContainers = self.kind {
            return Ok(());
        }

        enc.add_4b(self.window)?;
        let mut entries: Vec<(&String, &u32)> = self.map.iter().collect();
        entries.sort_unstable_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)));
        enc.add_4b(entries.len())?;
        for (key, &value) in entries {
            enc.add_str(key)?;
            enc.add_4b(value)?;
        }

        match &self.kind {
            ProcessorKind::BrownClusters(clusters) => clusters.save(enc),
            ProcessorKind::Gazetteers(gazetteers) => gazetteers.save(enc),
            ProcessorKind::UrlEmailDetector(detector) => detector.save(enc),
            _ => Ok(()),
        }
    }

    pub fn load(&mut self, data: &mut BinaryDecoder<'_>) -> Result<()> {
        if let ProcessorKind::CzechAddContainers = self.kind {
            return Ok(());
        }

        self.window = data.next_4b()?;
        self.map.clear();
        for _ in 0..data.next_4b()? {
            let key = data.next_str()?;
            let value = data.next_4b()?;
            self.map.insert(key, value);
        }

        match &mut self.kind {
            ProcessorKind::BrownClusters(clusters) => clusters.load(data)?,
            ProcessorKind::Gazetteers(gazetteers) => gazetteers.load(data)?,
            ProcessorKind::UrlEmailDetector(detector) => detector.load(data)?,
            _ => {}
        }
        debug!(
            processor = self.name(),
            window = self.window,
            keys = self.map.len(),
            "loaded feature processor"
        );
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_utils::*;
    use super::*;

    const NAMES: [&str; 13] = [
        "BrownClusters",
        "CzechAddContainers",
        "CzechLemmaTerm",
        "Form",
        "FormCapitalization",
        "Gazetteers",
        "Lemma",
        "NumericTimeValue",
        "PreviousStage",
        "RawLemma",
        "RawLemmaCapitalization",
        "Tag",
        "URLEmailDetector",
    ];

    #[test]
    fn test_factory_knows_every_name() {
        for name in NAMES {
            let processor = FeatureProcessor::create(name).unwrap();
            assert_eq!(processor.name(), name);
        }
    }

    #[test]
    fn test_factory_is_case_sensitive() {
        assert!(FeatureProcessor::create("form").is_none());
        assert!(FeatureProcessor::create("UrlEmailDetector").is_none());
        assert!(FeatureProcessor::create("").is_none());
    }

    #[test]
    fn test_negative_window_is_rejected() {
        let mut processor = FeatureProcessor::create("Form").unwrap();
        let mut total = 1;
        let err = processor.parse(-1, &[], &mut EntityMap::new(), &mut total);
        assert!(matches!(err, Err(NerError::InvalidArgument { .. })));
        assert_eq!(total, 1);
    }

    #[test]
    fn test_adding_lookup_allocates_centered_blocks() {
        let mut map = FeatureMap::new();
        let mut total = 10;
        let mut lookup = AddingLookup::new(&mut map, &mut total, 2);
        assert_eq!(lookup.lookup("a"), 12);
        assert_eq!(lookup.lookup("b"), 17);
        assert_eq!(lookup.lookup("a"), 12);
        assert_eq!(total, 20);

        let mut frozen = FrozenLookup {
            map: &map,
            window: 2,
        };
        assert_eq!(frozen.lookup("b"), 17);
        assert_eq!(frozen.lookup("c"), NER_FEATURE_UNKNOWN);
    }

    #[test]
    fn test_empty_key_is_the_window_without_allocating() {
        let mut map = FeatureMap::new();
        let mut total = 10;
        let mut lookup = AddingLookup::new(&mut map, &mut total, 3);
        assert_eq!(lookup.lookup(""), 3);
        assert_eq!(total, 10);
        assert!(map.is_empty());

        let mut frozen = FrozenLookup {
            map: &map,
            window: 3,
        };
        assert_eq!(frozen.lookup(""), 3);
    }

    #[test]
    fn test_exhausted_id_space_is_not_allocated() {
        let mut map = FeatureMap::new();
        let mut total = u32::MAX - 4;
        let mut lookup = AddingLookup::new(&mut map, &mut total, 1);
        assert_eq!(lookup.lookup("a"), u32::MAX - 3);
        assert_eq!(lookup.lookup("b"), NER_FEATURE_UNKNOWN);
        assert_eq!(total, u32::MAX - 1);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_window_too_large_for_id_space_is_rejected() {
        let mut entities = EntityMap::new();
        for name in ["Form", "PreviousStage", "FormCapitalization"] {
            let mut processor = FeatureProcessor::create(name).unwrap();
            let mut total = 1;
            let err = processor.parse(i32::MAX, &[], &mut entities, &mut total);
            assert!(matches!(err, Err(NerError::InvalidArgument { .. })), "{name}");
            assert_eq!(total, 1);
        }

        let mut numeric = FeatureProcessor::create("NumericTimeValue").unwrap();
        let mut total = u32::MAX - 3;
        let err = numeric.parse(0, &[], &mut entities, &mut total);
        assert!(matches!(err, Err(NerError::InvalidArgument { .. })));
    }

    #[test]
    fn test_training_then_reload_reproduces_features() {
        let mut total = 1;
        let mut processor = configured("Form", 1, &[], &mut total);
        let mut training = sentence(&["Jan", "Novák", "přijel"]);
        processor.process_sentence_adding(&mut training, &mut total, &mut String::new());

        let loaded = reloaded(&processor);
        let mut held_out = sentence(&["Novák", "odjel", "Jan"]);
        let expected = run(&processor, &mut held_out);
        assert_eq!(run(&loaded, &mut held_out), expected);
        assert!(!expected[0].is_empty());
    }
}
