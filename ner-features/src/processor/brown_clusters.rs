//! # Brown Clusters
//!
//! Cada palavra do arquivo de clusters pertence a um cluster identificado por
//! um caminho binário na hierarquia de Brown (ex: `0110`). Prefixos do caminho
//! correspondem a agrupamentos mais grosseiros, por isso o processador emite
//! uma feature para o rótulo completo e outra para cada comprimento de prefixo
//! configurado (ex: `BrownClusters 2 clusters.txt 4 6 10`).
//!
//! Prefixos iguais de clusters diferentes compartilham a mesma feature: duas
//! palavras em `01100` e `01101` disparam a mesma feature de prefixo 4.

use std::collections::HashMap;

use tracing::debug;

use super::window::FeatureWindow;
use super::{block_center, blocks_end, FeatureLookup, FeatureMap, NerFeature};
use crate::codec::{BinaryDecoder, BinaryEncoder};
use crate::errors::{NerError, Result};
use crate::sentence::NerSentence;
use crate::utils::read_resource;

const NAME: &str = "BrownClusters";

/// Tabela de clusters: para cada id de cluster, suas features (rótulo
/// completo primeiro, depois um prefixo por comprimento aplicável).
///
/// O mapa forma → id de cluster fica na tabela do processador.
#[derive(Debug, Clone, Default)]
pub struct BrownClusters {
    clusters: Vec<Vec<NerFeature>>,
}

/// `None` representa o rótulo completo.
type PrefixLength = Option<usize>;

/// Prefixo de `label` com `len` caracteres, se for estritamente mais curto
/// que o rótulo.
fn prefix(label: &str, len: PrefixLength) -> Option<&str> {
    let Some(len) = len else {
        return Some(label);
    };
    match label.char_indices().nth(len) {
        Some((end, _)) => Some(&label[..end]),
        None => None,
    }
}

fn id_space_exhausted() -> NerError {
    NerError::invalid_argument(NAME, "feature id space exhausted by cluster prefixes")
}

impl BrownClusters {
    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    pub(crate) fn parse(
        &mut self,
        window: u32,
        args: &[String],
        map: &mut FeatureMap,
        total_features: &mut NerFeature,
    ) -> Result<()> {
        let Some((path, lengths)) = args.split_first() else {
            return Err(NerError::invalid_argument(
                NAME,
                "requires a cluster file as the first argument",
            ));
        };

        let mut prefix_lengths: Vec<PrefixLength> = vec![None];
        for arg in lengths {
            match arg.parse::<i64>() {
                Ok(len) if len > 0 => prefix_lengths.push(Some(len as usize)),
                _ => {
                    return Err(NerError::invalid_argument(
                        NAME,
                        format!("wrong prefix length '{arg}'"),
                    ))
                }
            }
        }

        let contents = read_resource(path)?;
        let mut cluster_ids: HashMap<&str, u32> = HashMap::new();
        let mut prefixes: HashMap<&str, NerFeature> = HashMap::new();
        self.clusters.clear();

        for (line_no, line) in contents.lines().enumerate() {
            let mut fields = line.split('\t');
            let (Some(cluster), Some(form), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(NerError::invalid_format(
                    path,
                    line_no + 1,
                    format!("wrong line '{line}' in Brown cluster file, expected 'cluster<TAB>form'"),
                ));
            };

            let id = match cluster_ids.get(cluster) {
                Some(&id) => id,
                None => {
                    let id = self.clusters.len() as u32;
                    let mut features = Vec::with_capacity(prefix_lengths.len());
                    for prefix in prefix_lengths.iter().filter_map(|&len| prefix(cluster, len)) {
                        let next = block_center(*total_features, window, prefixes.len())
                            .ok_or_else(id_space_exhausted)?;
                        features.push(*prefixes.entry(prefix).or_insert(next));
                    }
                    self.clusters.push(features);
                    cluster_ids.insert(cluster, id);
                    id
                }
            };

            if map.insert(form.to_string(), id).is_some() {
                return Err(NerError::invalid_format(
                    path,
                    line_no + 1,
                    format!("form '{form}' is present twice in Brown cluster file"),
                ));
            }
        }

        *total_features =
            blocks_end(*total_features, window, prefixes.len()).ok_or_else(id_space_exhausted)?;
        debug!(
            file = %path,
            clusters = self.clusters.len(),
            forms = map.len(),
            prefixes = prefixes.len(),
            "read Brown clusters"
        );
        Ok(())
    }

    pub(crate) fn process_sentence<L: FeatureLookup>(
        &self,
        window: u32,
        lookup: &mut L,
        sentence: &mut NerSentence,
    ) {
        let NerSentence {
            words, features, ..
        } = sentence;
        let mut out = FeatureWindow::new(features, window);
        for (i, word) in words.iter().enumerate() {
            let Some(cluster) = lookup
                .get(&word.raw_lemma)
                .and_then(|id| self.clusters.get(id as usize))
            else {
                continue;
            };
            for &feature in cluster {
                out.apply(i, feature);
            }
        }
    }

    pub(crate) fn save(&self, enc: &mut BinaryEncoder) -> Result<()> {
        enc.add_4b(self.clusters.len())?;
        for cluster in &self.clusters {
            enc.add_4b(cluster.len())?;
            for &feature in cluster {
                enc.add_4b(feature)?;
            }
        }
        Ok(())
    }

    pub(crate) fn load(&mut self, data: &mut BinaryDecoder<'_>) -> Result<()> {
        self.clusters.clear();
        for _ in 0..data.next_4b()? {
            let len = data.next_4b()?;
            let cluster = (0..len)
                .map(|_| data.next_4b())
                .collect::<Result<Vec<_>>>()?;
            self.clusters.push(cluster);
        }
        Ok(())
    }
}
