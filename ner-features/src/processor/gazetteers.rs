//! # Gazetteers
//!
//! Listas de frases conhecidas (nomes de cidades, empresas, ...), uma por
//! linha, com palavras separadas por espaço. Cada arquivo de gazetteer recebe
//! seu próprio grupo de features, e cada token coberto por uma ocorrência
//! recebe:
//!
//! - a feature genérica `G` ("faz parte de uma frase deste gazetteer");
//! - uma feature de posição: `U` para frases de uma palavra, ou `B`/`I`/`L`
//!   (início, meio, fim) para frases de várias palavras.
//!
//! ## Casamento
//!
//! A partir de cada token cujo lema normalizado é uma chave, a frase é estendida
//! palavra a palavra enquanto a entrada atual for prefixo de alguma frase mais
//! longa. Todas as frases completas encontradas pelo caminho são aplicadas, e o
//! casamento recomeça em cada índice, então ocorrências sobrepostas com
//! inícios diferentes são todas encontradas.

use tracing::debug;

use super::window::FeatureWindow;
use super::{block_center, blocks_end, FeatureLookup, FeatureMap, NerFeature};
use crate::codec::{BinaryDecoder, BinaryEncoder};
use crate::errors::{NerError, Result};
use crate::sentence::NerSentence;
use crate::utils::read_resource;

/// Deslocamento, em blocos de `2·window + 1`, de cada classe de posição.
const G: u32 = 0;
const U: u32 = 1;
const B: u32 = 2;
const L: u32 = 3;
const I: u32 = 4;

/// Uma frase (ou prefixo de frase) registrada.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct GazetteerInfo {
    /// Uma feature base por arquivo em que a frase aparece completa.
    features: Vec<NerFeature>,
    /// A frase é prefixo de uma frase mais longa de algum arquivo.
    prefix_of_longer: bool,
}

/// Tabela de entradas; o mapa frase → entrada fica na tabela do processador.
#[derive(Debug, Clone, Default)]
pub struct Gazetteers {
    entries: Vec<GazetteerInfo>,
}

/// Quantas classes de posição um arquivo usa, dada a frase mais longa.
fn position_classes(longest: usize) -> u32 {
    match longest {
        0 => 0,
        1 => U + 1,
        2 => L + 1,
        _ => I + 1,
    }
}

fn id_space_exhausted(path: &str) -> NerError {
    NerError::invalid_argument(
        "Gazetteers",
        format!("feature id space exhausted by gazetteer file '{path}'"),
    )
}

impl Gazetteers {
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn parse(
        &mut self,
        window: u32,
        args: &[String],
        map: &mut FeatureMap,
        total_features: &mut NerFeature,
    ) -> Result<()> {
        self.entries.clear();

        let mut phrase = String::new();
        for path in args {
            let contents = read_resource(path)?;
            let feature =
                block_center(*total_features, window, 0).ok_or_else(|| id_space_exhausted(path))?;
            let mut longest = 0;

            for line in contents.lines() {
                let tokens: Vec<&str> = line.split(' ').filter(|t| !t.is_empty()).collect();
                longest = longest.max(tokens.len());

                phrase.clear();
                for (i, token) in tokens.iter().enumerate() {
                    if i > 0 {
                        phrase.push(' ');
                    }
                    phrase.push_str(token);

                    let index = match map.get(phrase.as_str()) {
                        Some(&index) => index as usize,
                        None => {
                            map.insert(phrase.clone(), self.entries.len() as u32);
                            self.entries.push(GazetteerInfo::default());
                            self.entries.len() - 1
                        }
                    };
                    let info = &mut self.entries[index];
                    if i + 1 < tokens.len() {
                        info.prefix_of_longer = true;
                    } else if !info.features.contains(&feature) {
                        info.features.push(feature);
                    }
                }
            }

            *total_features = blocks_end(*total_features, window, position_classes(longest) as usize)
                .ok_or_else(|| id_space_exhausted(path))?;
            debug!(file = %path, longest, entries = self.entries.len(), "read gazetteer");
        }
        Ok(())
    }

    pub(crate) fn process_sentence<Lk: FeatureLookup>(
        &self,
        window: u32,
        lookup: &mut Lk,
        sentence: &mut NerSentence,
        buffer: &mut String,
    ) {
        let block = 2 * window + 1;
        let NerSentence {
            words, features, ..
        } = sentence;
        let mut out = FeatureWindow::new(features, window);

        for i in 0..words.len() {
            let Some(mut entry) = lookup
                .get(&words[i].raw_lemma)
                .and_then(|index| self.entries.get(index as usize))
            else {
                continue;
            };

            for &feature in &entry.features {
                out.apply(i, feature + G * block);
                out.apply(i, feature + U * block);
            }

            let mut j = i + 1;
            while entry.prefix_of_longer && j < words.len() {
                if j == i + 1 {
                    buffer.clear();
                    buffer.push_str(&words[i].raw_lemma);
                }
                buffer.push(' ');
                buffer.push_str(&words[j].raw_lemma);

                let Some(next) = lookup
                    .get(buffer.as_str())
                    .and_then(|index| self.entries.get(index as usize))
                else {
                    break;
                };
                entry = next;

                for &feature in &entry.features {
                    for g in i..=j {
                        let role = if g == i {
                            B
                        } else if g == j {
                            L
                        } else {
                            I
                        };
                        out.apply(g, feature + G * block);
                        out.apply(g, feature + role * block);
                    }
                }
                j += 1;
            }
        }
    }

    pub(crate) fn save(&self, enc: &mut BinaryEncoder) -> Result<()> {
        enc.add_4b(self.entries.len())?;
        for entry in &self.entries {
            enc.add_1b(u8::from(entry.prefix_of_longer))?;
            enc.add_1b(entry.features.len())?;
            for &feature in &entry.features {
                enc.add_4b(feature)?;
            }
        }
        Ok(())
    }

    pub(crate) fn load(&mut self, data: &mut BinaryDecoder<'_>) -> Result<()> {
        self.entries.clear();
        for _ in 0..data.next_4b()? {
            let prefix_of_longer = match data.next_1b()? {
                0 => false,
                1 => true,
                flag => return Err(NerError::decode(format!("invalid gazetteer prefix flag {flag}"))),
            };
            let len = data.next_1b()?;
            let features = (0..len)
                .map(|_| data.next_4b())
                .collect::<Result<Vec<_>>>()?;
            self.entries.push(GazetteerInfo {
                features,
                prefix_of_longer,
            });
        }
        Ok(())
    }
}
