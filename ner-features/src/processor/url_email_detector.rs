//! URLs e e-mails não viram features: o token é decidido diretamente como uma
//! entidade de um token só (`U`) do tipo configurado, e a decisão é marcada
//! como final.

use crate::codec::{BinaryDecoder, BinaryEncoder};
use crate::entity::{EntityMap, EntityType, BILOU_TYPE_TOTAL, BILOU_TYPE_U, ENTITY_TYPE_UNKNOWN};
use crate::errors::{NerError, Result};
use crate::sentence::{BilouProbability, NerSentence};
use crate::url_detector::{self, UrlType};

const NAME: &str = "URLEmailDetector";

/// Tipos de entidade atribuídos a URLs e a e-mails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEmailDetector {
    url: EntityType,
    email: EntityType,
}

impl Default for UrlEmailDetector {
    fn default() -> Self {
        Self {
            url: ENTITY_TYPE_UNKNOWN,
            email: ENTITY_TYPE_UNKNOWN,
        }
    }
}

impl UrlEmailDetector {
    pub fn url(&self) -> EntityType {
        self.url
    }

    pub fn email(&self) -> EntityType {
        self.email
    }

    pub(crate) fn parse(&mut self, args: &[String], entities: &mut EntityMap) -> Result<()> {
        let [url, email] = args else {
            return Err(NerError::invalid_argument(
                NAME,
                format!(
                    "requires exactly two arguments, named entity types for URL and email, got {}",
                    args.len()
                ),
            ));
        };

        self.url = entities.parse(url, true);
        self.email = entities.parse(email, true);
        if self.url == ENTITY_TYPE_UNKNOWN || self.email == ENTITY_TYPE_UNKNOWN {
            return Err(NerError::invalid_argument(
                NAME,
                format!("cannot create entities '{url}' and '{email}'"),
            ));
        }
        Ok(())
    }

    pub(crate) fn process_sentence(&self, sentence: &mut NerSentence) {
        let NerSentence {
            words,
            probabilities,
            ..
        } = sentence;
        for (word, probabilities) in words.iter().zip(probabilities.iter_mut()) {
            if probabilities.local_filled {
                continue;
            }
            let entity = match url_detector::detect(&word.form) {
                UrlType::NoUrl => continue,
                UrlType::Url => self.url,
                UrlType::Email => self.email,
            };

            probabilities.local.bilou = [BilouProbability::default(); BILOU_TYPE_TOTAL];
            probabilities.local.bilou[BILOU_TYPE_U as usize] = BilouProbability {
                probability: 1.,
                entity,
            };
            probabilities.local_filled = true;
        }
    }

    pub(crate) fn save(&self, enc: &mut BinaryEncoder) -> Result<()> {
        enc.add_4b(self.url)?;
        enc.add_4b(self.email)
    }

    pub(crate) fn load(&mut self, data: &mut BinaryDecoder<'_>) -> Result<()> {
        self.url = data.next_4b()?;
        self.email = data.next_4b()?;
        Ok(())
    }
}
