//! # Tipos de Entidade e Esquema BILOU
//!
//! Define o identificador numérico de tipos de entidade, o registro
//! nome↔id ([`EntityMap`]) e os spans de entidade reconhecidos
//! ([`NamedEntity`]).
//!
//! ## Esquema BILOU
//!
//! | Tipo | Significado                          |
//! |------|--------------------------------------|
//! | `B`  | Begin: primeiro token de um span     |
//! | `I`  | Inside: token interno                |
//! | `L`  | Last: último token                   |
//! | `O`  | Outside: fora de qualquer entidade   |
//! | `U`  | Unit: entidade de um único token     |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::codec::{BinaryDecoder, BinaryEncoder};
use crate::errors::Result;

/// Identificador numérico de um tipo de entidade.
pub type EntityType = u32;

/// Tipo de entidade desconhecido / inexistente.
pub const ENTITY_TYPE_UNKNOWN: EntityType = u32::MAX;

/// Tipo BILOU codificado como inteiro, como o classificador o enxerga.
pub type BilouType = i32;

pub const BILOU_TYPE_B: BilouType = 0;
pub const BILOU_TYPE_I: BilouType = 1;
pub const BILOU_TYPE_L: BilouType = 2;
pub const BILOU_TYPE_O: BilouType = 3;
pub const BILOU_TYPE_U: BilouType = 4;
/// Número de tipos BILOU válidos.
pub const BILOU_TYPE_TOTAL: usize = 5;
/// Ausência de predição.
pub const BILOU_TYPE_UNKNOWN: BilouType = -1;

/// Registro crescente de tipos de entidade (bijeção nome ↔ id).
///
/// Os ids são atribuídos em ordem de inserção, começando em 0.
#[derive(Debug, Clone, Default)]
pub struct EntityMap {
    str2id: HashMap<String, EntityType>,
    id2str: Vec<String>,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve um nome de tipo.
    ///
    /// Retorna o id existente; se o nome ainda não existe e `add_entity` for
    /// verdadeiro, cria um novo id. Nomes malformados (vazios ou com espaços)
    /// sempre resultam em [`ENTITY_TYPE_UNKNOWN`].
    pub fn parse(&mut self, name: &str, add_entity: bool) -> EntityType {
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return ENTITY_TYPE_UNKNOWN;
        }
        if let Some(&id) = self.str2id.get(name) {
            return id;
        }
        if !add_entity {
            return ENTITY_TYPE_UNKNOWN;
        }

        let id = self.id2str.len() as EntityType;
        self.str2id.insert(name.to_string(), id);
        self.id2str.push(name.to_string());
        id
    }

    /// Nome de um tipo, se o id existir.
    pub fn name(&self, entity: EntityType) -> Option<&str> {
        self.id2str.get(entity as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.id2str.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id2str.is_empty()
    }

    pub fn save(&self, enc: &mut BinaryEncoder) -> Result<()> {
        enc.add_4b(self.id2str.len())?;
        for name in &self.id2str {
            enc.add_str(name)?;
        }
        Ok(())
    }

    pub fn load(&mut self, data: &mut BinaryDecoder<'_>) -> Result<()> {
        self.str2id.clear();
        self.id2str.clear();
        for _ in 0..data.next_4b()? {
            let name = data.next_str()?;
            self.str2id.insert(name.clone(), self.id2str.len() as EntityType);
            self.id2str.push(name);
        }
        Ok(())
    }
}

/// Um span de entidade reconhecido: `length` tokens a partir de `start`.
///
/// O tipo ainda é o rótulo textual (ex: `"pf"`, `"P"`), não um [`EntityType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
    pub start: usize,
    pub length: usize,
    #[serde(rename = "type")]
    pub entity_type: String,
}

impl NamedEntity {
    pub fn new(start: usize, length: usize, entity_type: impl Into<String>) -> Self {
        Self {
            start,
            length,
            entity_type: entity_type.into(),
        }
    }

    /// Índice logo após o último token do span.
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Verdadeiro se `next` começa exatamente onde este span termina.
    pub fn touches(&self, next: &NamedEntity) -> bool {
        next.start == self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_creates_ids_in_order() {
        let mut entities = EntityMap::new();
        assert_eq!(entities.parse("gu", true), 0);
        assert_eq!(entities.parse("me", true), 1);
        assert_eq!(entities.parse("gu", true), 0);
        assert_eq!(entities.name(1), Some("me"));
        assert_eq!(entities.len(), 2);
    }

    #[test]
    fn test_parse_without_adding_and_malformed_names() {
        let mut entities = EntityMap::new();
        assert_eq!(entities.parse("gu", false), ENTITY_TYPE_UNKNOWN);
        assert_eq!(entities.parse("", true), ENTITY_TYPE_UNKNOWN);
        assert_eq!(entities.parse("a b", true), ENTITY_TYPE_UNKNOWN);
        assert!(entities.is_empty());
    }

    #[test]
    fn test_save_load_keeps_ids() {
        let mut entities = EntityMap::new();
        entities.parse("P", true);
        entities.parse("T", true);

        let mut enc = BinaryEncoder::new();
        entities.save(&mut enc).unwrap();
        let bytes = enc.into_bytes();

        let mut loaded = EntityMap::new();
        loaded.load(&mut BinaryDecoder::new(&bytes)).unwrap();
        assert_eq!(loaded.parse("T", false), 1);
        assert_eq!(loaded.name(0), Some("P"));
    }

    #[test]
    fn test_named_entity_json_uses_type_key() {
        let entity = NamedEntity::new(2, 3, "P");
        let json = serde_json::to_string(&entity).unwrap();
        assert_eq!(json, r#"{"start":2,"length":3,"type":"P"}"#);
        assert!(entity.touches(&NamedEntity::new(5, 1, "ps")));
        assert!(!entity.touches(&NamedEntity::new(6, 1, "ps")));
    }
}
