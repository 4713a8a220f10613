//! # Codec Binário
//!
//! Primitivas de leitura e escrita de campos de largura fixa (1 e 4 bytes,
//! little-endian) e de strings com prefixo de tamanho.
//!
//! O formato não tem marcadores de tipo: quem lê precisa saber de antemão qual
//! processador gravou cada segmento. Strings usam 1 byte de tamanho, ou o byte
//! `255` seguido do tamanho em 4 bytes quando não cabem.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::errors::{NerError, Result};

/// Acumula os bytes de um modelo em memória.
#[derive(Debug, Default, Clone)]
pub struct BinaryEncoder {
    data: Vec<u8>,
}

impl BinaryEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grava um campo de 1 byte. Falha se `value` não couber.
    pub fn add_1b<T>(&mut self, value: T) -> Result<()>
    where
        T: TryInto<u8> + Copy + std::fmt::Display,
    {
        let byte: u8 = value
            .try_into()
            .map_err(|_| NerError::encode(format!("value {value} does not fit into 1 byte")))?;
        self.data.push(byte);
        Ok(())
    }

    /// Grava um campo de 4 bytes. Falha se `value` não couber.
    pub fn add_4b<T>(&mut self, value: T) -> Result<()>
    where
        T: TryInto<u32> + Copy + std::fmt::Display,
    {
        let word: u32 = value
            .try_into()
            .map_err(|_| NerError::encode(format!("value {value} does not fit into 4 bytes")))?;
        self.data.write_u32::<LittleEndian>(word)?;
        Ok(())
    }

    pub fn add_str(&mut self, s: &str) -> Result<()> {
        if s.len() < 255 {
            self.add_1b(s.len())?;
        } else {
            self.add_1b(255u8)?;
            self.add_4b(s.len())?;
        }
        self.data.extend_from_slice(s.as_bytes());
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Lê campos de um buffer produzido por [`BinaryEncoder`].
///
/// Qualquer leitura além do fim do buffer é um erro ([`NerError::Decode`]),
/// nunca um valor zerado.
pub struct BinaryDecoder<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> BinaryDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    pub fn next_1b(&mut self) -> Result<u8> {
        self.cursor
            .read_u8()
            .map_err(|_| NerError::decode("unexpected end of data reading 1 byte"))
    }

    pub fn next_4b(&mut self) -> Result<u32> {
        self.cursor
            .read_u32::<LittleEndian>()
            .map_err(|_| NerError::decode("unexpected end of data reading 4 bytes"))
    }

    pub fn next_str(&mut self) -> Result<String> {
        let mut len = self.next_1b()? as usize;
        if len == 255 {
            len = self.next_4b()? as usize;
        }
        let bytes = self.next_data(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| NerError::decode(format!("string is not valid UTF-8: {e}")))
    }

    fn next_data(&mut self, len: usize) -> Result<&'a [u8]> {
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = self.cursor.position() as usize;
        let end = start
            .checked_add(len)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| NerError::decode(format!("unexpected end of data reading {len} bytes")))?;
        self.cursor.set_position(end as u64);
        Ok(&data[start..end])
    }

    /// Verdadeiro quando todos os bytes foram consumidos.
    pub fn is_end(&self) -> bool {
        self.cursor.position() as usize >= self.cursor.get_ref().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_layout_is_little_endian() {
        let mut enc = BinaryEncoder::new();
        enc.add_1b(7u8).unwrap();
        enc.add_4b(0x0102_0304u32).unwrap();
        assert_eq!(enc.as_bytes(), &[7, 4, 3, 2, 1]);
    }

    #[test]
    fn test_long_string_uses_escape_length() {
        let long = "x".repeat(300);
        let mut enc = BinaryEncoder::new();
        enc.add_str("ab").unwrap();
        enc.add_str(&long).unwrap();
        let bytes = enc.into_bytes();
        assert_eq!(&bytes[..3], &[2, b'a', b'b']);
        assert_eq!(bytes[3], 255);
        assert_eq!(&bytes[4..8], &300u32.to_le_bytes());

        let mut dec = BinaryDecoder::new(&bytes);
        assert_eq!(dec.next_str().unwrap(), "ab");
        assert_eq!(dec.next_str().unwrap(), long);
        assert!(dec.is_end());
    }

    #[test]
    fn test_overflowing_one_byte_field_is_rejected() {
        let mut enc = BinaryEncoder::new();
        assert!(matches!(enc.add_1b(256usize), Err(NerError::Encode(_))));
    }

    #[test]
    fn test_truncated_input_is_an_error() {
        let mut dec = BinaryDecoder::new(&[1, 2, 3]);
        assert!(matches!(dec.next_4b(), Err(NerError::Decode(_))));

        let mut dec = BinaryDecoder::new(&[5, b'a']);
        assert!(matches!(dec.next_str(), Err(NerError::Decode(_))));
    }
}
