//! # Erros
//!
//! Todos os erros do crate passam por [`NerError`]. Há três famílias:
//!
//! 1. **Configuração**: argumentos inválidos, arquivos de recursos ilegíveis ou
//!    malformados, templates desconhecidos. Abortam a montagem do pipeline.
//! 2. **Persistência**: bytes truncados ou inconsistentes na carga, valores que
//!    não cabem no campo na gravação.
//! 3. **Inferência**: não existe. Ausência de chave, número inválido etc. são
//!    resultados normais ("feature ausente") e nunca viram erro.

use std::path::PathBuf;

/// Resultado especializado do crate.
pub type Result<T, E = NerError> = std::result::Result<T, E>;

/// O tipo de erro do crate.
#[derive(Debug, thiserror::Error)]
pub enum NerError {
    /// Argumento inválido para um processador (aridade, janela, tipo de entidade).
    #[error("{processor}: {msg}")]
    InvalidArgument {
        /// Nome do processador que rejeitou o argumento.
        processor: &'static str,
        /// Mensagem descritiva.
        msg: String,
    },

    /// Arquivo de recurso que não pôde ser aberto ou lido.
    #[error("cannot read resource file '{}': {source}", path.display())]
    Resource {
        /// Caminho do arquivo.
        path: PathBuf,
        /// Causa.
        #[source]
        source: std::io::Error,
    },

    /// Linha malformada ou chave duplicada num arquivo de recurso.
    #[error("{}:{line}: {msg}", path.display())]
    InvalidFormat {
        /// Caminho do arquivo.
        path: PathBuf,
        /// Número da linha (começando em 1).
        line: usize,
        /// Mensagem descritiva.
        msg: String,
    },

    /// Linha inválida na descrição textual dos templates de features.
    #[error("feature template line {line}: {msg}")]
    InvalidTemplate {
        /// Número da linha (começando em 1).
        line: usize,
        /// Mensagem descritiva.
        msg: String,
    },

    /// Dados binários truncados ou inconsistentes.
    #[error("cannot decode model: {0}")]
    Decode(String),

    /// Valor que não cabe no campo binário correspondente.
    #[error("cannot encode model: {0}")]
    Encode(String),

    /// Erro de E/S genérico.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl NerError {
    pub(crate) fn invalid_argument<S>(processor: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument {
            processor,
            msg: msg.into(),
        }
    }

    pub(crate) fn invalid_format<P, S>(path: P, line: usize, msg: S) -> Self
    where
        P: Into<PathBuf>,
        S: Into<String>,
    {
        Self::InvalidFormat {
            path: path.into(),
            line,
            msg: msg.into(),
        }
    }

    pub(crate) fn resource<P>(path: P, source: std::io::Error) -> Self
    where
        P: Into<PathBuf>,
    {
        Self::Resource {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn decode<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::Decode(msg.into())
    }

    pub(crate) fn encode<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::Encode(msg.into())
    }
}
