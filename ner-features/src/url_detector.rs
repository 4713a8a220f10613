//! Classificador de formas de superfície em URL, e-mail ou nenhum dos dois.
//!
//! O token inteiro precisa casar; pontuação colada (`"www.ufal.cz,"`) faz a
//! detecção falhar, já que o tokenizador costuma separá-la antes.

use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlType {
    NoUrl,
    Url,
    Email,
}

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:mailto:)?[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$")
        .unwrap()
});

/// URLs com esquema (`https://...`), com prefixo `www.` ou com um domínio de
/// primeiro nível conhecido, seguidos opcionalmente de porta e caminho.
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"(?i:https?|ftp|ftps|file|sftp)://[^\s/?#]+",
        r"|(?i:www)\d{0,3}\.(?:[A-Za-z0-9-]+\.)*[A-Za-z]{2,}",
        r"|(?:[A-Za-z0-9-]+\.)+(?i:com|org|net|edu|gov|mil|int|info|biz|name|io|eu|cz|sk|de|at|pl|uk|us|fr|it|es|nl|ru|br|pt)",
        r")(?::\d{1,5})?(?:[/?#]\S*)?$",
    ))
    .unwrap()
});

/// Classifica `form`.
pub fn detect(form: &str) -> UrlType {
    // Fora URLs com esquema, toda URL e todo e-mail contém um ponto; a maioria
    // dos tokens não.
    if !form.contains('.') && !form.contains("://") {
        return UrlType::NoUrl;
    }
    if EMAIL.is_match(form) {
        UrlType::Email
    } else if URL.is_match(form) {
        UrlType::Url
    } else {
        UrlType::NoUrl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        for form in [
            "http://ufal.mff.cuni.cz",
            "https://example.org/path?q=1#frag",
            "HTTPS://EXAMPLE.ORG",
            "ftp://files.example.com/pub/",
            "www.seznam.cz",
            "www2.example.com/index.html",
            "lindat.cz",
            "example.com:8080/api",
            "http://localhost:8080",
            "https://intranet/wiki",
        ] {
            assert_eq!(detect(form), UrlType::Url, "{form}");
        }
    }

    #[test]
    fn test_emails() {
        for form in [
            "jan.novak@example.cz",
            "first+tag@mail.example.org",
            "mailto:info@ufal.cz",
        ] {
            assert_eq!(detect(form), UrlType::Email, "{form}");
        }
    }

    #[test]
    fn test_ordinary_tokens() {
        for form in ["Praha", "3.14", "atd.", "e.g.", "Mr.", "a@b", "", "www.", "http://"] {
            assert_eq!(detect(form), UrlType::NoUrl, "{form}");
        }
    }
}
