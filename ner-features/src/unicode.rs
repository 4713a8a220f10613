//! Classificação de caixa de code points Unicode.
//!
//! Distingue letras maiúsculas ou titlecase (`Lu`, `Lt`), minúsculas (`Ll`) e
//! todo o resto, pela categoria geral do code point. As propriedades derivadas
//! de [`char::is_uppercase`] não servem: elas incluem `Other_Uppercase` e
//! `Other_Lowercase` (`Ⓐ`, `Ⅻ`, `ª`), que não são letras com caixa.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Classe de caixa de um code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseClass {
    /// `Lu` ou `Lt`.
    Upper,
    /// `Ll`.
    Lower,
    Other,
}

pub fn is_titlecase(c: char) -> bool {
    get_general_category(c) == GeneralCategory::TitlecaseLetter
}

#[inline]
pub fn case_class(c: char) -> CaseClass {
    if c.is_ascii() {
        return match c {
            'A'..='Z' => CaseClass::Upper,
            'a'..='z' => CaseClass::Lower,
            _ => CaseClass::Other,
        };
    }
    match get_general_category(c) {
        GeneralCategory::UppercaseLetter | GeneralCategory::TitlecaseLetter => CaseClass::Upper,
        GeneralCategory::LowercaseLetter => CaseClass::Lower,
        _ => CaseClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_and_accented_letters() {
        assert_eq!(case_class('A'), CaseClass::Upper);
        assert_eq!(case_class('z'), CaseClass::Lower);
        assert_eq!(case_class('Č'), CaseClass::Upper);
        assert_eq!(case_class('ř'), CaseClass::Lower);
        assert_eq!(case_class('7'), CaseClass::Other);
        assert_eq!(case_class('-'), CaseClass::Other);
    }

    #[test]
    fn test_titlecase_counts_as_upper() {
        assert!(is_titlecase('ǅ'));
        assert!(!is_titlecase('D'));
        assert_eq!(case_class('ǅ'), CaseClass::Upper);
        assert_eq!(case_class('ᾼ'), CaseClass::Upper);
    }

    #[test]
    fn test_letters_without_case() {
        assert_eq!(case_class('語'), CaseClass::Other);
    }

    #[test]
    fn test_other_uppercase_and_lowercase_are_not_letters() {
        // Nl, So e Lo, respectivamente.
        assert_eq!(case_class('Ⅻ'), CaseClass::Other);
        assert_eq!(case_class('Ⓐ'), CaseClass::Other);
        assert_eq!(case_class('ª'), CaseClass::Other);
    }
}
