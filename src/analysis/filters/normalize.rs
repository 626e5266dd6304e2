use crate::analysis::filter::TokenFilter;
use crate::analysis::token::Token;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Folds tokens to lower case (case-insensitive indexing)
pub struct LowercaseFilter;

impl TokenFilter for LowercaseFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens.into_iter()
            .map(|mut token| {
                if token.text.chars().any(char::is_uppercase) {
                    token.text = token.text.to_lowercase();
                }
                token
            })
            .collect()
    }

    fn name(&self) -> &str {
        "lowercase"
    }
}

/// Strips diacritical marks (diacritics-insensitive indexing)
pub struct DiacriticsFilter;

impl TokenFilter for DiacriticsFilter {
    fn filter(&self, tokens: Vec<Token>) -> Vec<Token> {
        tokens.into_iter()
            .map(|mut token| {
                if !token.text.is_ascii() {
                    token.text = strip_diacritics(&token.text);
                }
                token
            })
            .collect()
    }

    fn name(&self) -> &str {
        "diacritics"
    }
}

pub fn strip_diacritics(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfd() {
        match c {
            c if is_combining_mark(c) => {}
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("AE"),
            'œ' => out.push_str("oe"),
            'Œ' => out.push_str("OE"),
            // letters with a stroke have no decomposition
            'ø' => out.push('o'),
            'Ø' => out.push('O'),
            'đ' => out.push('d'),
            'Đ' => out.push('D'),
            'ł' => out.push('l'),
            'Ł' => out.push('L'),
            'ħ' => out.push('h'),
            'Ħ' => out.push('H'),
            'ŧ' => out.push('t'),
            'Ŧ' => out.push('T'),
            'ı' => out.push('i'),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_precomposed_and_combining_marks() {
        assert_eq!(strip_diacritics("café"), "cafe");
        assert_eq!(strip_diacritics("cafe\u{0301}"), "cafe");
        assert_eq!(strip_diacritics("Straße"), "Strasse");
        assert_eq!(strip_diacritics("Łódź"), "Lodz");
        assert_eq!(strip_diacritics("плохо"), "плохо");
    }

    #[test]
    fn strips_marks_outside_latin_1() {
        assert_eq!(strip_diacritics("Nguyễn Việt"), "Nguyen Viet");
        assert_eq!(strip_diacritics("Đường phố"), "Duong pho");
        assert_eq!(strip_diacritics("șțǎṭ"), "stat");
        assert_eq!(strip_diacritics("Ærø"), "AEro");
    }

    #[test]
    fn lowercases_tokens() {
        let tokens = vec![Token::new("ÉCOLE".to_string(), 0, 0)];
        let lowered = LowercaseFilter.filter(tokens);
        assert_eq!(lowered[0].text, "école");
        assert_eq!(DiacriticsFilter.filter(lowered)[0].text, "ecole");
    }
}
