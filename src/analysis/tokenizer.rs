use crate::analysis::token::Token;
use unicode_segmentation::UnicodeSegmentation;

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;
}

/// Standard Unicode word tokenizer
#[derive(Debug, Clone)]
pub struct StandardTokenizer {
    pub max_token_length: usize,
}

impl Default for StandardTokenizer {
    fn default() -> Self {
        StandardTokenizer {
            max_token_length: 255,
        }
    }
}

impl Tokenizer for StandardTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut position = 0u32;

        for (offset, word) in text.unicode_word_indices() {
            if word.len() <= self.max_token_length {
                tokens.push(Token::new(word.to_string(), position, offset));
            }
            // overlong words still occupy a position
            position += 1;
        }

        tokens
    }

    fn name(&self) -> &str {
        "standard"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_word_boundaries() {
        let tokens = StandardTokenizer::default().tokenize("Hello, wide world!");
        let words: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["Hello", "wide", "world"]);
        assert_eq!(tokens[2].position, 2);
        assert_eq!(tokens[2].offset, 12);
    }

    #[test]
    fn skips_overlong_words_but_keeps_positions() {
        let tokenizer = StandardTokenizer { max_token_length: 3 };
        let tokens = tokenizer.tokenize("abc abcdef xyz");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "xyz");
        assert_eq!(tokens[1].position, 2);
    }
}
