//! Text processing and normalization

use crate::error::{Result, ResumeGapError};
use crate::processing::catalog::SkillCatalog;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Characters allowed inside a token; everything else separates tokens
pub fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '+' | '#' | '.' | '-')
}

fn is_edge_symbol(c: char) -> bool {
    matches!(c, '.' | '-' | '+' | '#' | '_')
}

/// Turns raw resume or job text into an ordered token sequence.
///
/// Words belonging to catalog variants are kept verbatim; all other words are
/// trimmed, filtered against a stopword list and stemmed.
pub struct Normalizer {
    stop_words: HashSet<&'static str>,
    protected_terms: HashSet<String>,
    stemmer: Stemmer,
    email_regex: Regex,
    phone_regex: Regex,
    url_regex: Regex,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::with_protected_terms(std::iter::empty::<String>())
    }
}

impl Normalizer {
    pub fn new(catalog: &SkillCatalog) -> Self {
        Self::with_protected_terms(catalog.protected_terms().iter().cloned())
    }

    pub fn with_protected_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let email_regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");

        let phone_regex = Regex::new(r"(?:\+?1[-. ]?)?\(?\b[0-9]{3}\)?[-. ]?[0-9]{3}[-. ]?[0-9]{4}\b")
            .expect("Invalid phone regex");

        let url_regex = Regex::new(r"(?:https?://|www\.)[^\s]+")
            .expect("Invalid URL regex");

        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
            protected_terms: terms.into_iter().map(Into::into).collect(),
            stemmer: Stemmer::create(Algorithm::English),
            email_regex,
            phone_regex,
            url_regex,
        }
    }

    /// Normalize text into tokens. Fails on empty or whitespace-only input.
    pub fn normalize(&self, text: &str) -> Result<Vec<String>> {
        if text.trim().is_empty() {
            return Err(ResumeGapError::EmptyInput("text".to_string()));
        }

        let cleaned = self.clean_text(text);

        Ok(cleaned
            .split(|c: char| !is_token_char(c))
            .filter(|piece| !piece.is_empty())
            .filter_map(|piece| self.normalize_piece(piece))
            .collect())
    }

    /// Strip contact details, fold unicode and lowercase
    pub fn clean_text(&self, text: &str) -> String {
        let mut cleaned = self.url_regex.replace_all(text, " ").to_string();
        cleaned = self.email_regex.replace_all(&cleaned, " ").to_string();
        cleaned = self.phone_regex.replace_all(&cleaned, " ").to_string();

        Self::normalize_unicode(&cleaned).to_lowercase()
    }

    pub fn is_protected(&self, token: &str) -> bool {
        self.protected_terms.contains(token)
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    fn normalize_piece(&self, piece: &str) -> Option<String> {
        if let Some(protected) = self.protected_form(piece) {
            return Some(protected.to_string());
        }

        let trimmed = piece.trim_matches(is_edge_symbol);
        if self.is_protected(trimmed) {
            return Some(trimmed.to_string());
        }

        if trimmed.chars().count() < 2
            || !trimmed.chars().any(char::is_alphabetic)
            || self.is_stop_word(trimmed)
        {
            return None;
        }

        if trimmed.chars().all(char::is_alphabetic) {
            Some(self.stemmer.stem(trimmed).into_owned())
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Peel sentence punctuation one character at a time so that "c++." and
    /// ".net." keep their symbols when the bare form is a catalog term.
    fn protected_form<'a>(&self, piece: &'a str) -> Option<&'a str> {
        let mut candidate = piece;
        loop {
            if self.is_protected(candidate) {
                return Some(candidate);
            }
            if let Some(rest) = candidate.strip_suffix(|c: char| c == '.' || c == '-') {
                candidate = rest;
            } else if let Some(rest) = candidate.strip_prefix('-') {
                candidate = rest;
            } else {
                return None;
            }
        }
    }

    fn normalize_unicode(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2013}' | '\u{2014}' => '-',
                '\u{2026}' => '.',
                _ => c,
            })
            .nfkd()
            .filter(|c| !is_combining_mark(*c))
            .collect()
    }
}

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "ain", "all", "am", "an",
    "and", "any", "are", "aren", "as", "at", "be", "because", "been", "before",
    "being", "below", "between", "both", "but", "by", "can", "couldn", "d", "did",
    "didn", "do", "does", "doesn", "doing", "don", "down", "during", "each", "etc",
    "few", "for", "from", "further", "had", "hadn", "has", "hasn", "have", "haven",
    "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how",
    "i", "if", "in", "into", "is", "isn", "it", "its", "itself", "just", "ll", "m",
    "ma", "me", "mightn", "more", "most", "mustn", "my", "myself", "needn", "no",
    "nor", "not", "now", "o", "of", "off", "on", "once", "only", "or", "other",
    "our", "ours", "ourselves", "out", "over", "own", "re", "s", "same", "shan",
    "she", "should", "shouldn", "so", "some", "such", "t", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they",
    "this", "those", "through", "to", "too", "under", "until", "up", "ve", "very",
    "was", "wasn", "we", "were", "weren", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "won", "would", "wouldn", "y", "you",
    "your", "yours", "yourself", "yourselves",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::with_protected_terms(["c++", "node.js", ".net", "c#", "machine", "learning", "python"])
    }

    #[test]
    fn test_tokenization() {
        let tokens = normalizer().normalize("Rust programming language is awesome!").unwrap();

        assert_eq!(tokens, vec!["rust", "program", "languag", "awesom"]);
    }

    #[test]
    fn test_versioned_terms_survive() {
        let tokens = normalizer()
            .normalize("Built services in C++, Node.js and .NET (C#).")
            .unwrap();

        assert!(tokens.contains(&"c++".to_string()));
        assert!(tokens.contains(&"node.js".to_string()));
        assert!(tokens.contains(&".net".to_string()));
        assert!(tokens.contains(&"c#".to_string()));
    }

    #[test]
    fn test_protected_words_are_not_stemmed() {
        let tokens = normalizer().normalize("Machine Learning and learning systems").unwrap();

        assert_eq!(tokens, vec!["machine", "learning", "learning", "system"]);
    }

    #[test]
    fn test_trailing_punctuation_is_trimmed() {
        let tokens = normalizer().normalize("I love Python. Also -- scripting...").unwrap();

        assert_eq!(tokens, vec!["love", "python", "also", "script"]);
    }

    #[test]
    fn test_sentence_final_symbol_skills_survive() {
        let processor = Normalizer::with_protected_terms(["c++", "c#", ".net", "c", "programming"]);
        let tokens = processor
            .normalize("I write C++. Also C#. Built on .NET.")
            .unwrap();

        assert_eq!(tokens, vec!["write", "c++", "also", "c#", "built", ".net"]);
    }

    #[test]
    fn test_list_separators_around_symbol_skills() {
        let processor = Normalizer::with_protected_terms(["c++", "node.js"]);
        let tokens = processor.normalize("Stack: -C++- and Node.js...").unwrap();

        assert_eq!(tokens, vec!["stack", "c++", "node.js"]);
    }

    #[test]
    fn test_contact_details_removed() {
        let processor = normalizer();
        let cleaned = processor.clean_text(
            "Contact me at john.doe@email.com, (555) 123-4567 or https://example.com/me",
        );

        assert!(!cleaned.contains("john.doe"));
        assert!(!cleaned.contains("555"));
        assert!(!cleaned.contains("example.com"));
    }

    #[test]
    fn test_unicode_folding() {
        let tokens = Normalizer::default().normalize("Café \u{201C}naïve\u{201D} résumé").unwrap();

        assert_eq!(tokens, vec!["cafe", "naiv", "resum"]);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        let processor = normalizer();

        assert!(matches!(processor.normalize(""), Err(ResumeGapError::EmptyInput(_))));
        assert!(matches!(processor.normalize(" \n\t "), Err(ResumeGapError::EmptyInput(_))));
    }

    #[test]
    fn test_only_stopwords_yields_no_tokens() {
        let tokens = normalizer().normalize("and the of, to!").unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_duplicates_are_retained() {
        let tokens = normalizer().normalize("python python PYTHON").unwrap();
        assert_eq!(tokens.len(), 3);
    }
}
