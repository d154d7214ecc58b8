use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}_]+").expect("word pattern is valid");
}

/// Count maximal runs of word characters (letters, digits, underscore).
pub fn count_words(content: &str) -> usize {
    WORD.find_iter(content).count()
}
