pub mod punctuation;
pub mod words;

pub use punctuation::{count_punctuation, Category, PunctuationCounts, CATEGORY_COUNT};
pub use words::count_words;
