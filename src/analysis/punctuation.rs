use crate::error::{PunctalyzerError, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::str::FromStr;

/// The eighteen punctuation categories, in their fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Apostrophes,
    Colons,
    Commas,
    CurlyBrackets,
    DoubleInvertedCommas,
    Ellipses,
    EmDashes,
    EnDashes,
    ExclamationMarks,
    FullStops,
    Hyphens,
    OtherPunctuationMarks,
    QuestionMarks,
    RoundBrackets,
    Semicolons,
    Slashes,
    SquareBrackets,
    VerticalBars,
}

pub const CATEGORY_COUNT: usize = 18;

const ELLIPSIS_TOKEN: &str = "...";

/// How a category is counted.
#[derive(Debug, Clone, Copy)]
enum Rule {
    /// Every occurrence of any of these characters.
    Chars(&'static [char]),
    /// `…` characters plus non-overlapping `...` substrings.
    Ellipsis,
    /// `.` characters minus non-overlapping `...` substrings (one per triple, not three).
    FullStop,
}

impl Category {
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Apostrophes,
        Category::Colons,
        Category::Commas,
        Category::CurlyBrackets,
        Category::DoubleInvertedCommas,
        Category::Ellipses,
        Category::EmDashes,
        Category::EnDashes,
        Category::ExclamationMarks,
        Category::FullStops,
        Category::Hyphens,
        Category::OtherPunctuationMarks,
        Category::QuestionMarks,
        Category::RoundBrackets,
        Category::Semicolons,
        Category::Slashes,
        Category::SquareBrackets,
        Category::VerticalBars,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Category::Apostrophes => "apostrophes",
            Category::Colons => "colons",
            Category::Commas => "commas",
            Category::CurlyBrackets => "curly_brackets",
            Category::DoubleInvertedCommas => "double_inverted_commas",
            Category::Ellipses => "ellipses",
            Category::EmDashes => "em_dashes",
            Category::EnDashes => "en_dashes",
            Category::ExclamationMarks => "exclamation_marks",
            Category::FullStops => "full_stops",
            Category::Hyphens => "hyphens",
            Category::OtherPunctuationMarks => "other_punctuation_marks",
            Category::QuestionMarks => "question_marks",
            Category::RoundBrackets => "round_brackets",
            Category::Semicolons => "semicolons",
            Category::Slashes => "slashes",
            Category::SquareBrackets => "square_brackets",
            Category::VerticalBars => "vertical_bars",
        }
    }

    pub fn from_key(key: &str) -> Option<Category> {
        Self::ALL.iter().copied().find(|c| c.key() == key)
    }

    /// Position in the fixed order.
    pub fn index(self) -> usize {
        self as usize
    }

    fn rule(self) -> Rule {
        match self {
            Category::Apostrophes => Rule::Chars(&['\'', '’']),
            Category::Colons => Rule::Chars(&[':']),
            Category::Commas => Rule::Chars(&[',']),
            Category::CurlyBrackets => Rule::Chars(&['{', '}']),
            Category::DoubleInvertedCommas => Rule::Chars(&['"', '“', '”']),
            Category::Ellipses => Rule::Ellipsis,
            Category::EmDashes => Rule::Chars(&['—']),
            Category::EnDashes => Rule::Chars(&['–']),
            Category::ExclamationMarks => Rule::Chars(&['!']),
            Category::FullStops => Rule::FullStop,
            Category::Hyphens => Rule::Chars(&['-']),
            Category::OtherPunctuationMarks => Rule::Chars(&['*', '&', '%', '$', '@']),
            Category::QuestionMarks => Rule::Chars(&['?']),
            Category::RoundBrackets => Rule::Chars(&['(', ')']),
            Category::Semicolons => Rule::Chars(&[';']),
            Category::Slashes => Rule::Chars(&['/']),
            Category::SquareBrackets => Rule::Chars(&['[', ']']),
            Category::VerticalBars => Rule::Chars(&['|']),
        }
    }

    /// Count this category's occurrences in `content`.
    pub fn count_in(self, content: &str) -> usize {
        match self.rule() {
            Rule::Chars(set) => count_chars(content, set),
            Rule::Ellipsis => count_chars(content, &['…']) + content.matches(ELLIPSIS_TOKEN).count(),
            Rule::FullStop => {
                count_chars(content, &['.']) - content.matches(ELLIPSIS_TOKEN).count()
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl FromStr for Category {
    type Err = PunctalyzerError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        Category::from_key(&key).ok_or(PunctalyzerError::UnknownCategory {
            key: s.trim().to_string(),
        })
    }
}

fn count_chars(content: &str, set: &[char]) -> usize {
    content.chars().filter(|c| set.contains(c)).count()
}

/// Counts for all eighteen categories. Always complete: there is no way to
/// build one with a missing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PunctuationCounts {
    counts: [usize; CATEGORY_COUNT],
}

impl PunctuationCounts {
    pub fn from_array(counts: [usize; CATEGORY_COUNT]) -> Self {
        Self { counts }
    }

    pub fn get(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    pub fn set(&mut self, category: Category, value: usize) {
        self.counts[category.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, usize)> + '_ {
        Category::ALL.iter().map(move |c| (*c, self.get(*c)))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl Serialize for PunctuationCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CATEGORY_COUNT))?;
        for (category, count) in self.iter() {
            map.serialize_entry(category.key(), &count)?;
        }
        map.end()
    }
}

/// Tally every punctuation category in `content`.
pub fn count_punctuation(content: &str) -> PunctuationCounts {
    let mut counts = PunctuationCounts::default();
    for category in Category::ALL {
        counts.set(category, category.count_in(content));
    }
    counts
}
