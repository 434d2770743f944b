use crate::catalog::{Quote, ScrambledWord, scramble};
use crate::engine::verifier;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Position in the quote's `scrambled_words`.
    Word(usize),
    Author,
}

/// The word or author currently being unscrambled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub kind: TargetKind,
    /// Lowercase original; for the author this is the cleaned name with
    /// spaces between name parts.
    pub original: String,
    pub scrambled: String,
    /// Letter tiles the player picks from. The author's tiles carry no spaces.
    pub letters: Vec<char>,
    /// Length of each name part, so the author input can be drawn with gaps.
    /// Empty for words.
    pub word_structure: Vec<usize>,
}

impl Target {
    pub fn word(position: usize, word: &ScrambledWord) -> Self {
        Self {
            kind: TargetKind::Word(position),
            original: word.original.to_lowercase(),
            scrambled: word.scrambled.clone(),
            letters: word.scrambled.chars().collect(),
            word_structure: Vec::new(),
        }
    }

    pub fn author(quote: &Quote) -> Self {
        let original = scramble::clean_author(&quote.author);
        Self {
            kind: TargetKind::Author,
            scrambled: quote.scrambled_author.clone(),
            letters: quote
                .scrambled_author
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect(),
            word_structure: original
                .split_whitespace()
                .map(|part| part.chars().count())
                .collect(),
            original,
        }
    }

    pub fn is_author(&self) -> bool {
        self.kind == TargetKind::Author
    }

    pub fn comparison_len(&self) -> usize {
        verifier::comparison_len(&self.original, self.is_author())
    }

    /// The letters that have to be placed, in order.
    pub fn answer(&self) -> Vec<char> {
        self.original
            .chars()
            .filter(|c| !(self.is_author() && c.is_whitespace()))
            .collect()
    }

    pub fn matches(&self, input: &str) -> bool {
        verifier::matches(input, &self.original, self.is_author())
    }
}
