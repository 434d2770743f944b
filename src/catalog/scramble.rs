use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::catalog::{Quote, QuoteEntry, ScrambledWord};

const MAX_SHUFFLES: usize = 8;

/// Seed derived from the date so every install scrambles a quote the same way.
pub fn seed_for(date: NaiveDate) -> u64 {
    date.num_days_from_ce() as u64
}

/// Lowercase the word and drop everything that isn't a letter or digit.
pub fn clean_word(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Shuffle the letters, retrying a few times so the result differs from the
/// word whenever the word has at least two distinct letters.
pub fn scramble_word(word: &str, rng: &mut SmallRng) -> String {
    let mut letters: Vec<char> = word.chars().collect();
    let first = letters.first().copied();
    if letters.iter().all(|&c| Some(c) == first) {
        return word.to_string();
    }

    for _ in 0..MAX_SHUFFLES {
        letters.shuffle(rng);
        let candidate: String = letters.iter().collect();
        if candidate != word {
            return candidate;
        }
    }
    // Two-letter words can keep landing on the original; a rotation always differs.
    letters = word.chars().collect();
    letters.rotate_left(1);
    letters.into_iter().collect()
}

pub fn scramble_words(text: &str, rng: &mut SmallRng) -> Vec<ScrambledWord> {
    text.split_whitespace()
        .enumerate()
        .filter_map(|(index, raw)| {
            let original = clean_word(raw);
            if original.is_empty() {
                return None;
            }
            let scrambled = scramble_word(&original, rng);
            Some(ScrambledWord {
                index,
                original,
                scrambled,
            })
        })
        .collect()
}

/// The author as the player types it: lowercase name parts, letters and
/// digits only, single spaces between parts. Initials like "J." keep the letter.
pub fn clean_author(author: &str) -> String {
    author
        .split_whitespace()
        .map(clean_word)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scramble each name part on its own, keeping single spaces at part boundaries.
pub fn scramble_author(author: &str, rng: &mut SmallRng) -> String {
    clean_author(author)
        .split(' ')
        .filter(|part| !part.is_empty())
        .map(|part| scramble_word(part, rng))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turn a catalog entry into a quote, generating whatever scrambles it lacks.
pub fn fill(entry: QuoteEntry) -> Quote {
    let mut rng = SmallRng::seed_from_u64(seed_for(entry.date));
    let scrambled_words = match entry.scrambled_words {
        Some(words) => words,
        None => scramble_words(&entry.text, &mut rng),
    };
    let scrambled_author = match entry.scrambled_author {
        Some(author) => author,
        None => scramble_author(&entry.author, &mut rng),
    };
    Quote {
        date: entry.date,
        text: entry.text,
        author: entry.author,
        scrambled_words,
        scrambled_author,
    }
}

/// Catalog entry with every scramble spelled out.
pub fn to_entry(quote: &Quote) -> QuoteEntry {
    QuoteEntry {
        date: quote.date,
        text: quote.text.clone(),
        author: quote.author.clone(),
        scrambled_words: Some(quote.scrambled_words.clone()),
        scrambled_author: Some(quote.scrambled_author.clone()),
    }
}

/// True when `scrambled` holds at least every non-space letter of `original`,
/// compared case-insensitively. Extra decoy letters are allowed.
pub fn covers(original: &str, scrambled: &str) -> bool {
    let mut pool: HashMap<char, usize> = HashMap::new();
    for c in scrambled.chars().filter(|c| !c.is_whitespace()) {
        for lower in c.to_lowercase() {
            *pool.entry(lower).or_default() += 1;
        }
    }
    for c in original.chars().filter(|c| !c.is_whitespace()) {
        for lower in c.to_lowercase() {
            match pool.get_mut(&lower) {
                Some(n) if *n > 0 => *n -= 1,
                _ => return false,
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn test_clean_word_strips_punctuation() {
        assert_eq!(clean_word("Hungry,"), "hungry");
        assert_eq!(clean_word("don't"), "dont");
        assert_eq!(clean_word("—"), "");
    }

    #[test]
    fn test_scramble_word_differs_and_covers() {
        let mut rng = rng();
        for word in ["be", "yourself", "stay", "foolish", "imagination"] {
            let scrambled = scramble_word(word, &mut rng);
            assert_ne!(scrambled, word);
            assert!(covers(word, &scrambled));
            assert_eq!(scrambled.chars().count(), word.chars().count());
        }
    }

    #[test]
    fn test_scramble_word_single_letter_unchanged() {
        let mut rng = rng();
        assert_eq!(scramble_word("a", &mut rng), "a");
        assert_eq!(scramble_word("ooo", &mut rng), "ooo");
    }

    #[test]
    fn test_scramble_words_keeps_text_positions() {
        let mut rng = rng();
        let words = scramble_words("Be — yourself!", &mut rng);
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].index, 0);
        assert_eq!(words[1].index, 2);
        assert_eq!(words[1].original, "yourself");
    }

    #[test]
    fn test_scramble_author_preserves_part_lengths() {
        let mut rng = rng();
        let scrambled = scramble_author("Oscar Wilde", &mut rng);
        let lengths: Vec<usize> = scrambled.split(' ').map(|p| p.len()).collect();
        assert_eq!(lengths, vec![5, 5]);
        assert!(covers("oscar wilde", &scrambled));
    }

    #[test]
    fn test_author_punctuation_never_becomes_a_tile() {
        assert_eq!(clean_author("J. R. R. Tolkien"), "j r r tolkien");
        assert_eq!(clean_author("Martin Luther King, Jr."), "martin luther king jr");
        assert_eq!(clean_author(" — Anonymous "), "anonymous");

        let mut rng = rng();
        let scrambled = scramble_author("J. R. R. Tolkien", &mut rng);
        assert!(scrambled.chars().all(|c| c.is_alphanumeric() || c == ' '));
        let lengths: Vec<usize> = scrambled.split(' ').map(|p| p.len()).collect();
        assert_eq!(lengths, vec![1, 1, 1, 7]);
        assert!(covers("j r r tolkien", &scrambled));
    }

    #[test]
    fn test_fill_is_deterministic_per_date() {
        let entry = QuoteEntry {
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            text: "Imagination is more important than knowledge.".to_string(),
            author: "Albert Einstein".to_string(),
            scrambled_words: None,
            scrambled_author: None,
        };
        let a = fill(entry.clone());
        let b = fill(entry);
        assert_eq!(a, b);

        // Writing the scrambles out and reading them back changes nothing.
        assert_eq!(fill(to_entry(&a)), a);
    }

    #[test]
    fn test_covers_allows_decoys() {
        assert!(covers("yourself", "fselfruoy"));
        assert!(covers("oscar wilde", "racos edliw"));
        assert!(!covers("hello", "leho"));
    }
}
