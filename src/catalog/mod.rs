use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod calendar;
pub mod scramble;

#[derive(Embed)]
#[folder = "assets/catalog/"]
struct CatalogAssets;

const BUNDLED_CATALOG: &str = "quotes.json";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrambledWord {
    /// Position of the word in the whitespace-split quote text.
    pub index: usize,
    pub original: String,
    pub scrambled: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub date: NaiveDate,
    pub text: String,
    pub author: String,
    pub scrambled_words: Vec<ScrambledWord>,
    pub scrambled_author: String,
}

impl Quote {
    /// Words of the quote text as displayed, punctuation included.
    pub fn display_words(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }

    /// The scrambled entry for the word at `index` in the text, with its
    /// position in `scrambled_words`. Punctuation-only words have none.
    pub fn word_at(&self, index: usize) -> Option<(usize, &ScrambledWord)> {
        self.scrambled_words
            .iter()
            .enumerate()
            .find(|(_, w)| w.index == index)
    }
}

/// Catalog entry as stored on disk. Scrambles may be omitted and are then
/// generated deterministically from the date.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteEntry {
    pub date: NaiveDate,
    pub text: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrambled_words: Option<Vec<ScrambledWord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrambled_author: Option<String>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("bundled catalog asset is missing")]
    MissingAsset,
    #[error("catalog has no quotes")]
    Empty,
    #[error("duplicate quote for {0}")]
    DuplicateDate(NaiveDate),
    #[error("scramble for {date} word {index} ({original:?}) does not cover its letters")]
    BadScramble {
        date: NaiveDate,
        index: usize,
        original: String,
    },
    #[error("scrambled author for {0} does not cover the author's letters")]
    BadAuthorScramble(NaiveDate),
}

pub struct Catalog {
    quotes: Vec<Quote>,
    by_date: BTreeMap<NaiveDate, usize>,
}

impl Catalog {
    pub fn bundled() -> Result<Self, CatalogError> {
        let file = CatalogAssets::get(BUNDLED_CATALOG).ok_or(CatalogError::MissingAsset)?;
        let json = String::from_utf8_lossy(file.data.as_ref());
        Self::from_json(&json)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<QuoteEntry> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Build a catalog, filling missing scrambles and rejecting duplicate dates
    /// or scrambles that lack letters of their original.
    pub fn from_entries(entries: Vec<QuoteEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut quotes = Vec::with_capacity(entries.len());
        let mut by_date = BTreeMap::new();
        for entry in entries {
            let quote = scramble::fill(entry);
            validate(&quote)?;
            if by_date.insert(quote.date, quotes.len()).is_some() {
                return Err(CatalogError::DuplicateDate(quote.date));
            }
            quotes.push(quote);
        }

        log::debug!("catalog loaded with {} quotes", quotes.len());
        Ok(Self { quotes, by_date })
    }

    pub fn get(&self, date: NaiveDate) -> Option<&Quote> {
        self.by_date.get(&date).map(|&i| &self.quotes[i])
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.by_date.contains_key(&date)
    }

    /// The first entry in catalog order, used when today has no quote.
    pub fn first(&self) -> Option<&Quote> {
        self.quotes.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Quote> {
        self.quotes.iter()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.by_date.keys().next().copied()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.by_date.keys().next_back().copied()
    }
}

fn validate(quote: &Quote) -> Result<(), CatalogError> {
    for word in &quote.scrambled_words {
        if !scramble::covers(&word.original, &word.scrambled) {
            return Err(CatalogError::BadScramble {
                date: quote.date,
                index: word.index,
                original: word.original.clone(),
            });
        }
    }
    if !scramble::covers(&scramble::clean_author(&quote.author), &quote.scrambled_author) {
        return Err(CatalogError::BadAuthorScramble(quote.date));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const WILDE: &str = r#"[
        {
            "date": "2026-10-19",
            "text": "be yourself",
            "author": "Oscar Wilde",
            "scrambledWords": [
                {"index": 0, "original": "be", "scrambled": "eb"},
                {"index": 1, "original": "yourself", "scrambled": "fselfruoy"}
            ],
            "scrambledAuthor": "racos edliw"
        },
        {
            "date": "2026-10-18",
            "text": "Stay hungry, stay foolish.",
            "author": "Steve Jobs"
        }
    ]"#;

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = Catalog::bundled().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.first().is_some());
    }

    #[test]
    fn test_bundled_authors_scramble_to_letters_only() {
        let catalog = Catalog::bundled().unwrap();
        for quote in catalog.iter() {
            assert!(
                quote
                    .scrambled_author
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == ' '),
                "{}: {:?}",
                quote.date,
                quote.scrambled_author
            );
        }
    }

    #[test]
    fn test_word_at_skips_punctuation_only_words() {
        let catalog = Catalog::from_json(
            r#"[{"date": "2026-01-01", "text": "Be — yourself", "author": "Oscar Wilde"}]"#,
        )
        .unwrap();
        let quote = catalog.first().unwrap();
        assert_eq!(quote.word_at(0).map(|(p, w)| (p, w.original.as_str())), Some((0, "be")));
        assert!(quote.word_at(1).is_none());
        assert_eq!(
            quote.word_at(2).map(|(p, w)| (p, w.original.as_str())),
            Some((1, "yourself"))
        );
    }

    #[test]
    fn test_prescrambled_entry_kept_verbatim() {
        let catalog = Catalog::from_json(WILDE).unwrap();
        let quote = catalog.get(date(2026, 10, 19)).unwrap();
        assert_eq!(quote.scrambled_words[1].scrambled, "fselfruoy");
        assert_eq!(quote.scrambled_author, "racos edliw");
    }

    #[test]
    fn test_missing_scrambles_are_generated() {
        let catalog = Catalog::from_json(WILDE).unwrap();
        let quote = catalog.get(date(2026, 10, 18)).unwrap();
        let originals: Vec<&str> = quote
            .scrambled_words
            .iter()
            .map(|w| w.original.as_str())
            .collect();
        assert_eq!(originals, vec!["stay", "hungry", "stay", "foolish"]);
        assert_eq!(quote.scrambled_author.split(' ').count(), 2);
    }

    #[test]
    fn test_first_follows_file_order() {
        let catalog = Catalog::from_json(WILDE).unwrap();
        assert_eq!(catalog.first().unwrap().date, date(2026, 10, 19));
        assert_eq!(catalog.earliest_date(), Some(date(2026, 10, 18)));
    }

    #[test]
    fn test_duplicate_date_rejected() {
        let json = r#"[
            {"date": "2026-01-01", "text": "a b", "author": "X Y"},
            {"date": "2026-01-01", "text": "c d", "author": "Z W"}
        ]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateDate(_))
        ));
    }

    #[test]
    fn test_scramble_missing_letters_rejected() {
        let json = r#"[{
            "date": "2026-01-01",
            "text": "hello",
            "author": "Ann",
            "scrambledWords": [{"index": 0, "original": "hello", "scrambled": "leho"}],
            "scrambledAuthor": "nna"
        }]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::BadScramble { index: 0, .. })
        ));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(Catalog::from_json("[]"), Err(CatalogError::Empty)));
    }
}
