use chrono::{Datelike, NaiveDate};

pub const CHALLENGE_PARAM: &str = "challenge";

const TEASERS: [&str; 5] = [
    "🧩 Can you unscramble today's inspirational quote?\n\nTest your word puzzle skills with this daily quote challenge!",
    "🎯 Think you're good with words? Try this quote puzzle!\n\nUnscramble the wisdom - can you solve it?",
    "💭 A famous quote awaits your puzzle-solving skills!\n\nCan you unscramble the scrambled words?",
    "🔤 Word puzzle challenge: Unscramble the inspirational quote!\n\nPut your vocabulary to the test!",
    "✨ Hidden wisdom in scrambled words...\n\nCan you reveal the inspirational quote?",
];

/// Link that opens the puzzle for `date`. A challenge already on `base` is
/// replaced.
pub fn challenge_url(base: &str, date: NaiveDate) -> String {
    let base = strip_challenge(base);
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{CHALLENGE_PARAM}={}", date.format("%Y-%m-%d"))
}

/// Accepts either a bare `YYYY-MM-DD` or any link carrying `challenge=`.
pub fn parse_challenge(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    query_pairs(input)
        .find(|(key, _)| *key == CHALLENGE_PARAM)
        .and_then(|(_, value)| NaiveDate::parse_from_str(value, "%Y-%m-%d").ok())
}

/// The link with its `challenge` parameter removed.
pub fn strip_challenge(link: &str) -> String {
    let (rest, fragment) = match link.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (link, None),
    };
    let Some((base, query)) = rest.split_once('?') else {
        return link.to_string();
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split('=').next() != Some(CHALLENGE_PARAM))
        .collect();

    let mut out = base.to_string();
    if !kept.is_empty() {
        out.push('?');
        out.push_str(&kept.join("&"));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

fn query_pairs(link: &str) -> impl Iterator<Item = (&str, &str)> {
    let query = link
        .split('#')
        .next()
        .and_then(|rest| rest.split_once('?'))
        .map(|(_, query)| query)
        .unwrap_or("");
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
}

pub fn teaser(date: NaiveDate) -> &'static str {
    TEASERS[date.day() as usize % TEASERS.len()]
}

/// Teaser and link, ready to paste.
pub fn share_message(base: &str, date: NaiveDate) -> String {
    format!("{}\n\n{}", teaser(date), challenge_url(base, date))
}
