use icu_normalizer::ComposingNormalizerBorrowed;

fn normalize(text: &str, strip_whitespace: bool) -> String {
    let composed = ComposingNormalizerBorrowed::new_nfc().normalize(text);
    composed
        .chars()
        .filter(|c| !(strip_whitespace && c.is_whitespace()))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Compare typed input against a target word or author. Case never matters;
/// for the author, whitespace is ignored on both sides because the name is
/// typed as one letter run.
pub fn matches(input: &str, target: &str, is_author: bool) -> bool {
    normalize(input, is_author) == normalize(target, is_author)
}

/// Number of letters the player has to place to complete the target.
pub fn comparison_len(target: &str, is_author: bool) -> usize {
    target
        .chars()
        .filter(|c| !(is_author && c.is_whitespace()))
        .count()
}
