//! Pinyin tone-notation conversion.
//!
//! Dictionary values store syllables in diacritic-mark notation; the
//! other notations are derived positionally from the marked-vowel
//! alphabet below. No per-character lookup table exists: family and tone
//! fall out of a glyph's index.

/// Output notation for pinyin syllables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinyinFormat {
    /// Diacritic vowels as stored: `hǎo`.
    WithToneMark,
    /// ASCII syllable with a trailing tone digit 1-5: `hao3`. Neutral
    /// tone is always digit 5, never an absent digit.
    WithToneNumber,
    /// Bare ASCII with duplicates collapsed across a word: `hao`.
    WithoutTone,
}

/// Separator between syllables inside stored dictionary values.
pub(crate) const SYLLABLE_SEPARATOR: char = ',';

const BARE_VOWELS: [char; 6] = ['a', 'e', 'i', 'o', 'u', 'v'];

/// The 24 marked vowels, four tones per family in tone order. The
/// ordering is load-bearing: family = index / 4 into [`BARE_VOWELS`],
/// tone number = index % 4 + 1.
const MARKED_VOWELS: [char; 24] = [
    'ā', 'á', 'ǎ', 'à', 'ē', 'é', 'ě', 'è', 'ī', 'í', 'ǐ', 'ì',
    'ō', 'ó', 'ǒ', 'ò', 'ū', 'ú', 'ǔ', 'ù', 'ǖ', 'ǘ', 'ǚ', 'ǜ',
];

/// Convert one stored comma-joined pronunciation string into `format`,
/// one entry per syllable (merged for [`PinyinFormat::WithoutTone`],
/// which deduplicates).
pub fn format_pinyin(pinyin: &str, format: PinyinFormat) -> Vec<String> {
    match format {
        PinyinFormat::WithToneMark => pinyin
            .split(SYLLABLE_SEPARATOR)
            .map(str::to_owned)
            .collect(),
        PinyinFormat::WithToneNumber => pinyin
            .split(SYLLABLE_SEPARATOR)
            .map(with_tone_number)
            .collect(),
        PinyinFormat::WithoutTone => without_tone(pinyin),
    }
}

/// Diacritic syllable to ASCII plus tone digit: `hǎo` → `hao3`,
/// `ma` → `ma5`.
fn with_tone_number(syllable: &str) -> String {
    let mut out = String::with_capacity(syllable.len() + 1);
    let mut tone = 5u8; // neutral unless a marked vowel is found
    for c in syllable.chars() {
        let c = if c == 'ü' { 'v' } else { c };
        match MARKED_VOWELS.iter().position(|&m| m == c) {
            Some(p) => {
                tone = (p % 4) as u8 + 1;
                out.push(BARE_VOWELS[p / 4]);
            }
            None => out.push(c),
        }
    }
    out.push((b'0' + tone) as char);
    out
}

/// Strip tone marks from a comma-joined pronunciation string, collapsing
/// duplicate bare forms while preserving first-seen order. Two distinct
/// toned readings of one word can map to the same bare syllable.
fn without_tone(pinyin: &str) -> Vec<String> {
    let stripped: String = pinyin
        .chars()
        .map(|c| {
            if c == 'ü' {
                return 'v';
            }
            match MARKED_VOWELS.iter().position(|&m| m == c) {
                Some(p) => BARE_VOWELS[p / 4],
                None => c,
            }
        })
        .collect();

    let mut out: Vec<String> = Vec::new();
    for syllable in stripped.split(SYLLABLE_SEPARATOR) {
        if !out.iter().any(|seen| seen == syllable) {
            out.push(syllable.to_owned());
        }
    }
    out
}
