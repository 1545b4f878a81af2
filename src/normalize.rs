//! Query canonicalization.
//!
//! Raw questions arrive in every spelling a visitor can produce:
//! "Dimana alamat SMK?", "di mana   ALAMAT sekolah???", "rékayasa perangkat
//! lunak". Matching and caching both key off the normalized form, so two
//! inputs that normalize identically share one cached answer.

use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalizes raw user input into a [`NormalizedQuery`] string.
///
/// Pipeline: lower-case → NFKD decomposition (accented characters split
/// into base + combining mark, marks dropped) → non-word characters become
/// spaces → whitespace runs collapse → trim → domain synonym substitution.
///
/// [`NormalizedQuery`]: crate::models::AnswerPayload
pub struct Normalizer {
    non_word: Regex,
    whitespace: Regex,
    synonyms: Vec<(Regex, &'static str)>,
}

/// Substitution table mapping phrasing variants onto one canonical token.
///
/// Order is part of the contract: later entries see the output of earlier
/// ones, and where patterns overlap the first listed wins.
const SYNONYMS: &[(&str, &str)] = &[
    (r"rekayasa perangkat lunak|rpl", "rpl"),
    (r"teknik komputer dan jaringan|tkj", "tkj"),
    (r"multimedia|mm", "mm"),
    (r"ekstrakurikuler|ekskul|club|klub", "ekskul"),
    (r"pendaftaran|daftar sekolah|ppdb", "ppdb"),
    (r"alamat|lokasi|dimana|di mana", "alamat"),
    (r"kontak|telepon|telp|hubungi", "kontak"),
    (r"berita|kegiatan|agenda|event|acara", "berita"),
];

impl Normalizer {
    pub fn new() -> Self {
        Self {
            non_word: Regex::new(r"[^\w\s]").expect("non-word regex is valid"),
            whitespace: Regex::new(r"\s+").expect("whitespace regex is valid"),
            synonyms: SYNONYMS
                .iter()
                .map(|(pattern, canonical)| {
                    (
                        Regex::new(pattern).expect("synonym regex is valid"),
                        *canonical,
                    )
                })
                .collect(),
        }
    }

    /// Canonicalize a raw question. Empty or whitespace-only input yields
    /// an empty string; callers short-circuit before resolution.
    pub fn normalize(&self, raw: &str) -> String {
        let lowered = raw.to_lowercase();

        // NFKD splits é into e + U+0301; dropping the marks flattens
        // accented input to plain ASCII letters.
        let flattened: String = lowered.nfkd().filter(|c| !is_combining_mark(*c)).collect();

        let despecialed = self.non_word.replace_all(&flattened, " ");
        let collapsed = self.whitespace.replace_all(&despecialed, " ");
        let trimmed = collapsed.trim();

        let mut out = trimmed.to_string();
        for (pattern, canonical) in &self.synonyms {
            out = pattern.replace_all(&out, *canonical).into_owned();
        }
        out
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new()
    }

    #[test]
    fn test_lowercase_and_trim() {
        let n = normalizer();
        assert_eq!(n.normalize("  HALO Dunia  "), "halo dunia");
    }

    #[test]
    fn test_punctuation_becomes_space() {
        let n = normalizer();
        assert_eq!(n.normalize("halo, dunia!!!"), "halo dunia");
    }

    #[test]
    fn test_whitespace_collapsed() {
        let n = normalizer();
        assert_eq!(n.normalize("halo    \t  dunia"), "halo dunia");
    }

    #[test]
    fn test_diacritics_flattened() {
        let n = normalizer();
        assert_eq!(n.normalize("rékayasa"), "rekayasa");
        assert_eq!(n.normalize("café"), "cafe");
    }

    #[test]
    fn test_synonym_long_form() {
        let n = normalizer();
        assert_eq!(n.normalize("Rekayasa Perangkat Lunak"), "rpl");
        assert_eq!(n.normalize("teknik komputer dan jaringan"), "tkj");
    }

    #[test]
    fn test_synonym_inside_sentence() {
        let n = normalizer();
        assert_eq!(
            n.normalize("apa saja ekstrakurikuler di sekolah?"),
            "apa saja ekskul di sekolah"
        );
        assert_eq!(n.normalize("di mana lokasi sekolah"), "alamat alamat sekolah");
    }

    #[test]
    fn test_empty_input() {
        let n = normalizer();
        assert_eq!(n.normalize(""), "");
        assert_eq!(n.normalize("   \t\n "), "");
        assert_eq!(n.normalize("?!?"), "");
    }

    #[test]
    fn test_idempotent() {
        let n = normalizer();
        for input in [
            "Dimana ALAMAT sekolah???",
            "rékayasa perangkat lunak",
            "apa saja jurusan yang ada",
            "kontak",
            "",
        ] {
            let once = n.normalize(input);
            assert_eq!(n.normalize(&once), once, "not idempotent for {input:?}");
        }
    }
}
