//! Canned question/answer rules.
//!
//! Greetings, thanks, and "who are you" never need the database or the AI;
//! they are answered from a fixed table checked before everything else.
//! Matching is deliberately coarse substring containment (greeting
//! detection should not require exact tokenization). Rules are checked in
//! declaration order and the first match wins, so the order below is a
//! behavioral contract.

use crate::models::{AnswerPayload, AnswerSource};

/// A canned keyword-triggered answer with suggested follow-ups.
#[derive(Debug, Clone)]
pub struct RuleEntry {
    pub keywords: &'static [&'static str],
    pub answer: &'static str,
    pub quick_replies: &'static [&'static str],
}

impl RuleEntry {
    /// True when any keyword appears as a substring of the normalized query.
    pub fn matches(&self, query: &str) -> bool {
        self.keywords.iter().any(|keyword| query.contains(keyword))
    }

    pub fn to_payload(&self) -> AnswerPayload {
        AnswerPayload::new(
            self.answer,
            self.quick_replies.iter().map(|s| s.to_string()).collect(),
            AnswerSource::Predefined,
        )
    }
}

/// The fixed rule table, in priority order.
pub fn builtin_rules() -> Vec<RuleEntry> {
    vec![
        RuleEntry {
            keywords: &["halo", "hai", "hello", "assalamualaikum", "salam"],
            answer: "Halo! 👋 Saya chatbot SMK Syafi'i Akrom. Mau tahu info apa hari ini?",
            quick_replies: &["Jurusan", "PPDB", "Ekstrakurikuler", "Kontak sekolah"],
        },
        RuleEntry {
            keywords: &["terima kasih", "thanks", "makasih", "syukron"],
            answer: "Sama-sama! 😊 Senang bisa membantu.",
            quick_replies: &["Jurusan", "PPDB", "Berita sekolah"],
        },
        RuleEntry {
            keywords: &["kamu siapa", "siapa kamu", "nama kamu"],
            answer: "Saya adalah AI Assistant SMK Syafi'i Akrom Pekalongan. 🎓",
            quick_replies: &["Info sekolah", "Jurusan", "PPDB"],
        },
    ]
}

/// Return the first rule matching the normalized query, if any.
pub fn match_rule<'a>(rules: &'a [RuleEntry], query: &str) -> Option<&'a RuleEntry> {
    rules.iter().find(|rule| rule.matches(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_matches() {
        let rules = builtin_rules();
        let rule = match_rule(&rules, "halo").unwrap();
        assert!(rule.answer.contains("chatbot SMK"));
        assert_eq!(
            rule.quick_replies,
            &["Jurusan", "PPDB", "Ekstrakurikuler", "Kontak sekolah"]
        );
    }

    #[test]
    fn test_substring_matching_is_coarse() {
        let rules = builtin_rules();
        // "hai" inside a longer sentence still greets
        assert!(match_rule(&rules, "hai bot apa kabar").is_some());
    }

    #[test]
    fn test_first_match_wins() {
        let rules = builtin_rules();
        // Query matching both the greeting and the identity rule resolves
        // to the earlier declaration.
        let rule = match_rule(&rules, "halo kamu siapa").unwrap();
        assert!(rule.answer.contains("Mau tahu info apa"));
    }

    #[test]
    fn test_no_match() {
        let rules = builtin_rules();
        assert!(match_rule(&rules, "jurusan").is_none());
        assert!(match_rule(&rules, "").is_none());
    }

    #[test]
    fn test_payload_source_is_predefined() {
        let rules = builtin_rules();
        let payload = rules[0].to_payload();
        assert_eq!(payload.source, crate::models::AnswerSource::Predefined);
        assert!(!payload.answer.is_empty());
    }
}
