//! Property tests for chunk packing

use proptest::prelude::*;
use quill_core::{split_by_sentences, split_text, ChunkPacker};

fn non_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Text built from words, terminators and paragraph breaks in both scripts
fn text_strategy() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-z]{1,12}",
        Just(" ".to_string()),
        Just(". ".to_string()),
        Just("?! ".to_string()),
        Just("\n".to_string()),
        Just("\n\n".to_string()),
        Just("旅行".to_string()),
        Just("。".to_string()),
        Just("！".to_string()),
    ];
    prop::collection::vec(piece, 0..80).prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn chunks_preserve_content_in_order(text in text_strategy(), max in 1usize..120) {
        let chunks = split_text(&text, max).unwrap();
        let joined: String = chunks.iter().map(|c| c.text()).collect();
        prop_assert_eq!(non_whitespace(&joined), non_whitespace(&text));
    }

    #[test]
    fn chunks_respect_budget_or_are_single_sentences(
        text in text_strategy(),
        max in 1usize..120,
    ) {
        for chunk in split_text(&text, max).unwrap() {
            if chunk.char_count() > max {
                let sentences = split_by_sentences(chunk.text());
                prop_assert_eq!(sentences.len(), 1, "oversized chunk {:?}", chunk.text());
            }
        }
    }

    #[test]
    fn chunks_are_never_empty(text in text_strategy(), max in 1usize..120) {
        for chunk in split_text(&text, max).unwrap() {
            prop_assert!(!chunk.text().trim().is_empty());
            prop_assert_eq!(chunk.char_count(), chunk.text().chars().count());
        }
    }

    #[test]
    fn segmenting_a_sentence_is_idempotent(text in text_strategy()) {
        for sentence in split_by_sentences(&text) {
            prop_assert_eq!(split_by_sentences(sentence), vec![sentence]);
        }
    }

    #[test]
    fn packer_is_deterministic(text in text_strategy(), max in 1usize..120) {
        let packer = ChunkPacker::new(max).unwrap();
        prop_assert_eq!(packer.split(&text), packer.split(&text));
    }
}
