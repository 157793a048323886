//! End-to-end pipeline behaviour against scripted backends

mod common;

use common::{paragraph, BracketGenerator, RejectingGenerator, ScriptedGenerator};
use std::time::Duration;
use quill_engine::*;

fn fast_config() -> RewriteConfigBuilder {
    RewriteConfig::builder().retry(RetryPolicy::immediate(3).unwrap())
}

fn bare_prompts() -> PromptSet {
    PromptSet::custom("{text}", "POLISH {text}").unwrap()
}

#[test]
fn test_short_text_single_call_without_polish() {
    let backend = ScriptedGenerator::new().reply("  My day at the lake.  ");
    let rewriter = Rewriter::with_config(&backend, fast_config().build().unwrap()).unwrap();

    let output = rewriter.process("Paragraph one.").unwrap();

    assert_eq!(output.text, "My day at the lake.");
    assert_eq!(backend.call_count(), 1);
    assert_eq!(backend.calls()[0].context, "");
    assert!(backend.calls()[0].prompt.contains("Paragraph one."));
    assert!(!output.metadata.polished);
    assert_eq!(output.metadata.chunk_count, 1);
}

#[test]
fn test_two_chunks_then_polish() {
    let text = format!("{}\n\n{}", paragraph('a', 1500), paragraph('b', 1500));
    let backend = ScriptedGenerator::new()
        .reply("First part. ")
        .reply(" Second part.")
        .reply("\nPolished story.\n");
    let rewriter = Rewriter::with_config(&backend, fast_config().build().unwrap())
        .unwrap()
        .with_prompts(bare_prompts());

    let output = rewriter.process(&text).unwrap();
    let calls = backend.calls();

    assert_eq!(output.text, "Polished story.");
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].context, chunk_context(0, 2));
    assert_eq!(calls[1].context, chunk_context(1, 2));
    assert!(calls[0].context.contains("next part"));
    assert!(calls[1].context.contains("previous part"));
    assert_eq!(calls[2].prompt, "POLISH First part.\n\nSecond part.");
    assert_eq!(calls[2].context, "");
    assert!(output.metadata.polished);
    assert_eq!(output.metadata.generation_calls, 3);
}

#[test]
fn test_transient_failures_are_retried() {
    let text = format!("{}\n\n{}", paragraph('a', 1500), paragraph('b', 1500));
    let backend = ScriptedGenerator::new()
        .transient("rate limited")
        .transient("rate limited")
        .reply("A")
        .reply("B")
        .reply("AB polished");
    let rewriter = Rewriter::with_config(&backend, fast_config().build().unwrap()).unwrap();

    let output = rewriter.process(&text).unwrap();

    assert_eq!(output.text, "AB polished");
    assert_eq!(backend.call_count(), 5);
    assert_eq!(output.metadata.generation_calls, 5);

    // Retries reuse the same prompt and context
    let calls = backend.calls();
    assert_eq!(calls[0], calls[1]);
    assert_eq!(calls[1], calls[2]);
}

#[test]
fn test_exhausted_retries_abort_without_partial_output() {
    let text = format!("{}\n\n{}", paragraph('a', 1500), paragraph('b', 1500));
    let backend = ScriptedGenerator::new()
        .reply("A")
        .transient("overloaded")
        .transient("overloaded")
        .transient("overloaded");
    let rewriter = Rewriter::with_config(&backend, fast_config().build().unwrap()).unwrap();

    let err = rewriter.rewrite(&text).unwrap_err();

    match err {
        RewriteError::GenerationExhausted {
            chunk,
            attempts,
            source,
        } => {
            assert_eq!(chunk, 1);
            assert_eq!(attempts, 3);
            assert_eq!(source, GenerationError::Transient("overloaded".to_string()));
        }
        other => panic!("expected GenerationExhausted, got {other:?}"),
    }
    // No polish call after the failure
    assert_eq!(backend.call_count(), 4);
}

#[test]
fn test_single_chunk_exhaustion() {
    let backend = ScriptedGenerator::new()
        .transient("timeout")
        .transient("timeout")
        .transient("timeout");
    let rewriter = Rewriter::with_config(&backend, fast_config().build().unwrap()).unwrap();

    let err = rewriter.rewrite("Short text.").unwrap_err();
    assert!(matches!(
        err,
        RewriteError::GenerationExhausted {
            chunk: 0,
            attempts: 3,
            ..
        }
    ));
}

#[test]
fn test_permanent_failure_is_not_retried() {
    let backend = ScriptedGenerator::new().permanent("invalid api key");
    let rewriter = Rewriter::with_config(&backend, fast_config().build().unwrap()).unwrap();

    let err = rewriter.rewrite("Short text.").unwrap_err();

    assert!(matches!(err, RewriteError::GenerationRejected { chunk: 0, .. }));
    assert_eq!(backend.call_count(), 1);
}

#[test]
fn test_polish_failure_is_an_error() {
    let text = format!("{}\n\n{}", paragraph('a', 1500), paragraph('b', 1500));
    let backend = ScriptedGenerator::new()
        .reply("A")
        .reply("B")
        .transient("polish timed out");
    let rewriter = Rewriter::with_config(&backend, fast_config().build().unwrap()).unwrap();

    let err = rewriter.rewrite(&text).unwrap_err();

    assert!(matches!(err, RewriteError::Polish(GenerationError::Transient(_))));
    // Polish is a single attempt
    assert_eq!(backend.call_count(), 3);
}

#[test]
fn test_polish_can_be_disabled() {
    let text = format!("{}\n\n{}", paragraph('a', 1500), paragraph('b', 1500));
    let backend = ScriptedGenerator::new().reply(" A ").reply(" B ");
    let config = fast_config().polish(false).build().unwrap();
    let rewriter = Rewriter::with_config(&backend, config).unwrap();

    let output = rewriter.process(&text).unwrap();

    assert_eq!(output.text, "A\n\nB");
    assert!(!output.metadata.polished);
    assert_eq!(backend.call_count(), 2);
}

#[test]
fn test_empty_input_never_calls_backend() {
    let backend = ScriptedGenerator::new();
    let rewriter = Rewriter::new(&backend).unwrap();

    for input in ["", "   ", "\n\n\t\n"] {
        assert!(matches!(rewriter.rewrite(input), Err(RewriteError::EmptyInput)));
    }
    assert_eq!(backend.call_count(), 0);
}

#[test]
fn test_long_paragraph_split_into_sentence_chunks() {
    // 50 sentences of 100 characters in one paragraph
    let sentence = paragraph('x', 100);
    let text = vec![sentence.as_str(); 50].join(" ");
    let config = fast_config().polish(false).build().unwrap();
    let rewriter = Rewriter::with_config(BracketGenerator, config)
        .unwrap()
        .with_prompts(bare_prompts());

    let chunks = rewriter.split(&text);
    assert_eq!(chunks.len(), 3);
    assert!(chunks.iter().all(|c| c.char_count() <= 2000));

    let output = rewriter.rewrite(&text).unwrap();
    assert_eq!(output.matches('[').count(), 3);
}

#[test]
fn test_parallel_output_matches_sequential() {
    let text: String = (0..40)
        .map(|i| format!("Paragraph {i} about the journey."))
        .collect::<Vec<_>>()
        .join("\n\n");

    let run = |mode: ExecutionMode| {
        let config = fast_config()
            .max_chunk_size(80)
            .execution_mode(mode)
            .build()
            .unwrap();
        Rewriter::with_config(BracketGenerator, config)
            .unwrap()
            .with_prompts(bare_prompts())
            .process(&text)
            .unwrap()
    };

    let sequential = run(ExecutionMode::Sequential);
    let parallel = run(ExecutionMode::Parallel);

    assert!(sequential.metadata.chunk_count > 1);
    assert_eq!(sequential.text, parallel.text);
    assert_eq!(sequential.metadata.generation_calls, parallel.metadata.generation_calls);
    assert_eq!(parallel.metadata.execution_mode, ExecutionMode::Parallel);
}

#[test]
#[cfg(feature = "parallel")]
fn test_parallel_failure_stops_remaining_chunks() {
    // One paragraph per chunk
    let text: String = (0..40)
        .map(|i| format!("Paragraph {i} about the journey."))
        .collect::<Vec<_>>()
        .join("\n\n");
    let backend = RejectingGenerator::new("Paragraph 0 ", Duration::from_millis(20));
    let config = fast_config()
        .max_chunk_size(40)
        .execution_mode(ExecutionMode::Parallel)
        .max_concurrency(Some(2))
        .build()
        .unwrap();
    let rewriter = Rewriter::with_config(&backend, config)
        .unwrap()
        .with_prompts(bare_prompts());

    assert_eq!(rewriter.split(&text).len(), 40);
    let err = rewriter.rewrite(&text).unwrap_err();

    assert!(matches!(err, RewriteError::GenerationRejected { chunk: 0, .. }));
    assert!(
        backend.call_count() < 10,
        "{} calls after the first chunk was rejected",
        backend.call_count()
    );
}

#[test]
fn test_convenience_rewrite() {
    let backend = ScriptedGenerator::new().reply("Rewritten.");
    assert_eq!(rewrite(&backend, "Original.", 2000).unwrap(), "Rewritten.");
    assert!(matches!(
        rewrite(&backend, "Original.", 0),
        Err(RewriteError::Config(ConfigError::Core(_)))
    ));
}

#[test]
fn test_translator_uses_translation_prompts() {
    let backend = ScriptedGenerator::new().reply("I went to West Lake.");
    let translator = Translator::with_config(&backend, fast_config().build().unwrap()).unwrap();

    let translated = translator.translate("我去了西湖。", "zh", "en").unwrap();

    assert_eq!(translated, "I went to West Lake.");
    let prompt = &backend.calls()[0].prompt;
    assert!(prompt.contains("from Chinese to English"));
    assert!(prompt.contains("我去了西湖。"));
}

#[test]
fn test_translator_reports_empty_input() {
    let translator = Translator::new(BracketGenerator);
    assert!(matches!(
        translator.translate("  ", "auto", "en"),
        Err(RewriteError::EmptyInput)
    ));
}
