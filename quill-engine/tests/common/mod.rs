//! Test doubles for the generation backend

#![allow(dead_code)]

use quill_engine::{GenerationError, Generator};
use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    thread,
    time::Duration,
};

/// One recorded generator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub prompt: String,
    pub context: String,
}

/// Replays scripted replies in order; echoes the prompt once the script runs out
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, GenerationError>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.push(Ok(text.to_string()))
    }

    pub fn transient(self, message: &str) -> Self {
        self.push(Err(GenerationError::Transient(message.to_string())))
    }

    pub fn permanent(self, message: &str) -> Self {
        self.push(Err(GenerationError::Permanent(message.to_string())))
    }

    fn push(self, outcome: Result<String, GenerationError>) -> Self {
        self.script.lock().unwrap().push_back(outcome);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Generator for ScriptedGenerator {
    fn generate(&self, prompt: &str, context: &str) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(Call {
            prompt: prompt.to_string(),
            context: context.to_string(),
        });

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("echo: {prompt}")))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Deterministic backend: wraps the prompt, safe to call from many threads
#[derive(Debug, Default)]
pub struct BracketGenerator;

impl Generator for BracketGenerator {
    fn generate(&self, prompt: &str, _context: &str) -> Result<String, GenerationError> {
        Ok(format!("[{prompt}]"))
    }
}

/// Rejects any prompt containing `marker`; other calls take `delay` and succeed
#[derive(Debug)]
pub struct RejectingGenerator {
    marker: String,
    delay: Duration,
    calls: AtomicUsize,
}

impl RejectingGenerator {
    pub fn new(marker: &str, delay: Duration) -> Self {
        Self {
            marker: marker.to_string(),
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Generator for RejectingGenerator {
    fn generate(&self, prompt: &str, _context: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.contains(&self.marker) {
            return Err(GenerationError::Permanent("invalid api key".to_string()));
        }
        thread::sleep(self.delay);
        Ok(format!("[{prompt}]"))
    }
}

/// A paragraph of exactly `len` characters ending in a full stop
pub fn paragraph(ch: char, len: usize) -> String {
    let mut text: String = std::iter::repeat(ch).take(len - 1).collect();
    text.push('.');
    text
}
