//! Candidate code supply
//!
//! Generators make no uniqueness promise; `LinkService` checks every
//! candidate against the store and retries a bounded number of times.

use crate::utils::{MAX_CODE_LENGTH, generate_random_code};

pub trait CodeGenerator: Send + Sync {
    fn next_code(&self) -> String;
}

/// Uniform random codes over `[A-Za-z0-9]`.
#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub const DEFAULT_LENGTH: usize = 6;

    /// `length` is clamped to 1..=32.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(1, MAX_CODE_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn next_code(&self) -> String {
        generate_random_code(self.length)
    }
}
