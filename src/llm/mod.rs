mod client;
mod models;
pub mod prompts;

pub use client::*;
pub use models::*;

/// Estimate token count for text (rough approximation)
pub fn estimate_tokens(text: &str) -> u32 {
    // Rough estimate: ~4 characters per token for English text
    (text.len() as f32 / 4.0).ceil() as u32
}
