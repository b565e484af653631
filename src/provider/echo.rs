//! Deterministic key-less generator for development and tests.

use async_trait::async_trait;
use futures_util::StreamExt;

use crate::error::AppError;

use super::{GenChunk, GenStream, TextGenerator};

/// Echoes the user message back behind a fixed marker. No network, no
/// key, no randomness; every higher layer can be exercised against it.
pub struct EchoGenerator;

impl EchoGenerator {
    fn reply(user: &str) -> String {
        format!("(echo) {}", user.trim())
    }
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn complete(&self, _system: &str, user: &str) -> Result<String, AppError> {
        Ok(Self::reply(user))
    }

    async fn stream(&self, _system: &str, user: &str) -> Result<GenStream, AppError> {
        // Word-sized chunks keep trailing spaces so concatenation
        // reproduces the complete() text exactly.
        let chunks: Vec<Result<GenChunk, AppError>> = Self::reply(user)
            .split_inclusive(' ')
            .map(|word| Ok(GenChunk::Content(word.to_string())))
            .chain(std::iter::once(Ok(GenChunk::Done)))
            .collect();
        Ok(futures_util::stream::iter(chunks).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_complete_is_deterministic() {
        let gen = EchoGenerator;
        let a = gen.complete("sys", "add a users table").await.unwrap();
        let b = gen.complete("sys", "add a users table").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "(echo) add a users table");
    }

    #[tokio::test]
    async fn test_stream_ends_with_done() {
        let gen = EchoGenerator;
        let chunks: Vec<_> = gen
            .stream("sys", "two words")
            .await
            .unwrap()
            .collect()
            .await;

        let chunks: Vec<GenChunk> = chunks.into_iter().map(|c| c.unwrap()).collect();
        assert_eq!(chunks.last(), Some(&GenChunk::Done));
        assert_eq!(
            chunks.iter().filter(|c| **c == GenChunk::Done).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_stream_concatenates_to_complete() {
        let gen = EchoGenerator;
        let full = gen.complete("sys", "hello streaming world").await.unwrap();

        let mut joined = String::new();
        let mut stream = gen.stream("sys", "hello streaming world").await.unwrap();
        while let Some(chunk) = stream.next().await {
            if let GenChunk::Content(text) = chunk.unwrap() {
                joined.push_str(&text);
            }
        }
        assert_eq!(joined, full);
    }
}
