use crate::config::ContextStrategy;
use crate::error::EngineError;
use crate::gemini_service::LlmClient;
use crate::models::{ContextPayload, DocumentContent};
use crate::prompt::{build_chunking_prompt, CHUNK_SEPARATOR};
use regex::Regex;
use std::io::Write;
use tempfile::NamedTempFile;
use unicode_segmentation::UnicodeSegmentation;

const MAX_CHUNKS: usize = 20;
const FALLBACK_CHUNK_CHARS: usize = 400;

/// Turns raw document bytes into the one context representation the
/// configured strategy calls for.
pub struct ContextBuilder {
    strategy: ContextStrategy,
}

impl ContextBuilder {
    pub fn new(strategy: ContextStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ContextStrategy {
        self.strategy
    }

    pub async fn build(
        &self,
        document: &DocumentContent,
        llm: &dyn LlmClient,
    ) -> Result<ContextPayload, EngineError> {
        match self.strategy {
            ContextStrategy::Extract => {
                let elements = extract_text_elements(document)?;
                Ok(ContextPayload::Text(elements.join("\n\n")))
            }
            ContextStrategy::Attach => Ok(ContextPayload::Attachment {
                bytes: document.bytes.clone(),
                mime: document.mime.clone(),
            }),
            ContextStrategy::Chunk => {
                let chunks = chunk_with_model(document, llm).await?;
                log::info!("segmented {} into {} chunks", document.name, chunks.len());
                Ok(ContextPayload::Chunks(chunks))
            }
        }
    }
}

/// Extraction pass producing an ordered element sequence. PDF bytes are
/// handed to the extraction engine through a named temp file, which the
/// handle drop removes on success and on every error path; text types are
/// decoded in place.
pub fn extract_text_elements(document: &DocumentContent) -> Result<Vec<String>, EngineError> {
    let raw = if document.mime == "application/pdf" {
        let mut file = NamedTempFile::new()
            .map_err(|err| EngineError::Extraction(format!("temp file: {err}")))?;
        file.write_all(&document.bytes)
            .map_err(|err| EngineError::Extraction(format!("temp file: {err}")))?;
        pdf_extract::extract_text(file.path())
            .map_err(|err| EngineError::Extraction(err.to_string()))?
    } else {
        String::from_utf8_lossy(&document.bytes).into_owned()
    };

    let blank_lines = Regex::new(r"\n\s*\n").unwrap();
    let elements: Vec<String> = blank_lines
        .split(&raw)
        .map(|element| element.trim().to_string())
        .filter(|element| !element.is_empty())
        .collect();

    if elements.is_empty() {
        return Err(EngineError::Extraction(format!(
            "no text could be extracted from {}",
            document.name
        )));
    }
    Ok(elements)
}

/// Chunk strategy: one dedicated model call segments the document text on
/// the chunk separator; a greedy word-wrap splitter takes over when the
/// model omits the delimiter.
async fn chunk_with_model(
    document: &DocumentContent,
    llm: &dyn LlmClient,
) -> Result<Vec<String>, EngineError> {
    let text = extract_text_elements(document)?.join("\n\n");
    let raw = llm.generate(&build_chunking_prompt(&text), None).await?;

    let mut chunks: Vec<String> = if raw.contains(CHUNK_SEPARATOR) {
        raw.split(CHUNK_SEPARATOR)
            .map(|chunk| chunk.trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect()
    } else {
        log::warn!("chunking response carried no separator, using word-wrap fallback");
        fallback_chunks(&text)
    };

    chunks.truncate(MAX_CHUNKS);
    Ok(chunks)
}

/// Greedy word-wrap at roughly `FALLBACK_CHUNK_CHARS` characters, breaking
/// only at word boundaries.
fn fallback_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for segment in text.split_word_bounds() {
        if current.chars().count() + segment.chars().count() > FALLBACK_CHUNK_CHARS
            && !current.trim().is_empty()
        {
            chunks.push(current.trim().to_string());
            current.clear();
        }
        current.push_str(segment);
    }
    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }
    chunks.truncate(MAX_CHUNKS);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini_service::Attachment;
    use crate::models::SourceKind;
    use async_trait::async_trait;

    struct StubLlm {
        reply: String,
    }

    #[async_trait]
    impl LlmClient for StubLlm {
        async fn generate(
            &self,
            _prompt: &str,
            _attachment: Option<&Attachment>,
        ) -> Result<String, EngineError> {
            Ok(self.reply.clone())
        }

        fn model_id(&self) -> &str {
            "stub"
        }
    }

    fn text_document(body: &str) -> DocumentContent {
        DocumentContent {
            bytes: body.as_bytes().to_vec(),
            mime: "text/plain".to_string(),
            name: "notes.txt".to_string(),
            source: SourceKind::Upload,
        }
    }

    #[test]
    fn extraction_joins_elements_with_blank_lines() {
        let document = text_document("first paragraph\n\n\nsecond paragraph\n\nthird");
        let elements = extract_text_elements(&document).unwrap();
        assert_eq!(elements, vec!["first paragraph", "second paragraph", "third"]);
    }

    #[test]
    fn extraction_of_blank_document_fails() {
        let document = text_document("   \n\n  ");
        assert!(matches!(
            extract_text_elements(&document),
            Err(EngineError::Extraction(_))
        ));
    }

    #[tokio::test]
    async fn extract_strategy_produces_text_payload() {
        let builder = ContextBuilder::new(ContextStrategy::Extract);
        let llm = StubLlm { reply: String::new() };
        let payload = builder
            .build(&text_document("a\n\nb"), &llm)
            .await
            .unwrap();
        match payload {
            ContextPayload::Text(text) => assert_eq!(text, "a\n\nb"),
            other => panic!("expected text payload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn attach_strategy_passes_bytes_through() {
        let builder = ContextBuilder::new(ContextStrategy::Attach);
        let llm = StubLlm { reply: String::new() };
        let document = text_document("body");
        let payload = builder.build(&document, &llm).await.unwrap();
        match payload {
            ContextPayload::Attachment { bytes, mime } => {
                assert_eq!(bytes, document.bytes);
                assert_eq!(mime, "text/plain");
            }
            other => panic!("expected attachment payload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn chunk_strategy_splits_on_model_separator() {
        let builder = ContextBuilder::new(ContextStrategy::Chunk);
        let llm = StubLlm {
            reply: "part one---CHUNK---part two---CHUNK---".to_string(),
        };
        let payload = builder.build(&text_document("body"), &llm).await.unwrap();
        match payload {
            ContextPayload::Chunks(chunks) => {
                assert_eq!(chunks, vec!["part one", "part two"]);
            }
            other => panic!("expected chunk payload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn chunk_strategy_falls_back_without_separator() {
        let body = "word ".repeat(300);
        let builder = ContextBuilder::new(ContextStrategy::Chunk);
        let llm = StubLlm {
            reply: "no delimiters here".to_string(),
        };
        let payload = builder.build(&text_document(&body), &llm).await.unwrap();
        match payload {
            ContextPayload::Chunks(chunks) => {
                assert!(chunks.len() > 1);
                assert!(chunks.iter().all(|c| c.chars().count() <= FALLBACK_CHUNK_CHARS));
            }
            other => panic!("expected chunk payload, got {other:?}"),
        }
    }

    #[test]
    fn fallback_chunking_is_capped() {
        let body = "word ".repeat(10_000);
        let chunks = fallback_chunks(&body);
        assert_eq!(chunks.len(), MAX_CHUNKS);
    }

    #[test]
    fn fallback_keeps_words_intact() {
        let chunks = fallback_chunks(&"alpha beta gamma ".repeat(100));
        for chunk in &chunks {
            for word in chunk.split_whitespace() {
                assert!(["alpha", "beta", "gamma"].contains(&word), "split word: {word}");
            }
        }
    }
}
