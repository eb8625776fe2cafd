//! Prompt assembly for the completion call.
//!
//! Pure string construction: retrieved chunks become a blank-line-joined
//! context block embedded in a fixed template that ends with an `Answer:`
//! cue for the generation step.

/// Render the RAG prompt from retrieved context chunks and the question.
pub fn build_prompt(chunks: &[String], query: &str) -> String {
    let context = chunks.join("\n\n");
    format!(
        "Use the following context to answer the question.\n\
         Context: {}\n\
         Question: {}\n\
         Answer: ",
        context, query
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_context_and_question() {
        let chunks = vec!["first chunk".to_string(), "second chunk".to_string()];
        let prompt = build_prompt(&chunks, "what is this?");
        assert!(prompt.contains("first chunk\n\nsecond chunk"));
        assert!(prompt.contains("Question: what is this?"));
    }

    #[test]
    fn test_ends_with_answer_cue() {
        let prompt = build_prompt(&["some context".to_string()], "q");
        assert!(prompt.trim_end().ends_with("Answer:"));
    }

    #[test]
    fn test_empty_chunks_still_renders() {
        let prompt = build_prompt(&[], "q");
        assert!(prompt.starts_with("Use the following context"));
        assert!(prompt.contains("Question: q"));
    }
}
