use crate::models::QuestionSet;

/// Literal token the model is instructed to place between answers.
pub const ANSWER_SEPARATOR: &str = "---ANSWER---";

/// Literal token the chunking call uses between document sections.
pub const CHUNK_SEPARATOR: &str = "---CHUNK---";

/// Exact phrase mandated for answers that are not locatable in context.
pub const NOT_FOUND_PHRASE: &str =
    "The answer to this question could not be found in the document.";

/// One batched prompt covering every question. The numbering is
/// presentational; answer order is reconciled downstream by the splitter.
/// `context` is `None` when the document travels as a request attachment.
pub fn build_answer_prompt(questions: &QuestionSet, context: Option<&str>) -> String {
    let question_block = questions
        .iter()
        .enumerate()
        .map(|(idx, question)| format!("{}. {question}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n");

    let context_block = match context {
        Some(text) => format!("**DOCUMENT CONTEXT:**\n---\n{text}\n---"),
        None => "**DOCUMENT CONTEXT:** the document is attached to this request.".to_string(),
    };

    format!(
        r#"**ROLE:** You are an AI Documentation Auditor.
**TASK:** Provide a detailed and complete answer for every question below, based ONLY on the provided DOCUMENT CONTEXT.
**CRITICAL RULES:**
1. **Be Thorough:** Your primary goal is accuracy. Scan the entire document context. Failure to find an answer is a critical error.
2. **Clean Output:** Your response MUST ONLY contain the answers. Do NOT repeat questions, use numbering, or add intros.
3. **Separator:** You MUST separate each answer with '{separator}'.
4. **Missing Data:** If an answer is not in the document, respond with: "{not_found}"

{context_block}
**QUESTIONS TO ANSWER:**
{question_block}
"#,
        separator = ANSWER_SEPARATOR,
        not_found = NOT_FOUND_PHRASE,
    )
}

/// Prompt for the dedicated chunking call of the `chunk` strategy.
pub fn build_chunking_prompt(text: &str) -> String {
    format!(
        r#"Split the following document into coherent sections of roughly 200 to 500 words each.
Return ONLY the section text, with '{separator}' between consecutive sections.
Do not add headings, numbering, or commentary.

DOCUMENT:
{text}
"#,
        separator = CHUNK_SEPARATOR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(items: &[&str]) -> QuestionSet {
        QuestionSet::new(items.iter().map(|q| q.to_string()).collect()).unwrap()
    }

    #[test]
    fn prompt_numbers_questions_in_order() {
        let prompt = build_answer_prompt(
            &questions(&["What is covered?", "What is excluded?"]),
            Some("policy text"),
        );
        assert!(prompt.contains("1. What is covered?"));
        assert!(prompt.contains("2. What is excluded?"));
        let covered = prompt.find("1. What is covered?").unwrap();
        let excluded = prompt.find("2. What is excluded?").unwrap();
        assert!(covered < excluded);
    }

    #[test]
    fn prompt_carries_separator_and_fallback_phrase() {
        let prompt = build_answer_prompt(&questions(&["q"]), Some("ctx"));
        assert!(prompt.contains(ANSWER_SEPARATOR));
        assert!(prompt.contains(NOT_FOUND_PHRASE));
        assert!(prompt.contains("ctx"));
    }

    #[test]
    fn attachment_prompt_omits_inline_context() {
        let prompt = build_answer_prompt(&questions(&["q"]), None);
        assert!(prompt.contains("attached to this request"));
    }

    #[test]
    fn chunking_prompt_names_its_separator() {
        let prompt = build_chunking_prompt("body");
        assert!(prompt.contains(CHUNK_SEPARATOR));
        assert!(prompt.contains("body"));
    }
}
