use crate::prompt::ANSWER_SEPARATOR;

/// Sentinel filled in for questions the model response did not cover.
pub const MALFORMED_ANSWER: &str = "Error: AI response malformed or incomplete.";

/// Split the raw model response into exactly `question_count` answers.
///
/// Segments are trimmed; shortfalls are padded on the right with the
/// sentinel, surpluses truncated. Trailing empty segments from a dangling
/// separator take part in the split and fall under the same rule, so the
/// caller always gets an aligned answer per question and never an error.
pub fn split_answers(raw: &str, question_count: usize) -> Vec<String> {
    let mut answers: Vec<String> = raw
        .split(ANSWER_SEPARATOR)
        .map(|segment| segment.trim().to_string())
        .collect();
    if answers.len() < question_count {
        answers.resize(question_count, MALFORMED_ANSWER.to_string());
    }
    answers.truncate(question_count);
    answers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_count_yields_trimmed_segments_in_order() {
        let raw = " first ---ANSWER---second---ANSWER---  third answer ";
        assert_eq!(
            split_answers(raw, 3),
            vec!["first", "second", "third answer"]
        );
    }

    #[test]
    fn shortfall_is_padded_with_the_sentinel() {
        let answers = split_answers("only one", 3);
        assert_eq!(answers.len(), 3);
        assert_eq!(answers[0], "only one");
        assert_eq!(answers[1], MALFORMED_ANSWER);
        assert_eq!(answers[2], MALFORMED_ANSWER);
    }

    #[test]
    fn surplus_is_truncated() {
        let raw = "a---ANSWER---b---ANSWER---c---ANSWER---d";
        assert_eq!(split_answers(raw, 2), vec!["a", "b"]);
    }

    #[test]
    fn dangling_separator_leaves_a_truncated_empty_segment() {
        // "Blue.---ANSWER---" splits into ["Blue.", ""]; with one question
        // the trailing empty segment is cut by the truncate rule.
        assert_eq!(split_answers("Blue.---ANSWER---", 1), vec!["Blue."]);
        // With two questions the empty segment is kept as-is.
        assert_eq!(split_answers("Blue.---ANSWER---", 2), vec!["Blue.", ""]);
    }

    #[test]
    fn length_invariant_holds_for_arbitrary_shapes() {
        for count in [1usize, 5, 50] {
            for raw in ["", "garbage", "a---ANSWER---b", "---ANSWER---"] {
                assert_eq!(split_answers(raw, count).len(), count);
            }
        }
    }
}
