use docqa_core::types::{Chunk, Personality};

/// Instruction appended after the question. The model is told to stay
/// inside the numbered documents and to admit when they do not cover it.
pub const CONTEXT_ONLY_INSTRUCTION: &str = "Instructions: Answer ONLY using the information provided above. \
If the answer is not in the context, respond with \"I don't know.\" \
Do not add information from outside the context.";

/// Numbered context block: `Document 1: ...`, `Document 2: ...` in the
/// order given, separated by blank lines.
pub fn format_context(chunks: &[Chunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, c)| format!("Document {}: {}", i + 1, c.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_prompt(question: &str, chunks: &[Chunk], personality: &Personality) -> String {
    format!(
        "You are a document assistant. Your style is {style}, your tone is {tone}, {context}.\n\n\
         Context information:\n{docs}\n\n\
         Question: {question}\n\n\
         {CONTEXT_ONLY_INSTRUCTION}\n\n\
         Answer:",
        style = personality.style,
        tone = personality.tone,
        context = personality.context,
        docs = format_context(chunks),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::types::Document;

    fn chunk(text: &str, idx: usize) -> Chunk {
        Chunk::new(&Document::new("d", "d.txt", ""), idx, text.to_string(), vec![])
    }

    #[test]
    fn context_is_numbered_in_order() {
        let ctx = format_context(&[chunk("alpha", 0), chunk("beta", 1)]);
        assert_eq!(ctx, "Document 1: alpha\n\nDocument 2: beta");
    }

    #[test]
    fn prompt_sections_appear_in_order() {
        let p = build_prompt("Why?", &[chunk("because", 0)], &Personality::default());
        let ctx = p.find("Document 1: because").unwrap();
        let q = p.find("Question: Why?").unwrap();
        let instr = p.find("Answer ONLY").unwrap();
        assert!(ctx < q && q < instr);
        assert!(p.ends_with("Answer:"));
        assert!(p.contains("formal and precise"));
    }
}
