//! Prompt assembly for the QA flow.

/// Join retrieved fragment texts into one context block.
///
/// Fragments are separated by blank lines, in retrieval order.
pub fn join_context(fragments: &[String]) -> String {
    fragments.join("\n\n")
}

/// Assemble the full analyst prompt from retrieved fragments and the
/// question.
///
/// The instruction preamble and layout are fixed. Both delimiter lines
/// around the context block are the literal marker `<context>`.
pub fn build_prompt(fragments: &[String], question: &str) -> String {
    let context = join_context(fragments);
    format!(
        "
You are a highly skilled mathematical analyst. You are tasked to perform detailed calculations and analysis based on the provided context.
Use advanced reasoning and precise computation techniques to derive the most accurate answers. Be concise and clear.

<context>
{context}
<context>
Question: {question}
Answer:
"
    )
}
