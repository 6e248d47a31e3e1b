//! crates/authoring_core/src/prompts.rs
//!
//! Prompt construction for outline, section and refinement requests.
//!
//! Every builder is a pure function of its inputs so that runs against a stub
//! generator are reproducible.

use crate::domain::DocType;

/// Asks for 6-8 short section or slide titles as a JSON array of strings.
pub fn outline_prompt(topic: &str, doc_type: DocType) -> String {
    let kind = match doc_type {
        DocType::Pptx => "PowerPoint slides",
        DocType::Docx => "Word document",
    };
    format!(
        "Generate an outline for a business document on topic: {topic}. \
         Type: {kind}. \
         Return 6-8 clear section or slide titles as a JSON array of strings."
    )
}

/// Asks for bullet-style content for slides and paragraphs for documents.
pub fn section_prompt(section_title: &str, topic: &str, doc_type: DocType) -> String {
    let (unit, style) = match doc_type {
        DocType::Pptx => ("slide", "Use short bullet points, one per line, each starting with '-'."),
        DocType::Docx => ("document section", "Use well-formed paragraphs."),
    };
    format!(
        "Generate content for a {unit} titled '{section_title}'.\n\
         Main topic: {topic}.\n\
         Write clear, structured, business-style content. {style} \
         Make it concise but informative."
    )
}

/// Asks for the improved content only, with no commentary around it.
pub fn refine_prompt(current_content: &str, instruction: &str) -> String {
    format!(
        "Original content:\n{current_content}\n\n\
         Instruction: {instruction}\n\
         Return ONLY the improved content, without any explanation or commentary."
    )
}
