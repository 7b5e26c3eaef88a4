use crate::retrieval::Document;

/// Stuff retrieved documents into a single context block.
///
/// Contents are concatenated in retrieval order, separated by a blank line.
/// Documents with empty content still contribute a segment; relevance order
/// is the service's, not ours.
pub fn format_context(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| doc.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
