use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingVector(pub Vec<f32>);

impl EmbeddingVector {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Collapses every whitespace run (spaces, tabs, newlines) into one space
/// and trims the ends. Word boundaries survive.
pub fn normalize_input(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_runs_collapse_to_single_spaces() {
        assert_eq!(normalize_input("what\tis\n\nretrieval   augmented  generation?"),
            "what is retrieval augmented generation?");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(normalize_input("  \n hello \t"), "hello");
        assert_eq!(normalize_input(" \n\t "), "");
    }
}
