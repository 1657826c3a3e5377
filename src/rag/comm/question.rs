const SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer the user's question using only the context passages below. \
If the context does not contain the answer, say that you don't know.";

/// Builds the single instruction prompt sent for a RAG turn.
#[derive(Debug, Clone)]
pub struct Question {
    question: String,
    context: Vec<String>,
}

impl From<String> for Question {
    fn from(value: String) -> Self {
        Self {
            question: value,
            context: vec![],
        }
    }
}

impl From<&str> for Question {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<&Question> for String {
    fn from(value: &Question) -> Self {
        let context = if value.context.is_empty() {
            "(no passages were retrieved)".to_string()
        } else {
            value
                .context
                .iter()
                .enumerate()
                .map(|(idx, passage)| format!("---\n[{}] {}\n", idx + 1, passage.trim()))
                .collect::<String>()
                + "---"
        };

        format!(
            "{}\n\nContext:\n{}\n\nQuestion: {}",
            SYSTEM_PROMPT, context, value.question
        )
    }
}

impl Question {
    pub fn set_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }

    pub fn render(&self) -> String {
        self.into()
    }
}
