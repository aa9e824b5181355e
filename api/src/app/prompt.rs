//! Prompt templating
//!
//! Bot prompts contain placeholders that are replaced with the question, the
//! user's answer and, for later generation steps, the generated fact text.

use crate::domain::entities::Prompt;

pub const QUESTION_PLACEHOLDER: &str = "{QUESTIONS}";
pub const ANSWER_PLACEHOLDER: &str = "{ANSWER}";
pub const FACT_CONTENT_PLACEHOLDER: &str = "{FACT_CONTENT}";
pub const FACT_TITLE_PLACEHOLDER: &str = "{FACT_TITLE}";

/// Values available for substitution. Placeholders without a value are left as-is.
#[derive(Debug, Clone, Default)]
pub struct PromptVariables {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub fact_content: Option<String>,
    pub fact_title: Option<String>,
}

impl PromptVariables {
    pub fn new(question: &str, answer: &str) -> Self {
        Self {
            question: Some(question.to_string()),
            answer: Some(answer.to_string()),
            ..Default::default()
        }
    }

    pub fn with_fact_content(mut self, content: &str) -> Self {
        self.fact_content = Some(content.to_string());
        self
    }

    pub fn with_fact_title(mut self, title: &str) -> Self {
        self.fact_title = Some(title.to_string());
        self
    }

    fn pairs(&self) -> [(&'static str, Option<&str>); 4] {
        [
            (QUESTION_PLACEHOLDER, self.question.as_deref()),
            (ANSWER_PLACEHOLDER, self.answer.as_deref()),
            (FACT_CONTENT_PLACEHOLDER, self.fact_content.as_deref()),
            (FACT_TITLE_PLACEHOLDER, self.fact_title.as_deref()),
        ]
    }
}

/// Replace every placeholder that has a value
pub fn fill(template: &str, vars: &PromptVariables) -> String {
    vars.pairs()
        .into_iter()
        .fold(template.to_string(), |text, (placeholder, value)| match value {
            Some(value) => text.replace(placeholder, value),
            None => text,
        })
}

/// Copy of `prompt` with its content filled in
pub fn fill_prompt(prompt: &Prompt, vars: &PromptVariables) -> Prompt {
    Prompt {
        content: fill(&prompt.content, vars),
        ..prompt.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn fills_question_and_answer() {
        let vars = PromptVariables::new("What do you love?", "Climbing");
        let text = fill("Q: {QUESTIONS}\nA: {ANSWER}", &vars);
        assert_eq!(text, "Q: What do you love?\nA: Climbing");
    }

    #[test]
    fn leaves_placeholders_without_values() {
        let vars = PromptVariables::new("Q", "A");
        let text = fill("{ANSWER} / {FACT_CONTENT} / {FACT_TITLE}", &vars);
        assert_eq!(text, "A / {FACT_CONTENT} / {FACT_TITLE}");
    }

    #[test]
    fn replaces_every_occurrence() {
        let vars = PromptVariables::new("Q", "A")
            .with_fact_content("C")
            .with_fact_title("T");
        let text = fill("{FACT_TITLE}{FACT_TITLE} {FACT_CONTENT} {QUESTIONS}", &vars);
        assert_eq!(text, "TT C Q");
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        let vars = PromptVariables::new("Q", "A");
        assert_eq!(fill("Draw a watercolor.", &vars), "Draw a watercolor.");
    }

    #[test]
    fn fill_prompt_keeps_metadata() {
        let prompt = Prompt {
            id: Uuid::new_v4(),
            title: "Fact_Title_Generator_Prompt".to_string(),
            content: "Title for {FACT_CONTENT}".to_string(),
            order: 3,
        };
        let filled = fill_prompt(&prompt, &PromptVariables::default().with_fact_content("x"));

        assert_eq!(filled.id, prompt.id);
        assert_eq!(filled.title, prompt.title);
        assert_eq!(filled.order, 3);
        assert_eq!(filled.content, "Title for x");
    }
}
