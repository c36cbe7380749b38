//! Prompt template for bullet generation

use serde::{Deserialize, Serialize};

/// Longest slice of each context document placed into the prompt
const MAX_CONTEXT_CHARS: usize = 6000;

#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub system: String,
    pub bullet_generation: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            bullet_generation: BULLET_GENERATION_TEMPLATE.to_string(),
        }
    }
}

/// Parameters for prompt template substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptParams {
    pub skills: Vec<String>,
    pub resume_content: String,
    pub job_content: String,
}

impl PromptTemplates {
    pub fn render_bullet_generation(&self, params: &PromptParams) -> String {
        let skill_list = params
            .skills
            .iter()
            .enumerate()
            .map(|(i, skill)| format!("{}. {}", i + 1, skill))
            .collect::<Vec<_>>()
            .join("\n");

        self.bullet_generation
            .replace("{count}", &params.skills.len().to_string())
            .replace("{skills}", &skill_list)
            .replace("{resume}", &clip(&params.resume_content))
            .replace("{job}", &clip(&params.job_content))
    }
}

fn clip(text: &str) -> String {
    text.chars().take(MAX_CONTEXT_CHARS).collect()
}

const SYSTEM_PROMPT: &str = "You write concise, factual resume bullet points for senior engineers. \
You output plain sentences only, one per line, with no commentary.";

const BULLET_GENERATION_TEMPLATE: &str = r#"TASK: Write exactly {count} resume achievement bullets, one for each skill below, in the same order.

<SKILLS>
{skills}
</SKILLS>

<RESUME>
{resume}
</RESUME>

<JOB POSTING>
{job}
</JOB POSTING>

Rules:
- One line per skill, in the order listed, nothing else.
- Each line is a single sentence of 12 to 30 words that names the skill explicitly.
- Start with a strong past-tense verb and match the tone of the resume above.
- Do not number the lines and do not add headings or explanations."#;
