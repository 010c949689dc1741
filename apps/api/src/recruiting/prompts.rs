// Recruiter-facing prompt templates.

pub const SUGGEST_CHALLENGES_SYSTEM: &str = "\
You design hiring challenges for engineering teams. \
Given a project and the skills it needs, propose a small set of challenges that \
separate strong candidates from weak ones on exactly those skills.";

pub const SUGGEST_CHALLENGES_PROMPT: &str = r#"Propose 1-3 challenges for the project below.

Each challenge must target one or more of the required skills, state the full task in
`challenge_question`, and size difficulty and time limit to the required level
(0-35 beginner, 36-65 intermediate, 66-85 advanced, 86-100 expert).

OUTPUT SCHEMA (return exactly this structure):
{
  "challenges": [
    {
      "title": "string",
      "description": "1-2 sentence summary",
      "difficulty": "beginner|intermediate|advanced|expert",
      "time_limit": <int minutes>,
      "challenge_type": "coding|system_design|algorithm|debugging|architecture",
      "challenge_question": "full instructions with rubric",
      "max_score": <int>
    }
  ],
  "rationale": "why these challenges fit the project"
}

project_json:
<project_json>
"#;
