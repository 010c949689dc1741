// Talent oracle prompt templates.
// Slots use `<name>` placeholders filled by `llm_client::prompts::fill_template`.

pub const RESUME_EXTRACT_SYSTEM: &str = "\
You are a senior technical evaluator for a developer assessment platform. \
Read a developer's resume and profile and return a compact, strictly structured \
assessment of their strongest technical skills, each with one validation challenge. \
Be conservative: omit weakly evidenced skills rather than guessing.";

pub const RESUME_EXTRACT_PROMPT: &str = r#"Assess the developer described below.

1) Pick 2-6 technical skills that are well evidenced (projects, impact, years, repositories, certifications).
2) For each skill estimate `level` (0-100) and set `validated` to true only when there is strong
   external evidence (production impact, public repositories, talks, certifications).
3) For each skill write ONE self-contained challenge that isolates that skill.
   Difficulty follows the level: 0-35 beginner, 36-65 intermediate, 66-85 advanced, 86-100 expert.
   Time limits: beginner 30-60, intermediate 60-90, advanced 90-120, expert 90-150 minutes.
   `challenge_question` must contain the full task, inputs/outputs, success criteria and how it is scored.
4) Estimate `dev_score` (0-1000) from seniority, breadth and depth of evidence.

OUTPUT SCHEMA (return exactly this structure):
{
  "dev_score": <int 0-1000>,
  "skills": [
    {
      "name": "string",
      "level": <int 0-100>,
      "validated": <true|false>,
      "challenge": {
        "title": "string",
        "description": "1-2 sentence summary",
        "difficulty": "beginner|intermediate|advanced|expert",
        "time_limit": <int minutes>,
        "challenge_type": "coding|system_design|algorithm|debugging|architecture",
        "challenge_question": "full instructions with rubric",
        "max_score": <int>
      }
    }
  ]
}

profile_json:
<profile_json>

resume_text:
<resume_text>
"#;

pub const RESUME_EXTRACT_USER: &str =
    "Follow the system prompt and return the dev_score and skills as JSON.";

pub const SUBMISSION_GRADE_SYSTEM: &str = "\
You are a meticulous challenge evaluator. \
Score developer submissions strictly against the challenge definition with transparent, \
reproducible criteria. Never invent facts beyond the challenge and submission.";

pub const SUBMISSION_GRADE_PROMPT: &str = r#"Grade the submission below against its challenge.

Rules:
- Map rubric components to the final score proportionally to challenge.max_score; never exceed it.
- accuracy_rate is the 0-100 percentage of objectively correct outcomes.
- debugging: count bugs_found, bugs_missed and false_positives; accuracy_rate ~ found / (found + missed) * 100.
- coding / algorithm: correctness first, then clarity and efficiency per the challenge rubric.
- system_design / architecture: correctness against constraints, trade-offs, clarity, efficiency;
  ignoring hard constraints is penalized heavily.
- For non-debugging challenges set the three bug counters to 0.
- If information is missing, score conservatively.

OUTPUT SCHEMA (return exactly this structure):
{
  "score": <int 0-max_score>,
  "accuracy_rate": <float 0-100>,
  "bugs_found": <int>,
  "bugs_missed": <int>,
  "false_positives": <int>,
  "ai_feedback": "1-3 sentences of actionable feedback",
  "evaluation_details": {
    "rubric": {"correctness": <0-1>, "quality": <0-1>, "clarity": <0-1>, "efficiency": <0-1>},
    "notes": ["string"]
  }
}

submission_json:
<submission_json>
"#;

pub const SUBMISSION_GRADE_USER: &str = "Follow the system prompt and return the grading report as JSON.";
