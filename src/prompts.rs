//! Prompt templates for each pipeline step

use crate::failover::truncate_chars;

/// Context passed into the question prompt is clipped to this many
/// characters per section
pub const MAX_CONTEXT_CHARS: usize = 2000;

const CONTEXT_TRUNCATION_MARKER: &str = "... (truncated)";

fn clip_context(text: &str) -> String
{   truncate_chars(text, MAX_CONTEXT_CHARS, CONTEXT_TRUNCATION_MARKER)
      .unwrap_or_else(|| text.to_string())
}

pub fn company_research_prompt(company_name: &str) -> String
{   format!(
"You are a professional company researcher. Provide concise information \
about {company_name} for interview preparation.

Include:
1. Brief company overview: history, industry, main products/services
2. Company culture and values (key points only)
3. Recent news or developments (1-2 most relevant items)
4. Interview approach and hiring process (if known)
5. Key challenges or opportunities

Keep your response brief and focused on the most important information \
for interview preparation.
")
}

pub fn role_analysis_prompt(
  role: &str
, company_name: &str
, experience_level: &str
) -> String
{   format!(
"You are a career advisor specializing in the tech industry. Provide a \
concise analysis of the {role} role at {company_name} for a candidate with \
{experience_level} experience.

Include:
1. Key responsibilities (3-5 most important)
2. Essential technical skills (most critical only)
3. Important soft skills (top 3)
4. Brief career progression insights
5. How this role fits in the organization
6. Specific skills that {company_name} might value

Keep your response brief and focused on the most important information \
for interview preparation.
")
}

/// Question-generation prompt. Company and role context are clipped
/// to [`MAX_CONTEXT_CHARS`] each.
pub fn interview_questions_prompt(
  role: &str
, company_name: &str
, experience_level: &str
, company_info: &str
, role_info: &str
) -> String
{   let company_info = clip_context(company_info);
    let role_info = clip_context(role_info);
    format!(
"You are an experienced technical interviewer at {company_name}. Your task \
is to create interview questions for a {role} position for a candidate with \
{experience_level} experience.

Company Information (brief):
{company_info}

Role Information (brief):
{role_info}

Create 10 interview questions in these categories:

1. Technical Skills (4 questions)
   - Questions that assess technical knowledge relevant to the {role} position
   - Tailored to {experience_level} experience level

2. Problem-Solving (2 questions)
   - Questions that evaluate ability to solve problems
   - Relevant to {company_name} and the {role} position

3. Behavioral/Situational (2 questions)
   - Questions about how the candidate handled past situations
   - Focus on company culture and values

4. Company/Role-Specific (2 questions)
   - Questions specific to {company_name} and the {role}
   - Assess fit for the role and company

For each question, provide:
1. The question itself
2. What the interviewer is looking for
3. A sample strong answer

Format as a structured interview guide.
")
}

pub fn feedback_prompt(
  candidate_answer: &str
, question: &str
, ideal_answer: &str
) -> String
{   format!(
"You are an expert interview coach. Your task is to provide constructive \
feedback on a candidate's answer to an interview question.

Question:
{question}

Candidate's Answer:
{candidate_answer}

Ideal Answer Components:
{ideal_answer}

Please provide feedback on the candidate's answer, including:
1. Strengths of the answer
2. Areas for improvement
3. Specific suggestions to make the answer stronger
4. A rating from 1-10 on how effective the answer is

Format your response as constructive, actionable feedback that will help \
the candidate improve.
")
}
