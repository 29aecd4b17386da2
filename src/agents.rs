//! Agents that turn interview details into model calls

use log::debug;

use crate::prompts;
use crate::providers::ModelBackend;

/// Researches the company and analyses the role
pub struct ResearchAgent<'a>
{   model: &'a dyn ModelBackend
}

impl<'a> ResearchAgent<'a>
{   pub fn new(model: &'a dyn ModelBackend) -> Self
    {   ResearchAgent { model }
    }

    pub async fn research_company(&self, company_name: &str)
      -> crate::GenerationResult
    {   debug!("Researching company: {}", company_name);
        self.model
          .generate(prompts::company_research_prompt(company_name))
          .await
    }

    pub async fn analyze_role(
      &self
    , role: &str
    , company_name: &str
    , experience_level: &str
    ) -> crate::GenerationResult
    {   debug!("Analyzing role: {} at {}", role, company_name);
        self.model
          .generate(prompts::role_analysis_prompt(
            role, company_name, experience_level
          ))
          .await
    }
}

/// Writes questions and reviews answers
pub struct InterviewAgent<'a>
{   model: &'a dyn ModelBackend
}

impl<'a> InterviewAgent<'a>
{   pub fn new(model: &'a dyn ModelBackend) -> Self
    {   InterviewAgent { model }
    }

    pub async fn generate_interview_questions(
      &self
    , role: &str
    , company_name: &str
    , experience_level: &str
    , company_info: &str
    , role_info: &str
    ) -> crate::GenerationResult
    {   debug!("Generating questions for {} at {}", role, company_name);
        self.model
          .generate(prompts::interview_questions_prompt(
            role, company_name, experience_level, company_info, role_info
          ))
          .await
    }

    pub async fn provide_feedback(
      &self
    , candidate_answer: &str
    , question: &str
    , ideal_answer: &str
    ) -> crate::GenerationResult
    {   debug!("Reviewing candidate answer");
        self.model
          .generate(prompts::feedback_prompt(
            candidate_answer, question, ideal_answer
          ))
          .await
    }
}
