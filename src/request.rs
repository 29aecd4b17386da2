//! Interview request and guide types

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// Candidate seniority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel
{   /// 0-2 years
    Entry
  , /// 3-5 years
    Mid
  , /// 6+ years
    Senior
}

impl ExperienceLevel
{   /// Label used inside prompts
    pub fn label(&self) -> &'static str
    {   match self
        {   ExperienceLevel::Entry => "Entry Level (0-2 years)"
          , ExperienceLevel::Mid => "Mid Level (3-5 years)"
          , ExperienceLevel::Senior => "Senior (6+ years)"
        }
    }
}

impl fmt::Display for ExperienceLevel
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.label())
    }
}

impl FromStr for ExperienceLevel
{   type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   match s.trim().to_lowercase().as_str()
        {   "entry" | "junior" => Ok(ExperienceLevel::Entry)
          , "mid" => Ok(ExperienceLevel::Mid)
          , "senior" => Ok(ExperienceLevel::Senior)
          , other => Err(crate::error::Error::Other(
              format!("Unknown experience level: {}", other)
            ))
        }
    }
}

/// What the candidate is preparing for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewRequest
{   pub role: String
  , pub company_name: String
  , pub experience_level: ExperienceLevel
}

impl InterviewRequest
{   pub fn new(
      role: impl Into<String>
    , company_name: impl Into<String>
    , experience_level: ExperienceLevel
    ) -> Self
    {   InterviewRequest
        {   role: role.into()
          , company_name: company_name.into()
          , experience_level
        }
    }
}

/// Generated questions plus the context they came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewGuide
{   pub request: InterviewRequest
  , /// Company research; `None` when the step failed
    pub company_info: Option<String>
  , /// Role analysis; `None` when the step failed
    pub role_info: Option<String>
  , pub questions: String
  , /// Questions were generated from the degraded context
    pub used_fallback: bool
}

impl InterviewGuide
{   /// Markdown document for saving
    pub fn to_markdown(&self) -> String
    {   format!(
          "# Interview Questions for {} at {}\n\n{}",
          self.request.role,
          self.request.company_name,
          self.questions
        )
    }

    /// Suggested file name for [`InterviewGuide::to_markdown`]
    pub fn file_name(&self) -> String
    {   format!(
          "{}_{}_interview_questions.md",
          self.request.role.replace(' ', "_"),
          self.request.company_name.replace(' ', "_")
        )
    }
}
