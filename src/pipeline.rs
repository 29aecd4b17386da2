//! Research -> analysis -> questions, with a degraded fallback

use log::{info, warn};

use crate::agents::{InterviewAgent, ResearchAgent};
use crate::providers::ModelBackend;
use crate::request::{InterviewGuide, InterviewRequest};

/// Run the three steps against `model`.
///
/// If research or analysis fails, questions are generated from a
/// minimal context naming only the company, role and level. Only a
/// failure of the question step itself is returned as an error.
pub async fn prepare_interview(
  model: &dyn ModelBackend
, request: &InterviewRequest
) -> Result<InterviewGuide, crate::error::Error>
{   let research = ResearchAgent::new(model);
    let interview = InterviewAgent::new(model);
    let level = request.experience_level.label();

    info!("Step 1/3: Researching company information");
    let context = match research
      .research_company(&request.company_name)
      .await
    {   Ok(company_info) => {
          info!("Step 2/3: Analyzing job role requirements");
          research
            .analyze_role(&request.role, &request.company_name, level)
            .await
            .map(|role_info| (company_info, role_info))
        }
      , Err(e) => Err(e)
    };

    let (company_info, role_info, used_fallback) = match context
    {   Ok((company_info, role_info)) => {
          (Some(company_info), Some(role_info), false)
        }
      , Err(e) => {
          warn!("Research failed ({}), using simplified prompts", e);
          (None, None, true)
        }
    };

    info!("Step 3/3: Generating interview questions and answers");
    let fallback_company = format!("Company: {}", request.company_name);
    let fallback_role = format!(
      "Role: {}, Experience: {}", request.role, level
    );
    let questions = interview
      .generate_interview_questions(
        &request.role
      , &request.company_name
      , level
      , company_info.as_deref().unwrap_or(&fallback_company)
      , role_info.as_deref().unwrap_or(&fallback_role)
      )
      .await?;

    info!("Completed interview guide for {}", request.role);
    Ok(InterviewGuide
    {   request: request.clone()
      , company_info
      , role_info
      , questions
      , used_fallback
    })
}
