use std::path::PathBuf;
use std::process::ExitCode;
use clap::{Parser, Subcommand};
use log::{error, info};

use interview_prep::agents::InterviewAgent;
use interview_prep::config::{ClientConfig, ProviderConfig};
use interview_prep::providers::{self, google, ModelBackend};
use interview_prep::request::{ExperienceLevel, InterviewRequest};
use interview_prep::{Backend, ModelHandle};

const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Parser)]
#[command(name = "interview-prep", about = "Interview preparation with LLMs")]
struct Cli
{   /// Backend to use: google or ollama
    #[arg(long, default_value = "google")]
    backend: Backend
  , /// Model name; defaults to the backend's default model
    #[arg(long)]
    model: Option<String>
  , /// Override the backend base URL
    #[arg(long)]
    api_base: Option<String>
  , /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>
  , /// Attempts per model call
    #[arg(long, default_value_t = 3)]
    max_retries: usize
  , #[command(subcommand)]
    command: Command
}

#[derive(Subcommand)]
enum Command
{   /// List the backend's available models
    Models
  , /// Research a company and role, then generate questions
    Prepare
    {   #[arg(long)]
        role: String
      , #[arg(long)]
        company: String
      , /// entry, mid or senior
        #[arg(long, default_value = "entry")]
        experience: ExperienceLevel
      , /// Write the guide here; a directory gets the default file name
        #[arg(long)]
        output: Option<PathBuf>
    }
  , /// Get feedback on an answer to an interview question
    Feedback
    {   #[arg(long)]
        question: String
      , #[arg(long)]
        answer: String
      , #[arg(long, default_value = "")]
        ideal: String
    }
}

#[tokio::main]
async fn main() -> ExitCode
{   env_logger::Builder::from_env(
      env_logger::Env::default().default_filter_or("info")
    ).init();

    let cli = Cli::parse();
    let handle = ModelHandle::new(
      cli.backend
    , cli.model.clone()
        .unwrap_or_else(|| cli.backend.default_model().to_string())
    );
    let mut config = ClientConfig
    {   provider: ProviderConfig
        {   api_base: cli.api_base.clone()
          , timeout_secs: cli.timeout_secs
        }
      , ..ClientConfig::default()
    };
    config.retry.max_retries = cli.max_retries;

    let credential = std::env::var(GOOGLE_API_KEY_ENV).ok();
    let model = providers::connect_with_config(
      handle.clone(), credential, config
    );
    info!("Using {}", handle);

    match cli.command
    {   Command::Models => {
          let mut models = model.list_available_models().await;
          if handle.backend == Backend::Google
          {   models = google::promote_default_model(models);
          }
          for name in models
          {   println!("{}", name);
          }
          ExitCode::SUCCESS
        }
      , Command::Prepare { role, company, experience, output } => {
          let request = InterviewRequest::new(role, company, experience);
          let guide = match interview_prep::pipeline::prepare_interview(
            model.as_ref(), &request
          ).await
          {   Ok(guide) => guide
            , Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
              }
          };
          let markdown = guide.to_markdown();
          match output
          {   Some(path) => {
                let path = if path.is_dir()
                {   path.join(guide.file_name())
                } else
                {   path
                };
                if let Err(e) = tokio::fs::write(&path, markdown).await
                {   error!("Failed to write {}: {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
                info!("Saved interview guide to {}", path.display());
              }
            , None => println!("{}", markdown)
          }
          ExitCode::SUCCESS
        }
      , Command::Feedback { question, answer, ideal } => {
          let agent = InterviewAgent::new(model.as_ref());
          match agent.provide_feedback(&answer, &question, &ideal).await
          {   Ok(feedback) => {
                println!("{}", feedback);
                ExitCode::SUCCESS
              }
            , Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
              }
          }
        }
    }
}
