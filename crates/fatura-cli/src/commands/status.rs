//! Job-status command - poll a Docupipe processing job.

use clap::Args;

use super::config::load_config;
use crate::upload::DocupipeClient;

/// Arguments for the job-status command.
#[derive(Args)]
pub struct JobStatusArgs {
    /// Job ID returned by a Docupipe upload
    job_id: String,
}

pub async fn run(args: JobStatusArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let client = DocupipeClient::from_config(&config.providers.docupipe)?;

    let status = client
        .job_status(&args.job_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to get status of job {}: {}", args.job_id, e))?;

    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}
