//! `pipectl set-pipeline -p NAME -c CONFIG`
//!
//! Loads the YAML config (path, single-match glob, or `-` for stdin),
//! validates it locally, then uploads it as JSON through `SaveConfig`.
//! Nothing is sent when validation fails.

use anyhow::{Result, bail};
use clap::Args;
use serde_json::Value;

use super::format::{Role, StyleOptions, badge, color};
use super::path_arg::PathArgument;
use super::shared::{Globals, Session, check_pipeline_name, pipeline_request};
use super::validate::{load_config, validate_config};
use crate::api::{Dispatcher, RouteTable, Transport, names};
use crate::log_info;

#[derive(Args, Debug)]
pub struct SetPipelineArgs {
    /// Pipeline to configure
    #[arg(short = 'p', long = "pipeline", value_name = "NAME")]
    pub pipeline: String,

    /// Pipeline configuration (path, glob matching one file, or '-' for stdin)
    #[arg(short = 'c', long = "config", value_name = "PATH", value_parser = PathArgument::parse)]
    pub config: PathArgument,
}

pub fn execute_set_pipeline(
    args: SetPipelineArgs,
    globals: &Globals,
    routes: &RouteTable,
) -> Result<()> {
    let name = check_pipeline_name(&args.pipeline)?.to_string();
    let config = load_config(&args.config)?;
    let problems = validate_config(&config, false);
    if !problems.is_empty() {
        bail!("configuration invalid: {}", problems.join("; "));
    }

    let session = Session::open(globals, routes)?;
    let team = session.checked_team()?;
    log_info!("uploading '{name}' to {}", session.target);
    let message = save(&session.dispatcher(), team, &name, &config)?;
    let style = StyleOptions::detect();
    println!(
        "{}{}",
        badge("success", &style),
        color(Role::Success, message, &style)
    );
    Ok(())
}

pub fn save<T: Transport>(
    dispatcher: &Dispatcher<'_, T>,
    team: &str,
    pipeline: &str,
    config: &Value,
) -> Result<String> {
    let request = pipeline_request(names::SAVE_CONFIG, team, pipeline).json_body(config)?;
    if !dispatcher.exists(&request)? {
        bail!("team '{team}' not found");
    }
    Ok(format!("configuration updated for '{pipeline}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes::Method;
    use crate::api::dispatch::tests::FakeTransport;

    #[test]
    fn uploads_config_as_json() {
        let table = RouteTable::standard();
        let fake = FakeTransport::status(200, "");
        let d = Dispatcher::new(&table, &fake);
        let config = serde_json::json!({"jobs": [{"name": "unit"}]});
        let msg = save(&d, "main", "ci", &config).unwrap();
        assert_eq!(msg, "configuration updated for 'ci'");

        let seen = fake.seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::Put);
        assert_eq!(seen[0].path, "/api/v1/teams/main/pipelines/ci/config");
        let sent: Value = serde_json::from_slice(seen[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, config);
    }

    #[test]
    fn missing_team() {
        let table = RouteTable::standard();
        let fake = FakeTransport::status(404, "");
        let d = Dispatcher::new(&table, &fake);
        let err = save(&d, "ghost", "ci", &serde_json::json!({})).unwrap_err();
        assert_eq!(err.to_string(), "team 'ghost' not found");
    }
}
