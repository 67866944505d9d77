/*!
`pipeline.rs`

Pipeline state toggles and listing:

  pipectl hide-pipeline    -p NAME   -> "hid 'NAME'"
  pipectl expose-pipeline  -p NAME   -> "exposed 'NAME'"
  pipectl pause-pipeline   -p NAME   -> "paused 'NAME'"
  pipectl unpause-pipeline -p NAME   -> "unpaused 'NAME'"
  pipectl list-pipelines [--json]

A 404 from a toggle means the pipeline does not exist; that is reported as
"pipeline 'NAME' not found" and the command exits non-zero. With `--team`,
the team is fetched first and a missing one is "team 'TEAM' not found".
*/

use anyhow::{Result, bail};
use clap::Args;
use serde::{Deserialize, Serialize};

use super::format::{Role, StyleOptions, badge, color, print_json, table};
use super::shared::{Globals, Session, check_pipeline_name, pipeline_request, team_request};
use crate::api::{Dispatcher, RouteTable, Transport, names};

#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// Pipeline to act on
    #[arg(short = 'p', long = "pipeline", value_name = "NAME")]
    pub pipeline: String,
}

#[derive(Args, Debug)]
pub struct ListPipelinesArgs {
    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineAction {
    Hide,
    Expose,
    Pause,
    Unpause,
}

impl PipelineAction {
    pub fn route(&self) -> &'static str {
        match self {
            PipelineAction::Hide => names::HIDE_PIPELINE,
            PipelineAction::Expose => names::EXPOSE_PIPELINE,
            PipelineAction::Pause => names::PAUSE_PIPELINE,
            PipelineAction::Unpause => names::UNPAUSE_PIPELINE,
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            PipelineAction::Hide => "hid",
            PipelineAction::Expose => "exposed",
            PipelineAction::Pause => "paused",
            PipelineAction::Unpause => "unpaused",
        }
    }
}

/// Subset of the server's pipeline object that the CLI shows.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Pipeline {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub archived: bool,
}

/* -------------------------------------------------------------------------- */
/* Entry Points                                                               */
/* -------------------------------------------------------------------------- */

pub fn execute_pipeline_action(
    action: PipelineAction,
    args: PipelineArgs,
    globals: &Globals,
    routes: &RouteTable,
) -> Result<()> {
    let name = check_pipeline_name(&args.pipeline)?.to_string();
    let session = Session::open(globals, routes)?;
    let team = session.checked_team()?;
    let message = apply(&session.dispatcher(), team, &name, action)?;
    let style = StyleOptions::detect();
    println!(
        "{}{}",
        badge("success", &style),
        color(Role::Success, message, &style)
    );
    Ok(())
}

pub fn execute_list_pipelines(
    args: ListPipelinesArgs,
    globals: &Globals,
    routes: &RouteTable,
) -> Result<()> {
    let session = Session::open(globals, routes)?;
    let pipelines = list(&session.dispatcher(), session.team())?;

    if args.json {
        return print_json(&pipelines);
    }

    let style = StyleOptions::detect();
    if pipelines.is_empty() {
        println!(
            "{}",
            color(Role::Dim, format!("no pipelines in team '{}'", session.team()), &style)
        );
        return Ok(());
    }
    let rows: Vec<Vec<String>> = pipelines
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.name.clone(),
                yes_no(p.paused),
                yes_no(p.public),
            ]
        })
        .collect();
    println!("{}", table(&["ID", "NAME", "PAUSED", "PUBLIC"], &rows, &style));
    Ok(())
}

/* -------------------------------------------------------------------------- */
/* Core                                                                       */
/* -------------------------------------------------------------------------- */

/// Perform `action` and return the success line.
pub fn apply<T: Transport>(
    dispatcher: &Dispatcher<'_, T>,
    team: &str,
    pipeline: &str,
    action: PipelineAction,
) -> Result<String> {
    let request = pipeline_request(action.route(), team, pipeline);
    if !dispatcher.exists(&request)? {
        bail!("pipeline '{pipeline}' not found");
    }
    Ok(format!("{} '{pipeline}'", action.past_tense()))
}

pub fn list<T: Transport>(dispatcher: &Dispatcher<'_, T>, team: &str) -> Result<Vec<Pipeline>> {
    match dispatcher.fetch::<Option<Vec<Pipeline>>>(&team_request(names::LIST_PIPELINES, team))? {
        Some(pipelines) => Ok(pipelines.unwrap_or_default()),
        None => bail!("team '{team}' not found"),
    }
}

fn yes_no(v: bool) -> String {
    let s = if v { "yes" } else { "no" };
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dispatch::tests::FakeTransport;

    #[test]
    fn hide_reports_success() {
        let table = RouteTable::standard();
        let fake = FakeTransport::status(200, "");
        let d = Dispatcher::new(&table, &fake);
        let msg = apply(&d, "main", "awesome-pipeline", PipelineAction::Hide).unwrap();
        assert_eq!(msg, "hid 'awesome-pipeline'");
        let seen = fake.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].path,
            "/api/v1/teams/main/pipelines/awesome-pipeline/hide"
        );
    }

    #[test]
    fn missing_pipeline_is_reported() {
        let table = RouteTable::standard();
        let fake = FakeTransport::status(404, "");
        let d = Dispatcher::new(&table, &fake);
        let err = apply(&d, "main", "awesome-pipeline", PipelineAction::Expose).unwrap_err();
        assert_eq!(err.to_string(), "pipeline 'awesome-pipeline' not found");
    }

    #[test]
    fn server_failure_is_not_not_found() {
        let table = RouteTable::standard();
        let fake = FakeTransport::status(500, "internal");
        let d = Dispatcher::new(&table, &fake);
        let err = apply(&d, "main", "p", PipelineAction::Pause).unwrap_err();
        assert!(!err.to_string().contains("not found"));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn team_lookup_precedes_the_toggle() {
        let table = RouteTable::standard();
        let fake = FakeTransport::status(200, "");
        let d = Dispatcher::new(&table, &fake);
        crate::cmd::shared::ensure_team(&d, "main").unwrap();
        apply(&d, "main", "awesome-pipeline", PipelineAction::Hide).unwrap();
        let seen = fake.seen.lock().unwrap();
        let calls: Vec<String> = seen.iter().map(|w| format!("{} {}", w.method, w.path)).collect();
        assert_eq!(
            calls,
            vec![
                "GET /api/v1/teams/main",
                "PUT /api/v1/teams/main/pipelines/awesome-pipeline/hide",
            ]
        );
    }

    #[test]
    fn missing_team_stops_before_the_toggle() {
        let table = RouteTable::standard();
        let fake = FakeTransport::status(404, "");
        let d = Dispatcher::new(&table, &fake);
        let err = crate::cmd::shared::ensure_team(&d, "ghost").unwrap_err();
        assert_eq!(err.to_string(), "team 'ghost' not found");
        assert_eq!(fake.calls(), 1);
    }

    #[test]
    fn actions_map_to_routes() {
        assert_eq!(PipelineAction::Unpause.route(), names::UNPAUSE_PIPELINE);
        assert_eq!(PipelineAction::Unpause.past_tense(), "unpaused");
    }

    #[test]
    fn list_decodes_pipelines() {
        let table = RouteTable::standard();
        let fake = FakeTransport::status(
            200,
            r#"[{"id":1,"name":"ci","paused":true,"public":false,"team_name":"main"}]"#,
        );
        let d = Dispatcher::new(&table, &fake);
        let got = list(&d, "main").unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].name, "ci");
        assert!(got[0].paused);
    }

    #[test]
    fn list_null_body_is_empty() {
        let table = RouteTable::standard();
        let fake = FakeTransport::status(200, "null");
        let d = Dispatcher::new(&table, &fake);
        assert!(list(&d, "main").unwrap().is_empty());
    }

    #[test]
    fn list_unknown_team() {
        let table = RouteTable::standard();
        let fake = FakeTransport::status(404, "");
        let d = Dispatcher::new(&table, &fake);
        assert_eq!(
            list(&d, "ghost").unwrap_err().to_string(),
            "team 'ghost' not found"
        );
    }
}
