//! `pipectl build-plan BUILD_ID [--json]`: show the public plan of a build.

use anyhow::{Result, bail};
use clap::Args;
use serde::{Deserialize, Serialize};

use super::format::{Role, StyleOptions, color, print_json};
use super::shared::{Globals, Session};
use crate::api::{Dispatcher, Request, RouteTable, Transport, names};

#[derive(Args, Debug)]
pub struct BuildPlanArgs {
    /// Build id
    #[arg(value_name = "BUILD_ID")]
    pub build_id: u64,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

/// The plan as the server publishes it; `plan` is kept opaque.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct BuildPlan {
    pub schema: String,
    #[serde(default)]
    pub plan: serde_json::Value,
}

pub fn execute_build_plan(args: BuildPlanArgs, globals: &Globals, routes: &RouteTable) -> Result<()> {
    let session = Session::open(globals, routes)?;
    let Some(plan) = fetch(&session.dispatcher(), args.build_id)? else {
        bail!("build '{}' not found", args.build_id);
    };

    if args.json {
        return print_json(&plan);
    }
    let style = StyleOptions::detect();
    println!(
        "{} {}",
        color(Role::Primary, format!("build {}", args.build_id), &style),
        color(Role::Dim, format!("(schema {})", plan.schema), &style)
    );
    println!("{}", serde_json::to_string_pretty(&plan.plan)?);
    Ok(())
}

/// `Ok(None)` when the build does not exist.
pub fn fetch<T: Transport>(dispatcher: &Dispatcher<'_, T>, build_id: u64) -> Result<Option<BuildPlan>> {
    let request = Request::new(names::GET_BUILD_PLAN).param("build_id", build_id.to_string());
    Ok(dispatcher.fetch(&request)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dispatch::tests::FakeTransport;

    #[test]
    fn found_plan() {
        let table = RouteTable::standard();
        let fake = FakeTransport::status(200, r#"{"schema":"exec.v2","plan":{"id":"1","get":{}}}"#);
        let d = Dispatcher::new(&table, &fake);
        let plan = fetch(&d, 17).unwrap().unwrap();
        assert_eq!(plan.schema, "exec.v2");
        assert_eq!(plan.plan["id"], "1");
        assert_eq!(fake.seen.lock().unwrap()[0].path, "/api/v1/builds/17/plan");
    }

    #[test]
    fn missing_build_is_none() {
        let table = RouteTable::standard();
        let fake = FakeTransport::status(404, "");
        let d = Dispatcher::new(&table, &fake);
        assert!(fetch(&d, 17).unwrap().is_none());
    }

    #[test]
    fn garbage_body_is_error() {
        let table = RouteTable::standard();
        let fake = FakeTransport::status(200, "<html>");
        let d = Dispatcher::new(&table, &fake);
        let err = fetch(&d, 17).unwrap_err();
        assert!(err.to_string().contains("decode"));
    }
}
