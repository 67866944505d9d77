//! `pipectl routes [--json]`: print the route table this client speaks.

use anyhow::Result;
use clap::Args;

use super::format::{StyleOptions, print_json, table};
use crate::api::RouteTable;

#[derive(Args, Debug)]
pub struct RoutesArgs {
    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute_routes(args: RoutesArgs, routes: &RouteTable) -> Result<()> {
    if args.json {
        let entries: Vec<serde_json::Value> = routes
            .iter()
            .map(|r| {
                serde_json::json!({
                    "name": r.name,
                    "method": r.method.as_str(),
                    "path": r.template,
                    "params": r.placeholders(),
                })
            })
            .collect();
        return print_json(&entries);
    }

    let rows: Vec<Vec<String>> = routes
        .iter()
        .map(|r| vec![r.name.to_string(), r.method.to_string(), r.template.to_string()])
        .collect();
    println!("{}", table(&["NAME", "METHOD", "PATH"], &rows, &StyleOptions::detect()));
    Ok(())
}

/// `pipectl complete-path PARTIAL` (hidden): one candidate per line.
pub fn execute_complete_path(partial: &str) -> Result<()> {
    for candidate in super::path_arg::PathArgument::complete(partial) {
        println!("{candidate}");
    }
    Ok(())
}
