use anyhow::Result;
use clap::{Parser, Subcommand};

mod api;
mod cmd;
mod target;
mod utils;

use api::RouteTable;
use cmd::{
    BuildPlanArgs, Globals, ListPipelinesArgs, PipelineAction, PipelineArgs, RoutesArgs,
    SetPipelineArgs, ValidateArgs,
};

/// pipectl - command-line client for a remote build-orchestration service
///
/// Command layout:
///   pipectl hide-pipeline    -p NAME
///   pipectl expose-pipeline  -p NAME
///   pipectl pause-pipeline   -p NAME
///   pipectl unpause-pipeline -p NAME
///   pipectl list-pipelines   [--json]
///   pipectl build-plan BUILD_ID [--json]
///   pipectl set-pipeline -p NAME -c CONFIG
///   pipectl validate-pipeline -c CONFIG [--strict]
///   pipectl routes [--json]
///
/// CONFIG accepts a path, a glob that matches exactly one file, or '-' to
/// read the configuration from stdin.
///
/// Global flags / env:
///   -v / -vv        Increase verbosity (logs go to stderr)
///   -q / --quiet    Errors only
///   -t / --target   API URL or alias from the targets file (or PIPECTL_TARGET)
///   --team          Team name (or PIPECTL_TEAM; default: alias team, then "main")
///
/// Targets file: $PIPECTL_TARGETS or ~/.pipectl.yml
///   targets:
///     ci: { api: https://ci.example.com, team: main }
#[derive(Parser, Debug)]
#[command(
    name = "pipectl",
    version,
    author,
    about = "pipectl - command-line client for a remote build-orchestration service",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// API URL or target alias
    #[arg(short = 't', long = "target", global = true, env = "PIPECTL_TARGET", value_name = "TARGET")]
    target: Option<String>,

    /// Team the command acts on
    #[arg(long = "team", global = true, env = "PIPECTL_TEAM", value_name = "TEAM")]
    team: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Hide a pipeline from unauthenticated users
    HidePipeline(PipelineArgs),

    /// Make a pipeline visible to unauthenticated users
    ExposePipeline(PipelineArgs),

    /// Pause a pipeline
    PausePipeline(PipelineArgs),

    /// Unpause a pipeline
    UnpausePipeline(PipelineArgs),

    /// List the team's pipelines
    ListPipelines(ListPipelinesArgs),

    /// Show the public plan of a build
    BuildPlan(BuildPlanArgs),

    /// Upload a pipeline configuration
    SetPipeline(SetPipelineArgs),

    /// Check a pipeline configuration locally
    ValidatePipeline(ValidateArgs),

    /// Print the API routes this client knows
    Routes(RoutesArgs),

    /// Shell completion candidates for a path argument
    #[command(hide = true)]
    CompletePath {
        #[arg(default_value = "")]
        partial: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let globals = Globals {
        target: cli.target.filter(|t| !t.trim().is_empty()),
        team: cli.team.filter(|t| !t.trim().is_empty()),
    };
    let routes = RouteTable::standard();

    if let Err(e) = run(cli.command, &globals, &routes) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(command: Commands, globals: &Globals, routes: &RouteTable) -> Result<()> {
    match command {
        Commands::HidePipeline(args) => {
            cmd::execute_pipeline_action(PipelineAction::Hide, args, globals, routes)
        }
        Commands::ExposePipeline(args) => {
            cmd::execute_pipeline_action(PipelineAction::Expose, args, globals, routes)
        }
        Commands::PausePipeline(args) => {
            cmd::execute_pipeline_action(PipelineAction::Pause, args, globals, routes)
        }
        Commands::UnpausePipeline(args) => {
            cmd::execute_pipeline_action(PipelineAction::Unpause, args, globals, routes)
        }
        Commands::ListPipelines(args) => cmd::execute_list_pipelines(args, globals, routes),
        Commands::BuildPlan(args) => cmd::execute_build_plan(args, globals, routes),
        Commands::SetPipeline(args) => cmd::execute_set_pipeline(args, globals, routes),
        Commands::ValidatePipeline(args) => cmd::execute_validate(args),
        Commands::Routes(args) => cmd::execute_routes(args, routes),
        Commands::CompletePath { partial } => cmd::execute_complete_path(&partial),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_hide_pipeline() {
        let cli = Cli::try_parse_from([
            "pipectl",
            "-t",
            "http://localhost:8080",
            "hide-pipeline",
            "-p",
            "awesome-pipeline",
        ])
        .unwrap();
        assert_eq!(cli.target.as_deref(), Some("http://localhost:8080"));
        match cli.command {
            Commands::HidePipeline(args) => assert_eq!(args.pipeline, "awesome-pipeline"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn bad_config_path_fails_during_parsing() {
        let err = Cli::try_parse_from([
            "pipectl",
            "validate-pipeline",
            "-c",
            "/no/such/dir/pipeline-*.yml",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
