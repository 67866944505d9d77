/*!
Command modules.

  src/cmd/
    mod.rs           (this file)
    shared.rs        Globals, Session, request builders
    path_arg.rs      PathArgument (flag value resolved at parse time)
    format.rs        human output helpers
    pipeline.rs      hide/expose/pause/unpause + list-pipelines
    build_plan.rs    build-plan
    set_pipeline.rs  set-pipeline
    validate.rs      validate-pipeline (local only)
    routes.rs        routes + hidden complete-path

Conventions:
  - Each subcommand exposes an `execute_*` function returning `anyhow::Result<()>`.
  - Remote logic lives in a small generic function over `Transport`
    (`apply`, `list`, `fetch`, `save`) so it can be tested with a fake.
*/

pub mod build_plan;
pub mod format;
pub mod path_arg;
pub mod pipeline;
pub mod routes;
pub mod set_pipeline;
pub mod shared;
pub mod validate;

pub use build_plan::{BuildPlanArgs, execute_build_plan};
pub use pipeline::{
    ListPipelinesArgs, PipelineAction, PipelineArgs, execute_list_pipelines,
    execute_pipeline_action,
};
pub use routes::{RoutesArgs, execute_complete_path, execute_routes};
pub use set_pipeline::{SetPipelineArgs, execute_set_pipeline};
pub use shared::Globals;
pub use validate::{ValidateArgs, execute_validate};
