/*!
shared.rs - helpers shared by the remote subcommands.

  - Globals: target/team flags after env fallback
  - Session::open: resolve the target + build the HTTP transport
  - Session::dispatcher: a Dispatcher over the process-wide RouteTable
  - Session::checked_team: the team, looked up first when named with --team
  - team_request / pipeline_request: Request builders with the common placeholders
*/

use anyhow::{Context, Result, bail};

use crate::api::{Dispatcher, HttpTransport, Request, RouteTable, Transport, names};
use crate::log_debug;
use crate::target::{self, TargetSpec, TargetsFile};

/// Global flags shared by every remote command.
#[derive(Debug, Clone, Default)]
pub struct Globals {
    pub target: Option<String>,
    pub team: Option<String>,
}

/// A connected target: where requests go and how they get there.
pub struct Session<'r> {
    pub target: TargetSpec,
    team_explicit: bool,
    routes: &'r RouteTable,
    transport: HttpTransport,
}

impl<'r> Session<'r> {
    pub fn open(globals: &Globals, routes: &'r RouteTable) -> Result<Self> {
        let raw = match &globals.target {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => bail!("no target specified (use --target or PIPECTL_TARGET)"),
        };

        let targets_path = target::default_targets_path();
        let targets = match &targets_path {
            Some(p) => TargetsFile::load(p)?,
            None => TargetsFile::default(),
        };
        let shown_path = targets_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<no targets file>".to_string());

        let spec = target::parse_target(&raw, globals.team.as_deref(), &targets, &shown_path)
            .with_context(|| format!("Failed to resolve target: '{raw}'"))?;
        log_debug!("target: {spec}");

        let transport = HttpTransport::new(spec.url.clone())
            .context("Failed to initialize HTTP transport")?;
        Ok(Self {
            target: spec,
            team_explicit: globals.team.is_some(),
            routes,
            transport,
        })
    }

    pub fn dispatcher(&self) -> Dispatcher<'r, &HttpTransport> {
        Dispatcher::new(self.routes, &self.transport)
    }

    pub fn team(&self) -> &str {
        &self.target.team
    }

    /// The team to act on. A team given with `--team` must exist, so a typo
    /// there is reported as a missing team instead of a missing pipeline.
    pub fn checked_team(&self) -> Result<&str> {
        if self.team_explicit {
            ensure_team(&self.dispatcher(), self.team())?;
        }
        Ok(self.team())
    }
}

pub fn ensure_team<T: Transport>(dispatcher: &Dispatcher<'_, T>, team: &str) -> Result<()> {
    if !dispatcher.exists(&team_request(names::GET_TEAM, team))? {
        bail!("team '{team}' not found");
    }
    Ok(())
}

pub fn team_request(route: &str, team: &str) -> Request {
    Request::new(route).param("team_name", team)
}

pub fn pipeline_request(route: &str, team: &str, pipeline: &str) -> Request {
    team_request(route, team).param("pipeline_name", pipeline)
}

/// Pipeline names are sent exactly as typed; reject the ones the server cannot hold.
pub fn check_pipeline_name(name: &str) -> Result<&str> {
    if name.trim().is_empty() {
        bail!("pipeline name cannot be empty");
    }
    if name.contains('/') {
        bail!("pipeline name cannot contain '/'");
    }
    Ok(name)
}
