/*!
`routes.rs`

Named routes for the remote API: symbolic operation name -> HTTP method +
URL template with `{placeholder}` slots.

Public API:
  - RouteTable::standard()          built-in table (constructed once in main)
  - RouteTable::resolve(name)       exact-name lookup
  - RouteTable::substitute(t, map)  fill placeholders (each value encoded as one segment)
  - RouteTable::create_path(name, map)

Lookup is exact string equality; there is no fuzzy matching.
*/

use std::collections::BTreeMap;
use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use super::error::RequestError;

/// Characters escaped inside a single path segment: everything except the
/// unreserved set and the sub-delimiters that are legal in a segment.
///
/// `/` and `\` are escaped so a value can never introduce extra segments.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b',')
    .remove(b':')
    .remove(b';')
    .remove(b'=')
    .remove(b'@');

/// Operation names understood by the standard table.
pub mod names {
    pub const GET_INFO: &str = "GetInfo";
    pub const GET_TEAM: &str = "GetTeam";
    pub const GET_BUILD: &str = "GetBuild";
    pub const GET_BUILD_PLAN: &str = "GetBuildPlan";
    pub const LIST_PIPELINES: &str = "ListPipelines";
    pub const GET_PIPELINE: &str = "GetPipeline";
    pub const DELETE_PIPELINE: &str = "DeletePipeline";
    pub const PAUSE_PIPELINE: &str = "PausePipeline";
    pub const UNPAUSE_PIPELINE: &str = "UnpausePipeline";
    pub const EXPOSE_PIPELINE: &str = "ExposePipeline";
    pub const HIDE_PIPELINE: &str = "HidePipeline";
    pub const GET_CONFIG: &str = "GetConfig";
    pub const SAVE_CONFIG: &str = "SaveConfig";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single named remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub method: Method,
    pub template: &'static str,
}

impl Route {
    pub const fn new(name: &'static str, method: Method, template: &'static str) -> Self {
        Self {
            name,
            method,
            template,
        }
    }

    /// Placeholder names in template order.
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        let mut rest = self.template;
        while let Some(open) = rest.find('{') {
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    out.push(&after[..close]);
                    rest = &after[close + 1..];
                }
                None => break,
            }
        }
        out
    }
}

/// Immutable route table; build once and lend it to a `Dispatcher`.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The routes exposed by the build-orchestration API.
    pub fn standard() -> Self {
        use names::*;
        Self::new(vec![
            Route::new(GET_INFO, Method::Get, "/api/v1/info"),
            Route::new(GET_TEAM, Method::Get, "/api/v1/teams/{team_name}"),
            Route::new(GET_BUILD, Method::Get, "/api/v1/builds/{build_id}"),
            Route::new(GET_BUILD_PLAN, Method::Get, "/api/v1/builds/{build_id}/plan"),
            Route::new(
                LIST_PIPELINES,
                Method::Get,
                "/api/v1/teams/{team_name}/pipelines",
            ),
            Route::new(
                GET_PIPELINE,
                Method::Get,
                "/api/v1/teams/{team_name}/pipelines/{pipeline_name}",
            ),
            Route::new(
                DELETE_PIPELINE,
                Method::Delete,
                "/api/v1/teams/{team_name}/pipelines/{pipeline_name}",
            ),
            Route::new(
                PAUSE_PIPELINE,
                Method::Put,
                "/api/v1/teams/{team_name}/pipelines/{pipeline_name}/pause",
            ),
            Route::new(
                UNPAUSE_PIPELINE,
                Method::Put,
                "/api/v1/teams/{team_name}/pipelines/{pipeline_name}/unpause",
            ),
            Route::new(
                EXPOSE_PIPELINE,
                Method::Put,
                "/api/v1/teams/{team_name}/pipelines/{pipeline_name}/expose",
            ),
            Route::new(
                HIDE_PIPELINE,
                Method::Put,
                "/api/v1/teams/{team_name}/pipelines/{pipeline_name}/hide",
            ),
            Route::new(
                GET_CONFIG,
                Method::Get,
                "/api/v1/teams/{team_name}/pipelines/{pipeline_name}/config",
            ),
            Route::new(
                SAVE_CONFIG,
                Method::Put,
                "/api/v1/teams/{team_name}/pipelines/{pipeline_name}/config",
            ),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn resolve(&self, name: &str) -> Result<&Route, RequestError> {
        self.routes
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| RequestError::UnknownRoute(name.to_string()))
    }

    /// Fill every `{name}` slot in `template` from `placeholders`.
    ///
    /// Entries the template does not mention are ignored. `.` and `..` are
    /// refused: URL parsers collapse them (even percent-encoded) into the
    /// surrounding path.
    pub fn substitute(
        template: &str,
        placeholders: &BTreeMap<String, String>,
    ) -> Result<String, RequestError> {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| RequestError::MalformedTemplate(template.to_string()))?;
            let key = &after[..close];
            let value = placeholders
                .get(key)
                .ok_or_else(|| RequestError::MissingPlaceholder(key.to_string()))?;
            if value == "." || value == ".." {
                return Err(RequestError::DotSegment {
                    key: key.to_string(),
                    value: value.clone(),
                });
            }
            out.extend(utf8_percent_encode(value, PATH_SEGMENT));
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        Ok(out)
    }

    /// Resolve + substitute in one step.
    pub fn create_path(
        &self,
        name: &str,
        placeholders: &BTreeMap<String, String>,
    ) -> Result<(Method, String), RequestError> {
        let route = self.resolve(name)?;
        let path = Self::substitute(route.template, placeholders)?;
        Ok((route.method, path))
    }
}

/* --------------------------------- Tests ---------------------------------- */
