//! Target parsing (API URL or named alias).
//!
//! parse_target -> TargetSpec { url, team, alias }
//! Resolution order for the raw value: CLI flag > PIPECTL_TARGET env.
//! Aliases come from a YAML targets file:
//!
//! ```yaml
//! targets:
//!   ci:
//!     api: https://ci.example.com
//!     team: main
//! ```
//!
//! File location: `$PIPECTL_TARGETS`, else `$HOME/.pipectl.yml`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_TEAM: &str = "main";

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("target string is empty")]
    Empty,

    #[error("unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error("unknown target '{0}' (not a URL and not in {1})")]
    UnknownAlias(String, String),

    #[error("failed to read targets file {path}: {message}")]
    TargetsFile { path: String, message: String },
}

/// A resolved API endpoint plus the team commands act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    pub url: Url,
    pub team: String,
    /// Alias name when the target came from the targets file.
    pub alias: Option<String>,
}

impl fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(a) => write!(f, "{a} ({}, team {})", self.url, self.team),
            None => write!(f, "{} (team {})", self.url, self.team),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TargetsFile {
    #[serde(default)]
    pub targets: BTreeMap<String, TargetEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TargetEntry {
    pub api: String,
    #[serde(default)]
    pub team: Option<String>,
}

impl TargetsFile {
    /// Missing file is not an error: it just has no aliases.
    pub fn load(path: &Path) -> Result<Self, TargetError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let to_err = |message: String| TargetError::TargetsFile {
            path: path.display().to_string(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|e| to_err(e.to_string()))?;
        serde_yaml::from_str(&text).map_err(|e| to_err(e.to_string()))
    }
}

/// `$PIPECTL_TARGETS`, else `$HOME/.pipectl.yml`.
pub fn default_targets_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("PIPECTL_TARGETS")
        && !p.trim().is_empty()
    {
        return Some(PathBuf::from(p));
    }
    std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".pipectl.yml"))
}

fn parse_api_url(raw: &str) -> Result<Option<Url>, TargetError> {
    match Url::parse(raw) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(Some(url)),
            other => Err(TargetError::UnsupportedScheme(other.to_string())),
        },
        Err(_) => Ok(None),
    }
}

/// Turn a `--target` value into a `TargetSpec`.
///
/// `team` (from `--team` / `PIPECTL_TEAM`) wins over the alias's team,
/// which wins over `DEFAULT_TEAM`.
pub fn parse_target(
    raw: &str,
    team: Option<&str>,
    targets: &TargetsFile,
    targets_path: &str,
) -> Result<TargetSpec, TargetError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TargetError::Empty);
    }

    if let Some(url) = parse_api_url(trimmed)? {
        return Ok(TargetSpec {
            url,
            team: team.unwrap_or(DEFAULT_TEAM).to_string(),
            alias: None,
        });
    }

    let entry = targets.targets.get(trimmed).ok_or_else(|| {
        TargetError::UnknownAlias(trimmed.to_string(), targets_path.to_string())
    })?;
    let url = parse_api_url(entry.api.trim())?.ok_or_else(|| {
        TargetError::UnknownAlias(entry.api.clone(), targets_path.to_string())
    })?;
    Ok(TargetSpec {
        url,
        team: team
            .or(entry.team.as_deref())
            .unwrap_or(DEFAULT_TEAM)
            .to_string(),
        alias: Some(trimmed.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(yaml: &str) -> TargetsFile {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn parse_url_target() {
        let spec = parse_target("https://ci.example.com", None, &TargetsFile::default(), "-").unwrap();
        assert_eq!(spec.url.host_str(), Some("ci.example.com"));
        assert_eq!(spec.team, "main");
        assert!(spec.alias.is_none());
    }

    #[test]
    fn explicit_team_wins() {
        let f = file("targets:\n  ci:\n    api: http://localhost:8080\n    team: ops\n");
        let spec = parse_target("ci", Some("dev"), &f, "t.yml").unwrap();
        assert_eq!(spec.team, "dev");
        let spec = parse_target("ci", None, &f, "t.yml").unwrap();
        assert_eq!(spec.team, "ops");
        assert_eq!(spec.alias.as_deref(), Some("ci"));
    }

    #[test]
    fn unknown_alias_rejected() {
        let err = parse_target("nope", None, &TargetsFile::default(), "t.yml").unwrap_err();
        assert!(err.to_string().contains("nope"));
        assert!(err.to_string().contains("t.yml"));
    }

    #[test]
    fn non_http_scheme_rejected() {
        let err = parse_target("ftp://example.com", None, &TargetsFile::default(), "-").unwrap_err();
        assert!(matches!(err, TargetError::UnsupportedScheme(_)));
    }

    #[test]
    fn empty_target_rejected() {
        let err = parse_target("   ", None, &TargetsFile::default(), "-").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn missing_targets_file_is_empty() {
        let f = TargetsFile::load(Path::new("/definitely/not/here.yml")).unwrap();
        assert!(f.targets.is_empty());
    }
}
