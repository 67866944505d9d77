/*!
`path_arg.rs`

`PathArgument`: a flag value that must resolve to exactly one filesystem
entry, evaluated once while clap parses the command line.

Resolution:
  ""      -> empty (flag not provided); no filesystem access
  "-"     -> stdin is copied verbatim into a fresh temp file; resolves to it
  pattern -> glob-expanded, then counted:
               0 matches  -> "path '<value>' does not exist"
               1 match    -> that match
               N matches  -> "path '<value>' resolves to multiple entries: a, b"

The stdin temp file is removed when the last clone of the argument is
dropped (end of the command).
*/

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempPath;
use thiserror::Error;

const STDIN_PREFIX: &str = "pipectl-stdin-";

#[derive(Debug, Error)]
pub enum PathArgError {
    #[error("failed to create a temp file")]
    TempFile(#[source] io::Error),

    #[error("failed to write temp file: {0}")]
    Copy(#[source] io::Error),

    #[error("failed to expand path '{value}': {message}")]
    Pattern { value: String, message: String },

    #[error("path '{0}' does not exist")]
    NotFound(String),

    #[error("path '{value}' resolves to multiple entries: {}", .matches.join(", "))]
    Ambiguous { value: String, matches: Vec<String> },
}

#[derive(Debug, Clone, Default)]
pub struct PathArgument {
    path: Option<PathBuf>,
    // Keeps the stdin capture alive as long as any clone exists.
    capture: Option<Arc<TempPath>>,
}

impl PathArgument {
    /// clap `value_parser` entry point; `-` reads the real stdin.
    pub fn parse(raw: &str) -> Result<Self, PathArgError> {
        Self::resolve_with(raw, io::stdin().lock())
    }

    /// Same as `parse`, with the stdin source injected.
    pub fn resolve_with<R: Read>(raw: &str, mut stdin: R) -> Result<Self, PathArgError> {
        if raw.is_empty() {
            return Ok(Self::default());
        }

        if raw == "-" {
            let mut file = tempfile::Builder::new()
                .prefix(STDIN_PREFIX)
                .tempfile()
                .map_err(PathArgError::TempFile)?;
            io::copy(&mut stdin, file.as_file_mut()).map_err(PathArgError::Copy)?;
            let temp = file.into_temp_path();
            return Ok(Self {
                path: Some(temp.to_path_buf()),
                capture: Some(Arc::new(temp)),
            });
        }

        let matches = expand(raw)?;
        let only = single_match(raw, matches)?;
        Ok(Self {
            path: Some(only),
            capture: None,
        })
    }

    /// Shell-style completion candidates for a partial value.
    ///
    /// Best effort: any glob error yields no candidates.
    pub fn complete(partial: &str) -> Vec<String> {
        let pattern = format!("{partial}*");
        match glob::glob(&pattern) {
            Ok(paths) => paths
                .filter_map(Result::ok)
                .map(|p| p.display().to_string())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_none()
    }

    pub fn is_stdin_capture(&self) -> bool {
        self.capture.is_some()
    }

    /// Read the resolved file; `None` when the flag was empty.
    pub fn read_to_string(&self) -> io::Result<Option<String>> {
        self.path.as_deref().map(std::fs::read_to_string).transpose()
    }
}

/// Expand `pattern` against the filesystem, in glob order.
///
/// Unreadable entries are skipped rather than reported.
fn expand(pattern: &str) -> Result<Vec<PathBuf>, PathArgError> {
    let paths = glob::glob(pattern).map_err(|e| PathArgError::Pattern {
        value: pattern.to_string(),
        message: e.to_string(),
    })?;
    Ok(paths.filter_map(Result::ok).collect())
}

/// Require exactly one match.
fn single_match(raw: &str, mut matches: Vec<PathBuf>) -> Result<PathBuf, PathArgError> {
    match matches.len() {
        0 => Err(PathArgError::NotFound(raw.to_string())),
        1 => Ok(matches.remove(0)),
        _ => Err(PathArgError::Ambiguous {
            value: raw.to_string(),
            matches: matches.iter().map(|p| p.display().to_string()).collect(),
        }),
    }
}

/* --------------------------------- Tests ---------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    fn no_stdin() -> Cursor<Vec<u8>> {
        Cursor::new(Vec::new())
    }

    #[test]
    fn empty_is_noop() {
        let arg = PathArgument::resolve_with("", no_stdin()).unwrap();
        assert!(arg.is_empty());
        assert!(arg.path().is_none());
        assert!(arg.read_to_string().unwrap().is_none());
    }

    #[test]
    fn dash_captures_stdin_verbatim() {
        let input = b"jobs:\n- name: unit\n\x00\xff".to_vec();
        let arg = PathArgument::resolve_with("-", Cursor::new(input.clone())).unwrap();
        assert!(arg.is_stdin_capture());
        let path = arg.path().unwrap().to_path_buf();
        assert_eq!(fs::read(&path).unwrap(), input);
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(STDIN_PREFIX));
    }

    #[test]
    fn stdin_capture_removed_with_last_clone() {
        let arg = PathArgument::resolve_with("-", Cursor::new(b"x".to_vec())).unwrap();
        let path = arg.path().unwrap().to_path_buf();
        let copy = arg.clone();
        drop(arg);
        assert!(path.exists());
        drop(copy);
        assert!(!path.exists());
    }

    #[test]
    fn single_match_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pipeline.yml");
        fs::write(&file, "jobs: []").unwrap();
        let pattern = format!("{}/pipe*.yml", dir.path().display());
        let arg = PathArgument::resolve_with(&pattern, no_stdin()).unwrap();
        assert_eq!(arg.path(), Some(file.as_path()));
        assert!(!arg.is_stdin_capture());
    }

    #[test]
    fn literal_path_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ci.yml");
        fs::write(&file, "").unwrap();
        let arg = PathArgument::resolve_with(&file.display().to_string(), no_stdin()).unwrap();
        assert_eq!(arg.path(), Some(file.as_path()));
    }

    #[test]
    fn zero_matches_mentions_input() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.yml", dir.path().display());
        let err = PathArgument::resolve_with(&pattern, no_stdin()).unwrap_err();
        assert!(matches!(err, PathArgError::NotFound(_)));
        assert_eq!(err.to_string(), format!("path '{pattern}' does not exist"));
    }

    #[test]
    fn many_matches_listed_in_glob_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.yml"), "").unwrap();
        fs::write(dir.path().join("a.yml"), "").unwrap();
        let pattern = format!("{}/*.yml", dir.path().display());
        let err = PathArgument::resolve_with(&pattern, no_stdin()).unwrap_err();
        let a = dir.path().join("a.yml").display().to_string();
        let b = dir.path().join("b.yml").display().to_string();
        assert_eq!(
            err.to_string(),
            format!("path '{pattern}' resolves to multiple entries: {a}, {b}")
        );
    }

    #[test]
    fn ambiguous_message_format() {
        let err = single_match(
            "*.yml",
            vec![PathBuf::from("a.yml"), PathBuf::from("b.yml")],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "path '*.yml' resolves to multiple entries: a.yml, b.yml"
        );
    }

    #[test]
    fn bad_pattern_reported() {
        let err = PathArgument::resolve_with("[unclosed", no_stdin()).unwrap_err();
        assert!(matches!(err, PathArgError::Pattern { .. }));
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn completion_lists_prefix_matches() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("deploy.yml"), "").unwrap();
        fs::write(dir.path().join("deps.txt"), "").unwrap();
        fs::write(dir.path().join("other.yml"), "").unwrap();
        let partial = format!("{}/dep", dir.path().display());
        let got = PathArgument::complete(&partial);
        assert_eq!(got.len(), 2);
        assert!(got.iter().all(|c| c.starts_with(&partial)));
    }

    #[test]
    fn completion_swallows_errors() {
        assert!(PathArgument::complete("[").is_empty());
    }
}
