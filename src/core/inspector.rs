/// Invocation of the external signature tool
///
/// The batch runner only needs "path in, report text out"; the [`Inspector`]
/// trait is that seam. [`SigcheckInspector`] is the real implementation and
/// shells out to Sysinternals sigcheck once per file.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use crate::error::{InspectError, ToolError};

/// Executable names searched for when no explicit tool path is configured
pub const TOOL_NAMES: [&str; 3] = ["sigcheck.exe", "sigcheck64.exe", "sigcheck"];

/// Flag that suppresses sigcheck's startup banner
pub const NO_BANNER_FLAG: &str = "-nobanner";

/// Produces the raw report text for one file
pub trait Inspector: Sync {
    fn inspect(&self, path: &Path) -> Result<String, InspectError>;
}

/// Runs `<executable> [extra_args...] -nobanner <path>` per file
#[derive(Debug, Clone)]
pub struct SigcheckInspector {
    executable: PathBuf,
    extra_args: Vec<OsString>,
}

impl SigcheckInspector {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            extra_args: Vec::new(),
        }
    }

    /// Extra arguments placed before the banner flag and the file path
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl Inspector for SigcheckInspector {
    fn inspect(&self, path: &Path) -> Result<String, InspectError> {
        fs::metadata(path).map_err(|source| InspectError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        debug!("Running {} on {}", self.executable.display(), path.display());

        let output = Command::new(&self.executable)
            .args(&self.extra_args)
            .arg(NO_BANNER_FLAG)
            .arg(path)
            .output()
            .map_err(|source| InspectError::Spawn {
                tool: self.executable.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            return Err(InspectError::ToolFailed {
                path: path.to_path_buf(),
                code: output.status.code(),
                stdout,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(stdout)
    }
}

/// Find the sigcheck executable.
///
/// An explicit path must point at an existing file. Without one, each `PATH`
/// entry is searched for [`TOOL_NAMES`], then the current directory.
pub fn locate_tool(explicit: Option<&Path>) -> Result<PathBuf, ToolError> {
    if let Some(path) = explicit {
        return if path.is_file() {
            info!("Using sigcheck at {}", path.display());
            Ok(path.to_path_buf())
        } else {
            Err(ToolError::NotFound(format!(
                "{} does not exist or is not a file",
                path.display()
            )))
        };
    }

    let mut search_dirs: Vec<PathBuf> = env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).collect())
        .unwrap_or_default();
    if let Ok(cwd) = env::current_dir() {
        search_dirs.push(cwd);
    }

    find_in_dirs(&search_dirs).ok_or_else(|| {
        ToolError::NotFound(format!(
            "none of {} found on PATH or in the current directory; pass --sigcheck",
            TOOL_NAMES.join(", ")
        ))
    })
}

fn find_in_dirs(dirs: &[PathBuf]) -> Option<PathBuf> {
    for dir in dirs {
        for name in TOOL_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                info!("Found sigcheck at {}", candidate.display());
                return Some(candidate);
            }
        }
    }
    None
}
