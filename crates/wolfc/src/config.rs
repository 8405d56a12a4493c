//! Configuration loading and management.

use crate::cli::{Args, OutputFormat};
use crate::error::{CliError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use wolf_codegen::DEFAULT_RUNTIME_MODULE;

/// Name of the optional configuration file in the workspace root.
pub const CONFIG_FILE: &str = "wolfc.json";

/// Extension of component files.
pub const COMPONENT_EXTENSION: &str = "iron";

const DEFAULT_IGNORE: &[&str] = &["**/node_modules/**", "**/.git/**", "**/dist/**"];

/// Contents of `wolfc.json`. Every field is optional; command-line flags win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    pub out_dir: Option<PathBuf>,
    pub runtime_module: Option<String>,
    pub ignore: Vec<String>,
    pub fail_on_warning: bool,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Effective configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory relative paths are resolved against.
    pub workspace: PathBuf,
    /// Files and directories to compile.
    pub roots: Vec<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub runtime_module: String,
    pub ignore: GlobSet,
    pub output: OutputFormat,
    pub check: bool,
    pub fail_on_warning: bool,
}

impl Config {
    /// Merge command-line arguments over the workspace's `wolfc.json`.
    pub fn load(workspace: &Path, args: &Args) -> Result<Self> {
        let config_path = match &args.config {
            Some(path) => Some(workspace.join(path)),
            None => Some(workspace.join(CONFIG_FILE)).filter(|path| path.is_file()),
        };
        let file = match &config_path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                FileConfig::load(path)?
            }
            None => FileConfig::default(),
        };

        let mut ignore = GlobSetBuilder::new();
        for pattern in DEFAULT_IGNORE
            .iter()
            .copied()
            .chain(file.ignore.iter().map(String::as_str))
            .chain(args.ignore.iter().map(String::as_str))
        {
            ignore.add(Glob::new(pattern)?);
        }

        let roots = if args.paths.is_empty() {
            vec![workspace.to_path_buf()]
        } else {
            args.paths.iter().map(|path| workspace.join(path)).collect()
        };

        Ok(Self {
            workspace: workspace.to_path_buf(),
            roots,
            out_dir: args
                .out_dir
                .as_ref()
                .or(file.out_dir.as_ref())
                .map(|dir| workspace.join(dir)),
            runtime_module: args
                .runtime_module
                .clone()
                .or(file.runtime_module)
                .unwrap_or_else(|| DEFAULT_RUNTIME_MODULE.to_string()),
            ignore: ignore.build()?,
            output: args.output,
            check: args.check,
            fail_on_warning: args.fail_on_warning || file.fail_on_warning,
        })
    }

    /// Whether `path` is a component file that is not ignored.
    pub fn should_process(&self, path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == COMPONENT_EXTENSION)
            && !self.ignore.is_match(path)
    }

    /// Where the generated file for `source` with `extension` goes.
    pub fn output_path(&self, source: &Path, extension: &str) -> PathBuf {
        let target = source.with_extension(extension);
        let Some(out_dir) = &self.out_dir else {
            return target;
        };
        let relative = target
            .strip_prefix(&self.workspace)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| target.file_name().map(PathBuf::from).unwrap_or_default());
        out_dir.join(relative)
    }
}
