//! Orchestrator for compiling component files.

use crate::cli::Args;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::OutputFormatter;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use wolf_codegen::{compile, CompileError, CompileOptions, CompileOutput};
use wolf_diagnostics::{Diagnostic, Severity};
use wolf_template::SyntaxError;

/// Result of a compile run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Number of component files found.
    pub file_count: usize,
    /// Number of files written.
    pub written_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
    pub duration_ms: u64,
}

impl RunResult {
    /// Whether the run should exit unsuccessfully.
    pub fn failed(&self, fail_on_warning: bool) -> bool {
        self.error_count > 0 || (fail_on_warning && self.warning_count > 0)
    }
}

/// What compiling one file produced.
#[derive(Debug)]
struct FileOutcome {
    source: String,
    diagnostics: Vec<Diagnostic>,
    syntax_error: Option<SyntaxError>,
    written: Vec<PathBuf>,
}

/// Orchestrator for running wolfc.
pub struct Orchestrator {
    config: Config,
    formatter: OutputFormatter,
}

impl Orchestrator {
    pub fn new(workspace: &Path, args: &Args) -> Result<Self> {
        let config = Config::load(workspace, args)?;
        let formatter = OutputFormatter::new(config.output);
        Ok(Self { config, formatter })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compile every component file once.
    pub fn run_once(&self) -> Result<RunResult> {
        let start = Instant::now();
        let files = self.find_files()?;
        tracing::debug!(count = files.len(), "found component files");

        let outcomes: Vec<(&PathBuf, Result<FileOutcome>)> = files
            .par_iter()
            .map(|file| (file, self.compile_file(file)))
            .collect();

        let mut result = RunResult {
            file_count: files.len(),
            ..RunResult::default()
        };
        for (file, outcome) in outcomes {
            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(error) => {
                    self.formatter.print_failure(file, &error);
                    result.error_count += 1;
                    continue;
                }
            };
            for diagnostic in &outcome.diagnostics {
                self.formatter
                    .print_diagnostic(file, &outcome.source, diagnostic);
                match diagnostic.severity {
                    Severity::Error => result.error_count += 1,
                    Severity::Warning => result.warning_count += 1,
                }
            }
            if let Some(error) = &outcome.syntax_error {
                self.formatter
                    .print_syntax_error(file, &outcome.source, error);
                result.error_count += 1;
            }
            result.written_count += outcome.written.len();
        }
        result.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            files = result.file_count,
            written = result.written_count,
            errors = result.error_count,
            warnings = result.warning_count,
            "compilation finished"
        );
        self.formatter.print_summary(&result);
        Ok(result)
    }

    /// Compile once, then again whenever a component file changes.
    pub fn run_watch(&self) -> Result<()> {
        use notify::{Config as NotifyConfig, RecommendedWatcher, RecursiveMode, Watcher};
        use std::sync::mpsc::channel;

        if let Err(error) = self.run_once() {
            tracing::error!(error = %error, "initial compilation failed");
        }

        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<notify::Event>| {
                if let Ok(event) = res {
                    let _ = tx.send(event);
                }
            },
            NotifyConfig::default(),
        )?;
        for root in &self.config.roots {
            watcher.watch(root, RecursiveMode::Recursive)?;
        }
        tracing::info!("watching for changes");

        while let Ok(event) = rx.recv() {
            if !event.paths.iter().any(|path| self.config.should_process(path)) {
                continue;
            }
            // Editors often emit several events per save.
            while rx.recv_timeout(Duration::from_millis(50)).is_ok() {}

            tracing::info!(path = %event.paths[0].display(), "change detected");
            if let Err(error) = self.run_once() {
                tracing::error!(error = %error, "compilation failed");
            }
        }
        Ok(())
    }

    /// Component files under the configured roots, sorted.
    fn find_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for root in &self.config.roots {
            if !root.exists() {
                return Err(CliError::MissingPath(root.clone()));
            }
            if root.is_file() {
                if self.config.should_process(root) {
                    files.push(root.clone());
                }
                continue;
            }

            let entries = walkdir::WalkDir::new(root)
                .follow_links(true)
                .into_iter()
                .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
                .filter_map(|entry| entry.ok());
            for entry in entries {
                if entry.file_type().is_file() && self.config.should_process(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        }
        files.sort();
        files.dedup();
        Ok(files)
    }

    fn compile_file(&self, path: &Path) -> Result<FileOutcome> {
        let source = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let options = CompileOptions::new(path.display().to_string())
            .with_runtime_module(self.config.runtime_module.as_str());

        let outcome = match compile(&source, &options) {
            Ok(output) => {
                let written = if self.config.check {
                    Vec::new()
                } else {
                    self.write_outputs(path, &output)?
                };
                tracing::debug!(file = %path.display(), written = written.len(), "compiled");
                FileOutcome {
                    source,
                    diagnostics: output.diagnostics,
                    syntax_error: None,
                    written,
                }
            }
            Err(CompileError::Syntax {
                error, diagnostics, ..
            }) => FileOutcome {
                source,
                diagnostics,
                syntax_error: Some(error),
                written: Vec::new(),
            },
            Err(CompileError::Invalid { diagnostics, .. }) => FileOutcome {
                source,
                diagnostics,
                syntax_error: None,
                written: Vec::new(),
            },
            Err(CompileError::Codegen(error)) => {
                return Err(CliError::Codegen {
                    path: path.to_path_buf(),
                    source: error,
                })
            }
        };
        Ok(outcome)
    }

    /// Write `<stem>.ts`, and `<stem>.css` when the component has styles.
    fn write_outputs(&self, path: &Path, output: &CompileOutput) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        let ts = self.config.output_path(path, "ts");
        write_file(&ts, &output.code)?;
        written.push(ts);

        if !output.styles.is_empty() {
            let css: Vec<&str> = output
                .styles
                .iter()
                .map(|style| style.content.as_str())
                .collect();
            let target = self.config.output_path(path, "css");
            write_file(&target, &css.join("\n"))?;
            written.push(target);
        }
        Ok(written)
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    let write = |source| CliError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write)?;
    }
    std::fs::write(path, contents).map_err(write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use pretty_assertions::assert_eq;

    const CARD: &str = "#! template\ndiv.card: p Hello\n#! style\n.card { padding: 1em; }\n";

    fn workspace(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            let path = dir.path().join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, contents).unwrap();
        }
        dir
    }

    fn quiet_args() -> Args {
        Args {
            output: OutputFormat::Json,
            ..Args::default()
        }
    }

    #[test]
    fn test_compiles_and_writes_outputs() {
        let dir = workspace(&[("src/card.iron", CARD), ("src/notes.txt", "ignored")]);
        let orchestrator = Orchestrator::new(dir.path(), &quiet_args()).unwrap();
        let result = orchestrator.run_once().unwrap();

        assert_eq!(result.file_count, 1);
        assert_eq!(result.written_count, 2);
        assert_eq!(result.error_count, 0);

        let ts = std::fs::read_to_string(dir.path().join("src/card.ts")).unwrap();
        assert!(ts.starts_with(
            "import { createElement, createElementClass } from \"project-f/runtime\";"
        ));
        let css = std::fs::read_to_string(dir.path().join("src/card.css")).unwrap();
        assert_eq!(css, ".card { padding: 1em; }\n");
    }

    #[test]
    fn test_check_mode_writes_nothing() {
        let dir = workspace(&[("card.iron", CARD)]);
        let args = Args {
            check: true,
            ..quiet_args()
        };
        let result = Orchestrator::new(dir.path(), &args)
            .unwrap()
            .run_once()
            .unwrap();

        assert_eq!(result.file_count, 1);
        assert_eq!(result.written_count, 0);
        assert!(!dir.path().join("card.ts").exists());
    }

    #[test]
    fn test_out_dir_mirrors_layout() {
        let dir = workspace(&[("ui/card.iron", CARD)]);
        let args = Args {
            out_dir: Some(PathBuf::from("gen")),
            ..quiet_args()
        };
        Orchestrator::new(dir.path(), &args)
            .unwrap()
            .run_once()
            .unwrap();

        assert!(dir.path().join("gen/ui/card.ts").is_file());
        assert!(!dir.path().join("ui/card.ts").exists());
    }

    #[test]
    fn test_errors_are_counted_and_block_output() {
        let dir = workspace(&[
            ("bad.iron", "#! template\n@frobnicate\n"),
            ("broken.iron", "#! template\ndiv(\n"),
            ("good.iron", CARD),
        ]);
        let result = Orchestrator::new(dir.path(), &quiet_args())
            .unwrap()
            .run_once()
            .unwrap();

        assert_eq!(result.file_count, 3);
        assert_eq!(result.error_count, 2);
        assert!(result.failed(false));
        assert!(!dir.path().join("bad.ts").exists());
        assert!(!dir.path().join("broken.ts").exists());
        assert!(dir.path().join("good.ts").exists());
    }

    #[test]
    fn test_warnings_fail_only_when_requested() {
        let dir = workspace(&[("plain.iron", "p no markers\n")]);
        let orchestrator = Orchestrator::new(dir.path(), &quiet_args()).unwrap();
        let result = orchestrator.run_once().unwrap();

        assert_eq!(result.error_count, 0);
        assert_eq!(result.warning_count, 1);
        assert!(!result.failed(false));
        assert!(result.failed(true));
    }

    #[test]
    fn test_hidden_and_ignored_directories_are_skipped() {
        let dir = workspace(&[
            ("a.iron", CARD),
            (".cache/b.iron", CARD),
            ("node_modules/lib/c.iron", CARD),
        ]);
        let result = Orchestrator::new(dir.path(), &quiet_args())
            .unwrap()
            .run_once()
            .unwrap();
        assert_eq!(result.file_count, 1);
    }

    #[test]
    fn test_missing_path() {
        let dir = workspace(&[]);
        let args = Args {
            paths: vec![PathBuf::from("nope")],
            ..quiet_args()
        };
        let err = Orchestrator::new(dir.path(), &args)
            .unwrap()
            .run_once()
            .unwrap_err();
        assert!(matches!(err, CliError::MissingPath(_)));
    }
}
