//! Output formatting for diagnostics.

use crate::cli::OutputFormat;
use crate::orchestrator::RunResult;
use miette::{LabeledSpan, MietteDiagnostic, NamedSource, Report};
use std::path::Path;
use wolf_diagnostics::{Diagnostic, Severity};
use wolf_source::{LineIndex, Span};
use wolf_template::SyntaxError;

/// Formatter for diagnostic output.
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a compiler diagnostic.
    pub fn print_diagnostic(&self, file: &Path, source: &str, diagnostic: &Diagnostic) {
        match self.format {
            OutputFormat::Human => {
                eprintln!("{:?}", report(file, source, to_miette(diagnostic)));
            }
            OutputFormat::Json => {
                println!("{}", diagnostic_json(file, source, diagnostic));
            }
        }
    }

    /// Print the syntax failure that stopped a template from parsing.
    pub fn print_syntax_error(&self, file: &Path, source: &str, error: &SyntaxError) {
        match self.format {
            OutputFormat::Human => {
                let diagnostic = MietteDiagnostic::new(error.to_string())
                    .with_code(error.title())
                    .with_severity(miette::Severity::Error)
                    .with_label(LabeledSpan::at(error.span().to_range(), "here"));
                eprintln!("{:?}", report(file, source, diagnostic));
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "type": "diagnostic",
                    "file": file.to_string_lossy(),
                    "severity": Severity::Error.as_str(),
                    "code": error.title(),
                    "message": error.to_string(),
                    "notes": [],
                    "span": span_json(source, Some(error.span())),
                });
                println!("{json}");
            }
        }
    }

    /// Print a failure unrelated to the component's contents.
    pub fn print_failure(&self, file: &Path, error: &dyn std::error::Error) {
        let mut message = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            message.push_str(&format!(": {cause}"));
            source = cause.source();
        }
        match self.format {
            OutputFormat::Human => eprintln!("\x1b[31merror\x1b[0m: {message}"),
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "type": "failure",
                    "file": file.to_string_lossy(),
                    "message": message,
                });
                println!("{json}");
            }
        }
    }

    pub fn print_summary(&self, result: &RunResult) {
        match self.format {
            OutputFormat::Human => print_summary_human(result),
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "type": "summary",
                    "files": result.file_count,
                    "written": result.written_count,
                    "errors": result.error_count,
                    "warnings": result.warning_count,
                    "duration_ms": result.duration_ms
                });
                println!("{json}");
            }
        }
    }
}

fn report(file: &Path, source: &str, diagnostic: MietteDiagnostic) -> Report {
    Report::new(diagnostic).with_source_code(NamedSource::new(
        file.display().to_string(),
        source.to_string(),
    ))
}

/// The first paragraph is the message; the rest become help text.
fn to_miette(diagnostic: &Diagnostic) -> MietteDiagnostic {
    let severity = match diagnostic.severity {
        Severity::Error => miette::Severity::Error,
        Severity::Warning => miette::Severity::Warning,
    };
    let mut out = MietteDiagnostic::new(diagnostic.message())
        .with_code(diagnostic.code.as_str())
        .with_severity(severity);
    if let Some(span) = diagnostic.region.span() {
        out = out.with_label(LabeledSpan::at(span.to_range(), "here"));
    }
    let notes = diagnostic.paragraphs.get(1..).unwrap_or_default();
    if !notes.is_empty() {
        out = out.with_help(notes.join("\n"));
    }
    out
}

fn diagnostic_json(file: &Path, source: &str, diagnostic: &Diagnostic) -> serde_json::Value {
    serde_json::json!({
        "type": "diagnostic",
        "file": file.to_string_lossy(),
        "severity": diagnostic.severity.as_str(),
        "code": diagnostic.code.as_str(),
        "message": diagnostic.message(),
        "notes": diagnostic.paragraphs.get(1..).unwrap_or_default(),
        "span": span_json(source, diagnostic.region.span()),
    })
}

/// Byte range plus 1-based line and column of the start.
fn span_json(source: &str, span: Option<Span>) -> serde_json::Value {
    let Some(span) = span else {
        return serde_json::Value::Null;
    };
    let position = LineIndex::new(source).line_col(span.start);
    serde_json::json!({
        "start": span.start,
        "end": span.end,
        "line": position.line + 1,
        "column": position.col + 1
    })
}

fn print_summary_human(result: &RunResult) {
    eprintln!();
    if result.error_count == 0 && result.warning_count == 0 {
        eprintln!(
            "\x1b[32m✓\x1b[0m Compiled {} file{} ({}ms)",
            result.file_count,
            if result.file_count == 1 { "" } else { "s" },
            result.duration_ms
        );
        return;
    }
    if result.error_count > 0 {
        eprintln!(
            "\x1b[31m✗\x1b[0m Found {} error{} in {} files",
            result.error_count,
            if result.error_count == 1 { "" } else { "s" },
            result.file_count
        );
    }
    if result.warning_count > 0 {
        eprintln!(
            "\x1b[33m⚠\x1b[0m Found {} warning{}",
            result.warning_count,
            if result.warning_count == 1 { "" } else { "s" }
        );
    }
    eprintln!("Time: {}ms", result.duration_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic as _;
    use pretty_assertions::assert_eq;
    use wolf_diagnostics::{DiagnosticCode, Region};

    fn sample() -> Diagnostic {
        Diagnostic::error(
            DiagnosticCode::DirectiveUnknown,
            Span::new(12, 23),
            "unknown directive `@frobnicate`",
        )
        .with_paragraph("known directives: if, match, switch, each")
    }

    #[test]
    fn test_diagnostic_json() {
        let source = "#! template\n@frobnicate\n";
        let json = diagnostic_json(Path::new("card.iron"), source, &sample());
        assert_eq!(
            json,
            serde_json::json!({
                "type": "diagnostic",
                "file": "card.iron",
                "severity": "error",
                "code": "DIRECTIVE_UNKNOWN",
                "message": "unknown directive `@frobnicate`",
                "notes": ["known directives: if, match, switch, each"],
                "span": { "start": 12, "end": 23, "line": 2, "column": 1 }
            })
        );
    }

    #[test]
    fn test_file_region_has_no_span() {
        let diagnostic = Diagnostic::warning(
            DiagnosticCode::TemplateEmpty,
            Region::file("card.iron"),
            "component has no template section",
        );
        let json = diagnostic_json(Path::new("card.iron"), "", &diagnostic);
        assert_eq!(json["span"], serde_json::Value::Null);
        assert_eq!(json["severity"], "warning");

        let miette = to_miette(&diagnostic);
        assert!(miette.labels().is_none());
        assert_eq!(miette.severity(), Some(miette::Severity::Warning));
    }

    #[test]
    fn test_to_miette() {
        let miette = to_miette(&sample());
        assert_eq!(miette.message, "unknown directive `@frobnicate`");
        assert_eq!(miette.code.as_deref(), Some("DIRECTIVE_UNKNOWN"));
        assert_eq!(
            miette.help.as_deref(),
            Some("known directives: if, match, switch, each")
        );
        let labels: Vec<LabeledSpan> = miette.labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 12);
        assert_eq!(labels[0].len(), 11);
    }
}
