//! Marker-based section splitting.

use crate::section::{ComponentFile, Section, SectionKind};
use once_cell::sync::Lazy;
use regex::Regex;
use smol_str::SmolStr;
use wolf_diagnostics::{DiagnosticCode, Diagnostics, Region};
use wolf_source::Span;

static MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^#![ \t]*([A-Za-z_][A-Za-z0-9_-]*)(?:[ \t]+lang="([^"]*)")?[ \t]*\r?$"#)
        .unwrap_or_else(|err| panic!("invalid section marker pattern: {err}"))
});

struct Marker {
    name: SmolStr,
    lang: Option<SmolStr>,
    span: Span,
    /// Offset just past the marker line terminator.
    body_start: usize,
}

/// Split `source` into sections.
///
/// Problems with section headers are reported into `diags`; the returned
/// file holds every section that could be accepted.
pub fn cut_sections(source: &str, filename: &str, diags: &mut Diagnostics) -> ComponentFile {
    let markers: Vec<Marker> = MARKER
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            let body_start = match source[whole.end()..].find('\n') {
                Some(nl) => whole.end() + nl + 1,
                None => source.len(),
            };
            Some(Marker {
                name: name.as_str().into(),
                lang: caps.get(2).map(|m| m.as_str().into()),
                span: Span::from_range(whole.range()),
                body_start,
            })
        })
        .collect();

    let mut file = ComponentFile::default();

    let Some(first) = markers.first() else {
        diags.warning(
            DiagnosticCode::SectionNoMarkers,
            Region::file(filename),
            "file has no `#!` section markers; treating it as a template",
        );
        file.template = Some(Section {
            name: "template".into(),
            kind: SectionKind::Template,
            lang: None,
            content: source.to_string(),
            marker_span: Span::empty(0),
            content_span: Span::new(0, source.len() as u32),
        });
        return file;
    };

    let leading = &source[..first.span.start as usize];
    if !leading.trim().is_empty() {
        let start = leading.len() - leading.trim_start().len();
        let end = leading.trim_end().len();
        diags.warning(
            DiagnosticCode::SectionStrayContent,
            Span::from_range(start..end),
            "text before the first section marker is ignored",
        );
    }

    for (i, marker) in markers.iter().enumerate() {
        let end = markers
            .get(i + 1)
            .map(|next| next.span.start as usize)
            .unwrap_or(source.len());
        let start = marker.body_start.min(end);
        let section = Section {
            name: marker.name.clone(),
            kind: SectionKind::from_name(&marker.name),
            lang: marker.lang.clone(),
            content: source[start..end].to_string(),
            marker_span: marker.span,
            content_span: Span::from_range(start..end),
        };
        tracing::trace!(name = %section.name, start, end, "section");
        accept(&mut file, section, diags);
    }

    file
}

fn accept(file: &mut ComponentFile, section: Section, diags: &mut Diagnostics) {
    match section.kind {
        SectionKind::Template => {
            if !check_lang(&section, &["wolf"], diags) {
                return;
            }
            if file.template.is_some() {
                diags.error(
                    DiagnosticCode::SectionDuplicate,
                    section.marker_span,
                    "a component has at most one template section",
                );
                return;
            }
            file.template = Some(section);
        }
        SectionKind::Script => {
            if !check_lang(&section, &["ts", "typescript"], diags) {
                return;
            }
            if file.script.is_some() {
                diags.error(
                    DiagnosticCode::SectionDuplicate,
                    section.marker_span,
                    "a component has at most one script section",
                );
                return;
            }
            file.script = Some(section);
        }
        SectionKind::Style => file.styles.push(section),
        SectionKind::Custom => file.custom.push(section),
    }
}

fn check_lang(section: &Section, allowed: &[&str], diags: &mut Diagnostics) -> bool {
    match &section.lang {
        None => true,
        Some(lang) if allowed.contains(&lang.as_str()) => true,
        Some(lang) => {
            diags.push(
                wolf_diagnostics::Diagnostic::error(
                    DiagnosticCode::SectionUnsupportedLang,
                    section.marker_span,
                    format!("unsupported language `{}` for the {} section", lang, section.name),
                )
                .with_paragraph(format!("supported languages: {}", allowed.join(", "))),
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cut(source: &str) -> (ComponentFile, Diagnostics) {
        let mut diags = Diagnostics::new();
        let file = cut_sections(source, "test.iron", &mut diags);
        (file, diags)
    }

    #[test]
    fn test_no_markers_is_template() {
        let (file, diags) = cut("div: |hi\n");
        assert!(!diags.has_errors());
        assert!(diags.contains(DiagnosticCode::SectionNoMarkers));
        let template = file.template.unwrap();
        assert!(template.is_implicit());
        assert_eq!(template.content, "div: |hi\n");
        assert_eq!(template.base(), 0);
    }

    #[test]
    fn test_section_offsets() {
        let source = "#! template\ndiv\n#! script\nlet a = 1;\n";
        let (file, _) = cut(source);
        let template = file.template.unwrap();
        let script = file.script.unwrap();
        assert_eq!(template.marker_span, Span::new(0, 11));
        assert_eq!(template.base(), 12);
        assert_eq!(&source[script.content_span.to_range()], "let a = 1;\n");
    }

    #[test]
    fn test_marker_lang() {
        let (file, diags) = cut("#!script lang=\"typescript\"\nlet a;\n");
        assert!(diags.is_empty());
        assert_eq!(file.script.unwrap().lang.as_deref(), Some("typescript"));
    }

    #[test]
    fn test_unsupported_lang() {
        let (file, diags) = cut("#! template lang=\"pug\"\ndiv\n#! script lang=\"js\"\n");
        assert!(file.template.is_none());
        assert!(file.script.is_none());
        assert_eq!(diags.error_count(), 2);
        assert!(diags.contains(DiagnosticCode::SectionUnsupportedLang));
    }

    #[test]
    fn test_duplicate_template() {
        let (file, diags) = cut("#! template\ndiv\n#! template\nspan\n");
        assert!(diags.contains(DiagnosticCode::SectionDuplicate));
        assert_eq!(file.template.unwrap().content, "div\n");
    }

    #[test]
    fn test_stray_content_and_custom_sections() {
        let (file, diags) = cut("oops\n#! docs\nhello\n#! style\na{}\n#! style\nb{}\n");
        assert!(!diags.has_errors());
        assert!(diags.contains(DiagnosticCode::SectionStrayContent));
        assert_eq!(file.custom.len(), 1);
        assert_eq!(file.custom[0].name, "docs");
        assert_eq!(file.styles.len(), 2);
        assert_eq!(file.section_count(), 3);
    }

    #[test]
    fn test_marker_at_eof() {
        let (file, _) = cut("#! template");
        assert_eq!(file.template.unwrap().content, "");
    }
}
