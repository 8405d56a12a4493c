//! Section cutter for wolf component files.
//!
//! A component file is a sequence of sections introduced by marker lines:
//!
//! ```text
//! #! script lang="ts"
//! export type Component = { props: { name: string } };
//!
//! #! template
//! p: |Hello {{ $props.name }}
//! ```
//!
//! The cutter only splits and validates section headers. Section bodies are
//! handed untouched to the stage that understands them.

mod cutter;
mod processor;
mod section;

pub use cutter::cut_sections;
pub use processor::{ProcessedSection, SectionProcessor};
pub use section::{ComponentFile, Section, SectionKind};

#[cfg(test)]
mod tests {
    use super::*;
    use wolf_diagnostics::Diagnostics;

    #[test]
    fn test_cut_component_file() {
        let source = "#! script lang=\"ts\"\nexport type Component = {};\n#! template\ndiv\n#! style\ndiv { color: red; }\n";
        let mut diags = Diagnostics::new();
        let file = cut_sections(source, "card.iron", &mut diags);

        assert!(diags.is_empty());
        assert_eq!(file.script.as_ref().map(|s| s.content.as_str()), Some("export type Component = {};\n"));
        assert_eq!(file.template.as_ref().map(|s| s.content.as_str()), Some("div\n"));
        assert_eq!(file.styles.len(), 1);
    }
}
