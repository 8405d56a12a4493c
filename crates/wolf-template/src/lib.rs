//! Template language for wolf components.
//!
//! Parsing happens in two passes. The grammar reads the indentation-based
//! source into raw fragments and fails on the first syntax error. The
//! builder then validates those fragments against the component contract
//! and produces the [`ast::Entity`] tree, recording every rule violation.
//!
//! ```
//! use wolf_diagnostics::Diagnostics;
//! use wolf_template::{ast::Entity, parse_template};
//!
//! let mut diags = Diagnostics::new();
//! let entities = parse_template("p.note Hello {{ name }}", 0, None, &mut diags)
//!     .unwrap()
//!     .unwrap();
//! assert!(matches!(entities[0], Entity::Tag(_)));
//! ```

pub mod ast;
pub mod builder;
pub mod error;
mod grammar;
mod lexer;
pub mod raw;

pub use builder::build_template;
pub use error::{SyntaxError, SyntaxResult};
pub use grammar::parse_raw;

use wolf_diagnostics::Diagnostics;
use wolf_script::SlotTable;
use wolf_source::Span;

/// Parse and validate a template section.
///
/// `base` is the offset of `source` in the component file. A syntax error
/// aborts; semantic errors are recorded in `diags` and yield `Ok(None)`.
pub fn parse_template(
    source: &str,
    base: u32,
    slots: Option<&SlotTable>,
    diags: &mut Diagnostics,
) -> SyntaxResult<Option<Vec<ast::Entity>>> {
    let items = parse_raw(source, base)?;
    let region = Span::new(base, base + source.len() as u32);
    Ok(build_template(items, slots, region, diags))
}
