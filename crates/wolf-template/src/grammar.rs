//! Predictive grammar for template sections.
//!
//! Each line production is chosen by its first character:
//!
//! | first char | production |
//! |------------|------------|
//! | `a`..`z`   | tag        |
//! | `A`..`Z`   | component  |
//! | `@`        | directive  |
//! | `\|`       | text       |
//!
//! Once a production is chosen the grammar never backtracks.

use crate::ast::{ClassMeta, Code, TextItem};
use crate::error::{SyntaxError, SyntaxResult};
use crate::lexer::{Layout, Lexer};
use crate::raw::*;
use smol_str::SmolStr;

/// Directives whose header line cannot own a block.
const BLOCKLESS_DIRECTIVES: &[&str] = &["match", "switch", "include"];

/// Parse a template section into raw fragments.
///
/// `base` is the offset of the section within the component file; every span
/// in the result is a file span.
pub fn parse_raw(source: &str, base: u32) -> SyntaxResult<Vec<RawItem>> {
    let mut grammar = Grammar {
        lexer: Lexer::new(source, base),
    };
    grammar.template()
}

struct Grammar<'a> {
    lexer: Lexer<'a>,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_js_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

impl<'a> Grammar<'a> {
    fn template(&mut self) -> SyntaxResult<Vec<RawItem>> {
        if !self.lexer.start() {
            return Ok(Vec::new());
        }
        let items = self.lines()?;
        match self.lexer.next_layout()? {
            Layout::Eof => Ok(items),
            _ => Err(self.lexer.unexpected("end of template")),
        }
    }

    /// One production per line at the current level.
    fn lines(&mut self) -> SyntaxResult<Vec<RawItem>> {
        let mut items = Vec::new();
        loop {
            items.push(self.line()?);
            match self.lexer.peek_layout()? {
                Layout::Continue => {
                    self.lexer.next_layout()?;
                }
                Layout::Indent => return Err(self.unexpected_indent()),
                Layout::Deindent | Layout::Eof => return Ok(items),
            }
        }
    }

    /// An indented block, if one follows.
    fn block(&mut self) -> SyntaxResult<Vec<RawItem>> {
        if self.lexer.peek_layout()? != Layout::Indent {
            return Ok(Vec::new());
        }
        self.lexer.next_layout()?;
        let items = self.lines()?;
        match self.lexer.next_layout()? {
            Layout::Deindent => Ok(items),
            _ => Err(self.lexer.unexpected("end of block")),
        }
    }

    fn no_block(&mut self) -> SyntaxResult<()> {
        if self.lexer.peek_layout()? == Layout::Indent {
            return Err(self.unexpected_indent());
        }
        Ok(())
    }

    fn unexpected_indent(&self) -> SyntaxError {
        let pos = self.lexer.pos();
        SyntaxError::UnexpectedIndent {
            span: self.lexer.span(pos, pos),
        }
    }

    fn line(&mut self) -> SyntaxResult<RawItem> {
        let start = self.lexer.pos();
        match self.lexer.peek() {
            Some('a'..='z') => self.element(start, false),
            Some('A'..='Z') => self.element(start, true),
            Some('@') => self.directive(start),
            Some('|') => self.text_line(start),
            _ => Err(self
                .lexer
                .unexpected("a tag, component, `@` directive or `|` text line")),
        }
    }

    fn element(&mut self, start: usize, component: bool) -> SyntaxResult<RawItem> {
        let name: SmolStr = if component {
            self.lexer
                .read_while(|c| c.is_ascii_alphanumeric() || c == '_')
                .into()
        } else {
            self.lexer.read_while(is_ident_char).into()
        };
        let metas = self.metas()?;
        let attributes = if self.lexer.peek() == Some('(') {
            self.attributes()?
        } else {
            Vec::new()
        };
        let span = self.lexer.span_from(start);

        let mut children = Vec::new();
        self.tail(&mut children, true)?;

        let element = RawElement {
            name,
            metas,
            attributes,
            children,
        };
        let kind = if component {
            RawKind::Component(element)
        } else {
            RawKind::Tag(element)
        };
        Ok(RawItem { kind, span })
    }

    /// Everything after a header: an inline child after `:`, inline text,
    /// then an optional block.
    fn tail(&mut self, children: &mut Vec<RawItem>, allow_text: bool) -> SyntaxResult<()> {
        if self.lexer.consume(":") {
            self.lexer.skip_inline_ws();
            if self.lexer.at_line_end() {
                return Err(self.lexer.unexpected("an inline child after `:`"));
            }
            // The inline child owns any block that follows.
            children.push(self.line()?);
            return Ok(());
        }

        let spaced = self.lexer.skip_inline_ws() > 0;
        if !self.lexer.at_line_end() {
            if !(allow_text && spaced) {
                return Err(self.lexer.unexpected("`:`, inline text or end of line"));
            }
            let start = self.lexer.pos();
            let items = self.text_run()?;
            children.push(RawItem {
                kind: RawKind::Text(items),
                span: self.lexer.span_from(start),
            });
        }
        children.extend(self.block()?);
        Ok(())
    }

    fn metas(&mut self) -> SyntaxResult<Vec<RawMeta>> {
        let mut metas = Vec::new();
        loop {
            let start = self.lexer.pos();
            match self.lexer.peek() {
                Some('#') => {
                    self.lexer.advance();
                    let name = self.ident("an id after `#`")?;
                    metas.push(RawMeta::Id(name, self.lexer.span_from(start)));
                }
                Some('.') => {
                    self.lexer.advance();
                    let class = if self.lexer.consume(":") {
                        if self.lexer.peek() != Some('{') {
                            return Err(self.lexer.unexpected("`{` after `.:`"));
                        }
                        ClassMeta::Reactive(self.code_segment()?)
                    } else if self.lexer.peek() == Some('{') {
                        ClassMeta::Dynamic(self.code_segment()?)
                    } else {
                        let name = self.lexer.read_while(is_ident_char);
                        if name.is_empty() {
                            return Err(self.lexer.unexpected("a class name"));
                        }
                        ClassMeta::Static(name.into())
                    };
                    metas.push(RawMeta::Class(class, self.lexer.span_from(start)));
                }
                _ => return Ok(metas),
            }
        }
    }

    fn ident(&mut self, expected: &'static str) -> SyntaxResult<SmolStr> {
        match self.lexer.peek() {
            Some(c) if is_ident_start(c) => Ok(self.lexer.read_while(is_ident_char).into()),
            _ => Err(self.lexer.unexpected(expected)),
        }
    }

    /// `{ balanced }`
    fn code_segment(&mut self) -> SyntaxResult<Code> {
        self.delimited('{', "}", "code block")
    }

    /// `( balanced )`
    fn paren_code(&mut self) -> SyntaxResult<Code> {
        self.delimited('(', ")", "parenthesized code")
    }

    fn delimited(&mut self, open: char, close: &str, what: &'static str) -> SyntaxResult<Code> {
        let start = self.lexer.pos();
        if self.lexer.advance() != Some(open) {
            self.lexer.set_pos(start);
            return Err(self.lexer.unexpected(what));
        }
        let inner = self.lexer.pos();
        let end = self.lexer.scan_balanced(inner, close, what, start)?;
        let code = Code::new(self.lexer.slice(inner, end), self.lexer.span(inner, end));
        self.lexer.set_pos(end + close.len());
        Ok(code)
    }

    fn attributes(&mut self) -> SyntaxResult<Vec<RawAttribute>> {
        let open = self.lexer.pos();
        self.lexer.advance();
        let mut attributes = Vec::new();
        loop {
            self.lexer.read_while(|c| c.is_whitespace() || c == ',');
            match self.lexer.peek() {
                None => {
                    return Err(SyntaxError::Unterminated {
                        what: "attribute list",
                        span: self.lexer.span(open, open + 1),
                    })
                }
                Some(')') => {
                    self.lexer.advance();
                    return Ok(attributes);
                }
                Some(_) => attributes.push(self.attribute()?),
            }
        }
    }

    fn attribute(&mut self) -> SyntaxResult<RawAttribute> {
        let start = self.lexer.pos();
        let sigil = match self.lexer.peek() {
            Some('@') => Sigil::Event,
            Some('!') => Sigil::Sync,
            Some(':') => Sigil::Reactive,
            Some('(') => {
                self.lexer.advance();
                let kind = self.ident("a receiver kind")?;
                if !self.lexer.consume(")") {
                    return Err(self.lexer.unexpected("`)`"));
                }
                Sigil::Receiver(kind)
            }
            _ => Sigil::None,
        };
        if matches!(sigil, Sigil::Event | Sigil::Sync | Sigil::Reactive) {
            self.lexer.advance();
        }

        let mut name = SmolStr::default();
        let mut modifiers = Vec::new();
        if !matches!(sigil, Sigil::Receiver(_)) {
            name = self.ident("an attribute name")?;
            while self.lexer.consume("|") {
                let modifier_start = self.lexer.pos();
                let modifier = self.ident("a modifier after `|`")?;
                modifiers.push((modifier, self.lexer.span_from(modifier_start)));
            }
        }

        let value = if self.lexer.consume("=") {
            Some(self.attribute_value()?)
        } else {
            None
        };

        Ok(RawAttribute {
            sigil,
            name,
            modifiers,
            value,
            span: self.lexer.span_from(start),
        })
    }

    fn attribute_value(&mut self) -> SyntaxResult<RawValue> {
        match self.lexer.peek() {
            Some('"') => self.string_literal(),
            Some('{') => Ok(RawValue::Code(self.code_segment()?)),
            Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                let start = self.lexer.pos();
                let text = self.lexer.read_while(is_js_ident_char);
                Ok(RawValue::Code(Code::new(text, self.lexer.span_from(start))))
            }
            _ => Err(self
                .lexer
                .unexpected("a string, `{code}` or identifier value")),
        }
    }

    fn string_literal(&mut self) -> SyntaxResult<RawValue> {
        let start = self.lexer.pos();
        self.lexer.advance();
        let mut value = String::new();
        loop {
            match self.lexer.advance() {
                None | Some('\n') => {
                    return Err(SyntaxError::Unterminated {
                        what: "string",
                        span: self.lexer.span(start, start + 1),
                    })
                }
                Some('\\') => match self.lexer.advance() {
                    Some(c @ ('"' | '\\')) => value.push(c),
                    Some(c) => {
                        value.push('\\');
                        value.push(c);
                    }
                    None => {
                        return Err(SyntaxError::Unterminated {
                            what: "string",
                            span: self.lexer.span(start, start + 1),
                        })
                    }
                },
                Some('"') => break,
                Some(c) => value.push(c),
            }
        }
        Ok(RawValue::Str(value, self.lexer.span_from(start)))
    }

    fn directive(&mut self, start: usize) -> SyntaxResult<RawItem> {
        self.lexer.advance();
        let name_start = self.lexer.pos();
        let name = self.ident("a directive name after `@`")?;
        let name_span = self.lexer.span_from(name_start);
        let argument = if self.lexer.peek() == Some('(') {
            Some(self.paren_code()?)
        } else {
            None
        };
        let span = self.lexer.span_from(start);

        let mut children = Vec::new();
        if BLOCKLESS_DIRECTIVES.contains(&name.as_str()) {
            self.lexer.skip_inline_ws();
            if !self.lexer.at_line_end() {
                return Err(self.lexer.unexpected("end of line"));
            }
            self.no_block()?;
        } else {
            self.tail(&mut children, false)?;
        }

        Ok(RawItem {
            kind: RawKind::Directive(RawDirective {
                name,
                name_span,
                argument,
                children,
            }),
            span,
        })
    }

    fn text_line(&mut self, start: usize) -> SyntaxResult<RawItem> {
        self.lexer.advance();
        self.lexer.consume(" ");
        let items = self.text_run()?;
        let span = self.lexer.span_from(start);
        self.no_block()?;
        Ok(RawItem {
            kind: RawKind::Text(items),
            span,
        })
    }

    /// Text up to the end of the line, split into static runs and
    /// `{{ }}` / `{{: }}` interpolations.
    fn text_run(&mut self) -> SyntaxResult<Vec<TextItem>> {
        let mut items = Vec::new();
        let mut buffer = String::new();

        while !self.lexer.at_line_end() {
            if self.lexer.consume("\\{{") {
                buffer.push_str("{{");
            } else if self.lexer.consume("\\}}") {
                buffer.push_str("}}");
            } else if self.lexer.consume("\\\\") {
                buffer.push('\\');
            } else if self.lexer.starts_with("{{") {
                if !buffer.is_empty() {
                    items.push(TextItem::Static(std::mem::take(&mut buffer)));
                }
                items.push(self.interpolation()?);
            } else if let Some(c) = self.lexer.advance() {
                buffer.push(c);
            }
        }

        let trimmed = buffer.trim_end();
        if !trimmed.is_empty() {
            items.push(TextItem::Static(trimmed.to_string()));
        }
        Ok(items)
    }

    fn interpolation(&mut self) -> SyntaxResult<TextItem> {
        let open = self.lexer.pos();
        self.lexer.consume("{{");
        let reactive = self.lexer.consume(":");
        let inner = self.lexer.pos();
        let unterminated = SyntaxError::UnterminatedInterpolation {
            span: self.lexer.span(open, open + 2),
        };

        let end = match self.lexer.scan_balanced(inner, "}}", "interpolation", open) {
            Ok(end) => end,
            Err(SyntaxError::Unterminated { .. }) => return Err(unterminated),
            Err(err) => return Err(err),
        };
        let text = self.lexer.slice(inner, end);
        if text.contains('\n') {
            return Err(unterminated);
        }
        if text.trim().is_empty() {
            self.lexer.set_pos(end);
            return Err(self.lexer.unexpected("an expression inside `{{ }}`"));
        }

        let code = Code::new(text, self.lexer.span(inner, end));
        self.lexer.set_pos(end + 2);
        Ok(if reactive {
            TextItem::Reactive(code)
        } else {
            TextItem::Dynamic(code)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wolf_source::Span;

    fn parse(source: &str) -> Vec<RawItem> {
        parse_raw(source, 0).unwrap()
    }

    fn element(item: &RawItem) -> &RawElement {
        match &item.kind {
            RawKind::Tag(element) | RawKind::Component(element) => element,
            other => panic!("expected an element, got {other:?}"),
        }
    }

    #[test]
    fn test_inline_child() {
        let items = parse("div: span hello");
        assert_eq!(items.len(), 1);
        let div = element(&items[0]);
        assert_eq!(div.name, "div");
        let span = element(&div.children[0]);
        assert_eq!(span.name, "span");
        assert_eq!(
            span.children[0].kind,
            RawKind::Text(vec![TextItem::Static("hello".into())])
        );
    }

    #[test]
    fn test_blocks() {
        let items = parse("ul\n    li one\n    li: |two\nFooter\n");
        assert_eq!(items.len(), 2);
        assert_eq!(element(&items[0]).children.len(), 2);
        assert!(matches!(items[1].kind, RawKind::Component(_)));
    }

    #[test]
    fn test_metas_and_attributes() {
        let items = parse(
            "a#home.link.{extra}.:{active()}(href=\"/\", @click|prevent=go\n   :title={ t() } (node)={ keep })",
        );
        let a = element(&items[0]);
        assert_eq!(a.metas.len(), 4);
        assert_eq!(a.metas[0], RawMeta::Id("home".into(), Span::new(1, 6)));
        assert!(matches!(&a.metas[3], RawMeta::Class(ClassMeta::Reactive(code), _) if code.text == "active()"));

        assert_eq!(a.attributes.len(), 4);
        assert_eq!(a.attributes[0].name, "href");
        assert!(matches!(&a.attributes[0].value, Some(RawValue::Str(v, _)) if v == "/"));
        assert_eq!(a.attributes[1].sigil, Sigil::Event);
        assert_eq!(a.attributes[1].modifiers[0].0, "prevent");
        assert!(matches!(&a.attributes[1].value, Some(RawValue::Code(c)) if c.is_bare && c.text == "go"));
        assert_eq!(a.attributes[2].sigil, Sigil::Reactive);
        assert_eq!(a.attributes[3].sigil, Sigil::Receiver("node".into()));
    }

    #[test]
    fn test_text_interpolation() {
        let items = parse("| Hi {{ name }}, {{: count() }} \\{{ literal \\}} ");
        let RawKind::Text(text) = &items[0].kind else {
            panic!("expected text");
        };
        assert_eq!(text.len(), 5);
        assert_eq!(text[0], TextItem::Static("Hi ".into()));
        assert!(matches!(&text[1], TextItem::Dynamic(c) if c.text == "name"));
        assert_eq!(text[2], TextItem::Static(", ".into()));
        assert!(matches!(&text[3], TextItem::Reactive(c) if c.text == "count()"));
        assert_eq!(text[4], TextItem::Static(" {{ literal }}".into()));
    }

    #[test]
    fn test_directives() {
        let items = parse("@if(:open())\n    p yes\n@else: p no\n@match(kind)\n@when(\"a\", \"b\")\n    | ab\n");
        assert_eq!(items.len(), 4);
        let RawKind::Directive(d) = &items[0].kind else {
            panic!("expected directive");
        };
        assert_eq!(d.name, "if");
        assert_eq!(d.argument.as_ref().unwrap().text, ":open()");
        assert_eq!(d.children.len(), 1);
        let RawKind::Directive(d) = &items[1].kind else {
            panic!("expected directive");
        };
        assert_eq!(d.name, "else");
        assert_eq!(d.children.len(), 1);
    }

    #[test]
    fn test_spans_are_shifted() {
        let items = parse_raw("p hi", 100).unwrap();
        assert_eq!(items[0].span, Span::new(100, 101));
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let items = parse("// header\n\ndiv\n    // inner\n    span\n");
        assert_eq!(items.len(), 1);
        assert_eq!(element(&items[0]).children.len(), 1);
    }

    #[test]
    fn test_empty_template() {
        assert!(parse("\n   \n// only a comment\n").is_empty());
    }

    #[test]
    fn test_syntax_failures() {
        let fail = |src: &str| parse_raw(src, 0).unwrap_err();

        assert!(matches!(fail("div\n    | a\n        | b"), SyntaxError::UnexpectedIndent { .. }));
        assert!(matches!(fail("@match(x)\n    p"), SyntaxError::UnexpectedIndent { .. }));
        assert!(matches!(fail("div\n        a\n    b"), SyntaxError::InconsistentDedent { .. }));
        assert!(matches!(fail("| {{ open"), SyntaxError::UnterminatedInterpolation { .. }));
        assert!(matches!(fail("div(a={ (b }"), SyntaxError::MismatchedBracket { .. }));
        assert!(matches!(fail("div(a=\"b"), SyntaxError::Unterminated { .. }));
        assert!(matches!(fail("div(a"), SyntaxError::Unterminated { .. }));
        assert!(matches!(fail("%oops"), SyntaxError::Unexpected { .. }));
        assert!(matches!(fail("div=3"), SyntaxError::Unexpected { .. }));
    }
}
