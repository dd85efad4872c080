//! Parser module for JavaScript/TypeScript source code.
//!
//! Integrates with SWC for parsing source files into an AST. Each file is
//! parsed against its own `SourceMap`, and the file's start position is
//! recorded so spans can be turned into source-relative byte offsets.

use std::ops::Range;
use std::sync::OnceLock;

use swc_common::sync::Lrc;
use swc_common::{FileName, SourceMap, Span, Spanned};
use swc_ecma_parser::{
    EsSyntax, StringInput, Syntax, TsSyntax, lexer::Lexer, parse_file_as_module,
};

use crate::engine::op::SourceRange;

pub use swc_ecma_ast::{EsVersion, Module};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
}

pub fn detect_language(filename: &str) -> Language {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();

    match ext.as_str() {
        "ts" | "mts" | "cts" => Language::TypeScript,
        "tsx" => Language::Tsx,
        "jsx" => Language::Jsx,
        _ => Language::JavaScript,
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub span_lo: u32,
    pub span_hi: u32,
    pub message: String,
}

#[derive(Debug)]
pub struct ParseResult {
    pub module: Option<Module>,
    pub errors: Vec<ParseError>,
    /// Absolute position of the file start within its `SourceMap`.
    pub start_pos: u32,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.module.is_some()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub filename: String,
    pub language: Language,
    pub line_count: usize,
    pub has_errors: bool,
}

pub struct ParsedFile {
    source: String,
    metadata: FileMetadata,
    ast_module: Option<Module>,
    errors: Vec<ParseError>,
    start_pos: u32,
    line_ranges: OnceLock<Vec<Range<usize>>>,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("metadata", &self.metadata)
            .field("has_module", &self.ast_module.is_some())
            .field("error_count", &self.errors.len())
            .finish()
    }
}

impl ParsedFile {
    pub fn from_source(filename: &str, source: &str) -> Self {
        let language = detect_language(filename);
        let parser = Parser::for_file(filename);
        let parse_result = parser.parse_module_recovering(source);

        let line_count = if source.is_empty() {
            0
        } else {
            source.lines().count()
        };

        let metadata = FileMetadata {
            filename: filename.to_string(),
            language,
            line_count,
            has_errors: parse_result.has_errors(),
        };

        Self {
            source: source.to_string(),
            metadata,
            ast_module: parse_result.module,
            errors: parse_result.errors,
            start_pos: parse_result.start_pos,
            line_ranges: OnceLock::new(),
        }
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn module(&self) -> Option<&Module> {
        self.ast_module.as_ref()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Convert an AST span into byte offsets relative to this file.
    pub fn span_range(&self, span: Span) -> SourceRange {
        SourceRange::new(
            span.lo.0.saturating_sub(self.start_pos),
            span.hi.0.saturating_sub(self.start_pos),
        )
    }

    /// Source text behind a span, when in bounds.
    pub fn span_text(&self, span: Span) -> Option<&str> {
        let range = self.span_range(span);
        let (lo, hi) = (range.lo as usize, range.hi as usize);
        if lo <= hi && hi <= self.source.len() {
            Some(&self.source[lo..hi])
        } else {
            None
        }
    }

    pub fn get_line(&self, line_number: usize) -> Option<&str> {
        if line_number == 0 {
            return None;
        }

        let ranges = self.line_ranges.get_or_init(|| self.build_line_ranges());
        let index = line_number - 1;

        ranges.get(index).map(|range| &self.source[range.clone()])
    }

    fn build_line_ranges(&self) -> Vec<Range<usize>> {
        let mut ranges = Vec::new();
        let mut start = 0;

        for (i, c) in self.source.char_indices() {
            if c == '\n' {
                ranges.push(start..i);
                start = i + 1;
            }
        }

        if start < self.source.len() || (start == 0 && !self.source.is_empty()) {
            ranges.push(start..self.source.len());
        }

        ranges
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParserBuilder {
    jsx: bool,
    typescript: bool,
    decorators: bool,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jsx(mut self, enabled: bool) -> Self {
        self.jsx = enabled;
        self
    }

    pub fn typescript(mut self, enabled: bool) -> Self {
        self.typescript = enabled;
        self
    }

    pub fn decorators(mut self, enabled: bool) -> Self {
        self.decorators = enabled;
        self
    }

    pub fn build(self) -> Parser {
        let syntax = if self.typescript {
            Syntax::Typescript(TsSyntax {
                tsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        } else {
            Syntax::Es(EsSyntax {
                jsx: self.jsx,
                decorators: self.decorators,
                ..Default::default()
            })
        };

        Parser { syntax }
    }
}

#[derive(Debug, Clone)]
pub struct Parser {
    syntax: Syntax,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            syntax: Syntax::Es(Default::default()),
        }
    }

    pub fn for_file(filename: &str) -> Self {
        match detect_language(filename) {
            Language::JavaScript => Self::new(),
            Language::TypeScript => Self::builder().typescript(true).build(),
            Language::Jsx => Self::builder().jsx(true).build(),
            Language::Tsx => Self::builder().typescript(true).jsx(true).build(),
        }
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    pub fn parse_module(&self, code: &str) -> Result<Module, ParseError> {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map
            .new_source_file(FileName::Custom("input.js".into()).into(), code.to_string());

        let lexer = Lexer::new(
            self.syntax,
            Default::default(),
            StringInput::from(&*fm),
            None,
        );

        let mut parser = swc_ecma_parser::Parser::new_from(lexer);

        parser.parse_module().map_err(|e| {
            let span = e.span();
            let loc = source_map.lookup_char_pos(span.lo);
            ParseError {
                line: loc.line,
                column: loc.col_display,
                span_lo: span.lo.0,
                span_hi: span.hi.0,
                message: e.kind().msg().to_string(),
            }
        })
    }

    pub fn parse_module_recovering(&self, code: &str) -> ParseResult {
        let source_map: Lrc<SourceMap> = Default::default();
        let fm = source_map
            .new_source_file(FileName::Custom("input.js".into()).into(), code.to_string());
        let start_pos = fm.start_pos.0;

        let mut recovered_errors = Vec::new();

        let result = parse_file_as_module(
            &fm,
            self.syntax,
            EsVersion::latest(),
            None,
            &mut recovered_errors,
        );

        let errors: Vec<ParseError> = recovered_errors
            .into_iter()
            .map(|e| {
                let span = e.span();
                let loc = source_map.lookup_char_pos(span.lo);
                ParseError {
                    line: loc.line,
                    column: loc.col_display,
                    span_lo: span.lo.0,
                    span_hi: span.hi.0,
                    message: e.kind().msg().to_string(),
                }
            })
            .collect();

        match result {
            Ok(module) => ParseResult {
                module: Some(module),
                errors,
                start_pos,
            },
            Err(e) => {
                let span = e.span();
                let loc = source_map.lookup_char_pos(span.lo);
                let fatal_error = ParseError {
                    line: loc.line,
                    column: loc.col_display,
                    span_lo: span.lo.0,
                    span_hi: span.hi.0,
                    message: e.kind().msg().to_string(),
                };
                let mut all_errors = errors;
                all_errors.push(fatal_error);
                ParseResult {
                    module: None,
                    errors: all_errors,
                    start_pos,
                }
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_module() {
        let parser = Parser::new();

        let result = parser.parse_module("const x = 1;");

        assert!(result.is_ok());
        assert_eq!(result.unwrap().body.len(), 1);
    }

    #[test]
    fn parse_invalid_syntax_returns_error() {
        let parser = Parser::new();

        let result = parser.parse_module("const = ;");

        assert!(result.is_err());
        let error = result.unwrap_err();
        assert_eq!(error.line, 1);
        assert!(!error.message.is_empty());
    }

    #[test]
    fn builder_creates_typescript_parser() {
        let parser = Parser::builder().typescript(true).build();

        let result = parser.parse_module("const x: number = 1;");

        assert!(result.is_ok());
    }

    #[test]
    fn builder_creates_tsx_parser() {
        let parser = Parser::builder().typescript(true).jsx(true).build();

        let result = parser.parse_module("const element = <div>Hello</div>;");

        assert!(result.is_ok());
    }

    #[test]
    fn detect_language_from_extension() {
        assert_eq!(detect_language("file.js"), Language::JavaScript);
        assert_eq!(detect_language("file.mjs"), Language::JavaScript);
        assert_eq!(detect_language("file.jsx"), Language::Jsx);
        assert_eq!(detect_language("file.ts"), Language::TypeScript);
        assert_eq!(detect_language("file.tsx"), Language::Tsx);
        assert_eq!(detect_language("unknown"), Language::JavaScript);
    }

    #[test]
    fn parse_recovers_from_missing_semicolons() {
        let parser = Parser::new();
        let code = "const a = 1\nconst b = 2\nfunction foo() { return a + b }\n";

        let result = parser.parse_module_recovering(code);

        assert!(result.is_ok());
        assert!(!result.has_errors());
        assert_eq!(result.module.unwrap().body.len(), 3);
    }

    #[test]
    fn parse_incomplete_code_reports_errors() {
        let parser = Parser::new();

        let result = parser.parse_module_recovering("const x =");

        assert!(result.has_errors());
    }

    #[test]
    fn parsed_file_exposes_metadata() {
        let parsed = ParsedFile::from_source("test.ts", "const x: number = 1;\nconst y = 2;");

        assert_eq!(parsed.metadata().filename, "test.ts");
        assert_eq!(parsed.metadata().language, Language::TypeScript);
        assert_eq!(parsed.metadata().line_count, 2);
        assert!(!parsed.metadata().has_errors);
        assert!(parsed.module().is_some());
    }

    #[test]
    fn parsed_file_get_line() {
        let parsed = ParsedFile::from_source("test.js", "const x = 1;\n\nconst y = 2;");

        assert_eq!(parsed.get_line(1), Some("const x = 1;"));
        assert_eq!(parsed.get_line(2), Some(""));
        assert_eq!(parsed.get_line(3), Some("const y = 2;"));
        assert_eq!(parsed.get_line(0), None);
        assert_eq!(parsed.get_line(4), None);
    }

    #[test]
    fn span_range_is_file_relative() {
        let source = "function foo() {}";
        let parsed = ParsedFile::from_source("test.js", source);
        let module = parsed.module().unwrap();

        let range = parsed.span_range(module.body[0].span());

        assert_eq!(range.lo, 0);
        assert_eq!(range.hi as usize, source.len());
        assert_eq!(parsed.span_text(module.body[0].span()), Some(source));
    }

    #[test]
    fn parsed_file_keeps_source_and_errors() {
        let parsed = ParsedFile::from_source("test.js", "const = ;");

        assert_eq!(parsed.source(), "const = ;");
        assert!(parsed.metadata().has_errors);
        assert!(!parsed.errors().is_empty());
    }
}
