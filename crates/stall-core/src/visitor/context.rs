//! Visitor context providing file information during AST traversal.

use swc_common::Span;

use crate::engine::op::SourceRange;
use crate::parser::ParsedFile;

pub struct VisitorContext<'a> {
    file: &'a ParsedFile,
}

impl<'a> VisitorContext<'a> {
    pub fn new(file: &'a ParsedFile) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &ParsedFile {
        self.file
    }

    pub fn span_to_location(&self, span: Span) -> (usize, usize) {
        let range = self.file.span_range(span);
        self.offset_to_location(range.lo)
    }

    /// Start and end locations of a span: (line, column, end_line, end_column).
    pub fn span_to_range(&self, span: Span) -> (usize, usize, usize, usize) {
        let range: SourceRange = self.file.span_range(span);
        let (line, column) = self.offset_to_location(range.lo);
        let (end_line, end_column) = self.offset_to_location(range.hi);
        (line, column, end_line, end_column)
    }

    pub fn offset_to_location(&self, offset: u32) -> (usize, usize) {
        let source = self.file.source();
        let lo = offset as usize;

        if source.is_empty() || lo == 0 {
            return (1, 1);
        }

        let prefix = &source[..lo.min(source.len())];
        let line = prefix.matches('\n').count() + 1;
        let last_newline = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = lo - last_newline + 1;

        (line, column)
    }

    pub fn get_source_text(&self, span: Span) -> Option<&str> {
        self.file.span_text(span)
    }
}
