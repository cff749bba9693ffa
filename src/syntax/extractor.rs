//! Doc-comment scanner that isolates `@assert` tags.
//!
//! The scanner works line by line. Each line is stripped of doc-comment decoration
//! (`/**`, leading `*`, a trailing `*/`, surrounding whitespace) before it is examined.
//! A tag ends at the first line whose content starts with `(`; that line is the test
//! expression and every non-blank line before it is preface. A line starting with `@`
//! or the end of the comment also ends a tag; the last preface line then stands in as
//! the test expression so the parser can report it.

use super::{RawAnnotationTag, Span};

pub const TAG_KEYWORD: &str = "@assert";

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    /// Byte offset of the line in the doc comment.
    start: usize,
    text: &'a str,
}

impl<'a> Line<'a> {
    /// Content byte range within `text` with the decoration removed.
    fn content_range(&self) -> (usize, usize) {
        let line = self.text;
        let mut end = line.trim_end().len();
        if line[..end].ends_with("*/") {
            end -= 2;
        }
        let mut start = (line.len() - line.trim_start().len()).min(end);
        let head = &line[start..end];
        let stripped = head.strip_prefix("/**").unwrap_or(head).trim_start_matches('*');
        start = end - stripped.len();
        let body = &line[start..end];
        start += body.len() - body.trim_start().len();
        end = start + line[start..end].trim_end().len();
        (start, end)
    }

    fn content(&self) -> &'a str {
        let (start, end) = self.content_range();
        &self.text[start..end]
    }

    /// Absolute offset just past the content.
    fn content_end(&self) -> usize {
        self.start + self.content_range().1
    }

    fn closes_comment(&self) -> bool {
        self.text.trim_end().ends_with("*/")
    }
}

/// A recognized tag keyword within one line's content.
struct TagHead<'a> {
    /// Offset of `@assert` within the content.
    offset: usize,
    note: Option<String>,
    /// Whatever follows the keyword and note on the same line, trimmed.
    rest: &'a str,
}

/// Scans a doc comment and returns every `@assert` tag in order of appearance.
pub fn extract_tags(doc_comment: &str) -> Vec<RawAnnotationTag> {
    let lines = split_lines(doc_comment);
    let mut tags = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        match scan_tag(doc_comment, &lines, index) {
            Some((tag, next)) => {
                tags.push(tag);
                index = next;
            }
            None => index += 1,
        }
    }

    tags
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;
    for piece in text.split('\n') {
        lines.push(Line {
            start,
            text: piece.strip_suffix('\r').unwrap_or(piece),
        });
        start += piece.len() + 1;
    }
    lines
}

/// Reads one tag starting on `lines[index]`, returning it and the index of the next
/// unconsumed line.
fn scan_tag(doc: &str, lines: &[Line<'_>], index: usize) -> Option<(RawAnnotationTag, usize)> {
    let line = lines[index];
    let (content_start, _) = line.content_range();
    let head = find_tag_head(line.content())?;
    let tag_start = line.start + content_start + head.offset;
    let mut tag_end = line.content_end();
    let mut preface: Vec<String> = Vec::new();

    if head.rest.starts_with('(') {
        let tag = build_tag(doc, head.note, preface, head.rest.to_string(), tag_start, tag_end);
        return Some((tag, index + 1));
    }
    let rest = preface_line(head.rest);
    if !rest.is_empty() {
        preface.push(rest);
    }

    let mut cursor = index + 1;
    if !line.closes_comment() {
        while let Some(next) = lines.get(cursor) {
            let content = next.content();
            if content.starts_with('@') {
                break;
            }
            cursor += 1;
            if content.starts_with('(') {
                let tag = build_tag(
                    doc,
                    head.note,
                    preface,
                    content.to_string(),
                    tag_start,
                    next.content_end(),
                );
                return Some((tag, cursor));
            }
            let text = preface_line(content);
            if !text.is_empty() {
                preface.push(text);
                tag_end = next.content_end();
            }
            if next.closes_comment() {
                break;
            }
        }
    }

    // No parenthesized line: the last preface line is the best candidate expression.
    let test_expression = preface.pop().unwrap_or_default();
    let tag = build_tag(doc, head.note, preface, test_expression, tag_start, tag_end);
    Some((tag, cursor))
}

fn find_tag_head(content: &str) -> Option<TagHead<'_>> {
    for (offset, _) in content.match_indices(TAG_KEYWORD) {
        let mut rest = &content[offset + TAG_KEYWORD.len()..];
        let mut note = None;

        if let Some(after_dash) = rest.strip_prefix('-') {
            let len = after_dash
                .find(|c: char| !is_note_char(c))
                .unwrap_or(after_dash.len());
            if len == 0 {
                continue;
            }
            note = Some(after_dash[..len].to_string());
            rest = &after_dash[len..];
        }

        if rest.is_empty() || rest.starts_with([' ', '\t']) {
            return Some(TagHead {
                offset,
                note,
                rest: rest.trim(),
            });
        }
    }
    None
}

/// Preface text also loses trailing `*` decoration such as `Note **`.
fn preface_line(content: &str) -> String {
    content.trim_end_matches('*').trim_end().to_string()
}

fn is_note_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'
}

fn build_tag(
    doc: &str,
    note: Option<String>,
    preface_lines: Vec<String>,
    test_expression: String,
    start: usize,
    end: usize,
) -> RawAnnotationTag {
    let end = end.max(start);
    RawAnnotationTag {
        note,
        preface_lines,
        test_expression,
        raw: doc[start..end].to_string(),
        span: Span::new(start, end),
    }
}
