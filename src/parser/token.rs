//! Lossless token stream over Markdown source

/// Lexical class of a token.
///
/// The set is closed: every byte of a document falls into exactly one of
/// these classes, so the token stream partitions the content with no gaps
/// and no overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of ordinary text
    Text,
    /// A run of spaces and/or tabs
    Whitespace,
    /// A single line break (`\n` or `\r\n`)
    Newline,
    /// A run of one repeated Markdown-significant punctuation character
    Punct(char),
    /// A backtick or tilde run of length >= 3 (code fence marker)
    Fence(char),
}

/// A lexical unit of the source.
///
/// Byte offsets are 0-based and half-open; `line` and `column` are 1-based
/// for human surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Lexical class
    pub kind: TokenKind,
    /// First byte of the token (inclusive)
    pub start: usize,
    /// One past the last byte (exclusive)
    pub end: usize,
    /// 1-based line the token starts on
    pub line: usize,
    /// 1-based byte column within that line
    pub column: usize,
}

impl Token {
    /// Byte length of the token.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the token is empty (never true for lexer output).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The token's slice of the source.
    pub fn text<'a>(&self, content: &'a str) -> &'a str {
        &content[self.start..self.end]
    }
}

/// Punctuation characters that structure Markdown. A run of one repeated
/// character from this set becomes a single `Punct` token.
const SIGNIFICANT_PUNCT: &[char] = &[
    '#', '*', '-', '_', '>', '=', '+', '[', ']', '(', ')', '!', '|', ':', '<',
];

fn is_significant_punct(c: char) -> bool {
    SIGNIFICANT_PUNCT.contains(&c)
}

/// Compute the line index: `(start, end)` byte ranges covering the content
/// exactly, line endings included. Empty content has zero lines.
pub fn line_index(content: &str) -> Vec<(usize, usize)> {
    let mut lines = Vec::new();
    let bytes = content.as_bytes();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\n' {
            lines.push((start, i + 1));
            start = i + 1;
        }
    }
    if start < bytes.len() {
        lines.push((start, bytes.len()));
    }
    lines
}

/// Tokenize `content` into a lossless stream.
///
/// Classification: `\n`/`\r\n` are single `Newline` tokens; space/tab runs
/// are `Whitespace`; runs of one repeated significant punctuation character
/// are `Punct`; backtick/tilde runs of length >= 3 are `Fence` (shorter runs
/// are `Punct`); everything else accumulates into `Text`.
pub fn tokenize(content: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let bytes = content.as_bytes();
    let len = bytes.len();
    let mut pos = 0;
    let mut line = 1;
    let mut line_start = 0;

    let mut push = |tokens: &mut Vec<Token>, kind, start: usize, end: usize, line, line_start| {
        tokens.push(Token {
            kind,
            start,
            end,
            line,
            column: start - line_start + 1,
        });
    };

    while pos < len {
        let rest = &content[pos..];
        let Some(c) = rest.chars().next() else {
            break;
        };

        if c == '\n' {
            push(&mut tokens, TokenKind::Newline, pos, pos + 1, line, line_start);
            pos += 1;
            line += 1;
            line_start = pos;
        } else if c == '\r' {
            let end = if bytes.get(pos + 1) == Some(&b'\n') {
                pos + 2
            } else {
                pos + 1
            };
            push(&mut tokens, TokenKind::Newline, pos, end, line, line_start);
            pos = end;
            line += 1;
            line_start = pos;
        } else if c == ' ' || c == '\t' {
            let mut end = pos;
            while end < len && (bytes[end] == b' ' || bytes[end] == b'\t') {
                end += 1;
            }
            push(&mut tokens, TokenKind::Whitespace, pos, end, line, line_start);
            pos = end;
        } else if c == '`' || c == '~' {
            let mut end = pos;
            while end < len && bytes[end] == c as u8 {
                end += 1;
            }
            let kind = if end - pos >= 3 {
                TokenKind::Fence(c)
            } else {
                TokenKind::Punct(c)
            };
            push(&mut tokens, kind, pos, end, line, line_start);
            pos = end;
        } else if is_significant_punct(c) {
            let mut end = pos;
            while end < len && bytes[end] == c as u8 {
                end += 1;
            }
            push(&mut tokens, TokenKind::Punct(c), pos, end, line, line_start);
            pos = end;
        } else {
            // Text run: consume until the next byte that starts a different class.
            let mut end = pos;
            for ch in rest.chars() {
                if ch == '\n'
                    || ch == '\r'
                    || ch == ' '
                    || ch == '\t'
                    || ch == '`'
                    || ch == '~'
                    || is_significant_punct(ch)
                {
                    break;
                }
                end += ch.len_utf8();
            }
            push(&mut tokens, TokenKind::Text, pos, end, line, line_start);
            pos = end;
        }
    }

    tokens
}
