use crate::{Span, SyntaxKind};
use serde::Serialize;

/// A lexer for LaTeX math expressions.
///
/// ## Overview
///
/// The lexer performs **character-level scanning** of an expression, producing
/// a stream of [`Token`]s. It handles:
///
/// - **Commands**: `\frac`, `\left`, `\{` (a backslash followed by a run of
///   letters, or by exactly one other character) as one atomic token
/// - **Grouping**: `{`, `}`, `[`, `]`, `(`, `)`
/// - **Operators**: `+`, `-`, `=` and the alignment marker `&`
/// - **Whitespace**: Consecutive whitespace collapsed into single tokens
/// - **Text**: Everything else, consumed greedily until a special character
///
/// A lone trailing `\` is still reported as a (one byte) command so that the
/// token stream always covers the entire input.
///
/// ## Examples
///
/// ```
/// use texfit_syntax::lexer::Lexer;
/// use texfit_syntax::SyntaxKind;
///
/// let tokens: Vec<_> = Lexer::new(r"\frac{a}{b}+1").collect();
///
/// assert_eq!(tokens[0].kind, SyntaxKind::Command); // \frac
/// assert_eq!(tokens[1].kind, SyntaxKind::LBrace);  // {
/// assert_eq!(tokens[7].kind, SyntaxKind::Plus);
/// ```
pub struct Lexer<'a> {
    /// The input expression being lexed.
    input: &'a str,
    /// Current byte position in the input.
    position: usize,
}

/// One lexed token together with its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub span: Span,
}

impl Token<'_> {
    /// Returns the command name without its leading backslash (`\frac` -> `frac`).
    pub fn command_name(&self) -> Option<&str> {
        if self.kind == SyntaxKind::Command {
            self.text.strip_prefix('\\')
        } else {
            None
        }
    }
}

impl<'a> Lexer<'a> {
    /// Creates a new `Lexer` for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Returns the next token.
    /// If EOF, returns a token of kind [`SyntaxKind::Eof`] with empty text.
    pub fn next_token(&mut self) -> Token<'a> {
        let start = self.position;
        let rest = &self.input[start..];
        let mut chars = rest.chars();
        let Some(c) = chars.next() else {
            return Token {
                kind: SyntaxKind::Eof,
                text: "",
                span: Span::new(start, start),
            };
        };
        self.position += c.len_utf8();

        let kind = match c {
            '\\' => {
                if let Some(next) = chars.next() {
                    self.position += next.len_utf8();
                    if next.is_ascii_alphabetic() {
                        // Multi-letter command: \frac
                        while let Some(n) = self.input[self.position..].chars().next() {
                            if n.is_ascii_alphabetic() {
                                self.position += n.len_utf8();
                            } else {
                                break;
                            }
                        }
                    }
                }
                SyntaxKind::Command
            }
            '{' => SyntaxKind::LBrace,
            '}' => SyntaxKind::RBrace,
            '[' => SyntaxKind::LBracket,
            ']' => SyntaxKind::RBracket,
            '(' => SyntaxKind::LParen,
            ')' => SyntaxKind::RParen,
            '+' => SyntaxKind::Plus,
            '-' => SyntaxKind::Minus,
            '=' => SyntaxKind::Equals,
            '&' => SyntaxKind::Ampersand,
            c if c.is_whitespace() => {
                while let Some(n) = self.input[self.position..].chars().next() {
                    if n.is_whitespace() {
                        self.position += n.len_utf8();
                    } else {
                        break;
                    }
                }
                SyntaxKind::Whitespace
            }
            _ => {
                // Text run
                while let Some(n) = self.input[self.position..].chars().next() {
                    if is_special(n) || n.is_whitespace() {
                        break;
                    }
                    self.position += n.len_utf8();
                }
                SyntaxKind::Text
            }
        };

        Token {
            kind,
            text: &self.input[start..self.position],
            span: Span::new(start, self.position),
        }
    }
}

fn is_special(c: char) -> bool {
    matches!(
        c,
        '\\' | '{' | '}' | '[' | ']' | '(' | ')' | '+' | '-' | '=' | '&'
    )
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == SyntaxKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}
