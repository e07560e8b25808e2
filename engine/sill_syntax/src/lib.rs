//! Highlight classification for ML-family source.
//!
//! Presentation glue for editor front ends: maps a source string to
//! byte-spanned highlight kinds. The engine never depends on this crate;
//! the CLI's `highlight` command and embedding editors do.

use logos::Logos;

/// Byte range into the classified source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Highlight class of one token.
///
/// The classes (and the word table behind them) follow the CodeMirror
/// ML mode, so embedders can reuse existing ML stylesheets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HighlightKind {
    Keyword,
    /// Primitive type names and `open`.
    Builtin,
    /// Literal-like words: `true`, `nil`, `div`, standard exception names.
    Atom,
    Variable,
    /// A `~`-prefixed word, usually a negative numeric literal.
    NegatedWord,
    /// A backtick-quoted word.
    Quoted,
    Number,
    Operator,
    Str,
    Comment,
    Punct,
}

impl HighlightKind {
    /// Stylesheet class name, `None` for tokens editors leave unstyled.
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            HighlightKind::Keyword => Some("keyword"),
            HighlightKind::Builtin => Some("builtin"),
            HighlightKind::Atom => Some("atom"),
            HighlightKind::Variable => Some("variable"),
            HighlightKind::NegatedWord => Some("variable-2"),
            HighlightKind::Quoted => Some("quote"),
            HighlightKind::Number => Some("number"),
            HighlightKind::Operator => Some("operator"),
            HighlightKind::Str => Some("string"),
            HighlightKind::Comment => Some("comment"),
            HighlightKind::Punct => None,
        }
    }
}

/// One classified token.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Highlight {
    pub span: Span,
    pub kind: HighlightKind,
}

/// Raw token shapes, before word-table classification.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[token("(*", block_comment)]
    Comment,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    Str,

    #[regex(r"~[A-Za-z0-9_]*")]
    NegatedWord,

    #[regex(r"`[A-Za-z0-9_]+")]
    Quoted,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[token("...")]
    Ellipsis,

    #[regex(r"[A-Za-z_][A-Za-z0-9_']*")]
    Word,

    #[regex(r"[+\-*/&%=<>!?|:@^#]+")]
    Operator,

    #[regex(r"[()\[\]{};,.]")]
    Punct,
}

/// Consume a `(* ... *)` comment with nesting, to end of input when
/// unterminated.
fn block_comment(lexer: &mut logos::Lexer<RawToken>) {
    let bytes = lexer.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < bytes.len() {
        match (bytes[i], bytes.get(i + 1)) {
            (b'(', Some(b'*')) => {
                depth += 1;
                i += 2;
            }
            (b'*', Some(b')')) => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    break;
                }
            }
            _ => i += 1,
        }
    }
    lexer.bump(i);
}

/// Word and symbol table of the ML mode, SML flavour.
fn table_class(lexeme: &str) -> Option<HighlightKind> {
    let kind = match lexeme {
        "let" | "rec" | "in" | "and" | "if" | "then" | "else" | "for" | "do" | "of" | "while"
        | "fun" | "val" | "type" | "match" | "with" | "try" | "begin" | "end" | "datatype"
        | "abstype" | "exception" | "local" | "eqtype" | "functor" | "include" | "sharing"
        | "sig" | "signature" | "struct" | "structure" | "where" | "andalso" | "as" | "case"
        | "fn" | "handle" | "infix" | "infixr" | "nonfix" | "op" | "orelse" | "raise"
        | "withtype" | ":>" | "..." | "_" => HighlightKind::Keyword,
        "open" | "unit" | "bool" | "int" | "word" | "real" | "string" | "char" | "list"
        | "ref" | "exn" => HighlightKind::Builtin,
        "true" | "false" | "nil" | "::" | "div" | "mod" | "abs" | "Bind" | "Match" => {
            HighlightKind::Atom
        }
        _ => return None,
    };
    Some(kind)
}

/// Classify `source` into highlight spans. Unlexable bytes are skipped,
/// matching an editor mode that leaves them unstyled.
#[allow(
    clippy::cast_possible_truncation,
    reason = "documents larger than u32::MAX bytes are unsupported"
)]
pub fn classify(source: &str) -> Vec<Highlight> {
    RawToken::lexer(source)
        .spanned()
        .filter_map(|(token, range)| {
            let kind = match token {
                Ok(RawToken::Comment) => HighlightKind::Comment,
                Ok(RawToken::Str) => HighlightKind::Str,
                Ok(RawToken::NegatedWord) => HighlightKind::NegatedWord,
                Ok(RawToken::Quoted) => HighlightKind::Quoted,
                Ok(RawToken::Number) => HighlightKind::Number,
                Ok(RawToken::Ellipsis) => HighlightKind::Keyword,
                Ok(RawToken::Word) => {
                    table_class(&source[range.clone()]).unwrap_or(HighlightKind::Variable)
                }
                Ok(RawToken::Operator) => {
                    table_class(&source[range.clone()]).unwrap_or(HighlightKind::Operator)
                }
                Ok(RawToken::Punct) => HighlightKind::Punct,
                Err(()) => return None,
            };
            Some(Highlight {
                span: Span::new(range.start as u32, range.end as u32),
                kind,
            })
        })
        .collect()
}
