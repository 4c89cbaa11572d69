//! Lexer for Coal source code.
//!
//! Wraps a logos-generated token enum with line/column tracking so parse
//! errors can report `[line:column]` positions.

use logos::Logos;

use crate::error::{CoalError, Pos, RunResult};

/// Coal tokens.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // Keywords
    #[token("let")]
    KwLet,
    #[token("def")]
    KwDef,
    #[token("end")]
    KwEnd,
    #[token("return")]
    KwReturn,
    #[token("type")]
    KwType,
    #[token("init")]
    KwInit,
    #[token("for")]
    KwFor,
    #[token("each")]
    KwEach,
    #[token("while")]
    KwWhile,
    #[token("break")]
    KwBreak,
    #[token("next")]
    KwNext,
    #[token("if")]
    KwIf,
    #[token("elif")]
    KwElif,
    #[token("else")]
    KwElse,
    #[token("do")]
    KwDo,
    #[token("as")]
    KwAs,
    #[token("import")]
    KwImport,
    #[token("exit")]
    KwExit,
    #[token("try")]
    KwTry,
    #[token("except")]
    KwExcept,
    #[token("true")]
    KwTrue,
    #[token("false")]
    KwFalse,

    // Identifiers
    #[regex(r"[a-z_][a-zA-Z_]*", |lex| lex.slice().to_owned())]
    Name(String),
    #[regex(r"[A-Z][a-zA-Z]*", |lex| lex.slice().to_owned())]
    TypeName(String),

    // Literals
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),
    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice()))]
    Str(String),

    // Compound operators (listed before their single-char prefixes)
    #[token("->")]
    Arrow,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,

    // Single-char operators and punctuation
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(".")]
    Dot,
}

impl Token {
    /// A short human-readable description used in parse error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Name(n) | Self::TypeName(n) => format!("\"{n}\""),
            Self::Int(i) => format!("\"{i}\""),
            Self::Float(f) => format!("\"{f}\""),
            Self::Str(_) => "string literal".to_owned(),
            other => format!("\"{}\"", other.text()),
        }
    }

    fn text(&self) -> &'static str {
        match self {
            Self::KwLet => "let",
            Self::KwDef => "def",
            Self::KwEnd => "end",
            Self::KwReturn => "return",
            Self::KwType => "type",
            Self::KwInit => "init",
            Self::KwFor => "for",
            Self::KwEach => "each",
            Self::KwWhile => "while",
            Self::KwBreak => "break",
            Self::KwNext => "next",
            Self::KwIf => "if",
            Self::KwElif => "elif",
            Self::KwElse => "else",
            Self::KwDo => "do",
            Self::KwAs => "as",
            Self::KwImport => "import",
            Self::KwExit => "exit",
            Self::KwTry => "try",
            Self::KwExcept => "except",
            Self::KwTrue => "true",
            Self::KwFalse => "false",
            Self::Arrow => "->",
            Self::EqEq => "==",
            Self::NotEq => "!=",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::PlusEq => "+=",
            Self::MinusEq => "-=",
            Self::StarEq => "*=",
            Self::SlashEq => "/=",
            Self::Colon => ":",
            Self::Question => "?",
            Self::Comma => ",",
            Self::Eq => "=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Amp => "&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Dot => ".",
            Self::Name(_) | Self::TypeName(_) | Self::Int(_) | Self::Float(_) | Self::Str(_) => {
                unreachable!("literal tokens carry their own text")
            }
        }
    }
}

/// Decodes the `\n`, `\t`, `\"` and `\\` escapes of a quoted string slice.
fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                // Unknown escapes pass through verbatim.
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// A token together with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub pos: Pos,
}

/// Maps byte offsets to 1-based line/column positions.
#[derive(Debug)]
struct SourceMap {
    line_starts: Vec<usize>,
}

impl SourceMap {
    fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    fn pos(&self, offset: usize) -> Pos {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        #[allow(clippy::cast_possible_truncation)]
        Pos {
            line: line as u32 + 1,
            column: (offset - self.line_starts[line]) as u32 + 1,
        }
    }
}

/// Tokenizes a whole source text, reporting the first illegal character as
/// a `SyntaxError` with its position.
pub fn tokenize(source: &str) -> RunResult<Vec<SpannedToken>> {
    let map = SourceMap::new(source);
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        let pos = map.pos(lexer.span().start);
        match result {
            Ok(token) => tokens.push(SpannedToken { token, pos }),
            Err(()) => {
                let bad = lexer.slice().chars().next().unwrap_or('?');
                return Err(CoalError::syntax(format!("Illegal character \"{bad}\"")).at(pos));
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn lexes_var_def() {
        assert_eq!(
            kinds("let x: Int = 3"),
            vec![
                Token::KwLet,
                Token::Name("x".into()),
                Token::Colon,
                Token::TypeName("Int".into()),
                Token::Eq,
                Token::Int(3),
            ]
        );
    }

    #[test]
    fn lexes_float_forms() {
        assert_eq!(kinds("1.5 2. 3e-2"), vec![Token::Float(1.5), Token::Float(2.0), Token::Float(0.03)]);
    }

    #[test]
    fn lexes_string_escapes() {
        assert_eq!(kinds(r#""a\nb\"c\\""#), vec![Token::Str("a\nb\"c\\".into())]);
    }

    #[test]
    fn skips_comments() {
        assert_eq!(kinds("x // the rest\ny"), vec![Token::Name("x".into()), Token::Name("y".into())]);
    }

    #[test]
    fn compound_operators_win_over_prefixes() {
        assert_eq!(
            kinds("<< <= < -> - +="),
            vec![Token::Shl, Token::Le, Token::Lt, Token::Arrow, Token::Minus, Token::PlusEq]
        );
    }

    #[test]
    fn reports_illegal_character_position() {
        let err = tokenize("let x: Int = 3\n  $").unwrap_err();
        assert_eq!(err.to_string(), "[2:3] SyntaxError: Illegal character \"$\".");
    }
}
