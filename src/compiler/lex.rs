use crate::common::literal::Literal;
use crate::common::source::Source;
use crate::common::token::{keyword, Token, TokenKind};
use crate::compiler::syntax::LexError;

/// Lexes a `Source` into a token stream, terminated by a single synthetic
/// `Eof` token. Lex errors are collected rather than aborting the scan, so
/// a caller sees every malformed character in one pass; see
/// [`lex`] for the driver that decides what to do with them.
pub struct Lexer<'a> {
    chars: Vec<char>,
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
    _source: &'a Source,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a Source) -> Lexer<'a> {
        Lexer {
            chars: source.contents.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
            _source: source,
        }
    }

    /// Scans the whole source and returns its tokens (always ending in
    /// `Eof`) alongside any lex errors encountered along the way.
    pub fn scan(mut self) -> (Vec<Token>, Vec<LexError>) {
        while !self.at_end() {
            self.start = self.current;
            self.scan_token();
        }
        self.tokens.push(Token::eof(self.line));
        tracing::debug!(tokens = self.tokens.len(), errors = self.errors.len(), "lexed source");
        (self.tokens, self.errors)
    }

    fn at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    fn advance(&mut self) -> char {
        let c = self.chars[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        *self.chars.get(self.current).unwrap_or(&'\0')
    }

    fn peek_next(&self) -> char {
        *self.chars.get(self.current + 1).unwrap_or(&'\0')
    }

    fn matches(&mut self, expected: char) -> bool {
        if self.at_end() || self.chars[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn lexeme(&self) -> String {
        self.chars[self.start..self.current].iter().collect()
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.add_token_literal(kind, None);
    }

    fn add_token_literal(&mut self, kind: TokenKind, literal: Option<Literal>) {
        let lexeme = self.lexeme();
        self.tokens.push(Token::new(kind, lexeme, literal, self.line));
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(LexError::new(self.line, message.into()));
    }

    fn scan_token(&mut self) {
        use TokenKind::*;

        let c = self.advance();
        match c {
            '(' => self.add_token(LeftParen),
            ')' => self.add_token(RightParen),
            '{' => self.add_token(LeftBrace),
            '}' => self.add_token(RightBrace),
            ',' => self.add_token(Comma),
            '.' => self.add_token(Dot),
            '-' => self.add_token(Minus),
            '+' => self.add_token(Plus),
            ';' => self.add_token(Semicolon),
            '*' => self.add_token(Star),
            '!' => {
                let kind = if self.matches('=') { BangEqual } else { Bang };
                self.add_token(kind);
            }
            '=' => {
                let kind = if self.matches('=') { EqualEqual } else { Equal };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.matches('=') { LessEqual } else { Less };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.matches('=') { GreaterEqual } else { Greater };
                self.add_token(kind);
            }
            '/' => {
                if self.matches('/') {
                    while self.peek() != '\n' && !self.at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if is_alpha(c) => self.identifier(),
            other => self.error(format!("Unexpected character '{}'.", other)),
        }
    }

    fn string(&mut self) {
        while self.peek() != '"' && !self.at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.at_end() {
            self.error("Unterminated string.");
            return;
        }

        // the closing quote
        self.advance();

        let text: String = self.chars[self.start + 1..self.current - 1].iter().collect();
        self.add_token_literal(TokenKind::String, Some(Literal::String(text)));
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let value: f64 = self.lexeme().parse().expect("scanned number literal must parse as f64");
        self.add_token_literal(TokenKind::Number, Some(Literal::Number(value)));
    }

    fn identifier(&mut self) {
        while is_alphanumeric(self.peek()) {
            self.advance();
        }

        let text = self.lexeme();
        match keyword(&text) {
            Some(TokenKind::True) => self.add_token_literal(TokenKind::True, Some(Literal::Bool(true))),
            Some(TokenKind::False) => self.add_token_literal(TokenKind::False, Some(Literal::Bool(false))),
            Some(TokenKind::Nil) => self.add_token_literal(TokenKind::Nil, Some(Literal::Nil)),
            Some(kind) => self.add_token(kind),
            None => self.add_token(TokenKind::Identifier),
        }
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}

/// Lexes a `Source`. Thin wrapper over [`Lexer::scan`] kept free-standing
/// so call sites read `lex::lex(&source)` the way the rest of the compiler
/// pipeline reads `stage::verb(...)`.
pub fn lex(source: &Source) -> (Vec<Token>, Vec<LexError>) {
    Lexer::new(source).scan()
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let src = Source::source(source);
        let (tokens, errors) = lex(&src);
        assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn single_char_tokens() {
        use TokenKind::*;
        assert_eq!(
            kinds("(){},.-+;*"),
            vec![
                LeftParen, RightParen, LeftBrace, RightBrace, Comma, Dot, Minus, Plus, Semicolon,
                Star, Eof
            ]
        );
    }

    #[test]
    fn two_char_operators() {
        use TokenKind::*;
        assert_eq!(
            kinds("! != = == < <= > >="),
            vec![Bang, BangEqual, Equal, EqualEqual, Less, LessEqual, Greater, GreaterEqual, Eof]
        );
    }

    #[test]
    fn line_comment_is_skipped() {
        use TokenKind::*;
        assert_eq!(kinds("// a comment\n1"), vec![Number, Eof]);
    }

    #[test]
    fn tracks_line_numbers_across_newlines() {
        let src = Source::source("1\n2\n3");
        let (tokens, _) = lex(&src);
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 3]);
    }

    #[test]
    fn string_literal_spans_newlines() {
        let src = Source::source("\"a\nb\"");
        let (tokens, errors) = lex(&src);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].literal, Some(Literal::String("a\nb".to_string())));
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn unterminated_string_reports_error() {
        let src = Source::source("\"unterminated");
        let (_, errors) = lex(&src);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Unterminated string.");
    }

    #[test]
    fn number_literal_with_fraction() {
        let src = Source::source("3.14");
        let (tokens, _) = lex(&src);
        assert_eq!(tokens[0].literal, Some(Literal::Number(3.14)));
    }

    #[test]
    fn trailing_dot_without_digit_is_not_consumed() {
        use TokenKind::*;
        assert_eq!(kinds("1."), vec![Number, Dot, Eof]);
    }

    #[test]
    fn keywords_and_identifiers() {
        use TokenKind::*;
        assert_eq!(
            kinds("and class else false for fun if nil or print return super this true var while orchid"),
            vec![
                And, Class, Else, False, For, Fun, If, Nil, Or, Print, Return, Super, This, True,
                Var, While, Identifier, Eof
            ]
        );
    }

    #[test]
    fn boolean_and_nil_tokens_carry_literal() {
        let src = Source::source("true false nil");
        let (tokens, _) = lex(&src);
        assert_eq!(tokens[0].literal, Some(Literal::Bool(true)));
        assert_eq!(tokens[1].literal, Some(Literal::Bool(false)));
        assert_eq!(tokens[2].literal, Some(Literal::Nil));
    }

    #[test]
    fn unexpected_character_reports_error_and_continues() {
        let src = Source::source("1 @ 2");
        let (tokens, errors) = lex(&src);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Unexpected character '@'.");
        // lexer recovers and still produces tokens for surrounding input
        assert_eq!(tokens.len(), 3); // 1, 2, Eof
    }

    #[test]
    fn lexeme_is_verbatim_source_substring() {
        let src = Source::source("foobar");
        let (tokens, _) = lex(&src);
        assert_eq!(tokens[0].lexeme, "foobar");
    }

    proptest::proptest! {
        #[test]
        fn eof_is_always_last_and_line_is_final_line(text in "[a-zA-Z0-9 \n]{0,64}") {
            let src = Source::source(&text);
            let (tokens, _) = lex(&src);
            let last = tokens.last().unwrap();
            proptest::prop_assert_eq!(last.kind, TokenKind::Eof);

            let mut prev_line = 1usize;
            for token in &tokens {
                proptest::prop_assert!(token.line >= prev_line);
                prev_line = token.line;
            }
        }
    }
}
