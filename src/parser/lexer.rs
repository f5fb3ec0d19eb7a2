use crate::error::ParseError;
use crate::syntax::Span;

/// Token types produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `@`
    At,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `;`
    Semi,
    /// `.`
    Dot,
    /// A lone `=`
    Equals,
    /// Identifiers and keywords, including backticked names and `#directives`.
    Name(String),
    /// An integer literal as written.
    Integer(String),
    /// A floating-point literal as written.
    Float(String),
    /// A string literal as written, quotes included.
    Str(String),
    /// Any other run of operator characters.
    Operator(String),
    /// End of input
    Eof,
}

/// A token with its source location.
#[derive(Debug, Clone)]
pub struct Located {
    pub token: Token,
    pub span: Span,
    /// Whether a line break separates this token from the previous one.
    pub newline_before: bool,
}

/// Tokenizer for declaration source text.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    line_start: usize,
    saw_newline: bool,
}

const OPERATOR_CHARS: &[u8] = b"/=-+!*%<>&|^~?";

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input: input.as_bytes(),
            pos: 0,
            line: 1,
            line_start: 0,
            saw_newline: true,
        }
    }

    fn column(&self) -> usize {
        self.pos - self.line_start + 1
    }

    fn peek_byte(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_byte_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek_byte()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.line_start = self.pos;
            self.saw_newline = true;
        }
        Some(b)
    }

    fn text(&self, start: usize) -> String {
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseError> {
        loop {
            match (self.peek_byte(), self.peek_byte_at(1)) {
                (Some(b' ' | b'\t' | b'\r' | b'\n'), _) => {
                    self.advance();
                }
                (Some(b'/'), Some(b'/')) => {
                    while let Some(b) = self.peek_byte() {
                        if b == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                (Some(b'/'), Some(b'*')) => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    /// Block comments nest.
    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let (line, column) = (self.line, self.column());
        let mut depth = 0usize;
        loop {
            match (self.peek_byte(), self.peek_byte_at(1)) {
                (Some(b'/'), Some(b'*')) => {
                    self.pos += 2;
                    depth += 1;
                }
                (Some(b'*'), Some(b'/')) => {
                    self.pos += 2;
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                (Some(_), _) => {
                    self.advance();
                }
                (None, _) => return Err(ParseError::UnterminatedComment { line, column }),
            }
        }
    }

    fn read_name(&mut self) {
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80 {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_digits(&mut self) {
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self, start: usize) -> Token {
        let prefixed = self.peek_byte() == Some(b'0')
            && matches!(self.peek_byte_at(1), Some(b'x' | b'o' | b'b'));
        self.read_digits();
        if prefixed {
            return self.finish_prefixed(start);
        }

        let mut is_float = false;
        if self.peek_byte() == Some(b'.') && self.peek_byte_at(1).is_some_and(|b| b.is_ascii_digit()) {
            is_float = true;
            self.advance();
            self.read_digits();
        }
        // `1e5` is consumed by read_digits; only a signed exponent remains here.
        let text = self.text(start);
        if text.ends_with(['e', 'E']) && matches!(self.peek_byte(), Some(b'+' | b'-')) {
            is_float = true;
            self.advance();
            self.read_digits();
        } else if text.contains(['e', 'E']) {
            is_float = true;
        }

        let text = self.text(start);
        if is_float {
            Token::Float(text)
        } else {
            Token::Integer(text)
        }
    }

    /// `0x`, `0o` and `0b` literals. Hex literals with a `p` exponent are floats.
    fn finish_prefixed(&mut self, start: usize) -> Token {
        let text = self.text(start);
        if !text.starts_with("0x") {
            return Token::Integer(text);
        }
        if text.ends_with(['p', 'P']) && matches!(self.peek_byte(), Some(b'+' | b'-')) {
            self.advance();
            self.read_digits();
            return Token::Float(self.text(start));
        }
        if text[2..].contains(['p', 'P']) {
            Token::Float(text)
        } else {
            Token::Integer(text)
        }
    }

    fn read_string(&mut self, line: usize, column: usize) -> Result<(), ParseError> {
        let unterminated = ParseError::UnterminatedString { line, column };
        if self.input[self.pos..].starts_with(b"\"\"\"") {
            self.pos += 3;
            loop {
                if self.input[self.pos..].starts_with(b"\"\"\"") {
                    self.pos += 3;
                    return Ok(());
                }
                match self.advance() {
                    Some(b'\\') => {
                        self.advance();
                    }
                    Some(_) => {}
                    None => return Err(unterminated),
                }
            }
        }

        self.advance();
        loop {
            match self.advance() {
                Some(b'"') => return Ok(()),
                Some(b'\\') => match self.advance() {
                    Some(b'(') => self.skip_interpolation(line, column)?,
                    Some(b'\n') | None => return Err(unterminated),
                    Some(_) => {}
                },
                Some(b'\n') | None => return Err(unterminated),
                Some(_) => {}
            }
        }
    }

    /// Skip the body of `\( ... )`, which may contain nested strings.
    fn skip_interpolation(&mut self, line: usize, column: usize) -> Result<(), ParseError> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.peek_byte() {
                Some(b'(') => {
                    depth += 1;
                    self.advance();
                }
                Some(b')') => {
                    depth -= 1;
                    self.advance();
                }
                Some(b'"') => {
                    let (l, c) = (self.line, self.column());
                    self.read_string(l, c)?;
                }
                Some(_) => {
                    self.advance();
                }
                None => return Err(ParseError::UnterminatedString { line, column }),
            }
        }
        Ok(())
    }

    fn read_operator(&mut self) {
        while let Some(b) = self.peek_byte() {
            let starts_comment = b == b'/' && matches!(self.peek_byte_at(1), Some(b'/' | b'*'));
            if OPERATOR_CHARS.contains(&b) && !starts_comment {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read the next token.
    pub fn next_token(&mut self) -> Result<Located, ParseError> {
        self.skip_whitespace_and_comments()?;
        let newline_before = std::mem::replace(&mut self.saw_newline, false);
        let (start, line, column) = (self.pos, self.line, self.column());

        let single = |lexer: &mut Self, token: Token| {
            lexer.advance();
            token
        };

        let token = match self.peek_byte() {
            None => Token::Eof,
            Some(b'@') => single(self, Token::At),
            Some(b'{') => single(self, Token::LBrace),
            Some(b'}') => single(self, Token::RBrace),
            Some(b'(') => single(self, Token::LParen),
            Some(b')') => single(self, Token::RParen),
            Some(b'[') => single(self, Token::LBracket),
            Some(b']') => single(self, Token::RBracket),
            Some(b':') => single(self, Token::Colon),
            Some(b',') => single(self, Token::Comma),
            Some(b';') => single(self, Token::Semi),
            Some(b'.') if self.peek_byte_at(1) != Some(b'.') => single(self, Token::Dot),
            Some(b'.') => {
                while self.peek_byte() == Some(b'.') {
                    self.advance();
                }
                self.read_operator();
                Token::Operator(self.text(start))
            }
            Some(b'"') => {
                self.read_string(line, column)?;
                Token::Str(self.text(start))
            }
            Some(b'`') => {
                self.advance();
                self.read_name();
                if self.peek_byte() == Some(b'`') {
                    self.advance();
                }
                Token::Name(self.text(start))
            }
            Some(b'#') => {
                self.advance();
                self.read_name();
                Token::Name(self.text(start))
            }
            Some(b) if b.is_ascii_alphabetic() || b == b'_' || b == b'$' || b >= 0x80 => {
                self.advance();
                self.read_name();
                Token::Name(self.text(start))
            }
            Some(b) if b.is_ascii_digit() => self.read_number(start),
            Some(b) if OPERATOR_CHARS.contains(&b) => {
                self.read_operator();
                let text = self.text(start);
                if text == "=" {
                    Token::Equals
                } else {
                    Token::Operator(text)
                }
            }
            Some(_) => {
                self.advance();
                Token::Operator(self.text(start))
            }
        };

        Ok(Located {
            token,
            span: Span::new(start, self.pos, line, column),
            newline_before,
        })
    }

    /// Tokenize the whole input. The last token is always `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Located>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok.token == Token::Eof;
            tokens.push(tok);
            if done {
                return Ok(tokens);
            }
        }
    }
}
