mod token;

use crate::diagnostics::Diagnostic;
use tracing::{debug, trace, warn};

pub use token::{Token, TokenKind, TokenValue};

/// Operators, with every two-character operator ahead of its
/// one-character prefix
const OPERATORS: [(&str, TokenKind); 23] = [
    ("==", TokenKind::Equal),
    ("!=", TokenKind::NotEqual),
    (">=", TokenKind::GreaterEqual),
    ("<=", TokenKind::LessEqual),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("?", TokenKind::Question),
    ("!", TokenKind::Not),
    ("=", TokenKind::Assign),
    (">", TokenKind::Greater),
    ("<", TokenKind::Less),
    (",", TokenKind::Comma),
    (":", TokenKind::Colon),
    (";", TokenKind::Semicolon),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
];

/// A forward-only scanner over a source text. Lexical errors are recorded
/// and recovered by skipping one character, so scanning always reaches the
/// end of the input.
pub struct Scanner {
    input: Vec<char>,
    cursor: usize,
    line: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Scanner {
    /// Returns a new scanner for the given input string
    pub fn new(input: &str) -> Scanner {
        Scanner {
            input: input.chars().collect(),
            cursor: 0,
            line: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Returns the current line number, beginning at 1
    pub fn line(&self) -> usize {
        self.line
    }

    /// Removes and returns the lexical diagnostics raised since the last
    /// call
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Returns the next token, or None at end of input
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            let lookahead = self.lookahead()?;

            let token = match lookahead {
                ' ' | '\t' | '\r' | '\n' => {
                    self.read();
                    None
                }
                '/' if self.peek(1) == Some('*') => {
                    self.discard_comment();
                    None
                }
                '"' => self.lex_string(),
                '\'' => self.lex_char(),
                c if c.is_ascii_alphabetic() => Some(self.lex_word()),
                c if c.is_ascii_digit() => Some(self.lex_integer()),
                _ => self.lex_operator(),
            };

            if let Some(token) = token {
                trace!(kind = ?token.kind, lexeme = %token.lexeme, line = token.line, "token");
                return Some(token);
            }
        }
    }

    /// Reads and discards a block comment. An unterminated comment is
    /// reported at its starting line and only its first character is
    /// consumed.
    fn discard_comment(&mut self) {
        let close = self.input[self.cursor + 2..]
            .windows(2)
            .position(|w| w == ['*', '/'])
            .map(|i| self.cursor + 2 + i);

        match close {
            Some(end) => {
                while self.cursor < end + 2 {
                    self.read();
                }
            }
            None => {
                self.error(Diagnostic::UnterminatedComment { line: self.line });
                self.read();
            }
        }
    }

    /// Records a lexical error
    fn error(&mut self, diagnostic: Diagnostic) {
        debug!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Records an invalid character error for the lookahead character and
    /// skips it
    fn invalid_character(&mut self) {
        let character = self.read();
        self.error(Diagnostic::InvalidCharacter {
            line: self.line,
            character,
        });
    }

    /// Lexes a character constant of the form 'c'
    fn lex_char(&mut self) -> Option<Token> {
        match (self.peek(1), self.peek(2)) {
            (Some(c), Some('\'')) if c != '\'' && c != '\n' => {
                let line = self.line;
                self.read();
                self.read();
                self.read();
                Some(Token {
                    kind: TokenKind::CharConst,
                    lexeme: format!("'{}'", c),
                    value: TokenValue::Char(c),
                    line,
                })
            }
            _ => {
                self.invalid_character();
                None
            }
        }
    }

    /// Lexes an integer constant, which is any sequence of digits
    fn lex_integer(&mut self) -> Token {
        let line = self.line;
        let lexeme = self.read_while(|c| c.is_ascii_digit());

        let value = lexeme.parse::<i64>().unwrap_or_else(|_| {
            warn!(line, "integer constant {} saturated", lexeme);
            i64::MAX
        });

        Token {
            kind: TokenKind::IntConst,
            lexeme,
            value: TokenValue::Integer(value),
            line,
        }
    }

    /// Lexes an operator or punctuation mark, preferring the longest match
    fn lex_operator(&mut self) -> Option<Token> {
        let line = self.line;

        for (op, kind) in OPERATORS.iter() {
            if self.starts_with(op) {
                for _ in 0..op.len() {
                    self.read();
                }
                return Some(Token::new(*kind, op, line));
            }
        }

        self.invalid_character();
        None
    }

    /// Lexes a string constant. A string containing a line break is
    /// reported and only its opening quote is consumed.
    fn lex_string(&mut self) -> Option<Token> {
        let Some(len) = self.input[self.cursor + 1..].iter().position(|c| *c == '"') else {
            self.invalid_character();
            return None;
        };

        let text: String = self.input[self.cursor + 1..self.cursor + 1 + len]
            .iter()
            .collect();

        if text.contains('\n') {
            self.error(Diagnostic::MultilineString { line: self.line });
            self.read();
            return None;
        }

        let line = self.line;
        for _ in 0..len + 2 {
            self.read();
        }

        Some(Token {
            kind: TokenKind::StringConst,
            lexeme: format!("\"{}\"", text),
            value: TokenValue::Text(text),
            line,
        })
    }

    /// Lexes an identifier, which is a letter followed by any sequence of
    /// letters and digits, and reclassifies it if it is a reserved word
    fn lex_word(&mut self) -> Token {
        let line = self.line;
        let lexeme = self.read_while(|c| c.is_ascii_alphanumeric());

        match TokenKind::keyword(&lexeme) {
            Some(kind) => Token::new(kind, &lexeme, line),
            None => Token {
                kind: TokenKind::Id,
                value: TokenValue::Text(lexeme.clone()),
                lexeme,
                line,
            },
        }
    }

    /// Returns the lookahead character
    fn lookahead(&self) -> Option<char> {
        self.peek(0)
    }

    /// Returns the character n places past the lookahead character
    fn peek(&self, n: usize) -> Option<char> {
        self.input.get(self.cursor + n).copied()
    }

    /// Reads and returns the next input character, counting line breaks.
    /// The caller must ensure the lookahead is valid.
    fn read(&mut self) -> char {
        let c = self.input[self.cursor];
        if c == '\n' {
            self.line += 1;
        }
        self.cursor += 1;

        c
    }

    /// Reads characters for as long as they satisfy the predicate
    fn read_while(&mut self, predicate: impl Fn(char) -> bool) -> String {
        let mut s = String::new();
        while let Some(c) = self.lookahead() {
            if !predicate(c) {
                break;
            }
            s.push(self.read());
        }

        s
    }

    /// Returns true if the remaining input begins with s
    fn starts_with(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.peek(i) == Some(c))
    }
}

impl Iterator for Scanner {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Scans an entire input string, returning every token and every lexical
/// diagnostic
pub fn tokenize(input: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut scanner = Scanner::new(input);
    let tokens: Vec<Token> = scanner.by_ref().collect();

    (tokens, scanner.take_diagnostics())
}
