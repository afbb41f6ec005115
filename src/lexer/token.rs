use std::fmt;

#[derive(Debug, Clone, PartialEq)]
/// A lexical token with its source line. The lexeme is kept verbatim so
/// that syntax errors can quote it.
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub value: TokenValue,
    pub line: usize,
}

impl Token {
    /// Returns a new token whose value carries no data
    pub fn new(kind: TokenKind, lexeme: &str, line: usize) -> Token {
        Token {
            kind,
            lexeme: lexeme.to_string(),
            value: TokenValue::None,
            line,
        }
    }

    /// Returns the end-of-input marker for the given line
    pub fn end_of_input(line: usize) -> Token {
        Token::new(TokenKind::EndOfInput, "EOF", line)
    }

    /// Returns the identifier or string text carried by the token, if any
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.lexeme)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// The typed value of a token
pub enum TokenValue {
    None,
    Text(String),
    Integer(i64),
    Char(char),
}

#[derive(Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Clone, Copy)]
/// The terminal tag of a token. Also used as the terminal symbols of a
/// grammar, so the discriminant doubles as a parse table column.
pub enum TokenKind {
    Programa,
    Retorne,
    Leia,
    Escreva,
    NovaLinha,
    Se,
    Entao,
    Senao,
    Enquanto,
    Execute,
    E,
    Ou,
    Int,
    Car,
    Id,
    IntConst,
    CharConst,
    StringConst,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Question,
    Not,
    Equal,
    NotEqual,
    Assign,
    GreaterEqual,
    Greater,
    LessEqual,
    Less,
    Comma,
    Colon,
    Semicolon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    EndOfInput,
}

/// Reserved words, matched only against a complete identifier lexeme
const RESERVED_WORDS: [(&str, TokenKind); 14] = [
    ("programa", TokenKind::Programa),
    ("retorne", TokenKind::Retorne),
    ("leia", TokenKind::Leia),
    ("escreva", TokenKind::Escreva),
    ("novalinha", TokenKind::NovaLinha),
    ("se", TokenKind::Se),
    ("entao", TokenKind::Entao),
    ("senao", TokenKind::Senao),
    ("enquanto", TokenKind::Enquanto),
    ("execute", TokenKind::Execute),
    ("e", TokenKind::E),
    ("ou", TokenKind::Ou),
    ("int", TokenKind::Int),
    ("car", TokenKind::Car),
];

impl TokenKind {
    /// Every token kind, in discriminant order
    pub const ALL: [TokenKind; 42] = [
        TokenKind::Programa,
        TokenKind::Retorne,
        TokenKind::Leia,
        TokenKind::Escreva,
        TokenKind::NovaLinha,
        TokenKind::Se,
        TokenKind::Entao,
        TokenKind::Senao,
        TokenKind::Enquanto,
        TokenKind::Execute,
        TokenKind::E,
        TokenKind::Ou,
        TokenKind::Int,
        TokenKind::Car,
        TokenKind::Id,
        TokenKind::IntConst,
        TokenKind::CharConst,
        TokenKind::StringConst,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::Percent,
        TokenKind::Question,
        TokenKind::Not,
        TokenKind::Equal,
        TokenKind::NotEqual,
        TokenKind::Assign,
        TokenKind::GreaterEqual,
        TokenKind::Greater,
        TokenKind::LessEqual,
        TokenKind::Less,
        TokenKind::Comma,
        TokenKind::Colon,
        TokenKind::Semicolon,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::LBracket,
        TokenKind::RBracket,
        TokenKind::LBrace,
        TokenKind::RBrace,
        TokenKind::EndOfInput,
    ];

    /// The number of token kinds
    pub const COUNT: usize = TokenKind::ALL.len();

    /// Returns the keyword kind for a complete identifier lexeme, if it is
    /// a reserved word
    pub fn keyword(lexeme: &str) -> Option<TokenKind> {
        RESERVED_WORDS
            .iter()
            .find(|(word, _)| *word == lexeme)
            .map(|(_, kind)| *kind)
    }

    /// Returns the table column for this kind
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some((word, _)) = RESERVED_WORDS.iter().find(|(_, kind)| kind == self) {
            return write!(f, "{}", word);
        }

        let s = match self {
            TokenKind::Id => "ID",
            TokenKind::IntConst => "INTCONST",
            TokenKind::CharConst => "CARCONST",
            TokenKind::StringConst => "CADEIACARACTERES",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Question => "'?'",
            TokenKind::Not => "'!'",
            TokenKind::Equal => "'=='",
            TokenKind::NotEqual => "'!='",
            TokenKind::Assign => "'='",
            TokenKind::GreaterEqual => "'>='",
            TokenKind::Greater => "'>'",
            TokenKind::LessEqual => "'<='",
            TokenKind::Less => "'<'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::EndOfInput => "$",
            _ => "?",
        };

        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenKind::keyword("se"), Some(TokenKind::Se));
        assert_eq!(TokenKind::keyword("senao"), Some(TokenKind::Senao));
        assert_eq!(TokenKind::keyword("e"), Some(TokenKind::E));
        assert_eq!(TokenKind::keyword("car"), Some(TokenKind::Car));
        assert_eq!(TokenKind::keyword("sena"), None);
        assert_eq!(TokenKind::keyword("senaox"), None);
        assert_eq!(TokenKind::keyword("Se"), None);
    }

    #[test]
    fn test_index_matches_position() {
        for (i, kind) in TokenKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert_eq!(TokenKind::COUNT, 42);
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::Enquanto.to_string(), "enquanto");
        assert_eq!(TokenKind::LessEqual.to_string(), "'<='");
        assert_eq!(TokenKind::Id.to_string(), "ID");
    }
}
