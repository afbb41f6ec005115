use crate::lexer::TokenKind;

/// A context-free grammar symbol. Terminals are token kinds; non-terminals
/// are indexes into the grammar's symbol table.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Symbol {
    Terminal(TokenKind),
    NonTerminal(usize),
}

impl Symbol {
    /// Returns the parse table column for the symbol. Terminal columns come
    /// first, followed by one column per non-terminal.
    pub fn id(&self) -> usize {
        match self {
            Symbol::Terminal(t) => t.index(),
            Symbol::NonTerminal(n) => TokenKind::COUNT + n,
        }
    }
}

/// A grammar symbol as written in a rule definition, before non-terminal
/// names are resolved
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BodySymbol {
    T(TokenKind),
    N(&'static str),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ids() {
        assert_eq!(Symbol::Terminal(TokenKind::Programa).id(), 0);
        assert_eq!(
            Symbol::Terminal(TokenKind::EndOfInput).id(),
            TokenKind::COUNT - 1
        );
        assert_eq!(Symbol::NonTerminal(0).id(), TokenKind::COUNT);
        assert_eq!(Symbol::NonTerminal(3).id(), TokenKind::COUNT + 3);
    }

    #[test]
    fn test_ordering() {
        assert!(Symbol::Terminal(TokenKind::EndOfInput) < Symbol::NonTerminal(0));
        assert!(Symbol::NonTerminal(1) < Symbol::NonTerminal(2));
        assert!(Symbol::Terminal(TokenKind::Se) < Symbol::Terminal(TokenKind::Senao));
    }
}
