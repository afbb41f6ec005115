use crate::grammar::Symbol;

/// A stack for an LR parser automaton. The entry for the start state is
/// implicit, so an empty stack is in state 0.
pub struct Stack<V> {
    elements: Vec<Frame<V>>,
}

#[derive(Debug, Clone, PartialEq)]
/// An entry on the stack: the state entered, the symbol shifted or reduced
/// to enter it, and that symbol's synthesized value
pub struct Frame<V> {
    pub state: usize,
    pub symbol: Symbol,
    pub value: V,
}

impl<V> Default for Stack<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Stack<V> {
    /// Creates a new stack in the start state
    pub fn new() -> Stack<V> {
        Stack {
            elements: Vec::new(),
        }
    }

    /// Returns the state associated with the entry at the top of the stack
    pub fn peek_state(&self) -> usize {
        self.elements.last().map_or(0, |f| f.state)
    }

    /// Pushes a frame onto the stack
    pub fn push(&mut self, state: usize, symbol: Symbol, value: V) {
        self.elements.push(Frame {
            state,
            symbol,
            value,
        });
    }

    /// Pops the frame at the top of the stack, if any
    pub fn pop(&mut self) -> Option<Frame<V>> {
        self.elements.pop()
    }

    /// Pops one frame per symbol in body and returns their values in body
    /// order. Returns None and leaves the stack untouched unless the
    /// symbols at the top of the stack match body exactly.
    pub fn pop_matching(&mut self, body: &[Symbol]) -> Option<Vec<V>> {
        if body.len() > self.elements.len() {
            return None;
        }

        let split = self.elements.len() - body.len();
        if !self.elements[split..]
            .iter()
            .map(|f| f.symbol)
            .eq(body.iter().copied())
        {
            return None;
        }

        Some(self.elements.drain(split..).map(|f| f.value).collect())
    }

    /// Returns the number of frames on the stack
    pub fn len(&self) -> usize {
        self.elements.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lexer::TokenKind;

    #[test]
    fn test_push_pop() {
        let mut stack: Stack<i64> = Stack::new();
        assert_eq!(stack.peek_state(), 0);
        assert_eq!(stack.len(), 0);

        stack.push(4, Symbol::Terminal(TokenKind::IntConst), 7);
        stack.push(2, Symbol::NonTerminal(1), 8);
        assert_eq!(stack.peek_state(), 2);
        assert_eq!(stack.len(), 2);

        let frame = stack.pop().unwrap();
        assert_eq!(frame.value, 8);
        assert_eq!(frame.symbol, Symbol::NonTerminal(1));
        assert_eq!(stack.peek_state(), 4);
    }

    #[test]
    fn test_pop_matching() {
        let mut stack: Stack<i64> = Stack::new();
        stack.push(1, Symbol::NonTerminal(1), 2);
        stack.push(3, Symbol::Terminal(TokenKind::Plus), 0);
        stack.push(5, Symbol::NonTerminal(1), 3);

        assert_eq!(
            stack.pop_matching(&[Symbol::NonTerminal(1), Symbol::Terminal(TokenKind::Star)]),
            None
        );
        assert_eq!(stack.len(), 3);

        assert_eq!(
            stack.pop_matching(&[
                Symbol::NonTerminal(1),
                Symbol::Terminal(TokenKind::Plus),
                Symbol::NonTerminal(1)
            ]),
            Some(vec![2, 0, 3])
        );
        assert_eq!(stack.len(), 0);

        assert_eq!(stack.pop_matching(&[]), Some(vec![]));
        assert_eq!(stack.pop_matching(&[Symbol::NonTerminal(1)]), None);
    }
}
