use std::collections::HashMap;

/// A symbol table for the non-terminals of a grammar. Terminals need no
/// entry, since they are token kinds.
pub struct SymbolTable {
    names: Vec<String>,
    ids: HashMap<String, usize>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Returns a new symbol table
    pub fn new() -> SymbolTable {
        SymbolTable {
            names: Vec::new(),
            ids: HashMap::new(),
        }
    }

    /// Adds a non-terminal to the symbol table and returns its ID. If the
    /// non-terminal is already in the symbol table, its existing ID is
    /// returned.
    pub fn add_non_terminal(&mut self, name: &str) -> usize {
        if let Some(id) = self.ids.get(name) {
            *id
        } else {
            let id = self.len();
            self.ids.insert(name.to_string(), id);
            self.names.push(name.to_string());
            id
        }
    }

    /// Returns the ID of the non-terminal with the given name, if any
    pub fn maybe_non_terminal_index(&self, name: &str) -> Option<usize> {
        self.ids.get(name).copied()
    }

    /// Returns the number of symbols in the symbol table
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns the name of the non-terminal with the given ID. Panics if
    /// there is no such non-terminal.
    pub fn non_terminal_name(&self, i: usize) -> &str {
        &self.names[i]
    }
}
