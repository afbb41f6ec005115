//! Parse tree for a program, and the values synthesized on the parse stack
//! while it is built.

use crate::errors::{Error, Result};
use crate::lexer::{Token, TokenKind};
use crate::parsers::lr::Semantic;
use std::fmt;

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum Type {
    Int,
    Car,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Car => write!(f, "car"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A whole program: global declarations followed by the entry block
pub struct Program {
    pub declarations: Vec<Declaration>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Variables(VarDecl),
    Function(Function),
}

#[derive(Debug, Clone, PartialEq)]
/// One or more declarators sharing a type and a terminating semicolon
pub struct VarDecl {
    pub ty: Type,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, PartialEq)]
/// A declared variable. Arrays carry their declared length.
pub struct Declarator {
    pub name: String,
    pub size: Option<i64>,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub ty: Type,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: Type,
    pub name: String,
    pub is_array: bool,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
/// A block: local declarations followed by statements
pub struct Block {
    pub declarations: Vec<VarDecl>,
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Empty,
    Expr(Expr),
    Return(Expr),
    Read(LValue),
    Write(Expr),
    WriteString(String),
    NewLine,
    If {
        condition: Expr,
        then: Box<Stmt>,
        otherwise: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Block(Block),
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stmt::Empty => write!(f, "()"),
            Stmt::Expr(e) => write!(f, "{}", e),
            Stmt::Return(e) => write!(f, "(retorne {})", e),
            Stmt::Read(lv) => write!(f, "(leia {})", lv),
            Stmt::Write(e) => write!(f, "(escreva {})", e),
            Stmt::WriteString(s) => write!(f, "(escreva \"{}\")", s),
            Stmt::NewLine => write!(f, "(novalinha)"),
            Stmt::If {
                condition,
                then,
                otherwise: None,
            } => write!(f, "(se {} {})", condition, then),
            Stmt::If {
                condition,
                then,
                otherwise: Some(otherwise),
            } => write!(f, "(se {} {} {})", condition, then, otherwise),
            Stmt::While { condition, body } => write!(f, "(enquanto {} {})", condition, body),
            Stmt::Block(block) => {
                write!(f, "(bloco")?;
                for s in &block.statements {
                    write!(f, " {}", s)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// An assignment target or read statement target
pub enum LValue {
    Variable {
        name: String,
        line: usize,
    },
    Element {
        name: String,
        index: Box<Expr>,
        line: usize,
    },
}

impl fmt::Display for LValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LValue::Variable { name, .. } => write!(f, "{}", name),
            LValue::Element { name, index, .. } => write!(f, "(index {} {})", name, index),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Assign {
        target: LValue,
        value: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        line: usize,
    },
    Element {
        name: String,
        index: Box<Expr>,
        line: usize,
    },
    Variable {
        name: String,
        line: usize,
    },
    Int(i64),
    Char(char),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Assign { target, value } => write!(f, "(= {} {})", target, value),
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => write!(f, "(? {} {} {})", condition, then, otherwise),
            Expr::Binary { op, left, right } => write!(f, "({} {} {})", op, left, right),
            Expr::Unary { op, operand } => write!(f, "({} {})", op, operand),
            Expr::Call { name, args, .. } => {
                write!(f, "(call {}", name)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            Expr::Element { name, index, .. } => write!(f, "(index {} {})", name, index),
            Expr::Variable { name, .. } => write!(f, "{}", name),
            Expr::Int(n) => write!(f, "{}", n),
            Expr::Char(c) => write!(f, "'{}'", c),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum BinaryOp {
    Or,
    And,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    /// Returns the operator for a token kind, if it is a binary operator
    pub fn from_token_kind(kind: TokenKind) -> Option<BinaryOp> {
        Some(match kind {
            TokenKind::Ou => BinaryOp::Or,
            TokenKind::E => BinaryOp::And,
            TokenKind::Equal => BinaryOp::Equal,
            TokenKind::NotEqual => BinaryOp::NotEqual,
            TokenKind::Less => BinaryOp::Less,
            TokenKind::Greater => BinaryOp::Greater,
            TokenKind::LessEqual => BinaryOp::LessEqual,
            TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            _ => return None,
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            BinaryOp::Or => "ou",
            BinaryOp::And => "e",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A value on the parse stack: a shifted token, a finished tree node, or
/// one of the intermediate lists the grammar builds right to left
pub enum Node {
    Token(Token),
    Program(Program),
    Declarations(Vec<Declaration>),
    Declarators(Vec<Declarator>),
    FunctionTail(Vec<Param>, Block),
    Params(Vec<Param>),
    Block(Block),
    LocalDeclarations(Vec<VarDecl>),
    Type(Type),
    Statements(Vec<Stmt>),
    Statement(Stmt),
    LValue(LValue),
    Expr(Expr),
    Args(Vec<Expr>),
}

impl Semantic for Node {
    fn from_token(token: Token) -> Self {
        Node::Token(token)
    }
}

macro_rules! into_variant {
    ($name:ident, $variant:ident, $t:ty) => {
        pub fn $name(self) -> Result<$t> {
            match self {
                Node::$variant(v) => Ok(v),
                other => Err(other.mismatch(stringify!($variant))),
            }
        }
    };
}

impl Node {
    into_variant!(into_token, Token, Token);
    into_variant!(into_program, Program, Program);
    into_variant!(into_declarations, Declarations, Vec<Declaration>);
    into_variant!(into_declarators, Declarators, Vec<Declarator>);
    into_variant!(into_params, Params, Vec<Param>);
    into_variant!(into_block, Block, Block);
    into_variant!(into_local_declarations, LocalDeclarations, Vec<VarDecl>);
    into_variant!(into_type, Type, Type);
    into_variant!(into_statements, Statements, Vec<Stmt>);
    into_variant!(into_statement, Statement, Stmt);
    into_variant!(into_lvalue, LValue, LValue);
    into_variant!(into_expr, Expr, Expr);
    into_variant!(into_args, Args, Vec<Expr>);

    pub fn into_function_tail(self) -> Result<(Vec<Param>, Block)> {
        match self {
            Node::FunctionTail(params, block) => Ok((params, block)),
            other => Err(other.mismatch("FunctionTail")),
        }
    }

    /// Returns the name of the node's variant
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Token(_) => "Token",
            Node::Program(_) => "Program",
            Node::Declarations(_) => "Declarations",
            Node::Declarators(_) => "Declarators",
            Node::FunctionTail(..) => "FunctionTail",
            Node::Params(_) => "Params",
            Node::Block(_) => "Block",
            Node::LocalDeclarations(_) => "LocalDeclarations",
            Node::Type(_) => "Type",
            Node::Statements(_) => "Statements",
            Node::Statement(_) => "Statement",
            Node::LValue(_) => "LValue",
            Node::Expr(_) => "Expr",
            Node::Args(_) => "Args",
        }
    }

    fn mismatch(&self, want: &str) -> Error {
        Error::Reduction(format!("expected {}, found {}", want, self.kind()))
    }
}
