//! The productions of the language and the combinators which build its
//! parse tree.

use super::ast::*;
use crate::errors::{Error, Result};
use crate::grammar::{Assoc, BodySymbol::*, Grammar, GrammarBuilder};
use crate::lexer::{Token, TokenKind::*, TokenValue};

/// Returns the grammar of the language
pub fn grammar() -> Result<Grammar<Node>> {
    let mut g = GrammarBuilder::new();

    g.rule("program", &[N("declarations"), N("entry_block")], Some(program))
        .rule("entry_block", &[T(Programa), N("block")], Some(second));

    // Global declarations
    g.rule(
        "declarations",
        &[N("type"), T(Id), N("decl_tail"), T(Semicolon), N("declarations")],
        Some(scalar_declarations),
    )
    .rule(
        "declarations",
        &[
            N("type"),
            T(Id),
            T(LBracket),
            T(IntConst),
            T(RBracket),
            N("decl_tail"),
            T(Semicolon),
            N("declarations"),
        ],
        Some(array_declarations),
    )
    .rule(
        "declarations",
        &[N("type"), T(Id), N("function_tail"), N("declarations")],
        Some(function_declaration),
    )
    .rule("declarations", &[], Some(no_declarations));

    g.rule(
        "decl_tail",
        &[T(Comma), T(Id), N("decl_tail")],
        Some(scalar_declarator),
    )
    .rule(
        "decl_tail",
        &[T(Comma), T(Id), T(LBracket), T(IntConst), T(RBracket), N("decl_tail")],
        Some(array_declarator),
    )
    .rule("decl_tail", &[], Some(no_declarators));

    // Functions
    g.rule(
        "function_tail",
        &[T(LParen), N("params"), T(RParen), N("block")],
        Some(function_tail),
    )
    .rule("params", &[N("param_list")], None)
    .rule("params", &[], Some(no_params))
    .rule("param_list", &[N("type"), T(Id)], Some(param))
    .rule(
        "param_list",
        &[N("type"), T(Id), T(LBracket), T(RBracket)],
        Some(param),
    )
    .rule(
        "param_list",
        &[N("type"), T(Id), T(Comma), N("param_list")],
        Some(param),
    )
    .rule(
        "param_list",
        &[N("type"), T(Id), T(LBracket), T(RBracket), T(Comma), N("param_list")],
        Some(param),
    );

    // Blocks
    g.rule(
        "block",
        &[T(LBrace), N("local_decls"), N("stmt_list"), T(RBrace)],
        Some(block),
    )
    .rule(
        "block",
        &[T(LBrace), N("local_decls"), T(RBrace)],
        Some(block),
    )
    .rule(
        "local_decls",
        &[N("type"), T(Id), N("decl_tail"), T(Semicolon), N("local_decls")],
        Some(scalar_local_declarations),
    )
    .rule(
        "local_decls",
        &[
            N("type"),
            T(Id),
            T(LBracket),
            T(IntConst),
            T(RBracket),
            N("decl_tail"),
            T(Semicolon),
            N("local_decls"),
        ],
        Some(array_local_declarations),
    )
    .rule("local_decls", &[], Some(no_local_declarations))
    .rule("type", &[T(Int)], Some(int_type))
    .rule("type", &[T(Car)], Some(car_type));

    // Statements
    g.rule("stmt_list", &[N("stmt")], Some(statements))
        .rule("stmt_list", &[N("stmt"), N("stmt_list")], Some(statements))
        .rule("stmt", &[T(Semicolon)], Some(empty_statement))
        .rule("stmt", &[N("expr"), T(Semicolon)], Some(expr_statement))
        .rule(
            "stmt",
            &[T(Retorne), N("expr"), T(Semicolon)],
            Some(return_statement),
        )
        .rule(
            "stmt",
            &[T(Leia), N("lvalue"), T(Semicolon)],
            Some(read_statement),
        )
        .rule(
            "stmt",
            &[T(Escreva), N("expr"), T(Semicolon)],
            Some(write_statement),
        )
        .rule(
            "stmt",
            &[T(Escreva), T(StringConst), T(Semicolon)],
            Some(write_string_statement),
        )
        .rule(
            "stmt",
            &[T(NovaLinha), T(Semicolon)],
            Some(newline_statement),
        )
        .rule(
            "stmt",
            &[T(Se), T(LParen), N("expr"), T(RParen), T(Entao), N("stmt")],
            Some(if_statement),
        )
        .rule(
            "stmt",
            &[
                T(Se),
                T(LParen),
                N("expr"),
                T(RParen),
                T(Entao),
                N("stmt"),
                T(Senao),
                N("stmt"),
            ],
            Some(if_statement),
        )
        .rule(
            "stmt",
            &[T(Enquanto), T(LParen), N("expr"), T(RParen), T(Execute), N("stmt")],
            Some(while_statement),
        )
        .rule("stmt", &[N("block")], Some(block_statement));

    // Expressions
    g.rule("expr", &[N("assign_expr")], None)
        .rule("assign_expr", &[N("cond_expr")], None)
        .rule(
            "assign_expr",
            &[N("lvalue"), T(Assign), N("assign_expr")],
            Some(assignment),
        )
        .rule("cond_expr", &[N("op_expr")], None)
        .rule(
            "cond_expr",
            &[N("op_expr"), T(Question), N("expr"), T(Colon), N("cond_expr")],
            Some(conditional),
        );

    for op in [
        Ou,
        E,
        Equal,
        NotEqual,
        Less,
        Greater,
        LessEqual,
        GreaterEqual,
        Plus,
        Minus,
        Star,
        Slash,
        Percent,
    ] {
        g.rule("op_expr", &[N("op_expr"), T(op), N("op_expr")], Some(binary));
    }

    g.rule_with_precedence("op_expr", &[T(Minus), N("op_expr")], Some(unary), Not)
        .rule("op_expr", &[T(Not), N("op_expr")], Some(unary))
        .rule("op_expr", &[N("primary")], None)
        .rule(
            "lvalue",
            &[T(Id), T(LBracket), N("expr"), T(RBracket)],
            Some(element_lvalue),
        )
        .rule("lvalue", &[T(Id)], Some(variable_lvalue))
        .rule(
            "primary",
            &[T(Id), T(LParen), N("args"), T(RParen)],
            Some(call),
        )
        .rule("primary", &[T(Id), T(LParen), T(RParen)], Some(call))
        .rule(
            "primary",
            &[T(Id), T(LBracket), N("expr"), T(RBracket)],
            Some(element),
        )
        .rule("primary", &[T(Id)], Some(variable))
        .rule("primary", &[T(CharConst)], Some(constant))
        .rule("primary", &[T(IntConst)], Some(constant))
        .rule(
            "primary",
            &[T(LParen), N("expr"), T(RParen)],
            Some(second),
        )
        .rule("args", &[N("assign_expr")], Some(args))
        .rule(
            "args",
            &[N("args"), T(Comma), N("assign_expr")],
            Some(args),
        );

    g.precedence(Assoc::Right, &[Assign])
        .precedence(Assoc::Right, &[Question, Colon])
        .precedence(Assoc::Left, &[Ou])
        .precedence(Assoc::Left, &[E])
        .precedence(Assoc::Left, &[Equal, NotEqual])
        .precedence(Assoc::Left, &[Less, Greater, LessEqual, GreaterEqual])
        .precedence(Assoc::Left, &[Plus, Minus])
        .precedence(Assoc::Left, &[Star, Slash, Percent])
        .precedence(Assoc::Right, &[Not]);

    g.build()
}

/// Converts the values of a production body into an array of known length
fn take<const LEN: usize>(values: Vec<Node>) -> Result<[Node; LEN]> {
    values.try_into().map_err(|v: Vec<Node>| {
        Error::Reduction(format!("expected {} values, found {}", LEN, v.len()))
    })
}

/// Returns the value of an integer constant token
fn integer(token: &Token) -> Result<i64> {
    match token.value {
        TokenValue::Integer(n) => Ok(n),
        _ => Err(Error::Reduction(format!(
            "expected an integer constant, found '{}'",
            token.lexeme
        ))),
    }
}

/// Passes through the value of the second body symbol
fn second(values: Vec<Node>) -> Result<Node> {
    values
        .into_iter()
        .nth(1)
        .ok_or_else(|| Error::Reduction(String::from("expected a second value")))
}

fn program(values: Vec<Node>) -> Result<Node> {
    let [declarations, block] = take(values)?;
    Ok(Node::Program(Program {
        declarations: declarations.into_declarations()?,
        body: block.into_block()?,
    }))
}

/// Builds the declarators of `id decl_tail` or `id [ n ] decl_tail`
fn declarators(id: Node, size: Option<Node>, tail: Node) -> Result<Vec<Declarator>> {
    let id = id.into_token()?;
    let size = match size {
        Some(n) => Some(integer(&n.into_token()?)?),
        None => None,
    };

    let mut declarators = vec![Declarator {
        name: id.lexeme,
        size,
        line: id.line,
    }];
    declarators.extend(tail.into_declarators()?);
    Ok(declarators)
}

fn prepend<X>(first: X, rest: Vec<X>) -> Vec<X> {
    let mut all = Vec::with_capacity(rest.len() + 1);
    all.push(first);
    all.extend(rest);
    all
}

fn scalar_declarations(values: Vec<Node>) -> Result<Node> {
    let [ty, id, tail, _, rest] = take(values)?;
    let decl = VarDecl {
        ty: ty.into_type()?,
        declarators: declarators(id, None, tail)?,
    };
    Ok(Node::Declarations(prepend(
        Declaration::Variables(decl),
        rest.into_declarations()?,
    )))
}

fn array_declarations(values: Vec<Node>) -> Result<Node> {
    let [ty, id, _, size, _, tail, _, rest] = take(values)?;
    let decl = VarDecl {
        ty: ty.into_type()?,
        declarators: declarators(id, Some(size), tail)?,
    };
    Ok(Node::Declarations(prepend(
        Declaration::Variables(decl),
        rest.into_declarations()?,
    )))
}

fn function_declaration(values: Vec<Node>) -> Result<Node> {
    let [ty, id, tail, rest] = take(values)?;
    let id = id.into_token()?;
    let (params, body) = tail.into_function_tail()?;
    let function = Function {
        ty: ty.into_type()?,
        name: id.lexeme,
        params,
        body,
        line: id.line,
    };
    Ok(Node::Declarations(prepend(
        Declaration::Function(function),
        rest.into_declarations()?,
    )))
}

fn no_declarations(_: Vec<Node>) -> Result<Node> {
    Ok(Node::Declarations(Vec::new()))
}

fn scalar_declarator(values: Vec<Node>) -> Result<Node> {
    let [_, id, tail] = take(values)?;
    Ok(Node::Declarators(declarators(id, None, tail)?))
}

fn array_declarator(values: Vec<Node>) -> Result<Node> {
    let [_, id, _, size, _, tail] = take(values)?;
    Ok(Node::Declarators(declarators(id, Some(size), tail)?))
}

fn no_declarators(_: Vec<Node>) -> Result<Node> {
    Ok(Node::Declarators(Vec::new()))
}

fn function_tail(values: Vec<Node>) -> Result<Node> {
    let [_, params, _, block] = take(values)?;
    Ok(Node::FunctionTail(params.into_params()?, block.into_block()?))
}

fn no_params(_: Vec<Node>) -> Result<Node> {
    Ok(Node::Params(Vec::new()))
}

/// Builds a parameter list from any of the four parameter list forms,
/// which differ only in their array marker and continuation
fn param(values: Vec<Node>) -> Result<Node> {
    let is_array = matches!(values.get(2), Some(Node::Token(t)) if t.kind == LBracket);

    let mut values = values.into_iter();
    let (Some(ty), Some(id)) = (values.next(), values.next()) else {
        return Err(Error::Reduction(String::from("expected a typed parameter")));
    };
    let id = id.into_token()?;

    let param = Param {
        ty: ty.into_type()?,
        name: id.lexeme,
        is_array,
        line: id.line,
    };

    let rest = match values.last() {
        Some(Node::Params(rest)) => rest,
        _ => Vec::new(),
    };

    Ok(Node::Params(prepend(param, rest)))
}

fn block(values: Vec<Node>) -> Result<Node> {
    let mut values = values.into_iter().skip(1);
    let declarations = match values.next() {
        Some(node) => node.into_local_declarations()?,
        None => return Err(Error::Reduction(String::from("expected local declarations"))),
    };
    let statements = match values.next() {
        Some(Node::Statements(statements)) => statements,
        _ => Vec::new(),
    };

    Ok(Node::Block(Block {
        declarations,
        statements,
    }))
}

fn scalar_local_declarations(values: Vec<Node>) -> Result<Node> {
    let [ty, id, tail, _, rest] = take(values)?;
    let decl = VarDecl {
        ty: ty.into_type()?,
        declarators: declarators(id, None, tail)?,
    };
    Ok(Node::LocalDeclarations(prepend(
        decl,
        rest.into_local_declarations()?,
    )))
}

fn array_local_declarations(values: Vec<Node>) -> Result<Node> {
    let [ty, id, _, size, _, tail, _, rest] = take(values)?;
    let decl = VarDecl {
        ty: ty.into_type()?,
        declarators: declarators(id, Some(size), tail)?,
    };
    Ok(Node::LocalDeclarations(prepend(
        decl,
        rest.into_local_declarations()?,
    )))
}

fn no_local_declarations(_: Vec<Node>) -> Result<Node> {
    Ok(Node::LocalDeclarations(Vec::new()))
}

fn int_type(_: Vec<Node>) -> Result<Node> {
    Ok(Node::Type(Type::Int))
}

fn car_type(_: Vec<Node>) -> Result<Node> {
    Ok(Node::Type(Type::Car))
}

/// Builds `stmt` or `stmt stmt_list` into a statement list
fn statements(values: Vec<Node>) -> Result<Node> {
    let mut values = values.into_iter();
    let first = match values.next() {
        Some(node) => node.into_statement()?,
        None => return Err(Error::Reduction(String::from("expected a statement"))),
    };
    let rest = match values.next() {
        Some(node) => node.into_statements()?,
        None => Vec::new(),
    };

    Ok(Node::Statements(prepend(first, rest)))
}

fn empty_statement(_: Vec<Node>) -> Result<Node> {
    Ok(Node::Statement(Stmt::Empty))
}

fn expr_statement(values: Vec<Node>) -> Result<Node> {
    let [expr, _] = take(values)?;
    Ok(Node::Statement(Stmt::Expr(expr.into_expr()?)))
}

fn return_statement(values: Vec<Node>) -> Result<Node> {
    let [_, expr, _] = take(values)?;
    Ok(Node::Statement(Stmt::Return(expr.into_expr()?)))
}

fn read_statement(values: Vec<Node>) -> Result<Node> {
    let [_, lvalue, _] = take(values)?;
    Ok(Node::Statement(Stmt::Read(lvalue.into_lvalue()?)))
}

fn write_statement(values: Vec<Node>) -> Result<Node> {
    let [_, expr, _] = take(values)?;
    Ok(Node::Statement(Stmt::Write(expr.into_expr()?)))
}

fn write_string_statement(values: Vec<Node>) -> Result<Node> {
    let [_, string, _] = take(values)?;
    let string = string.into_token()?;
    let text = string.text().unwrap_or_default().to_string();
    Ok(Node::Statement(Stmt::WriteString(text)))
}

fn newline_statement(_: Vec<Node>) -> Result<Node> {
    Ok(Node::Statement(Stmt::NewLine))
}

/// Builds `se ( expr ) entao stmt` with or without a `senao stmt` clause
fn if_statement(values: Vec<Node>) -> Result<Node> {
    let mut values = values.into_iter();
    let (Some(condition), Some(then)) = (values.nth(2), values.nth(2)) else {
        return Err(Error::Reduction(String::from("expected a condition")));
    };
    let otherwise = match values.nth(1) {
        Some(node) => Some(Box::new(node.into_statement()?)),
        None => None,
    };

    Ok(Node::Statement(Stmt::If {
        condition: condition.into_expr()?,
        then: Box::new(then.into_statement()?),
        otherwise,
    }))
}

fn while_statement(values: Vec<Node>) -> Result<Node> {
    let [_, _, condition, _, _, body] = take(values)?;
    Ok(Node::Statement(Stmt::While {
        condition: condition.into_expr()?,
        body: Box::new(body.into_statement()?),
    }))
}

fn block_statement(values: Vec<Node>) -> Result<Node> {
    let [block] = take(values)?;
    Ok(Node::Statement(Stmt::Block(block.into_block()?)))
}

fn assignment(values: Vec<Node>) -> Result<Node> {
    let [target, _, value] = take(values)?;
    Ok(Node::Expr(Expr::Assign {
        target: target.into_lvalue()?,
        value: Box::new(value.into_expr()?),
    }))
}

fn conditional(values: Vec<Node>) -> Result<Node> {
    let [condition, _, then, _, otherwise] = take(values)?;
    Ok(Node::Expr(Expr::Conditional {
        condition: Box::new(condition.into_expr()?),
        then: Box::new(then.into_expr()?),
        otherwise: Box::new(otherwise.into_expr()?),
    }))
}

fn binary(values: Vec<Node>) -> Result<Node> {
    let [left, op, right] = take(values)?;
    let op = op.into_token()?;
    let Some(op) = BinaryOp::from_token_kind(op.kind) else {
        return Err(Error::Reduction(format!(
            "'{}' is not a binary operator",
            op.lexeme
        )));
    };

    Ok(Node::Expr(Expr::Binary {
        op,
        left: Box::new(left.into_expr()?),
        right: Box::new(right.into_expr()?),
    }))
}

fn unary(values: Vec<Node>) -> Result<Node> {
    let [op, operand] = take(values)?;
    let op = match op.into_token()?.kind {
        Minus => UnaryOp::Neg,
        _ => UnaryOp::Not,
    };

    Ok(Node::Expr(Expr::Unary {
        op,
        operand: Box::new(operand.into_expr()?),
    }))
}

fn element_lvalue(values: Vec<Node>) -> Result<Node> {
    let [id, _, index, _] = take(values)?;
    let id = id.into_token()?;
    Ok(Node::LValue(LValue::Element {
        name: id.lexeme,
        index: Box::new(index.into_expr()?),
        line: id.line,
    }))
}

fn variable_lvalue(values: Vec<Node>) -> Result<Node> {
    let [id] = take(values)?;
    let id = id.into_token()?;
    Ok(Node::LValue(LValue::Variable {
        name: id.lexeme,
        line: id.line,
    }))
}

/// Builds `id ( args )` or `id ( )`
fn call(values: Vec<Node>) -> Result<Node> {
    let mut values = values.into_iter();
    let id = match values.next() {
        Some(node) => node.into_token()?,
        None => return Err(Error::Reduction(String::from("expected a function name"))),
    };
    let args = match values.nth(1) {
        Some(Node::Args(args)) => args,
        _ => Vec::new(),
    };

    Ok(Node::Expr(Expr::Call {
        name: id.lexeme,
        args,
        line: id.line,
    }))
}

fn element(values: Vec<Node>) -> Result<Node> {
    let [id, _, index, _] = take(values)?;
    let id = id.into_token()?;
    Ok(Node::Expr(Expr::Element {
        name: id.lexeme,
        index: Box::new(index.into_expr()?),
        line: id.line,
    }))
}

fn variable(values: Vec<Node>) -> Result<Node> {
    let [id] = take(values)?;
    let id = id.into_token()?;
    Ok(Node::Expr(Expr::Variable {
        name: id.lexeme,
        line: id.line,
    }))
}

fn constant(values: Vec<Node>) -> Result<Node> {
    let [token] = take(values)?;
    let token = token.into_token()?;
    match token.value {
        TokenValue::Integer(n) => Ok(Node::Expr(Expr::Int(n))),
        TokenValue::Char(c) => Ok(Node::Expr(Expr::Char(c))),
        _ => Err(Error::Reduction(format!(
            "expected a constant, found '{}'",
            token.lexeme
        ))),
    }
}

/// Builds `assign_expr` or `args , assign_expr` into an argument list
fn args(values: Vec<Node>) -> Result<Node> {
    let mut values = values.into_iter();
    let (mut args, last) = match (values.next(), values.nth(1)) {
        (Some(args), Some(last)) => (args.into_args()?, last),
        (Some(first), None) => (Vec::new(), first),
        _ => return Err(Error::Reduction(String::from("expected an argument"))),
    };

    args.push(last.into_expr()?);
    Ok(Node::Args(args))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grammar::Symbol;
    use crate::lexer::TokenKind;

    #[test]
    fn test_grammar() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let g = grammar()?;

        assert_eq!(g.num_productions(), 69);
        assert_eq!(g.non_terminal_name(g.start()), "program'");
        assert_eq!(
            g.format_production(1),
            "program → declarations entry_block"
        );

        Ok(())
    }

    #[test]
    fn test_unary_minus_precedence() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let g = grammar()?;

        let unary = (0..g.num_productions())
            .find(|p| {
                g.production(*p).body.first() == Some(&Symbol::Terminal(TokenKind::Minus))
            })
            .ok_or("no unary minus production")?;

        assert_eq!(
            g.production_precedence(unary),
            g.terminal_precedence(TokenKind::Not)
        );

        Ok(())
    }

    #[test]
    fn test_take() {
        let values = vec![Node::Type(Type::Int), Node::Args(Vec::new())];
        assert!(take::<2>(values.clone()).is_ok());
        assert_eq!(
            take::<3>(values).err(),
            Some(Error::Reduction(String::from("expected 3 values, found 2")))
        );
    }
}
