use cafezinho::analyze;
use cafezinho::diagnostics::{Diagnostic, Diagnostics};
use cafezinho::errors::Error;
use cafezinho::syntax::ast::{Declaration, Declarator, Stmt, Type, VarDecl};
use pretty_assertions::assert_eq;
mod common;

/// Helper function to parse a program body and render its statements
fn statements(source: &str) -> std::result::Result<Vec<String>, Box<dyn std::error::Error>> {
    let mut diagnostics = Diagnostics::new();
    let program = analyze(source, &mut diagnostics)?;
    assert!(diagnostics.is_empty());

    Ok(program.body.statements.iter().map(|s| s.to_string()).collect())
}

#[test]
fn test_minimal_program() -> std::result::Result<(), Box<dyn std::error::Error>> {
    assert!(statements("programa{}")?.is_empty());

    Ok(())
}

#[test]
fn test_dangling_else() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut diagnostics = Diagnostics::new();
    let program = analyze(
        "programa { se(1)entao se(2)entao a=1; senao a=2; }",
        &mut diagnostics,
    )?;

    let Stmt::If { then, otherwise, .. } = &program.body.statements[0] else {
        panic!("expected a conditional statement");
    };
    assert!(otherwise.is_none());
    assert!(matches!(
        then.as_ref(),
        Stmt::If {
            otherwise: Some(_),
            ..
        }
    ));
    assert_eq!(
        program.body.statements[0].to_string(),
        "(se 1 (se 2 (= a 1) (= a 2)))"
    );

    Ok(())
}

#[test]
fn test_declarator_chain() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut diagnostics = Diagnostics::new();
    let program = analyze("int v[10], x;\nprograma{}", &mut diagnostics)?;

    assert_eq!(
        program.declarations,
        vec![Declaration::Variables(VarDecl {
            ty: Type::Int,
            declarators: vec![
                Declarator {
                    name: String::from("v"),
                    size: Some(10),
                    line: 1
                },
                Declarator {
                    name: String::from("x"),
                    size: None,
                    line: 1
                },
            ]
        })]
    );

    Ok(())
}

#[test]
fn test_operator_precedence() -> std::result::Result<(), Box<dyn std::error::Error>> {
    assert_eq!(
        statements(concat!(
            "programa {\n",
            "  x = 2 + 2 * 3;\n",
            "  y = a ou b e !c == d;\n",
            "  z = -a * b - c;\n",
            "  w = a ? b : c ? d : f;\n",
            "  a = b = 3;\n",
            "  v[i] = f(1, 2) + g() % v[0];\n",
            "  a < b != c >= d;\n",
            "}"
        ))?,
        vec![
            "(= x (+ 2 (* 2 3)))",
            "(= y (ou a (e b (== (! c) d))))",
            "(= z (- (* (- a) b) c))",
            "(= w (? a b (? c d f)))",
            "(= a (= b 3))",
            "(= (index v i) (+ (call f 1 2) (% (call g) (index v 0))))",
            "(!= (< a b) (>= c d))",
        ]
    );

    Ok(())
}

#[test]
fn test_statements() -> std::result::Result<(), Box<dyn std::error::Error>> {
    assert_eq!(
        statements(concat!(
            "programa {\n",
            "  int i; car c[4];\n",
            "  leia c[i];\n",
            "  escreva \"ola\";\n",
            "  escreva 'x';\n",
            "  novalinha;\n",
            "  enquanto (i) execute { i = i - 1; ; }\n",
            "  retorne 0;\n",
            "}"
        ))?,
        vec![
            "(leia (index c i))",
            "(escreva \"ola\")",
            "(escreva 'x')",
            "(novalinha)",
            "(enquanto i (bloco (= i (- i 1)) ()))",
            "(retorne 0)",
        ]
    );

    Ok(())
}

#[test]
fn test_syntax_error() {
    let mut diagnostics = Diagnostics::new();
    let result = analyze("programa {\n x = 1\n}", &mut diagnostics);

    assert_eq!(
        result,
        Err(Error::Syntax {
            lexeme: String::from("}"),
            line: 3
        })
    );
    assert_eq!(
        diagnostics.into_vec(),
        vec![Diagnostic::UnexpectedToken {
            line: 3,
            lexeme: String::from("}")
        }]
    );
}

#[test]
fn test_syntax_error_at_end_of_input() {
    let mut diagnostics = Diagnostics::new();
    let result = analyze("programa {\n", &mut diagnostics);

    assert!(result.is_err());
    assert_eq!(diagnostics.reported().len(), 1);
    assert_eq!(diagnostics.reported()[0].to_string(), "ERRO: 'EOF' (linha 2)");
}

#[test]
fn test_read_needs_semicolon() {
    let mut diagnostics = Diagnostics::new();
    let result = analyze("programa { leia x: }", &mut diagnostics);

    assert!(result.is_err());
    assert_eq!(
        diagnostics.into_vec(),
        vec![Diagnostic::UnexpectedToken {
            line: 1,
            lexeme: String::from(":")
        }]
    );
}

#[test]
fn test_diagnostics_in_source_order() {
    let mut diagnostics = Diagnostics::new();
    let result = analyze(&common::read_test_file("erros.cz"), &mut diagnostics);

    assert!(result.is_err());
    assert_eq!(
        diagnostics.into_vec(),
        vec![
            Diagnostic::InvalidCharacter {
                line: 4,
                character: '@'
            },
            Diagnostic::InvalidCharacter {
                line: 7,
                character: '#'
            },
            Diagnostic::UnexpectedToken {
                line: 7,
                lexeme: String::from("3")
            },
        ]
    );
}

#[test]
fn test_sample_programs() -> std::result::Result<(), Box<dyn std::error::Error>> {
    for (filename, declarations) in [("fatorial.cz", 2), ("vetor.cz", 3)] {
        let mut diagnostics = Diagnostics::new();
        let program = analyze(&common::read_test_file(filename), &mut diagnostics)?;

        assert!(diagnostics.is_empty(), "{}: {:?}", filename, diagnostics.reported());
        assert_eq!(program.declarations.len(), declarations);
    }

    Ok(())
}

#[test]
fn test_function_declaration() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut diagnostics = Diagnostics::new();
    let program = analyze(&common::read_test_file("vetor.cz"), &mut diagnostics)?;

    let Declaration::Function(soma) = &program.declarations[1] else {
        panic!("expected a function declaration");
    };
    assert_eq!(soma.name, "soma");
    assert_eq!(soma.ty, Type::Int);
    assert_eq!(soma.line, 3);
    assert_eq!(
        soma.params
            .iter()
            .map(|p| (p.name.as_str(), p.is_array))
            .collect::<Vec<_>>(),
        vec![("v", true), ("n", false)]
    );
    assert_eq!(soma.body.declarations.len(), 1);
    assert_eq!(soma.body.statements.len(), 4);

    Ok(())
}
