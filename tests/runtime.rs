use linescript::{compile, run_with_io, ErrorKind, ScriptError, Value, VM};

fn run_input(source: &str, input: &str) -> Result<(i32, String), ScriptError> {
    let mut output = Vec::new();
    let code = run_with_io(source, input.as_bytes(), &mut output)?;
    Ok((code, String::from_utf8(output).unwrap()))
}

fn run(source: &str) -> Result<(i32, String), ScriptError> {
    run_input(source, "")
}

fn output(source: &str) -> String {
    run(source).unwrap().1
}

fn error(source: &str) -> ScriptError {
    run(source).unwrap_err()
}

#[test]
fn test_variables_visible_after_run() {
    let program = compile("var x = 5;\nvar name = \"ls\";\nx *= 3;").unwrap();
    let mut sink = Vec::new();
    let mut vm = VM::with_io(&b""[..], &mut sink);
    assert_eq!(vm.run(&program).unwrap(), 0);
    assert_eq!(vm.variable("x"), Some(&Value::Int(15)));
    assert_eq!(vm.variable("name"), Some(&Value::Str("ls".into())));
    assert_eq!(vm.variable("missing"), None);
}

#[test]
fn test_uninitialized_read_is_fatal() {
    let err = error("var y;\nprintl(y);");
    assert_eq!(err.kind, ErrorKind::UninitializedVariable("y".into()));
    assert_eq!(err.line, Some(2));
    assert_eq!(err.source_line.as_deref(), Some("printl(y);"));
}

#[test]
fn test_undefined_variable() {
    let err = error("\n\nprintl(nothing);");
    assert_eq!(err.kind, ErrorKind::UndefinedVariable("nothing".into()));
    assert_eq!(err.line, Some(3));
}

#[test]
fn test_output_before_fatal_error_is_kept() {
    let mut output = Vec::new();
    let result = run_with_io("printl(\"first\");\nprintl(ghost);", &b""[..], &mut output);
    assert!(result.is_err());
    assert_eq!(String::from_utf8(output).unwrap(), "first\n");
}

#[test]
fn test_string_ordering_is_rejected() {
    let err = error("if (\"a\" < \"b\") {\n  printl(1);\n}");
    assert!(matches!(err.kind, ErrorKind::InvalidOperatorForType { .. }));
    assert_eq!(err.line, Some(1));
}

#[test]
fn test_mixed_type_comparison() {
    let err = error("if (1 == \"1\") {\n}");
    assert_eq!(
        err.kind,
        ErrorKind::TypeMismatch {
            expected: "int".into(),
            found: "string".into()
        }
    );
}

#[test]
fn test_string_equality() {
    let source = r#"
var s = "abc";
if (s == "abc") {
    printl("same");
}
if (s != "abd") {
    printl("different");
}
"#;
    assert_eq!(output(source), "same\ndifferent\n");
}

#[test]
fn test_soft_failure_keeps_running() {
    let (code, out) = run("pop;\nprintl(errorLevel);\nprintl(\"still here\");").unwrap();
    assert_eq!(code, 0);
    assert_eq!(out, "1\nstill here\n");
}

#[test]
fn test_error_level_resets_on_success() {
    let source = "var a;\npop(a);\nprintl(errorLevel);\npush(4);\npop(a);\nprintl(errorLevel);";
    assert_eq!(output(source), "1\n0\n");
}

#[test]
fn test_exit_code_and_halt() {
    assert_eq!(run("printl(1);\nexit(2);\nprintl(3);").unwrap(), (2, "1\n".into()));
    assert_eq!(run("exit;\nprintl(3);").unwrap(), (0, String::new()));
    assert_eq!(run("var c = 9;\nexit: c;").unwrap().0, 9);
}

#[test]
fn test_division_by_zero() {
    let err = error("var x = 1;\nx /= 0;");
    assert_eq!(err.kind, ErrorKind::DivisionByZero);
    assert_eq!(err.line, Some(2));
    assert_eq!(error("var x = 1;\nx %= 0;").kind, ErrorKind::DivisionByZero);
}

#[test]
fn test_double_arithmetic_and_printing() {
    assert_eq!(output("var d = 1.5;\nd *= 2;\nprintl(d);"), "3.0\n");
    assert_eq!(output("var d = 10.0;\nd /= 4;\nprintl(d);"), "2.5\n");
    assert_eq!(output("var n = 7;\nn *= 1.5;\nprintl(n);"), "10\n");
}

#[test]
fn test_string_concatenation() {
    let source = r#"
var greeting = "hello";
greeting += ", ";
greeting += "world";
printl(greeting);
"#;
    assert_eq!(output(source), "hello, world\n");
}

#[test]
fn test_string_rejects_arithmetic() {
    let err = error("var s = \"abc\";\ns -= \"c\";");
    assert_eq!(
        err.kind,
        ErrorKind::InvalidOperatorForType {
            op: "-=".into(),
            ty: "string".into()
        }
    );
    assert!(matches!(
        error("var s = \"abc\";\ns += 1;").kind,
        ErrorKind::TypeMismatch { .. }
    ));
}

#[test]
fn test_assignment_type_mismatch() {
    let err = error("var n = 1;\nn = \"one\";");
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    assert_eq!(err.line, Some(2));
}

#[test]
fn test_truthiness() {
    let source = r#"
var b = true;
var i = 0;
var d = 0.5;
if (b) { printl("bool"); }
if (i) { printl("int"); }
if (d) { printl("double"); }
"#;
    assert_eq!(output(source), "bool\ndouble\n");

    let err = error("var s = \"yes\";\nif (s) {\n}");
    assert!(matches!(err.kind, ErrorKind::InvalidOperatorForType { .. }));
    assert_eq!(err.line, Some(2));
}

#[test]
fn test_input_from_reader() {
    let source = r#"
var name;
var age = 0;
input("name: ", name);
input(age);
print(name);
print(" ");
printl(age);
"#;
    let (code, out) = run_input(source, "Ada\n36\n").unwrap();
    assert_eq!(code, 0);
    assert_eq!(out, "name: Ada 36\n");
}

#[test]
fn test_input_type_mismatch_is_soft() {
    let source = "var n = 3;\ninput(n);\nprintl(errorLevel);\nprintl(n);";
    let (_, out) = run_input(source, "three\n").unwrap();
    assert_eq!(out, "1\n3\n");
}

#[test]
fn test_input_int_into_double() {
    let (_, out) = run_input("var d = 0.5;\ninput(d);\nprintl(d);", "2\n").unwrap();
    assert_eq!(out, "2.0\n");
}

#[test]
fn test_delete_and_redeclare() {
    let source = "var x = 1;\ndelete(x);\nvar x = \"again\";\nprintl(x);";
    assert_eq!(output(source), "again\n");
}

#[test]
fn test_error_level_is_read_only() {
    let err = error("var x = 0;\nerrorLevel += 1;");
    assert_eq!(err.kind, ErrorKind::ReadOnlyVariable("errorLevel".into()));
}

#[test]
fn test_comments_are_ignored() {
    let source = "# header\nvar x = 1; # trailing\nprintl(\"# not a comment\");";
    assert_eq!(output(source), "# not a comment\n");
}

#[test]
fn test_multiple_statements_per_line() {
    assert_eq!(output("var a = 1; var b = 2; a += b; printl(a);"), "3\n");
}

#[test]
fn test_pop_requires_matching_type() {
    let err = error("var n = 1;\npush(2.7);\npop(n);");
    assert_eq!(
        err.kind,
        ErrorKind::TypeMismatch {
            expected: "int".into(),
            found: "double".into()
        }
    );
    assert_eq!(err.line, Some(3));

    let err = error("var d = 0.5;\npush(2);\npop(d);");
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));

    assert_eq!(output("var u;\npush(2.7);\npop(u);\nprintl(u);"), "2.7\n");
}

#[test]
fn test_rand_with_infinite_bound_is_an_error() {
    let source = r#"
var d = 10000000000.0;
d *= d;
d *= d;
d *= d;
d *= d;
d *= d;
var r = 0.0;
rand(r, 0, d);
"#;
    let err = error(source);
    assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)));
    assert_eq!(err.line, Some(9));
}

#[test]
fn test_out_of_range_literal() {
    let err = error("var x = 0;\nx = 99999999999999999999;");
    assert_eq!(
        err.kind,
        ErrorKind::InvalidLiteral("99999999999999999999".into())
    );
    assert_eq!(err.line, Some(2));
    assert!(matches!(
        error("printl(1.2.3);").kind,
        ErrorKind::InvalidLiteral(_)
    ));
}
