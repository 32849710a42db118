use linescript::{run_with_io, ScriptError};

fn run(source: &str) -> Result<(i32, String), ScriptError> {
    let mut output = Vec::new();
    let code = run_with_io(source, &b""[..], &mut output)?;
    Ok((code, String::from_utf8(output).unwrap()))
}

fn output(source: &str) -> String {
    run(source).unwrap().1
}

#[test]
fn test_nested_call_evaluates_inner_first() {
    let source = r#"
func g(x) {
    print("g ");
    x += 1;
    return x;
}
func f(a, b) {
    print(a);
    print(" ");
    printl(b);
}
f(1, g(5));
"#;
    assert_eq!(output(source), "g 1 6\n");
}

#[test]
fn test_arguments_arrive_in_declared_order() {
    let source = r#"
func show(a, b, c) {
    print(a);
    print(b);
    printl(c);
}
show("x", 2, 3.5);
"#;
    assert_eq!(output(source), "x23.5\n");
}

#[test]
fn test_return_value_capture_and_repeat_calls() {
    let source = r#"
func square(n) {
    n *= n;
    return n;
}
var r = 0;
square(7) >> r;
printl(r);
square(3) >> r;
printl(r);
"#;
    assert_eq!(output(source), "49\n9\n");
}

#[test]
fn test_call_results_as_arguments_twice() {
    let source = r#"
func inc(n) {
    n++;
    return n;
}
func add(a, b) {
    a += b;
    return a;
}
var total = 0;
add(inc(1), inc(10)) >> total;
printl(total);
"#;
    assert_eq!(output(source), "13\n");
}

#[test]
fn test_early_return_cleans_up_scoped_variables() {
    let source = r#"
func find(limit) {
    for (i = 0; i < 10; i++) {
        if (i == limit) {
            return i;
        }
    }
    return (limit);
}
var r = 0;
find(3) >> r;
printl(r);
find(4) >> r;
printl(r);
"#;
    assert_eq!(output(source), "3\n4\n");
}

#[test]
fn test_return_literal() {
    let source = r#"
func answer() {
    return 42;
}
var r;
answer() >> r;
printl(r);
"#;
    assert_eq!(output(source), "42\n");
}

#[test]
fn test_function_body_skipped_on_fall_through() {
    let source = r#"
printl("before");
func never() {
    printl("inside");
}
printl("after");
"#;
    assert_eq!(output(source), "before\nafter\n");
}

#[test]
fn test_no_return_value_sets_error_level() {
    let source = r#"
func quiet() {
    print("");
}
var r = 5;
quiet() >> r;
printl(errorLevel);
printl(r);
"#;
    assert_eq!(output(source), "1\n5\n");
}

#[test]
fn test_bare_return_with_empty_history_exits_zero() {
    let source = r#"
func f() {
    printl("in f");
}
jump(f);
printl("unreachable");
"#;
    assert_eq!(run(source).unwrap(), (0, "in f\n".to_string()));
}

#[test]
fn test_exit_inside_function() {
    let source = r#"
func fail(code) {
    exit(code);
}
fail(3);
printl("unreachable");
"#;
    assert_eq!(run(source).unwrap(), (3, String::new()));
}

#[test]
fn test_parameters_do_not_leak() {
    let source = r#"
func f(p) {
    print(p);
}
f(1);
var p = 2;
printl(p);
"#;
    assert_eq!(output(source), "12\n");
}

#[test]
fn test_valueless_call_leaves_caller_operands() {
    let source = r#"
func f() {
    print("f");
}
var a = 0;
push(5);
f();
pop(a);
printl(errorLevel);
printl(a);
"#;
    assert_eq!(output(source), "f0\n5\n");
}

#[test]
fn test_valueless_call_with_arguments_keeps_earlier_push() {
    let source = r#"
func quiet(n) {
    print(n);
}
func show(a) {
    printl(a);
}
var seen = 0;
push(9);
quiet(1);
pop(seen);
show(seen);
"#;
    assert_eq!(output(source), "19\n");
}
