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
fn test_for_runs_body_five_times_and_drops_variable() {
    let source = r#"
for (i = 0; i < 5; i++) {
    print(i);
}
endl;
var i = 9;
printl(i);
"#;
    assert_eq!(output(source), "01234\n9\n");
}

#[test]
fn test_for_with_compound_step() {
    let source = r#"
for (i = 0; i < 7; i += 2) {
    print(i);
}
"#;
    assert_eq!(output(source), "0246");
}

#[test]
fn test_for_with_var_initializer_and_commas() {
    let source = r#"
for (var n = 3, n > 0, n--) {
    print(n);
}
"#;
    assert_eq!(output(source), "321");
}

#[test]
fn test_for_zero_iterations() {
    let source = r#"
for (i = 5; i < 5; i++) {
    printl("never");
}
var i = 1;
printl(i);
"#;
    assert_eq!(output(source), "1\n");
}

#[test]
fn test_break_leaves_innermost_loop_only() {
    let source = r#"
for (i = 0; i < 3; i++) {
    for (j = 0; j < 3; j++) {
        if (j == 1) {
            break;
        }
        print(i);
        print(j);
        print(" ");
    }
}
"#;
    assert_eq!(output(source), "00 10 20 ");
}

#[test]
fn test_continue_runs_step_not_initializer() {
    let source = r#"
for (i = 0; i < 5; i++) {
    if (i == 2) {
        continue;
    }
    print(i);
}
"#;
    assert_eq!(output(source), "0134");
}

#[test]
fn test_continue_in_nested_loop() {
    let source = r#"
for (i = 0; i < 2; i++) {
    for (j = 0; j < 3; j++) {
        if (j == 1) {
            continue;
        }
        print(j);
    }
    print("|");
}
"#;
    assert_eq!(output(source), "02|02|");
}

#[test]
fn test_while_with_continue() {
    let source = r#"
var n = 0;
while (n < 5) {
    n++;
    if (n == 3) {
        continue;
    }
    print(n);
}
"#;
    assert_eq!(output(source), "1245");
}

#[test]
fn test_while_break() {
    let source = r#"
var n = 0;
while (true) {
    n += 10;
    if (n >= 30) {
        break;
    }
}
printl(n);
"#;
    assert_eq!(output(source), "30\n");
}

#[test]
fn test_if_else_inline() {
    let source = r#"
var x = 2;
if (x > 1) { printl("big"); } else { printl("small"); }
x = 0;
if (x > 1) { printl("big"); } else { printl("small"); }
"#;
    assert_eq!(output(source), "big\nsmall\n");
}

#[test]
fn test_else_on_its_own_line() {
    let source = r#"
var ok = false;
if (ok) {
    printl("yes");
}
else {
    printl("no");
}
"#;
    assert_eq!(output(source), "no\n");
}

#[test]
fn test_colon_end_grammar() {
    let source = r#"
var x = 0;
if (x):
    printl("yes");
else:
    printl("no");
end
while (x < 3):
    print: x;
    x++;
end;
"#;
    assert_eq!(output(source), "no\n012");
}

#[test]
fn test_negated_condition() {
    let source = r#"
var done = false;
if (!done) {
    printl("working");
}
done = true;
if (!done) {
    printl("still working");
}
"#;
    assert_eq!(output(source), "working\n");
}

#[test]
fn test_int_double_equality_does_not_jump() {
    let source = r#"
if (1 == 1.0) {
    printl("equal");
}
"#;
    assert_eq!(output(source), "equal\n");
}

#[test]
fn test_labels_and_raw_conditional_jump() {
    let source = r#"
var i = 0;
=again;
i++;
if i < 4, out;
jump(again);
=out;
printl(i);
"#;
    assert_eq!(output(source), "4\n");
}

#[test]
fn test_nested_if_inside_loops() {
    let source = r#"
var evens = 0;
for (i = 0; i < 10; i++) {
    var r = i;
    r %= 2;
    if (r == 0) {
        evens++;
    }
    delete(r);
}
printl(evens);
"#;
    assert_eq!(output(source), "5\n");
}

#[test]
fn test_colon_while_without_parentheses() {
    let source = r#"
var x = 0;
while x < 3:
    print(x);
    x++;
end
"#;
    assert_eq!(output(source), "012");
}

#[test]
fn test_colon_if_without_parentheses() {
    let source = r#"
var x = 1;
if x == 0:
    printl("zero");
else:
    printl("other");
end
if x:
    printl("truthy");
end
"#;
    assert_eq!(output(source), "other\ntruthy\n");
}

#[test]
fn test_colon_for_without_parentheses() {
    let source = r#"
for i = 0, i < 3, i++:
    print(i);
end
var i = 7;
printl(i);
"#;
    assert_eq!(output(source), "0127\n");
}
