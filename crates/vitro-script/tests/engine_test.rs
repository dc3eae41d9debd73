//! End-to-end engine tests: parse and execute whole script bodies.

use vitro_script::{Engine, Error, Value};

fn eval(source: &str) -> Value {
    let mut engine = Engine::new();
    match engine.eval(source) {
        Ok(value) => value,
        Err(e) => panic!("eval failed for {:?}: {}", source, e),
    }
}

fn eval_err(source: &str) -> Error {
    let mut engine = Engine::new();
    match engine.eval(source) {
        Ok(value) => panic!("expected error for {:?}, got {}", source, value),
        Err(e) => e,
    }
}

#[test]
fn test_arithmetic() {
    assert_eq!(eval("5 + 3;").to_string(), "8");
    assert_eq!(eval("10 - 4;").to_string(), "6");
    assert_eq!(eval("6 * 7;").to_string(), "42");
    assert_eq!(eval("15 / 3;").to_string(), "5");
    assert_eq!(eval("17 % 5;").to_string(), "2");
    assert_eq!(eval("2 + 3 * 4;").to_string(), "14");
    assert_eq!(eval("(2 + 3) * 4;").to_string(), "20");
}

#[test]
fn test_comparison_and_equality() {
    assert_eq!(eval("5 == '5';"), Value::Boolean(true));
    assert_eq!(eval("5 === '5';"), Value::Boolean(false));
    assert_eq!(eval("null == undefined;"), Value::Boolean(true));
    assert_eq!(eval("null === undefined;"), Value::Boolean(false));
    assert_eq!(eval("'apple' < 'banana';"), Value::Boolean(true));
    assert_eq!(eval("5 <= 5;"), Value::Boolean(true));
}

#[test]
fn test_string_concatenation() {
    assert_eq!(eval("'a' + 'b';"), Value::String("ab".into()));
    assert_eq!(eval("'n=' + 42;"), Value::String("n=42".into()));
    assert_eq!(eval("1 + '2';"), Value::String("12".into()));
}

#[test]
fn test_variables_and_scope() {
    assert_eq!(eval("var x = 1; x = x + 2; x;").to_string(), "3");
    assert_eq!(eval("let a = 5; { let a = 9; } a;").to_string(), "5");
    assert_eq!(
        eval("let n = 0; { n = 7; } n;").to_string(),
        "7",
        "assignment reaches the outer scope"
    );
}

#[test]
fn test_const_rejects_reassignment() {
    let error = eval_err("const k = 1; k = 2;");
    assert!(matches!(error, Error::Type(_)), "got {}", error);
}

#[test]
fn test_unbound_identifier_is_a_reference_error() {
    let error = eval_err("missing;");
    assert!(matches!(error, Error::Reference(_)), "got {}", error);
    assert_eq!(error.to_string(), "ReferenceError: missing is not defined");
}

#[test]
fn test_typeof_tolerates_unbound_names() {
    assert_eq!(eval("typeof missing;"), Value::String("undefined".into()));
    assert_eq!(eval("typeof 'x';"), Value::String("string".into()));
    assert_eq!(eval("typeof null;"), Value::String("object".into()));
    assert_eq!(
        eval("typeof function() {};"),
        Value::String("function".into())
    );
}

#[test]
fn test_functions_and_closures() {
    assert_eq!(
        eval("function add(a, b) { return a + b; } add(2, 3);").to_string(),
        "5"
    );
    assert_eq!(
        eval(
            "function counter() { let n = 0; return function() { n = n + 1; return n; }; }\n\
             const next = counter(); next(); next();"
        )
        .to_string(),
        "2"
    );
}

#[test]
fn test_function_hoisting() {
    assert_eq!(
        eval("const v = later(); function later() { return 41 + 1; } v;").to_string(),
        "42"
    );
}

#[test]
fn test_arrow_functions() {
    assert_eq!(eval("const f = x => x * 2; f(21);").to_string(), "42");
    assert_eq!(
        eval("const add = (a, b) => { return a + b; }; add(1, 2);").to_string(),
        "3"
    );
    assert_eq!(eval("const zero = () => 0; zero();").to_string(), "0");
}

#[test]
fn test_this_binding_in_methods() {
    assert_eq!(
        eval(
            "const obj = { n: 7, get: function() { return this.n; } };\n\
             obj.get();"
        )
        .to_string(),
        "7"
    );
}

#[test]
fn test_objects_and_member_access() {
    assert_eq!(
        eval("const o = { a: 1, b: { c: 2 } }; o.b.c;").to_string(),
        "2"
    );
    assert_eq!(eval("const o = { a: 1 }; o['a'];").to_string(), "1");
    assert_eq!(eval("const o = {}; o.x = 5; o.x;").to_string(), "5");
    assert_eq!(eval("const o = { a: 1 }; o.missing;"), Value::Undefined);
    let shorthand = eval("const a = 3; const o = { a }; o.a;");
    assert_eq!(shorthand.to_string(), "3");
}

#[test]
fn test_member_access_on_nullish_fails() {
    let error = eval_err("const o = undefined; o.x;");
    assert!(matches!(error, Error::Type(_)), "got {}", error);
}

#[test]
fn test_arrays() {
    assert_eq!(eval("[1, 2, 3].length;").to_string(), "3");
    assert_eq!(eval("const a = [1, 2]; a[1];").to_string(), "2");
    assert_eq!(eval("const a = [1]; a[0] = 9; a[0];").to_string(), "9");
    assert_eq!(eval("const a = []; a.push(1); a.push(2); a.length;").to_string(), "2");
    assert_eq!(eval("[1, 2, 3].join('-');"), Value::String("1-2-3".into()));
}

#[test]
fn test_array_higher_order_methods() {
    assert_eq!(
        eval("[1, 2, 3].map(x => x * 2).join(',');"),
        Value::String("2,4,6".into())
    );
    assert_eq!(
        eval("[1, 2, 3, 4].filter(x => x % 2 === 0).join(',');"),
        Value::String("2,4".into())
    );
    assert_eq!(
        eval("let sum = 0; [1, 2, 3].forEach(x => { sum += x; }); sum;").to_string(),
        "6"
    );
}

#[test]
fn test_string_methods() {
    assert_eq!(eval("'hello'.toUpperCase();"), Value::String("HELLO".into()));
    assert_eq!(eval("'  x  '.trim();"), Value::String("x".into()));
    assert_eq!(eval("'a,b,c'.split(',').length;").to_string(), "3");
    assert_eq!(eval("'hello'.slice(1, 3);"), Value::String("el".into()));
    assert_eq!(eval("'hello'.indexOf('ll');").to_string(), "2");
    assert_eq!(eval("'abc'.includes('b');"), Value::Boolean(true));
    assert_eq!(eval("'aaa'.replace('a', 'b');"), Value::String("baa".into()));
    assert_eq!(eval("'7'.padStart(3, '0');"), Value::String("007".into()));
}

#[test]
fn test_number_methods() {
    assert_eq!(eval("(3.14159).toFixed(2);"), Value::String("3.14".into()));
    assert_eq!(eval("(42).toString();"), Value::String("42".into()));
}

#[test]
fn test_template_literals() {
    assert_eq!(
        eval("const name = 'ada'; `hi ${name}!`;"),
        Value::String("hi ada!".into())
    );
    assert_eq!(
        eval("`sum: ${1 + 2}`;"),
        Value::String("sum: 3".into())
    );
    assert_eq!(
        eval("const o = { n: 4 }; `${o.n * 10}`;"),
        Value::String("40".into())
    );
}

#[test]
fn test_control_flow() {
    assert_eq!(
        eval("let r; if (1 < 2) { r = 'yes'; } else { r = 'no'; } r;"),
        Value::String("yes".into())
    );
    assert_eq!(
        eval("let n = 0; while (n < 5) { n++; } n;").to_string(),
        "5"
    );
    assert_eq!(
        eval("let sum = 0; for (let i = 1; i <= 4; i++) { sum += i; } sum;").to_string(),
        "10"
    );
    assert_eq!(
        eval("let n = 0; while (true) { n++; if (n === 3) { break; } } n;").to_string(),
        "3"
    );
    assert_eq!(
        eval(
            "let odd = 0; for (let i = 0; i < 6; i++) { if (i % 2 === 0) { continue; } odd++; } odd;"
        )
        .to_string(),
        "3"
    );
}

#[test]
fn test_conditional_and_logical_operators() {
    assert_eq!(eval("true ? 'a' : 'b';"), Value::String("a".into()));
    assert_eq!(eval("0 || 'fallback';"), Value::String("fallback".into()));
    assert_eq!(eval("'x' && 'y';"), Value::String("y".into()));
    assert_eq!(eval("null || undefined;"), Value::Undefined);
}

#[test]
fn test_update_expressions() {
    assert_eq!(eval("let n = 1; n++; n;").to_string(), "2");
    assert_eq!(eval("let n = 1; n++;").to_string(), "1");
    assert_eq!(eval("let n = 1; ++n;").to_string(), "2");
    assert_eq!(eval("let n = 5; n--; n;").to_string(), "4");
}

#[test]
fn test_throw_surfaces_as_error() {
    let error = eval_err("throw { message: 'boom' };");
    assert_eq!(error, Error::Thrown("boom".into()));
    let error = eval_err("throw 'plain';");
    assert_eq!(error, Error::Thrown("plain".into()));
}

#[test]
fn test_new_is_rejected() {
    let error = eval_err("const d = new Date();");
    assert!(matches!(error, Error::Syntax(_)), "got {}", error);
}

#[test]
fn test_recursion_depth_is_limited() {
    let error = eval_err("function f() { return f(); } f();");
    assert_eq!(
        error.to_string(),
        "RangeError: Maximum call stack size exceeded"
    );
}

#[test]
fn test_eval_with_bindings_isolates_globals() {
    let mut engine = Engine::new();
    engine.eval("const secret = 42;").unwrap();

    // Bound names are visible
    let result = engine
        .eval_with_bindings(
            "n * 2;",
            vec![("n".to_string(), Value::Number(21.0))],
        )
        .unwrap();
    assert_eq!(result, Value::Number(42.0));

    // Engine globals are not
    let error = engine
        .eval_with_bindings("secret;", Vec::new())
        .unwrap_err();
    assert!(matches!(error, Error::Reference(_)), "got {}", error);
}

#[test]
fn test_host_functions_are_callable() {
    use vitro_script::Callable;

    let mut engine = Engine::new();
    let double = Callable::native("double", |args| {
        let n = args.first().map(|v| v.to_number()).unwrap_or(f64::NAN);
        Ok(Value::Number(n * 2.0))
    });
    let result = engine
        .eval_with_bindings("double(4) + 1;", vec![("double".to_string(), double)])
        .unwrap();
    assert_eq!(result, Value::Number(9.0));
}

#[test]
fn test_host_function_errors_propagate() {
    use vitro_script::Callable;

    let mut engine = Engine::new();
    let fail = Callable::native("fail", |_| Err(Error::Host("host refused".into())));
    let error = engine
        .eval_with_bindings("fail();", vec![("fail".to_string(), fail)])
        .unwrap_err();
    assert_eq!(error, Error::Host("host refused".into()));
}

#[test]
fn test_repl_state_persists_across_eval_calls() {
    let mut engine = Engine::new();
    engine.eval("let total = 0;").unwrap();
    engine.eval("total += 10;").unwrap();
    assert_eq!(engine.eval("total;").unwrap(), Value::Number(10.0));
}

#[test]
fn test_has_own_property() {
    assert_eq!(
        eval("const o = { a: 1 }; o.hasOwnProperty('a');"),
        Value::Boolean(true)
    );
    assert_eq!(
        eval("const o = { a: 1 }; o.hasOwnProperty('b');"),
        Value::Boolean(false)
    );
}
