mod common;

#[cfg(test)]
mod interpreter_tests {
    use treelox as lox;

    use lox::runner::{Lox, RunStatus};

    use super::common::{self, output_of, Capture};

    fn runtime_error(source: &str) -> (Vec<String>, String) {
        let outcome = common::run(source);

        assert_eq!(outcome.status, RunStatus::RuntimeError);
        assert_eq!(outcome.errors.len(), 1, "{:?}", outcome.errors);

        let lines = outcome.lines().into_iter().map(str::to_string).collect();
        (lines, outcome.errors[0].clone())
    }

    #[test]
    fn test_arithmetic_and_number_display() {
        assert_eq!(
            output_of("print(1 + 2 * 3); print(6 / 3); print(7 / 2); print(-(4 - 6)); print(1 / 0);"),
            vec!["7", "2", "3.5", "2", "inf"]
        );
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(
            output_of("print(1 < 2); print(2 <= 2); print(3 > 4); print(4 >= 5);"),
            vec!["true", "true", "false", "false"]
        );
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(
            output_of(r#"var s = "foo" + "bar"; print(s + str(42));"#),
            vec!["foobar42"]
        );
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(
            output_of(r#"print(!nil); print(!false); print(!0); print(!""); print(!"x");"#),
            vec!["true", "true", "false", "false", "false"]
        );
    }

    #[test]
    fn test_logical_operators_return_operands() {
        assert_eq!(
            output_of(r#"print(nil or "x"); print(0 and "y"); print(false and missing()); print(1 or missing());"#),
            vec!["x", "y", "false", "1"]
        );
    }

    #[test]
    fn test_equality_with_nil_is_permissive() {
        assert_eq!(
            output_of(
                r#"
                print(nil == nil);
                print(nil == 1);
                print("a" != nil);
                print(1 == 1);
                print("a" != "b");
                print(true == false);
                "#
            ),
            vec!["true", "false", "true", "true", "true", "false"]
        );
    }

    #[test]
    fn test_equality_across_types_is_a_runtime_error() {
        let (_, error) = runtime_error(r#"print(1 == "1");"#);
        assert_eq!(error, "Error: Cannot compare number with string using '=='.");

        let (_, error) = runtime_error("class A {} var a = A(); print(a != a);");
        assert_eq!(error, "Error: Cannot compare instance with instance using '!='.");
    }

    #[test]
    fn test_operand_type_errors() {
        let (_, error) = runtime_error(r#"-"x";"#);
        assert_eq!(error, "Error: Operand must be a number.");

        let (_, error) = runtime_error(r#"1 < "2";"#);
        assert_eq!(error, "Error: Operands must be numbers.");

        let (_, error) = runtime_error(r#""a" + 1;"#);
        assert_eq!(error, "Error: Right operand of '+' must be a string, got number.");

        let (_, error) = runtime_error("nil + 1;");
        assert_eq!(
            error,
            "Error: Left operand of '+' must be a number or a string, got nil."
        );
    }

    #[test]
    fn test_runtime_error_aborts_remaining_statements() {
        let (lines, error) = runtime_error(r#"print("a"); print(y); print("b");"#);

        assert_eq!(lines, vec!["a"]);
        assert_eq!(error, "Error: Undefined variable 'y'.");
    }

    #[test]
    fn test_block_scoping_and_shadowing() {
        assert_eq!(
            output_of(
                r#"
                var a = "global a";
                var b = "global b";
                {
                    var a = "outer a";
                    {
                        var a = "inner a";
                        print(a);
                        print(b);
                    }
                    print(a);
                    b = "changed b";
                }
                print(a);
                print(b);
                "#
            ),
            vec!["inner a", "global b", "outer a", "global a", "changed b"]
        );
    }

    #[test]
    fn test_control_flow() {
        assert_eq!(
            output_of(
                r#"
                for (var i = 0; i < 3; i = i + 1) print(i);
                var n = 0;
                while (n < 2) n = n + 1;
                if (n == 2) print("two"); else print("other");
                if (nil) print("never");
                "#
            ),
            vec!["0", "1", "2", "two"]
        );
    }

    #[test]
    fn test_return_unwinds_out_of_loops() {
        assert_eq!(
            output_of(
                r#"
                fun first() {
                    var i = 0;
                    while (true) {
                        if (i == 2) return i;
                        i = i + 1;
                    }
                }
                fun nothing() {}
                print(first());
                print(nothing());
                "#
            ),
            vec!["2", "nil"]
        );
    }

    #[test]
    fn test_recursion() {
        assert_eq!(
            output_of(
                r#"
                fun fib(n) {
                    if (n < 2) return n;
                    return fib(n - 1) + fib(n - 2);
                }
                print(fib(15));
                "#
            ),
            vec!["610"]
        );
    }

    #[test]
    fn test_closures_keep_independent_state() {
        assert_eq!(
            output_of(
                r#"
                fun makeCounter() {
                    var i = 0;
                    fun count() {
                        i = i + 1;
                        return i;
                    }
                    return count;
                }
                var a = makeCounter();
                var b = makeCounter();
                print(a());
                print(a());
                print(b());
                print(a());
                "#
            ),
            vec!["1", "2", "1", "3"]
        );
    }

    #[test]
    fn test_classes_fields_and_methods() {
        assert_eq!(
            output_of(
                r#"
                class Point {
                    init(x, y) {
                        this.x = x;
                        this.y = y;
                    }
                    sum() { return this.x + this.y; }
                }
                var p = Point(1, 2);
                print(p.sum());
                p.x = 10;
                print(p.sum());
                var m = p.sum;
                print(m());
                print(Point);
                print(p);
                "#
            ),
            vec!["3", "12", "12", "Point", "Point instance"]
        );
    }

    #[test]
    fn test_fields_shadow_methods() {
        assert_eq!(
            output_of(
                r#"
                class C { m() { return "method"; } }
                var c = C();
                print(c.m());
                c.m = "field";
                print(c.m);
                "#
            ),
            vec!["method", "field"]
        );
    }

    #[test]
    fn test_inheritance_and_super() {
        assert_eq!(
            output_of(
                r#"
                class A {
                    method() { return "A"; }
                    inherited() { return "from A"; }
                }
                class B < A {
                    method() { return super.method() + "B"; }
                }
                class C < B {}
                print(B().method());
                print(C().method());
                print(C().inherited());
                "#
            ),
            vec!["AB", "AB", "from A"]
        );
    }

    #[test]
    fn test_initializer_always_returns_instance() {
        assert_eq!(
            output_of(
                r#"
                class P {
                    init(v) {
                        this.v = v;
                        return;
                        this.v = "unreachable";
                    }
                }
                var p = P(3);
                print(p.v);
                print(p.init(4));
                print(p.v);
                "#
            ),
            vec!["3", "P instance", "4"]
        );
    }

    #[test]
    fn test_inherited_initializer_sets_arity() {
        let (_, error) = runtime_error("class A { init(a, b) {} } class B < A {} B(1);");
        assert_eq!(error, "Error: Expected 2 arguments but got 1.");
    }

    #[test]
    fn test_call_errors() {
        let (_, error) = runtime_error("fun f(a) {} f();");
        assert_eq!(error, "Error: Expected 1 arguments but got 0.");

        let (_, error) = runtime_error("class E {} E(1);");
        assert_eq!(error, "Error: Expected 0 arguments but got 1.");

        let (_, error) = runtime_error(r#""hi"();"#);
        assert_eq!(error, "Error: Can only call functions and classes.");
    }

    #[test]
    fn test_property_errors() {
        let (_, error) = runtime_error("var x = 1; x.y;");
        assert_eq!(error, "Error: Only instances have properties.");

        let (_, error) = runtime_error("var x = 1; x.y = 2;");
        assert_eq!(error, "Error: Only instances have fields.");

        let (_, error) = runtime_error("class A {} A().missing;");
        assert_eq!(error, "Error: Undefined property 'missing'.");

        let (_, error) = runtime_error("var NotAClass = 1; class B < NotAClass {}");
        assert_eq!(error, "Error: Superclass must be a class.");
    }

    #[test]
    fn test_builtins() {
        assert_eq!(
            output_of(
                r#"
                fun f() {}
                print(clock() > 0);
                print(clock);
                print(f);
                print(str(nil) + str(true) + str(2.5));
                print(print("nested"));
                "#
            ),
            vec!["true", "<native fn clock>", "<fn f>", "niltrue2.5", "nested", "nil"]
        );
    }

    #[test]
    fn test_repl_session_keeps_globals_between_runs() {
        let capture = Capture::default();
        let mut lox = Lox::with_output(Box::new(capture.clone()));

        assert_eq!(lox.run("var a = 1;"), RunStatus::Ok);
        assert_eq!(lox.run("fun inc() { a = a + 1; return a; }"), RunStatus::Ok);
        assert_eq!(lox.run("print(inc());"), RunStatus::Ok);

        assert_eq!(lox.run("print(missing);"), RunStatus::RuntimeError);
        assert_eq!(lox.diagnostics().errors().len(), 1);
        lox.reset();
        assert!(!lox.diagnostics().had_error());

        assert_eq!(lox.run("print(inc());"), RunStatus::Ok);
        assert_eq!(capture.contents(), "2\n3\n");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(common::run("print(1);").status.exit_code(), 0);
        assert_eq!(common::run("print(1)").status.exit_code(), 65);
        assert_eq!(common::run("print(-nil);").status.exit_code(), 70);
    }
}
