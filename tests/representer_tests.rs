//! End-to-end representation tests over source strings, ported from the
//! behaviors the grading backend depends on.

use php_representer::{represent_source, Mapping};

/// Represent `code` and assert both the canonical text and the mapping
/// export.
fn assert_representation(code: &str, expected: &str, expected_mapping: &str) {
    let mut mapping = Mapping::new();
    let result = represent_source(code, &mut mapping);
    assert_eq!(result, expected);
    assert_eq!(mapping.to_export_string(), expected_mapping);
}

/// Two sources that differ only cosmetically must produce byte-identical
/// representations.
fn assert_same_representation(code_a: &str, code_b: &str) {
    let mut mapping_a = Mapping::new();
    let mut mapping_b = Mapping::new();
    let result_a = represent_source(code_a, &mut mapping_a);
    let result_b = represent_source(code_b, &mut mapping_b);
    assert_eq!(result_a, result_b);
}

#[test]
fn hello_world() {
    assert_representation(
        "<?php\n\nfunction helloWorld()\n{\n    return \"Hello World!\";\n}",
        "function fn0()\n{\n    return 'Hello World!';\n}",
        r#"{"fn0":"helloworld"}"#,
    );
}

#[test]
fn normalization_is_idempotent() {
    let code = "<?php\n\nfunction helloWorld()\n{\n    return \"Hello World!\";\n}";
    let mut mapping = Mapping::new();
    let first = represent_source(code, &mut mapping);

    let mut second_mapping = Mapping::new();
    let second = represent_source(&format!("<?php\n{first}"), &mut second_mapping);
    assert_eq!(second, first);
}

// --- Functions ------------------------------------------------------------

#[test]
fn function_mapping_coherence() {
    assert_representation(
        "<?php\n\nfunction a() { return 'test'; }\nfunction b() { return a(); }",
        "function fn0()\n{\n    return 'test';\n}\nfunction fn1()\n{\n    return fn0();\n}",
        r#"{"fn0":"a","fn1":"b"}"#,
    );
}

#[test]
fn identifier_spelling_does_not_change_the_representation() {
    let code_a = "<?php\n\nfunction helloWorldA()\n{\n    return \"Hello World!\";\n}";
    let code_b = "<?php\n\nfunction helloWorldB()\n{\n    return \"Hello World!\";\n}";
    let mut mapping_a = Mapping::new();
    let mut mapping_b = Mapping::new();
    let result_a = represent_source(code_a, &mut mapping_a);
    let result_b = represent_source(code_b, &mut mapping_b);
    assert_eq!(result_a, result_b);
    assert_eq!(
        mapping_a.to_export_string(),
        r#"{"fn0":"helloworlda"}"#
    );
    assert_eq!(
        mapping_b.to_export_string(),
        r#"{"fn0":"helloworldb"}"#
    );
}

#[test]
fn core_functions_are_not_renamed() {
    assert_representation(
        "<?php\necho implode(' ', array_map('strtolower', ['Hello', 'World']));",
        "echo implode(' ', array_map('strtolower', ['Hello', 'World']));",
        "{}",
    );
}

#[test]
fn function_names_are_case_insensitive() {
    assert_representation(
        "<?php\nfunction A() {}\na();",
        "function fn0()\n{\n}\nfn0();",
        r#"{"fn0":"a"}"#,
    );
}

#[test]
fn native_function_calls_fold_their_case() {
    assert_representation("<?php\nFunCtioN_ExiStS();", "function_exists();", "{}");
}

#[test]
fn alias_calls_rewrite_to_the_canonical_builtin() {
    assert_representation(
        "<?php\njoin(',', $a);",
        "implode(',', $v0);",
        r#"{"implode":"join","v0":"a"}"#,
    );
}

#[test]
fn alias_calls_do_not_disturb_user_function_numbering() {
    assert_representation(
        "<?php\nsizeof($a);\nfunction mine() {}",
        "count($v0);\nfunction fn0()\n{\n}",
        r#"{"count":"sizeof","fn0":"mine","v0":"a"}"#,
    );
}

#[test]
fn dynamic_callees_are_left_alone() {
    assert_representation("<?php\n$f();", "$v0();", r#"{"v0":"f"}"#);
}

// --- Variables ------------------------------------------------------------

#[test]
fn variable_mapping() {
    let code_a =
        "<?php\n\nfunction helloWorld()\n{\n    $a = \"Hello World!\";\n    return $a;\n}";
    let code_b =
        "<?php\n\nfunction helloWorld()\n{\n    $b = \"Hello World!\";\n    return $b;\n}";
    let mut mapping_a = Mapping::new();
    let mut mapping_b = Mapping::new();
    assert_eq!(
        represent_source(code_a, &mut mapping_a),
        represent_source(code_b, &mut mapping_b)
    );
    assert_eq!(
        mapping_a.to_export_string(),
        r#"{"fn0":"helloworld","v0":"a"}"#
    );
    assert_eq!(
        mapping_b.to_export_string(),
        r#"{"fn0":"helloworld","v0":"b"}"#
    );
}

#[test]
fn variables_are_case_sensitive() {
    assert_representation(
        "<?php\n$a = 1;\n$A = 2;",
        "$v0 = 1;\n$v1 = 2;",
        r#"{"v0":"a","v1":"A"}"#,
    );
}

#[test]
fn parameters_rename_like_variables() {
    assert_representation(
        "<?php\nfunction f($x, $y = 2) { return $x + $y; }",
        "function fn0($v0, $v1 = 2)\n{\n    return $v0 + $v1;\n}",
        r#"{"fn0":"f","v0":"x","v1":"y"}"#,
    );
}

// --- Strings --------------------------------------------------------------

#[test]
fn double_quotes_become_single_quotes() {
    assert_representation("<?php\n\"test\";", "'test';", "{}");
}

#[test]
fn resolved_escapes_are_preserved_verbatim() {
    assert_representation(
        "<?php\n\"a\\tb\\nc\\x41\\u{2665}\";",
        "'a\tb\nc\u{41}♥';",
        "{}",
    );
}

#[test]
fn interpolation_becomes_explicit_concatenation() {
    assert_representation(
        "<?php\n\"encapsed $a or {$a} or ${a}.\";",
        "'encapsed ' . $v0 . ' or ' . $v0 . ' or ' . $v0 . '.';",
        r#"{"v0":"a"}"#,
    );
}

#[test]
fn whole_string_interpolation_reduces_to_the_expression() {
    // The replacement node itself is not revisited, so the lone variable
    // keeps its spelling.
    assert_representation("<?php\n\"$a\";", "$a;", "{}");
}

#[test]
fn heredoc_is_a_plain_string() {
    assert_representation("<?php\n<<<EOT\ntest\nEOT;", "'test';", "{}");
}

#[test]
fn heredoc_with_escapes_and_interpolation() {
    assert_representation(
        "<?php\n<<<EOT\nTest \"$a\"\\x41.\nEOT;",
        "'Test \"' . $v0 . '\"A.';",
        r#"{"v0":"a"}"#,
    );
}

#[test]
fn nowdoc_is_a_plain_string() {
    assert_representation("<?php\n<<<'EOD'\ntest\nEOD;", "'test';", "{}");
}

// --- Concatenation folding ------------------------------------------------

#[test]
fn adjacent_literals_fold_regardless_of_grouping() {
    let cases = [
        ("<?php\n'testA' . 'testB' . 'testC';", "'testAtestBtestC';"),
        ("<?php\n'testA' . ('testB' . 'testC');", "'testAtestBtestC';"),
        ("<?php\n('testA' . 'testB') . 'testC';", "'testAtestBtestC';"),
        (
            "<?php\n('testA' . 'testB') . ('testC' . 'testD');",
            "'testAtestBtestCtestD';",
        ),
    ];
    for (code, expected) in cases {
        assert_representation(code, expected, "{}");
    }
}

#[test]
fn interpolated_concatenation_folds_adjacent_literal_runs() {
    let cases = [
        ("<?php\n\"{$c}testA\" . 'testB';", "$v0 . 'testAtestB';"),
        ("<?php\n\"testA{$c}\" . 'testB';", "'testA' . $v0 . 'testB';"),
        ("<?php\n'testA' . \"{$c}testB\";", "'testA' . $v0 . 'testB';"),
        ("<?php\n'testA' . \"testB{$c}\";", "'testAtestB' . $v0;"),
        (
            "<?php\n\"{$c}testA\" . \"testB{$c}\";",
            "$v0 . 'testAtestB' . $v0;",
        ),
    ];
    for (code, expected) in cases {
        assert_representation(code, expected, r#"{"v0":"c"}"#);
    }
}

#[test]
fn mixed_chains_preserve_operand_order() {
    assert_representation(
        "<?php\n'a' . $x . 'b' . 'c' . $y . 'd';",
        "'a' . $v0 . 'bc' . $v1 . 'd';",
        r#"{"v0":"x","v1":"y"}"#,
    );
}

// --- Arrays, casts, exit --------------------------------------------------

#[test]
fn array_syntax_is_normalized_to_short_form() {
    assert_same_representation(
        "<?php\n\n$a = [0, 1, 'a' => 'b', 'c' => 'd'];",
        "<?php\n\n$a = array(0, 1, 'a' => 'b', 'c' => 'd');",
    );
    assert_representation(
        "<?php\n$a = array(0, 'a' => 'b');",
        "$v0 = [0, 'a' => 'b'];",
        r#"{"v0":"a"}"#,
    );
}

#[test]
fn multiline_arrays_flatten() {
    assert_same_representation(
        "<?php\n\n$a = [\n    0,\n    1,\n    'a' => 'b',\n    'c' => 'd',\n];",
        "<?php\n\n$a = [0, 1, 'a' => 'b', 'c' => 'd'];",
    );
}

#[test]
fn float_cast_spellings_are_aliases() {
    assert_same_representation("<?php\n\n$a = (double) 1.0;", "<?php\n\n$a = (float) 1.0;");
    assert_same_representation("<?php\n\n$a = (double) 1.0;", "<?php\n\n$a = (real) 1.0;");
    assert_representation("<?php\n$a = (real) 1.0;", "$v0 = (double) 1.0;", r#"{"v0":"a"}"#);
}

#[test]
fn die_is_an_alias_for_exit() {
    assert_same_representation("<?php\n\nexit(1);\nexit();", "<?php\n\ndie(1);\ndie();");
    assert_representation("<?php\nexit(1);\nexit();", "exit(1);\nexit;", "{}");
}

// --- Comments, whitespace, inline HTML ------------------------------------

#[test]
fn comments_are_stripped() {
    assert_representation(
        "<?php\n\n/**\n * This is a comment\n */\nfunction helloWorld()\n{\n    // This is a comment\n    return \"Hello World!\"; // trailing\n}",
        "function fn0()\n{\n    return 'Hello World!';\n}",
        r#"{"fn0":"helloworld"}"#,
    );
}

#[test]
fn spacing_does_not_matter() {
    assert_same_representation(
        "<?php\n\nfunction helloWorld()\n{\n\n    return    \"Hello World!\"   ;\n}",
        "<?php\n\nfunction helloWorld()\n{\n    return \"Hello World!\";\n}",
    );
}

#[test]
fn inline_html_is_removed() {
    assert_same_representation(
        "\nThis is inline HTML.\n\n\n<?php\n\n$a = 1;\n\n?>\n\n\n<php\n\n\n?>\n\nAgain inline HTML.",
        "<?php\n$a = 1;",
    );
    assert_representation("<?php ?>html<?php $a = 1;", "$v0 = 1;", r#"{"v0":"a"}"#);
}

#[test]
fn empty_statements_are_removed() {
    assert_representation("<?php\n;;\n$a = 1;;", "$v0 = 1;", r#"{"v0":"a"}"#);
}

// --- Classes and methods --------------------------------------------------

#[test]
fn class_mapping() {
    assert_representation(
        "<?php\n\nclass HelloWorld {}\n$a = new HelloWorld();",
        "class C0\n{\n}\n$v0 = new C0();",
        r#"{"C0":"HelloWorld","v0":"a"}"#,
    );
}

#[test]
fn anonymous_classes_are_skipped_by_renaming() {
    assert_representation(
        "<?php\n\n$a = new class {};",
        "$v0 = new class\n{\n};",
        r#"{"v0":"a"}"#,
    );
}

#[test]
fn method_mapping() {
    assert_representation(
        "<?php\n\nclass A {\n    public function a() {}\n}\n\nA::a();\n$a->a();",
        "class C0\n{\n    public function m0()\n    {\n    }\n}\nC0::m0();\n$v0->m0();",
        r#"{"C0":"A","m0":"a","v0":"a"}"#,
    );
}

#[test]
fn method_names_are_case_insensitive_across_scripts() {
    assert_representation(
        "<?php\nclass A {\n    public static function ΜΕΘΟΔΟΣ() {}\n}\n\nA::μεθοδοσ();",
        "class C0\n{\n    public static function m0()\n    {\n    }\n}\nC0::m0();",
        r#"{"C0":"A","m0":"ΜΕΘΟΔΟΣ"}"#,
    );
}

#[test]
fn most_common_method_spelling_wins() {
    assert_representation(
        "<?php\n\nclass A {\n    public function A() {}\n}\n\nA::a();\nA::a();",
        "class C0\n{\n    public function m0()\n    {\n    }\n}\nC0::m0();\nC0::m0();",
        r#"{"C0":"A","m0":"a"}"#,
    );
}

#[test]
fn methods_become_public_and_lose_final() {
    assert_representation(
        "<?php\nclass A {\n    private function a() {}\n    final protected function b() {}\n}",
        "class C0\n{\n    public function m0()\n    {\n    }\n    public function m1()\n    {\n    }\n}",
        r#"{"C0":"A","m0":"a","m1":"b"}"#,
    );
}

#[test]
fn dynamic_receivers_and_method_names_are_untouched() {
    assert_representation(
        "<?php\n${a}::${a}();\n${a}->${a}();",
        "${a}::${a}();\n${a}->{${a}}();",
        "{}",
    );
}

#[test]
fn instantiation_chaining_is_canonicalized_with_parentheses() {
    assert_representation(
        "<?php\nnew MyClass()->method();",
        "(new C0())->m0();",
        r#"{"C0":"MyClass","m0":"method"}"#,
    );
    assert_same_representation(
        "<?php\n(new MyClass())->method();",
        "<?php\nnew MyClass()->method();",
    );
}

#[test]
fn class_constant_types_are_stripped() {
    assert_same_representation(
        "<?php\ninterface I {\n    const string PHP = 'PHP 8.3';\n}\n\nclass Php84 implements I {\n    const string PHP = 'PHP 8.4';\n}",
        "<?php\ninterface I {\n    const PHP = 'PHP 8.3';\n}\n\nclass Php84 implements I {\n    const PHP = 'PHP 8.4';\n}",
    );
    assert_representation(
        "<?php\nclass A {\n    const int X = 1;\n}",
        "class C0\n{\n    const X = 1;\n}",
        r#"{"C0":"A"}"#,
    );
}

#[test]
fn interface_names_are_not_renamed() {
    assert_representation(
        "<?php\ninterface Speaker {\n    public function speak();\n}",
        "interface Speaker\n{\n    public function speak();\n}",
        "{}",
    );
}

// --- Fault tolerance ------------------------------------------------------

#[test]
fn unparsable_code_falls_back_to_the_original_text() {
    let code = "<?php fn main() { println!(\"Hello World!\"); }";
    let mut mapping = Mapping::new();
    let result = represent_source(code, &mut mapping);
    assert_eq!(result, code);
    assert_eq!(mapping.to_export_string(), "{}");
}

#[test]
fn cross_file_identifiers_share_stable_names() {
    let mut mapping = Mapping::new();
    let first = represent_source("<?php\nfunction shared() {}", &mut mapping);
    let second = represent_source("<?php\nshared();\nfunction other() {}", &mut mapping);
    assert_eq!(first, "function fn0()\n{\n}");
    assert_eq!(second, "fn0();\nfunction fn1()\n{\n}");
    assert_eq!(
        mapping.to_export_string(),
        r#"{"fn0":"shared","fn1":"other"}"#
    );
}
