//! Integration tests for the TaiScript interpreter.
//!
//! Tests key interpreter features:
//! - expression evaluation (right-associative chains, interpolation, coercion)
//! - loops (direction, re-read variable, break, iteration limit)
//! - structs and files
//! - input binding
//! - bribe gating across the LINEAR and NESTED regimes
//! - runtime errors keeping prior output

use pretty_assertions::assert_eq;
use tai_eval::{
    BribeConfig, BribeError, EvalError, Interpreter, InterpreterConfig, Regime, ScriptedInput,
};
use tai_parser::parse_source;
use tai_types::SourceFile;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Profile that costs nothing, for tests that are not about payments.
const FREE: &str = "parichay \"CHACHA VIDHAYAK HAI\"\n";

fn config() -> InterpreterConfig {
    InterpreterConfig {
        bribe: BribeConfig {
            current_year: Some(2025),
            ..BribeConfig::default()
        },
        ..InterpreterConfig::default()
    }
}

fn run_with(source: &str, config: InterpreterConfig, input: ScriptedInput) -> (Interpreter, Result<(), EvalError>) {
    let sf = SourceFile::new("test.tai", source);
    let program = match parse_source(&sf) {
        Ok(program) => program,
        Err(e) => panic!("parse error: {e}"),
    };
    let mut interp = Interpreter::new(config, Box::new(input));
    let result = interp.interpret(&program);
    (interp, result)
}

fn run(source: &str) -> (Interpreter, Result<(), EvalError>) {
    run_with(source, config(), ScriptedInput::empty())
}

/// Run a program under the free profile and return its output log.
fn output(body: &str) -> Vec<String> {
    let (interp, _) = run(&format!("{FREE}{body}"));
    interp.output().to_vec()
}

fn lines(expected: &[&str]) -> Vec<String> {
    expected.iter().map(|s| s.to_string()).collect()
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_right_associative_chains() {
    assert_eq!(
        output("ghoshna 10 me jodo 5 me jodo 2\nghoshna 10 se ghatao 5 se ghatao 2"),
        lines(&["17", "7"])
    );
}

#[test]
fn test_division_and_remainder() {
    assert_eq!(
        output("ghoshna 7 ka bhag karo 2\nghoshna 7 ka shesh bhag karo 4\nghoshna 6 me guna karo 7"),
        lines(&["3.5", "3", "42"])
    );
}

#[test]
fn test_division_by_zero_keeps_prior_output() {
    let (interp, result) = run(&format!(
        "{FREE}ghoshna \"pehle\"\nghoshna 1 ka bhag karo 0\nghoshna \"baad\""
    ));
    assert_eq!(result, Err(EvalError::DivisionByZero));
    assert_eq!(
        interp.output(),
        &lines(&["pehle", "Runtime Error: Division by zero."])[..]
    );
}

#[test]
fn test_remainder_by_zero() {
    assert_eq!(
        output("ghoshna \"pehle\"\nghoshna 5 ka shesh bhag karo 0"),
        lines(&["pehle", "Runtime Error: Modulo by zero."])
    );
}

#[test]
fn test_string_concatenation_and_interpolation() {
    assert_eq!(
        output(
            r#"likho naam "Ramesh"
               likho umar 41
               ghoshna "Naam: {naam}, umar: {umar}"
               ghoshna "saal " me jodo umar
               ghoshna "{ naam } {} {umar"
               likho khali
               ghoshna "[{khali}]""#
        ),
        lines(&[
            "Naam: Ramesh, umar: 41",
            "saal 41",
            "{ naam } {} {umar",
            "[khaali]",
        ])
    );
}

#[test]
fn test_interpolating_undefined_variable_fails() {
    assert_eq!(
        output("ghoshna \"kaun {bhoot}\""),
        lines(&["Runtime Error: Variable 'bhoot' is not defined."])
    );
}

#[test]
fn test_print_on_same_line() {
    assert_eq!(
        output("ghoshna \"a\" isi line pe\nghoshna \"b\" isi line pe\nghoshna \"c\"\nghoshna \"d\" isi line pe"),
        lines(&["ab", "cd"])
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Conditionals
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_if_else() {
    let body = r#"
        likho a 7
        agar a bada hai 5 se toh {
            ghoshna "bada"
        } warna {
            ghoshna "chota"
        }
        agar a chota hai 5 { ghoshna "nahi chalega" }
        agar "abc" chota hai "abd" { ghoshna "shabdkosh" }
    "#;
    assert_eq!(output(body), lines(&["bada", "shabdkosh"]));
}

#[test]
fn test_true_condition_with_empty_branch_fails() {
    assert_eq!(
        output("agar 1 barabar hai 1 { } warna { ghoshna \"x\" }"),
        lines(&["Runtime Error: Missing 'if' branch in conditional."])
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Loops
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_loop_directions() {
    assert_eq!(
        output("ginti karo i 1 se 3 tak { ghoshna i } ginti band"),
        lines(&["1", "2", "3"])
    );
    assert_eq!(
        output("ginti karo i 10 se 1 tak ghatao 3 { ghoshna i } ginti band"),
        lines(&["10", "7", "4", "1"])
    );
    assert_eq!(
        output("ginti karo i 5 se 1 tak { ghoshna i } ginti band\nghoshna \"khatam\""),
        lines(&["khatam"])
    );
}

#[test]
fn test_loop_end_from_variable() {
    assert_eq!(
        output("likho n 3\nginti karo i 0 se n tak badhao 2 { ghoshna i } ginti band"),
        lines(&["0", "2"])
    );
}

#[test]
fn test_loop_variable_is_reread() {
    assert_eq!(
        output("ginti karo i 1 se 5 tak {\n ghoshna i\n likho i 10\n} ginti band\nghoshna i"),
        lines(&["1", "11"])
    );
}

#[test]
fn test_loop_bounds_must_be_whole_numbers() {
    assert_eq!(
        output("likho n \"das\"\nginti karo i 1 se n tak { } ginti band"),
        lines(&["Runtime Error: loop bounds must be whole numbers: end is das"])
    );
    assert_eq!(
        output("likho n 5 ka bhag karo 2\nginti karo i 1 se n tak { } ginti band"),
        lines(&["Runtime Error: loop bounds must be whole numbers: end is 2.5"])
    );
}

#[test]
fn test_break_leaves_innermost_loop() {
    let body = r#"
        ginti karo i 1 se 2 tak {
            ginti karo j 1 se 5 tak {
                agar j bada hai 1 { bijli chali gayi }
                ghoshna "{i}-{j}"
            } ginti band
        } ginti band
        ghoshna "bahar"
    "#;
    assert_eq!(output(body), lines(&["1-1", "2-1", "bahar"]));
}

#[test]
fn test_break_outside_loop_fails() {
    assert_eq!(
        output("ghoshna 1\nbijli chali gayi"),
        lines(&["1", "Runtime Error: 'bijli chali gayi' used outside a loop."])
    );
}

#[test]
fn test_return_stops_successfully() {
    let (interp, result) = run(&format!(
        "{FREE}ginti karo i 1 se 3 tak {{ ghoshna i\n sarkar gir gayi }} ginti band\nghoshna \"nahi\""
    ));
    assert_eq!(result, Ok(()));
    assert_eq!(interp.output(), &lines(&["1"])[..]);
    assert_eq!(interp.bribe().depth(), 0);
}

#[test]
fn test_iteration_limit() {
    let mut config = config();
    config.loop_iteration_limit = Some(3);
    let (interp, result) = run_with(
        &format!("{FREE}ginti karo i 1 se 1 tak badhao 0 {{ ghoshna i }} ginti band"),
        config,
        ScriptedInput::empty(),
    );
    assert_eq!(result, Err(EvalError::LoopLimit { limit: 3 }));
    assert_eq!(
        interp.output(),
        &lines(&["1", "1", "1", "Runtime Error: loop exceeded the iteration limit of 3"])[..]
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Structs
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_struct_instance_has_empty_fields() {
    let body = r#"
        dhacha banao TaxPayer { likho name; likho age }
        likho tp aur usko banao TaxPayer
        ghoshna tp
        ghoshna name
    "#;
    assert_eq!(
        output(body),
        lines(&[
            "TaxPayer { name: khaali, age: khaali }",
            "Runtime Error: Variable 'name' is not defined.",
        ])
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Files
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_file_open_write_close() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("pehla.txt");
    let b = dir.path().join("doosra.txt");
    let body = format!(
        r#"file kholo "{}" aur naam do pehla
           file kholo "{}" aur naam do doosra
           pehla me likho "ek"
           pehla me likho 2 me jodo 3 isi line pe
           doosra me likho "do"
           pehla band karo
           band karo doosra"#,
        a.display(),
        b.display()
    );
    let (_, result) = run(&format!("{FREE}{body}"));
    assert_eq!(result, Ok(()));
    assert_eq!(std::fs::read_to_string(&a).unwrap(), "ek\n5");
    assert_eq!(std::fs::read_to_string(&b).unwrap(), "do\n");
}

#[test]
fn test_file_alias_misuse() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("f.txt");
    let reopen = format!(
        "file kholo \"{0}\" aur naam do f\nfile kholo \"{0}\" aur naam do f",
        path.display()
    );
    assert_eq!(
        output(&reopen),
        lines(&["Runtime Error: File alias 'f' is already in use."])
    );
    assert_eq!(
        output("ghost me likho 1"),
        lines(&["Runtime Error: File alias 'ghost' is not open."])
    );
    assert_eq!(
        output("band karo ghost"),
        lines(&["Runtime Error: File alias 'ghost' is not open."])
    );
}

#[test]
fn test_open_files_are_flushed_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("adhura.txt");
    let body = format!(
        "file kholo \"{}\" aur naam do f\nf me likho \"likha gaya\"\nghoshna 1 ka bhag karo 0",
        path.display()
    );
    let (interp, _) = run(&format!("{FREE}{body}"));
    assert!(!interp.env().is_open("f"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "likha gaya\n");
}

// ══════════════════════════════════════════════════════════════════════════════
// Input
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_input_binding() {
    let (interp, result) = run_with(
        &format!(
            "{FREE}pucho umar\npucho naam\npucho khali\nghoshna umar me jodo 1\nghoshna naam\nghoshna \"[{{khali}}]\""
        ),
        config(),
        ScriptedInput::new(["41", "Ramesh"]),
    );
    assert_eq!(result, Ok(()));
    assert_eq!(interp.output(), &lines(&["42", "Ramesh", "[]"])[..]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Bribes
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_profile_required_before_gated_statements() {
    let (interp, result) = run("pucho x\nghoshna 1");
    assert_eq!(result, Err(EvalError::Bribe(BribeError::ProfileNotDeclared)));
    assert_eq!(interp.output().len(), 1);
    assert!(interp.output()[0].starts_with("Runtime Error: No parichay given."));
}

#[test]
fn test_unknown_profile() {
    let (interp, _) = run("parichay \"RAJA\"");
    assert_eq!(interp.output(), &lines(&["Runtime Error: Unknown parichay: RAJA"])[..]);
}

#[test]
fn test_student_pays_half_of_janta() {
    let program = |profile: &str| {
        format!("parichay \"{profile}\"\nghoos lo 250\nginti karo i 1 se 1 tak {{ ghoshna \"kaam ho gaya\" }} ginti band")
    };
    let (student, result) = run(&program("STUDENT"));
    assert_eq!(result, Ok(()));
    assert_eq!(student.output(), &lines(&["kaam ho gaya"])[..]);

    let (janta, result) = run(&program("JANTA"));
    assert_eq!(result, Err(EvalError::Bribe(BribeError::Deficit { deficit: 250.0 })));
    assert_eq!(
        janta.output(),
        &lines(&["Runtime Error: Your work progress has been halted due to insufficient sweet packets. The loop needs 250 more."])[..]
    );

    assert_eq!(student.bribe().required_total(), 250.0);
    assert_eq!(janta.bribe().required_total(), 500.0);
}

#[test]
fn test_linear_statements_need_base_cost() {
    let (interp, result) = run("parichay \"janta\"\nghoos lo 200\nghoos lo 200\nghoshna \"nahi\"");
    assert_eq!(
        result,
        Err(EvalError::Bribe(BribeError::Insufficient { shortfall: 100.0 }))
    );
    assert_eq!(interp.bribe().collected(), 400.0);

    let (interp, result) =
        run("parichay \"janta\"\nghoos lo 500\nghoshna \"ek\"\nghoshna \"do\"");
    assert_eq!(result, Ok(()));
    assert_eq!(interp.output(), &lines(&["ek", "do"])[..]);
    assert_eq!(interp.bribe().collected(), 500.0);
}

#[test]
fn test_nested_loop_recharged_each_outer_iteration() {
    let nested = "ginti karo i 1 se 2 tak {\n ginti karo j 1 se 2 tak { ghoshna j } ginti band\n} ginti band";

    let (interp, result) = run(&format!("parichay \"JANTA\"\nghoos lo 1000\n{nested}"));
    assert_eq!(result, Err(EvalError::Bribe(BribeError::Deficit { deficit: 500.0 })));
    assert_eq!(&interp.output()[..2], &lines(&["1", "2"])[..]);
    assert_eq!(interp.bribe().depth(), 0);

    let (interp, result) = run(&format!("parichay \"JANTA\"\nghoos lo 1500\n{nested}"));
    assert_eq!(result, Ok(()));
    assert_eq!(interp.output(), &lines(&["1", "2", "1", "2"])[..]);
    assert_eq!(interp.bribe().collected(), 0.0);
    assert_eq!(interp.bribe().regime(), Regime::Nested);
}

#[test]
fn test_statement_after_loops_returns_to_linear() {
    let source = "parichay \"JANTA\"\nghoos lo 1000\nginti karo i 1 se 3 tak { ghoshna i } ginti band\nghoshna \"bahar\"";
    let (interp, result) = run(source);
    assert_eq!(result, Ok(()));
    assert_eq!(interp.output(), &lines(&["1", "2", "3", "bahar"])[..]);
    assert_eq!(interp.bribe().regime(), Regime::Linear);
    assert_eq!(interp.bribe().collected(), 500.0);

    let source = "parichay \"JANTA\"\nghoos lo 900\nginti karo i 1 se 3 tak { ghoshna i } ginti band\nghoshna \"bahar\"";
    let (_, result) = run(source);
    assert_eq!(
        result,
        Err(EvalError::Bribe(BribeError::Insufficient { shortfall: 100.0 }))
    );
}

#[test]
fn test_program_ending_in_loop_stays_nested() {
    let (interp, result) =
        run("parichay \"JANTA\"\nghoos lo 500\nginti karo i 1 se 2 tak { } ginti band");
    assert_eq!(result, Ok(()));
    assert_eq!(interp.bribe().regime(), Regime::Nested);
}

#[test]
fn test_yearly_growth() {
    let mut config = config();
    config.bribe.current_year = Some(2027);
    let (interp, result) = run_with(
        "parichay \"JANTA\"\nghoos lo 1000\nghoshna 1",
        config,
        ScriptedInput::empty(),
    );
    assert_eq!(interp.bribe().base_cost(), 1125.0);
    assert_eq!(
        result,
        Err(EvalError::Bribe(BribeError::Insufficient { shortfall: 125.0 }))
    );
}

#[test]
fn test_commentary() {
    let mut config = config();
    config.commentary = true;
    let (interp, result) = run_with(
        "parichay \"STUDENT\"\nghoos lo 250\nghoshna \"x\"\nghoshna \"y\"",
        config,
        ScriptedInput::empty(),
    );
    assert_eq!(result, Ok(()));
    assert_eq!(
        interp.output(),
        &lines(&[
            "Bribe collected so far: 250",
            "Discount laga diya hai! Ghoos student-friendly bana di gayi hai!",
            "x",
            "y",
        ])[..]
    );
}

#[test]
fn test_program_end_marker_does_not_stop_execution() {
    assert_eq!(
        output("agar 1 barabar hai 1 { yojna band }\nghoshna \"aage\"\nyojna band\nghoshna \"baad\""),
        lines(&["aage", "baad"])
    );
}

#[test]
fn test_same_line_print_after_commentary_starts_new_entry() {
    let mut config = config();
    config.commentary = true;
    let (interp, result) = run_with(
        "parichay \"STUDENT\"\nghoos lo 250\nghoshna \"a\" isi line pe\nghoshna \"b\" isi line pe",
        config,
        ScriptedInput::empty(),
    );
    assert_eq!(result, Ok(()));
    assert_eq!(
        interp.output(),
        &lines(&[
            "Bribe collected so far: 250",
            "Discount laga diya hai! Ghoos student-friendly bana di gayi hai!",
            "ab",
        ])[..]
    );
}

#[test]
fn test_rejected_loop_entry_leaves_depth_unchanged() {
    let (interp, result) =
        run("parichay \"JANTA\"\nghoos lo 100\nginti karo i 1 se 2 tak { ghoshna i } ginti band");
    assert_eq!(result, Err(EvalError::Bribe(BribeError::Deficit { deficit: 400.0 })));
    assert_eq!(interp.bribe().depth(), 0);
}

#[test]
fn test_no_commentary_by_default() {
    let (interp, _) = run("parichay \"NETA JI\"\nghoos lo 1\nghoshna \"x\"");
    assert_eq!(interp.output(), &lines(&["x"])[..]);
}

#[test]
fn test_assess_reports_cost_factor() {
    let sf = SourceFile::new(
        "t.tai",
        "ginti karo i 1 2 { ginti karo j 1 2 { } ginti band } ginti band\nginti karo k 1 2 { } ginti band",
    );
    let program = parse_source(&sf).unwrap();
    let mut interp = Interpreter::new(config(), Box::new(ScriptedInput::empty()));
    assert_eq!(interp.assess(&program), 4);
    assert_eq!(interp.bribe().required_total(), 2000.0);
}

// ══════════════════════════════════════════════════════════════════════════════
// Isolation
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_runs_are_independent() {
    let source = format!("{FREE}likho x 1\nghoshna x");
    let (first, _) = run(&source);
    let (second, _) = run(&source);
    assert_eq!(first.output(), second.output());
    assert_eq!(first.output_text(), "1");
}
