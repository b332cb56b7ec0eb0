#[test]
fn dreg_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/dreg_error_pass.rs");
    t.pass("tests/ui/dreg_error_context_chain.rs");
}
