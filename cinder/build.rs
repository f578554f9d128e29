fn main() {
    // src/grammar.lalrpop -> $OUT_DIR/grammar.rs
    lalrpop::Configuration::new()
        .use_cargo_dir_conventions()
        .process()
        .unwrap();
}
