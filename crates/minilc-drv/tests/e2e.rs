mod e2e {
    mod cli_tests;
    mod pipeline_tests;
}
