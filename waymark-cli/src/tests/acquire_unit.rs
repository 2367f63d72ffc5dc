//! Focused unit tests covering acquire CLI configuration and reporting.

use super::helpers::{ScriptedClientBuilder, Workspace, paris_client};
use super::*;
use crate::acquire::{
    AcquireArgs, AcquireConfig, config_from_layers_for_test, load_locations, run_acquire_with,
};
use ortho_config::MergeComposer;
use rstest::rstest;
use serde_json::{Value, json};
use waymark_core::{LatLng, Location};

fn args(workspace: &Workspace, locations: &str) -> AcquireArgs {
    AcquireArgs {
        query: Some("bakery".to_owned()),
        locations: Some(workspace.write("locations.txt", locations)),
        output_dir: Some(workspace.root().join("out")),
        page_delay_secs: Some(0),
        ..AcquireArgs::default()
    }
}

fn read_json(path: &camino::Utf8Path) -> Value {
    let text = std::fs::read_to_string(path).expect("read output");
    serde_json::from_str(&text).expect("output is JSON")
}

#[rstest]
#[case::query(AcquireArgs { query: None, ..AcquireArgs::default() }, ARG_QUERY, ENV_ACQUIRE_QUERY)]
#[case::locations(
    AcquireArgs { query: Some("bakery".into()), ..AcquireArgs::default() },
    ARG_LOCATIONS,
    ENV_ACQUIRE_LOCATIONS
)]
#[case::output(
    AcquireArgs {
        query: Some("bakery".into()),
        locations: Some("locations.txt".into()),
        ..AcquireArgs::default()
    },
    ARG_OUTPUT_DIR,
    ENV_ACQUIRE_OUTPUT_DIR
)]
fn converting_without_required_fields_errors(
    #[case] input: AcquireArgs,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    match AcquireConfig::try_from(input).expect_err("missing field should error") {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn options_default_to_aborting_over_every_line() {
    let workspace = Workspace::new();
    let config = AcquireConfig::try_from(args(&workspace, "Paris\n")).expect("config should build");
    assert!(config.options.raise_on_error);
    assert_eq!(config.options.start_index, 0);
    assert_eq!(config.options.stop_index, None);
    assert_eq!(config.options.settings.result_cap.get(), 10);
}

#[rstest]
fn keep_going_and_range_flags_shape_the_options() {
    let invocation = [
        "waymark",
        "acquire",
        "bakery",
        "--locations",
        "locations.txt",
        "--output-dir",
        "out",
        "--keep-going",
        "--start-index",
        "2",
        "--stop-index",
        "5",
    ];
    let cli = Cli::try_parse_from(invocation).expect("arguments should parse");
    let Command::Acquire(parsed) = cli.command else {
        panic!("expected acquire command");
    };
    let config = AcquireConfig::try_from(parsed).expect("config should build");
    assert!(!config.options.raise_on_error);
    assert_eq!(config.options.start_index, 2);
    assert_eq!(config.options.stop_index, Some(5));
}

#[rstest]
fn validate_sources_reports_missing_and_directory_paths() {
    let workspace = Workspace::new();
    let mut config = AcquireConfig::try_from(args(&workspace, "Paris\n")).expect("config");

    config.locations = workspace.root().join("missing.txt");
    match config.validate_sources().expect_err("missing file") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_LOCATIONS),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }

    config.locations = workspace.root().join("absent").join("locations.txt");
    match config.validate_sources().expect_err("missing parent") {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_LOCATIONS),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }

    config.locations = workspace.root().to_path_buf();
    match config.validate_sources().expect_err("directory") {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_LOCATIONS),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn location_files_skip_blank_lines() {
    let workspace = Workspace::new();
    let path = workspace.write("locations.txt", "Paris\n\n  48.5, 2.25 \n\t\nLyon");
    let locations = load_locations(&path).expect("locations should load");
    assert_eq!(
        locations,
        vec![
            Location::Place("Paris".into()),
            Location::Coordinates(LatLng::new(48.5, 2.25)),
            Location::Place("Lyon".into()),
        ]
    );
}

#[rstest]
fn merge_layers_honours_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "query": "bakery",
            "locations": "from-file.txt",
            "output_dir": "from-file",
            "keep_going": true,
        }),
        None,
    );
    composer.push_environment(json!({ "output_dir": "from-env" }));
    composer.push_cli(json!({ "stop_index": 4 }));

    let config = config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.locations.as_str(), "from-file.txt");
    assert_eq!(config.output_dir.as_str(), "from-env");
    assert!(!config.options.raise_on_error);
    assert_eq!(config.options.stop_index, Some(4));
}

#[rstest]
fn tolerated_failures_are_reported_on_stdout() {
    let workspace = Workspace::new();
    let builder = ScriptedClientBuilder::new(paris_client());
    let input = AcquireArgs {
        keep_going: Some(true),
        ..args(&workspace, "Paris\n\n48.5,2.25\nAtlantis\n")
    };
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    run_acquire_with(input, &builder, &mut stdout, &mut stderr).expect("run should complete");

    let out = workspace.root().join("out");
    assert_eq!(read_json(&out.join("Paris.json")).as_array().map(Vec::len), Some(3));
    assert_eq!(read_json(&out.join("48.5,2.25.json")).as_array().map(Vec::len), Some(3));
    assert!(!out.join("Atlantis.json").as_std_path().exists());

    let report: Value = serde_json::from_slice(&stdout).expect("report is JSON");
    assert_eq!(
        report,
        json!([{
            "index": 2,
            "query": "bakery",
            "location": "Atlantis",
            "message": "could not find location for \"Atlantis\"",
        }])
    );
    let progress = String::from_utf8(stderr).expect("progress is UTF-8");
    assert!(progress.contains("Number of errors: 1"), "{progress}");
}

#[rstest]
fn aborting_runs_surface_the_failure() {
    let workspace = Workspace::new();
    let builder = ScriptedClientBuilder::new(paris_client());
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();

    let err = run_acquire_with(
        args(&workspace, "Atlantis\nParis\n"),
        &builder,
        &mut stdout,
        &mut stderr,
    )
    .expect_err("first failure should abort");

    assert!(matches!(err, CliError::Acquire(_)), "{err:?}");
    assert!(stdout.is_empty());
    assert!(!workspace.root().join("out").join("Paris.json").as_std_path().exists());
}
