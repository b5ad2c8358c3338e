//! End-to-end runs of the pipeline against a temporary workspace.
//!
//! The Java runtime, the package manager and the download server are
//! replaced by the fakes from `antlrgen_pipeline::testing`; everything on
//! disk is real.

use std::{fs, path::PathBuf};

use antlrgen_core::CommandOutput;
use antlrgen_manifest::{Config, Inputs, Settings, Workspace};
use antlrgen_pipeline::{
    Error, Pipeline,
    pipeline::{Plugin, RunContext, StageStatus, TimingPlugin},
    testing::{FakeFetcher, FakeRunner, RecordingPlugin, read_dir_sorted, write_workspace_files},
};
use tempfile::TempDir;

const GRAMMAR_A: &str = "grammar A;\nimport B;\nstart : WORD EOF ;\n";
const GRAMMAR_B: &str = "lexer grammar B;\nWORD : [a-z]+ ;\n";

fn workspace_with_grammars() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write_workspace_files(
        temp.path(),
        &[("grammar/A.g4", GRAMMAR_A), ("grammar/lex/B.g4", GRAMMAR_B)],
    );
    temp
}

fn config_for(temp: &TempDir, settings: Settings) -> Config {
    Config::new(
        Workspace::new(temp.path()).unwrap(),
        Inputs::new("Go", "gen", "grammar/A.g4,grammar/lex/B.g4", "grammar/A.g4").unwrap(),
        settings,
    )
    .unwrap()
}

fn jar() -> FakeFetcher {
    FakeFetcher::serving(b"PK\x03\x04antlr".to_vec())
}

#[test]
fn test_successful_run_populates_output_and_removes_staging() {
    let temp = workspace_with_grammars();
    let config = config_for(&temp, Settings::default());
    let runner = FakeRunner::new();

    let outcome = Pipeline::new()
        .run(&config, &runner, &jar())
        .expect("pipeline should succeed");

    assert_eq!(outcome.output_dir, temp.path().canonicalize().unwrap().join("gen"));
    let generated: Vec<String> = read_dir_sorted(&outcome.output_dir)
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(generated, vec!["ALexer.go", "AParser.go"]);

    assert!(!config.staging_dir().exists());
    assert!(config.tool_archive().is_file());

    // The tool ran once, on the staged entry grammar only.
    let tool_calls: Vec<String> = runner
        .rendered_calls()
        .into_iter()
        .filter(|c| c.contains("org.antlr.v4.Tool"))
        .collect();
    assert_eq!(tool_calls.len(), 1);
    assert!(tool_calls[0].ends_with("/.antlrgen/source/A.g4"));
    assert!(tool_calls[0].contains("-Dlanguage=Go"));
    assert!(tool_calls[0].contains("-Xmx500M"));
}

#[test]
fn test_missing_grammar_fails_in_collect() {
    let temp = TempDir::new().unwrap();
    write_workspace_files(temp.path(), &[("grammar/A.g4", GRAMMAR_A)]);
    let config = config_for(&temp, Settings::default());
    let runner = FakeRunner::new();
    let recorder = RecordingPlugin::new();

    let err = Pipeline::new()
        .plugin(recorder.clone())
        .run(&config, &runner, &jar())
        .unwrap_err();

    assert!(
        matches!(err, Error::MissingSource { ref path, .. } if path.ends_with("grammar/lex/B.g4"))
    );
    assert_eq!(recorder.events().last().map(String::as_str), Some("failed:collect"));
    assert!(!config.output_dir().exists());
    assert!(!config.staging_dir().exists());
    assert!(runner.rendered_calls().iter().all(|c| !c.contains("org.antlr.v4.Tool")));
}

/// Swaps the staging directory for a plain file once generation is done,
/// so removing it fails.
struct BlockStagingRemoval;

impl Plugin for BlockStagingRemoval {
    fn name(&self) -> &'static str {
        "block-staging-removal"
    }

    fn on_after_stage(
        &self,
        stage: &str,
        ctx: &mut RunContext<'_>,
    ) -> antlrgen_pipeline::Result<()> {
        if stage == "generate" {
            let staging = ctx.config.staging_dir();
            fs::remove_dir_all(&staging).map_err(Error::io("failed to remove", &staging))?;
            fs::write(&staging, "in the way").map_err(Error::io("failed to write", &staging))?;
        }
        Ok(())
    }
}

struct FailureCase {
    stage: &'static str,
    runner: FakeRunner,
    fetcher: FakeFetcher,
    prepare: fn(&Config),
    block_clean: bool,
}

impl FailureCase {
    fn new(stage: &'static str, runner: FakeRunner, fetcher: FakeFetcher) -> Self {
        Self {
            stage,
            runner,
            fetcher,
            prepare: |_| {},
            block_clean: false,
        }
    }
}

#[test]
fn test_failure_at_each_stage_stops_the_run() {
    let cases = vec![
        FailureCase::new(
            "provision",
            FakeRunner::new().fail_when("apt-get install", CommandOutput::failed(100, "E: boom\n")),
            jar(),
        ),
        FailureCase::new(
            "fetch",
            FakeRunner::new(),
            FakeFetcher::failing("connection refused"),
        ),
        FailureCase {
            // A plain file where the staging directory goes.
            prepare: |config| {
                fs::create_dir_all(config.work_dir()).unwrap();
                fs::write(config.staging_dir(), "in the way").unwrap();
            },
            ..FailureCase::new("stage", FakeRunner::new(), jar())
        },
        FailureCase {
            prepare: |config| fs::remove_file(config.workspace.join("grammar/lex/B.g4")).unwrap(),
            ..FailureCase::new("collect", FakeRunner::new(), jar())
        },
        FailureCase::new(
            "generate",
            FakeRunner::new()
                .fail_when("org.antlr.v4.Tool", CommandOutput::failed(1, "error(50)\n")),
            jar(),
        ),
        FailureCase {
            block_clean: true,
            ..FailureCase::new("clean", FakeRunner::new(), jar())
        },
    ];

    for case in cases {
        let stage = case.stage;
        let temp = workspace_with_grammars();
        let config = config_for(&temp, Settings::default());
        (case.prepare)(&config);
        let recorder = RecordingPlugin::new();
        let mut pipeline = Pipeline::new().plugin(recorder.clone());
        if case.block_clean {
            pipeline = pipeline.plugin(BlockStagingRemoval);
        }

        let result = pipeline.run(&config, &case.runner, &case.fetcher);

        assert!(result.is_err(), "{stage} should fail");
        let events = recorder.events();
        assert_eq!(events.last().unwrap(), &format!("failed:{stage}"));
        let last_started = events.iter().rev().find(|e| e.starts_with("before:"));
        assert_eq!(
            last_started,
            Some(&format!("before:{stage}")),
            "{stage}: a later stage ran after the failure"
        );
        assert!(!config.staging_dir().is_dir(), "{stage}: staging left behind");
    }
}

#[test]
fn test_cleanup_failure_fails_a_finished_generation() {
    let temp = workspace_with_grammars();
    let config = config_for(&temp, Settings::default());

    let err = Pipeline::new()
        .plugin(BlockStagingRemoval)
        .run(&config, &FakeRunner::new(), &jar())
        .unwrap_err();

    assert!(
        matches!(err, Error::Io { action: "failed to remove staging directory", .. }),
        "unexpected: {err:?}"
    );
    // The generated sources are kept even though the run failed.
    let generated: Vec<String> = read_dir_sorted(&config.output_dir())
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(generated, vec!["ALexer.go", "AParser.go"]);
}

#[test]
fn test_user_files_at_the_staging_path_survive() {
    let temp = TempDir::new().unwrap();
    write_workspace_files(
        temp.path(),
        &[
            ("build/source/A.g4", GRAMMAR_A),
            ("build/source/notes.txt", "keep me\n"),
            ("grammar/lex/B.g4", GRAMMAR_B),
        ],
    );
    let settings = Settings {
        work_dir: PathBuf::from("build"),
        ..Settings::default()
    };
    let config = Config::new(
        Workspace::new(temp.path()).unwrap(),
        Inputs::new("Go", "gen", "build/source/A.g4,grammar/lex/B.g4", "A.g4").unwrap(),
        settings,
    )
    .unwrap();

    let err = Pipeline::new()
        .run(&config, &FakeRunner::new(), &jar())
        .unwrap_err();

    assert!(matches!(err, Error::UnownedStaging { .. }), "unexpected: {err:?}");
    assert_eq!(
        read_dir_sorted(&temp.path().join("build/source")),
        vec![
            ("A.g4".to_string(), GRAMMAR_A.to_string()),
            ("notes.txt".to_string(), "keep me\n".to_string()),
        ]
    );
}

#[test]
fn test_output_inside_staging_is_rejected_up_front() {
    let temp = workspace_with_grammars();

    let err = Config::new(
        Workspace::new(temp.path()).unwrap(),
        Inputs::new("Go", ".antlrgen/source/gen", "grammar/A.g4", "grammar/A.g4").unwrap(),
        Settings::default(),
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "invalid input 'output': '.antlrgen/source/gen' overlaps the work directory '.antlrgen'"
    );
}

#[test]
fn test_hooks_fire_in_stage_order() {
    let temp = workspace_with_grammars();
    let config = config_for(&temp, Settings::default());
    let recorder = RecordingPlugin::new();

    Pipeline::new()
        .plugin(recorder.clone())
        .run(&config, &FakeRunner::new(), &jar())
        .unwrap();

    let expected: Vec<String> = ["provision", "fetch", "stage", "collect", "generate", "clean"]
        .iter()
        .flat_map(|s| [format!("before:{s}"), format!("after:{s}")])
        .collect();
    assert_eq!(recorder.events(), expected);
}

#[test]
fn test_rerun_produces_identical_output() {
    let temp = workspace_with_grammars();
    let config = config_for(&temp, Settings::default());

    let first = Pipeline::new().run(&config, &FakeRunner::new(), &jar()).unwrap();
    let first_files = read_dir_sorted(&first.output_dir);

    let second = Pipeline::new().run(&config, &FakeRunner::new(), &jar()).unwrap();

    assert_eq!(read_dir_sorted(&second.output_dir), first_files);
    assert!(!config.staging_dir().exists());
}

#[test]
fn test_stale_staging_does_not_block_rerun() {
    let temp = workspace_with_grammars();
    let config = config_for(&temp, Settings::default());
    write_workspace_files(
        temp.path(),
        &[
            (".antlrgen/source/.antlrgen-staging", ""),
            (".antlrgen/source/Stale.g4", "grammar Stale;\n"),
        ],
    );

    let outcome = Pipeline::new().run(&config, &FakeRunner::new(), &jar()).unwrap();

    assert!(!config.staging_dir().exists());
    assert!(
        outcome
            .diagnostics
            .iter()
            .any(|d| d.stage == "stage" && d.message.starts_with("replaced stale"))
    );
}

#[test]
fn test_download_failures_leave_no_partial_archive() {
    let fetchers = vec![
        FakeFetcher::failing("server answered 503 Service Unavailable"),
        FakeFetcher::truncated(b"PK".to_vec(), 4096),
        FakeFetcher::breaking_after(b"PK\x03".to_vec()),
        FakeFetcher::serving(Vec::new()),
    ];

    for fetcher in fetchers {
        let temp = workspace_with_grammars();
        let config = config_for(&temp, Settings::default());

        let err = Pipeline::new()
            .run(&config, &FakeRunner::new(), &fetcher)
            .unwrap_err();

        assert!(matches!(err, Error::Download { .. }), "unexpected: {err:?}");
        assert!(!config.tool_archive().exists());
        // Nothing but the (empty) work directory remains.
        assert_eq!(fs::read_dir(config.work_dir()).unwrap().count(), 0);
    }
}

#[test]
fn test_strict_and_relaxed_stderr() {
    let warning = CommandOutput {
        code: Some(0),
        stdout: String::new(),
        stderr: "warning(154): A.g4:2:0: rule start contains an optional block\n".to_string(),
    };

    let temp = workspace_with_grammars();
    let strict = config_for(&temp, Settings::default());
    let err = Pipeline::new()
        .run(
            &strict,
            &FakeRunner::new().respond_when("org.antlr.v4.Tool", warning.clone()),
            &jar(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::Generator { .. }));

    let mut settings = Settings::default();
    settings.generator.strict_stderr = false;
    let relaxed = config_for(&temp, settings);
    let outcome = Pipeline::new()
        .run(
            &relaxed,
            &FakeRunner::new().respond_when("org.antlr.v4.Tool", warning),
            &jar(),
        )
        .unwrap();
    let warnings: Vec<_> = outcome
        .diagnostics
        .iter()
        .filter(|d| d.severity.is_warning())
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].stage, "generate");
}

#[test]
fn test_provision_failure_keeps_output_verbatim() {
    let temp = workspace_with_grammars();
    let config = config_for(&temp, Settings::default());
    let runner = FakeRunner::new().fail_when(
        "apt-get update",
        CommandOutput {
            code: Some(100),
            stdout: "Hit:1 http://archive.ubuntu.com/ubuntu focal InRelease\n".to_string(),
            stderr: "E: Problem executing scripts APT::Update::Post-Invoke-Success\n".to_string(),
        },
    );

    let err = Pipeline::new().run(&config, &runner, &jar()).unwrap_err();

    insta::assert_snapshot!(err.to_string(), @r"
    provisioning the Java runtime failed: `sudo apt-get update` exited with exit status 100
    --- stdout ---
    Hit:1 http://archive.ubuntu.com/ubuntu focal InRelease
    --- stderr ---
    E: Problem executing scripts APT::Update::Post-Invoke-Success
    ");
    assert!(!config.work_dir().exists());
}

#[test]
fn test_timing_plugin_reports_failed_stage() {
    let temp = workspace_with_grammars();
    let config = config_for(&temp, Settings::default());
    let timing = TimingPlugin::new();

    let _ = Pipeline::new()
        .plugin(timing.clone())
        .run(&config, &FakeRunner::new(), &FakeFetcher::failing("offline"));

    let records = timing.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].status, StageStatus::Completed);
    assert_eq!(records[1].name, "fetch");
    assert_eq!(records[1].status, StageStatus::Failed);
}
