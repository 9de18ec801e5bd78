//! Behaviour-driven step definitions driving the score CLI scenarios.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use clap::Parser;
use routerisk_core::ScoreResponse;
use routerisk_evaluator::BatchError;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;
use tempfile::TempDir;

use super::helpers::{StubProviderBuilder, temp_root, two_route_request, write_utf8};
use super::*;
use crate::score::run_score_with;

#[derive(Debug)]
struct ScoreWorld {
    _tmp: TempDir,
    request_path: Utf8PathBuf,
    include_request: RefCell<bool>,
    include_weather_token: RefCell<bool>,
    providers: RefCell<StubProviderBuilder>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl ScoreWorld {
    fn new() -> Self {
        let (tmp, root) = temp_root();
        Self {
            _tmp: tmp,
            request_path: root.join("request.json"),
            include_request: RefCell::new(true),
            include_weather_token: RefCell::new(true),
            providers: RefCell::new(StubProviderBuilder::moderate()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["routerisk".to_owned(), "score".to_owned()];
        if *self.include_request.borrow() {
            argv.push(self.request_path.as_str().to_owned());
        }
        argv.extend([format!("--{ARG_AIR_QUALITY_KEY}"), "test-key".to_owned()]);
        if *self.include_weather_token.borrow() {
            argv.extend([format!("--{ARG_WEATHER_TOKEN}"), "test-token".to_owned()]);
        }
        argv
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> ScoreWorld {
    ScoreWorld::new()
}

#[given("a score request with two routes exists on disk")]
fn two_route_request_exists(#[from(world)] world: &ScoreWorld) {
    write_utf8(
        &world.request_path,
        two_route_request().to_string().as_bytes(),
    );
}

#[given("a score request without routes exists on disk")]
fn empty_request_exists(#[from(world)] world: &ScoreWorld) {
    write_utf8(
        &world.request_path,
        json!({ "routes": [] }).to_string().as_bytes(),
    );
}

#[given("the score request contains invalid JSON")]
fn request_contains_invalid_json(#[from(world)] world: &ScoreWorld) {
    write_utf8(&world.request_path, b"{ not valid json");
}

#[given("the pollution provider is unavailable")]
fn pollution_unavailable(#[from(world)] world: &ScoreWorld) {
    world.providers.borrow_mut().pollution = None;
}

#[given("I omit the score request path")]
fn omit_request_path(#[from(world)] world: &ScoreWorld) {
    *world.include_request.borrow_mut() = false;
}

#[given("I omit the weather token")]
fn omit_weather_token(#[from(world)] world: &ScoreWorld) {
    *world.include_weather_token.borrow_mut() = false;
}

#[when("I run the score command")]
fn run_score_command(#[from(world)] world: &ScoreWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Score(args) => {
            let builder = *world.providers.borrow();
            let mut buffer = world.stdout.borrow_mut();
            run_score_with(args, &builder, &mut *buffer)
        }
        Command::OntologyStatus(_) => panic!("expected score command"),
    });

    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints {count} route scores")]
fn command_prints_scores(#[from(world)] world: &ScoreWorld, count: usize) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let response: ScoreResponse =
        serde_json::from_str(&stdout).expect("output should be a JSON score response");
    assert_eq!(response.scores.len(), count);
}

#[then("route \"{id}\" is reported with note \"{note}\"")]
fn route_has_note(#[from(world)] world: &ScoreWorld, id: String, note: String) {
    let response: ScoreResponse =
        serde_json::from_slice(&world.stdout.borrow()).expect("score response JSON");
    let score = response
        .scores
        .iter()
        .find(|score| score.id == id)
        .unwrap_or_else(|| panic!("route {id} missing from output"));
    assert_eq!(score.note, note);
}

#[then("the command fails because the request JSON is invalid")]
fn command_fails_invalid_json(#[from(world)] world: &ScoreWorld) {
    match &*world.error() {
        CliError::ParseScoreRequest { .. } => {}
        other => panic!("expected ParseScoreRequest, found {other:?}"),
    }
}

#[then("the command fails because the batch is empty")]
fn command_fails_empty_batch(#[from(world)] world: &ScoreWorld) {
    match &*world.error() {
        CliError::Score {
            source: BatchError::EmptyBatch,
        } => {}
        other => panic!("expected an empty batch failure, found {other:?}"),
    }
}

#[then("the command fails because {option} is missing")]
fn command_fails_missing_option(#[from(world)] world: &ScoreWorld, option: String) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, option),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

macro_rules! register_score_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/score_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: ScoreWorld) {
            let _ = world;
        }
    };
}

register_score_scenario!(score_happy_path, "scoring a request from JSON");
register_score_scenario!(
    score_without_pollution,
    "scoring without pollution data"
);
register_score_scenario!(score_invalid_json, "rejecting invalid JSON input");
register_score_scenario!(score_empty_batch, "rejecting a request without routes");
register_score_scenario!(score_missing_request, "rejecting missing request paths");
register_score_scenario!(score_missing_token, "rejecting missing credentials");
