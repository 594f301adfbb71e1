mod common;

use std::sync::Arc;

use common::{
    ok_json, shared, status, test_config, FakeHttp, MemoryState, RecordingPublisher, ScriptedRng,
    APOD_URL, EPIC_URL,
};
use stellarpost::app::{context::AppContext, runner::{RunError, Runner}};
use stellarpost::domain::model::{AppConfig, RunOutcome};
use stellarpost::ports::source::ImageSource;
use stellarpost::sources::{ApodSource, EpicSource};

const APOD_BODY: &str = r#"{"date":"2024-03-05","title":"NGC 891","explanation":"Edge-on.","url":"https://apod.nasa.gov/x.jpg"}"#;
const EPIC_BODY: &str = r#"[{"image":"epic_1b_20240305","date":"2024-03-05 00:31:45"}]"#;
const EPIC_ID: &str = "https://epic.gsfc.nasa.gov/archive/natural/2024/03/05/jpg/epic_1b_20240305.jpg";

/// Draws below 0.5 pick APOD (index 0), the rest EPIC.
fn context(
    cfg: AppConfig,
    http: FakeHttp,
    draws: &[f64],
    state: MemoryState,
    publisher: RecordingPublisher,
) -> AppContext<MemoryState, RecordingPublisher, ScriptedRng> {
    let http = Arc::new(http);
    let rng = shared(ScriptedRng::new(draws));
    let sources: Vec<Box<dyn ImageSource>> = vec![
        Box::new(ApodSource::new(http.clone(), &cfg.nasa)),
        Box::new(EpicSource::new(http, rng.clone(), &cfg.nasa)),
    ];
    AppContext {
        cfg: Arc::new(cfg),
        state,
        publisher,
        sources,
        rng,
    }
}

fn both_ok() -> FakeHttp {
    FakeHttp::default()
        .with(APOD_URL, ok_json(APOD_BODY))
        .with(EPIC_URL, ok_json(EPIC_BODY))
}

#[tokio::test]
async fn posts_and_records_when_nothing_stored() {
    let ctx = context(test_config(), both_ok(), &[0.2], MemoryState::default(), RecordingPublisher::default());

    let outcome = Runner::run_once(&ctx).await.unwrap();

    assert_eq!(outcome, RunOutcome::Posted { id: "2024-03-05".into() });
    assert_eq!(ctx.publisher.count(), 1);
    assert_eq!(ctx.state.current().as_deref(), Some("2024-03-05"));
    assert_eq!(ctx.state.write_count(), 1);
}

#[tokio::test]
async fn posts_when_stored_id_differs() {
    let ctx = context(
        test_config(),
        both_ok(),
        &[0.7, 0.0],
        MemoryState::holding("2024-03-04"),
        RecordingPublisher::default(),
    );

    let outcome = Runner::run_once(&ctx).await.unwrap();

    assert_eq!(outcome, RunOutcome::Posted { id: EPIC_ID.into() });
    let published = ctx.publisher.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].media_url, EPIC_ID);
    assert_eq!(ctx.state.current().as_deref(), Some(EPIC_ID));
}

#[tokio::test]
async fn duplicate_is_not_republished() {
    for (draw, stored) in [(0.1, "2024-03-05"), (0.9, EPIC_ID)] {
        let ctx = context(
            test_config(),
            both_ok(),
            &[draw],
            MemoryState::holding(stored),
            RecordingPublisher::default(),
        );

        let outcome = Runner::run_once(&ctx).await.unwrap();

        assert_eq!(outcome, RunOutcome::Duplicate { id: stored.into() });
        assert_eq!(ctx.publisher.count(), 0);
        assert_eq!(ctx.state.current().as_deref(), Some(stored));
        assert_eq!(ctx.state.write_count(), 0);
    }
}

#[tokio::test]
async fn empty_epic_collection_leaves_state_alone() {
    let http = FakeHttp::default()
        .with(APOD_URL, ok_json(APOD_BODY))
        .with(EPIC_URL, ok_json("[]"));
    let ctx = context(test_config(), http, &[0.8], MemoryState::holding("old"), RecordingPublisher::default());

    let outcome = Runner::run_once(&ctx).await.unwrap();

    assert_eq!(outcome, RunOutcome::NothingFetched);
    assert_eq!(ctx.publisher.count(), 0);
    assert_eq!(ctx.state.current().as_deref(), Some("old"));
}

#[tokio::test]
async fn upstream_error_status_leaves_state_alone() {
    for draw in [0.1, 0.9] {
        let http = FakeHttp::default()
            .with(APOD_URL, status(503))
            .with(EPIC_URL, status(403));
        let ctx = context(test_config(), http, &[draw], MemoryState::default(), RecordingPublisher::default());

        let outcome = Runner::run_once(&ctx).await.unwrap();

        assert_eq!(outcome, RunOutcome::NothingFetched);
        assert_eq!(ctx.publisher.count(), 0);
        assert_eq!(ctx.state.current(), None);
        assert_eq!(ctx.state.write_count(), 0);
    }
}

#[tokio::test]
async fn publish_failure_propagates_without_recording() {
    let ctx = context(
        test_config(),
        both_ok(),
        &[0.3],
        MemoryState::holding("2024-03-04"),
        RecordingPublisher::failing(),
    );

    let err = Runner::run_once(&ctx).await.unwrap_err();

    assert!(matches!(err, RunError::Publish(_)));
    assert_eq!(ctx.state.current().as_deref(), Some("2024-03-04"));
    assert_eq!(ctx.state.write_count(), 0);
}

#[tokio::test]
async fn dry_run_fetches_but_neither_publishes_nor_records() {
    let mut cfg = test_config();
    cfg.dry_run = true;
    let ctx = context(cfg, both_ok(), &[0.2], MemoryState::default(), RecordingPublisher::default());

    let outcome = Runner::run_once(&ctx).await.unwrap();

    assert_eq!(outcome, RunOutcome::DryRun { id: "2024-03-05".into() });
    assert_eq!(ctx.publisher.count(), 0);
    assert_eq!(ctx.state.current(), None);
}

#[tokio::test]
async fn no_sources_means_nothing_fetched() {
    let cfg = test_config();
    let ctx = AppContext {
        cfg: Arc::new(cfg),
        state: MemoryState::default(),
        publisher: RecordingPublisher::default(),
        sources: Vec::new(),
        rng: shared(ScriptedRng::new(&[0.5])),
    };

    assert_eq!(Runner::run_once(&ctx).await.unwrap(), RunOutcome::NothingFetched);
}
