//! Integration tests against a mock of the remote campaign service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::sync::mpsc;

use crate::catalog::{CampaignRoster, IssueCatalog};
use crate::clock::{Clock, ManualClock};
use crate::db::{keys, LocalStore};
use crate::errors::AppError;
use crate::gateway::RemoteGateway;
use crate::models::{PendingFlag, PhoneSlot, Voter};
use crate::presenter::{Notice, Presenter, VoterCard};
use crate::report::{build_preferences, submit_report, ReportContext, ResumeDrop};
use crate::session::CallSession;
use crate::sync::{Population, SyncCoordinator, SyncEvent};

// ==================== MOCK REMOTE ====================

/// What the mock service answers and what it has been sent.
struct Remote {
    voters: Vec<Value>,
    voter_status: u16,
    flag_status: u16,
    report_status: u16,
    campaigns: Vec<Value>,
    issues: Vec<Value>,
    voter_requests: Vec<String>,
    flag_batches: Vec<Value>,
    report_batches: Vec<Value>,
    campaign_requests: usize,
    issue_requests: usize,
}

impl Default for Remote {
    fn default() -> Self {
        Self {
            voters: Vec::new(),
            voter_status: 200,
            flag_status: 202,
            report_status: 202,
            campaigns: Vec::new(),
            issues: Vec::new(),
            voter_requests: Vec::new(),
            flag_batches: Vec::new(),
            report_batches: Vec::new(),
            campaign_requests: 0,
            issue_requests: 0,
        }
    }
}

type SharedRemote = Arc<Mutex<Remote>>;

fn respond(status: u16, body: Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap();
    (status, Json(body)).into_response()
}

async fn list_voters(
    State(remote): State<SharedRemote>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut remote = remote.lock().unwrap();
    remote
        .voter_requests
        .push(params.get("campaign_id").cloned().unwrap_or_default());
    respond(remote.voter_status, json!({ "objects": remote.voters }))
}

async fn patch_voters(State(remote): State<SharedRemote>, Json(body): Json<Value>) -> Response {
    let mut remote = remote.lock().unwrap();
    remote.flag_batches.push(body);
    respond(remote.flag_status, Value::Null)
}

async fn patch_voter_contacts(
    State(remote): State<SharedRemote>,
    Json(body): Json<Value>,
) -> Response {
    let mut remote = remote.lock().unwrap();
    remote.report_batches.push(body);
    respond(remote.report_status, Value::Null)
}

async fn list_campaigns(State(remote): State<SharedRemote>) -> Response {
    let mut remote = remote.lock().unwrap();
    remote.campaign_requests += 1;
    respond(200, json!({ "objects": remote.campaigns }))
}

async fn list_issues(State(remote): State<SharedRemote>) -> Response {
    let mut remote = remote.lock().unwrap();
    remote.issue_requests += 1;
    respond(200, json!({ "objects": remote.issues }))
}

fn mock_router(remote: SharedRemote) -> Router {
    Router::new()
        .route("/api/v1/voter/", get(list_voters).patch(patch_voters))
        .route(
            "/api/v1/votercontact/",
            axum::routing::patch(patch_voter_contacts),
        )
        .route("/api/v1/campaign/", get(list_campaigns))
        .route("/api/v1/issue/", get(list_issues))
        .with_state(remote)
}

// ==================== FIXTURE ====================

#[derive(Clone, Default)]
struct RecordingPresenter {
    cards: Arc<Mutex<Vec<VoterCard>>>,
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingPresenter {
    fn last_card(&self) -> VoterCard {
        self.cards.lock().unwrap().last().cloned().unwrap()
    }

    fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, card: &VoterCard) {
        self.cards.lock().unwrap().push(card.clone());
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// Test fixture: mock remote on an ephemeral port plus a temp store.
struct TestFixture {
    remote: SharedRemote,
    store: LocalStore,
    gateway: RemoteGateway,
    clock: ManualClock,
    _temp_dir: TempDir,
}

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap()
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = LocalStore::open(&temp_dir.path().join("campaigner.sqlite"))
            .await
            .expect("Failed to open store");

        let remote: SharedRemote = Arc::new(Mutex::new(Remote::default()));
        let app = mock_router(remote.clone());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let gateway = RemoteGateway::new(format!("http://{}/api/v1", addr)).unwrap();

        TestFixture {
            remote,
            store,
            gateway,
            clock: ManualClock::new(start_time()),
            _temp_dir: temp_dir,
        }
    }

    fn remote(&self) -> std::sync::MutexGuard<'_, Remote> {
        self.remote.lock().unwrap()
    }

    fn coordinator(&self) -> (SyncCoordinator, mpsc::UnboundedReceiver<SyncEvent>) {
        SyncCoordinator::new(
            self.store.clone(),
            self.gateway.clone(),
            Arc::new(self.clock.clone()),
            Duration::hours(48),
        )
    }

    async fn session(
        &self,
        campaign_ids: Vec<i64>,
        resume: Option<ResumeDrop>,
    ) -> (CallSession, RecordingPresenter) {
        let presenter = RecordingPresenter::default();
        let (sync, events) = self.coordinator();
        let session = CallSession::open(
            sync,
            events,
            Box::new(presenter.clone()),
            campaign_ids,
            resume,
        )
        .await
        .expect("Failed to open session");
        (session, presenter)
    }

    /// Open a session, let the fetch land, and close it.
    async fn seed_cache(&self, campaign_ids: Vec<i64>) {
        let (mut session, _) = self.session(campaign_ids, None).await;
        session.settle().await.unwrap();
    }

    async fn push_flags(&self, count: i64) {
        for id in 1..=count {
            self.store
                .push_flag(PendingFlag::new(
                    format!("/api/v1/voter/{}/", id),
                    PhoneSlot::One,
                ))
                .await
                .unwrap();
        }
    }
}

fn wire_voter(id: i64, phone1: &str, phone2: &str) -> Value {
    json!({
        "id": id,
        "resource_uri": format!("/api/v1/voter/{}/", id),
        "first_name": format!("First{}", id),
        "last_name": format!("Last{}", id),
        "gender": "",
        "address": {"street": "1 Main St", "city": "Springfield", "state": "IL"},
        "phone_number1": phone1,
        "phone_number2": phone2,
    })
}

fn queue_ids(session: &CallSession) -> Vec<i64> {
    session.queue().voters().iter().map(|v| v.id).collect()
}

// ==================== VOTER FETCH & FRESHNESS ====================

#[tokio::test]
async fn test_fetch_populates_queue_and_cache() {
    let fixture = TestFixture::new().await;
    fixture.remote().voters = vec![
        wire_voter(1, "5551234567", ""),
        wire_voter(2, "", "5559876543"),
    ];

    let (mut session, presenter) = fixture.session(vec![1, 2], None).await;
    assert!(session.queue().is_empty());
    assert_eq!(session.in_flight(), 1);
    assert!(presenter.last_card().is_placeholder());

    session.settle().await.unwrap();

    assert_eq!(queue_ids(&session), vec![1, 2]);
    assert_eq!(session.queue().cursor(), 0);
    assert_eq!(presenter.last_card().phone_text(), "555-123-4567");
    assert_eq!(fixture.remote().voter_requests, vec!["1,2".to_string()]);

    let cached: Vec<Voter> = fixture.store.load(keys::VOTERS).await.unwrap().unwrap();
    assert_eq!(cached.len(), 2);
    assert_eq!(
        fixture
            .store
            .load_timestamp(keys::LAST_VOTERS_DOWNLOAD)
            .await
            .unwrap(),
        Some(start_time())
    );
}

#[tokio::test]
async fn test_freshness_gate() {
    let fixture = TestFixture::new().await;
    fixture.remote().voters = vec![wire_voter(1, "5551234567", "")];
    fixture.seed_cache(vec![1]).await;
    assert_eq!(fixture.remote().voter_requests.len(), 1);

    fixture
        .clock
        .advance(Duration::hours(47) + Duration::minutes(59));
    let (session, _) = fixture.session(vec![1], None).await;
    assert_eq!(queue_ids(&session), vec![1]);
    assert_eq!(session.in_flight(), 0);
    assert_eq!(fixture.remote().voter_requests.len(), 1);

    fixture.clock.advance(Duration::minutes(2));
    let (mut session, _) = fixture.session(vec![1], None).await;
    assert_eq!(session.in_flight(), 1);
    session.settle().await.unwrap();
    assert_eq!(fixture.remote().voter_requests.len(), 2);
}

#[tokio::test]
async fn test_fresh_cache_skips_pending_delivery() {
    let fixture = TestFixture::new().await;
    fixture.remote().voters = vec![wire_voter(1, "5551234567", "")];
    fixture.seed_cache(vec![1]).await;
    fixture.push_flags(2).await;

    let (session, _) = fixture.session(vec![1], None).await;
    assert_eq!(session.in_flight(), 0);
    assert!(fixture.remote().flag_batches.is_empty());
    assert_eq!(fixture.store.pending_flags().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_failed_fetch_leaves_queue_unpopulated() {
    let fixture = TestFixture::new().await;
    fixture.remote().voters = vec![wire_voter(1, "5551234567", "")];
    fixture.remote().voter_status = 500;

    let (mut session, presenter) = fixture.session(vec![1], None).await;
    session.settle().await.unwrap();

    assert!(session.queue().is_empty());
    assert!(presenter.last_card().is_placeholder());
    assert!(!fixture.store.contains(keys::VOTERS).await.unwrap());
    assert!(!fixture
        .store
        .contains(keys::LAST_VOTERS_DOWNLOAD)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_empty_result_notifies() {
    let fixture = TestFixture::new().await;

    let (mut session, presenter) = fixture.session(vec![3], None).await;
    session.settle().await.unwrap();

    assert!(session.queue().is_empty());
    assert_eq!(presenter.notices(), vec![Notice::NoContactableVoters]);
    assert!(!fixture.store.contains(keys::VOTERS).await.unwrap());
}

#[tokio::test]
async fn test_no_campaigns_skips_fetch() {
    let fixture = TestFixture::new().await;
    fixture.push_flags(1).await;

    let (mut session, _) = fixture.session(Vec::new(), None).await;
    session.settle().await.unwrap();

    assert!(fixture.remote().voter_requests.is_empty());
    assert_eq!(fixture.remote().flag_batches.len(), 1);
}

#[tokio::test]
async fn test_superseded_fetch_is_discarded() {
    let fixture = TestFixture::new().await;
    let (mut sync, _events) = fixture.coordinator();

    let newer: Vec<Voter> =
        serde_json::from_value(json!([wire_voter(2, "5551234567", "")])).unwrap();
    let older: Vec<Voter> =
        serde_json::from_value(json!([wire_voter(1, "5551234567", "")])).unwrap();

    let applied = sync
        .apply(SyncEvent::VotersFetched {
            cycle: 1,
            result: Ok(newer.clone()),
        })
        .await
        .unwrap();
    assert_eq!(applied, Some(newer.clone()));

    let applied = sync
        .apply(SyncEvent::VotersFetched {
            cycle: 0,
            result: Ok(older),
        })
        .await
        .unwrap();
    assert_eq!(applied, None);

    let cached: Vec<Voter> = fixture.store.load(keys::VOTERS).await.unwrap().unwrap();
    assert_eq!(cached, newer);
}

#[tokio::test]
async fn test_fetched_voters_start_unflagged() {
    let fixture = TestFixture::new().await;
    let mut wire = wire_voter(1, "5551234567", "");
    wire["number1_flagged"] = json!(true);
    fixture.remote().voters = vec![wire];

    let (mut session, _) = fixture.session(vec![1], None).await;
    session.settle().await.unwrap();

    let voter = session.queue().current().unwrap();
    assert!(!voter.number1_flagged);
    assert_eq!(voter.active_number(), Some(PhoneSlot::One));
}

// ==================== OUTCOME DELIVERY ====================

#[tokio::test]
async fn test_accepted_flags_are_cleared() {
    let fixture = TestFixture::new().await;
    fixture.push_flags(3).await;

    let (mut session, _) = fixture.session(Vec::new(), None).await;
    session.settle().await.unwrap();

    assert!(fixture.store.pending_flags().await.unwrap().is_empty());
    {
        let remote = fixture.remote();
        assert_eq!(remote.flag_batches.len(), 1);
        assert_eq!(remote.flag_batches[0]["objects"].as_array().unwrap().len(), 3);
        assert_eq!(
            remote.flag_batches[0]["objects"][0],
            json!({"resource_uri": "/api/v1/voter/1/", "phone_number1": "flagged"})
        );
    }

    let (mut session, _) = fixture.session(Vec::new(), None).await;
    session.settle().await.unwrap();
    assert_eq!(fixture.remote().flag_batches.len(), 1);
}

#[tokio::test]
async fn test_rejected_flags_are_resent_verbatim() {
    let fixture = TestFixture::new().await;
    fixture.push_flags(3).await;
    fixture.remote().flag_status = 500;

    let (mut session, _) = fixture.session(Vec::new(), None).await;
    session.settle().await.unwrap();
    assert_eq!(fixture.store.pending_flags().await.unwrap().len(), 3);

    let (mut session, _) = fixture.session(Vec::new(), None).await;
    session.settle().await.unwrap();

    let remote = fixture.remote();
    assert_eq!(remote.flag_batches.len(), 2);
    assert_eq!(remote.flag_batches[0], remote.flag_batches[1]);
    assert_eq!(remote.flag_batches[1]["objects"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_flag_recorded_during_delivery_survives() {
    let fixture = TestFixture::new().await;
    fixture.push_flags(2).await;

    let (mut sync, mut events) = fixture.coordinator();
    let population = sync.populate_voters(&[]).await.unwrap();
    assert_eq!(population, Population::Requested { fetching: false });

    sync.record_flag(PendingFlag::new("/api/v1/voter/9/", PhoneSlot::Two))
        .await
        .unwrap();

    // A second cycle while the first delivery is outstanding sends nothing new
    sync.populate_voters(&[]).await.unwrap();
    assert_eq!(sync.in_flight(), 1);

    let event = events.recv().await.unwrap();
    sync.apply(event).await.unwrap();

    let left = fixture.store.pending_flags().await.unwrap();
    assert_eq!(
        left,
        vec![PendingFlag::new("/api/v1/voter/9/", PhoneSlot::Two)]
    );
    assert_eq!(fixture.remote().flag_batches.len(), 1);
}

#[tokio::test]
async fn test_reports_delivered_and_cleared() {
    let fixture = TestFixture::new().await;
    let context = ReportContext {
        voter_id: 4,
        index: 0,
    };
    submit_report(
        &fixture.store,
        &context,
        build_preferences(&[], Some("called twice, no answer")),
    )
    .await
    .unwrap();

    fixture.remote().report_status = 503;
    let (mut session, _) = fixture.session(Vec::new(), None).await;
    session.settle().await.unwrap();
    assert_eq!(fixture.store.pending_reports().await.unwrap().len(), 1);

    fixture.remote().report_status = 202;
    let (mut session, _) = fixture.session(Vec::new(), None).await;
    session.settle().await.unwrap();
    assert!(!fixture.store.contains(keys::IRS).await.unwrap());

    let remote = fixture.remote();
    assert_eq!(remote.report_batches.len(), 2);
    assert_eq!(
        remote.report_batches[1],
        json!({"objects": [{
            "method": 1,
            "voter": 4,
            "intelligence_report": {"text": "called twice, no answer"}
        }]})
    );
}

// ==================== QUEUE OPERATIONS ====================

#[tokio::test]
async fn test_flag_scenario_drops_voter_without_numbers() {
    let fixture = TestFixture::new().await;
    fixture.remote().voters = vec![
        wire_voter(1, "5551234567", ""),
        wire_voter(2, "", "5559876543"),
    ];
    let (mut session, presenter) = fixture.session(vec![1], None).await;
    session.settle().await.unwrap();

    session.flag().await.unwrap();

    assert_eq!(queue_ids(&session), vec![2]);
    assert_eq!(session.queue().cursor(), 0);
    assert_eq!(presenter.last_card().phone_text(), "555-987-6543");
    assert_eq!(
        fixture.store.pending_flags().await.unwrap(),
        vec![PendingFlag::new("/api/v1/voter/1/", PhoneSlot::One)]
    );

    let cached: Vec<Voter> = fixture.store.load(keys::VOTERS).await.unwrap().unwrap();
    assert_eq!(cached.iter().map(|v| v.id).collect::<Vec<_>>(), vec![2]);
}

#[tokio::test]
async fn test_flag_keeps_voter_with_second_number() {
    let fixture = TestFixture::new().await;
    fixture.remote().voters = vec![
        wire_voter(1, "5551234567", "5550001111"),
        wire_voter(2, "5552223333", ""),
    ];
    let (mut session, _) = fixture.session(vec![1], None).await;
    session.settle().await.unwrap();

    session.flag().await.unwrap();
    assert_eq!(session.queue().cursor(), 1);

    session.advance();
    assert_eq!(session.card().phone_text(), "555-000-1111");

    // Flag persisted on the cached copy too
    let cached: Vec<Voter> = fixture.store.load(keys::VOTERS).await.unwrap().unwrap();
    assert!(cached[0].number1_flagged);
}

#[tokio::test]
async fn test_exhausting_queue_repopulates() {
    let fixture = TestFixture::new().await;
    fixture.remote().voters = vec![wire_voter(1, "5551234567", "")];
    let (mut session, presenter) = fixture.session(vec![1], None).await;
    session.settle().await.unwrap();

    session.flag().await.unwrap();

    assert!(session.queue().is_empty());
    assert_eq!(session.queue().cursor(), 0);
    assert!(presenter.last_card().is_placeholder());
    assert_eq!(presenter.notices(), vec![Notice::NoContactableVoters]);
    assert!(!fixture.store.contains(keys::VOTERS).await.unwrap());
    // Flag delivery plus a fresh fetch
    assert_eq!(session.in_flight(), 2);

    session.settle().await.unwrap();
    {
        let remote = fixture.remote();
        assert_eq!(remote.voter_requests.len(), 2);
        assert_eq!(remote.flag_batches.len(), 1);
    }
    assert!(fixture.store.pending_flags().await.unwrap().is_empty());
    assert_eq!(queue_ids(&session), vec![1]);
}

#[tokio::test]
async fn test_resume_drop_applies_to_cached_queue() {
    let fixture = TestFixture::new().await;
    fixture.remote().voters = vec![
        wire_voter(1, "5551234567", ""),
        wire_voter(2, "5551234567", ""),
        wire_voter(3, "5551234567", ""),
    ];
    fixture.seed_cache(vec![1]).await;

    let (session, presenter) = fixture.session(vec![1], Some(ResumeDrop(1))).await;
    assert_eq!(queue_ids(&session), vec![1, 3]);
    assert_eq!(session.queue().current().map(|v| v.id), Some(3));
    assert_eq!(presenter.last_card().name, "First3 Last3");

    let cached: Vec<Voter> = fixture.store.load(keys::VOTERS).await.unwrap().unwrap();
    assert_eq!(cached.len(), 2);
}

#[tokio::test]
async fn test_resume_drop_out_of_range_ignored() {
    let fixture = TestFixture::new().await;
    fixture.remote().voters = vec![wire_voter(1, "5551234567", "")];
    fixture.seed_cache(vec![1]).await;

    let (session, presenter) = fixture.session(vec![1], Some(ResumeDrop(5))).await;
    assert_eq!(queue_ids(&session), vec![1]);
    assert_eq!(presenter.last_card().remaining, 1);
}

#[tokio::test]
async fn test_resume_drop_ignored_when_refetching() {
    let fixture = TestFixture::new().await;
    fixture.remote().voters = vec![
        wire_voter(1, "5551234567", ""),
        wire_voter(2, "5551234567", ""),
    ];

    let (mut session, _) = fixture.session(vec![1], Some(ResumeDrop(0))).await;
    session.settle().await.unwrap();
    assert_eq!(queue_ids(&session), vec![1, 2]);
}

// ==================== REPORT FLOW ====================

#[tokio::test]
async fn test_report_round_trip_through_session() {
    let fixture = TestFixture::new().await;
    fixture.remote().voters = vec![
        wire_voter(1, "5551234567", ""),
        wire_voter(2, "5551234567", ""),
    ];
    let (mut session, presenter) = fixture.session(vec![1], None).await;
    session.settle().await.unwrap();
    session.advance();

    let context = session.report_context().unwrap();
    assert_eq!(
        context,
        ReportContext {
            voter_id: 2,
            index: 1
        }
    );
    assert_eq!(
        context.voter_name(&fixture.store).await.unwrap(),
        Some("First2 Last2".to_string())
    );

    let empty = session
        .submit_report(&context, build_preferences(&[], Some("   ")))
        .await;
    assert!(matches!(empty, Err(AppError::Validation(_))));
    assert_eq!(presenter.notices(), vec![Notice::EmptyReport]);
    assert!(!fixture.store.contains(keys::IRS).await.unwrap());

    let resume = session
        .submit_report(
            &context,
            build_preferences(&[], Some("called twice, no answer")),
        )
        .await
        .unwrap();
    assert_eq!(resume, ResumeDrop(1));
    assert_eq!(presenter.notices(), vec![Notice::EmptyReport]);

    let reports = fixture.store.pending_reports().await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(u8::from(reports.objects[0].method), 1);

    let (session, _) = fixture.session(vec![1], Some(resume)).await;
    assert_eq!(queue_ids(&session), vec![1]);
}

// ==================== CATALOGS ====================

#[tokio::test]
async fn test_campaign_roster_caches_and_toggles() {
    let fixture = TestFixture::new().await;
    fixture.remote().campaigns = vec![
        json!({"id": 1, "name": "Smith for President"}),
        json!({"id": 2, "name": "Jones for Senate"}),
    ];

    let mut roster = CampaignRoster::load(fixture.store.clone(), fixture.gateway.clone())
        .await
        .unwrap();
    assert!(roster.campaigns().iter().all(|c| c.contact));
    assert_eq!(roster.selected_ids(), vec![1, 2]);

    roster.toggle(0).await.unwrap();
    assert_eq!(
        CampaignRoster::cached_selection(&fixture.store).await.unwrap(),
        vec![2]
    );

    let roster = CampaignRoster::load(fixture.store.clone(), fixture.gateway.clone())
        .await
        .unwrap();
    assert_eq!(roster.selected_ids(), vec![2]);
    assert_eq!(fixture.remote().campaign_requests, 1);
}

#[tokio::test]
async fn test_campaign_refresh_resets_selection() {
    let fixture = TestFixture::new().await;
    fixture.remote().campaigns = vec![json!({"id": 1, "name": "Smith for President"})];

    let mut roster = CampaignRoster::load(fixture.store.clone(), fixture.gateway.clone())
        .await
        .unwrap();
    roster.toggle(0).await.unwrap();
    assert!(roster.selected_ids().is_empty());

    roster.refresh().await.unwrap();
    assert_eq!(roster.selected_ids(), vec![1]);
    assert_eq!(fixture.remote().campaign_requests, 2);
}

#[tokio::test]
async fn test_issue_catalog_freshness() {
    let fixture = TestFixture::new().await;
    fixture.remote().issues = vec![
        json!({"id": 2, "issue": "direct election of President"}),
        json!({"id": 1, "issue": "term limits"}),
    ];
    let catalog = IssueCatalog::new(
        fixture.store.clone(),
        fixture.gateway.clone(),
        Arc::new(fixture.clock.clone()),
        Duration::days(30),
    );

    let issues = catalog.issues().await.unwrap();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].issue, "direct election of President");

    fixture.clock.advance(Duration::days(29));
    catalog.issues().await.unwrap();
    assert_eq!(fixture.remote().issue_requests, 1);

    fixture.clock.advance(Duration::days(2));
    catalog.issues().await.unwrap();
    assert_eq!(fixture.remote().issue_requests, 2);
    assert_eq!(
        fixture
            .store
            .load_timestamp(keys::LAST_ISSUES_DOWNLOAD)
            .await
            .unwrap(),
        Some(fixture.clock.now())
    );
}
