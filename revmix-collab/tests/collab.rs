use std::sync::Arc;

use assert_matches::assert_matches;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use revmix_collab::{
    AuthForm, Collab, CollabError, CollabEvent, CreateRoomForm, FeedItem, FileSessionStore,
    MemorySessionStore, Screen, SessionStore, SubmissionAssembler, SubmissionError, VoteError,
};
use revmix_core::{
    AudioBlob, Config, RecordedAudio, RoomPhase, SessionData, VoteAxis, VoteDraft, VoteRefusal,
    VoteWidget,
};
use serde_json::{json, Value};
use tempfile::tempdir;
use tokio::net::TcpListener;

const OPEN_UNTIL: &str = "2999-01-01T00:00:00";
const EXPIRED_AT: &str = "2000-01-01T00:00:00";

/// What the fake backend knows
struct Backend {
    rooms: Vec<Value>,
    performances: Vec<Value>,
    logout_fails: bool,
}

type Shared = Arc<Mutex<Backend>>;

fn users() -> Vec<(&'static str, &'static str, Value)> {
    vec![
        (
            "token-mc",
            "bars",
            json!({ "id": "u1", "username": "mc", "level": 2, "xp": 1200 }),
        ),
        (
            "token-judge",
            "gavel",
            json!({ "id": "u2", "username": "judge", "xp": 40 }),
        ),
    ]
}

fn user_for(headers: &HeaderMap) -> Option<Value> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .to_string();

    users()
        .into_iter()
        .find(|(t, _, _)| *t == token)
        .map(|(_, _, user)| user)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Invalid authentication credentials" })),
    )
}

fn bad_request(detail: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail })))
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let found = users().into_iter().find(|(_, password, user)| {
        user["username"] == body["username"] && *password == body["password"]
    });

    match found {
        Some((token, _, user)) => (
            StatusCode::OK,
            Json(json!({
                "user": user,
                "session": { "access_token": token, "token_type": "bearer", "expires_in": 3600 },
            })),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid credentials" })),
        ),
    }
}

async fn register(Json(body): Json<Value>) -> Json<Value> {
    // An account waiting for email confirmation has no session yet
    Json(json!({
        "user": { "id": "u9", "username": body["username"], "email": body["email"] },
        "session": null,
    }))
}

async fn logout(State(backend): State<Shared>) -> (StatusCode, Json<Value>) {
    if backend.lock().logout_fails {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "Auth provider unavailable" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({ "message": "Logged out successfully" })),
    )
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match user_for(&headers) {
        Some(user) => (StatusCode::OK, Json(user)),
        None => unauthorized(),
    }
}

async fn list_rooms(State(backend): State<Shared>) -> Json<Value> {
    Json(json!({ "rooms": backend.lock().rooms }))
}

async fn list_challenges() -> Json<Value> {
    Json(json!({
        "challenges": [{ "id": "c1", "title": "Weekly Cypher", "status": "upcoming" }],
    }))
}

async fn get_room(State(backend): State<Shared>, Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    let backend = backend.lock();

    match backend.rooms.iter().find(|r| r["id"] == id.as_str()) {
        Some(room) => (StatusCode::OK, Json(room.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Room not found" })),
        ),
    }
}

async fn create_room(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(user) = user_for(&headers) else {
        return unauthorized();
    };

    let mut backend = backend.lock();
    let room = json!({
        "id": format!("r{}", backend.rooms.len() + 1),
        "name": body["name"],
        "host_id": user["id"],
        "type": body["type"],
        "prompt": body["prompt"],
        "participants": [user["id"]],
        "status": "waiting",
        "expires_at": OPEN_UNTIL,
        "timer_duration": body["timer_duration"],
        "max_participants": body["max_participants"],
    });

    backend.rooms.push(room.clone());
    (StatusCode::OK, Json(room))
}

async fn room_performances(State(backend): State<Shared>, Path(id): Path<String>) -> Json<Value> {
    let performances: Vec<_> = backend
        .lock()
        .performances
        .iter()
        .filter(|p| p["room_id"] == id.as_str())
        .cloned()
        .collect();

    Json(json!({ "performances": performances }))
}

async fn submit_performance(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(user) = user_for(&headers) else {
        return unauthorized();
    };

    let mut backend = backend.lock();
    let performance = json!({
        "id": format!("p{}", backend.performances.len() + 1),
        "user_id": user["id"],
        "username": user["username"],
        "room_id": body["room_id"],
        "audio_data": body["audio_data"],
        "duration": body["duration"],
        "audio_timeline": body["audio_timeline"],
        "votes": {},
    });

    backend.performances.push(performance.clone());
    (StatusCode::OK, Json(performance))
}

async fn submit_vote(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(user) = user_for(&headers) else {
        return unauthorized();
    };

    let voter = user["id"].as_str().unwrap_or_default().to_string();
    let mut backend = backend.lock();

    let Some(performance) = backend
        .performances
        .iter_mut()
        .find(|p| p["id"] == body["performance_id"])
    else {
        return bad_request("Performance not found");
    };

    if performance["votes"].get(&voter).is_some() {
        return bad_request("You have already voted for this performance");
    }

    performance["votes"][&voter] = json!({
        "flow": body["flow"],
        "lyrics": body["lyrics"],
        "creativity": body["creativity"],
    });

    let mut vote = body.clone();
    vote["id"] = json!("v1");
    (StatusCode::OK, Json(vote))
}

async fn spawn_backend(backend: Backend) -> (String, Shared) {
    let shared = Arc::new(Mutex::new(backend));

    let router = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/logout", post(logout))
        .route("/api/users/me", get(me))
        .route("/api/rooms", get(list_rooms).post(create_room))
        .route("/api/rooms/:id", get(get_room))
        .route("/api/challenges", get(list_challenges))
        .route("/api/performances", post(submit_performance))
        .route("/api/performances/room/:id", get(room_performances))
        .route("/api/votes", post(submit_vote))
        .with_state(shared.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), shared)
}

fn room(id: &str, expires_at: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Battle {}", id),
        "host_id": "u1",
        "type": "challenge",
        "prompt": "Sixteen bars",
        "participants": ["u1", "u2"],
        "status": "active",
        "expires_at": expires_at,
        "max_participants": 8,
    })
}

fn performance(id: &str, room_id: &str, user_id: &str) -> Value {
    json!({
        "id": id,
        "user_id": user_id,
        "username": user_id,
        "room_id": room_id,
        "audio_data": "UklGRg==",
        "duration": 30.0,
        "votes": {},
    })
}

fn default_backend() -> Backend {
    Backend {
        rooms: vec![room("open", OPEN_UNTIL), room("ended", EXPIRED_AT)],
        performances: vec![
            performance("p-open", "open", "u1"),
            performance("p-ended", "ended", "u1"),
        ],
        logout_fails: false,
    }
}

fn config(url: &str) -> Config {
    Config::default().with_backend_url(Some(url.to_string()))
}

async fn signed_in(url: &str, username: &str, password: &str) -> Collab {
    let (collab, _events) =
        Collab::new(config(url), MemorySessionStore::default().boxed()).unwrap();

    collab
        .login(&AuthForm::login(username, password))
        .await
        .unwrap();

    collab
}

#[tokio::test]
async fn logging_in_persists_the_session_for_the_next_start() {
    let (url, _) = spawn_backend(default_backend()).await;
    let dir = tempdir().unwrap();
    let path = dir.path().join("revmix_session.json");

    let (collab, events) =
        Collab::new(config(&url), FileSessionStore::new(&path).boxed()).unwrap();

    assert_eq!(collab.screen(), Screen::Auth);
    let user = collab.login(&AuthForm::login("mc", "bars")).await.unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(collab.screen(), Screen::Home);
    assert!(events
        .try_iter()
        .any(|e| matches!(e, CollabEvent::SignedIn { user } if user.id == "u1")));

    // The next start picks the session back up
    let (restarted, _) = Collab::new(config(&url), FileSessionStore::new(&path).boxed()).unwrap();
    let restored = restarted.restore().await.unwrap();

    assert_eq!(restored.username, "mc");
    assert_eq!(restarted.screen(), Screen::Home);
}

#[tokio::test]
async fn rejected_sessions_are_discarded_on_restore() {
    let (url, _) = spawn_backend(default_backend()).await;
    let dir = tempdir().unwrap();
    let path = dir.path().join("revmix_session.json");

    let stale: SessionData = serde_json::from_value(json!({ "access_token": "expired" })).unwrap();
    FileSessionStore::new(&path).save(&stale).await.unwrap();

    let (collab, _) = Collab::new(config(&url), FileSessionStore::new(&path).boxed()).unwrap();

    assert_eq!(collab.restore().await, None);
    assert_eq!(collab.screen(), Screen::Auth);
    assert!(!path.exists());
}

#[tokio::test]
async fn failed_logins_explain_themselves() {
    let (url, _) = spawn_backend(default_backend()).await;
    let (collab, _) = Collab::new(config(&url), MemorySessionStore::default().boxed()).unwrap();

    let error = collab
        .login(&AuthForm::login("mc", "wrong"))
        .await
        .unwrap_err();
    assert_eq!(error.alert(), "Invalid credentials");

    let error = collab.login(&AuthForm::login("mc", " ")).await.unwrap_err();
    assert_eq!(error.alert(), "Please fill in all required fields");

    let error = collab
        .login(&AuthForm::register("newbie", "newbie@revmix.test", "secret"))
        .await
        .unwrap_err();
    assert_eq!(error.alert(), "Authentication failed");

    assert_eq!(collab.screen(), Screen::Auth);
    assert_eq!(collab.user(), None);
}

#[tokio::test]
async fn unreachable_backends_ask_to_retry() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let (collab, _) = Collab::new(config(&url), MemorySessionStore::default().boxed()).unwrap();
    let error = collab
        .login(&AuthForm::login("mc", "bars"))
        .await
        .unwrap_err();

    assert_eq!(error.alert(), "Network error. Please try again.");
}

#[tokio::test]
async fn logging_out_always_clears_the_session() {
    let mut backend = default_backend();
    backend.logout_fails = true;

    let (url, _) = spawn_backend(backend).await;
    let dir = tempdir().unwrap();
    let path = dir.path().join("revmix_session.json");

    let (collab, _) = Collab::new(config(&url), FileSessionStore::new(&path).boxed()).unwrap();
    collab.login(&AuthForm::login("mc", "bars")).await.unwrap();
    assert!(path.exists());

    collab.logout().await;

    assert!(!path.exists());
    assert_eq!(collab.screen(), Screen::Auth);
    assert_matches!(collab.navigate(Screen::Home), Err(CollabError::Router(_)));
}

#[tokio::test]
async fn the_feed_lists_rooms_before_challenges() {
    let (url, _) = spawn_backend(default_backend()).await;
    let collab = signed_in(&url, "mc", "bars").await;

    let items = collab.home_feed().refresh().await.unwrap();
    let ids: Vec<_> = items.iter().map(FeedItem::id).collect();

    assert_eq!(ids, vec!["open", "ended", "c1"]);
    assert_eq!(items[0].action_label(), "Join Battle");
    assert_matches!(items[2], FeedItem::Challenge(_));
}

#[tokio::test]
async fn judges_vote_once_per_performance() {
    let (url, _) = spawn_backend(default_backend()).await;
    let collab = signed_in(&url, "judge", "gavel").await;
    let room = collab.battle_room("open");

    let snapshot = room.refresh().await.unwrap();
    assert_eq!(snapshot.view.phase(), RoomPhase::Create);
    assert!(snapshot.shows_judging());
    assert_eq!(
        snapshot.widget("p-open"),
        Some(VoteWidget::Open(VoteDraft::default()))
    );

    room.set_score("p-open", VoteAxis::Flow, 9).unwrap();
    let vote = room.vote("p-open").await.unwrap();
    assert_eq!(vote.flow, 9);
    assert_eq!(vote.lyrics, 5);

    // The refresh after voting sees the vote, and later refreshes keep it
    let snapshot = room.refresh().await.unwrap();
    assert_eq!(snapshot.widget("p-open"), Some(VoteWidget::Voted));

    let error = room.vote("p-open").await.unwrap_err();
    assert_matches!(
        error,
        CollabError::Vote(VoteError::Refused(VoteRefusal::AlreadyVoted))
    );
}

#[tokio::test]
async fn refused_votes_keep_the_sliders() {
    let (url, backend) = spawn_backend(default_backend()).await;
    let collab = signed_in(&url, "judge", "gavel").await;
    let room = collab.battle_room("open");

    room.refresh().await.unwrap();
    room.set_score("p-open", VoteAxis::Lyrics, 3).unwrap();

    // Someone voted with the same account elsewhere
    backend.lock().performances[0]["votes"]["u2"] = json!({ "flow": 1 });

    let error = room.vote("p-open").await.unwrap_err();
    assert_eq!(error.alert(), "You have already voted for this performance");

    let snapshot = room.snapshot().unwrap();
    assert_eq!(
        room.set_score("p-open", VoteAxis::Flow, 5).unwrap(),
        VoteDraft::new(5, 3, 5)
    );
    assert_eq!(snapshot.view.room.id, "open");
}

#[tokio::test]
async fn ended_battles_are_read_only() {
    let (url, _) = spawn_backend(default_backend()).await;
    let collab = signed_in(&url, "judge", "gavel").await;
    let room = collab.battle_room("ended");

    let snapshot = room.refresh().await.unwrap();
    assert_eq!(snapshot.view.phase(), RoomPhase::Results);
    assert!(!snapshot.view.shows_submission());
    assert!(snapshot.shows_judging());
    assert_eq!(snapshot.widget("p-ended"), Some(VoteWidget::Closed));
    assert_eq!(snapshot.seconds_left(), 0);

    let error = room.vote("p-ended").await.unwrap_err();
    assert_eq!(error.alert(), "Voting is closed for this battle");

    let mut assembler = SubmissionAssembler::new(60.);
    assembler.set_recording(RecordedAudio {
        blob: AudioBlob::new("audio/wav", b"RIFF".to_vec()),
        duration: 12,
    });

    let error = room
        .submit(assembler.assemble().unwrap())
        .await
        .unwrap_err();
    assert_matches!(error, CollabError::Submission(SubmissionError::BattleEnded));
}

#[tokio::test]
async fn submitting_moves_to_waiting() {
    let (url, backend) = spawn_backend(default_backend()).await;
    let collab = signed_in(&url, "judge", "gavel").await;
    let room = collab.battle_room("open");

    room.refresh().await.unwrap();

    let mut assembler = SubmissionAssembler::new(60.);
    assembler.set_recording(RecordedAudio {
        blob: AudioBlob::new("audio/wav", b"RIFF".to_vec()),
        duration: 12,
    });

    let performance = room.submit(assembler.assemble().unwrap()).await.unwrap();
    assert_eq!(performance.user_id, "u2");
    assert_eq!(backend.lock().performances[2]["audio_data"], "UklGRg==");

    let snapshot = room.snapshot().unwrap();
    assert_eq!(snapshot.view.phase(), RoomPhase::Waiting);
    assert_eq!(
        snapshot.widget(&performance.id),
        Some(VoteWidget::OwnPerformance)
    );

    let error = room
        .submit(assembler.assemble().unwrap())
        .await
        .unwrap_err();
    assert_matches!(
        error,
        CollabError::Submission(SubmissionError::AlreadySubmitted)
    );
}

#[tokio::test]
async fn created_rooms_are_entered() {
    let (url, _) = spawn_backend(default_backend()).await;
    let collab = signed_in(&url, "mc", "bars").await;

    let form = CreateRoomForm {
        name: "Late Night".into(),
        prompt: "Freestyle over silence".into(),
        ..Default::default()
    };

    let room = collab.create_room(&form).await.unwrap();

    assert_eq!(room.host_id, "u1");
    assert_eq!(room.max_participants, 8);
    assert_eq!(
        collab.screen(),
        Screen::Room {
            room_id: room.id.clone()
        }
    );

    let error = collab
        .create_room(&CreateRoomForm::default())
        .await
        .unwrap_err();
    assert_eq!(error.alert(), "Please fill in room name and prompt");
}
