//! Single binary web server: JSON API over in-memory tournaments.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use foosball_tournament::{
    advance_match_winner, cancel_match, cancel_tournament, close_registration, complete_match,
    open_registration, record_walkover, recompute_standings, start_match, start_tournament,
    GameResult, MatchId, Registration, RegistrationId, Tournament, TournamentError,
    TournamentFormat, TournamentId, TournamentSettings,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Per-tournament entry: tournament data + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// Tournaments by id. The map lock is only held to find or insert an entry; each
/// tournament has its own mutex, held for a whole operation (single writer per tournament).
type AppState = Data<RwLock<HashMap<TournamentId, Arc<Mutex<TournamentEntry>>>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    format: TournamentFormat,
    #[serde(default)]
    max_participants: Option<usize>,
    #[serde(default)]
    settings: TournamentSettings,
}

#[derive(Deserialize)]
struct RegisterBody {
    player: String,
    #[serde(default)]
    partner: Option<String>,
    #[serde(default)]
    team_name: Option<String>,
    #[serde(default)]
    seed: Option<u32>,
}

#[derive(Deserialize)]
struct WalkoverBody {
    winner_registration_id: RegistrationId,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and registration id.
#[derive(Deserialize)]
struct RegistrationPath {
    id: TournamentId,
    registration_id: RegistrationId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct MatchPath {
    id: TournamentId,
    match_id: MatchId,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    if e.is_not_found() {
        HttpResponse::NotFound().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

fn lookup(state: &AppState, id: TournamentId) -> Result<Arc<Mutex<TournamentEntry>>, HttpResponse> {
    let g = state
        .read()
        .map_err(|_| HttpResponse::InternalServerError().body("lock error"))?;
    g.get(&id)
        .cloned()
        .ok_or_else(|| error_response(&TournamentError::TournamentNotFound(id)))
}

/// Run `op` on one tournament while holding its lock, and answer with its result as JSON.
async fn with_tournament<T, F>(state: &AppState, id: TournamentId, op: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&mut Tournament) -> Result<T, TournamentError>,
{
    let entry = match lookup(state, id) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    let mut entry = entry.lock().await;
    entry.last_activity = Instant::now();
    match op(&mut entry.tournament) {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "foosball-tournament",
    })
}

/// Create a new tournament in Draft (returns it with id).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let name = body.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": "Name is required" }));
    }
    let mut tournament = Tournament::new(name, body.format);
    tournament.description = body.description;
    tournament.max_participants = body.max_participants;
    tournament.settings = body.settings;
    let id = tournament.id;
    log::info!("Creating tournament {} ({})", tournament.name, id);

    let response = HttpResponse::Ok().json(&tournament);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        Arc::new(Mutex::new(TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        })),
    );
    response
}

/// List tournament summaries.
#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    let entries: Vec<_> = match state.read() {
        Ok(g) => g.values().cloned().collect(),
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let mut summaries = Vec::with_capacity(entries.len());
    for entry in entries {
        summaries.push(entry.lock().await.tournament.summary());
    }
    HttpResponse::Ok().json(summaries)
}

/// Get a tournament by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| Ok(t.clone())).await
}

/// Replace settings (Draft or RegistrationOpen).
#[put("/api/tournaments/{id}/settings")]
async fn api_update_settings(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<TournamentSettings>,
) -> HttpResponse {
    let settings = body.into_inner();
    with_tournament(&state, path.id, |t| {
        t.update_settings(settings)?;
        Ok(t.clone())
    })
    .await
}

#[post("/api/tournaments/{id}/registration/open")]
async fn api_open_registration(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        open_registration(t)?;
        Ok(t.clone())
    })
    .await
}

#[post("/api/tournaments/{id}/registration/close")]
async fn api_close_registration(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        close_registration(t)?;
        Ok(t.clone())
    })
    .await
}

/// Register a player or pair (registration must be open).
#[post("/api/tournaments/{id}/registrations")]
async fn api_register(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<RegisterBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let mut registration = match body.partner {
        Some(partner) => Registration::pair(body.player, partner, body.team_name),
        None => Registration::single(body.player),
    };
    registration.seed = body.seed;
    with_tournament(&state, path.id, |t| {
        t.register(registration)?;
        Ok(t.clone())
    })
    .await
}

#[post("/api/tournaments/{id}/registrations/{registration_id}/withdraw")]
async fn api_withdraw(state: AppState, path: Path<RegistrationPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.withdraw(path.registration_id)?;
        Ok(t.clone())
    })
    .await
}

#[post("/api/tournaments/{id}/registrations/{registration_id}/disqualify")]
async fn api_disqualify(state: AppState, path: Path<RegistrationPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        t.disqualify(path.registration_id)?;
        Ok(t.clone())
    })
    .await
}

/// Start the tournament: generate the bracket (RegistrationClosed -> InProgress).
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        start_tournament(t)?;
        Ok(t.bracket_view())
    })
    .await
}

#[post("/api/tournaments/{id}/cancel")]
async fn api_cancel_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        cancel_tournament(t)?;
        Ok(t.summary())
    })
    .await
}

#[get("/api/tournaments/{id}/bracket")]
async fn api_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| Ok(t.bracket_view())).await
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| Ok(t.leaderboard())).await
}

/// Leaderboard as CSV download.
#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let entry = match lookup(&state, path.id) {
        Ok(e) => e,
        Err(resp) => return resp,
    };
    let mut entry = entry.lock().await;
    entry.last_activity = Instant::now();
    match entry.tournament.leaderboard_csv() {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(csv),
        Err(e) => {
            log::error!("Failed to export standings for {}: {}", path.id, e);
            HttpResponse::InternalServerError().body("csv error")
        }
    }
}

/// Rebuild standings from all completed matches (after a disputed result).
#[post("/api/tournaments/{id}/standings/recompute")]
async fn api_recompute_standings(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        recompute_standings(t);
        Ok(t.leaderboard())
    })
    .await
}

#[post("/api/tournaments/{id}/matches/{match_id}/start")]
async fn api_start_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        start_match(t, path.match_id)?;
        Ok(t.bracket_view())
    })
    .await
}

/// Record a played result: standings, advancement and completion in one step.
#[post("/api/tournaments/{id}/matches/{match_id}/complete")]
async fn api_complete_match(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<GameResult>,
) -> HttpResponse {
    let result = body.into_inner();
    with_tournament(&state, path.id, |t| complete_match(t, path.match_id, result)).await
}

#[post("/api/tournaments/{id}/matches/{match_id}/walkover")]
async fn api_walkover(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<WalkoverBody>,
) -> HttpResponse {
    let winner = body.winner_registration_id;
    with_tournament(&state, path.id, |t| record_walkover(t, path.match_id, winner)).await
}

#[post("/api/tournaments/{id}/matches/{match_id}/cancel")]
async fn api_cancel_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| cancel_match(t, path.match_id)).await
}

/// Push a decided match's winner forward (when auto-advancement is off).
#[post("/api/tournaments/{id}/matches/{match_id}/advance")]
async fn api_advance_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| advance_match_winner(t, path.match_id)).await
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state: AppState = Data::new(RwLock::new(HashMap::new()));

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            // An entry whose lock is held is in use, so it stays.
            g.retain(|_, entry| {
                entry
                    .try_lock()
                    .map(|e| e.last_activity.elapsed() < INACTIVITY_TIMEOUT)
                    .unwrap_or(true)
            });
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_get_tournament)
            .service(api_update_settings)
            .service(api_open_registration)
            .service(api_close_registration)
            .service(api_register)
            .service(api_withdraw)
            .service(api_disqualify)
            .service(api_start_tournament)
            .service(api_cancel_tournament)
            .service(api_bracket)
            .service(api_standings_csv)
            .service(api_standings)
            .service(api_recompute_standings)
            .service(api_start_match)
            .service(api_complete_match)
            .service(api_walkover)
            .service(api_cancel_match)
            .service(api_advance_match)
    })
    .bind(bind)?
    .run()
    .await
}
