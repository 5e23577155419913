//! Single binary JSON API over the ranking engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST, PORT, DATA_DIR (season files), MEMBERS_FILE (roster).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{Local, NaiveDate};
use scrabble_league_web::{LeagueEngine, LeagueError, Member, Metric, SeasonKey};
use serde::Deserialize;
use std::sync::RwLock;

/// In-memory state: the engine plus the current roster snapshot. Mutations
/// take the write lock, so uploads and deletes are serialized; table and
/// summary queries share the read lock.
struct AppData {
    engine: LeagueEngine,
    roster: Vec<Member>,
}

type AppState = Data<RwLock<AppData>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Upload body: the game date plus the raw sheet text as exported.
#[derive(Deserialize)]
struct SubmitGameBody {
    date: NaiveDate,
    sheet: String,
}

/// Path segment: season key in display form (e.g. /api/seasons/Summer%202025)
#[derive(Deserialize)]
struct SeasonPath {
    season: String,
}

/// Path segments: season and game number (e.g. .../games/3)
#[derive(Deserialize)]
struct SeasonGamePath {
    season: String,
    game_index: u32,
}

/// Path segments: season and metric (percent, ranking-points, points)
#[derive(Deserialize)]
struct SeasonMetricPath {
    season: String,
    metric: String,
}

fn error_response(e: &LeagueError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LeagueError::Parse(_) | LeagueError::Enrichment(_) => HttpResponse::BadRequest().json(body),
        LeagueError::DuplicateGame { .. } => HttpResponse::Conflict().json(body),
        LeagueError::SeasonNotFound(_) | LeagueError::GameNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        LeagueError::Persistence(_) => HttpResponse::InternalServerError().json(body),
    }
}

fn parse_season(s: &str) -> Result<SeasonKey, HttpResponse> {
    s.parse::<SeasonKey>().map_err(|_| {
        HttpResponse::BadRequest()
            .json(serde_json::json!({ "error": format!("Unknown season '{}'", s) }))
    })
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "scrabble-league-web",
    })
}

/// Seasons with data plus the season today's date falls in.
#[get("/api/seasons")]
async fn api_seasons(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let seasons: Vec<String> = g.engine.season_keys().iter().map(|k| k.to_string()).collect();
    let current = SeasonKey::for_date(Local::now().date_naive()).to_string();
    HttpResponse::Ok().json(serde_json::json!({ "seasons": seasons, "current": current }))
}

/// Upload one game's score sheet. The date routes the game to its season.
#[post("/api/games")]
async fn api_submit_game(state: AppState, body: Json<SubmitGameBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let roster = g.roster.clone();
    match g.engine.submit_game(body.sheet.as_bytes(), body.date, &roster) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => error_response(&e),
    }
}

/// The games of a season, chronological, for the admin delete view.
#[get("/api/seasons/{season}/games")]
async fn api_list_games(state: AppState, path: Path<SeasonPath>) -> HttpResponse {
    let season = match parse_season(&path.season) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.engine.games(season) {
        Ok(games) => HttpResponse::Ok().json(games),
        Err(e) => error_response(&e),
    }
}

/// Admin delete: remove one game; remaining games renumber chronologically.
#[delete("/api/seasons/{season}/games/{game_index}")]
async fn api_delete_game(state: AppState, path: Path<SeasonGamePath>) -> HttpResponse {
    let season = match parse_season(&path.season) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.engine.delete_game(season, path.game_index) {
        Ok(remaining) => {
            HttpResponse::Ok().json(serde_json::json!({ "remaining_games": remaining }))
        }
        Err(e) => error_response(&e),
    }
}

/// Ranked table for one metric of one season.
#[get("/api/seasons/{season}/tables/{metric}")]
async fn api_ranked_table(state: AppState, path: Path<SeasonMetricPath>) -> HttpResponse {
    let season = match parse_season(&path.season) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let metric = match path.metric.parse::<Metric>() {
        Ok(m) => m,
        Err(()) => {
            return HttpResponse::BadRequest().json(
                serde_json::json!({ "error": format!("Unknown metric '{}'", path.metric) }),
            )
        }
    };
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.engine.ranked_table(season, metric) {
        Ok(table) => HttpResponse::Ok().json(table),
        Err(e) => error_response(&e),
    }
}

/// Per-player season summary (summer seasons include the best-5 percent).
#[get("/api/seasons/{season}/summary")]
async fn api_summary(state: AppState, path: Path<SeasonPath>) -> HttpResponse {
    let season = match parse_season(&path.season) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.engine.summary(season) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => error_response(&e),
    }
}

#[get("/api/roster")]
async fn api_get_roster(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(&g.roster)
}

/// Replace the roster snapshot (the member manager owns the roster; the
/// engine only reads it at enrichment time).
#[put("/api/roster")]
async fn api_set_roster(state: AppState, body: Json<Vec<Member>>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.roster = body.into_inner();
    HttpResponse::Ok().json(&g.roster)
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
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let members_file = std::env::var("MEMBERS_FILE").unwrap_or_else(|_| "members.csv".to_string());

    let engine = LeagueEngine::open(&data_dir)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let roster = scrabble_league_web::storage::load_roster(std::path::Path::new(&members_file))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    log::info!(
        "Loaded {} seasons and {} roster members",
        engine.season_keys().len(),
        roster.len()
    );

    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(AppData { engine, roster }));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_seasons)
            .service(api_submit_game)
            .service(api_list_games)
            .service(api_delete_game)
            .service(api_ranked_table)
            .service(api_summary)
            .service(api_get_roster)
            .service(api_set_roster)
    })
    .bind(bind)?
    .run()
    .await
}
