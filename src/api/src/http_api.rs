use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
};
use tracing::{error, warn};

use crate::config::ServerConfig;
use crate::db::StoredGame;
use crate::game::{GameError, PlacedTile, Tile};
use crate::oracle::Difficulty;
use crate::service::{Action, ActionResult, GameService, ServiceError};

#[derive(Deserialize, Debug)]
pub struct CreateGameRequest {
    pub players: [String; 2],
    pub seed: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlayRequest {
    pub player_id: String,
    pub pending_tiles: Vec<PlacedTile>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRequest {
    pub player_id: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRequest {
    pub player_id: String,
    pub tiles: Vec<Tile>,
}

#[derive(Deserialize, Debug)]
pub struct BotMoveRequest {
    pub difficulty: Option<Difficulty>,
}

#[derive(Clone)]
pub struct ApiState {
    pub service: GameService,
}

impl ApiState {
    pub fn new(service: GameService) -> Self {
        Self { service }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Conflict => StatusCode::CONFLICT,
            ServiceError::Storage(e) => {
                error!("Storage failure: {:#}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal storage error." })),
                )
                    .into_response();
            }
            ServiceError::Game(game_error) => match game_error {
                GameError::NotAParticipant => StatusCode::FORBIDDEN,
                GameError::NotYourTurn | GameError::GameNotActive => StatusCode::CONFLICT,
                GameError::Oracle(_) => StatusCode::BAD_GATEWAY,
                GameError::NoTilesSelected
                | GameError::InvalidPlacement(_)
                | GameError::InvalidWord { .. }
                | GameError::TilesNotOwned
                | GameError::BagTooSmall { .. }
                | GameError::InvalidPlayers => StatusCode::BAD_REQUEST,
            },
        };

        if status == StatusCode::BAD_GATEWAY {
            warn!("Word service failure: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring unparsable allowed origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(config.cors_max_age)
}

pub fn create_router(state: ApiState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/games", post(create_game))
        .route("/api/games/:id", get(get_game))
        .route("/api/games/:id/play", post(play))
        .route("/api/games/:id/pass", post(pass))
        .route("/api/games/:id/exchange", post(exchange))
        .route("/api/games/:id/bot-move", post(bot_move))
        .route("/api/games/:id/hint", post(hint))
        .layer(RequestBodyLimitLayer::new(config.max_request_size))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(cors_layer(config))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn create_game(
    State(state): State<ApiState>,
    Json(request): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<StoredGame>), ServiceError> {
    let [first, second] = &request.players;
    let stored = state
        .service
        .create_game(first, second, request.seed.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn get_game(
    Path(id): Path<String>,
    State(state): State<ApiState>,
) -> Result<Json<StoredGame>, ServiceError> {
    Ok(Json(state.service.get_game(&id).await?))
}

async fn play(
    Path(id): Path<String>,
    State(state): State<ApiState>,
    Json(request): Json<PlayRequest>,
) -> Result<Json<ActionResult>, ServiceError> {
    let action = Action::Play {
        player_id: request.player_id,
        pending: request.pending_tiles,
    };
    Ok(Json(state.service.apply(&id, action).await?))
}

async fn pass(
    Path(id): Path<String>,
    State(state): State<ApiState>,
    Json(request): Json<PlayerRequest>,
) -> Result<Json<ActionResult>, ServiceError> {
    let action = Action::Pass {
        player_id: request.player_id,
    };
    Ok(Json(state.service.apply(&id, action).await?))
}

async fn exchange(
    Path(id): Path<String>,
    State(state): State<ApiState>,
    Json(request): Json<ExchangeRequest>,
) -> Result<Json<ActionResult>, ServiceError> {
    let action = Action::Exchange {
        player_id: request.player_id,
        tiles: request.tiles,
    };
    Ok(Json(state.service.apply(&id, action).await?))
}

async fn bot_move(
    Path(id): Path<String>,
    State(state): State<ApiState>,
    request: Option<Json<BotMoveRequest>>,
) -> Result<Json<ActionResult>, ServiceError> {
    let action = Action::BotMove {
        difficulty: request.and_then(|Json(body)| body.difficulty),
    };
    Ok(Json(state.service.apply(&id, action).await?))
}

async fn hint(
    Path(id): Path<String>,
    State(state): State<ApiState>,
    Json(request): Json<PlayerRequest>,
) -> Result<Json<ActionResult>, ServiceError> {
    let action = Action::Hint {
        player_id: request.player_id,
    };
    Ok(Json(state.service.apply(&id, action).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Repository;
    use crate::game::DEFAULT_BOT_ID;
    use crate::test_utils::{fixed_session, setup_app, StubOracle};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn send(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_create_and_get_game() {
        let (_, app) = setup_app(StubOracle::accepting_all());

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/games",
            json!({ "players": ["alice", "bob"], "seed": "abc" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["game"]["currentTurn"], "alice");
        assert_eq!(created["game"]["playerData"]["bob"]["rack"].as_array().unwrap().len(), 7);

        let uri = format!("/api/games/{}", created["id"].as_str().unwrap());
        let (status, fetched) = send(&app, Method::GET, &uri, Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_play_and_pass() {
        let (repository, app) = setup_app(StubOracle::accepting_all());
        let stored = repository
            .create_game(&fixed_session("CATSEEN", "DOGRAIL", "ABCDEFGHIJ"))
            .await
            .unwrap();

        // Scores are optional and always taken from the rack.
        let tiles = json!([
            { "letter": "C", "row": 7, "col": 7 },
            { "letter": "A", "row": 7, "col": 8 },
            { "letter": "T", "score": 99, "row": 7, "col": 9 }
        ]);
        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/games/{}/play", stored.id),
            json!({ "playerId": "alice", "pendingTiles": tiles }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"]["type"], "played");
        assert_eq!(body["outcome"]["score"], 10);
        assert_eq!(body["game"]["board"]["7-7"]["letter"], "C");
        assert_eq!(body["version"], 1);

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/games/{}/pass", stored.id),
            json!({ "playerId": "bob" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["game"]["consecutivePasses"], 1);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let (repository, app) = setup_app(StubOracle::accepting_all());
        let stored = repository
            .create_game(&fixed_session("CATSEEN", "DOGRAIL", "ABCDE"))
            .await
            .unwrap();
        let base = format!("/api/games/{}", stored.id);

        let (status, body) = send(&app, Method::POST, &format!("{}/pass", base), json!({ "playerId": "bob" })).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "It's not your turn.");

        let (status, _) = send(&app, Method::POST, &format!("{}/pass", base), json!({ "playerId": "eve" })).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("{}/exchange", base),
            json!({ "playerId": "alice", "tiles": [{ "letter": "C" }] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Not enough tiles left in the bag"));

        let (status, _) = send(&app, Method::GET, "/api/games/missing", Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/games",
            json!({ "players": ["alice", "alice"] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_word_service_failure_is_bad_gateway() {
        let (repository, app) = setup_app(StubOracle::failing());
        let stored = repository
            .create_game(&fixed_session("CATSEEN", "DOGRAIL", "ABCDEFGHIJ"))
            .await
            .unwrap();

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/games/{}/hint", stored.id),
            json!({ "playerId": "alice" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_bot_move_without_body() {
        let (repository, app) = setup_app(StubOracle::accepting_all());
        let mut session = fixed_session("CATSEEN", "DOGRAIL", "ABCDEFGHIJ");
        let bot_data = session.player_data.remove("bob").unwrap();
        session.player_data.insert(DEFAULT_BOT_ID.to_string(), bot_data);
        session.players[1] = DEFAULT_BOT_ID.to_string();
        session.current_turn = DEFAULT_BOT_ID.to_string();
        let stored = repository.create_game(&session).await.unwrap();

        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/games/{}/bot-move", stored.id))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["outcome"]["type"], "botPassed");
        assert_eq!(body["game"]["currentTurn"], "alice");
    }
}
