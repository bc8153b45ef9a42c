//! HTTP API handlers.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use rps_game_core::{
    AccountId, ArbiterError, BetAmounts, Commitment, ErrorKind, EventRecord, Game, GameId,
    GameState, Ledger, Move, Outcome, RevealStatus, Salt,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::state::{to_timestamp, AppState};

/// Header carrying the authenticated caller
pub const PLAYER_ID_HEADER: &str = "X-Player-Id";

// ============ Errors ============

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    kind: Option<ErrorKind>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: Option<ErrorKind>,
}

impl AppError {
    fn unauthenticated(message: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.to_string(),
            kind: None,
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            kind: Some(ErrorKind::InvalidInput),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            kind: Some(ErrorKind::InvalidInput),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<ArbiterError> for AppError {
    fn from(err: ArbiterError) -> Self {
        let kind = err.kind();
        let status = match (&err, kind) {
            (ArbiterError::GameNotFound(_), _) => StatusCode::NOT_FOUND,
            (_, ErrorKind::InvalidInput) => StatusCode::BAD_REQUEST,
            (_, ErrorKind::Authorization) => StatusCode::FORBIDDEN,
            (_, ErrorKind::StateMismatch) | (_, ErrorKind::Temporal) => StatusCode::CONFLICT,
            (_, ErrorKind::CommitmentMismatch) => StatusCode::UNPROCESSABLE_ENTITY,
            (_, ErrorKind::FundTransfer) => StatusCode::PAYMENT_REQUIRED,
        };
        debug!(error = %err, ?kind, "operation rejected");
        Self {
            status,
            message: err.to_string(),
            kind: Some(kind),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            kind: self.kind,
        };
        (self.status, Json(body)).into_response()
    }
}

/// JSON body extractor whose rejections use the `{error, kind}` shape
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

// ============ Request/Response types ============

#[derive(Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: AccountId,
    pub balance: u64,
}

#[derive(Serialize, Deserialize)]
pub struct StartGameRequest {
    pub opponent: AccountId,
    pub commitment: Commitment,
}

#[derive(Serialize, Deserialize)]
pub struct StartGameResponse {
    pub game_id: GameId,
}

#[derive(Serialize, Deserialize)]
pub struct JoinGameRequest {
    pub commitment: Commitment,
}

#[derive(Serialize, Deserialize)]
pub struct BetRequest {
    pub amount: u64,
}

#[derive(Serialize, Deserialize)]
pub struct RevealRequest {
    /// Numeric move code: 1 rock, 2 paper, 3 scissors
    #[serde(rename = "move")]
    pub code: u8,
    pub salt: Salt,
}

#[derive(Serialize, Deserialize)]
pub struct RevealResponse {
    /// "awaiting_opponent_reveal" or "settled"
    pub status: String,
    pub outcome: Option<Outcome>,
}

#[derive(Serialize, Deserialize)]
pub struct GameStateResponse {
    pub game_id: GameId,
    pub state: GameState,
}

#[derive(Serialize, Deserialize)]
pub struct BetAmountsResponse {
    pub bet1: u64,
    pub bet2: u64,
    pub total: u64,
}

impl From<BetAmounts> for BetAmountsResponse {
    fn from(bets: BetAmounts) -> Self {
        Self {
            bet1: bets.bet1,
            bet2: bets.bet2,
            total: bets.total(),
        }
    }
}

#[derive(Deserialize)]
pub struct EventsQuery {
    pub game_id: Option<GameId>,
}

#[derive(Serialize, Deserialize)]
pub struct TickRequest {
    /// The simulated clock only moves forward
    pub seconds: u64,
}

#[derive(Serialize, Deserialize)]
pub struct TickResponse {
    pub now: u64,
}

// ============ Helper to get caller from header ============

fn caller_from_headers(headers: &HeaderMap) -> Result<AccountId, AppError> {
    let value = headers
        .get(PLAYER_ID_HEADER)
        .ok_or_else(|| AppError::unauthenticated("Missing X-Player-Id header"))?;
    value
        .to_str()
        .ok()
        .and_then(|s| s.parse::<AccountId>().ok())
        .filter(|id| !id.is_null())
        .ok_or_else(|| AppError::unauthenticated("Invalid X-Player-Id header"))
}

// ============ Account handlers ============

pub async fn open_account(State(state): State<AppState>) -> (StatusCode, Json<AccountResponse>) {
    let (id, balance) = state.open_account();
    info!(account = %id, balance, "account opened");
    (StatusCode::CREATED, Json(AccountResponse { id, balance }))
}

pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<AccountId>,
) -> Result<Json<AccountResponse>, AppError> {
    let balance = state.with_arbiter(|arbiter, _| {
        let ledger = arbiter.ledger();
        ledger.has_account(&id).then(|| ledger.balance(&id))
    });
    let balance = balance.ok_or_else(|| AppError::not_found(format!("Account not found: {id}")))?;
    Ok(Json(AccountResponse { id, balance }))
}

// ============ Game operations ============

pub async fn start_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(req): AppJson<StartGameRequest>,
) -> Result<(StatusCode, Json<StartGameResponse>), AppError> {
    let caller = caller_from_headers(&headers)?;
    let game_id = state.with_arbiter(|arbiter, now| {
        arbiter.start_game(&caller, &req.opponent, req.commitment, now)
    })?;
    Ok((StatusCode::CREATED, Json(StartGameResponse { game_id })))
}

pub async fn join_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game_id): Path<GameId>,
    AppJson(req): AppJson<JoinGameRequest>,
) -> Result<Json<Game>, AppError> {
    let caller = caller_from_headers(&headers)?;
    let game = state.with_arbiter(|arbiter, now| {
        arbiter.join_game(&caller, game_id, req.commitment, now)?;
        arbiter.game(game_id).cloned()
    })?;
    Ok(Json(game))
}

pub async fn send_bet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game_id): Path<GameId>,
    AppJson(req): AppJson<BetRequest>,
) -> Result<Json<BetAmountsResponse>, AppError> {
    let caller = caller_from_headers(&headers)?;
    let bets = state.with_arbiter(|arbiter, now| {
        arbiter.send_bet(&caller, game_id, req.amount, now)?;
        arbiter.bet_amounts(game_id)
    })?;
    Ok(Json(bets.into()))
}

pub async fn reveal_move(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game_id): Path<GameId>,
    AppJson(req): AppJson<RevealRequest>,
) -> Result<Json<RevealResponse>, AppError> {
    let caller = caller_from_headers(&headers)?;
    let play = Move::from_code(req.code).ok_or(ArbiterError::InvalidMove)?;
    let status = state.with_arbiter(|arbiter, now| {
        arbiter.reveal_move(&caller, game_id, play, &req.salt, now)
    })?;

    let response = match status {
        RevealStatus::AwaitingOpponentReveal => RevealResponse {
            status: "awaiting_opponent_reveal".to_string(),
            outcome: None,
        },
        RevealStatus::Settled(outcome) => RevealResponse {
            status: "settled".to_string(),
            outcome: Some(outcome),
        },
    };
    Ok(Json(response))
}

pub async fn abort_game(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(game_id): Path<GameId>,
) -> Result<Json<Game>, AppError> {
    let caller = caller_from_headers(&headers)?;
    let game = state.with_arbiter(|arbiter, now| {
        arbiter.abort_game(&caller, game_id, now)?;
        arbiter.game(game_id).cloned()
    })?;
    Ok(Json(game))
}

// ============ Queries ============

pub async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
) -> Result<Json<Game>, AppError> {
    let game = state.with_arbiter(|arbiter, _| arbiter.game(game_id).cloned())?;
    Ok(Json(game))
}

pub async fn get_game_state(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
) -> Result<Json<GameStateResponse>, AppError> {
    let game_state = state.with_arbiter(|arbiter, _| arbiter.game_state(game_id))?;
    Ok(Json(GameStateResponse {
        game_id,
        state: game_state,
    }))
}

pub async fn get_bet_amounts(
    State(state): State<AppState>,
    Path(game_id): Path<GameId>,
) -> Result<Json<BetAmountsResponse>, AppError> {
    let bets = state.with_arbiter(|arbiter, _| arbiter.bet_amounts(game_id))?;
    Ok(Json(bets.into()))
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Json<Vec<EventRecord>> {
    let events = state.with_arbiter(|arbiter, _| match query.game_id {
        Some(game_id) => arbiter.events_for(game_id).cloned().collect(),
        None => arbiter.events().to_vec(),
    });
    Json(events)
}

// ============ System ============

pub async fn tick(
    State(state): State<AppState>,
    AppJson(req): AppJson<TickRequest>,
) -> Result<Json<TickResponse>, AppError> {
    let now = state
        .advance_time(req.seconds)
        .ok_or_else(|| AppError::bad_request("Clock cannot advance that far"))?;
    info!(seconds = req.seconds, %now, "simulated clock advanced");
    Ok(Json(TickResponse {
        now: to_timestamp(now),
    }))
}

pub async fn health() -> &'static str {
    "ok"
}
