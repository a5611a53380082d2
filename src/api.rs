//! REST API for the room planner.
//!
//! Exposes one shared planner over HTTP/JSON. Uses Axum as the web framework
//! and supports CORS.

use std::sync::{Arc, OnceLock};

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::config::ApiConfig;
use crate::door::DoorSweep;
use crate::model::{Item, ItemId, Size, WallSide};
use crate::planner::{
    DragOutcome, ItemEdit, NewItem, NewItemKind, Planner, PlannerError, PlannerSettings,
};
use crate::scene::SceneError;
use crate::snapshot::{HumanRecord, ItemRecord, RoomRecord, SceneSnapshot};
use crate::types::Vec2;

#[derive(Clone)]
pub struct ApiState {
    planner: Arc<Mutex<Planner>>,
}

impl ApiState {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(Mutex::new(planner)),
        }
    }
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>room-planner API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                window.ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                });
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// An item as returned by the API: its record plus the collision flag.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    #[serde(flatten)]
    pub item: ItemRecord,
    pub invalid: bool,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            item: ItemRecord::from(item),
            invalid: item.invalid,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SnapWallResponse {
    pub side: WallSide,
    pub item: ItemResponse,
}

/// Drag request: the item is grabbed at `grab` and moved through `path`.
///
/// The drag ends at the last point of `path`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "grab": { "xCm": 120.0, "yCm": 80.0 },
        "path": [{ "xCm": 160.0, "yCm": 80.0 }, { "xCm": 200.0, "yCm": 90.0 }]
    })
)]
pub struct DragRequest {
    pub grab: Vec2,
    #[serde(default)]
    pub path: Vec<Vec2>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DragResponse {
    pub outcome: DragOutcome,
    pub item: ItemResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CollisionResponse {
    pub collides: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HumanResponse {
    pub pos: Vec2,
    pub radius_cm: f64,
    /// Ids of the items the probe bumps into.
    pub conflicts: Vec<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HumanUpdate {
    pub pos: Option<Vec2>,
    pub radius_cm: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({ "widthCm": 500.0, "lengthCm": 350.0, "snapEpsilonCm": 4.0 }))]
pub struct RoomUpdate {
    pub width_cm: f64,
    pub length_cm: f64,
    pub snap_epsilon_cm: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub applied: bool,
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
    )
}

fn planner_error(err: PlannerError) -> Response {
    eprintln!("❌ {}", err);
    match err {
        PlannerError::Scene(SceneError::UnknownItem(_)) => {
            error_response(StatusCode::NOT_FOUND, "Unknown item", err.to_string())
        }
        PlannerError::Data(_) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Invalid scene data",
            err.to_string(),
        ),
        PlannerError::NoDragInProgress => {
            error_response(StatusCode::CONFLICT, "No drag in progress", err.to_string())
        }
    }
}

fn unwrap_payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    match payload {
        Ok(Json(payload)) => Ok(payload),
        Err(err) => Err(json_deserialize_error(err)),
    }
}

fn item_response(planner: &Planner, id: &ItemId) -> Response {
    match planner.scene().item(id) {
        Ok(item) => Json(ItemResponse::from(item)).into_response(),
        Err(err) => planner_error(err.into()),
    }
}

fn human_response(planner: &Planner, conflicts: Vec<ItemId>) -> HumanResponse {
    let human = &planner.scene().human;
    HumanResponse {
        pos: human.pos,
        radius_cm: human.radius_cm,
        conflicts: conflicts.into_iter().map(|id| id.to_string()).collect(),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handle_get_scene,
        handle_put_scene,
        handle_add_item,
        handle_get_item,
        handle_edit_item,
        handle_delete_item,
        handle_rotate_item,
        handle_duplicate_item,
        handle_snap_wall,
        handle_drag,
        handle_door_sweep,
        handle_collision,
        handle_get_human,
        handle_put_human,
        handle_put_room,
        handle_undo,
        handle_redo,
        handle_seed
    ),
    components(
        schemas(
            SceneSnapshot,
            RoomRecord,
            ItemRecord,
            HumanRecord,
            NewItem,
            NewItemKind,
            ItemEdit,
            ItemResponse,
            SnapWallResponse,
            DragRequest,
            DragResponse,
            DragOutcome,
            DoorSweep,
            CollisionResponse,
            HumanResponse,
            HumanUpdate,
            RoomUpdate,
            HistoryResponse,
            ErrorResponse,
            Vec2,
            Size,
            WallSide
        )
    ),
    tags(
        (name = "scene", description = "Whole-scene import, export and history"),
        (name = "items", description = "Item placement operations"),
        (name = "room", description = "Room and human probe")
    )
)]
struct ApiDoc;

/// Builds the router with every endpoint and CORS.
pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route("/scene", get(handle_get_scene).put(handle_put_scene))
        .route("/items", post(handle_add_item))
        .route(
            "/items/{id}",
            get(handle_get_item)
                .patch(handle_edit_item)
                .delete(handle_delete_item),
        )
        .route("/items/{id}/rotate", post(handle_rotate_item))
        .route("/items/{id}/duplicate", post(handle_duplicate_item))
        .route("/items/{id}/snap-wall", post(handle_snap_wall))
        .route("/items/{id}/drag", post(handle_drag))
        .route("/items/{id}/door-sweep", get(handle_door_sweep))
        .route("/collision", post(handle_collision))
        .route("/human", get(handle_get_human).put(handle_put_human))
        .route("/room", put(handle_put_room))
        .route("/history/undo", post(handle_undo))
        .route("/history/redo", post(handle_redo))
        .route("/seed", post(handle_seed))
        // API documentation
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        .layer(cors)
        .with_state(state)
}

/// Starts the API server.
///
/// Blocks until the server is terminated.
pub async fn start_api_server(config: ApiConfig, settings: PlannerSettings) {
    let state = ApiState::new(Planner::new(settings));
    let app = router(state);

    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("❌ Could not bind API server to {}: {}", addr, err);
            return;
        }
    };

    println!(
        "🚀 Server running on http://{}:{}",
        config.display_host(),
        config.port()
    );
    if config.binds_to_all_interfaces() && config.uses_default_host() {
        println!("💡 Local access: http://localhost:{}", config.port());
    }
    println!(
        "📐 Room {} × {} cm, snap distance {} cm",
        settings.room_width_cm, settings.room_length_cm, settings.snap_epsilon_cm
    );
    println!("📦 API Endpoints:");
    println!("   - GET|PUT /scene");
    println!("   - POST /items, GET|PATCH|DELETE /items/{{id}}");
    println!("   - POST /items/{{id}}/rotate|duplicate|snap-wall|drag");
    println!("   - GET /items/{{id}}/door-sweep");
    println!("   - POST /collision, GET|PUT /human, PUT /room");
    println!("   - POST /history/undo, POST /history/redo, POST /seed");
    println!("📑 Documentation:");
    println!("   - GET /docs");
    println!("   - GET /docs/openapi.json");

    if let Err(err) = axum::serve(listener, app).await {
        eprintln!("❌ API server terminated with an error: {err}");
    }
}

#[utoipa::path(
    get,
    path = "/scene",
    responses((status = 200, description = "Current scene", body = SceneSnapshot)),
    tag = "scene"
)]
async fn handle_get_scene(State(state): State<ApiState>) -> Response {
    let planner = state.planner.lock().await;
    Json(planner.export()).into_response()
}

/// Replaces the whole scene and clears the history.
#[utoipa::path(
    put,
    path = "/scene",
    request_body = SceneSnapshot,
    responses(
        (status = 200, description = "Scene imported", body = SceneSnapshot),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed or invalid scene data", body = ErrorResponse)
    ),
    tag = "scene"
)]
async fn handle_put_scene(
    State(state): State<ApiState>,
    payload: Result<Json<SceneSnapshot>, JsonRejection>,
) -> Response {
    let snapshot = match unwrap_payload(payload) {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };
    println!("📥 Scene import: {} items", snapshot.items.len());

    let mut planner = state.planner.lock().await;
    if let Err(err) = planner.import(&snapshot) {
        return planner_error(err);
    }
    let invalid = planner.scene().items().iter().filter(|it| it.invalid).count();
    println!("📐 Imported {} items, {} invalid", planner.scene().len(), invalid);
    Json(planner.export()).into_response()
}

#[utoipa::path(
    post,
    path = "/items",
    request_body = NewItem,
    responses(
        (status = 201, description = "Item added", body = ItemResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed request", body = ErrorResponse)
    ),
    tag = "items"
)]
async fn handle_add_item(
    State(state): State<ApiState>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> Response {
    let request = match unwrap_payload(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    println!("📥 New {:?} item", request.kind);

    let mut planner = state.planner.lock().await;
    let id = match planner.add_item(&request) {
        Ok(id) => id,
        Err(err) => return planner_error(err),
    };
    match planner.scene().item(&id) {
        Ok(item) => (StatusCode::CREATED, Json(ItemResponse::from(item))).into_response(),
        Err(err) => planner_error(err.into()),
    }
}

#[utoipa::path(
    get,
    path = "/items/{id}",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item", body = ItemResponse),
        (status = NOT_FOUND, description = "Unknown item", body = ErrorResponse)
    ),
    tag = "items"
)]
async fn handle_get_item(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let planner = state.planner.lock().await;
    item_response(&planner, &ItemId::new(id))
}

/// Edits an item. Illegal results are kept and reported through `invalid`.
#[utoipa::path(
    patch,
    path = "/items/{id}",
    params(("id" = String, Path, description = "Item id")),
    request_body = ItemEdit,
    responses(
        (status = 200, description = "Edited item", body = ItemResponse),
        (status = NOT_FOUND, description = "Unknown item", body = ErrorResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed request", body = ErrorResponse)
    ),
    tag = "items"
)]
async fn handle_edit_item(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<ItemEdit>, JsonRejection>,
) -> Response {
    let edit = match unwrap_payload(payload) {
        Ok(edit) => edit,
        Err(response) => return response,
    };
    let id = ItemId::new(id);
    println!("📥 Edit {}", id);

    let mut planner = state.planner.lock().await;
    match planner.edit_item(&id, &edit) {
        Ok(item) => {
            if item.invalid {
                println!("⚠️ {} now collides", id);
            }
            Json(ItemResponse::from(&item)).into_response()
        }
        Err(err) => planner_error(err),
    }
}

#[utoipa::path(
    delete,
    path = "/items/{id}",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Removed item", body = ItemResponse),
        (status = NOT_FOUND, description = "Unknown item", body = ErrorResponse)
    ),
    tag = "items"
)]
async fn handle_delete_item(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let mut planner = state.planner.lock().await;
    match planner.remove_item(&ItemId::new(id)) {
        Ok(item) => Json(ItemResponse::from(&item)).into_response(),
        Err(err) => planner_error(err),
    }
}

#[utoipa::path(
    post,
    path = "/items/{id}/rotate",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Rotated item", body = ItemResponse),
        (status = NOT_FOUND, description = "Unknown item", body = ErrorResponse)
    ),
    tag = "items"
)]
async fn handle_rotate_item(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let mut planner = state.planner.lock().await;
    match planner.rotate_item(&ItemId::new(id)) {
        Ok(item) => Json(ItemResponse::from(&item)).into_response(),
        Err(err) => planner_error(err),
    }
}

#[utoipa::path(
    post,
    path = "/items/{id}/duplicate",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 201, description = "The copy", body = ItemResponse),
        (status = NOT_FOUND, description = "Unknown item", body = ErrorResponse)
    ),
    tag = "items"
)]
async fn handle_duplicate_item(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Response {
    let mut planner = state.planner.lock().await;
    let copy = match planner.duplicate_item(&ItemId::new(id)) {
        Ok(copy) => copy,
        Err(err) => return planner_error(err),
    };
    match planner.scene().item(&copy) {
        Ok(item) => (StatusCode::CREATED, Json(ItemResponse::from(item))).into_response(),
        Err(err) => planner_error(err.into()),
    }
}

#[utoipa::path(
    post,
    path = "/items/{id}/snap-wall",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item moved flush to its closest wall", body = SnapWallResponse),
        (status = NOT_FOUND, description = "Unknown item", body = ErrorResponse)
    ),
    tag = "items"
)]
async fn handle_snap_wall(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let id = ItemId::new(id);
    let mut planner = state.planner.lock().await;
    let side = match planner.snap_item_to_wall(&id) {
        Ok(side) => side,
        Err(err) => return planner_error(err),
    };
    match planner.scene().item(&id) {
        Ok(item) => Json(SnapWallResponse {
            side,
            item: ItemResponse::from(item),
        })
        .into_response(),
        Err(err) => planner_error(err.into()),
    }
}

/// Runs a complete drag. An illegal end point rolls the whole scene back.
#[utoipa::path(
    post,
    path = "/items/{id}/drag",
    params(("id" = String, Path, description = "Item id")),
    request_body = DragRequest,
    responses(
        (status = 200, description = "Drag finished", body = DragResponse),
        (status = NOT_FOUND, description = "Unknown item", body = ErrorResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed request", body = ErrorResponse)
    ),
    tag = "items"
)]
async fn handle_drag(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<DragRequest>, JsonRejection>,
) -> Response {
    let request = match unwrap_payload(payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let id = ItemId::new(id);
    println!("📥 Drag {} through {} points", id, request.path.len());

    let mut planner = state.planner.lock().await;
    let outcome = run_drag(&mut planner, &id, &request);
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) => return planner_error(err),
    };
    if outcome == DragOutcome::RolledBack {
        println!("⚠️ Drag of {} ended on an illegal spot and was rolled back", id);
    }
    match planner.scene().item(&id) {
        Ok(item) => Json(DragResponse {
            outcome,
            item: ItemResponse::from(item),
        })
        .into_response(),
        Err(err) => planner_error(err.into()),
    }
}

fn run_drag(
    planner: &mut Planner,
    id: &ItemId,
    request: &DragRequest,
) -> Result<DragOutcome, PlannerError> {
    planner.begin_drag(id, request.grab)?;
    for point in &request.path {
        planner.drag_to(*point)?;
    }
    planner.end_drag()
}

#[utoipa::path(
    get,
    path = "/items/{id}/door-sweep",
    params(("id" = String, Path, description = "Item id")),
    responses(
        (status = 200, description = "Swing sector of an inward door", body = DoorSweep),
        (status = NOT_FOUND, description = "Unknown item or no sweep", body = ErrorResponse)
    ),
    tag = "items"
)]
async fn handle_door_sweep(State(state): State<ApiState>, Path(id): Path<String>) -> Response {
    let planner = state.planner.lock().await;
    match planner.scene().door_sweep(&ItemId::new(id)) {
        Ok(Some(sweep)) => Json(sweep).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            "No door sweep",
            "Only inward doors mounted on a wall have a sweep",
        ),
        Err(err) => planner_error(err.into()),
    }
}

/// Checks whether a candidate would collide if placed into the scene.
#[utoipa::path(
    post,
    path = "/collision",
    request_body = ItemRecord,
    responses(
        (status = 200, description = "Collision verdict", body = CollisionResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed request", body = ErrorResponse)
    ),
    tag = "items"
)]
async fn handle_collision(
    State(state): State<ApiState>,
    payload: Result<Json<ItemRecord>, JsonRejection>,
) -> Response {
    let record = match unwrap_payload(payload) {
        Ok(record) => record,
        Err(response) => return response,
    };
    let planner = state.planner.lock().await;
    let collides = planner.check_collision(&record.to_item());
    Json(CollisionResponse { collides }).into_response()
}

#[utoipa::path(
    get,
    path = "/human",
    responses((status = 200, description = "Human probe and its conflicts", body = HumanResponse)),
    tag = "room"
)]
async fn handle_get_human(State(state): State<ApiState>) -> Response {
    let planner = state.planner.lock().await;
    let conflicts = planner.scene().human_conflicts();
    Json(human_response(&planner, conflicts)).into_response()
}

/// Moves or resizes the human probe. Not recorded in history.
#[utoipa::path(
    put,
    path = "/human",
    request_body = HumanUpdate,
    responses(
        (status = 200, description = "Updated probe and its conflicts", body = HumanResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed request", body = ErrorResponse)
    ),
    tag = "room"
)]
async fn handle_put_human(
    State(state): State<ApiState>,
    payload: Result<Json<HumanUpdate>, JsonRejection>,
) -> Response {
    let update = match unwrap_payload(payload) {
        Ok(update) => update,
        Err(response) => return response,
    };
    let mut planner = state.planner.lock().await;
    let conflicts = planner.update_human(update.pos, update.radius_cm);
    if !conflicts.is_empty() {
        println!("⚠️ Human probe bumps into {} items", conflicts.len());
    }
    Json(human_response(&planner, conflicts)).into_response()
}

#[utoipa::path(
    put,
    path = "/room",
    request_body = RoomUpdate,
    responses(
        (status = 200, description = "Resized room", body = RoomRecord),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed request", body = ErrorResponse)
    ),
    tag = "room"
)]
async fn handle_put_room(
    State(state): State<ApiState>,
    payload: Result<Json<RoomUpdate>, JsonRejection>,
) -> Response {
    let update = match unwrap_payload(payload) {
        Ok(update) => update,
        Err(response) => return response,
    };
    let mut planner = state.planner.lock().await;
    let room = planner
        .resize_room(update.width_cm, update.length_cm, update.snap_epsilon_cm)
        .clone();
    println!("📐 Room is now {} × {} cm", room.width_cm, room.length_cm);
    Json(RoomRecord::from(&room)).into_response()
}

#[utoipa::path(
    post,
    path = "/history/undo",
    responses((status = 200, description = "Whether a step was undone", body = HistoryResponse)),
    tag = "scene"
)]
async fn handle_undo(State(state): State<ApiState>) -> Response {
    let mut planner = state.planner.lock().await;
    match planner.undo() {
        Ok(applied) => Json(HistoryResponse { applied }).into_response(),
        Err(err) => planner_error(err),
    }
}

#[utoipa::path(
    post,
    path = "/history/redo",
    responses((status = 200, description = "Whether a step was redone", body = HistoryResponse)),
    tag = "scene"
)]
async fn handle_redo(State(state): State<ApiState>) -> Response {
    let mut planner = state.planner.lock().await;
    match planner.redo() {
        Ok(applied) => Json(HistoryResponse { applied }).into_response(),
        Err(err) => planner_error(err),
    }
}

#[utoipa::path(
    post,
    path = "/seed",
    responses((status = 200, description = "Sample scene", body = SceneSnapshot)),
    tag = "scene"
)]
async fn handle_seed(State(state): State<ApiState>) -> Response {
    let mut planner = state.planner.lock().await;
    planner.seed_sample();
    println!("📐 Sample scene loaded with {} items", planner.scene().len());
    Json(planner.export()).into_response()
}

async fn serve_openapi_json() -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn state() -> ApiState {
        ApiState::new(Planner::default())
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        serde_json::from_slice(&bytes).expect("body is JSON")
    }

    async fn add(state: &ApiState, request: NewItem) -> String {
        let response = handle_add_item(State(state.clone()), Ok(Json(request))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        body["id"].as_str().expect("id is a string").to_string()
    }

    fn furniture(x: f64, y: f64) -> NewItem {
        NewItem {
            size: Some(Size::new(60.0, 60.0, 40.0)),
            pos: Some(Vec2::new(x, y)),
            ..NewItem::default()
        }
    }

    #[test]
    fn openapi_doc_lists_expected_paths() {
        let doc = openapi_doc();
        let paths = &doc.paths.paths;
        for path in [
            "/scene",
            "/items",
            "/items/{id}",
            "/items/{id}/drag",
            "/items/{id}/door-sweep",
            "/collision",
            "/human",
            "/room",
            "/history/undo",
            "/seed",
        ] {
            assert!(
                paths.contains_key(path),
                "OpenAPI documentation is missing the {} path",
                path
            );
        }
    }

    #[test]
    fn openapi_doc_contains_key_schemas() {
        let doc = openapi_doc();
        let components = doc
            .components
            .as_ref()
            .expect("OpenAPI documentation contains no components");
        for name in ["SceneSnapshot", "ItemRecord", "ItemEdit", "ErrorResponse"] {
            assert!(
                components.schemas.contains_key(name),
                "Expected schema '{}' is missing from OpenAPI spec",
                name
            );
        }
    }

    #[tokio::test]
    async fn added_item_can_be_fetched() {
        let state = state();
        let id = add(&state, furniture(100.0, 100.0)).await;

        let response = handle_get_item(State(state.clone()), Path(id.clone())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], id.as_str());
        assert_eq!(body["invalid"], false);
        assert_eq!(body["pos"]["xCm"], 100.0);
    }

    #[tokio::test]
    async fn unknown_items_are_not_found() {
        let state = state();
        let response = handle_get_item(State(state.clone()), Path("ghost".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Unknown item");

        let response = handle_rotate_item(State(state), Path("ghost".to_string())).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn import_without_room_is_rejected() {
        let state = state();
        let snapshot = SceneSnapshot::from_json(r#"{"items":[]}"#).expect("parses");
        let response = handle_put_scene(State(state), Ok(Json(snapshot))).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid scene data");
    }

    #[tokio::test]
    async fn illegal_drag_rolls_back() {
        let state = state();
        add(&state, furniture(50.0, 50.0)).await;
        let mover = add(&state, furniture(250.0, 50.0)).await;

        let request = DragRequest {
            grab: Vec2::new(250.0, 50.0),
            path: vec![Vec2::new(150.0, 60.0), Vec2::new(70.0, 70.0)],
        };
        let response = handle_drag(State(state.clone()), Path(mover), Ok(Json(request))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["outcome"], "rolledBack");
        assert_eq!(body["item"]["pos"]["xCm"], 250.0);
        assert_eq!(body["item"]["invalid"], false);
    }

    #[tokio::test]
    async fn door_sweep_exists_only_for_doors() {
        let state = state();
        let table = add(&state, furniture(150.0, 150.0)).await;
        let door = add(
            &state,
            NewItem {
                kind: NewItemKind::Door,
                ..NewItem::default()
            },
        )
        .await;

        let response = handle_door_sweep(State(state.clone()), Path(table)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = handle_door_sweep(State(state), Path(door)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["radiusCm"], 90.0);
    }

    #[tokio::test]
    async fn undo_reports_whether_anything_changed() {
        let state = state();
        let response = handle_undo(State(state.clone())).await;
        assert_eq!(body_json(response).await["applied"], false);

        add(&state, furniture(100.0, 100.0)).await;
        let response = handle_undo(State(state.clone())).await;
        assert_eq!(body_json(response).await["applied"], true);

        let scene = body_json(handle_get_scene(State(state)).await).await;
        assert_eq!(scene["items"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn human_update_lists_conflicts() {
        let state = state();
        let id = add(&state, furniture(100.0, 100.0)).await;

        let update = HumanUpdate {
            pos: Some(Vec2::new(90.0, 90.0)),
            radius_cm: Some(20.0),
        };
        let response = handle_put_human(State(state), Ok(Json(update))).await;
        let body = body_json(response).await;
        assert_eq!(body["conflicts"], json!([id]));
        assert_eq!(body["radiusCm"], 20.0);
    }

    #[tokio::test]
    async fn collision_check_does_not_modify_the_scene() {
        let state = state();
        add(&state, furniture(100.0, 100.0)).await;

        let candidate: ItemRecord = serde_json::from_value(json!({
            "pos": { "xCm": 120.0, "yCm": 120.0 },
            "size": { "wCm": 40.0, "lCm": 40.0, "hCm": 40.0 }
        }))
        .expect("record parses");
        let response = handle_collision(State(state.clone()), Ok(Json(candidate))).await;
        assert_eq!(body_json(response).await["collides"], true);

        let scene = body_json(handle_get_scene(State(state)).await).await;
        assert_eq!(scene["items"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn seed_returns_sample_scene() {
        let state = state();
        let body = body_json(handle_seed(State(state)).await).await;
        assert_eq!(body["items"].as_array().map(Vec::len), Some(5));
        assert_eq!(body["items"][0]["name"], "Bed");
    }
}
