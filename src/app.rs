#![cfg(not(tarpaulin_include))]

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Multipart, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::closet::{DeviceKind, RackDevice};
use crate::inventory::{self, FieldValue, RawInventoryRow};
use crate::report::{RecyclingStatus, ReportError, Severity, VisitReport};
use crate::saving;

pub struct AppState {
    report: Mutex<VisitReport>,
    data_dir: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteUpdate {
    office_name: Option<String>,
    technician: Option<String>,
    visit_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct FieldUpdate {
    id: String,
    field: String,
    value: FieldValue,
}

#[derive(Deserialize)]
struct AddRow {
    name: String,
}

#[derive(Deserialize)]
struct DeleteById {
    id: String,
}

#[derive(Deserialize)]
struct ImportRows {
    rows: Vec<RawInventoryRow>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddIssue {
    description: String,
    severity: Option<Severity>,
    noted_on: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct ResolveIssue {
    id: String,
    resolved: bool,
}

#[derive(Deserialize)]
struct AddRepair {
    description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteRepair {
    id: String,
    completed: bool,
    completed_on: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct AddRecommendation {
    description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddRecycling {
    item: String,
    quantity: Option<FieldValue>,
    logged_on: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct RecyclingUpdate {
    id: String,
    status: RecyclingStatus,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddRack {
    name: String,
    units: u64,
    power_ports: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MountDevice {
    rack_id: String,
    name: String,
    kind: DeviceKind,
    unit_position: u64,
    unit_height: u64,
    power_ports: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnmountDevice {
    rack_id: String,
    device_id: String,
}

#[derive(Deserialize)]
struct NameQuery {
    name: Option<String>,
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

fn status_ok() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        message: None,
    })
}

fn status_error(message: impl ToString) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "error".to_string(),
        message: Some(message.to_string()),
    })
}

pub async fn run(port: u16, data_dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    // Resume from the autosave slot when one exists
    let autosave = saving::report_path(&data_dir, saving::STORAGE_KEY);
    let report = match saving::load_report(&autosave) {
        Ok(report) => {
            log::info!("resumed report from {}", autosave.display());
            report
        }
        Err(_) => VisitReport::new(),
    };

    let app_state = Arc::new(AppState {
        report: Mutex::new(report),
        data_dir,
    });

    let app = Router::new()
        .route("/api/report", get(get_report))
        .route("/api/report/site", post(update_site))
        .route("/api/inventory", get(get_inventory))
        .route("/api/inventory/update", post(update_inventory_field))
        .route("/api/inventory/add", post(add_inventory_row))
        .route("/api/inventory/delete", post(delete_inventory_row))
        .route("/api/inventory/import", post(import_inventory_rows))
        .route("/api/issues/add", post(add_issue))
        .route("/api/issues/resolve", post(resolve_issue))
        .route("/api/issues/delete", post(delete_issue))
        .route("/api/repairs/add", post(add_repair))
        .route("/api/repairs/complete", post(complete_repair))
        .route("/api/repairs/delete", post(delete_repair))
        .route("/api/recommendations/add", post(add_recommendation))
        .route("/api/recommendations/delete", post(delete_recommendation))
        .route("/api/recycling/add", post(add_recycling))
        .route("/api/recycling/status", post(update_recycling_status))
        .route("/api/recycling/delete", post(delete_recycling))
        .route("/api/closet", get(get_closet))
        .route("/api/closet/racks/add", post(add_rack))
        .route("/api/closet/racks/delete", post(delete_rack))
        .route("/api/closet/devices/mount", post(mount_device))
        .route("/api/closet/devices/unmount", post(unmount_device))
        .route("/api/save", post(save_report))
        .route("/api/load", post(load_report))
        .route("/api/export", get(export_report))
        .route("/api/import", post(import_report))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    log::info!("listening on http://127.0.0.1:{}", port);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn get_report(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let report = state.report.lock().unwrap();
    Json(serde_json::json!({
        "report": &*report,
        "summary": report.summary(),
    }))
}

async fn update_site(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SiteUpdate>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();
    report.update_site(
        payload.office_name.as_deref(),
        payload.technician.as_deref(),
        payload.visit_date,
    );
    status_ok()
}

async fn get_inventory(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let report = state.report.lock().unwrap();

    let rows: Vec<_> = report
        .inventory
        .iter()
        .map(|row| {
            serde_json::json!({
                "row": row,
                "totals": inventory::row_totals(row),
            })
        })
        .collect();

    Json(serde_json::json!({
        "rows": rows,
        "summary": report.summary(),
    }))
}

// The form calls this on every edit; it answers with the row's fresh totals
// and the refreshed summary so displayed figures never go stale.
async fn update_inventory_field(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FieldUpdate>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report.update_row_field(&payload.id, &payload.field, &payload.value) {
        Ok(totals) => Json(serde_json::json!({
            "status": "ok",
            "totals": totals,
            "summary": report.summary(),
        }))
        .into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn add_inventory_row(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddRow>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report.add_custom_row(&payload.name) {
        Ok(row) => Json(serde_json::json!({ "status": "ok", "row": row })).into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn delete_inventory_row(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DeleteById>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report.delete_row(&payload.id) {
        Ok(()) => status_ok().into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn import_inventory_rows(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ImportRows>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();
    report.import_rows(&payload.rows);

    Json(serde_json::json!({
        "status": "ok",
        "rows": report.inventory,
        "summary": report.summary(),
    }))
}

async fn add_issue(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddIssue>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();
    let severity = payload.severity.unwrap_or(Severity::Medium);

    match report.add_issue(&payload.description, severity, payload.noted_on) {
        Ok(issue) => Json(serde_json::json!({ "status": "ok", "issue": issue })).into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn resolve_issue(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResolveIssue>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report.set_issue_resolved(&payload.id, payload.resolved) {
        Ok(()) => status_ok().into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn delete_issue(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DeleteById>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report.delete_issue(&payload.id) {
        Ok(()) => status_ok().into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn add_repair(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddRepair>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report.add_repair(&payload.description) {
        Ok(repair) => Json(serde_json::json!({ "status": "ok", "repair": repair })).into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn complete_repair(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CompleteRepair>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report.set_repair_completed(&payload.id, payload.completed, payload.completed_on) {
        Ok(()) => status_ok().into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn delete_repair(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DeleteById>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report.delete_repair(&payload.id) {
        Ok(()) => status_ok().into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn add_recommendation(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddRecommendation>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report.add_recommendation(&payload.description) {
        Ok(rec) => Json(serde_json::json!({ "status": "ok", "recommendation": rec })).into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn delete_recommendation(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DeleteById>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report.delete_recommendation(&payload.id) {
        Ok(()) => status_ok().into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn add_recycling(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddRecycling>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();
    let quantity = payload.quantity.unwrap_or(FieldValue::Null);

    match report.add_recycling(&payload.item, &quantity, payload.logged_on) {
        Ok(entry) => Json(serde_json::json!({ "status": "ok", "entry": entry })).into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn update_recycling_status(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RecyclingUpdate>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report.set_recycling_status(&payload.id, payload.status) {
        Ok(()) => status_ok().into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn delete_recycling(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DeleteById>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report.delete_recycling(&payload.id) {
        Ok(()) => status_ok().into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn get_closet(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let report = state.report.lock().unwrap();

    let racks: Vec<_> = report
        .closet
        .racks
        .iter()
        .map(|rack| {
            serde_json::json!({
                "rack": rack,
                "usage": rack.usage(),
            })
        })
        .collect();

    Json(serde_json::json!({ "racks": racks }))
}

async fn add_rack(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddRack>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report
        .closet
        .add_rack(&payload.name, payload.units, payload.power_ports)
    {
        Ok(rack) => Json(serde_json::json!({ "status": "ok", "rack": rack })).into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn delete_rack(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DeleteById>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report.closet.remove_rack(&payload.id) {
        Ok(()) => status_ok().into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn mount_device(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MountDevice>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    let device = RackDevice::new(
        &payload.name,
        payload.kind,
        payload.unit_position,
        payload.unit_height,
        payload.power_ports,
    );

    match report.closet.mount_device(&payload.rack_id, device) {
        Ok(()) => status_ok().into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn unmount_device(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UnmountDevice>,
) -> impl IntoResponse {
    let mut report = state.report.lock().unwrap();

    match report.closet.unmount_device(&payload.rack_id, &payload.device_id) {
        Ok(()) => status_ok().into_response(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn save_report(
    Query(params): Query<NameQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let name = params.name.unwrap_or_else(|| saving::STORAGE_KEY.to_string());
    if !saving::is_valid_report_name(&name) {
        return status_error(ReportError::MissingField("a valid report name"));
    }

    let report = state.report.lock().unwrap();
    let path = saving::report_path(&state.data_dir, &name);

    match saving::save_report(&report, &path) {
        Ok(()) => status_ok(),
        Err(e) => status_error(e),
    }
}

async fn load_report(
    Query(params): Query<NameQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let name = params.name.unwrap_or_else(|| saving::STORAGE_KEY.to_string());
    if !saving::is_valid_report_name(&name) {
        return status_error(ReportError::MissingField("a valid report name"));
    }

    let path = saving::report_path(&state.data_dir, &name);
    match saving::load_report(&path) {
        Ok(loaded) => {
            let mut report = state.report.lock().unwrap();
            *report = loaded;
            status_ok()
        }
        Err(e) => status_error(format!("failed to load report: {}", e)),
    }
}

async fn export_report(State(state): State<Arc<AppState>>) -> Response {
    let report = state.report.lock().unwrap();

    match saving::snapshot_to_bytes(&report) {
        Ok(buffer) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/gzip")
            .body(axum::body::Body::from(Bytes::from(buffer)))
            .unwrap(),
        Err(e) => status_error(e).into_response(),
    }
}

async fn import_report(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut file_data = Vec::new();

    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        if field.name() == Some("report") {
            file_data = field.bytes().await.unwrap_or_default().to_vec();
        }
    }

    if file_data.is_empty() {
        return status_error("no file data received").into_response();
    }

    match saving::snapshot_from_bytes(&file_data) {
        Ok(loaded) => {
            let mut report = state.report.lock().unwrap();
            *report = loaded;
            status_ok().into_response()
        }
        Err(e) => status_error(format!("failed to import report: {}", e)).into_response(),
    }
}
