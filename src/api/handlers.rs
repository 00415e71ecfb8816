//! API request handlers
//!
//! Handlers for all REST API endpoints. Every body is untrusted input: cost
//! arrays and scalars go through the validators before reaching the engines,
//! and validation failures come back as structured error responses rather
//! than 500s.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::core::{
    calculate_break_even_customers, calculate_cogs_breakdown, calculate_investor_metrics,
    calculate_margin_info, BreakEven,
};
use crate::report;
use crate::types::{
    CostBreakdown, CurrencyCode, InvestorInputs, InvestorMetrics, MarginInfo, ReportData,
};
use crate::validate::{
    validate_currency_code, validate_fixed_costs, validate_non_negative_number,
    validate_positive_number, validate_variable_costs,
};

use super::server::AppState;

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "Costwise API Server".to_string(),
        version: state.version.clone(),
        description: "HTTP API for SaaS pricing and COGS calculations".to_string(),
        endpoints: vec![
            EndpointInfo {
                path: "/health".to_string(),
                method: "GET".to_string(),
                description: "Health check endpoint".to_string(),
            },
            EndpointInfo {
                path: "/version".to_string(),
                method: "GET".to_string(),
                description: "Get server version".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/calculate".to_string(),
                method: "POST".to_string(),
                description: "COGS breakdown and margin at a price".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/break-even".to_string(),
                method: "POST".to_string(),
                description: "Break-even customer count".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/investor".to_string(),
                method: "POST".to_string(),
                description: "Investor metrics from pre-computed scalars".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/report/encode".to_string(),
                method: "POST".to_string(),
                description: "Encode a report into a shareable token".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/report/decode".to_string(),
                method: "POST".to_string(),
                description: "Decode a shareable token".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/report/store".to_string(),
                method: "POST".to_string(),
                description: "Store a report under a short id".to_string(),
            },
            EndpointInfo {
                path: "/api/v1/report/{id}".to_string(),
                method: "GET".to_string(),
                description: "Retrieve a stored report".to_string(),
            },
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "calculate".to_string(),
            "break-even".to_string(),
            "investor".to_string(),
            "report-codec".to_string(),
            "report-store".to_string(),
        ],
    }))
}

/// Calculate request. Cost arrays stay raw JSON so the validators own the
/// partial-failure semantics.
#[derive(Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub variable_costs: Value,
    #[serde(default)]
    pub fixed_costs: Value,
    pub customers: Value,
    pub price: Value,
    #[serde(default)]
    pub currency: Value,
}

/// Calculate response
#[derive(Serialize)]
pub struct CalculateResponse {
    pub breakdown: CostBreakdown,
    pub margin: MarginInfo,
    pub break_even_customers: Option<u64>,
    pub currency: CurrencyCode,
    pub warnings: Vec<String>,
}

fn normalize_costs(value: &Value) -> Value {
    // Absent array keys default to empty, mirroring the cost-file contract.
    if value.is_null() {
        Value::Array(Vec::new())
    } else {
        value.clone()
    }
}

/// POST /api/v1/calculate - COGS breakdown and margin
pub async fn calculate(Json(req): Json<CalculateRequest>) -> impl IntoResponse {
    let (variable_costs, mut warnings) =
        match validate_variable_costs(&normalize_costs(&req.variable_costs)) {
            Ok(v) => v,
            Err(e) => return Json(ApiResponse::<CalculateResponse>::err(e.to_string())),
        };
    let (fixed_costs, fixed_warnings) =
        match validate_fixed_costs(&normalize_costs(&req.fixed_costs)) {
            Ok(v) => v,
            Err(e) => return Json(ApiResponse::err(e.to_string())),
        };
    warnings.extend(fixed_warnings);

    let customers = match validate_non_negative_number(&req.customers, "customers") {
        Ok(n) => n.trunc() as u64,
        Err(e) => return Json(ApiResponse::err(e.to_string())),
    };
    let price = match validate_positive_number(&req.price, "price") {
        Ok(n) => n,
        Err(e) => return Json(ApiResponse::err(e.to_string())),
    };
    let currency = match validate_currency_code(&req.currency) {
        Ok(c) => c,
        Err(e) => return Json(ApiResponse::err(e.to_string())),
    };

    let breakdown = calculate_cogs_breakdown(&variable_costs, &fixed_costs, customers);
    let margin = calculate_margin_info(price, breakdown.total_cogs);
    let break_even =
        calculate_break_even_customers(breakdown.fixed_total, price, breakdown.variable_total);

    Json(ApiResponse::ok(CalculateResponse {
        breakdown,
        margin,
        break_even_customers: break_even.as_option(),
        currency,
        warnings: warnings.iter().map(|w| w.to_string()).collect(),
    }))
}

/// Break-even request
#[derive(Deserialize)]
pub struct BreakEvenRequest {
    pub fixed_total: Value,
    pub price: Value,
    pub variable_cost_per_customer: Value,
}

/// Break-even response
#[derive(Serialize)]
pub struct BreakEvenResponse {
    pub break_even_customers: Option<u64>,
    pub achievable: bool,
}

/// POST /api/v1/break-even - Break-even customer count
pub async fn break_even(Json(req): Json<BreakEvenRequest>) -> impl IntoResponse {
    let fixed_total = match validate_non_negative_number(&req.fixed_total, "fixed_total") {
        Ok(n) => n,
        Err(e) => return Json(ApiResponse::<BreakEvenResponse>::err(e.to_string())),
    };
    let price = match validate_positive_number(&req.price, "price") {
        Ok(n) => n,
        Err(e) => return Json(ApiResponse::err(e.to_string())),
    };
    let variable_cost = match validate_non_negative_number(
        &req.variable_cost_per_customer,
        "variable_cost_per_customer",
    ) {
        Ok(n) => n,
        Err(e) => return Json(ApiResponse::err(e.to_string())),
    };

    let result = calculate_break_even_customers(fixed_total, price, variable_cost);
    Json(ApiResponse::ok(BreakEvenResponse {
        break_even_customers: result.as_option(),
        achievable: !result.is_unreachable(),
    }))
}

/// Investor metrics request
#[derive(Deserialize)]
pub struct InvestorRequest {
    pub mrr: Value,
    pub paid_customers: Value,
    pub arpu: Value,
    pub gross_margin: Value,
    #[serde(default)]
    pub break_even_customers: Option<u64>,
    #[serde(default = "default_growth_rate")]
    pub monthly_growth_rate: f64,
    #[serde(default)]
    pub ltv: f64,
}

fn default_growth_rate() -> f64 {
    0.1
}

/// POST /api/v1/investor - Investor metrics
pub async fn investor(Json(req): Json<InvestorRequest>) -> impl IntoResponse {
    let mrr = match validate_non_negative_number(&req.mrr, "mrr") {
        Ok(n) => n,
        Err(e) => return Json(ApiResponse::<InvestorMetrics>::err(e.to_string())),
    };
    let paid_customers = match validate_non_negative_number(&req.paid_customers, "paid_customers") {
        Ok(n) => n.trunc() as u64,
        Err(e) => return Json(ApiResponse::err(e.to_string())),
    };
    let arpu = match validate_non_negative_number(&req.arpu, "arpu") {
        Ok(n) => n,
        Err(e) => return Json(ApiResponse::err(e.to_string())),
    };
    let gross_margin = match crate::validate::validate_number(&req.gross_margin, "gross_margin") {
        Ok(n) => n,
        Err(e) => return Json(ApiResponse::err(e.to_string())),
    };

    let break_even_customers = match req.break_even_customers {
        Some(n) => BreakEven::Customers(n),
        None => BreakEven::Unreachable,
    };

    let metrics = calculate_investor_metrics(InvestorInputs {
        mrr,
        paid_customers,
        arpu,
        gross_margin,
        break_even_customers,
        monthly_growth_rate: req.monthly_growth_rate,
        ltv: req.ltv,
    });
    Json(ApiResponse::ok(metrics))
}

/// Encode request: a raw report document, accepted permissively so legacy
/// shapes keep working.
#[derive(Deserialize)]
pub struct EncodeRequest {
    pub report: Value,
}

/// Encode response
#[derive(Serialize)]
pub struct EncodeResponse {
    pub token: String,
}

/// POST /api/v1/report/encode - Encode a report
pub async fn encode_report(Json(req): Json<EncodeRequest>) -> impl IntoResponse {
    let Some(report) = report::decode_safe(&req.report) else {
        return Json(ApiResponse::<EncodeResponse>::err(
            "report: not a valid report document",
        ));
    };
    match report::encode(&report) {
        Ok(token) => Json(ApiResponse::ok(EncodeResponse { token })),
        Err(e) => Json(ApiResponse::err(e.to_string())),
    }
}

/// Decode request
#[derive(Deserialize)]
pub struct DecodeRequest {
    pub token: String,
}

/// POST /api/v1/report/decode - Decode a token
pub async fn decode_report(Json(req): Json<DecodeRequest>) -> impl IntoResponse {
    match report::decode(&req.token) {
        Ok(report) => Json(ApiResponse::ok(report)),
        Err(e) => Json(ApiResponse::<ReportData>::err(e.to_string())),
    }
}

/// Store response
#[derive(Serialize)]
pub struct StoreResponse {
    pub id: String,
}

/// POST /api/v1/report/store - Store a report under a short id
pub async fn store_report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EncodeRequest>,
) -> impl IntoResponse {
    let Some(report) = report::decode_safe(&req.report) else {
        return Json(ApiResponse::<StoreResponse>::err(
            "report: not a valid report document",
        ));
    };
    match state.store.store(&report) {
        Ok(id) => Json(ApiResponse::ok(StoreResponse { id })),
        Err(e) => Json(ApiResponse::err(e.to_string())),
    }
}

/// GET /api/v1/report/{id} - Retrieve a stored report
pub async fn retrieve_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.retrieve(&id) {
        Some(report) => Json(ApiResponse::ok(report)),
        None => Json(ApiResponse::<ReportData>::err(format!(
            "no report stored under id '{id}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== ApiResponse Tests ====================

    #[test]
    fn test_api_response_ok_creates_success_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test data".to_string());

        assert!(response.success);
        assert_eq!(response.data, Some("test data".to_string()));
        assert!(response.error.is_none());
        // Verify UUID format (8-4-4-4-12)
        assert_eq!(response.request_id.len(), 36);
    }

    #[test]
    fn test_api_response_err_creates_error_response() {
        let response: ApiResponse<String> = ApiResponse::err("Something went wrong");

        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error, Some("Something went wrong".to_string()));
    }

    #[test]
    fn test_api_response_request_id_is_unique() {
        let response1: ApiResponse<String> = ApiResponse::ok("test1".to_string());
        let response2: ApiResponse<String> = ApiResponse::ok("test2".to_string());

        assert_ne!(response1.request_id, response2.request_id);
    }

    #[test]
    fn test_api_response_serializes_without_none_fields() {
        let response: ApiResponse<String> = ApiResponse::ok("data".to_string());
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("\"error\""));
        assert!(json.contains("\"success\":true"));
    }

    // ==================== Request Deserialization Tests ====================

    #[test]
    fn test_calculate_request_deserialize() {
        let req: CalculateRequest = serde_json::from_value(json!({
            "variable_costs": [],
            "fixed_costs": [],
            "customers": 100,
            "price": 29
        }))
        .unwrap();

        assert_eq!(req.customers, json!(100));
        assert_eq!(req.price, json!(29));
        assert!(req.currency.is_null());
    }

    #[test]
    fn test_break_even_request_deserialize() {
        let req: BreakEvenRequest = serde_json::from_value(json!({
            "fixed_total": 75,
            "price": 29,
            "variable_cost_per_customer": 3.2
        }))
        .unwrap();

        assert_eq!(req.fixed_total, json!(75));
    }

    #[test]
    fn test_investor_request_defaults() {
        let req: InvestorRequest = serde_json::from_value(json!({
            "mrr": 5000,
            "paid_customers": 100,
            "arpu": 50,
            "gross_margin": 86.4
        }))
        .unwrap();

        assert_eq!(req.break_even_customers, None);
        assert_eq!(req.monthly_growth_rate, 0.1);
        assert_eq!(req.ltv, 0.0);
    }

    // ==================== Handler Logic Tests ====================

    #[tokio::test]
    async fn test_health_handler() {
        let response = health().await;
        // IntoResponse conversion succeeding is the contract here.
        let _ = response.into_response();
    }

    #[tokio::test]
    async fn test_calculate_handler_happy_path() {
        let req: CalculateRequest = serde_json::from_value(json!({
            "variable_costs": [
                {"id": "v1", "name": "Tokens", "unit": "1k", "costPerUnit": 0.03, "usagePerCustomer": 100}
            ],
            "fixed_costs": [
                {"id": "f1", "name": "Hosting", "monthlyCost": 75}
            ],
            "customers": 100,
            "price": 29
        }))
        .unwrap();

        let response = calculate(Json(req)).await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[tokio::test]
    async fn test_break_even_handler_unreachable() {
        let req: BreakEvenRequest = serde_json::from_value(json!({
            "fixed_total": 1000,
            "price": 10,
            "variable_cost_per_customer": 15
        }))
        .unwrap();

        let response = break_even(Json(req)).await.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
