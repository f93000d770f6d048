//! HTTP handler functions for the outbreak map API.

use actix_web::{HttpResponse, http::StatusCode, web};
use outbreak_map_server_models::{
    ApiError, ApiErrorCode, ApiHealth, CompareQueryParams, RouteQueryParams, SpreadQueryParams,
};
use outbreak_map_spread::{DEFAULT_WINDOW_DAYS, SpreadError, validate_window};

use crate::AppState;

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    let registry = state.service.registry();
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        city: registry.city().to_string(),
        districts: registry.len(),
    })
}

/// `GET /api/spread/analyze`
///
/// Full spread analysis of one disease.
pub async fn analyze(
    state: web::Data<AppState>,
    params: web::Query<SpreadQueryParams>,
) -> HttpResponse {
    let (disease, days) = match spread_params(&params) {
        Ok(parsed) => parsed,
        Err(e) => return error_response(&e),
    };

    match state.service.analyze(disease, days).await {
        Ok(analysis) => HttpResponse::Ok().json(analysis),
        Err(e) => spread_error_response(&e),
    }
}

/// `GET /api/spread/districts/{district}`
///
/// Prediction for a single district.
pub async fn district_prediction(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<SpreadQueryParams>,
) -> HttpResponse {
    let (disease, days) = match spread_params(&params) {
        Ok(parsed) => parsed,
        Err(e) => return error_response(&e),
    };

    match state
        .service
        .district_prediction(&path, disease, days)
        .await
    {
        Ok(prediction) => HttpResponse::Ok().json(prediction),
        Err(e) => spread_error_response(&e),
    }
}

/// `GET /api/spread/compare`
///
/// Side-by-side analysis of a comma-separated disease list.
pub async fn compare(
    state: web::Data<AppState>,
    params: web::Query<CompareQueryParams>,
) -> HttpResponse {
    let diseases = params.disease_list();
    if diseases.is_empty() {
        return error_response(&missing("diseases"));
    }
    let days = match parse_days(params.days.as_deref()) {
        Ok(days) => days,
        Err(e) => return error_response(&e),
    };

    match state.service.compare(diseases.as_slice(), days).await {
        Ok(comparison) => HttpResponse::Ok().json(comparison),
        Err(e) => spread_error_response(&e),
    }
}

/// `GET /api/spread/density`
///
/// Population density of every district with its baseline risk.
pub async fn density(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.service.density_overview())
}

/// `GET /api/spread/routes`
///
/// Propagation routes of one disease, optionally from a single origin.
pub async fn routes(
    state: web::Data<AppState>,
    params: web::Query<RouteQueryParams>,
) -> HttpResponse {
    let Some(disease) = required(params.disease.as_deref()) else {
        return error_response(&missing("disease"));
    };
    let days = match parse_days(params.days.as_deref()) {
        Ok(days) => days,
        Err(e) => return error_response(&e),
    };

    match state
        .service
        .route_report(disease, params.origin.as_deref(), days)
        .await
    {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => spread_error_response(&e),
    }
}

fn spread_params(params: &SpreadQueryParams) -> Result<(&str, i64), ApiError> {
    let disease = required(params.disease.as_deref()).ok_or_else(|| missing("disease"))?;
    let days = parse_days(params.days.as_deref())?;
    Ok((disease, days))
}

fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn missing(name: &str) -> ApiError {
    ApiError::new(
        ApiErrorCode::MissingParameter,
        format!("Parameter '{name}' is required"),
    )
}

/// Parses the `days` parameter, defaulting to 30 when absent.
fn parse_days(raw: Option<&str>) -> Result<i64, ApiError> {
    let Some(raw) = required(raw) else {
        return Ok(i64::from(DEFAULT_WINDOW_DAYS));
    };

    let invalid = || {
        ApiError::new(
            ApiErrorCode::InvalidParameter,
            "Parameter 'days' must be an integer between 7 and 365",
        )
        .with_details(format!("got '{raw}'"))
    };

    let days: i64 = raw.parse().map_err(|_| invalid())?;
    validate_window(days).map_err(|_| invalid())?;
    Ok(days)
}

fn spread_error_response(e: &SpreadError) -> HttpResponse {
    let body = match e {
        SpreadError::NoData { .. } => ApiError::new(ApiErrorCode::NoData, e.to_string()),
        SpreadError::InvalidWindow { .. } => {
            ApiError::new(ApiErrorCode::InvalidParameter, e.to_string())
        }
        SpreadError::NoPrediction { .. } => ApiError::new(ApiErrorCode::NotFound, e.to_string()),
        SpreadError::InsufficientDiseases { .. } => {
            ApiError::new(ApiErrorCode::InsufficientData, e.to_string())
        }
        SpreadError::Source(source) => {
            log::error!("Case source failed: {source}");
            ApiError::new(ApiErrorCode::AnalysisError, "Failed to load case records")
                .with_details(source.to_string())
        }
    };

    error_response(&body)
}

fn error_response(body: &ApiError) -> HttpResponse {
    let status =
        StatusCode::from_u16(body.code.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(body)
}
