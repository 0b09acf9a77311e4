//! HTTP route handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

use crate::domain::{ServiceTime, StopId};
use crate::planner::{IsochroneQuery, JourneyQuery, PlannerError, TravelTimesQuery};

use super::dto::{
    ErrorResponse, IsochroneRequest, IsochroneResponse, JourneyRequest, PathResult,
    TravelTimeResult, TravelTimesRequest, TravelTimesResponse,
};
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/journey", post(plan_journey))
        .route("/api/isochrone", post(isochrone))
        .route("/api/traveltimes", post(travel_times))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Error mapped onto an HTTP response.
#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<PlannerError> for AppError {
    fn from(err: PlannerError) -> Self {
        match err {
            PlannerError::InvalidQuery(message) => AppError::BadRequest(message),
            // A back-trace overflow is an engine invariant violation, not a
            // client mistake.
            PlannerError::Backtrace(err) => AppError::Internal(err.to_string()),
        }
    }
}

fn parse_time(s: &str, field: &str) -> Result<ServiceTime, AppError> {
    ServiceTime::parse(s).map_err(|err| AppError::BadRequest(format!("{field}: {err}")))
}

fn stop_ids(raw: &[u32]) -> Vec<StopId> {
    raw.iter().copied().map(StopId::new).collect()
}

/// Plan the earliest-arrival journey. Unreachable targets yield an empty
/// path, not an error.
async fn plan_journey(
    State(state): State<AppState>,
    Json(req): Json<JourneyRequest>,
) -> Result<Json<PathResult>, AppError> {
    let query = JourneyQuery {
        origins: stop_ids(&req.origins),
        targets: stop_ids(&req.targets),
        start_time: parse_time(&req.start_time, "start_time")?,
        end_time: parse_time(&req.end_time, "end_time")?,
        objective: req.objective,
    };

    let path = state.planner().earliest_arrival(&query)?;
    Ok(Json(PathResult::from_path(&path)))
}

/// Compute the isochrone frontier with a journey per frontier stop.
async fn isochrone(
    State(state): State<AppState>,
    Json(req): Json<IsochroneRequest>,
) -> Result<Json<IsochroneResponse>, AppError> {
    let query = IsochroneQuery {
        origins: stop_ids(&req.origins),
        start_time: parse_time(&req.start_time, "start_time")?,
        end_time: parse_time(&req.end_time, "end_time")?,
        objective: req.objective,
    };

    let paths = state.planner().isochrone(&query)?;
    Ok(Json(IsochroneResponse {
        paths: paths.iter().map(PathResult::from_path).collect(),
    }))
}

/// Compute one-to-all travel times.
async fn travel_times(
    State(state): State<AppState>,
    Json(req): Json<TravelTimesRequest>,
) -> Result<Json<TravelTimesResponse>, AppError> {
    let query = TravelTimesQuery {
        origins: stop_ids(&req.origins),
        earliest_departure: parse_time(&req.earliest_departure, "earliest_departure")?,
        latest_departure: parse_time(&req.latest_departure, "latest_departure")?,
        max_traveltime_secs: req.max_traveltime_secs,
        objective: req.objective,
    };

    let rows = state.planner().travel_times(&query)?;
    Ok(Json(TravelTimesResponse {
        rows: rows
            .iter()
            .map(|row| row.as_ref().map(TravelTimeResult::from_travel_time))
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Objective;
    use crate::planner::PlannerConfig;
    use crate::web::state::Dataset;

    fn test_state() -> AppState {
        let dataset = Dataset::from_json(
            r#"{
                "n_stops": 5,
                "connections": [
                    { "from": 1, "to": 2, "departs": 3600, "arrives": 4200, "trip": 10 },
                    { "from": 3, "to": 4, "departs": 4500, "arrives": 5100, "trip": 11 }
                ],
                "transfers": [
                    { "from": 2, "to": 3, "walk_secs": 60 }
                ]
            }"#,
        )
        .unwrap();
        AppState::new(dataset, PlannerConfig::default())
    }

    #[tokio::test]
    async fn journey_endpoint_returns_the_path() {
        let req = JourneyRequest {
            origins: vec![1],
            targets: vec![4],
            start_time: "00:00:00".into(),
            end_time: "23:59:59".into(),
            objective: Objective::MinDuration,
        };

        let Json(path) = plan_journey(State(test_state()), Json(req)).await.unwrap();

        assert_eq!(path.stops, vec![1, 2, 3, 4]);
        assert_eq!(path.times, vec!["01:00:00", "01:10:00", "01:11:00", "01:25:00"]);
        assert_eq!(path.trips, vec![Some(10), Some(10), None, Some(11)]);
    }

    #[tokio::test]
    async fn unreachable_target_yields_empty_arrays() {
        let req = JourneyRequest {
            origins: vec![4],
            targets: vec![1],
            start_time: "00:00:00".into(),
            end_time: "23:59:59".into(),
            objective: Objective::MinDuration,
        };

        let Json(path) = plan_journey(State(test_state()), Json(req)).await.unwrap();
        assert!(path.stops.is_empty());
    }

    #[tokio::test]
    async fn malformed_time_is_a_bad_request() {
        let req = JourneyRequest {
            origins: vec![1],
            targets: vec![4],
            start_time: "whenever".into(),
            end_time: "23:59:59".into(),
            objective: Objective::MinDuration,
        };

        let err = plan_journey(State(test_state()), Json(req)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn out_of_range_stop_is_a_bad_request() {
        let req = TravelTimesRequest {
            origins: vec![99],
            earliest_departure: "00:00".into(),
            latest_departure: "12:00".into(),
            max_traveltime_secs: None,
            objective: Objective::MinDuration,
        };

        let err = travel_times(State(test_state()), Json(req)).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn traveltimes_endpoint_marks_unreached_rows() {
        let req = TravelTimesRequest {
            origins: vec![1],
            earliest_departure: "00:00".into(),
            latest_departure: "02:00".into(),
            max_traveltime_secs: None,
            objective: Objective::MinDuration,
        };

        let Json(response) = travel_times(State(test_state()), Json(req)).await.unwrap();

        assert_eq!(response.rows.len(), 5);
        assert!(response.rows[0].is_none());
        assert!(response.rows[2].is_some());
        assert!(response.rows[4].is_some());
    }
}
