use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use crate::{
    api::error::ApiError,
    controller::AppState,
    domain::{OptimisationRequest, SimulationOutput},
};

/// POST /electricity/hydrogen-production-optimisation
///
/// Plans the electrolyser dispatch for the submitted forecast and returns it
/// next to the renewable-only baseline.
pub async fn optimise_hydrogen_production(
    State(state): State<AppState>,
    payload: Result<Json<OptimisationRequest>, JsonRejection>,
) -> Result<Json<SimulationOutput>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    request.validate()?;

    tracing::info!(
        periods = request.config.periods(),
        forecasts = request.forecasts.len(),
        "optimisation requested"
    );

    let output = state.planner.plan(request).await?;
    Ok(Json(output))
}
