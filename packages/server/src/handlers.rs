//! HTTP handler functions for the street trees API.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use street_trees_census::CensusError;
use street_trees_census::features::to_feature_collection;
use street_trees_census_models::CensusQuery;
use street_trees_scenario::ScenarioError;
use street_trees_scenario_models::Horizon;
use street_trees_scenario_models::payload::TreePayload;
use street_trees_server_models::{
    ApiError, ApiHealth, ExistingTreesQueryParams, OkResponse, ProjectionQueryParams,
    RemovedCensusTreeResponse, ScenarioResponse, SpeciesListResponse, TreeResponse,
};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/species`
///
/// Returns every species in catalog order.
pub async fn species(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(SpeciesListResponse {
        species: state.catalog.list_all().to_vec(),
    })
}

/// `GET /api/existing-trees`
///
/// Proxies a bounding-box query to the tree census and returns the
/// visible trees as a `GeoJSON` `FeatureCollection`.
pub async fn existing_trees(
    state: web::Data<AppState>,
    params: web::Query<ExistingTreesQueryParams>,
) -> HttpResponse {
    let query = CensusQuery::from(&*params);

    match state.census.fetch_trees(&query).await {
        Ok(rows) => HttpResponse::Ok().json(to_feature_collection(
            state.census.id(),
            rows,
            &state.hidden_census_trees,
        )),
        Err(e) => census_error_response(&e),
    }
}

/// `POST /api/existing-trees/{tree_id}/remove`
///
/// Hides a census tree from subsequent existing-tree responses.
pub async fn remove_existing_tree(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    let tree_id = path.into_inner();
    state.hidden_census_trees.hide(&tree_id);
    HttpResponse::Ok().json(RemovedCensusTreeResponse {
        ok: true,
        removed_tree_id: tree_id,
    })
}

/// `GET /api/scenario`
pub async fn scenario(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ScenarioResponse {
        scenario_id: state.scenario.scenario_id().to_string(),
        created_at: state.scenario.created_at(),
        planted_trees: state.scenario.get_all(),
    })
}

/// `POST /api/scenario/trees`
pub async fn add_tree(
    state: web::Data<AppState>,
    payload: web::Json<TreePayload>,
) -> HttpResponse {
    match state.scenario.add_payload(&payload) {
        Ok(tree) => HttpResponse::Ok().json(TreeResponse { ok: true, tree }),
        Err(e) => scenario_error_response(&e),
    }
}

/// `PATCH /api/scenario/trees/{tree_id}`
pub async fn update_tree(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<TreePayload>,
) -> HttpResponse {
    match state.scenario.update_payload(&path, &payload) {
        Ok(tree) => HttpResponse::Ok().json(TreeResponse { ok: true, tree }),
        Err(e) => scenario_error_response(&e),
    }
}

/// `DELETE /api/scenario/trees/{tree_id}`
///
/// Succeeds whether or not the tree exists.
pub async fn delete_tree(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    state.scenario.remove(&path);
    HttpResponse::Ok().json(OkResponse { ok: true })
}

/// `GET /api/scenario/projection`
///
/// Projects the scenario `horizon` years ahead (default 10).
pub async fn projection(
    state: web::Data<AppState>,
    params: web::Query<ProjectionQueryParams>,
) -> HttpResponse {
    let result = parse_horizon(params.horizon.as_deref())
        .and_then(|horizon| state.scenario.project(horizon));

    match result {
        Ok(projection) => HttpResponse::Ok().json(projection),
        Err(e) => scenario_error_response(&e),
    }
}

fn parse_horizon(raw: Option<&str>) -> Result<Horizon, ScenarioError> {
    let Some(raw) = raw else {
        return Ok(Horizon::default());
    };
    let years = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| ScenarioError::InvalidArgument {
            field: "horizon".to_string(),
            message: format!("horizon {raw:?} is not an integer"),
        })?;
    Ok(Horizon::from_years(years)?)
}

fn error_body(status: StatusCode, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ApiError { error: message })
}

fn scenario_error_response(e: &ScenarioError) -> HttpResponse {
    let status = match e {
        ScenarioError::NotFound { .. } => StatusCode::NOT_FOUND,
        ScenarioError::InvalidSpecies { .. }
        | ScenarioError::InvalidArgument { .. }
        | ScenarioError::ValidationFailure { .. } => StatusCode::BAD_REQUEST,
        ScenarioError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    log::debug!("Rejected scenario request ({status}): {e}");
    error_body(status, e.to_string())
}

fn census_error_response(e: &CensusError) -> HttpResponse {
    let status = match e {
        CensusError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
        CensusError::Upstream { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        CensusError::Http(_) | CensusError::Json(_) => StatusCode::BAD_GATEWAY,
    };
    log::error!("Failed to query tree census: {e}");
    error_body(status, e.to_string())
}
