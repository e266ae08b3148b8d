use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use common::{
    filter_criteria::{FilterCriteria, RawFilterParams, SearchType},
    taggable::TaggableKind,
};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::info;

use crate::api::document_filter::DocumentFilter;
use crate::api::taggable_content::TaggableContent;
use crate::db_utils::edition_store::RecordStore;
use crate::db_utils::search_gateway::SearchGateway;
use crate::db_utils::taggable_source::TaggableSource;


pub struct AppState<G, S, T> {
    pub filter: DocumentFilter<G, S>,
    pub taggable: TaggableContent<T>,
    pub default_per_page: u64,
}

pub fn router<G, S, T>(state: AppState<G, S, T>) -> Router
where
    G: SearchGateway + 'static,
    S: RecordStore + 'static,
    S::Record: Serialize + Clone + Sync + 'static,
    T: TaggableSource + 'static,
{
    Router::new()
        .route("/taggable/{kind}", get(taggable_options::<G, S, T>))
        .route("/{search_type}", get(search_documents::<G, S, T>))
        .with_state(Arc::new(state))
}

pub async fn search_documents<G, S, T>(
    State(state): State<Arc<AppState<G, S, T>>>,
    Path(search_type): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response
where
    G: SearchGateway,
    S: RecordStore,
    S::Record: Serialize + Clone + Sync,
    T: TaggableSource,
{
    let Ok(search_type) = search_type.parse::<SearchType>() else {
        return (StatusCode::NOT_FOUND, Body::from(format!("no such search: {search_type}"))).into_response();
    };
    let criteria = FilterCriteria::from_raw(&RawFilterParams::from_pairs(pairs), state.default_per_page);
    info!("Searching {}: {:?}", search_type.as_str(), criteria);

    match state.filter.search(search_type, &criteria).await {
        Ok(page) => Json(page).into_response(),
        Err(e) => {
            tracing::error!("search_documents: request failed: {:#?}", e);
            (StatusCode::BAD_GATEWAY, Body::from(e.to_string())).into_response()
        }
    }
}

pub async fn taggable_options<G, S, T>(State(state): State<Arc<AppState<G, S, T>>>, Path(kind): Path<String>) -> Response
where
    G: SearchGateway,
    S: RecordStore,
    T: TaggableSource,
{
    let Ok(kind) = kind.parse::<TaggableKind>() else {
        return (StatusCode::NOT_FOUND, Body::from(format!("no such option list: {kind}"))).into_response();
    };
    let options = match kind {
        TaggableKind::Topics => state.taggable.taggable_topics().await,
        TaggableKind::TopicalEvents => state.taggable.taggable_topical_events().await,
        TaggableKind::Organisations => state.taggable.taggable_organisations().await,
        TaggableKind::MinisterialRoleAppointments => state.taggable.taggable_ministerial_role_appointments().await,
    };
    match options {
        Ok(options) => Json(options).into_response(),
        Err(e) => {
            tracing::error!("taggable_options: request failed: {:#?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Body::from(e.to_string())).into_response()
        }
    }
}
