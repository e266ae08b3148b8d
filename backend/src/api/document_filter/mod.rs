//! Document search: criteria in, a page of editions out.

pub mod compose_params;
pub mod format_types;
pub mod materialize;

use common::{
    filter_criteria::{FilterCriteria, SearchType},
    search_result::ResultPage,
};

use crate::config::FilterConfig;
use crate::db_utils::edition_store::{Association, EagerLoad, RecordStore};
use crate::db_utils::search_gateway::SearchGateway;
use compose_params::build_search_parameters;
use materialize::materialize;


/// Associations each kind of search loads alongside its editions.
pub fn eager_load_for(search_type: SearchType) -> EagerLoad {
    let base = [Association::Document, Association::Organisations];
    match search_type {
        SearchType::Publications => {
            EagerLoad::new(base.into_iter().chain([Association::Attachments, Association::ResponseAttachments]))
        }
        SearchType::Announcements | SearchType::Policies => EagerLoad::new(base),
    }
}


/// Runs filtered searches against the search service and loads the hits
/// from the record store. Holds no per-request state.
pub struct DocumentFilter<G, S> {
    gateway: G,
    store: S,
    relevant_to_local_government: bool,
}

impl<G: SearchGateway, S: RecordStore> DocumentFilter<G, S>
where
    S::Record: Clone,
{
    pub fn new(config: &FilterConfig, gateway: G, store: S) -> Self {
        Self { gateway, store, relevant_to_local_government: config.relevant_to_local_government }
    }

    pub async fn announcements_search(&self, criteria: &FilterCriteria) -> anyhow::Result<ResultPage<S::Record>> {
        self.search(SearchType::Announcements, criteria).await
    }

    pub async fn publications_search(&self, criteria: &FilterCriteria) -> anyhow::Result<ResultPage<S::Record>> {
        self.search(SearchType::Publications, criteria).await
    }

    pub async fn policies_search(&self, criteria: &FilterCriteria) -> anyhow::Result<ResultPage<S::Record>> {
        self.search(SearchType::Policies, criteria).await
    }

    pub async fn search(&self, search_type: SearchType, criteria: &FilterCriteria) -> anyhow::Result<ResultPage<S::Record>> {
        let params = build_search_parameters(criteria, search_type, self.relevant_to_local_government);
        tracing::info!(search_type = search_type.as_str(), page = criteria.page, "running document search");
        let results = self.gateway.advanced_search(&params).await?;
        materialize(&self.store, &results, &eager_load_for(search_type), criteria.page, criteria.per_page).await
    }
}
