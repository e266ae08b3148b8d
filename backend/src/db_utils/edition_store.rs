//! Loading editions, the system of record behind search hits.

use std::collections::HashMap;

use async_trait::async_trait;
use clickhouse::Row;
use common::search_result::Identified;
use serde::{Deserialize, Serialize};

use crate::config::ClickhouseConfig;
use crate::db_utils::clickhouse_utils::get_clickhouse_client;


/// Related records that can be loaded alongside editions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Association {
    Document,
    Organisations,
    Attachments,
    /// Attachments of the consultation response attached to an edition.
    ResponseAttachments,
}

/// Associations to prefetch with a batch of editions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EagerLoad(Vec<Association>);

impl EagerLoad {
    pub fn new(associations: impl IntoIterator<Item = Association>) -> Self {
        let mut list = Vec::new();
        for association in associations {
            if !list.contains(&association) {
                list.push(association);
            }
        }
        Self(list)
    }

    pub fn includes(&self, association: Association) -> bool {
        self.0.contains(&association)
    }

    pub fn associations(&self) -> &[Association] {
        &self.0
    }
}


#[async_trait]
pub trait RecordStore: Send + Sync {
    type Record: Identified + Send;

    /// Fetches every record whose id is in `ids`, in no particular order.
    /// Ids without a record are simply absent from the result.
    async fn fetch_by_ids(&self, ids: &[u64], eager_load: &EagerLoad) -> anyhow::Result<Vec<Self::Record>>;
}


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edition {
    pub id: u64,
    pub document_id: u64,
    pub edition_type: String,
    pub title: String,
    pub summary: String,
    pub state: String,
    pub public_timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentRecord>,
    pub organisations: Vec<OrganisationRecord>,
    pub attachments: Vec<AttachmentRecord>,
    pub response_attachments: Vec<AttachmentRecord>,
}

impl Identified for Edition {
    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Row)]
pub struct EditionRow {
    pub id: u64,
    pub document_id: u64,
    pub edition_type: String,
    pub title: String,
    pub summary: String,
    pub state: String,
    pub public_timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Row)]
pub struct DocumentRecord {
    pub id: u64,
    pub slug: String,
    pub document_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganisationRecord {
    pub id: u64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Row)]
pub struct EditionOrganisationRow {
    pub edition_id: u64,
    pub id: u64,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentRecord {
    pub id: u64,
    pub title: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Row)]
pub struct AttachmentRow {
    pub owner_id: u64,
    pub id: u64,
    pub title: String,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Row)]
pub struct ResponseRow {
    pub id: u64,
    pub edition_id: u64,
}


/// Rows loaded for one batch of editions, before being stitched together.
#[derive(Debug, Default)]
pub struct EditionBatch {
    pub editions: Vec<EditionRow>,
    pub documents: Vec<DocumentRecord>,
    pub organisations: Vec<EditionOrganisationRow>,
    pub attachments: Vec<AttachmentRow>,
    pub responses: Vec<ResponseRow>,
    pub response_attachments: Vec<AttachmentRow>,
}

impl EditionBatch {
    pub fn assemble(self) -> Vec<Edition> {
        let documents: HashMap<u64, DocumentRecord> = self.documents.into_iter().map(|d| (d.id, d)).collect();

        let mut organisations: HashMap<u64, Vec<OrganisationRecord>> = HashMap::new();
        for row in self.organisations {
            organisations.entry(row.edition_id).or_default().push(OrganisationRecord {
                id: row.id,
                name: row.name,
                slug: row.slug,
            });
        }

        let mut attachments = group_attachments(self.attachments);

        let response_owner: HashMap<u64, u64> = self.responses.into_iter().map(|r| (r.id, r.edition_id)).collect();
        let mut response_attachments: HashMap<u64, Vec<AttachmentRecord>> = HashMap::new();
        for (response_id, list) in group_attachments(self.response_attachments) {
            if let Some(edition_id) = response_owner.get(&response_id) {
                response_attachments.entry(*edition_id).or_default().extend(list);
            }
        }

        self.editions
            .into_iter()
            .map(|row| Edition {
                document: documents.get(&row.document_id).cloned(),
                organisations: organisations.remove(&row.id).unwrap_or_default(),
                attachments: attachments.remove(&row.id).unwrap_or_default(),
                response_attachments: response_attachments.remove(&row.id).unwrap_or_default(),
                id: row.id,
                document_id: row.document_id,
                edition_type: row.edition_type,
                title: row.title,
                summary: row.summary,
                state: row.state,
                public_timestamp: row.public_timestamp,
            })
            .collect()
    }
}

fn group_attachments(rows: Vec<AttachmentRow>) -> HashMap<u64, Vec<AttachmentRecord>> {
    let mut grouped: HashMap<u64, Vec<AttachmentRecord>> = HashMap::new();
    for row in rows {
        grouped.entry(row.owner_id).or_default().push(AttachmentRecord {
            id: row.id,
            title: row.title,
            filename: row.filename,
        });
    }
    grouped
}


pub struct ClickhouseEditionStore {
    client: clickhouse::Client,
}

impl ClickhouseEditionStore {
    pub fn new(config: &ClickhouseConfig) -> Self {
        Self { client: get_clickhouse_client(config) }
    }

    async fn fetch_attachments(&self, attachable_type: &str, owner_ids: Vec<u64>) -> anyhow::Result<Vec<AttachmentRow>> {
        if owner_ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = "
        SELECT attachable_id AS owner_id, id, title, filename
        FROM attachments
        WHERE attachable_type = ?
        AND attachable_id IN ?
        ORDER BY ordering
        ";
        let rows = self.client.query(sql).bind(attachable_type).bind(owner_ids).fetch_all::<AttachmentRow>().await?;
        Ok(rows)
    }
}

#[async_trait]
impl RecordStore for ClickhouseEditionStore {
    type Record = Edition;

    async fn fetch_by_ids(&self, ids: &[u64], eager_load: &EagerLoad) -> anyhow::Result<Vec<Edition>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let sql = "
        SELECT id, document_id, type AS edition_type, title, summary, state,
            toString(public_timestamp) AS public_timestamp
        FROM editions
        WHERE id IN ?
        ";
        let editions = self.client.query(sql).bind(ids.to_vec()).fetch_all::<EditionRow>().await?;
        let edition_ids = editions.iter().map(|e| e.id).collect::<Vec<_>>();
        let mut batch = EditionBatch { editions, ..Default::default() };

        if eager_load.includes(Association::Document) && !edition_ids.is_empty() {
            let document_ids = batch.editions.iter().map(|e| e.document_id).collect::<Vec<_>>();
            let sql = "SELECT id, slug, document_type FROM documents WHERE id IN ?";
            batch.documents = self.client.query(sql).bind(document_ids).fetch_all::<DocumentRecord>().await?;
        }

        if eager_load.includes(Association::Organisations) && !edition_ids.is_empty() {
            let sql = "
            SELECT eo.edition_id AS edition_id, o.id AS id, o.name AS name, o.slug AS slug
            FROM edition_organisations AS eo
            INNER JOIN organisations AS o ON o.id = eo.organisation_id
            WHERE eo.edition_id IN ?
            ORDER BY eo.lead DESC, eo.lead_ordering, o.name
            ";
            batch.organisations = self
                .client
                .query(sql)
                .bind(edition_ids.clone())
                .fetch_all::<EditionOrganisationRow>()
                .await?;
        }

        if eager_load.includes(Association::Attachments) {
            batch.attachments = self.fetch_attachments("Edition", edition_ids.clone()).await?;
        }

        if eager_load.includes(Association::ResponseAttachments) && !edition_ids.is_empty() {
            let sql = "SELECT id, edition_id FROM responses WHERE edition_id IN ?";
            batch.responses = self.client.query(sql).bind(edition_ids.clone()).fetch_all::<ResponseRow>().await?;
            let response_ids = batch.responses.iter().map(|r| r.id).collect::<Vec<_>>();
            batch.response_attachments = self.fetch_attachments("Response", response_ids).await?;
        }

        tracing::debug!(requested = ids.len(), found = batch.editions.len(), "loaded editions");
        Ok(batch.assemble())
    }
}
