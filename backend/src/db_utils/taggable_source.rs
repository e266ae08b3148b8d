//! Reads the records behind the taggable select options.

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use clickhouse::Row;
use common::taggable::{TaggableKind, TaggableOption};
use serde::{Deserialize, Serialize};

use crate::config::ClickhouseConfig;
use crate::db_utils::clickhouse_utils::get_clickhouse_client;


#[derive(Debug, Clone, PartialEq)]
pub struct RoleAppointment {
    pub id: u64,
    pub person_name: String,
    pub role_name: String,
    pub organisation_names: Vec<String>,
    pub started_at: NaiveDate,
    /// `None` while the appointment is current.
    pub ended_at: Option<NaiveDate>,
}

#[async_trait]
pub trait TaggableSource: Send + Sync {
    /// Unix `updated_at` of every record of `kind`, ordered by id.
    async fn update_timestamps(&self, kind: TaggableKind) -> anyhow::Result<Vec<i64>>;

    /// Name/id options ordered by name. Not used for role appointments.
    async fn named_options(&self, kind: TaggableKind) -> anyhow::Result<Vec<TaggableOption>>;

    /// Ministerial role appointments, past and present, ordered by person.
    async fn ministerial_role_appointments(&self) -> anyhow::Result<Vec<RoleAppointment>>;
}


#[derive(Debug, Clone, Serialize, Deserialize, Row)]
struct NamedRow {
    label: String,
    id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
struct RoleAppointmentRow {
    id: u64,
    person_name: String,
    role_name: String,
    organisation_names: Vec<String>,
    started_at: String,
    /// Nullable in ClickHouse; `None` while the appointment is current.
    ended_at: Option<String>,
}

impl TryFrom<RoleAppointmentRow> for RoleAppointment {
    type Error = anyhow::Error;

    fn try_from(row: RoleAppointmentRow) -> anyhow::Result<Self> {
        let started_at = NaiveDate::parse_from_str(&row.started_at, "%Y-%m-%d")
            .with_context(|| format!("Invalid started_at for role appointment {}: {}", row.id, row.started_at))?;
        let ended_at = match row.ended_at.as_deref() {
            None => None,
            Some(ended_at) => Some(
                NaiveDate::parse_from_str(ended_at, "%Y-%m-%d")
                    .with_context(|| format!("Invalid ended_at for role appointment {}: {}", row.id, ended_at))?,
            ),
        };
        Ok(RoleAppointment {
            id: row.id,
            person_name: row.person_name,
            role_name: row.role_name,
            organisation_names: row.organisation_names,
            started_at,
            ended_at,
        })
    }
}


pub struct ClickhouseTaggableSource {
    client: clickhouse::Client,
}

impl ClickhouseTaggableSource {
    pub fn new(config: &ClickhouseConfig) -> Self {
        Self { client: get_clickhouse_client(config) }
    }
}

const ROLE_APPOINTMENTS_SQL: &str = "
        SELECT ra.id AS id,
            concat(p.forename, ' ', p.surname) AS person_name,
            r.name AS role_name,
            groupArray(o.name) AS organisation_names,
            toString(toDate(ra.started_at)) AS started_at,
            toString(toDate(ra.ended_at)) AS ended_at
        FROM role_appointments AS ra
        INNER JOIN people AS p ON p.id = ra.person_id
        INNER JOIN roles AS r ON r.id = ra.role_id
        LEFT JOIN organisation_roles AS orl ON orl.role_id = r.id
        LEFT JOIN organisations AS o ON o.id = orl.organisation_id
        WHERE r.type = 'MinisterialRole'
        GROUP BY ra.id, p.forename, p.surname, r.name, ra.started_at, ra.ended_at
        ORDER BY p.surname, p.forename
        ";

fn timestamps_sql(kind: TaggableKind) -> &'static str {
    match kind {
        TaggableKind::Topics => {
            "SELECT toInt64(toUnixTimestamp(updated_at)) FROM classifications WHERE type = 'Topic' ORDER BY id"
        }
        TaggableKind::TopicalEvents => {
            "SELECT toInt64(toUnixTimestamp(updated_at)) FROM classifications WHERE type = 'TopicalEvent' ORDER BY id"
        }
        TaggableKind::Organisations => "SELECT toInt64(toUnixTimestamp(updated_at)) FROM organisations ORDER BY id",
        TaggableKind::MinisterialRoleAppointments => {
            "SELECT toInt64(toUnixTimestamp(updated_at)) FROM role_appointments ORDER BY id"
        }
    }
}

#[async_trait]
impl TaggableSource for ClickhouseTaggableSource {
    async fn update_timestamps(&self, kind: TaggableKind) -> anyhow::Result<Vec<i64>> {
        let result = self.client.query(timestamps_sql(kind)).fetch_all::<i64>().await?;
        Ok(result)
    }

    async fn named_options(&self, kind: TaggableKind) -> anyhow::Result<Vec<TaggableOption>> {
        let sql = match kind {
            TaggableKind::Topics => "SELECT name AS label, id FROM classifications WHERE type = 'Topic' ORDER BY name",
            TaggableKind::TopicalEvents => {
                "SELECT name AS label, id FROM classifications WHERE type = 'TopicalEvent' ORDER BY name"
            }
            TaggableKind::Organisations => {
                "SELECT if(acronym = '', name, concat(name, ' (', acronym, ')')) AS label, id FROM organisations ORDER BY name"
            }
            TaggableKind::MinisterialRoleAppointments => {
                anyhow::bail!("role appointments have no plain name options")
            }
        };
        let rows = self.client.query(sql).fetch_all::<NamedRow>().await?;
        Ok(rows.into_iter().map(|row| TaggableOption::new(row.label, row.id)).collect())
    }

    async fn ministerial_role_appointments(&self) -> anyhow::Result<Vec<RoleAppointment>> {
        let rows = self.client.query(ROLE_APPOINTMENTS_SQL).fetch_all::<RoleAppointmentRow>().await?;
        rows.into_iter().map(RoleAppointment::try_from).collect()
    }
}
