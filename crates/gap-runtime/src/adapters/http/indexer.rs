//! Read indexer over HTTP.
//!
//! Applications arrive with the program reference in any of its legacy
//! shapes; it is decoded into a canonical `ProgramId` here and nowhere else.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gap_01_application_review::{ApplicationStatus, FundingApplication, StatusHistoryEntry};
use serde::Deserialize;
use serde_json::Value;
use shared_types::{Address, AttestationUid, ChainId, ProgramId, ReadError};
use tracing::warn;

use super::api::ApiClient;
use crate::config::IndexerConfig;
use crate::model::Project;
use crate::ports::IndexerReader;

/// Indexer client.
pub struct HttpIndexer {
    api: ApiClient,
}

impl HttpIndexer {
    pub fn new(config: &IndexerConfig) -> Self {
        Self {
            api: ApiClient::new(config.url.clone(), None, config.timeout),
        }
    }
}

#[async_trait]
impl IndexerReader for HttpIndexer {
    async fn project(&self, reference: &str) -> Result<Project, ReadError> {
        let value = self
            .api
            .get_json(&format!("/projects/{}", reference), &[])
            .await?;
        serde_json::from_value(value).map_err(|e| ReadError::Decode(e.to_string()))
    }

    async fn application(&self, reference: &str) -> Result<FundingApplication, ReadError> {
        let value = self
            .api
            .get_json(&format!("/v2/funding-applications/{}", reference), &[])
            .await?;
        decode_application(value)
    }

    async fn is_community_admin(
        &self,
        community: &AttestationUid,
        actor: &Address,
    ) -> Result<bool, ReadError> {
        let value = self
            .api
            .get_json(&format!("/communities/{}/admins", community), &[])
            .await?;
        Ok(decode_admins(&value).contains(actor))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationRecord {
    reference_number: String,
    program_id: Value,
    #[serde(default, alias = "chainID")]
    chain_id: Option<ChainId>,
    #[serde(alias = "applicantAddress")]
    owner_address: Address,
    status: String,
    #[serde(default)]
    status_history: Vec<HistoryRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryRecord {
    status: String,
    #[serde(default, alias = "reason")]
    note: Option<String>,
    #[serde(alias = "timestamp")]
    updated_at: DateTime<Utc>,
}

/// Decode an application record into the domain type.
fn decode_application(value: Value) -> Result<FundingApplication, ReadError> {
    let record: ApplicationRecord =
        serde_json::from_value(value).map_err(|e| ReadError::Decode(e.to_string()))?;

    let (program_id, suffix_chain) =
        ProgramId::decode(&record.program_id).map_err(|e| ReadError::Decode(e.to_string()))?;
    let chain_id = record.chain_id.or(suffix_chain).ok_or_else(|| {
        ReadError::Decode(format!(
            "application {} has no chain id",
            record.reference_number
        ))
    })?;
    let status = record
        .status
        .parse::<ApplicationStatus>()
        .map_err(|e| ReadError::Decode(e.to_string()))?;

    let history = record
        .status_history
        .into_iter()
        .filter_map(|entry| match entry.status.parse::<ApplicationStatus>() {
            Ok(status) => Some(StatusHistoryEntry {
                status,
                note: entry.note,
                changed_at: entry.updated_at,
            }),
            Err(e) => {
                warn!(
                    "[gap-runtime] Skipping history entry of {}: {}",
                    record.reference_number, e
                );
                None
            }
        })
        .collect();

    Ok(FundingApplication::from_parts(
        record.reference_number,
        program_id,
        chain_id,
        record.owner_address,
        status,
        history,
    ))
}

/// Admin addresses from `[{"user": {"id": "0x…"}}]`, `[{"address": "0x…"}]`
/// or `["0x…"]`, optionally wrapped in `{"admins": …}`.
fn decode_admins(value: &Value) -> Vec<Address> {
    let list = value.get("admins").unwrap_or(value);
    let Some(items) = list.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let raw = item
                .as_str()
                .or_else(|| item.get("address").and_then(Value::as_str))
                .or_else(|| item.pointer("/user/id").and_then(Value::as_str))?;
            Address::from_hex(raw).ok()
        })
        .collect()
}
