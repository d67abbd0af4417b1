//! Funding-platform backend: status changes, reviewer permissions and
//! off-chain revocation.

use async_trait::async_trait;
use gap_01_application_review::{ApplicationStatus, ApplicationStatusGateway, PermissionChecker};
use gap_03_revoke::{OffChainRevoker, RevokeTarget};
use reqwest::Method;
use serde_json::{json, Value};
use shared_types::{Address, ChainId, ProgramId, ReadError, WriteError};

use super::api::ApiClient;

/// `PUT /v2/funding-applications/{ref}/status`.
pub struct HttpApplicationStatusGateway {
    api: ApiClient,
}

impl HttpApplicationStatusGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

fn status_body(status: ApplicationStatus, note: Option<&str>) -> Value {
    json!({
        "status": status.as_str(),
        "reason": note.unwrap_or_default(),
    })
}

#[async_trait]
impl ApplicationStatusGateway for HttpApplicationStatusGateway {
    async fn update_status(
        &self,
        reference: &str,
        status: ApplicationStatus,
        note: Option<&str>,
    ) -> Result<(), WriteError> {
        self.api
            .send_json(
                Method::PUT,
                &format!("/v2/funding-applications/{}/status", reference),
                &status_body(status, note),
            )
            .await
    }
}

/// `GET /v2/programs/{id}/permissions?chainId=&address=`.
pub struct HttpPermissionChecker {
    api: ApiClient,
}

impl HttpPermissionChecker {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

/// `{"hasPermission": true}`, or `{"permissions": [...]}` containing a
/// write-level role.
fn decode_permission(value: &Value) -> Result<bool, ReadError> {
    if let Some(flag) = value.get("hasPermission").and_then(Value::as_bool) {
        return Ok(flag);
    }
    if let Some(roles) = value.get("permissions").and_then(Value::as_array) {
        return Ok(roles.iter().filter_map(Value::as_str).any(|role| {
            matches!(role.to_lowercase().as_str(), "admin" | "reviewer" | "write")
        }));
    }
    Err(ReadError::Decode(format!("unexpected permission response: {}", value)))
}

#[async_trait]
impl PermissionChecker for HttpPermissionChecker {
    async fn can_write_program(
        &self,
        program: &ProgramId,
        chain: ChainId,
        actor: &Address,
    ) -> Result<bool, ReadError> {
        let value = self
            .api
            .get_json(
                &format!("/v2/programs/{}/permissions", program),
                &[("chainId", chain.to_string()), ("address", actor.to_hex())],
            )
            .await?;
        decode_permission(&value)
    }
}

/// `POST /attestations/revoke-offchain`.
pub struct HttpOffChainRevoker {
    api: ApiClient,
}

impl HttpOffChainRevoker {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

fn revoke_body(target: &RevokeTarget) -> Value {
    json!({
        "uid": target.uid.to_hex(),
        "chainId": target.chain_id.0,
        "type": target.kind.as_str(),
    })
}

#[async_trait]
impl OffChainRevoker for HttpOffChainRevoker {
    async fn revoke(&self, target: &RevokeTarget) -> Result<(), WriteError> {
        self.api
            .send_json(Method::POST, "/attestations/revoke-offchain", &revoke_body(target))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{AttestationUid, EntityKind};

    #[test]
    fn test_status_body() {
        let body = status_body(ApplicationStatus::RevisionRequested, Some("add budget"));
        assert_eq!(body["status"], "revision_requested");
        assert_eq!(body["reason"], "add budget");
        assert_eq!(status_body(ApplicationStatus::Approved, None)["reason"], "");
    }

    #[test]
    fn test_decode_permission_shapes() {
        assert_eq!(decode_permission(&json!({"hasPermission": true})), Ok(true));
        assert_eq!(decode_permission(&json!({"hasPermission": false})), Ok(false));
        assert_eq!(
            decode_permission(&json!({"permissions": ["read", "Reviewer"]})),
            Ok(true)
        );
        assert_eq!(decode_permission(&json!({"permissions": ["read"]})), Ok(false));
        assert!(decode_permission(&json!({"ok": 1})).is_err());
    }

    #[test]
    fn test_revoke_body() {
        let target = RevokeTarget {
            uid: AttestationUid::from_hex(&"0c".repeat(32)).unwrap(),
            chain_id: ChainId::CELO,
            kind: EntityKind::ProjectObjective,
            attester: None,
        };
        let body = revoke_body(&target);
        assert_eq!(body["chainId"], 42220);
        assert_eq!(body["type"], "project_objective");
        assert_eq!(body["uid"], format!("0x{}", "0c".repeat(32)));
    }
}
