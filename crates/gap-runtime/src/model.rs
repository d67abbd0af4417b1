//! # Read Models
//!
//! Aggregate state as served by the read indexer. Everything a flow's
//! visibility predicate inspects lives here.

use chrono::{DateTime, Utc};
use gap_01_application_review::Milestone;
use serde::{Deserialize, Serialize};
use shared_types::{Address, AttestationUid, ChainId};

/// Project member attestation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
    pub uid: AttestationUid,
    pub recipient: Address,
    #[serde(default)]
    pub attester: Option<Address>,
}

/// Free-text update attached to a project or grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub uid: AttestationUid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endorsement {
    pub uid: AttestationUid,
    pub endorser: Address,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Project objective (roadmap item).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub uid: AttestationUid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub attester: Option<Address>,
}

/// Grant completion attestation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantCompletion {
    pub uid: AttestationUid,
    #[serde(default)]
    pub attester: Option<Address>,
    #[serde(default)]
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    pub uid: AttestationUid,
    pub chain_id: ChainId,
    /// Community that funds the grant; its admins verify milestones.
    #[serde(default)]
    pub community_uid: Option<AttestationUid>,
    #[serde(default)]
    pub updates: Vec<Update>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
    #[serde(default)]
    pub completed: Option<GrantCompletion>,
}

impl Grant {
    pub fn milestone(&self, uid: &AttestationUid) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.uid.as_ref() == Some(uid))
    }

    pub fn has_update(&self, uid: &AttestationUid) -> bool {
        self.updates.iter().any(|u| &u.uid == uid)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub uid: AttestationUid,
    pub chain_id: ChainId,
    pub owner: Address,
    #[serde(default)]
    pub admins: Vec<Address>,
    #[serde(default)]
    pub members: Vec<ProjectMember>,
    #[serde(default)]
    pub grants: Vec<Grant>,
    #[serde(default)]
    pub updates: Vec<Update>,
    #[serde(default)]
    pub endorsements: Vec<Endorsement>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

impl Project {
    pub fn is_owner(&self, actor: &Address) -> bool {
        &self.owner == actor
    }

    /// Owner or project admin.
    pub fn can_manage(&self, actor: &Address) -> bool {
        self.is_owner(actor) || self.admins.contains(actor)
    }

    pub fn grant(&self, uid: &AttestationUid) -> Option<&Grant> {
        self.grants.iter().find(|g| &g.uid == uid)
    }

    pub fn member(&self, uid: &AttestationUid) -> Option<&ProjectMember> {
        self.members.iter().find(|m| &m.uid == uid)
    }

    pub fn objective(&self, uid: &AttestationUid) -> Option<&Objective> {
        self.objectives.iter().find(|o| &o.uid == uid)
    }

    pub fn has_update(&self, uid: &AttestationUid) -> bool {
        self.updates.iter().any(|u| &u.uid == uid)
    }

    pub fn has_endorsement(&self, uid: &AttestationUid) -> bool {
        self.endorsements.iter().any(|e| &e.uid == uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uid(byte: u8) -> AttestationUid {
        AttestationUid::from_hex(&format!("{:02x}", byte).repeat(32)).unwrap()
    }

    #[test]
    fn test_project_decodes_with_missing_collections() {
        let project: Project = serde_json::from_value(json!({
            "uid": uid(1).to_hex(),
            "chainId": 10,
            "owner": format!("0x{}", "aa".repeat(20)),
        }))
        .unwrap();
        assert!(project.members.is_empty());
        assert!(project.grants.is_empty());
        assert_eq!(project.chain_id, ChainId::OPTIMISM);
    }

    #[test]
    fn test_grant_milestone_lookup() {
        let grant: Grant = serde_json::from_value(json!({
            "uid": uid(2).to_hex(),
            "chainId": 42161,
            "milestones": [
                {"uid": uid(3).to_hex(), "title": "Ship v1"},
                {"title": "Draft, not attested"}
            ]
        }))
        .unwrap();
        assert_eq!(grant.milestone(&uid(3)).unwrap().title, "Ship v1");
        assert!(grant.milestone(&uid(4)).is_none());
    }

    #[test]
    fn test_can_manage_includes_admins() {
        let owner = Address::from_hex(&"aa".repeat(20)).unwrap();
        let admin = Address::from_hex(&"bb".repeat(20)).unwrap();
        let stranger = Address::from_hex(&"cc".repeat(20)).unwrap();
        let project = Project {
            uid: uid(1),
            chain_id: ChainId::OPTIMISM,
            owner,
            admins: vec![admin],
            members: vec![],
            grants: vec![],
            updates: vec![],
            endorsements: vec![],
            objectives: vec![],
        };
        assert!(project.can_manage(&owner));
        assert!(project.can_manage(&admin));
        assert!(!project.is_owner(&admin));
        assert!(!project.can_manage(&stranger));
    }
}
