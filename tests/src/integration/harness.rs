//! Shared fixture: one project with a grant, two milestones, a member and
//! an objective, served by a lagging in-memory indexer.

use gap_01_application_review::adapters::{MockPermissionChecker, MockStatusGateway};
use gap_01_application_review::{Milestone, MilestoneCompletion};
use gap_04_gasless::adapters::MockBundler;
use gap_runtime::adapters::{
    InMemoryIndexer, InMemoryOffChainRevoker, MockAttestationWriter, MockWallet,
};
use gap_runtime::{
    GapClient, GapConfig, GapContainer, Grant, GrantCompletion, Objective, Ports, Project,
    ProjectMember,
};
use shared_bus::{EventFilter, EventTopic, GapEvent, NotificationLevel, Subscription};
use shared_types::{Address, AttestationUid, ChainId, StepStatus};
use std::sync::Arc;

pub const PROJECT: &str = "solar-commons";

pub fn owner() -> Address {
    Address([0x11; 20])
}

pub fn admin() -> Address {
    Address([0x22; 20])
}

pub fn outsider() -> Address {
    Address([0x33; 20])
}

pub fn curator() -> Address {
    Address([0x44; 20])
}

pub fn uid(byte: u8) -> AttestationUid {
    AttestationUid([byte; 32])
}

pub const GRANT: u8 = 0x20;
pub const COMMUNITY: u8 = 0x90;
pub const MEMBER: u8 = 0x50;
pub const OBJECTIVE: u8 = 0x60;
pub const COMPLETION: u8 = 0x40;
pub const DONE_MILESTONE: u8 = 0x30;
pub const OPEN_MILESTONE: u8 = 0x31;

pub fn project() -> Project {
    Project {
        uid: uid(0x01),
        chain_id: ChainId::CELO,
        owner: owner(),
        admins: vec![admin()],
        members: vec![ProjectMember {
            uid: uid(MEMBER),
            recipient: outsider(),
            attester: Some(owner()),
        }],
        grants: vec![Grant {
            uid: uid(GRANT),
            chain_id: ChainId::CELO,
            community_uid: Some(uid(COMMUNITY)),
            updates: vec![],
            milestones: vec![
                Milestone {
                    uid: Some(uid(DONE_MILESTONE)),
                    title: "Pilot installation".into(),
                    completion_details: Some(MilestoneCompletion {
                        attester: Some(owner()),
                        reason: Some("12 panels installed".into()),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                Milestone {
                    uid: Some(uid(OPEN_MILESTONE)),
                    title: "Community training".into(),
                    ..Default::default()
                },
            ],
            completed: Some(GrantCompletion {
                uid: uid(COMPLETION),
                attester: Some(owner()),
                text: "Grant wrapped up".into(),
            }),
        }],
        updates: vec![],
        endorsements: vec![],
        objectives: vec![Objective {
            uid: uid(OBJECTIVE),
            title: "Power 40 homes".into(),
            attester: Some(owner()),
        }],
    }
}

pub struct Harness {
    pub container: GapContainer,
    pub client: GapClient,
    pub indexer: Arc<InMemoryIndexer>,
    pub writer: Arc<MockAttestationWriter>,
    pub wallet: Arc<MockWallet>,
    pub off_chain: Arc<InMemoryOffChainRevoker>,
    pub permissions: Arc<MockPermissionChecker>,
    pub gateway: Arc<MockStatusGateway>,
    pub bundler: Arc<MockBundler>,
}

pub struct HarnessBuilder {
    actor: Address,
    lag: u32,
    config: GapConfig,
}

impl HarnessBuilder {
    pub fn new(actor: Address) -> Self {
        let mut config = GapConfig::default();
        config.gasless.zerodev_project_id = Some("zd-project".into());
        config.gasless.alchemy_api_key = Some("alchemy-key".into());
        Self {
            actor,
            lag: 0,
            config,
        }
    }

    pub fn lag(mut self, reads: u32) -> Self {
        self.lag = reads;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.reconcile.max_attempts = attempts;
        self
    }

    pub fn disable_gasless(mut self, chain: ChainId) -> Self {
        self.config.gasless.disabled_chains.push(chain);
        self
    }

    pub fn build(self) -> Harness {
        let indexer = Arc::new(InMemoryIndexer::new().with_lag(self.lag));
        indexer.insert_project(PROJECT, project());
        indexer.add_community_admin(uid(COMMUNITY), curator());

        let wallet = Arc::new(MockWallet::connected(self.actor, ChainId::OPTIMISM));
        let writer = Arc::new(
            MockAttestationWriter::new(self.actor).indexing_into(indexer.clone(), PROJECT),
        );
        let off_chain = Arc::new(InMemoryOffChainRevoker::new(indexer.clone(), PROJECT));
        let permissions = Arc::new(MockPermissionChecker::new());
        let gateway = Arc::new(MockStatusGateway::new());
        let bundler = Arc::new(MockBundler::new());

        let container = GapContainer::with_ports(
            self.config,
            Ports {
                wallet: wallet.clone(),
                attestations: writer.clone(),
                indexer: indexer.clone(),
                off_chain: off_chain.clone(),
                permissions: permissions.clone(),
                status_gateway: gateway.clone(),
                bundler: bundler.clone(),
            },
        );

        Harness {
            client: container.client(),
            container,
            indexer,
            writer,
            wallet,
            off_chain,
            permissions,
            gateway,
            bundler,
        }
    }
}

impl Harness {
    pub fn tap(&self, topics: Vec<EventTopic>) -> Subscription {
        self.container.bus.subscribe(EventFilter::topics(topics))
    }

    pub fn snapshot(&self) -> Project {
        self.indexer
            .snapshot(PROJECT)
            .expect("fixture project is always present")
    }
}

pub fn toasts(subscription: &mut Subscription) -> Vec<(NotificationLevel, String)> {
    subscription
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            GapEvent::Notification { level, message } => Some((level, message)),
            _ => None,
        })
        .collect()
}

pub fn steps(subscription: &mut Subscription, operation: &str) -> Vec<StepStatus> {
    subscription
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            GapEvent::StepChanged { operation: op, step } if op == operation => Some(step),
            _ => None,
        })
        .collect()
}
