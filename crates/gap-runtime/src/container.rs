//! # GAP Container
//!
//! Builds every service once and shares it through `Arc`s.
//!
//! ## Wiring
//!
//! ```text
//!  InMemoryEventBus ──► BusNotifier, TracingErrorReporter ──► Reconciler
//!        │
//!        ├──► ApplicationReviewService (PermissionChecker, ApplicationStatusGateway)
//!        │
//!  AttestationWriter + WalletSession ──► AttestationRevoker ─┐
//!                                   OffChainRevoker ─────────┴──► RevokeService
//!
//!  BundlerTransport ──► ZeroDevProvider, AlchemyProvider ──► GaslessRouter
//! ```
//!
//! The wallet and the attestation SDK are always supplied by the host; the
//! indexer and backend ports default to the HTTP adapters.

use anyhow::Context;
use gap_01_application_review::{
    ApplicationReviewService, ApplicationStatusGateway, PermissionChecker,
};
use gap_02_reconciliation::adapters::{BusNotifier, TracingErrorReporter};
use gap_02_reconciliation::{ErrorReporter, Notifier, Reconciler};
use gap_03_revoke::{OffChainRevoker, RevokeService};
use gap_04_gasless::{
    AlchemyProvider, BundlerTransport, GaslessRouter, GaslessTable, HttpBundlerTransport,
    ZeroDevProvider,
};
use gap_telemetry::{init_telemetry, TelemetryConfig, TelemetryGuard};
use shared_bus::{EventPublisher, InMemoryEventBus};
use std::sync::Arc;
use tracing::info;

use crate::adapters::{
    ApiClient, AttestationRevoker, HttpApplicationStatusGateway, HttpIndexer, HttpOffChainRevoker,
    HttpPermissionChecker,
};
use crate::config::GapConfig;
use crate::flows::GapClient;
use crate::metrics::MetricsRecorder;
use crate::ports::{AttestationWriter, IndexerReader, WalletSession};
use crate::store::SessionStores;

/// Every outbound port the runtime needs.
#[derive(Clone)]
pub struct Ports {
    pub wallet: Arc<dyn WalletSession>,
    pub attestations: Arc<dyn AttestationWriter>,
    pub indexer: Arc<dyn IndexerReader>,
    pub off_chain: Arc<dyn OffChainRevoker>,
    pub permissions: Arc<dyn PermissionChecker>,
    pub status_gateway: Arc<dyn ApplicationStatusGateway>,
    pub bundler: Arc<dyn BundlerTransport>,
}

impl Ports {
    /// HTTP adapters for the indexer and backend around host-supplied
    /// wallet and attestation ports.
    pub fn http(
        config: &GapConfig,
        wallet: Arc<dyn WalletSession>,
        attestations: Arc<dyn AttestationWriter>,
    ) -> Self {
        let backend = ApiClient::new(
            config.backend.url.clone(),
            config.backend.api_token.clone(),
            config.backend.timeout,
        );

        Self {
            wallet,
            attestations,
            indexer: Arc::new(HttpIndexer::new(&config.indexer)),
            off_chain: Arc::new(HttpOffChainRevoker::new(backend.clone())),
            permissions: Arc::new(HttpPermissionChecker::new(backend.clone())),
            status_gateway: Arc::new(HttpApplicationStatusGateway::new(backend)),
            bundler: Arc::new(HttpBundlerTransport::new(config.backend.timeout)),
        }
    }
}

/// Shared services.
#[derive(Clone)]
pub struct GapContainer {
    pub config: GapConfig,
    pub bus: Arc<InMemoryEventBus>,
    pub stores: Arc<SessionStores>,
    pub ports: Ports,
    pub notifier: Arc<dyn Notifier>,
    pub errors: Arc<dyn ErrorReporter>,
    pub reconciler: Arc<Reconciler>,
    pub review: Arc<ApplicationReviewService>,
    pub revoke: Arc<RevokeService>,
    pub gasless: Arc<GaslessRouter>,
}

impl GapContainer {
    /// Validate `config` and wire the HTTP adapters.
    pub fn from_config(
        config: GapConfig,
        wallet: Arc<dyn WalletSession>,
        attestations: Arc<dyn AttestationWriter>,
    ) -> anyhow::Result<Self> {
        config.validate().context("invalid GAP configuration")?;
        let ports = Ports::http(&config, wallet, attestations);
        Ok(Self::with_ports(config, ports))
    }

    /// Wire services over caller-supplied ports.
    pub fn with_ports(config: GapConfig, ports: Ports) -> Self {
        let bus = Arc::new(InMemoryEventBus::new());
        let events: Arc<dyn EventPublisher> = bus.clone();

        let notifier: Arc<dyn Notifier> = Arc::new(BusNotifier::new(Arc::clone(&events)));
        let errors: Arc<dyn ErrorReporter> =
            Arc::new(TracingErrorReporter::with_bus(Arc::clone(&events)));

        let reconciler = Arc::new(Reconciler::new(
            config.reconcile.to_reconcile_config(),
            Arc::clone(&notifier),
            Arc::clone(&errors),
            Arc::clone(&events),
        ));

        let review = Arc::new(ApplicationReviewService::new(
            Arc::clone(&ports.permissions),
            Arc::clone(&ports.status_gateway),
            Arc::clone(&events),
        ));

        let revoke = Arc::new(RevokeService::new(
            Arc::new(AttestationRevoker::new(
                Arc::clone(&ports.attestations),
                Arc::clone(&ports.wallet),
            )),
            Arc::clone(&ports.off_chain),
        ));

        let mut table = GaslessTable::default();
        for chain in &config.gasless.disabled_chains {
            table.disable(*chain);
        }
        let gasless = Arc::new(
            GaslessRouter::new(table)
                .register(Arc::new(ZeroDevProvider::new(
                    config.gasless.zerodev_project_id.clone(),
                    Arc::clone(&ports.bundler),
                )))
                .register(Arc::new(AlchemyProvider::new(
                    config.gasless.alchemy_api_key.clone(),
                    Arc::clone(&ports.bundler),
                ))),
        );

        info!(
            "[gap-runtime] Container ready (poll every {} ms, max {} attempts)",
            config.reconcile.poll_interval_ms, config.reconcile.max_attempts
        );

        Self {
            config,
            bus,
            stores: Arc::new(SessionStores::new()),
            ports,
            notifier,
            errors,
            reconciler,
            review,
            revoke,
            gasless,
        }
    }

    /// Flow facade over this container.
    pub fn client(&self) -> GapClient {
        GapClient::new(self.clone())
    }

    /// Start recording bus events as metrics.
    pub fn start_metrics(&self) -> MetricsRecorder {
        MetricsRecorder::spawn(&self.bus)
    }
}

/// Install logging and metrics from the environment.
pub fn init_runtime_telemetry() -> anyhow::Result<TelemetryGuard> {
    init_telemetry(TelemetryConfig::from_env()).context("failed to initialize telemetry")
}
