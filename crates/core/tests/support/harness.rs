//! Fully wired data layer over a mock backend

use std::sync::Arc;
use std::time::Duration;

use appraisal_common::testing::init_test_tracing;
use appraisal_common::time::{Clock, MockClock};
use appraisal_core::gateway::{RequestGateway, RetryPolicy};
use appraisal_core::persistence::{EntityValidator, PersistenceFacade};
use appraisal_core::session::{ActivityLog, SessionAuthority};
use appraisal_core::storage::{InMemoryStore, KeyValueStore, LocalCache};
use appraisal_core::sync::{Connectivity, ConnectivityMonitor, SyncQueue};
use appraisal_core::time_window::TimeWindowResolver;
use appraisal_domain::{EntityKind, SessionConfig, WindowRanges};
use chrono::{TimeZone, Utc};

use super::transport::MockTransport;

pub const SYNC_MAX_RETRIES: u32 = 3;

pub struct Harness {
    pub transport: Arc<MockTransport>,
    pub store: Arc<InMemoryStore>,
    pub clock: MockClock,
    pub connectivity: Arc<ConnectivityMonitor>,
    pub facade: Arc<PersistenceFacade>,
}

impl Harness {
    /// Harness pinned to 15 April 2026 with an empty store.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    pub fn cache(&self) -> &Arc<LocalCache> {
        self.facade.cache()
    }

    pub fn queue(&self) -> &Arc<SyncQueue> {
        self.facade.queue()
    }

    pub fn shared_clock(&self) -> Arc<dyn Clock> {
        Arc::new(self.clock.clone())
    }

    /// Backend unreachable and the monitor told so.
    pub fn go_offline(&self) {
        self.transport.set_offline(true);
        self.connectivity.set(Connectivity::Offline);
    }

    pub fn go_online(&self) {
        self.transport.set_offline(false);
        self.connectivity.set(Connectivity::Online);
    }

    pub fn resolver(&self) -> TimeWindowResolver {
        TimeWindowResolver::new(self.facade.clone(), WindowRanges::default(), self.shared_clock())
    }

    pub fn session(&self, config: SessionConfig) -> SessionAuthority {
        SessionAuthority::new(self.facade.clone(), self.shared_clock(), config)
    }

    /// Rebuild the data layer over the same store, as after a restart.
    pub fn restart(&self) -> Self {
        Self::builder()
            .store(self.store.clone())
            .transport(self.transport.clone())
            .clock(self.clock.clone())
            .build()
    }
}

#[derive(Default)]
pub struct HarnessBuilder {
    store: Option<Arc<InMemoryStore>>,
    transport: Option<Arc<MockTransport>>,
    clock: Option<MockClock>,
    gateway_retries: u32,
    validators: Vec<(EntityKind, Arc<dyn EntityValidator>)>,
}

impl HarnessBuilder {
    pub fn store(mut self, store: Arc<InMemoryStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn transport(mut self, transport: Arc<MockTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn clock(mut self, clock: MockClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Gateway retries per request (defaults to none).
    pub fn gateway_retries(mut self, retries: u32) -> Self {
        self.gateway_retries = retries;
        self
    }

    pub fn validator(mut self, kind: EntityKind, validator: Arc<dyn EntityValidator>) -> Self {
        self.validators.push((kind, validator));
        self
    }

    pub fn build(self) -> Harness {
        init_test_tracing();
        let store = self.store.unwrap_or_else(|| Arc::new(InMemoryStore::new()));
        let transport = self.transport.unwrap_or_else(MockTransport::new);
        let clock = self
            .clock
            .unwrap_or_else(|| MockClock::at(Utc.with_ymd_and_hms(2026, 4, 15, 9, 0, 0).unwrap()));
        let shared_clock: Arc<dyn Clock> = Arc::new(clock.clone());

        let policy = RetryPolicy {
            timeout: Duration::from_secs(5),
            max_retries: self.gateway_retries,
            base_delay: Duration::from_millis(10),
        };
        let gateway = Arc::new(RequestGateway::new(transport.clone(), policy));
        let durable: Arc<dyn KeyValueStore> = store.clone();
        let cache = Arc::new(LocalCache::new(durable));
        let queue = Arc::new(SyncQueue::new(
            cache.clone(),
            gateway.clone(),
            shared_clock.clone(),
            SYNC_MAX_RETRIES,
        ));
        let connectivity = Arc::new(ConnectivityMonitor::new(Connectivity::Online));
        let activity = Arc::new(ActivityLog::new(cache.clone(), shared_clock, 200));

        let mut facade =
            PersistenceFacade::new(gateway, cache, queue, connectivity.clone(), activity);
        for (kind, validator) in self.validators {
            facade = facade.with_validator(kind, validator);
        }

        Harness { transport, store, clock, connectivity, facade: Arc::new(facade) }
    }
}
