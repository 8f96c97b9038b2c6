//! Shared application state for the relay gateway.
//!
//! Wires the realtime core, the dispatcher with its built-in services, and
//! the metrics registry. Built once at startup and cloned into every handler.

use std::sync::Arc;

use coderelay_core::error::{RelayError, Result};

use crate::config::RelayConfig;
use crate::dispatch::Dispatcher;
use crate::obs::RelayMetrics;
use crate::realtime::core::{egress_drop_count, egress_send_fail_count};
use crate::realtime::RealtimeCore;
use crate::services::{ChatService, CodeService, CursorService, RoomService};

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<RelayConfig>,
    realtime: Arc<RealtimeCore>,
    dispatcher: Arc<Dispatcher>,
    metrics: Arc<RelayMetrics>,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: RelayConfig) -> Result<Self> {
        cfg.validate()?;

        let realtime = Arc::new(RealtimeCore::new());
        let dispatcher = Dispatcher::new();

        dispatcher.register_text(Arc::new(RoomService::new()));
        dispatcher.register_text(Arc::new(CodeService::new()));
        dispatcher.register_text(Arc::new(CursorService::new()));
        dispatcher.register_text(Arc::new(ChatService::new()));

        // every svc in the inbound catalog must have a handler
        let registered = dispatcher.registered_text_svcs();
        for svc in ["room", "code", "cursor", "chat"] {
            if !registered.contains(&svc) {
                return Err(RelayError::Internal(format!("no service registered for svc {svc}")));
            }
        }

        Ok(Self {
            cfg: Arc::new(cfg),
            realtime,
            dispatcher: Arc::new(dispatcher),
            metrics: Arc::new(RelayMetrics::default()),
        })
    }

    pub fn cfg(&self) -> &RelayConfig {
        &self.cfg
    }

    pub fn realtime(&self) -> Arc<RealtimeCore> {
        Arc::clone(&self.realtime)
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn metrics(&self) -> &RelayMetrics {
        &self.metrics
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }

    /// Gauges read from live state at scrape time.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("coderelay_rooms_active", self.realtime.room_count() as u64),
            ("coderelay_connections", self.realtime.session_count() as u64),
            ("coderelay_egress_dropped_total", egress_drop_count()),
            ("coderelay_egress_send_failed_total", egress_send_fail_count()),
        ]
    }
}
