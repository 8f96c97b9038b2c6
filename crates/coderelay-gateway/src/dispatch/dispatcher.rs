use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use coderelay_core::error::{RelayError, Result};
use coderelay_core::protocol::{Envelope, EventKind};

use crate::realtime::RealtimeCtx;

/// A relay service owning one `svc` namespace.
#[async_trait]
pub trait TextService: Send + Sync {
    fn svc(&self) -> &'static str;
    async fn handle(&self, ctx: RealtimeCtx, kind: EventKind, env: Envelope) -> Result<()>;
}

/// Registry and dispatcher for relay services.
///
/// Every inbound envelope resolves to exactly one `EventKind` and is handed
/// to exactly one service.
#[derive(Default)]
pub struct Dispatcher {
    text: DashMap<&'static str, Arc<dyn TextService>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            text: DashMap::new(),
        }
    }

    pub fn register_text(&self, svc: Arc<dyn TextService>) {
        self.text.insert(svc.svc(), svc);
    }

    pub fn registered_text_svcs(&self) -> Vec<&'static str> {
        self.text.iter().map(|e| *e.key()).collect()
    }

    pub async fn dispatch_text(&self, ctx: RealtimeCtx, env: Envelope) -> Result<()> {
        let kind = env.kind()?;
        let handler = self
            .text
            .get(kind.svc())
            .ok_or_else(|| RelayError::UnknownEvent {
                svc: env.svc.clone(),
                msg_type: env.msg_type.clone(),
            })?
            .value()
            .clone();
        handler.handle(ctx, kind, env).await
    }
}
