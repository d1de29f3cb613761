use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::kernel::context::ExecContext;
use crate::kernel::error::Result;

/// Boxed future returned by closure-based hooks.
pub type HookFuture = Pin<Box<dyn Future<Output = Result<()>> + Send + 'static>>;

type HookFn = Arc<dyn Fn(ExecContext) -> HookFuture + Send + Sync>;

/// Long-running behavior (servers, consumers) that is started and stopped
/// outside the install run.
#[async_trait]
pub trait StartStop: Send + Sync {
    async fn start(&self, ctx: &ExecContext) -> Result<()>;
    async fn stop(&self, ctx: &ExecContext) -> Result<()>;
}

/// A named `(start, stop)` pair appended to a lifecycle sink.
#[derive(Clone)]
pub struct Hook {
    name: String,
    handler: Arc<dyn StartStop>,
}

impl Hook {
    pub fn new(name: impl Into<String>, handler: Arc<dyn StartStop>) -> Self {
        Self {
            name: name.into(),
            handler,
        }
    }

    /// Build a hook from two async closures.
    pub fn from_fns<S, SF, T, TF>(name: impl Into<String>, start: S, stop: T) -> Self
    where
        S: Fn(ExecContext) -> SF + Send + Sync + 'static,
        SF: Future<Output = Result<()>> + Send + 'static,
        T: Fn(ExecContext) -> TF + Send + Sync + 'static,
        TF: Future<Output = Result<()>> + Send + 'static,
    {
        let start: HookFn = Arc::new(move |ctx| Box::pin(start(ctx)) as HookFuture);
        let stop: HookFn = Arc::new(move |ctx| Box::pin(stop(ctx)) as HookFuture);
        Self::new(name, Arc::new(FnHook { start, stop }))
    }

    /// Name of the component that registered the hook.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> &Arc<dyn StartStop> {
        &self.handler
    }

    pub async fn start(&self, ctx: &ExecContext) -> Result<()> {
        self.handler.start(ctx).await
    }

    pub async fn stop(&self, ctx: &ExecContext) -> Result<()> {
        self.handler.stop(ctx).await
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook").field("name", &self.name).finish()
    }
}

struct FnHook {
    start: HookFn,
    stop: HookFn,
}

#[async_trait]
impl StartStop for FnHook {
    async fn start(&self, ctx: &ExecContext) -> Result<()> {
        (self.start)(ctx.clone()).await
    }

    async fn stop(&self, ctx: &ExecContext) -> Result<()> {
        (self.stop)(ctx.clone()).await
    }
}
