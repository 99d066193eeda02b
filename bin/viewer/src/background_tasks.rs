use async_trait::async_trait;
use ntex::rt::Arbiter;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// A long-running task spawned on a dedicated arbiter, cancelled
/// cooperatively on shutdown.
#[async_trait]
pub trait BackgroundTask: Send + Sync {
    fn id(&self) -> &str;
    async fn run(&self, token: CancellationToken);
}

pub struct BackgroundTasksManager {
    cancellation_token: CancellationToken,
    arbiter: Arbiter,
}

impl Default for BackgroundTasksManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundTasksManager {
    pub fn new() -> Self {
        Self {
            cancellation_token: CancellationToken::new(),
            arbiter: Arbiter::new(),
        }
    }

    pub fn register_task<T>(&mut self, task: Arc<T>)
    where
        T: BackgroundTask + 'static,
    {
        info!(id = task.id(), "spawning background task");
        let child_token = self.cancellation_token.clone();

        self.arbiter.spawn(async move {
            task.run(child_token).await;
        });
    }

    pub async fn shutdown(self) {
        info!("stopping background tasks");

        self.cancellation_token.cancel();
        self.arbiter.stop();
    }
}
