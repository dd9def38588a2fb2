use std::sync::Arc;

use tokio::{
    sync::{watch, Notify},
    task::JoinHandle,
};
use url::Url;

use super::db::SortOrder;
use super::observers::SubscriptionId;
use super::provider::InventoryProvider;
use super::records::Product;
use crate::error::{Error, Result};

type Snapshot = std::result::Result<Arc<Vec<Product>>, Arc<Error>>;

/// Runs a query off the calling thread and re-runs it whenever the watched
/// locator changes. Dropping the loader stops it.
pub struct Loader {
    provider: Arc<InventoryProvider>,
    subscription: SubscriptionId,
    receiver: watch::Receiver<Option<Snapshot>>,
    task: JoinHandle<()>,
}

impl Loader {
    pub fn spawn(
        provider: Arc<InventoryProvider>,
        uri: Url,
        sort: Option<SortOrder>,
    ) -> Result<Self> {
        let (sender, receiver) = watch::channel(None);
        let changed = Arc::new(Notify::new());

        let observer = {
            let changed = Arc::clone(&changed);
            Arc::new(move |_: &Url| changed.notify_one())
        };
        let subscription = provider.register_observer(&uri, observer)?;

        let task = tokio::spawn({
            let provider = Arc::clone(&provider);
            async move {
                loop {
                    let query = {
                        let provider = Arc::clone(&provider);
                        let uri = uri.clone();
                        tokio::task::spawn_blocking(move || provider.query(&uri, sort))
                    };

                    let snapshot = match query.await {
                        Ok(Ok(products)) => Ok(Arc::new(products)),
                        Ok(Err(e)) => {
                            tracing::error!(%uri, error = %e, "background query failed");
                            Err(Arc::new(e))
                        }
                        Err(e) => {
                            tracing::error!(%uri, error = %e, "background query panicked");
                            break;
                        }
                    };

                    if sender.send(Some(snapshot)).is_err() {
                        break;
                    }
                    changed.notified().await;
                    tracing::trace!(%uri, "reloading");
                }
            }
        });

        Ok(Self {
            provider,
            subscription,
            receiver,
            task,
        })
    }

    /// Returns the latest result, waiting for the first load if necessary.
    pub async fn load_finished(&mut self) -> Result<Arc<Vec<Product>>> {
        loop {
            if let Some(snapshot) = self.receiver.borrow_and_update().clone() {
                return snapshot.map_err(Error::Background);
            }
            self.wait().await?;
        }
    }

    /// Waits for the next result published after the one last seen.
    pub async fn reloaded(&mut self) -> Result<Arc<Vec<Product>>> {
        self.wait().await?;
        self.load_finished().await
    }

    async fn wait(&mut self) -> Result<()> {
        self.receiver
            .changed()
            .await
            .map_err(|_| Error::LoaderStopped)
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        self.task.abort();
        self.provider.unregister_observer(self.subscription);
        tracing::trace!(observers = self.provider.observer_count(), "loader dropped");
    }
}
