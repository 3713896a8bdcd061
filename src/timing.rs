use std::time::Duration;

use crate::manager::RequestManager;

pub fn purge(manager: &'static RequestManager, every: Duration) {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(every);
        loop {
            timer.tick().await;

            let purged = manager.purge_expired().await;
            if purged == 0 {
                continue;
            }
            let (friends, groups) = manager.pending().await;
            tracing::info!(
                "purged {} expired requests, {} friend requests and {} group invites pending",
                purged,
                friends,
                groups
            );
        }
    });
}
