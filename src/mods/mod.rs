use once_cell::sync::OnceCell;

use crate::manager::RequestManager;

pub mod reply;
pub mod request;

static MANAGER: OnceCell<RequestManager> = OnceCell::new();

pub fn init(manager: RequestManager) -> &'static RequestManager {
    MANAGER.get_or_init(|| manager)
}

fn manager() -> anyhow::Result<&'static RequestManager> {
    MANAGER
        .get()
        .ok_or_else(|| anyhow::anyhow!("request manager is not initialised"))
}
