use std::str::FromStr;

use proc_qq::Authentication;
use proc_qq::ClientBuilder;
use proc_qq::DeviceSource::JsonFile;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Config;
use crate::manager::RequestManager;
use crate::mods::{reply, request};

mod actuator;
mod config;
mod correlator;
mod event;
mod manager;
mod mods;
mod notice;
mod qq;
mod registry;
#[cfg(test)]
mod testing;
mod timing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv()?;

    init_tracing_subscriber()?;
    let config = Config::from_env()?;
    if config.admins.is_empty() {
        tracing::warn!("admins is empty, requests will not be forwarded to anyone");
    } else {
        tracing::info!("admins: {}", config.admins_display());
    }

    let manager = mods::init(RequestManager::new(&config));
    if config.request_ttl.is_some() {
        timing::purge(manager, config.purge_interval);
    }

    let client = ClientBuilder::new()
        .version(&proc_qq::re_exports::ricq::version::IPAD)
        .device(JsonFile("device.json".to_owned()))
        .authentication(Authentication::UinPassword(
            dotenv::var("number")?.parse()?,
            dotenv::var("password")?,
        ))
        .modules(vec![request::module(), reply::module()])
        .build()
        .await?;

    client.start().await??;
    Ok(())
}

fn init_tracing_subscriber() -> anyhow::Result<()> {
    let lvl = Level::from_str(&dotenv::var("level")?)?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .without_time(),
        )
        .with(
            tracing_subscriber::filter::Targets::new()
                .with_target("ricq", lvl)
                .with_target("proc_qq", lvl)
                .with_target("invite_bot", lvl),
        )
        .init();
    Ok(())
}
