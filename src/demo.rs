use axum::{Router, routing};
use clap::{ArgAction, Parser};
use futures::FutureExt;
use select2::{
    Item, ListChoiceProvider, Select2Choice, Select2GroupedMultiChoice, Select2MultiChoice,
    Settings, TextChoices, choice,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use tokio::net::TcpListener;

#[derive(Parser)]
pub(super) struct Args {
    #[clap(long)]
    bind: SocketAddr,
    /// JSON array of `{ "id": .., "text": .., "group": .. }`
    #[clap(long)]
    items: PathBuf,
    /// `<path>?grouped=<bool>&multiple=<bool>&page_size=<n>&placeholder=<text>&minimum_input_length=<n>&allow_clear=<bool>`
    #[clap(long, action = ArgAction::Append, required = true)]
    choice: Vec<Config>,
}

pub(super) async fn main(args: Args) -> anyhow::Result<()> {
    let prometheus_recorder =
        metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let prometheus_handle = prometheus_recorder.handle();
    metrics_util::layers::Stack::new(prometheus_recorder)
        .push(metrics_util::layers::PrefixLayer::new(env!(
            "CARGO_BIN_NAME"
        )))
        .install()?;

    let items = serde_json::from_slice::<Vec<Item>>(&tokio::fs::read(&args.items).await?)?;
    tracing::info!(items = items.len(), choices = ?args.choice);

    let app = choices(&args.choice, &items)?
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .route("/health", routing::get(|| future::ready(())))
        .route(
            "/metrics",
            routing::get(move || future::ready(prometheus_handle.render())),
        );

    let listener = TcpListener::bind(args.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(tokio::signal::ctrl_c().map(|_| ()))
        .await?;
    Ok(())
}

/// Mounts every choice, refusing paths that would collide with each other or
/// with `/health` and `/metrics`.
fn choices(configs: &[Config], items: &[Item]) -> anyhow::Result<Router> {
    let mut paths = HashSet::from(["/health".to_owned(), "/metrics".to_owned()]);
    let mut app = Router::new();
    for config in configs {
        for path in [config.path.clone(), choice::script_path(&config.path)] {
            anyhow::ensure!(
                paths.insert(path.clone()),
                "choice path {path:?} is already in use"
            );
        }
        app = app.merge(config.router(items.to_vec()));
    }
    Ok(app)
}

#[derive(Clone, Debug)]
struct Config {
    path: String,
    grouped: bool,
    page_size: usize,
    settings: Settings,
}

impl FromStr for Config {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Query {
            #[serde(default)]
            grouped: bool,
            #[serde(default)]
            multiple: bool,
            page_size: Option<usize>,
            placeholder: Option<String>,
            minimum_input_length: Option<u32>,
            allow_clear: Option<bool>,
        }

        let (path, query) = s.split_once('?').unwrap_or((s, ""));
        if !path.starts_with('/') {
            return Err(format!("choice path must start with '/': {path:?}"));
        }
        if path.contains([':', '*', '{', '}']) {
            return Err(format!("choice path must be literal: {path:?}"));
        }
        let Query {
            grouped,
            multiple,
            page_size,
            placeholder,
            minimum_input_length,
            allow_clear,
        } = serde_urlencoded::from_str(query).map_err(|e| e.to_string())?;

        Ok(Self {
            path: path.to_owned(),
            grouped,
            page_size: page_size.unwrap_or(ListChoiceProvider::DEFAULT_PAGE_SIZE),
            settings: Settings {
                multiple: multiple.then_some(true),
                placeholder: placeholder.map(serde_json::Value::String),
                minimum_input_length,
                allow_clear,
                ..Settings::default()
            },
        })
    }
}

impl Config {
    fn router(&self, items: Vec<Item>) -> Router {
        let provider = TextChoices(ListChoiceProvider::with_page_size(items, self.page_size));
        let settings = self.settings.clone();
        if self.grouped {
            choice::router(
                &self.path,
                Select2GroupedMultiChoice::<Item, _>::with_settings(provider, settings),
            )
        } else if settings.multiple == Some(true) {
            choice::router(
                &self.path,
                Select2MultiChoice::<Item, _>::with_settings(provider, settings),
            )
        } else {
            choice::router(
                &self.path,
                Select2Choice::<Item, _>::with_settings(provider, settings),
            )
        }
    }
}
