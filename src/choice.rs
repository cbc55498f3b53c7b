use crate::{ChoiceProvider, Error, Response, Settings};
use axum::response::IntoResponse;
use axum::{Router, extract, routing};
use http::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;

/// Parameters sent by the widget's ajax transport.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct QueryParams {
    pub page: Option<String>,
    pub term: Option<String>,
}

impl QueryParams {
    /// 0-based page. The widget counts pages from 1; a missing or
    /// unparseable page is page 1.
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|page| page.trim().parse::<i64>().ok())
            .map_or(0, |page| usize::try_from(page.saturating_sub(1)).unwrap_or(0))
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref().filter(|term| !term.is_empty())
    }
}

#[derive(Serialize)]
struct Results {
    results: Vec<Value>,
    more: bool,
}

/// Writes one object per choice, fields supplied by the provider.
pub fn write_choices<'a, T, P>(
    provider: &P,
    choices: impl IntoIterator<Item = &'a T>,
    results: &mut Vec<Value>,
) -> Result<(), Error>
where
    T: 'a,
    P: ChoiceProvider<T> + ?Sized,
{
    for choice in choices {
        let mut object = Map::new();
        provider
            .to_json(choice, &mut object)
            .map_err(Error::Provider)?;
        results.push(Value::Object(object));
    }
    Ok(())
}

/// A Select2 backed form field: its settings plus the provider answering its
/// queries.
pub trait Choice: Send + Sync + 'static {
    type Item;
    type Provider: ChoiceProvider<Self::Item>;

    fn provider(&self) -> &Self::Provider;

    fn settings(&self) -> &Settings;

    fn settings_mut(&mut self) -> &mut Settings;

    /// Asks the provider for the choices matching the request.
    fn query(
        &self,
        params: &QueryParams,
        response: &mut Response<Self::Item>,
    ) -> Result<(), Error> {
        self.provider()
            .query(params.term(), params.page(), response)
            .map_err(Error::Provider)
    }

    /// Builds the entries of the `results` array.
    fn write_values(
        &self,
        choices: &[Self::Item],
        results: &mut Vec<Value>,
    ) -> Result<(), Error> {
        write_choices(self.provider(), choices, results)
    }

    /// Renders the body the widget expects:
    ///
    /// ```json
    /// { "results": [{ "id": 1, "text": "Some Text" }], "more": true }
    /// ```
    fn write_response(&self, response: &Response<Self::Item>) -> Result<Vec<u8>, Error> {
        let mut results = Vec::with_capacity(response.len());
        self.write_values(response.as_slice(), &mut results)?;
        let body = serde_json::to_vec(&Results {
            results,
            more: response.has_more(),
        })?;
        Ok(body)
    }

    /// Script turning the element `markup_id` into a widget.
    fn init_script(&self, markup_id: &str) -> Result<String, Error> {
        let selector = serde_json::to_string(&format!("#{markup_id}"))?;
        Ok(format!("$({selector}).select2({});", self.settings().to_json()?))
    }
}

/// Single-select field.
pub struct Select2Choice<T, P> {
    provider: P,
    settings: Settings,
    _choice: PhantomData<fn() -> T>,
}

impl<T, P> Select2Choice<T, P>
where
    P: ChoiceProvider<T>,
{
    pub fn new(provider: P) -> Self {
        Self::with_settings(provider, Settings::default())
    }

    pub fn with_settings(provider: P, settings: Settings) -> Self {
        Self {
            provider,
            settings,
            _choice: PhantomData,
        }
    }
}

impl<T, P> Choice for Select2Choice<T, P>
where
    T: 'static,
    P: ChoiceProvider<T> + 'static,
{
    type Item = T;
    type Provider = P;

    fn provider(&self) -> &P {
        &self.provider
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}

/// Multi-select field.
pub struct Select2MultiChoice<T, P> {
    provider: P,
    settings: Settings,
    _choice: PhantomData<fn() -> T>,
}

impl<T, P> Select2MultiChoice<T, P>
where
    P: ChoiceProvider<T>,
{
    pub fn new(provider: P) -> Self {
        Self::with_settings(provider, Settings::default())
    }

    /// `settings.multiple` is forced on.
    pub fn with_settings(provider: P, mut settings: Settings) -> Self {
        settings.multiple = Some(true);
        Self {
            provider,
            settings,
            _choice: PhantomData,
        }
    }
}

impl<T, P> Choice for Select2MultiChoice<T, P>
where
    T: 'static,
    P: ChoiceProvider<T> + 'static,
{
    type Item = T;
    type Provider = P;

    fn provider(&self) -> &P {
        &self.provider
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }
}

struct Endpoint<C> {
    path: String,
    choice: C,
}

/// Mounts the query endpoint of `choice` at `path` and points its
/// `ajax.url` there. The init script is served at
/// `<path>/settings.js?id=<markup id>`.
pub fn router<C>(path: &str, mut choice: C) -> Router
where
    C: Choice,
{
    choice.settings_mut().ajax.url = Some(path.to_owned());
    let script_path = script_path(path);
    let endpoint = Arc::new(Endpoint {
        path: path.to_owned(),
        choice,
    });
    Router::new()
        .route(path, routing::get(resource::<C>))
        .route(&script_path, routing::get(settings_script::<C>))
        .with_state(endpoint)
}

/// Where [`router`] serves the init script of the choice mounted at `path`.
pub fn script_path(path: &str) -> String {
    format!("{}/settings.js", path.trim_end_matches('/'))
}

async fn resource<C>(
    extract::State(endpoint): extract::State<Arc<Endpoint<C>>>,
    extract::Query(params): extract::Query<QueryParams>,
) -> Result<axum::response::Response, Error>
where
    C: Choice,
{
    let output = respond(&endpoint, &params);
    endpoint.choice.provider().detach();

    let labels = vec![metrics::Label::new("path", endpoint.path.clone())];
    match &output {
        Ok(_) => metrics::counter!("query", labels).increment(1),
        Err(_) => metrics::counter!("query_error", labels).increment(1),
    }
    output
}

#[tracing::instrument(
    err(level = tracing::Level::WARN),
    skip(endpoint),
    fields(path = %endpoint.path),
)]
fn respond<C>(
    endpoint: &Endpoint<C>,
    params: &QueryParams,
) -> Result<axum::response::Response, Error>
where
    C: Choice,
{
    let mut response = Response::new();
    endpoint.choice.query(params, &mut response)?;
    let body = endpoint.choice.write_response(&response)?;
    tracing::info!(results = response.len(), more = response.has_more());
    Ok(([(CONTENT_TYPE, "application/json; charset=utf-8")], body).into_response())
}

#[derive(Deserialize)]
struct ScriptParams {
    id: String,
}

async fn settings_script<C>(
    extract::State(endpoint): extract::State<Arc<Endpoint<C>>>,
    extract::Query(ScriptParams { id }): extract::Query<ScriptParams>,
) -> Result<axum::response::Response, Error>
where
    C: Choice,
{
    let script = endpoint.choice.init_script(&id)?;
    Ok(([(CONTENT_TYPE, "application/javascript; charset=utf-8")], script).into_response())
}
