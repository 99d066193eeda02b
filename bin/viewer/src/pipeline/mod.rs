use std::sync::Arc;

use aztier_tiering::{
    filter,
    model::Partition,
    render,
    state::{Action, ViewState},
};
use ntex::web::{self, types::Path, types::Query, types::State};
use serde::Deserialize;
use tracing::warn;

use crate::catalog_state::{Catalog, CatalogState};
use crate::http_utils::shell;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Seconds a client should wait before retrying while no catalog is live.
const RETRY_AFTER_SECS: &str = "10";

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Builds the view state for one request: fragment navigation first, then
/// the untiered counts from the loaded catalog, then the search text. An
/// undecodable fragment leaves the default view in place.
fn view_state_for(fragment: &str, search: Option<String>, catalog: &Catalog) -> ViewState {
    let mut state = ViewState::new();
    state.apply(Action::Navigate(format!("#{fragment}")));
    for partition in [Partition::Entra, Partition::MsGraph] {
        state.apply(Action::UntieredCountLoaded {
            partition,
            count: catalog.untiered[partition],
        });
    }
    if let Some(q) = search {
        state.apply(Action::SearchChanged(q));
    }
    state
}

fn content_for(state: &ViewState, catalog: &Catalog) -> String {
    let partition = state.active();
    render::content_region(
        partition,
        &catalog.datasets[partition],
        state.selection(),
        state.search(),
        state.untiered_count(partition),
    )
}

fn html_response(body: String) -> web::HttpResponse {
    web::HttpResponse::Ok()
        .header(http::header::CONTENT_TYPE, HTML_CONTENT_TYPE)
        .body(body)
}

fn catalog_pending_response() -> web::HttpResponse {
    warn!("request received before the first catalog load completed");

    web::HttpResponse::ServiceUnavailable()
        .header(http::header::RETRY_AFTER, RETRY_AFTER_SECS)
        .header(http::header::CONTENT_TYPE, HTML_CONTENT_TYPE)
        .body("<p>Catalog is still loading, retry shortly.</p>")
}

/// `GET /` and every unknown path: the shell with the default view.
pub async fn index_handler(catalog_state: State<Arc<CatalogState>>) -> web::HttpResponse {
    let guard = catalog_state.current();
    match guard.as_ref() {
        Some(catalog) => {
            let state = view_state_for("azure", None, catalog);
            let page = shell::render_page(state.active(), &content_for(&state, catalog));
            html_response(page)
        }
        None => catalog_pending_response(),
    }
}

/// `GET /view/{fragment}`: the full page for a fragment token.
pub async fn view_handler(
    fragment: Path<String>,
    params: Query<SearchParams>,
    catalog_state: State<Arc<CatalogState>>,
) -> web::HttpResponse {
    let guard = catalog_state.current();
    match guard.as_ref() {
        Some(catalog) => {
            let state = view_state_for(&fragment, params.into_inner().q, catalog);
            let page = shell::render_page(state.active(), &content_for(&state, catalog));
            html_response(page)
        }
        None => catalog_pending_response(),
    }
}

/// `GET /view/{fragment}/entries`: only the entry list below the search
/// field, for in-place replacement while typing.
pub async fn entries_handler(
    fragment: Path<String>,
    params: Query<SearchParams>,
    catalog_state: State<Arc<CatalogState>>,
) -> web::HttpResponse {
    let guard = catalog_state.current();
    match guard.as_ref() {
        Some(catalog) => {
            let state = view_state_for(&fragment, params.into_inner().q, catalog);
            let partition = state.active();
            let dataset = &catalog.datasets[partition];
            let matched = filter::filter(
                partition,
                dataset.records(),
                state.selection(),
                state.search(),
            );
            html_response(render::entries(partition, &matched))
        }
        None => catalog_pending_response(),
    }
}
