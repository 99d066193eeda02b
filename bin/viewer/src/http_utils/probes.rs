use std::sync::Arc;

use ntex::web::{self, Responder};

use crate::catalog_state::CatalogState;

pub async fn health_check_handler() -> impl Responder {
    web::HttpResponse::Ok()
}

pub async fn readiness_check_handler(
    catalog_state: web::types::State<Arc<CatalogState>>,
) -> impl Responder {
    if catalog_state.is_ready() {
        web::HttpResponse::Ok()
    } else {
        web::HttpResponse::InternalServerError()
    }
}
