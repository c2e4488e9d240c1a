//! Link creation and statistics endpoints

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use tracing::{error, info, trace};

use super::types::{ApiError, ApiResponse, PostLinkBatch};
use crate::services::{CreateLinkRequest, LinkService};

pub struct LinkApi;

impl LinkApi {
    /// `POST /api/links`
    pub async fn create_links(
        body: web::Json<PostLinkBatch>,
        service: web::Data<Arc<LinkService>>,
    ) -> impl Responder {
        let requests: Vec<CreateLinkRequest> = body
            .into_inner()
            .requests
            .into_iter()
            .map(CreateLinkRequest::from)
            .collect();
        trace!("Link API: create batch of {}", requests.len());

        let max_batch = service.settings().max_batch;
        match service.create_batch(&requests, max_batch).await {
            Ok(created) => {
                info!("Link API: created {} links", created.len());
                HttpResponse::Created().json(ApiResponse {
                    code: 0,
                    data: created,
                })
            }
            Err(e) => {
                if !e.error.is_client_error() {
                    error!("Link API: batch failed: {}", e);
                }
                HttpResponse::build(e.error.http_status()).json(ApiError::from(&e))
            }
        }
    }

    /// `GET /api/stats`
    pub async fn stats(service: web::Data<Arc<LinkService>>) -> impl Responder {
        match service.report().await {
            Ok(report) => HttpResponse::Ok().json(ApiResponse {
                code: 0,
                data: report,
            }),
            Err(e) => {
                error!("Link API: report failed: {}", e);
                HttpResponse::build(e.http_status()).json(ApiError::from_engine(&e, None))
            }
        }
    }
}

pub fn link_api_routes() -> actix_web::Scope {
    web::scope("/api")
        .route("/links", web::post().to(LinkApi::create_links))
        .route("/stats", web::get().to(LinkApi::stats))
}
