use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use tracing::{error, trace};

use crate::analytics::ClickContext;
use crate::errors::EngineError;
use crate::services::LinkService;

/// Optional header a reverse proxy can set with a coarse client location
pub const LOCATION_HINT_HEADER: &str = "x-approx-location";

pub struct RedirectService {}

impl RedirectService {
    pub async fn handle_redirect(
        req: HttpRequest,
        path: web::Path<String>,
        service: web::Data<Arc<LinkService>>,
    ) -> impl Responder {
        let code = path.into_inner();
        let ctx = Self::click_context(&req);

        match service.resolve_with(&code, ctx).await {
            Ok(target) => HttpResponse::TemporaryRedirect()
                .insert_header(("Location", target))
                .finish(),
            Err(EngineError::NotFound(_)) => {
                trace!("Redirect: unknown code {}", code);
                Self::plain_response(StatusCode::NOT_FOUND, "Not Found")
            }
            Err(EngineError::Expired(_)) => {
                trace!("Redirect: expired code {}", code);
                Self::plain_response(StatusCode::GONE, "Link Expired")
            }
            Err(e) => {
                error!("Redirect: lookup failed for {}: {}", code, e);
                Self::plain_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    fn click_context(req: &HttpRequest) -> ClickContext {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(String::from)
        };
        ClickContext {
            referrer: header("referer"),
            location_hint: header(LOCATION_HINT_HEADER),
        }
    }

    #[inline]
    fn plain_response(status: StatusCode, body: &'static str) -> HttpResponse {
        HttpResponse::build(status)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .insert_header(("Cache-Control", "no-store"))
            .body(body)
    }
}

pub fn redirect_routes() -> actix_web::Scope {
    web::scope("")
        .route("/{code}", web::get().to(RedirectService::handle_redirect))
        .route("/{code}", web::head().to(RedirectService::handle_redirect))
}
