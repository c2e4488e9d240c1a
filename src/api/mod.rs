//! HTTP host: JSON endpoints for creation and statistics, plus the redirect
//! route. Register `link_api_routes()` before `redirect_routes()` so `/api`
//! is not captured as a short code.

pub mod services;
