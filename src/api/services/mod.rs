pub mod links;
pub mod redirect;
pub mod types;

pub use links::{LinkApi, link_api_routes};
pub use redirect::{RedirectService, redirect_routes};
