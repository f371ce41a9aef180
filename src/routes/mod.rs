// Route exports
pub mod apartments;

use actix_web::web;

pub use apartments::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(apartments::configure),
    );
}
