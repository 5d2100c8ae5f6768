#![forbid(unsafe_code)]

use actix_web::{HttpResponse, web};

mod issue;

const BANNER: &str = "tissue -- a tiny issue tracker server";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index)).service(
        web::scope("/api")
            .service(
                web::resource("/issue/{id}")
                    .route(web::get().to(issue::get_issue))
                    .route(web::delete().to(issue::delete_issue))
                    .default_service(web::to(issue::method_not_allowed)),
            )
            .service(
                web::resource("/issue")
                    .route(web::post().to(issue::post_issues))
                    .route(web::put().to(issue::put_issues))
                    .route(web::patch().to(issue::patch_issues))
                    .default_service(web::to(issue::method_not_allowed)),
            )
            .default_service(web::to(issue::unknown_route)),
    );
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body(BANNER)
}
