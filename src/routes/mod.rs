pub mod files;
pub mod health;
pub mod users;

use actix_web::web;

/// Route table, shared between the server binary and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/users")
                    .route("/register", web::post().to(users::register))
                    .route("/login", web::post().to(users::login)),
            )
            .service(
                web::scope("/files")
                    .route("", web::post().to(files::upload_file))
                    .route("", web::get().to(files::list_files))
                    .route("/multiple", web::post().to(files::upload_multiple))
                    .route("/{id}", web::get().to(files::download_file))
                    .route("/{id}", web::delete().to(files::delete_file)),
            ),
    );
}
