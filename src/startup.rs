use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{middleware::Logger, web, App, HttpRequest, HttpResponse, HttpServer};
use sqlx::PgPool;

use crate::configuration::AuthSettings;
use crate::routes::route_table;
use crate::service::AuthService;
use crate::users::postgres::{PgCredentialStore, PgProfileStore};
use crate::users::UserDirectory;

/// Wire the Postgres-backed stores into an `AuthService`.
pub fn build_service(settings: &AuthSettings, pool: PgPool) -> AuthService {
    let directory = UserDirectory::new(
        Arc::new(PgProfileStore::new(pool.clone())),
        Arc::new(PgCredentialStore::new(pool)),
    );
    AuthService::new(settings, directory)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Malformed request body");
    let body = serde_json::json!({
        "ok": false,
        "code": "MALFORMED_REQUEST",
        "cause": err.to_string(),
    });
    InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
}

pub fn run(listener: TcpListener, service: AuthService) -> Result<Server, std::io::Error> {
    let service = web::Data::new(service);

    let server = HttpServer::new(move || {
        let app = App::new()
            .wrap(Logger::default())
            .app_data(service.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler));

        route_table()
            .into_iter()
            .fold(app, |app, entry| app.route(entry.path, entry.route))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
