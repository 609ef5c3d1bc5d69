mod auth;
mod health_check;

use actix_web::http::Method;
use actix_web::{web, FromRequest, Handler, Responder, Route};

pub use auth::{login, refresh, register, AuthResponse, RegisterResponse, UserResponse};
pub use health_check::health_check;

/// One row of the route table.
pub struct RouteEntry {
    pub method: Method,
    pub path: &'static str,
    pub route: Route,
}

fn entry<F, Args>(method: Method, path: &'static str, handler: F) -> RouteEntry
where
    F: Handler<Args>,
    Args: FromRequest + 'static,
    F::Output: Responder + 'static,
{
    RouteEntry {
        route: web::route().method(method.clone()).to(handler),
        method,
        path,
    }
}

/// Every endpoint the service exposes.
pub fn route_table() -> Vec<RouteEntry> {
    vec![
        entry(Method::GET, "/health_check", health_check),
        entry(Method::POST, "/auth/register", register),
        entry(Method::POST, "/auth/login", login),
        entry(Method::POST, "/auth/refresh", refresh),
    ]
}
