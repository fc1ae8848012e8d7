pub mod admin;
pub mod auth;
pub mod chat;
pub mod dispatch;
pub mod driver_portal;
pub mod drivers;
pub mod health;
pub mod service_orders;
pub mod vehicles;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree. `/ws`, `/health` and `/uploads` sit on the
/// root router.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current profile
///
/// /admin/users                                     list, create (admin only)
/// /admin/audit-logs                                query (admin only)
///
/// /ordens-servico                                  list, create
/// /ordens-servico/{id}                             get, update
///
/// /veiculos                                        list, create
/// /veiculos/{id}                                   get, update
///
/// /motoristas                                      list, create
/// /motoristas/{id}                                 get, update
///
/// /motoristas-ordem-servico                        list, assign
/// /motoristas-ordem-servico/{id}                   get, update (pending only)
/// /motoristas-ordem-servico/{id}/checklists        both checklists
///
/// /motorista/atribuicoes                           own assignments (driver)
/// /motorista/atribuicoes/{id}                      own assignment detail
/// /motorista/atribuicoes/{id}/checklist-saida      departure checklist (multipart)
/// /motorista/atribuicoes/{id}/checklist-chegada    arrival checklist (multipart)
/// /motorista/atribuicoes/{id}/checklists           both checklists
///
/// /chat/contacts                                   contacts with presence
/// /chat/conversations/{user_id}                    message history
/// /chat/conversations/{user_id}/read               mark read
/// /chat/messages                                   send
/// /chat/unread                                     unread counts by sender
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/ordens-servico", service_orders::router())
        .nest("/veiculos", vehicles::router())
        .nest("/motoristas", drivers::router())
        .nest("/motoristas-ordem-servico", dispatch::router())
        .nest("/motorista", driver_portal::router())
        .nest("/chat", chat::router())
}
