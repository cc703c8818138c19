use axum::{
    extract::DefaultBodyLimit,
    response::Html,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod payments;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
}

pub fn app(state: Arc<AppState>) -> Router {
    let max_file_size = state.config.max_file_size;
    Router::new()
        .merge(routes())
        .merge(payments::routes())
        .layer(DefaultBodyLimit::max(max_file_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="pt-BR">
  <head>
    <meta charset="utf-8" />
    <title>Filtragem de Pagamentos</title>
    <style>
      body { font-family: sans-serif; max-width: 32rem; margin: 3rem auto; }
      label { display: block; margin-top: 1rem; }
      input { width: 100%; }
      button { margin-top: 1.5rem; margin-right: 0.5rem; }
    </style>
  </head>
  <body>
    <h1>Filtragem de Pagamentos</h1>
    <form method="post" action="/payments/filter" enctype="multipart/form-data">
      <label>Usuário <input type="text" name="username" autocomplete="username" /></label>
      <label>Senha <input type="password" name="password" autocomplete="current-password" /></label>
      <label>Carregue o arquivo Excel <input type="file" name="file" accept=".xls,.xlsx" /></label>
      <button type="submit" formaction="/payments/preview">Visualizar</button>
      <button type="submit">Baixar arquivo filtrado</button>
    </form>
  </body>
</html>
"#;
