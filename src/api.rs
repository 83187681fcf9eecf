//! Plain actix handlers that sit next to the Leptos routes: the OAuth callback,
//! the static legal/support pages and legacy short links.
#[cfg(feature = "ssr")]
use actix_web::{http::header, web, HttpResponse};
#[cfg(feature = "ssr")]
use crate::auth::{callback_redirect, CallbackParams};
#[cfg(feature = "ssr")]
use crate::config::ServerConfig;
#[cfg(feature = "ssr")]
use leptos::logging::{error, log, warn};

/// Pages served from `<name>.html` fragments in the content directory.
pub const STATIC_PAGES: [&str; 5] = ["privacy", "terms", "support", "setup", "p"];

/// Wraps a stored fragment in the site's document shell. The fragment is inserted as-is.
pub fn page_shell(fragment: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1"/>
<title>Phenohunt</title>
<meta name="description" content="Phenotype hunting and cannabis breeding companion"/>
<link rel="icon" href="/app-icon.png"/>
<link rel="stylesheet" href="/pkg/phenohunt-web.css"/>
</head>
<body><div>{}</div></body>
</html>"#,
        fragment
    )
}

#[cfg(feature = "ssr")]
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/callback", web::get().to(auth_callback))
        .route("/s/{short_id}", web::get().to(short_link))
        .route(
            "/{page:privacy|terms|support|setup|p}",
            web::get().to(static_page),
        );
}

#[cfg(feature = "ssr")]
fn redirect_to(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[cfg(feature = "ssr")]
pub async fn auth_callback(query: web::Query<CallbackParams>) -> HttpResponse {
    let params = query.into_inner();
    let location = callback_redirect(&params);
    log!(
        "[API] OAuth callback (code present: {}) -> {}",
        params.code.is_some(),
        location.split('?').next().unwrap_or_default()
    );
    redirect_to(&location)
}

#[cfg(feature = "ssr")]
pub async fn static_page(config: web::Data<ServerConfig>, page: web::Path<String>) -> HttpResponse {
    let page = page.into_inner();
    if !STATIC_PAGES.contains(&page.as_str()) {
        return HttpResponse::NotFound().body("Not found");
    }
    let path = config.content_dir.join(format!("{}.html", page));
    match tokio::fs::read_to_string(&path).await {
        Ok(fragment) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(page_shell(&fragment)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("[API] Missing content fragment {}", path.display());
            HttpResponse::NotFound().body("Not found")
        }
        Err(e) => {
            error!("[API] Failed to read {}: {:?}", path.display(), e);
            HttpResponse::InternalServerError().body("Failed to load page")
        }
    }
}

#[cfg(feature = "ssr")]
pub async fn short_link(short_id: web::Path<String>) -> HttpResponse {
    log!("[API] Short link {}", short_id);
    redirect_to("/s.html")
}
