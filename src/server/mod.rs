//! HTTP front-end rendering pages on request

mod fallback;

pub use fallback::{resolve, DetailCache, DetailState};

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::cms::same_origin;
use crate::config::SiteConfig;
use crate::content::Cursor;
use crate::helpers::url_for;
use crate::pagination::PostList;
use crate::templates::{PageRenderer, ASSETS};
use crate::Blog;

/// Server state
struct ServerState {
    blog: Blog,
    pages: PageRenderer,
    details: DetailCache,
}

#[derive(Debug, Deserialize)]
struct MoreParams {
    cursor: Option<String>,
    /// Comma-separated uids the page already lists
    shown: Option<String>,
}

/// Body returned to the load-more script
#[derive(Debug, Serialize, Deserialize)]
pub struct MoreResponse {
    /// Rendered list entries to append
    pub html: String,
    /// Where to fetch the following page, if any
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16, open: bool) -> Result<()> {
    let app = router(blog.clone())?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the application router
pub fn router(blog: Blog) -> Result<Router> {
    let state = Arc::new(ServerState {
        pages: blog.renderer()?,
        details: DetailCache::new(blog.config.detail_cache_size),
        blog,
    });

    let mut routes = Router::new()
        .route("/", get(index_handler))
        .route("/posts/more", get(more_handler))
        .route("/post/:uid", get(post_handler));

    for asset in ASSETS {
        routes = routes.route(
            &format!("/{}", asset.path),
            get(move || async move { ([(header::CONTENT_TYPE, asset.content_type)], asset.body) }),
        );
    }

    let routes = routes
        .fallback(fallback_handler)
        .with_state(state.clone());

    let prefix = state.blog.config.root.trim_end_matches('/').to_string();
    let app = if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(&prefix, routes)
    };

    Ok(app.layer(TraceLayer::new_for_http()))
}

/// List page: the first page of posts
async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let list = match state.blog.first_page().await {
        Ok(list) => list,
        Err(e) => {
            tracing::error!("Failed to fetch posts: {}", e);
            return error_page(&state, StatusCode::BAD_GATEWAY, &e.to_string());
        }
    };

    let more = list
        .cursor()
        .as_str()
        .map(|cursor| more_url(&state.blog.config, cursor));

    html_page(
        StatusCode::OK,
        state.pages.render_index(list.posts(), more.as_deref()),
    )
}

/// Next page of the list, rendered as a fragment
async fn more_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<MoreParams>,
) -> Response {
    let cursor = params.cursor.unwrap_or_default();
    if cursor.is_empty() || !same_origin(&state.blog.config.api.endpoint, &cursor) {
        tracing::warn!("Rejected load-more cursor {:?}", cursor);
        return json_error(StatusCode::BAD_REQUEST, "invalid cursor");
    }

    let shown = params
        .shown
        .iter()
        .flat_map(|uids| uids.split(','))
        .filter(|uid| !uid.is_empty())
        .map(String::from);
    let mut list = PostList::resume(Cursor::new(Some(cursor)), shown);

    if let Err(e) = list.load_more(state.blog.api(), state.blog.mapper()).await {
        return json_error(StatusCode::BAD_GATEWAY, &e.to_string());
    }

    match state.pages.render_fragment(list.posts()) {
        Ok(html) => Json(MoreResponse {
            html,
            next: list
                .cursor()
                .as_str()
                .map(|cursor| more_url(&state.blog.config, cursor)),
        })
        .into_response(),
        Err(e) => {
            tracing::error!("Failed to render fragment: {}", e);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "render failed")
        }
    }
}

/// Post detail page
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(uid): Path<String>,
) -> Response {
    let mut current = state.details.get(&uid).await;

    if current.is_none() && state.details.claim(&uid).await {
        if state.blog.config.fallback {
            let background = state.clone();
            let key = uid.clone();
            tokio::spawn(async move {
                if let Err(e) = resolve(&background.blog, &background.details, &key).await {
                    tracing::error!("Failed to resolve post {:?}: {}", key, e);
                }
            });
            current = Some(DetailState::Resolving);
        } else {
            match resolve(&state.blog, &state.details, &uid).await {
                Ok(resolved) => current = Some(resolved),
                Err(e) => {
                    tracing::error!("Failed to resolve post {:?}: {}", uid, e);
                    state.details.abandon(&uid).await;
                    return error_page(&state, StatusCode::BAD_GATEWAY, &e.to_string());
                }
            }
        }
    }

    match current {
        Some(DetailState::Loaded(post)) => {
            html_page(StatusCode::OK, state.pages.render_post(&post))
        }
        Some(DetailState::NotFound) => {
            html_page(StatusCode::NOT_FOUND, state.pages.render_not_found())
        }
        // Reported once; the next request fetches again
        Some(DetailState::Failed(message)) => {
            state.details.abandon(&uid).await;
            error_page(&state, StatusCode::BAD_GATEWAY, &message)
        }
        // Someone else is resolving it
        Some(DetailState::Resolving) | None => {
            html_page(StatusCode::OK, state.pages.render_loading())
        }
    }
}

/// Fallback handler serving files from the static directory
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let mut service = ServeDir::new(&state.blog.static_dir);
    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => html_page(StatusCode::NOT_FOUND, state.pages.render_not_found()),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// URL of the fragment endpoint for a cursor
fn more_url(config: &SiteConfig, cursor: &str) -> String {
    format!(
        "{}?cursor={}",
        url_for(config, "posts/more"),
        utf8_percent_encode(cursor, NON_ALPHANUMERIC)
    )
}

fn html_page(status: StatusCode, rendered: Result<String>) -> Response {
    match rendered {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

fn error_page(state: &ServerState, status: StatusCode, message: &str) -> Response {
    html_page(status, state.pages.render_error(message))
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
