//! Demo blog server
//!
//! Wires the framework pieces together: a router for the site's pages, the
//! asset handler as chain fallback, config and logger from the binary-side
//! modules.

use std::io;
use std::path::{Path, PathBuf};
use treeline::config::Config;
use treeline::http::{build_404_response, build_html_response, build_json_response, HttpResponse};
use treeline::render::{markdown, template};
use treeline::{logger, Application, AssetHandler, HandlerError, Router};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(
        cfg.logging.access_log_file.as_deref(),
        cfg.logging.error_log_file.as_deref(),
    )?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        println!("[CONFIG] Using {workers} worker threads");
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_app(&cfg);
    app.listen(&cfg.server.host, cfg.server.port).await?;
    Ok(())
}

/// Assemble the handler chain: routed pages first, static assets as
/// fallback for everything the router declines.
fn build_app(cfg: &Config) -> Application {
    let templates = PathBuf::from(&cfg.site.template_dir);
    let posts = PathBuf::from(&cfg.site.posts_dir);

    let mut router = Router::new();

    let dir = templates.clone();
    router.get("/", move |_req, _params| {
        let dir = dir.clone();
        async move { render_page(&dir, "index") }
    });

    let dir = templates;
    router.get("/about", move |_req, _params| {
        let dir = dir.clone();
        async move { render_page(&dir, "about") }
    });

    let dir = posts.clone();
    router.get("/posts/:id", move |_req, params| {
        let dir = dir.clone();
        async move {
            let id = params.get("id").cloned().unwrap_or_default();
            render_post(&dir, &id).await
        }
    });

    let dir = posts;
    router.get("/api/posts", move |_req, _params| {
        let dir = dir.clone();
        async move { list_posts(&dir).await }
    });

    Application::new()
        .mount(router)
        .mount(AssetHandler::new(&cfg.site.public_dir))
}

/// Render a named template, mapping a missing file to a 404.
fn render_page(template_dir: &Path, name: &str) -> Result<HttpResponse, HandlerError> {
    match template::render(template_dir, name) {
        Ok(html) => Ok(build_html_response(html)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(build_404_response()),
        Err(e) => Err(e.into()),
    }
}

/// Read `posts/{id}.md` and render it to HTML.
async fn render_post(posts_dir: &Path, id: &str) -> Result<HttpResponse, HandlerError> {
    // Post ids come from the URL; keep them to a single path component
    if id.is_empty() || id.contains(['/', '\\', '.']) {
        return Ok(build_404_response());
    }
    let file = posts_dir.join(format!("{id}.md"));
    match tokio::fs::read_to_string(&file).await {
        Ok(text) => Ok(build_html_response(markdown::to_html(&text))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(build_404_response()),
        Err(e) => Err(e.into()),
    }
}

/// List post ids (markdown file stems) as a JSON array.
async fn list_posts(posts_dir: &Path) -> Result<HttpResponse, HandlerError> {
    let mut ids = Vec::new();
    let mut entries = tokio::fs::read_dir(posts_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("md") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
    }
    ids.sort();
    Ok(build_json_response(serde_json::to_string(&ids)?))
}
