// src/serve/mod.rs

use anyhow::{bail, Result};
use std::{convert::Infallible, net::SocketAddr, path::PathBuf, process::Command};
use tracing::{info, warn};
use warp::{
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    reject::Rejection,
    reply::Reply,
    Filter,
};

use crate::config::{MAP_PAGE, VIEWER_PAGE};

/// Static file server settings.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub root: PathBuf,
    pub port: u16,
    pub open_browser: bool,
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::METHOD_NOT_ALLOWED
    };
    Ok(warp::reply::with_status(
        status.canonical_reason().unwrap_or_default(),
        status,
    ))
}

/// Matches `OPTIONS` only. Other methods are rejected as not-found rather than
/// method-not-allowed, so they do not outrank a missing-file rejection from
/// the file route.
fn preflight() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::method()
        .and_then(|method: Method| async move {
            if method == Method::OPTIONS {
                Ok(())
            } else {
                Err(warp::reject::not_found())
            }
        })
        .untuple_one()
}

/// Files under `root` for `GET`/`HEAD`, an empty 200 for every `OPTIONS`, and
/// CORS headers on every response including errors.
///
/// A directory path serves its `index.html`; no listings are generated.
pub fn routes(root: PathBuf) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let preflight = preflight().map(warp::reply);
    let files = warp::get()
        .or(warp::head())
        .unify()
        .and(warp::fs::dir(root));

    preflight
        .or(files)
        .recover(handle_rejection)
        .with(warp::reply::with::headers(cors_headers()))
}

/// Serve `opts.root` until Ctrl-C.
pub async fn serve(opts: ServeOptions) -> Result<()> {
    if !opts.root.is_dir() {
        bail!("serve root {} is not a directory", opts.root.display());
    }
    let root = opts.root.canonicalize().unwrap_or_else(|_| opts.root.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], opts.port));
    let (bound, server) = warp::serve(routes(root.clone()))
        .try_bind_with_graceful_shutdown(addr, async {
            tokio::signal::ctrl_c().await.ok();
        })?;

    let base = format!("http://localhost:{}", bound.port());
    info!(root = %root.display(), "server running at {}", base);
    info!("3D globe: {}/{}", base, VIEWER_PAGE);
    info!("2D map:   {}/{}", base, MAP_PAGE);

    if opts.open_browser {
        let viewer = format!("{}/{}", base, VIEWER_PAGE);
        match open_browser(&viewer) {
            Ok(()) => info!("opened {}", viewer),
            Err(e) => warn!(error = %e, "could not launch a browser"),
        }
    }

    server.await;
    info!("server stopped");
    Ok(())
}

/// Hand `url` to the platform's default browser.
fn open_browser(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut cmd = Command::new("open");
    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    };
    #[cfg(all(unix, not(target_os = "macos")))]
    let mut cmd = Command::new("xdg-open");

    cmd.arg(url).spawn().map(|_| ())
}
