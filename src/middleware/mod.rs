//! The admission pipeline.
//!
//! Every request passes through the same fixed stage order:
//!
//! | # | stage | may short-circuit with |
//! |---|---|---|
//! | 1 | [`cors`] — origin decision, preflight | 403 rejection / 204 preflight |
//! | 2 | [`body`] — size-capped collect + decode | `PayloadTooLarge`, `PayloadInvalid` |
//! | 3 | [`trace`] — one structured log line | never |
//! | 4 | [`assets`] — `/data` static tree | the asset response |
//! | 5 | route dispatch | handler response / 404 |
//! | 6 | terminal error mapping | the 403/500 response |
//!
//! The ordering is load-bearing. Logging sits after admission and body
//! collection, so the log only ever records requests that were actually
//! admitted; grant headers are applied to whatever response comes out of
//! stages 2–5 — error responses included — because a browser will not
//! expose even a 500 to the requesting page without them.

pub mod assets;
pub mod body;
pub mod cors;
pub mod trace;

use http::StatusCode;

use crate::context::AppContext;
use crate::error::Error;
use crate::handler::ErasedHandler;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// Runs one request through the full pipeline. Infallible by construction:
/// every classified failure is mapped to a response before this returns.
pub async fn handle<B>(ctx: &AppContext, router: &Router, req: http::Request<B>) -> Response
where
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (parts, body_stream) = req.into_parts();
    let origin = cors::origin_of(&parts.headers);

    // Stage 1: no grant, no entry.
    let admission =
        match cors::admit(&ctx.origins, &parts.method, origin.as_deref(), &parts.headers) {
            Ok(admission) => admission,
            Err(rejection) => return rejection.into_response(),
        };
    let grant = match admission {
        cors::Admission::Preflight(response) => return response,
        cors::Admission::Granted(grant) => Some(grant),
        cors::Admission::SameOrigin => None,
    };

    let mut response = run(ctx, router, parts, body_stream, origin.as_deref())
        .await
        .unwrap_or_else(Error::into_response);

    if let Some(grant) = grant {
        grant.apply(&mut response);
    }
    response
}

/// Stages 2–5; any `Err` falls through to the terminal mapping above.
async fn run<B>(
    ctx: &AppContext,
    router: &Router,
    parts: http::request::Parts,
    body_stream: B,
    origin: Option<&str>,
) -> Result<Response, Error>
where
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let (bytes, payload) = body::read(&parts.headers, body_stream).await?;

    trace::record(&parts.method, parts.uri.path(), origin);

    // The asset tree answers reads only; other methods fall through to
    // dispatch (and 404 there).
    if parts.method == http::Method::GET || parts.method == http::Method::HEAD {
        if let Some(subpath) = assets::asset_subpath(parts.uri.path()) {
            return Ok(assets::serve(&ctx.config.data_dir, subpath).await);
        }
    }

    match router.lookup(&parts.method, parts.uri.path()) {
        Some((handler, params)) => {
            let request =
                Request::new(parts.method, parts.uri, parts.headers, bytes, payload, params);
            handler.call(request).await
        }
        None => Ok(Response::status(StatusCode::NOT_FOUND)),
    }
}
