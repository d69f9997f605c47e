//! Radix-tree request router with prefix mounting.
//!
//! One tree per HTTP method, O(path-length) lookup. On top of the trees
//! sits a mount table: [`Router::nest`] delegates an entire path prefix to
//! another router, the way the application hands `/api/auth`, `/api/user`,
//! `/api/quiz-results`, and `/api/collections` to their feature route sets.
//! A mounted router sees the path with the prefix stripped and is reached
//! only after the admission pipeline has run.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};

/// The application router.
///
/// Build it once at startup; every [`Router::on`] and [`Router::nest`] call
/// returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    mounts: Vec<(String, Arc<Router>)>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), mounts: Vec::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for
    /// chaining. Path parameters use `{name}` syntax — `req.param("name")`
    /// retrieves them.
    ///
    /// # Panics
    ///
    /// Panics on a malformed or conflicting route pattern; routes are
    /// static application wiring, so this is a startup-time bug.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn patch(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PATCH, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    /// Mounts `router` under `prefix`: a request for `{prefix}/x` is looked
    /// up in `router` as `/x`. The longest matching prefix wins when mounts
    /// overlap. The prefix itself (no trailing segment) resolves as `/`.
    pub fn nest(mut self, prefix: &str, router: Router) -> Self {
        let prefix = prefix.trim_end_matches('/').to_owned();
        assert!(
            prefix.starts_with('/'),
            "mount prefix `{prefix}` must start with `/`"
        );
        self.mounts.push((prefix, Arc::new(router)));
        self
    }

    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        if let Some(tree) = self.routes.get(method) {
            if let Ok(matched) = tree.at(path) {
                let params = matched
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect();
                return Some((Arc::clone(matched.value), params));
            }
        }

        // Longest-prefix delegation to a mounted route set.
        let mut best: Option<(&str, &Arc<Router>)> = None;
        for (prefix, router) in &self.mounts {
            let rest_starts_clean = path.len() == prefix.len()
                || path.as_bytes().get(prefix.len()) == Some(&b'/');
            if path.starts_with(prefix.as_str())
                && rest_starts_clean
                && best.is_none_or(|(b, _)| prefix.len() > b.len())
            {
                best = Some((prefix, router));
            }
        }

        let (prefix, router) = best?;
        let rest = &path[prefix.len()..];
        let rest = if rest.is_empty() { "/" } else { rest };
        router.lookup(method, rest)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::handler::ErasedHandler;
    use crate::request::{Payload, Request};
    use crate::response::Response;
    use bytes::Bytes;
    use http::{HeaderMap, StatusCode, Uri};

    async fn ok(_req: Request) -> Result<Response, Error> {
        Ok(Response::text("ok"))
    }

    async fn named(req: Request) -> Result<Response, Error> {
        Ok(Response::text(req.param("id").unwrap_or("?").to_owned()))
    }

    fn request_for(path: &str, params: HashMap<String, String>) -> Request {
        Request::new(
            Method::GET,
            path.parse::<Uri>().unwrap(),
            HeaderMap::new(),
            Bytes::new(),
            Payload::Empty,
            params,
        )
    }

    #[tokio::test]
    async fn exact_routes_match_per_method() {
        let router = Router::new().get("/api/health", ok);
        assert!(router.lookup(&Method::GET, "/api/health").is_some());
        assert!(router.lookup(&Method::POST, "/api/health").is_none());
        assert!(router.lookup(&Method::GET, "/api/nope").is_none());
    }

    #[tokio::test]
    async fn path_params_are_captured() {
        let router = Router::new().get("/quiz/{id}", named);
        let (handler, params) = router.lookup(&Method::GET, "/quiz/42").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));

        let res = handler.call(request_for("/quiz/42", params)).await.unwrap();
        assert_eq!(res.body(), b"42");
    }

    #[tokio::test]
    async fn nested_routers_see_stripped_paths() {
        let auth = Router::new().post("/login", ok).get("/", ok);
        let router = Router::new().nest("/api/auth", auth);

        assert!(router.lookup(&Method::POST, "/api/auth/login").is_some());
        // The bare mount prefix resolves as the nested root.
        assert!(router.lookup(&Method::GET, "/api/auth").is_some());
        // Prefix must end at a segment boundary.
        assert!(router.lookup(&Method::POST, "/api/authx/login").is_none());
        assert!(router.lookup(&Method::POST, "/api/auth/logout").is_none());
    }

    #[tokio::test]
    async fn longest_mount_prefix_wins() {
        async fn outer(_req: Request) -> Result<Response, Error> {
            Ok(Response::status(StatusCode::NOT_FOUND))
        }
        let api = Router::new().get("/deep", outer);
        let deep = Router::new().get("/", ok);

        let router = Router::new().nest("/api", api).nest("/api/deep", deep);
        let (handler, _) = router.lookup(&Method::GET, "/api/deep").unwrap();
        let res = handler
            .call(request_for("/api/deep", HashMap::new()))
            .await
            .unwrap();
        assert_eq!(res.body(), b"ok");
    }

    #[tokio::test]
    async fn empty_route_set_falls_through() {
        let router = Router::new().nest("/api/collections", Router::new());
        assert!(router.lookup(&Method::GET, "/api/collections/77").is_none());
    }
}
