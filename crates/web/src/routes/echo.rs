use nano_http::protocol::{FieldMap, Request, Response};
use serde::Serialize;
use tracing::error;

#[derive(Serialize)]
struct EchoBody<'a> {
    method: &'static str,
    path: &'a str,
    version: &'a str,
    headers: &'a FieldMap,
    query_params: &'a FieldMap,
    body: &'a str,
}

impl<'a> From<&'a Request> for EchoBody<'a> {
    fn from(req: &'a Request) -> Self {
        Self {
            method: req.method().as_str(),
            path: req.path(),
            version: req.version(),
            headers: req.headers(),
            query_params: req.query_params(),
            body: req.body(),
        }
    }
}

/// Reflects the request back as JSON, headers and query parameters in arrival order.
pub fn echo(req: &Request) -> Response {
    match serde_json::to_string_pretty(&EchoBody::from(req)) {
        Ok(json) => {
            let mut response = Response::new();
            response.set_json_response(json);
            response
        }
        Err(e) => {
            error!(cause = %e, "can't serialize echo body");
            Response::internal_error("Internal Server Error")
        }
    }
}
