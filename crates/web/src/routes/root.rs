use nano_http::protocol::{Request, Response};

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>nano-http</title>
    <style>
        body { font-family: sans-serif; margin: 40px; background-color: #f5f5f5; }
        .container { max-width: 800px; margin: 0 auto; background: white; padding: 30px; border-radius: 10px; }
        .endpoint { background: #f8f9fa; padding: 15px; margin: 10px 0; border-left: 4px solid #007bff; }
        .method { font-weight: bold; color: #007bff; }
        .path { font-family: monospace; color: #28a745; }
        .description { color: #666; margin-top: 5px; }
    </style>
</head>
<body>
    <div class="container">
        <h1>nano-http</h1>
        <p>A minimal HTTP/1.1 server.</p>

        <h2>Available Endpoints</h2>

        <div class="endpoint">
            <div><span class="method">GET</span> <span class="path">/</span></div>
            <div class="description">This page</div>
        </div>

        <div class="endpoint">
            <div><span class="method">GET</span> <span class="path">/health</span></div>
            <div class="description">Health check</div>
        </div>

        <div class="endpoint">
            <div><span class="method">GET/POST</span> <span class="path">/echo</span></div>
            <div class="description">Returns the request as JSON</div>
        </div>

        <div class="endpoint">
            <div><span class="method">GET</span> <span class="path">/static/*</span></div>
            <div class="description">Static files from the configured root</div>
        </div>
    </div>
</body>
</html>
"#;

/// The informational landing page.
pub fn root(_req: &Request) -> Response {
    let mut response = Response::new();
    response.set_html_response(INDEX_HTML);
    response
}
