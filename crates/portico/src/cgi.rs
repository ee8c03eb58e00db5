//! CGI/1.1 request decoding and response encoding.

use std::io::{self, Write};

use portico_router::{Request, Response};

/// Default content type, matching what a classic front controller emits.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Builds a request from CGI meta-variables.
///
/// `var` looks up a meta-variable (normally `std::env::var`). The request
/// URI falls back to `PATH_INFO` plus `QUERY_STRING` when the server does
/// not set `REQUEST_URI`.
pub fn request_from_env(var: impl Fn(&str) -> Option<String>, body: Vec<u8>) -> Request {
    let method = var("REQUEST_METHOD").unwrap_or_else(|| "GET".to_string());
    let uri = var("REQUEST_URI").unwrap_or_else(|| {
        let path = var("PATH_INFO")
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "/".to_string());
        match var("QUERY_STRING").filter(|q| !q.is_empty()) {
            Some(query) => format!("{path}?{query}"),
            None => path,
        }
    });

    let mut request = Request::new(method, uri).body(body);
    for (meta, header) in [("HTTP_COOKIE", "Cookie"), ("CONTENT_TYPE", "Content-Type")] {
        if let Some(value) = var(meta) {
            request = request.header(header, value);
        }
    }
    request
}

/// Number of body bytes announced by `CONTENT_LENGTH`.
pub fn content_length(var: impl Fn(&str) -> Option<String>) -> usize {
    var("CONTENT_LENGTH")
        .and_then(|len| len.trim().parse().ok())
        .unwrap_or(0)
}

/// Writes a CGI response: `Status:` line, headers, blank line, body.
pub fn write_response(out: &mut impl Write, response: &Response) -> io::Result<()> {
    write!(
        out,
        "Status: {} {}\r\n",
        response.status,
        response.status_text()
    )?;
    write_headers(out, response)?;
    out.write_all(&response.body)?;
    out.flush()
}

/// Writes the response as a raw HTTP/1.1 message.
pub fn write_http(out: &mut impl Write, response: &Response) -> io::Result<()> {
    write!(
        out,
        "HTTP/1.1 {} {}\r\n",
        response.status,
        response.status_text()
    )?;
    write_headers(out, response)?;
    out.write_all(&response.body)?;
    out.flush()
}

fn write_headers(out: &mut impl Write, response: &Response) -> io::Result<()> {
    let mut headers: Vec<(&String, &String)> = response.headers.iter().collect();
    headers.sort();

    if !response
        .headers
        .keys()
        .any(|k| k.eq_ignore_ascii_case("Content-Type"))
    {
        write!(out, "Content-Type: {DEFAULT_CONTENT_TYPE}\r\n")?;
    }
    for (name, value) in headers {
        write!(out, "{name}: {value}\r\n")?;
    }
    out.write_all(b"\r\n")
}
