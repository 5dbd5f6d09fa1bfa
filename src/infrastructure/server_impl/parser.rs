use crate::domain::errors::ParseError;
use crate::infrastructure::server_impl::request::{Headers, Request};

pub const CRLF: &str = "\r\n";

/// Parses a whole request message held in `raw`.
///
/// Lines are delimited by CRLF only; a bare `\n` stays part of the line it
/// appears in. The request line must be exactly three non-empty tokens
/// separated by single spaces. Header lines without a colon are skipped, and
/// everything after the first empty line is the body, CRLF-joined verbatim.
/// Nothing beyond `raw` is read, so a truncated message is parsed as given.
pub fn parse_http(raw: &str) -> Result<Request, ParseError> {
    let mut lines = raw.split(CRLF);
    let request_line = lines.next().ok_or(ParseError::EmptyRequest)?;
    let (method, path, version) = parse_request_line(request_line)?;

    let mut headers = Headers::new();
    for line in lines.by_ref() {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim(), value.trim());
        }
    }

    // whatever is left sits after the blank line, or nothing if none was found
    let body = lines.collect::<Vec<_>>().join(CRLF);

    Ok(Request {
        method: method.into(),
        path: path.to_string(),
        version: version.into(),
        headers,
        body,
    })
}

fn parse_request_line(line: &str) -> Result<(&str, &str, &str), ParseError> {
    let mut tokens = line.split(' ');
    match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
        (Some(method), Some(path), Some(version), None)
            if !method.is_empty() && !path.is_empty() && !version.is_empty() =>
        {
            Ok((method, path, version))
        }
        _ => Err(ParseError::MalformedRequestLine),
    }
}
