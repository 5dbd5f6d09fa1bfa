use bytes::Bytes;
use std::fmt::Write;
use strum::{EnumMessage, IntoStaticStr};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IntoStaticStr, EnumMessage)]
pub enum StatusCode {
    #[strum(serialize = "200", message = "OK")]
    Ok,
    #[strum(serialize = "400", message = "Bad Request")]
    BadRequest,
}

impl StatusCode {
    pub fn code(self) -> &'static str {
        self.into()
    }

    pub fn reason(self) -> &'static str {
        self.get_message().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status_code: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    pub fn from_status_code(status_code: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status_code,
            content_type: "text/plain",
            body: body.into(),
        }
    }

    /// The reply every well-formed request gets, whatever its method or path.
    pub fn hello() -> Self {
        Self::from_status_code(StatusCode::Ok, "Hello, World!")
    }

    pub fn bad_request() -> Self {
        Self::from_status_code(StatusCode::BadRequest, StatusCode::BadRequest.reason())
    }

    /// Serialises to `status line, Content-Type, blank line, body`. No
    /// `Content-Length` is sent; the connection is closed after writing.
    pub fn into_http(self) -> Bytes {
        let mut buf = String::with_capacity(64 + self.body.len());
        let status_code = self.status_code.code();
        let status_message = self.status_code.reason();
        let content_type = self.content_type;

        write!(
            buf,
            "HTTP/1.1 {status_code} {status_message}\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .expect("No reason to fail.");
        buf.push_str(&self.body);

        buf.into()
    }
}
