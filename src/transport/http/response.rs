//! HTTP response encoding

/// A complete response; every response closes the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub reason: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl Response {
    fn new(status: u16, reason: &'static str) -> Self {
        Self {
            status,
            reason,
            headers: vec![],
            body: String::new(),
        }
        .header("Connection", "close")
    }

    fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// 200 with an HTML body
    pub fn html(body: String) -> Self {
        let mut response = Self::new(200, "OK");
        response
            .headers
            .insert(0, ("Content-Type", "text/html; charset=utf-8".to_string()));
        response.body = body;
        response
    }

    /// 302 to `location`
    pub fn redirect(location: &str) -> Self {
        let mut response = Self::new(302, "Found");
        response.headers.insert(0, ("Location", location.to_string()));
        response
    }

    pub fn no_content() -> Self {
        Self::new(204, "No Content")
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Wire format: status line, headers, blank line, body
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!("HTTP/1.1 {} {}\r\n", self.status, self.reason);
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str("\r\n");
        }
        out.push_str("\r\n");
        out.push_str(&self.body);
        out.into_bytes()
    }
}
