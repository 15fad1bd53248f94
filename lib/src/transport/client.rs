use std::time::Duration;

use reqwest::Url;

use crate::Error;

// Request timeout, in seconds
pub(crate) const REQUEST_TIMEOUT: u64 = 30;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Raw provider response; status checks are left to the transport
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Decode the body as JSON
    pub fn json(&self) -> Result<serde_json::Value, Error> {
        serde_json::from_slice(&self.body).map_err(|e| e.into())
    }
}

/// Minimal HTTP capability a transport needs: a single JSON POST.
/// Implementations send `headers` as given and add none of their own.
pub trait HttpClient {
    fn post_json(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, Error>;
}

/// Blocking reqwest client used for real sends
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT))
            .build()?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn post_json(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<HttpResponse, Error> {
        let mut req = self
            .client
            .post(url.clone())
            .body(serde_json::to_vec(body)?);

        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let resp = req.send()?;
        let status = resp.status().as_u16();
        let body = resp.bytes()?.to_vec();

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use std::cell::RefCell;

    use super::*;

    /// A request as seen by `MockClient`
    #[derive(Clone, Debug)]
    pub struct Request {
        pub url: String,
        pub headers: Vec<(String, String)>,
        pub body: serde_json::Value,
    }

    impl Request {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        }
    }

    /// Records every request and answers with a canned response
    pub struct MockClient {
        status: u16,
        body: String,
        pub requests: RefCell<Vec<Request>>,
    }

    impl MockClient {
        pub fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                requests: RefCell::new(Vec::new()),
            }
        }

        pub fn last_request(&self) -> Request {
            self.requests
                .borrow()
                .last()
                .cloned()
                .expect("No request was sent")
        }
    }

    impl HttpClient for MockClient {
        fn post_json(
            &self,
            url: &Url,
            headers: &[(&str, &str)],
            body: &serde_json::Value,
        ) -> Result<HttpResponse, Error> {
            self.requests.borrow_mut().push(Request {
                url: url.to_string(),
                headers: headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                body: body.clone(),
            });

            Ok(HttpResponse {
                status: self.status,
                body: self.body.clone().into_bytes(),
            })
        }
    }

    /// Always fails as if the connection could not be made
    pub struct FailingClient;

    impl HttpClient for FailingClient {
        fn post_json(
            &self,
            _url: &Url,
            _headers: &[(&str, &str)],
            _body: &serde_json::Value,
        ) -> Result<HttpResponse, Error> {
            Err(Error::RequestError("connection refused".to_string()))
        }
    }
}
