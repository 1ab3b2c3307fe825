use crate::requests::api::SyncHttpRequest;
use crate::requests::entities::{HttpRequestData, HttpRequestMethod, RequestError};
use ureq::{Agent, Error, Response};

/// Blocking HTTP client. Keeps one agent so that repeated polls reuse connections.
pub struct UreqRequestApi {
    agent: Agent,
}

impl Default for UreqRequestApi {
    fn default() -> Self {
        Self { agent: Agent::new() }
    }
}

impl UreqRequestApi {
    pub fn new() -> Self {
        Default::default()
    }
}

fn method_name(method: &HttpRequestMethod) -> &'static str {
    match method {
        HttpRequestMethod::Get => "GET",
        HttpRequestMethod::Post => "POST",
    }
}

fn read_body(resp: Response) -> Result<String, RequestError> {
    resp.into_string()
        .map_err(|e| RequestError::Transport(format!("failed to read the response: {}", e)))
}

impl SyncHttpRequest for UreqRequestApi {
    fn call(&self, req: HttpRequestData) -> Result<String, RequestError> {
        let mut request = self.agent.request(method_name(&req.method), &req.url);

        for (header, value) in req.headers.iter().flatten() {
            request = request.set(header, value);
        }

        for (param, value) in req.queries.iter().flatten() {
            request = request.query(param, value);
        }

        let res = match req.body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        match res {
            Ok(resp) => read_body(resp),
            Err(Error::Status(code, resp)) => Err(RequestError::Status {
                url: resp.get_url().to_string(),
                code,
                body: resp.into_string().unwrap_or_default(),
            }),
            Err(e) => Err(RequestError::Transport(e.to_string())),
        }
    }
}
