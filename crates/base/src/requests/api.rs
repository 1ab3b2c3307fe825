use crate::requests::entities::{HttpRequestData, RequestError};

pub trait SyncHttpRequest {
    fn call(&self, req: HttpRequestData) -> Result<String, RequestError>;
}
