use base::entities::order::OrderId;
use base::requests::entities::RequestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with a code {status}: {body}")]
    Server { status: u16, body: String },
    #[error("malformed orders response: {0}")]
    Malformed(String),
}

impl From<RequestError> for FetchError {
    fn from(e: RequestError) -> Self {
        match e {
            RequestError::Status { code, body, .. } => Self::Server { status: code, body },
            RequestError::Transport(reason) => Self::Network(reason),
        }
    }
}

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("failed to spool the ticket of the order {order_id}: {source}")]
    Spool {
        order_id: OrderId,
        #[source]
        source: std::io::Error,
    },
    #[error("the order {0} is not in the current listing")]
    UnknownOrder(OrderId),
}
