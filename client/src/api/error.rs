//! Routing and decoding failures raised by the gateway.
//!
//! These are distinct from handler failures, which travel inside an
//! unsuccessful [`ApiResponse`](super::ApiResponse) envelope.

use thiserror::Error;

use crate::domain::Error;

use super::Method;

/// Failure to route, parse, or decode a gateway exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// No handler exists for the method and path.
    #[error("no route for {method} {endpoint}")]
    UnhandledRoute {
        /// Verb of the request.
        method: Method,
        /// Endpoint as given by the caller.
        endpoint: String,
    },
    /// A path parameter or query value could not be parsed.
    #[error("invalid path {endpoint}: {message}")]
    InvalidPath {
        /// Endpoint as given by the caller.
        endpoint: String,
        /// What failed to parse.
        message: String,
    },
    /// The request body does not match the route's payload.
    #[error("invalid payload for {endpoint}: {message}")]
    InvalidPayload {
        /// Endpoint as given by the caller.
        endpoint: String,
        /// Deserialisation failure.
        message: String,
    },
    /// Response data did not have the expected shape.
    #[error("could not decode response data: {message}")]
    Decode {
        /// Deserialisation failure.
        message: String,
    },
}

impl From<GatewayError> for Error {
    fn from(value: GatewayError) -> Self {
        let message = value.to_string();
        match value {
            GatewayError::UnhandledRoute { .. } => Self::not_found(message),
            GatewayError::InvalidPath { .. } | GatewayError::InvalidPayload { .. } => {
                Self::invalid_request(message)
            }
            GatewayError::Decode { .. } => Self::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(
        GatewayError::UnhandledRoute { method: Method::Get, endpoint: "/nope".to_owned() },
        ErrorCode::NotFound
    )]
    #[case(
        GatewayError::InvalidPath { endpoint: "/books/x".to_owned(), message: "bad id".to_owned() },
        ErrorCode::InvalidRequest
    )]
    #[case(GatewayError::Decode { message: "eof".to_owned() }, ErrorCode::InternalError)]
    fn maps_to_domain_codes(#[case] error: GatewayError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(error).code(), expected);
    }

    #[test]
    fn unhandled_route_names_method_and_path() {
        let error = GatewayError::UnhandledRoute {
            method: Method::Get,
            endpoint: "/books/999/nonexistent".to_owned(),
        };
        assert_eq!(error.to_string(), "no route for GET /books/999/nonexistent");
    }
}
