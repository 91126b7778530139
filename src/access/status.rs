// Decision → transport outcome lookup table.

use super::{Decision, Reason, ResourceKind};
use crate::error::ApiError;

/// Transport-neutral denial: status code plus client-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Denial {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, Clone, Copy)]
enum Message {
    Fixed(&'static str),
    /// "<Resource> not found."
    Missing,
}

const DENIALS: [(Reason, u16, Message); 4] = [
    (Reason::NotAuthenticated, 401, Message::Fixed("Unauthorized.")),
    (Reason::NotFound, 404, Message::Missing),
    (Reason::NotOwner, 403, Message::Fixed("Forbidden.")),
    (Reason::NotAdmin, 403, Message::Fixed("Forbidden.")),
];

impl Reason {
    /// Look up the denial for this reason. `Ok` has none and passes through.
    pub fn denial(self, kind: ResourceKind) -> Option<Denial> {
        DENIALS
            .iter()
            .find(|(reason, _, _)| *reason == self)
            .map(|(_, status, message)| Denial {
                status: *status,
                message: match message {
                    Message::Fixed(text) => (*text).to_string(),
                    Message::Missing => format!("{} not found.", kind.label()),
                },
            })
    }
}

impl Decision {
    pub fn denial(&self, kind: ResourceKind) -> Option<Denial> {
        self.reason().denial(kind)
    }

    /// `Ok(())` for an allow decision, otherwise the mapped [`ApiError`].
    pub fn into_result(self, kind: ResourceKind) -> Result<(), ApiError> {
        match self.denial(kind) {
            None => Ok(()),
            Some(denial) => {
                tracing::warn!(
                    "Access denied ({:?}) on {}: {}",
                    self.reason(),
                    kind.label(),
                    denial.status
                );
                Err(denial.into())
            }
        }
    }
}

impl From<Denial> for ApiError {
    fn from(denial: Denial) -> Self {
        match denial.status {
            401 => ApiError::unauthorized(denial.message),
            403 => ApiError::forbidden(denial.message),
            404 => ApiError::not_found(denial.message),
            _ => ApiError::internal_server_error(denial.message),
        }
    }
}
