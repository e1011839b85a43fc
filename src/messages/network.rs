//! Network messages - communication between App and Network layers

use crate::models::RequestDescriptor;
use crate::response::ResponseOutcome;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Send a snapshot of a descriptor; each send runs as its own task
    Send { id: u64, request: RequestDescriptor },
    /// Stop accepting commands; in-flight sends still complete
    Shutdown,
}

/// Responses sent from Network layer to App layer, in completion order
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    Completed { id: u64, outcome: ResponseOutcome },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Completed { id, .. } => *id,
        }
    }
}
