use crate::domain::{entities::GenerationRequest, error::DomainError};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_request(request: &GenerationRequest) -> Result<(), DomainError> {
        request.validate()
    }
}
