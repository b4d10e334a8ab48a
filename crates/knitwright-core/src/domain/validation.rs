use crate::domain::{
    entities::StitchPattern,
    error::DomainError,
    instructions::TemplateSet,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across callers.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_pattern(pattern: &StitchPattern) -> Result<(), DomainError> {
        pattern.validate()
    }

    pub fn validate_templates(templates: &TemplateSet) -> Result<(), DomainError> {
        templates.validate()
    }
}
