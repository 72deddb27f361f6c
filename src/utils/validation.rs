use crate::domain::model::{OutputFormat, PricingInput};
use crate::utils::error::{PricingError, Result};
use std::collections::HashSet;

pub const MIN_PRODUCT_NAME_LEN: usize = 2;
/// Smallest accepted unit cost. Anything cheaper can round to a zero price.
pub const MIN_BASE_COST: f64 = 0.01;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Accepts finite values strictly greater than zero.
pub fn validate_positive_amount(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a positive number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[OutputFormat]) -> Result<()> {
    if formats.is_empty() {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one output format is required".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for format in formats {
        if !seen.insert(format) {
            return Err(PricingError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.extension().to_string(),
                reason: "Output format listed more than once".to_string(),
            });
        }
    }

    Ok(())
}

/// Archive names must be a bare `*.zip` file name inside the output path.
pub fn validate_archive_filename(field_name: &str, filename: &str) -> Result<()> {
    validate_non_empty_string(field_name, filename)?;

    let path = std::path::Path::new(filename);
    if path.components().count() != 1 {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: filename.to_string(),
            reason: "Archive name must not contain directories".to_string(),
        });
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("zip") => Ok(()),
        _ => Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: filename.to_string(),
            reason: "Archive name must end in .zip".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PricingError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

impl Validate for PricingInput {
    fn validate(&self) -> Result<()> {
        if self.name.trim().chars().count() < MIN_PRODUCT_NAME_LEN {
            return Err(PricingError::ValidationError {
                message: format!(
                    "Product name '{}' must be at least {} characters",
                    self.name, MIN_PRODUCT_NAME_LEN
                ),
            });
        }

        validate_positive_amount("base_cost", self.base_cost).map_err(|_| {
            PricingError::ValidationError {
                message: format!(
                    "Base cost for '{}' must be a positive number, got {}",
                    self.name, self.base_cost
                ),
            }
        })?;

        if self.base_cost < MIN_BASE_COST {
            return Err(PricingError::ValidationError {
                message: format!(
                    "Base cost for '{}' must be at least {:.2}, got {}",
                    self.name, MIN_BASE_COST, self.base_cost
                ),
            });
        }

        Ok(())
    }
}
