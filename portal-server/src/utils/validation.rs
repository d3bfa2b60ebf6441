//! Input validation helpers
//!
//! Centralized text length constants plus the per-kind design field
//! rules. SQLite TEXT has no built-in length enforcement, so limits
//! live here.

use shared::error::AppError;
use shared::models::{DesignSpec, ServiceKind};

// ── Text length limits ──────────────────────────────────────────────

/// Design names
pub const MAX_NAME_LEN: usize = 200;

/// Free-text instructions, admin remarks
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: fabric, color type, placements, format codes
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Original filenames on uploads
pub const MAX_FILENAME_LEN: usize = 255;

/// Design-file extensions accepted for upload
pub const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "pdf", "ai", "eps", "svg", "psd", "cdr", "dst",
    "emb", "pes", "exp", "jef", "vp3", "xxx", "zip",
];

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Field-level checks common to every service kind: text lengths,
/// positive finite dimensions, non-negative color count.
pub fn validate_design_fields(design: &DesignSpec) -> Result<(), AppError> {
    validate_required_text(&design.design_name, "design_name", MAX_NAME_LEN)?;
    validate_optional_text(&design.fabric, "fabric", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&design.color_type, "color_type", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&design.instructions, "instructions", MAX_NOTE_LEN)?;

    for placement in &design.placements {
        validate_required_text(placement, "placement", MAX_SHORT_TEXT_LEN)?;
    }
    for format in &design.required_formats {
        validate_required_text(format, "required_format", MAX_SHORT_TEXT_LEN)?;
    }

    if let Some(width) = design.width
        && !(width.is_finite() && width > 0.0)
    {
        return Err(AppError::validation("width must be a positive number"));
    }
    if let Some(height) = design.height
        && !(height.is_finite() && height > 0.0)
    {
        return Err(AppError::validation("height must be a positive number"));
    }
    if let Some(count) = design.color_count
        && count < 0
    {
        return Err(AppError::validation("color_count must not be negative"));
    }

    Ok(())
}

/// Validate a design block against the rules of its service kind.
///
/// DIGITIZING and PATCHES require a color count and a fabric; VECTOR
/// requires a color type. Runs on create and again on every update that
/// touches the kind or any of these fields.
pub fn validate_design(kind: ServiceKind, design: &DesignSpec) -> Result<(), AppError> {
    validate_design_fields(design)?;

    match kind {
        ServiceKind::Digitizing | ServiceKind::Patches => {
            if design.color_count.is_none() {
                return Err(AppError::required_field("color_count"));
            }
            if design.fabric.as_deref().map(str::trim).unwrap_or("").is_empty() {
                return Err(AppError::required_field("fabric"));
            }
        }
        ServiceKind::Vector => {
            if design
                .color_type
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
            {
                return Err(AppError::required_field("color_type"));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digitizing_design() -> DesignSpec {
        DesignSpec {
            design_name: "Crest".to_string(),
            width: Some(3.0),
            height: Some(3.0),
            unit: None,
            color_count: Some(5),
            fabric: Some("twill".to_string()),
            color_type: None,
            placements: vec![],
            required_formats: vec![],
            instructions: None,
        }
    }

    #[test]
    fn test_digitizing_requires_fabric_and_color_count() {
        let mut design = digitizing_design();
        assert!(validate_design(ServiceKind::Digitizing, &design).is_ok());

        design.fabric = None;
        assert!(validate_design(ServiceKind::Digitizing, &design).is_err());

        design.fabric = Some("twill".to_string());
        design.color_count = None;
        assert!(validate_design(ServiceKind::Digitizing, &design).is_err());
        // Same rules for patches
        assert!(validate_design(ServiceKind::Patches, &design).is_err());
    }

    #[test]
    fn test_vector_requires_color_type() {
        let mut design = digitizing_design();
        design.color_type = None;
        assert!(validate_design(ServiceKind::Vector, &design).is_err());

        design.color_type = Some("SPOT".to_string());
        assert!(validate_design(ServiceKind::Vector, &design).is_ok());
    }

    #[test]
    fn test_rejects_blank_name_and_bad_dimensions() {
        let mut design = digitizing_design();
        design.design_name = "   ".to_string();
        assert!(validate_design(ServiceKind::Digitizing, &design).is_err());

        let mut design = digitizing_design();
        design.width = Some(-1.0);
        assert!(validate_design(ServiceKind::Digitizing, &design).is_err());

        let mut design = digitizing_design();
        design.width = Some(f64::NAN);
        assert!(validate_design(ServiceKind::Digitizing, &design).is_err());
    }
}
