//! Design attributes shared by orders and quotes

use super::catalog::MeasureUnit;
use serde::{Deserialize, Serialize};

/// Design attributes of a digitizing/vector/patch request.
///
/// Orders and quotes embed the same block; conversion copies it verbatim.
/// Which optional fields are required depends on the service kind and is
/// enforced by the validation layer, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSpec {
    pub design_name: String,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub unit: Option<MeasureUnit>,
    pub color_count: Option<i64>,
    pub fabric: Option<String>,
    pub color_type: Option<String>,
    #[serde(default)]
    pub placements: Vec<String>,
    #[serde(default)]
    pub required_formats: Vec<String>,
    pub instructions: Option<String>,
}

/// Partial update of a [`DesignSpec`]. `None` means "leave unchanged";
/// optional scalar fields cannot be cleared back to null through a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignPatch {
    pub design_name: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub unit: Option<MeasureUnit>,
    pub color_count: Option<i64>,
    pub fabric: Option<String>,
    pub color_type: Option<String>,
    pub placements: Option<Vec<String>>,
    pub required_formats: Option<Vec<String>>,
    pub instructions: Option<String>,
}

impl DesignPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge this patch into an existing design.
    pub fn apply(&self, design: &mut DesignSpec) {
        if let Some(name) = &self.design_name {
            design.design_name = name.clone();
        }
        if let Some(width) = self.width {
            design.width = Some(width);
        }
        if let Some(height) = self.height {
            design.height = Some(height);
        }
        if let Some(unit) = self.unit {
            design.unit = Some(unit);
        }
        if let Some(count) = self.color_count {
            design.color_count = Some(count);
        }
        if let Some(fabric) = &self.fabric {
            design.fabric = Some(fabric.clone());
        }
        if let Some(color_type) = &self.color_type {
            design.color_type = Some(color_type.clone());
        }
        if let Some(placements) = &self.placements {
            design.placements = placements.clone();
        }
        if let Some(formats) = &self.required_formats {
            design.required_formats = formats.clone();
        }
        if let Some(instructions) = &self.instructions {
            design.instructions = Some(instructions.clone());
        }
    }

    /// Whether the patch touches any field the per-kind validation
    /// rules depend on.
    pub fn touches_required_fields(&self) -> bool {
        self.color_count.is_some() || self.fabric.is_some() || self.color_type.is_some()
    }
}
