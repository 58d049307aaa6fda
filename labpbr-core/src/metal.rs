//! Predefined metal IDs of the LabPBR specular green channel.
//!
//! Values 230..=255 mark a pixel as metal. The first eight IDs name a
//! specific metal with a reference F0 colour; the transcoder only needs the
//! range check, the table is kept for reporting.

use serde::Serialize;

/// First green-channel value of the reserved metal range
pub const METAL_ID_MIN: u8 = 230;

/// A named metal with its linear F0 reflectance colour
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetalDefinition {
    pub id: u8,
    pub name: &'static str,
    pub f0: [f32; 3],
}

pub const METAL_DEFINITIONS: [MetalDefinition; 8] = [
    MetalDefinition { id: 230, name: "iron", f0: [0.56, 0.57, 0.58] },
    MetalDefinition { id: 231, name: "gold", f0: [1.00, 0.78, 0.34] },
    MetalDefinition { id: 232, name: "aluminum", f0: [0.91, 0.92, 0.92] },
    MetalDefinition { id: 233, name: "chrome", f0: [0.55, 0.56, 0.56] },
    MetalDefinition { id: 234, name: "copper", f0: [0.95, 0.64, 0.54] },
    MetalDefinition { id: 235, name: "lead", f0: [0.63, 0.63, 0.66] },
    MetalDefinition { id: 236, name: "platinum", f0: [0.67, 0.69, 0.66] },
    MetalDefinition { id: 237, name: "silver", f0: [0.95, 0.93, 0.88] },
];

/// True for any value in the reserved metal range, named or not.
pub fn is_metal_id(value: u8) -> bool {
    value >= METAL_ID_MIN
}

/// Look up the named metal for an exact green-channel value.
pub fn metal_for(value: u8) -> Option<&'static MetalDefinition> {
    METAL_DEFINITIONS.iter().find(|m| m.id == value)
}
