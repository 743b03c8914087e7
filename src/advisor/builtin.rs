//! Manufacturer tier ladders bundled with the crate

use once_cell::sync::Lazy;

use super::profile::{ManufacturerProfile, ManufacturingTier};

fn tier(
    name: &str,
    order: i32,
    trace_space_mm: Option<f64>,
    hole_mm: f64,
    description: &str,
) -> ManufacturingTier {
    ManufacturingTier {
        name: name.to_string(),
        order,
        min_trace_width_mm: trace_space_mm,
        min_space_mm: trace_space_mm,
        min_hole_size_mm: Some(hole_mm),
        description: description.to_string(),
    }
}

static NEXTPCB_2_LAYER: Lazy<ManufacturerProfile> = Lazy::new(|| {
    ManufacturerProfile::builtin(
        "NextPCB 2-Layer",
        vec![
            tier("Standard", 0, Some(0.127), 0.3, "Standard 2-layer: >= 5/5mil trace/space, >= 0.3mm holes"),
            tier("Advanced", 1, Some(0.1016), 0.2, "Advanced 2-layer: >= 4/4mil trace/space, >= 0.2mm holes"),
            tier("HDI", 2, None, 0.15, "HDI 2-layer: < 4mil trace/space, >= 0.15mm holes"),
        ],
    )
});

static NEXTPCB_4_LAYER: Lazy<ManufacturerProfile> = Lazy::new(|| {
    ManufacturerProfile::builtin(
        "NextPCB 4-Layer",
        vec![
            tier("Standard", 0, Some(0.2032), 0.3, "Standard 4-layer: >= 8/8mil trace/space, >= 0.3mm holes"),
            tier("Advanced", 1, Some(0.1524), 0.2, "Advanced 4-layer: >= 6/6mil trace/space, >= 0.2mm holes"),
            tier("Fine", 2, Some(0.1016), 0.2, "Fine 4-layer: >= 4/4mil trace/space, >= 0.2mm holes"),
            tier("HDI", 3, None, 0.15, "HDI 4-layer: < 4mil trace/space, >= 0.15mm holes"),
        ],
    )
});

/// Standard 5/5 mil, Advanced 4/4 mil, HDI below that
pub fn nextpcb_2_layer() -> &'static ManufacturerProfile {
    &NEXTPCB_2_LAYER
}

/// Standard 8/8 mil, Advanced 6/6 mil, Fine 4/4 mil, HDI below that
pub fn nextpcb_4_layer() -> &'static ManufacturerProfile {
    &NEXTPCB_4_LAYER
}

/// Ladder matching a copper layer count
pub fn nextpcb_for_layers(copper_layers: usize) -> &'static ManufacturerProfile {
    if copper_layers > 2 {
        nextpcb_4_layer()
    } else {
        nextpcb_2_layer()
    }
}
