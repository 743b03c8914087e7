//! Board input and canonical layer naming
//!
//! Layers are keyed by canonical names (`F.Cu`, `In1.Cu`, `Edge.Cuts`, ...)
//! in insertion order. Documents can be placed explicitly or mapped from
//! their X2 file function, the filename, or an Altium-style extension.

use indexmap::IndexMap;

use crate::model::{DrillDocument, GerberDocument};

/// Name of the board outline layer
pub const EDGE_CUTS: &str = "Edge.Cuts";

/// Name addressing the drill documents collectively
pub const DRILL_LAYER: &str = "Drill";

pub fn is_outer_copper(layer: &str) -> bool {
    layer == "F.Cu" || layer == "B.Cu"
}

pub fn is_inner_copper(layer: &str) -> bool {
    layer.starts_with("In") && layer.ends_with(".Cu")
}

pub fn is_copper(layer: &str) -> bool {
    layer.ends_with(".Cu")
}

/// Gerber layers plus drill files for one DRC run
#[derive(Clone, Debug, Default)]
pub struct DrcBoardInput {
    layers: IndexMap<String, GerberDocument>,
    drills: Vec<DrillDocument>,
}

impl DrcBoardInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places `doc` under `name`, replacing any previous document there
    pub fn add_gerber_layer(&mut self, name: impl Into<String>, doc: GerberDocument) -> &mut Self {
        self.layers.insert(name.into(), doc);
        self
    }

    /// Places `doc` by its file function; unmapped documents are dropped
    pub fn add_gerber_layer_auto(&mut self, doc: GerberDocument) -> &mut Self {
        match doc.file_function().and_then(map_file_function) {
            Some(name) => {
                self.layers.insert(name, doc);
            }
            None => log::debug!(
                "[DRC] No layer for file function {:?}, document dropped",
                doc.file_function()
            ),
        }
        self
    }

    pub fn add_drill(&mut self, doc: DrillDocument) -> &mut Self {
        self.drills.push(doc);
        self
    }

    pub fn layers(&self) -> &IndexMap<String, GerberDocument> {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&GerberDocument> {
        self.layers.get(name)
    }

    pub fn drills(&self) -> &[DrillDocument] {
        &self.drills
    }

    /// Copper layers in insertion order
    pub fn copper_layers(&self) -> impl Iterator<Item = (&str, &GerberDocument)> {
        self.layers
            .iter()
            .filter(|(name, _)| is_copper(name))
            .map(|(name, doc)| (name.as_str(), doc))
    }

    pub fn copper_layer_count(&self) -> usize {
        self.copper_layers().count()
    }
}

/// Canonical layer for an X2 `.FileFunction` value
pub fn map_file_function(file_function: &str) -> Option<String> {
    let lower = file_function.trim().to_lowercase();

    if lower.starts_with("copper") {
        if lower.contains("top") || lower.contains("l1") {
            return Some("F.Cu".to_string());
        }
        if lower.contains("bot") || lower.contains("l2") {
            return Some("B.Cu".to_string());
        }
        // Copper,L3,Inr -> In2.Cu
        for part in file_function.split(',') {
            let part = part.trim();
            let digits = part.strip_prefix('L').or_else(|| part.strip_prefix('l'));
            if let Some(n) = digits.and_then(|d| d.parse::<u32>().ok()) {
                if n > 1 {
                    return Some(format!("In{}.Cu", n - 1));
                }
            }
        }
    }

    let sided = |top: &str, bottom: &str| {
        if lower.contains("top") {
            Some(top.to_string())
        } else if lower.contains("bot") {
            Some(bottom.to_string())
        } else {
            None
        }
    };

    if lower.starts_with("legend") || lower.starts_with("silkscreen") {
        if let Some(name) = sided("F.Silkscreen", "B.Silkscreen") {
            return Some(name);
        }
    }
    if lower.starts_with("soldermask") {
        if let Some(name) = sided("F.Mask", "B.Mask") {
            return Some(name);
        }
    }
    if lower.starts_with("paste") {
        if let Some(name) = sided("F.Paste", "B.Paste") {
            return Some(name);
        }
    }
    if lower.starts_with("profile") || lower.starts_with("outline") {
        return Some(EDGE_CUTS.to_string());
    }

    None
}

/// Filename substrings checked in order; first hit wins
const FILENAME_PATTERNS: &[(&[&str], &[&str], &str)] = &[
    (&["gtl", "f_cu"], &[".top"], "F.Cu"),
    (&["gbl", "b_cu"], &[".bot", ".bottom"], "B.Cu"),
    (&["g2", "in1"], &[], "In1.Cu"),
    (&["g3", "in2"], &[], "In2.Cu"),
    (&["gto", "f_silks"], &[], "F.Silkscreen"),
    (&["gbo", "b_silks"], &[], "B.Silkscreen"),
    (&["gts", "f_mask"], &[], "F.Mask"),
    (&["gbs", "b_mask"], &[], "B.Mask"),
    (&["gtp", "f_paste"], &[], "F.Paste"),
    (&["gbp", "b_paste"], &[], "B.Paste"),
    (&["gko", "gm1", "edge"], &[], EDGE_CUTS),
];

/// Canonical layer guessed from common CAD export filenames
pub fn map_filename_to_layer(filename: &str) -> Option<String> {
    let lower = filename.to_lowercase();
    FILENAME_PATTERNS
        .iter()
        .find(|(contains, ends, _)| {
            contains.iter().any(|p| lower.contains(p)) || ends.iter().any(|s| lower.ends_with(s))
        })
        .map(|(_, _, layer)| layer.to_string())
}

/// Canonical layer for an Altium Gerber extension (`.GTL`, `.G1`, `.GP2`, ...)
pub fn map_altium_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let layer = match ext.to_uppercase().as_str() {
        "GTL" => "F.Cu",
        "GBL" => "B.Cu",
        "GTO" => "F.Silkscreen",
        "GBO" => "B.Silkscreen",
        "GTS" => "F.Mask",
        "GBS" => "B.Mask",
        "GTP" => "F.Paste",
        "GBP" => "B.Paste",
        "GKO" => EDGE_CUTS,
        "G1" => "In1.Cu",
        "G2" => "In2.Cu",
        "G3" => "In3.Cu",
        "G4" => "In4.Cu",
        "GP1" => "In5.Cu",
        "GP2" => "In6.Cu",
        "GP3" => "In7.Cu",
        "GP4" => "In8.Cu",
        // GM*, GPT/GPB, GD*/GG*, APR/APT and panel files carry no layer
        _ => return None,
    };
    Some(layer.to_string())
}

/// File function first, then filename conventions, then Altium extension
pub fn detect_layer(file_function: Option<&str>, filename: Option<&str>) -> Option<String> {
    file_function
        .and_then(map_file_function)
        .or_else(|| filename.and_then(map_filename_to_layer))
        .or_else(|| filename.and_then(map_altium_extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Unit;

    #[test]
    fn test_layer_predicates() {
        assert!(is_outer_copper("F.Cu") && is_outer_copper("B.Cu"));
        assert!(!is_outer_copper("In1.Cu"));
        assert!(is_inner_copper("In3.Cu"));
        assert!(!is_inner_copper("F.Cu"));
        assert!(is_copper("In1.Cu") && is_copper("B.Cu"));
        assert!(!is_copper("F.Silkscreen"));
    }

    #[test]
    fn test_map_file_function() {
        assert_eq!(map_file_function("Copper,L1,Top").as_deref(), Some("F.Cu"));
        assert_eq!(map_file_function("Copper,L2,Bot").as_deref(), Some("B.Cu"));
        assert_eq!(map_file_function("Copper,L3,Inr").as_deref(), Some("In2.Cu"));
        assert_eq!(map_file_function("Copper,L5,Inr").as_deref(), Some("In4.Cu"));
        assert_eq!(map_file_function("Legend,Top").as_deref(), Some("F.Silkscreen"));
        assert_eq!(map_file_function("Soldermask,Bot").as_deref(), Some("B.Mask"));
        assert_eq!(map_file_function("Paste,Top").as_deref(), Some("F.Paste"));
        assert_eq!(map_file_function("Profile,NP").as_deref(), Some("Edge.Cuts"));
        assert_eq!(map_file_function("Drillmap"), None);
    }

    #[test]
    fn test_map_filename_to_layer() {
        assert_eq!(map_filename_to_layer("board-F_Cu.gbr").as_deref(), Some("F.Cu"));
        assert_eq!(map_filename_to_layer("BOARD.GBL").as_deref(), Some("B.Cu"));
        assert_eq!(map_filename_to_layer("panel.bottom").as_deref(), Some("B.Cu"));
        assert_eq!(map_filename_to_layer("board-Edge_Cuts.gbr").as_deref(), Some("Edge.Cuts"));
        assert_eq!(map_filename_to_layer("readme.txt"), None);
    }

    #[test]
    fn test_map_altium_extension() {
        assert_eq!(map_altium_extension("board.GTO").as_deref(), Some("F.Silkscreen"));
        assert_eq!(map_altium_extension("board.g3").as_deref(), Some("In3.Cu"));
        assert_eq!(map_altium_extension("board.GP2").as_deref(), Some("In6.Cu"));
        assert_eq!(map_altium_extension("board.GM1"), None);
        assert_eq!(map_altium_extension("noext"), None);
        assert_eq!(map_altium_extension("trailing."), None);
    }

    #[test]
    fn test_detect_layer_cascade() {
        assert_eq!(
            detect_layer(Some("Copper,L1,Top"), Some("x.GBL")).as_deref(),
            Some("F.Cu")
        );
        assert_eq!(detect_layer(None, Some("x.GBL")).as_deref(), Some("B.Cu"));
        assert_eq!(detect_layer(Some("Other"), Some("board.GP1")).as_deref(), Some("In5.Cu"));
        assert_eq!(detect_layer(None, None), None);
    }

    #[test]
    fn test_board_preserves_insertion_order() {
        let mut board = DrcBoardInput::new();
        board
            .add_gerber_layer("B.Cu", GerberDocument::new(Unit::Millimeters))
            .add_gerber_layer("F.Silkscreen", GerberDocument::new(Unit::Millimeters))
            .add_gerber_layer_auto(
                GerberDocument::new(Unit::Millimeters).with_file_function("Copper,L1,Top"),
            )
            .add_gerber_layer_auto(GerberDocument::new(Unit::Millimeters));

        let names: Vec<&String> = board.layers().keys().collect();
        assert_eq!(names, vec!["B.Cu", "F.Silkscreen", "F.Cu"]);
        assert_eq!(board.copper_layer_count(), 2);
        assert!(board.layer("F.Cu").is_some());
        assert!(board.layer("f.cu").is_none());
    }
}
