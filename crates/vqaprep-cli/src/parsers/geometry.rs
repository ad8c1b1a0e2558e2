//! Target size and pad anchor parsing.

use vqaprep_core::{PadAnchor, TargetSize};

/// Parse a target size in format "HEIGHTxWIDTH"
///
/// Accepts `x`, `X` or `,` as the separator, e.g. `480x640` or `480,640`.
pub fn parse_target_size(size_str: &str) -> Result<TargetSize, String> {
    let parts: Vec<&str> = size_str
        .split(|c| c == 'x' || c == 'X' || c == ',')
        .collect();
    if parts.len() != 2 {
        return Err(format!(
            "Target size must be in format HEIGHTxWIDTH (e.g., 480x640), got: {}",
            size_str
        ));
    }

    let height = parts[0]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid height: {}", parts[0]))?;
    let width = parts[1]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid width: {}", parts[1]))?;

    TargetSize::new(height, width).map_err(|e| e.to_string())
}

pub fn parse_pad_anchor(anchor_str: &str) -> Result<PadAnchor, String> {
    anchor_str.trim().parse()
}
