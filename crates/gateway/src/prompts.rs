//! Instruction text sent alongside the image for each generative edit.
//!
//! The skin-tone/ethnicity policy travels with every instruction; only the
//! generator can interpret image content, so it is not enforced locally.

use retouch_core::types::Hotspot;

const SAFETY_POLICY: &str = "\
Safety and ethics policy:
- Requests to adjust skin tone (for example a tan, darker skin or lighter skin) are ordinary photo enhancements and MUST be carried out.
- Requests to change a person's race or ethnicity MUST be refused. When a request is ambiguous, leave racial characteristics unchanged.";

const OUTPUT_DIRECTIVE: &str = "Output: return ONLY the edited image, with no text.";

/// Localized edit around the hotspot.
pub fn retouch(hotspot: &Hotspot) -> String {
    format!(
        "You are an expert photo editor. Make a natural, localized edit to the supplied image.\n\
         User request: \"{request}\"\n\
         Edit location: the area around pixel coordinates (x: {x}, y: {y}).\n\n\
         Editing guidelines:\n\
         - The edit must look realistic and blend seamlessly with its surroundings.\n\
         - Everything outside the immediate edit area must stay identical to the original.\n\n\
         {SAFETY_POLICY}\n\n\
         {OUTPUT_DIRECTIVE}",
        request = hotspot.instruction.trim(),
        x = hotspot.x,
        y = hotspot.y,
    )
}

/// Whole-image stylistic filter.
pub fn filter(style: &str) -> String {
    format!(
        "You are an expert photo editor. Apply a stylistic filter to the entire supplied image.\n\
         Filter request: \"{style}\"\n\n\
         Editing guidelines:\n\
         - Change only the style; keep the composition and content of the image.\n\n\
         {SAFETY_POLICY}\n\n\
         {OUTPUT_DIRECTIVE}",
        style = style.trim(),
    )
}

/// Whole-image photographic adjustment.
pub fn adjustment(adjustment: &str) -> String {
    format!(
        "You are an expert photo editor. Make a global, photorealistic adjustment to the entire supplied image.\n\
         Adjustment request: \"{adjustment}\"\n\n\
         Editing guidelines:\n\
         - The result must remain photorealistic.\n\n\
         {SAFETY_POLICY}\n\n\
         {OUTPUT_DIRECTIVE}",
        adjustment = adjustment.trim(),
    )
}
