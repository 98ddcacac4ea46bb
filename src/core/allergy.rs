use crate::models::{IndirectWarning, Verdict};

/// Indirect allergen field values that flag a risk without naming an allergen
const TRUTHY_MARKERS: [&str; 4] = ["o", "yes", "1", "true"];

/// Whether any allergy token occurs in the allergen text (case-insensitive)
#[inline]
pub fn has_allergen_conflict(allergies: &[String], allergen_text: Option<&str>) -> bool {
    let Some(text) = allergen_text else {
        return false;
    };
    let text = text.to_lowercase();

    allergies
        .iter()
        .any(|allergy| text.contains(&allergy.to_lowercase()))
}

/// Suitability verdict for a product's declared allergens
pub fn allergy_verdict(allergies: &[String], allergen_text: Option<&str>) -> Verdict {
    if has_allergen_conflict(allergies, allergen_text) {
        Verdict::Unsuitable
    } else {
        Verdict::Suitable
    }
}

/// Check the indirect allergen field against the user's allergies
///
/// Fires for the first allergy that appears in the field, or for the first
/// allergy at all when the field is a bare truthy marker such as `"O"`. The
/// marker case names an allergy that may be unrelated to the actual trace
/// risk; this matches the catalog's current semantics and is left as is.
pub fn indirect_allergy_warning(
    allergies: &[String],
    indirect_text: Option<&str>,
) -> Option<IndirectWarning> {
    let text = indirect_text
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())?;
    let is_marker = TRUTHY_MARKERS.contains(&text.as_str());

    allergies
        .iter()
        .find(|allergy| is_marker || text.contains(&allergy.to_lowercase()))
        .map(|allergy| IndirectWarning {
            allergen: allergy.clone(),
        })
}
