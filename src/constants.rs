// Page-facing names and web-only tuning constants.

// DOM contract with the hosting page
pub const LOADING_OVERLAY_ID: &str = "loading-overlay";
pub const LOADING_STATUS_SELECTOR: &str = "[data-role=status]";
pub const PROGRESS_EVENT: &str = "flight-progress";
pub const PROGRESS_ATTRIBUTE: &str = "data-progress";
pub const DATA_PREFIX: &str = "data-";

// Backing store and surface
pub const CANVAS_STYLE: &str =
    "position:fixed;inset:0;width:100%;height:100%;z-index:0;pointer-events:none;display:block";
// Static vignette laid over the field canvas; the gradient is appended
pub const VIGNETTE_STYLE: &str =
    "position:fixed;inset:0;width:100%;height:100%;z-index:0;pointer-events:none;background:";
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Offscreen targets
pub const BLOOM_DOWNSCALE: u32 = 2; // bloom ping-pong runs at 1/N resolution

/// Strip the `data-` prefix from an attribute name, if present.
#[inline]
pub fn data_key(attribute: &str) -> Option<&str> {
    attribute.strip_prefix(DATA_PREFIX)
}
