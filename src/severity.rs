//! pm2.5 severity tiers, following the Taiwan EPA AQI banding.

use serde::Serialize;

// ---

/// A labeled pm2.5 band with its display colors (hex, no `#`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeverityTier {
    /// Inclusive upper bound in µg/m³. The last tier's bound is nominal.
    pub threshold: f64,
    pub label: &'static str,
    /// Background gradient start.
    pub start_color: &'static str,
    /// Background gradient end.
    pub end_color: &'static str,
    pub text_color: &'static str,
}

impl SeverityTier {
    pub fn background_color(&self) -> &'static str {
        self.start_color
    }
}

/// Ascending, contiguous tiers.
pub static TIERS: [SeverityTier; 6] = [
    SeverityTier {
        threshold: 15.0,
        label: "良好",
        start_color: "00e400",
        end_color: "00bb00",
        text_color: "000000",
    },
    SeverityTier {
        threshold: 35.0,
        label: "普通",
        start_color: "ffff00",
        end_color: "cccc00",
        text_color: "000000",
    },
    SeverityTier {
        threshold: 54.0,
        label: "對敏感族群不健康",
        start_color: "FFA63D",
        end_color: "D67200",
        text_color: "000000",
    },
    SeverityTier {
        threshold: 150.0,
        label: "不健康",
        start_color: "FF3D3D",
        end_color: "D60000",
        text_color: "000000",
    },
    SeverityTier {
        threshold: 250.0,
        label: "非常不健康",
        start_color: "8f3f97",
        end_color: "6f1f77",
        text_color: "ffffff",
    },
    SeverityTier {
        threshold: 999.0,
        label: "有害",
        start_color: "9e2043",
        end_color: "7e0023",
        text_color: "ffffff",
    },
];

/// Map a pm2.5 reading to its tier.
///
/// Total over `f64`: the first five tiers are `pm25 <= bound`, and anything
/// left over (above 250, above 999, NaN) lands in the last tier.
pub fn classify(pm25: f64) -> &'static SeverityTier {
    // ---
    let last = TIERS.len() - 1;
    TIERS[..last]
        .iter()
        .find(|tier| pm25 <= tier.threshold)
        .unwrap_or(&TIERS[last])
}
