//! Result Classifier: maps a service classification label to a badge tier.
//!
//! Presentation only: the label itself is always shown verbatim next to the badge.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityTier {
    Normal,
    Caution,
    Severe,
    /// No label to judge.
    Unknown,
}

/// Foreground/background colors of a badge, as RGB triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeColors {
    pub background: (u8, u8, u8),
    pub foreground: (u8, u8, u8),
}

const CAUTION_MARKERS: &[&str] = &["sobrepeso", "overweight"];

/// Buckets a label by case-insensitive substring match.
pub fn severity_tier(label: Option<&str>) -> SeverityTier {
    let label = match label.map(str::trim) {
        Some(l) if !l.is_empty() => l.to_lowercase(),
        _ => return SeverityTier::Unknown,
    };

    if label.contains("normal") {
        SeverityTier::Normal
    } else if CAUTION_MARKERS.iter().any(|m| label.contains(m)) {
        SeverityTier::Caution
    } else {
        SeverityTier::Severe
    }
}

impl SeverityTier {
    pub fn badge_colors(&self) -> BadgeColors {
        match self {
            SeverityTier::Normal => BadgeColors {
                background: (220, 252, 231),
                foreground: (22, 101, 52),
            },
            SeverityTier::Caution => BadgeColors {
                background: (254, 249, 195),
                foreground: (133, 77, 14),
            },
            SeverityTier::Severe => BadgeColors {
                background: (254, 226, 226),
                foreground: (153, 27, 27),
            },
            SeverityTier::Unknown => BadgeColors {
                background: (243, 244, 246),
                foreground: (31, 41, 55),
            },
        }
    }

    /// Short marker used where colors are not available (plain terminals).
    pub fn marker(&self) -> &'static str {
        match self {
            SeverityTier::Normal => "[OK]",
            SeverityTier::Caution => "[!]",
            SeverityTier::Severe => "[!!]",
            SeverityTier::Unknown => "[?]",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_labels() {
        assert_eq!(severity_tier(Some("Normal")), SeverityTier::Normal);
        assert_eq!(severity_tier(Some("Peso normal")), SeverityTier::Normal);
        assert_eq!(severity_tier(Some("Talla normal")), SeverityTier::Normal);
    }

    #[test]
    fn test_overweight_labels_are_caution() {
        assert_eq!(severity_tier(Some("Sobrepeso leve")), SeverityTier::Caution);
        assert_eq!(severity_tier(Some("Sobrepeso")), SeverityTier::Caution);
        assert_eq!(severity_tier(Some("Overweight")), SeverityTier::Caution);
    }

    #[test]
    fn test_other_labels_are_severe() {
        assert_eq!(severity_tier(Some("Obesidad")), SeverityTier::Severe);
        assert_eq!(severity_tier(Some("Bajo peso")), SeverityTier::Severe);
        assert_eq!(severity_tier(Some("Talla baja")), SeverityTier::Severe);
    }

    #[test]
    fn test_empty_or_absent_is_unknown() {
        assert_eq!(severity_tier(Some("")), SeverityTier::Unknown);
        assert_eq!(severity_tier(Some("   ")), SeverityTier::Unknown);
        assert_eq!(severity_tier(None), SeverityTier::Unknown);
    }

    #[test]
    fn test_each_tier_has_distinct_badge() {
        let tiers = [
            SeverityTier::Normal,
            SeverityTier::Caution,
            SeverityTier::Severe,
            SeverityTier::Unknown,
        ];
        for (i, a) in tiers.iter().enumerate() {
            for b in &tiers[i + 1..] {
                assert_ne!(a.badge_colors(), b.badge_colors());
            }
        }
    }
}
