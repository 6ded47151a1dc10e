//! Candidate product records decoded from an import source.

use serde::{Deserialize, Serialize};

/// A decoded, not-yet-classified product.
///
/// Candidates are transient: they gain identity only through the
/// outcome the matcher assigns them. `price` is `None` when the source
/// value was missing or non-numeric; such candidates classify as
/// failed rather than aborting the read that produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProduct {
    pub name: String,
    pub price: Option<f64>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub image_url: Option<String>,
    pub sku: Option<String>,
}

impl CandidateProduct {
    /// Why this candidate cannot be written to the catalog, if anything.
    pub fn validation_error(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("missing product name".to_string());
        }
        match self.price {
            None => Some(format!("missing or non-numeric price for '{}'", self.name)),
            Some(p) if !p.is_finite() || p < 0.0 => {
                Some(format!("invalid price for '{}'", self.name))
            }
            Some(_) => None,
        }
    }

    /// Label used in session log lines; falls back for nameless rows.
    pub fn display_name(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            "<unnamed>"
        } else {
            trimmed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, price: Option<f64>) -> CandidateProduct {
        CandidateProduct {
            name: name.to_string(),
            price,
            ..Default::default()
        }
    }

    #[test]
    fn valid_candidate_has_no_error() {
        assert!(candidate("Shirt", Some(100.0)).validation_error().is_none());
    }

    #[test]
    fn missing_name_is_invalid() {
        assert!(candidate("", Some(10.0)).validation_error().is_some());
        assert!(candidate("   ", Some(10.0)).validation_error().is_some());
    }

    #[test]
    fn missing_or_negative_price_is_invalid() {
        assert!(candidate("Shoes", None).validation_error().is_some());
        assert!(candidate("Shoes", Some(-1.0)).validation_error().is_some());
        assert!(candidate("Shoes", Some(f64::NAN)).validation_error().is_some());
    }

    #[test]
    fn display_name_falls_back_for_blank_names() {
        assert_eq!(candidate("", None).display_name(), "<unnamed>");
        assert_eq!(candidate("  Shirt ", None).display_name(), "Shirt");
    }
}
