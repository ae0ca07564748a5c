//! Vendor classification from issuer marker substrings.

use crate::models::receipt::Vendor;
use crate::receipt::observer::{ExtractionEvent, ExtractionObserver};

use super::normalize::{TextView, TextViews};

/// A substring identifying an issuer, checked against one text view.
#[derive(Debug, Clone, Copy)]
pub struct VendorMarker {
    pub vendor: Vendor,
    pub needle: &'static str,
    pub view: TextView,
}

const fn marker(vendor: Vendor, needle: &'static str, view: TextView) -> VendorMarker {
    VendorMarker { vendor, needle, view }
}

/// Markers in check order; the first hit wins.
///
/// "0CT0" is the corrected form of "OCTO", so it is looked up in the corrected
/// view. Markers containing I, O or S are looked up in the normalized view,
/// where the substitutions have not touched them.
pub const VENDOR_MARKERS: &[VendorMarker] = &[
    marker(Vendor::BankAtAm, "BANK@AM", TextView::Corrected),
    marker(Vendor::CimbOcto, "0CT0", TextView::Corrected),
    marker(Vendor::Maybank, "Maybank", TextView::Normalized),
    marker(Vendor::Rhb, "RHB", TextView::Normalized),
    marker(Vendor::TouchNGo, "Wallet", TextView::Corrected),
    marker(Vendor::HongLeong, "HLB", TextView::Normalized),
    marker(Vendor::PublicBank, "PUBLIC BANK", TextView::Normalized),
    marker(Vendor::Alliance, "alliance", TextView::Normalized),
    marker(Vendor::AlAwfar, "Al-Awfar", TextView::Normalized),
];

/// Selects the reference rule set for a receipt.
#[derive(Debug, Clone, Copy, Default)]
pub struct VendorClassifier;

impl VendorClassifier {
    pub fn new() -> Self {
        Self
    }

    /// First marker present in its view, if any.
    pub fn find_marker(&self, views: &TextViews<'_>) -> Option<&'static VendorMarker> {
        VENDOR_MARKERS
            .iter()
            .find(|m| views.get(m.view).contains(m.needle))
    }

    /// Classify the receipt, falling back to [`Vendor::Unknown`].
    pub fn classify(&self, views: &TextViews<'_>, observer: &dyn ExtractionObserver) -> Vendor {
        let found = self.find_marker(views);
        let vendor = found.map(|m| m.vendor).unwrap_or(Vendor::Unknown);

        observer.observe(&ExtractionEvent::VendorClassified {
            vendor,
            marker: found.map(|m| m.needle),
        });

        vendor
    }
}

/// Classify raw recognized text.
pub fn classify_vendor(text: &str) -> Vendor {
    let views = TextViews::new(text);
    VendorClassifier::new().classify(&views, &crate::receipt::observer::NullObserver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers() {
        assert_eq!(classify_vendor("BANK@AM\nReceipt"), Vendor::BankAtAm);
        assert_eq!(classify_vendor("CIMB OCTO"), Vendor::CimbOcto);
        assert_eq!(classify_vendor("Maybank2u"), Vendor::Maybank);
        assert_eq!(classify_vendor("RHB Now"), Vendor::Rhb);
        assert_eq!(classify_vendor("Touch 'n Go eWallet"), Vendor::TouchNGo);
        assert_eq!(classify_vendor("HLB Connect"), Vendor::HongLeong);
        assert_eq!(classify_vendor("PUBLIC BANK BERHAD"), Vendor::PublicBank);
        assert_eq!(classify_vendor("alliance online"), Vendor::Alliance);
        assert_eq!(classify_vendor("Al-Awfar account"), Vendor::AlAwfar);
        assert_eq!(classify_vendor("Some Shop"), Vendor::Unknown);
    }

    #[test]
    fn test_octo_marker_seen_only_after_correction() {
        // The raw "OCTO" never contains "0CT0"; the corrected view does.
        let views = TextViews::new("OCTO");
        assert!(!views.normalized().contains("0CT0"));
        assert_eq!(
            VendorClassifier::new().find_marker(&views).map(|m| m.vendor),
            Some(Vendor::CimbOcto)
        );
    }

    #[test]
    fn test_public_bank_not_read_from_corrected_view() {
        // "PUBLIC BANK" would become "PUBL1C BANK" after correction.
        let views = TextViews::new("PUBLIC BANK");
        assert!(!views.corrected().contains("PUBLIC BANK"));
        assert_eq!(classify_vendor("PUBLIC BANK"), Vendor::PublicBank);
    }

    #[test]
    fn test_check_order() {
        // Both markers present: the earlier entry wins.
        assert_eq!(classify_vendor("Maybank RHB"), Vendor::Maybank);
        assert_eq!(classify_vendor("HLB via Wallet"), Vendor::TouchNGo);
    }

    #[test]
    fn test_marker_across_line_break() {
        assert_eq!(classify_vendor("PUBLIC\nBANK"), Vendor::PublicBank);
    }

    #[test]
    fn test_markers_are_case_sensitive() {
        assert_eq!(classify_vendor("ALLIANCE"), Vendor::Unknown);
        assert_eq!(classify_vendor("maybank"), Vendor::Unknown);
    }
}
