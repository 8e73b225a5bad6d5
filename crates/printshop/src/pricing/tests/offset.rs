use super::common::*;
use crate::pricing::{PriceBasis, PriceResolver, PricingError, PricingRule};

#[test]
fn bundles_are_priced_per_unit_when_table_says_so() {
    let pricing = offset_pricing(PriceBasis::PerUnit);

    let resolution = PriceResolver::resolve(&pricing, &offset("a5 notice", "MAPLITHO", "5"));

    assert_eq!(resolution.price, Some(money(4000)));
    match resolution.rule {
        Some(PricingRule::OffsetPrinting(rule)) => assert_eq!(rule.price, money(800)),
        other => panic!("expected offset rule, got {other:?}"),
    }
}

#[test]
fn flat_tables_charge_the_band_price() {
    let pricing = offset_pricing(PriceBasis::Flat);
    let resolution = PriceResolver::resolve(&pricing, &offset("A5 Notice", "Art Paper", "7"));
    assert_eq!(resolution.price, Some(money(1400)));
}

#[test]
fn quality_is_part_of_the_categorical_match() {
    let pricing = offset_pricing(PriceBasis::PerUnit);
    let resolution = PriceResolver::resolve(&pricing, &offset("A5 Notice", "Bond", "2"));
    assert_eq!(resolution.error, Some(PricingError::NotAvailable));
}

#[test]
fn restricted_notice_type_rejects_other_qualities() {
    let pricing = offset_pricing(PriceBasis::PerUnit);

    let resolution = PriceResolver::resolve(&pricing, &offset("A4 Notice", "Art Paper", "2"));

    match resolution.error {
        Some(PricingError::QualityNotOffered { notice_type, quality }) => {
            assert_eq!(notice_type, "A4 Notice");
            assert_eq!(quality, "Art Paper");
        }
        other => panic!("expected quality rejection, got {other:?}"),
    }
}

#[test]
fn missing_quality_is_silently_incomplete() {
    let pricing = offset_pricing(PriceBasis::PerUnit);
    let resolution = PriceResolver::resolve(&pricing, &offset("A5 Notice", "", "2"));
    assert!(resolution.error.is_none());
    assert!(resolution.price.is_none());
}
