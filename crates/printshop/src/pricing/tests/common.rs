use rust_decimal::Decimal;

use crate::pricing::{
    Addon, AddonCharge, CopySelection, InclusiveRange, OffsetRule, OffsetSelection, OverlapPolicy,
    PaperRule, PaperSelection, PolaroidRule, PolaroidSelection, PriceBasis, PrintColor,
    ProductPricing, QualityPolicy, RuleTable, Selection,
};

pub(super) fn band(raw: &str) -> InclusiveRange {
    InclusiveRange::parse(raw).expect("valid band")
}

pub(super) fn money(units: i64) -> Decimal {
    Decimal::from(units)
}

pub(super) fn polaroid_pricing() -> ProductPricing {
    let rules = vec![
        PolaroidRule {
            size: "A4".to_string(),
            quantity_range: band("1-500"),
            price: money(2),
        },
        PolaroidRule {
            size: "A4".to_string(),
            quantity_range: band("501-1000"),
            price: Decimal::new(150, 2),
        },
        PolaroidRule {
            size: "3x4 Inch".to_string(),
            quantity_range: band("10-99"),
            price: money(12),
        },
    ];

    ProductPricing::PolaroidCard {
        rules: RuleTable::new(rules, PriceBasis::PerUnit, OverlapPolicy::Reject)
            .expect("polaroid table valid"),
    }
}

pub(super) fn polaroid(size: &str, quantity: &str) -> Selection {
    Selection::PolaroidCard(PolaroidSelection {
        size: size.to_string(),
        quantity: quantity.into(),
    })
}

pub(super) fn offset_pricing(basis: PriceBasis) -> ProductPricing {
    let rules = vec![
        OffsetRule {
            notice_type: "A5 Notice".to_string(),
            quality: "Maplitho".to_string(),
            quantity_range: band("1-4"),
            price: money(900),
        },
        OffsetRule {
            notice_type: "A5 Notice".to_string(),
            quality: "Maplitho".to_string(),
            quantity_range: band("5-20"),
            price: money(800),
        },
        OffsetRule {
            notice_type: "A5 Notice".to_string(),
            quality: "Art Paper".to_string(),
            quantity_range: band("1-20"),
            price: money(1400),
        },
        OffsetRule {
            notice_type: "A4 Notice".to_string(),
            quality: "Maplitho".to_string(),
            quantity_range: band("1-20"),
            price: money(1600),
        },
    ];

    ProductPricing::OffsetPrinting {
        rules: RuleTable::new(rules, basis, OverlapPolicy::Reject).expect("offset table valid"),
        qualities: QualityPolicy::default().allow("A4 Notice", ["MAPLITHO"]),
    }
}

pub(super) fn offset(notice_type: &str, quality: &str, quantity: &str) -> Selection {
    Selection::OffsetPrinting(OffsetSelection {
        notice_type: notice_type.to_string(),
        quality: quality.to_string(),
        quantity: quantity.into(),
    })
}

pub(super) fn paper_pricing() -> ProductPricing {
    let rules = vec![
        PaperRule {
            size: "A4".to_string(),
            color: PrintColor::BlackAndWhite,
            page_range: band("1-50"),
            price: money(2),
        },
        PaperRule {
            size: "A4".to_string(),
            color: PrintColor::BlackAndWhite,
            page_range: band("51-500"),
            price: Decimal::new(150, 2),
        },
        PaperRule {
            size: "A4".to_string(),
            color: PrintColor::Color,
            page_range: band("1-500"),
            price: money(10),
        },
    ];

    let addons = vec![
        Addon {
            addon_type: "Spiral Binding".to_string(),
            size: Some("A4".to_string()),
            color: None,
            page_range: Some(band("1-100")),
            price: money(30),
            charge: AddonCharge::PerCopy,
        },
        Addon {
            addon_type: "Spiral Binding".to_string(),
            size: Some("A4".to_string()),
            color: None,
            page_range: Some(band("101-500")),
            price: money(60),
            charge: AddonCharge::PerCopy,
        },
        Addon {
            addon_type: "Hard Binding".to_string(),
            size: Some("A4".to_string()),
            color: Some(PrintColor::Color),
            page_range: None,
            price: money(250),
            charge: AddonCharge::Flat,
        },
    ];

    ProductPricing::PaperPrinting {
        rules: RuleTable::new(rules, PriceBasis::PerUnit, OverlapPolicy::Reject)
            .expect("paper table valid"),
        addons,
    }
}

pub(super) fn paper(size: &str, color: &str, pages: &str, copies: &str) -> PaperSelection {
    PaperSelection {
        size: size.to_string(),
        color: color.to_string(),
        page_count: pages.into(),
        copies: copies.into(),
        binding: None,
        copy_selection: CopySelection::All,
    }
}
