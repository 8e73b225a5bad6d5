use rust_decimal::Decimal;
use tracing::debug;

use super::addon::{find_addon, Addon, CopySelection};
use super::matcher::{Lookup, RangeMatcher};
use super::product::{ProductPricing, QualityPolicy};
use super::range::InclusiveRange;
use super::resolution::{PricingError, Resolution};
use super::rules::{OffsetRule, PaperRule, PolaroidRule, PricingRule, PrintColor, RuleTable};
use super::selection::{
    is_blank, CountInput, OffsetSelection, PaperSelection, PolaroidSelection, Selection,
};

/// Stateless price lookup; call it again whenever the selection changes.
pub struct PriceResolver;

impl PriceResolver {
    pub fn resolve(pricing: &ProductPricing, selection: &Selection) -> Resolution {
        let outcome = match (pricing, selection) {
            (ProductPricing::PolaroidCard { rules }, Selection::PolaroidCard(selection)) => {
                resolve_polaroid(rules, selection)
            }
            (
                ProductPricing::OffsetPrinting { rules, qualities },
                Selection::OffsetPrinting(selection),
            ) => resolve_offset(rules, qualities, selection),
            (ProductPricing::PaperPrinting { rules, addons }, Selection::PaperPrinting(selection)) => {
                resolve_paper(rules, addons, selection)
            }
            (pricing, selection) => Err(PricingError::ProductMismatch {
                expected: pricing.kind(),
                found: selection.kind(),
            }),
        };

        let resolution = outcome.unwrap_or_else(Resolution::rejected);
        debug!(
            product = %selection.kind(),
            price = ?resolution.price,
            error = ?resolution.error,
            "resolved selection"
        );
        resolution
    }
}

fn polaroid_size(rule: &PolaroidRule) -> &str {
    &rule.size
}

fn polaroid_band(rule: &PolaroidRule) -> &InclusiveRange {
    &rule.quantity_range
}

fn offset_notice_type(rule: &OffsetRule) -> &str {
    &rule.notice_type
}

fn offset_quality(rule: &OffsetRule) -> &str {
    &rule.quality
}

fn offset_band(rule: &OffsetRule) -> &InclusiveRange {
    &rule.quantity_range
}

fn paper_size(rule: &PaperRule) -> &str {
    &rule.size
}

fn paper_color(rule: &PaperRule) -> &str {
    rule.color.as_str()
}

fn paper_band(rule: &PaperRule) -> &InclusiveRange {
    &rule.page_range
}

fn read(input: &CountInput, invalid: PricingError) -> Result<Option<u32>, PricingError> {
    input.read().map_err(|_| invalid)
}

fn matched<R>(lookup: Lookup<'_, R>) -> Result<&R, PricingError> {
    match lookup {
        Lookup::Matched(rule) => Ok(rule),
        Lookup::OutOfRange => Err(PricingError::OutOfRange),
        Lookup::NotAvailable => Err(PricingError::NotAvailable),
    }
}

fn resolve_polaroid(
    table: &RuleTable<PolaroidRule>,
    selection: &PolaroidSelection,
) -> Result<Resolution, PricingError> {
    let quantity = read(&selection.quantity, PricingError::InvalidQuantity)?;
    let Some(quantity) = quantity.filter(|_| !is_blank(&selection.size)) else {
        return Ok(Resolution::incomplete());
    };

    let lookup = RangeMatcher::<PolaroidRule>::new(polaroid_band)
        .key(polaroid_size, &selection.size)
        .find(table.rules(), quantity);
    let rule = matched(lookup)?;

    let base = table
        .basis()
        .total(rule.price, quantity)
        .ok_or(PricingError::PriceOverflow)?;
    Resolution::priced(PricingRule::PolaroidCard(rule.clone()), base, None)
}

fn resolve_offset(
    table: &RuleTable<OffsetRule>,
    qualities: &QualityPolicy,
    selection: &OffsetSelection,
) -> Result<Resolution, PricingError> {
    let quantity = read(&selection.quantity, PricingError::InvalidQuantity)?;
    let Some(quantity) =
        quantity.filter(|_| !is_blank(&selection.notice_type) && !is_blank(&selection.quality))
    else {
        return Ok(Resolution::incomplete());
    };

    if !qualities.allows(&selection.notice_type, &selection.quality) {
        return Err(PricingError::QualityNotOffered {
            notice_type: selection.notice_type.trim().to_string(),
            quality: selection.quality.trim().to_string(),
        });
    }

    let lookup = RangeMatcher::<OffsetRule>::new(offset_band)
        .key(offset_notice_type, &selection.notice_type)
        .key(offset_quality, &selection.quality)
        .find(table.rules(), quantity);
    let rule = matched(lookup)?;

    let base = table
        .basis()
        .total(rule.price, quantity)
        .ok_or(PricingError::PriceOverflow)?;
    Resolution::priced(PricingRule::OffsetPrinting(rule.clone()), base, None)
}

fn resolve_paper(
    table: &RuleTable<PaperRule>,
    addons: &[Addon],
    selection: &PaperSelection,
) -> Result<Resolution, PricingError> {
    let pages = read(&selection.page_count, PricingError::InvalidPageCount)?;
    let copies = read(&selection.copies, PricingError::InvalidCopies)?;
    let (Some(pages), Some(copies)) = (pages, copies) else {
        return Ok(Resolution::incomplete());
    };
    if is_blank(&selection.size) || is_blank(&selection.color) {
        return Ok(Resolution::incomplete());
    }

    let color = PrintColor::from_label(&selection.color)
        .ok_or_else(|| PricingError::UnknownColor(selection.color.trim().to_string()))?;

    let lookup = RangeMatcher::<PaperRule>::new(paper_band)
        .key(paper_size, &selection.size)
        .key(paper_color, color.as_str())
        .find(table.rules(), pages);
    let rule = matched(lookup)?;

    let base = table
        .basis()
        .total(rule.price, pages)
        .and_then(|per_copy| per_copy.checked_mul(Decimal::from(copies)))
        .ok_or(PricingError::PriceOverflow)?;

    let binding = selection
        .binding
        .as_deref()
        .map(str::trim)
        .filter(|binding| !binding.is_empty());

    let addon = match binding {
        Some(binding) => {
            let book_count = match selection.copy_selection {
                CopySelection::All => copies,
                CopySelection::Custom(0) => return Ok(Resolution::incomplete()),
                CopySelection::Custom(custom) if custom > copies => {
                    return Err(PricingError::CustomCopiesExceedCopies { custom, copies });
                }
                CopySelection::Custom(custom) => custom,
            };

            let addon = find_addon(addons, binding, &selection.size, color, pages)
                .ok_or_else(|| PricingError::AddonNotAvailable(binding.to_string()))?;
            let charge = addon
                .total(book_count)
                .ok_or(PricingError::PriceOverflow)?;
            Some((addon.clone(), charge))
        }
        None => None,
    };

    Resolution::priced(PricingRule::PaperPrinting(rule.clone()), base, addon)
}
