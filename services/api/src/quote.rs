use crate::infra::{overlap_policy, BasisArg, KindArg};
use clap::Args;
use printshop::catalog::{ProductCatalog, ProductId, RuleTableImporter};
use printshop::error::AppError;
use printshop::pricing::{
    CopySelection, CountInput, OffsetSelection, PaperSelection, PolaroidSelection, PriceResolver,
    PricingRule, ProductKind, ProductPricing, Resolution, Selection,
};
use std::path::PathBuf;

/// Where pricing rules are read from.
#[derive(Args, Debug)]
pub(crate) struct SourceArgs {
    /// Catalog JSON (array of product documents)
    #[arg(long, conflicts_with = "rates")]
    pub(crate) catalog: Option<PathBuf>,
    /// Product to price from the catalog
    #[arg(long, requires = "catalog")]
    pub(crate) product_id: Option<u64>,
    /// Flat CSV rate card
    #[arg(long, requires = "kind")]
    pub(crate) rates: Option<PathBuf>,
    /// Product family the rate card prices
    #[arg(long, value_enum)]
    pub(crate) kind: Option<KindArg>,
    /// Whether rate-card prices are totals or per unit
    #[arg(long, value_enum, default_value_t = BasisArg::PerUnit)]
    pub(crate) basis: BasisArg,
    /// Accept overlapping ranges and use the first matching row
    #[arg(long)]
    pub(crate) first_match: bool,
}

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
    #[arg(long)]
    pub(crate) size: Option<String>,
    /// Offset notice type, e.g. "A4 Notice"
    #[arg(long)]
    pub(crate) notice_type: Option<String>,
    #[arg(long)]
    pub(crate) quality: Option<String>,
    /// Print colour ("B/W" or "Color")
    #[arg(long)]
    pub(crate) color: Option<String>,
    /// Polaroid cards, or offset bundles of 1000
    #[arg(long)]
    pub(crate) quantity: Option<String>,
    #[arg(long)]
    pub(crate) pages: Option<String>,
    #[arg(long)]
    pub(crate) copies: Option<String>,
    /// Addon type such as "Spiral Binding"; needs a catalog, rate cards carry no addons
    #[arg(long, conflicts_with = "rates")]
    pub(crate) binding: Option<String>,
    /// Bind only this many copies instead of all
    #[arg(long, requires = "binding")]
    pub(crate) custom_copies: Option<u32>,
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    if args.source.rates.is_some() && args.binding.is_some() {
        return Err(AppError::Usage(
            "--binding needs --catalog; CSV rate cards carry no addons".to_string(),
        ));
    }
    let (label, pricing) = load_pricing(&args.source)?;
    let selection = build_selection(pricing.kind(), &args);
    let resolution = PriceResolver::resolve(&pricing, &selection);

    println!("Quote for {label}");
    render_resolution(&resolution);
    Ok(())
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let policy = overlap_policy(args.source.first_match);

    if let Some(path) = &args.source.catalog {
        let catalog = ProductCatalog::from_path(path, policy)?;
        let mut entries: Vec<_> = catalog.iter().collect();
        entries.sort_by_key(|entry| entry.id);

        println!("Catalog {} is valid ({} products)", path.display(), catalog.len());
        for entry in entries {
            println!(
                "- {} {} [{}]: {} rules",
                entry.id,
                entry.name,
                entry.kind,
                entry.pricing.rule_count()
            );
        }
        return Ok(());
    }

    let (label, pricing) = load_pricing(&args.source)?;
    println!("{label} is valid ({} rules)", pricing.rule_count());
    Ok(())
}

fn load_pricing(source: &SourceArgs) -> Result<(String, ProductPricing), AppError> {
    let policy = overlap_policy(source.first_match);

    match (&source.catalog, &source.rates, source.kind) {
        (Some(path), _, _) => {
            let catalog = ProductCatalog::from_path(path, policy)?;
            let id = match (source.product_id, catalog.iter().next()) {
                (Some(id), _) => ProductId(id),
                (None, Some(entry)) if catalog.len() == 1 => entry.id,
                (None, _) => {
                    return Err(AppError::Usage(format!(
                        "--product-id is required; {} lists {} products",
                        path.display(),
                        catalog.len()
                    )))
                }
            };
            let entry = catalog.get(id).ok_or(AppError::ProductNotFound(id))?;
            Ok((format!("{} ({})", entry.name, entry.id), entry.pricing.clone()))
        }
        (None, Some(path), Some(kind)) => {
            let kind = ProductKind::from(kind);
            let pricing = RuleTableImporter::from_path(path, kind, source.basis.into(), policy)?;
            Ok((format!("{kind} rate card {}", path.display()), pricing))
        }
        _ => Err(AppError::Usage(
            "pass --catalog with --product-id, or --rates with --kind".to_string(),
        )),
    }
}

fn input(value: &Option<String>) -> CountInput {
    CountInput::new(value.clone().unwrap_or_default())
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn build_selection(kind: ProductKind, args: &QuoteArgs) -> Selection {
    match kind {
        ProductKind::PolaroidCard => Selection::PolaroidCard(PolaroidSelection {
            size: text(&args.size),
            quantity: input(&args.quantity),
        }),
        ProductKind::OffsetPrinting => Selection::OffsetPrinting(OffsetSelection {
            notice_type: args
                .notice_type
                .clone()
                .or_else(|| args.size.clone())
                .unwrap_or_default(),
            quality: text(&args.quality),
            quantity: input(&args.quantity),
        }),
        ProductKind::PaperPrinting => Selection::PaperPrinting(PaperSelection {
            size: text(&args.size),
            color: text(&args.color),
            page_count: input(&args.pages),
            copies: input(&args.copies),
            binding: args.binding.clone(),
            copy_selection: args
                .custom_copies
                .map(CopySelection::Custom)
                .unwrap_or_default(),
        }),
    }
}

fn describe_rule(rule: &PricingRule) -> String {
    match rule {
        PricingRule::PolaroidCard(rule) => {
            format!("{} | quantity {} @ {}", rule.size, rule.quantity_range, rule.price)
        }
        PricingRule::OffsetPrinting(rule) => format!(
            "{} / {} | bundles {} @ {}",
            rule.notice_type, rule.quality, rule.quantity_range, rule.price
        ),
        PricingRule::PaperPrinting(rule) => format!(
            "{} / {} | pages {} @ {}",
            rule.size,
            rule.color.as_str(),
            rule.page_range,
            rule.price
        ),
    }
}

fn render_resolution(resolution: &Resolution) {
    if let Some(error) = &resolution.error {
        println!("- Not priceable: {error}");
        return;
    }

    let (Some(rule), Some(base), Some(total)) =
        (&resolution.rule, resolution.base_price, resolution.price)
    else {
        println!("- Selection incomplete; fill in every option to see a price");
        return;
    };

    println!("- Matched rule: {}", describe_rule(rule));
    println!("- Base price: {base}");
    if let (Some(addon), Some(charge)) = (&resolution.addon, resolution.addon_price) {
        println!("- {}: {charge}", addon.addon_type);
    }
    println!("- Total: {total}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_args() -> QuoteArgs {
        QuoteArgs {
            source: SourceArgs {
                catalog: None,
                product_id: None,
                rates: None,
                kind: None,
                basis: BasisArg::PerUnit,
                first_match: false,
            },
            size: Some("A4 Notice".to_string()),
            notice_type: None,
            quality: Some("Maplitho".to_string()),
            color: None,
            quantity: Some("3".to_string()),
            pages: None,
            copies: None,
            binding: None,
            custom_copies: Some(2),
        }
    }

    #[test]
    fn offset_selection_falls_back_to_size_for_notice_type() {
        match build_selection(ProductKind::OffsetPrinting, &quote_args()) {
            Selection::OffsetPrinting(selection) => {
                assert_eq!(selection.notice_type, "A4 Notice");
                assert_eq!(selection.quantity.read(), Ok(Some(3)));
            }
            other => panic!("expected offset selection, got {other:?}"),
        }
    }

    #[test]
    fn paper_selection_carries_custom_copy_count() {
        match build_selection(ProductKind::PaperPrinting, &quote_args()) {
            Selection::PaperPrinting(selection) => {
                assert_eq!(selection.copy_selection, CopySelection::Custom(2));
                assert_eq!(selection.page_count.read(), Ok(None));
            }
            other => panic!("expected paper selection, got {other:?}"),
        }
    }

    fn catalog_fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../crates/printshop/fixtures/catalog.json")
    }

    fn rates_fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../crates/printshop/fixtures/paper_rates.csv")
    }

    #[test]
    fn quoting_without_a_source_is_rejected() {
        match load_pricing(&quote_args().source) {
            Err(AppError::Usage(message)) => assert!(message.contains("--catalog")),
            other => panic!("expected usage error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_or_missing_product_id_is_reported_as_such() {
        let mut args = quote_args();
        args.source.catalog = Some(catalog_fixture());
        args.source.product_id = Some(999);
        match load_pricing(&args.source) {
            Err(error @ AppError::ProductNotFound(ProductId(999))) => {
                assert_eq!(error.to_string(), "product 999 is not in the catalog");
            }
            other => panic!("expected missing product, got {other:?}"),
        }

        args.source.product_id = None;
        match load_pricing(&args.source) {
            Err(AppError::Usage(message)) => assert!(message.contains("--product-id")),
            other => panic!("expected usage error, got {other:?}"),
        }
    }

    #[test]
    fn binding_is_refused_for_rate_cards() {
        let mut args = quote_args();
        args.source.rates = Some(rates_fixture());
        args.source.kind = Some(KindArg::Paper);
        args.binding = Some("Spiral Binding".to_string());

        match run_quote(args) {
            Err(AppError::Usage(message)) => assert!(message.contains("--binding")),
            other => panic!("expected usage error, got {other:?}"),
        }
    }
}
