use crate::pricing::normalize_key;

/// Product attributes the storefront turns into dropdown options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttributeKind {
    Size,
    NoticeType,
    Quality,
    Color,
    Quantity,
}

pub(crate) fn attribute_kind(name: &str) -> Option<AttributeKind> {
    let normalized = normalize_key(name);
    match normalized.as_str() {
        "notice type" => Some(AttributeKind::NoticeType),
        "quality" => Some(AttributeKind::Quality),
        "color name" | "colour name" | "color" => Some(AttributeKind::Color),
        "quantity" => Some(AttributeKind::Quantity),
        other if other.contains("size") => Some(AttributeKind::Size),
        _ => None,
    }
}

/// "POLAROID CARD" -> "Polaroid Card".
pub(crate) fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_names_map_case_insensitively() {
        assert_eq!(attribute_kind("Paper Size"), Some(AttributeKind::Size));
        assert_eq!(attribute_kind("NOTICE TYPE"), Some(AttributeKind::NoticeType));
        assert_eq!(attribute_kind("Color Name"), Some(AttributeKind::Color));
        assert_eq!(attribute_kind(" quantity "), Some(AttributeKind::Quantity));
        assert_eq!(attribute_kind("Quantity Range"), None);
        assert_eq!(attribute_kind("Finish"), None);
    }

    #[test]
    fn title_case_formats_product_names() {
        assert_eq!(title_case("POLAROID   card"), "Polaroid Card");
        assert_eq!(title_case(""), "");
    }
}
