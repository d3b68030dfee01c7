//! Parsing of the compact text formats operators type into slash command options.
//!
//! Discord slash commands take flat options, so multi-line entries are written
//! as `;`-separated lists:
//!
//! - production: `Blue:PP=1,M=3; Black:G=2`
//! - cut colors: `Blue=10; Black=5`
//! - order items: `CAM-01|T-shirt|Blue|PP=1,M=2; CAL-02|Trousers||G=4`
//!
//! Dates are ISO 8601 (`2026-03-10`).

use crate::{
    core::{
        cut::CutColor,
        order::NewOrderItem,
        production::ProductionLaunch,
        sizes::{MAX_QUANTITY, Size, SizeVector},
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;

fn entries(input: &str) -> impl Iterator<Item = &str> {
    input.split(';').map(str::trim).filter(|e| !e.is_empty())
}

/// Parses `Color:PP=1,M=3; Color2:G=2` into per-size launches.
///
/// Zero quantities are dropped.
pub fn parse_production_entries(input: &str) -> Result<Vec<ProductionLaunch>> {
    let mut launches = Vec::new();
    for entry in entries(input) {
        let Some((color, sizes)) = entry.split_once(':') else {
            return Err(Error::validation(format!(
                "Entry '{entry}' must look like Color:PP=1,M=3"
            )));
        };
        let color = color.trim();
        if color.is_empty() {
            return Err(Error::validation(format!("Entry '{entry}' has no color")));
        }
        let sizes: SizeVector = sizes.parse()?;
        launches.extend(
            Size::ALL
                .into_iter()
                .filter(|size| sizes.get(*size) != 0)
                .map(|size| ProductionLaunch {
                    color: color.to_string(),
                    size,
                    quantity: sizes.get(size),
                }),
        );
    }
    if launches.is_empty() {
        return Err(Error::validation("No pieces entered"));
    }
    Ok(launches)
}

/// Parses `Blue=10; Black=5` into sheets per color.
pub fn parse_cut_colors(input: &str) -> Result<Vec<CutColor>> {
    let colors = entries(input)
        .map(|entry| {
            let (color, sheets) = entry.split_once('=').ok_or_else(|| {
                Error::validation(format!("Color '{entry}' must look like Blue=10"))
            })?;
            let sheets = sheets
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|n| (0..=MAX_QUANTITY).contains(n))
                .ok_or_else(|| {
                    Error::validation(format!(
                        "Sheet count '{}' must be a whole number from 0 to {MAX_QUANTITY}",
                        sheets.trim()
                    ))
                })?;
            Ok(CutColor {
                color: color.trim().to_string(),
                sheets,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if colors.is_empty() {
        return Err(Error::validation("No colors entered"));
    }
    Ok(colors)
}

/// Parses `PART|Description|Color|PP=1,M=2; ...` into order lines.
///
/// The color may be left empty to accept any color.
pub fn parse_order_items(input: &str) -> Result<Vec<NewOrderItem>> {
    let items = entries(input)
        .map(|entry| {
            let fields: Vec<&str> = entry.split('|').map(str::trim).collect();
            let [part_id, description, color, sizes] = fields.as_slice() else {
                return Err(Error::validation(format!(
                    "Item '{entry}' must look like PART|Description|Color|PP=1,M=2"
                )));
            };
            Ok(NewOrderItem {
                part_id: (*part_id).to_string(),
                description: (*description).to_string(),
                color: (*color).to_string(),
                sizes: sizes.parse()?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    if items.is_empty() {
        return Err(Error::validation("No items entered"));
    }
    Ok(items)
}

/// Parses an ISO 8601 calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation(format!("Date '{}' must look like 2026-03-10", input.trim())))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_production_entries() {
        let launches = parse_production_entries("Blue:PP=1,M=3; Black : G=2;").unwrap();
        assert_eq!(launches.len(), 3);
        assert_eq!(launches[0].color, "Blue");
        assert_eq!(launches[0].size, Size::PP);
        assert_eq!(launches[1].quantity, 3);
        assert_eq!(launches[2].color, "Black");
        assert_eq!(launches[2].size, Size::G);
    }

    #[test]
    fn test_parse_production_entries_rejects_bad_input() {
        assert!(matches!(
            parse_production_entries("Blue PP=1"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            parse_production_entries(":M=1"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            parse_production_entries("Blue:XL=1"),
            Err(Error::InvalidSizes { .. })
        ));
        assert!(matches!(
            parse_production_entries("Blue:M=0"),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_parse_cut_colors() {
        let colors = parse_cut_colors("Blue=10; Black = 5").unwrap();
        assert_eq!(
            colors,
            vec![
                CutColor {
                    color: "Blue".to_string(),
                    sheets: 10,
                },
                CutColor {
                    color: "Black".to_string(),
                    sheets: 5,
                },
            ]
        );
        assert!(parse_cut_colors("Blue=ten").is_err());
        assert!(parse_cut_colors("Blue=-1").is_err());
        assert!(parse_cut_colors(" ; ").is_err());
    }

    #[test]
    fn test_huge_counts_are_rejected() {
        assert!(matches!(
            parse_cut_colors("Blue=9223372036854775807"),
            Err(Error::Validation { .. })
        ));
        assert!(matches!(
            parse_order_items("CAM-01|T-shirt|Blue|P=1,M=9223372036854775807"),
            Err(Error::InvalidSizes { .. })
        ));
        assert!(matches!(
            parse_production_entries("Blue:M=9223372036854775807"),
            Err(Error::InvalidSizes { .. })
        ));
    }

    #[test]
    fn test_parse_order_items() {
        let items = parse_order_items("CAM-01|T-shirt|Blue|PP=1,M=2; CAL-02|Trousers||G=4").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].part_id, "CAM-01");
        assert_eq!(items[0].sizes, SizeVector::new(1, 0, 2, 0, 0));
        assert_eq!(items[1].color, "");
        assert_eq!(items[1].sizes.total(), 4);

        assert!(parse_order_items("CAM-01|T-shirt|PP=1").is_err());
        assert!(matches!(
            parse_order_items("CAM-01|T-shirt|Blue|M=-1"),
            Err(Error::InvalidSizes { .. })
        ));
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2026-03-10 ").unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
        );
        assert!(parse_date("10/03/2026").is_err());
    }
}
