// src/core/scoring.rs

use std::cmp::Ordering;

use crate::core::models::{CheckStatus, FaviconCheck, FaviconResult, IconFormat};

/// Scoring weight for one check status. Info is near-neutral (mostly
/// advisory), warning takes half credit, fail zeroes the check.
fn weight(status: CheckStatus) -> f64 {
    match status {
        CheckStatus::Pass => 1.0,
        CheckStatus::Info => 0.8,
        CheckStatus::Warning => 0.5,
        CheckStatus::Fail => 0.0,
    }
}

/// Aggregates checks into a 0-100 score: mean of the status weights,
/// scaled and rounded to nearest. An empty sequence scores 100.
pub fn score<'a, I>(checks: I) -> u8
where
    I: IntoIterator<Item = &'a FaviconCheck>,
{
    let mut total = 0.0;
    let mut count = 0u32;
    for check in checks {
        total += weight(check.status);
        count += 1;
    }
    if count == 0 {
        return 100;
    }
    (total / f64::from(count) * 100.0).round() as u8
}

/// Display-preference rank for a format: SVG beats PNG beats ICO beats
/// the rest.
fn format_rank(format: Option<IconFormat>) -> u8 {
    match format {
        Some(IconFormat::Svg) => 0,
        Some(IconFormat::Png) => 1,
        Some(IconFormat::Ico) => 2,
        _ => 3,
    }
}

/// Total order over favicon results for picking the icon a browser would
/// best display: format preference first, then declared widths inside the
/// 32-64 px window beat those outside it.
pub fn rank_for_display(a: &FaviconResult, b: &FaviconResult) -> Ordering {
    let by_format = format_rank(a.format).cmp(&format_rank(b.format));
    if by_format != Ordering::Equal {
        return by_format;
    }

    let ideal = |r: &FaviconResult| {
        r.dimensions
            .map(|d| (32..=64).contains(&d.width))
            .unwrap_or(false)
    };
    match (ideal(a), ideal(b)) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// The best accessible favicon for display, if any.
pub fn best_favicon(favicons: &[FaviconResult]) -> Option<&FaviconResult> {
    favicons
        .iter()
        .filter(|f| f.accessible)
        .min_by(|a, b| rank_for_display(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::knowledge_base::CheckId;
    use crate::core::models::Dimensions;

    fn check(status: CheckStatus) -> FaviconCheck {
        FaviconCheck::new(CheckId::AnyFavicon, "n", "d", status)
    }

    fn icon(format: Option<IconFormat>, width: Option<u32>) -> FaviconResult {
        FaviconResult {
            url: "https://example.com/i".into(),
            accessible: true,
            http_status: Some(200),
            size: None,
            format,
            dimensions: width.map(|w| Dimensions { width: w, height: w }),
        }
    }

    #[test]
    fn empty_scores_perfect() {
        let none: Vec<FaviconCheck> = Vec::new();
        assert_eq!(score(&none), 100);
    }

    #[test]
    fn single_status_weights() {
        assert_eq!(score(&[check(CheckStatus::Pass)]), 100);
        assert_eq!(score(&[check(CheckStatus::Fail)]), 0);
        assert_eq!(score(&[check(CheckStatus::Warning)]), 50);
        assert_eq!(score(&[check(CheckStatus::Info)]), 80);
    }

    #[test]
    fn mixed_statuses_average() {
        assert_eq!(score(&[check(CheckStatus::Pass), check(CheckStatus::Fail)]), 50);
        assert_eq!(
            score(&[
                check(CheckStatus::Pass),
                check(CheckStatus::Warning),
                check(CheckStatus::Info),
            ]),
            77
        );
    }

    #[test]
    fn flattening_differs_from_averaging_category_scores() {
        // One category of a single fail (score 0) and one of three passes
        // (score 100): the per-category average would be 50, but flattened
        // the fail is one check among four.
        let category_a = vec![check(CheckStatus::Fail)];
        let category_b = vec![
            check(CheckStatus::Pass),
            check(CheckStatus::Pass),
            check(CheckStatus::Pass),
        ];
        let flattened: Vec<_> = category_a.iter().chain(category_b.iter()).collect();
        assert_eq!(score(flattened), 75);
        assert_eq!((score(&category_a) as u32 + score(&category_b) as u32) / 2, 50);
    }

    #[test]
    fn svg_beats_png_beats_ico() {
        let set = vec![
            icon(Some(IconFormat::Ico), None),
            icon(Some(IconFormat::Png), None),
            icon(Some(IconFormat::Svg), None),
        ];
        assert_eq!(best_favicon(&set).unwrap().format, Some(IconFormat::Svg));

        let set = vec![icon(Some(IconFormat::Ico), None), icon(Some(IconFormat::Png), None)];
        assert_eq!(best_favicon(&set).unwrap().format, Some(IconFormat::Png));
    }

    #[test]
    fn ideal_size_window_breaks_ties() {
        let set = vec![
            icon(Some(IconFormat::Png), Some(512)),
            icon(Some(IconFormat::Png), Some(48)),
        ];
        assert_eq!(best_favicon(&set).unwrap().dimensions.unwrap().width, 48);
    }

    #[test]
    fn inaccessible_results_never_win() {
        let mut broken = icon(Some(IconFormat::Svg), None);
        broken.accessible = false;
        let set = vec![broken, icon(Some(IconFormat::Ico), None)];
        assert_eq!(best_favicon(&set).unwrap().format, Some(IconFormat::Ico));

        let none: Vec<FaviconResult> = vec![];
        assert!(best_favicon(&none).is_none());
    }
}
