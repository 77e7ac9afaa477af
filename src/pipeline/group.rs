//! Group classification.
//!
//! Every asset starts in the group named after its directory. Classifiers
//! run in order and each may append one more key segment; the built-in
//! ratio classifier always runs first.

use crate::asset::Asset;
use crate::output::{display_path, Printer};

/// A user group classifier.
///
/// `Ok(Some(segment))` appends `segment` to the asset's group key.
/// `Ok(None)`, an empty segment and `Err` all leave the key unchanged.
pub type GroupFn = Box<dyn Fn(&Asset) -> Result<Option<String>, String> + Send + Sync>;

/// Built-in classifier: `@2x` / `@3x` for retina assets.
pub fn ratio_group(asset: &Asset) -> Option<String> {
    asset.is_retina().then(|| format!("@{}x", asset.ratio))
}

/// Run the ratio classifier followed by `group_by` over every asset.
pub fn apply_group_by(assets: &mut [Asset], group_by: &[GroupFn], printer: &Printer) {
    for asset in assets.iter_mut() {
        if let Some(segment) = ratio_group(asset) {
            asset.groups.push(segment);
        }

        for classify in group_by {
            match classify(asset) {
                Ok(Some(segment)) if !segment.is_empty() => asset.groups.push(segment),
                Ok(_) => {}
                Err(reason) => printer.debug(
                    "Skipped",
                    &format!("group for {}: {}", display_path(&asset.path), reason),
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use std::path::{Path, PathBuf};

    fn asset(name: &str) -> Asset {
        Asset::new(
            PathBuf::from(format!("/slice/icons/{}", name)),
            Path::new("/slice/icons"),
            Path::new("/dist"),
            None,
            "__",
        )
        .unwrap()
    }

    fn quiet() -> Printer {
        Printer::new(LogLevel::Silent)
    }

    #[test]
    fn test_ratio_group() {
        assert_eq!(ratio_group(&asset("a.png")), None);
        assert_eq!(ratio_group(&asset("a@2x.png")).as_deref(), Some("@2x"));
        assert_eq!(ratio_group(&asset("a@3x.png")).as_deref(), Some("@3x"));
    }

    #[test]
    fn test_ratio_segment_comes_before_user_segments() {
        let mut assets = vec![asset("dark-a@2x.png"), asset("light-b.png")];
        let by_theme: GroupFn = Box::new(|a: &Asset| {
            Ok(a.name.split('-').next().map(str::to_string))
        });

        apply_group_by(&mut assets, &[by_theme], &quiet());

        assert_eq!(assets[0].groups, vec!["icons", "@2x", "dark"]);
        assert_eq!(assets[1].groups, vec!["icons", "light"]);
    }

    #[test]
    fn test_failing_and_empty_classifiers_are_ignored() {
        let mut assets = vec![asset("a.png")];
        let failing: GroupFn = Box::new(|_: &Asset| Err("no theme".to_string()));
        let empty: GroupFn = Box::new(|_: &Asset| Ok(Some(String::new())));
        let none: GroupFn = Box::new(|_: &Asset| Ok(None));

        apply_group_by(&mut assets, &[failing, empty, none], &quiet());

        assert_eq!(assets[0].groups, vec!["icons"]);
    }
}
