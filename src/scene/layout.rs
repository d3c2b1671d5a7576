//! Background and desk selection for a position in the courtroom.

use crate::assets::{background_path, AssetResolver, IMAGE_EXTENSIONS};

/// Background and desk images for one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneLayout {
    pub side: String,
    pub background: String,
    pub desk: String,
    pub desk_visible: bool,
}

/// Background and desk image names for a side.
pub fn side_images(side: &str) -> (&'static str, &'static str) {
    match side {
        "def" => ("defenseempty", "defensedesk"),
        "pro" => ("prosecutorempty", "prosecutiondesk"),
        "jud" => ("judgestand", "judgedesk"),
        "hld" => ("helperstand", "helperdesk"),
        "hlp" => ("prohelperstand", "prohelperdesk"),
        _ => ("witnessempty", "stand"),
    }
}

/// Sides that stand behind no desk unless the message forces one.
fn deskless_by_default(side: &str) -> bool {
    matches!(side, "jud" | "hld" | "hlp")
}

/// Backgrounds without all three standard desks draw no desk at all.
fn has_standard_desks(assets: &dyn AssetResolver) -> bool {
    ["defensedesk", "prosecutiondesk", "stand"]
        .iter()
        .all(|desk| assets.find_asset(&[background_path(desk)], IMAGE_EXTENSIONS).is_some())
}

/// `desk_modifier` is `"1"` to force the desk, `"0"` to hide it; anything
/// else uses the side's default.
pub fn resolve(side: &str, desk_modifier: &str, assets: &dyn AssetResolver) -> SceneLayout {
    let (background, desk) = side_images(side);
    if assets
        .find_asset(&[background_path(background)], IMAGE_EXTENSIONS)
        .is_none()
    {
        tracing::warn!("Missing background image {}", background);
    }

    let desk_visible = match desk_modifier.trim() {
        "0" => false,
        "1" => true,
        _ => !deskless_by_default(side),
    } && has_standard_desks(assets);

    SceneLayout {
        side: side.to_string(),
        background: background.to_string(),
        desk: desk.to_string(),
        desk_visible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AnyAsset, StaticAssets};

    #[test]
    fn test_side_images() {
        assert_eq!(side_images("pro"), ("prosecutorempty", "prosecutiondesk"));
        assert_eq!(side_images("wit"), ("witnessempty", "stand"));
        assert_eq!(side_images("jur"), ("witnessempty", "stand"));
    }

    #[test]
    fn test_desk_modifier_rules() {
        assert!(resolve("def", "chat", &AnyAsset).desk_visible);
        assert!(!resolve("def", "0", &AnyAsset).desk_visible);
        assert!(!resolve("jud", "chat", &AnyAsset).desk_visible);
        assert!(resolve("jud", "1", &AnyAsset).desk_visible);
    }

    #[test]
    fn test_missing_standard_desk_hides_desk() {
        let assets = StaticAssets::new()
            .with("background/defensedesk.png")
            .with("background/stand.png");
        assert!(!resolve("def", "1", &assets).desk_visible);
    }
}
