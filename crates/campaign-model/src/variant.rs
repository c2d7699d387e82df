//! Render variants: the four assets every run produces.
//!
//! A run crosses two layouts (square community post, wide channel art) with
//! two content states (standard, with expiry notice). Everything that differs
//! between them lives in the lookup tables below.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use promokit_common::error::RenderError;

use crate::payload::DiscountKind;

/// Target raster dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl fmt::Display for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The two markup templates known to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateId {
    Community,
    ChannelArt,
}

impl TemplateId {
    pub const ALL: [TemplateId; 2] = [TemplateId::Community, TemplateId::ChannelArt];

    /// File name the template is registered and loaded under.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Community => "community_template.html",
            Self::ChannelArt => "yt_template.html",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

impl FromStr for TemplateId {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.file_name() == s)
            .ok_or_else(|| RenderError::UnknownTemplate {
                name: s.to_string(),
            })
    }
}

/// Output layout of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutKind {
    /// Square community post.
    Community,
    /// Wide channel banner.
    ChannelArt,
}

/// Whether a variant carries the expiry notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentState {
    Standard,
    Expiry,
}

impl LayoutKind {
    pub fn template(self) -> TemplateId {
        match self {
            Self::Community => TemplateId::Community,
            Self::ChannelArt => TemplateId::ChannelArt,
        }
    }

    pub fn size(self) -> PixelSize {
        match self {
            Self::Community => PixelSize::new(1080, 1080),
            Self::ChannelArt => PixelSize::new(1600, 900),
        }
    }

    /// Short tag used in output file names.
    pub fn file_tag(self) -> &'static str {
        match self {
            Self::Community => "Comm",
            Self::ChannelArt => "YT",
        }
    }

    /// Background file for this layout under a campaign's image folder.
    pub fn background_file(self, discount: DiscountKind) -> &'static str {
        match (self, discount) {
            (Self::Community, DiscountKind::Flat) => "Community_flatdiscount.png",
            (Self::Community, DiscountKind::FlatAdditional) => "Community_additionaldiscount.png",
            (Self::ChannelArt, DiscountKind::Flat) => "ytchannelart_flatdiscount.png",
            (Self::ChannelArt, DiscountKind::FlatAdditional) => {
                "ytchannelart_additionaldiscount.png"
            }
        }
    }
}

impl ContentState {
    pub fn shows_expiry(self) -> bool {
        matches!(self, Self::Expiry)
    }

    pub fn file_tag(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Expiry => "Expiry",
        }
    }
}

/// Layout x content-state pairs, in output order.
pub const VARIANT_TABLE: [(LayoutKind, ContentState); 4] = [
    (LayoutKind::Community, ContentState::Standard),
    (LayoutKind::Community, ContentState::Expiry),
    (LayoutKind::ChannelArt, ContentState::Standard),
    (LayoutKind::ChannelArt, ContentState::Expiry),
];

/// Descriptor of one output asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderVariant {
    /// Final file name, e.g. `Super Sale_Comm_Standard.png`.
    pub output_name: String,
    pub background: PathBuf,
    pub template: TemplateId,
    pub use_expiry: bool,
    pub size: PixelSize,
    pub layout: LayoutKind,
    pub state: ContentState,
}

impl RenderVariant {
    /// Name of the intermediate snapshot written for this variant.
    pub fn snapshot_name(&self) -> String {
        format!("temp_{}", self.output_name.replace(' ', "_"))
    }
}

/// Folder holding a campaign's backgrounds.
pub fn campaign_background_dir(base_images_dir: &Path, campaign_name: &str) -> PathBuf {
    base_images_dir.join(campaign_name)
}

/// Derive the four variants of a run.
///
/// All four share the background selection made here from the campaign name
/// and discount kind.
pub fn derive_variants(
    campaign_name: &str,
    discount: DiscountKind,
    base_images_dir: &Path,
) -> [RenderVariant; 4] {
    let folder = campaign_background_dir(base_images_dir, campaign_name);
    VARIANT_TABLE.map(|(layout, state)| RenderVariant {
        output_name: format!(
            "{campaign_name}_{}_{}.png",
            layout.file_tag(),
            state.file_tag()
        ),
        background: folder.join(layout.background_file(discount)),
        template: layout.template(),
        use_expiry: state.shows_expiry(),
        size: layout.size(),
        layout,
        state,
    })
}

/// Suggested download name for a campaign's archive.
pub fn archive_file_name(campaign_name: &str) -> String {
    format!("{}_Assets.zip", campaign_name.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_variants_with_expected_names() {
        let variants = derive_variants("Super Sale", DiscountKind::Flat, Path::new("base_images"));
        let names: Vec<_> = variants.iter().map(|v| v.output_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Super Sale_Comm_Standard.png",
                "Super Sale_Comm_Expiry.png",
                "Super Sale_YT_Standard.png",
                "Super Sale_YT_Expiry.png",
            ]
        );
    }

    #[test]
    fn test_flat_backgrounds_and_sizes() {
        let variants = derive_variants("Super Sale", DiscountKind::Flat, Path::new("base_images"));
        assert_eq!(
            variants[0].background,
            PathBuf::from("base_images/Super Sale/Community_flatdiscount.png")
        );
        assert_eq!(variants[1].background, variants[0].background);
        assert_eq!(
            variants[2].background,
            PathBuf::from("base_images/Super Sale/ytchannelart_flatdiscount.png")
        );
        assert_eq!(variants[0].size, PixelSize::new(1080, 1080));
        assert_eq!(variants[3].size, PixelSize::new(1600, 900));
        assert_eq!(variants[2].template, TemplateId::ChannelArt);
    }

    #[test]
    fn test_additional_backgrounds() {
        let variants = derive_variants("Maha Sale", DiscountKind::FlatAdditional, Path::new("bg"));
        assert!(variants[0]
            .background
            .ends_with("Maha Sale/Community_additionaldiscount.png"));
        assert!(variants[3]
            .background
            .ends_with("Maha Sale/ytchannelart_additionaldiscount.png"));
    }

    #[test]
    fn test_expiry_flags_follow_state() {
        let variants = derive_variants("Wow Sale", DiscountKind::Flat, Path::new("bg"));
        let flags: Vec<_> = variants.iter().map(|v| v.use_expiry).collect();
        assert_eq!(flags, vec![false, true, false, true]);
    }

    #[test]
    fn test_snapshot_and_archive_names_replace_spaces() {
        let variants = derive_variants("Flash Sale", DiscountKind::Flat, Path::new("bg"));
        assert_eq!(variants[1].snapshot_name(), "temp_Flash_Sale_Comm_Expiry.png");
        assert_eq!(archive_file_name("Flash Sale"), "Flash_Sale_Assets.zip");
    }

    #[test]
    fn test_template_id_parses_file_names() {
        assert_eq!(
            "yt_template.html".parse::<TemplateId>().unwrap(),
            TemplateId::ChannelArt
        );
        let err = "story.html".parse::<TemplateId>().unwrap_err();
        assert!(matches!(err, RenderError::UnknownTemplate { .. }));
    }

    proptest::proptest! {
        #[test]
        fn prop_variant_names_follow_scheme(name in "[A-Za-z][A-Za-z ]{0,20}") {
            let variants = derive_variants(&name, DiscountKind::FlatAdditional, Path::new("bg"));
            let mut names: Vec<_> = variants.iter().map(|v| v.output_name.clone()).collect();
            names.dedup();
            proptest::prop_assert_eq!(names.len(), 4);
            let prefix = format!("{name}_");
            for variant in &variants {
                proptest::prop_assert!(variant.output_name.starts_with(&prefix));
                proptest::prop_assert!(!variant.snapshot_name().contains(' '));
            }
            proptest::prop_assert!(!archive_file_name(&name).contains(' '));
        }
    }
}
