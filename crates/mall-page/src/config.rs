//! Page configuration
//!
//! Every timing, threshold, and text the behaviors use. Defaults describe the
//! storefront as shipped; a JSON document may override any subset.

use serde::Deserialize;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid page config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("opening hours must satisfy 0 <= opens < closes <= 24 (got {opens}..{closes})")]
    InvalidHours { opens: f64, closes: f64 },

    #[error("{name} threshold must lie in [0, 1] (got {value})")]
    InvalidThreshold { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub loader: LoaderConfig,
    pub navigation: NavigationConfig,
    pub lazy: LazyConfig,
    pub filter: FilterConfig,
    pub open_status: OpenStatusConfig,
    pub scroll_reveal: ScrollRevealConfig,
    pub back_to_top: BackToTopConfig,
    pub popup: PopupConfig,
}

impl PageConfig {
    /// Defaults overlaid with a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let hours = &self.open_status;
        if !(0.0 <= hours.opens && hours.opens < hours.closes && hours.closes <= 24.0) {
            return Err(ConfigError::InvalidHours {
                opens: hours.opens,
                closes: hours.closes,
            });
        }
        for (name, value) in [
            ("lazy", self.lazy.threshold),
            ("scroll reveal", self.scroll_reveal.threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Asset URLs that gate the loading overlay; `.mp4` entries are videos
    pub critical_assets: Vec<String>,
    /// Pause between the last asset settling and hiding the overlay
    pub completion_delay_ms: u32,
    /// Pause between hiding the overlay and revealing on-screen elements
    pub reveal_delay_ms: u32,
    /// Hard upper bound on the overlay's lifetime
    pub fallback_timeout_ms: u32,
    pub forced_hide_delay_ms: u32,
    /// A critical video that never reports counts as loaded after this long
    pub video_fallback_ms: u32,
    /// A critical video absent from the page counts as loaded after this long
    pub missing_video_delay_ms: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            critical_assets: vec![
                "assets/logo.jpg".into(),
                "assets/hero bg.mp4".into(),
                "assets/about us.mp4".into(),
            ],
            completion_delay_ms: 500,
            reveal_delay_ms: 300,
            fallback_timeout_ms: 5000,
            forced_hide_delay_ms: 300,
            video_fallback_ms: 2000,
            missing_video_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    /// Scroll offset at or above which the navbar shows its scrolled state
    pub scrolled_threshold: f64,
    /// Added to the scroll offset when picking the active section
    pub header_offset: f64,
    /// Gap left above an anchor target after smooth scrolling
    pub anchor_offset: f64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold: 100.0,
            header_offset: 150.0,
            anchor_offset: 80.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LazyConfig {
    pub image_margin: f64,
    pub video_margin: f64,
    pub threshold: f64,
}

impl Default for LazyConfig {
    fn default() -> Self {
        Self {
            image_margin: 50.0,
            video_margin: 100.0,
            threshold: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Filter value that matches every card
    pub all_sentinel: String,
    /// Entrance delay added per card position, in seconds
    pub stagger_step_s: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            all_sentinel: "all".into(),
            stagger_step_s: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenStatusConfig {
    /// Opening time in fractional hours (08:30 = 8.5)
    pub opens: f64,
    pub closes: f64,
    pub open_html: String,
    pub closed_html: String,
    pub refresh_ms: u32,
}

impl Default for OpenStatusConfig {
    fn default() -> Self {
        Self {
            opens: 8.5,
            closes: 21.0,
            open_html: r#"<span class="open">Ouvert maintenant</span> - Ferme à 21h00"#.into(),
            closed_html: r#"<span class="closed">Fermé</span> - Ouvre à 08h30"#.into(),
            refresh_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollRevealConfig {
    /// Elements flagged for reveal-on-scroll
    pub selector: String,
    pub threshold: f64,
    /// Bottom root margin; negative fires before full entry
    pub bottom_margin: f64,
}

impl Default for ScrollRevealConfig {
    fn default() -> Self {
        Self {
            selector: ".section-header, .about-video, .about-content, .product-card, \
                       .video-card, .schedule-info, .schedule-map, .contact-card, .cta-content"
                .into(),
            threshold: 0.1,
            bottom_margin: -50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackToTopConfig {
    pub threshold: f64,
}

impl Default for BackToTopConfig {
    fn default() -> Self {
        Self { threshold: 500.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopupConfig {
    pub delay_ms: u32,
    /// sessionStorage key recording that the popup was shown
    pub session_key: String,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            delay_ms: 3000,
            session_key: "christmasPopupShown".into(),
        }
    }
}
