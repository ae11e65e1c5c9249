//! Engine configuration.
//!
//! Every field has a default, so a configuration file only needs to name
//! the values it changes:
//!
//! ```json
//! { "fonts": { "mobile": { "base": 36, "min": 18, "max": 64 } } }
//! ```

use crate::device::{Breakpoints, Device, DeviceClass, Viewport};
use crate::scheduler::RetryPolicy;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use texfit_layout::{LayoutOptions, OptionsError};
use thiserror::Error;

/// Font sizes, in pixels, for one device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontScale {
    /// Size candidates are measured at.
    pub base: u32,
    pub min: u32,
    pub max: u32,
}

impl FontScale {
    /// Clamps `size` into `[min, max]`, rounding down.
    pub fn clamp(&self, size: f64) -> u32 {
        let size = if size.is_nan() { self.min as f64 } else { size.floor() };
        size.max(self.min as f64).min(self.max as f64) as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontScales {
    pub mobile: FontScale,
    pub tablet: FontScale,
    pub desktop: FontScale,
}

impl Default for FontScales {
    fn default() -> Self {
        Self {
            mobile: FontScale {
                base: 40,
                min: 18,
                max: 64,
            },
            tablet: FontScale {
                base: 48,
                min: 24,
                max: 96,
            },
            desktop: FontScale {
                base: 64,
                min: 32,
                max: 120,
            },
        }
    }
}

impl FontScales {
    pub fn for_class(&self, class: DeviceClass) -> &FontScale {
        match class {
            DeviceClass::Mobile => &self.mobile,
            DeviceClass::Tablet => &self.tablet,
            DeviceClass::Desktop => &self.desktop,
        }
    }
}

/// Narrow phones measure at a smaller base size than the mobile default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MobileTier {
    pub max_width: f64,
    pub base: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub layout: LayoutOptions,
    pub breakpoints: Breakpoints,
    pub fonts: FontScales,
    /// Checked in order; the first tier whose `max_width` admits the
    /// viewport wins, otherwise `fonts.mobile.base` applies.
    pub mobile_tiers: Vec<MobileTier>,
    /// Fraction of the theoretical maximum size actually used.
    pub safety_margin: f64,
    pub retry: RetryPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            breakpoints: Breakpoints::default(),
            fonts: FontScales::default(),
            mobile_tiers: vec![
                MobileTier {
                    max_width: 360.0,
                    base: 28,
                },
                MobileTier {
                    max_width: 480.0,
                    base: 32,
                },
            ],
            safety_margin: 0.96,
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Layout(#[from] OptionsError),
    #[error("breakpoints must increase: mobile {mobile}, tablet {tablet}, desktop {desktop}")]
    Breakpoints { mobile: f64, tablet: f64, desktop: f64 },
    #[error("{class:?} font bounds are invalid: base {base}, min {min}, max {max}")]
    FontBounds {
        class: DeviceClass,
        base: u32,
        min: u32,
        max: u32,
    },
    #[error("mobile tier base size {base} is outside the mobile font bounds")]
    MobileTier { base: u32 },
    #[error("safety margin must lie in (0, 1], got {0}")]
    SafetyMargin(f64),
}

impl EngineConfig {
    /// Reads and validates a JSON configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        info!("loaded engine configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;

        let bp = &self.breakpoints;
        if !(0.0 < bp.mobile && bp.mobile < bp.tablet && bp.tablet < bp.desktop) {
            return Err(ConfigError::Breakpoints {
                mobile: bp.mobile,
                tablet: bp.tablet,
                desktop: bp.desktop,
            });
        }

        for class in [DeviceClass::Mobile, DeviceClass::Tablet, DeviceClass::Desktop] {
            let scale = self.fonts.for_class(class);
            let ordered = scale.min > 0 && scale.min <= scale.max;
            if !ordered || !(scale.min..=scale.max).contains(&scale.base) {
                return Err(ConfigError::FontBounds {
                    class,
                    base: scale.base,
                    min: scale.min,
                    max: scale.max,
                });
            }
        }

        let mobile = &self.fonts.mobile;
        if let Some(tier) = self
            .mobile_tiers
            .iter()
            .find(|tier| !(mobile.min..=mobile.max).contains(&tier.base))
        {
            return Err(ConfigError::MobileTier { base: tier.base });
        }

        if !(self.safety_margin > 0.0 && self.safety_margin <= 1.0) {
            return Err(ConfigError::SafetyMargin(self.safety_margin));
        }
        Ok(())
    }

    /// Font size candidates are measured at on `device`.
    pub fn base_font_size(&self, device: &Device) -> u32 {
        match device.class {
            DeviceClass::Mobile => self
                .mobile_tiers
                .iter()
                .find(|tier| device.viewport.width <= tier.max_width)
                .map_or(self.fonts.mobile.base, |tier| tier.base),
            class => self.fonts.for_class(class).base,
        }
    }

    pub fn font_scale(&self, device: &Device) -> &FontScale {
        self.fonts.for_class(device.class)
    }

    pub fn device(&self, viewport: Viewport) -> Device {
        Device::detect(viewport, &self.breakpoints)
    }
}
