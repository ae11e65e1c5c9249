//! Device classification and container padding.

use crate::measure::BoxSize;
use serde::{Deserialize, Serialize};

/// CSS pixels per rem.
pub const PX_PER_REM: f64 = 16.0;

/// Coarse screen bucket that selects font bounds and padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    pub fn from_width(width: f64, breakpoints: &Breakpoints) -> Self {
        if width <= breakpoints.mobile {
            DeviceClass::Mobile
        } else if width <= breakpoints.tablet {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }
}

/// Viewport widths, in CSS pixels, separating the device classes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub mobile: f64,
    pub tablet: f64,
    /// Viewports at least this wide count as large.
    pub desktop: f64,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            mobile: 600.0,
            tablet: 768.0,
            desktop: 1024.0,
        }
    }
}

impl Breakpoints {
    pub fn is_large(&self, width: f64) -> bool {
        width >= self.desktop
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A viewport together with its classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Device {
    pub viewport: Viewport,
    pub class: DeviceClass,
    pub is_large: bool,
}

impl Device {
    pub fn detect(viewport: Viewport, breakpoints: &Breakpoints) -> Self {
        Self {
            viewport,
            class: DeviceClass::from_width(viewport.width, breakpoints),
            is_large: breakpoints.is_large(viewport.width),
        }
    }
}

/// Horizontal and vertical padding on each side of the content, in rem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub x: f64,
    pub y: f64,
}

impl Padding {
    /// Padding for `container` on `device`.
    ///
    /// Mobile padding shrinks as the container approaches the full viewport
    /// width. Larger screens get more room, up to one rem horizontally.
    pub fn for_device(device: &Device, container: BoxSize) -> Self {
        match device.class {
            DeviceClass::Mobile => {
                let font_scale = if device.viewport.width > 0.0 {
                    (container.width / device.viewport.width).min(1.0)
                } else {
                    1.0
                };
                let factor = (1.0 - font_scale * 0.2).max(0.1);
                Padding {
                    x: 0.25 * factor,
                    y: 0.125 * factor,
                }
            }
            DeviceClass::Tablet | DeviceClass::Desktop => {
                let factor: f64 = if device.is_large { 1.5 } else { 1.0 };
                Padding {
                    x: (0.5 * factor).min(1.0),
                    y: (0.25 * factor).min(0.5),
                }
            }
        }
    }

    /// The box left for content once this padding is applied on all sides.
    pub fn inner(&self, container: BoxSize) -> BoxSize {
        BoxSize::new(
            container.width - 2.0 * self.x * PX_PER_REM,
            container.height - 2.0 * self.y * PX_PER_REM,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(width: f64) -> Device {
        Device::detect(Viewport::new(width, 800.0), &Breakpoints::default())
    }

    #[test]
    fn test_classification() {
        let bp = Breakpoints::default();
        assert_eq!(DeviceClass::from_width(320.0, &bp), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_width(600.0, &bp), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_width(601.0, &bp), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_width(768.0, &bp), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_width(1280.0, &bp), DeviceClass::Desktop);
        assert!(bp.is_large(1024.0));
        assert!(!bp.is_large(1023.0));
    }

    #[test]
    fn test_mobile_padding_shrinks_with_container() {
        let phone = device(400.0);
        let narrow = Padding::for_device(&phone, BoxSize::new(100.0, 50.0));
        let full = Padding::for_device(&phone, BoxSize::new(400.0, 50.0));
        assert!(narrow.x > full.x);
        assert!((full.x - 0.2).abs() < 1e-9);
        assert!((full.y - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_large_desktop_padding() {
        let padding = Padding::for_device(&device(1440.0), BoxSize::new(800.0, 200.0));
        assert_eq!(padding, Padding { x: 0.75, y: 0.375 });
        let padding = Padding::for_device(&device(900.0), BoxSize::new(800.0, 200.0));
        assert_eq!(padding, Padding { x: 0.5, y: 0.25 });
    }

    #[test]
    fn test_inner_box() {
        let padding = Padding { x: 0.5, y: 0.25 };
        assert_eq!(
            padding.inner(BoxSize::new(100.0, 50.0)),
            BoxSize::new(84.0, 42.0)
        );
    }

    #[test]
    fn test_zero_viewport_does_not_divide() {
        let padding = Padding::for_device(&device(0.0), BoxSize::new(0.0, 0.0));
        assert!(padding.x.is_finite());
    }
}
