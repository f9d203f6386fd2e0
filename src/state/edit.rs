/// Non-destructive edit parameters
///
/// This struct stores all adjustments made to the open image.
/// The original pixels are never touched; the rendered image is
/// derived by replaying these parameters (see `imaging::render`).

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::error::ViewerError;

/// An adjustable scalar parameter
///
/// Each field holds at most one live value. Setting it again replaces
/// the previous value instead of stacking another filter.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Brightness,
    Contrast,
    Hue,
    Saturation,
    ColorBalance,
    Grayscale,
    Sepia,
    Blur,
}

impl Field {
    /// Order in which non-default fields are applied during recompute
    pub const REPLAY_ORDER: [Field; 8] = [
        Field::Brightness,
        Field::Contrast,
        Field::Hue,
        Field::Saturation,
        Field::ColorBalance,
        Field::Grayscale,
        Field::Sepia,
        Field::Blur,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Brightness => "brightness",
            Field::Contrast => "contrast",
            Field::Hue => "hue",
            Field::Saturation => "saturation",
            Field::ColorBalance => "color balance",
            Field::Grayscale => "grayscale",
            Field::Sepia => "sepia",
            Field::Blur => "blur",
        }
    }

    /// Valid slider domain; `None` for the grayscale flag
    pub fn range(self) -> Option<RangeInclusive<f32>> {
        match self {
            Field::Brightness | Field::Contrast => Some(-100.0..=100.0),
            Field::Hue => Some(-180.0..=180.0),
            Field::Saturation | Field::ColorBalance => Some(-100.0..=500.0),
            Field::Sepia | Field::Blur => Some(0.0..=100.0),
            Field::Grayscale => None,
        }
    }
}

/// A value for one scalar field
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    Brightness(f32),
    Contrast(f32),
    Hue(f32),
    Saturation(f32),
    /// Per-channel percentages [R, G, B]
    ColorBalance([f32; 3]),
    Grayscale(bool),
    Sepia(f32),
    Blur(f32),
}

impl Adjustment {
    pub fn field(&self) -> Field {
        match self {
            Adjustment::Brightness(_) => Field::Brightness,
            Adjustment::Contrast(_) => Field::Contrast,
            Adjustment::Hue(_) => Field::Hue,
            Adjustment::Saturation(_) => Field::Saturation,
            Adjustment::ColorBalance(_) => Field::ColorBalance,
            Adjustment::Grayscale(_) => Field::Grayscale,
            Adjustment::Sepia(_) => Field::Sepia,
            Adjustment::Blur(_) => Field::Blur,
        }
    }

    /// True when this value leaves the image untouched
    pub fn is_default(&self) -> bool {
        match *self {
            Adjustment::ColorBalance(rgb) => rgb == [0.0; 3],
            Adjustment::Grayscale(on) => !on,
            Adjustment::Brightness(v)
            | Adjustment::Contrast(v)
            | Adjustment::Hue(v)
            | Adjustment::Saturation(v)
            | Adjustment::Sepia(v)
            | Adjustment::Blur(v) => v == 0.0,
        }
    }

    /// Clamp into the field's domain, rejecting NaN and infinities
    ///
    /// Brightness and hue render in whole units, so they are rounded here
    /// and history never records a change the image cannot show.
    pub fn clamped(self) -> Result<Self, ViewerError> {
        let field = self.field();
        let clamp = |v: f32| -> Result<f32, ViewerError> {
            if !v.is_finite() {
                return Err(ViewerError::InvalidParameter {
                    field: field.name(),
                    value: v,
                });
            }
            let range = field.range().unwrap_or(0.0..=0.0);
            Ok(v.clamp(*range.start(), *range.end()))
        };

        Ok(match self {
            Adjustment::Brightness(v) => Adjustment::Brightness(clamp(v)?.round()),
            Adjustment::Contrast(v) => Adjustment::Contrast(clamp(v)?),
            Adjustment::Hue(v) => Adjustment::Hue(clamp(v)?.round()),
            Adjustment::Saturation(v) => Adjustment::Saturation(clamp(v)?),
            Adjustment::ColorBalance([r, g, b]) => {
                Adjustment::ColorBalance([clamp(r)?, clamp(g)?, clamp(b)?])
            }
            Adjustment::Grayscale(on) => Adjustment::Grayscale(on),
            Adjustment::Sepia(v) => Adjustment::Sepia(clamp(v)?),
            Adjustment::Blur(v) => Adjustment::Blur(clamp(v)?),
        })
    }
}

/// Geometric step; these accumulate instead of replacing each other
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformOp {
    /// 90 degrees counter-clockwise
    Rotate90,
    FlipHorizontal,
    FlipVertical,
}

impl TransformOp {
    pub fn name(self) -> &'static str {
        match self {
            TransformOp::Rotate90 => "rotate 90°",
            TransformOp::FlipHorizontal => "flip horizontally",
            TransformOp::FlipVertical => "flip vertically",
        }
    }
}

/// A single user change, consumed by `Session::apply`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edit {
    /// Replace the value of one scalar field
    Adjust(Adjustment),
    /// Append a transform step
    Transform(TransformOp),
}

/// All edit parameters for the open image
///
/// All defaults are "no adjustment". Serialized to JSON for export
/// and debugging.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct EditParams {
    // ========== General ==========
    /// Brightness (-100.0 to +100.0), percent of full scale
    pub brightness: f32,

    /// Contrast (-100.0 to +100.0)
    pub contrast: f32,

    /// Hue rotation in degrees (-180.0 to +180.0)
    pub hue: f32,

    /// Saturation (-100.0 to +500.0)
    /// - -100.0 = no color, 0.0 = original
    pub saturation: f32,

    // ========== Color Balance ==========
    /// Per-channel gain in percent [R, G, B], each -100.0 to +500.0
    pub color_balance: [f32; 3],

    // ========== Filter ==========
    pub grayscale: bool,

    /// Sepia strength (0.0 to 100.0)
    pub sepia: f32,

    /// Gaussian blur sigma (0.0 to 100.0)
    pub blur: f32,

    // ========== Transform ==========
    /// Rotations and flips in the order they were committed
    pub transforms: Vec<TransformOp>,
}

impl EditParams {
    /// Create new default edit parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a field
    pub fn get(&self, field: Field) -> Adjustment {
        match field {
            Field::Brightness => Adjustment::Brightness(self.brightness),
            Field::Contrast => Adjustment::Contrast(self.contrast),
            Field::Hue => Adjustment::Hue(self.hue),
            Field::Saturation => Adjustment::Saturation(self.saturation),
            Field::ColorBalance => Adjustment::ColorBalance(self.color_balance),
            Field::Grayscale => Adjustment::Grayscale(self.grayscale),
            Field::Sepia => Adjustment::Sepia(self.sepia),
            Field::Blur => Adjustment::Blur(self.blur),
        }
    }

    /// Replace the value of the adjustment's field
    pub fn set(&mut self, adjustment: Adjustment) {
        match adjustment {
            Adjustment::Brightness(v) => self.brightness = v,
            Adjustment::Contrast(v) => self.contrast = v,
            Adjustment::Hue(v) => self.hue = v,
            Adjustment::Saturation(v) => self.saturation = v,
            Adjustment::ColorBalance(rgb) => self.color_balance = rgb,
            Adjustment::Grayscale(on) => self.grayscale = on,
            Adjustment::Sepia(v) => self.sepia = v,
            Adjustment::Blur(v) => self.blur = v,
        }
    }

    /// Non-default adjustments in replay order
    pub fn active_adjustments(&self) -> impl Iterator<Item = Adjustment> + '_ {
        Field::REPLAY_ORDER
            .iter()
            .map(|&field| self.get(field))
            .filter(|adjustment| !adjustment.is_default())
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this represents an unedited image (all values at default)
    pub fn is_unedited(&self) -> bool {
        *self == Self::default()
    }

    /// Reset all adjustments to default (no edits)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unedited() {
        let params = EditParams::default();
        assert!(params.is_unedited());
        assert_eq!(params.active_adjustments().count(), 0);
    }

    #[test]
    fn test_serialization() {
        let mut params = EditParams::default();
        params.brightness = 15.0;
        params.color_balance = [10.0, 0.0, -20.0];
        params.transforms.push(TransformOp::Rotate90);

        let json = params.to_json().unwrap();
        let restored = EditParams::from_json(&json).unwrap();

        assert_eq!(params, restored);
        assert!(!restored.is_unedited());
    }

    #[test]
    fn test_reset() {
        let mut params = EditParams::default();
        params.contrast = 50.0;
        params.grayscale = true;
        params.transforms.push(TransformOp::FlipVertical);

        assert!(!params.is_unedited());

        params.reset();

        assert!(params.is_unedited());
        assert!(params.transforms.is_empty());
    }

    #[test]
    fn test_set_replaces_field_value() {
        let mut params = EditParams::default();
        params.set(Adjustment::Brightness(10.0));
        params.set(Adjustment::Brightness(40.0));

        assert_eq!(params.get(Field::Brightness), Adjustment::Brightness(40.0));
        assert_eq!(
            params.active_adjustments().collect::<Vec<_>>(),
            vec![Adjustment::Brightness(40.0)]
        );
    }

    #[test]
    fn test_active_adjustments_follow_replay_order() {
        let mut params = EditParams::default();
        params.set(Adjustment::Blur(3.0));
        params.set(Adjustment::Grayscale(true));
        params.set(Adjustment::Brightness(-5.0));
        params.set(Adjustment::Hue(90.0));

        let fields: Vec<Field> = params.active_adjustments().map(|a| a.field()).collect();
        assert_eq!(
            fields,
            vec![Field::Brightness, Field::Hue, Field::Grayscale, Field::Blur]
        );
    }

    #[test]
    fn test_clamp_into_domain() {
        assert_eq!(
            Adjustment::Hue(400.0).clamped().unwrap(),
            Adjustment::Hue(180.0)
        );
        assert_eq!(
            Adjustment::ColorBalance([-300.0, 20.0, 900.0]).clamped().unwrap(),
            Adjustment::ColorBalance([-100.0, 20.0, 500.0])
        );
        assert_eq!(
            Adjustment::Sepia(-1.0).clamped().unwrap(),
            Adjustment::Sepia(0.0)
        );
    }

    #[test]
    fn test_whole_unit_fields_are_rounded() {
        assert_eq!(Adjustment::Hue(12.4).clamped().unwrap(), Adjustment::Hue(12.0));
        assert_eq!(
            Adjustment::Brightness(-33.6).clamped().unwrap(),
            Adjustment::Brightness(-34.0)
        );
        assert_eq!(
            Adjustment::Contrast(12.4).clamped().unwrap(),
            Adjustment::Contrast(12.4)
        );
    }

    #[test]
    fn test_clamp_rejects_nan() {
        let err = Adjustment::Contrast(f32::NAN).clamped().unwrap_err();
        assert!(matches!(
            err,
            ViewerError::InvalidParameter { field: "contrast", .. }
        ));
    }
}
