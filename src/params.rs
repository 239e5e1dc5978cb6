//! The adjustment parameter schema.
//!
//! Every user-facing adjustment is declared here, in one place, with its
//! type, domain, and default:
//!
//! | name | type | domain | default |
//! |---|---|---|---|
//! | rotate | `f32` degrees | [0, 360) | 0 |
//! | zoom | `f32` border px | [0, 200] | 0 |
//! | flip | [`Flip`] | None, X, Y, Both | None |
//! | brightness | `f32` multiplier | [0, 5] | 1 |
//! | vibrance | `f32` multiplier | [0, 5] | 1 |
//! | grayscale | `bool` | — | false |
//! | invert | `bool` | — | false |
//! | blur | `f32` radius | [0, 30] | 0 |
//! | contrast | `f32` amount | [0, 10] | 0 |
//! | effect | [`Effect`] | None, Emboss, FindEdges, Contour, EdgeEnhance | None |
//!
//! A parameter at its default is a no-op: the pipeline skips that stage
//! entirely. Mutation goes through [`ParameterSet::apply`] with a
//! [`ParamChange`] event, which rejects out-of-domain values before they
//! reach the pipeline. The pipeline still calls [`ParameterSet::validate`]
//! on entry, so a set constructed by other means (deserialized from a saved
//! params file, for instance) cannot smuggle an invalid value through.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("{name} = {value} is outside its domain [{min}, {max}]")]
    OutOfDomain {
        name: &'static str,
        value: f32,
        min: f32,
        /// For rotate the domain is half-open: 360 itself is rejected.
        max: f32,
    },
}

/// Mirror axis for the flip stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Flip {
    #[default]
    None,
    /// Mirror horizontally (left-right).
    X,
    /// Flip vertically (top-bottom).
    Y,
    /// Both axes, equivalent to a 180° rotation.
    Both,
}

/// Categorical filter applied as the final pipeline stage.
///
/// At most one effect is active at a time — the enum makes the mutual
/// exclusion structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum Effect {
    #[default]
    None,
    Emboss,
    FindEdges,
    Contour,
    EdgeEnhance,
}

/// The live set of adjustment values for one edit session.
///
/// Plain data: the set knows its schema and defaults but performs no pixel
/// work. Serde round-trips it for saved parameter files; missing fields
/// deserialize to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    pub rotate: f32,
    pub zoom: f32,
    pub flip: Flip,
    pub brightness: f32,
    pub vibrance: f32,
    pub grayscale: bool,
    pub invert: bool,
    pub blur: f32,
    pub contrast: f32,
    pub effect: Effect,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            rotate: 0.0,
            zoom: 0.0,
            flip: Flip::None,
            brightness: 1.0,
            vibrance: 1.0,
            grayscale: false,
            invert: false,
            blur: 0.0,
            contrast: 0.0,
            effect: Effect::None,
        }
    }
}

/// A single parameter mutation: `(name, new value)` as a closed sum type.
///
/// This is the one event the editing session dispatches on — there is no
/// hidden observer registry. Every variant always triggers a full pipeline
/// recompute when applied through the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamChange {
    Rotate(f32),
    Zoom(f32),
    Flip(Flip),
    Brightness(f32),
    Vibrance(f32),
    Grayscale(bool),
    Invert(bool),
    Blur(f32),
    Contrast(f32),
    Effect(Effect),
}

impl ParamChange {
    /// Wire name of the parameter this change targets.
    pub fn name(&self) -> &'static str {
        match self {
            ParamChange::Rotate(_) => "rotate",
            ParamChange::Zoom(_) => "zoom",
            ParamChange::Flip(_) => "flip",
            ParamChange::Brightness(_) => "brightness",
            ParamChange::Vibrance(_) => "vibrance",
            ParamChange::Grayscale(_) => "grayscale",
            ParamChange::Invert(_) => "invert",
            ParamChange::Blur(_) => "blur",
            ParamChange::Contrast(_) => "contrast",
            ParamChange::Effect(_) => "effect",
        }
    }
}

/// Closed-interval domain check.
fn in_domain(name: &'static str, value: f32, min: f32, max: f32) -> Result<(), ParamError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ParamError::OutOfDomain {
            name,
            value,
            min,
            max,
        })
    }
}

/// Rotation uses a half-open domain: 360 wraps to 0 and is rejected.
fn in_rotate_domain(value: f32) -> Result<(), ParamError> {
    if value.is_finite() && value >= 0.0 && value < 360.0 {
        Ok(())
    } else {
        Err(ParamError::OutOfDomain {
            name: "rotate",
            value,
            min: 0.0,
            max: 360.0,
        })
    }
}

impl ParameterSet {
    /// True when every parameter equals its default, i.e. the pipeline is
    /// the identity transform.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Apply one change event, rejecting out-of-domain values.
    ///
    /// On rejection the set is left untouched.
    pub fn apply(&mut self, change: ParamChange) -> Result<(), ParamError> {
        match change {
            ParamChange::Rotate(v) => {
                in_rotate_domain(v)?;
                self.rotate = v;
            }
            ParamChange::Zoom(v) => {
                in_domain("zoom", v, 0.0, 200.0)?;
                self.zoom = v;
            }
            ParamChange::Flip(v) => self.flip = v,
            ParamChange::Brightness(v) => {
                in_domain("brightness", v, 0.0, 5.0)?;
                self.brightness = v;
            }
            ParamChange::Vibrance(v) => {
                in_domain("vibrance", v, 0.0, 5.0)?;
                self.vibrance = v;
            }
            ParamChange::Grayscale(v) => self.grayscale = v,
            ParamChange::Invert(v) => self.invert = v,
            ParamChange::Blur(v) => {
                in_domain("blur", v, 0.0, 30.0)?;
                self.blur = v;
            }
            ParamChange::Contrast(v) => {
                in_domain("contrast", v, 0.0, 10.0)?;
                self.contrast = v;
            }
            ParamChange::Effect(v) => self.effect = v,
        }
        Ok(())
    }

    /// Re-check every field against its domain.
    ///
    /// The pipeline calls this on entry so values that bypassed [`apply`]
    /// (deserialization, direct construction) are still caught.
    ///
    /// [`apply`]: ParameterSet::apply
    pub fn validate(&self) -> Result<(), ParamError> {
        in_rotate_domain(self.rotate)?;
        in_domain("zoom", self.zoom, 0.0, 200.0)?;
        in_domain("brightness", self.brightness, 0.0, 5.0)?;
        in_domain("vibrance", self.vibrance, 0.0, 5.0)?;
        in_domain("blur", self.blur, 0.0, 30.0)?;
        in_domain("contrast", self.contrast, 0.0, 10.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_schema_table() {
        let p = ParameterSet::default();
        assert_eq!(p.rotate, 0.0);
        assert_eq!(p.zoom, 0.0);
        assert_eq!(p.flip, Flip::None);
        assert_eq!(p.brightness, 1.0);
        assert_eq!(p.vibrance, 1.0);
        assert!(!p.grayscale);
        assert!(!p.invert);
        assert_eq!(p.blur, 0.0);
        assert_eq!(p.contrast, 0.0);
        assert_eq!(p.effect, Effect::None);
        assert!(p.is_default());
    }

    #[test]
    fn apply_in_domain_value() {
        let mut p = ParameterSet::default();
        p.apply(ParamChange::Brightness(2.5)).unwrap();
        assert_eq!(p.brightness, 2.5);
        assert!(!p.is_default());
    }

    #[test]
    fn apply_rejects_out_of_domain_and_leaves_set_untouched() {
        let mut p = ParameterSet::default();
        let err = p.apply(ParamChange::Zoom(201.0)).unwrap_err();
        assert!(matches!(err, ParamError::OutOfDomain { name: "zoom", .. }));
        assert!(p.is_default());
    }

    #[test]
    fn rotate_domain_is_half_open() {
        let mut p = ParameterSet::default();
        p.apply(ParamChange::Rotate(359.9)).unwrap();
        assert!(p.apply(ParamChange::Rotate(360.0)).is_err());
        assert!(p.apply(ParamChange::Rotate(-1.0)).is_err());
        // Failed applies keep the last good value
        assert_eq!(p.rotate, 359.9);
    }

    #[test]
    fn non_finite_values_rejected() {
        let mut p = ParameterSet::default();
        assert!(p.apply(ParamChange::Blur(f32::NAN)).is_err());
        assert!(p.apply(ParamChange::Brightness(f32::INFINITY)).is_err());
    }

    #[test]
    fn change_names_match_schema() {
        assert_eq!(ParamChange::Rotate(90.0).name(), "rotate");
        assert_eq!(ParamChange::Flip(Flip::X).name(), "flip");
        assert_eq!(ParamChange::Effect(Effect::Emboss).name(), "effect");
    }

    #[test]
    fn validate_catches_directly_constructed_invalid_set() {
        let p = ParameterSet {
            brightness: 9.0,
            ..ParameterSet::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn serde_round_trip() {
        let mut p = ParameterSet::default();
        p.apply(ParamChange::Rotate(45.0)).unwrap();
        p.apply(ParamChange::Effect(Effect::Contour)).unwrap();

        let json = serde_json::to_string(&p).unwrap();
        let back: ParameterSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn serde_missing_fields_take_defaults() {
        let p: ParameterSet = serde_json::from_str(r#"{"blur": 4.0}"#).unwrap();
        assert_eq!(p.blur, 4.0);
        assert_eq!(p.brightness, 1.0);
        assert_eq!(p.flip, Flip::None);
    }
}
