//! Classifier input preparation from measured skin and eye colors

use serde::{Deserialize, Serialize};

use crate::color::{ColorConverter, Damped, LabColor, Measured};
use crate::constants::classifier::{
    DARK_SKIN_GAIN, DARK_SKIN_L, EYE_BLEND, LIGHT_SKIN_GAIN, LIGHT_SKIN_L,
};
use crate::{AnalysisError, Result};

/// Measured face colors feeding one classification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonInput {
    pub skin: LabColor<Measured>,
    #[serde(default)]
    pub eye: Option<LabColor<Measured>>,
}

impl SeasonInput {
    pub fn new(skin: LabColor<Measured>, eye: Option<LabColor<Measured>>) -> Self {
        Self { skin, eye }
    }

    /// Skin color with the eye blended into a*/b* and L* micro-corrected
    ///
    /// The eye contributes 5 % of a* and b*. L* below 40 is raised by 3 %,
    /// above 70 lowered by 3 %.
    pub fn corrected(&self) -> Result<LabColor<Measured>> {
        for (name, lab) in [("skin", Some(self.skin)), ("eye", self.eye)] {
            if let Some(lab) = lab {
                if !lab.is_finite() {
                    return Err(AnalysisError::invalid_input(
                        name,
                        format!("{:?}", lab.to_array()),
                    ));
                }
            }
        }

        let skin = self.skin;
        let (a, b) = match self.eye {
            Some(eye) => (
                skin.a() * (1.0 - EYE_BLEND) + eye.a() * EYE_BLEND,
                skin.b() * (1.0 - EYE_BLEND) + eye.b() * EYE_BLEND,
            ),
            None => (skin.a(), skin.b()),
        };

        let l = if skin.l() < DARK_SKIN_L {
            skin.l() * DARK_SKIN_GAIN
        } else if skin.l() > LIGHT_SKIN_L {
            skin.l() * LIGHT_SKIN_GAIN
        } else {
            skin.l()
        };

        Ok(LabColor::new(l, a, b))
    }

    /// Corrected color, damped for classification
    pub fn prepare(&self, converter: &ColorConverter) -> Result<LabColor<Damped>> {
        Ok(converter.damp_lightness(self.corrected()?))
    }
}
