//! Correction parameters and the corrected-image output type.

/// Tone stretch with gamma. Maps the `[min, max]` window of the
/// normalized intensity range back onto the full range after applying
/// `p^gamma`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stretch {
    pub gamma: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for Stretch {
    fn default() -> Self {
        Stretch {
            gamma: 1.0,
            min: 0.0,
            max: 1.0,
        }
    }
}

impl Stretch {
    pub(crate) fn is_identity(&self) -> bool {
        self.min == 0.0 && self.max == 1.0 && self.gamma == 1.0
    }
}

/// Model-based radial falloff correction, a sixth-order even polynomial
/// in the normalized radius around an optionally shifted centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Devignetting {
    /// Dark-level offset subtracted from every sample before division.
    pub offset: u16,
    /// Gain applied after division.
    pub factor: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// Centre shift as a fraction of the half-width/half-height.
    pub cx: f64,
    pub cy: f64,
}

impl Default for Devignetting {
    fn default() -> Self {
        Devignetting {
            offset: 0,
            factor: 1.0,
            a: 0.0,
            b: 0.0,
            c: 0.0,
            cx: 0.0,
            cy: 0.0,
        }
    }
}

impl Devignetting {
    /// The stage runs only when a polynomial term is set.
    pub(crate) fn is_identity(&self) -> bool {
        self.a == 0.0 && self.b == 0.0 && self.c == 0.0
    }
}

/// Per-channel gains applied over the 2x2 colour-filter tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBalance {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Default for ColorBalance {
    fn default() -> Self {
        ColorBalance {
            r: 1.0,
            g: 1.0,
            b: 1.0,
        }
    }
}

impl ColorBalance {
    pub(crate) fn is_identity(&self) -> bool {
        self.r == 1.0 && self.g == 1.0 && self.b == 1.0
    }
}

/// Radial lens distortion around a principal point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distortion {
    pub cx_px: f64,
    pub cy_px: f64,
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
}

impl Default for Distortion {
    fn default() -> Self {
        Distortion {
            cx_px: -1.0,
            cy_px: -1.0,
            k1: 0.0,
            k2: 0.0,
            k3: 0.0,
        }
    }
}

impl Distortion {
    pub(crate) fn is_identity(&self) -> bool {
        self.k1 == 0.0 && self.k2 == 0.0 && self.k3 == 0.0
    }
}

/// Parameters for the whole correction chain. The defaults are the
/// identity transform for every stage; a stage left at its defaults is
/// skipped, which is observable contract, not an optimization.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CorrectionOptions {
    pub stretch: Stretch,
    pub devignetting: Devignetting,
    pub color_balance: ColorBalance,
    pub distortion: Distortion,
    /// Rescale the final image to 8 bits per channel.
    pub convert_to_8bit: bool,
}

impl CorrectionOptions {
    pub fn builder() -> CorrectionOptionsBuilder {
        CorrectionOptionsBuilder::default()
    }
}

/// Builder for CorrectionOptions
#[derive(Default)]
pub struct CorrectionOptionsBuilder {
    stretch: Option<Stretch>,
    devignetting: Option<Devignetting>,
    color_balance: Option<ColorBalance>,
    distortion: Option<Distortion>,
    convert_to_8bit: Option<bool>,
}

impl CorrectionOptionsBuilder {
    pub fn stretch(mut self, stretch: Stretch) -> Self {
        self.stretch = Some(stretch);
        self
    }

    pub fn devignetting(mut self, devignetting: Devignetting) -> Self {
        self.devignetting = Some(devignetting);
        self
    }

    pub fn color_balance(mut self, color_balance: ColorBalance) -> Self {
        self.color_balance = Some(color_balance);
        self
    }

    pub fn distortion(mut self, distortion: Distortion) -> Self {
        self.distortion = Some(distortion);
        self
    }

    pub fn convert_to_8bit(mut self, enable: bool) -> Self {
        self.convert_to_8bit = Some(enable);
        self
    }

    pub fn build(self) -> CorrectionOptions {
        let default = CorrectionOptions::default();
        CorrectionOptions {
            stretch: self.stretch.unwrap_or(default.stretch),
            devignetting: self.devignetting.unwrap_or(default.devignetting),
            color_balance: self.color_balance.unwrap_or(default.color_balance),
            distortion: self.distortion.unwrap_or(default.distortion),
            convert_to_8bit: self.convert_to_8bit.unwrap_or(default.convert_to_8bit),
        }
    }
}

/// Sample storage of a corrected image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::U8(data) => data.len(),
            Samples::U16(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The pipeline output: a new, independently owned image, interleaved
/// when 3-channel. Never aliases the stored container data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectedImage {
    pub width: usize,
    pub height: usize,
    /// 1 for mono, 3 for demosaiced colour.
    pub channels: usize,
    pub samples: Samples,
}

impl CorrectedImage {
    pub fn empty() -> CorrectedImage {
        CorrectedImage {
            width: 0,
            height: 0,
            channels: 1,
            samples: Samples::U16(Vec::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn bit_depth(&self) -> u32 {
        match self.samples {
            Samples::U8(_) => 8,
            Samples::U16(_) => 16,
        }
    }
}
