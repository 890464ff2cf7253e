//! CSS Color Module Level 4 — §10 Predefined color spaces and conversions
//! Spec: <https://www.w3.org/TR/css-color-4/#color-conversion-code>
//!
//! Every conversion goes through CIE XYZ with a D65 white point. Lab and
//! ProPhoto are D50 spaces and are adapted with the Bradford matrices.
//!
//! Channel ranges: RGB spaces and XYZ use 0..1, `hsl`/`hwb` use degrees
//! and 0..100, `lab`/`lch` lightness is 0..100, `oklab`/`oklch` lightness
//! is 0..1.

use core::f64::consts::PI;

type Matrix = [[f64; 3]; 3];

/// Color spaces a color can be expressed in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Srgb,
    SrgbLinear,
    DisplayP3,
    A98Rgb,
    ProphotoRgb,
    Rec2020,
    XyzD50,
    XyzD65,
    Hsl,
    Hwb,
    Lab,
    Lch,
    Oklab,
    Oklch,
}

impl ColorSpace {
    /// Parse a space name as written in `color()` or `color-mix(in …)`.
    pub fn from_name(name: &str) -> Option<Self> {
        let space = match name.to_ascii_lowercase().as_str() {
            "srgb" => Self::Srgb,
            "srgb-linear" => Self::SrgbLinear,
            "display-p3" => Self::DisplayP3,
            "a98-rgb" => Self::A98Rgb,
            "prophoto-rgb" => Self::ProphotoRgb,
            "rec2020" => Self::Rec2020,
            "xyz-d50" => Self::XyzD50,
            "xyz" | "xyz-d65" => Self::XyzD65,
            "hsl" => Self::Hsl,
            "hwb" => Self::Hwb,
            "lab" => Self::Lab,
            "lch" => Self::Lch,
            "oklab" => Self::Oklab,
            "oklch" => Self::Oklch,
            _ => return None,
        };
        Some(space)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Srgb => "srgb",
            Self::SrgbLinear => "srgb-linear",
            Self::DisplayP3 => "display-p3",
            Self::A98Rgb => "a98-rgb",
            Self::ProphotoRgb => "prophoto-rgb",
            Self::Rec2020 => "rec2020",
            Self::XyzD50 => "xyz-d50",
            Self::XyzD65 => "xyz-d65",
            Self::Hsl => "hsl",
            Self::Hwb => "hwb",
            Self::Lab => "lab",
            Self::Lch => "lch",
            Self::Oklab => "oklab",
            Self::Oklch => "oklch",
        }
    }

    /// `lab`, `lch`, `oklab` and `oklch`.
    #[inline]
    pub const fn is_cie(self) -> bool {
        matches!(self, Self::Lab | Self::Lch | Self::Oklab | Self::Oklch)
    }

    /// Spaces accepted by `color()`.
    #[inline]
    pub const fn is_predefined(self) -> bool {
        matches!(
            self,
            Self::Srgb
                | Self::SrgbLinear
                | Self::DisplayP3
                | Self::A98Rgb
                | Self::ProphotoRgb
                | Self::Rec2020
                | Self::XyzD50
                | Self::XyzD65
        )
    }

    #[inline]
    pub const fn is_xyz(self) -> bool {
        matches!(self, Self::XyzD50 | Self::XyzD65)
    }

    /// Index of the hue channel in polar spaces.
    #[inline]
    pub const fn hue_index(self) -> Option<usize> {
        match self {
            Self::Hsl | Self::Hwb => Some(0),
            Self::Lch | Self::Oklch => Some(2),
            Self::Srgb
            | Self::SrgbLinear
            | Self::DisplayP3
            | Self::A98Rgb
            | Self::ProphotoRgb
            | Self::Rec2020
            | Self::XyzD50
            | Self::XyzD65
            | Self::Lab
            | Self::Oklab => None,
        }
    }

    /// Channel keywords of relative color syntax, in channel order.
    pub const fn channel_names(self) -> [&'static str; 3] {
        match self {
            Self::Srgb
            | Self::SrgbLinear
            | Self::DisplayP3
            | Self::A98Rgb
            | Self::ProphotoRgb
            | Self::Rec2020 => ["r", "g", "b"],
            Self::XyzD50 | Self::XyzD65 => ["x", "y", "z"],
            Self::Hsl => ["h", "s", "l"],
            Self::Hwb => ["h", "w", "b"],
            Self::Lab | Self::Oklab => ["l", "a", "b"],
            Self::Lch | Self::Oklch => ["l", "c", "h"],
        }
    }
}

const SRGB_LINEAR_TO_XYZ: Matrix = [
    [0.412_390_799_265_959_34, 0.357_584_339_383_878, 0.180_480_788_401_834_3],
    [0.212_639_005_871_510_27, 0.715_168_678_767_756, 0.072_192_315_360_733_71],
    [0.019_330_818_715_591_82, 0.119_194_779_794_625_98, 0.950_532_152_249_660_7],
];

const XYZ_TO_SRGB_LINEAR: Matrix = [
    [3.240_969_941_904_522_6, -1.537_383_177_570_094, -0.498_610_760_293_003_4],
    [-0.969_243_636_280_879_6, 1.875_967_501_507_720_2, 0.041_555_057_407_175_59],
    [0.055_630_079_696_993_66, -0.203_976_958_888_976_52, 1.056_971_514_242_878_6],
];

const P3_LINEAR_TO_XYZ: Matrix = [
    [0.486_570_948_648_216_2, 0.265_667_693_169_093_06, 0.198_217_285_234_362_5],
    [0.228_974_564_069_748_8, 0.691_738_521_836_506_4, 0.079_286_914_093_745],
    [0.0, 0.045_113_381_858_902_64, 1.043_944_368_900_976],
];

const XYZ_TO_P3_LINEAR: Matrix = [
    [2.493_496_911_941_425, -0.931_383_617_919_123_9, -0.402_710_784_450_716_84],
    [-0.829_488_969_561_574_7, 1.762_664_060_318_346_3, 0.023_624_685_841_943_577],
    [0.035_845_830_243_784_47, -0.076_172_389_268_041_82, 0.956_884_524_007_687_2],
];

const A98_LINEAR_TO_XYZ: Matrix = [
    [0.576_669_042_910_130_5, 0.185_558_237_906_546_3, 0.188_228_646_234_994_7],
    [0.297_344_975_250_536_05, 0.627_363_566_255_466_1, 0.075_291_458_493_997_88],
    [0.027_031_361_386_412_34, 0.070_688_852_535_827_23, 0.991_337_536_837_638_8],
];

const XYZ_TO_A98_LINEAR: Matrix = [
    [2.041_587_903_810_746_5, -0.565_006_974_278_859_6, -0.344_731_350_778_329_56],
    [-0.969_243_636_280_879_5, 1.875_967_501_507_720_2, 0.041_555_057_407_175_57],
    [0.013_444_280_632_031_142, -0.118_362_392_231_018_38, 1.015_174_994_391_205_4],
];

const PROPHOTO_LINEAR_TO_XYZ_D50: Matrix = [
    [0.797_760_489_672_302_7, 0.135_185_837_175_740_31, 0.031_349_349_581_524_8],
    [0.288_071_128_229_293_4, 0.711_843_217_810_101_4, 0.000_085_653_960_605_259_02],
    [0.0, 0.0, 0.825_104_602_510_460_1],
];

const XYZ_D50_TO_PROPHOTO_LINEAR: Matrix = [
    [1.345_798_973_102_828_1, -0.255_580_100_079_975_34, -0.051_106_285_067_534_01],
    [-0.544_622_493_902_834_7, 1.508_232_741_313_278_1, 0.020_536_032_391_479_73],
    [0.0, 0.0, 1.211_967_545_638_945_4],
];

const REC2020_LINEAR_TO_XYZ: Matrix = [
    [0.636_958_048_301_291_4, 0.144_616_903_586_208_32, 0.168_880_975_164_172_1],
    [0.262_700_212_011_267_1, 0.677_998_071_518_870_8, 0.059_301_716_469_861_96],
    [0.0, 0.028_072_693_049_087_428, 1.060_985_057_710_791],
];

const XYZ_TO_REC2020_LINEAR: Matrix = [
    [1.716_651_187_971_267_4, -0.355_670_783_776_392_33, -0.253_366_281_373_659_74],
    [-0.666_684_351_832_489_2, 1.616_481_236_634_939_5, 0.015_768_545_813_911_13],
    [0.017_639_857_445_310_783, -0.042_770_613_257_808_524, 0.942_103_121_235_473_8],
];

const D50_TO_D65: Matrix = [
    [0.955_473_452_704_218_2, -0.023_098_536_874_261_423, 0.063_259_308_661_021_7],
    [-0.028_369_706_963_208_136, 1.009_995_458_005_822_6, 0.021_041_398_966_943_008],
    [0.012_314_001_688_319_899, -0.020_507_696_433_477_912, 1.330_365_936_608_075_3],
];

const D65_TO_D50: Matrix = [
    [1.047_929_820_840_548_8, 0.022_946_793_341_019_088, -0.050_192_229_543_135_57],
    [0.029_627_815_688_159_344, 0.990_434_484_573_249, -0.017_073_825_029_385_14],
    [-0.009_243_058_152_591_178, 0.015_055_144_896_577_895, 0.751_874_289_958_000_8],
];

const XYZ_TO_LMS: Matrix = [
    [0.819_022_443_216_431_9, 0.361_906_256_280_122_1, -0.128_873_782_612_164_14],
    [0.032_983_667_198_027_1, 0.929_286_846_896_554_6, 0.036_144_668_169_998_44],
    [0.048_177_199_566_046_255, 0.264_239_524_944_227_64, 0.633_547_825_813_693_7],
];

const LMS_TO_OKLAB: Matrix = [
    [0.210_454_255_3, 0.793_617_785_0, -0.004_072_046_8],
    [1.977_998_495_1, -2.428_592_205_0, 0.450_593_709_9],
    [0.025_904_037_1, 0.782_771_766_2, -0.808_675_766_0],
];

const OKLAB_TO_LMS: Matrix = [
    [0.999_999_998_450_519_8, 0.396_337_792_173_767_86, 0.215_803_758_060_758_8],
    [1.000_000_008_881_760_8, -0.105_561_342_323_656_35, -0.063_854_174_771_705_9],
    [1.000_000_054_672_410_9, -0.089_484_182_094_965_76, -1.291_485_537_864_091_7],
];

const LMS_TO_XYZ: Matrix = [
    [1.226_879_873_374_155_7, -0.557_814_996_555_481_3, 0.281_391_050_177_215_83],
    [-0.040_575_762_624_313_72, 1.112_286_829_397_059_4, -0.071_711_066_661_517_01],
    [-0.076_372_949_746_721_42, -0.421_493_323_962_791_4, 1.586_924_024_427_241_8],
];

/// D50 reference white.
const D50_WHITE: [f64; 3] = [0.3457 / 0.3585, 1.0, (1.0 - 0.3457 - 0.3585) / 0.3585];
/// 6³/29³
const LAB_EPSILON: f64 = 216.0 / 24_389.0;
/// 29³/3³
const LAB_KAPPA: f64 = 24_389.0 / 27.0;

fn multiply(matrix: &Matrix, vector: [f64; 3]) -> [f64; 3] {
    matrix.map(|row| row[0] * vector[0] + row[1] * vector[1] + row[2] * vector[2])
}

fn signed(value: f64, magnitude: f64) -> f64 {
    if value < 0.0 { -magnitude } else { magnitude }
}

fn lin_srgb(channel: f64) -> f64 {
    let abs = channel.abs();
    if abs < 0.040_45 {
        return channel / 12.92;
    }
    signed(channel, ((abs + 0.055) / 1.055).powf(2.4))
}

fn gam_srgb(channel: f64) -> f64 {
    let abs = channel.abs();
    if abs > 0.003_130_8 {
        return signed(channel, 1.055 * abs.powf(1.0 / 2.4) - 0.055);
    }
    12.92 * channel
}

fn lin_a98(channel: f64) -> f64 {
    signed(channel, channel.abs().powf(563.0 / 256.0))
}

fn gam_a98(channel: f64) -> f64 {
    signed(channel, channel.abs().powf(256.0 / 563.0))
}

fn lin_prophoto(channel: f64) -> f64 {
    let abs = channel.abs();
    if abs <= 16.0 / 512.0 {
        return channel / 16.0;
    }
    signed(channel, abs.powf(1.8))
}

fn gam_prophoto(channel: f64) -> f64 {
    let abs = channel.abs();
    if abs >= 1.0 / 512.0 {
        return signed(channel, abs.powf(1.0 / 1.8));
    }
    16.0 * channel
}

const REC2020_ALPHA: f64 = 1.099_296_826_809_44;
const REC2020_BETA: f64 = 0.018_053_968_510_807;

fn lin_rec2020(channel: f64) -> f64 {
    let abs = channel.abs();
    if abs < REC2020_BETA * 4.5 {
        return channel / 4.5;
    }
    signed(channel, ((abs + REC2020_ALPHA - 1.0) / REC2020_ALPHA).powf(1.0 / 0.45))
}

fn gam_rec2020(channel: f64) -> f64 {
    let abs = channel.abs();
    if abs > REC2020_BETA {
        return signed(channel, REC2020_ALPHA * abs.powf(0.45) - (REC2020_ALPHA - 1.0));
    }
    4.5 * channel
}

/// `[h, s, l]` (degrees, 0..100, 0..100) to sRGB.
pub fn hsl_to_srgb([hue, saturation, lightness]: [f64; 3]) -> [f64; 3] {
    let hue = hue.rem_euclid(360.0);
    let sat = saturation / 100.0;
    let light = lightness / 100.0;
    let amount = sat * light.min(1.0 - light);
    [0.0, 8.0, 4.0].map(|offset: f64| {
        let step = (offset + hue / 30.0).rem_euclid(12.0);
        light - amount * (step - 3.0).min(9.0 - step).clamp(-1.0, 1.0)
    })
}

/// sRGB to `[h, s, l]`. Achromatic colors get a hue of 0.
pub fn srgb_to_hsl([red, green, blue]: [f64; 3]) -> [f64; 3] {
    let max = red.max(green).max(blue);
    let min = red.min(green).min(blue);
    let light = (min + max) / 2.0;
    let delta = max - min;
    let mut hue = 0.0;
    let mut sat = 0.0;
    if delta != 0.0 {
        sat = if light == 0.0 || light == 1.0 {
            0.0
        } else {
            (max - light) / light.min(1.0 - light)
        };
        hue = if max == red {
            (green - blue) / delta + if green < blue { 6.0 } else { 0.0 }
        } else if max == green {
            (blue - red) / delta + 2.0
        } else {
            (red - green) / delta + 4.0
        };
        hue *= 60.0;
    }
    if sat < 0.0 {
        hue += 180.0;
        sat = sat.abs();
    }
    [hue.rem_euclid(360.0), sat * 100.0, light * 100.0]
}

/// `[h, w, b]` (degrees, 0..100, 0..100) to sRGB.
pub fn hwb_to_srgb([hue, whiteness, blackness]: [f64; 3]) -> [f64; 3] {
    let white = whiteness / 100.0;
    let black = blackness / 100.0;
    if white + black >= 1.0 {
        let gray = white / (white + black);
        return [gray; 3];
    }
    let scale = 1.0 - white - black;
    hsl_to_srgb([hue, 100.0, 50.0]).map(|channel| channel * scale + white)
}

/// sRGB to `[h, w, b]`.
pub fn srgb_to_hwb(rgb: [f64; 3]) -> [f64; 3] {
    let [hue, _, _] = srgb_to_hsl(rgb);
    let [red, green, blue] = rgb;
    let white = red.min(green).min(blue);
    let black = 1.0 - red.max(green).max(blue);
    [hue, white * 100.0, black * 100.0]
}

fn lab_to_xyz_d50([lightness, axis_a, axis_b]: [f64; 3]) -> [f64; 3] {
    let f1 = (lightness + 16.0) / 116.0;
    let f0 = axis_a / 500.0 + f1;
    let f2 = f1 - axis_b / 200.0;
    let x = if f0.powi(3) > LAB_EPSILON {
        f0.powi(3)
    } else {
        (116.0 * f0 - 16.0) / LAB_KAPPA
    };
    let y = if lightness > LAB_KAPPA * LAB_EPSILON {
        f1.powi(3)
    } else {
        lightness / LAB_KAPPA
    };
    let z = if f2.powi(3) > LAB_EPSILON {
        f2.powi(3)
    } else {
        (116.0 * f2 - 16.0) / LAB_KAPPA
    };
    [x * D50_WHITE[0], y * D50_WHITE[1], z * D50_WHITE[2]]
}

fn xyz_d50_to_lab(xyz: [f64; 3]) -> [f64; 3] {
    let scaled = [
        xyz[0] / D50_WHITE[0],
        xyz[1] / D50_WHITE[1],
        xyz[2] / D50_WHITE[2],
    ];
    let [f0, f1, f2] = scaled.map(|value| {
        if value > LAB_EPSILON {
            value.cbrt()
        } else {
            (LAB_KAPPA * value + 16.0) / 116.0
        }
    });
    [116.0 * f1 - 16.0, 500.0 * (f0 - f1), 200.0 * (f1 - f2)]
}

fn polar_to_rectangular([lightness, chroma, hue]: [f64; 3]) -> [f64; 3] {
    let radians = hue * PI / 180.0;
    [lightness, chroma * radians.cos(), chroma * radians.sin()]
}

fn rectangular_to_polar([lightness, axis_a, axis_b]: [f64; 3]) -> [f64; 3] {
    let hue = (axis_b.atan2(axis_a) * 180.0 / PI).rem_euclid(360.0);
    let chroma = axis_a.hypot(axis_b);
    [lightness, chroma, hue]
}

fn oklab_to_xyz(oklab: [f64; 3]) -> [f64; 3] {
    let lms = multiply(&OKLAB_TO_LMS, oklab).map(|value| value.powi(3));
    multiply(&LMS_TO_XYZ, lms)
}

fn xyz_to_oklab(xyz: [f64; 3]) -> [f64; 3] {
    let lms = multiply(&XYZ_TO_LMS, xyz).map(f64::cbrt);
    multiply(&LMS_TO_OKLAB, lms)
}

/// Convert channels in `space` to XYZ-D65. Missing (`NaN`) channels must be
/// resolved by the caller.
pub fn to_xyz_d65(space: ColorSpace, channels: [f64; 3]) -> [f64; 3] {
    match space {
        ColorSpace::Srgb => multiply(&SRGB_LINEAR_TO_XYZ, channels.map(lin_srgb)),
        ColorSpace::SrgbLinear => multiply(&SRGB_LINEAR_TO_XYZ, channels),
        ColorSpace::DisplayP3 => multiply(&P3_LINEAR_TO_XYZ, channels.map(lin_srgb)),
        ColorSpace::A98Rgb => multiply(&A98_LINEAR_TO_XYZ, channels.map(lin_a98)),
        ColorSpace::ProphotoRgb => multiply(
            &D50_TO_D65,
            multiply(&PROPHOTO_LINEAR_TO_XYZ_D50, channels.map(lin_prophoto)),
        ),
        ColorSpace::Rec2020 => multiply(&REC2020_LINEAR_TO_XYZ, channels.map(lin_rec2020)),
        ColorSpace::XyzD50 => multiply(&D50_TO_D65, channels),
        ColorSpace::XyzD65 => channels,
        ColorSpace::Hsl => to_xyz_d65(ColorSpace::Srgb, hsl_to_srgb(channels)),
        ColorSpace::Hwb => to_xyz_d65(ColorSpace::Srgb, hwb_to_srgb(channels)),
        ColorSpace::Lab => multiply(&D50_TO_D65, lab_to_xyz_d50(channels)),
        ColorSpace::Lch => to_xyz_d65(ColorSpace::Lab, polar_to_rectangular(channels)),
        ColorSpace::Oklab => oklab_to_xyz(channels),
        ColorSpace::Oklch => oklab_to_xyz(polar_to_rectangular(channels)),
    }
}

/// Convert XYZ-D65 to channels in `space`.
pub fn from_xyz_d65(space: ColorSpace, xyz: [f64; 3]) -> [f64; 3] {
    match space {
        ColorSpace::Srgb => multiply(&XYZ_TO_SRGB_LINEAR, xyz).map(gam_srgb),
        ColorSpace::SrgbLinear => multiply(&XYZ_TO_SRGB_LINEAR, xyz),
        ColorSpace::DisplayP3 => multiply(&XYZ_TO_P3_LINEAR, xyz).map(gam_srgb),
        ColorSpace::A98Rgb => multiply(&XYZ_TO_A98_LINEAR, xyz).map(gam_a98),
        ColorSpace::ProphotoRgb => {
            multiply(&XYZ_D50_TO_PROPHOTO_LINEAR, multiply(&D65_TO_D50, xyz)).map(gam_prophoto)
        }
        ColorSpace::Rec2020 => multiply(&XYZ_TO_REC2020_LINEAR, xyz).map(gam_rec2020),
        ColorSpace::XyzD50 => multiply(&D65_TO_D50, xyz),
        ColorSpace::XyzD65 => xyz,
        ColorSpace::Hsl => srgb_to_hsl(from_xyz_d65(ColorSpace::Srgb, xyz)),
        ColorSpace::Hwb => srgb_to_hwb(from_xyz_d65(ColorSpace::Srgb, xyz)),
        ColorSpace::Lab => xyz_d50_to_lab(multiply(&D65_TO_D50, xyz)),
        ColorSpace::Lch => rectangular_to_polar(from_xyz_d65(ColorSpace::Lab, xyz)),
        ColorSpace::Oklab => xyz_to_oklab(xyz),
        ColorSpace::Oklch => rectangular_to_polar(xyz_to_oklab(xyz)),
    }
}

/// Convert channels between spaces. Conversions inside the sRGB family
/// (`srgb`, `hsl`, `hwb`) skip the XYZ round trip.
pub fn convert(channels: [f64; 3], from: ColorSpace, to: ColorSpace) -> [f64; 3] {
    if from == to {
        return channels;
    }
    let srgb = match from {
        ColorSpace::Srgb => Some(channels),
        ColorSpace::Hsl => Some(hsl_to_srgb(channels)),
        ColorSpace::Hwb => Some(hwb_to_srgb(channels)),
        _ => None,
    };
    if let Some(rgb) = srgb {
        match to {
            ColorSpace::Srgb => return rgb,
            ColorSpace::Hsl => return srgb_to_hsl(rgb),
            ColorSpace::Hwb => return srgb_to_hwb(rgb),
            _ => {}
        }
    }
    from_xyz_d65(to, to_xyz_d65(from, channels))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(left: [f64; 3], right: [f64; 3]) -> bool {
        left.iter()
            .zip(right.iter())
            .all(|(one, two)| (one - two).abs() < 1e-4)
    }

    #[test]
    fn names_round_trip() {
        for name in ["srgb", "display-p3", "rec2020", "xyz-d50", "oklch"] {
            assert_eq!(ColorSpace::from_name(name).map(ColorSpace::name), Some(name));
        }
        assert_eq!(ColorSpace::from_name("xyz"), Some(ColorSpace::XyzD65));
        assert_eq!(ColorSpace::from_name("cmyk"), None);
    }

    #[test]
    fn hsl_and_hwb_of_red() {
        assert!(close(hsl_to_srgb([0.0, 100.0, 50.0]), [1.0, 0.0, 0.0]));
        assert!(close(srgb_to_hsl([1.0, 0.0, 0.0]), [0.0, 100.0, 50.0]));
        assert!(close(hwb_to_srgb([120.0, 0.0, 0.0]), [0.0, 1.0, 0.0]));
        assert!(close(hwb_to_srgb([0.0, 60.0, 60.0]), [0.5, 0.5, 0.5]));
    }

    #[test]
    fn white_is_lab_100() {
        let lab = convert([1.0, 1.0, 1.0], ColorSpace::Srgb, ColorSpace::Lab);
        assert!((lab[0] - 100.0).abs() < 1e-3, "{lab:?}");
        assert!(lab[1].abs() < 1e-3 && lab[2].abs() < 1e-3, "{lab:?}");
        let oklab = convert([1.0, 1.0, 1.0], ColorSpace::Srgb, ColorSpace::Oklab);
        assert!((oklab[0] - 1.0).abs() < 1e-3, "{oklab:?}");
    }

    #[test]
    fn round_trips_through_every_space() {
        let origin = [0.2, 0.4, 0.6];
        for space in [
            ColorSpace::SrgbLinear,
            ColorSpace::DisplayP3,
            ColorSpace::A98Rgb,
            ColorSpace::ProphotoRgb,
            ColorSpace::Rec2020,
            ColorSpace::XyzD50,
            ColorSpace::XyzD65,
            ColorSpace::Hsl,
            ColorSpace::Hwb,
            ColorSpace::Lab,
            ColorSpace::Lch,
            ColorSpace::Oklab,
            ColorSpace::Oklch,
        ] {
            let there = convert(origin, ColorSpace::Srgb, space);
            let back = convert(there, space, ColorSpace::Srgb);
            assert!(close(origin, back), "{space:?}: {back:?}");
        }
    }
}
