use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ReportError;

/// One column of the peak table.
///
/// Channel-specific fields carry the channel name. In configuration files a
/// field is written as its key, for example `"peak_center"` or `"fraction:Isomer 57"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputField {
    /// 1-based peak number
    PeakNumber,
    /// Center time of the peak
    CenterTime,
    /// Peak duration
    Duration,
    /// Calibrated mean intensity of a channel
    Intensity(String),
    /// Mean intensity of a channel before calibration
    UncalibratedIntensity(String),
    /// Mean internal-standard intensity
    InternalStandard,
    /// Channel share of the summed channel intensities
    Fraction(String),
    /// Summed channel intensities over the internal standard
    Yield,
    /// Channel intensity over the internal standard
    StandardRatio(String),
    /// Merged candidate peak numbers, padded with empty cells
    PotentialMerged,
    /// Split candidate peak numbers, padded with empty cells
    PotentialSplit,
    /// Well label
    Well,
}

/// How a field is rounded for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Three decimals
    Decimals3,
    /// Nearest integer
    Integer,
    /// Exported as is
    None,
}

impl OutputField {
    /// Column layout written when no fields are configured.
    pub fn default_fields<'a>(
        channels: impl IntoIterator<Item = &'a str>,
        with_wells: bool,
    ) -> Vec<OutputField> {
        let mut fields = vec![Self::PeakNumber, Self::CenterTime, Self::Duration];
        if with_wells {
            fields.push(Self::Well);
        }
        fields.extend(channels.into_iter().map(|c| Self::Intensity(c.to_string())));
        fields.push(Self::PotentialMerged);
        fields.push(Self::PotentialSplit);
        fields
    }

    /// Channel this field reads, if any.
    pub fn channel(&self) -> Option<&str> {
        match self {
            Self::Intensity(c)
            | Self::UncalibratedIntensity(c)
            | Self::Fraction(c)
            | Self::StandardRatio(c) => Some(c),
            _ => None,
        }
    }

    /// Export rounding for this field.
    pub fn rounding(&self) -> Rounding {
        match self {
            Self::CenterTime
            | Self::Duration
            | Self::Fraction(_)
            | Self::Yield
            | Self::StandardRatio(_) => Rounding::Decimals3,
            Self::Intensity(_) | Self::UncalibratedIntensity(_) | Self::InternalStandard => {
                Rounding::Integer
            }
            Self::PeakNumber | Self::PotentialMerged | Self::PotentialSplit | Self::Well => {
                Rounding::None
            }
        }
    }

    /// Column header.
    pub fn header(&self) -> String {
        match self {
            Self::PeakNumber => "peak_number".to_string(),
            Self::CenterTime => "peak_center".to_string(),
            Self::Duration => "duration".to_string(),
            Self::Intensity(c) => c.clone(),
            Self::UncalibratedIntensity(c) => format!("{c} (uncalibrated)"),
            Self::InternalStandard => "internal_standard".to_string(),
            Self::Fraction(c) => format!("{c} fraction"),
            Self::Yield => "yield".to_string(),
            Self::StandardRatio(c) => format!("{c} / internal_standard"),
            Self::PotentialMerged => "potential_merged".to_string(),
            Self::PotentialSplit => "potential_split".to_string(),
            Self::Well => "well".to_string(),
        }
    }
}

impl fmt::Display for OutputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PeakNumber => f.write_str("peak_number"),
            Self::CenterTime => f.write_str("peak_center"),
            Self::Duration => f.write_str("duration"),
            Self::Intensity(c) => write!(f, "intensity:{c}"),
            Self::UncalibratedIntensity(c) => write!(f, "uncalibrated:{c}"),
            Self::InternalStandard => f.write_str("internal_standard"),
            Self::Fraction(c) => write!(f, "fraction:{c}"),
            Self::Yield => f.write_str("yield"),
            Self::StandardRatio(c) => write!(f, "standard_ratio:{c}"),
            Self::PotentialMerged => f.write_str("potential_merged"),
            Self::PotentialSplit => f.write_str("potential_split"),
            Self::Well => f.write_str("well"),
        }
    }
}

impl FromStr for OutputField {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s.split_once(':') {
            Some((kind, channel)) if !channel.is_empty() => {
                let channel = channel.to_string();
                match kind {
                    "intensity" => Self::Intensity(channel),
                    "uncalibrated" => Self::UncalibratedIntensity(channel),
                    "fraction" => Self::Fraction(channel),
                    "standard_ratio" => Self::StandardRatio(channel),
                    _ => return Err(ReportError::InvalidField(s.to_string())),
                }
            }
            Some(_) => return Err(ReportError::InvalidField(s.to_string())),
            None => match s {
                "peak_number" => Self::PeakNumber,
                "peak_center" | "center_time" => Self::CenterTime,
                "duration" => Self::Duration,
                "internal_standard" => Self::InternalStandard,
                "yield" => Self::Yield,
                "potential_merged" => Self::PotentialMerged,
                "potential_split" => Self::PotentialSplit,
                "well" => Self::Well,
                _ => return Err(ReportError::InvalidField(s.to_string())),
            },
        };
        Ok(field)
    }
}

impl TryFrom<String> for OutputField {
    type Error = ReportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputField> for String {
    fn from(field: OutputField) -> Self {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys() {
        assert_eq!("peak_center".parse::<OutputField>().unwrap(), OutputField::CenterTime);
        assert_eq!(
            "fraction:Isomer 57".parse::<OutputField>().unwrap(),
            OutputField::Fraction("Isomer 57".to_string())
        );
        // channel names may themselves contain a colon
        assert_eq!(
            "intensity:m/z 57:a".parse::<OutputField>().unwrap(),
            OutputField::Intensity("m/z 57:a".to_string())
        );
        assert!("intensity:".parse::<OutputField>().is_err());
        assert!("ratio".parse::<OutputField>().is_err());
        assert!("bogus:Isomer 57".parse::<OutputField>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        let fields = [
            OutputField::PeakNumber,
            OutputField::UncalibratedIntensity("Isomer 77".to_string()),
            OutputField::StandardRatio("Isomer 57".to_string()),
            OutputField::Well,
        ];
        for field in fields {
            assert_eq!(field.to_string().parse::<OutputField>().unwrap(), field);
        }
    }

    #[test]
    fn test_default_fields() {
        let fields = OutputField::default_fields(["Isomer 57", "Isomer 77"], true);
        let headers: Vec<String> = fields.iter().map(OutputField::header).collect();
        assert_eq!(
            headers,
            vec![
                "peak_number",
                "peak_center",
                "duration",
                "well",
                "Isomer 57",
                "Isomer 77",
                "potential_merged",
                "potential_split"
            ]
        );
        assert!(!OutputField::default_fields(["A"], false).contains(&OutputField::Well));
    }

    #[test]
    fn test_rounding_classes() {
        assert_eq!(OutputField::Duration.rounding(), Rounding::Decimals3);
        assert_eq!(OutputField::Yield.rounding(), Rounding::Decimals3);
        assert_eq!(OutputField::InternalStandard.rounding(), Rounding::Integer);
        assert_eq!(OutputField::Well.rounding(), Rounding::None);
    }

    #[test]
    fn test_deserialize_from_toml_strings() {
        #[derive(Deserialize)]
        struct Output {
            fields: Vec<OutputField>,
        }
        let parsed: Output = toml::from_str(r#"fields = ["peak_number", "yield"]"#).unwrap();
        assert_eq!(parsed.fields, vec![OutputField::PeakNumber, OutputField::Yield]);
    }
}
