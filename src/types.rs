use serde::Serialize;

/// Languages the answer can be rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Ru,
    Kk,
    En,
}

impl Lang {
    /// Normalize a raw `lang` field. Region suffixes like `en-US` are accepted;
    /// anything else falls back to [`Lang::Ru`].
    pub fn from_field(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        let lowered = raw.trim().to_lowercase();
        let primary = lowered.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "ru" => Self::Ru,
            "kk" => Self::Kk,
            "en" => Self::En,
            _ => Self::default(),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Ru => "ru",
            Self::Kk => "kk",
            Self::En => "en",
        }
    }
}

/// Cosmetic tone applied to answer templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Formal,
    Humorous,
}

impl Persona {
    /// Returns `None` for a missing or unsupported persona.
    pub fn from_field(raw: Option<&str>) -> Option<Self> {
        match raw?.trim().to_lowercase().as_str() {
            "formal" => Some(Self::Formal),
            "humorous" => Some(Self::Humorous),
            _ => None,
        }
    }
}

/// Image types accepted by the recognition endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
}

impl ImageMime {
    /// Match a declared content type, ignoring case and parameters.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        match essence.as_str() {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// One catalog landmark matched in the provider output.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub landmark_id: String,
    pub confidence: f64,
}
