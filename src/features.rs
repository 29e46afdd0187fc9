//! Feature Layout - Student Survey Answers
//!
//! Ten answered survey questions become one `FeatureRecord`, the single row
//! handed to the classifier. The model reads columns BY NAME, so the names in
//! `FEATURE_ORDER` must match the ones used at training time exactly.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

// ============================================================================
// FEATURE LAYOUT
// ============================================================================

/// Feature names in the column order used at training time
pub static FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "Edad",
    "Ciclo",
    "Horas_Redes_Sociales",
    "Horas_Estudio",
    "Red_Social_Principal",
    "Motivo_Uso",
    "Afecta_Concentracion",
    "Afecta_Horas_Estudio",
    "Usa_Estrategias",
    "Impacto_General",
];

pub const FEATURE_COUNT: usize = 10;

/// Field names posted by the HTML form, index-aligned with `FEATURE_ORDER`
pub static FORM_FIELDS: [&str; FEATURE_COUNT] = [
    "edad",
    "ciclo",
    "horas_redes_sociales",
    "horas_estudio",
    "red_social_principal",
    "motivo_uso",
    "afecta_concentracion",
    "afecta_horas_estudio",
    "usa_estrategias",
    "impacto_general",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Integer,
    Float,
    Categorical,
}

impl FeatureKind {
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FeatureKind::Categorical)
    }
}

/// Semantic type of a named feature
pub fn feature_kind(name: &str) -> Option<FeatureKind> {
    match name {
        "Edad" | "Ciclo" => Some(FeatureKind::Integer),
        "Horas_Redes_Sociales" | "Horas_Estudio" => Some(FeatureKind::Float),
        "Red_Social_Principal" | "Motivo_Uso" | "Afecta_Concentracion"
        | "Afecta_Horas_Estudio" | "Usa_Estrategias" | "Impacto_General" => {
            Some(FeatureKind::Categorical)
        }
        _ => None,
    }
}

// ============================================================================
// CHOICES
// ============================================================================

macro_rules! survey_choice {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted answer, in the order the form offers them
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                let label = label.trim();
                Self::ALL.iter().copied().find(|choice| choice.as_str() == label)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

survey_choice! {
    /// Most used social network
    SocialNetwork {
        TikTok => "TikTok",
        WhatsApp => "WhatsApp",
        Instagram => "Instagram",
        Facebook => "Facebook",
        YouTube => "YouTube",
        Twitter => "Twitter",
        Discord => "Discord",
        LinkedIn => "LinkedIn",
        Telegram => "Telegram",
    }
}

survey_choice! {
    /// Main reason for using social networks
    UsageReason {
        Entertainment => "Entretenimiento",
        Socializing => "Socializacion",
        Academic => "Academico",
        News => "Noticias",
        Work => "Trabajo",
    }
}

survey_choice! {
    Frequency {
        Never => "Nunca",
        Rarely => "Rara vez",
        Sometimes => "A veces",
        Often => "Frecuentemente",
        Always => "Siempre",
    }
}

survey_choice! {
    YesNo {
        Yes => "Si",
        No => "No",
    }
}

survey_choice! {
    /// Perceived impact of social networks on performance
    OverallImpact {
        VeryNegative => "Muy Negativo",
        Negative => "Negativo",
        Neutral => "Neutral",
        Positive => "Positivo",
        VeryPositive => "Muy Positivo",
    }
}

// ============================================================================
// FEATURE RECORD
// ============================================================================

/// One complete, type-valid row for the classifier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    #[serde(rename = "Edad")]
    pub edad: i64,
    #[serde(rename = "Ciclo")]
    pub ciclo: i64,
    #[serde(rename = "Horas_Redes_Sociales")]
    pub horas_redes_sociales: f64,
    #[serde(rename = "Horas_Estudio")]
    pub horas_estudio: f64,
    #[serde(rename = "Red_Social_Principal")]
    pub red_social_principal: SocialNetwork,
    #[serde(rename = "Motivo_Uso")]
    pub motivo_uso: UsageReason,
    #[serde(rename = "Afecta_Concentracion")]
    pub afecta_concentracion: Frequency,
    #[serde(rename = "Afecta_Horas_Estudio")]
    pub afecta_horas_estudio: YesNo,
    #[serde(rename = "Usa_Estrategias")]
    pub usa_estrategias: YesNo,
    #[serde(rename = "Impacto_General")]
    pub impacto_general: OverallImpact,
}

/// A single cell of a `FeatureRecord`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureValue {
    Integer(i64),
    Float(f64),
    Category(&'static str),
}

impl FeatureValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Integer(v) => Some(*v as f64),
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Category(_) => None,
        }
    }

    /// Category comparison as done by a one-hot encoder fitted on this column
    pub fn matches_category(&self, category: &str) -> bool {
        match self {
            FeatureValue::Category(v) => *v == category,
            FeatureValue::Integer(v) => category.trim().parse::<i64>().map_or(false, |c| c == *v),
            FeatureValue::Float(v) => category.trim().parse::<f64>().map_or(false, |c| c == *v),
        }
    }
}

impl FeatureRecord {
    /// Look a column up by its training-time name
    pub fn value(&self, name: &str) -> Option<FeatureValue> {
        let value = match name {
            "Edad" => FeatureValue::Integer(self.edad),
            "Ciclo" => FeatureValue::Integer(self.ciclo),
            "Horas_Redes_Sociales" => FeatureValue::Float(self.horas_redes_sociales),
            "Horas_Estudio" => FeatureValue::Float(self.horas_estudio),
            "Red_Social_Principal" => FeatureValue::Category(self.red_social_principal.as_str()),
            "Motivo_Uso" => FeatureValue::Category(self.motivo_uso.as_str()),
            "Afecta_Concentracion" => FeatureValue::Category(self.afecta_concentracion.as_str()),
            "Afecta_Horas_Estudio" => FeatureValue::Category(self.afecta_horas_estudio.as_str()),
            "Usa_Estrategias" => FeatureValue::Category(self.usa_estrategias.as_str()),
            "Impacto_General" => FeatureValue::Category(self.impacto_general.as_str()),
            _ => return None,
        };
        Some(value)
    }

    /// All columns, in `FEATURE_ORDER`
    pub fn columns(&self) -> impl Iterator<Item = (&'static str, FeatureValue)> + '_ {
        FEATURE_ORDER
            .iter()
            .filter_map(move |name| self.value(name).map(|v| (*name, v)))
    }
}

// ============================================================================
// RAW INPUT
// ============================================================================

/// Value as submitted: form fields are always text, JSON may carry numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    fn describe(&self) -> String {
        match self {
            RawValue::Number(n) => n.to_string(),
            RawValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

/// Unchecked request payload, accepted under form or canonical field names
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RawFeatures {
    #[serde(alias = "Edad")]
    #[validate(required)]
    pub edad: Option<RawValue>,

    #[serde(alias = "Ciclo")]
    #[validate(required)]
    pub ciclo: Option<RawValue>,

    #[serde(alias = "Horas_Redes_Sociales")]
    #[validate(required)]
    pub horas_redes_sociales: Option<RawValue>,

    #[serde(alias = "Horas_Estudio")]
    #[validate(required)]
    pub horas_estudio: Option<RawValue>,

    #[serde(alias = "Red_Social_Principal")]
    #[validate(required)]
    pub red_social_principal: Option<RawValue>,

    #[serde(alias = "Motivo_Uso")]
    #[validate(required)]
    pub motivo_uso: Option<RawValue>,

    #[serde(alias = "Afecta_Concentracion")]
    #[validate(required)]
    pub afecta_concentracion: Option<RawValue>,

    #[serde(alias = "Afecta_Horas_Estudio")]
    #[validate(required)]
    pub afecta_horas_estudio: Option<RawValue>,

    #[serde(alias = "Usa_Estrategias")]
    #[validate(required)]
    pub usa_estrategias: Option<RawValue>,

    #[serde(alias = "Impacto_General")]
    #[validate(required)]
    pub impacto_general: Option<RawValue>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Campos requeridos faltantes: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("El campo {field} debe ser un numero entero (recibido '{value}')")]
    InvalidInteger { field: &'static str, value: String },

    #[error("El campo {field} debe ser un numero (recibido '{value}')")]
    InvalidFloat { field: &'static str, value: String },

    #[error("Valor no valido para {field}: '{value}'")]
    InvalidChoice { field: &'static str, value: String },
}

// ============================================================================
// ASSEMBLY
// ============================================================================

/// Coerce a raw payload into a `FeatureRecord`
///
/// Every missing field is reported at once. Choice fields are checked against
/// their closed set so an unknown answer never reaches the classifier.
pub fn assemble(raw: &RawFeatures) -> Result<FeatureRecord, FeatureError> {
    if let Err(errors) = raw.validate() {
        let field_errors = errors.field_errors();
        let missing: Vec<&'static str> = FORM_FIELDS
            .iter()
            .zip(FEATURE_ORDER.iter())
            .filter(|(form_name, _)| field_errors.contains_key(**form_name))
            .map(|(_, name)| *name)
            .collect();
        return Err(FeatureError::MissingFields(missing));
    }

    Ok(FeatureRecord {
        edad: integer("Edad", &raw.edad)?,
        ciclo: integer("Ciclo", &raw.ciclo)?,
        horas_redes_sociales: float("Horas_Redes_Sociales", &raw.horas_redes_sociales)?,
        horas_estudio: float("Horas_Estudio", &raw.horas_estudio)?,
        red_social_principal: choice("Red_Social_Principal", &raw.red_social_principal, SocialNetwork::from_label)?,
        motivo_uso: choice("Motivo_Uso", &raw.motivo_uso, UsageReason::from_label)?,
        afecta_concentracion: choice("Afecta_Concentracion", &raw.afecta_concentracion, Frequency::from_label)?,
        afecta_horas_estudio: choice("Afecta_Horas_Estudio", &raw.afecta_horas_estudio, YesNo::from_label)?,
        usa_estrategias: choice("Usa_Estrategias", &raw.usa_estrategias, YesNo::from_label)?,
        impacto_general: choice("Impacto_General", &raw.impacto_general, OverallImpact::from_label)?,
    })
}

fn present<'a>(field: &'static str, value: &'a Option<RawValue>) -> Result<&'a RawValue, FeatureError> {
    value.as_ref().ok_or_else(|| FeatureError::MissingFields(vec![field]))
}

fn integer(field: &'static str, value: &Option<RawValue>) -> Result<i64, FeatureError> {
    let raw = present(field, value)?;
    let parsed = match raw {
        RawValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
            Some(*n as i64)
        }
        RawValue::Number(_) => None,
        RawValue::Text(s) => s.trim().parse::<i64>().ok(),
    };
    parsed.ok_or_else(|| FeatureError::InvalidInteger { field, value: raw.describe() })
}

fn float(field: &'static str, value: &Option<RawValue>) -> Result<f64, FeatureError> {
    let raw = present(field, value)?;
    let parsed = match raw {
        RawValue::Number(n) => Some(*n),
        RawValue::Text(s) => s.trim().parse::<f64>().ok(),
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| FeatureError::InvalidFloat { field, value: raw.describe() })
}

fn choice<T>(
    field: &'static str,
    value: &Option<RawValue>,
    from_label: fn(&str) -> Option<T>,
) -> Result<T, FeatureError> {
    let raw = present(field, value)?;
    let parsed = match raw {
        RawValue::Text(s) => from_label(s),
        RawValue::Number(_) => None,
    };
    parsed.ok_or_else(|| FeatureError::InvalidChoice { field, value: raw.describe() })
}

// ============================================================================
// TESTS
// ============================================================================
