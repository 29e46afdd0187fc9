//! Recommendation Resolver
//!
//! Static advice per performance tier. Unknown labels resolve to the middle
//! tier instead of failing the request.

use serde::Serialize;

/// Performance tier predicted by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    Alto,
    Promedio,
    Bajo,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Alto, Tier::Promedio, Tier::Bajo];

    /// Used when the label is not a known tier
    pub const FALLBACK: Tier = Tier::Promedio;

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Alto" => Some(Tier::Alto),
            "Promedio" => Some(Tier::Promedio),
            "Bajo" => Some(Tier::Bajo),
            _ => None,
        }
    }

    pub fn resolve(label: &str) -> Self {
        Self::from_label(label).unwrap_or(Self::FALLBACK)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Alto => "Alto",
            Tier::Promedio => "Promedio",
            Tier::Bajo => "Bajo",
        }
    }

    pub fn recommendations(&self) -> &'static RecommendationBlock {
        match self {
            Tier::Alto => &ALTO,
            Tier::Promedio => &PROMEDIO,
            Tier::Bajo => &BAJO,
        }
    }

    pub fn card(&self) -> &'static ResultCard {
        match self {
            Tier::Alto => &ResultCard { css_class: "result-alto", color: "#155724", label: "ALTO" },
            Tier::Promedio => &ResultCard { css_class: "result-promedio", color: "#856404", label: "PROMEDIO" },
            Tier::Bajo => &ResultCard { css_class: "result-bajo", color: "#721c24", label: "BAJO" },
        }
    }
}

// ============================================================================
// TABLES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationBlock {
    /// Hex display color
    pub color: &'static str,
    pub title: &'static str,
    pub items: &'static [&'static str],
}

/// How the form UI displays a predicted tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultCard {
    pub css_class: &'static str,
    pub color: &'static str,
    pub label: &'static str,
}

static BAJO: RecommendationBlock = RecommendationBlock {
    color: "#dc3545",
    title: "Areas de mejora sugeridas",
    items: &[
        "Considere reducir el tiempo en redes sociales",
        "Aumente las horas dedicadas al estudio",
        "Implemente estrategias para evitar distracciones",
        "Use las redes sociales con fines academicos",
        "Establezca horarios fijos para el uso de RRSS",
    ],
};

static PROMEDIO: RecommendationBlock = RecommendationBlock {
    color: "#856404",
    title: "Sugerencias para mejorar",
    items: &[
        "Mantener el equilibrio actual pero buscar optimizar",
        "Considere reducir ligeramente el tiempo en RRSS",
        "Incremente gradualmente las horas de estudio",
        "Explore herramientas de productividad",
    ],
};

static ALTO: RecommendationBlock = RecommendationBlock {
    color: "#28a745",
    title: "Excelente rendimiento!",
    items: &[
        "Continue con sus buenos habitos de estudio",
        "Comparta sus estrategias con companeros",
        "Mantenga el equilibrio actual",
        "Considere actividades extracurriculares",
    ],
};

/// Advice for a predicted label; never fails
pub fn resolve(label: &str) -> &'static RecommendationBlock {
    Tier::resolve(label).recommendations()
}
