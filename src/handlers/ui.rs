//! Form UI handler
//!
//! Renders the survey form; the page script posts to `/predict` and draws the
//! result, so the browser is just another client of the JSON contract.

use std::collections::BTreeMap;

use axum::{extract::State, response::Html};

use crate::features::{Frequency, OverallImpact, SocialNetwork, UsageReason, YesNo};
use crate::model::ModelMetadata;
use crate::recommendations::{ResultCard, Tier};
use crate::AppState;

const TEMPLATE: &str = include_str!("index.html");

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let bundle = state.models.get().await;
    Html(render_page(bundle.as_ref().map(|b| b.metadata())))
}

pub fn render_page(model: Option<&ModelMetadata>) -> String {
    let ciclos: Vec<String> = (1..=10).map(|c| c.to_string()).collect();

    TEMPLATE
        .replace("{{MODEL_INFO}}", &model_info(model))
        .replace("{{CICLOS}}", &options(ciclos.iter().map(String::as_str), "3"))
        .replace("{{SOCIAL_NETWORKS}}", &options(SocialNetwork::ALL.iter().map(|c| c.as_str()), "TikTok"))
        .replace("{{MOTIVOS_USO}}", &options(UsageReason::ALL.iter().map(|c| c.as_str()), "Entretenimiento"))
        .replace("{{AFECTA_CONCENTRACION}}", &options(Frequency::ALL.iter().map(|c| c.as_str()), "A veces"))
        .replace("{{AFECTA_HORAS_ESTUDIO}}", &options(YesNo::ALL.iter().map(|c| c.as_str()), "Si"))
        .replace("{{USA_ESTRATEGIAS}}", &options(YesNo::ALL.iter().map(|c| c.as_str()), "No"))
        .replace("{{IMPACTO_GENERAL}}", &options(OverallImpact::ALL.iter().map(|c| c.as_str()), "Neutral"))
        .replace("{{RESULT_CARDS}}", &result_cards())
}

fn options<'a>(choices: impl Iterator<Item = &'a str>, selected: &str) -> String {
    choices
        .map(|choice| {
            let marker = if choice == selected { " selected" } else { "" };
            format!("<option value=\"{0}\"{1}>{0}</option>", choice, marker)
        })
        .collect()
}

fn model_info(model: Option<&ModelMetadata>) -> String {
    match model {
        Some(meta) => format!(
            "<div class=\"info-box\">\
             <strong>Modelo utilizado:</strong> {}<br>\
             <strong>Precision del modelo:</strong> ~68% en datos de prueba<br>\
             <strong>Dataset:</strong> 600 estudiantes universitarios peruanos\
             </div>",
            meta.model_type,
        ),
        None => "<div class=\"warning-box\">\
                 <strong>Modelo no disponible.</strong> \
                 No se puede realizar la prediccion sin el modelo cargado.\
                 </div>"
            .to_string(),
    }
}

fn result_cards() -> String {
    let cards: BTreeMap<&str, &ResultCard> = Tier::ALL
        .iter()
        .map(|tier| (tier.as_str(), tier.card()))
        .collect();
    serde_json::to_string(&cards).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_bundle;

    #[test]
    fn test_all_placeholders_filled() {
        let page = render_page(None);
        assert!(!page.contains("{{"), "unfilled placeholder in page");
        assert!(page.contains("Modelo no disponible"));
    }

    #[test]
    fn test_form_offers_every_choice() {
        let page = render_page(None);
        for network in SocialNetwork::ALL {
            assert!(page.contains(&format!("<option value=\"{}\"", network)));
        }
        assert!(page.contains("<option value=\"A veces\" selected>"));
        assert!(page.contains("<option value=\"Muy Positivo\">"));
        assert!(page.contains("<option value=\"10\">10</option>"));
        assert!(page.contains("name=\"horas_redes_sociales\" min=\"0.5\" max=\"12.0\""));
    }

    #[test]
    fn test_model_info_when_loaded() {
        let bundle = sample_bundle();
        let page = render_page(Some(bundle.metadata()));
        assert!(page.contains("Random Forest Classifier"));
        assert!(page.contains("<strong>Precision del modelo:</strong> ~68% en datos de prueba"));
        assert!(page.contains("600 estudiantes universitarios peruanos"));
        assert!(!page.contains("warning-box\">"));
    }

    #[test]
    fn test_footer_credits() {
        let page = render_page(None);
        assert!(page.contains("Universidad Privada Antenor Orrego"));
        assert!(page.contains("<p>Docente: Hernan Sagastegui Chigne</p>"));
    }

    #[test]
    fn test_result_cards_json() {
        let cards: serde_json::Value = serde_json::from_str(&result_cards()).unwrap();
        assert_eq!(cards["Alto"]["label"], "ALTO");
        assert_eq!(cards["Bajo"]["css_class"], "result-bajo");
        assert_eq!(cards["Promedio"]["color"], "#856404");
    }
}
