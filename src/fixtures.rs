//! Shared test data: a small two-tree forest and the reference survey answers

use crate::features::{assemble, FeatureRecord, RawFeatures};
use crate::model::{Classifier, ClassifierError, LabelEncoder, ModelBundle};

/// Transformed layout: [redes_scaled, estudio_scaled, Edad, Ciclo,
/// TikTok, YouTube, Usa_Estrategias=No, Usa_Estrategias=Si]
pub const FOREST_ARTIFACT: &str = r#"{
  "format_version": 1,
  "label_encoder": { "classes": ["Alto", "Bajo", "Promedio"] },
  "preprocessor": {
    "transformers": [
      { "kind": "standard_scaler", "columns": ["Horas_Redes_Sociales", "Horas_Estudio"], "mean": [4.0, 3.0], "scale": [2.0, 1.5] },
      { "kind": "passthrough", "columns": ["Edad", "Ciclo"] },
      { "kind": "one_hot", "columns": ["Red_Social_Principal", "Usa_Estrategias"], "categories": [["TikTok", "YouTube"], ["No", "Si"]] }
    ]
  },
  "classifier": {
    "kind": "random_forest",
    "n_classes": 3,
    "trees": [
      { "nodes": [
        { "feature": 1, "threshold": 0.5, "left": 1, "right": 2 },
        { "feature": 0, "threshold": 0.25, "left": 3, "right": 4 },
        { "value": [9.0, 0.0, 1.0] },
        { "value": [2.0, 1.0, 7.0] },
        { "value": [0.0, 8.0, 2.0] }
      ] },
      { "nodes": [
        { "feature": 4, "threshold": 0.5, "left": 1, "right": 2 },
        { "value": [0.5, 0.2, 0.3] },
        { "feature": 6, "threshold": 0.5, "left": 3, "right": 4 },
        { "value": [0.6, 0.1, 0.3] },
        { "value": [0.1, 0.5, 0.4] }
      ] }
    ]
  }
}"#;

/// Reference answers as posted by the HTML form
pub const SAMPLE_FORM: &str = "edad=20&ciclo=3&horas_redes_sociales=4.0&horas_estudio=3.0\
&red_social_principal=TikTok&motivo_uso=Entretenimiento&afecta_concentracion=A+veces\
&afecta_horas_estudio=Si&usa_estrategias=No&impacto_general=Neutral";

pub fn sample_raw() -> RawFeatures {
    RawFeatures {
        edad: Some("20".into()),
        ciclo: Some("3".into()),
        horas_redes_sociales: Some("4.0".into()),
        horas_estudio: Some("3.0".into()),
        red_social_principal: Some("TikTok".into()),
        motivo_uso: Some("Entretenimiento".into()),
        afecta_concentracion: Some("A veces".into()),
        afecta_horas_estudio: Some("Si".into()),
        usa_estrategias: Some("No".into()),
        impacto_general: Some("Neutral".into()),
    }
}

pub fn sample_record() -> FeatureRecord {
    assemble(&sample_raw()).expect("sample answers are valid")
}

pub fn sample_bundle() -> ModelBundle {
    ModelBundle::from_artifact(FOREST_ARTIFACT.as_bytes(), "fixture", "fixture").expect("fixture artifact is valid")
}

/// Bundle with the fixture's three classes around any classifier
pub fn bundle_with(classifier: Box<dyn Classifier>) -> ModelBundle {
    let encoder = LabelEncoder::new(vec!["Alto".into(), "Bajo".into(), "Promedio".into()])
        .expect("fixture classes are valid");
    ModelBundle::new(classifier, encoder, "fixture", "fixture").expect("fixture bundle is valid")
}

/// Always returns the same distribution
#[derive(Debug)]
pub struct FixedClassifier(pub Vec<f64>);

impl Classifier for FixedClassifier {
    fn predict_proba(&self, _record: &FeatureRecord) -> Result<Vec<f64>, ClassifierError> {
        Ok(self.0.clone())
    }

    fn n_classes(&self) -> usize {
        self.0.len()
    }
}

/// Always errors, like a model fed an input it cannot handle
#[derive(Debug)]
pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn predict_proba(&self, _record: &FeatureRecord) -> Result<Vec<f64>, ClassifierError> {
        Err(ClassifierError::Inference("X has 9 features, but the model expects 10".to_string()))
    }

    fn n_classes(&self) -> usize {
        3
    }
}

/// Panics when invoked; proves a request never reached the model
#[derive(Debug)]
pub struct PanickyClassifier;

impl Classifier for PanickyClassifier {
    fn predict_proba(&self, _record: &FeatureRecord) -> Result<Vec<f64>, ClassifierError> {
        panic!("classifier must not be called");
    }

    fn n_classes(&self) -> usize {
        3
    }
}
