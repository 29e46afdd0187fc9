//! Random Forest Inference
//!
//! Column transformer + forest of decision trees, evaluated on one record.
//! Mirrors a fitted scikit-learn `Pipeline(ColumnTransformer, RandomForestClassifier)`:
//! - transformer blocks are concatenated in declaration order
//! - a sample goes left when `x[feature] <= threshold`
//! - each leaf distribution is normalized, the forest averages the trees

use serde::Deserialize;

use crate::features::{feature_kind, FeatureRecord};
use super::bundle::{Classifier, ClassifierError};
use super::ModelError;

// ============================================================================
// COLUMN TRANSFORMER
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnTransform {
    /// `(x - mean) / scale` per column
    StandardScaler {
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    /// Numeric columns copied as-is
    Passthrough { columns: Vec<String> },
    /// One indicator per fitted category; unknown categories encode as all zeros
    OneHot {
        columns: Vec<String>,
        categories: Vec<Vec<String>>,
    },
}

impl ColumnTransform {
    /// Number of output columns
    pub fn width(&self) -> usize {
        match self {
            ColumnTransform::StandardScaler { columns, .. } => columns.len(),
            ColumnTransform::Passthrough { columns } => columns.len(),
            ColumnTransform::OneHot { categories, .. } => categories.iter().map(Vec::len).sum(),
        }
    }

    fn columns(&self) -> &[String] {
        match self {
            ColumnTransform::StandardScaler { columns, .. }
            | ColumnTransform::Passthrough { columns }
            | ColumnTransform::OneHot { columns, .. } => columns,
        }
    }

    fn validate(&self) -> Result<(), ModelError> {
        let numeric = !matches!(self, ColumnTransform::OneHot { .. });

        for column in self.columns() {
            let kind = feature_kind(column)
                .ok_or_else(|| ModelError::Malformed(format!("unknown feature column '{}'", column)))?;
            if numeric && !kind.is_numeric() {
                return Err(ModelError::Malformed(format!(
                    "numeric transform applied to categorical column '{}'",
                    column
                )));
            }
        }

        match self {
            ColumnTransform::StandardScaler { columns, mean, scale } => {
                if mean.len() != columns.len() || scale.len() != columns.len() {
                    return Err(ModelError::Malformed("scaler parameters do not match its columns".to_string()));
                }
                if mean.iter().any(|m| !m.is_finite()) || scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
                    return Err(ModelError::Malformed("scaler parameters must be finite with non-zero scale".to_string()));
                }
            }
            ColumnTransform::OneHot { columns, categories } => {
                if categories.len() != columns.len() {
                    return Err(ModelError::Malformed("one-hot categories do not match its columns".to_string()));
                }
            }
            ColumnTransform::Passthrough { .. } => {}
        }

        Ok(())
    }

    fn transform_into(&self, record: &FeatureRecord, out: &mut Vec<f64>) -> Result<(), ClassifierError> {
        match self {
            ColumnTransform::StandardScaler { columns, mean, scale } => {
                for (i, column) in columns.iter().enumerate() {
                    let x = numeric(record, column)?;
                    out.push((x - mean[i]) / scale[i]);
                }
            }
            ColumnTransform::Passthrough { columns } => {
                for column in columns {
                    out.push(numeric(record, column)?);
                }
            }
            ColumnTransform::OneHot { columns, categories } => {
                for (column, fitted) in columns.iter().zip(categories) {
                    let value = record
                        .value(column)
                        .ok_or_else(|| ClassifierError::MissingFeature(column.clone()))?;
                    out.extend(fitted.iter().map(|c| if value.matches_category(c) { 1.0 } else { 0.0 }));
                }
            }
        }
        Ok(())
    }
}

fn numeric(record: &FeatureRecord, column: &str) -> Result<f64, ClassifierError> {
    record
        .value(column)
        .ok_or_else(|| ClassifierError::MissingFeature(column.to_string()))?
        .as_f64()
        .ok_or_else(|| ClassifierError::Inference(format!("column '{}' is not numeric", column)))
}

/// Ordered list of column transforms
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnTransformer {
    pub transformers: Vec<ColumnTransform>,
}

impl ColumnTransformer {
    pub fn width(&self) -> usize {
        self.transformers.iter().map(ColumnTransform::width).sum()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.transformers.is_empty() {
            return Err(ModelError::Malformed("preprocessor has no transformers".to_string()));
        }
        self.transformers.iter().try_for_each(ColumnTransform::validate)
    }

    /// Record -> dense model input
    pub fn transform(&self, record: &FeatureRecord) -> Result<Vec<f64>, ClassifierError> {
        let mut out = Vec::with_capacity(self.width());
        for transform in &self.transformers {
            transform.transform_into(record, &mut out)?;
        }
        Ok(out)
    }
}

// ============================================================================
// TREES
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Per-class weight (counts or fractions)
        value: Vec<f64>,
    },
}

/// Flat node array, root at index 0
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Children must come after their parent, so traversal always terminates
    fn validate(&self, n_classes: usize, width: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Malformed("empty decision tree".to_string()));
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split { feature, threshold, left, right } => {
                    if *feature >= width {
                        return Err(ModelError::Malformed(format!(
                            "node {} splits on feature {} but the input has {} columns",
                            idx, feature, width
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::Malformed(format!("node {} has a non-finite threshold", idx)));
                    }
                    for child in [left, right] {
                        if *child <= idx || *child >= self.nodes.len() {
                            return Err(ModelError::Malformed(format!("node {} has invalid child {}", idx, child)));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(ModelError::Malformed(format!(
                            "leaf {} has {} values, expected {}",
                            idx,
                            value.len(),
                            n_classes
                        )));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) || value.iter().sum::<f64>() <= 0.0 {
                        return Err(ModelError::Malformed(format!("leaf {} has invalid class weights", idx)));
                    }
                }
            }
        }

        Ok(())
    }

    fn leaf(&self, x: &[f64]) -> Result<&[f64], ClassifierError> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Split { feature, threshold, left, right }) => {
                    let v = x.get(*feature).ok_or_else(|| {
                        ClassifierError::Inference(format!("input has no column {}", feature))
                    })?;
                    idx = if *v <= *threshold { *left } else { *right };
                }
                Some(TreeNode::Leaf { value }) => return Ok(value),
                None => return Err(ClassifierError::Inference(format!("dangling tree node {}", idx))),
            }
        }
    }
}

// ============================================================================
// FOREST
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    pub n_classes: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    fn validate(&self, width: usize) -> Result<(), ModelError> {
        if self.n_classes == 0 {
            return Err(ModelError::Malformed("forest has zero classes".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Malformed("forest has no trees".to_string()));
        }
        self.trees.iter().try_for_each(|t| t.validate(self.n_classes, width))
    }

    /// Mean of the normalized leaf distributions
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, ClassifierError> {
        let mut proba = vec![0.0f64; self.n_classes];

        for tree in &self.trees {
            let leaf = tree.leaf(x)?;
            let total: f64 = leaf.iter().sum();
            for (p, w) in proba.iter_mut().zip(leaf) {
                *p += w / total;
            }
        }

        let n_trees = self.trees.len() as f64;
        for p in proba.iter_mut() {
            *p /= n_trees;
        }

        Ok(proba)
    }
}

/// Preprocessor + forest, validated together at load time
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    preprocessor: ColumnTransformer,
    forest: RandomForest,
}

impl ForestClassifier {
    pub fn new(preprocessor: ColumnTransformer, forest: RandomForest) -> Result<Self, ModelError> {
        preprocessor.validate()?;
        forest.validate(preprocessor.width())?;
        Ok(Self { preprocessor, forest })
    }

    pub fn n_trees(&self) -> usize {
        self.forest.trees.len()
    }
}

impl Classifier for ForestClassifier {
    fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f64>, ClassifierError> {
        let x = self.preprocessor.transform(record)?;
        self.forest.predict_proba(&x)
    }

    fn n_classes(&self) -> usize {
        self.forest.n_classes
    }

    fn model_type(&self) -> &str {
        "Random Forest Classifier"
    }

    fn n_estimators(&self) -> Option<usize> {
        Some(self.n_trees())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::SocialNetwork;
    use crate::fixtures::{sample_record, FOREST_ARTIFACT};

    fn fixture() -> ForestClassifier {
        let json: serde_json::Value = serde_json::from_str(FOREST_ARTIFACT).unwrap();
        let preprocessor: ColumnTransformer = serde_json::from_value(json["preprocessor"].clone()).unwrap();
        let forest: RandomForest = serde_json::from_value(json["classifier"].clone()).unwrap();
        ForestClassifier::new(preprocessor, forest).unwrap()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_transform_layout() {
        let model = fixture();
        assert_eq!(model.preprocessor.width(), 8);

        let x = model.preprocessor.transform(&sample_record()).unwrap();
        // scaled hours, passthrough ints, TikTok/YouTube, No/Si
        assert_close(&x, &[0.0, 0.0, 20.0, 3.0, 1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_unknown_category_encodes_zeros() {
        let model = fixture();
        let record = FeatureRecord {
            red_social_principal: SocialNetwork::Discord,
            ..sample_record()
        };
        let x = model.preprocessor.transform(&record).unwrap();
        assert_eq!(&x[4..6], &[0.0, 0.0]);
    }

    #[test]
    fn test_forest_proba() {
        let model = fixture();
        assert_eq!(model.n_trees(), 2);

        let proba = model.predict_proba(&sample_record()).unwrap();
        assert_close(&proba, &[0.15, 0.30, 0.55]);
    }

    #[test]
    fn test_forest_proba_other_branch() {
        let model = fixture();
        let record = FeatureRecord {
            horas_estudio: 6.0,
            red_social_principal: SocialNetwork::YouTube,
            ..sample_record()
        };
        // tree 1 -> [9, 0, 1], tree 2 -> [0.5, 0.2, 0.3]
        let proba = model.predict_proba(&record).unwrap();
        assert_close(&proba, &[0.7, 0.1, 0.2]);
    }

    #[test]
    fn test_rejects_categorical_scaler() {
        let preprocessor: ColumnTransformer = serde_json::from_value(serde_json::json!({
            "transformers": [
                { "kind": "standard_scaler", "columns": ["Motivo_Uso"], "mean": [0.0], "scale": [1.0] }
            ]
        }))
        .unwrap();
        assert!(preprocessor.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_column() {
        let preprocessor: ColumnTransformer = serde_json::from_value(serde_json::json!({
            "transformers": [ { "kind": "passthrough", "columns": ["Promedio_Ponderado"] } ]
        }))
        .unwrap();
        assert!(preprocessor.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_trees() {
        let preprocessor: ColumnTransformer = serde_json::from_value(serde_json::json!({
            "transformers": [ { "kind": "passthrough", "columns": ["Edad"] } ]
        }))
        .unwrap();

        let cycle: RandomForest = serde_json::from_value(serde_json::json!({
            "n_classes": 2,
            "trees": [ { "nodes": [ { "feature": 0, "threshold": 1.0, "left": 0, "right": 1 }, { "value": [1.0, 1.0] } ] } ]
        }))
        .unwrap();
        assert!(ForestClassifier::new(preprocessor.clone(), cycle).is_err());

        let out_of_range: RandomForest = serde_json::from_value(serde_json::json!({
            "n_classes": 2,
            "trees": [ { "nodes": [ { "feature": 3, "threshold": 1.0, "left": 1, "right": 2 }, { "value": [1.0, 0.0] }, { "value": [0.0, 1.0] } ] } ]
        }))
        .unwrap();
        assert!(ForestClassifier::new(preprocessor.clone(), out_of_range).is_err());

        let short_leaf: RandomForest = serde_json::from_value(serde_json::json!({
            "n_classes": 3,
            "trees": [ { "nodes": [ { "value": [1.0, 0.0] } ] } ]
        }))
        .unwrap();
        assert!(ForestClassifier::new(preprocessor.clone(), short_leaf).is_err());

        let no_trees: RandomForest = serde_json::from_value(serde_json::json!({ "n_classes": 2, "trees": [] })).unwrap();
        assert!(ForestClassifier::new(preprocessor, no_trees).is_err());
    }
}
