use thiserror::Error;

use crate::models::matching::{Category, CategoryScores};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    #[error("no recognized category present to weight")]
    NoCategories,
}

/// Rubric weight of a category. The six weights sum to 1.0.
pub fn weight(category: Category) -> f64 {
    match category {
        Category::Degree => 0.10,
        Category::Experience => 0.20,
        Category::TechnicalSkill => 0.30,
        Category::Responsibility => 0.25,
        Category::Certificate => 0.10,
        Category::SoftSkill => 0.05,
    }
}

/// Weighted mean of the present category scores:
/// Σ(score × weight) / Σ(weight of present categories).
///
/// Dividing by the present weight keeps a partial response on the 0–100
/// scale instead of deflating it.
pub fn aggregate(scores: &CategoryScores) -> Result<f64, AggregationError> {
    let (weighted, total_weight) = scores.iter().fold(
        (0.0_f64, 0.0_f64),
        |(weighted, total), (category, score)| {
            let w = weight(*category);
            (weighted + f64::from(score.score) * w, total + w)
        },
    );

    if total_weight <= 0.0 {
        return Err(AggregationError::NoCategories);
    }

    Ok((weighted / total_weight).clamp(0.0, 100.0))
}
