//! Regression model specifications.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tuck_data::Factor;

/// A named set of factors regressed against excess returns.
///
/// The intercept is implicit and always the first regressor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    name: String,
    factors: Vec<Factor>,
}

impl ModelSpec {
    /// Create a validated model specification.
    ///
    /// The name must be non-empty and the factor list non-empty and free of
    /// duplicates.
    pub fn new(name: impl Into<String>, factors: Vec<Factor>) -> Result<Self, ModelError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ModelError::InvalidSpec("model name is empty".to_string()));
        }
        if factors.is_empty() {
            return Err(ModelError::InvalidSpec(format!("model '{name}' has no factors")));
        }
        for (i, factor) in factors.iter().enumerate() {
            if factors[..i].contains(factor) {
                return Err(ModelError::InvalidSpec(format!(
                    "model '{name}' lists {factor} twice"
                )));
            }
        }
        Ok(Self { name, factors })
    }

    fn standard(name: &str, factors: &[Factor]) -> Self {
        Self {
            name: name.to_string(),
            factors: factors.to_vec(),
        }
    }

    /// Capital asset pricing model: market only.
    pub fn capm() -> Self {
        Self::standard("CAPM", &[Factor::MktRf])
    }

    /// Fama-French three-factor model.
    pub fn ff3() -> Self {
        Self::standard("FF 3", &[Factor::MktRf, Factor::Smb, Factor::Hml])
    }

    /// Fama-French five-factor model.
    pub fn ff5() -> Self {
        Self::standard("FF 5", &Factor::ALL)
    }

    /// Five-factor model without the value factor.
    pub fn ff_no_hml() -> Self {
        Self::standard(
            "FF No HML",
            &[Factor::MktRf, Factor::Smb, Factor::Rmw, Factor::Cma],
        )
    }

    /// Five-factor model without the size factor.
    pub fn ff_no_smb() -> Self {
        Self::standard(
            "FF No SMB",
            &[Factor::MktRf, Factor::Hml, Factor::Rmw, Factor::Cma],
        )
    }

    /// The five models reported by default, in column order.
    pub fn standard_set() -> Vec<Self> {
        vec![
            Self::capm(),
            Self::ff3(),
            Self::ff5(),
            Self::ff_no_hml(),
            Self::ff_no_smb(),
        ]
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Factors in regressor order.
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// Whether the model includes a factor.
    pub fn includes(&self, factor: Factor) -> bool {
        self.factors.contains(&factor)
    }

    /// Number of regressors including the intercept.
    pub fn regressor_count(&self) -> usize {
        self.factors.len() + 1
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<&str> = self.factors.iter().map(|f| f.label()).collect();
        write!(f, "{}={}", self.name, labels.join(","))
    }
}

/// Parses `NAME=Mkt-RF,SMB,...`.
impl FromStr for ModelSpec {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, factors) = s.split_once('=').ok_or_else(|| {
            ModelError::InvalidSpec(format!("expected NAME=FACTOR[,FACTOR...], got '{s}'"))
        })?;

        let factors = factors
            .split(',')
            .filter(|f| !f.trim().is_empty())
            .map(|f| f.parse::<Factor>().map_err(ModelError::InvalidSpec))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(name, factors)
    }
}
