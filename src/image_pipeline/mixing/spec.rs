//! Wavelength-keyed mixing tables and the matrices built from them.

use std::collections::BTreeMap;

use crate::image_pipeline::common::error::{ConversionError, Result};

/// Per-wavelength 3-component weights.
///
/// Labels iterate in sorted order, which fixes the column of A and the row
/// of B assigned to each wavelength.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MixingSpec {
    weights: BTreeMap<String, [f64; 3]>,
}

impl MixingSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: impl Into<String>, weights: [f64; 3]) -> Self {
        self.insert(label, weights);
        self
    }

    pub fn insert(&mut self, label: impl Into<String>, weights: [f64; 3]) -> Option<[f64; 3]> {
        self.weights.insert(label.into(), weights)
    }

    pub fn get(&self, label: &str) -> Option<&[f64; 3]> {
        self.weights.get(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// How much of each color channel of an excitation image feeds its hidden plane.
    pub fn default_input() -> Self {
        Self::new()
            .with("450", [0.0, 0.0, 2.0])
            .with("529", [0.5, 0.5, 0.0])
            .with("590", [0.5, 0.5, 0.0])
            .with("645", [1.0, 0.0, 0.0])
    }

    /// Display color of each hidden plane: blue, green, yellow, red.
    pub fn default_output() -> Self {
        Self::new()
            .with("450", [0.0, 0.0, 1.0])
            .with("529", [0.0, 0.5, 0.0])
            .with("590", [0.5, 0.5, 0.0])
            .with("645", [0.5, 0.0, 0.0])
    }
}

impl FromIterator<(String, [f64; 3])> for MixingSpec {
    fn from_iter<I: IntoIterator<Item = (String, [f64; 3])>>(iter: I) -> Self {
        Self {
            weights: iter.into_iter().collect(),
        }
    }
}

/// Parses `LABEL=a,b,c`, as accepted on the command line.
pub fn parse_weight_entry(entry: &str) -> Result<(String, [f64; 3])> {
    let invalid = || ConversionError::ConfigurationError(format!("expected LABEL=a,b,c, got {:?}", entry));

    let (label, values) = entry.split_once('=').ok_or_else(invalid)?;
    let label = label.trim();
    if label.is_empty() {
        return Err(invalid());
    }

    let parsed = values
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|_| invalid()))
        .collect::<Result<Vec<f64>>>()?;
    let weights: [f64; 3] = parsed.try_into().map_err(|_| invalid())?;

    Ok((label.to_string(), weights))
}

/// Input and output tables for one mixing run
#[derive(Debug, Clone, PartialEq)]
pub struct MixingConfig {
    pub input: MixingSpec,
    pub output: MixingSpec,
}

impl Default for MixingConfig {
    fn default() -> Self {
        Self {
            input: MixingSpec::default_input(),
            output: MixingSpec::default_output(),
        }
    }
}

/// Validated matrices A (3 x N, stored by column) and B (N x 3, stored by row).
#[derive(Debug, Clone)]
pub struct MixingMatrices {
    labels: Vec<String>,
    input: Vec<[f64; 3]>,
    output: Vec<[f64; 3]>,
}

impl MixingMatrices {
    pub fn new(config: &MixingConfig) -> Result<Self> {
        if config.input.is_empty() {
            return Err(ConversionError::ConfigurationError(
                "no excitation wavelengths defined".to_string(),
            ));
        }

        let input_labels: Vec<&str> = config.input.labels().collect();
        let output_labels: Vec<&str> = config.output.labels().collect();
        if input_labels != output_labels {
            return Err(ConversionError::ConfigurationError(format!(
                "need definitions for all excitations: input {:?}, output {:?}",
                input_labels, output_labels
            )));
        }

        let mut labels = Vec::with_capacity(input_labels.len());
        let mut input = Vec::with_capacity(input_labels.len());
        let mut output = Vec::with_capacity(input_labels.len());
        for label in input_labels {
            let a = config.input.get(label).copied().unwrap_or_default();
            let b = config.output.get(label).copied().unwrap_or_default();
            for w in a.iter().chain(b.iter()) {
                if !w.is_finite() || *w < 0.0 {
                    return Err(ConversionError::ConfigurationError(format!(
                        "weights for {} must be finite and non-negative, got {:?} / {:?}",
                        label, a, b
                    )));
                }
            }
            labels.push(label.to_string());
            input.push(a);
            output.push(b);
        }

        Ok(Self { labels, input, output })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.binary_search_by(|l| l.as_str().cmp(label)).ok()
    }

    /// Column `n` of A.
    pub fn input_column(&self, n: usize) -> &[f64; 3] {
        &self.input[n]
    }

    /// Row `n` of B.
    pub fn output_row(&self, n: usize) -> &[f64; 3] {
        &self.output[n]
    }
}
