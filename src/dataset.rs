//! Dataset collaborator: in-memory samples, CSV loading and splitting
//!
//! A [`Dataset`] is an ordered sequence of fixed-length input vectors paired
//! with fixed-length target vectors. The engine only requires equal counts
//! and widths matching the topology; loading, feature scaling and splitting
//! live here, outside the numeric core.

use crate::error::{NetworkError, Result};
use crate::utils::SimpleRng;
use std::collections::BTreeSet;
use std::path::Path;

/// Ordered input/target pairs sharing the widths of the topology's input and
/// output layers.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<Vec<f64>>,
}

/// Controls how a CSV file is parsed into a [`Dataset`].
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Skip the first row of the file if true.
    pub has_header: bool,
    /// Column indices to use as input features. Must be numeric.
    pub input_columns: Vec<usize>,
    /// Column indices to use as numeric targets. Use this for regression or
    /// targets that are already numeric / one-hot.
    pub target_columns: Vec<usize>,
    /// Column index holding a class label (string or integer) to be one-hot
    /// encoded into the target vector, appended after any numeric targets.
    pub label_column: Option<usize>,
    /// Number of classes for one-hot encoding. Zero auto-detects from the
    /// data.
    pub num_classes: usize,
    /// Field separator.
    pub delimiter: u8,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            has_header: true,
            input_columns: Vec::new(),
            target_columns: Vec::new(),
            label_column: None,
            num_classes: 0,
            delimiter: b',',
        }
    }
}

impl Dataset {
    /// Build a dataset from parallel input/target vectors.
    pub fn new(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<Self> {
        if inputs.len() != targets.len() {
            return Err(NetworkError::DatasetSizeMismatch {
                inputs: inputs.len(),
                targets: targets.len(),
            });
        }
        Ok(Self { inputs, targets })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// True when the dataset holds no samples.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Load a dataset from a CSV file according to `config`.
    ///
    /// Numeric target columns are written first, then the one-hot vector of
    /// the label column (when configured) is appended.
    pub fn from_csv<P: AsRef<Path>>(path: P, config: &CsvConfig) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(config.has_header)
            .delimiter(config.delimiter)
            .flexible(true)
            .from_path(path.as_ref())?;

        let records: Vec<csv::StringRecord> =
            reader.records().collect::<std::result::Result<_, _>>()?;

        let label_index = match config.label_column {
            Some(column) => Some(build_label_index(&records, column, config.num_classes)?),
            None => None,
        };

        let mut inputs = Vec::with_capacity(records.len());
        let mut targets = Vec::with_capacity(records.len());

        for (row, record) in records.iter().enumerate() {
            let mut input = Vec::with_capacity(config.input_columns.len());
            for &column in &config.input_columns {
                input.push(parse_cell(record, row, column)?);
            }

            let mut target = Vec::with_capacity(config.target_columns.len());
            for &column in &config.target_columns {
                target.push(parse_cell(record, row, column)?);
            }

            if let (Some(column), Some(index)) = (config.label_column, label_index.as_ref()) {
                let label = cell(record, row, column)?.trim();
                let class = index.class_of(label, row)?;
                let mut one_hot = vec![0.0; index.num_classes];
                one_hot[class] = 1.0;
                target.extend(one_hot);
            }

            inputs.push(input);
            targets.push(target);
        }

        Dataset::new(inputs, targets)
    }

    /// Min-max scale every input feature into [0, 1] in place.
    ///
    /// Constant features (max == min) are left untouched.
    pub fn normalize_inputs(&mut self) {
        if self.inputs.is_empty() || self.inputs[0].is_empty() {
            return;
        }
        let features = self.inputs[0].len();
        let mut mins = self.inputs[0].clone();
        let mut maxs = self.inputs[0].clone();
        for sample in &self.inputs {
            for j in 0..features {
                mins[j] = mins[j].min(sample[j]);
                maxs[j] = maxs[j].max(sample[j]);
            }
        }
        for sample in &mut self.inputs {
            for j in 0..features {
                let range = maxs[j] - mins[j];
                if range > 0.0 {
                    sample[j] = (sample[j] - mins[j]) / range;
                }
            }
        }
    }

    /// Split into (train, test) preserving sample order.
    pub fn split(&self, train_ratio: f64) -> Result<(Dataset, Dataset)> {
        self.check_split(train_ratio)?;
        let train_size = (self.len() as f64 * train_ratio) as usize;
        let train = Dataset {
            inputs: self.inputs[..train_size].to_vec(),
            targets: self.targets[..train_size].to_vec(),
        };
        let test = Dataset {
            inputs: self.inputs[train_size..].to_vec(),
            targets: self.targets[train_size..].to_vec(),
        };
        Ok((train, test))
    }

    /// Split into (train, test) after shuffling sample order with `rng`.
    pub fn split_with_shuffle(
        &self,
        train_ratio: f64,
        rng: &mut SimpleRng,
    ) -> Result<(Dataset, Dataset)> {
        self.check_split(train_ratio)?;
        let mut indices: Vec<usize> = (0..self.len()).collect();
        rng.shuffle(&mut indices);

        let train_size = (self.len() as f64 * train_ratio) as usize;
        let mut train = Dataset::default();
        let mut test = Dataset::default();
        for (position, &index) in indices.iter().enumerate() {
            let destination = if position < train_size {
                &mut train
            } else {
                &mut test
            };
            destination.inputs.push(self.inputs[index].clone());
            destination.targets.push(self.targets[index].clone());
        }
        Ok((train, test))
    }

    fn check_split(&self, train_ratio: f64) -> Result<()> {
        if self.is_empty() {
            return Err(NetworkError::EmptyDataset);
        }
        if !(train_ratio > 0.0 && train_ratio < 1.0) {
            return Err(NetworkError::InvalidConfig(
                "train_ratio must be strictly between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Label-to-class mapping built from a first pass over the records.
struct LabelIndex {
    num_classes: usize,
    /// Sorted string labels; empty when labels are plain integers.
    string_labels: Vec<String>,
}

impl LabelIndex {
    fn class_of(&self, label: &str, row: usize) -> Result<usize> {
        let class = if self.string_labels.is_empty() {
            label.parse::<usize>().map_err(|_| {
                NetworkError::Parse(format!("row {}: label '{}' is not an integer", row, label))
            })?
        } else {
            self.string_labels
                .iter()
                .position(|l| l == label)
                .ok_or_else(|| {
                    NetworkError::Parse(format!("row {}: unknown label '{}'", row, label))
                })?
        };
        if class >= self.num_classes {
            return Err(NetworkError::Parse(format!(
                "row {}: label '{}' maps to class {} but only {} classes are configured",
                row, label, class, self.num_classes
            )));
        }
        Ok(class)
    }
}

fn build_label_index(
    records: &[csv::StringRecord],
    column: usize,
    configured_classes: usize,
) -> Result<LabelIndex> {
    let mut labels = BTreeSet::new();
    let mut all_integers = true;
    let mut max_integer = 0usize;

    for (row, record) in records.iter().enumerate() {
        let label = cell(record, row, column)?.trim().to_string();
        if let Ok(value) = label.parse::<usize>() {
            max_integer = max_integer.max(value);
        } else {
            all_integers = false;
        }
        labels.insert(label);
    }

    if all_integers {
        let detected = max_integer + 1;
        Ok(LabelIndex {
            num_classes: if configured_classes > 0 {
                configured_classes
            } else {
                detected
            },
            string_labels: Vec::new(),
        })
    } else {
        // BTreeSet iteration gives the stable alphabetical ordering.
        let string_labels: Vec<String> = labels.into_iter().collect();
        let detected = string_labels.len();
        Ok(LabelIndex {
            num_classes: if configured_classes > 0 {
                configured_classes
            } else {
                detected
            },
            string_labels,
        })
    }
}

fn cell<'r>(record: &'r csv::StringRecord, row: usize, column: usize) -> Result<&'r str> {
    record.get(column).ok_or_else(|| {
        NetworkError::Parse(format!("row {}: column {} is out of range", row, column))
    })
}

fn parse_cell(record: &csv::StringRecord, row: usize, column: usize) -> Result<f64> {
    let raw = cell(record, row, column)?.trim();
    raw.parse::<f64>().map_err(|_| {
        NetworkError::Parse(format!(
            "row {}: column {}: '{}' is not a number",
            row, column, raw
        ))
    })
}
