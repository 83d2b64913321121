use std::collections::HashMap;
use std::path::Path;

use ndarray::{Array2, ArrayView4, Axis, Ix3};
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::TensorRef;
use parking_lot::Mutex;
use tracing::debug;

use crate::errors::{DetectError, Result};

/// Fallback input size when the model declares dynamic spatial dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// Handle to a loaded ONNX detector.
///
/// Constructed once by the hosting process and shared for its lifetime; the
/// session sits behind a mutex because `Session::run` needs `&mut self`, so
/// a `&Detector` is enough to run inference.
pub struct Detector {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    input_size: u32,
    class_names: HashMap<usize, String>,
}

impl Detector {
    /// Load detector weights from an ONNX file.
    ///
    /// Fails with [`DetectError::ModelNotFound`] before touching the ONNX
    /// runtime when the file is absent, so a missing deployment is
    /// detectable at startup.
    pub fn load<P: AsRef<Path>>(weights_path: P) -> Result<Self> {
        let path = weights_path.as_ref();
        if !path.exists() {
            return Err(DetectError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }

        let session = Session::builder()
            .map_err(|e| DetectError::Model {
                operation: "create session builder".to_string(),
                source: Box::new(e),
            })?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| DetectError::Model {
                operation: "set optimization level".to_string(),
                source: Box::new(e),
            })?
            .commit_from_file(path)
            .map_err(|e| DetectError::Model {
                operation: format!("load weights from {}", path.display()),
                source: Box::new(e),
            })?;

        let input = session.inputs.first().ok_or_else(|| DetectError::Model {
            operation: "read model inputs".to_string(),
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "model declares no inputs",
            )),
        })?;
        let input_name = input.name.clone();

        // NCHW input; dimension 2 is the spatial size. Dynamic models report
        // a non-positive dimension, in which case we assume the YOLO default.
        let input_size = input
            .input_type
            .tensor_shape()
            .and_then(|shape| shape.get(2).copied())
            .filter(|&dim| dim > 0)
            .map_or(DEFAULT_INPUT_SIZE, |dim| dim as u32);

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| DetectError::Model {
                operation: "read model outputs".to_string(),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "model declares no outputs",
                )),
            })?;

        let class_names = session
            .metadata()
            .ok()
            .and_then(|metadata| metadata.custom("names").ok().flatten())
            .map(|names| parse_class_names(&names))
            .unwrap_or_default();

        debug!(
            path = %path.display(),
            input_size,
            classes = class_names.len(),
            "detector loaded"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            input_size,
            class_names,
        })
    }

    /// Square input size the model expects.
    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Class label for `class_id`, falling back to `class_{id}` when the
    /// model metadata carries no name for it.
    pub fn class_name(&self, class_id: usize) -> String {
        self.class_names
            .get(&class_id)
            .cloned()
            .unwrap_or_else(|| format!("class_{class_id}"))
    }

    /// Run one inference pass and return the `(attributes, proposals)`
    /// prediction matrix.
    pub fn predict(&self, tensor: ArrayView4<'_, f32>) -> Result<Array2<f32>> {
        let mut session = self.session.lock();
        let outputs = session.run(ort::inputs![
            self.input_name.as_str() => TensorRef::from_array_view(&tensor.as_standard_layout())?
        ])?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| DetectError::Model {
                operation: format!("extract output `{}`", self.output_name),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "output missing from inference results",
                )),
            })?;
        let preds = output
            .try_extract_array::<f32>()?
            .into_dimensionality::<Ix3>()?;

        Ok(preds.index_axis(Axis(0), 0).to_owned())
    }
}

/// Parse the Ultralytics `names` metadata entry, e.g.
/// `{0: 'dimension', 1: 'title block'}`.
fn parse_class_names(raw: &str) -> HashMap<usize, String> {
    let mut names = HashMap::new();
    let trimmed = raw.trim().trim_start_matches('{').trim_end_matches('}');

    // Split on commas outside quotes; names may contain commas.
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in trimmed.chars() {
        match ch {
            '\'' | '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                entries.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        entries.push(current);
    }

    for entry in entries {
        let Some((id, name)) = entry.split_once(':') else {
            continue;
        };
        let Ok(id) = id.trim().parse::<usize>() else {
            continue;
        };
        let name = name.trim().trim_matches(|c| c == '\'' || c == '"').to_string();
        if !name.is_empty() {
            names.insert(id, name);
        }
    }

    names
}
