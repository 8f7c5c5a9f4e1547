//! The predictor owns the trained model artifact and nothing else. It is a
//! pure function from an encoded board tensor to a move distribution plus a
//! scalar evaluation; all chess knowledge lives in the encoder and decoder.
//!
//! The concrete model format hides behind the [`Predictor`] trait so it can
//! be swapped without touching encoding or decoding logic. The shipped
//! implementation is [`OnnxPredictor`], backed by an ONNX Runtime session.

use ndarray::{Array1, ArrayView3, ArrayViewD, Axis};
use ort::{session::Session, value::Tensor};

use crate::{
    encoder::PLANES,
    error::{ModelLoadError, OracleError},
    moves::MoveIndex,
};

/// Name of the model's input tensor, shaped `[N, 18, 8, 8]`.
pub const INPUT_NAME: &str = "board";
/// Name of the policy output, a `[N, 4096]` probability distribution.
pub const POLICY_OUTPUT: &str = "policy";
/// Name of the value output, `[N]` floats in `[-1, 1]`.
pub const VALUE_OUTPUT: &str = "value";

/// Raw model output for a single position.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Probability mass per [`MoveIndex`] slot, 4096 wide. Ranges over the
    /// whole slot space regardless of legality; filtering is the decoder's
    /// job.
    pub policy: Array1<f32>,
    /// Position evaluation in `[-1, 1]` from the side to move's perspective.
    pub value: f32,
}

pub trait Predictor {
    /// Run the model on one encoded board.
    ///
    /// The tensor must be exactly `[18, 8, 8]`; anything else fails with
    /// [`OracleError::ShapeMismatch`] before inference is attempted.
    fn predict(&mut self, board: ArrayView3<'_, f32>) -> Result<Prediction, OracleError>;
}

pub(crate) fn ensure_board_shape(shape: &[usize]) -> Result<(), OracleError> {
    if shape != [PLANES, 8, 8] {
        return Err(OracleError::ShapeMismatch {
            expected: vec![PLANES, 8, 8],
            actual: shape.to_vec(),
        });
    }
    Ok(())
}

/// [`Predictor`] backed by an ONNX Runtime session.
///
/// The session is created once and never mutated afterwards; loading a
/// missing or malformed artifact fails with [`OracleError::ModelLoad`]
/// before any position can be evaluated.
#[derive(Debug)]
pub struct OnnxPredictor {
    session: Session,
}

impl OnnxPredictor {
    /// Load a model artifact from a local `.onnx` file.
    pub fn from_file(path: &str) -> Result<Self, OracleError> {
        let session = load_file(path)?;
        log::info!("loaded model artifact from {path}");
        Ok(Self { session })
    }

    /// Load a model artifact from raw bytes.
    pub fn from_memory(model_bytes: &[u8]) -> Result<Self, OracleError> {
        Ok(Self {
            session: load_memory(model_bytes)?,
        })
    }

    /// Download a model artifact over HTTP(S) and load it.
    pub fn from_url(url: &str) -> Result<Self, OracleError> {
        let bytes = download(url)?;
        log::info!("downloaded model artifact from {url} ({} bytes)", bytes.len());
        Ok(Self {
            session: load_memory(&bytes)?,
        })
    }
}

fn load_file(path: &str) -> Result<Session, ModelLoadError> {
    if !std::path::Path::new(path).exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("no model artifact at {path}"),
        )
        .into());
    }
    let session = Session::builder()?.commit_from_file(path)?;
    verify_outputs(&session)?;
    Ok(session)
}

fn load_memory(model_bytes: &[u8]) -> Result<Session, ModelLoadError> {
    let session = Session::builder()?.commit_from_memory(model_bytes)?;
    verify_outputs(&session)?;
    Ok(session)
}

fn download(url: &str) -> Result<Vec<u8>, ModelLoadError> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}

/// Check the artifact's output contract at load time, so a wrong model
/// surfaces as a startup failure rather than a per-request one.
fn verify_outputs(session: &Session) -> Result<(), ModelLoadError> {
    for name in [POLICY_OUTPUT, VALUE_OUTPUT] {
        if !session.outputs().iter().any(|o| o.name() == name) {
            return Err(ModelLoadError::MissingOutput(name.to_string()));
        }
    }
    Ok(())
}

impl Predictor for OnnxPredictor {
    fn predict(&mut self, board: ArrayView3<'_, f32>) -> Result<Prediction, OracleError> {
        ensure_board_shape(board.shape())?;

        // The model takes a batch dimension; we serve one position per call.
        let batch = board.to_owned().insert_axis(Axis(0));
        let outputs = self.session.run(ort::inputs! {
            INPUT_NAME => Tensor::from_array(batch)?,
        })?;

        let policy_raw = outputs[POLICY_OUTPUT].try_extract_array::<f32>()?;
        let actual = policy_raw.shape().to_vec();
        let policy = policy_raw
            .into_dimensionality::<ndarray::Ix2>()
            .map_err(|_| OracleError::ShapeMismatch {
                expected: vec![1, MoveIndex::COUNT],
                actual: actual.clone(),
            })?;
        if policy.shape() != [1, MoveIndex::COUNT] {
            return Err(OracleError::ShapeMismatch {
                expected: vec![1, MoveIndex::COUNT],
                actual: policy.shape().to_vec(),
            });
        }
        let policy = policy.index_axis(Axis(0), 0).to_owned();

        let value = extract_value(outputs[VALUE_OUTPUT].try_extract_array::<f32>()?)?;

        Ok(Prediction { policy, value })
    }
}

/// The value output must hold exactly one element for a single-position
/// batch, whatever its rank (`[1]` and `[1, 1]` are both fine). Anything
/// else is a contract violation, same as a mis-shaped policy.
pub(crate) fn extract_value(output: ArrayViewD<'_, f32>) -> Result<f32, OracleError> {
    match output.first() {
        Some(&v) if output.len() == 1 => Ok(v.clamp(-1.0, 1.0)),
        _ => Err(OracleError::ShapeMismatch {
            expected: vec![1],
            actual: output.shape().to_vec(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    #[test]
    fn accepts_the_contract_shape() {
        assert!(ensure_board_shape(&[18, 8, 8]).is_ok());
    }

    #[test]
    fn rejects_wrong_shapes() {
        for shape in [
            &[17, 8, 8][..],
            &[18, 8, 9][..],
            &[8, 8, 18][..],
            &[18, 8][..],
        ] {
            let err = ensure_board_shape(shape).unwrap_err();
            assert!(matches!(err, OracleError::ShapeMismatch { .. }));
        }
    }

    #[test]
    fn value_output_needs_exactly_one_element() {
        let one = ArrayD::from_elem(IxDyn(&[1]), 0.25f32);
        assert_eq!(extract_value(one.view()).unwrap(), 0.25);

        let batched = ArrayD::from_elem(IxDyn(&[1, 1]), 0.25f32);
        assert_eq!(extract_value(batched.view()).unwrap(), 0.25);

        for shape in [&[2][..], &[2, 1][..], &[0][..]] {
            let bad = ArrayD::from_elem(IxDyn(shape), 0.25f32);
            let err = extract_value(bad.view()).unwrap_err();
            assert!(matches!(err, OracleError::ShapeMismatch { .. }));
        }
    }

    #[test]
    fn value_output_is_clamped() {
        let high = ArrayD::from_elem(IxDyn(&[1]), 3.0f32);
        assert_eq!(extract_value(high.view()).unwrap(), 1.0);
        let low = ArrayD::from_elem(IxDyn(&[1]), -3.0f32);
        assert_eq!(extract_value(low.view()).unwrap(), -1.0);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = OnnxPredictor::from_file("/nonexistent/model.onnx").unwrap_err();
        assert!(matches!(err, OracleError::ModelLoad(ModelLoadError::Io(_))));
    }
}
