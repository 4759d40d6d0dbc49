//! Multinomial logistic regression
//!
//! A single `Linear(d, 3)` layer trained full-batch with SGD on softmax
//! cross-entropy. After training the weights are copied out of the tensor so
//! prediction is plain arithmetic on `f64`.

use burn::backend::{Autodiff, NdArray};
use burn::nn::{Linear, LinearConfig};
use burn::optim::{GradientsParams, Optimizer, SgdConfig};
use burn::tensor::activation::log_softmax;
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::{ElementConversion, Tensor};

use super::{argmax, check_training_data, Classifier, ModelKind, ModelParams};
use crate::{Outcome, Result, SoccerError};

type TrainBackend = Autodiff<NdArray<f32>>;

/// Fitted logistic regression, weights laid out `[input][class]`
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    bias: Vec<f64>,
    dim: usize,
}

impl LogisticRegression {
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Raw class scores for one row
    pub fn logits(&self, row: &[f64]) -> [f64; Outcome::COUNT] {
        let mut scores = [0.0; Outcome::COUNT];
        for (k, score) in scores.iter_mut().enumerate() {
            *score = self.bias[k]
                + row
                    .iter()
                    .take(self.dim)
                    .enumerate()
                    .map(|(i, x)| x * self.weights[i * Outcome::COUNT + k])
                    .sum::<f64>();
        }
        scores
    }
}

impl Classifier for LogisticRegression {
    fn fit(x: &[Vec<f64>], y: &[usize], params: &ModelParams) -> Result<Self> {
        let dim = check_training_data(ModelKind::LogisticRegression, x, y)?;
        <TrainBackend as burn::tensor::backend::Backend>::seed(params.seed);
        let device = Default::default();
        let trainer = LogisticTrainer::<TrainBackend>::new(device, dim, params.logistic_learning_rate);
        trainer.train(x, y, params.logistic_epochs)
    }

    fn predict(&self, row: &[f64]) -> usize {
        argmax(&self.logits(row))
    }
}

/// Full-batch SGD trainer for a single linear layer
pub struct LogisticTrainer<B: AutodiffBackend> {
    model: Linear<B>,
    optimizer: burn::optim::adaptor::OptimizerAdaptor<burn::optim::Sgd<B::InnerBackend>, Linear<B>, B>,
    learning_rate: f64,
    dim: usize,
    device: B::Device,
}

impl<B: AutodiffBackend> LogisticTrainer<B> {
    pub fn new(device: B::Device, dim: usize, learning_rate: f64) -> Self {
        let model = LinearConfig::new(dim, Outcome::COUNT).init(&device);
        let optimizer = SgdConfig::new().init();

        LogisticTrainer {
            model,
            optimizer,
            learning_rate,
            dim,
            device,
        }
    }

    pub fn train(mut self, x: &[Vec<f64>], y: &[usize], epochs: usize) -> Result<LogisticRegression> {
        let n = x.len();
        let flat: Vec<f32> = x.iter().flatten().map(|v| *v as f32).collect();
        let mut one_hot = vec![0.0f32; n * Outcome::COUNT];
        for (i, label) in y.iter().enumerate() {
            one_hot[i * Outcome::COUNT + label] = 1.0;
        }

        let inputs = Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device).reshape([n, self.dim]);
        let targets =
            Tensor::<B, 1>::from_floats(one_hot.as_slice(), &self.device).reshape([n, Outcome::COUNT]);

        log::info!(
            "Training logistic regression: {} rows, {} features, {} epochs",
            n,
            self.dim,
            epochs
        );

        for epoch in 0..epochs {
            let logits = self.model.forward(inputs.clone());
            let loss = (targets.clone() * log_softmax(logits, 1))
                .sum_dim(1)
                .mean()
                .neg();
            let loss_val: f32 = loss.clone().into_scalar().elem();

            if !loss_val.is_finite() {
                return Err(SoccerError::ModelFit {
                    model: ModelKind::LogisticRegression.name().to_string(),
                    message: format!("loss diverged at epoch {}", epoch + 1),
                });
            }

            let grads = loss.backward();
            let grads_params = GradientsParams::from_grads(grads, &self.model);
            self.model = self.optimizer.step(self.learning_rate, self.model, grads_params);

            if epoch % 50 == 0 || epoch + 1 == epochs {
                log::debug!("Epoch {}/{}: loss={:.4}", epoch + 1, epochs, loss_val);
            }
        }

        self.export()
    }

    fn export(&self) -> Result<LogisticRegression> {
        let weights = self
            .model
            .weight
            .val()
            .into_data()
            .to_vec::<f32>()
            .map_err(fit_error)?;
        let bias = match &self.model.bias {
            Some(b) => b.val().into_data().to_vec::<f32>().map_err(fit_error)?,
            None => vec![0.0; Outcome::COUNT],
        };

        Ok(LogisticRegression {
            weights: weights.into_iter().map(f64::from).collect(),
            bias: bias.into_iter().map(f64::from).collect(),
            dim: self.dim,
        })
    }
}

fn fit_error<E: std::fmt::Debug>(e: E) -> SoccerError {
    SoccerError::ModelFit {
        model: ModelKind::LogisticRegression.name().to_string(),
        message: format!("could not read weights: {:?}", e),
    }
}
