#![allow(dead_code)]

use env_logger::{Builder, Env};
use hijaiyah::{ClassifierError, ImageModel, ModelError, ModelSource};
use ndarray::{Array1, Array3, Array4};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

/// Returns the same scores for every input.
#[derive(Debug)]
pub struct FixedModel(pub Vec<f32>);

impl ImageModel for FixedModel {
    fn predict(&self, _tensor: &Array4<f32>) -> Result<Array1<f32>, ClassifierError> {
        Ok(Array1::from(self.0.clone()))
    }
}

/// Produces a [`FixedModel`], counting load attempts and optionally failing
/// the first few.
pub struct FixedSource {
    pub scores: Vec<f32>,
    pub attempts: Arc<AtomicUsize>,
    pub failures: usize,
    pub delay: Duration,
}

impl FixedSource {
    pub fn new(scores: Vec<f32>) -> Self {
        Self {
            scores,
            attempts: Arc::new(AtomicUsize::new(0)),
            failures: 0,
            delay: Duration::ZERO,
        }
    }

    pub fn failing_first(mut self, failures: usize) -> Self {
        self.failures = failures;
        self
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl ModelSource for FixedSource {
    fn describe(&self) -> String {
        "fixed scores".into()
    }

    fn load(&self) -> Result<Arc<dyn ImageModel>, ModelError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        if attempt < self.failures {
            return Err(ModelError::NotFound("models/fixmodel.onnx".into()));
        }
        Ok(Arc::new(FixedModel(self.scores.clone())))
    }
}

/// A 400x300 opaque canvas in a single color.
pub fn uniform_buffer(value: u8) -> Array3<u8> {
    Array3::from_elem((300, 400, 4), value)
}

/// A white canvas with a dark diagonal band and soft edges.
pub fn drawn_buffer() -> Array3<u8> {
    Array3::from_shape_fn((300, 400, 4), |(y, x, c)| {
        if c == 3 {
            return 255;
        }
        let distance = (x as i32 - y as i32).unsigned_abs();
        match distance {
            0..=10 => 0,
            11..=14 => (distance * 15) as u8,
            _ => 255,
        }
    })
}

/// Scores for the 30 Hijaiyah labels with `winner` holding `probability`.
pub fn scores_for(winner: usize, probability: f32) -> Vec<f32> {
    let rest = (1.0 - probability) / 29.0;
    (0..30).map(|i| if i == winner { probability } else { rest }).collect()
}
