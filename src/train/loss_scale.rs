//! Dynamic loss scaling for reduced-precision training. The wrapper keeps
//! the [`Optimizer`] update contract: the training loop never observes it.
//! Tasks multiply their loss by [`LossScaleOptimizer::loss_scale`]; the
//! wrapper unscales gradients before the inner update, skips the update
//! entirely when a gradient overflowed, and adjusts the scale as it goes.

use burn::module::{AutodiffModule, ModuleVisitor, ParamId};
use burn::optim::{GradientsParams, Optimizer};
use burn::tensor::backend::AutodiffBackend;
use burn::tensor::{ElementConversion, Tensor};
use burn::LearningRate;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct DynamicLossScale {
    pub scale: f32,
    pub growth_factor: f32,
    pub backoff_factor: f32,
    pub growth_interval: u64,
    good_steps: u64,
}

impl Default for DynamicLossScale {
    fn default() -> Self {
        Self {
            scale: 65536.0,
            growth_factor: 2.0,
            backoff_factor: 0.5,
            growth_interval: 2000,
            good_steps: 0,
        }
    }
}

impl DynamicLossScale {
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_growth_interval(mut self, growth_interval: u64) -> Self {
        self.growth_interval = growth_interval;
        self
    }

    fn record_good_step(&mut self) {
        self.good_steps += 1;
        if self.good_steps >= self.growth_interval {
            self.scale *= self.growth_factor;
            self.good_steps = 0;
        }
    }

    fn record_overflow(&mut self) {
        self.scale = (self.scale * self.backoff_factor).max(1.0);
        self.good_steps = 0;
    }
}

#[derive(Debug, Clone)]
pub struct LossScaleOptimizer<O> {
    inner: O,
    scale: Option<DynamicLossScale>,
}

impl<O> LossScaleOptimizer<O> {
    /// Plain delegation, for models trained in full precision.
    pub fn passthrough(inner: O) -> Self {
        Self { inner, scale: None }
    }

    pub fn dynamic(inner: O) -> Self {
        Self::with_scale(inner, DynamicLossScale::default())
    }

    pub fn with_scale(inner: O, scale: DynamicLossScale) -> Self {
        Self {
            inner,
            scale: Some(scale),
        }
    }

    pub fn wrap(inner: O, mixed_precision: bool) -> Self {
        if mixed_precision {
            Self::dynamic(inner)
        } else {
            Self::passthrough(inner)
        }
    }

    /// Factor a task should multiply its loss by before backprop. 1.0 when
    /// scaling is disabled.
    pub fn loss_scale(&self) -> f32 {
        self.scale.as_ref().map_or(1.0, |s| s.scale)
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    /// Restore the wrapped optimizer from a checkpoint record.
    pub fn load_inner_record<M, B>(&mut self, record: O::Record)
    where
        B: AutodiffBackend,
        M: AutodiffModule<B>,
        O: Optimizer<M, B> + Clone,
    {
        self.inner = self.inner.clone().load_record(record);
    }
}

/// Walks a module's parameters, checking the matching gradients for
/// non-finite values and collecting an unscaled copy.
struct GradProbe<'a> {
    grads: &'a GradientsParams,
    inv_scale: f32,
    finite: bool,
    unscaled: GradientsParams,
}

impl<'a, B: AutodiffBackend> ModuleVisitor<B> for GradProbe<'a> {
    fn visit_float<const D: usize>(&mut self, id: &ParamId, _tensor: &Tensor<B, D>) {
        if let Some(grad) = self.grads.get::<B::InnerBackend, D>(id) {
            let peak: f32 = grad.clone().abs().max().into_scalar().elem();
            if !peak.is_finite() {
                self.finite = false;
                return;
            }
            self.unscaled
                .register(id.clone(), grad.mul_scalar(self.inv_scale));
        }
    }
}

impl<M, B, O> Optimizer<M, B> for LossScaleOptimizer<O>
where
    B: AutodiffBackend,
    M: AutodiffModule<B>,
    O: Optimizer<M, B>,
{
    type Record = O::Record;

    fn step(&mut self, lr: LearningRate, module: M, grads: GradientsParams) -> M {
        let Some(state) = self.scale.as_mut() else {
            return self.inner.step(lr, module, grads);
        };

        let mut probe = GradProbe {
            grads: &grads,
            inv_scale: 1.0 / state.scale,
            finite: true,
            unscaled: GradientsParams::new(),
        };
        module.visit(&mut probe);

        if !probe.finite {
            warn!(
                "non-finite gradients, skipping update (loss scale {} -> {})",
                state.scale,
                state.scale * state.backoff_factor
            );
            state.record_overflow();
            return module;
        }

        state.record_good_step();
        self.inner.step(lr, module, probe.unscaled)
    }

    fn to_record(&self) -> Self::Record {
        self.inner.to_record()
    }

    fn load_record(mut self, record: Self::Record) -> Self {
        self.inner = self.inner.load_record(record);
        self
    }
}
