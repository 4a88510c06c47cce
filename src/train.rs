//! Adversarial training loop: a generator and a discriminator driven to
//! completion by step/epoch bookkeeping owned here, with all model-specific
//! computation injected through [`GanTask`].

pub mod loss_scale;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use burn::config::Config;
use burn::data::dataloader::DataLoader;
use burn::module::{AutodiffModule, Module};
use burn::optim::Optimizer;
use burn::record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder};
use burn::tensor::backend::AutodiffBackend;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::checkpoint::CheckpointManager;
use crate::error::TrainError;
use crate::summary::SummaryWriter;
use crate::train::loss_scale::LossScaleOptimizer;

/// Step/epoch counters. Owned exclusively by the trainer, persisted into
/// every checkpoint, restored on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainState {
    /// Total optimizer updates applied.
    pub steps: u64,
    /// Completed full passes over the training set.
    pub epochs: u64,
}

#[derive(Config, Debug)]
pub struct TrainerConfig {
    /// Output directory for checkpoints and the summary stream.
    pub outdir: String,
    /// Training finishes once this step count is reached (in the usual
    /// [`GanTask::check_train_finish`] implementation).
    pub train_max_steps: u64,
    #[config(default = 1000)]
    pub eval_interval_steps: u64,
    #[config(default = 1000)]
    pub save_interval_steps: u64,
    #[config(default = 100)]
    pub log_interval_steps: u64,
    /// Coordinator role: only rank 0 performs logging, evaluation, and
    /// checkpoint side effects.
    #[config(default = 0)]
    pub rank: usize,
    #[config(default = 10)]
    pub max_checkpoints: usize,
    #[config(default = false)]
    pub generator_mixed_precision: bool,
    #[config(default = false)]
    pub discriminator_mixed_precision: bool,
}

/// A restartable source of batches. The trainer pulls one full pass per
/// epoch; calling [`BatchStream::batches`] again starts over.
pub trait BatchStream<O> {
    fn batches(&self) -> Box<dyn Iterator<Item = O> + '_>;
}

impl<O> BatchStream<O> for Arc<dyn DataLoader<O>> {
    fn batches(&self) -> Box<dyn Iterator<Item = O> + '_> {
        Box::new(self.as_ref().iter())
    }
}

/// In-memory stream, mostly for tests and small corpora.
impl<O: Clone> BatchStream<O> for Vec<O> {
    fn batches(&self) -> Box<dyn Iterator<Item = O> + '_> {
        Box::new(self.iter().cloned())
    }
}

/// Everything a hook may touch: the two models, their (loss-scale wrapped)
/// optimizers, the read-only counters, the trainer config, and the summary
/// side channel.
pub struct GanContext<'a, B, T, OG, OD>
where
    B: AutodiffBackend,
    T: GanTask<B> + ?Sized,
{
    pub generator: &'a mut T::Generator,
    pub discriminator: &'a mut T::Discriminator,
    pub gen_optimizer: &'a mut LossScaleOptimizer<OG>,
    pub dis_optimizer: &'a mut LossScaleOptimizer<OD>,
    pub state: &'a TrainState,
    pub config: &'a TrainerConfig,
    pub summary: &'a mut SummaryWriter,
}

/// The five model-specific operations the loop delegates to, injected at
/// construction instead of supplied by subclassing.
///
/// Hooks must leave the shared counters consistent on failure; the trainer
/// treats any returned error as fatal to the run.
pub trait GanTask<B: AutodiffBackend> {
    type Batch;
    type Generator: AutodiffModule<B>;
    type Discriminator: AutodiffModule<B>;

    /// One optimizer update for both generator and discriminator.
    fn train_step<OG, OD>(
        &mut self,
        batch: Self::Batch,
        ctx: &mut GanContext<'_, B, Self, OG, OD>,
    ) -> Result<(), TrainError>
    where
        OG: Optimizer<Self::Generator, B>,
        OD: Optimizer<Self::Discriminator, B>;

    fn eval_step<OG, OD>(
        &mut self,
        batch: Self::Batch,
        ctx: &mut GanContext<'_, B, Self, OG, OD>,
    ) -> Result<(), TrainError>
    where
        OG: Optimizer<Self::Generator, B>,
        OD: Optimizer<Self::Discriminator, B>;

    /// One full pass over the eval loader. Runs synchronously; training makes
    /// no progress until it returns.
    fn eval_epoch<OG, OD>(
        &mut self,
        loader: &dyn BatchStream<Self::Batch>,
        ctx: &mut GanContext<'_, B, Self, OG, OD>,
    ) -> Result<(), TrainError>
    where
        OG: Optimizer<Self::Generator, B>,
        OD: Optimizer<Self::Discriminator, B>;

    /// Invoked every step on the coordinator; the task decides whether this
    /// step is a logging step (typically `steps % log_interval_steps == 0`).
    fn check_log_interval<OG, OD>(
        &mut self,
        ctx: &mut GanContext<'_, B, Self, OG, OD>,
    ) -> Result<(), TrainError>
    where
        OG: Optimizer<Self::Generator, B>,
        OD: Optimizer<Self::Discriminator, B>;

    /// Consulted after every step; returning true ends the run cooperatively
    /// (typically `steps >= train_max_steps`).
    fn check_train_finish(&mut self, state: &TrainState, config: &TrainerConfig) -> bool;
}

pub struct GanTrainer<B, T, OG, OD>
where
    B: AutodiffBackend,
    T: GanTask<B>,
    OG: Optimizer<T::Generator, B>,
    OD: Optimizer<T::Discriminator, B>,
{
    task: T,
    generator: T::Generator,
    discriminator: T::Discriminator,
    gen_optimizer: LossScaleOptimizer<OG>,
    dis_optimizer: LossScaleOptimizer<OD>,
    train_loader: Option<Box<dyn BatchStream<T::Batch>>>,
    eval_loader: Option<Box<dyn BatchStream<T::Batch>>>,
    state: TrainState,
    train_steps_per_epoch: usize,
    finish_train: bool,
    config: TrainerConfig,
    summary: SummaryWriter,
    checkpoints: CheckpointManager,
    device: B::Device,
}

impl<B, T, OG, OD> GanTrainer<B, T, OG, OD>
where
    B: AutodiffBackend,
    T: GanTask<B>,
    OG: Optimizer<T::Generator, B>,
    OD: Optimizer<T::Discriminator, B>,
{
    /// Mixed-precision flags wrap the matching optimizer in a dynamic
    /// loss-scaling adapter here; the rest of the loop never tells the
    /// difference.
    pub fn new(
        task: T,
        generator: T::Generator,
        discriminator: T::Discriminator,
        gen_optimizer: OG,
        dis_optimizer: OD,
        config: TrainerConfig,
        device: B::Device,
    ) -> Result<Self, TrainError> {
        if config.eval_interval_steps == 0
            || config.save_interval_steps == 0
            || config.log_interval_steps == 0
        {
            return Err(TrainError::Config(
                "interval steps must be positive".to_string(),
            ));
        }
        if config.max_checkpoints == 0 {
            return Err(TrainError::Config(
                "max_checkpoints must be positive".to_string(),
            ));
        }

        let outdir = PathBuf::from(&config.outdir);
        let summary = SummaryWriter::create(&outdir)?;
        let checkpoints = CheckpointManager::new(outdir.join("checkpoints"), config.max_checkpoints)?;

        Ok(Self {
            gen_optimizer: LossScaleOptimizer::wrap(gen_optimizer, config.generator_mixed_precision),
            dis_optimizer: LossScaleOptimizer::wrap(
                dis_optimizer,
                config.discriminator_mixed_precision,
            ),
            task,
            generator,
            discriminator,
            train_loader: None,
            eval_loader: None,
            state: TrainState::default(),
            train_steps_per_epoch: 0,
            finish_train: false,
            config,
            summary,
            checkpoints,
            device,
        })
    }

    /// Resume counters from a known state (0/0 otherwise).
    pub fn with_state(mut self, state: TrainState) -> Self {
        self.state = state;
        self
    }

    pub fn set_train_data_loader(&mut self, loader: impl BatchStream<T::Batch> + 'static) {
        self.train_loader = Some(Box::new(loader));
    }

    pub fn set_eval_data_loader(&mut self, loader: impl BatchStream<T::Batch> + 'static) {
        self.eval_loader = Some(Box::new(loader));
    }

    pub fn state(&self) -> TrainState {
        self.state
    }

    pub fn task(&self) -> &T {
        &self.task
    }

    pub fn generator(&self) -> &T::Generator {
        &self.generator
    }

    pub fn discriminator(&self) -> &T::Discriminator {
        &self.discriminator
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn checkpoints(&self) -> &CheckpointManager {
        &self.checkpoints
    }

    /// Realized step count of the last completed epoch.
    pub fn train_steps_per_epoch(&self) -> usize {
        self.train_steps_per_epoch
    }

    pub fn finished(&self) -> bool {
        self.finish_train
    }

    /// Run training to completion: epochs until the task reports finish.
    pub fn run(&mut self) -> Result<(), TrainError> {
        if self.train_loader.is_none() {
            return Err(TrainError::MissingTrainLoader);
        }

        info!(
            "start training at step {} (train_max_steps: {})",
            self.state.steps, self.config.train_max_steps
        );
        while !self.finish_train {
            self.train_epoch()?;
        }
        info!("finish training.");

        Ok(())
    }

    fn train_epoch(&mut self) -> Result<(), TrainError> {
        let loader = self
            .train_loader
            .take()
            .ok_or(TrainError::MissingTrainLoader)?;

        let mut steps_this_epoch = 0;
        let mut outcome = Ok(());
        for batch in loader.batches() {
            if let Err(err) = self.train_step(batch) {
                outcome = Err(err);
                break;
            }
            steps_this_epoch += 1;
            if self.finish_train {
                break;
            }
        }
        self.train_loader = Some(loader);
        outcome?;

        if self.finish_train {
            return Ok(());
        }

        self.state.epochs += 1;
        self.train_steps_per_epoch = steps_this_epoch;
        info!(
            "(steps: {}) finished {} epoch training ({} steps per epoch)",
            self.state.steps, self.state.epochs, steps_this_epoch
        );

        Ok(())
    }

    fn train_step(&mut self, batch: T::Batch) -> Result<(), TrainError> {
        {
            let Self {
                task,
                generator,
                discriminator,
                gen_optimizer,
                dis_optimizer,
                state,
                config,
                summary,
                ..
            } = self;
            let mut ctx = GanContext {
                generator,
                discriminator,
                gen_optimizer,
                dis_optimizer,
                state: &*state,
                config,
                summary,
            };
            task.train_step(batch, &mut ctx)?;
        }
        self.state.steps += 1;

        if self.task.check_train_finish(&self.state, &self.config) {
            self.finish_train = true;
        }

        // side effects belong to the coordinator only, in fixed order
        if self.config.rank == 0 {
            self.check_log_interval()?;
            self.check_eval_interval()?;
            self.check_save_interval()?;
        }

        Ok(())
    }

    fn check_log_interval(&mut self) -> Result<(), TrainError> {
        let Self {
            task,
            generator,
            discriminator,
            gen_optimizer,
            dis_optimizer,
            state,
            config,
            summary,
            ..
        } = self;
        let mut ctx = GanContext {
            generator,
            discriminator,
            gen_optimizer,
            dis_optimizer,
            state: &*state,
            config,
            summary,
        };
        task.check_log_interval(&mut ctx)
    }

    fn check_eval_interval(&mut self) -> Result<(), TrainError> {
        if self.state.steps % self.config.eval_interval_steps != 0 {
            return Ok(());
        }

        let loader = self
            .eval_loader
            .take()
            .ok_or(TrainError::MissingEvalLoader)?;
        let result = {
            let Self {
                task,
                generator,
                discriminator,
                gen_optimizer,
                dis_optimizer,
                state,
                config,
                summary,
                ..
            } = self;
            let mut ctx = GanContext {
                generator,
                discriminator,
                gen_optimizer,
                dis_optimizer,
                state: &*state,
                config,
                summary,
            };
            task.eval_epoch(loader.as_ref(), &mut ctx)
        };
        self.eval_loader = Some(loader);

        result
    }

    fn check_save_interval(&mut self) -> Result<(), TrainError> {
        if self.state.steps % self.config.save_interval_steps != 0 {
            return Ok(());
        }

        let path = self.save_checkpoint()?;
        info!(
            "successfully saved checkpoint @ {} steps ({})",
            self.state.steps,
            path.display()
        );

        Ok(())
    }

    /// Persist {state, generator, discriminator, both optimizers} under
    /// `<outdir>/checkpoints/ckpt-<steps>`, evicting the oldest snapshots
    /// beyond the retention cap.
    pub fn save_checkpoint(&mut self) -> Result<PathBuf, TrainError> {
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
        let state = self.state;
        let generator = &self.generator;
        let discriminator = &self.discriminator;
        let gen_optimizer = &self.gen_optimizer;
        let dis_optimizer = &self.dis_optimizer;

        self.checkpoints.save(state.steps, |dir| {
            generator.clone().save_file(dir.join("generator"), &recorder)?;
            discriminator
                .clone()
                .save_file(dir.join("discriminator"), &recorder)?;
            recorder.record(gen_optimizer.inner().to_record(), dir.join("gen_optimizer"))?;
            recorder.record(dis_optimizer.inner().to_record(), dir.join("dis_optimizer"))?;
            fs::write(dir.join("state.json"), serde_json::to_string_pretty(&state)?)?;
            Ok(())
        })
    }

    /// Restore a snapshot written by [`Self::save_checkpoint`]. Counters and
    /// model/optimizer state come back exactly as saved; failures from the
    /// persistence layer propagate unchanged.
    pub fn load_checkpoint(&mut self, path: &Path) -> Result<(), TrainError>
    where
        OG: Clone,
        OD: Clone,
    {
        let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();

        let raw = fs::read_to_string(path.join("state.json")).map_err(|err| {
            TrainError::Checkpoint {
                path: path.to_owned(),
                message: err.to_string(),
            }
        })?;
        let state: TrainState = serde_json::from_str(&raw)?;

        self.generator =
            self.generator
                .clone()
                .load_file(path.join("generator"), &recorder, &self.device)?;
        self.discriminator = self.discriminator.clone().load_file(
            path.join("discriminator"),
            &recorder,
            &self.device,
        )?;

        let record: OG::Record = recorder.load(path.join("gen_optimizer"), &self.device)?;
        self.gen_optimizer.load_inner_record::<T::Generator, B>(record);
        let record: OD::Record = recorder.load(path.join("dis_optimizer"), &self.device)?;
        self.dis_optimizer
            .load_inner_record::<T::Discriminator, B>(record);

        self.state = state;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::ndarray::NdArrayDevice;
    use burn::backend::{Autodiff, NdArray};
    use burn::nn::{Linear, LinearConfig};
    use burn::optim::{AdamConfig, GradientsParams};
    use burn::tensor::Tensor;

    use super::*;

    type TB = Autodiff<NdArray>;

    #[derive(Default)]
    struct ToyTask {
        eval_epochs: usize,
        eval_steps: usize,
        log_checks: Vec<u64>,
    }

    impl GanTask<TB> for ToyTask {
        type Batch = Tensor<TB, 2>;
        type Generator = Linear<TB>;
        type Discriminator = Linear<TB>;

        fn train_step<OG, OD>(
            &mut self,
            batch: Self::Batch,
            ctx: &mut GanContext<'_, TB, Self, OG, OD>,
        ) -> Result<(), TrainError>
        where
            OG: Optimizer<Linear<TB>, TB>,
            OD: Optimizer<Linear<TB>, TB>,
        {
            let dis_loss = ctx
                .discriminator
                .forward(batch.clone())
                .powf_scalar(2.0)
                .mean();
            let grads = GradientsParams::from_grads(dis_loss.backward(), ctx.discriminator);
            *ctx.discriminator = ctx
                .dis_optimizer
                .step(1e-3, ctx.discriminator.clone(), grads);

            let gen_loss = ctx.generator.forward(batch).powf_scalar(2.0).mean();
            let grads = GradientsParams::from_grads(gen_loss.backward(), ctx.generator);
            *ctx.generator = ctx.gen_optimizer.step(1e-3, ctx.generator.clone(), grads);

            Ok(())
        }

        fn eval_step<OG, OD>(
            &mut self,
            _batch: Self::Batch,
            _ctx: &mut GanContext<'_, TB, Self, OG, OD>,
        ) -> Result<(), TrainError>
        where
            OG: Optimizer<Linear<TB>, TB>,
            OD: Optimizer<Linear<TB>, TB>,
        {
            self.eval_steps += 1;
            Ok(())
        }

        fn eval_epoch<OG, OD>(
            &mut self,
            loader: &dyn BatchStream<Self::Batch>,
            ctx: &mut GanContext<'_, TB, Self, OG, OD>,
        ) -> Result<(), TrainError>
        where
            OG: Optimizer<Linear<TB>, TB>,
            OD: Optimizer<Linear<TB>, TB>,
        {
            self.eval_epochs += 1;
            for batch in loader.batches() {
                self.eval_step(batch, ctx)?;
            }
            ctx.summary
                .scalar("eval", "epochs", self.eval_epochs as f32, ctx.state.steps)?;
            Ok(())
        }

        fn check_log_interval<OG, OD>(
            &mut self,
            ctx: &mut GanContext<'_, TB, Self, OG, OD>,
        ) -> Result<(), TrainError>
        where
            OG: Optimizer<Linear<TB>, TB>,
            OD: Optimizer<Linear<TB>, TB>,
        {
            if ctx.state.steps % ctx.config.log_interval_steps == 0 {
                self.log_checks.push(ctx.state.steps);
                ctx.summary
                    .scalar("train", "steps", ctx.state.steps as f32, ctx.state.steps)?;
            }
            Ok(())
        }

        fn check_train_finish(&mut self, state: &TrainState, config: &TrainerConfig) -> bool {
            state.steps >= config.train_max_steps
        }
    }

    fn batches(n: usize, device: &NdArrayDevice) -> Vec<Tensor<TB, 2>> {
        (0..n)
            .map(|i| Tensor::<TB, 2>::from_floats([[i as f32, 1.0]], device))
            .collect()
    }

    fn build(
        config: TrainerConfig,
    ) -> GanTrainer<
        TB,
        ToyTask,
        impl Optimizer<Linear<TB>, TB> + Clone,
        impl Optimizer<Linear<TB>, TB> + Clone,
    > {
        let device = NdArrayDevice::Cpu;
        let generator = LinearConfig::new(2, 2).init::<TB>(&device);
        let discriminator = LinearConfig::new(2, 2).init::<TB>(&device);

        GanTrainer::new(
            ToyTask::default(),
            generator,
            discriminator,
            AdamConfig::new().init(),
            AdamConfig::new().init(),
            config,
            device,
        )
        .unwrap()
    }

    #[test]
    fn interval_checks_fire_in_step_multiples() {
        let outdir = tempfile::tempdir().unwrap();
        let config = TrainerConfig::new(outdir.path().to_string_lossy().into_owned(), 5)
            .with_log_interval_steps(1)
            .with_eval_interval_steps(3)
            .with_save_interval_steps(2);

        let device = NdArrayDevice::Cpu;
        let mut trainer = build(config);
        trainer.set_train_data_loader(batches(10, &device));
        trainer.set_eval_data_loader(batches(4, &device));
        trainer.run().unwrap();

        assert_eq!(trainer.state().steps, 5);
        // finished mid-epoch: no epoch increment
        assert_eq!(trainer.state().epochs, 0);
        assert!(trainer.finished());

        // saves at 2 and 4, eval at 3, log every step
        let kept: Vec<_> = trainer.checkpoints().kept().collect();
        assert_eq!(kept.len(), 2);
        assert!(kept[0].ends_with("ckpt-2"));
        assert!(kept[1].ends_with("ckpt-4"));
        assert_eq!(trainer.task().eval_epochs, 1);
        assert_eq!(trainer.task().eval_steps, 4);
        assert_eq!(trainer.task().log_checks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn non_coordinator_rank_performs_no_side_effects() {
        let outdir = tempfile::tempdir().unwrap();
        let config = TrainerConfig::new(outdir.path().to_string_lossy().into_owned(), 5)
            .with_log_interval_steps(1)
            .with_eval_interval_steps(1)
            .with_save_interval_steps(1)
            .with_rank(1);

        let device = NdArrayDevice::Cpu;
        let mut trainer = build(config);
        trainer.set_train_data_loader(batches(10, &device));
        trainer.set_eval_data_loader(batches(4, &device));
        trainer.run().unwrap();

        // training still finishes, but nothing else fires
        assert_eq!(trainer.state().steps, 5);
        assert_eq!(trainer.checkpoints().kept().count(), 0);
        assert_eq!(trainer.task().eval_epochs, 0);
        assert!(trainer.task().log_checks.is_empty());
    }

    #[test]
    fn full_passes_increment_epochs() {
        let outdir = tempfile::tempdir().unwrap();
        let config = TrainerConfig::new(outdir.path().to_string_lossy().into_owned(), 7);

        let device = NdArrayDevice::Cpu;
        let mut trainer = build(config);
        trainer.set_train_data_loader(batches(3, &device));
        trainer.set_eval_data_loader(batches(1, &device));
        trainer.run().unwrap();

        // 3 steps per epoch: two full passes, then finish at step 7
        assert_eq!(trainer.state().steps, 7);
        assert_eq!(trainer.state().epochs, 2);
        assert_eq!(trainer.train_steps_per_epoch(), 3);
    }

    #[test]
    fn retention_cap_evicts_oldest_first() {
        let outdir = tempfile::tempdir().unwrap();
        let config = TrainerConfig::new(outdir.path().to_string_lossy().into_owned(), 5)
            .with_save_interval_steps(1)
            .with_max_checkpoints(2);

        let device = NdArrayDevice::Cpu;
        let mut trainer = build(config);
        trainer.set_train_data_loader(batches(10, &device));
        trainer.set_eval_data_loader(batches(1, &device));
        trainer.run().unwrap();

        let kept: Vec<_> = trainer.checkpoints().kept().collect();
        assert_eq!(kept.len(), 2);
        assert!(kept[0].ends_with("ckpt-4"));
        assert!(kept[1].ends_with("ckpt-5"));
    }

    #[test]
    fn checkpoint_round_trip_restores_state_and_weights() {
        let outdir_a = tempfile::tempdir().unwrap();
        let config = TrainerConfig::new(outdir_a.path().to_string_lossy().into_owned(), 3);

        let device = NdArrayDevice::Cpu;
        let mut trainer = build(config);
        trainer.set_train_data_loader(batches(10, &device));
        trainer.set_eval_data_loader(batches(1, &device));
        trainer.run().unwrap();

        let path = trainer.save_checkpoint().unwrap();
        let trained_weights = trainer.generator().weight.val().to_data();

        let outdir_b = tempfile::tempdir().unwrap();
        let config = TrainerConfig::new(outdir_b.path().to_string_lossy().into_owned(), 3);
        let mut restored = build(config);
        restored.load_checkpoint(&path).unwrap();

        assert_eq!(restored.state().steps, 3);
        assert_eq!(restored.state().epochs, trainer.state().epochs);
        assert_eq!(restored.generator().weight.val().to_data(), trained_weights);
    }

    #[test]
    fn missing_checkpoint_fails_without_fallback() {
        let outdir = tempfile::tempdir().unwrap();
        let config = TrainerConfig::new(outdir.path().to_string_lossy().into_owned(), 3);

        let mut trainer = build(config);
        let err = trainer
            .load_checkpoint(Path::new("/nonexistent/ckpt-1"))
            .unwrap_err();
        assert!(matches!(err, TrainError::Checkpoint { .. }));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let outdir = tempfile::tempdir().unwrap();
        let config = TrainerConfig::new(outdir.path().to_string_lossy().into_owned(), 3)
            .with_save_interval_steps(0);

        let device = NdArrayDevice::Cpu;
        let generator = LinearConfig::new(2, 2).init::<TB>(&device);
        let discriminator = LinearConfig::new(2, 2).init::<TB>(&device);
        let result: Result<GanTrainer<TB, ToyTask, _, _>, _> = GanTrainer::new(
            ToyTask::default(),
            generator,
            discriminator,
            AdamConfig::new().init(),
            AdamConfig::new().init(),
            config,
            device,
        );
        assert!(matches!(result, Err(TrainError::Config(_))));
    }

    #[test]
    fn missing_train_loader_is_an_error() {
        let outdir = tempfile::tempdir().unwrap();
        let config = TrainerConfig::new(outdir.path().to_string_lossy().into_owned(), 3);

        let mut trainer = build(config);
        assert!(matches!(
            trainer.run(),
            Err(TrainError::MissingTrainLoader)
        ));
    }
}
