//! Timed driver for [`ClayBuster`]
//!
//! One tokio task owns the engine. Launches and motion ticks come from two
//! fixed-delay intervals, hit clays wait in a deadline queue, and shots,
//! resets, snapshot queries and destroy arrive over a channel. Everything runs
//! on that one task, so no two mutations of the registry or score can
//! interleave.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::{ClayBuster, ExerciseSnapshot};
use crate::config::ExerciseConfig;
use crate::error::{ExerciseError, Result};
use crate::host::{ExerciseHost, ShotEvent, TargetHandle};
use crate::metadata::ExerciseMetadata;
use crate::sim::VelocitySampler;

enum Command {
    Shot(ShotEvent),
    Reset,
    Snapshot(oneshot::Sender<ExerciseSnapshot>),
    Destroy,
}

/// Handle to a running exercise
///
/// Dropping the handle without calling [`destroy`](Self::destroy) aborts the
/// exercise task.
pub struct ExerciseController {
    commands: mpsc::UnboundedSender<Command>,
    task: Option<JoinHandle<Result<()>>>,
    metadata: ExerciseMetadata,
}

impl ExerciseController {
    /// Initialise the exercise and start its cadences on the current tokio
    /// runtime. Fails without touching the host when called outside a
    /// runtime, and without spawning anything if `init` fails.
    pub fn start<H>(config: ExerciseConfig, host: Arc<H>) -> Result<Self>
    where
        H: ExerciseHost + ?Sized + 'static,
    {
        let sampler = VelocitySampler::from_entropy(&config);
        Self::start_with_sampler(config, host, sampler)
    }

    /// Like [`start`](Self::start) with a caller-provided sampler
    pub fn start_with_sampler<H>(
        config: ExerciseConfig,
        host: Arc<H>,
        sampler: VelocitySampler,
    ) -> Result<Self>
    where
        H: ExerciseHost + ?Sized + 'static,
    {
        config.validate()?;
        let runtime = Handle::try_current()?;
        let metadata = ExerciseMetadata::for_config(&config);

        let mut engine = ClayBuster::new(config, host, sampler);
        engine.init()?;

        let (commands, receiver) = mpsc::unbounded_channel();
        let task = runtime.spawn(run(engine, receiver));

        Ok(Self {
            commands,
            task: Some(task),
            metadata,
        })
    }

    pub fn metadata(&self) -> &ExerciseMetadata {
        &self.metadata
    }

    /// Feed a shot from the host's input source
    pub fn on_shot(&self, shot: ShotEvent) -> Result<()> {
        self.send(Command::Shot(shot))
    }

    /// Zero the score, clear the sky and restart the launch cadence
    pub fn reset(&self) -> Result<()> {
        self.send(Command::Reset)
    }

    /// Score and visible clay count, after every command sent before it
    pub async fn snapshot(&self) -> Result<ExerciseSnapshot> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot(reply))?;
        response.await.map_err(|_| ExerciseError::NotRunning)
    }

    /// Stop the exercise and wait for its task to finish.
    ///
    /// Pending hit removals are dropped. Once this returns nothing touches
    /// the host again. A fatal launch error that stopped the exercise
    /// earlier is returned here.
    pub async fn destroy(mut self) -> Result<()> {
        // The task may already be gone after a fatal error
        let _ = self.commands.send(Command::Destroy);
        match self.task.take() {
            Some(task) => task.await?,
            None => Ok(()),
        }
    }

    /// Whether the exercise task is still alive
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| ExerciseError::NotRunning)
    }
}

impl Drop for ExerciseController {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run<H>(mut engine: ClayBuster<H>, mut commands: mpsc::UnboundedReceiver<Command>) -> Result<()>
where
    H: ExerciseHost + ?Sized,
{
    let launch_delay = engine.config().launch_delay();
    let motion_tick = engine.config().motion_tick();
    let hit_grace = engine.config().hit_grace();

    let start = Instant::now();
    let mut launches = time::interval_at(start + launch_delay, launch_delay);
    launches.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut motion = time::interval_at(start + motion_tick, motion_tick);
    motion.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Every hit waits the same grace period, so deadlines arrive in order
    let mut pending: VecDeque<(Instant, TargetHandle)> = VecDeque::new();

    loop {
        let next_release = pending.front().map(|(deadline, _)| *deadline);

        // Timers first so a burst of shots cannot hold back the cadences
        tokio::select! {
            biased;

            _ = time::sleep_until(next_release.unwrap_or(start)), if next_release.is_some() => {
                if let Some((_, target)) = pending.pop_front() {
                    engine.release_target(target);
                }
            }

            _ = launches.tick() => {
                if let Err(err) = engine.launch_clay() {
                    log::error!("Stopping Clay Buster: {}", err);
                    for (_, target) in pending.drain(..) {
                        engine.release_target(target);
                    }
                    engine.shutdown();
                    return Err(err);
                }
            }

            _ = motion.tick() => {
                engine.move_clays();
            }

            command = commands.recv() => match command {
                Some(Command::Shot(shot)) => {
                    if let Some(target) = engine.on_shot(&shot) {
                        pending.push_back((Instant::now() + hit_grace, target));
                    }
                }
                Some(Command::Reset) => {
                    engine.reset();
                    launches.reset();
                }
                Some(Command::Snapshot(reply)) => {
                    let _ = reply.send(engine.snapshot());
                }
                Some(Command::Destroy) | None => {
                    engine.shutdown();
                    return Ok(());
                }
            },
        }
    }
}
