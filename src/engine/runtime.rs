//! Per-scene execution runtime.
//!
//! Every open scene gets one worker thread fed by a bounded queue, so all
//! mutations of a scene are serialized while different scenes run in
//! parallel. Submission never blocks: a full queue is reported as
//! `QueueFull` and the caller decides whether to retry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};

use crate::engine::{EngineResponse, SceneEngine};
use crate::error::{BrickError, BrickResult, ExecutionError};
use crate::ir::MutationRequest;
use crate::scene::SceneId;

enum Job {
    Execute {
        request: MutationRequest,
        reply: Sender<BrickResult<EngineResponse>>,
    },

    #[cfg(test)]
    Sleep {
        duration: Duration,
        reply: Sender<()>,
    },
}

struct SceneWorker {
    engine: Arc<SceneEngine>,
    tx: Sender<Job>,
    handle: JoinHandle<()>,
    queue_capacity: usize,
}

fn path_of(scene_id: &SceneId) -> String {
    format!("scene:{scene_id}")
}

impl SceneWorker {
    fn start(scene_id: &SceneId, engine: Arc<SceneEngine>) -> BrickResult<Self> {
        let queue_capacity = engine.config().queue_capacity.max(1);
        let (tx, rx) = bounded::<Job>(queue_capacity);

        let worker_engine = Arc::clone(&engine);
        let handle = thread::Builder::new()
            .name(format!("brickyard-{scene_id}"))
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    match job {
                        Job::Execute { request, reply } => {
                            let result = worker_engine.execute(request);
                            let _ = reply.send(result);
                        }

                        #[cfg(test)]
                        Job::Sleep { duration, reply } => {
                            thread::sleep(duration);
                            let _ = reply.send(());
                        }
                    }
                }
            })
            .map_err(|e| BrickError::internal(format!("failed to spawn scene worker: {e}")))?;

        Ok(Self {
            engine,
            tx,
            handle,
            queue_capacity,
        })
    }

    fn try_submit(&self, job: Job, scene_id: &SceneId) -> BrickResult<()> {
        match self.tx.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(BrickError::Execution(ExecutionError::QueueFull {
                scene_id: scene_id.clone(),
                capacity: self.queue_capacity,
            })),
            Err(TrySendError::Disconnected(_)) => {
                Err(BrickError::Execution(ExecutionError::Disconnected {
                    path: path_of(scene_id),
                }))
            }
        }
    }

    fn shutdown(self) {
        // Closing the channel lets the worker drain queued jobs, then exit.
        drop(self.tx);
        let _ = self.handle.join();
    }
}

/// Handle returned by [`SceneRuntime::submit`].
#[derive(Debug)]
pub struct ExecutionHandle {
    scene_id: SceneId,
    rx: Receiver<BrickResult<EngineResponse>>,
}

impl ExecutionHandle {
    /// The scene the request was queued on.
    #[must_use]
    pub const fn scene_id(&self) -> &SceneId {
        &self.scene_id
    }

    /// Waits for the execution to complete.
    ///
    /// # Errors
    /// The mutation's own error, or `Disconnected` if the worker went away.
    pub fn join(self) -> BrickResult<EngineResponse> {
        self.rx.recv().map_err(|_| {
            BrickError::Execution(ExecutionError::Disconnected {
                path: path_of(&self.scene_id),
            })
        })?
    }

    /// Waits for the execution to complete with a timeout.
    ///
    /// # Errors
    /// `Timeout` if the result is not ready in time, otherwise as [`ExecutionHandle::join`].
    pub fn join_timeout(self, timeout: Duration) -> BrickResult<EngineResponse> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => BrickError::Execution(ExecutionError::Timeout {
                duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            RecvTimeoutError::Disconnected => {
                BrickError::Execution(ExecutionError::Disconnected {
                    path: path_of(&self.scene_id),
                })
            }
        })?
    }
}

/// Runtime owning one single-writer worker per open scene.
#[derive(Default)]
pub struct SceneRuntime {
    scenes: Mutex<HashMap<SceneId, SceneWorker>>,
}

impl SceneRuntime {
    /// Creates a runtime with no open scenes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> BrickResult<MutexGuard<'_, HashMap<SceneId, SceneWorker>>> {
        self.scenes
            .lock()
            .map_err(|_| BrickError::internal("scene runtime lock poisoned"))
    }

    /// Starts a worker for `scene_id` executing against `engine`.
    ///
    /// # Errors
    /// `SceneAlreadyOpen` if the id is taken.
    pub fn open_scene(&self, scene_id: SceneId, engine: Arc<SceneEngine>) -> BrickResult<()> {
        let mut scenes = self.lock()?;
        if scenes.contains_key(&scene_id) {
            return Err(BrickError::Execution(ExecutionError::SceneAlreadyOpen {
                scene_id: scene_id.clone(),
            }));
        }
        let worker = SceneWorker::start(&scene_id, engine)?;
        tracing::info!(scene = %scene_id, "scene opened");
        scenes.insert(scene_id, worker);
        Ok(())
    }

    /// Stops the scene's worker after it drains its queue, returning its engine.
    ///
    /// # Errors
    /// `SceneNotFound` if the scene is not open.
    pub fn close_scene(&self, scene_id: &SceneId) -> BrickResult<Arc<SceneEngine>> {
        let worker = self
            .lock()?
            .remove(scene_id)
            .ok_or_else(|| Self::not_found(scene_id))?;
        let engine = Arc::clone(&worker.engine);
        worker.shutdown();
        tracing::info!(scene = %scene_id, "scene closed");
        Ok(engine)
    }

    /// Returns true if the scene is open.
    #[must_use]
    pub fn is_open(&self, scene_id: &SceneId) -> bool {
        self.lock()
            .map(|scenes| scenes.contains_key(scene_id))
            .unwrap_or(false)
    }

    /// Ids of all open scenes, sorted.
    #[must_use]
    pub fn scene_ids(&self) -> Vec<SceneId> {
        let mut ids: Vec<SceneId> = self
            .lock()
            .map(|scenes| scenes.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        ids
    }

    /// The engine of an open scene, for reads and subscriptions.
    ///
    /// # Errors
    /// `SceneNotFound` if the scene is not open.
    pub fn engine(&self, scene_id: &SceneId) -> BrickResult<Arc<SceneEngine>> {
        self.lock()?
            .get(scene_id)
            .map(|worker| Arc::clone(&worker.engine))
            .ok_or_else(|| Self::not_found(scene_id))
    }

    /// Queues a request on the scene's worker without blocking.
    ///
    /// # Errors
    /// `SceneNotFound`, or `QueueFull` under backpressure.
    pub fn submit(&self, scene_id: &SceneId, request: MutationRequest) -> BrickResult<ExecutionHandle> {
        let (tx, rx) = bounded::<BrickResult<EngineResponse>>(1);
        let scenes = self.lock()?;
        let worker = scenes.get(scene_id).ok_or_else(|| Self::not_found(scene_id))?;
        worker.try_submit(Job::Execute { request, reply: tx }, scene_id)?;
        Ok(ExecutionHandle {
            scene_id: scene_id.clone(),
            rx,
        })
    }

    /// Queues a request and waits for its result.
    ///
    /// # Errors
    /// As [`SceneRuntime::submit`] and [`ExecutionHandle::join`].
    pub fn execute(&self, scene_id: &SceneId, request: MutationRequest) -> BrickResult<EngineResponse> {
        self.submit(scene_id, request)?.join()
    }

    /// Closes every scene, draining queued requests first.
    pub fn shutdown(&self) {
        let workers: Vec<(SceneId, SceneWorker)> = match self.scenes.lock() {
            Ok(mut scenes) => scenes.drain().collect(),
            Err(poisoned) => poisoned.into_inner().drain().collect(),
        };
        for (scene_id, worker) in workers {
            worker.shutdown();
            tracing::debug!(scene = %scene_id, "scene worker stopped");
        }
    }

    fn not_found(scene_id: &SceneId) -> BrickError {
        BrickError::Execution(ExecutionError::SceneNotFound {
            scene_id: scene_id.clone(),
        })
    }

    #[cfg(test)]
    fn submit_sleep(&self, scene_id: &SceneId, duration: Duration) -> BrickResult<Receiver<()>> {
        let (tx, rx) = bounded::<()>(1);
        let scenes = self.lock()?;
        let worker = scenes.get(scene_id).ok_or_else(|| Self::not_found(scene_id))?;
        worker.try_submit(Job::Sleep { duration, reply: tx }, scene_id)?;
        Ok(rx)
    }
}

impl Drop for SceneRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
