//! Distribute geometries over several worker threads each running its own finder

use std::{panic, thread};

use crossbeam_channel::{unbounded, Sender};
use log::debug;

use crate::error::{Error, FeatureError};
use crate::finder::IntersectingTilesFinder;
use crate::geometry::Geometry;
use crate::projection::Projection;
use crate::Config;

type Worker<P> = thread::JoinHandle<Result<IntersectingTilesFinder<P>, Error>>;

pub struct ParallelFinder<P: Projection> {
    sender: Sender<Geometry>,

    /// Finder the workers' results are merged into
    ///
    /// Also counts the skipped features.
    base: IntersectingTilesFinder<P>,

    /// Join handles for the worker threads
    handles: Vec<Worker<P>>,
}

impl<P: Projection> ParallelFinder<P> {
    /// Spawn `workers` threads (at least one)
    pub fn new(config: Config, projection: P, workers: usize) -> Result<Self, Error> {
        let base = IntersectingTilesFinder::new(config, projection)?;
        let (sender, receiver) = unbounded::<Geometry>();

        let mut handles = Vec::with_capacity(workers.max(1));
        for i in 0..workers.max(1) {
            let mut finder = IntersectingTilesFinder::new(config, projection)?;
            let receiver = receiver.clone();
            let handle = thread::spawn(move || -> Result<_, Error> {
                while let Ok(geometry) = receiver.recv() {
                    finder.add_geometry(&geometry)?;
                }
                debug!("Worker {i} found {} tiles", finder.len());
                Ok(finder)
            });
            handles.push(handle);
            debug!("Spawned worker {i}");
        }

        Ok(ParallelFinder {
            sender,
            base,
            handles,
        })
    }

    /// Queue every geometry of a source
    ///
    /// Features which failed to convert are skipped and counted.
    pub fn find_intersections<I>(&mut self, geometries: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = Result<Geometry, FeatureError>>,
    {
        for geometry in geometries {
            match geometry {
                Ok(geometry) => self.add_geometry(geometry)?,
                Err(error) => self.base.skip(error),
            }
        }
        Ok(())
    }

    /// Queue a single geographic geometry
    ///
    /// Fails if every worker has already stopped.
    pub fn add_geometry(&mut self, geometry: Geometry) -> Result<(), Error> {
        self.sender.send(geometry).map_err(|_| Error::Worker)?;
        debug!("Queued a geometry: {} in channel", self.sender.len());
        Ok(())
    }

    /// Join all workers and merge their tiles
    ///
    /// A panicking worker is resumed on the calling thread.
    pub fn finish(self) -> Result<IntersectingTilesFinder<P>, Error> {
        let ParallelFinder {
            sender,
            mut base,
            handles,
        } = self;
        drop(sender);

        let mut result = Ok(());
        for handle in handles {
            match handle.join() {
                Ok(Ok(finder)) => base.merge(finder),
                Ok(Err(error)) => {
                    if result.is_ok() {
                        result = Err(error);
                    }
                }
                Err(error) => panic::resume_unwind(error),
            }
        }
        result.map(|()| base)
    }
}
