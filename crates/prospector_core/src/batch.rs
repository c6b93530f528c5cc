//! Independent engines stepped together. Instances never share state.

use crate::actions::HOLD;
use crate::engine::{Engine, StepResult};
use crate::error::CoreError;
use crate::observation::Observation;
use crate::EngineConfig;

pub struct EngineBatch {
    engines: Vec<Engine>,
}

fn check_len(expected: usize, actual: usize) -> Result<(), CoreError> {
    if expected == actual {
        Ok(())
    } else {
        Err(CoreError::BatchLengthMismatch { expected, actual })
    }
}

impl EngineBatch {
    /// One engine per seed, all sharing `config`.
    pub fn new(config: EngineConfig, seeds: &[u64]) -> Result<Self, CoreError> {
        let mut engines = Vec::new();
        engines
            .try_reserve_exact(seeds.len())
            .map_err(|_| CoreError::Allocation {
                requested: seeds.len(),
            })?;
        engines.extend(seeds.iter().map(|&seed| Engine::new(config, seed)));
        Ok(Self { engines })
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    pub fn engines_mut(&mut self) -> &mut [Engine] {
        &mut self.engines
    }

    /// Resets every engine. Without `seeds`, each engine reuses its current seed.
    pub fn reset_many(&mut self, seeds: Option<&[u64]>) -> Result<Vec<Observation>, CoreError> {
        reset_many(&mut self.engines, seeds)
    }

    /// Steps every engine once. Without `actions`, every engine holds.
    pub fn step_many(&mut self, actions: Option<&[u8]>) -> Result<Vec<StepResult>, CoreError> {
        step_many(&mut self.engines, actions)
    }

    #[cfg(feature = "parallel")]
    pub fn par_reset_many(
        &mut self,
        seeds: Option<&[u64]>,
    ) -> Result<Vec<Observation>, CoreError> {
        par_reset_many(&mut self.engines, seeds)
    }

    #[cfg(feature = "parallel")]
    pub fn par_step_many(&mut self, actions: Option<&[u8]>) -> Result<Vec<StepResult>, CoreError> {
        par_step_many(&mut self.engines, actions)
    }
}

pub fn reset_many(
    engines: &mut [Engine],
    seeds: Option<&[u64]>,
) -> Result<Vec<Observation>, CoreError> {
    match seeds {
        Some(seeds) => {
            check_len(engines.len(), seeds.len())?;
            Ok(engines
                .iter_mut()
                .zip(seeds)
                .map(|(engine, &seed)| engine.reset(seed))
                .collect())
        }
        None => Ok(engines
            .iter_mut()
            .map(|engine| {
                let seed = engine.seed();
                engine.reset(seed)
            })
            .collect()),
    }
}

pub fn step_many(
    engines: &mut [Engine],
    actions: Option<&[u8]>,
) -> Result<Vec<StepResult>, CoreError> {
    match actions {
        Some(actions) => {
            check_len(engines.len(), actions.len())?;
            Ok(engines
                .iter_mut()
                .zip(actions)
                .map(|(engine, &code)| engine.step(code))
                .collect())
        }
        None => Ok(engines.iter_mut().map(|engine| engine.step(HOLD)).collect()),
    }
}

#[cfg(feature = "parallel")]
pub fn par_reset_many(
    engines: &mut [Engine],
    seeds: Option<&[u64]>,
) -> Result<Vec<Observation>, CoreError> {
    use rayon::prelude::*;

    match seeds {
        Some(seeds) => {
            check_len(engines.len(), seeds.len())?;
            Ok(engines
                .par_iter_mut()
                .zip(seeds.par_iter())
                .map(|(engine, &seed)| engine.reset(seed))
                .collect())
        }
        None => Ok(engines
            .par_iter_mut()
            .map(|engine| {
                let seed = engine.seed();
                engine.reset(seed)
            })
            .collect()),
    }
}

#[cfg(feature = "parallel")]
pub fn par_step_many(
    engines: &mut [Engine],
    actions: Option<&[u8]>,
) -> Result<Vec<StepResult>, CoreError> {
    use rayon::prelude::*;

    match actions {
        Some(actions) => {
            check_len(engines.len(), actions.len())?;
            Ok(engines
                .par_iter_mut()
                .zip(actions.par_iter())
                .map(|(engine, &code)| engine.step(code))
                .collect())
        }
        None => Ok(engines.par_iter_mut().map(|engine| engine.step(HOLD)).collect()),
    }
}
