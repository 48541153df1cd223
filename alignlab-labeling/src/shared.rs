//!
//! A labeling engine that can be driven from several threads.
//!
use std::sync::{Arc, Mutex, MutexGuard};

use alignlab_core::models::{Group, SampleIndex, TokenIndex};

use crate::engine::LabelingEngine;
use crate::error::LabelingError;

///
/// Cloneable handle to one [LabelingEngine]. Every call takes the lock once,
/// so a relabeling is never observed half applied.
///
#[derive(Clone, Debug, Default)]
pub struct SharedLabelingEngine {
    inner: Arc<Mutex<LabelingEngine>>,
}

impl SharedLabelingEngine {
    pub fn new(engine: LabelingEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LabelingEngine> {
        // poisoning is ignored
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    ///
    /// Run a closure with exclusive access to the engine.
    ///
    pub fn with<R>(&self, f: impl FnOnce(&mut LabelingEngine) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn change_tokens_to_label(&self, sample: SampleIndex, group: Group, label: usize, tokens: &[TokenIndex]) {
        self.lock().change_tokens_to_label(sample, group, label, tokens);
    }

    pub fn set_label_of_tokens(&self, sample: SampleIndex, group: Group, label: Option<usize>, tokens: &[TokenIndex]) {
        self.lock().set_label_of_tokens(sample, group, label, tokens);
    }

    pub fn get_tokens_on_group(&self, sample: SampleIndex, group: Group) -> Option<Vec<Vec<TokenIndex>>> {
        self.lock().get_tokens_on_group(sample, group)
    }

    pub fn save(&self) -> Result<bool, LabelingError> {
        self.lock().save()
    }

    ///
    /// An independent copy of the current engine.
    ///
    pub fn snapshot(&self) -> LabelingEngine {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use std::thread;

    #[rstest]
    fn test_concurrent_relabeling_keeps_ownership_exclusive() {
        let shared = SharedLabelingEngine::new(LabelingEngine::new());
        shared.with(|engine| engine.add_tokens_to_label(0, Group::Code, 0, &[0, 1, 2, 3]));

        let handles: Vec<_> = (1..5)
            .map(|label| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        shared.change_tokens_to_label(0, Group::Code, label, &[1, 2]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let labels = shared.get_tokens_on_group(0, Group::Code).unwrap();
        let owners_of_one = labels.iter().filter(|tokens| tokens.contains(&1)).count();
        let copies_of_two: usize = labels
            .iter()
            .map(|tokens| tokens.iter().filter(|t| **t == 2).count())
            .sum();

        assert_eq!(labels[0], vec![0, 3]);
        assert_eq!(owners_of_one, 1);
        assert_eq!(copies_of_two, 1);
    }
}
