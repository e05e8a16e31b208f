//! Running one operation over many topology layers.

use tracing::{info, warn};

use crate::catalog::Topology;
use crate::error::LayerError;
use crate::progress::ProgressReporter;

/// What a bulk operation got through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    /// Layers the operation finished.
    pub processed: usize,
    /// `true` if the reporter asked to stop before every layer was done.
    pub cancelled: bool,
}

/// Runs `op` on each topology in `selection`, in order.
///
/// Progress advances by `1 / selection.len()` per layer and is cleared when
/// the run ends, whether it finished, was cancelled or failed. Cancellation is
/// checked between layers only.
pub fn for_each_topology<F>(
    selection: &[Topology],
    title: &str,
    progress: &mut dyn ProgressReporter,
    mut op: F,
) -> Result<BulkOutcome, LayerError>
where
    F: FnMut(Topology) -> Result<(), LayerError>,
{
    let step = 1.0 / selection.len().max(1) as f32;
    let mut outcome = BulkOutcome::default();
    let mut fraction = 0.0;

    for topology in selection {
        if progress.is_cancelled() {
            outcome.cancelled = true;
            warn!("{title} cancelled after {} of {} layers", outcome.processed, selection.len());
            break;
        }
        progress.report(title, topology.name(), fraction);
        if let Err(e) = op(*topology) {
            progress.clear();
            return Err(e);
        }
        outcome.processed += 1;
        fraction += step;
    }

    progress.clear();
    if !outcome.cancelled {
        info!("{title}: {} topology layers", outcome.processed);
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        fractions: Vec<f32>,
        messages: Vec<String>,
        cleared: usize,
        cancel_after: Option<usize>,
    }

    impl ProgressReporter for Recorder {
        fn report(&mut self, _title: &str, message: &str, fraction: f32) {
            self.fractions.push(fraction);
            self.messages.push(message.to_string());
        }

        fn clear(&mut self) {
            self.cleared += 1;
        }

        fn is_cancelled(&self) -> bool {
            self.cancel_after
                .is_some_and(|n| self.fractions.len() >= n)
        }
    }

    #[test]
    fn test_visits_selection_in_order_with_even_steps() {
        let mut progress = Recorder::default();
        let mut seen = Vec::new();
        let selection = [Topology::Beach, Topology::River, Topology::Field, Topology::Lake];
        let outcome = for_each_topology(&selection, "Paint", &mut progress, |t| {
            seen.push(t);
            Ok(())
        })
        .unwrap();

        assert_eq!(seen, selection);
        assert_eq!(outcome, BulkOutcome { processed: 4, cancelled: false });
        assert_eq!(progress.fractions, vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(progress.messages[1], "River");
        assert_eq!(progress.cleared, 1);
    }

    #[test]
    fn test_cancellation_between_items() {
        let mut progress = Recorder {
            cancel_after: Some(2),
            ..Default::default()
        };
        let mut count = 0;
        let outcome = for_each_topology(Topology::ALL, "Rotate", &mut progress, |_| {
            count += 1;
            Ok(())
        })
        .unwrap();

        assert_eq!(count, 2);
        assert_eq!(outcome, BulkOutcome { processed: 2, cancelled: true });
        assert_eq!(progress.cleared, 1);
    }

    #[test]
    fn test_error_stops_and_clears() {
        let mut progress = Recorder::default();
        let result = for_each_topology(Topology::ALL, "Invert", &mut progress, |t| {
            if t == Topology::Summit {
                Err(LayerError::NotLoaded)
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err(LayerError::NotLoaded));
        assert_eq!(progress.fractions.len(), 3);
        assert_eq!(progress.cleared, 1);
    }

    #[test]
    fn test_empty_selection() {
        let mut progress = Recorder::default();
        let outcome = for_each_topology(&[], "Clear", &mut progress, |_| Ok(())).unwrap();
        assert_eq!(outcome.processed, 0);
        assert!(progress.fractions.is_empty());
    }
}
