use {
    crate::models::{BreakoutDirection, EventDirection, SqueezeEvent},
    serde::{Deserialize, Serialize},
    statrs::statistics::Statistics,
};

/// How one forward horizon played out across closed episodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonStats {
    pub horizon: usize,
    pub samples: usize,
    /// Mean % move. `None` without samples.
    pub average_pct: Option<f64>,
    /// Share of samples (in %) that moved the breakout's way.
    pub win_rate_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutStats {
    pub direction: BreakoutDirection,
    pub count: usize,
    pub horizons: Vec<HorizonStats>,
}

impl BreakoutStats {
    /// Aggregates closed events of `direction` over each requested horizon.
    pub fn from_events(
        events: &[SqueezeEvent],
        direction: BreakoutDirection,
        horizons: &[usize],
    ) -> Self {
        let wanted = EventDirection::from(direction);
        let matching: Vec<&SqueezeEvent> = events
            .iter()
            .filter(|e| e.direction == wanted && !e.is_ongoing())
            .collect();

        let horizons = horizons
            .iter()
            .map(|&horizon| {
                let moves: Vec<f64> = matching
                    .iter()
                    .filter_map(|e| e.move_at(horizon))
                    .map(|m| m.value())
                    .collect();

                let samples = moves.len();
                if samples == 0 {
                    return HorizonStats {
                        horizon,
                        samples,
                        average_pct: None,
                        win_rate_pct: None,
                    };
                }

                let wins = moves.iter().filter(|&&m| m * direction.sign() > 0.0).count();
                HorizonStats {
                    horizon,
                    samples,
                    average_pct: Some(moves.iter().mean()),
                    win_rate_pct: Some(wins as f64 / samples as f64 * 100.0),
                }
            })
            .collect();

        Self {
            direction,
            count: matching.len(),
            horizons,
        }
    }
}
