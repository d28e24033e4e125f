use {
    serde::{Deserialize, Serialize},
    strum_macros::{Display, EnumIter},
};

/// Per-bar output of the squeeze state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SqueezeState {
    pub squeeze_on: bool,
    /// Set only on the first OFF bar after an ON bar.
    pub squeeze_fire: bool,
    /// Length of the current ON run including this bar; 0 when OFF.
    pub squeeze_duration: usize,
}

impl SqueezeState {
    pub fn status(&self) -> SqueezeStatus {
        if self.squeeze_on {
            SqueezeStatus::On
        } else if self.squeeze_fire {
            SqueezeStatus::Fired
        } else {
            SqueezeStatus::Off
        }
    }
}

/// Display label for a bar's state. Fired wins over Off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum SqueezeStatus {
    #[strum(serialize = "Squeeze ON")]
    On,
    #[strum(serialize = "Squeeze OFF")]
    Off,
    #[strum(serialize = "Squeeze Fired")]
    Fired,
}

/// The state column for one instrument, aligned with its indicator frame.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SqueezeStates(pub Vec<SqueezeState>);

impl SqueezeStates {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&SqueezeState> {
        self.0.get(idx)
    }

    pub fn last(&self) -> Option<&SqueezeState> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SqueezeState> {
        self.0.iter()
    }

    pub fn fire_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.squeeze_fire.then_some(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fired_takes_precedence_over_off() {
        let fired = SqueezeState {
            squeeze_on: false,
            squeeze_fire: true,
            squeeze_duration: 0,
        };
        assert_eq!(fired.status(), SqueezeStatus::Fired);
        assert_eq!(fired.status().to_string(), "Squeeze Fired");
        assert_eq!(SqueezeState::default().status(), SqueezeStatus::Off);
    }
}
