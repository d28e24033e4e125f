// Single-instrument analysis pipeline and result post-processing
mod alerts;
mod breakout_stats;
mod breakout_validator;
mod filters;
mod indicators;
mod squeeze_detector;
mod squeeze_history;

pub use {
    alerts::{AlertKind, AlertRule, TriggeredAlert, evaluate_price_alerts, evaluate_squeeze_alerts},
    breakout_stats::{BreakoutStats, HorizonStats},
    breakout_validator::{breakouts, detect_entry_signals, evaluate_fire_bar},
    filters::ScanFilter,
    indicators::{
        BollingerBands, KeltnerChannels, TrendFilter, bollinger_bands, compute_indicators,
        keltner_channels, momentum_directions, squeeze_momentum, trend_filter, true_range,
    },
    squeeze_detector::{detect_squeeze, is_squeeze_on, next_state, states_from_flags},
    squeeze_history::{episode_direction, extract_history},
};
