mod breakout;
mod indicator_frame;
mod ohlcv;
mod scan_result;
mod squeeze_event;
mod squeeze_state;

pub use {
    breakout::{
        BreakoutDirection, BreakoutSignal, Confidence, EntrySignal, InvalidReason, SignalType,
        Validity,
    },
    indicator_frame::{IndicatorFrame, MomentumDirection},
    ohlcv::PriceSeries,
    scan_result::{ScanResult, ScanSummary, TrendPosition},
    squeeze_event::{EventDirection, EventEnd, ForwardMove, SqueezeEvent, SymbolEvent},
    squeeze_state::{SqueezeState, SqueezeStates, SqueezeStatus},
};
