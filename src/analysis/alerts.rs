//! Price-threshold and squeeze-fire alert evaluation. Storing rules is somebody else's job.

use {
    crate::{
        config::PriceLike,
        models::{MomentumDirection, ScanResult},
        utils::now_utc,
    },
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    std::collections::HashMap,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    PriceAbove(f64),
    PriceBelow(f64),
    SqueezeFire,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    pub symbol: String,
    #[serde(default)]
    pub display_name: String,
    pub kind: AlertKind,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl AlertRule {
    pub fn new(symbol: impl Into<String>, kind: AlertKind) -> Self {
        Self {
            symbol: symbol.into(),
            display_name: String::new(),
            kind,
            active: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredAlert {
    pub rule: AlertRule,
    pub current_price: Option<f64>,
    pub direction: Option<MomentumDirection>,
    pub triggered_at: DateTime<Utc>,
}

/// Price rules whose threshold has been reached (inclusive).
pub fn evaluate_price_alerts(
    rules: &[AlertRule],
    prices: &HashMap<String, f64>,
) -> Vec<TriggeredAlert> {
    let now = now_utc();
    rules
        .iter()
        .filter(|rule| rule.active)
        .filter_map(|rule| {
            let price = *prices.get(&rule.symbol)?;
            let hit = match rule.kind {
                AlertKind::PriceAbove(threshold) => price >= threshold,
                AlertKind::PriceBelow(threshold) => price <= threshold,
                AlertKind::SqueezeFire => false,
            };
            hit.then(|| TriggeredAlert {
                rule: rule.clone(),
                current_price: Some(price),
                direction: None,
                triggered_at: now,
            })
        })
        .collect()
}

/// Squeeze-fire rules for symbols that fired on their latest bar.
pub fn evaluate_squeeze_alerts(rules: &[AlertRule], results: &[ScanResult]) -> Vec<TriggeredAlert> {
    let now = now_utc();
    let by_symbol: HashMap<&str, &ScanResult> =
        results.iter().map(|r| (r.symbol.as_str(), r)).collect();

    rules
        .iter()
        .filter(|rule| rule.active && rule.kind == AlertKind::SqueezeFire)
        .filter_map(|rule| {
            let result = by_symbol.get(rule.symbol.as_str())?;
            result.squeeze_fire.then(|| TriggeredAlert {
                rule: rule.clone(),
                current_price: Some(result.current_price.value()),
                direction: Some(result.momentum_direction),
                triggered_at: now,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices() -> HashMap<String, f64> {
        HashMap::from([("AAA".to_string(), 100.0), ("BBB".to_string(), 50.0)])
    }

    #[test]
    fn price_thresholds_are_inclusive() {
        let rules = vec![
            AlertRule::new("AAA", AlertKind::PriceAbove(100.0)),
            AlertRule::new("BBB", AlertKind::PriceBelow(49.0)),
            AlertRule::new("BBB", AlertKind::PriceBelow(50.0)),
        ];
        let hits = evaluate_price_alerts(&rules, &prices());
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].rule.symbol, "AAA");
        assert_eq!(hits[1].current_price, Some(50.0));
    }

    #[test]
    fn inactive_and_unknown_rules_are_skipped() {
        let mut off = AlertRule::new("AAA", AlertKind::PriceAbove(1.0));
        off.active = false;
        let rules = vec![off, AlertRule::new("ZZZ", AlertKind::PriceAbove(1.0))];
        assert!(evaluate_price_alerts(&rules, &prices()).is_empty());
    }

    #[test]
    fn rules_deserialize_from_json() {
        let rule: AlertRule =
            serde_json::from_str(r#"{"symbol":"AAA","kind":{"PRICE_ABOVE":12.5}}"#)
                .expect("valid json");
        assert_eq!(rule.kind, AlertKind::PriceAbove(12.5));
        assert!(rule.active);

        let fire: AlertRule = serde_json::from_str(r#"{"symbol":"AAA","kind":"SQUEEZE_FIRE"}"#)
            .expect("valid json");
        assert_eq!(fire.kind, AlertKind::SqueezeFire);
    }
}
