//! Group-by reductions for the chart panels.
//!
//! This module groups the filtered shipments by carrier and by destination
//! port and computes the statistics each chart needs.

use crate::models::{CarrierDelay, PortDelayStats, ShipmentRecord};
use std::collections::BTreeMap;

/// Mean delay per carrier, in ascending carrier order.
pub fn carrier_delays(records: &[&ShipmentRecord]) -> Vec<CarrierDelay> {
    let mut grouped: BTreeMap<&str, (i64, usize)> = BTreeMap::new();

    for record in records {
        let entry = grouped.entry(record.carrier.as_str()).or_default();
        entry.0 += record.delay_days;
        entry.1 += 1;
    }

    grouped
        .into_iter()
        .map(|(carrier, (total, shipments))| CarrierDelay {
            carrier: carrier.to_string(),
            shipments,
            mean_delay: total as f64 / shipments as f64,
        })
        .collect()
}

/// Group delays by destination port.
pub fn group_by_destination(records: &[&ShipmentRecord]) -> BTreeMap<String, Vec<i64>> {
    let mut grouped: BTreeMap<String, Vec<i64>> = BTreeMap::new();

    for record in records {
        grouped
            .entry(record.destination_port.clone())
            .or_default()
            .push(record.delay_days);
    }

    // Sort each distribution for the quantile math
    for delays in grouped.values_mut() {
        delays.sort_unstable();
    }

    grouped
}

/// Box-plot statistics per destination port, in ascending port order.
pub fn port_delay_stats(records: &[&ShipmentRecord]) -> Vec<PortDelayStats> {
    group_by_destination(records)
        .into_iter()
        .filter_map(|(port, delays)| box_stats(port, delays))
        .collect()
}

/// Five-number summary plus whiskers and outliers for a sorted distribution.
///
/// Returns `None` only for an empty distribution.
pub fn box_stats(destination_port: String, delays: Vec<i64>) -> Option<PortDelayStats> {
    let min = *delays.first()?;
    let max = *delays.last()?;

    let q1 = quantile(&delays, 0.25);
    let median = quantile(&delays, 0.5);
    let q3 = quantile(&delays, 0.75);

    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let lower_whisker = delays
        .iter()
        .copied()
        .find(|&d| d as f64 >= lower_fence)
        .unwrap_or(min);
    let upper_whisker = delays
        .iter()
        .rev()
        .copied()
        .find(|&d| d as f64 <= upper_fence)
        .unwrap_or(max);
    let outliers = delays
        .iter()
        .copied()
        .filter(|&d| d < lower_whisker || d > upper_whisker)
        .collect();

    Some(PortDelayStats {
        destination_port,
        delays,
        min,
        q1,
        median,
        q3,
        max,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Linear-interpolation quantile of a sorted, non-empty slice.
pub fn quantile(sorted: &[i64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let position = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] as f64 + (sorted[upper] - sorted[lower]) as f64 * fraction
}

/// Ports with the highest median delay (most congested first).
pub fn most_congested_ports(stats: &[PortDelayStats], n: usize) -> Vec<&PortDelayStats> {
    let mut ports: Vec<&PortDelayStats> = stats.iter().collect();
    ports.sort_by(|a, b| {
        b.median
            .partial_cmp(&a.median)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ports.truncate(n);
    ports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{record, sample_records};

    #[test]
    fn test_carrier_delays() {
        let records = sample_records();
        let refs: Vec<&ShipmentRecord> = records.iter().collect();

        let delays = carrier_delays(&refs);
        assert_eq!(delays.len(), 2);
        assert_eq!(delays[0].carrier, "X");
        assert_eq!(delays[0].shipments, 2);
        assert_eq!(delays[0].mean_delay, 9.0);
        assert_eq!(delays[1].carrier, "Y");
        assert_eq!(delays[1].mean_delay, 12.0);
    }

    #[test]
    fn test_carrier_delays_sorted_by_name() {
        let records = vec![
            record("1", "Zim", "Rotterdam", 1),
            record("2", "Cosco", "Rotterdam", 2),
            record("3", "Maersk", "Rotterdam", 3),
        ];
        let refs: Vec<&ShipmentRecord> = records.iter().collect();

        let names: Vec<String> = carrier_delays(&refs).into_iter().map(|c| c.carrier).collect();
        assert_eq!(names, vec!["Cosco", "Maersk", "Zim"]);
    }

    #[test]
    fn test_group_by_destination_keeps_distribution() {
        let records = sample_records();
        let refs: Vec<&ShipmentRecord> = records.iter().collect();

        let grouped = group_by_destination(&refs);
        assert_eq!(grouped.get("Rotterdam"), Some(&vec![12, 15]));
        assert_eq!(grouped.get("Hamburg"), Some(&vec![3]));
    }

    #[test]
    fn test_single_record_group() {
        let stats = box_stats("Hamburg".to_string(), vec![3]).unwrap();
        assert_eq!(stats.min, 3);
        assert_eq!(stats.q1, 3.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 3.0);
        assert_eq!(stats.max, 3);
        assert_eq!(stats.lower_whisker, 3);
        assert_eq!(stats.upper_whisker, 3);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn test_box_stats_quartiles() {
        let stats = box_stats("Rotterdam".to_string(), vec![1, 2, 3, 4]).unwrap();
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q3, 3.25);
    }

    #[test]
    fn test_box_stats_outliers() {
        let stats = box_stats("Busan".to_string(), vec![1, 2, 3, 4, 5, 40]).unwrap();
        // q1 = 2.25, q3 = 4.75, upper fence = 8.5
        assert_eq!(stats.upper_whisker, 5);
        assert_eq!(stats.outliers, vec![40]);
        assert_eq!(stats.max, 40);
        assert_eq!(stats.lower_whisker, 1);
    }

    #[test]
    fn test_box_stats_empty() {
        assert!(box_stats("Nowhere".to_string(), Vec::new()).is_none());
    }

    #[test]
    fn test_port_delay_stats_order() {
        let records = sample_records();
        let refs: Vec<&ShipmentRecord> = records.iter().collect();

        let stats = port_delay_stats(&refs);
        let ports: Vec<&str> = stats.iter().map(|s| s.destination_port.as_str()).collect();
        assert_eq!(ports, vec!["Hamburg", "Rotterdam"]);
        assert_eq!(stats[1].median, 13.5);
    }

    #[test]
    fn test_most_congested_ports() {
        let records = sample_records();
        let refs: Vec<&ShipmentRecord> = records.iter().collect();
        let stats = port_delay_stats(&refs);

        let top = most_congested_ports(&stats, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].destination_port, "Rotterdam");
    }

    #[test]
    fn test_empty_selection_has_no_groups() {
        assert!(carrier_delays(&[]).is_empty());
        assert!(port_delay_stats(&[]).is_empty());
    }
}
